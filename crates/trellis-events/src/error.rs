//! Journal error primitives.

use std::fmt::{self, Display, Formatter};

/// Error emitted when a journal cannot be constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JournalError {
    /// Replay capacity must hold at least one envelope.
    ZeroCapacity,
}

impl Display for JournalError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroCapacity => formatter.write_str("journal capacity must be positive"),
        }
    }
}

impl std::error::Error for JournalError {}

/// Result wrapper for journal operations.
pub type JournalResult<T> = Result<T, JournalError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn journal_error_display() {
        assert_eq!(
            JournalError::ZeroCapacity.to_string(),
            "journal capacity must be positive"
        );
    }
}
