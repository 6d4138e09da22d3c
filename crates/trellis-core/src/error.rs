//! Error types raised while enhancing an element.

use thiserror::Error;
use trellis_dom::DomError;

/// Reasons an enhancement pass was abandoned.
///
/// Every variant leaves the element rendered but inert; none of them
/// propagate past the lifecycle synchronizer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnhanceError {
    /// Expected child structure was absent.
    #[error("{component} enhancement could not find {anchor}")]
    MissingAnchor {
        /// Element tag reporting the failure.
        component: &'static str,
        /// Description of the missing anchor.
        anchor: &'static str,
    },
    /// A tree mutation was rejected.
    #[error(transparent)]
    Dom(#[from] DomError),
}

impl EnhanceError {
    /// Shorthand for [`EnhanceError::MissingAnchor`].
    #[must_use]
    pub const fn missing(component: &'static str, anchor: &'static str) -> Self {
        Self::MissingAnchor { component, anchor }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trellis_dom::MarkupError;

    #[test]
    fn missing_anchor_names_component_and_anchor() {
        let err = EnhanceError::missing("trellis-table", "tbody");
        assert_eq!(
            err.to_string(),
            "trellis-table enhancement could not find tbody"
        );
    }

    #[test]
    fn dom_errors_pass_through() {
        let err: EnhanceError =
            DomError::from(MarkupError::UnterminatedComment { position: 0 }).into();
        assert_eq!(err.to_string(), "unterminated comment starting at byte 0");
    }
}
