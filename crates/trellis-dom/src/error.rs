//! Error types for document operations.

use thiserror::Error;

use crate::node::NodeId;

/// Failures raised by tree mutations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomError {
    /// Inserting the node would create a cycle or target a non-container.
    #[error("node {child:?} cannot be inserted under {parent:?}")]
    HierarchyRequest {
        /// Intended parent.
        parent: NodeId,
        /// Node being inserted.
        child: NodeId,
    },
    /// Reference node is not a child of the given parent.
    #[error("node {reference:?} is not a child of {parent:?}")]
    NotAChild {
        /// Parent that was searched.
        parent: NodeId,
        /// Reference node that was expected among its children.
        reference: NodeId,
    },
    /// Markup could not be parsed.
    #[error(transparent)]
    Markup(#[from] MarkupError),
}

/// Failures raised while parsing a markup fragment.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MarkupError {
    /// Input ended inside a tag.
    #[error("unterminated tag starting at byte {position}")]
    UnterminatedTag {
        /// Byte offset of the opening `<`.
        position: usize,
    },
    /// Input ended inside a comment.
    #[error("unterminated comment starting at byte {position}")]
    UnterminatedComment {
        /// Byte offset of the opening `<!--`.
        position: usize,
    },
    /// Input ended inside a quoted attribute value.
    #[error("unterminated attribute value starting at byte {position}")]
    UnterminatedAttribute {
        /// Byte offset of the opening quote.
        position: usize,
    },
}

/// Failures raised while parsing a selector string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectorError {
    /// Selector string was empty.
    #[error("selector is empty")]
    Empty,
    /// Selector contained an unsupported character.
    #[error("unexpected '{found}' at byte {position} in selector")]
    Unexpected {
        /// Offending character.
        found: char,
        /// Byte offset of the character.
        position: usize,
    },
    /// Attribute selector was not closed.
    #[error("unterminated attribute selector")]
    UnterminatedAttribute,
}

/// Convenience alias for document results.
pub type DomResult<T> = Result<T, DomError>;
