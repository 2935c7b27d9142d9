//! DOM operation errors

use crate::NodeId;

/// Result type for DOM operations
pub type DomResult<T> = Result<T, DomError>;

/// DOM operation errors
///
/// A failed operation never leaves the tree partially modified.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    /// Insertion would create a cycle or put a node where it cannot live
    #[error("hierarchy request error: {0}")]
    InvalidHierarchy(&'static str),

    /// Handle refers to a destroyed or never-allocated node
    #[error("unknown node handle {0}")]
    UnknownHandle(NodeId),

    /// Node is not a child of the given parent
    #[error("node {child} is not a child of {parent}")]
    NotAChild { parent: NodeId, child: NodeId },

    /// Operation is not valid for this kind of node
    #[error("operation not supported on node {0}")]
    InvalidNodeType(NodeId),

    /// Selector could not be parsed
    #[error("invalid selector: {0:?}")]
    InvalidSelector(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = DomError::InvalidHierarchy("node is an ancestor of the parent");
        assert_eq!(
            err.to_string(),
            "hierarchy request error: node is an ancestor of the parent"
        );

        let err = DomError::InvalidSelector("div >".into());
        assert_eq!(err.to_string(), "invalid selector: \"div >\"");
    }
}
