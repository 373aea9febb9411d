//! Normalization errors.
//!
//! Shapes that do not match are not errors: the pass leaves the tree as is.
//! The only failure is input that breaks a guarantee the desugarer makes,
//! which is a compiler defect and is reported as such.

use quarry_ir::{NodeId, Span};

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CanonError {
    /// The desugarer produced a tree it promises never to produce.
    #[error("broken compiler invariant at {node:?} ({span:?}): {violation}")]
    BrokenInvariant {
        node: NodeId,
        span: Span,
        violation: InvariantViolation,
    },
}

/// What exactly the desugarer got wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum InvariantViolation {
    /// A transparent-identifier record initializer has no explicit name and
    /// its expression does not imply one.
    #[error("could not infer name from {found} initializer in synthesized anonymous record")]
    UninferableInitializerName { found: &'static str },
}

impl CanonError {
    pub fn broken_invariant(node: NodeId, span: Span, violation: InvariantViolation) -> Self {
        CanonError::BrokenInvariant {
            node,
            span,
            violation,
        }
    }

    /// The node the error points at.
    pub fn node(&self) -> NodeId {
        match self {
            CanonError::BrokenInvariant { node, .. } => *node,
        }
    }
}
