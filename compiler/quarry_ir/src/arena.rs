//! Node arena for query trees.
//!
//! [`QueryArena`] uses struct-of-arrays layout (parallel `kinds` and `spans`
//! arrays indexed by [`NodeId`]). Nodes are never freed; a node detached by a
//! rewrite stays allocated but unreachable from the root.

use crate::{NodeId, NodeKind, Span};

/// Error when the arena exceeds the `u32` id space.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArenaError {
    Overflow { count: usize },
}

impl std::fmt::Display for ArenaError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ArenaError::Overflow { count } => write!(
                f,
                "query arena exceeded capacity: {} nodes, max is {}",
                count,
                u32::MAX
            ),
        }
    }
}

impl std::error::Error for ArenaError {}

/// Arena for query tree nodes.
#[derive(Clone, Debug, Default)]
pub struct QueryArena {
    /// Node kinds (parallel with spans).
    kinds: Vec<NodeKind>,
    /// Source spans for error reporting (parallel with kinds).
    spans: Vec<Span>,
}

impl QueryArena {
    /// Create an empty arena.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a node, returning its ID or an error on overflow.
    pub fn try_alloc(&mut self, kind: NodeKind, span: Span) -> Result<NodeId, ArenaError> {
        let raw = u32::try_from(self.kinds.len()).map_err(|_| ArenaError::Overflow {
            count: self.kinds.len(),
        })?;
        self.kinds.push(kind);
        self.spans.push(span);
        Ok(NodeId::new(raw))
    }

    /// Allocate a node, returning its ID.
    ///
    /// # Panics
    /// Panics if the arena exceeds `u32::MAX` nodes.
    #[inline]
    pub fn alloc(&mut self, kind: NodeKind, span: Span) -> NodeId {
        self.try_alloc(kind, span).unwrap_or_else(|e| panic!("{}", e))
    }

    /// Get the kind of a node.
    #[inline]
    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.kinds[id.index()]
    }

    /// Get the kind of a node for in-place child relinking.
    #[inline]
    pub fn kind_mut(&mut self, id: NodeId) -> &mut NodeKind {
        &mut self.kinds[id.index()]
    }

    /// Get the source span of a node.
    #[inline]
    pub fn span(&self, id: NodeId) -> Span {
        self.spans[id.index()]
    }

    /// Overwrite a node's kind, keeping its id and span. Returns the old kind.
    ///
    /// Every parent that referenced `id` now sees the replacement.
    pub fn replace(&mut self, id: NodeId, kind: NodeKind) -> NodeKind {
        std::mem::replace(&mut self.kinds[id.index()], kind)
    }

    /// Clause list of a query node; empty for any other kind.
    pub fn clauses(&self, id: NodeId) -> &[NodeId] {
        match self.kind(id) {
            NodeKind::Query { clauses } => clauses,
            _ => &[],
        }
    }

    /// Mutable clause list of a query node.
    pub fn clauses_mut(&mut self, id: NodeId) -> Option<&mut Vec<NodeId>> {
        match self.kind_mut(id) {
            NodeKind::Query { clauses } => Some(clauses),
            _ => None,
        }
    }

    /// Detach and return every clause of a query node, leaving it empty.
    pub fn take_clauses(&mut self, id: NodeId) -> Vec<NodeId> {
        self.clauses_mut(id).map(std::mem::take).unwrap_or_default()
    }

    /// Number of allocated nodes, reachable or not.
    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    /// Returns `true` if no nodes have been allocated.
    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}

#[cfg(test)]
mod tests;
