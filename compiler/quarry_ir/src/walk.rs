//! Child enumeration for query trees.
//!
//! Walkers return owned id lists so callers can mutate the arena while
//! iterating over a snapshot of a node's children.

use smallvec::SmallVec;

use crate::{NodeId, NodeKind, QueryArena};

/// Inline child list; most nodes have at most four children.
pub type Children = SmallVec<[NodeId; 4]>;

/// Direct children of a node, in source order.
pub fn children(arena: &QueryArena, id: NodeId) -> Children {
    let mut out = Children::new();
    match arena.kind(id) {
        NodeKind::Query { clauses } => out.extend_from_slice(clauses),
        NodeKind::From {
            elem_ty, source, ..
        } => {
            out.extend(elem_ty.iter().copied());
            out.push(*source);
        }
        NodeKind::Let { value, .. } => out.push(*value),
        NodeKind::Where { cond } => out.push(*cond),
        NodeKind::OrderBy { orderings } => out.extend_from_slice(orderings),
        NodeKind::Ordering { key, .. } => out.push(*key),
        NodeKind::GroupBy { projection, key } => {
            out.push(*projection);
            out.push(*key);
        }
        NodeKind::Select { projection } => out.push(*projection),
        NodeKind::Continuation { preceding, .. } => out.push(*preceding),
        NodeKind::Record { initializers } => out.extend_from_slice(initializers),
        NodeKind::Named { value, .. } => out.push(*value),
        NodeKind::Ident { type_args, .. } => out.extend_from_slice(type_args),
        NodeKind::Member {
            target, type_args, ..
        } => {
            out.push(*target);
            out.extend_from_slice(type_args);
        }
        NodeKind::Call { target, args } => {
            out.push(*target);
            out.extend_from_slice(args);
        }
        NodeKind::Binary { left, right, .. } => {
            out.push(*left);
            out.push(*right);
        }
        NodeKind::Type { args, .. } => out.extend_from_slice(args),
        NodeKind::Literal(_) => {}
    }
    out
}

/// Every node reachable from `root`, in pre-order (root first).
pub fn preorder(arena: &QueryArena, root: NodeId) -> Vec<NodeId> {
    let mut out = Vec::new();
    let mut stack = vec![root];
    while let Some(id) = stack.pop() {
        out.push(id);
        stack.extend(children(arena, id).into_iter().rev());
    }
    out
}
