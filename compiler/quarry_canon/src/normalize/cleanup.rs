//! Transparent reference cleanup.
//!
//! Once a transparent identifier's record is gone, accesses through it
//! (`<>h__TransparentIdentifier0.x`) become plain references (`x`). Children
//! are rewritten before their parent, so a chain through several transparent
//! identifiers collapses completely:
//!
//! ```text
//! <>h__TransparentIdentifier1.<>h__TransparentIdentifier0.x
//!   => <>h__TransparentIdentifier0.x
//!   => x
//! ```

use quarry_ir::stack::ensure_sufficient_stack;
use quarry_ir::{walk, NodeId, NodeKind};

use super::Normalizer;
use crate::synthetic::SyntheticNames;

impl<S: SyntheticNames> Normalizer<'_, S> {
    /// Rewrite every transparent member access under `node`. Returns the
    /// number of accesses rewritten.
    pub(super) fn strip_transparent_references(&mut self, node: NodeId) -> usize {
        ensure_sufficient_stack(|| {
            let mut rewritten = 0;
            for child in walk::children(self.arena, node) {
                rewritten += self.strip_transparent_references(child);
            }
            if self.targets_transparent(node) {
                // The replacement keeps the node's id, so the parent needs no
                // relinking. Its only children are the moved type arguments.
                let replacement = match self.arena.kind_mut(node) {
                    NodeKind::Member {
                        member, type_args, ..
                    } => NodeKind::Ident {
                        name: *member,
                        type_args: std::mem::take(type_args),
                    },
                    _ => return rewritten,
                };
                self.arena.replace(node, replacement);
                rewritten += 1;
            }
            rewritten
        })
    }

    /// `transparent.member`
    fn targets_transparent(&self, node: NodeId) -> bool {
        let NodeKind::Member { target, .. } = self.arena.kind(node) else {
            return false;
        };
        matches!(self.arena.kind(*target), NodeKind::Ident { name, .. } if self.is_transparent(*name))
    }
}
