//! Cast folding: `from x in e.Cast<T>()` => `from T x in e`.
//!
//! The element-type coercion becomes a type annotation on the range
//! variable. The call node is dropped from the tree.

use quarry_ir::{NodeId, NodeKind};
use tracing::{debug, trace};

use super::Normalizer;
use crate::matcher::{NamePattern, Pattern};
use crate::synthetic::SyntheticNames;

const BASE: &str = "base";
const ELEM_TY: &str = "elem_ty";

/// `base.<method><elem_ty>()`
pub(super) fn cast_shape(method: &str) -> Pattern {
    Pattern::Call {
        target: Box::new(Pattern::Member {
            target: Box::new(Pattern::any(BASE)),
            member: NamePattern::Exact(method.to_string()),
            type_args: vec![Pattern::any(ELEM_TY)],
        }),
        args: Vec::new(),
    }
}

impl<S: SyntheticNames> Normalizer<'_, S> {
    /// Fold the cast on `from`'s source, if any.
    ///
    /// A clause that already declares its element type is left alone, so
    /// `from x in xs.Cast<A>().Cast<B>()` stops at `from B x in xs.Cast<A>()`
    /// and a second run keeps it.
    pub(super) fn fold_cast(&mut self, from: NodeId) {
        let NodeKind::From {
            elem_ty: None,
            source,
            ..
        } = *self.arena.kind(from)
        else {
            trace!(?from, "from clause already has an element type");
            return;
        };
        let Some(m) = self.matcher().matches(&self.cast_shape, source) else {
            trace!(?from, ?source, "source is not a cast");
            return;
        };
        let (Some(base), Some(ty)) = (m.single(BASE), m.single(ELEM_TY)) else {
            return;
        };

        if let NodeKind::From {
            elem_ty,
            source: from_source,
            ..
        } = self.arena.kind_mut(from)
        {
            *elem_ty = Some(ty);
            *from_source = base;
        }
        self.stats.casts_folded += 1;
        debug!(?from, ?source, "folded cast into typed from clause");
    }
}
