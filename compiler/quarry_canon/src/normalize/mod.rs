//! Query normalization.
//!
//! One bottom-up traversal over the tree. Every query is examined after its
//! children, so nested queries are already flat when their parent looks at
//! them and a single call handles any nesting depth.
//!
//! For each query, the first clause decides what happens:
//!
//! ```text
//! from <>h__TransparentIdentifier0 in (from x in xs from y in ys select new { x, y }) ...
//!   => from x in xs from y in ys ...                        (elimination, then cleanup)
//! from g in (from x in xs select x.Kind) ...
//!   => from x in xs select x.Kind into g ...                (continuation fold)
//! from x in xs.Cast<int>() ...
//!   => from int x in xs ...                                 (cast fold)
//! ```
//!
//! Shapes that do not match are left alone. The only error is a
//! synthesized record whose initializer name cannot be determined.

mod cast_fold;
mod cleanup;
mod transparent;

use quarry_ir::stack::ensure_sufficient_stack;
use quarry_ir::{walk, Name, NodeId, NodeKind, QueryArena, StringInterner};
use tracing::{debug, trace};

use crate::config::CanonConfig;
use crate::error::CanonError;
use crate::matcher::{Matcher, Pattern};
use crate::synthetic::{MarkerSubstring, SyntheticNames};

/// What a normalization run changed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NormalizeStats {
    /// Nested queries flattened into their parent.
    pub eliminated: usize,
    /// `let` clauses introduced by elimination.
    pub lets_introduced: usize,
    /// Transparent member accesses rewritten to plain identifiers.
    pub references_rewritten: usize,
    /// Nested queries turned into continuations.
    pub continuations: usize,
    /// `Cast<T>()` sources folded into typed `from` clauses.
    pub casts_folded: usize,
}

impl NormalizeStats {
    /// Whether the run changed anything.
    pub fn changed(&self) -> bool {
        *self != NormalizeStats::default()
    }
}

/// Normalization state for one tree.
pub struct Normalizer<'a, S = MarkerSubstring> {
    arena: &'a mut QueryArena,
    interner: &'a StringInterner,
    config: &'a CanonConfig,
    names: S,
    /// Final `select` of a nested query bound to a transparent identifier.
    select_shape: Pattern,
    /// `e.Cast<T>()`
    cast_shape: Pattern,
    stats: NormalizeStats,
}

impl<'a> Normalizer<'a> {
    /// Create a normalizer recognizing transparent identifiers by the
    /// configured marker substring.
    pub fn new(
        arena: &'a mut QueryArena,
        interner: &'a StringInterner,
        config: &'a CanonConfig,
    ) -> Self {
        let names = MarkerSubstring::new(config.transparent_marker.as_str());
        Normalizer::with_names(arena, interner, config, names)
    }
}

impl<'a, S: SyntheticNames> Normalizer<'a, S> {
    /// Create a normalizer with a custom transparent-identifier predicate.
    pub fn with_names(
        arena: &'a mut QueryArena,
        interner: &'a StringInterner,
        config: &'a CanonConfig,
        names: S,
    ) -> Self {
        Self {
            arena,
            interner,
            config,
            names,
            select_shape: transparent::select_shape(),
            cast_shape: cast_fold::cast_shape(&config.cast_method),
            stats: NormalizeStats::default(),
        }
    }

    /// Normalize every query reachable from `root`, in place.
    #[tracing::instrument(level = "debug", skip_all, fields(root = root.raw()))]
    pub fn run(mut self, root: NodeId) -> Result<NormalizeStats, CanonError> {
        self.visit(root)?;
        debug!(stats = ?self.stats, "normalization complete");
        Ok(self.stats)
    }

    fn visit(&mut self, node: NodeId) -> Result<(), CanonError> {
        ensure_sufficient_stack(|| {
            for child in walk::children(self.arena, node) {
                self.visit(child)?;
            }
            if self.arena.kind(node).is_query() {
                self.normalize_query(node)?;
            }
            Ok(())
        })
    }

    fn normalize_query(&mut self, query: NodeId) -> Result<(), CanonError> {
        let Some(&first) = self.arena.clauses(query).first() else {
            return Ok(());
        };
        let NodeKind::From { ident, source, .. } = *self.arena.kind(first) else {
            trace!(?query, "first clause is not a from clause");
            return Ok(());
        };

        if self.arena.kind(source).is_query() {
            if self.config.eliminate_transparent
                && self.try_eliminate_transparent(query, ident, source)?
            {
                let rewritten = self.strip_transparent_references(query);
                self.stats.references_rewritten += rewritten;
                debug!(?query, rewritten, "eliminated transparent identifier");
            } else {
                self.fold_continuation(first, ident, source);
            }
        } else if self.config.fold_casts {
            self.fold_cast(first);
        }
        Ok(())
    }

    /// `from ident in (inner) ...` => `inner into ident ...`
    ///
    /// The clause keeps its id, so the outer clause list is unchanged.
    fn fold_continuation(&mut self, clause: NodeId, ident: Name, inner: NodeId) {
        self.arena.replace(
            clause,
            NodeKind::Continuation {
                preceding: inner,
                ident,
            },
        );
        self.stats.continuations += 1;
        debug!(?clause, ?inner, "folded nested query into continuation");
    }

    fn matcher(&self) -> Matcher<'_> {
        Matcher::new(self.arena, self.interner)
    }

    fn is_transparent(&self, name: Name) -> bool {
        self.names.is_transparent(self.interner.lookup(name))
    }
}
