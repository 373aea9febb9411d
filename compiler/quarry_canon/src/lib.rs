//! Query comprehension normalization for the Quarry compiler.
//!
//! This crate rewrites the desugared comprehension tree into a flat,
//! canonical clause chain before lowering. It removes the compiler-generated
//! range variables ("transparent identifiers") and anonymous records that
//! desugaring introduces for nested queries, and folds `Cast<T>()` sources
//! into typed `from` clauses.
//!
//! # Pipeline Position
//!
//! ```text
//! Parse → Desugar → **Normalize** → Lower
//! ```
//!
//! # What Happens During Normalization
//!
//! 1. **Transparent identifier elimination**: a nested query bound to a
//!    transparent identifier is spliced into its parent, with a `let` clause
//!    for a computed record member
//! 2. **Reference cleanup**: `transparent.member` accesses become `member`
//! 3. **Continuation folding**: a nested query that cannot be flattened
//!    becomes `<query> into ident`
//! 4. **Cast folding**: `from x in e.Cast<T>()` becomes `from T x in e`
//!
//! The tree is mutated in place in one bottom-up traversal.
//!
//! # Example
//!
//! ```text
//! let stats = quarry_canon::normalize(&mut arena, &interner, root)?;
//! ```

mod config;
mod error;
pub mod matcher;
mod normalize;
mod synthetic;

pub use config::{CanonConfig, CAST_METHOD, TRANSPARENT_MARKER};
pub use error::{CanonError, InvariantViolation};
pub use normalize::{NormalizeStats, Normalizer};
pub use synthetic::{MarkerSubstring, SyntheticNames};

use quarry_ir::{NodeId, QueryArena, StringInterner};

/// Normalize every query reachable from `root` with the default config.
pub fn normalize(
    arena: &mut QueryArena,
    interner: &StringInterner,
    root: NodeId,
) -> Result<NormalizeStats, CanonError> {
    normalize_with(arena, interner, root, &CanonConfig::default())
}

/// Normalize every query reachable from `root`.
pub fn normalize_with(
    arena: &mut QueryArena,
    interner: &StringInterner,
    root: NodeId,
    config: &CanonConfig,
) -> Result<NormalizeStats, CanonError> {
    Normalizer::new(arena, interner, config).run(root)
}
