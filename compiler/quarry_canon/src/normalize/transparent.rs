//! Transparent identifier elimination.
//!
//! The desugarer carries two visible bindings through a nested query by
//! selecting them into an anonymous record and binding the record to a
//! transparent identifier:
//!
//! ```text
//! from <>h__TransparentIdentifier0 in (from x in xs select new { x, y = x.Length }) ...
//! ```
//!
//! Two record shapes are recognized, tried in order:
//!
//! - Shape A: `new { x = x, y = expr }`, the first initializer re-exports a
//!   binding under its own name.
//! - Shape B: `new { x, y = expr }` or `new { x, expr }`, the first
//!   initializer is the shorthand form.
//!
//! On a match the nested query's clauses take the place of the outer `from`
//! clause. If the second initializer is another plain re-export nothing else
//! is needed; otherwise a `let` clause binds its value after the spliced
//! clauses.

use quarry_ir::{Name, NodeId, NodeKind};
use tracing::{debug, trace};

use super::Normalizer;
use crate::error::{CanonError, InvariantViolation};
use crate::matcher::{NamePattern, Pattern};
use crate::synthetic::SyntheticNames;

/// Shape A first initializer: `x = x`.
const REEXPORT: &str = "reexport";
/// Second initializer when written as `name = expr`.
const SECOND: &str = "second";
/// Expression of the second initializer.
const SECOND_EXPR: &str = "second_expr";

fn ident() -> Pattern {
    Pattern::Ident {
        name: NamePattern::Any,
    }
}

fn named(value: Pattern) -> Pattern {
    Pattern::Named {
        name: NamePattern::Any,
        value: Box::new(value),
    }
}

/// `select new { ... }` in either shape.
pub(super) fn select_shape() -> Pattern {
    let shape_a = Pattern::Record {
        initializers: vec![
            named(ident()).captured(REEXPORT),
            named(Pattern::any(SECOND_EXPR)).captured(SECOND),
        ],
    };
    let shape_b = Pattern::Record {
        initializers: vec![
            ident(),
            Pattern::Choice(vec![
                named(Pattern::any(SECOND_EXPR)).captured(SECOND),
                Pattern::any(SECOND_EXPR),
            ]),
        ],
    };
    Pattern::Select {
        projection: Box::new(Pattern::Choice(vec![shape_a, shape_b])),
    }
}

impl<S: SyntheticNames> Normalizer<'_, S> {
    /// Flatten `inner` into `query` if `query` binds it to a transparent
    /// identifier whose record has a recognized shape.
    ///
    /// Returns `Ok(false)` without touching the tree when it does not apply.
    pub(super) fn try_eliminate_transparent(
        &mut self,
        query: NodeId,
        ident: Name,
        inner: NodeId,
    ) -> Result<bool, CanonError> {
        if !self.is_transparent(ident) {
            trace!(?query, "nested query bound to a user identifier");
            return Ok(false);
        }
        let Some(&select) = self.arena.clauses(inner).last() else {
            return Ok(false);
        };
        let Some(m) = self.matcher().matches(&self.select_shape, select) else {
            trace!(?select, "transparent select does not have a recognized shape");
            return Ok(false);
        };

        if let Some(reexport) = m.single(REEXPORT) {
            if !self.is_plain_reexport(reexport) {
                trace!(?reexport, "first initializer renames its binding");
                return Ok(false);
            }
        }
        let Some(expr) = m.single(SECOND_EXPR) else {
            return Ok(false);
        };
        let declared = m.single(SECOND).and_then(|id| match self.arena.kind(id) {
            NodeKind::Named { name, .. } => Some(*name),
            _ => None,
        });

        // Decide before mutating so a broken record leaves the tree intact.
        let passthrough = match self.arena.kind(expr) {
            NodeKind::Ident { name, .. } => declared.is_none() || declared == Some(*name),
            _ => false,
        };
        let binding = if passthrough {
            None
        } else {
            Some(self.binding_name(declared, expr)?)
        };

        let mut spliced = self.arena.take_clauses(inner);
        spliced.pop();
        if let Some(name) = binding {
            let span = self.arena.span(expr);
            let let_clause = self.arena.alloc(
                NodeKind::Let {
                    ident: name,
                    value: expr,
                },
                span,
            );
            spliced.push(let_clause);
            self.stats.lets_introduced += 1;
        }
        let moved = spliced.len();
        if let Some(clauses) = self.arena.clauses_mut(query) {
            spliced.extend(clauses.iter().skip(1).copied());
            *clauses = spliced;
        }
        self.stats.eliminated += 1;
        debug!(?query, ?inner, moved, "spliced nested query clauses");
        Ok(true)
    }

    /// `x = x`: an initializer that re-exports a binding under its own name.
    fn is_plain_reexport(&self, initializer: NodeId) -> bool {
        let NodeKind::Named { name, value } = self.arena.kind(initializer) else {
            return false;
        };
        matches!(
            self.arena.kind(*value),
            NodeKind::Ident { name: referenced, .. } if referenced == name
        )
    }

    /// Name for the `let` clause binding a computed initializer.
    fn binding_name(&self, declared: Option<Name>, expr: NodeId) -> Result<Name, CanonError> {
        if let Some(name) = declared {
            return Ok(name);
        }
        match self.arena.kind(expr) {
            NodeKind::Ident { name, .. } => Ok(*name),
            NodeKind::Member { member, .. } => Ok(*member),
            other => Err(CanonError::broken_invariant(
                expr,
                self.arena.span(expr),
                InvariantViolation::UninferableInitializerName {
                    found: other.describe(),
                },
            )),
        }
    }
}
