//! Query-text rendering.
//!
//! Prints a tree back in comprehension syntax. The output is meant for
//! diagnostics, logs and test expectations, not for re-parsing: nested
//! queries and nested binary operands are always parenthesized.
//!
//! ```text
//! from x in xs let y = x.Length where y > 1 select new { x, y }
//! from int x in (from y in ys select y) select x
//! from x in xs select x into g select g
//! ```

use std::fmt::Write;

use crate::stack::ensure_sufficient_stack;
use crate::{Direction, Literal, NodeId, NodeKind, QueryArena, StringInterner};

/// Render the subtree rooted at `root`.
pub fn render(arena: &QueryArena, interner: &StringInterner, root: NodeId) -> String {
    let mut renderer = Renderer {
        arena,
        interner,
        out: String::new(),
    };
    renderer.node(root);
    renderer.out
}

struct Renderer<'a> {
    arena: &'a QueryArena,
    interner: &'a StringInterner,
    out: String,
}

impl Renderer<'_> {
    fn push(&mut self, s: &str) {
        self.out.push_str(s);
    }

    /// Render a node in expression position: queries get parentheses.
    fn expr(&mut self, id: NodeId) {
        let arena = self.arena;
        if arena.kind(id).is_query() {
            self.push("(");
            self.node(id);
            self.push(")");
        } else {
            self.node(id);
        }
    }

    /// Render a binary operand: nested binaries get parentheses.
    fn operand(&mut self, id: NodeId) {
        if matches!(self.arena.kind(id), NodeKind::Binary { .. }) {
            self.push("(");
            self.node(id);
            self.push(")");
        } else {
            self.expr(id);
        }
    }

    fn list(&mut self, ids: &[NodeId]) {
        for (i, &id) in ids.iter().enumerate() {
            if i > 0 {
                self.push(", ");
            }
            self.expr(id);
        }
    }

    fn type_args(&mut self, ids: &[NodeId]) {
        if !ids.is_empty() {
            self.push("<");
            self.list(ids);
            self.push(">");
        }
    }

    fn node(&mut self, id: NodeId) {
        ensure_sufficient_stack(|| self.node_kind(id));
    }

    fn node_kind(&mut self, id: NodeId) {
        let (arena, interner) = (self.arena, self.interner);
        match arena.kind(id) {
            NodeKind::Query { clauses } => {
                for (i, &clause) in clauses.iter().enumerate() {
                    if i > 0 {
                        self.push(" ");
                    }
                    self.node(clause);
                }
            }
            NodeKind::From {
                ident,
                elem_ty,
                source,
            } => {
                self.push("from ");
                if let Some(ty) = elem_ty {
                    self.node(*ty);
                    self.push(" ");
                }
                self.push(interner.lookup(*ident));
                self.push(" in ");
                self.expr(*source);
            }
            NodeKind::Let { ident, value } => {
                self.push("let ");
                self.push(interner.lookup(*ident));
                self.push(" = ");
                self.expr(*value);
            }
            NodeKind::Where { cond } => {
                self.push("where ");
                self.expr(*cond);
            }
            NodeKind::OrderBy { orderings } => {
                self.push("orderby ");
                self.list(orderings);
            }
            NodeKind::Ordering { key, direction } => {
                self.expr(*key);
                if *direction == Direction::Descending {
                    self.push(" descending");
                }
            }
            NodeKind::GroupBy { projection, key } => {
                self.push("group ");
                self.expr(*projection);
                self.push(" by ");
                self.expr(*key);
            }
            NodeKind::Select { projection } => {
                self.push("select ");
                self.expr(*projection);
            }
            NodeKind::Continuation { preceding, ident } => {
                self.node(*preceding);
                self.push(" into ");
                self.push(interner.lookup(*ident));
            }
            NodeKind::Record { initializers } => {
                if initializers.is_empty() {
                    self.push("new { }");
                } else {
                    self.push("new { ");
                    self.list(initializers);
                    self.push(" }");
                }
            }
            NodeKind::Named { name, value } => {
                self.push(interner.lookup(*name));
                self.push(" = ");
                self.expr(*value);
            }
            NodeKind::Ident { name, type_args } => {
                self.push(interner.lookup(*name));
                self.type_args(type_args);
            }
            NodeKind::Member {
                target,
                member,
                type_args,
            } => {
                self.operand(*target);
                self.push(".");
                self.push(interner.lookup(*member));
                self.type_args(type_args);
            }
            NodeKind::Call { target, args } => {
                self.operand(*target);
                self.push("(");
                self.list(args);
                self.push(")");
            }
            NodeKind::Literal(lit) => match lit {
                Literal::Int(v) => {
                    let _ = write!(self.out, "{v}");
                }
                Literal::Str(s) => {
                    let _ = write!(self.out, "{:?}", interner.lookup(*s));
                }
                Literal::Bool(b) => {
                    let _ = write!(self.out, "{b}");
                }
                Literal::Null => self.push("null"),
            },
            NodeKind::Binary { op, left, right } => {
                self.operand(*left);
                self.push(" ");
                self.push(op.as_symbol());
                self.push(" ");
                self.operand(*right);
            }
            NodeKind::Type { name, args } => {
                self.push(interner.lookup(*name));
                self.type_args(args);
            }
        }
    }
}
