//! Query comprehension node kinds.
//!
//! A comprehension (`Query`) is an ordered list of clauses. Expressions,
//! clauses and type references are all nodes in the same arena so that a
//! rewrite can move any of them by moving its `NodeId`.
//!
//! ```text
//! from x in xs            From { ident: x, elem_ty: None, source: Ident(xs) }
//! from int y in ys        From { ident: y, elem_ty: Some(Type(int)), source: Ident(ys) }
//! let z = x.Length        Let { ident: z, value: Member(Ident(x), Length) }
//! where z > 1             Where { cond: Binary(Gt, ..) }
//! orderby z descending    OrderBy { orderings: [Ordering { key, Descending }] }
//! select new { x, z }     Select { projection: Record([Ident(x), Ident(z)]) }
//! ```

use crate::{Name, NodeId};

/// Literal constant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum Literal {
    Int(i64),
    Str(Name),
    Bool(bool),
    Null,
}

/// Binary operator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    And,
    Or,
}

impl BinaryOp {
    /// Source symbol for the operator.
    pub const fn as_symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Eq => "==",
            BinaryOp::NotEq => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::LtEq => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::GtEq => ">=",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
        }
    }
}

/// Sort direction of an `orderby` key.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    #[default]
    Ascending,
    Descending,
}

/// Node kind.
///
/// Child references are `NodeId`s into the owning arena. Lists that rewrites
/// splice (clauses, record initializers, arguments, type arguments) are owned
/// `Vec`s so they can grow and shrink in place.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum NodeKind {
    // Comprehension
    /// Ordered clause list. The first clause of producer output is a `From`.
    Query { clauses: Vec<NodeId> },

    // Clauses
    /// `from [elem_ty] ident in source`
    From {
        ident: Name,
        /// Explicit element type; `None` means inferred.
        elem_ty: Option<NodeId>,
        source: NodeId,
    },
    /// `let ident = value`
    Let { ident: Name, value: NodeId },
    /// `where cond`
    Where { cond: NodeId },
    /// `orderby k1, k2 descending`; children are `Ordering` nodes.
    OrderBy { orderings: Vec<NodeId> },
    /// One key of an `orderby` clause.
    Ordering { key: NodeId, direction: Direction },
    /// `group projection by key`
    GroupBy { projection: NodeId, key: NodeId },
    /// `select projection`
    Select { projection: NodeId },
    /// `<preceding query> into ident`
    Continuation { preceding: NodeId, ident: Name },

    // Expressions
    /// `new { a, b = expr }`. Each initializer is either a `Named` node or a
    /// bare expression whose name is implied (shorthand form).
    Record { initializers: Vec<NodeId> },
    /// `name = value` inside a record.
    Named { name: Name, value: NodeId },
    /// `name` or `name<T>`
    Ident { name: Name, type_args: Vec<NodeId> },
    /// `target.member` or `target.member<T>`
    Member {
        target: NodeId,
        member: Name,
        type_args: Vec<NodeId>,
    },
    /// `target(args)`. A method call is a `Call` whose target is a `Member`.
    Call { target: NodeId, args: Vec<NodeId> },
    Literal(Literal),
    Binary {
        op: BinaryOp,
        left: NodeId,
        right: NodeId,
    },

    // Types
    /// `Name<Args...>`; arguments are `Type` nodes.
    Type { name: Name, args: Vec<NodeId> },
}

impl NodeKind {
    /// Short description of the node kind, for diagnostics and logs.
    pub const fn describe(&self) -> &'static str {
        match self {
            NodeKind::Query { .. } => "query",
            NodeKind::From { .. } => "from clause",
            NodeKind::Let { .. } => "let clause",
            NodeKind::Where { .. } => "where clause",
            NodeKind::OrderBy { .. } => "orderby clause",
            NodeKind::Ordering { .. } => "ordering",
            NodeKind::GroupBy { .. } => "group clause",
            NodeKind::Select { .. } => "select clause",
            NodeKind::Continuation { .. } => "continuation clause",
            NodeKind::Record { .. } => "anonymous record",
            NodeKind::Named { .. } => "named initializer",
            NodeKind::Ident { .. } => "identifier",
            NodeKind::Member { .. } => "member access",
            NodeKind::Call { .. } => "call",
            NodeKind::Literal(_) => "literal",
            NodeKind::Binary { .. } => "binary expression",
            NodeKind::Type { .. } => "type",
        }
    }

    #[inline]
    pub const fn is_query(&self) -> bool {
        matches!(self, NodeKind::Query { .. })
    }

    /// Whether this kind may appear in a query's clause list.
    pub const fn is_clause(&self) -> bool {
        matches!(
            self,
            NodeKind::From { .. }
                | NodeKind::Let { .. }
                | NodeKind::Where { .. }
                | NodeKind::OrderBy { .. }
                | NodeKind::GroupBy { .. }
                | NodeKind::Select { .. }
                | NodeKind::Continuation { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clause_kinds() {
        let id = NodeId::new(0);
        let name = Name::EMPTY;
        assert!(NodeKind::From {
            ident: name,
            elem_ty: None,
            source: id,
        }
        .is_clause());
        assert!(NodeKind::Continuation {
            preceding: id,
            ident: name,
        }
        .is_clause());
        assert!(NodeKind::OrderBy { orderings: vec![] }.is_clause());
        assert!(!NodeKind::Ordering {
            key: id,
            direction: Direction::Ascending,
        }
        .is_clause());
        assert!(!NodeKind::Query { clauses: vec![] }.is_clause());
        assert!(!NodeKind::Literal(Literal::Null).is_clause());
    }
}
