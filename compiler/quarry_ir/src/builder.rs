//! Tree construction helpers.
//!
//! Used by producers (the desugarer) to emit query trees and by tests to
//! write them down compactly. All nodes are allocated with the builder's
//! current span; set it with [`TreeBuilder::at`].

use crate::{BinaryOp, Direction, Literal, Name, NodeId, NodeKind, QueryArena, Span, StringInterner};

/// Allocates nodes into a [`QueryArena`], interning names on the way.
pub struct TreeBuilder<'a> {
    arena: &'a mut QueryArena,
    interner: &'a StringInterner,
    span: Span,
}

impl<'a> TreeBuilder<'a> {
    pub fn new(arena: &'a mut QueryArena, interner: &'a StringInterner) -> Self {
        Self {
            arena,
            interner,
            span: Span::DUMMY,
        }
    }

    /// Use `span` for every node allocated from now on.
    pub fn at(&mut self, span: Span) -> &mut Self {
        self.span = span;
        self
    }

    /// Intern a name.
    pub fn name(&self, s: &str) -> Name {
        self.interner.intern(s)
    }

    /// Allocate a raw node kind.
    pub fn node(&mut self, kind: NodeKind) -> NodeId {
        self.arena.alloc(kind, self.span)
    }

    // Comprehensions and clauses

    pub fn query(&mut self, clauses: Vec<NodeId>) -> NodeId {
        debug_assert!(
            clauses.iter().all(|&c| self.arena.kind(c).is_clause()),
            "query built from a non-clause node"
        );
        self.node(NodeKind::Query { clauses })
    }

    pub fn from(&mut self, ident: &str, source: NodeId) -> NodeId {
        let ident = self.name(ident);
        self.node(NodeKind::From {
            ident,
            elem_ty: None,
            source,
        })
    }

    /// `from ty ident in source`
    pub fn typed_from(&mut self, ty: NodeId, ident: &str, source: NodeId) -> NodeId {
        let ident = self.name(ident);
        self.node(NodeKind::From {
            ident,
            elem_ty: Some(ty),
            source,
        })
    }

    pub fn let_(&mut self, ident: &str, value: NodeId) -> NodeId {
        let ident = self.name(ident);
        self.node(NodeKind::Let { ident, value })
    }

    pub fn where_(&mut self, cond: NodeId) -> NodeId {
        self.node(NodeKind::Where { cond })
    }

    /// `orderby k1 [descending], ...`
    pub fn order_by(&mut self, keys: Vec<(NodeId, Direction)>) -> NodeId {
        let orderings = keys
            .into_iter()
            .map(|(key, direction)| self.node(NodeKind::Ordering { key, direction }))
            .collect();
        self.node(NodeKind::OrderBy { orderings })
    }

    pub fn group_by(&mut self, projection: NodeId, key: NodeId) -> NodeId {
        self.node(NodeKind::GroupBy { projection, key })
    }

    pub fn select(&mut self, projection: NodeId) -> NodeId {
        self.node(NodeKind::Select { projection })
    }

    pub fn continuation(&mut self, preceding: NodeId, ident: &str) -> NodeId {
        let ident = self.name(ident);
        self.node(NodeKind::Continuation { preceding, ident })
    }

    // Expressions

    pub fn ident(&mut self, name: &str) -> NodeId {
        self.ident_with(name, Vec::new())
    }

    pub fn ident_with(&mut self, name: &str, type_args: Vec<NodeId>) -> NodeId {
        let name = self.name(name);
        self.node(NodeKind::Ident { name, type_args })
    }

    pub fn member(&mut self, target: NodeId, member: &str) -> NodeId {
        self.member_with(target, member, Vec::new())
    }

    pub fn member_with(&mut self, target: NodeId, member: &str, type_args: Vec<NodeId>) -> NodeId {
        let member = self.name(member);
        self.node(NodeKind::Member {
            target,
            member,
            type_args,
        })
    }

    /// Chain of member accesses: `path(root, ["a", "b"])` is `root.a.b`.
    pub fn path(&mut self, root: &str, members: &[&str]) -> NodeId {
        let mut id = self.ident(root);
        for member in members {
            id = self.member(id, member);
        }
        id
    }

    pub fn call(&mut self, target: NodeId, args: Vec<NodeId>) -> NodeId {
        self.node(NodeKind::Call { target, args })
    }

    /// `target.method<type_args>(args)`
    pub fn method_call(
        &mut self,
        target: NodeId,
        method: &str,
        type_args: Vec<NodeId>,
        args: Vec<NodeId>,
    ) -> NodeId {
        let callee = self.member_with(target, method, type_args);
        self.call(callee, args)
    }

    pub fn record(&mut self, initializers: Vec<NodeId>) -> NodeId {
        self.node(NodeKind::Record { initializers })
    }

    pub fn named(&mut self, name: &str, value: NodeId) -> NodeId {
        let name = self.name(name);
        self.node(NodeKind::Named { name, value })
    }

    pub fn int(&mut self, value: i64) -> NodeId {
        self.node(NodeKind::Literal(Literal::Int(value)))
    }

    pub fn string(&mut self, value: &str) -> NodeId {
        let value = self.name(value);
        self.node(NodeKind::Literal(Literal::Str(value)))
    }

    pub fn bool(&mut self, value: bool) -> NodeId {
        self.node(NodeKind::Literal(Literal::Bool(value)))
    }

    pub fn null(&mut self) -> NodeId {
        self.node(NodeKind::Literal(Literal::Null))
    }

    pub fn binary(&mut self, op: BinaryOp, left: NodeId, right: NodeId) -> NodeId {
        self.node(NodeKind::Binary { op, left, right })
    }

    // Types

    pub fn ty(&mut self, name: &str, args: Vec<NodeId>) -> NodeId {
        let name = self.name(name);
        self.node(NodeKind::Type { name, args })
    }
}
