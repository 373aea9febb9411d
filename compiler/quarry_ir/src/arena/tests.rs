use super::*;
use crate::{Literal, Name};

fn int(arena: &mut QueryArena, value: i64) -> NodeId {
    arena.alloc(NodeKind::Literal(Literal::Int(value)), Span::DUMMY)
}

#[test]
fn alloc_assigns_sequential_ids() {
    let mut arena = QueryArena::new();
    let a = int(&mut arena, 1);
    let b = int(&mut arena, 2);
    assert_eq!(a.index(), 0);
    assert_eq!(b.index(), 1);
    assert_eq!(arena.len(), 2);
    assert_eq!(*arena.kind(b), NodeKind::Literal(Literal::Int(2)));
}

#[test]
fn replace_keeps_identity_and_span() {
    let mut arena = QueryArena::new();
    let id = arena.alloc(NodeKind::Literal(Literal::Null), Span::new(3, 7));
    let old = arena.replace(id, NodeKind::Literal(Literal::Bool(true)));
    assert_eq!(old, NodeKind::Literal(Literal::Null));
    assert_eq!(*arena.kind(id), NodeKind::Literal(Literal::Bool(true)));
    assert_eq!(arena.span(id), Span::new(3, 7));
}

#[test]
fn clauses_of_non_query_is_empty() {
    let mut arena = QueryArena::new();
    let lit = int(&mut arena, 5);
    assert!(arena.clauses(lit).is_empty());
    assert!(arena.clauses_mut(lit).is_none());
    assert!(arena.take_clauses(lit).is_empty());
}

#[test]
fn take_clauses_detaches_list() {
    let mut arena = QueryArena::new();
    let source = int(&mut arena, 0);
    let from = arena.alloc(
        NodeKind::From {
            ident: Name::EMPTY,
            elem_ty: None,
            source,
        },
        Span::DUMMY,
    );
    let query = arena.alloc(
        NodeKind::Query {
            clauses: vec![from],
        },
        Span::DUMMY,
    );

    assert_eq!(arena.clauses(query), &[from]);
    assert_eq!(arena.take_clauses(query), vec![from]);
    assert!(arena.clauses(query).is_empty());
}
