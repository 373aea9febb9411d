//! Property-based tests for query normalization.
//!
//! These tests generate the nested trees a desugarer emits for multi-clause
//! comprehensions and verify:
//! 1. Flattening: the result equals the hand-written flat query
//! 2. Reference safety: no transparent identifier survives
//! 3. Idempotence: normalizing twice changes nothing the second time

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]
#![allow(
    clippy::doc_markdown,
    clippy::uninlined_format_args,
    reason = "Proptest macros generate code with these patterns"
)]

use proptest::prelude::*;
use proptest::sample::Index;
use quarry_canon::{normalize, NormalizeStats, TRANSPARENT_MARKER};
use quarry_ir::{render, walk, NodeId, NodeKind, QueryArena, StringInterner, TreeBuilder};

// -- Tree Generation Strategies --

/// One clause after the first `from` of a comprehension.
#[derive(Clone, Debug)]
enum Step {
    /// `from v in s`, optionally `s.Cast<T>()`.
    From { shape_a: bool, cast: bool },
    /// `let v = w.Length` for an earlier range variable `w`.
    Let { shape_a: bool, of: Index },
}

fn step_strategy() -> impl Strategy<Value = Step> {
    prop_oneof![
        (any::<bool>(), any::<bool>()).prop_map(|(shape_a, cast)| Step::From { shape_a, cast }),
        (any::<bool>(), any::<Index>()).prop_map(|(shape_a, of)| Step::Let { shape_a, of }),
    ]
}

fn steps_strategy() -> impl Strategy<Value = Vec<Step>> {
    prop::collection::vec(step_strategy(), 0..10)
}

// -- Test Helpers --

fn transparent(i: usize) -> String {
    format!("<>{TRANSPARENT_MARKER}{i}")
}

fn var(i: usize) -> String {
    format!("v{i}")
}

/// `s{i}`, or `s{i}.Cast<T>()`.
fn source(b: &mut TreeBuilder<'_>, i: usize, cast: bool) -> NodeId {
    let source = b.ident(&format!("s{i}"));
    if cast {
        let ty = b.ty("T", vec![]);
        b.method_call(source, "Cast", vec![ty], vec![])
    } else {
        source
    }
}

fn access(b: &mut TreeBuilder<'_>, path: &[String]) -> NodeId {
    let members: Vec<&str> = path[1..].iter().map(String::as_str).collect();
    b.path(&path[0], &members)
}

/// The desugared form: every clause after the first wraps the query so far
/// in a nested query whose record carries the visible range variables.
fn synthesize(b: &mut TreeBuilder<'_>, first_cast: bool, steps: &[Step]) -> NodeId {
    let mut current = var(0);
    let mut current_source = source(b, 0, first_cast);
    // Access path of every range variable from the current scope.
    let mut paths = vec![vec![var(0)]];

    for (i, step) in steps.iter().enumerate() {
        let v = var(i + 1);
        let from_current = b.from(&current, current_source);
        let mut clauses = vec![from_current];

        let (shape_a, second) = match step {
            Step::From { shape_a, cast } => {
                let src = source(b, i + 1, *cast);
                clauses.push(b.from(&v, src));
                let reference = b.ident(&v);
                let second = if *shape_a {
                    b.named(&v, reference)
                } else {
                    reference
                };
                (*shape_a, second)
            }
            Step::Let { shape_a, of } => {
                let target = access(b, &paths[of.index(paths.len())]);
                let length = b.member(target, "Length");
                (*shape_a, b.named(&v, length))
            }
        };
        let reference = b.ident(&current);
        let first = if shape_a {
            b.named(&current, reference)
        } else {
            reference
        };
        let record = b.record(vec![first, second]);
        clauses.push(b.select(record));
        current_source = b.query(clauses);

        let ti = transparent(i);
        for path in &mut paths {
            path.insert(0, ti.clone());
        }
        paths.push(vec![ti.clone(), v]);
        current = ti;
    }

    let from = b.from(&current, current_source);
    let initializers = paths
        .iter()
        .enumerate()
        .map(|(j, path)| {
            let value = access(b, path);
            b.named(&format!("r{j}"), value)
        })
        .collect();
    let record = b.record(initializers);
    let select = b.select(record);
    b.query(vec![from, select])
}

/// The same comprehension written flat.
fn flatten(b: &mut TreeBuilder<'_>, first_cast: bool, steps: &[Step]) -> NodeId {
    let s0 = b.ident("s0");
    let first = if first_cast {
        let ty = b.ty("T", vec![]);
        b.typed_from(ty, &var(0), s0)
    } else {
        b.from(&var(0), s0)
    };
    let mut clauses = vec![first];
    for (i, step) in steps.iter().enumerate() {
        let clause = match step {
            // Only the first clause of a query has its cast folded.
            Step::From { cast, .. } => {
                let src = source(b, i + 1, *cast);
                b.from(&var(i + 1), src)
            }
            Step::Let { of, .. } => {
                let target = b.ident(&var(of.index(i + 1)));
                let length = b.member(target, "Length");
                b.let_(&var(i + 1), length)
            }
        };
        clauses.push(clause);
    }
    let initializers = (0..=steps.len())
        .map(|j| {
            let value = b.ident(&var(j));
            b.named(&format!("r{j}"), value)
        })
        .collect();
    let record = b.record(initializers);
    clauses.push(b.select(record));
    b.query(clauses)
}

fn expected(interner: &StringInterner, first_cast: bool, steps: &[Step]) -> String {
    let mut arena = QueryArena::new();
    let root = flatten(&mut TreeBuilder::new(&mut arena, interner), first_cast, steps);
    render(&arena, interner, root)
}

fn transparent_names_reachable(arena: &QueryArena, interner: &StringInterner, root: NodeId) -> bool {
    walk::preorder(arena, root).into_iter().any(|id| match arena.kind(id) {
        NodeKind::Ident { name, .. } => interner.lookup(*name).contains(TRANSPARENT_MARKER),
        NodeKind::From { ident, .. } => interner.lookup(*ident).contains(TRANSPARENT_MARKER),
        _ => false,
    })
}

// -- Property Tests --

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        max_shrink_iters: 1000,
        ..ProptestConfig::default()
    })]

    /// Desugared comprehensions normalize to their flat form.
    #[test]
    fn prop_desugared_query_flattens(first_cast in any::<bool>(), steps in steps_strategy()) {
        let interner = StringInterner::new();
        let mut arena = QueryArena::new();
        let root = synthesize(&mut TreeBuilder::new(&mut arena, &interner), first_cast, &steps);

        let stats = normalize(&mut arena, &interner, root).expect("desugared tree normalizes");

        prop_assert_eq!(render(&arena, &interner, root), expected(&interner, first_cast, &steps));
        prop_assert_eq!(stats.eliminated, steps.len());
        prop_assert_eq!(stats.continuations, 0);
        prop_assert_eq!(stats.casts_folded, usize::from(first_cast));
        prop_assert_eq!(arena.clauses(root).len(), steps.len() + 2);
        prop_assert!(!transparent_names_reachable(&arena, &interner, root));
    }

    /// A normalized tree is a fixed point.
    #[test]
    fn prop_normalization_idempotent(first_cast in any::<bool>(), steps in steps_strategy()) {
        let interner = StringInterner::new();
        let mut arena = QueryArena::new();
        let root = synthesize(&mut TreeBuilder::new(&mut arena, &interner), first_cast, &steps);

        normalize(&mut arena, &interner, root).expect("first run");
        let once = render(&arena, &interner, root);
        let second = normalize(&mut arena, &interner, root).expect("second run");

        prop_assert_eq!(second, NormalizeStats::default());
        prop_assert_eq!(render(&arena, &interner, root), once);
    }

    /// Queries bound to user identifiers become a chain of continuations.
    #[test]
    fn prop_user_bindings_become_continuations(depth in 1usize..12) {
        let interner = StringInterner::new();
        let mut arena = QueryArena::new();
        let root = {
            let mut b = TreeBuilder::new(&mut arena, &interner);
            let xs = b.ident("xs");
            let from = b.from("x", xs);
            let x = b.ident("x");
            let select = b.select(x);
            let mut query = b.query(vec![from, select]);
            for i in 0..depth {
                let g = format!("g{i}");
                let from = b.from(&g, query);
                let reference = b.ident(&g);
                let select = b.select(reference);
                query = b.query(vec![from, select]);
            }
            query
        };

        let stats = normalize(&mut arena, &interner, root).expect("continuations normalize");

        let mut expected = "from x in xs select x".to_string();
        for i in 0..depth {
            expected.push_str(&format!(" into g{i} select g{i}"));
        }
        prop_assert_eq!(render(&arena, &interner, root), expected);
        prop_assert_eq!(stats.continuations, depth);
        prop_assert_eq!(stats.eliminated, 0);
    }
}
