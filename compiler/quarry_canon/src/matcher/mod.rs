//! Structural pattern matching over query trees.
//!
//! A [`Pattern`] describes the shape of a subtree; [`Matcher::matches`]
//! tests a node against it and returns the nodes recorded by capture
//! patterns. Rewrites describe the shapes they handle as pattern values
//! instead of inspecting node kinds by hand.
//!
//! ```text
//! // e.Cast<T>()
//! Call {
//!     target: Member { target: Any("base"), member: Exact("Cast"), type_args: [Any("ty")] },
//!     args: [],
//! }
//! ```
//!
//! # Semantics
//!
//! - Child lists match element-wise and by exact length; `[]` matches only
//!   an empty list.
//! - `Choice` tries alternatives in order and commits to the first one that
//!   matches. Captures made by an alternative that failed are discarded, so
//!   the same capture name may appear in several alternatives.
//! - Matching borrows the arena immutably and never changes the tree.

use quarry_ir::stack::ensure_sufficient_stack;
use quarry_ir::{Name, NodeId, NodeKind, QueryArena, StringInterner};
use smallvec::SmallVec;

/// Pattern over a node name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NamePattern {
    /// Any name.
    Any,
    /// Exactly this name.
    Exact(String),
}

/// Pattern over a node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Pattern {
    /// Matches any single node, recording it under the name if one is given.
    Any(Option<&'static str>),
    /// Matches when the inner pattern does, recording the node under the name.
    Capture(&'static str, Box<Pattern>),
    /// Ordered alternation; first matching alternative wins.
    Choice(Vec<Pattern>),
    /// An identifier without type arguments.
    Ident { name: NamePattern },
    Member {
        target: Box<Pattern>,
        member: NamePattern,
        type_args: Vec<Pattern>,
    },
    Call {
        target: Box<Pattern>,
        args: Vec<Pattern>,
    },
    Record { initializers: Vec<Pattern> },
    Named {
        name: NamePattern,
        value: Box<Pattern>,
    },
    Select { projection: Box<Pattern> },
    /// A type reference `Name<Args...>`.
    Type { name: NamePattern, args: Vec<Pattern> },
}

impl Pattern {
    /// Wildcard that records the node under `name`.
    pub fn any(name: &'static str) -> Self {
        Pattern::Any(Some(name))
    }

    /// Record the node matched by this pattern under `name`.
    #[must_use]
    pub fn captured(self, name: &'static str) -> Self {
        Pattern::Capture(name, Box::new(self))
    }
}

/// Captures of a successful match, in the order they were recorded.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Match {
    captures: SmallVec<[(&'static str, NodeId); 4]>,
}

impl Match {
    /// Every node recorded under `name`.
    pub fn get<'m>(&'m self, name: &'m str) -> impl Iterator<Item = NodeId> + 'm {
        self.captures
            .iter()
            .filter(move |(n, _)| *n == name)
            .map(|&(_, id)| id)
    }

    /// The first node recorded under `name`, if any.
    pub fn single(&self, name: &str) -> Option<NodeId> {
        self.get(name).next()
    }

    fn record(&mut self, name: &'static str, id: NodeId) {
        self.captures.push((name, id));
    }

    fn mark(&self) -> usize {
        self.captures.len()
    }

    fn rewind(&mut self, mark: usize) {
        self.captures.truncate(mark);
    }
}

/// Matches patterns against nodes of one arena.
#[derive(Clone, Copy)]
pub struct Matcher<'a> {
    arena: &'a QueryArena,
    interner: &'a StringInterner,
}

impl<'a> Matcher<'a> {
    pub fn new(arena: &'a QueryArena, interner: &'a StringInterner) -> Self {
        Self { arena, interner }
    }

    /// Test `node` against `pattern`.
    ///
    /// Returns the captures on success and `None` on failure.
    pub fn matches(&self, pattern: &Pattern, node: NodeId) -> Option<Match> {
        let mut m = Match::default();
        self.match_node(pattern, node, &mut m).then_some(m)
    }

    fn match_node(&self, pattern: &Pattern, node: NodeId, m: &mut Match) -> bool {
        ensure_sufficient_stack(|| self.match_kind(pattern, node, m))
    }

    fn match_kind(&self, pattern: &Pattern, node: NodeId, m: &mut Match) -> bool {
        match (pattern, self.arena.kind(node)) {
            (Pattern::Any(capture), _) => {
                if let Some(name) = *capture {
                    m.record(name, node);
                }
                true
            }
            (Pattern::Capture(name, inner), _) => {
                let mark = m.mark();
                if self.match_node(inner, node, m) {
                    m.record(*name, node);
                    true
                } else {
                    m.rewind(mark);
                    false
                }
            }
            (Pattern::Choice(alternatives), _) => alternatives.iter().any(|alt| {
                let mark = m.mark();
                let matched = self.match_node(alt, node, m);
                if !matched {
                    m.rewind(mark);
                }
                matched
            }),
            (Pattern::Ident { name: p }, NodeKind::Ident { name, type_args }) => {
                type_args.is_empty() && self.match_name(p, *name)
            }
            (
                Pattern::Member {
                    target: p_target,
                    member: p_member,
                    type_args: p_args,
                },
                NodeKind::Member {
                    target,
                    member,
                    type_args,
                },
            ) => {
                self.match_name(p_member, *member)
                    && self.match_node(p_target, *target, m)
                    && self.match_list(p_args, type_args, m)
            }
            (
                Pattern::Call {
                    target: p_target,
                    args: p_args,
                },
                NodeKind::Call { target, args },
            ) => self.match_node(p_target, *target, m) && self.match_list(p_args, args, m),
            (
                Pattern::Record {
                    initializers: p_inits,
                },
                NodeKind::Record { initializers },
            ) => self.match_list(p_inits, initializers, m),
            (
                Pattern::Named {
                    name: p_name,
                    value: p_value,
                },
                NodeKind::Named { name, value },
            ) => self.match_name(p_name, *name) && self.match_node(p_value, *value, m),
            (Pattern::Select { projection: p }, NodeKind::Select { projection }) => {
                self.match_node(p, *projection, m)
            }
            (
                Pattern::Type {
                    name: p_name,
                    args: p_args,
                },
                NodeKind::Type { name, args },
            ) => self.match_name(p_name, *name) && self.match_list(p_args, args, m),
            _ => false,
        }
    }

    fn match_list(&self, patterns: &[Pattern], nodes: &[NodeId], m: &mut Match) -> bool {
        patterns.len() == nodes.len()
            && patterns
                .iter()
                .zip(nodes)
                .all(|(pattern, &node)| self.match_node(pattern, node, m))
    }

    fn match_name(&self, pattern: &NamePattern, name: Name) -> bool {
        match pattern {
            NamePattern::Any => true,
            NamePattern::Exact(expected) => self.interner.lookup(name) == expected.as_str(),
        }
    }
}
