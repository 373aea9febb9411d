//! Quarry IR - query comprehension tree model
//!
//! This crate contains the data structures shared by the Quarry query
//! compiler stages:
//! - Spans for source locations
//! - Names for interned identifiers
//! - The node arena holding comprehension trees (`QueryArena`, `NodeId`)
//! - Node kinds for clauses, expressions and type references
//! - A builder for producers, a child walker, and a text renderer
//!
//! # Design Philosophy
//!
//! - **Intern Everything**: identifier strings become `Name(u32)`
//! - **Flatten Everything**: no `Box<Node>`, children are `NodeId(u32)` indices
//! - **Stable Identity**: rewrites overwrite a node's kind in its slot, so a
//!   parent's reference to the node stays valid across a replacement

mod arena;
pub mod ast;
mod builder;
mod interner;
mod name;
mod node_id;
pub mod render;
mod span;
pub mod stack;
pub mod walk;

pub use arena::{ArenaError, QueryArena};
pub use ast::{BinaryOp, Direction, Literal, NodeKind};
pub use builder::TreeBuilder;
pub use interner::{InternError, StringInterner};
pub use name::Name;
pub use node_id::NodeId;
pub use render::render;
pub use span::Span;
