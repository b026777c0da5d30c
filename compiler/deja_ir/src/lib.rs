//! Deja IR - shared data structures for the Deja Vu evaluator.
//!
//! This crate contains:
//! - Spans for source locations
//! - `Ident` and the weak `IdentTable` registry
//! - The syntax tree (`Node`, `NodeKind`, `Word`) consumed by the evaluator
//!
//! # Design Philosophy
//!
//! - **Identity over text**: identifiers compare by pointer, never by string.
//! - **Shared tree, weak parents**: nodes own their children and point back
//!   to their parent weakly, so the evaluator can walk up and down freely.

pub mod ast;
mod ident;
mod span;

pub use ast::{Node, NodeKind, Word};
pub use ident::{Ident, IdentTable};
pub use span::{Span, SpanError};
