//! Syntax tree consumed by the evaluator.
//!
//! Nodes are reference-counted and immutable once built. Each node owns its
//! children and keeps a weak back-reference to its parent together with its
//! index in the parent's child list, which makes "next sibling" and
//! "nearest ancestor" queries cheap for the evaluator's tree walk.
//!
//! # Shape
//!
//! ```text
//! File
//! ├── Line            (words evaluated left to right)
//! ├── Func { name, params } ── Body
//! ├── IfChain ── If ── Condition, Body
//! │           ├── ElseIf ── Condition, Body
//! │           └── Else ── Body
//! ├── While ── Condition, Body
//! ├── For { counter } ── Condition, Body
//! └── Catch ── Body, Handler
//! ```

use crate::Span;
use std::cell::{Cell, OnceCell};
use std::fmt;
use std::rc::{Rc, Weak};

/// A single word of a line or condition.
#[derive(Clone, Debug, PartialEq)]
pub enum Word {
    /// Numeric literal.
    Number(f64),
    /// Text literal (escapes already processed).
    Text(Rc<str>),
    /// Bare identifier (`:name`), evaluates to the interned identifier.
    Ident(Rc<str>),
    /// Any other name, resolved through the scope chain.
    Name(Rc<str>),
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Word::Number(n) => write!(f, "{n}"),
            Word::Text(s) => write!(f, "{s:?}"),
            Word::Ident(s) => write!(f, ":{s}"),
            Word::Name(s) => write!(f, "{s}"),
        }
    }
}

/// Node kind with kind-specific fields.
#[derive(Clone, Debug, PartialEq)]
pub enum NodeKind {
    /// Program root.
    File,
    /// A statement made of words.
    Line,
    /// Leaf word.
    Word(Word),
    /// `func name params...:` (one `Body` child).
    Func { name: Rc<str>, params: Vec<Rc<str>> },
    /// `local name params...:` (one `Body` child).
    LocalFunc { name: Rc<str>, params: Vec<Rc<str>> },
    /// `labda params...:` (one `Body` child).
    Labda { params: Vec<Rc<str>> },
    /// Groups an `If` with its `ElseIf`/`Else` alternatives.
    IfChain,
    If,
    ElseIf,
    Else,
    While,
    /// `for counter words...:` (`Condition`, `Body`).
    For { counter: Rc<str> },
    /// `try:` / `catch:` (`Body`, `Handler`).
    Catch,
    Condition,
    Body,
    Handler,
}

impl NodeKind {
    /// Short label used in tree dumps and traces.
    pub fn label(&self) -> String {
        fn join(params: &[Rc<str>]) -> String {
            params
                .iter()
                .map(|p| p.as_ref())
                .collect::<Vec<_>>()
                .join(" ")
        }
        match self {
            NodeKind::File => "file".to_string(),
            NodeKind::Line => "line".to_string(),
            NodeKind::Word(word) => format!("word {word}"),
            NodeKind::Func { name, params } => format!("func {name} ({})", join(params)),
            NodeKind::LocalFunc { name, params } => format!("local {name} ({})", join(params)),
            NodeKind::Labda { params } => format!("labda ({})", join(params)),
            NodeKind::IfChain => "if-chain".to_string(),
            NodeKind::If => "if".to_string(),
            NodeKind::ElseIf => "elseif".to_string(),
            NodeKind::Else => "else".to_string(),
            NodeKind::While => "while".to_string(),
            NodeKind::For { counter } => format!("for {counter}"),
            NodeKind::Catch => "catch".to_string(),
            NodeKind::Condition => "condition".to_string(),
            NodeKind::Body => "body".to_string(),
            NodeKind::Handler => "handler".to_string(),
        }
    }
}

/// Syntax tree node.
pub struct Node {
    kind: NodeKind,
    span: Span,
    children: Vec<Rc<Node>>,
    parent: OnceCell<Weak<Node>>,
    index: Cell<usize>,
}

impl Node {
    /// Build a node and attach `children` to it.
    ///
    /// A child can only be attached once; nodes are never shared between
    /// parents.
    pub fn new(kind: NodeKind, span: Span, children: Vec<Rc<Node>>) -> Rc<Node> {
        Rc::new_cyclic(|this| {
            for (index, child) in children.iter().enumerate() {
                debug_assert!(child.parent.get().is_none(), "node attached twice");
                child.index.set(index);
                let _ = child.parent.set(this.clone());
            }
            Node {
                kind,
                span,
                children,
                parent: OnceCell::new(),
                index: Cell::new(0),
            }
        })
    }

    /// Build a childless node.
    pub fn leaf(kind: NodeKind, span: Span) -> Rc<Node> {
        Node::new(kind, span, Vec::new())
    }

    #[inline]
    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    #[inline]
    pub fn span(&self) -> Span {
        self.span
    }

    #[inline]
    pub fn children(&self) -> &[Rc<Node>] {
        &self.children
    }

    /// Parent node, `None` for a root.
    pub fn parent(&self) -> Option<Rc<Node>> {
        self.parent.get().and_then(Weak::upgrade)
    }

    /// Position in the parent's child list.
    #[inline]
    pub fn index(&self) -> usize {
        self.index.get()
    }

    /// The following sibling, if any.
    pub fn next_sibling(&self) -> Option<Rc<Node>> {
        let parent = self.parent()?;
        parent.children.get(self.index() + 1).cloned()
    }

    fn child_of_kind(&self, pred: impl Fn(&NodeKind) -> bool) -> Option<&Rc<Node>> {
        self.children.iter().find(|child| pred(&child.kind))
    }

    /// The `Body` child of a compound statement.
    pub fn body(&self) -> Option<&Rc<Node>> {
        self.child_of_kind(|kind| matches!(kind, NodeKind::Body))
    }

    /// The `Condition` child of a conditional or loop.
    pub fn condition(&self) -> Option<&Rc<Node>> {
        self.child_of_kind(|kind| matches!(kind, NodeKind::Condition))
    }

    /// The `Handler` child of a catch statement.
    pub fn handler(&self) -> Option<&Rc<Node>> {
        self.child_of_kind(|kind| matches!(kind, NodeKind::Handler))
    }

    /// Declared parameters of a function or lambda; empty otherwise.
    pub fn params(&self) -> &[Rc<str>] {
        match &self.kind {
            NodeKind::Func { params, .. }
            | NodeKind::LocalFunc { params, .. }
            | NodeKind::Labda { params } => params,
            _ => &[],
        }
    }

    /// Function and lambda definitions delimit dynamic extent: code in their
    /// body runs on behalf of a caller, not of the definition site.
    pub fn is_callable(&self) -> bool {
        matches!(
            self.kind,
            NodeKind::Func { .. } | NodeKind::LocalFunc { .. } | NodeKind::Labda { .. }
        )
    }

    /// Compound statements get a fresh closure each time they are entered.
    pub fn opens_scope(&self) -> bool {
        matches!(
            self.kind,
            NodeKind::IfChain
                | NodeKind::While
                | NodeKind::For { .. }
                | NodeKind::Catch
                | NodeKind::Func { .. }
                | NodeKind::LocalFunc { .. }
                | NodeKind::Labda { .. }
        )
    }

    /// Indented tree dump, one node per line.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        self.dump_into(&mut out, 0);
        out
    }

    fn dump_into(&self, out: &mut String, depth: usize) {
        for _ in 0..depth {
            out.push_str("  ");
        }
        out.push_str(&self.kind.label());
        out.push('\n');
        for child in &self.children {
            child.dump_into(out, depth + 1);
        }
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("kind", &self.kind)
            .field("span", &self.span)
            .field("children", &self.children)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests;
