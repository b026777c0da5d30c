//! Continuations and the native word protocol.

use crate::closure::Closure;
use crate::environment::Environment;
use crate::errors::Signal;
use crate::value::Value;
use deja_ir::Node;
use std::fmt;
use std::rc::Rc;

/// How a continuation resumes at its node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Entry {
    /// Execute the node.
    Enter,
    /// Continue just past the node (saved call sites).
    After,
    /// Re-run the iteration check of a `for` node (user iterators).
    Iterate,
}

/// A point of execution: a node, the closure it runs in, and how to resume.
#[derive(Clone)]
pub struct Continuation {
    pub node: Rc<Node>,
    pub closure: Closure,
    pub entry: Entry,
}

impl Continuation {
    pub fn enter(node: Rc<Node>, closure: Closure) -> Self {
        Continuation {
            node,
            closure,
            entry: Entry::Enter,
        }
    }

    pub fn after(node: Rc<Node>, closure: Closure) -> Self {
        Continuation {
            node,
            closure,
            entry: Entry::After,
        }
    }

    pub fn iterate(node: Rc<Node>, closure: Closure) -> Self {
        Continuation {
            node,
            closure,
            entry: Entry::Iterate,
        }
    }
}

impl fmt::Debug for Continuation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?} {} @ {}",
            self.entry,
            self.node.kind().label(),
            self.node.span()
        )
    }
}

/// Control transfer requested by a native word.
pub enum Transfer {
    /// Continue at a saved continuation.
    Jump(Continuation),
    /// Call a user closure from the current word.
    Invoke(Closure),
}

pub type NativeResult = Result<Option<Transfer>, Signal>;

/// Signature of a built-in word.
///
/// Natives receive the environment and the closure of the calling word.
/// They validate their inputs before consuming any, so a failing native
/// leaves the evaluation stack as it found it.
pub type NativeFn = fn(&mut Environment, &Closure) -> NativeResult;

/// A named built-in word.
#[derive(Clone, Copy)]
pub struct NativeWord {
    pub name: &'static str,
    pub func: NativeFn,
}

impl NativeWord {
    pub const fn new(name: &'static str, func: NativeFn) -> Self {
        NativeWord { name, func }
    }

    #[inline]
    pub fn call(&self, env: &mut Environment, closure: &Closure) -> NativeResult {
        (self.func)(env, closure)
    }
}

impl fmt::Debug for NativeWord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NativeWord({})", self.name)
    }
}

/// What a word turned out to mean.
pub enum Resolved {
    /// Pushed as is.
    Literal(Value),
    /// User function or lambda to invoke.
    ClosureRef(Closure),
    /// Built-in to run.
    NativeCallable(NativeWord),
}

impl From<Value> for Resolved {
    fn from(value: Value) -> Self {
        match value {
            Value::Closure(closure) => Resolved::ClosureRef(closure),
            Value::Native(native) => Resolved::NativeCallable(native),
            other => Resolved::Literal(other),
        }
    }
}
