//! Runtime values.
//!
//! Numbers, text and identifiers are immutable and cheap to clone. A
//! [`ValueStack`] is a shared, mutable sequence: cloning the value clones
//! the handle, so every alias observes mutations. Closures and native words
//! are both of type `function`.

use crate::closure::Closure;
use crate::errors::{stack_empty, type_error, EvalError};
use crate::exec::NativeWord;
use deja_ir::Ident;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Runtime value.
#[derive(Clone)]
pub enum Value {
    Number(f64),
    Text(Rc<str>),
    Ident(Ident),
    Stack(ValueStack),
    /// User-defined function or lambda.
    Closure(Closure),
    /// Built-in word.
    Native(NativeWord),
}

/// Type tags reported by `type` and used in type errors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TypeTag {
    Number,
    Text,
    Ident,
    Stack,
    Function,
}

impl TypeTag {
    pub fn name(self) -> &'static str {
        match self {
            TypeTag::Number => "number",
            TypeTag::Text => "text",
            TypeTag::Ident => "identifier",
            TypeTag::Stack => "stack",
            TypeTag::Function => "function",
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Value {
    /// Booleans are the numbers 1 and 0.
    #[inline]
    pub fn bool(b: bool) -> Self {
        Value::Number(if b { 1.0 } else { 0.0 })
    }

    pub fn text(s: &str) -> Self {
        Value::Text(s.into())
    }

    pub fn type_tag(&self) -> TypeTag {
        match self {
            Value::Number(_) => TypeTag::Number,
            Value::Text(_) => TypeTag::Text,
            Value::Ident(_) => TypeTag::Ident,
            Value::Stack(_) => TypeTag::Stack,
            Value::Closure(_) | Value::Native(_) => TypeTag::Function,
        }
    }

    /// Zero, empty text and empty stacks are false; everything else is true.
    pub fn truthy(&self) -> bool {
        match self {
            Value::Number(n) => *n != 0.0,
            Value::Text(s) => !s.is_empty(),
            Value::Stack(stack) => !stack.is_empty(),
            Value::Ident(_) | Value::Closure(_) | Value::Native(_) => true,
        }
    }

    pub fn as_number(&self) -> Result<f64, EvalError> {
        match self {
            Value::Number(n) => Ok(*n),
            other => Err(type_error(&[TypeTag::Number], other.type_tag())),
        }
    }

    pub fn as_text(&self) -> Result<&Rc<str>, EvalError> {
        match self {
            Value::Text(s) => Ok(s),
            other => Err(type_error(&[TypeTag::Text], other.type_tag())),
        }
    }

    pub fn as_ident(&self) -> Result<&Ident, EvalError> {
        match self {
            Value::Ident(ident) => Ok(ident),
            other => Err(type_error(&[TypeTag::Ident], other.type_tag())),
        }
    }

    pub fn as_stack(&self) -> Result<&ValueStack, EvalError> {
        match self {
            Value::Stack(stack) => Ok(stack),
            other => Err(type_error(&[TypeTag::Stack], other.type_tag())),
        }
    }

    /// Source-like rendering: text is quoted, everything else as displayed.
    pub fn repr(&self) -> String {
        match self {
            Value::Text(s) => format!("{:?}", s.as_ref()),
            other => other.to_string(),
        }
    }
}

/// Check `value` against the allowed tags.
pub fn ensure<'v>(value: &'v Value, allowed: &[TypeTag]) -> Result<&'v Value, EvalError> {
    let tag = value.type_tag();
    if allowed.contains(&tag) {
        Ok(value)
    } else {
        Err(type_error(allowed, tag))
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::Ident(a), Value::Ident(b)) => a == b,
            (Value::Stack(a), Value::Stack(b)) => a == b,
            (Value::Closure(a), Value::Closure(b)) => a.ptr_eq(b),
            (Value::Native(a), Value::Native(b)) => a.name == b.name,
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{n}"),
            Value::Text(s) => f.write_str(s),
            Value::Ident(ident) => write!(f, "{ident}"),
            Value::Stack(stack) => write!(f, "{stack}"),
            Value::Closure(closure) => match closure.name() {
                Some(name) => write!(f, "<func {name}>"),
                None => f.write_str("<lambda>"),
            },
            Value::Native(native) => write!(f, "<native {}>", native.name),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "Number({n})"),
            Value::Text(s) => write!(f, "Text({:?})", s.as_ref()),
            Value::Ident(ident) => write!(f, "{ident:?}"),
            Value::Stack(stack) => write!(f, "Stack({stack:?})"),
            Value::Closure(_) | Value::Native(_) => write!(f, "{self}"),
        }
    }
}

/// Shared, mutable, first-class stack.
#[derive(Clone, Default)]
pub struct ValueStack(Rc<RefCell<Vec<Value>>>);

impl ValueStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_values(values: Vec<Value>) -> Self {
        ValueStack(Rc::new(RefCell::new(values)))
    }

    pub fn push(&self, value: Value) {
        self.0.borrow_mut().push(value);
    }

    /// Pop the top item; an empty stack is left untouched.
    pub fn pop(&self) -> Result<Value, EvalError> {
        self.0.borrow_mut().pop().ok_or_else(stack_empty)
    }

    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    /// Item at `index`, counted from the bottom.
    pub fn get(&self, index: usize) -> Option<Value> {
        self.0.borrow().get(index).cloned()
    }

    /// Items bottom to top.
    pub fn to_vec(&self) -> Vec<Value> {
        self.0.borrow().clone()
    }

    /// A new stack with the same items.
    #[must_use]
    pub fn copy(&self) -> ValueStack {
        ValueStack::from_values(self.to_vec())
    }

    /// A new stack with the items in reverse order.
    #[must_use]
    pub fn reversed(&self) -> ValueStack {
        let mut values = self.to_vec();
        values.reverse();
        ValueStack::from_values(values)
    }

    pub fn reverse_in_place(&self) {
        self.0.borrow_mut().reverse();
    }

    /// Whether both handles alias the same stack.
    #[inline]
    pub fn ptr_eq(&self, other: &ValueStack) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for ValueStack {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || *self.0.borrow() == *other.0.borrow()
    }
}

impl fmt::Display for ValueStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for value in self.0.borrow().iter() {
            write!(f, " {}", value.repr())?;
        }
        f.write_str(" ]")
    }
}

impl fmt::Debug for ValueStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.0.borrow().iter()).finish()
    }
}

#[cfg(test)]
mod tests;
