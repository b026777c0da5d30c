//! Evaluation errors and control signals.
//!
//! Every runtime failure is an [`EvalError`]. Internal kinds map onto a tag
//! identifier and a payload stack holding the message, so user code sees
//! them exactly like errors raised with `raise`.

use crate::value::{TypeTag, Value, ValueStack};
use deja_ir::{Ident, IdentTable, Span};
use std::fmt;
use thiserror::Error;

/// Structured error category.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum EvalErrorKind {
    #[error("name `{name}` is not defined")]
    Name { name: String },

    #[error("expected {expected}, got {got}")]
    Type { expected: String, got: TypeTag },

    #[error("stack is empty")]
    StackEmpty,

    #[error("division by zero")]
    DivisionByZero,

    #[error("cannot load `{path}`: {reason}")]
    Io { path: String, reason: String },

    /// Raised from user code with an arbitrary tag.
    #[error("{tag} raised with {payload}")]
    User { tag: Ident, payload: ValueStack },
}

impl EvalErrorKind {
    /// Tag name for internal kinds; `None` for user errors.
    pub fn tag_name(&self) -> Option<&'static str> {
        match self {
            EvalErrorKind::Name { .. } => Some("name-error"),
            EvalErrorKind::Type { .. } => Some("type-error"),
            EvalErrorKind::StackEmpty => Some("stack-empty"),
            EvalErrorKind::DivisionByZero => Some("division-by-zero"),
            EvalErrorKind::Io { .. } => Some("io-error"),
            EvalErrorKind::User { .. } => None,
        }
    }
}

/// Runtime error with the location of the word that raised it.
#[derive(Clone, Debug, PartialEq, Error)]
#[error("{kind}")]
pub struct EvalError {
    pub kind: EvalErrorKind,
    pub span: Option<Span>,
}

impl EvalError {
    #[cold]
    pub fn new(kind: EvalErrorKind) -> Self {
        EvalError { kind, span: None }
    }

    /// Attach `span` unless a location is already known.
    #[must_use]
    pub fn with_span(mut self, span: Span) -> Self {
        if self.span.is_none() {
            self.span = Some(span);
        }
        self
    }

    /// The identifier this error is caught as.
    pub fn tag(&self, idents: &IdentTable) -> Ident {
        match (&self.kind, self.kind.tag_name()) {
            (EvalErrorKind::User { tag, .. }, _) => tag.clone(),
            (_, Some(name)) => idents.intern(name),
            (_, None) => idents.intern("error"),
        }
    }

    /// One-line description for uncaught errors: `:tag: message`.
    pub fn report(&self, idents: &IdentTable) -> String {
        let message = match &self.kind {
            EvalErrorKind::User { payload, .. } => payload.to_string(),
            other => other.to_string(),
        };
        format!("{}: {message}", self.tag(idents))
    }

    /// The payload handed to a handler.
    pub fn payload(&self) -> ValueStack {
        match &self.kind {
            EvalErrorKind::User { payload, .. } => payload.clone(),
            other => ValueStack::from_values(vec![Value::text(&other.to_string())]),
        }
    }
}

/// Why a run stopped before reaching the end of the program.
#[derive(Clone, Debug, PartialEq)]
pub enum Signal {
    /// `return` with no caller to return to. Not an error.
    Halt,
    /// An error no handler caught.
    Raise(EvalError),
}

impl From<EvalError> for Signal {
    fn from(err: EvalError) -> Self {
        Signal::Raise(err)
    }
}

#[cold]
pub fn name_error(name: &str) -> EvalError {
    EvalError::new(EvalErrorKind::Name {
        name: name.to_string(),
    })
}

#[cold]
pub fn type_error(allowed: &[TypeTag], got: TypeTag) -> EvalError {
    let expected = allowed
        .iter()
        .map(|tag| tag.name())
        .collect::<Vec<_>>()
        .join(" or ");
    EvalError::new(EvalErrorKind::Type { expected, got })
}

/// Type error for a value of the right type but the wrong shape.
#[cold]
pub fn shape_error(expected: &str, got: TypeTag) -> EvalError {
    EvalError::new(EvalErrorKind::Type {
        expected: expected.to_string(),
        got,
    })
}

#[cold]
pub fn stack_empty() -> EvalError {
    EvalError::new(EvalErrorKind::StackEmpty)
}

#[cold]
pub fn division_by_zero() -> EvalError {
    EvalError::new(EvalErrorKind::DivisionByZero)
}

#[cold]
pub fn io_error(path: &str, reason: impl fmt::Display) -> EvalError {
    EvalError::new(EvalErrorKind::Io {
        path: path.to_string(),
        reason: reason.to_string(),
    })
}

#[cold]
pub fn user_error(tag: Ident, payload: ValueStack) -> EvalError {
    EvalError::new(EvalErrorKind::User { tag, payload })
}
