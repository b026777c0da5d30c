//! Parse error types.

use deja_ir::Span;
use deja_lexer::{LexError, LexErrorKind};
use thiserror::Error;

/// Structured parse error kinds.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    /// The tokenizer rejected the source.
    #[error(transparent)]
    Lex(#[from] LexErrorKind),

    /// A line is indented deeper than its block, or dedents to a level no
    /// enclosing block uses.
    #[error("unexpected indentation")]
    UnexpectedIndent,

    /// A header line ending in `:` has no indented lines after it.
    #[error("expected an indented block after `{keyword}`")]
    MissingBlock { keyword: String },

    /// `elseif`, `else` or `catch` without the statement it continues.
    #[error("`{keyword}` without a preceding `{expected}`")]
    StrayClause {
        keyword: &'static str,
        expected: &'static str,
    },

    /// A `try:` block not followed by `catch:` at the same indentation.
    #[error("`try` block without a matching `catch`")]
    MissingCatch,

    /// A header line whose first word does not start a block.
    #[error("`{0}` does not start a block")]
    UnknownBlock(String),

    /// A definition or `for` loop without the name it binds.
    #[error("expected a name after `{keyword}`")]
    MissingName { keyword: &'static str },

    /// Parameter or counter that is not a plain name.
    #[error("`{found}` is not a valid name")]
    InvalidName { found: String },

    /// `else:`, `try:` and `catch:` take nothing before the colon.
    #[error("`{keyword}` takes no words before `:`")]
    UnexpectedWords { keyword: &'static str },

    /// A `:` somewhere other than the end of a line.
    #[error("`:` must end the line")]
    MisplacedColon,
}

/// Parse error with location.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{kind}")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub span: Span,
}

impl ParseError {
    #[cold]
    pub fn new(kind: ParseErrorKind, span: Span) -> Self {
        ParseError { kind, span }
    }
}

impl From<LexError> for ParseError {
    fn from(err: LexError) -> Self {
        ParseError::new(ParseErrorKind::Lex(err.kind), err.span)
    }
}
