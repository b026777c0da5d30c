//! Groups the token stream into logical source lines.

use crate::{ParseError, ParseErrorKind};
use deja_ir::Span;
use deja_lexer::{Token, TokenKind};

/// One non-blank source line.
#[derive(Clone, Debug)]
pub(crate) struct SourceLine {
    pub indent: u32,
    /// Number, text, identifier and name tokens, in order.
    pub words: Vec<Token>,
    /// Whether the line ends with `:` and so opens a block.
    pub header: bool,
    pub span: Span,
}

impl SourceLine {
    /// The first word if it is a plain name.
    pub fn keyword(&self) -> Option<&str> {
        match self.words.first().map(|token| &token.kind) {
            Some(TokenKind::Name(name)) => Some(name),
            _ => None,
        }
    }

    /// Whether this line is a header starting with `keyword`.
    pub fn is_clause(&self, keyword: &str, indent: u32) -> bool {
        self.header && self.indent == indent && self.keyword() == Some(keyword)
    }
}

pub(crate) fn split_lines(tokens: &[Token]) -> Result<Vec<SourceLine>, ParseError> {
    let mut lines = Vec::new();
    let mut current: Option<SourceLine> = None;
    let mut iter = tokens.iter().peekable();

    while let Some(token) = iter.next() {
        match &token.kind {
            TokenKind::Indent(indent) => {
                if let Some(line) = current.take() {
                    lines.push(line);
                }
                current = Some(SourceLine {
                    indent: *indent,
                    words: Vec::new(),
                    header: false,
                    span: token.span,
                });
            }
            TokenKind::Newline | TokenKind::Eof => {
                if let Some(line) = current.take() {
                    lines.push(line);
                }
            }
            TokenKind::Colon => {
                let at_end = matches!(
                    iter.peek().map(|next| &next.kind),
                    None | Some(TokenKind::Newline | TokenKind::Eof)
                );
                match current.as_mut() {
                    Some(line) if at_end => {
                        line.header = true;
                        line.span = line.span.merge(token.span);
                    }
                    _ => {
                        return Err(ParseError::new(ParseErrorKind::MisplacedColon, token.span));
                    }
                }
            }
            TokenKind::Number(_)
            | TokenKind::Text(_)
            | TokenKind::Ident(_)
            | TokenKind::Name(_) => {
                if let Some(line) = current.as_mut() {
                    if line.words.is_empty() {
                        line.span = token.span;
                    } else {
                        line.span = line.span.merge(token.span);
                    }
                    line.words.push(token.clone());
                }
            }
        }
    }

    if let Some(line) = current.take() {
        lines.push(line);
    }
    Ok(lines)
}
