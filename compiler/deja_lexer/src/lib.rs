//! Lexer for Deja Vu using logos.
//!
//! Source is line oriented: every non-blank line starts with an `Indent`
//! token carrying its indentation width, followed by the line's words. A
//! word ending in `:` is split into the word and a `Colon` token, which the
//! parser uses to recognize block headers (`while n 0 >:`).
//!
//! Word classification:
//! - `12`, `-3.5` → `Number`
//! - `"text"` → `Text` (escapes `\n \t \r \0 \\ \"` processed)
//! - `:name`, `'name'` → `Ident`
//! - anything else (`+`, `push-to`, `reversed!`, `[`) → `Name`

use deja_ir::Span;
use logos::Logos;
use thiserror::Error;

/// Raw token from logos (before classification).
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
#[logos(skip r"[ \t\r]+")] // Skip horizontal whitespace
enum RawToken {
    #[regex(r"#[^\n]*")]
    Comment,

    #[token("\n")]
    Newline,

    #[regex(r#""([^"\\\n\r]|\\.)*""#)]
    Text,

    #[regex(r##"[^ \t\r\n"#]+"##)]
    Word,
}

/// Token kinds produced by [`lex`].
#[derive(Clone, Debug, PartialEq)]
pub enum TokenKind {
    /// Start of a non-blank line, with its indentation width in bytes.
    Indent(u32),
    Number(f64),
    Text(String),
    Ident(String),
    Name(String),
    /// Block opener at the end of a header line.
    Colon,
    Newline,
    Eof,
}

/// A token with its source span.
#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    #[inline]
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Token { kind, span }
    }
}

/// What went wrong while tokenizing.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LexErrorKind {
    #[error("unterminated text literal")]
    UnterminatedText,
    #[error("unexpected character `{0}`")]
    UnexpectedCharacter(char),
    #[error("source file is too large")]
    SourceTooLarge,
}

/// Tokenizer error with location.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{kind}")]
pub struct LexError {
    pub kind: LexErrorKind,
    pub span: Span,
}

impl LexError {
    fn new(kind: LexErrorKind, span: Span) -> Self {
        LexError { kind, span }
    }
}

fn span_of(range: std::ops::Range<usize>) -> Result<Span, LexError> {
    Span::try_from_range(range).map_err(|_| LexError::new(LexErrorKind::SourceTooLarge, Span::DUMMY))
}

/// Tokenize `source`.
///
/// The result always ends with `Eof`.
pub fn lex(source: &str) -> Result<Vec<Token>, LexError> {
    let mut tokens = Vec::new();
    let mut lexer = RawToken::lexer(source);
    let mut line_start = 0usize;
    let mut at_line_start = true;

    while let Some(result) = lexer.next() {
        let range = lexer.span();
        let span = span_of(range.clone())?;
        let slice = lexer.slice();

        let raw = match result {
            Ok(raw) => raw,
            Err(()) => {
                let kind = match slice.chars().next() {
                    Some('"') => LexErrorKind::UnterminatedText,
                    Some(c) => LexErrorKind::UnexpectedCharacter(c),
                    None => LexErrorKind::UnexpectedCharacter('\0'),
                };
                return Err(LexError::new(kind, span));
            }
        };

        match raw {
            RawToken::Comment => {}
            RawToken::Newline => {
                tokens.push(Token::new(TokenKind::Newline, span));
                line_start = range.end;
                at_line_start = true;
            }
            RawToken::Text | RawToken::Word => {
                if at_line_start {
                    let width = u32::try_from(range.start - line_start)
                        .map_err(|_| LexError::new(LexErrorKind::SourceTooLarge, span))?;
                    tokens.push(Token::new(TokenKind::Indent(width), span));
                    at_line_start = false;
                }
                if raw == RawToken::Text {
                    let content = &slice[1..slice.len() - 1];
                    tokens.push(Token::new(TokenKind::Text(unescape(content)), span));
                } else {
                    push_word(&mut tokens, slice, span);
                }
            }
        }
    }

    let end = span_of(source.len()..source.len())?;
    tokens.push(Token::new(TokenKind::Eof, end));
    Ok(tokens)
}

/// Classify a word, splitting off a trailing block colon.
fn push_word(tokens: &mut Vec<Token>, word: &str, span: Span) {
    if word == ":" {
        tokens.push(Token::new(TokenKind::Colon, span));
        return;
    }
    if let Some(head) = word.strip_suffix(':') {
        let head_span = Span::new(span.start, span.end - 1);
        tokens.push(Token::new(classify(head), head_span));
        tokens.push(Token::new(TokenKind::Colon, Span::new(span.end - 1, span.end)));
        return;
    }
    tokens.push(Token::new(classify(word), span));
}

fn classify(word: &str) -> TokenKind {
    if is_number(word) {
        if let Ok(n) = word.parse::<f64>() {
            return TokenKind::Number(n);
        }
    }
    if let Some(name) = word.strip_prefix(':') {
        if !name.is_empty() {
            return TokenKind::Ident(name.to_string());
        }
    }
    if word.len() > 2 && word.starts_with('\'') && word.ends_with('\'') {
        return TokenKind::Ident(word[1..word.len() - 1].to_string());
    }
    TokenKind::Name(word.to_string())
}

/// `-?[0-9]+(\.[0-9]+)?`
fn is_number(word: &str) -> bool {
    let digits = word.strip_prefix('-').unwrap_or(word);
    let (int, frac) = match digits.split_once('.') {
        Some((int, frac)) => (int, Some(frac)),
        None => (digits, None),
    };
    let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    all_digits(int) && frac.map_or(true, all_digits)
}

/// Process escape sequences. Unknown escapes are kept literally.
fn unescape(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            result.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => result.push('\n'),
            Some('t') => result.push('\t'),
            Some('r') => result.push('\r'),
            Some('0') => result.push('\0'),
            Some('\\') => result.push('\\'),
            Some('"') => result.push('"'),
            Some(other) => {
                result.push('\\');
                result.push(other);
            }
            None => result.push('\\'),
        }
    }
    result
}

#[cfg(test)]
mod tests;
