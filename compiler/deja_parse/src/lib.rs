//! Indentation-based parser for Deja Vu.
//!
//! Produces the reference-counted syntax tree from `deja_ir::ast`. Every
//! line is either a plain statement (a `Line` of words) or a header ending
//! in `:` whose block is the run of following lines indented deeper.

mod error;
mod lines;

pub use error::{ParseError, ParseErrorKind};

use deja_ir::{Node, NodeKind, Span, Word};
use deja_lexer::{Token, TokenKind};
use lines::SourceLine;
use std::rc::Rc;

/// Parse `source` into a `File` node.
#[tracing::instrument(level = "debug", skip_all, fields(len = source.len()))]
pub fn parse(source: &str) -> Result<Rc<Node>, ParseError> {
    let tokens = deja_lexer::lex(source)?;
    let lines = lines::split_lines(&tokens)?;
    tracing::trace!(lines = lines.len(), "split source lines");

    let mut parser = Parser::new(&lines);
    let items = parser.parse_block(None)?;
    let end = u32::try_from(source.len()).unwrap_or(u32::MAX);
    Ok(Node::new(NodeKind::File, Span::new(0, end), items))
}

/// Parser state: a cursor over source lines.
struct Parser<'a> {
    lines: &'a [SourceLine],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(lines: &'a [SourceLine]) -> Self {
        Parser { lines, pos: 0 }
    }

    #[inline]
    fn peek(&self) -> Option<&'a SourceLine> {
        self.lines.get(self.pos)
    }

    #[inline]
    fn advance(&mut self) {
        self.pos += 1;
    }

    /// Parse the statements of a block nested under a header at
    /// `parent_indent` (`None` for the top level).
    ///
    /// Returns an empty list if the next line is not indented deeper than
    /// the header.
    fn parse_block(&mut self, parent_indent: Option<u32>) -> Result<Vec<Rc<Node>>, ParseError> {
        let mut items = Vec::new();
        let Some(first) = self.peek() else {
            return Ok(items);
        };
        if parent_indent.is_some_and(|parent| first.indent <= parent) {
            return Ok(items);
        }
        let indent = first.indent;

        while let Some(line) = self.peek() {
            if line.indent > indent {
                return Err(ParseError::new(ParseErrorKind::UnexpectedIndent, line.span));
            }
            if line.indent < indent {
                // Dedenting between two block levels matches neither.
                if parent_indent.map_or(true, |parent| line.indent > parent) {
                    return Err(ParseError::new(ParseErrorKind::UnexpectedIndent, line.span));
                }
                break;
            }
            items.push(self.parse_statement(line)?);
        }
        Ok(items)
    }

    fn parse_statement(&mut self, line: &'a SourceLine) -> Result<Rc<Node>, ParseError> {
        self.advance();
        if !line.header {
            return Ok(Node::new(NodeKind::Line, line.span, word_nodes(&line.words)));
        }

        let Some(keyword) = line.keyword() else {
            let found = line
                .words
                .first()
                .map_or_else(String::new, |token| token_text(&token.kind));
            return Err(ParseError::new(ParseErrorKind::UnknownBlock(found), line.span));
        };

        match keyword {
            "func" | "local" => self.parse_function(line, keyword == "local"),
            "labda" => {
                let params = names(&line.words[1..])?;
                let body = self.parse_body(line, "labda")?;
                Ok(compound(NodeKind::Labda { params }, line, vec![body]))
            }
            "if" => self.parse_if_chain(line),
            "while" => {
                let condition = condition(line, &line.words[1..]);
                let body = self.parse_body(line, "while")?;
                Ok(compound(NodeKind::While, line, vec![condition, body]))
            }
            "for" => {
                let counter = match line.words.get(1) {
                    Some(token) => name_of(token)?,
                    None => {
                        return Err(ParseError::new(
                            ParseErrorKind::MissingName { keyword: "for" },
                            line.span,
                        ))
                    }
                };
                let condition = condition(line, &line.words[2..]);
                let body = self.parse_body(line, "for")?;
                Ok(compound(NodeKind::For { counter }, line, vec![condition, body]))
            }
            "try" => self.parse_try(line),
            "elseif" => Err(stray(line, "elseif", "if")),
            "else" => Err(stray(line, "else", "if")),
            "catch" => Err(stray(line, "catch", "try")),
            other => Err(ParseError::new(
                ParseErrorKind::UnknownBlock(other.to_string()),
                line.span,
            )),
        }
    }

    fn parse_function(&mut self, line: &'a SourceLine, local: bool) -> Result<Rc<Node>, ParseError> {
        let keyword = if local { "local" } else { "func" };
        let Some(name_token) = line.words.get(1) else {
            return Err(ParseError::new(
                ParseErrorKind::MissingName { keyword },
                line.span,
            ));
        };
        let name = name_of(name_token)?;
        let params = names(&line.words[2..])?;
        let body = self.parse_body(line, keyword)?;
        let kind = if local {
            NodeKind::LocalFunc { name, params }
        } else {
            NodeKind::Func { name, params }
        };
        Ok(compound(kind, line, vec![body]))
    }

    /// `if` followed by any number of `elseif` clauses and an optional
    /// `else`, all at the header's indentation.
    fn parse_if_chain(&mut self, line: &'a SourceLine) -> Result<Rc<Node>, ParseError> {
        let mut clauses = Vec::new();
        let cond = condition(line, &line.words[1..]);
        let body = self.parse_body(line, "if")?;
        clauses.push(compound(NodeKind::If, line, vec![cond, body]));

        while let Some(next) = self.peek() {
            if next.is_clause("elseif", line.indent) {
                self.advance();
                let cond = condition(next, &next.words[1..]);
                let body = self.parse_body(next, "elseif")?;
                clauses.push(compound(NodeKind::ElseIf, next, vec![cond, body]));
            } else if next.is_clause("else", line.indent) {
                self.advance();
                expect_bare(next, "else")?;
                let body = self.parse_body(next, "else")?;
                clauses.push(compound(NodeKind::Else, next, vec![body]));
                break;
            } else {
                break;
            }
        }

        let span = clauses
            .iter()
            .fold(line.span, |span, clause| span.merge(clause.span()));
        Ok(Node::new(NodeKind::IfChain, span, clauses))
    }

    fn parse_try(&mut self, line: &'a SourceLine) -> Result<Rc<Node>, ParseError> {
        expect_bare(line, "try")?;
        let body = self.parse_body(line, "try")?;
        let Some(next) = self.peek().filter(|next| next.is_clause("catch", line.indent)) else {
            return Err(ParseError::new(ParseErrorKind::MissingCatch, line.span));
        };
        self.advance();
        expect_bare(next, "catch")?;
        let handler_items = self.parse_block(Some(next.indent))?;
        if handler_items.is_empty() {
            return Err(missing_block(next, "catch"));
        }
        let handler = Node::new(NodeKind::Handler, block_span(next, &handler_items), handler_items);
        let span = line.span.merge(handler.span());
        Ok(Node::new(NodeKind::Catch, span, vec![body, handler]))
    }

    /// The indented block under `header`, wrapped in a `Body` node.
    fn parse_body(&mut self, header: &SourceLine, keyword: &str) -> Result<Rc<Node>, ParseError> {
        let items = self.parse_block(Some(header.indent))?;
        if items.is_empty() {
            return Err(missing_block(header, keyword));
        }
        Ok(Node::new(NodeKind::Body, block_span(header, &items), items))
    }
}

fn word_nodes(tokens: &[Token]) -> Vec<Rc<Node>> {
    tokens
        .iter()
        .filter_map(|token| {
            let word = match &token.kind {
                TokenKind::Number(n) => Word::Number(*n),
                TokenKind::Text(s) => Word::Text(s.as_str().into()),
                TokenKind::Ident(s) => Word::Ident(s.as_str().into()),
                TokenKind::Name(s) => Word::Name(s.as_str().into()),
                _ => return None,
            };
            Some(Node::leaf(NodeKind::Word(word), token.span))
        })
        .collect()
}

fn condition(header: &SourceLine, tokens: &[Token]) -> Rc<Node> {
    let span = tokens
        .iter()
        .map(|token| token.span)
        .reduce(Span::merge)
        .unwrap_or(header.span);
    Node::new(NodeKind::Condition, span, word_nodes(tokens))
}

/// Span from the header to the end of its block.
fn block_span(header: &SourceLine, items: &[Rc<Node>]) -> Span {
    items
        .last()
        .map_or(header.span, |last| header.span.merge(last.span()))
}

fn compound(kind: NodeKind, header: &SourceLine, children: Vec<Rc<Node>>) -> Rc<Node> {
    let span = block_span(header, &children);
    Node::new(kind, span, children)
}

fn name_of(token: &Token) -> Result<Rc<str>, ParseError> {
    match &token.kind {
        TokenKind::Name(name) => Ok(name.as_str().into()),
        other => Err(ParseError::new(
            ParseErrorKind::InvalidName {
                found: token_text(other),
            },
            token.span,
        )),
    }
}

fn names(tokens: &[Token]) -> Result<Vec<Rc<str>>, ParseError> {
    tokens.iter().map(name_of).collect()
}

fn expect_bare(line: &SourceLine, keyword: &'static str) -> Result<(), ParseError> {
    if line.words.len() > 1 {
        return Err(ParseError::new(
            ParseErrorKind::UnexpectedWords { keyword },
            line.span,
        ));
    }
    Ok(())
}

fn stray(line: &SourceLine, keyword: &'static str, expected: &'static str) -> ParseError {
    ParseError::new(ParseErrorKind::StrayClause { keyword, expected }, line.span)
}

fn missing_block(header: &SourceLine, keyword: &str) -> ParseError {
    ParseError::new(
        ParseErrorKind::MissingBlock {
            keyword: keyword.to_string(),
        },
        header.span,
    )
}

fn token_text(kind: &TokenKind) -> String {
    match kind {
        TokenKind::Number(n) => n.to_string(),
        TokenKind::Text(s) => format!("{s:?}"),
        TokenKind::Ident(s) => format!(":{s}"),
        TokenKind::Name(s) => s.clone(),
        TokenKind::Indent(_) | TokenKind::Newline | TokenKind::Eof => String::new(),
        TokenKind::Colon => ":".to_string(),
    }
}

#[cfg(test)]
mod tests;
