//! Debug commands: `parse` and `lex` for inspecting the front end.

use super::{fail, read_file};
use crate::location;

/// Parse a file and print its syntax tree.
pub fn parse_file(path: &str) {
    let content = read_file(path);
    match parse_source(path, &content) {
        Ok(dump) => print!("{dump}"),
        Err(message) => fail(&message),
    }
}

/// Indented tree dump of `source`, one node per line.
pub fn parse_source(path: &str, source: &str) -> Result<String, String> {
    deja_parse::parse(source)
        .map(|root| root.dump())
        .map_err(|err| format!("{}: error: {err}", location(path, source, Some(err.span))))
}

/// Lex a file and print the token stream.
pub fn lex_file(path: &str) {
    let content = read_file(path);
    match lex_source(path, &content) {
        Ok(lines) => {
            println!("Tokens for '{}' ({} tokens):", path, lines.len());
            for line in lines {
                println!("  {line}");
            }
        }
        Err(message) => fail(&message),
    }
}

/// One `Kind @ start..end` line per token.
pub fn lex_source(path: &str, source: &str) -> Result<Vec<String>, String> {
    let tokens = deja_lexer::lex(source)
        .map_err(|err| format!("{}: error: {err}", location(path, source, Some(err.span))))?;
    Ok(tokens
        .iter()
        .map(|tok| format!("{:?} @ {:?}", tok.kind, tok.span))
        .collect())
}
