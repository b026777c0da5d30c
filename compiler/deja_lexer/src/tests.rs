use super::*;
use pretty_assertions::assert_eq;

fn kinds(source: &str) -> Vec<TokenKind> {
    lex(source)
        .unwrap()
        .into_iter()
        .map(|token| token.kind)
        .collect()
}

fn name(s: &str) -> TokenKind {
    TokenKind::Name(s.to_string())
}

#[test]
fn test_simple_line() {
    assert_eq!(
        kinds("2 3 +"),
        vec![
            TokenKind::Indent(0),
            TokenKind::Number(2.0),
            TokenKind::Number(3.0),
            name("+"),
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_word_classes() {
    assert_eq!(
        kinds(r#"-1.5 "hi" :x 'y z' reversed! [ ]"#),
        vec![
            TokenKind::Indent(0),
            TokenKind::Number(-1.5),
            TokenKind::Text("hi".to_string()),
            TokenKind::Ident("x".to_string()),
            // quoted identifiers cannot contain spaces
            name("'y"),
            name("z'"),
            name("reversed!"),
            name("["),
            name("]"),
            TokenKind::Eof,
        ]
    );
    assert_eq!(
        kinds("'done'"),
        vec![
            TokenKind::Indent(0),
            TokenKind::Ident("done".to_string()),
            TokenKind::Eof
        ]
    );
}

#[test]
fn test_number_like_names() {
    assert_eq!(
        kinds("- 1. .5 1e3 1-2"),
        vec![
            TokenKind::Indent(0),
            name("-"),
            name("1."),
            name(".5"),
            name("1e3"),
            name("1-2"),
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_block_header_colon() {
    assert_eq!(
        kinds("while n 0 >:\n    n 1 - =n"),
        vec![
            TokenKind::Indent(0),
            name("while"),
            name("n"),
            TokenKind::Number(0.0),
            name(">"),
            TokenKind::Colon,
            TokenKind::Newline,
            TokenKind::Indent(4),
            name("n"),
            TokenKind::Number(1.0),
            name("-"),
            name("=n"),
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_colon_spans() {
    let tokens = lex("else:").unwrap();
    assert_eq!(tokens[1].span, Span::new(0, 4));
    assert_eq!(tokens[2].kind, TokenKind::Colon);
    assert_eq!(tokens[2].span, Span::new(4, 5));
}

#[test]
fn test_detached_colon() {
    assert_eq!(
        kinds("try :"),
        vec![
            TokenKind::Indent(0),
            name("try"),
            TokenKind::Colon,
            TokenKind::Eof
        ]
    );
}

#[test]
fn test_comments_and_blank_lines() {
    assert_eq!(
        kinds("# heading\n\n  1 # trailing\n"),
        vec![
            TokenKind::Newline,
            TokenKind::Newline,
            TokenKind::Indent(2),
            TokenKind::Number(1.0),
            TokenKind::Newline,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_hash_ends_word() {
    assert_eq!(
        kinds("dup#note"),
        vec![TokenKind::Indent(0), name("dup"), TokenKind::Eof]
    );
}

#[test]
fn test_quote_ends_word() {
    assert_eq!(
        kinds("say\"hi\""),
        vec![
            TokenKind::Indent(0),
            name("say"),
            TokenKind::Text("hi".to_string()),
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_text_escapes() {
    assert_eq!(
        kinds(r#""a\tb\n\"q\" \\ \x""#),
        vec![
            TokenKind::Indent(0),
            TokenKind::Text("a\tb\n\"q\" \\ \\x".to_string()),
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_text_line_indent() {
    assert_eq!(
        kinds("  \"x\" ."),
        vec![
            TokenKind::Indent(2),
            TokenKind::Text("x".to_string()),
            name("."),
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_unterminated_text() {
    let err = lex("1 \"open").unwrap_err();
    assert_eq!(err.kind, LexErrorKind::UnterminatedText);
    assert_eq!(err.span.start, 2);
    assert_eq!(err.to_string(), "unterminated text literal");
}

#[test]
fn test_crlf_line_endings() {
    assert_eq!(
        kinds("1\r\n  2"),
        vec![
            TokenKind::Indent(0),
            TokenKind::Number(1.0),
            TokenKind::Newline,
            TokenKind::Indent(2),
            TokenKind::Number(2.0),
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_eof_span() {
    let tokens = lex("dup").unwrap();
    assert_eq!(tokens.last().unwrap().span, Span::new(3, 3));
}
