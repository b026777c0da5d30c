use super::*;
use pretty_assertions::assert_eq;

fn dump(source: &str) -> String {
    parse(source).unwrap().dump()
}

fn error(source: &str) -> ParseErrorKind {
    parse(source).unwrap_err().kind
}

#[test]
fn test_lines() {
    assert_eq!(
        dump("2 3 +\n:x \"hi\" set\n"),
        "file\n  line\n    word 2\n    word 3\n    word +\n  line\n    word :x\n    word \"hi\"\n    word set\n"
    );
}

#[test]
fn test_empty_source() {
    assert_eq!(dump(""), "file\n");
    assert_eq!(dump("# only a comment\n\n"), "file\n");
}

#[test]
fn test_function_definitions() {
    assert_eq!(
        dump("func add a b:\n    a b +\nlocal helper:\n    1\n"),
        "file\n  func add (a b)\n    body\n      line\n        word a\n        word b\n        word +\n  local helper ()\n    body\n      line\n        word 1\n"
    );
}

#[test]
fn test_labda() {
    assert_eq!(
        dump("labda x:\n  x x *\n"),
        "file\n  labda (x)\n    body\n      line\n        word x\n        word x\n        word *\n"
    );
}

#[test]
fn test_if_chain() {
    let source = "\
if dup 0 <:
    \"negative\"
elseif dup 0 =:
    \"zero\"
else:
    \"positive\"
.
";
    assert_eq!(
        dump(source),
        "file\n  if-chain\n    if\n      condition\n        word dup\n        word 0\n        word <\n      body\n        line\n          word \"negative\"\n    elseif\n      condition\n        word dup\n        word 0\n        word =\n      body\n        line\n          word \"zero\"\n    else\n      body\n        line\n          word \"positive\"\n  line\n    word .\n"
    );
}

#[test]
fn test_while_and_for() {
    assert_eq!(
        dump("while dup:\n  1 -\nfor i 0 3 range:\n  i .\n"),
        "file\n  while\n    condition\n      word dup\n    body\n      line\n        word 1\n        word -\n  for i\n    condition\n      word 0\n      word 3\n      word range\n    body\n      line\n        word i\n        word .\n"
    );
}

#[test]
fn test_try_catch() {
    assert_eq!(
        dump("try:\n  boom\ncatch:\n  drop\n"),
        "file\n  catch\n    body\n      line\n        word boom\n    handler\n      line\n        word drop\n"
    );
}

#[test]
fn test_nested_blocks() {
    let source = "\
func count n:
    while n:
        if n 2 %:
            n .
        n 1 - =n
";
    let root = parse(source).unwrap();
    let func = &root.children()[0];
    let body = func.body().unwrap();
    let while_node = &body.children()[0];
    assert!(matches!(while_node.kind(), NodeKind::While));
    let loop_body = while_node.body().unwrap();
    assert_eq!(loop_body.children().len(), 2);
    assert!(matches!(loop_body.children()[0].kind(), NodeKind::IfChain));
    assert!(Rc::ptr_eq(&loop_body.parent().unwrap(), while_node));
}

#[test]
fn test_spans() {
    let source = "1 2\nwhile x:\n  y\n";
    let root = parse(source).unwrap();
    assert_eq!(root.children()[0].span(), Span::new(0, 3));
    let while_node = &root.children()[1];
    assert_eq!(while_node.span(), Span::new(4, 16));
    assert_eq!(while_node.condition().unwrap().span(), Span::new(10, 11));
}

#[test]
fn test_missing_block() {
    assert_eq!(
        error("while 1:\nfoo\n"),
        ParseErrorKind::MissingBlock {
            keyword: "while".to_string()
        }
    );
    assert_eq!(
        error("func f:"),
        ParseErrorKind::MissingBlock {
            keyword: "func".to_string()
        }
    );
}

#[test]
fn test_unexpected_indent() {
    assert_eq!(error("1\n  2\n"), ParseErrorKind::UnexpectedIndent);
    assert_eq!(
        error("if 1:\n    a\n  b\n"),
        ParseErrorKind::UnexpectedIndent
    );
}

#[test]
fn test_stray_clauses() {
    assert_eq!(
        error("else:\n  1\n"),
        ParseErrorKind::StrayClause {
            keyword: "else",
            expected: "if"
        }
    );
    assert_eq!(
        error("catch:\n  1\n"),
        ParseErrorKind::StrayClause {
            keyword: "catch",
            expected: "try"
        }
    );
    // `else` ends the chain.
    assert_eq!(
        error("if 1:\n  a\nelse:\n  b\nelseif 2:\n  c\n"),
        ParseErrorKind::StrayClause {
            keyword: "elseif",
            expected: "if"
        }
    );
}

#[test]
fn test_missing_catch() {
    assert_eq!(error("try:\n  1\n2\n"), ParseErrorKind::MissingCatch);
}

#[test]
fn test_bad_headers() {
    assert_eq!(
        error("loop 1:\n  2\n"),
        ParseErrorKind::UnknownBlock("loop".to_string())
    );
    assert_eq!(
        error("func:\n  2\n"),
        ParseErrorKind::MissingName { keyword: "func" }
    );
    assert_eq!(
        error("func f 3:\n  2\n"),
        ParseErrorKind::InvalidName {
            found: "3".to_string()
        }
    );
    assert_eq!(
        error("else 1:\n  2\n"),
        ParseErrorKind::StrayClause {
            keyword: "else",
            expected: "if"
        }
    );
    assert_eq!(
        error("if 1:\n  2\nelse 3:\n  4\n"),
        ParseErrorKind::UnexpectedWords { keyword: "else" }
    );
}

#[test]
fn test_misplaced_colon() {
    let err = parse("a : b\n").unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::MisplacedColon);
    assert_eq!(err.span, Span::new(2, 3));
}

#[test]
fn test_lex_error_carries_span() {
    let err = parse("1\n\"open").unwrap_err();
    assert_eq!(
        err.kind,
        ParseErrorKind::Lex(deja_lexer::LexErrorKind::UnterminatedText)
    );
    assert_eq!(err.span.start, 2);
}
