use super::*;
use pretty_assertions::assert_eq;

fn word(name: &str) -> Rc<Node> {
    Node::leaf(NodeKind::Word(Word::Name(name.into())), Span::DUMMY)
}

/// `while cond: body` inside a file.
fn sample() -> (Rc<Node>, Rc<Node>, Rc<Node>, Rc<Node>) {
    let condition = Node::new(NodeKind::Condition, Span::DUMMY, vec![word("running")]);
    let line = Node::new(NodeKind::Line, Span::DUMMY, vec![word("tick"), word("tock")]);
    let body = Node::new(NodeKind::Body, Span::DUMMY, vec![line.clone()]);
    let while_node = Node::new(NodeKind::While, Span::DUMMY, vec![condition, body.clone()]);
    let file = Node::new(NodeKind::File, Span::DUMMY, vec![while_node.clone()]);
    (file, while_node, body, line)
}

#[test]
fn test_parent_links() {
    let (file, while_node, body, line) = sample();
    assert!(file.parent().is_none());
    assert!(Rc::ptr_eq(&while_node.parent().unwrap(), &file));
    assert!(Rc::ptr_eq(&body.parent().unwrap(), &while_node));
    assert!(Rc::ptr_eq(&line.parent().unwrap(), &body));
}

#[test]
fn test_sibling_navigation() {
    let (_file, while_node, body, line) = sample();
    let condition = while_node.condition().unwrap().clone();
    assert_eq!(condition.index(), 0);
    assert_eq!(body.index(), 1);
    assert!(Rc::ptr_eq(&condition.next_sibling().unwrap(), &body));
    assert!(body.next_sibling().is_none());

    let tick = line.children()[0].clone();
    let tock = line.children()[1].clone();
    assert!(Rc::ptr_eq(&tick.next_sibling().unwrap(), &tock));
    assert!(tock.next_sibling().is_none());
}

#[test]
fn test_kind_queries() {
    let body = Node::new(NodeKind::Body, Span::DUMMY, vec![]);
    let func = Node::new(
        NodeKind::Func {
            name: "square".into(),
            params: vec!["n".into()],
        },
        Span::DUMMY,
        vec![body],
    );
    assert!(func.is_callable());
    assert!(func.opens_scope());
    assert_eq!(func.params().len(), 1);
    assert!(func.body().is_some());
    assert!(func.condition().is_none());

    let line = Node::leaf(NodeKind::Line, Span::DUMMY);
    assert!(!line.opens_scope());
    assert!(line.params().is_empty());
}

#[test]
fn test_dump() {
    let (file, ..) = sample();
    assert_eq!(
        file.dump(),
        "file\n  while\n    condition\n      word running\n    body\n      line\n        word tick\n        word tock\n"
    );
}
