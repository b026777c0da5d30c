use super::*;
use crate::errors::EvalErrorKind;
use deja_ir::IdentTable;
use pretty_assertions::assert_eq;

fn numbers(values: &[f64]) -> ValueStack {
    ValueStack::from_values(values.iter().map(|n| Value::Number(*n)).collect())
}

#[test]
fn test_type_tags() {
    let idents = IdentTable::new();
    assert_eq!(Value::Number(1.0).type_tag(), TypeTag::Number);
    assert_eq!(Value::text("a").type_tag(), TypeTag::Text);
    assert_eq!(Value::Ident(idents.intern("a")).type_tag(), TypeTag::Ident);
    assert_eq!(Value::Stack(ValueStack::new()).type_tag(), TypeTag::Stack);
    assert_eq!(TypeTag::Function.name(), "function");
    assert_eq!(TypeTag::Ident.name(), "identifier");
}

#[test]
fn test_truthiness() {
    assert!(Value::Number(-1.0).truthy());
    assert!(!Value::Number(0.0).truthy());
    assert!(!Value::text("").truthy());
    assert!(Value::text("x").truthy());
    assert!(!Value::Stack(ValueStack::new()).truthy());
    assert!(Value::Stack(numbers(&[0.0])).truthy());
}

#[test]
fn test_ensure() {
    let value = Value::Number(3.0);
    assert!(ensure(&value, &[TypeTag::Number, TypeTag::Text]).is_ok());
    let err = ensure(&value, &[TypeTag::Stack]).unwrap_err();
    assert_eq!(
        err.kind,
        EvalErrorKind::Type {
            expected: "stack".to_string(),
            got: TypeTag::Number
        }
    );
}

#[test]
fn test_accessors() {
    assert_eq!(Value::Number(2.5).as_number().unwrap(), 2.5);
    assert!(Value::text("2").as_number().is_err());
    assert_eq!(Value::text("hi").as_text().unwrap().as_ref(), "hi");
    assert!(Value::Number(1.0).as_stack().is_err());
}

#[test]
fn test_stack_aliasing() {
    let stack = numbers(&[1.0]);
    let alias = stack.clone();
    alias.push(Value::Number(2.0));
    assert_eq!(stack.len(), 2);
    assert!(stack.ptr_eq(&alias));

    let copy = stack.copy();
    copy.push(Value::Number(3.0));
    assert_eq!(stack.len(), 2);
    assert!(!copy.ptr_eq(&stack));
}

#[test]
fn test_pop_empty_stack() {
    let stack = ValueStack::new();
    let err = stack.pop().unwrap_err();
    assert_eq!(err.kind, EvalErrorKind::StackEmpty);
    assert_eq!(stack.len(), 0);
}

#[test]
fn test_reversed_copies_and_reverse_in_place_mutates() {
    let stack = numbers(&[1.0, 2.0, 3.0]);
    let reversed = stack.reversed();
    assert_eq!(reversed.to_vec(), numbers(&[3.0, 2.0, 1.0]).to_vec());
    assert_eq!(stack.to_vec(), numbers(&[1.0, 2.0, 3.0]).to_vec());

    stack.reverse_in_place();
    assert_eq!(stack.to_vec(), numbers(&[3.0, 2.0, 1.0]).to_vec());
}

#[test]
fn test_equality() {
    let idents = IdentTable::new();
    assert_eq!(numbers(&[1.0, 2.0]), numbers(&[1.0, 2.0]));
    assert_ne!(Value::Number(1.0), Value::text("1"));
    assert_eq!(Value::Ident(idents.intern("a")), Value::Ident(idents.intern("a")));
    assert_ne!(Value::Ident(idents.intern("a")), Value::Ident(idents.intern("b")));
}

#[test]
fn test_display() {
    let idents = IdentTable::new();
    assert_eq!(Value::Number(5.0).to_string(), "5");
    assert_eq!(Value::Number(0.5).to_string(), "0.5");
    assert_eq!(Value::text("hi").to_string(), "hi");
    assert_eq!(Value::Ident(idents.intern("x")).to_string(), ":x");
    let nested = ValueStack::from_values(vec![
        Value::Number(1.0),
        Value::text("two"),
        Value::Stack(ValueStack::new()),
    ]);
    assert_eq!(Value::Stack(nested).to_string(), "[ 1 \"two\" [ ] ]");
}
