use super::*;
use crate::environment::Environment;
use crate::errors::{EvalError, EvalErrorKind, Signal};
use crate::machine::run;
use crate::print_handler::buffer_handler;
use crate::value::TypeTag;
use pretty_assertions::assert_eq;

fn run_source(source: &str) -> (Environment, Result<(), Signal>) {
    let root = deja_parse::parse(source).unwrap();
    let mut env = Environment::new(&builtins()).with_print_handler(buffer_handler());
    let result = run(&mut env, &root);
    (env, result)
}

fn eval(source: &str) -> Vec<Value> {
    let (env, result) = run_source(source);
    assert_eq!(result, Ok(()), "{source}");
    env.stack().to_vec()
}

/// Run a program that must fail; returns the error and the stack it left.
fn fail(source: &str) -> (EvalError, Vec<Value>) {
    let (env, result) = run_source(source);
    match result {
        Err(Signal::Raise(err)) => (err, env.stack().to_vec()),
        other => panic!("{source}: expected an error, got {other:?}"),
    }
}

fn nums(values: &[f64]) -> Vec<Value> {
    values.iter().map(|n| Value::Number(*n)).collect()
}

fn output(source: &str) -> String {
    let (env, result) = run_source(source);
    assert_eq!(result, Ok(()));
    env.print_handler().get_output()
}

fn lookup<'t>(table: &'t WordTable, name: &str) -> Option<&'t Value> {
    table
        .iter()
        .find(|(existing, _)| *existing == name)
        .map(|(_, value)| value)
}

#[test]
fn test_table_contents() {
    let table = builtins();
    for name in [
        ".", "dup", "drop", "swap", "(print-stack)", "get", "getglobal", "set", "setglobal",
        "local", "type", "[]", "[", "]", "push-to", "pop-from", "push-through", "reversed",
        "reversed!", "copy-stack", "call", "return", "raise", "error", "catch-if", "=", "equal",
        "!=", "not-equal", "<", "less", "<=", "less-or-equal", ">", "greater", ">=",
        "greater-or-equal", "not", "and", "or", "xor", "+", "add", "-", "sub", "*", "mul", "/",
        "div", "%", "mod", "range", "in", "stop-iter", "use", "(ident-count)", "true", "false",
    ] {
        assert!(lookup(&table, name).is_some(), "missing {name}");
    }
    assert!(lookup(&table, "(in-next)").is_none());
}

#[test]
fn test_insert_replaces() {
    let mut table = WordTable::new();
    table.insert("answer", Value::Number(1.0));
    table.insert("answer", Value::Number(42.0));
    assert_eq!(table.iter().count(), 1);
    assert_eq!(lookup(&table, "answer"), Some(&Value::Number(42.0)));
}

#[test]
fn test_shuffling() {
    assert_eq!(eval("1 dup"), nums(&[1.0, 1.0]));
    assert_eq!(eval("1 2 drop"), nums(&[1.0]));
    assert_eq!(eval("1 2 swap"), nums(&[2.0, 1.0]));
}

#[test]
fn test_shuffling_on_empty_stack() {
    for word in ["dup", "drop", "."] {
        let (err, stack) = fail(word);
        assert_eq!(err.kind, EvalErrorKind::StackEmpty);
        assert!(stack.is_empty());
    }
    let (err, stack) = fail("1 swap");
    assert_eq!(err.kind, EvalErrorKind::StackEmpty);
    assert_eq!(stack, nums(&[1.0]));
}

#[test]
fn test_print_words() {
    assert_eq!(output("1.5 .\n:tag .\n[ 1 \"a\" ] ."), "1.5\n:tag\n[ 1 \"a\" ]\n");
    assert_eq!(output("1 \"two\" (print-stack)"), "[ 1 \"two\" ]\n");
}

#[test]
fn test_globals() {
    assert_eq!(eval(":g 3 setglobal\n:g getglobal"), nums(&[3.0]));
    let (err, stack) = fail(":missing getglobal");
    assert!(matches!(err.kind, EvalErrorKind::Name { .. }));
    assert_eq!(stack.len(), 1);
}

#[test]
fn test_local_stays_in_scope() {
    let source = "\
func f:
    :v 1 local
    v
f
:v type
";
    let stack = eval(source);
    assert_eq!(stack[0], Value::Number(1.0));
    assert_eq!(stack[1].as_ident().unwrap().name(), "nil");
}

#[test]
fn test_set_updates_enclosing_binding() {
    let source = "\
func f:
    :v 1 local
    if 1:
        :v 2 set
    v
f
:v type
";
    let stack = eval(source);
    assert_eq!(stack[0], Value::Number(2.0));
    assert_eq!(stack[1].as_ident().unwrap().name(), "nil");
}

#[test]
fn test_set_requires_ident() {
    let (err, stack) = fail("\"x\" 1 set");
    assert!(matches!(
        err.kind,
        EvalErrorKind::Type {
            got: TypeTag::Text,
            ..
        }
    ));
    assert_eq!(stack.len(), 2);
}

#[test]
fn test_type() {
    let source = ":n 1 set :t \"x\" set :s [] set\n:n type :t type :s type :dup type :nothing type :i :n set :i type";
    let names: Vec<String> = eval(source)
        .iter()
        .map(|v| v.as_ident().unwrap().name().to_string())
        .collect();
    assert_eq!(
        names,
        vec!["number", "text", "stack", "function", "nil", "identifier"]
    );
}

#[test]
fn test_comparisons() {
    assert_eq!(eval("1 2 <\n2 1 <\n2 2 <=\n3 2 >\n2 3 >=\n"), nums(&[1.0, 0.0, 1.0, 1.0, 0.0]));
    assert_eq!(eval("1 1 =\n1 2 !=\n\"a\" \"a\" equal\n:a :b ="), nums(&[1.0, 1.0, 1.0, 0.0]));
    assert_eq!(eval("[ 1 2 ] [ 1 2 ] ="), nums(&[1.0]));
}

#[test]
fn test_comparison_type_error() {
    let (err, stack) = fail("1 \"b\" <");
    assert!(matches!(err.kind, EvalErrorKind::Type { .. }));
    assert_eq!(stack.len(), 2);
}

#[test]
fn test_logic() {
    assert_eq!(eval("0 not\n5 not"), nums(&[1.0, 0.0]));
    assert_eq!(eval("1 7 and\n0 7 and"), nums(&[7.0, 0.0]));
    assert_eq!(eval("3 7 or\n0 7 or"), nums(&[3.0, 7.0]));
    assert_eq!(eval("1 0 xor\n1 1 xor"), nums(&[1.0, 0.0]));
    assert_eq!(eval("true false"), nums(&[1.0, 0.0]));
}

#[test]
fn test_arithmetic() {
    assert_eq!(
        eval("2 3 add\n10 4 sub\n3 4 mul\n9 2 div\n7 3 mod\n-7 3 %"),
        nums(&[5.0, 6.0, 12.0, 4.5, 1.0, -1.0])
    );
}

#[test]
fn test_modulo_by_zero() {
    let (err, stack) = fail("5 0 %");
    assert_eq!(err.kind, EvalErrorKind::DivisionByZero);
    assert_eq!(stack, nums(&[5.0, 0.0]));
}

#[test]
fn test_dividing_zero_is_fine() {
    assert_eq!(eval("0 5 /"), nums(&[0.0]));
}

#[test]
fn test_push_and_pop() {
    let stack = eval(":s [] set\n1 s push-to\n2 s push-to\ns pop-from\ns");
    assert_eq!(stack[0], Value::Number(2.0));
    assert_eq!(stack[1].as_stack().unwrap().to_vec(), nums(&[1.0]));
}

#[test]
fn test_pop_from_empty() {
    let (err, stack) = fail("[] pop-from");
    assert_eq!(err.kind, EvalErrorKind::StackEmpty);
    assert_eq!(stack.len(), 1);
    assert!(stack[0].as_stack().unwrap().is_empty());
}

#[test]
fn test_push_to_requires_stack() {
    let (err, stack) = fail("1 2 push-to");
    assert!(matches!(err.kind, EvalErrorKind::Type { .. }));
    assert_eq!(stack, nums(&[1.0, 2.0]));
}

#[test]
fn test_unbalanced_close() {
    let (err, stack) = fail("1 2 ]");
    assert_eq!(err.kind, EvalErrorKind::StackEmpty);
    assert_eq!(stack, nums(&[1.0, 2.0]));
}

#[test]
fn test_nested_stack_literals() {
    let stack = eval("[ 1 [ 2 3 ] ]");
    let outer = stack[0].as_stack().unwrap();
    assert_eq!(outer.len(), 2);
    assert_eq!(outer.get(1).unwrap().as_stack().unwrap().to_vec(), nums(&[2.0, 3.0]));
}

#[test]
fn test_reversal_and_copy() {
    let stack = eval(":s [ 1 2 ] set\ns reversed! drop\ns copy-stack\n:c swap set\n3 c push-to\ns\nc");
    assert_eq!(stack[0].as_stack().unwrap().to_vec(), nums(&[2.0, 1.0]));
    assert_eq!(stack[1].as_stack().unwrap().to_vec(), nums(&[2.0, 1.0, 3.0]));
}

#[test]
fn test_reversed_in_place_returns_same_stack() {
    let stack = eval(":s [ 1 2 ] set\ns reversed!\ns");
    assert!(stack[0].as_stack().unwrap().ptr_eq(stack[1].as_stack().unwrap()));
}

#[test]
fn test_call_variants() {
    assert_eq!(eval("func three:\n    3\n:three call"), nums(&[3.0]));
    assert_eq!(eval("1 2 :+ call"), nums(&[3.0]));
    assert_eq!(eval(":k 9 set\n:k call"), nums(&[9.0]));
    let (err, stack) = fail("5 call");
    assert!(matches!(err.kind, EvalErrorKind::Type { .. }));
    assert_eq!(stack, nums(&[5.0]));
}

#[test]
fn test_raise_requires_stack_payload() {
    let (err, stack) = fail("1 :tag raise");
    assert!(matches!(
        err.kind,
        EvalErrorKind::Type {
            got: TypeTag::Number,
            ..
        }
    ));
    assert_eq!(stack.len(), 2);
}

#[test]
fn test_error_alias() {
    let (err, _) = fail("[ ] :bad error");
    assert!(matches!(err.kind, EvalErrorKind::User { ref tag, .. } if tag.name() == "bad"));
}

#[test]
fn test_catch_if_outside_handler() {
    assert_eq!(
        eval("[ 1 ] :a :a catch-if pop-from"),
        nums(&[1.0])
    );
    let (err, stack) = fail("[ 1 ] :a :b catch-if");
    assert!(matches!(err.kind, EvalErrorKind::User { ref tag, .. } if tag.name() == "a"));
    assert!(stack.is_empty());
}

#[test]
fn test_range_protocol() {
    let stack = eval("0 2 range");
    assert!(matches!(stack[0], Value::Native(native) if native.name == "range"));
    assert_eq!(stack[1].as_stack().unwrap().to_vec(), nums(&[1.0, 2.0, 1.0]));
    assert_eq!(stack[2], Value::Number(0.0));

    assert_eq!(eval("5 5 range"), nums(&[0.0, 0.0, 0.0]));
    assert_eq!(eval("[ 1 3 3 ] range"), nums(&[0.0, 0.0, 0.0]));
}

#[test]
fn test_range_counts_down_with_negative_step() {
    assert_eq!(
        eval("for i [ -1 0 3 ] range:\n    i\n"),
        nums(&[3.0, 2.0, 1.0])
    );
}

#[test]
fn test_range_bad_state() {
    let (err, stack) = fail("[ 1 ] range");
    assert_eq!(
        err.kind,
        EvalErrorKind::Type {
            expected: "range state".to_string(),
            got: TypeTag::Stack
        }
    );
    assert_eq!(stack.len(), 1);
}

#[test]
fn test_in_does_not_mutate() {
    let stack = eval(":s [ 4 5 ] set\nfor x s in:\n    x\ns");
    assert_eq!(stack[..2], nums(&[4.0, 5.0])[..]);
    assert_eq!(stack[2].as_stack().unwrap().len(), 2);
    assert_eq!(eval("for x [ ] in:\n    x\n"), Vec::<Value>::new());
}

#[test]
fn test_stop_iter() {
    assert_eq!(eval("stop-iter"), nums(&[0.0, 0.0, 0.0]));
    assert_eq!(eval("for x stop-iter:\n    x\n1"), nums(&[1.0]));
}

#[test]
fn test_for_rejects_non_callable_iterator() {
    let (err, stack) = fail("for x 1 2 3:\n    x\n");
    assert!(matches!(err.kind, EvalErrorKind::Type { .. }));
    assert_eq!(stack, nums(&[1.0, 2.0, 3.0]));
}

#[test]
fn test_ident_count() {
    let (env, result) = run_source("(ident-count)");
    assert_eq!(result, Ok(()));
    let printed: usize = env
        .print_handler()
        .get_output()
        .trim()
        .parse()
        .unwrap();
    assert_eq!(printed, env.idents().live_count());
}
