//! First-class stacks.
//!
//! `[ 1 2 3 ]` builds a stack bottom to top: `[` leaves a marker that `]`
//! collects up to.

use crate::closure::Closure;
use crate::environment::Environment;
use crate::errors::stack_empty;
use crate::exec::{NativeResult, NativeWord};
use crate::value::{Value, ValueStack};

pub(super) const WORDS: &[NativeWord] = &[
    NativeWord::new("[]", new_stack),
    NativeWord::new("[", open),
    NativeWord::new("]", close),
    NativeWord::new("push-to", push_to),
    NativeWord::new("push-through", push_through),
    NativeWord::new("pop-from", pop_from),
    NativeWord::new("reversed", reversed),
    NativeWord::new("reversed!", reverse_in_place),
    NativeWord::new("copy-stack", copy_stack),
];

const MARKER: &str = "[";

fn new_stack(env: &mut Environment, _: &Closure) -> NativeResult {
    env.push(Value::Stack(ValueStack::new()));
    Ok(None)
}

fn open(env: &mut Environment, _: &Closure) -> NativeResult {
    let marker = env.intern(MARKER);
    env.push(Value::Ident(marker));
    Ok(None)
}

fn close(env: &mut Environment, _: &Closure) -> NativeResult {
    let marker = Value::Ident(env.intern(MARKER));
    let Some(at) = env.stack().iter().rposition(|value| *value == marker) else {
        return Err(stack_empty().into());
    };
    let items = env.split_off(at + 1);
    env.discard(1);
    env.push(Value::Stack(ValueStack::from_values(items)));
    Ok(None)
}

/// `value stack push-to`
fn push_to(env: &mut Environment, _: &Closure) -> NativeResult {
    let [value, stack] = env.top::<2>()?;
    let stack = stack.as_stack()?;
    stack.push(value);
    env.discard(2);
    Ok(None)
}

/// `value stack push-through` leaves the same stack on top.
fn push_through(env: &mut Environment, _: &Closure) -> NativeResult {
    let [value, stack] = env.top::<2>()?;
    stack.as_stack()?.push(value);
    env.discard(2);
    env.push(stack);
    Ok(None)
}

/// `stack pop-from`
fn pop_from(env: &mut Environment, _: &Closure) -> NativeResult {
    let [stack] = env.top::<1>()?;
    let item = stack.as_stack()?.pop()?;
    env.discard(1);
    env.push(item);
    Ok(None)
}

fn reversed(env: &mut Environment, _: &Closure) -> NativeResult {
    let [stack] = env.top::<1>()?;
    let copy = stack.as_stack()?.reversed();
    env.discard(1);
    env.push(Value::Stack(copy));
    Ok(None)
}

fn reverse_in_place(env: &mut Environment, _: &Closure) -> NativeResult {
    let [stack] = env.top::<1>()?;
    stack.as_stack()?.reverse_in_place();
    Ok(None)
}

fn copy_stack(env: &mut Environment, _: &Closure) -> NativeResult {
    let [stack] = env.top::<1>()?;
    let copy = stack.as_stack()?.copy();
    env.discard(1);
    env.push(Value::Stack(copy));
    Ok(None)
}
