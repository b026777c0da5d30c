//! Stack shuffling, output and bindings.

use crate::closure::Closure;
use crate::environment::Environment;
use crate::errors::EvalErrorKind;
use crate::exec::{NativeResult, NativeWord};
use crate::value::Value;

pub(super) const WORDS: &[NativeWord] = &[
    NativeWord::new(".", print),
    NativeWord::new("(print-stack)", print_stack),
    NativeWord::new("dup", dup),
    NativeWord::new("drop", drop_top),
    NativeWord::new("swap", swap),
    NativeWord::new("get", get),
    NativeWord::new("getglobal", getglobal),
    NativeWord::new("set", set),
    NativeWord::new("setglobal", setglobal),
    NativeWord::new("local", local),
    NativeWord::new("type", type_of),
];

fn print(env: &mut Environment, _: &Closure) -> NativeResult {
    let value = env.pop()?;
    env.print_handler().println(&value.to_string());
    Ok(None)
}

/// Prints the evaluation stack bottom to top.
fn print_stack(env: &mut Environment, _: &Closure) -> NativeResult {
    let mut line = String::from("[");
    for value in env.stack() {
        line.push(' ');
        line.push_str(&value.repr());
    }
    line.push_str(" ]");
    env.print_handler().println(&line);
    Ok(None)
}

fn dup(env: &mut Environment, _: &Closure) -> NativeResult {
    let [top] = env.top::<1>()?;
    env.push(top);
    Ok(None)
}

fn drop_top(env: &mut Environment, _: &Closure) -> NativeResult {
    env.pop()?;
    Ok(None)
}

fn swap(env: &mut Environment, _: &Closure) -> NativeResult {
    let [a, b] = env.top::<2>()?;
    env.discard(2);
    env.push(b);
    env.push(a);
    Ok(None)
}

/// `:name get`
fn get(env: &mut Environment, closure: &Closure) -> NativeResult {
    let [name] = env.top::<1>()?;
    let value = closure.resolve(name.as_ident()?, env)?;
    env.discard(1);
    env.push(value);
    Ok(None)
}

/// `:name getglobal`
fn getglobal(env: &mut Environment, _: &Closure) -> NativeResult {
    let [name] = env.top::<1>()?;
    let value = env.lookup_global(name.as_ident()?)?;
    env.discard(1);
    env.push(value);
    Ok(None)
}

/// `:name value set`
fn set(env: &mut Environment, closure: &Closure) -> NativeResult {
    let [name, value] = env.top::<2>()?;
    let name = name.as_ident()?.clone();
    env.discard(2);
    closure.assign(name, value, env);
    Ok(None)
}

/// `:name value setglobal`
fn setglobal(env: &mut Environment, _: &Closure) -> NativeResult {
    let [name, value] = env.top::<2>()?;
    let name = name.as_ident()?.clone();
    env.discard(2);
    env.define_global(name, value);
    Ok(None)
}

/// `:name value local`
fn local(env: &mut Environment, closure: &Closure) -> NativeResult {
    let [name, value] = env.top::<2>()?;
    let name = name.as_ident()?.clone();
    env.discard(2);
    closure.define_local(name, value);
    Ok(None)
}

/// `:name type` pushes the type of the bound value, or `:nil`.
fn type_of(env: &mut Environment, closure: &Closure) -> NativeResult {
    let [name] = env.top::<1>()?;
    let tag = match closure.resolve(name.as_ident()?, env) {
        Ok(value) => value.type_tag().name(),
        Err(err) if matches!(err.kind, EvalErrorKind::Name { .. }) => "nil",
        Err(err) => return Err(err.into()),
    };
    let tag = env.intern(tag);
    env.discard(1);
    env.push(Value::Ident(tag));
    Ok(None)
}
