//! Calls, errors and modules.

use crate::closure::Closure;
use crate::environment::Environment;
use crate::errors::{user_error, Signal};
use crate::exec::{NativeResult, NativeWord, Transfer};
use crate::machine;
use crate::value::{ensure, TypeTag, Value};

pub(super) const WORDS: &[NativeWord] = &[
    NativeWord::new("call", call),
    NativeWord::new("return", return_),
    NativeWord::new("raise", raise),
    NativeWord::new("error", raise),
    NativeWord::new("catch-if", catch_if),
    NativeWord::new("use", use_module),
    NativeWord::new("(ident-count)", ident_count),
];

/// `callable call`, where an identifier is resolved first.
fn call(env: &mut Environment, closure: &Closure) -> NativeResult {
    let [target] = env.top::<1>()?;
    ensure(&target, &[TypeTag::Ident, TypeTag::Function])?;
    let target = match target {
        Value::Ident(name) => closure.resolve(&name, env)?,
        other => other,
    };
    env.discard(1);
    match target {
        Value::Closure(callee) => Ok(Some(Transfer::Invoke(callee))),
        Value::Native(native) => native.call(env, closure),
        other => {
            env.push(other);
            Ok(None)
        }
    }
}

fn return_(env: &mut Environment, _: &Closure) -> NativeResult {
    match env.pop_frame() {
        Some(frame) => Ok(Some(Transfer::Jump(frame))),
        None => Err(Signal::Halt),
    }
}

/// `payload :tag raise`
fn raise(env: &mut Environment, _: &Closure) -> NativeResult {
    let [payload, tag] = env.top::<2>()?;
    let payload = payload.as_stack()?.clone();
    let tag = tag.as_ident()?.clone();
    env.discard(2);
    Err(user_error(tag, payload).into())
}

/// `payload :actual :expected catch-if`
///
/// Leaves the payload if the tags match. Otherwise the error being handled
/// is raised again as it was caught; outside a handler a user error with
/// the given tag and payload is raised.
fn catch_if(env: &mut Environment, closure: &Closure) -> NativeResult {
    let [payload, actual, expected] = env.top::<3>()?;
    let expected = expected.as_ident()?.clone();
    let actual = actual.as_ident()?.clone();
    let payload = payload.as_stack()?.clone();
    env.discard(3);
    if actual != expected {
        let err = match closure.handling() {
            Some(caught) if caught.tag(env.idents()) == actual => caught,
            _ => user_error(actual, payload),
        };
        return Err(err.into());
    }
    env.push(Value::Stack(payload));
    Ok(None)
}

/// `"path" use` runs a source unit once per environment.
fn use_module(env: &mut Environment, _: &Closure) -> NativeResult {
    let [path] = env.top::<1>()?;
    let path = path.as_text()?.clone();
    let root = env.load(&path)?;
    env.discard(1);
    let Some(root) = root else {
        return Ok(None);
    };
    match machine::run(env, &root) {
        // `return` at a module's top level only ends that module.
        Ok(()) | Err(Signal::Halt) => Ok(None),
        Err(err) => Err(err),
    }
}

fn ident_count(env: &mut Environment, _: &Closure) -> NativeResult {
    let count = env.idents().live_count();
    env.print_handler().println(&count.to_string());
    Ok(None)
}
