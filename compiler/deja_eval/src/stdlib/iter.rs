//! Iterators for `for` loops.
//!
//! A `for` condition leaves three values: an iterator word, its state and
//! the first item. After each pass the state is pushed back and the
//! iterator called again; a falsy iterator word ends the loop, which is
//! what `stop-iter` produces.

use crate::closure::Closure;
use crate::environment::Environment;
use crate::errors::shape_error;
use crate::exec::{NativeResult, NativeWord};
use crate::value::{TypeTag, Value, ValueStack};

const RANGE: NativeWord = NativeWord::new("range", range);
const IN: NativeWord = NativeWord::new("in", in_stack);
const IN_NEXT: NativeWord = NativeWord::new("(in-next)", in_next);

pub(super) const WORDS: &[NativeWord] = &[RANGE, IN, NativeWord::new("stop-iter", stop_iter)];

fn push_stop(env: &mut Environment) {
    for _ in 0..3 {
        env.push(Value::Number(0.0));
    }
}

fn stop_iter(env: &mut Environment, _: &Closure) -> NativeResult {
    push_stop(env);
    Ok(None)
}

/// `start stop range`, resumed with the state stack `[step stop next]`.
fn range(env: &mut Environment, _: &Closure) -> NativeResult {
    let [top] = env.top::<1>()?;
    let (step, stop, current, consumed) = match &top {
        Value::Stack(state) => match state.to_vec().as_slice() {
            [step, stop, next] => (step.as_number()?, stop.as_number()?, next.as_number()?, 1),
            _ => return Err(shape_error("range state", TypeTag::Stack).into()),
        },
        _ => {
            let [start, stop] = env.top::<2>()?;
            (1.0, stop.as_number()?, start.as_number()?, 2)
        }
    };
    env.discard(consumed);

    if (step > 0.0 && current >= stop) || (step < 0.0 && current <= stop) {
        push_stop(env);
        return Ok(None);
    }
    let state = ValueStack::from_values(vec![
        Value::Number(step),
        Value::Number(stop),
        Value::Number(current + step),
    ]);
    env.push(Value::Native(RANGE));
    env.push(Value::Stack(state));
    env.push(Value::Number(current));
    Ok(None)
}

/// `stack in` yields the items bottom to top without consuming them.
fn in_stack(env: &mut Environment, _: &Closure) -> NativeResult {
    let [source] = env.top::<1>()?;
    let source = source.as_stack()?.clone();
    env.discard(1);
    yield_from(env, source, 0);
    Ok(None)
}

/// Resumes `in` with the state stack `[source index]`.
fn in_next(env: &mut Environment, _: &Closure) -> NativeResult {
    let [state] = env.top::<1>()?;
    let (source, index) = match state.as_stack()?.to_vec().as_slice() {
        [Value::Stack(source), Value::Number(index)] => (source.clone(), *index),
        _ => return Err(shape_error("iteration state", TypeTag::Stack).into()),
    };
    env.discard(1);
    // Indices are small non-negative integers stored as numbers.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let index = index as usize;
    yield_from(env, source, index);
    Ok(None)
}

fn yield_from(env: &mut Environment, source: ValueStack, index: usize) {
    let Some(item) = source.get(index) else {
        push_stop(env);
        return;
    };
    #[allow(clippy::cast_precision_loss)]
    let next = Value::Number((index + 1) as f64);
    env.push(Value::Native(IN_NEXT));
    env.push(Value::Stack(ValueStack::from_values(vec![
        Value::Stack(source),
        next,
    ])));
    env.push(item);
}
