//! Comparison, logic and arithmetic.
//!
//! Numbers are doubles; `/` is true division and `%` keeps the sign of the
//! dividend. Comparisons and `not`/`xor` answer 1 or 0, while `and` and
//! `or` answer one of their operands.

use crate::closure::Closure;
use crate::environment::Environment;
use crate::errors::{division_by_zero, EvalError};
use crate::exec::{NativeResult, NativeWord};
use crate::value::Value;

pub(super) const WORDS: &[NativeWord] = &[
    NativeWord::new("=", equal),
    NativeWord::new("equal", equal),
    NativeWord::new("!=", not_equal),
    NativeWord::new("not-equal", not_equal),
    NativeWord::new("<", less),
    NativeWord::new("less", less),
    NativeWord::new("<=", less_or_equal),
    NativeWord::new("less-or-equal", less_or_equal),
    NativeWord::new(">", greater),
    NativeWord::new("greater", greater),
    NativeWord::new(">=", greater_or_equal),
    NativeWord::new("greater-or-equal", greater_or_equal),
    NativeWord::new("not", not),
    NativeWord::new("and", and),
    NativeWord::new("or", or),
    NativeWord::new("xor", xor),
    NativeWord::new("+", add),
    NativeWord::new("add", add),
    NativeWord::new("-", sub),
    NativeWord::new("sub", sub),
    NativeWord::new("*", mul),
    NativeWord::new("mul", mul),
    NativeWord::new("/", div),
    NativeWord::new("div", div),
    NativeWord::new("%", rem),
    NativeWord::new("mod", rem),
];

/// Replace the top two values with `op(second, top)`.
fn binary(env: &mut Environment, op: impl FnOnce(Value, Value) -> Result<Value, EvalError>) -> NativeResult {
    let [a, b] = env.top::<2>()?;
    let result = op(a, b)?;
    env.discard(2);
    env.push(result);
    Ok(None)
}

fn numeric(env: &mut Environment, op: impl FnOnce(f64, f64) -> Result<Value, EvalError>) -> NativeResult {
    binary(env, |a, b| op(a.as_number()?, b.as_number()?))
}

fn equal(env: &mut Environment, _: &Closure) -> NativeResult {
    binary(env, |a, b| Ok(Value::bool(a == b)))
}

fn not_equal(env: &mut Environment, _: &Closure) -> NativeResult {
    binary(env, |a, b| Ok(Value::bool(a != b)))
}

fn less(env: &mut Environment, _: &Closure) -> NativeResult {
    numeric(env, |a, b| Ok(Value::bool(a < b)))
}

fn less_or_equal(env: &mut Environment, _: &Closure) -> NativeResult {
    numeric(env, |a, b| Ok(Value::bool(a <= b)))
}

fn greater(env: &mut Environment, _: &Closure) -> NativeResult {
    numeric(env, |a, b| Ok(Value::bool(a > b)))
}

fn greater_or_equal(env: &mut Environment, _: &Closure) -> NativeResult {
    numeric(env, |a, b| Ok(Value::bool(a >= b)))
}

fn not(env: &mut Environment, _: &Closure) -> NativeResult {
    let value = env.pop()?;
    env.push(Value::bool(!value.truthy()));
    Ok(None)
}

fn and(env: &mut Environment, _: &Closure) -> NativeResult {
    binary(env, |a, b| Ok(if a.truthy() { b } else { a }))
}

fn or(env: &mut Environment, _: &Closure) -> NativeResult {
    binary(env, |a, b| Ok(if a.truthy() { a } else { b }))
}

fn xor(env: &mut Environment, _: &Closure) -> NativeResult {
    binary(env, |a, b| Ok(Value::bool(a.truthy() != b.truthy())))
}

fn add(env: &mut Environment, _: &Closure) -> NativeResult {
    numeric(env, |a, b| Ok(Value::Number(a + b)))
}

fn sub(env: &mut Environment, _: &Closure) -> NativeResult {
    numeric(env, |a, b| Ok(Value::Number(a - b)))
}

fn mul(env: &mut Environment, _: &Closure) -> NativeResult {
    numeric(env, |a, b| Ok(Value::Number(a * b)))
}

fn div(env: &mut Environment, _: &Closure) -> NativeResult {
    numeric(env, |a, b| {
        if b == 0.0 {
            return Err(division_by_zero());
        }
        Ok(Value::Number(a / b))
    })
}

fn rem(env: &mut Environment, _: &Closure) -> NativeResult {
    numeric(env, |a, b| {
        if b == 0.0 {
            return Err(division_by_zero());
        }
        Ok(Value::Number(a % b))
    })
}
