//! Deja Vu evaluator.
//!
//! A tree-walking interpreter driven by explicit continuations:
//!
//! - [`Environment`]: global words, the evaluation stack and call frames
//! - [`Closure`]: lexical scopes chained to their parents
//! - [`machine::run`]: the step loop, including error unwinding
//! - [`stdlib`]: built-in words, installed through a [`WordTable`]
//!
//! Programs come from `deja_parse::parse`; [`evaluate`] runs one and
//! reports an uncaught error through the environment's print handler.

mod closure;
mod environment;
pub mod errors;
mod exec;
mod loader;
pub mod machine;
mod print_handler;
pub mod stdlib;
mod value;

pub use closure::{Closure, Iteration, LocalScope};
pub use environment::Environment;
pub use errors::{EvalError, EvalErrorKind, Signal};
pub use exec::{Continuation, Entry, NativeFn, NativeResult, NativeWord, Resolved, Transfer};
pub use loader::{MemoryLoader, SourceLoader};
pub use print_handler::{
    buffer_handler, stdout_handler, BufferPrintHandler, PrintHandlerImpl,
    SharedPrintHandler,
};
pub use stdlib::{builtins, WordTable};
pub use value::{ensure, TypeTag, Value, ValueStack};

use deja_ir::Node;
use std::rc::Rc;

/// Run `root` to completion and hand back the environment.
///
/// A fresh environment with the standard words is created if none is
/// given. `return` at the top level stops silently; an uncaught error is
/// reported on the print handler's error channel and stops the run.
pub fn evaluate(root: &Rc<Node>, env: Option<Environment>) -> Environment {
    let mut env = env.unwrap_or_else(|| Environment::new(&builtins()));
    match machine::run(&mut env, root) {
        Ok(()) | Err(Signal::Halt) => {}
        Err(Signal::Raise(err)) => {
            let report = err.report(env.idents());
            env.print_handler().eprintln(&report);
        }
    }
    env
}
