//! The `run` command: parse and evaluate a Deja Vu source file.

use deja_eval::{builtins, machine, Environment, Signal};
use std::path::Path;

use super::{fail, read_file};
use crate::{location, FileLoader};

/// Run a source file with the standard words, printing to stdout.
///
/// `use` paths resolve relative to the file's directory.
pub fn run_file(path: &str) {
    let content = read_file(path);
    let mut env = Environment::new(&builtins())
        .with_loader(Box::new(FileLoader::beside(Path::new(path))));
    if let Err(message) = run_source(path, &content, &mut env) {
        fail(&message);
    }
}

/// Parse and evaluate `source` in `env`.
///
/// A top-level `return` counts as success. Parse errors and uncaught
/// errors come back rendered as `path:line:col: message`.
#[tracing::instrument(level = "debug", skip(source, env))]
pub fn run_source(path: &str, source: &str, env: &mut Environment) -> Result<(), String> {
    let root = deja_parse::parse(source).map_err(|err| {
        format!("{}: error: {err}", location(path, source, Some(err.span)))
    })?;

    match machine::run(env, &root) {
        Ok(()) | Err(Signal::Halt) => Ok(()),
        Err(Signal::Raise(err)) => Err(format!(
            "{}: uncaught {}",
            location(path, source, err.span),
            err.report(env.idents())
        )),
    }
}
