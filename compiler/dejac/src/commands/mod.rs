//! Command handlers for the `deja` CLI.
//!
//! `run_file`, `parse_file` and `lex_file` read a file and exit the process
//! on failure. The `*_source` variants underneath do the work and return the
//! rendered diagnostic instead, which is what the tests drive.

mod debug;
mod run;

pub use debug::{lex_file, lex_source, parse_file, parse_source};
pub use run::{run_file, run_source};

/// Read a file from disk, exiting with a user-friendly error message on failure.
pub(crate) fn read_file(path: &str) -> String {
    match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            let msg = match e.kind() {
                std::io::ErrorKind::NotFound => format!("cannot find file '{path}'"),
                std::io::ErrorKind::PermissionDenied => {
                    format!("permission denied reading '{path}'")
                }
                std::io::ErrorKind::InvalidData => {
                    format!("'{path}' contains invalid UTF-8 data")
                }
                _ => format!("error reading '{path}': {e}"),
            };
            eprintln!("{msg}");
            std::process::exit(1);
        }
    }
}

/// Print a diagnostic and exit with status 1.
fn fail(message: &str) -> ! {
    eprintln!("{message}");
    std::process::exit(1);
}
