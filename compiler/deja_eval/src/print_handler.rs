//! Output destinations for `.` and error reports.
//!
//! Enum dispatch over stdout and a capture buffer (tests, embedders).

use parking_lot::Mutex;
use std::sync::Arc;

/// Captures output and error reports in memory.
#[derive(Default)]
pub struct BufferPrintHandler {
    output: Mutex<String>,
    errors: Mutex<String>,
}

impl BufferPrintHandler {
    pub fn new() -> Self {
        Self::default()
    }

    fn println(&self, msg: &str) {
        let mut buf = self.output.lock();
        buf.push_str(msg);
        buf.push('\n');
    }

    fn eprintln(&self, msg: &str) {
        let mut buf = self.errors.lock();
        buf.push_str(msg);
        buf.push('\n');
    }
}

/// Where printed values go.
pub enum PrintHandlerImpl {
    /// Output to stdout, reports to stderr.
    Stdout,
    /// Capture both.
    Buffer(BufferPrintHandler),
}

impl PrintHandlerImpl {
    /// Print a line of program output.
    pub fn println(&self, msg: &str) {
        match self {
            Self::Stdout => println!("{msg}"),
            Self::Buffer(h) => h.println(msg),
        }
    }

    /// Report an error line.
    pub fn eprintln(&self, msg: &str) {
        match self {
            Self::Stdout => eprintln!("{msg}"),
            Self::Buffer(h) => h.eprintln(msg),
        }
    }

    /// Captured program output; empty for handlers that don't capture.
    pub fn get_output(&self) -> String {
        match self {
            Self::Buffer(h) => h.output.lock().clone(),
            Self::Stdout => String::new(),
        }
    }

    /// Captured error reports; empty for handlers that don't capture.
    pub fn get_errors(&self) -> String {
        match self {
            Self::Buffer(h) => h.errors.lock().clone(),
            Self::Stdout => String::new(),
        }
    }

    pub fn clear(&self) {
        if let Self::Buffer(h) = self {
            h.output.lock().clear();
            h.errors.lock().clear();
        }
    }
}

/// Print handler shared between an environment and its owner.
pub type SharedPrintHandler = Arc<PrintHandlerImpl>;

pub fn stdout_handler() -> SharedPrintHandler {
    Arc::new(PrintHandlerImpl::Stdout)
}

pub fn buffer_handler() -> SharedPrintHandler {
    Arc::new(PrintHandlerImpl::Buffer(BufferPrintHandler::new()))
}
