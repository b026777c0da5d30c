//! The per-run evaluation environment.
//!
//! Owns the global word table, the evaluation stack and the frame stack of
//! suspended continuations. Nested runs (`use`) share all three but get
//! their own frame floor: frames below it belong to the outer run and are
//! never popped by the nested one.

use crate::errors::{io_error, name_error, stack_empty, EvalError};
use crate::exec::Continuation;
use crate::loader::SourceLoader;
use crate::print_handler::{stdout_handler, SharedPrintHandler};
use crate::stdlib::WordTable;
use crate::value::Value;
use deja_ir::{Ident, IdentTable, Node};
use rustc_hash::{FxHashMap, FxHashSet};
use std::rc::Rc;

pub struct Environment {
    idents: IdentTable,
    globals: FxHashMap<Ident, Value>,
    stack: Vec<Value>,
    frames: Vec<Continuation>,
    frame_floor: usize,
    print_handler: SharedPrintHandler,
    loader: Option<Box<dyn SourceLoader>>,
    used: FxHashSet<String>,
}

impl Environment {
    /// Create an environment whose globals are the words of `words`.
    pub fn new(words: &WordTable) -> Self {
        let idents = IdentTable::new();
        let globals = words
            .iter()
            .map(|(name, value)| (idents.intern(name), value.clone()))
            .collect();
        Environment {
            idents,
            globals,
            stack: Vec::new(),
            frames: Vec::new(),
            frame_floor: 0,
            print_handler: stdout_handler(),
            loader: None,
            used: FxHashSet::default(),
        }
    }

    #[must_use]
    pub fn with_print_handler(mut self, handler: SharedPrintHandler) -> Self {
        self.print_handler = handler;
        self
    }

    #[must_use]
    pub fn with_loader(mut self, loader: Box<dyn SourceLoader>) -> Self {
        self.loader = Some(loader);
        self
    }

    pub fn print_handler(&self) -> &SharedPrintHandler {
        &self.print_handler
    }

    // Identifiers and globals

    #[inline]
    pub fn intern(&self, name: &str) -> Ident {
        self.idents.intern(name)
    }

    pub fn idents(&self) -> &IdentTable {
        &self.idents
    }

    pub fn lookup_global(&self, name: &Ident) -> Result<Value, EvalError> {
        self.globals
            .get(name)
            .cloned()
            .ok_or_else(|| name_error(name.name()))
    }

    pub fn define_global(&mut self, name: Ident, value: Value) {
        self.globals.insert(name, value);
    }

    // Evaluation stack

    #[inline]
    pub fn push(&mut self, value: Value) {
        self.stack.push(value);
    }

    /// Pop the top value; an empty stack is left untouched.
    pub fn pop(&mut self) -> Result<Value, EvalError> {
        self.stack.pop().ok_or_else(stack_empty)
    }

    /// Copies of the top `N` values, deepest first, without popping them.
    pub fn top<const N: usize>(&self) -> Result<[Value; N], EvalError> {
        let len = self.stack.len();
        if len < N {
            return Err(stack_empty());
        }
        let base = len - N;
        Ok(std::array::from_fn(|i| self.stack[base + i].clone()))
    }

    /// Drop the top `n` values (fewer if the stack is shorter).
    pub fn discard(&mut self, n: usize) {
        let keep = self.stack.len().saturating_sub(n);
        self.stack.truncate(keep);
    }

    /// Remove and return every value from `at` upward.
    pub fn split_off(&mut self, at: usize) -> Vec<Value> {
        let at = at.min(self.stack.len());
        self.stack.split_off(at)
    }

    /// Values bottom to top.
    pub fn stack(&self) -> &[Value] {
        &self.stack
    }

    pub fn stack_len(&self) -> usize {
        self.stack.len()
    }

    // Frames

    pub fn push_frame(&mut self, frame: Continuation) {
        self.frames.push(frame);
    }

    /// Pop the most recent frame of the current run.
    pub fn pop_frame(&mut self) -> Option<Continuation> {
        if self.frames.len() > self.frame_floor {
            self.frames.pop()
        } else {
            None
        }
    }

    /// Frames belonging to the current run.
    pub fn frame_depth(&self) -> usize {
        self.frames.len() - self.frame_floor
    }

    /// Start a nested run; returns the floor to restore.
    pub(crate) fn enter_nested(&mut self) -> usize {
        std::mem::replace(&mut self.frame_floor, self.frames.len())
    }

    /// End a nested run, dropping any frames it left behind.
    pub(crate) fn leave_nested(&mut self, saved_floor: usize) {
        self.frames.truncate(self.frame_floor);
        self.frame_floor = saved_floor;
    }

    // Modules

    /// Load and parse `path` unless this environment already used it.
    pub fn load(&mut self, path: &str) -> Result<Option<Rc<Node>>, EvalError> {
        if self.used.contains(path) {
            return Ok(None);
        }
        let Some(loader) = self.loader.as_ref() else {
            return Err(io_error(path, "no source loader configured"));
        };
        let source = loader.load(path).map_err(|err| io_error(path, err))?;
        let root = deja_parse::parse(&source).map_err(|err| io_error(path, err))?;
        self.used.insert(path.to_string());
        tracing::debug!(path, "loaded module");
        Ok(Some(root))
    }
}
