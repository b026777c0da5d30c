//! Lexical closures.
//!
//! A closure is the scope a piece of code runs in: its own bindings, the
//! syntax node it was created for, and a parent closure consulted when a
//! name is not bound locally. The outermost fallback is the environment's
//! global table.
//!
//! Closures are created for the program root, for every compound statement
//! entered, for every function and lambda definition reached (the callable
//! itself), and for every invocation of a callable.

use crate::environment::Environment;
use crate::errors::EvalError;
use crate::value::Value;
use deja_ir::{Ident, Node, NodeKind};
use rustc_hash::FxHashMap;
use std::cell::RefCell;
use std::fmt;
use std::ops::Deref;
use std::rc::Rc;

/// Single-threaded shared cell for scope data.
///
/// All scope allocations go through [`LocalScope::new`].
#[repr(transparent)]
pub struct LocalScope<T>(Rc<RefCell<T>>);

impl<T> LocalScope<T> {
    #[inline]
    pub fn new(value: T) -> Self {
        LocalScope(Rc::new(RefCell::new(value)))
    }

    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl<T> Clone for LocalScope<T> {
    #[inline]
    fn clone(&self) -> Self {
        LocalScope(Rc::clone(&self.0))
    }
}

impl<T> Deref for LocalScope<T> {
    type Target = RefCell<T>;

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Iterator word and state recorded by a running `for` loop.
#[derive(Clone, Debug)]
pub struct Iteration {
    pub iterator: Value,
    pub state: Value,
}

/// Scope data behind a [`Closure`].
pub struct Scope {
    node: Rc<Node>,
    parent: Option<Closure>,
    bindings: FxHashMap<Ident, Value>,
    /// Set while the `for` loop this scope was opened for is running.
    iteration: Option<Iteration>,
    /// The error whose handler runs in this scope.
    handling: Option<EvalError>,
}

/// Handle to a lexical scope.
#[derive(Clone)]
pub struct Closure(LocalScope<Scope>);

impl Closure {
    /// Closure for a program root.
    pub fn root(node: Rc<Node>) -> Self {
        Closure::with_parent(node, None)
    }

    fn with_parent(node: Rc<Node>, parent: Option<Closure>) -> Self {
        Closure(LocalScope::new(Scope {
            node,
            parent,
            bindings: FxHashMap::default(),
            iteration: None,
            handling: None,
        }))
    }

    /// A fresh closure for `node` nested in this one.
    #[must_use]
    pub fn child(&self, node: Rc<Node>) -> Closure {
        Closure::with_parent(node, Some(self.clone()))
    }

    pub fn node(&self) -> Rc<Node> {
        self.0.borrow().node.clone()
    }

    /// Whether this closure was created for exactly `node`.
    pub fn is_for(&self, node: &Rc<Node>) -> bool {
        Rc::ptr_eq(&self.0.borrow().node, node)
    }

    pub fn parent(&self) -> Option<Closure> {
        self.0.borrow().parent.clone()
    }

    /// Name of the function this closure was created for, if any.
    pub fn name(&self) -> Option<Rc<str>> {
        match self.0.borrow().node.kind() {
            NodeKind::Func { name, .. } | NodeKind::LocalFunc { name, .. } => Some(name.clone()),
            _ => None,
        }
    }

    #[inline]
    pub fn ptr_eq(&self, other: &Closure) -> bool {
        self.0.ptr_eq(&other.0)
    }

    /// Own binding of `name`, ignoring parents.
    pub fn local(&self, name: &Ident) -> Option<Value> {
        self.0.borrow().bindings.get(name).cloned()
    }

    /// Look `name` up in this closure, its parents, then the globals.
    pub fn resolve(&self, name: &Ident, env: &Environment) -> Result<Value, EvalError> {
        let mut scope = Some(self.clone());
        while let Some(current) = scope {
            if let Some(value) = current.local(name) {
                return Ok(value);
            }
            scope = current.parent();
        }
        env.lookup_global(name)
    }

    /// Rebind `name` in the innermost scope that binds it, or globally if
    /// none does.
    pub fn assign(&self, name: Ident, value: Value, env: &mut Environment) {
        let mut scope = Some(self.clone());
        while let Some(current) = scope {
            {
                let mut inner = current.0.borrow_mut();
                if let Some(slot) = inner.bindings.get_mut(&name) {
                    *slot = value;
                    return;
                }
            }
            scope = current.parent();
        }
        env.define_global(name, value);
    }

    /// Bind `name` in this closure's own locals.
    pub fn define_local(&self, name: Ident, value: Value) {
        self.0.borrow_mut().bindings.insert(name, value);
    }

    pub fn set_iteration(&self, iteration: Iteration) {
        self.0.borrow_mut().iteration = Some(iteration);
    }

    pub fn take_iteration(&self) -> Option<Iteration> {
        self.0.borrow_mut().iteration.take()
    }

    /// Record the error a `catch` handler opened in this scope is handling.
    pub fn set_handling(&self, err: EvalError) {
        self.0.borrow_mut().handling = Some(err);
    }

    /// The error being handled by the nearest enclosing handler.
    pub fn handling(&self) -> Option<EvalError> {
        let mut scope = Some(self.clone());
        while let Some(current) = scope {
            if let Some(err) = current.0.borrow().handling.clone() {
                return Some(err);
            }
            scope = current.parent();
        }
        None
    }
}

impl fmt::Debug for Closure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scope = self.0.borrow();
        f.debug_struct("Closure")
            .field("node", &scope.node.kind().label())
            .field("locals", &scope.bindings.len())
            .field("has_parent", &scope.parent.is_some())
            .finish()
    }
}
