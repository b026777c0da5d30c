//! The continuation-driven tree walk.
//!
//! Execution state is a single [`Continuation`]. Each step consumes it and
//! produces the next one; calls and `for` iterators save the caller's
//! continuation on the environment's frame stack instead of recursing on
//! the host stack, so loops and calls nest to any depth.
//!
//! Raised errors unwind by walking the syntax tree upward from the failing
//! node to the nearest enclosing `try` body, popping call frames whenever
//! the walk reaches a function boundary.

use crate::closure::{Closure, Iteration};
use crate::environment::Environment;
use crate::errors::{stack_empty, type_error, EvalError, Signal};
use crate::exec::{Continuation, Entry, Resolved, Transfer};
use crate::value::{ensure, TypeTag, Value};
use deja_ir::{Node, NodeKind, Word};
use std::rc::Rc;

type Step = Result<Option<Continuation>, Signal>;

/// Run `root` to completion in `env`.
///
/// Returns `Err(Signal::Halt)` if the program executed `return` outside of
/// any call, and `Err(Signal::Raise(..))` for an error no handler caught.
/// The evaluation stack is left as the program left it. Identifiers no
/// longer referenced once the run ends are dropped from the registry.
#[tracing::instrument(level = "debug", skip_all)]
pub fn run(env: &mut Environment, root: &Rc<Node>) -> Result<(), Signal> {
    let saved_floor = env.enter_nested();
    let mut machine = Machine { env };
    let result = machine.drive(Continuation::enter(
        root.clone(),
        Closure::root(root.clone()),
    ));
    machine.env.leave_nested(saved_floor);
    machine.env.idents().prune();
    result
}

struct Machine<'a> {
    env: &'a mut Environment,
}

impl Machine<'_> {
    fn drive(&mut self, start: Continuation) -> Result<(), Signal> {
        let mut current = Some(start);
        while let Some(cont) = current.take() {
            let node = cont.node.clone();
            let closure = cont.closure.clone();
            match self.step(cont) {
                Ok(next) => current = next,
                Err(Signal::Halt) => {
                    tracing::debug!("halted");
                    return Err(Signal::Halt);
                }
                Err(Signal::Raise(err)) => {
                    current = Some(self.unwind(err, node, closure)?);
                }
            }
        }
        Ok(())
    }

    fn step(&mut self, cont: Continuation) -> Step {
        tracing::trace!(?cont, depth = self.env.stack_len(), "step");
        match cont.entry {
            Entry::Enter => self.enter(cont.node, cont.closure),
            Entry::After => self.advance(cont.node, cont.closure),
            Entry::Iterate => self.iterate(cont.node, cont.closure),
        }
    }

    fn enter(&mut self, node: Rc<Node>, closure: Closure) -> Step {
        match node.kind() {
            NodeKind::Word(word) => match self.dispatch(word, &closure)? {
                None => self.advance(node, closure),
                Some(Transfer::Jump(target)) => Ok(Some(target)),
                Some(Transfer::Invoke(callee)) => {
                    let return_to = Continuation::after(node, closure);
                    self.invoke(&callee, return_to)
                }
            },
            NodeKind::Func { name, .. } => {
                let name = self.env.intern(name);
                let callable = Value::Closure(closure.child(node.clone()));
                self.env.define_global(name, callable);
                self.advance(node, closure)
            }
            NodeKind::LocalFunc { name, .. } => {
                let name = self.env.intern(name);
                closure.define_local(name, Value::Closure(closure.child(node.clone())));
                self.advance(node, closure)
            }
            NodeKind::Labda { .. } => {
                self.env.push(Value::Closure(closure.child(node.clone())));
                self.advance(node, closure)
            }
            _ => {
                let closure = if node.opens_scope() {
                    closure.child(node.clone())
                } else {
                    closure
                };
                match node.children().first() {
                    Some(first) => Ok(Some(Continuation::enter(first.clone(), closure))),
                    None => self.advance(node, closure),
                }
            }
        }
    }

    /// Resolve a word and either push it or report what to call.
    fn dispatch(&mut self, word: &Word, closure: &Closure) -> Result<Option<Transfer>, Signal> {
        let resolved = match word {
            Word::Number(n) => Resolved::Literal(Value::Number(*n)),
            Word::Text(s) => Resolved::Literal(Value::Text(s.clone())),
            Word::Ident(s) => Resolved::Literal(Value::Ident(self.env.intern(s))),
            Word::Name(s) => {
                let name = self.env.intern(s);
                Resolved::from(closure.resolve(&name, self.env)?)
            }
        };
        match resolved {
            Resolved::Literal(value) => {
                self.env.push(value);
                Ok(None)
            }
            Resolved::ClosureRef(callee) => Ok(Some(Transfer::Invoke(callee))),
            Resolved::NativeCallable(native) => native.call(self.env, closure),
        }
    }

    /// Call a user closure, resuming at `return_to` when it returns.
    fn invoke(&mut self, callee: &Closure, return_to: Continuation) -> Step {
        let definition = callee.node();
        let params = definition.params();
        if self.env.stack_len() < params.len() {
            return Err(stack_empty().into());
        }
        tracing::debug!(
            callee = %definition.kind().label(),
            frames = self.env.frame_depth(),
            "call"
        );

        let invocation = callee.child(definition.clone());
        for param in params {
            let value = self.env.pop()?;
            invocation.define_local(self.env.intern(param), value);
        }
        self.env.push_frame(return_to);
        match definition.body() {
            Some(body) => Ok(Some(Continuation::enter(body.clone(), invocation))),
            None => self.return_to_caller(),
        }
    }

    fn return_to_caller(&mut self) -> Step {
        match self.env.pop_frame() {
            Some(frame) => Ok(Some(frame)),
            None => Err(Signal::Halt),
        }
    }

    /// `node` has finished: find what runs next.
    fn advance(&mut self, node: Rc<Node>, closure: Closure) -> Step {
        let mut node = node;
        let mut closure = closure;
        loop {
            if node.opens_scope() && closure.is_for(&node) {
                if let Some(parent) = closure.parent() {
                    closure = parent;
                }
            }
            let Some(parent) = node.parent() else {
                return Ok(None);
            };

            match (node.kind(), parent.kind()) {
                (NodeKind::Condition, NodeKind::While | NodeKind::If | NodeKind::ElseIf) => {
                    if self.env.pop()?.truthy() {
                        if let Some(body) = parent.body() {
                            return Ok(Some(Continuation::enter(body.clone(), closure)));
                        }
                    }
                    node = parent;
                    continue;
                }
                (NodeKind::Condition, NodeKind::For { .. }) => {
                    return self.iterate(parent, closure);
                }
                (NodeKind::Body, NodeKind::For { .. }) => {
                    return self.resume_iterator(parent, closure);
                }
                (NodeKind::Body, NodeKind::While) => {
                    if let Some(condition) = parent.condition() {
                        return Ok(Some(Continuation::enter(condition.clone(), closure)));
                    }
                }
                (NodeKind::Body, NodeKind::If | NodeKind::ElseIf) => {
                    // Skip the remaining alternatives.
                    node = parent.parent().unwrap_or(parent);
                    continue;
                }
                (NodeKind::Body, _) if parent.is_callable() => {
                    return self.return_to_caller();
                }
                (NodeKind::Body, NodeKind::Catch) => {
                    node = parent;
                    continue;
                }
                _ => {}
            }

            if let Some(next) = node.next_sibling() {
                return Ok(Some(Continuation::enter(next, closure)));
            }
            node = parent;
        }
    }

    /// Iteration check: consume (iterator, state, item) and either run the
    /// body with the item bound to the counter or leave the loop.
    fn iterate(&mut self, for_node: Rc<Node>, closure: Closure) -> Step {
        let [iterator, state, item] = self.env.top::<3>()?;
        if !iterator.truthy() {
            self.env.discard(3);
            return self.advance(for_node, closure);
        }
        ensure(&iterator, &[TypeTag::Ident, TypeTag::Function])?;
        self.env.discard(3);

        if let NodeKind::For { counter } = for_node.kind() {
            closure.define_local(self.env.intern(counter), item);
        }
        closure.set_iteration(Iteration { iterator, state });
        match for_node.body() {
            Some(body) => Ok(Some(Continuation::enter(body.clone(), closure))),
            None => self.resume_iterator(for_node, closure),
        }
    }

    /// Body finished: hand the recorded state back to the iterator word.
    fn resume_iterator(&mut self, for_node: Rc<Node>, closure: Closure) -> Step {
        let Some(Iteration { iterator, state }) = closure.take_iteration() else {
            return self.advance(for_node, closure);
        };
        let iterator = match iterator {
            Value::Ident(name) => closure.resolve(&name, self.env)?,
            other => other,
        };

        match iterator {
            Value::Native(native) => {
                self.env.push(state);
                match native.call(self.env, &closure)? {
                    None => self.iterate(for_node, closure),
                    Some(Transfer::Jump(target)) => Ok(Some(target)),
                    Some(Transfer::Invoke(callee)) => {
                        self.invoke(&callee, Continuation::iterate(for_node, closure))
                    }
                }
            }
            Value::Closure(callee) => {
                self.env.push(state);
                self.invoke(&callee, Continuation::iterate(for_node, closure))
            }
            other => Err(type_error(&[TypeTag::Function], other.type_tag()).into()),
        }
    }

    /// Transfer control to the handler of the nearest enclosing `try`.
    fn unwind(&mut self, err: EvalError, node: Rc<Node>, closure: Closure) -> Result<Continuation, Signal> {
        let err = err.with_span(node.span());
        tracing::debug!(error = %err, span = ?err.span, "unwinding");

        let mut node = node;
        let mut closure = closure;
        loop {
            if let Some(catch) = enclosing_catch(&node) {
                let Some(handler) = catch.handler().cloned() else {
                    return Err(Signal::Raise(err));
                };
                let closure = settle(closure, &catch);
                self.env.push(Value::Stack(err.payload()));
                self.env.push(Value::Ident(err.tag(self.env.idents())));
                closure.set_handling(err);
                return Ok(Continuation::enter(handler, closure));
            }
            match self.env.pop_frame() {
                Some(frame) => {
                    node = frame.node;
                    closure = frame.closure;
                }
                None => return Err(Signal::Raise(err)),
            }
        }
    }
}

/// The `Catch` whose body contains `node`, searching up to the enclosing
/// function or lambda.
fn enclosing_catch(node: &Rc<Node>) -> Option<Rc<Node>> {
    let mut current = node.clone();
    loop {
        let parent = current.parent()?;
        if matches!(current.kind(), NodeKind::Body) && matches!(parent.kind(), NodeKind::Catch) {
            return Some(parent);
        }
        if parent.is_callable() {
            return None;
        }
        current = parent;
    }
}

/// Climb from `closure` to the scope opened for `catch`.
fn settle(closure: Closure, catch: &Rc<Node>) -> Closure {
    let mut current = closure.clone();
    loop {
        if current.is_for(catch) {
            return current;
        }
        match current.parent() {
            Some(parent) => current = parent,
            None => return closure.child(catch.clone()),
        }
    }
}
