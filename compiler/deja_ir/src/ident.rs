//! Interned identifiers with a weak registry.
//!
//! An `Ident` is a shared handle to an immutable symbol. Two idents interned
//! from the same text through the same `IdentTable` are the same object, so
//! equality and hashing are by identity, not by string content.
//!
//! The table only holds weak references: an identifier lives exactly as long
//! as some value, binding or syntax reference keeps a strong handle. Dead
//! entries are replaced on the next `intern` of the same text, or dropped in
//! bulk by `prune`.

use rustc_hash::FxHashMap;
use std::cell::RefCell;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::{Rc, Weak};

struct IdentData {
    name: Box<str>,
}

/// Interned, identity-comparable symbol.
#[derive(Clone)]
pub struct Ident(Rc<IdentData>);

impl Ident {
    /// The symbol text.
    #[inline]
    pub fn name(&self) -> &str {
        &self.0.name
    }
}

impl PartialEq for Ident {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Ident {}

impl Hash for Ident {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        Rc::as_ptr(&self.0).hash(state);
    }
}

impl fmt::Debug for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ident({})", self.name())
    }
}

impl fmt::Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ":{}", self.name())
    }
}

/// Weak registry mapping symbol text to its live `Ident`.
///
/// Single-threaded: one table per evaluation environment.
#[derive(Default)]
pub struct IdentTable {
    entries: RefCell<FxHashMap<Box<str>, Weak<IdentData>>>,
}

impl IdentTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the live identifier for `name`, creating and registering one
    /// if none is alive.
    pub fn intern(&self, name: &str) -> Ident {
        let mut entries = self.entries.borrow_mut();
        if let Some(live) = entries.get(name).and_then(Weak::upgrade) {
            return Ident(live);
        }
        let data = Rc::new(IdentData { name: name.into() });
        entries.insert(name.into(), Rc::downgrade(&data));
        Ident(data)
    }

    /// Look up `name` without creating it.
    pub fn get(&self, name: &str) -> Option<Ident> {
        self.entries
            .borrow()
            .get(name)
            .and_then(Weak::upgrade)
            .map(Ident)
    }

    /// Number of identifiers still held by someone.
    pub fn live_count(&self) -> usize {
        self.entries
            .borrow()
            .values()
            .filter(|entry| entry.strong_count() > 0)
            .count()
    }

    /// Number of registry slots, including ones whose identifier has died.
    pub fn slot_count(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Drop registry entries whose identifier is no longer alive.
    pub fn prune(&self) {
        self.entries
            .borrow_mut()
            .retain(|_, entry| entry.strong_count() > 0);
    }
}

impl fmt::Debug for IdentTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdentTable")
            .field("live", &self.live_count())
            .field("slots", &self.slot_count())
            .finish()
    }
}
