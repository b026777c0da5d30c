//! Built-in words.
//!
//! Words are postfix: a word's last argument is on top of the stack, so
//! `7 2 -` computes `7 - 2`. Every native checks its inputs with
//! [`Environment::top`] before discarding them.

mod basic;
mod control;
mod iter;
mod ops;
mod stacks;

use crate::exec::NativeWord;
use crate::value::Value;

/// Named values installed as globals of a new environment.
#[derive(Clone, Default)]
pub struct WordTable {
    entries: Vec<(&'static str, Value)>,
}

impl WordTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a word.
    pub fn insert(&mut self, name: &'static str, value: Value) {
        match self.entries.iter_mut().find(|(existing, _)| *existing == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn add_natives(&mut self, words: &[NativeWord]) {
        for word in words {
            self.insert(word.name, Value::Native(*word));
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &Value)> {
        self.entries.iter().map(|(name, value)| (*name, value))
    }
}

/// The standard word table.
pub fn builtins() -> WordTable {
    let mut table = WordTable::new();
    table.add_natives(basic::WORDS);
    table.add_natives(ops::WORDS);
    table.add_natives(stacks::WORDS);
    table.add_natives(control::WORDS);
    table.add_natives(iter::WORDS);
    table.insert("true", Value::bool(true));
    table.insert("false", Value::bool(false));
    table
}

#[cfg(test)]
mod tests;
