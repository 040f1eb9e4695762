/*!
 * Syscall Numbering
 * Bidirectional map between syscall numbers and Nt* names
 */

use ahash::RandomState;
use std::collections::HashMap;

use crate::core::types::{GuestAddress, SyscallNumber};

/// Number ↔ name table for one Windows build
#[derive(Debug, Clone, Default)]
pub struct SyscallNumbering {
    by_number: HashMap<SyscallNumber, String, RandomState>,
    by_name: HashMap<String, SyscallNumber, RandomState>,
}

impl SyscallNumbering {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from explicit `(number, name)` pairs
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (SyscallNumber, S)>,
        S: Into<String>,
    {
        let mut numbering = Self::new();
        for (number, name) in pairs {
            numbering.insert(number, name.into());
        }
        numbering
    }

    /// Derive numbers from ntdll's export table
    ///
    /// The kernel assigns syscall numbers in the order the `Nt*` stubs
    /// appear in ntdll, so sorting the stubs by address (then name, for
    /// aliases sharing an address) and counting up from zero reproduces
    /// the numbering. `Ntdll*` helpers are not syscalls.
    pub fn from_exports<I, S>(exports: I) -> Self
    where
        I: IntoIterator<Item = (S, GuestAddress)>,
        S: Into<String>,
    {
        let mut stubs: Vec<(GuestAddress, String)> = exports
            .into_iter()
            .map(|(name, address)| (address, name.into()))
            .filter(|(_, name)| name.starts_with("Nt") && !name.starts_with("Ntdll"))
            .collect();
        stubs.sort();
        stubs.dedup();

        Self::from_pairs(
            stubs
                .into_iter()
                .enumerate()
                .map(|(index, (_, name))| (index as SyscallNumber, name)),
        )
    }

    /// Bind `name` to `number`, dropping any earlier binding of either
    pub fn insert(&mut self, number: SyscallNumber, name: String) {
        if let Some(previous) = self.by_number.insert(number, name.clone()) {
            self.by_name.remove(&previous);
        }
        if let Some(stale) = self.by_name.insert(name, number) {
            if stale != number {
                self.by_number.remove(&stale);
            }
        }
    }

    pub fn name(&self, number: SyscallNumber) -> Option<&str> {
        self.by_number.get(&number).map(String::as_str)
    }

    pub fn number(&self, name: &str) -> Option<SyscallNumber> {
        self.by_name.get(name).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (SyscallNumber, &str)> + '_ {
        self.by_number.iter().map(|(number, name)| (*number, name.as_str()))
    }

    pub fn len(&self) -> usize {
        self.by_number.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_number.is_empty()
    }
}
