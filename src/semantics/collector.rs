// src/semantics/collector.rs

use super::const_walker::ConstBlockWalker;
use crate::ast::{DeclKeyword, Declaration, GenDecl, SourceFile, Spec};
use crate::error::EvalError;
use std::collections::{BTreeSet, HashMap};
use tracing::debug;

/// Where a constant was declared: the index of its file in the parse order,
/// then the byte offset inside that file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub unit: usize,
    pub offset: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub name: String,
    pub value: i64,
    pub position: Position,
}

/// Entries keyed by constant name. Storage is unordered; use [`EntrySet::ordered`]
/// for declaration order.
#[derive(Debug, Default, Clone)]
pub struct EntrySet {
    entries: HashMap<String, Entry>,
}

impl EntrySet {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Entry> {
        self.entries.get(name)
    }

    /// Entries sorted by declaration position.
    pub fn ordered(&self) -> Vec<&Entry> {
        let mut ordered: Vec<&Entry> = self.entries.values().collect();
        ordered.sort_by_key(|entry| entry.position);
        ordered
    }

    pub fn distinct_values(&self) -> BTreeSet<i64> {
        self.entries.values().map(|entry| entry.value).collect()
    }

    fn insert(&mut self, entry: Entry) {
        self.entries.insert(entry.name.clone(), entry);
    }
}

/// Gathers the constants of one enum type across all parsed files.
pub struct EntryCollector<'a> {
    prefix: &'a str,
}

impl<'a> EntryCollector<'a> {
    pub fn new(prefix: &'a str) -> Self {
        EntryCollector { prefix }
    }

    pub fn collect(&self, units: &[SourceFile]) -> Result<EntrySet, EvalError> {
        let mut set = EntrySet::default();

        for (unit, file) in units.iter().enumerate() {
            for Declaration::Gen(decl) in &file.declarations {
                if decl.keyword != DeclKeyword::Const || !self.mentions_prefix(decl) {
                    continue;
                }
                for resolved in ConstBlockWalker::new().walk(decl)? {
                    if !resolved.name.starts_with(self.prefix) {
                        continue;
                    }
                    set.insert(Entry {
                        name: resolved.name,
                        value: resolved.value,
                        position: Position {
                            unit,
                            offset: resolved.offset,
                        },
                    });
                }
            }
        }

        if set.is_empty() {
            return Err(EvalError::NoEntriesFound {
                prefix: self.prefix.to_string(),
            });
        }
        debug!(prefix = self.prefix, count = set.len(), "collected entries");
        Ok(set)
    }

    // Blocks without a single matching name are never evaluated, so an
    // unrelated `5 * time.Second` elsewhere in the package cannot fail us.
    fn mentions_prefix(&self, decl: &GenDecl) -> bool {
        decl.specs.iter().any(|spec| match spec {
            Spec::Value(line) => line.names.iter().any(|name| name.name.starts_with(self.prefix)),
            _ => false,
        })
    }
}
