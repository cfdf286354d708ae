//! Join registry
//!
//! Collects the association joins of one descriptor level, keyed by alias.
//! An alias appears at most once: a selected association owns its entry, and a
//! computed column that reads through an association reuses that entry or gets
//! a column-support join with an empty projection.

use super::descriptor::JoinEntry;
use super::errors::CompileError;

#[derive(Debug, Default)]
pub struct JoinRegistry {
    entries: Vec<JoinEntry>,
}

impl JoinRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, alias: &str) -> Option<&JoinEntry> {
        self.entries.iter().find(|j| j.alias == alias)
    }

    pub fn contains(&self, alias: &str) -> bool {
        self.get(alias).is_some()
    }

    /// Register a join compiled from a selected association
    pub fn attach(&mut self, entry: JoinEntry) -> Result<(), CompileError> {
        if self.contains(&entry.alias) {
            return Err(CompileError::ConflictingJoin { alias: entry.alias });
        }
        self.entries.push(entry);
        Ok(())
    }

    /// Make sure `alias` is joined so a computed column can read through it.
    ///
    /// Returns `true` when a column-support join had to be synthesized.
    pub fn ensure_column_support(&mut self, model: &str, alias: &str) -> bool {
        if self.contains(alias) {
            return false;
        }
        log::debug!("synthesizing join `{}` ({}) for a computed column", alias, model);
        self.entries.push(JoinEntry::column_support(model, alias));
        true
    }

    pub fn into_entries(self) -> Vec<JoinEntry> {
        self.entries
    }
}
