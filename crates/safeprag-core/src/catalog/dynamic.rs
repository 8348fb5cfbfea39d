use crate::error::SafepragError;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Which user-extendable list a [`DynamicCatalog`] holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    Status,
    Pest,
    ServiceType,
}

impl EntryKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            EntryKind::Status => "status",
            EntryKind::Pest => "pest",
            EntryKind::ServiceType => "service type",
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Case-insensitive entry equality, Unicode aware ("LÂMPADA" == "lâmpada").
pub fn same_entry(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}

/// A catalog list that starts from defaults and accepts user additions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DynamicCatalog {
    kind: EntryKind,
    defaults: Vec<String>,
    added: Vec<String>,
}

impl DynamicCatalog {
    pub fn new(kind: EntryKind, defaults: Vec<String>) -> Self {
        DynamicCatalog {
            kind,
            defaults,
            added: Vec::new(),
        }
    }

    pub fn kind(&self) -> EntryKind {
        self.kind
    }

    /// Defaults followed by user additions.
    pub fn entries(&self) -> impl Iterator<Item = &String> {
        self.defaults.iter().chain(self.added.iter())
    }

    pub fn added(&self) -> &[String] {
        &self.added
    }

    pub fn contains(&self, value: &str) -> bool {
        self.entries().any(|e| same_entry(e, value))
    }

    /// Add a custom entry, returning the stored (trimmed) value.
    pub fn add(&mut self, value: &str) -> Result<&str, SafepragError> {
        let value = value.trim();
        if value.is_empty() {
            return Err(SafepragError::EmptyEntry {
                kind: self.kind.as_str(),
            });
        }
        if self.contains(value) {
            return Err(SafepragError::DuplicateEntry {
                kind: self.kind.as_str(),
                value: value.to_string(),
            });
        }
        debug!(kind = %self.kind, value, "added catalog entry");
        self.added.push(value.to_string());
        Ok(self.added.last().map(String::as_str).unwrap_or_default())
    }

    /// Remove a user-added entry. Clears `selection` when it names the removed entry.
    pub fn remove(&mut self, value: &str, selection: &mut String) -> Result<(), SafepragError> {
        let idx = self
            .added
            .iter()
            .position(|e| same_entry(e, value))
            .ok_or_else(|| SafepragError::UnknownEntry {
                kind: self.kind.as_str(),
                value: value.to_string(),
            })?;
        let removed = self.added.remove(idx);
        if same_entry(selection, &removed) {
            selection.clear();
        }
        debug!(kind = %self.kind, value = %removed, "removed catalog entry");
        Ok(())
    }

    /// Drop every user addition.
    pub fn reset(&mut self) {
        self.added.clear();
    }
}
