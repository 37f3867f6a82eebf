//! Shared domain models.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

pub mod compiled;
pub mod definition;

pub use compiled::*;
pub use definition::*;

/// A game discovered in the content database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameEntry {
    /// Short identifier, the definition's file stem (e.g. `1889`).
    pub id: String,
    /// Title from the definition's `info` block, when present.
    pub title: Option<String>,
    /// Location of the definition file.
    pub path: PathBuf,
}

impl GameEntry {
    /// Returns a user-facing label combining id and title.
    pub fn display_name(&self) -> String {
        match self.title.as_deref() {
            Some(title) if !title.is_empty() && title != self.id => {
                format!("{} · {}", self.id, title)
            }
            _ => self.id.clone(),
        }
    }

    /// Case-insensitive match against id or title.
    pub fn matches(&self, name: &str) -> bool {
        let needle = name.trim().to_lowercase();
        self.id.to_lowercase() == needle
            || self
                .title
                .as_ref()
                .map(|title| title.to_lowercase() == needle)
                .unwrap_or(false)
    }
}
