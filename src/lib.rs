pub mod cli;
pub mod config;
pub mod converter;
pub mod dict;
pub mod error;
pub mod parser;
pub mod units;

pub use config::Config;
pub use converter::{ConvertOptions, Converter};
pub use error::{Error, Result};

use serde::{Deserialize, Serialize};
use std::ops::AddAssign;

/// Counters accumulated across spans and files
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeStats {
    pub total_words: usize,
    pub spelling_changes: usize,
    pub unit_conversions: usize,
    pub quote_changes: usize,
}

impl ChangeStats {
    pub fn merge(&mut self, other: &ChangeStats) {
        self.total_words += other.total_words;
        self.spelling_changes += other.spelling_changes;
        self.unit_conversions += other.unit_conversions;
        self.quote_changes += other.quote_changes;
    }

    pub fn total_changes(&self) -> usize {
        self.spelling_changes + self.unit_conversions + self.quote_changes
    }
}

impl AddAssign for ChangeStats {
    fn add_assign(&mut self, other: Self) {
        self.merge(&other);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Spelling,
    /// A spelling decided by the surrounding words
    Contextual,
    Unit,
    Quote,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Change {
    pub kind: ChangeKind,
    pub original: String,
    pub replacement: String,
}

/// Result of one pipeline call
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversion {
    pub text: String,
    pub stats: ChangeStats,
    pub changes: Vec<Change>,
}

impl Conversion {
    pub fn is_unchanged(&self) -> bool {
        self.changes.is_empty()
    }
}
