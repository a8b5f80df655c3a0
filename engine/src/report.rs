//! Load report: what the derivation pass indexed, skipped or aliased.

use std::fmt;

use crate::source::SourceKind;

/// Severity level of a load issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Noteworthy but expected (e.g. an unresolved relation in a partial dataset).
    Info,
    /// Data was skipped or aliased.
    Warning,
}

/// A single note produced while indexing the dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadIssue {
    /// Table entry the issue is about, e.g. `hexagrams/12` or `bagua/乾`.
    pub entry: String,
    /// Human-readable description.
    pub message: String,
    /// Severity of the issue.
    pub severity: Severity,
}

impl LoadIssue {
    /// Creates an informational issue.
    pub fn info(entry: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            entry: entry.into(),
            message: message.into(),
            severity: Severity::Info,
        }
    }

    /// Creates a warning.
    pub fn warn(entry: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            entry: entry.into(),
            message: message.into(),
            severity: Severity::Warning,
        }
    }

    /// Returns true if this issue is a warning.
    pub fn is_warning(&self) -> bool {
        self.severity == Severity::Warning
    }
}

impl fmt::Display for LoadIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.severity {
            Severity::Info => "info",
            Severity::Warning => "warning",
        };
        write!(f, "[{level}] {}: {}", self.entry, self.message)
    }
}

/// Summary of one successful initialization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadReport {
    /// Where the dataset came from.
    pub source: SourceKind,
    /// Trigrams in the index.
    pub trigram_count: usize,
    /// Hexagrams in the index.
    pub hexagram_count: usize,
    /// Hexagrams whose trigrams and relations were derived.
    pub derived_count: usize,
    /// Everything skipped, aliased or left unresolved.
    pub issues: Vec<LoadIssue>,
}

impl LoadReport {
    /// Creates an empty report for a dataset from `source`.
    pub fn new(source: SourceKind) -> Self {
        Self {
            source,
            trigram_count: 0,
            hexagram_count: 0,
            derived_count: 0,
            issues: Vec::new(),
        }
    }

    /// Appends an issue.
    pub fn push(&mut self, issue: LoadIssue) {
        self.issues.push(issue);
    }

    /// Returns the count of warnings.
    pub fn warning_count(&self) -> usize {
        self.issues.iter().filter(|i| i.is_warning()).count()
    }

    /// Returns true if nothing was skipped or aliased.
    pub fn is_clean(&self) -> bool {
        self.warning_count() == 0
    }
}
