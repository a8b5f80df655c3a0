//! The in-memory index and the one-time derivation pass that builds it.

use std::collections::HashMap;

use serde_json::Value;
use tracing::{debug, warn};
use yijing_dataset::{Dataset, HexagramRecord, Table, TrigramRecord};

use crate::code::{HexagramCode, TrigramCode};
use crate::error::EngineError;
use crate::relation::{RelationFallback, RelationTarget, Relations};
use crate::report::{LoadIssue, LoadReport};
use crate::source::SourceKind;

/// A trigram with its parsed code.
#[derive(Debug, Clone, PartialEq)]
pub struct Trigram {
    /// Name, the key in the `bagua` table (e.g. `"乾"`).
    pub name: String,
    /// Parsed code; `None` when the record's `binary` is malformed.
    pub code: Option<TrigramCode>,
    /// Dataset record.
    pub record: TrigramRecord,
}

/// A hexagram with its derived fields. Immutable once the engine is ready.
#[derive(Debug, Clone, PartialEq)]
pub struct Hexagram {
    /// King Wen number, 1–64.
    pub id: u8,
    /// Parsed code; `None` when the record's `binary` is malformed.
    pub code: Option<HexagramCode>,
    /// Dataset record.
    pub record: HexagramRecord,
    /// Name of the trigram matching the first three bits.
    pub upper_trigram: Option<String>,
    /// Name of the trigram matching the last three bits.
    pub lower_trigram: Option<String>,
    /// Opposite, inverse and mutual relations; `None` when not derived.
    pub relations: Option<Relations>,
}

impl Hexagram {
    /// Traditional name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.record.name
    }

    /// Bit string as stored in the dataset.
    #[must_use]
    pub fn binary(&self) -> &str {
        &self.record.binary
    }

    /// Whether the name or any text field contains `needle`, which must already
    /// be lowercase. Unrecognised fields are searched through their string values.
    pub(crate) fn mentions(&self, needle: &str) -> bool {
        let r = &self.record;
        let found = |text: &str| text.to_lowercase().contains(needle);
        [&r.name, &r.unicode, &r.explanation, &r.overview, &r.detail]
            .into_iter()
            .chain(r.lines.iter().map(|line| &line.content))
            .any(|text| found(text.as_str()))
            || r.extra.values().any(|value| value_mentions(value, &found))
    }
}

fn value_mentions(value: &Value, found: &impl Fn(&str) -> bool) -> bool {
    match value {
        Value::String(text) => found(text.as_str()),
        Value::Array(items) => items.iter().any(|item| value_mentions(item, found)),
        Value::Object(map) => map.values().any(|item| value_mentions(item, found)),
        Value::Null | Value::Bool(_) | Value::Number(_) => false,
    }
}

#[derive(Debug)]
pub(crate) struct Index {
    pub(crate) trigrams: Vec<Trigram>,
    pub(crate) hexagrams: Vec<Hexagram>,
    trigram_by_name: HashMap<String, usize>,
    trigram_by_code: HashMap<TrigramCode, usize>,
    by_id: HashMap<u8, usize>,
    by_code: HashMap<HexagramCode, usize>,
    pub(crate) report: LoadReport,
}

fn entry(table: Table, key: &str) -> String {
    format!("{}/{}", table.as_str(), key)
}

impl Index {
    /// Indexes `dataset` and derives trigrams and relations for every hexagram
    /// with a well-formed code.
    pub(crate) fn build(
        dataset: Dataset,
        policy: RelationFallback,
        source: SourceKind,
    ) -> Result<Self, EngineError> {
        let mut report = LoadReport::new(source);
        for rejected in &dataset.rejected {
            report.push(LoadIssue::warn(
                entry(rejected.table, &rejected.key),
                format!("unreadable entry dropped: {}", rejected.reason),
            ));
        }

        let mut index = Self {
            trigrams: Vec::with_capacity(dataset.trigrams.len()),
            hexagrams: Vec::with_capacity(dataset.hexagrams.len()),
            trigram_by_name: HashMap::new(),
            trigram_by_code: HashMap::new(),
            by_id: HashMap::new(),
            by_code: HashMap::new(),
            report,
        };

        for (name, record) in dataset.trigrams {
            index.add_trigram(name, record);
        }
        for (key, record) in dataset.hexagrams {
            index.add_hexagram(&key, record);
        }
        if index.hexagrams.is_empty() {
            return Err(EngineError::NothingIndexed);
        }
        index.derive(policy);

        index.report.trigram_count = index.trigrams.len();
        index.report.hexagram_count = index.hexagrams.len();
        debug!(
            trigrams = index.report.trigram_count,
            hexagrams = index.report.hexagram_count,
            derived = index.report.derived_count,
            issues = index.report.issues.len(),
            "hexagram index built"
        );
        Ok(index)
    }

    fn add_trigram(&mut self, name: String, record: TrigramRecord) {
        let at = entry(Table::Bagua, &name);
        let code = match TrigramCode::parse(&record.binary) {
            Ok(code) => Some(code),
            Err(e) => {
                warn!(entry = %at, error = %e, "malformed trigram code");
                self.report.push(LoadIssue::warn(
                    at.clone(),
                    format!("binary {:?} is malformed: {e}", record.binary),
                ));
                None
            }
        };

        let slot = self.trigrams.len();
        if let Some(code) = code {
            if let Some(&first) = self.trigram_by_code.get(&code) {
                let first_name = self.trigrams.get(first).map_or("", |t| t.name.as_str());
                self.report.push(LoadIssue::warn(
                    at.clone(),
                    format!("code {code} already belongs to {first_name}"),
                ));
            } else {
                self.trigram_by_code.insert(code, slot);
            }
        }
        self.trigram_by_name.insert(name.clone(), slot);
        self.trigrams.push(Trigram { name, code, record });
    }

    fn add_hexagram(&mut self, key: &str, record: HexagramRecord) {
        let at = entry(Table::Hexagrams, key);
        let id = match key.parse::<u8>() {
            Ok(id) if (1..=64).contains(&id) => id,
            _ => {
                warn!(entry = %at, "hexagram key is not an id in 1..=64");
                self.report
                    .push(LoadIssue::warn(at, "key is not a hexagram id in 1..=64; skipped"));
                return;
            }
        };
        if self.by_id.contains_key(&id) {
            self.report
                .push(LoadIssue::warn(at, format!("id {id} already present; skipped")));
            return;
        }

        let code = match HexagramCode::parse(&record.binary) {
            Ok(code) => Some(code),
            Err(e) => {
                warn!(entry = %at, error = %e, "malformed hexagram code");
                self.report.push(LoadIssue::warn(
                    at.clone(),
                    format!("binary {:?} is malformed: {e}; not derived", record.binary),
                ));
                None
            }
        };

        let slot = self.hexagrams.len();
        if let Some(code) = code {
            match self.by_code.get(&code).copied() {
                None => {
                    self.by_code.insert(code, slot);
                }
                Some(existing) => {
                    let existing_id = self.hexagrams.get(existing).map_or(0, |h| h.id);
                    let (kept, dropped) = if id < existing_id {
                        self.by_code.insert(code, slot);
                        (id, existing_id)
                    } else {
                        (existing_id, id)
                    };
                    self.report.push(LoadIssue::warn(
                        at,
                        format!("code {code} shared by ids {kept} and {dropped}; indexed as {kept}"),
                    ));
                }
            }
        }

        self.by_id.insert(id, slot);
        self.hexagrams.push(Hexagram {
            id,
            code,
            record,
            upper_trigram: None,
            lower_trigram: None,
            relations: None,
        });
    }

    fn derive(&mut self, policy: RelationFallback) {
        let derived: Vec<Option<(Option<String>, Option<String>, Relations)>> = self
            .hexagrams
            .iter()
            .map(|hexagram| {
                let code = hexagram.code?;
                let upper = self.trigram_name(code.upper());
                let lower = self.trigram_name(code.lower());
                let relations = Relations::derive(code, policy, |c| self.id_of(c));
                Some((upper, lower, relations))
            })
            .collect();

        let mut issues = Vec::new();
        for (hexagram, derived) in self.hexagrams.iter_mut().zip(derived) {
            let Some((upper, lower, relations)) = derived else {
                continue;
            };
            let at = entry(Table::Hexagrams, &hexagram.id.to_string());
            if upper.is_none() || lower.is_none() {
                issues.push(LoadIssue::info(
                    at.clone(),
                    "no trigram matches part of the code; trigram left unset",
                ));
            }
            for (kind, target) in relations.iter() {
                match target {
                    RelationTarget::Resolved(_) => {}
                    RelationTarget::Fallback(id) => issues.push(LoadIssue::warn(
                        at.clone(),
                        format!("{} relation matches no hexagram; aliased to {id}", kind.as_str()),
                    )),
                    RelationTarget::Unresolved => issues.push(LoadIssue::info(
                        at.clone(),
                        format!("{} relation matches no hexagram", kind.as_str()),
                    )),
                }
            }
            hexagram.upper_trigram = upper;
            hexagram.lower_trigram = lower;
            hexagram.relations = Some(relations);
            self.report.derived_count += 1;
        }
        self.report.issues.extend(issues);
    }

    fn trigram_name(&self, code: TrigramCode) -> Option<String> {
        self.trigram_by_code
            .get(&code)
            .and_then(|&slot| self.trigrams.get(slot))
            .map(|t| t.name.clone())
    }

    fn id_of(&self, code: HexagramCode) -> Option<u8> {
        self.hexagram_by_code(code).map(|h| h.id)
    }

    pub(crate) fn hexagram_by_code(&self, code: HexagramCode) -> Option<&Hexagram> {
        self.by_code
            .get(&code)
            .and_then(|&slot| self.hexagrams.get(slot))
    }

    pub(crate) fn hexagram_by_id(&self, id: u8) -> Option<&Hexagram> {
        self.by_id.get(&id).and_then(|&slot| self.hexagrams.get(slot))
    }

    pub(crate) fn trigram(&self, name: &str) -> Option<&Trigram> {
        self.trigram_by_name
            .get(name)
            .and_then(|&slot| self.trigrams.get(slot))
    }
}
