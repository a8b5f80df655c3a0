//! JSON snapshot of a ready engine: every dataset field plus the derived ones.
//!
//! Each hexagram entry gains `id`, `upperTrigram`, `lowerTrigram` and
//! `relations`. Unresolved relations and unmatched trigrams are `null`;
//! fallback aliases are listed under `relationFallbacks`.

use serde_json::{json, Map, Value};

use crate::engine::HexagramEngine;
use crate::index::{Hexagram, Trigram};

/// Serializes the engine's index, or `None` when the engine is not ready.
#[must_use]
pub fn to_json(engine: &HexagramEngine) -> Option<Value> {
    let report = engine.report()?;

    let mut bagua = Map::new();
    for trigram in engine.trigrams() {
        bagua.insert(trigram.name.clone(), trigram_to_json(trigram));
    }

    let mut hexagrams = Map::new();
    for hexagram in engine.hexagrams() {
        hexagrams.insert(hexagram.id.to_string(), hexagram_to_json(hexagram));
    }

    Some(json!({
        "source": report.source.to_string(),
        "derived": report.derived_count,
        "bagua": bagua,
        "hexagrams": hexagrams
    }))
}

fn record_map<T: serde::Serialize>(record: &T) -> Map<String, Value> {
    match serde_json::to_value(record) {
        Ok(Value::Object(map)) => map,
        _ => Map::new(),
    }
}

/// A trigram's dataset fields.
#[must_use]
pub fn trigram_to_json(trigram: &Trigram) -> Value {
    Value::Object(record_map(&trigram.record))
}

/// A hexagram's dataset fields plus its derived ones.
#[must_use]
pub fn hexagram_to_json(hexagram: &Hexagram) -> Value {
    let mut entry = record_map(&hexagram.record);
    entry.insert("id".to_owned(), json!(hexagram.id));
    entry.insert("upperTrigram".to_owned(), json!(hexagram.upper_trigram));
    entry.insert("lowerTrigram".to_owned(), json!(hexagram.lower_trigram));

    let mut relations = Map::new();
    let mut fallbacks = Vec::new();
    if let Some(derived) = &hexagram.relations {
        for (kind, target) in derived.iter() {
            relations.insert(kind.as_str().to_owned(), json!(target.id()));
            if target.is_fallback() {
                fallbacks.push(kind.as_str());
            }
        }
    }
    entry.insert("relations".to_owned(), Value::Object(relations));
    if !fallbacks.is_empty() {
        entry.insert("relationFallbacks".to_owned(), json!(fallbacks));
    }
    Value::Object(entry)
}
