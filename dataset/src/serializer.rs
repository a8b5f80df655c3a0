//! JSON serializer for a [`Dataset`].
//!
//! Produces the same `{ "bagua": {...}, "hexagrams": {...} }` document shape
//! that [`Dataset::from_json`] reads, in table order. Rejected entries are not
//! written back.

use serde_json::{json, Map, Value};

use crate::Dataset;

/// Serializes a dataset to a JSON `Value`.
///
/// The returned value can be pretty-printed with [`serde_json::to_string_pretty`].
#[must_use]
pub fn to_json(dataset: &Dataset) -> Value {
    let mut bagua = Map::new();
    for (name, record) in &dataset.trigrams {
        bagua.insert(name.clone(), record_to_json(record));
    }

    let mut hexagrams = Map::new();
    for (key, record) in &dataset.hexagrams {
        hexagrams.insert(key.clone(), record_to_json(record));
    }

    json!({
        "bagua": bagua,
        "hexagrams": hexagrams
    })
}

fn record_to_json<T: serde::Serialize>(record: &T) -> Value {
    // Records are plain strings, integers and maps; this cannot fail.
    serde_json::to_value(record).unwrap_or(Value::Null)
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn reparses_to_same_tables() {
        let dataset = Dataset::embedded().expect("embedded dataset parses");
        let text = serde_json::to_string(&to_json(&dataset)).expect("serializes");
        let again = Dataset::from_json(&text).expect("reparses");
        assert_eq!(again.trigrams, dataset.trigrams);
        assert_eq!(again.hexagrams, dataset.hexagrams);
    }

    #[test]
    fn extra_keys_survive() {
        let doc = r#"{
            "bagua": { "乾": { "binary": "111", "season": "autumn" } },
            "hexagrams": { "1": { "name": "乾", "binary": "111111", "judgement": "元亨利贞" } }
        }"#;
        let dataset = Dataset::from_json(doc).expect("parses");
        let value = to_json(&dataset);
        assert_eq!(value["bagua"]["乾"]["season"], "autumn");
        assert_eq!(value["hexagrams"]["1"]["judgement"], "元亨利贞");
    }
}
