//! Query behaviour of the engine over the embedded dataset and over partial,
//! malformed documents.

use std::cell::RefCell;
use std::rc::Rc;

use yijing_dataset::Dataset;
use yijing_engine::{
    EngineConfig, EngineError, EngineStatus, HexagramEngine, RelationFallback, RelationKind,
    RelationTarget, Severity,
};

fn embedded_engine() -> HexagramEngine {
    let mut engine = HexagramEngine::default();
    engine.initialize().unwrap();
    engine
}

const PARTIAL: &str = r#"{
    "bagua": {
        "乾": { "binary": "111" },
        "坤": { "binary": "000" },
        "天": { "binary": "111" },
        "离": { "binary": "1o1" }
    },
    "hexagrams": {
        "9": { "name": "重坤", "binary": "000000" },
        "1": {
            "name": "乾",
            "binary": "111111",
            "unicode": "䷀",
            "overview": "The Creative",
            "judgement": { "text": "Sublime success", "tags": ["origin", 4] }
        },
        "2": { "name": "坤", "binary": "000000", "overview": "The Receptive" },
        "12": { "name": "否", "binary": "111000" },
        "13": { "name": "同人", "binary": "111101" },
        "7": { "name": "师", "binary": "0100" },
        "x": { "name": "?", "binary": "101010" },
        "65": { "name": "?", "binary": "010101" }
    }
}"#;

fn partial_engine(policy: RelationFallback) -> HexagramEngine {
    let config = EngineConfig::default().with_relation_fallback(policy);
    let mut engine = HexagramEngine::new(config);
    engine
        .initialize_with(Dataset::from_json(PARTIAL).unwrap())
        .unwrap();
    engine
}

// =============================================================================
// Canonical dataset
// =============================================================================

#[test]
fn creative_and_receptive() {
    let engine = embedded_engine();
    let qian = engine.by_binary("111111").unwrap();
    assert_eq!(qian.id, 1);
    assert_eq!(qian.upper_trigram.as_deref(), Some("乾"));

    let related = engine.related(1).unwrap();
    assert_eq!(related.len(), 3);
    let opposite = related.get(RelationKind::Opposite).unwrap();
    assert_eq!(opposite.hexagram.binary(), "000000");
    assert!(!opposite.fallback);
    assert_eq!(related.get(RelationKind::Inverse).unwrap().hexagram.id, 1);
}

#[test]
fn qian_over_kun_is_pi() {
    let engine = embedded_engine();
    let pi = engine.by_trigrams("乾", "坤").unwrap();
    assert_eq!(pi.name(), "否");
    assert_eq!(pi.binary(), "111000");
    assert_eq!(pi.id, 12);
}

#[test]
fn known_relations() {
    let engine = embedded_engine();
    let cases = [
        (3, [50, 4, 23]),
        (11, [12, 12, 54]),
        (29, [30, 29, 27]),
        (63, [64, 64, 64]),
        (27, [28, 27, 2]),
        (61, [62, 61, 27]),
    ];
    for (id, [opposite, inverse, mutual]) in cases {
        let related = engine.related(id).unwrap();
        let ids: Vec<u8> = related.iter().map(|r| r.hexagram.id).collect();
        assert_eq!(ids, vec![opposite, inverse, mutual], "hexagram {id}");
    }
}

#[test]
fn unknown_keys_are_not_found() {
    let engine = embedded_engine();
    assert!(engine.by_id(0).is_none());
    assert!(engine.by_id(65).is_none());
    assert!(engine.by_binary("11111").is_none());
    assert!(engine.by_binary("11111x").is_none());
    assert!(engine.by_trigrams("乾", "天").is_none());
    assert!(engine.related(99).is_none());
    assert!(engine.trigram("天").is_none());
}

#[test]
fn trigram_accessors() {
    let engine = embedded_engine();
    let names: Vec<&str> = engine.trigrams().iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, ["乾", "兑", "离", "震", "巽", "坎", "艮", "坤"]);
    let kan = engine.trigram("坎").unwrap();
    assert_eq!(kan.code.map(|c| c.to_string()).as_deref(), Some("010"));
    assert_eq!(kan.record.nature, "水");
}

// =============================================================================
// Search
// =============================================================================

#[test]
fn search_ignores_case() {
    let engine = embedded_engine();
    let lower: Vec<u8> = engine.search("creative").iter().map(|h| h.id).collect();
    let upper: Vec<u8> = engine.search("CREATIVE").iter().map(|h| h.id).collect();
    assert_eq!(lower, vec![1]);
    assert_eq!(lower, upper);
}

#[test]
fn search_matches_line_text_in_dataset_order() {
    let engine = embedded_engine();
    let ids: Vec<u8> = engine.search("龙").iter().map(|h| h.id).collect();
    assert_eq!(ids, vec![1, 2]);
}

#[test]
fn search_without_match_is_empty() {
    let engine = embedded_engine();
    assert!(engine.search("no such keyword").is_empty());
}

#[test]
fn empty_keyword_matches_everything() {
    let engine = embedded_engine();
    assert_eq!(engine.search("").len(), 64);
}

// =============================================================================
// Lifecycle
// =============================================================================

#[test]
fn queries_before_initialization_are_empty() {
    let engine = HexagramEngine::default();
    assert_eq!(engine.status(), EngineStatus::Uninitialized);
    assert!(engine.by_binary("111111").is_none());
    assert!(engine.search("乾").is_empty());
    assert!(engine.hexagrams().is_empty());
}

#[test]
fn second_initialization_is_a_no_op() {
    let mut engine = embedded_engine();
    let before = engine.report().cloned().unwrap();
    let again = engine
        .initialize_with(Dataset::from_json(PARTIAL).unwrap())
        .unwrap()
        .clone();
    assert_eq!(before, again);
    assert_eq!(engine.hexagrams().len(), 64);
}

#[test]
fn unreadable_file_without_fallback_fails() {
    let config = EngineConfig {
        embedded_fallback: false,
        ..EngineConfig::default().with_dataset("/nonexistent/hexagrams.json")
    };
    let mut engine = HexagramEngine::new(config);
    let err = engine.initialize().unwrap_err();
    assert!(matches!(err, EngineError::DatasetUnavailable(_)));
    assert_eq!(engine.status(), EngineStatus::Failed);
    assert!(engine.related(1).is_none());
}

#[test]
fn unreadable_file_falls_back_to_embedded() {
    let config = EngineConfig::default().with_dataset("/nonexistent/hexagrams.json");
    let mut engine = HexagramEngine::new(config);
    let report = engine.initialize().unwrap();
    assert_eq!(report.hexagram_count, 64);
    assert!(report.source.to_string().contains("fallback"));
}

#[test]
fn nothing_indexed_fails() {
    let doc = r#"{ "bagua": {}, "hexagrams": { "0": { "name": "?", "binary": "111111" } } }"#;
    let mut engine = HexagramEngine::default();
    let err = engine
        .initialize_with(Dataset::from_json(doc).unwrap())
        .unwrap_err();
    assert!(matches!(err, EngineError::NothingIndexed));
    assert!(!engine.is_ready());
}

#[test]
fn ready_listeners_receive_report() {
    let seen = Rc::new(RefCell::new(Vec::<(&str, usize)>::new()));
    let mut engine = HexagramEngine::default();
    for tag in ["first", "second"] {
        let seen = Rc::clone(&seen);
        engine.on_ready(move |report| seen.borrow_mut().push((tag, report.hexagram_count)));
    }
    assert!(seen.borrow().is_empty());
    engine.initialize().unwrap();
    assert_eq!(*seen.borrow(), vec![("first", 64), ("second", 64)]);
}

// =============================================================================
// Partial and malformed datasets
// =============================================================================

#[test]
fn malformed_entries_are_reported_and_skipped() {
    let engine = partial_engine(RelationFallback::Unresolved);
    let report = engine.report().unwrap();
    assert_eq!(report.hexagram_count, 6);
    assert_eq!(report.derived_count, 5);

    let warned: Vec<&str> = report
        .issues
        .iter()
        .filter(|i| i.severity == Severity::Warning)
        .map(|i| i.entry.as_str())
        .collect();
    for entry in ["hexagrams/7", "hexagrams/x", "hexagrams/65", "hexagrams/2"] {
        assert!(warned.contains(&entry), "no warning for {entry}: {warned:?}");
    }

    let shi = engine.by_id(7).unwrap();
    assert!(shi.code.is_none());
    assert!(shi.relations.is_none());
    assert!(shi.upper_trigram.is_none());
    assert!(engine.related(7).unwrap().is_empty());
    assert!(engine.by_binary("0100").is_none());
}

#[test]
fn shared_code_resolves_to_lowest_id() {
    let engine = partial_engine(RelationFallback::Unresolved);
    assert_eq!(engine.by_binary("000000").map(|h| h.id), Some(2));
    let related = engine.related(1).unwrap();
    assert_eq!(related.get(RelationKind::Opposite).map(|r| r.hexagram.id), Some(2));
}

#[test]
fn unmatched_relations_stay_unresolved_by_default() {
    let engine = partial_engine(RelationFallback::Unresolved);
    let pi = engine.by_id(12).unwrap();
    let relations = pi.relations.unwrap();
    assert!(relations.iter().all(|(_, t)| t == RelationTarget::Unresolved));
    assert!(engine.related(12).unwrap().is_empty());
    let notes = engine
        .report()
        .unwrap()
        .issues
        .iter()
        .filter(|i| i.entry == "hexagrams/12" && i.severity == Severity::Info)
        .count();
    assert_eq!(notes, 3);
}

#[test]
fn fallback_policy_aliases_and_marks() {
    let engine = partial_engine(RelationFallback::DefaultId(1));
    let relations = engine.by_id(12).unwrap().relations.unwrap();
    assert_eq!(relations.opposite, RelationTarget::Fallback(1));
    assert_eq!(relations.mutual, RelationTarget::Fallback(1));

    let related = engine.related(12).unwrap();
    assert_eq!(related.len(), 3);
    assert!(related.iter().all(|r| r.fallback && r.hexagram.id == 1));

    // Genuine relations are never marked.
    let qian = engine.related(1).unwrap();
    assert!(qian.iter().all(|r| !r.fallback));
}

#[test]
fn malformed_and_shadowed_trigrams_are_reported() {
    let engine = partial_engine(RelationFallback::Unresolved);
    let report = engine.report().unwrap();
    assert_eq!(report.trigram_count, 4);

    let warnings = |entry: &str| {
        report
            .issues
            .iter()
            .filter(|i| i.entry == entry && i.severity == Severity::Warning)
            .count()
    };
    assert_eq!(warnings("bagua/离"), 1);
    assert_eq!(warnings("bagua/天"), 1);
    assert_eq!(warnings("bagua/乾"), 0);

    let li = engine.trigram("离").unwrap();
    assert!(li.code.is_none());
    let tian = engine.trigram("天").unwrap();
    assert_eq!(tian.code, engine.trigram("乾").unwrap().code);
}

#[test]
fn shared_trigram_code_resolves_to_first_name() {
    let engine = partial_engine(RelationFallback::Unresolved);
    let pi = engine.by_id(12).unwrap();
    assert_eq!(pi.upper_trigram.as_deref(), Some("乾"));

    assert_eq!(engine.by_trigrams("乾", "坤").map(|h| h.id), Some(12));
    assert!(engine.by_trigrams("天", "坤").is_none());
    assert!(engine.by_trigrams("乾", "离").is_none());
}

#[test]
fn unmatched_trigram_is_left_unset() {
    let engine = partial_engine(RelationFallback::Unresolved);
    let tong_ren = engine.by_binary("111101").unwrap();
    assert_eq!(tong_ren.id, 13);
    assert_eq!(tong_ren.upper_trigram.as_deref(), Some("乾"));
    assert_eq!(tong_ren.lower_trigram, None);
    assert!(tong_ren.relations.is_some());

    let noted = engine
        .report()
        .unwrap()
        .issues
        .iter()
        .any(|i| i.entry == "hexagrams/13" && i.message.contains("trigram left unset"));
    assert!(noted);
}

#[test]
fn search_reaches_glyph_and_unrecognised_fields() {
    let engine = partial_engine(RelationFallback::Unresolved);
    let ids = |keyword: &str| -> Vec<u8> { engine.search(keyword).iter().map(|h| h.id).collect() };
    assert_eq!(ids("sublime"), vec![1]);
    assert_eq!(ids("ORIGIN"), vec![1]);
    assert_eq!(ids("䷀"), vec![1]);
    // Numbers in unrecognised fields are not text.
    assert!(ids("4").is_empty());
}
