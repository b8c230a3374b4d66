//! End-to-end tests against a generated Adventurer fixture.
//!
//! `fixtures/adventurers.recon` is a map of 200 Adventurer records written by a
//! test-data generator: the first entry under `k`/`v`, the remaining 199 as
//! alternating key/value records in `r`, and the map's load factor in `f`.

use recon_core::{parse, serialize, serialize_compact, Kind, Record, Value};

const ADVENTURERS: &str = include_str!("fixtures/adventurers.recon");
const ADVENTURER_CLASS: &str = "squidpony.DataDemo$Adventurer";

fn fixture() -> Record {
    match parse(ADVENTURERS) {
        Ok(Value::Record(record)) => record,
        other => panic!("fixture should parse to a record, got {other:?}"),
    }
}

fn int_field(record: &Record, name: &str) -> Option<i64> {
    record.get(name).and_then(Value::as_i64)
}

// ============================================================================
// Single-record scenarios
// ============================================================================

#[test]
fn abjurer_record() {
    let text = r#"{
	class: "squidpony.DataDemo$Adventurer"
	name: "Abjurer"
	features: [
		"Ward field, better spread"
		"Earth spells, better duration"
		"Superior Grimoire, acts as Shield"
		"Magic counter, may inflict Nullify"
	]
	meleeRes: 1
	rangedRes: 1
	ailmentRes: 2
}"#;
    let record = match parse(text).unwrap() {
        Value::Record(record) => record,
        other => panic!("expected record, got {other:?}"),
    };

    assert_eq!(record.class(), Some(ADVENTURER_CLASS));
    assert_eq!(record.get("name"), Some(&Value::from("Abjurer")));

    let features = record.get("features").and_then(Value::as_list).unwrap();
    assert_eq!(features.len(), 4);
    assert!(features.iter().all(|f| f.kind() == Kind::String));
    assert_eq!(features[0], Value::from("Ward field, better spread"));
    assert_eq!(features[3], Value::from("Magic counter, may inflict Nullify"));

    assert_eq!(int_field(&record, "meleeRes"), Some(1));
    assert_eq!(int_field(&record, "rangedRes"), Some(1));
    assert_eq!(int_field(&record, "ailmentRes"), Some(2));
    // Absent, not zero.
    assert!(record.get("magicRes").is_none());
}

#[test]
fn class_only_record() {
    let value = parse("{\n\tclass: \"squidpony.DataDemo$Adventurer\"\n}").unwrap();
    let record = value.as_record().unwrap();
    assert_eq!(record.len(), 1);
    assert_eq!(record.class(), Some(ADVENTURER_CLASS));
    assert!(record.get("name").is_none());
    assert!(record.get("features").is_none());
}

// ============================================================================
// Full fixture
// ============================================================================

#[test]
fn fixture_top_level_shape() {
    let record = fixture();
    assert_eq!(record.keys().collect::<Vec<_>>(), vec!["f", "k", "v", "r"]);
    assert_eq!(record.get("f"), Some(&Value::Float(0.8)));

    let key = record.get("k").and_then(Value::as_record).unwrap();
    assert_eq!(key.class(), Some("#St"));
    assert_eq!(key.get("value"), Some(&Value::from("Abjurer")));

    let entries = record.get("r").and_then(Value::as_list).unwrap();
    assert_eq!(entries.len(), 398);
}

#[test]
fn fixture_entries_alternate_keys_and_adventurers() {
    let record = fixture();
    let entries = record.get("r").and_then(Value::as_list).unwrap();

    for pair in entries.chunks(2) {
        let key = pair[0].as_record().unwrap();
        let adventurer = pair[1].as_record().unwrap();
        assert_eq!(key.class(), Some("#St"));
        assert_eq!(adventurer.class(), Some(ADVENTURER_CLASS));
        if let Some(name) = adventurer.get("name") {
            assert_eq!(Some(name), key.get("value"));
        }
        for res in ["meleeRes", "rangedRes", "magicRes", "ailmentRes"] {
            if let Some(v) = adventurer.get(res) {
                let n = v.as_i64().unwrap_or_else(|| panic!("{res} should be an integer"));
                assert!((0..=4).contains(&n), "{res} = {n}");
            }
        }
    }
}

#[test]
fn fixture_mixes_bare_and_quoted_features() {
    let record = fixture();
    let entries = record.get("r").and_then(Value::as_list).unwrap();
    let acrobat = entries[1].as_record().unwrap();
    assert_eq!(acrobat.get("name"), Some(&Value::from("Acrobat")));
    assert_eq!(
        acrobat.get("features"),
        Some(&Value::from(vec![
            "Unarmed attacks, strong against moving",
            "Dominance from movement",
            "Superior Utility Harness, acts as Sandals",
            "Speed tricks, better speed",
        ]))
    );
}

#[test]
fn fixture_contains_class_only_adventurer() {
    let record = fixture();
    let entries = record.get("r").and_then(Value::as_list).unwrap();
    let position = entries
        .iter()
        .position(|e| e.as_record().and_then(|r| r.get("value")) == Some(&Value::from("Sommelier")))
        .expect("Sommelier key should be present");
    let sommelier = entries[position + 1].as_record().unwrap();
    assert_eq!(sommelier.len(), 1);
    assert_eq!(sommelier.class(), Some(ADVENTURER_CLASS));
}

#[test]
fn fixture_roundtrips_in_both_layouts() {
    let value = Value::Record(fixture());
    let pretty = serialize(&value).unwrap();
    assert_eq!(parse(&pretty).unwrap(), value);
    let compact = serialize_compact(&value).unwrap();
    assert!(!compact.contains('\n'));
    assert_eq!(parse(&compact).unwrap(), value);
    assert_eq!(serialize(&parse(&pretty).unwrap()).unwrap(), pretty);
}
