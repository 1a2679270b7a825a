//! Golden Tests for Distribution Extraction
//!
//! Runs the full pipeline over fixture schemas and checks the rendered table
//! and the ordering/merge/cycle properties it must satisfy.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde_json::{json, Map, Value};
use sweep_distributions::{
    extract, generate, DistributionError, DistributionTable, GeneratorConfig, OrderHints,
    OutputFormat, SchemaDocument, SchemaSource,
};

fn fixture_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(name)
}

fn fixture(name: &str) -> Value {
    let content = std::fs::read_to_string(fixture_path(name)).unwrap();
    serde_json::from_str(&content).unwrap()
}

fn table_for(document: &Value) -> DistributionTable {
    extract(document, &OrderHints::default()).unwrap()
}

fn assert_well_formed(table: &DistributionTable) {
    for (distribution, keys) in table.iter() {
        assert!(
            !keys.iter().any(|k| k == "distribution"),
            "{} lists the distribution key",
            distribution
        );
        let mut unique = keys.to_vec();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), keys.len(), "{} has duplicate keys", distribution);
    }
}

// =============================================================================
// Golden Output
// =============================================================================

#[test]
fn test_sweeps_schema_golden() {
    let document = fixture("sweeps_schema.json");
    let output = generate(&document, &GeneratorConfig::default()).unwrap();
    let expected = std::fs::read_to_string(fixture_path("sweeps_schema.golden")).unwrap();
    assert_eq!(output.text, expected);
    assert_eq!(output.cycle_count, 0);
}

#[test]
fn test_sweeps_schema_from_file_source() {
    let source = SchemaSource::File(fixture_path("sweeps_schema.json"));
    let document = SchemaDocument::load(&source, Duration::from_secs(1)).unwrap();
    let table = table_for(&document.value);
    assert_eq!(table.len(), 14);
    assert_eq!(document.checksum.as_str().len(), 64);
}

#[test]
fn test_sample_scenario() {
    let document = json!({
        "definitions": {
            "X": {
                "properties": {
                    "distribution": { "const": "constant" },
                    "value": { "type": "number" }
                }
            }
        }
    });
    let output = generate(&document, &GeneratorConfig::default()).unwrap();
    assert_eq!(output.text, "SUPPORTED_DISTRIBUTIONS = {\n    \"constant\": [\"value\"],\n}\n");
}

#[test]
fn test_json_format() {
    let mut config = GeneratorConfig::default();
    config.output.format = OutputFormat::Json;
    let output = generate(&fixture("sweeps_schema.json"), &config).unwrap();

    let parsed: Value = serde_json::from_str(&output.text).unwrap();
    assert_eq!(parsed["q_beta"], json!(["a", "b", "q"]));
    assert_eq!(parsed["categorical_w_probabilities"], json!(["values", "probabilities"]));
}

// =============================================================================
// Properties
// =============================================================================

#[test]
fn test_determinism() {
    let document = fixture("sweeps_schema.json");
    let first = generate(&document, &GeneratorConfig::default()).unwrap();
    let second = generate(&document, &GeneratorConfig::default()).unwrap();
    assert_eq!(first.text, second.text);
}

#[test]
fn test_definition_order_does_not_matter() {
    let document = fixture("sweeps_schema.json");

    let definitions = document["definitions"].as_object().unwrap();
    let reversed: Map<String, Value> = definitions
        .iter()
        .rev()
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    let mut shuffled = document.clone();
    shuffled["definitions"] = Value::Object(reversed);

    assert_eq!(table_for(&document), table_for(&shuffled));
}

#[test]
fn test_no_self_entry_and_uniqueness() {
    for name in ["sweeps_schema.json", "cyclic.json", "foreign_ref.json"] {
        assert_well_formed(&table_for(&fixture(name)));
    }
}

#[test]
fn test_priority_beats_discovery_order() {
    // q is discovered before the bounds, in both nodes
    let document = json!({
        "definitions": {
            "first": { "properties": { "q": {}, "distribution": { "const": "q_uniform" } } },
            "second": { "properties": { "max": {}, "min": {}, "distribution": { "const": "q_uniform" } } }
        }
    });
    assert_eq!(table_for(&document).get("q_uniform").unwrap(), ["min", "max", "q"]);
}

#[test]
fn test_alphabetical_tiebreak() {
    let document = json!({
        "definitions": {
            "grid": {
                "properties": {
                    "distribution": { "const": "custom" },
                    "zeta": {},
                    "value": {},
                    "alpha": {},
                    "gamma": {}
                }
            }
        }
    });
    assert_eq!(
        table_for(&document).get("custom").unwrap(),
        ["value", "alpha", "gamma", "zeta"]
    );
}

#[test]
fn test_cycle_safety() {
    let document = fixture("cyclic.json");
    let output = generate(&document, &GeneratorConfig::default()).unwrap();

    assert_eq!(output.table.get("uniform").unwrap(), ["min", "max"]);
    assert_eq!(output.table.get("q_uniform").unwrap(), ["min", "q"]);
    assert_eq!(output.cycle_count, 1);
}

#[test]
fn test_reference_merge() {
    let document = json!({
        "definitions": {
            "param_uniform": {
                "oneOf": [
                    { "properties": { "distribution": { "enum": ["uniform"] }, "max": {} } },
                    { "properties": { "distribution": { "const": "uniform" }, "min": {}, "max": {} } },
                    { "$ref": "#/definitions/uniform_extra" }
                ]
            },
            "uniform_extra": {
                "properties": { "distribution": { "enum": ["uniform"] }, "seed": {}, "min": {} }
            }
        }
    });
    assert_eq!(table_for(&document).get("uniform").unwrap(), ["min", "max", "seed"]);
}

#[test]
fn test_foreign_reference_is_skipped() {
    let document = fixture("foreign_ref.json");
    let output = generate(&document, &GeneratorConfig::default()).unwrap();
    assert_eq!(output.table.len(), 1);
    assert_eq!(output.table.get("constant").unwrap(), ["value"]);
}

#[test]
fn test_broken_reference_aborts() {
    let document = fixture("broken_ref.json");
    match generate(&document, &GeneratorConfig::default()) {
        Err(DistributionError::BrokenPointer { pointer, segment }) => {
            assert_eq!(pointer, "#/definitions/param_removed");
            assert_eq!(segment, "param_removed");
        }
        other => panic!("Expected BrokenPointer, got {:?}", other.map(|o| o.text)),
    }
}

#[test]
fn test_custom_hints_reorder_keys() {
    let mut hints = OrderHints::default();
    hints.hints.insert("q".to_string(), -1);
    let table = extract(&fixture("sweeps_schema.json"), &hints).unwrap();
    assert_eq!(table.get("q_normal").unwrap(), ["q", "mu", "sigma"]);
}

#[test]
fn test_graph_export() {
    let output = generate(&fixture("cyclic.json"), &GeneratorConfig::default()).unwrap();
    let dot = output.graph.to_dot();
    assert!(dot.contains("[label=\"oneOf\"]"));
    assert!(dot.contains("[label=\"item\"]"));
}
