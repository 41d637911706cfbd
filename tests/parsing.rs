use std::fs;
use std::path::PathBuf;

use lol_terminal::error::FetchError;
use lol_terminal::stats_fetch::parse_view_data_json;

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

#[test]
fn parses_wins_fixture_in_payload_order() {
    let raw = read_fixture("wins_faker.json");
    let data = parse_view_data_json(&raw).expect("fixture should parse");
    assert_eq!(data.labels(), vec!["Azir", "Ahri"]);
    assert_eq!(data.values(), vec![12.0, 7.0]);
}

#[test]
fn parses_zero_and_fractional_values() {
    let raw = read_fixture("wins_caps.json");
    let data = parse_view_data_json(&raw).expect("fixture should parse");
    assert_eq!(data.len(), 4);
    assert_eq!(data.get("Aphelios"), Some(0.0));
    assert_eq!(data.get("Zeri"), Some(1.5));
    assert_eq!(data.labels()[1], "Kai'Sa");
}

#[test]
fn empty_object_is_empty_data() {
    let data = parse_view_data_json("{}").expect("empty object should parse");
    assert!(data.is_empty());
}

#[test]
fn non_object_payloads_are_malformed() {
    for raw in ["", "null", "[1, 2]", "\"Azir\"", "42"] {
        assert!(
            matches!(parse_view_data_json(raw), Err(FetchError::Malformed(_))),
            "{raw:?} should be rejected"
        );
    }
}

#[test]
fn non_numeric_or_negative_values_are_malformed() {
    assert!(matches!(
        parse_view_data_json(r#"{"Azir": "12"}"#),
        Err(FetchError::Malformed(_))
    ));
    assert!(matches!(
        parse_view_data_json(r#"{"Azir": null}"#),
        Err(FetchError::Malformed(_))
    ));
    assert!(matches!(
        parse_view_data_json(r#"{"Azir": -3}"#),
        Err(FetchError::Malformed(_))
    ));
}

#[test]
fn truncated_json_is_malformed() {
    assert!(matches!(
        parse_view_data_json(r#"{"Azir": 12"#),
        Err(FetchError::Malformed(_))
    ));
}
