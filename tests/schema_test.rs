use schemars::JsonSchema;
use serde::Deserialize;
use yatra::{
    completion_schema, types::parse_structured_text, CompletionSchema, ErrorCategory, RelayError,
};

/// Phrasebook entry returned for a single word.
#[derive(Debug, PartialEq, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
#[completion_schema(name = "phrase_card")]
struct PhraseCard {
    /// Word in the target script
    native_script: String,
    /// Latin-letter spelling
    #[serde(rename = "romanized")]
    transliteration: String,
    /// Optional stress hint
    pronunciation: Option<String>,
}

#[test]
fn macro_applies_name_and_renamed_field_docs() {
    let handle = PhraseCard::schema();
    assert_eq!(handle.schema_name(), "phrase_card");
    assert_eq!(handle.type_name(), "PhraseCard");

    let schema = handle.schema_json();
    assert_eq!(
        schema["description"],
        "Phrasebook entry returned for a single word."
    );
    assert_eq!(
        schema["properties"]["nativeScript"]["description"],
        "Word in the target script"
    );
    assert_eq!(
        schema["properties"]["romanized"]["description"],
        "Latin-letter spelling"
    );

    let required: Vec<&str> = schema["required"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|value| value.as_str())
        .collect();
    assert!(required.contains(&"nativeScript"));
    assert!(!required.contains(&"pronunciation"));
}

#[test]
fn schema_handle_is_cached() {
    assert!(std::ptr::eq(PhraseCard::schema(), PhraseCard::schema()));
}

#[test]
fn prompt_schema_omits_meta_schema() {
    let rendered = PhraseCard::schema().prompt_schema();
    assert!(!rendered.contains("$schema"));
    assert!(!rendered.contains('\n'));
}

#[test]
fn fenced_model_output_parses_into_macro_type() {
    let raw = "```json\n{\"nativeScript\": \"नमस्ते\", \"romanized\": \"namaste\"}\n```";
    let card: PhraseCard = parse_structured_text(raw).unwrap();
    assert_eq!(
        card,
        PhraseCard {
            native_script: "नमस्ते".to_string(),
            transliteration: "namaste".to_string(),
            pronunciation: None,
        }
    );
}

#[test]
fn single_line_fence_parses_like_bare_json() {
    let bare = r#"{"nativeScript": "धन्यवाद", "romanized": "dhanyavaad"}"#;
    let fenced = format!("```json {bare} ```");

    let expected: PhraseCard = parse_structured_text(bare).unwrap();
    let parsed: PhraseCard = parse_structured_text(&fenced).unwrap();
    assert_eq!(parsed, expected);
}

#[test]
fn wrong_shape_is_processing_error() {
    let err = parse_structured_text::<PhraseCard>(r#"{"nativeScript": 5}"#).unwrap_err();
    assert!(matches!(err, RelayError::Processing(_)));
    assert_eq!(err.category(), ErrorCategory::InvalidResponse);
}
