use serde_json::json;
use tcm_ai::error::AiError;
use tcm_ai::json::{extract_json, parse_json};
use tcm_core::models::modality::TongueAnalysis;

#[test]
fn fenced_json_block_is_unwrapped() {
    let response = "```json\n{\"is_valid_image\": true, \"confidence\": 85}\n```";
    let value: serde_json::Value = parse_json(response).unwrap();
    assert_eq!(value, json!({"is_valid_image": true, "confidence": 85}));
}

#[test]
fn fence_without_language_tag_and_surrounding_prose() {
    let response = "Here is my analysis:\n```\n{\"a\": 1}\n```\nLet me know if you need more.";
    assert_eq!(extract_json(response).unwrap(), "{\"a\": 1}");
}

#[test]
fn bare_object_with_prose_is_accepted() {
    let response = "Sure! {\"is_valid_image\": false} Hope that helps.";
    let parsed: TongueAnalysis = parse_json(response).unwrap();
    assert!(!parsed.is_valid_image);
}

#[test]
fn missing_closing_fence_is_tolerated() {
    let response = "```json\n{\"confidence\": 40}";
    assert_eq!(extract_json(response).unwrap(), "{\"confidence\": 40}");
}

#[test]
fn prose_without_json_is_a_parse_error() {
    let err = extract_json("I cannot analyse this image.").unwrap_err();
    assert!(matches!(err, AiError::ResponseParse(_)));
}

#[test]
fn malformed_json_is_a_parse_error_not_a_panic() {
    let err = parse_json::<serde_json::Value>("```json\n{\"a\": }\n```").unwrap_err();
    assert!(matches!(err, AiError::ResponseParse(_)));
}

#[test]
fn wrong_shape_is_a_schema_violation() {
    let err = parse_json::<TongueAnalysis>("{\"is_valid_image\": \"yes\"}").unwrap_err();
    assert!(matches!(err, AiError::SchemaViolation(_)));
}

#[test]
fn tongue_analysis_fields_are_optional() {
    let parsed: TongueAnalysis = parse_json(
        "```json\n{\"is_valid_image\": true, \"confidence\": 85, \"coating\": \"thin white\"}\n```",
    )
    .unwrap();
    assert!(parsed.is_valid_image);
    assert_eq!(parsed.confidence, Some(85.0));
    assert_eq!(parsed.coating.as_deref(), Some("thin white"));
    assert!(parsed.indications.is_empty());
}
