use super::*;
use serde_json::json;

#[test]
fn test_update_field_request_accepts_any_json() {
    let request: UpdateFieldRequest =
        serde_json::from_value(json!({ "value": { "title": "Deal", "ids": [1, 2] } })).unwrap();
    assert_eq!(request.value.kind(), "object");

    let request: UpdateFieldRequest = serde_json::from_value(json!({ "value": null })).unwrap();
    assert!(request.value.is_null());
}

#[test]
fn test_update_field_request_requires_value() {
    let result = serde_json::from_value::<UpdateFieldRequest>(json!({ "val": 1 }));
    assert!(result.is_err());
}
