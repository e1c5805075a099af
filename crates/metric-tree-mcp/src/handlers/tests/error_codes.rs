//! Protocol-level error codes.

use serde_json::json;

use crate::protocol::{error_codes, JsonRpcId};

use super::{create_test_handlers, make_request};

#[tokio::test]
async fn test_method_not_found_error() {
    let (handlers, _tempdir) = create_test_handlers();
    let response = handlers
        .dispatch(make_request("unknown/method", Some(JsonRpcId::Number(1)), None))
        .await
        .unwrap();

    assert!(response.result.is_none());
    let error = response.error.expect("error for unknown method");
    assert_eq!(error.code, error_codes::METHOD_NOT_FOUND);
    assert!(error.message.contains("Method not found"));
}

#[tokio::test]
async fn test_tools_call_without_params() {
    let (handlers, _tempdir) = create_test_handlers();
    let response = handlers
        .dispatch(make_request("tools/call", Some(JsonRpcId::Number(1)), None))
        .await
        .unwrap();
    let error = response.error.unwrap();
    assert_eq!(error.code, error_codes::INVALID_PARAMS);
    assert!(error.message.contains("Missing params"));
}

#[tokio::test]
async fn test_tools_call_without_name() {
    let (handlers, _tempdir) = create_test_handlers();
    let response = handlers
        .dispatch(make_request(
            "tools/call",
            Some(JsonRpcId::Number(1)),
            Some(json!({"arguments": {}})),
        ))
        .await
        .unwrap();
    assert_eq!(response.error.unwrap().code, error_codes::INVALID_PARAMS);
}

#[tokio::test]
async fn test_non_object_arguments_rejected() {
    let (handlers, _tempdir) = create_test_handlers();
    let response = handlers
        .dispatch(make_request(
            "tools/call",
            Some(JsonRpcId::Number(1)),
            Some(json!({"name": "lint_tree", "arguments": [1, 2]})),
        ))
        .await
        .unwrap();
    assert_eq!(response.error.unwrap().code, error_codes::INVALID_PARAMS);
}

#[tokio::test]
async fn test_unknown_tool() {
    let (handlers, _tempdir) = create_test_handlers();
    let response = handlers
        .dispatch(make_request(
            "tools/call",
            Some(JsonRpcId::Number(9)),
            Some(json!({"name": "delete_everything"})),
        ))
        .await
        .unwrap();
    let error = response.error.unwrap();
    assert_eq!(error.code, error_codes::TOOL_NOT_FOUND);
    assert!(error.message.contains("delete_everything"));
    assert_eq!(response.id, Some(JsonRpcId::Number(9)));
}
