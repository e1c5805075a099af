//! tools/list

use crate::protocol::JsonRpcId;

use super::{create_test_handlers, make_request};

#[tokio::test]
async fn test_tools_list_returns_every_tool() {
    let (handlers, _tempdir) = create_test_handlers();
    let response = handlers
        .dispatch(make_request("tools/list", Some(JsonRpcId::Number(2)), None))
        .await
        .unwrap();

    let result = response.result.expect("tools/list result");
    let tools = result["tools"].as_array().expect("tools array");
    assert_eq!(tools.len(), 14);
    for tool in tools {
        assert!(tool["name"].is_string());
        assert!(!tool["description"].as_str().unwrap().is_empty());
        assert_eq!(tool["inputSchema"]["type"], "object");
    }
}
