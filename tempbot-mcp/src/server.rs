//! JSON-RPC request handling
//!
//! Tools:
//! - convert_message: scan free text and convert every quantity found
//! - convert: convert one quantity to a named unit
//! - help: general help or the units of one dimension
//!
//! Resources:
//! - tempbot://dimensions/{name} - unit listing for a dimension

use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};
use tempbot_units::UnitProcessor;
use tracing::{debug, info, warn};

use crate::format::{format_results, result_to_json};
use crate::help::{dimension_help, help_text};

pub const PROTOCOL_VERSION: &str = "2025-11-25";
pub const SERVER_NAME: &str = "tempbot";
pub const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

const RESOURCE_PREFIX: &str = "tempbot://dimensions/";

// JSON-RPC error codes
const PARSE_ERROR: i32 = -32700;
const INVALID_REQUEST: i32 = -32600;
const METHOD_NOT_FOUND: i32 = -32601;
const INVALID_PARAMS: i32 = -32602;

// MCP Protocol types
#[derive(Debug, Deserialize)]
pub struct McpRequest {
    pub jsonrpc: String,
    pub id: Option<JsonValue>,
    pub method: String,
    #[serde(default)]
    pub params: Option<JsonValue>,
}

#[derive(Debug, Serialize)]
pub struct McpResponse {
    jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<McpError>,
}

#[derive(Debug, Serialize)]
pub struct McpError {
    code: i32,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<JsonValue>,
}

impl McpError {
    fn new(code: i32, message: impl Into<String>) -> Self {
        McpError {
            code,
            message: message.into(),
            data: None,
        }
    }

    fn invalid_params(message: impl Into<String>) -> Self {
        McpError::new(INVALID_PARAMS, message)
    }
}

impl McpResponse {
    fn new(id: Option<JsonValue>, result: Result<JsonValue, McpError>) -> Self {
        let (result, error) = match result {
            Ok(r) => (Some(r), None),
            Err(e) => (None, Some(e)),
        };
        McpResponse {
            jsonrpc: "2.0".to_string(),
            id,
            result,
            error,
        }
    }
}

/// Handle one raw input line. Notifications yield no response.
pub fn handle_line(processor: &UnitProcessor, line: &str) -> Option<McpResponse> {
    let request: McpRequest = match serde_json::from_str(line) {
        Ok(r) => r,
        Err(e) => {
            warn!(error = %e, "error parsing request");
            return Some(McpResponse::new(
                None,
                Err(McpError::new(PARSE_ERROR, format!("Parse error: {}", e))),
            ));
        }
    };

    debug!(method = %request.method, "processing request");
    let response = handle_request(processor, &request);

    if request.id.is_none() {
        debug!(method = %request.method, "notification processed (no response)");
        return None;
    }
    Some(response)
}

pub fn handle_request(processor: &UnitProcessor, request: &McpRequest) -> McpResponse {
    if request.jsonrpc != "2.0" {
        return McpResponse::new(
            request.id.clone(),
            Err(McpError::new(
                INVALID_REQUEST,
                format!("Unsupported jsonrpc version: {}", request.jsonrpc),
            )),
        );
    }

    let result = match request.method.as_str() {
        // Lifecycle
        "initialize" => handle_initialize(&request.params),
        "initialized" => Ok(json!({})),
        "ping" => Ok(json!({})),

        // Tools
        "tools/list" => handle_tools_list(),
        "tools/call" => handle_tool_call(processor, &request.params),

        // Resources
        "resources/list" => handle_resources_list(processor),
        "resources/read" => handle_resources_read(processor, &request.params),

        _ => Err(McpError::new(
            METHOD_NOT_FOUND,
            format!("Method not found: {}", request.method),
        )),
    };

    McpResponse::new(request.id.clone(), result)
}

fn handle_initialize(params: &Option<JsonValue>) -> Result<JsonValue, McpError> {
    let client_info = params
        .as_ref()
        .and_then(|p| p.get("clientInfo"))
        .and_then(|c| c.get("name"))
        .and_then(|n| n.as_str())
        .unwrap_or("unknown");

    // Use client's protocol version for compatibility
    let client_protocol = params
        .as_ref()
        .and_then(|p| p.get("protocolVersion"))
        .and_then(|v| v.as_str())
        .unwrap_or(PROTOCOL_VERSION);

    info!(client = client_info, protocol = client_protocol, "client connected");

    Ok(json!({
        "protocolVersion": client_protocol,
        "serverInfo": {
            "name": SERVER_NAME,
            "version": SERVER_VERSION,
            "description": "Detects quantities in text and converts them between units"
        },
        "capabilities": {
            "tools": {
                "listChanged": false
            },
            "resources": {
                "subscribe": false,
                "listChanged": false
            }
        },
        "instructions": "Use 'convert_message' on free text to find and convert temperatures and blood sugar readings. Use 'convert' for an explicit conversion such as '100 km/hr to mph'. Use 'help' to list unit types and their units."
    }))
}

fn handle_tools_list() -> Result<JsonValue, McpError> {
    Ok(json!({
        "tools": [
            {
                "name": "convert_message",
                "description": "Find quantities like '32F' or '-40 C' in free text and convert them automatically.",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "text": {
                            "type": "string",
                            "description": "Message text to scan"
                        }
                    },
                    "required": ["text"]
                }
            },
            {
                "name": "convert",
                "description": "Convert one quantity to a specific unit. Pass 'source' and 'result_unit', or a single 'request' like '5 C to F'.",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "source": {
                            "type": "string",
                            "description": "Quantity to convert, e.g. '100 km/hr'"
                        },
                        "result_unit": {
                            "type": "string",
                            "description": "Destination unit, e.g. 'mph'"
                        },
                        "request": {
                            "type": "string",
                            "description": "Whole request, e.g. '100 km/hr to mph'"
                        }
                    }
                }
            },
            {
                "name": "help",
                "description": "Describe what can be converted, or list the units of one unit type.",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "unit_type": {
                            "type": "string",
                            "description": "Unit type such as 'temperature'. Omit for general help."
                        }
                    }
                }
            }
        ]
    }))
}

fn handle_tool_call(processor: &UnitProcessor, params: &Option<JsonValue>) -> Result<JsonValue, McpError> {
    let params = params
        .as_ref()
        .ok_or_else(|| McpError::invalid_params("Missing params"))?;

    let name = params
        .get("name")
        .and_then(|v| v.as_str())
        .ok_or_else(|| McpError::invalid_params("Missing tool name"))?;

    let args = params.get("arguments").cloned().unwrap_or(json!({}));

    match name {
        "convert_message" => tool_convert_message(processor, &args),
        "convert" => tool_convert(processor, &args),
        "help" => tool_help(processor, &args),
        _ => Err(McpError::invalid_params(format!("Unknown tool: {}", name))),
    }
}

fn string_arg<'a>(args: &'a JsonValue, key: &str) -> Option<&'a str> {
    args.get(key).and_then(|v| v.as_str())
}

fn tool_convert_message(processor: &UnitProcessor, args: &JsonValue) -> Result<JsonValue, McpError> {
    let text = string_arg(args, "text")
        .ok_or_else(|| McpError::invalid_params("Missing text argument"))?;

    let results = processor.process_message(text);
    Ok(json!({
        "content": [{ "type": "text", "text": format_results(&results) }],
        "results": results.iter().map(result_to_json).collect::<Vec<_>>(),
        "isError": false
    }))
}

fn tool_convert(processor: &UnitProcessor, args: &JsonValue) -> Result<JsonValue, McpError> {
    let result = match (
        string_arg(args, "source"),
        string_arg(args, "result_unit"),
        string_arg(args, "request"),
    ) {
        (Some(source), Some(result_unit), _) => {
            processor.process_specific_conversion_request(source, result_unit)
        }
        (_, _, Some(request)) => processor.process_conversion_request(request),
        _ => {
            return Err(McpError::invalid_params(
                "Expected 'source' and 'result_unit', or 'request'",
            ))
        }
    };

    let results = [result];
    Ok(json!({
        "content": [{ "type": "text", "text": format_results(&results) }],
        "result": result_to_json(&results[0]),
        "isError": results[0].is_error()
    }))
}

fn tool_help(processor: &UnitProcessor, args: &JsonValue) -> Result<JsonValue, McpError> {
    let text = help_text(processor, string_arg(args, "unit_type"));
    Ok(json!({
        "content": [{ "type": "text", "text": text }]
    }))
}

fn dimension_slug(name: &str) -> String {
    name.to_ascii_lowercase().replace(' ', "-")
}

fn handle_resources_list(processor: &UnitProcessor) -> Result<JsonValue, McpError> {
    let resources: Vec<JsonValue> = processor
        .dimensions()
        .iter()
        .map(|d| {
            json!({
                "uri": format!("{}{}", RESOURCE_PREFIX, dimension_slug(d.name())),
                "name": d.name(),
                "description": format!("{} units and their aliases", d.name()),
                "mimeType": "text/markdown",
                "_meta": {
                    "minBaseValue": d.min_value(),
                    "maxBaseValue": d.max_value()
                }
            })
        })
        .collect();

    Ok(json!({ "resources": resources }))
}

fn handle_resources_read(processor: &UnitProcessor, params: &Option<JsonValue>) -> Result<JsonValue, McpError> {
    let uri = params
        .as_ref()
        .and_then(|p| p.get("uri"))
        .and_then(|u| u.as_str())
        .ok_or_else(|| McpError::invalid_params("Missing uri parameter"))?;

    let slug = uri.strip_prefix(RESOURCE_PREFIX).ok_or_else(|| {
        McpError::invalid_params(format!(
            "Invalid URI: {}. Expected {}{{name}}",
            uri, RESOURCE_PREFIX
        ))
    })?;

    let dimension = processor
        .dimensions()
        .iter()
        .find(|d| dimension_slug(d.name()) == slug.to_ascii_lowercase())
        .ok_or_else(|| McpError::invalid_params(format!("Unknown unit type: {}", slug)))?;

    Ok(json!({
        "contents": [{
            "uri": uri,
            "mimeType": "text/markdown",
            "text": dimension_help(dimension)
        }]
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempbot_units::standard_processor;

    fn call(line: &str) -> JsonValue {
        let processor = standard_processor().unwrap();
        let response = handle_line(&processor, line).expect("response expected");
        serde_json::to_value(&response).unwrap()
    }

    #[test]
    fn test_parse_error() {
        let response = call("{not json");
        assert_eq!(response["error"]["code"], PARSE_ERROR);
        assert!(response.get("id").is_none());
    }

    #[test]
    fn test_notification_has_no_response() {
        let processor = standard_processor().unwrap();
        let line = r#"{"jsonrpc":"2.0","method":"initialized"}"#;
        assert!(handle_line(&processor, line).is_none());
    }

    #[test]
    fn test_unknown_method() {
        let response = call(r#"{"jsonrpc":"2.0","id":1,"method":"prompts/list"}"#);
        assert_eq!(response["error"]["code"], METHOD_NOT_FOUND);
        assert_eq!(response["id"], 1);
    }

    #[test]
    fn test_wrong_version() {
        let response = call(r#"{"jsonrpc":"1.0","id":1,"method":"ping"}"#);
        assert_eq!(response["error"]["code"], INVALID_REQUEST);
    }

    #[test]
    fn test_initialize_echoes_protocol() {
        let response = call(
            r#"{"jsonrpc":"2.0","id":"a","method":"initialize","params":{"protocolVersion":"2024-11-05","clientInfo":{"name":"test"}}}"#,
        );
        assert_eq!(response["result"]["protocolVersion"], "2024-11-05");
        assert_eq!(response["result"]["serverInfo"]["name"], SERVER_NAME);
    }

    #[test]
    fn test_tools_list() {
        let response = call(r#"{"jsonrpc":"2.0","id":1,"method":"tools/list"}"#);
        let names: Vec<&str> = response["result"]["tools"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|t| t["name"].as_str())
            .collect();
        assert_eq!(names, vec!["convert_message", "convert", "help"]);
    }

    #[test]
    fn test_convert_message_tool() {
        let response = call(
            r#"{"jsonrpc":"2.0","id":2,"method":"tools/call","params":{"name":"convert_message","arguments":{"text":"it was 32F and 500K"}}}"#,
        );
        let result = &response["result"];
        assert_eq!(result["content"][0]["text"], "**32 °F** = **0 °C**\n");
        assert_eq!(result["results"].as_array().unwrap().len(), 2);
        assert_eq!(result["results"][1]["kind"], "value_not_converted");
    }

    #[test]
    fn test_convert_message_empty_text() {
        let response = call(
            r#"{"jsonrpc":"2.0","id":2,"method":"tools/call","params":{"name":"convert_message","arguments":{"text":"   "}}}"#,
        );
        assert_eq!(response["result"]["results"].as_array().unwrap().len(), 0);
    }

    #[test]
    fn test_convert_tool_pair_and_request() {
        let response = call(
            r#"{"jsonrpc":"2.0","id":3,"method":"tools/call","params":{"name":"convert","arguments":{"source":"5C","result_unit":"Kelvin"}}}"#,
        );
        assert_eq!(response["result"]["content"][0]["text"], "**5 °C** = **278.15 K**\n");
        assert_eq!(response["result"]["isError"], false);

        let response = call(
            r#"{"jsonrpc":"2.0","id":4,"method":"tools/call","params":{"name":"convert","arguments":{"request":"5C to dummy"}}}"#,
        );
        assert_eq!(response["result"]["isError"], true);
        assert_eq!(response["result"]["result"]["kind"], "unknown_unit_type");
    }

    #[test]
    fn test_convert_tool_missing_args() {
        let response = call(
            r#"{"jsonrpc":"2.0","id":5,"method":"tools/call","params":{"name":"convert","arguments":{"source":"5C"}}}"#,
        );
        assert_eq!(response["error"]["code"], INVALID_PARAMS);
    }

    #[test]
    fn test_unknown_tool() {
        let response = call(
            r#"{"jsonrpc":"2.0","id":6,"method":"tools/call","params":{"name":"eval","arguments":{}}}"#,
        );
        assert_eq!(response["error"]["code"], INVALID_PARAMS);
    }

    #[test]
    fn test_help_tool() {
        let response = call(
            r#"{"jsonrpc":"2.0","id":7,"method":"tools/call","params":{"name":"help","arguments":{"unit_type":"Temperature"}}}"#,
        );
        let text = response["result"]["content"][0]["text"].as_str().unwrap();
        assert!(text.starts_with("These are the Temperature units I can convert:"));
    }

    #[test]
    fn test_resources() {
        let response = call(r#"{"jsonrpc":"2.0","id":8,"method":"resources/list"}"#);
        assert_eq!(
            response["result"]["resources"][2]["uri"],
            "tempbot://dimensions/blood-sugar"
        );
        let temperature = &response["result"]["resources"][0];
        assert_eq!(temperature["_meta"]["minBaseValue"], 0.0);
        assert!(temperature["_meta"]["maxBaseValue"].is_null());

        let response = call(
            r#"{"jsonrpc":"2.0","id":9,"method":"resources/read","params":{"uri":"tempbot://dimensions/blood-sugar"}}"#,
        );
        let text = response["result"]["contents"][0]["text"].as_str().unwrap();
        assert!(text.contains("**milligrams per deciliter** (milligrams per deciliter, mg/dL, mg/dl)"));

        let response = call(
            r#"{"jsonrpc":"2.0","id":10,"method":"resources/read","params":{"uri":"tempbot://dimensions/volume"}}"#,
        );
        assert_eq!(response["error"]["code"], INVALID_PARAMS);
    }
}
