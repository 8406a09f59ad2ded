//! JSON-RPC 2.0 envelope and method dispatch
//!
//! Only the `utils` namespace is served. Batches are answered entry by entry
//! in request order.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::api::UtilsApi;
use crate::codec::{Bech32Codec, HexCodec};
use crate::metrics::Metrics;

pub const JSONRPC_VERSION: &str = "2.0";

/// `utils_convertAddress(address: string) -> string`
pub const METHOD_CONVERT_ADDRESS: &str = "utils_convertAddress";

// Standard JSON-RPC error codes
pub const PARSE_ERROR: i32 = -32700;
pub const INVALID_REQUEST: i32 = -32600;
pub const METHOD_NOT_FOUND: i32 = -32601;
pub const INVALID_PARAMS: i32 = -32602;
/// Application error: the method ran and returned an error
pub const SERVER_ERROR: i32 = -32000;

#[derive(Debug, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    pub method: String,
    #[serde(default)]
    pub params: Value,
    #[serde(default)]
    pub id: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
    pub id: Value,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
}

impl JsonRpcResponse {
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            result: Some(result),
            error: None,
            id,
        }
    }

    pub fn failure(id: Value, code: i32, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            result: None,
            error: Some(JsonRpcError {
                code,
                message: message.into(),
            }),
            id,
        }
    }
}

/// Answer a raw HTTP body: a single call, a batch, or garbage
pub fn handle_body<H: HexCodec, B: Bech32Codec>(
    api: &UtilsApi<H, B>,
    metrics: &Metrics,
    body: &[u8],
) -> Value {
    let payload: Value = match serde_json::from_slice(body) {
        Ok(payload) => payload,
        Err(e) => {
            metrics.rpc_errors_total.inc();
            return to_value(JsonRpcResponse::failure(
                Value::Null,
                PARSE_ERROR,
                format!("parse error: {e}"),
            ));
        }
    };

    match payload {
        Value::Array(calls) if calls.is_empty() => {
            metrics.rpc_errors_total.inc();
            to_value(JsonRpcResponse::failure(
                Value::Null,
                INVALID_REQUEST,
                "empty batch",
            ))
        }
        Value::Array(calls) => Value::Array(
            calls
                .into_iter()
                .map(|call| to_value(handle_call(api, metrics, call)))
                .collect(),
        ),
        call => to_value(handle_call(api, metrics, call)),
    }
}

/// Answer one JSON-RPC call
pub fn handle_call<H: HexCodec, B: Bech32Codec>(
    api: &UtilsApi<H, B>,
    metrics: &Metrics,
    call: Value,
) -> JsonRpcResponse {
    metrics.rpc_requests_total.inc();

    let response = dispatch(api, metrics, call);
    if response.error.is_some() {
        metrics.rpc_errors_total.inc();
    }
    response
}

fn dispatch<H: HexCodec, B: Bech32Codec>(
    api: &UtilsApi<H, B>,
    metrics: &Metrics,
    call: Value,
) -> JsonRpcResponse {
    let id = call.get("id").cloned().unwrap_or(Value::Null);

    let request: JsonRpcRequest = match serde_json::from_value(call) {
        Ok(request) => request,
        Err(e) => {
            return JsonRpcResponse::failure(id, INVALID_REQUEST, format!("invalid request: {e}"))
        }
    };

    if request.jsonrpc != JSONRPC_VERSION {
        return JsonRpcResponse::failure(
            request.id,
            INVALID_REQUEST,
            format!("unsupported jsonrpc version {:?}", request.jsonrpc),
        );
    }

    debug!(method = %request.method, id = %request.id, "JSON-RPC call");

    match request.method.as_str() {
        METHOD_CONVERT_ADDRESS => convert_address(api, metrics, request),
        _ => JsonRpcResponse::failure(
            request.id,
            METHOD_NOT_FOUND,
            format!("the method {} does not exist/is not available", request.method),
        ),
    }
}

fn convert_address<H: HexCodec, B: Bech32Codec>(
    api: &UtilsApi<H, B>,
    metrics: &Metrics,
    request: JsonRpcRequest,
) -> JsonRpcResponse {
    let address = match single_string_param(&request.params) {
        Ok(address) => address,
        Err(message) => return JsonRpcResponse::failure(request.id, INVALID_PARAMS, message),
    };

    match api.convert_address_tagged(address) {
        Ok(converted) => {
            metrics.record_conversion(converted.from);
            JsonRpcResponse::success(request.id, Value::String(converted.address))
        }
        Err(e) => {
            metrics.conversion_failures_total.inc();
            JsonRpcResponse::failure(request.id, SERVER_ERROR, e.to_string())
        }
    }
}

fn single_string_param(params: &Value) -> Result<&str, String> {
    let params: &[Value] = match params {
        Value::Array(params) => params.as_slice(),
        Value::Null => &[],
        _ => return Err("non-array args".to_string()),
    };

    match params {
        [] => Err("missing value for required argument 0".to_string()),
        [Value::String(address)] => Ok(address.as_str()),
        [_] => Err("invalid argument 0: expected a string".to_string()),
        _ => Err("too many arguments, want at most 1".to_string()),
    }
}

fn to_value(response: JsonRpcResponse) -> Value {
    // A struct of strings, numbers and JSON values always serializes
    serde_json::to_value(response).unwrap_or(Value::Null)
}
