//! API Gateway proxy response builders.
//!
//! Every response carries permissive CORS headers so browser clients on any
//! origin can call the function URL directly.

use serde::Serialize;
use serde_json::{Value, json};

use crate::errors::SummarizerError;

fn cors_headers() -> Value {
    json!({
        "Content-Type": "application/json",
        "Access-Control-Allow-Origin": "*",
        "Access-Control-Allow-Methods": "GET, POST, OPTIONS",
        "Access-Control-Allow-Headers": "*"
    })
}

/// Returns a response with the given status code and JSON-serialized body.
#[must_use]
pub fn json_response<T: Serialize>(status_code: u16, body: &T) -> Value {
    let body = serde_json::to_string(body).unwrap_or_else(|_| "{}".to_string());
    json!({
        "statusCode": status_code,
        "headers": cors_headers(),
        "body": body
    })
}

/// Returns a 200 OK response with the given JSON body.
#[must_use]
pub fn ok_json<T: Serialize>(body: &T) -> Value {
    json_response(200, body)
}

/// Returns an error response with the given status code and message.
#[must_use]
pub fn err_response(status_code: u16, message: &str) -> Value {
    json_response(status_code, &json!({ "error": message }))
}

#[must_use]
pub fn error_to_response(error: &SummarizerError) -> Value {
    err_response(error.status_code(), &error.to_string())
}

/// Returns a 204 response to a CORS preflight.
#[must_use]
pub fn preflight() -> Value {
    json!({
        "statusCode": 204,
        "headers": cors_headers(),
        "body": ""
    })
}
