//! Request parsing shared by the HTTP server and the Lambda adapter.

use base64::{Engine as _, engine::general_purpose};
use serde_json::Value;

use crate::core::models::SummarizeRequest;
use crate::errors::SummarizerError;

/// Accepts `application/json` and any `+json` media type, with parameters.
#[must_use]
pub fn is_json_content_type(content_type: &str) -> bool {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();

    essence == "application/json"
        || (essence.starts_with("application/") && essence.ends_with("+json"))
}

/// Validates the content type and decodes a `POST /summarize` body.
///
/// # Errors
///
/// `UnsupportedMediaType` when the content type is missing or not JSON,
/// `PayloadTooLarge` past `max_body_bytes`, and `BadRequest` when the body is
/// not a JSON object with an optional string `email_body`.
pub fn parse_summarize_request(
    content_type: Option<&str>,
    body: &[u8],
    max_body_bytes: usize,
) -> Result<SummarizeRequest, SummarizerError> {
    match content_type {
        Some(ct) if is_json_content_type(ct) => {}
        Some(ct) => {
            return Err(SummarizerError::UnsupportedMediaType(format!(
                "expected application/json, got '{ct}'"
            )));
        }
        None => {
            return Err(SummarizerError::UnsupportedMediaType(
                "missing Content-Type header".to_string(),
            ));
        }
    }

    if body.len() > max_body_bytes {
        return Err(SummarizerError::PayloadTooLarge(format!(
            "{} bytes exceeds the {max_body_bytes} byte limit",
            body.len()
        )));
    }

    let value: Value = serde_json::from_slice(body)
        .map_err(|e| SummarizerError::BadRequest(format!("Invalid JSON: {e}")))?;

    if !value.is_object() {
        return Err(SummarizerError::BadRequest(
            "Request body must be a JSON object".to_string(),
        ));
    }

    serde_json::from_value(value)
        .map_err(|e| SummarizerError::BadRequest(format!("Invalid request: {e}")))
}

pub fn get_header_value<'a>(headers: &'a Value, name: &str) -> Option<&'a str> {
    if let Some(v) = headers.get(name).and_then(|s| s.as_str()) {
        return Some(v);
    }
    headers.as_object().and_then(|map| {
        map.iter().find_map(|(k, v)| {
            if k.eq_ignore_ascii_case(name) {
                v.as_str()
            } else {
                None
            }
        })
    })
}

/// Request path of an API Gateway proxy event (v2 `rawPath`, v1 `path`).
pub fn event_path(payload: &Value) -> Option<&str> {
    payload
        .get("rawPath")
        .and_then(|v| v.as_str())
        .or_else(|| payload.get("path").and_then(|v| v.as_str()))
}

/// HTTP method of an API Gateway proxy event (v2 `requestContext.http.method`,
/// v1 `httpMethod`).
pub fn event_method(payload: &Value) -> Option<&str> {
    payload
        .get("requestContext")
        .and_then(|c| c.get("http"))
        .and_then(|h| h.get("method"))
        .and_then(|m| m.as_str())
        .or_else(|| payload.get("httpMethod").and_then(|v| v.as_str()))
}

/// Raw body bytes of an API Gateway proxy event, base64-decoded when flagged.
///
/// # Errors
///
/// Returns `BadRequest` if the body is not a string or fails to decode.
pub fn event_body(payload: &Value) -> Result<Vec<u8>, SummarizerError> {
    let body = match payload.get("body") {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::String(s)) => s,
        Some(_) => {
            return Err(SummarizerError::BadRequest(
                "Invalid body format".to_string(),
            ));
        }
    };

    let encoded = payload
        .get("isBase64Encoded")
        .and_then(Value::as_bool)
        .unwrap_or(false);

    if encoded {
        general_purpose::STANDARD
            .decode(body)
            .map_err(|e| SummarizerError::BadRequest(format!("Failed to decode body: {e}")))
    } else {
        Ok(body.as_bytes().to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const LIMIT: usize = 1024;

    #[test]
    fn json_content_types() {
        assert!(is_json_content_type("application/json"));
        assert!(is_json_content_type("Application/JSON; charset=utf-8"));
        assert!(is_json_content_type("application/vnd.api+json"));
        assert!(!is_json_content_type("text/plain"));
        assert!(!is_json_content_type("application/x-www-form-urlencoded"));
    }

    #[test]
    fn parses_valid_request() {
        let req = parse_summarize_request(
            Some("application/json"),
            br#"{"email_body": "hello"}"#,
            LIMIT,
        )
        .unwrap();
        assert_eq!(req.email_body(), "hello");
    }

    #[test]
    fn missing_field_is_empty_string() {
        let req = parse_summarize_request(Some("application/json"), b"{}", LIMIT).unwrap();
        assert_eq!(req.email_body(), "");
    }

    #[test]
    fn rejects_missing_or_wrong_content_type() {
        let err = parse_summarize_request(None, b"{}", LIMIT).unwrap_err();
        assert_eq!(err.status_code(), 415);

        let err = parse_summarize_request(Some("text/plain"), b"{}", LIMIT).unwrap_err();
        assert_eq!(err.status_code(), 415);
    }

    #[test]
    fn rejects_malformed_json() {
        let err =
            parse_summarize_request(Some("application/json"), b"{\"email_body\":", LIMIT)
                .unwrap_err();
        assert!(matches!(err, SummarizerError::BadRequest(_)));
        assert_eq!(err.status_code(), 400);
    }

    #[test]
    fn rejects_non_object_bodies() {
        let bodies: [&[u8]; 4] = [b"[\"hello\"]", b"\"hello\"", b"42", b"null"];
        for body in bodies {
            let err = parse_summarize_request(Some("application/json"), body, LIMIT).unwrap_err();
            assert_eq!(err.status_code(), 400, "body {:?}", String::from_utf8_lossy(body));
        }
    }

    #[test]
    fn rejects_wrong_field_type() {
        let err = parse_summarize_request(
            Some("application/json"),
            br#"{"email_body": ["a", "b"]}"#,
            LIMIT,
        )
        .unwrap_err();
        assert_eq!(err.status_code(), 400);
    }

    #[test]
    fn rejects_oversized_body() {
        let body = vec![b' '; LIMIT + 1];
        let err = parse_summarize_request(Some("application/json"), &body, LIMIT).unwrap_err();
        assert_eq!(err.status_code(), 413);
    }

    #[test]
    fn header_lookup_is_case_insensitive() {
        let headers = json!({ "content-type": "application/json" });
        assert_eq!(
            get_header_value(&headers, "Content-Type"),
            Some("application/json")
        );
        assert_eq!(get_header_value(&headers, "Origin"), None);
    }

    #[test]
    fn reads_v1_and_v2_event_shapes() {
        let v2 = json!({
            "rawPath": "/summarize",
            "requestContext": { "http": { "method": "POST" } }
        });
        assert_eq!(event_path(&v2), Some("/summarize"));
        assert_eq!(event_method(&v2), Some("POST"));

        let v1 = json!({ "path": "/health", "httpMethod": "GET" });
        assert_eq!(event_path(&v1), Some("/health"));
        assert_eq!(event_method(&v1), Some("GET"));
    }

    #[test]
    fn decodes_base64_bodies() {
        let encoded = general_purpose::STANDARD.encode(r#"{"email_body":"hi"}"#);
        let payload = json!({ "body": encoded, "isBase64Encoded": true });
        assert_eq!(event_body(&payload).unwrap(), br#"{"email_body":"hi"}"#.to_vec());

        let plain = json!({ "body": "{}", "isBase64Encoded": false });
        assert_eq!(event_body(&plain).unwrap(), b"{}".to_vec());

        assert!(event_body(&json!({})).unwrap().is_empty());
        assert!(event_body(&json!({ "body": "%%", "isBase64Encoded": true })).is_err());
        assert!(event_body(&json!({ "body": 5 })).is_err());
    }
}
