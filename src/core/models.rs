use serde::{Deserialize, Serialize};

/// Body of `POST /summarize`. Unknown fields are ignored; an absent or `null`
/// `email_body` reads as the empty string.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SummarizeRequest {
    #[serde(default)]
    pub email_body: Option<String>,
}

impl SummarizeRequest {
    #[must_use]
    pub fn new(email_body: impl Into<String>) -> Self {
        Self {
            email_body: Some(email_body.into()),
        }
    }

    #[must_use]
    pub fn email_body(&self) -> &str {
        self.email_body.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummarizeResponse {
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub backend: String,
    pub model: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_and_null_bodies_read_as_empty() {
        let missing: SummarizeRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(missing.email_body(), "");

        let null: SummarizeRequest = serde_json::from_str(r#"{"email_body": null}"#).unwrap();
        assert_eq!(null.email_body(), "");
    }

    #[test]
    fn extra_fields_are_ignored() {
        let req: SummarizeRequest =
            serde_json::from_str(r#"{"email_body": "hi", "subject": "x"}"#).unwrap();
        assert_eq!(req.email_body(), "hi");
    }

    #[test]
    fn non_string_bodies_are_rejected() {
        assert!(serde_json::from_str::<SummarizeRequest>(r#"{"email_body": 42}"#).is_err());
        assert!(serde_json::from_str::<SummarizeRequest>(r#""text""#).is_err());
    }
}
