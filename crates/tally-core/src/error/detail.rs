//! Server error body handling.
//!
//! The backend reports failures as `{"detail": "..."}`, or for request
//! validation failures as `{"detail": [{"loc": [...], "msg": "..."}]}`.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

const MAX_DETAIL_CHARS: usize = 1_024;

static BEARER_TOKEN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bBearer\s+[A-Za-z0-9._\-+/=]{8,}").expect("valid bearer token regex")
});

/// Pull the human-readable `detail` out of an error body.
///
/// Returns `None` when the body is not JSON, has no `detail`, or the detail
/// is empty. Callers fall back to a generic message in that case.
pub fn extract_detail(body: &str) -> Option<String> {
    let json: Value = serde_json::from_str(body.trim()).ok()?;
    let detail = match json.get("detail")? {
        Value::String(text) => text.clone(),
        Value::Array(items) => items
            .iter()
            .find_map(|item| item.get("msg").and_then(Value::as_str))
            .map(str::to_string)?,
        _ => return None,
    };

    let detail = sanitize_server_text(&detail);
    if detail.is_empty() { None } else { Some(detail) }
}

/// Redact bearer credentials and cap the length of server supplied text.
pub fn sanitize_server_text(raw: &str) -> String {
    let redacted = BEARER_TOKEN_RE.replace_all(raw.trim(), "Bearer [REDACTED]");
    let char_count = redacted.chars().count();
    if char_count <= MAX_DETAIL_CHARS {
        return redacted.into_owned();
    }

    let truncated: String = redacted.chars().take(MAX_DETAIL_CHARS).collect();
    format!(
        "{}... [truncated {} chars]",
        truncated,
        char_count - MAX_DETAIL_CHARS
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_detail() {
        assert_eq!(
            extract_detail(r#"{"detail": "Invalid credentials"}"#),
            Some("Invalid credentials".to_string())
        );
    }

    #[test]
    fn test_validation_list_detail() {
        let body = r#"{"detail": [{"loc": ["body", "password"], "msg": "ensure this value has at least 6 characters", "type": "value_error"}]}"#;
        assert_eq!(
            extract_detail(body),
            Some("ensure this value has at least 6 characters".to_string())
        );
    }

    #[test]
    fn test_missing_or_unusable_detail() {
        assert_eq!(extract_detail("Internal Server Error"), None);
        assert_eq!(extract_detail(r#"{"error": "x"}"#), None);
        assert_eq!(extract_detail(r#"{"detail": 42}"#), None);
        assert_eq!(extract_detail(r#"{"detail": "   "}"#), None);
        assert_eq!(extract_detail(""), None);
    }

    #[test]
    fn test_bearer_redaction() {
        let text = sanitize_server_text("rejected Bearer abcdefghijklmnop");
        assert_eq!(text, "rejected Bearer [REDACTED]");
    }

    #[test]
    fn test_truncation() {
        let long = "x".repeat(MAX_DETAIL_CHARS + 10);
        let text = sanitize_server_text(&long);
        assert!(text.ends_with("[truncated 10 chars]"));
    }
}
