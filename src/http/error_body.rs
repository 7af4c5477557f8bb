//! Summaries of error response bodies.

/// Longest plain-text body kept in an error message.
const MAX_PLAIN_LEN: usize = 512;

/// Summarize an error body for display, extracting the message from JSON if present.
///
/// Handles the shapes the web backend and its gateway produce:
/// - `{"detail": "..."}` and `{"detail": {"message": "..."}}`
/// - `{"error": {"message": "...", "code": "..."}}`
/// - `{"error": "..."}` and `{"message": "..."}`
/// - anything else is returned as-is, truncated
#[must_use]
pub fn summarize_body(body: &str) -> String {
    let trimmed = body.trim();
    if let Ok(json) = serde_json::from_str::<serde_json::Value>(trimmed)
        && let Some(msg) = extract_message(&json)
    {
        return msg;
    }

    truncate(trimmed)
}

fn extract_message(json: &serde_json::Value) -> Option<String> {
    if let Some(detail) = json.get("detail") {
        if let Some(msg) = detail.as_str() {
            return Some(msg.to_string());
        }
        if let Some(msg) = detail.get("message").and_then(|v| v.as_str()) {
            return Some(msg.to_string());
        }
    }

    if let Some(error_obj) = json.get("error") {
        if let Some(msg) = error_obj.get("message").and_then(|v| v.as_str()) {
            return Some(match error_obj.get("code").and_then(|v| v.as_str()) {
                Some(code) => format!("{msg} (code: {code})"),
                None => msg.to_string(),
            });
        }
        if let Some(msg) = error_obj.as_str() {
            return Some(msg.to_string());
        }
    }

    json.get("message")
        .and_then(|v| v.as_str())
        .map(str::to_string)
}

fn truncate(text: &str) -> String {
    match text.char_indices().nth(MAX_PLAIN_LEN) {
        Some((end, _)) => format!("{}...", &text[..end]),
        None => text.to_string(),
    }
}
