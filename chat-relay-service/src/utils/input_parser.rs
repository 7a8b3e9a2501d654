//! Extraction of the user's message from the incoming form payload.
//!
//! Form submissions arrive as `{"data": {"user-message": "...", ...}}`; every
//! other field is ignored and no schema is enforced beyond that lookup.

use serde_json::{Map, Value};

const DATA_FIELD: &str = "data";
const MESSAGE_FIELD: &str = "user-message";

/// Parse a raw request body as JSON. An empty body is treated as `{}`.
pub fn parse_request_body(body: &[u8]) -> Result<Value, serde_json::Error> {
    if body.is_empty() {
        return Ok(Value::Object(Map::new()));
    }
    serde_json::from_slice(body)
}

/// Return the trimmed `data["user-message"]` string, or `None` when the body
/// has any other shape or the message is blank.
pub fn extract_user_message(body: &Value) -> Option<String> {
    let Some(data) = body.get(DATA_FIELD).filter(|d| d.is_object()) else {
        tracing::warn!("Input body is not an object or is missing the 'data' field");
        return None;
    };

    match data.get(MESSAGE_FIELD).and_then(Value::as_str).map(trim_message) {
        Some(message) if !message.is_empty() => Some(message.to_string()),
        _ => {
            tracing::warn!("Could not find a valid 'user-message' string in body.data");
            None
        }
    }
}

/// Trim Unicode whitespace plus the byte-order mark, which form encoders
/// sometimes leave at the start of a field.
fn trim_message(message: &str) -> &str {
    message.trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}')
}
