pub mod input_parser;
pub mod response_formatter;

pub use input_parser::{extract_user_message, parse_request_body};
pub use response_formatter::format_response;

/// Characters of user or model text included in log lines.
const LOG_PREVIEW_CHARS: usize = 50;

/// First few characters of `text`, for logging without dumping whole messages.
pub(crate) fn log_preview(text: &str) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(LOG_PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        format!("{}...", head)
    } else {
        head
    }
}
