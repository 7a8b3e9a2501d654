/// Shape the gateway's text for the client. Currently the identity.
pub fn format_response(ai_response: &str) -> String {
    ai_response.to_string()
}
