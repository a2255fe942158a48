use serde_json::Value;

/// Token field issued by the backend's sign-in endpoint.
pub const ACCESS_TOKEN_FIELD: &str = "access_token";

pub fn access_token(body: &Value) -> Option<&str> {
    body.get(ACCESS_TOKEN_FIELD)
        .and_then(Value::as_str)
        .filter(|token| !token.is_empty())
}

/// Extracts the backend's error `message`, which is either a string or a
/// list of validation strings.
pub fn error_message(body: &Value) -> Option<String> {
    match body.get("message")? {
        Value::String(message) if !message.is_empty() => Some(message.clone()),
        Value::Array(items) => {
            let parts: Vec<&str> = items.iter().filter_map(Value::as_str).collect();
            if parts.is_empty() {
                None
            } else {
                Some(parts.join(", "))
            }
        }
        _ => None,
    }
}
