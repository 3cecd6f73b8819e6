//! Shared HTTP utilities for the campaign URL creator workspace.
//!
//! Provides common JSON error builders, HTML escaping and small URL helpers
//! used by the admin server and its tests.

// ============================================================================
// JSON Response Helpers (framework-agnostic)
// ============================================================================

/// Create a structured error JSON with a default message based on the code.
///
/// Returns: `{"error": {"code": "<code>", "message": "<default message>"}}`
pub fn json_err(code: &str) -> serde_json::Value {
    let message = match code {
        "not_found" => "Resource not found",
        "bad_request" => "Bad request",
        "forbidden" => "Access denied",
        "missing_required_field" => "Required campaign fields are missing",
        "error" | "internal" => "Internal server error",
        _ => code, // Fallback to code as message for unknown codes
    };
    serde_json::json!({"error": {"code": code, "message": message}})
}

/// Create a structured error JSON with a custom message.
///
/// Returns: `{"error": {"code": "<code>", "message": "<message>"}}`
pub fn json_error_with_message(code: &str, message: &str) -> serde_json::Value {
    serde_json::json!({"error": {"code": code, "message": message}})
}

/// Error JSON listing the missing field keys under `error.missing`.
pub fn json_missing_fields<'a, I>(missing: I) -> serde_json::Value
where
    I: IntoIterator<Item = &'a str>,
{
    let keys: Vec<&str> = missing.into_iter().collect();
    let message = format!("missing required fields: {}", keys.join(", "));
    serde_json::json!({"error": {
        "code": "missing_required_field",
        "message": message,
        "missing": keys,
    }})
}

// ============================================================================
// HTML
// ============================================================================

/// Escape text for HTML element content and quoted attribute values.
///
/// Entities render back to the original characters, so displayed values are
/// unchanged.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

// ============================================================================
// URL Helpers
// ============================================================================

/// Check that a base URL uses http or https and has a host part.
pub fn is_http_url(s: &str) -> bool {
    let rest = s
        .strip_prefix("https://")
        .or_else(|| s.strip_prefix("http://"));
    matches!(rest, Some(r) if !r.is_empty() && !r.starts_with('/'))
}

/// Look up a query parameter in a full URL or bare query string, without
/// percent-decoding the value.
///
/// Returns the first match. Everything after `#` is ignored.
pub fn raw_query_param<'a>(url: &'a str, name: &str) -> Option<&'a str> {
    let without_fragment = url.split('#').next().unwrap_or(url);
    let query = match without_fragment.split_once('?') {
        Some((_, q)) => q,
        None => without_fragment,
    };
    for pair in query.split('&') {
        let mut it = pair.splitn(2, '=');
        let key = it.next()?;
        if key == name {
            return Some(it.next().unwrap_or(""));
        }
    }
    None
}
