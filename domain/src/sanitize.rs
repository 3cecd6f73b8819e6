//! Input sanitization for campaign text fields.
//!
//! This is a fixed character substitution, not percent-encoding: only space,
//! `'` and `"` are touched. Characters such as `&`, `=`, `#` and `%` pass
//! through and can still break the assembled query string.

/// Sanitize one raw submitted value. Absent input yields an empty string.
///
/// In a single pass: space becomes `%20`, `'` is dropped, `"` becomes `%22`,
/// and a backslash escaping either quote is removed along with the escape.
pub fn sanitize(raw: Option<&str>) -> String {
    let raw = raw.unwrap_or_default();
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            ' ' => out.push_str("%20"),
            '\'' => {}
            '"' => out.push_str("%22"),
            // Only quote escapes are undone; `\\` and other backslashes stay literal.
            '\\' if matches!(chars.peek(), Some('\'') | Some('"')) => {}
            other => out.push(other),
        }
    }
    out
}
