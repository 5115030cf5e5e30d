// ABOUTME: POSIX shell quoting for remote command construction.
// ABOUTME: Keeps a leading `~/` unquoted so the remote shell still expands it.

/// Quote `value` for a POSIX shell.
pub fn quote(value: &str) -> String {
    if let Some(rest) = value.strip_prefix("~/") {
        return format!("~/{}", quote(rest));
    }
    if !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '/' | '.' | '_' | '-' | ':' | '@'))
    {
        return value.to_string();
    }
    format!("'{}'", value.replace('\'', "'\\''"))
}
