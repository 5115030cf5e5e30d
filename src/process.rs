// ABOUTME: Shared helpers for local subprocesses (dotnet, scp, debug adapters).
// ABOUTME: Merges captured stdout and stderr into one diagnostic string.

/// Join trimmed stdout and stderr, skipping whichever is empty.
pub fn combine_output(stdout: &[u8], stderr: &[u8]) -> String {
    let stdout = String::from_utf8_lossy(stdout);
    let stderr = String::from_utf8_lossy(stderr);
    [stdout.trim(), stderr.trim()]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skips_empty_streams() {
        assert_eq!(combine_output(b"", b"permission denied\n"), "permission denied");
        assert_eq!(combine_output(b"a\n", b"b\n"), "a\nb");
        assert_eq!(combine_output(b"", b""), "");
    }
}
