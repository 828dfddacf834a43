//! Helpers for collectd metric identifiers (`<hostname>/<plugin>/<type>`).

/// Ensure a metric path starts with exactly one `/`.
///
/// `"cpu-0/cpu-user"`, `"/cpu-0/cpu-user"` and `"//cpu-0/cpu-user"` all
/// become `"/cpu-0/cpu-user"`.
pub fn normalize_path(path: &str) -> String {
    format!("/{}", path.trim_start_matches('/'))
}

/// Hostname prefix of an identifier: everything before the first `/`.
pub fn hostname_of(identifier: &str) -> &str {
    identifier.split('/').next().unwrap_or(identifier)
}

/// Join a hostname with an already-normalized metric path.
pub fn qualify(hostname: &str, normalized_path: &str) -> String {
    format!("{hostname}{normalized_path}")
}
