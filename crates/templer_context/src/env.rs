//! Environment variable input.

use std::collections::BTreeMap;

use tracing::warn;

/// Environment variables available to context resolution, by name.
pub type EnvVars = BTreeMap<String, String>;

/// Snapshot the current process environment.
///
/// Variables whose name or value is not valid unicode are skipped.
pub fn process_env() -> EnvVars {
    std::env::vars_os()
        .filter_map(|(key, value)| match (key.into_string(), value.into_string()) {
            (Ok(key), Ok(value)) => Some((key, value)),
            (key, _) => {
                warn!("Skipping environment variable with non-unicode content: {:?}", key);
                None
            }
        })
        .collect()
}

/// Parse `KEY=VALUE` assignments.
///
/// Whitespace around key and value is trimmed; the value may itself contain
/// `=`. Returns the offending input when it has no `=` or an empty key.
pub fn parse_assignment(input: &str) -> Result<(String, String), String> {
    match input.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.trim().to_string()))
        }
        _ => Err(format!("expected KEY=VALUE, got '{}'", input)),
    }
}
