use std::path::PathBuf;

/// The name of the per-user gamifier folder
pub const GAMIFIER_FOLDER: &str = ".gamifier";

/// Environment variable overriding the gamifier home directory
pub const GAMIFIER_HOME_ENV: &str = "GAMIFIER_HOME";

/// Resolve the gamifier home directory (`~/.gamifier`).
///
/// If `GAMIFIER_HOME` is set, that directory is used instead. This lets tests
/// and CI run against an isolated store without touching the user's data.
#[must_use]
pub fn gamifier_home() -> PathBuf {
    if let Ok(home) = std::env::var(GAMIFIER_HOME_ENV) {
        return PathBuf::from(home);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(GAMIFIER_FOLDER)
}

/// Get current timestamp in ISO 8601 format.
///
/// Fixed nanosecond precision keeps timestamps ordered as plain strings.
#[must_use]
pub fn now_iso() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Nanos, true)
}

/// Generate a fresh row identifier.
#[must_use]
pub fn new_row_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Trim a user-supplied name, rejecting it when nothing is left.
#[must_use]
pub fn non_empty(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

#[cfg(test)]
#[path = "utils_tests.rs"]
mod tests;
