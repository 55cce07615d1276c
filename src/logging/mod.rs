mod init;
pub use init::{init_logging, parse_level, parse_rotation};
use std::path::PathBuf;
use tracing::Level;
use tracing_appender::rolling::Rotation;
/// Log filename used by the admin binary.
pub const LOG_FILENAME: &str = "gamifier-admin.log";
/// Configuration for the logging system.
pub struct LogConfig {
    pub log_dir: PathBuf,
    pub log_level: Level,
    pub json_format: bool,
    pub rotation: Rotation,
}
impl Default for LogConfig {
    fn default() -> Self {
        Self {
            log_dir: crate::utils::gamifier_home().join("logs"),
            log_level: Level::INFO,
            json_format: false,
            rotation: Rotation::DAILY,
        }
    }
}
impl LogConfig {
    /// Build from the `[logging]` section, with `json` forced on when set.
    #[must_use]
    pub fn from_settings(settings: &crate::config::LoggingConfig, log_dir: PathBuf, json: bool) -> Self {
        Self {
            log_dir,
            log_level: parse_level(&settings.level),
            json_format: json || settings.json,
            rotation: parse_rotation(&settings.rotation),
        }
    }
}
#[cfg(test)]
#[path = "../logging_tests.rs"]
mod logging_tests;
