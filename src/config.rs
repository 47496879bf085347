use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub coordinator: CoordinatorSettings,
    #[serde(default)]
    pub matching: MatchingSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CoordinatorSettings {
    /// Give up on suppliers after this many milliseconds. Unset waits forever.
    pub resolve_timeout_ms: Option<u64>,
}

impl CoordinatorSettings {
    pub fn resolve_timeout(&self) -> Option<Duration> {
        self.resolve_timeout_ms.map(Duration::from_millis)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MatchingSettings {
    /// Pair unassigned candidates with a placeholder instead of leaving them out.
    #[serde(default = "default_use_placeholders")]
    pub use_placeholders: bool,
    #[serde(default = "default_placeholder_name")]
    pub placeholder_name: String,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            use_placeholders: default_use_placeholders(),
            placeholder_name: default_placeholder_name(),
        }
    }
}

fn default_use_placeholders() -> bool { true }
fn default_placeholder_name() -> String { "(unassigned)".to_string() }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration files (config/default, then config/local)
    /// 3. Environment variables (prefixed with MENTOR_MATCH)
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            // Local overrides for development
            .add_source(File::with_name("config/local").required(false))
            // e.g., MENTOR_MATCH__LOGGING__LEVEL -> logging.level
            .add_source(environment())
            .build()?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(environment())
            .build()?;

        settings.try_deserialize()
    }
}

fn environment() -> Environment {
    Environment::with_prefix("MENTOR_MATCH")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    fn from_toml(toml: &str) -> Settings {
        Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_default_logging() {
        let level = default_log_level();
        let format = default_log_format();
        assert_eq!(level, "info");
        assert_eq!(format, "json");
    }

    #[test]
    fn test_empty_source_uses_defaults() {
        let settings = from_toml("");

        assert_eq!(settings.coordinator.resolve_timeout(), None);
        assert!(settings.matching.use_placeholders);
        assert_eq!(settings.matching.placeholder_name, "(unassigned)");
        assert_eq!(settings.logging.level, "info");
    }

    #[test]
    fn test_sections_override_defaults() {
        let settings = from_toml(
            r#"
            [coordinator]
            resolve_timeout_ms = 1500

            [matching]
            use_placeholders = false

            [logging]
            format = "pretty"
            "#,
        );

        assert_eq!(
            settings.coordinator.resolve_timeout(),
            Some(Duration::from_millis(1500))
        );
        assert!(!settings.matching.use_placeholders);
        assert_eq!(settings.matching.placeholder_name, "(unassigned)");
        assert_eq!(settings.logging.format, "pretty");
        assert_eq!(settings.logging.level, "info");
    }
}
