//! Application settings.
//!
//! Layered configuration: built-in defaults, an optional `mindstone.toml`
//! file, and `MINDSTONE_*` environment variables, in ascending precedence.

use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Runtime settings for the quiz engine and its front-end.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Settings {
    /// Directory holding persisted progress and the mock credential store.
    pub data_dir: PathBuf,
    /// Questions per extended-questionnaire page.
    pub page_size: usize,
    /// Simulated-analysis delay before the report is shown, in seconds.
    pub analysis_delay_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(".mindstone"),
            page_size: 10,
            analysis_delay_secs: 3,
        }
    }
}

impl Settings {
    /// Load settings, optionally from an explicit config file.
    ///
    /// Without an explicit path, a `mindstone.toml` in the working
    /// directory is used when present.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let defaults = Settings::default();
        let mut builder = Config::builder()
            .set_default("data_dir", defaults.data_dir.to_string_lossy().to_string())?
            .set_default("page_size", defaults.page_size as i64)?
            .set_default("analysis_delay_secs", defaults.analysis_delay_secs as i64)?;

        builder = match path {
            Some(path) => builder.add_source(File::from(path)),
            None => builder.add_source(File::with_name("mindstone").required(false)),
        };
        builder = builder.add_source(Environment::with_prefix("MINDSTONE"));

        builder.build()?.try_deserialize()
    }

    /// The analysis delay as a [`Duration`].
    pub fn analysis_delay(&self) -> Duration {
        Duration::from_secs(self.analysis_delay_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.page_size, 10);
        assert_eq!(settings.analysis_delay(), Duration::from_secs(3));
        assert_eq!(settings.data_dir, PathBuf::from(".mindstone"));
    }

    #[test]
    fn test_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mindstone.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "page_size = 5").unwrap();
        writeln!(file, "analysis_delay_secs = 0").unwrap();

        let settings = Settings::load(Some(&path)).unwrap();
        assert_eq!(settings.page_size, 5);
        assert_eq!(settings.analysis_delay(), Duration::ZERO);
        // Untouched keys keep their defaults.
        assert_eq!(settings.data_dir, PathBuf::from(".mindstone"));
    }
}
