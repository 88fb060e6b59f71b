//! Logging setup for debugging and diagnostics.
//!
//! Logs go to stderr so the interactive quiz rendering on stdout stays
//! clean. The level comes from `RUST_LOG` when set, otherwise from the
//! verbosity flags.

use tracing_subscriber::{fmt, EnvFilter};

/// Log level for the subscriber.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
    /// Disable logging entirely.
    Off,
}

impl LogLevel {
    fn directive(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
            LogLevel::Off => "off",
        }
    }
}

impl From<u8> for LogLevel {
    /// Convert verbosity count to log level.
    /// 0 = Info, 1 = Debug, 2+ = Trace
    fn from(verbosity: u8) -> Self {
        match verbosity {
            0 => LogLevel::Info,
            1 => LogLevel::Debug,
            _ => LogLevel::Trace,
        }
    }
}

/// Configuration for the logging subscriber.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// The log level to use when `RUST_LOG` is not set.
    pub level: LogLevel,
    /// Whether to include timestamps.
    pub with_timestamps: bool,
    /// Whether to include the target (module path).
    pub with_target: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            with_timestamps: true,
            with_target: false,
        }
    }
}

impl LoggingConfig {
    /// Configuration from verbosity flags (0 = info, 1 = debug, 2+ = trace);
    /// `quiet` drops everything below errors.
    pub fn from_flags(verbosity: u8, quiet: bool) -> Self {
        let level = if quiet {
            LogLevel::Error
        } else {
            LogLevel::from(verbosity)
        };
        Self {
            level,
            ..Self::default()
        }
    }
}

/// Initialize the logging subscriber. Call once at startup.
pub fn init_logging(config: LoggingConfig) {
    let env_filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::new(config.level.directive())
    };

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(config.with_target);

    if config.with_timestamps {
        subscriber.init();
    } else {
        subscriber.without_time().init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_from_verbosity() {
        assert_eq!(LogLevel::from(0), LogLevel::Info);
        assert_eq!(LogLevel::from(1), LogLevel::Debug);
        assert_eq!(LogLevel::from(2), LogLevel::Trace);
        assert_eq!(LogLevel::from(10), LogLevel::Trace);
    }

    #[test]
    fn test_quiet_wins_over_verbosity() {
        let config = LoggingConfig::from_flags(3, true);
        assert_eq!(config.level, LogLevel::Error);
    }
}
