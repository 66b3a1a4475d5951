//! Tracing setup for the GazeTrace crates.
//!
//! `RUST_LOG` wins when set. Otherwise a plain level in
//! [`LoggingConfig::level`] is scoped to the `gazetrace` crates with
//! dependencies held at `warn`; a full directive string (anything with
//! `=` or `,`) is passed through untouched.

use crate::config::LoggingConfig;
use std::fs::OpenOptions;
use std::sync::Mutex;

/// Install the global tracing subscriber from `config`.
///
/// Events go to stderr, or to `config.file` (created, append mode) when
/// one is set. Fails only when that file cannot be opened; a second call
/// leaves the first subscriber in place.
pub fn init_logging(config: &LoggingConfig) -> std::io::Result<()> {
    use tracing_subscriber::fmt::writer::BoxMakeWriter;
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(fallback_directive(&config.level)));

    let to_file = config.file.is_some();
    let writer = match &config.file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            BoxMakeWriter::new(Mutex::new(file))
        }
        None => BoxMakeWriter::new(std::io::stderr),
    };

    if config.json {
        let subscriber = fmt::Subscriber::builder()
            .with_env_filter(env_filter)
            .with_writer(writer)
            .json()
            .finish();
        tracing::subscriber::set_global_default(subscriber).ok();
    } else {
        let subscriber = fmt::Subscriber::builder()
            .with_env_filter(env_filter)
            .with_writer(writer)
            .with_ansi(!to_file)
            .with_target(true)
            .finish();
        tracing::subscriber::set_global_default(subscriber).ok();
    }
    Ok(())
}

/// Install logging with defaults (stderr, `info` for gazetrace crates).
pub fn init_default_logging() {
    // Default config has no file, so opening cannot fail.
    init_logging(&LoggingConfig::default()).ok();
}

/// Expand a bare level into a crate-scoped filter directive.
fn fallback_directive(level: &str) -> String {
    if level.contains(['=', ',']) {
        level.to_string()
    } else {
        format!("warn,gazetrace={level}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_level_is_crate_scoped() {
        assert_eq!(fallback_directive("debug"), "warn,gazetrace=debug");
        assert_eq!(fallback_directive("info"), "warn,gazetrace=info");
    }

    #[test]
    fn test_full_directive_passes_through() {
        assert_eq!(
            fallback_directive("gazetrace=trace,warn"),
            "gazetrace=trace,warn"
        );
        assert_eq!(fallback_directive("info,hyper=off"), "info,hyper=off");
    }

    #[test]
    fn test_file_sink_is_created() {
        let dir = std::env::temp_dir().join("gazetrace-logging-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("trace.log");
        let config = LoggingConfig {
            level: "debug".to_string(),
            json: false,
            file: Some(path.clone()),
        };
        init_logging(&config).unwrap();
        assert!(path.exists());
    }
}
