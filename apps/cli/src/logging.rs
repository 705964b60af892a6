//! Logging initialization for the code generator binary
//!
//! Human-readable or JSON output on stderr, filtered by `RUST_LOG` when set.
//! Generated file listings go to stdout, so logs never interleave with them.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Default level of the workspace crates when `RUST_LOG` is unset
    pub level: String,
    pub json: bool,
}

impl LoggingConfig {
    /// Level from the number of `-v` flags
    pub fn from_verbosity(verbose: u8, json: bool) -> Self {
        let level = match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        };
        Self {
            level: level.to_string(),
            json,
        }
    }
}

pub fn init_logging(config: &LoggingConfig) -> anyhow::Result<()> {
    let subscriber = tracing_subscriber::registry().with(build_env_filter(config));

    if config.json {
        subscriber
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(false)
                    .with_writer(std::io::stderr),
            )
            .try_init()?;
    } else {
        subscriber
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_writer(std::io::stderr),
            )
            .try_init()?;
    }

    tracing::debug!(level = %config.level, json = config.json, "Logging initialized");
    Ok(())
}

fn build_env_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "umbrello_cli={},umbrello_codegen={},umbrello_model={}",
            config.level, config.level, config.level
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_levels() {
        assert_eq!(LoggingConfig::from_verbosity(0, false).level, "warn");
        assert_eq!(LoggingConfig::from_verbosity(2, false).level, "debug");
        assert_eq!(LoggingConfig::from_verbosity(9, true).level, "trace");
    }
}
