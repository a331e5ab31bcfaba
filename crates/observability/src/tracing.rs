//! Tracing subscriber installation.

use tracing_subscriber::EnvFilter;

pub const LOG_FORMAT_ENV: &str = "STOREFRONT_LOG_FORMAT";

const DEFAULT_FILTER: &str = "info";

/// Output format of the fmt subscriber.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// One JSON object per event (default; what log shippers ingest).
    #[default]
    Json,
    /// Human-readable lines for local development.
    Pretty,
}

impl LogFormat {
    /// Resolve the format from an optional raw setting. An unusable value is
    /// handed back so it can be reported once a subscriber is installed.
    pub fn resolve(raw: Option<&str>) -> Result<Self, String> {
        match raw {
            None => Ok(LogFormat::Json),
            Some(raw) => Self::parse(raw).ok_or_else(|| raw.to_string()),
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "json" => Some(LogFormat::Json),
            "pretty" | "text" => Some(LogFormat::Pretty),
            _ => None,
        }
    }
}

/// Install the global subscriber with the format named by
/// `STOREFRONT_LOG_FORMAT`, falling back to JSON with a warning.
pub fn init_from_env() {
    let raw = std::env::var(LOG_FORMAT_ENV).ok();
    match LogFormat::resolve(raw.as_deref()) {
        Ok(format) => init(format),
        Err(value) => {
            init(LogFormat::Json);
            ::tracing::warn!(
                var = LOG_FORMAT_ENV,
                value = %value,
                "unrecognized log format, using json"
            );
        }
    }
}

/// Install the global subscriber, filtered by `RUST_LOG` (default `info`).
///
/// Safe to call multiple times (subsequent calls are no-ops).
pub fn init(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    // stdout is reserved for command output.
    let _ = match format {
        LogFormat::Json => builder
            .json()
            .with_timer(tracing_subscriber::fmt::time::SystemTime)
            .with_target(false)
            .try_init(),
        LogFormat::Pretty => builder.with_target(true).try_init(),
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_formats() {
        assert_eq!(LogFormat::parse("JSON"), Some(LogFormat::Json));
        assert_eq!(LogFormat::parse(" pretty "), Some(LogFormat::Pretty));
        assert_eq!(LogFormat::parse("text"), Some(LogFormat::Pretty));
        assert_eq!(LogFormat::parse("xml"), None);
    }

    #[test]
    fn unset_format_defaults_to_json() {
        assert_eq!(LogFormat::resolve(None), Ok(LogFormat::Json));
        assert_eq!(LogFormat::resolve(Some("Pretty")), Ok(LogFormat::Pretty));
    }

    #[test]
    fn unusable_format_is_handed_back() {
        assert_eq!(LogFormat::resolve(Some("xml")), Err("xml".to_string()));
        assert_eq!(LogFormat::resolve(Some("")), Err(String::new()));
    }

    #[test]
    fn init_twice_is_harmless() {
        init(LogFormat::Pretty);
        init(LogFormat::Json);
        ::tracing::info!("still logging");
    }
}
