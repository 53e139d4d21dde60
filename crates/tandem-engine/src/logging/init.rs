use std::sync::Once;

use env_logger::fmt::TimestampPrecision;

/// Logger configuration.
///
/// `env_filter` uses the `env_logger` directive syntax, e.g.
/// "tandem_engine=debug,wgpu=warn".
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Wins over `RUST_LOG` when set.
    pub env_filter: Option<String>,
    pub write_style: env_logger::WriteStyle,
    /// `None` drops timestamps from every line.
    pub timestamps: Option<TimestampPrecision>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            write_style: env_logger::WriteStyle::Auto,
            timestamps: Some(TimestampPrecision::Millis),
        }
    }
}

impl LoggingConfig {
    pub fn with_filter(filter: impl Into<String>) -> Self {
        Self {
            env_filter: Some(filter.into()),
            ..Self::default()
        }
    }
}

/// Level used when neither the config nor `RUST_LOG` names a filter.
/// Debug instrumentation reports are logged at `info`, so this shows them.
const DEFAULT_LEVEL: log::LevelFilter = log::LevelFilter::Info;

/// Picks the filter directives: the explicit filter, then `RUST_LOG`.
/// Blank strings count as unset.
fn filter_directives(explicit: Option<String>, env: Option<String>) -> Option<String> {
    explicit
        .into_iter()
        .chain(env)
        .find(|f| !f.trim().is_empty())
}

static INIT: Once = Once::new();

/// Installs the global logger on the first call.
///
/// Returns `true` only for the call that installed it. Later calls, or a
/// logger already installed by someone else (e.g. a test harness), leave the
/// existing one in place.
pub fn init_logging(config: LoggingConfig) -> bool {
    let mut installed = false;
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();

        match filter_directives(config.env_filter, std::env::var("RUST_LOG").ok()) {
            Some(directives) => builder.parse_filters(&directives),
            None => builder.filter_level(DEFAULT_LEVEL),
        };

        builder
            .write_style(config.write_style)
            .format_timestamp(config.timestamps);

        installed = builder.try_init().is_ok();
        if installed {
            log::debug!("logging initialized");
        }
    });
    installed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(v: &str) -> Option<String> {
        Some(v.to_string())
    }

    // ── filter precedence ──

    #[test]
    fn explicit_filter_beats_env() {
        assert_eq!(
            filter_directives(s("tandem_engine=debug"), s("warn")),
            s("tandem_engine=debug")
        );
    }

    #[test]
    fn env_used_when_no_explicit_filter() {
        assert_eq!(filter_directives(None, s("wgpu=warn")), s("wgpu=warn"));
    }

    #[test]
    fn blank_filters_fall_through_to_default() {
        assert_eq!(filter_directives(s("  "), s("info")), s("info"));
        assert_eq!(filter_directives(s(""), None), None);
        assert_eq!(filter_directives(None, None), None);
    }

    // ── install ──

    #[test]
    fn second_init_is_a_no_op() {
        init_logging(LoggingConfig::with_filter("off"));
        assert!(!init_logging(LoggingConfig::default()));
    }
}
