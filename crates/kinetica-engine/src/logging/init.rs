use std::sync::Once;

use log::LevelFilter;

/// Logger configuration.
///
/// Filter resolution order: `env_filter`, then `RUST_LOG`, then
/// `default_level`. Filters use the `env_logger` syntax (e.g. "warn",
/// "kinetica_engine::fps=trace,kinetica_studio=info").
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    pub default_level: LevelFilter,
    /// ANSI coloring.
    pub write_style: env_logger::WriteStyle,
}

impl LoggingConfig {
    /// Forces a filter, ignoring `RUST_LOG`.
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.env_filter = Some(filter.into());
        self
    }

    pub fn with_default_level(mut self, level: LevelFilter) -> Self {
        self.default_level = level;
        self
    }

    pub fn with_write_style(mut self, style: env_logger::WriteStyle) -> Self {
        self.write_style = style;
        self
    }

    fn resolve_filter(&self, rust_log: Option<String>) -> Option<String> {
        self.env_filter.clone().or(rust_log)
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            default_level: LevelFilter::Info,
            write_style: env_logger::WriteStyle::Auto,
        }
    }
}

static INIT: Once = Once::new();

fn builder(config: &LoggingConfig, rust_log: Option<String>) -> env_logger::Builder {
    let mut builder = env_logger::Builder::new();

    match config.resolve_filter(rust_log) {
        Some(filter) => {
            builder.parse_filters(&filter);
        }
        None => {
            builder.filter_level(config.default_level);
        }
    }

    builder.write_style(config.write_style);
    builder.format_timestamp_millis();
    builder
}

/// Initializes the global logger once.
///
/// Subsequent calls are ignored, so tests and binaries may both call it.
/// Call it early in `main`, before the first frame.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        builder(&config, std::env::var("RUST_LOG").ok()).init();
        log::debug!("logging initialized");
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_filter_wins_over_rust_log() {
        let config = LoggingConfig::default().with_filter("debug");
        let logger = builder(&config, Some("error".into())).build();
        assert_eq!(logger.filter(), LevelFilter::Debug);
    }

    #[test]
    fn rust_log_wins_over_default_level() {
        let logger = builder(&LoggingConfig::default(), Some("warn".into())).build();
        assert_eq!(logger.filter(), LevelFilter::Warn);
    }

    #[test]
    fn falls_back_to_default_level() {
        let config = LoggingConfig::default().with_default_level(LevelFilter::Trace);
        assert_eq!(builder(&config, None).build().filter(), LevelFilter::Trace);
        assert_eq!(
            builder(&LoggingConfig::default(), None).build().filter(),
            LevelFilter::Info
        );
    }
}
