//! Statement-level logging, grounded in the teacher's `QueryLogger`.

use std::time::{Duration, Instant};

// `tracing`'s macros don't accept a runtime `Level` value, so dispatch
// manually over both facades the way the teacher's logger does (it
// supports being driven by either `log` or `tracing` subscribers).
macro_rules! tracing_dynamic_enabled {
    ($level:expr) => {{
        use tracing::Level;
        match $level {
            Level::ERROR => tracing::enabled!(target: "mysql_native::query", Level::ERROR),
            Level::WARN => tracing::enabled!(target: "mysql_native::query", Level::WARN),
            Level::INFO => tracing::enabled!(target: "mysql_native::query", Level::INFO),
            Level::DEBUG => tracing::enabled!(target: "mysql_native::query", Level::DEBUG),
            Level::TRACE => tracing::enabled!(target: "mysql_native::query", Level::TRACE),
        }
    }};
}

macro_rules! tracing_dynamic_event {
    ($level:expr, $message:expr) => {{
        use tracing::Level;
        match $level {
            Level::ERROR => tracing::error!(target: "mysql_native::query", "{}", $message),
            Level::WARN => tracing::warn!(target: "mysql_native::query", "{}", $message),
            Level::INFO => tracing::info!(target: "mysql_native::query", "{}", $message),
            Level::DEBUG => tracing::debug!(target: "mysql_native::query", "{}", $message),
            Level::TRACE => tracing::trace!(target: "mysql_native::query", "{}", $message),
        }
    }};
}

fn level_filter_to_levels(filter: log::LevelFilter) -> Option<(tracing::Level, log::Level)> {
    let tracing_level = match filter {
        log::LevelFilter::Error => tracing::Level::ERROR,
        log::LevelFilter::Warn => tracing::Level::WARN,
        log::LevelFilter::Info => tracing::Level::INFO,
        log::LevelFilter::Debug => tracing::Level::DEBUG,
        log::LevelFilter::Trace => tracing::Level::TRACE,
        log::LevelFilter::Off => return None,
    };

    filter.to_level().map(|log_level| (tracing_level, log_level))
}

/// Controls how statement execution is logged (§1 ambient stack).
#[derive(Debug, Clone)]
pub struct LogSettings {
    pub statements_level: log::LevelFilter,
    pub slow_statements_level: log::LevelFilter,
    pub slow_statements_duration: Duration,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            statements_level: log::LevelFilter::Debug,
            slow_statements_level: log::LevelFilter::Warn,
            slow_statements_duration: Duration::from_secs(1),
        }
    }
}

impl LogSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn log_statements(mut self, level: log::LevelFilter) -> Self {
        self.statements_level = level;
        self
    }

    pub fn log_slow_statements(mut self, level: log::LevelFilter, duration: Duration) -> Self {
        self.slow_statements_level = level;
        self.slow_statements_duration = duration;
        self
    }
}

/// Accumulates per-statement counters and emits one summary event when
/// dropped, at `statements_level` or `slow_statements_level` depending on
/// elapsed time.
pub(crate) struct QueryLogger<'q> {
    sql: &'q str,
    rows_returned: u64,
    rows_affected: u64,
    start: Instant,
    settings: LogSettings,
}

impl<'q> QueryLogger<'q> {
    pub(crate) fn new(sql: &'q str, settings: LogSettings) -> Self {
        Self {
            sql,
            rows_returned: 0,
            rows_affected: 0,
            start: Instant::now(),
            settings,
        }
    }

    pub(crate) fn increment_rows_returned(&mut self) {
        self.rows_returned += 1;
    }

    pub(crate) fn increase_rows_affected(&mut self, n: u64) {
        self.rows_affected += n;
    }

    fn finish(&self) {
        let elapsed = self.start.elapsed();

        let level = if elapsed >= self.settings.slow_statements_duration {
            self.settings.slow_statements_level
        } else {
            self.settings.statements_level
        };

        let Some((tracing_level, log_level)) = level_filter_to_levels(level) else {
            return;
        };

        let enabled = tracing_dynamic_enabled!(tracing_level)
            || log::log_enabled!(target: "mysql_native::query", log_level);

        if !enabled {
            return;
        }

        let summary = summarize(self.sql);
        let message = format!(
            "{summary}; rows affected: {}, rows returned: {}, elapsed: {elapsed:.3?}",
            self.rows_affected, self.rows_returned
        );

        tracing_dynamic_event!(tracing_level, message);
    }
}

impl<'q> Drop for QueryLogger<'q> {
    fn drop(&mut self) {
        self.finish();
    }
}

fn summarize(sql: &str) -> String {
    let mut summary: String = sql.split_whitespace().take(8).collect::<Vec<_>>().join(" ");
    if summary.len() < sql.trim().len() {
        summary.push_str(" …");
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summarize_short_statement_is_unchanged() {
        assert_eq!(summarize("SELECT 1"), "SELECT 1");
    }

    #[test]
    fn summarize_long_statement_is_truncated() {
        let sql = "SELECT a, b, c, d, e, f, g, h, i FROM t WHERE a = 1";
        let summary = summarize(sql);
        assert!(summary.ends_with('…'));
        assert!(summary.len() < sql.len());
    }

    #[test]
    fn default_settings_match_common_driver_defaults() {
        let settings = LogSettings::default();
        assert_eq!(settings.statements_level, log::LevelFilter::Debug);
        assert_eq!(settings.slow_statements_level, log::LevelFilter::Warn);
        assert_eq!(settings.slow_statements_duration, Duration::from_secs(1));
    }
}
