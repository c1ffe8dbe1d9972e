//! Provide tracing, tailored to this crate.
//!
//! A program embedding the driver should call one of the init_* functions at
//! startup to install a tracing subscriber (i.e., something that emits events
//! to a log).
//!
//! The rest of the crate can include `use crate::tracing::prelude::*` for
//! convenient access to the `trace!()`, `debug!()`, `info!()`, `warn!()`, and
//! `error!()` macros.

use std::env;
use time::OffsetDateTime;
use tracing_subscriber::{
    filter::{EnvFilter, LevelFilter},
    fmt::{format::Writer, time::FormatTime},
    prelude::*,
};

pub mod prelude {
    #[allow(unused_imports)]
    pub use tracing::{debug, error, info, trace, warn};
}

use prelude::*;

/// Target prefixes stripped from our own events to reduce noise.
const OWN_PREFIXES: &[&str] = &["mcp3221_driver::", "mcp3221_read::"];

/// Initialize logging.
///
/// If running under systemd, use journald; otherwise fall back to stdout at
/// INFO.
pub fn init_journald_or_stdout() {
    if env::var("JOURNAL_STREAM").is_ok() {
        if let Ok(layer) = tracing_journald::layer() {
            tracing_subscriber::registry().with(layer).init();
        } else {
            init_stdout(tracing::Level::INFO);
            error!("Failed to initialize journald logging, using stdout.");
        }
    } else {
        init_stdout(tracing::Level::INFO);
    }
}

/// Log to stdout, filtering according to environment variable RUST_LOG,
/// with `default_level` applied when RUST_LOG does not say otherwise.
pub fn init_stdout(default_level: tracing::Level) {
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(default_level).into())
        .with_env_var("RUST_LOG")
        .from_env_lossy();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_timer(LocalTimer)
                .with_target(true)
                .fmt_fields(tracing_subscriber::fmt::format::DefaultFields::new())
                .event_format(CustomFormatter),
        )
        .init();
}

/// Strip our own crate prefix from a target; leave dependency paths alone.
fn short_target(target: &str) -> &str {
    OWN_PREFIXES
        .iter()
        .find_map(|prefix| target.strip_prefix(prefix))
        .unwrap_or(target)
}

/// Custom event formatter that strips the crate prefix, colors the level,
/// and displays fields on a second line for readability.
struct CustomFormatter;

/// Visitor that collects fields into a string buffer.
struct FieldCollector {
    fields: Vec<(String, String)>,
    message: Option<String>,
}

impl FieldCollector {
    fn new() -> Self {
        Self {
            fields: Vec::new(),
            message: None,
        }
    }
}

impl tracing::field::Visit for FieldCollector {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = Some(format!("{:?}", value));
        } else {
            self.fields.push((field.name().to_string(), format!("{:?}", value)));
        }
    }
}

impl<S, N> tracing_subscriber::fmt::FormatEvent<S, N> for CustomFormatter
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
    N: for<'a> tracing_subscriber::fmt::FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &tracing_subscriber::fmt::FmtContext<'_, S, N>,
        mut writer: tracing_subscriber::fmt::format::Writer<'_>,
        event: &tracing::Event<'_>,
    ) -> std::fmt::Result {
        let mut visitor = FieldCollector::new();
        event.record(&mut visitor);

        LocalTimer.format_time(&mut writer)?;
        write!(writer, " ")?;

        let (level_color, level_text) = match *event.metadata().level() {
            tracing::Level::ERROR => ("\x1b[31m", "ERROR"), // Red
            tracing::Level::WARN => ("\x1b[33m", "WARN "),  // Yellow
            tracing::Level::INFO => ("\x1b[32m", "INFO "),  // Green
            tracing::Level::DEBUG => ("\x1b[34m", "DEBUG"), // Blue
            tracing::Level::TRACE => ("\x1b[35m", "TRACE"), // Magenta
        };
        write!(writer, "{}{}\x1b[0m ", level_color, level_text)?;
        write!(writer, "{}: ", short_target(event.metadata().target()))?;

        if let Some(ref msg) = visitor.message {
            write!(writer, "{}", msg.trim_matches('"'))?;
        }

        if !visitor.fields.is_empty() {
            writeln!(writer)?;
            // Timestamp (8 chars) + space + level (5 chars) + space = 15
            write!(writer, "\x1b[90m               ")?;
            for (i, (key, value)) in visitor.fields.iter().enumerate() {
                if i > 0 {
                    write!(writer, ", ")?;
                }
                write!(writer, "{}={}", key, value.trim_matches('"'))?;
            }
            write!(writer, "\x1b[0m")?;
        }

        writeln!(writer)
    }
}

// Local time to the nearest second; the default timer is UTC with a long
// RFC 3339 timestamp.
struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        let now = OffsetDateTime::now_local().unwrap_or(OffsetDateTime::now_utc());
        let stamp = now
            .format(time::macros::format_description!("[hour]:[minute]:[second]"))
            .map_err(|_| std::fmt::Error)?;
        write!(w, "{}", stamp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_target() {
        assert_eq!(short_target("mcp3221_driver::peripheral::mcp3221"), "peripheral::mcp3221");
        assert_eq!(short_target("mcp3221_read"), "mcp3221_read");
        assert_eq!(short_target("mcp3221_read::output"), "output");
        assert_eq!(short_target("tokio::runtime"), "tokio::runtime");
    }
}
