//! User-facing log messages.
//!
//! Commands report progress through the [`Logger`] trait with a message
//! template such as `Set upstream for {site} to {upstream}` and a context of
//! placeholder values. The production [`TracingLogger`] renders the template
//! and forwards it to `tracing`.

use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Info,
    Notice,
    Warning,
    Error,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Notice => "notice",
            LogLevel::Warning => "warning",
            LogLevel::Error => "error",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub trait Logger {
    fn log(&self, level: LogLevel, template: &str, context: &[(&str, &str)]);

    fn warning(&self, template: &str, context: &[(&str, &str)]) {
        self.log(LogLevel::Warning, template, context);
    }

    fn notice(&self, template: &str, context: &[(&str, &str)]) {
        self.log(LogLevel::Notice, template, context);
    }
}

fn placeholder_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{([A-Za-z0-9_]+)\}").expect("valid regex"))
}

/// Substitute `{name}` placeholders from `context`. Unknown placeholders are
/// left in place.
pub fn interpolate(template: &str, context: &[(&str, &str)]) -> String {
    placeholder_re()
        .replace_all(template, |caps: &regex::Captures<'_>| {
            let key = &caps[1];
            context
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

/// Renders messages and emits them as `tracing` events.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn log(&self, level: LogLevel, template: &str, context: &[(&str, &str)]) {
        let message = interpolate(template, context);
        match level {
            LogLevel::Debug => tracing::debug!("{message}"),
            LogLevel::Info | LogLevel::Notice => tracing::info!("{message}"),
            LogLevel::Warning => tracing::warn!("{message}"),
            LogLevel::Error => tracing::error!("{message}"),
        }
    }
}
