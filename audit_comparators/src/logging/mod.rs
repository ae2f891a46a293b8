//! Logging for the comparator engine
//!
//! Thin structured layer over the `log` facade. Events carry `key=value`
//! context pairs and, for errors, a stable [`Code`]. Binaries decide where
//! the output goes by installing a `log` backend.

pub mod codes;
#[macro_use]
pub mod macros;

pub use codes::Code;

/// Log target shared by every event emitted from this crate
pub const LOG_TARGET: &str = "audit_comparators";

/// Render context pairs as ` key=value` suffixes
pub fn format_context(context: &[(&str, String)]) -> String {
    let mut out = String::new();
    for (key, value) in context {
        out.push(' ');
        out.push_str(key);
        out.push('=');
        out.push_str(value);
    }
    out
}

/// Emit an event at `level` with structured context (used by the macros)
pub fn log_with_context(level: log::Level, code: Option<Code>, message: &str, context: &[(&str, String)]) {
    if !log::log_enabled!(target: LOG_TARGET, level) {
        return;
    }

    let suffix = format_context(context);
    match code {
        Some(code) => log::log!(target: LOG_TARGET, level, "[{}] {}{}", code, message, suffix),
        None => log::log!(target: LOG_TARGET, level, "{}{}", message, suffix),
    }
}
