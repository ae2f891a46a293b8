//! Logging macros with `"key" => value` context pairs
//!
//! Context values only need to implement `Display`.

/// Log error with a [`Code`](crate::logging::Code)
#[macro_export]
macro_rules! log_error {
    ($code:expr, $message:expr) => {
        $crate::logging::log_with_context(::log::Level::Error, Some($code), $message, &[])
    };

    ($code:expr, $message:expr, $($key:expr => $value:expr),+ $(,)?) => {
        {
            let context: Vec<(&str, String)> = vec![$(($key, format!("{}", $value))),+];
            $crate::logging::log_with_context(::log::Level::Error, Some($code), $message, &context)
        }
    };
}

/// Log warning message
#[macro_export]
macro_rules! log_warning {
    ($message:expr) => {
        $crate::logging::log_with_context(::log::Level::Warn, None, $message, &[])
    };

    ($message:expr, $($key:expr => $value:expr),+ $(,)?) => {
        {
            let context: Vec<(&str, String)> = vec![$(($key, format!("{}", $value))),+];
            $crate::logging::log_with_context(::log::Level::Warn, None, $message, &context)
        }
    };
}

/// Log informational message
#[macro_export]
macro_rules! log_info {
    ($message:expr) => {
        $crate::logging::log_with_context(::log::Level::Info, None, $message, &[])
    };

    ($message:expr, $($key:expr => $value:expr),+ $(,)?) => {
        {
            let context: Vec<(&str, String)> = vec![$(($key, format!("{}", $value))),+];
            $crate::logging::log_with_context(::log::Level::Info, None, $message, &context)
        }
    };
}

/// Log debug message; context is only formatted when debug output is enabled
#[macro_export]
macro_rules! log_debug {
    ($message:expr) => {
        $crate::logging::log_with_context(::log::Level::Debug, None, $message, &[])
    };

    ($message:expr, $($key:expr => $value:expr),+ $(,)?) => {
        if ::log::log_enabled!(target: $crate::logging::LOG_TARGET, ::log::Level::Debug) {
            let context: Vec<(&str, String)> = vec![$(($key, format!("{}", $value))),+];
            $crate::logging::log_with_context(::log::Level::Debug, None, $message, &context)
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::logging::codes;

    #[allow(dead_code)]
    fn example_usage() {
        let depth: usize = 3;

        log_error!(codes::MALFORMED_RULE, "Rule names no mode",
            "check_id" => "CIS-1.1",
            "comparator" => "list"
        );

        log_warning!("Nested rule ignored", "depth" => depth);

        log_info!("Registry ready", "comparators" => 5);

        log_debug!("Running list::size", "check_id" => "CIS-1.1");
    }

    #[test]
    fn macros_expand_without_a_logger() {
        example_usage();
    }
}
