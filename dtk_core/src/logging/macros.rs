//! Type-safe logging macros using Code types with Display support

/// Log error with Code type - accepts Display types for context values
#[macro_export]
macro_rules! log_error {
    ($code:expr, $message:expr) => {
        $crate::logging::log_with_context(
            $crate::logging::LogEvent::error($code, $message),
            vec![],
        )
    };

    ($code:expr, $message:expr, $($key:expr => $value:expr),+ $(,)?) => {
        {
            let context_strings: Vec<(&str, String)> = vec![$(($key, format!("{}", $value))),+];
            $crate::logging::log_with_context(
                $crate::logging::LogEvent::error($code, $message),
                context_strings,
            )
        }
    };
}

/// Log warning with Code type - accepts Display types for context values
#[macro_export]
macro_rules! log_warning {
    ($code:expr, $message:expr) => {
        $crate::logging::log_with_context(
            $crate::logging::LogEvent::warning_with_code($code, $message),
            vec![],
        )
    };

    ($code:expr, $message:expr, $($key:expr => $value:expr),+ $(,)?) => {
        {
            let context_strings: Vec<(&str, String)> = vec![$(($key, format!("{}", $value))),+];
            $crate::logging::log_with_context(
                $crate::logging::LogEvent::warning_with_code($code, $message),
                context_strings,
            )
        }
    };
}

/// Log success with Code type
#[macro_export]
macro_rules! log_success {
    ($code:expr, $message:expr) => {
        $crate::logging::log_with_context(
            $crate::logging::LogEvent::success($code, $message),
            vec![],
        )
    };

    ($code:expr, $message:expr, $($key:expr => $value:expr),+ $(,)?) => {
        {
            let context_strings: Vec<(&str, String)> = vec![$(($key, format!("{}", $value))),+];
            $crate::logging::log_with_context(
                $crate::logging::LogEvent::success($code, $message),
                context_strings,
            )
        }
    };
}

/// Log informational message
#[macro_export]
macro_rules! log_info {
    ($message:expr) => {
        $crate::logging::log_with_context($crate::logging::LogEvent::info($message), vec![])
    };

    ($message:expr, $($key:expr => $value:expr),+ $(,)?) => {
        {
            let context_strings: Vec<(&str, String)> = vec![$(($key, format!("{}", $value))),+];
            $crate::logging::log_with_context(
                $crate::logging::LogEvent::info($message),
                context_strings,
            )
        }
    };
}

/// Log debug message; context is only formatted when debug output is enabled
#[macro_export]
macro_rules! log_debug {
    ($message:expr) => {
        if $crate::logging::debug_enabled() {
            $crate::logging::log_with_context($crate::logging::LogEvent::debug($message), vec![])
        }
    };

    ($message:expr, $($key:expr => $value:expr),+ $(,)?) => {
        if $crate::logging::debug_enabled() {
            let context_strings: Vec<(&str, String)> = vec![$(($key, format!("{}", $value))),+];
            $crate::logging::log_with_context(
                $crate::logging::LogEvent::debug($message),
                context_strings,
            )
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::logging::codes;

    #[test]
    fn test_macros_are_noops_without_global_logger() {
        // None of these may panic when logging was never initialized
        log_error!(codes::system::INTERNAL_ERROR, "internal");
        log_warning!(codes::references::REFERENCE_CYCLE, "cycle",
            "path" => "color.a",
            "depth" => 2
        );
        log_success!(codes::success::TREE_RESOLUTION_COMPLETE, "done", "tokens" => 10);
        log_info!("info", "flag" => true);
        log_debug!("debug", "value" => 1.5);
    }
}
