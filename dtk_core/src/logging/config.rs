//! Configuration module for logging
//!
//! Buffer limits come from the compile-time constants.

use crate::config::constants::compile_time::logging::*;

/// Get in-memory event buffer size
pub fn get_error_buffer_size() -> usize {
    LOG_BUFFER_SIZE
}

/// Get maximum diagnostics retained per resolution
pub fn get_max_diagnostics() -> usize {
    MAX_DIAGNOSTICS_PER_RESOLUTION
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limits_are_consistent() {
        assert!(get_error_buffer_size() >= 100);
        assert!(get_max_diagnostics() <= get_error_buffer_size());
    }
}
