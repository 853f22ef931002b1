#![deny(missing_docs)]
//! Shared logging utilities for the gateway workspace.
//!
//! This crate provides the `engine_*` logging macros used across the codebase
//! and a minimal test initializer for the global logger.
//!
//! Every macro accepts an optional `upload = <id>;` prefix. Background work for
//! one upload interleaves with work for the push channel and the UI loop, so
//! lines emitted on behalf of an upload carry its identifier:
//!
//! ```ignore
//! engine_info!(upload = upload_id; "PUT finished in {:?}", elapsed);
//! engine_info!("session restored");
//! ```

#[doc(hidden)]
pub use log;

/// Logs a trace-level message using the global logging facade.
#[macro_export]
macro_rules! engine_trace {
    (upload = $id:expr; $($arg:tt)*) => {{
        $crate::log::trace!("[upload {}] {}", $id, format_args!($($arg)*));
    }};
    ($($arg:tt)*) => {{
        $crate::log::trace!($($arg)*);
    }};
}

/// Logs an info-level message using the global logging facade.
#[macro_export]
macro_rules! engine_info {
    (upload = $id:expr; $($arg:tt)*) => {{
        $crate::log::info!("[upload {}] {}", $id, format_args!($($arg)*));
    }};
    ($($arg:tt)*) => {{
        $crate::log::info!($($arg)*);
    }};
}

/// Logs a debug-level message using the global logging facade.
#[macro_export]
macro_rules! engine_debug {
    (upload = $id:expr; $($arg:tt)*) => {{
        $crate::log::debug!("[upload {}] {}", $id, format_args!($($arg)*));
    }};
    ($($arg:tt)*) => {{
        $crate::log::debug!($($arg)*);
    }};
}

/// Logs a warn-level message using the global logging facade.
#[macro_export]
macro_rules! engine_warn {
    (upload = $id:expr; $($arg:tt)*) => {{
        $crate::log::warn!("[upload {}] {}", $id, format_args!($($arg)*));
    }};
    ($($arg:tt)*) => {{
        $crate::log::warn!($($arg)*);
    }};
}

/// Logs an error-level message using the global logging facade.
#[macro_export]
macro_rules! engine_error {
    (upload = $id:expr; $($arg:tt)*) => {{
        $crate::log::error!("[upload {}] {}", $id, format_args!($($arg)*));
    }};
    ($($arg:tt)*) => {{
        $crate::log::error!($($arg)*);
    }};
}

/// Initializes a simple terminal logger for use in unit tests.
///
/// This safely no-ops if another logger has already been initialized.
pub fn initialize_for_tests() {
    use simplelog::{ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode};

    // Use debug level in debug builds, info in release builds.
    let level = if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    // Ignore the error if a logger was already set by another test.
    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}
