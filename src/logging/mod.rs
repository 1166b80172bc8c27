//! Logging infrastructure - structured tracing for the binding layer
//!
//! Design: Uses `tracing` for structured, contextual logging with:
//! - Configurable level, overridable through `RUST_LOG`
//! - Zero cost when no subscriber is installed
//! - Console or file output, human-readable or JSON
//!
//! The library never installs a subscriber on its own; applications call
//! [`init`] or [`init_with_config`], or install their own.

use once_cell::sync::OnceCell;
use parking_lot::{const_mutex, Mutex};
use std::io;
use std::path::{Path, PathBuf};
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer,
};

pub use tracing::{debug, error, info, trace, warn};

/// Global logging state
static LOGGER_INITIALIZED: OnceCell<()> = OnceCell::new();

/// Flush guard of the non-blocking writer, held until process exit
static WRITER_GUARD: Mutex<Option<WorkerGuard>> = const_mutex(None);

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Default log level
    pub level: Level,
    /// Enable file logging
    pub file_output: bool,
    /// Log file path (if file_output enabled)
    pub log_path: Option<PathBuf>,
    /// Enable JSON format (vs human-readable)
    pub json_format: bool,
    /// Show span events (enter/exit)
    pub show_spans: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            file_output: false,
            log_path: None,
            json_format: false,
            show_spans: false,
        }
    }
}

impl LogConfig {
    /// Create config from environment variables
    pub fn from_env() -> Self {
        let mut config = Self::default();

        // FTBIND_LOG_LEVEL: trace, debug, info, warn, error
        if let Ok(level) = std::env::var("FTBIND_LOG_LEVEL") {
            config.level = parse_level(&level).unwrap_or(Level::INFO);
        }

        // FTBIND_LOG_FILE: path to log file
        if let Ok(path) = std::env::var("FTBIND_LOG_FILE") {
            config.file_output = true;
            config.log_path = Some(PathBuf::from(path));
        }

        config.json_format = std::env::var("FTBIND_LOG_JSON").is_ok();
        config.show_spans = std::env::var("FTBIND_LOG_SPANS").is_ok();

        config
    }

    /// Errors only
    pub fn quiet() -> Self {
        Self { level: Level::ERROR, ..Self::default() }
    }

    /// Every foreign call, with span events
    pub fn debug() -> Self {
        Self {
            level: Level::TRACE,
            show_spans: true,
            ..Self::default()
        }
    }
}

/// Parse a level name as accepted in `FTBIND_LOG_LEVEL`
pub fn parse_level(name: &str) -> Option<Level> {
    match name.trim().to_lowercase().as_str() {
        "trace" => Some(Level::TRACE),
        "debug" => Some(Level::DEBUG),
        "info" => Some(Level::INFO),
        "warn" | "warning" => Some(Level::WARN),
        "error" => Some(Level::ERROR),
        _ => None,
    }
}

/// Initialize logging from the environment (idempotent)
pub fn init() {
    init_with_config(LogConfig::from_env());
}

/// Initialize logging with custom configuration
///
/// Only the first call takes effect. If another subscriber is already
/// installed globally, that one is kept.
pub fn init_with_config(config: LogConfig) {
    LOGGER_INITIALIZED.get_or_init(|| {
        let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("ftbind={}", config.level.as_str().to_lowercase()))
        });

        let span_events = if config.show_spans {
            FmtSpan::ENTER | FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        };

        let (writer, guard) = match (config.file_output, config.log_path.as_deref()) {
            (true, Some(path)) => {
                let (directory, file_name) = split_log_path(path);
                tracing_appender::non_blocking(tracing_appender::rolling::never(directory, file_name))
            }
            _ => tracing_appender::non_blocking(io::stderr()),
        };
        *WRITER_GUARD.lock() = Some(guard);

        let layer = fmt::layer()
            .with_writer(writer)
            .with_span_events(span_events)
            .with_target(true)
            .with_thread_ids(cfg!(debug_assertions))
            .with_line_number(cfg!(debug_assertions));

        let layer = if config.json_format {
            layer.json().boxed()
        } else {
            layer.compact().boxed()
        };

        let _ = tracing_subscriber::registry()
            .with(env_filter)
            .with(layer)
            .try_init();
    });
}

/// Check if logging is initialized
pub fn is_initialized() -> bool {
    LOGGER_INITIALIZED.get().is_some()
}

fn split_log_path(path: &Path) -> (PathBuf, PathBuf) {
    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let file_name = path
        .file_name()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("ftbind.log"));
    (directory, file_name)
}

// ============================================================================
// Binding-specific events
// ============================================================================

/// Log native library load
pub fn log_library_loaded(source: &str) {
    info!(event = "library_loaded", source = source, "FreeType library loaded");
}

/// Log a bound entry point
#[inline]
pub fn log_symbol_bound(symbol: &str, signature: &dyn std::fmt::Display) {
    trace!(event = "symbol_bound", symbol = symbol, signature = %signature, "symbol bound");
}

/// Log an optional entry point the library does not export
pub fn log_optional_symbol_absent(symbol: &str) {
    debug!(event = "optional_symbol_absent", symbol = symbol, "optional symbol not exported");
}

/// Log foreign function call
#[inline]
pub fn log_ffi_call(function: &str) {
    trace!(event = "ffi_call", function = function, "FFI function called");
}

/// Log a non-OK result code
pub fn log_ffi_error(function: &str, code: i32, description: &str) {
    debug!(
        event = "ffi_error",
        function = function,
        code = code,
        error = description,
        "FFI function returned an error"
    );
}

/// Log a handle becoming live
#[inline]
pub fn log_handle_opened(kind: &dyn std::fmt::Display, address: *const core::ffi::c_void) {
    debug!(event = "handle_opened", kind = %kind, address = ?address, "native handle opened");
}

/// Log a handle being released
#[inline]
pub fn log_handle_released(kind: &dyn std::fmt::Display, address: *const core::ffi::c_void) {
    debug!(event = "handle_released", kind = %kind, address = ?address, "native handle released");
}

/// Log a teardown failure that could not be reported to a caller
pub fn log_release_failed(kind: &dyn std::fmt::Display, error: &dyn std::fmt::Display) {
    warn!(event = "release_failed", kind = %kind, error = %error, "releasing native handle on drop failed");
}
