//! Leveled logging for the `xc` engine core.
//!
//! Every record carries the module path plus the file and line of the call
//! site, so growth events in the containers can be traced back to the code
//! that triggered them.
//!
//! # Example
//!
//! ```
//! use xc_log::{debug, error, info, warn, Level};
//!
//! xc_log::set_level(Level::Debug);
//!
//! let capacity = 32;
//! info!("map grew to {} slots", capacity);
//! debug!("occupancy: {:?}", [0b1010_0001u8, 0]);
//! warn!("array reserve requested zero elements");
//! error!("allocator refused {} bytes", 4096);
//! ```
//!
//! # Configuration
//!
//! The minimum level defaults to [`Level::Info`]. It can be changed at runtime
//! with [`set_level`] / [`set_level_from_str`], or read once from the
//! `XC_LOG` environment variable with [`init_from_env`].

use std::fmt::Arguments;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicU8, Ordering};

/// Environment variable consulted by [`init_from_env`].
pub const ENV_VAR: &str = "XC_LOG";

/// Severity of a log record.
///
/// Lower numeric values are more severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    /// Unrecoverable failures.
    Error = 0,
    /// Suspicious but tolerated situations.
    Warn = 1,
    /// High-level lifecycle events.
    Info = 2,
    /// Container growth and reset events.
    Debug = 3,
    /// Per-operation detail.
    Trace = 4,
}

impl Level {
    const fn color_code(self) -> &'static str {
        match self {
            Level::Error => "\x1b[31m",
            Level::Warn => "\x1b[33m",
            Level::Info => "\x1b[32m",
            Level::Debug => "\x1b[36m",
            Level::Trace => "\x1b[35m",
        }
    }

    /// Returns the upper-case name of this level.
    pub const fn as_str(self) -> &'static str {
        match self {
            Level::Error => "ERROR",
            Level::Warn => "WARN",
            Level::Info => "INFO",
            Level::Debug => "DEBUG",
            Level::Trace => "TRACE",
        }
    }

    const fn from_u8(raw: u8) -> Self {
        match raw {
            0 => Level::Error,
            1 => Level::Warn,
            2 => Level::Info,
            3 => Level::Debug,
            _ => Level::Trace,
        }
    }

    /// Parses a level name, ignoring case and surrounding whitespace.
    ///
    /// # Example
    ///
    /// ```
    /// use xc_log::Level;
    ///
    /// assert_eq!(Level::from_str("trace"), Ok(Level::Trace));
    /// assert_eq!(Level::from_str(" Warn "), Ok(Level::Warn));
    /// assert!(Level::from_str("verbose").is_err());
    /// ```
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ERROR" => Ok(Level::Error),
            "WARN" | "WARNING" => Ok(Level::Warn),
            "INFO" => Ok(Level::Info),
            "DEBUG" => Ok(Level::Debug),
            "TRACE" => Ok(Level::Trace),
            _ => Err(format!("Invalid log level: {s}")),
        }
    }
}

/// Process-wide logger holding the minimum enabled level.
pub struct Logger {
    level: AtomicU8,
}

impl Logger {
    const fn new(level: Level) -> Self {
        Logger {
            level: AtomicU8::new(level as u8),
        }
    }

    /// Sets the minimum level; records below it are discarded.
    pub fn set_level(&self, level: Level) {
        self.level.store(level as u8, Ordering::SeqCst);
    }

    /// Returns the current minimum level.
    pub fn level(&self) -> Level {
        Level::from_u8(self.level.load(Ordering::Relaxed))
    }

    /// Returns true if a record at `level` would be written.
    #[inline]
    pub fn enabled(&self, level: Level) -> bool {
        level as u8 <= self.level.load(Ordering::Relaxed)
    }
}

static LOGGER: OnceLock<Logger> = OnceLock::new();

/// Returns the global logger, creating it at [`Level::Info`] on first use.
pub fn get_logger() -> &'static Logger {
    LOGGER.get_or_init(|| Logger::new(Level::Info))
}

/// Sets the minimum level of the global logger.
pub fn set_level(level: Level) {
    get_logger().set_level(level);
}

/// Sets the minimum level of the global logger from a level name.
///
/// # Example
///
/// ```
/// xc_log::set_level_from_str("debug").unwrap();
/// assert_eq!(xc_log::get_logger().level(), xc_log::Level::Debug);
/// ```
pub fn set_level_from_str(s: &str) -> Result<(), String> {
    set_level(Level::from_str(s)?);
    Ok(())
}

/// Reads [`ENV_VAR`] and applies it to the global logger.
///
/// An unset variable leaves the level untouched and returns `Ok(None)`.
/// An unparsable value also leaves the level untouched and returns the
/// parse error so the caller can report it.
pub fn init_from_env() -> Result<Option<Level>, String> {
    apply_setting(std::env::var(ENV_VAR).ok().as_deref())
}

fn apply_setting(value: Option<&str>) -> Result<Option<Level>, String> {
    match value {
        None => Ok(None),
        Some(raw) => {
            let level = Level::from_str(raw)?;
            set_level(level);
            Ok(Some(level))
        }
    }
}

/// Writes one record. Called by the macros after the level check.
#[doc(hidden)]
pub fn __log_with_location(
    level: Level,
    target: &str,
    file: &str,
    line: u32,
    args: Arguments,
) {
    static RESET: &str = "\x1b[0m";

    if !get_logger().enabled(level) {
        return;
    }

    let color = level.color_code();
    let level_str = level.as_str();

    println!("{color}[{level_str}]{RESET} {target} ({file}:{line}): {args}");
}

/// Logs a record at an explicit level.
///
/// ```
/// use xc_log::{log, Level};
///
/// log!(level: Level::Info, "reserved {} slots", 16);
/// ```
#[macro_export]
macro_rules! log {
    (level: $level:expr, $($arg:tt)*) => {
        {
            if $crate::get_logger().enabled($level) {
                $crate::__log_with_location(
                    $level,
                    module_path!(),
                    file!(),
                    line!(),
                    format_args!($($arg)*)
                );
            }
        }
    };
}

/// Logs at [`Level::Error`].
#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => {
        $crate::log!(level: $crate::Level::Error, $($arg)*)
    };
}

/// Logs at [`Level::Warn`].
#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {
        $crate::log!(level: $crate::Level::Warn, $($arg)*)
    };
}

/// Logs at [`Level::Info`].
#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {
        $crate::log!(level: $crate::Level::Info, $($arg)*)
    };
}

/// Logs at [`Level::Debug`].
#[macro_export]
macro_rules! debug {
    ($($arg:tt)*) => {
        $crate::log!(level: $crate::Level::Debug, $($arg)*)
    };
}

/// Logs at [`Level::Trace`].
#[macro_export]
macro_rules! trace {
    ($($arg:tt)*) => {
        $crate::log!(level: $crate::Level::Trace, $($arg)*)
    };
}
