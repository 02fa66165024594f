//! Stderr diagnostics for the catalog, resolver and pass stages.
//!
//! Each macro takes the run's `AnalysisConfig::verbosity` first; nothing is
//! formatted below its level. Levels:
//! - 0: SILENT (nothing, errors are returned to the caller)
//! - 1: SUMMARY (stage results, dependency resolution warnings)
//! - 2: STEPS (per-reference resolution decisions, implicit sinks)
//! - 3: DEBUG (per-task timings from each pass)

/// Verbosity level constants.
pub const VERBOSITY_SILENT: u8 = 0;
pub const VERBOSITY_SUMMARY: u8 = 1;
pub const VERBOSITY_STEPS: u8 = 2;
pub const VERBOSITY_DEBUG: u8 = 3;

/// Log at SUMMARY level (verbosity >= 1).
///
/// Used for: stage completion, project duration, unresolved references.
#[macro_export]
macro_rules! log_summary {
    ($verbosity:expr, $($arg:tt)*) => {
        if $verbosity >= $crate::logging::VERBOSITY_SUMMARY {
            eprintln!($($arg)*);
        }
    };
}

/// Log at STEPS level (verbosity >= 2).
///
/// Used for: which task a name reference resolved to, sink seeding.
#[macro_export]
macro_rules! log_steps {
    ($verbosity:expr, $($arg:tt)*) => {
        if $verbosity >= $crate::logging::VERBOSITY_STEPS {
            eprintln!($($arg)*);
        }
    };
}

/// Log at DEBUG level (verbosity >= 3).
#[macro_export]
macro_rules! log_debug {
    ($verbosity:expr, $($arg:tt)*) => {
        if $verbosity >= $crate::logging::VERBOSITY_DEBUG {
            eprintln!($($arg)*);
        }
    };
}
