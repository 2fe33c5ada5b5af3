//! Console output for the resizer.
//!
//! One process-wide [`Verbosity`] set from `--quiet`/`--verbose` gates the
//! `info!`, `verbose!` and `warn!` macros. `error!` is never silenced.

use std::sync::atomic::{AtomicU8, Ordering};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum Verbosity {
    /// Failures only.
    Quiet = 0,
    /// Per-file progress, warnings and the run summary.
    #[default]
    Normal = 1,
    /// Also every written file and each source skipped during selection.
    Verbose = 2,
}

impl Verbosity {
    /// `quiet` wins when both flags are set.
    pub fn from_flags(quiet: bool, verbose: bool) -> Self {
        match (quiet, verbose) {
            (true, _) => Verbosity::Quiet,
            (false, true) => Verbosity::Verbose,
            (false, false) => Verbosity::Normal,
        }
    }

    fn from_u8(value: u8) -> Self {
        match value {
            0 => Verbosity::Quiet,
            2 => Verbosity::Verbose,
            _ => Verbosity::Normal,
        }
    }
}

static VERBOSITY: AtomicU8 = AtomicU8::new(Verbosity::Normal as u8);

pub fn set_verbosity(verbosity: Verbosity) {
    VERBOSITY.store(verbosity as u8, Ordering::Relaxed);
}

pub fn verbosity() -> Verbosity {
    Verbosity::from_u8(VERBOSITY.load(Ordering::Relaxed))
}

/// True when messages at `level` should be printed.
pub fn enabled(level: Verbosity) -> bool {
    verbosity() >= level
}

pub fn is_quiet() -> bool {
    verbosity() == Verbosity::Quiet
}

/// Progress line on stdout.
#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {
        if $crate::logger::enabled($crate::logger::Verbosity::Normal) {
            println!($($arg)*);
        }
    };
}

#[macro_export]
macro_rules! verbose {
    ($($arg:tt)*) => {
        if $crate::logger::enabled($crate::logger::Verbosity::Verbose) {
            println!("🔍 {}", format!($($arg)*));
        }
    };
}

#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => {
        eprintln!("❌ {}", format!($($arg)*));
    };
}

#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {
        if $crate::logger::enabled($crate::logger::Verbosity::Normal) {
            eprintln!("⚠️  {}", format!($($arg)*));
        }
    };
}
