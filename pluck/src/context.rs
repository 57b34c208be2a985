//! Application context that holds resolved runtime settings
//!
//! The context is built following the precedence order:
//! 1. Default values
//! 2. Environment variables
//! 3. CLI flags
//!
//! Once built, the context is passed as read-only throughout the application.

use crate::format::ColorChoice;
use std::env;

/// How much diagnostic output the user asked for with repeated `-v` flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum VerbosityLevel {
    /// Default output: results, warnings, and errors only
    Normal,
    /// `-v`: stage-by-stage progress messages
    Verbose,
    /// `-vv`: connection and credential resolution details
    VeryVerbose,
    /// `-vvv`: everything, including per-layer details
    Trace,
}

impl VerbosityLevel {
    /// Map the clap occurrence count (`-v`, `-vv`, `-vvv`) to a level
    pub fn from_count(count: u8) -> Self {
        match count {
            0 => VerbosityLevel::Normal,
            1 => VerbosityLevel::Verbose,
            2 => VerbosityLevel::VeryVerbose,
            _ => VerbosityLevel::Trace,
        }
    }
}

/// Application context with resolved settings for the current invocation
#[derive(Debug, Clone)]
pub struct AppContext {
    /// Resolved color preference
    pub color: ColorChoice,
    /// Resolved verbosity level
    pub verbosity: VerbosityLevel,
}

impl AppContext {
    /// Build context with precedence: defaults > env vars > CLI flags
    pub fn build(cli_color: ColorChoice, verbosity: VerbosityLevel) -> Self {
        // 1. Start with defaults
        let mut color = ColorChoice::Auto;

        // 2. Apply environment variable overrides
        if let Ok(value) = env::var("PLUCK_COLOR") {
            color = ColorChoice::from(value.as_str());
        }

        // 3. Apply CLI flag overrides (highest priority)
        // Auto is also clap's default value, so an unset flag must not
        // clobber the environment variable
        if cli_color != ColorChoice::Auto {
            color = cli_color;
        }

        Self { color, verbosity }
    }
}

#[cfg(test)]
#[path = "context_tests.rs"]
mod context_tests;
