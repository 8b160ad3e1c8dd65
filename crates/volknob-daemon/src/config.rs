//! Daemon configuration.
//!
//! There is no configuration file; the values here are compiled in and only
//! log verbosity can be changed at runtime through `RUST_LOG`.

use thiserror::Error;

use volknob_core::DEFAULT_STEP;

/// Configuration error.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Invalid volume step: {0} (must be greater than 0.0 and at most 1.0)")]
    InvalidStep(f32),
}

/// Daemon configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Volume change per knob detent (0.0 - 1.0)
    pub step: f32,
    /// Log directives applied on top of `RUST_LOG`
    pub log_directives: Vec<&'static str>,
}

impl Default for Config {
    fn default() -> Self {
        Self { step: DEFAULT_STEP, log_directives: default_log_directives() }
    }
}

fn default_log_directives() -> Vec<&'static str> {
    vec!["volknob=info", "volknob_core=info", "volknob_macos=info", "volknob_daemon=info"]
}

impl Config {
    /// Check the configuration for values the daemon cannot run with.
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidStep`] for a step that is not finite or
    /// lies outside `(0.0, 1.0]`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.step.is_finite() || self.step <= 0.0 || self.step > 1.0 {
            return Err(ConfigError::InvalidStep(self.step));
        }
        Ok(())
    }
}
