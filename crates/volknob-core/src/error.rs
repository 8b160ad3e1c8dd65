//! Error types for volknob core.

use thiserror::Error;

use crate::audio::{DeviceId, OsStatus};

/// Failure reported by the audio property interface.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AudioError {
    #[error("Audio property call failed (status {0})")]
    Status(OsStatus),

    #[error("Unknown audio device: {0}")]
    UnknownDevice(DeviceId),
}

impl AudioError {
    /// The raw OS status behind this error, if any.
    #[must_use]
    pub fn status(&self) -> Option<OsStatus> {
        match self {
            Self::Status(status) => Some(*status),
            Self::UnknownDevice(_) => None,
        }
    }
}

/// Result type for audio property operations.
pub type AudioResult<T> = std::result::Result<T, AudioError>;

/// Failure reported by the HID input subsystem.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HidError {
    #[error("Unable to open HID manager (status {status})")]
    OpenFailed { status: i32 },

    #[error("Unable to create HID manager")]
    CreateFailed,
}

/// Result type for HID operations.
pub type HidResult<T> = std::result::Result<T, HidError>;
