//! volknob core - drive the default output volume from HID input events.
//!
//! This crate holds everything that does not touch the OS directly: the
//! property addressing model, the volume fallback chain, HID event
//! classification and the router tying them together. Platform backends
//! implement [`AudioHardware`] and [`HidSource`].

pub mod audio;
pub mod error;
pub mod hid;
#[cfg(test)]
mod memory;
pub mod router;
pub mod volume;

pub use audio::{AudioHardware, DeviceId, OsStatus, PropertyAddress, VOLUME_SCHEMES};
pub use error::{AudioError, AudioResult, HidError, HidResult};
pub use hid::{DeviceMatch, HidSource, InputCallback, RawInputEvent, SemanticAction, classify};
pub use router::{DEFAULT_STEP, InputEventRouter, READY_TARGET, RouterState};
pub use volume::{DEFAULT_VOLUME, VolumeController};
