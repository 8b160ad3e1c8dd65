//! volknob macOS - CoreAudio and IOKit backends.
//!
//! [`CoreAudioHardware`] implements the audio property interface on top of
//! `AudioObjectGetPropertyData`/`AudioObjectSetPropertyData`, and
//! [`HidManager`] wraps an `IOHIDManager` as an input source scheduled on
//! the CoreFoundation run loop.

#![cfg(target_os = "macos")]
#![allow(unsafe_code)]

pub mod coreaudio;
pub mod hid_manager;
pub mod run_loop;

pub use coreaudio::CoreAudioHardware;
pub use hid_manager::HidManager;
pub use run_loop::RunLoopHandle;
