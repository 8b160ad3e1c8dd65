//! Audio property addressing and the hardware interface.
//!
//! Output devices are addressed the way CoreAudio addresses them: an object
//! id plus a `(selector, scope, element)` triple. Selectors and scopes are
//! four-char codes, elements are channel indices with `0` meaning the main
//! element. The constants here carry the raw values so backends can pass
//! them straight through to the OS.

use std::fmt;
use std::sync::Arc;

use crate::error::AudioResult;

/// OS status code. `0` is success; anything else is a failure.
pub type OsStatus = i32;

/// Build a four-char code the way the CoreAudio headers spell them.
#[must_use]
pub const fn four_cc(code: &[u8; 4]) -> u32 {
    u32::from_be_bytes(*code)
}

/// Property selectors.
pub mod selector {
    use super::four_cc;

    /// `kAudioHardwarePropertyDefaultOutputDevice`
    pub const DEFAULT_OUTPUT_DEVICE: u32 = four_cc(b"dOut");
    /// `kAudioHardwareServiceDeviceProperty_VirtualMainVolume`
    pub const VIRTUAL_MAIN_VOLUME: u32 = four_cc(b"vmvc");
    /// `kAudioDevicePropertyVolumeScalar`
    pub const VOLUME_SCALAR: u32 = four_cc(b"volm");
    /// `kAudioDevicePropertyMute`
    pub const MUTE: u32 = four_cc(b"mute");
}

/// Property scopes.
pub mod scope {
    use super::four_cc;

    /// `kAudioObjectPropertyScopeGlobal`
    pub const GLOBAL: u32 = four_cc(b"glob");
    /// `kAudioDevicePropertyScopeOutput`
    pub const OUTPUT: u32 = four_cc(b"outp");
}

/// Property elements.
pub mod element {
    /// `kAudioObjectPropertyElementMain`
    pub const MAIN: u32 = 0;
}

/// Well-known OS status codes.
pub mod status {
    use super::{OsStatus, four_cc};

    /// `kAudioHardwareUnknownPropertyError`
    #[allow(clippy::cast_possible_wrap)]
    pub const UNKNOWN_PROPERTY: OsStatus = four_cc(b"who?") as OsStatus;
    /// `kAudioHardwareBadObjectError`
    #[allow(clippy::cast_possible_wrap)]
    pub const BAD_OBJECT: OsStatus = four_cc(b"!obj") as OsStatus;
}

/// Identifier of an audio object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeviceId(pub u32);

impl DeviceId {
    /// `kAudioObjectUnknown`; every property call on it fails.
    pub const UNKNOWN: Self = Self(0);
    /// `kAudioObjectSystemObject`, owner of the default-device properties.
    pub const SYSTEM_OBJECT: Self = Self(1);

    #[must_use]
    pub fn is_unknown(self) -> bool {
        self == Self::UNKNOWN
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A `(selector, scope, element)` property address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PropertyAddress {
    pub selector: u32,
    pub scope: u32,
    pub element: u32,
}

impl PropertyAddress {
    #[must_use]
    pub const fn new(selector: u32, scope: u32, element: u32) -> Self {
        Self { selector, scope, element }
    }

    /// Default output device, read from the system object.
    pub const DEFAULT_OUTPUT_DEVICE: Self =
        Self::new(selector::DEFAULT_OUTPUT_DEVICE, scope::GLOBAL, element::MAIN);

    /// Virtual main volume on the output scope.
    pub const VIRTUAL_MAIN_VOLUME: Self =
        Self::new(selector::VIRTUAL_MAIN_VOLUME, scope::OUTPUT, element::MAIN);

    /// Per-channel scalar volume on the output scope.
    #[must_use]
    pub const fn volume_scalar(channel: u32) -> Self {
        Self::new(selector::VOLUME_SCALAR, scope::OUTPUT, channel)
    }

    /// Output mute switch.
    pub const MUTE: Self = Self::new(selector::MUTE, scope::OUTPUT, element::MAIN);
}

/// Volume addressing schemes, in the order they are tried.
pub const VOLUME_SCHEMES: [PropertyAddress; 3] = [
    PropertyAddress::VIRTUAL_MAIN_VOLUME,
    PropertyAddress::volume_scalar(1),
    PropertyAddress::volume_scalar(2),
];

/// The OS audio property interface.
///
/// Implementations report failures as [`AudioError`](crate::AudioError)
/// values and never panic.
#[cfg_attr(test, mockall::automock)]
pub trait AudioHardware {
    /// Resolve the system default output device.
    ///
    /// # Errors
    /// Returns the OS status when the system object rejects the query.
    fn default_output_device(&self) -> AudioResult<DeviceId>;

    /// Read a 32-bit float property.
    ///
    /// # Errors
    /// Returns the OS status when the device does not expose the property.
    fn scalar(&self, device: DeviceId, address: PropertyAddress) -> AudioResult<f32>;

    /// Write a 32-bit float property.
    ///
    /// # Errors
    /// Returns the OS status when the device rejects the write.
    fn set_scalar(&self, device: DeviceId, address: PropertyAddress, value: f32) -> AudioResult<()>;

    /// Read a 32-bit integer property.
    ///
    /// # Errors
    /// Returns the OS status when the device does not expose the property.
    fn integer(&self, device: DeviceId, address: PropertyAddress) -> AudioResult<u32>;

    /// Write a 32-bit integer property.
    ///
    /// # Errors
    /// Returns the OS status when the device rejects the write.
    fn set_integer(
        &self,
        device: DeviceId,
        address: PropertyAddress,
        value: u32,
    ) -> AudioResult<()>;
}

impl<T: AudioHardware + ?Sized> AudioHardware for Arc<T> {
    fn default_output_device(&self) -> AudioResult<DeviceId> {
        (**self).default_output_device()
    }

    fn scalar(&self, device: DeviceId, address: PropertyAddress) -> AudioResult<f32> {
        (**self).scalar(device, address)
    }

    fn set_scalar(
        &self,
        device: DeviceId,
        address: PropertyAddress,
        value: f32,
    ) -> AudioResult<()> {
        (**self).set_scalar(device, address, value)
    }

    fn integer(&self, device: DeviceId, address: PropertyAddress) -> AudioResult<u32> {
        (**self).integer(device, address)
    }

    fn set_integer(
        &self,
        device: DeviceId,
        address: PropertyAddress,
        value: u32,
    ) -> AudioResult<()> {
        (**self).set_integer(device, address, value)
    }
}
