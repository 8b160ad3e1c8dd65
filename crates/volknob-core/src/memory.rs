//! In-memory audio hardware.
//!
//! Models a single output device whose supported properties are exactly the
//! ones it was built with. Reads and writes of any other property fail with
//! `kAudioHardwareUnknownPropertyError`, which makes it a stand-in for
//! drivers that implement only some of the volume schemes.

use std::collections::HashMap;

use parking_lot::Mutex;

use crate::audio::{AudioHardware, DeviceId, PropertyAddress, status};
use crate::error::{AudioError, AudioResult};

/// Device id the in-memory backend reports as default output.
pub const MEMORY_DEVICE: DeviceId = DeviceId(73);

#[derive(Debug, Default)]
struct MemoryState {
    scalars: HashMap<PropertyAddress, f32>,
    integers: HashMap<PropertyAddress, u32>,
    writes: usize,
}

/// A fake output device backed by a property map.
#[derive(Debug)]
pub struct MemoryAudio {
    device: Option<DeviceId>,
    state: Mutex<MemoryState>,
}

impl Default for MemoryAudio {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryAudio {
    /// A device with no properties at all.
    #[must_use]
    pub fn new() -> Self {
        Self { device: Some(MEMORY_DEVICE), state: Mutex::new(MemoryState::default()) }
    }

    /// Make the default-device query fail.
    #[must_use]
    pub fn without_default_device(mut self) -> Self {
        self.device = None;
        self
    }

    /// Expose a scalar property with an initial value.
    #[must_use]
    pub fn with_scalar(self, address: PropertyAddress, value: f32) -> Self {
        self.state.lock().scalars.insert(address, value);
        self
    }

    /// Expose the virtual main volume.
    #[must_use]
    pub fn with_volume(self, volume: f32) -> Self {
        self.with_scalar(PropertyAddress::VIRTUAL_MAIN_VOLUME, volume)
    }

    /// Expose the mute switch.
    #[must_use]
    pub fn with_mute(self, muted: bool) -> Self {
        self.state.lock().integers.insert(PropertyAddress::MUTE, u32::from(muted));
        self
    }

    /// Current value of a scalar property, bypassing the device checks.
    #[must_use]
    pub fn scalar_value(&self, address: PropertyAddress) -> Option<f32> {
        self.state.lock().scalars.get(&address).copied()
    }

    /// Number of writes the device accepted.
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.state.lock().writes
    }

    fn check_device(&self, device: DeviceId) -> AudioResult<()> {
        match self.device {
            Some(known) if known == device => Ok(()),
            _ => Err(AudioError::UnknownDevice(device)),
        }
    }
}

impl AudioHardware for MemoryAudio {
    fn default_output_device(&self) -> AudioResult<DeviceId> {
        self.device.ok_or(AudioError::Status(status::BAD_OBJECT))
    }

    fn scalar(&self, device: DeviceId, address: PropertyAddress) -> AudioResult<f32> {
        self.check_device(device)?;
        self.state
            .lock()
            .scalars
            .get(&address)
            .copied()
            .ok_or(AudioError::Status(status::UNKNOWN_PROPERTY))
    }

    fn set_scalar(
        &self,
        device: DeviceId,
        address: PropertyAddress,
        value: f32,
    ) -> AudioResult<()> {
        self.check_device(device)?;
        let mut state = self.state.lock();
        let slot = state
            .scalars
            .get_mut(&address)
            .ok_or(AudioError::Status(status::UNKNOWN_PROPERTY))?;
        *slot = value;
        state.writes += 1;
        Ok(())
    }

    fn integer(&self, device: DeviceId, address: PropertyAddress) -> AudioResult<u32> {
        self.check_device(device)?;
        self.state
            .lock()
            .integers
            .get(&address)
            .copied()
            .ok_or(AudioError::Status(status::UNKNOWN_PROPERTY))
    }

    fn set_integer(
        &self,
        device: DeviceId,
        address: PropertyAddress,
        value: u32,
    ) -> AudioResult<()> {
        self.check_device(device)?;
        let mut state = self.state.lock();
        let slot = state
            .integers
            .get_mut(&address)
            .ok_or(AudioError::Status(status::UNKNOWN_PROPERTY))?;
        *slot = value;
        state.writes += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_property_rejected() {
        let audio = MemoryAudio::new().with_volume(0.5);

        let err = audio.scalar(MEMORY_DEVICE, PropertyAddress::volume_scalar(1)).unwrap_err();
        assert_eq!(err.status(), Some(status::UNKNOWN_PROPERTY));
        assert!(audio.set_scalar(MEMORY_DEVICE, PropertyAddress::volume_scalar(1), 0.1).is_err());
        assert_eq!(audio.write_count(), 0);
    }

    #[test]
    fn test_wrong_device_rejected() {
        let audio = MemoryAudio::new().with_volume(0.5);

        assert_eq!(
            audio.scalar(DeviceId::UNKNOWN, PropertyAddress::VIRTUAL_MAIN_VOLUME),
            Err(AudioError::UnknownDevice(DeviceId::UNKNOWN))
        );
    }

    #[test]
    fn test_writes_are_counted() {
        let audio = MemoryAudio::new().with_volume(0.5).with_mute(false);

        audio.set_scalar(MEMORY_DEVICE, PropertyAddress::VIRTUAL_MAIN_VOLUME, 0.2).unwrap();
        audio.set_integer(MEMORY_DEVICE, PropertyAddress::MUTE, 1).unwrap();

        assert_eq!(audio.write_count(), 2);
        assert_eq!(audio.scalar_value(PropertyAddress::VIRTUAL_MAIN_VOLUME), Some(0.2));
    }
}
