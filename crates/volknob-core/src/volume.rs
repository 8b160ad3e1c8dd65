//! Output volume and mute control with scheme fallback.
//!
//! Drivers disagree on which volume property they honor. Some expose only
//! the virtual main volume, legacy devices expose per-channel scalars on
//! element 1 or 2. Every operation walks [`VOLUME_SCHEMES`] in order and
//! stops at the first scheme the device accepts.

use tracing::{debug, error, trace, warn};

use crate::audio::{AudioHardware, DeviceId, PropertyAddress, VOLUME_SCHEMES};

/// Volume reported when no scheme can be read.
pub const DEFAULT_VOLUME: f32 = 0.5;

/// Stateless façade over the default output device.
///
/// The device is resolved again on every call so a change of default output
/// is picked up immediately.
pub struct VolumeController<A> {
    hardware: A,
}

impl<A: AudioHardware> VolumeController<A> {
    #[must_use]
    pub fn new(hardware: A) -> Self {
        Self { hardware }
    }

    /// Resolve the current default output device.
    ///
    /// Returns [`DeviceId::UNKNOWN`] when the query fails; property calls on
    /// it are expected to fail and turn into no-ops.
    pub fn current_device_id(&self) -> DeviceId {
        match self.hardware.default_output_device() {
            Ok(device) => device,
            Err(e) => {
                error!(error = %e, "Failed to fetch default output device");
                DeviceId::UNKNOWN
            }
        }
    }

    /// Current output volume in `[0.0, 1.0]`, or [`DEFAULT_VOLUME`] if the
    /// device exposes none of the known schemes.
    pub fn get_volume(&self) -> f32 {
        let device = self.current_device_id();

        VOLUME_SCHEMES
            .iter()
            .find_map(|address| match self.hardware.scalar(device, *address) {
                Ok(volume) => Some(volume),
                Err(e) => {
                    trace!(%device, ?address, error = %e, "Volume scheme not readable");
                    None
                }
            })
            .unwrap_or_else(|| {
                debug!(%device, "No readable volume scheme, using default");
                DEFAULT_VOLUME
            })
    }

    /// Set the output volume, clamped to `[0.0, 1.0]`.
    ///
    /// Best effort: when every scheme rejects the write nothing happens.
    pub fn set_volume(&self, volume: f32) {
        if volume.is_nan() {
            warn!("Ignoring NaN volume");
            return;
        }

        let volume = volume.clamp(0.0, 1.0);
        let device = self.current_device_id();

        let accepted = VOLUME_SCHEMES.iter().find(|address| {
            match self.hardware.set_scalar(device, **address, volume) {
                Ok(()) => true,
                Err(e) => {
                    trace!(%device, ?address, error = %e, "Volume scheme not writable");
                    false
                }
            }
        });

        match accepted {
            Some(address) => debug!(%device, volume, ?address, "Output volume set"),
            None => debug!(%device, volume, "No writable volume scheme"),
        }
    }

    /// Change the volume by `step`, saturating at `0.0` and `1.0`.
    ///
    /// Read-modify-write without locking; events are applied one at a time
    /// on the event loop thread.
    pub fn adjust_volume(&self, step: f32) {
        self.set_volume(self.get_volume() + step);
    }

    /// Flip the output mute switch. Does nothing if it cannot be read.
    pub fn toggle_mute(&self) {
        let device = self.current_device_id();

        let muted = match self.hardware.integer(device, PropertyAddress::MUTE) {
            Ok(value) => value != 0,
            Err(e) => {
                debug!(%device, error = %e, "Mute not readable, leaving it unchanged");
                return;
            }
        };

        let value = u32::from(!muted);
        match self.hardware.set_integer(device, PropertyAddress::MUTE, value) {
            Ok(()) => debug!(%device, muted = !muted, "Output mute toggled"),
            Err(e) => debug!(%device, error = %e, "Mute not writable"),
        }
    }

    /// Current mute state, `None` when the device has no readable mute.
    pub fn is_muted(&self) -> Option<bool> {
        let device = self.current_device_id();
        self.hardware.integer(device, PropertyAddress::MUTE).ok().map(|value| value != 0)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use mockall::predicate::eq;
    use proptest::prelude::*;

    use super::*;
    use crate::audio::{MockAudioHardware, status};
    use crate::error::AudioError;
    use crate::memory::MemoryAudio;

    const DEVICE: DeviceId = DeviceId(42);

    fn rejected() -> AudioError {
        AudioError::Status(status::UNKNOWN_PROPERTY)
    }

    fn mock_with_device() -> MockAudioHardware {
        let mut mock = MockAudioHardware::new();
        mock.expect_default_output_device().returning(|| Ok(DEVICE));
        mock
    }

    #[test]
    fn test_get_volume_prefers_virtual_main() {
        let mut mock = mock_with_device();
        mock.expect_scalar()
            .with(eq(DEVICE), eq(PropertyAddress::VIRTUAL_MAIN_VOLUME))
            .times(1)
            .returning(|_, _| Ok(0.3));

        assert!((VolumeController::new(mock).get_volume() - 0.3).abs() < f32::EPSILON);
    }

    #[test]
    fn test_get_volume_falls_back_to_element_two() {
        let mut mock = mock_with_device();
        mock.expect_scalar().returning(|_, address| {
            if address == PropertyAddress::volume_scalar(2) { Ok(0.7) } else { Err(rejected()) }
        });

        assert!((VolumeController::new(mock).get_volume() - 0.7).abs() < f32::EPSILON);
    }

    #[test]
    fn test_get_volume_defaults_when_all_schemes_fail() {
        let mut mock = mock_with_device();
        mock.expect_scalar().times(3).returning(|_, _| Err(rejected()));

        assert_eq!(VolumeController::new(mock).get_volume(), DEFAULT_VOLUME);
    }

    #[test]
    fn test_set_volume_stops_at_first_accepted_scheme() {
        let mut mock = mock_with_device();
        mock.expect_set_scalar()
            .with(eq(DEVICE), eq(PropertyAddress::VIRTUAL_MAIN_VOLUME), eq(0.4))
            .times(1)
            .returning(|_, _, _| Err(rejected()));
        mock.expect_set_scalar()
            .with(eq(DEVICE), eq(PropertyAddress::volume_scalar(1)), eq(0.4))
            .times(1)
            .returning(|_, _, _| Ok(()));

        VolumeController::new(mock).set_volume(0.4);
    }

    #[test]
    fn test_set_volume_clamps_before_writing() {
        let mut mock = mock_with_device();
        mock.expect_set_scalar()
            .with(eq(DEVICE), eq(PropertyAddress::VIRTUAL_MAIN_VOLUME), eq(1.0))
            .times(1)
            .returning(|_, _, _| Ok(()));
        mock.expect_set_scalar()
            .with(eq(DEVICE), eq(PropertyAddress::VIRTUAL_MAIN_VOLUME), eq(0.0))
            .times(1)
            .returning(|_, _, _| Ok(()));

        let controller = VolumeController::new(mock);
        controller.set_volume(1.7);
        controller.set_volume(-0.2);
    }

    #[test]
    fn test_set_volume_silent_when_all_schemes_fail() {
        let mut mock = mock_with_device();
        mock.expect_set_scalar().times(3).returning(|_, _, _| Err(rejected()));

        VolumeController::new(mock).set_volume(0.5);
    }

    #[test]
    fn test_set_volume_ignores_nan() {
        let mut mock = MockAudioHardware::new();
        mock.expect_default_output_device().never();
        mock.expect_set_scalar().never();

        VolumeController::new(mock).set_volume(f32::NAN);
    }

    #[test]
    fn test_unresolved_device_uses_sentinel() {
        let mut mock = MockAudioHardware::new();
        mock.expect_default_output_device()
            .returning(|| Err(AudioError::Status(status::BAD_OBJECT)));
        mock.expect_scalar()
            .withf(|device, _| device.is_unknown())
            .returning(|device, _| Err(AudioError::UnknownDevice(device)));

        let controller = VolumeController::new(mock);
        assert_eq!(controller.current_device_id(), DeviceId::UNKNOWN);
        assert_eq!(controller.get_volume(), DEFAULT_VOLUME);
    }

    #[test]
    fn test_unresolved_device_set_is_noop() {
        let audio = Arc::new(MemoryAudio::new().without_default_device());

        let controller = VolumeController::new(Arc::clone(&audio));
        controller.set_volume(0.9);
        controller.toggle_mute();

        assert_eq!(audio.write_count(), 0);
    }

    #[test]
    fn test_adjust_volume_from_eighty_percent() {
        let audio = Arc::new(MemoryAudio::new().with_volume(0.80));
        let controller = VolumeController::new(Arc::clone(&audio));

        controller.adjust_volume(0.05);

        assert!((controller.get_volume() - 0.85).abs() < 1e-6);
    }

    #[test]
    fn test_adjust_volume_saturates() {
        let controller = VolumeController::new(MemoryAudio::new().with_volume(0.98));

        controller.adjust_volume(0.05);
        assert_eq!(controller.get_volume(), 1.0);

        controller.adjust_volume(-3.0);
        assert_eq!(controller.get_volume(), 0.0);
    }

    #[test]
    fn test_adjust_volume_on_element_two_device() {
        let audio = MemoryAudio::new().with_scalar(PropertyAddress::volume_scalar(2), 0.25);
        let controller = VolumeController::new(audio);

        controller.adjust_volume(0.05);

        assert!((controller.get_volume() - 0.30).abs() < 1e-6);
    }

    #[test]
    fn test_toggle_mute_twice_restores_state() {
        let audio = MemoryAudio::new().with_volume(0.5).with_mute(false);
        let controller = VolumeController::new(audio);

        controller.toggle_mute();
        assert_eq!(controller.is_muted(), Some(true));

        controller.toggle_mute();
        assert_eq!(controller.is_muted(), Some(false));
    }

    #[test]
    fn test_toggle_mute_nonzero_unmutes() {
        let mut mock = mock_with_device();
        mock.expect_integer().returning(|_, _| Ok(7));
        mock.expect_set_integer()
            .with(eq(DEVICE), eq(PropertyAddress::MUTE), eq(0))
            .times(1)
            .returning(|_, _, _| Ok(()));

        VolumeController::new(mock).toggle_mute();
    }

    #[test]
    fn test_toggle_mute_unreadable_does_nothing() {
        let mut mock = mock_with_device();
        mock.expect_integer().returning(|_, _| Err(rejected()));
        mock.expect_set_integer().never();

        let controller = VolumeController::new(mock);
        controller.toggle_mute();
        assert_eq!(controller.is_muted(), None);
    }

    fn volume_step() -> impl Strategy<Value = f32> {
        prop_oneof![Just(0.05f32), Just(-0.05f32), -2.0f32..2.0]
    }

    proptest! {
        #[test]
        fn test_set_volume_writes_clamped_value(volume in -10.0f32..10.0) {
            let controller = VolumeController::new(MemoryAudio::new().with_volume(0.5));

            controller.set_volume(volume);

            prop_assert_eq!(controller.get_volume(), volume.clamp(0.0, 1.0));
        }

        #[test]
        fn test_steps_stay_within_bounds(
            start in 0.0f32..=1.0,
            steps in proptest::collection::vec(volume_step(), 0..64),
        ) {
            let controller = VolumeController::new(MemoryAudio::new().with_volume(start));

            for step in steps {
                controller.adjust_volume(step);
                let volume = controller.get_volume();
                prop_assert!((0.0..=1.0).contains(&volume));
            }
        }
    }
}
