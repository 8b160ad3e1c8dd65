//! CoreAudio implementation of the audio property interface.

use std::mem;
use std::os::raw::c_void;
use std::ptr;

use coreaudio_sys::{
    AudioObjectGetPropertyData, AudioObjectID, AudioObjectPropertyAddress,
    AudioObjectSetPropertyData, OSStatus,
};
use tracing::trace;

use volknob_core::{AudioError, AudioHardware, AudioResult, DeviceId, PropertyAddress};

/// Audio objects of the running system, reached through
/// `AudioObjectGetPropertyData`/`AudioObjectSetPropertyData`.
#[derive(Debug, Default, Clone, Copy)]
pub struct CoreAudioHardware;

impl CoreAudioHardware {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

fn sys_address(address: PropertyAddress) -> AudioObjectPropertyAddress {
    AudioObjectPropertyAddress {
        mSelector: address.selector,
        mScope: address.scope,
        mElement: address.element,
    }
}

fn check(status: OSStatus) -> AudioResult<()> {
    if status == 0 { Ok(()) } else { Err(AudioError::Status(status)) }
}

#[allow(clippy::cast_possible_truncation)]
fn data_size<T>() -> u32 {
    mem::size_of::<T>() as u32
}

/// Read a fixed-size property value.
///
/// `T` must be the plain data type the property is documented to hold.
fn get_property<T: Copy + Default>(object: DeviceId, address: PropertyAddress) -> AudioResult<T> {
    let address = sys_address(address);
    let mut value = T::default();
    let mut size = data_size::<T>();

    // SAFETY: `address`, `size` and `value` outlive the call and `size` is
    // the exact byte size of `value`.
    let status = unsafe {
        AudioObjectGetPropertyData(
            AudioObjectID::from(object.0),
            &address,
            0,
            ptr::null(),
            &mut size,
            ptr::from_mut(&mut value).cast::<c_void>(),
        )
    };
    check(status)?;
    Ok(value)
}

/// Write a fixed-size property value.
fn set_property<T: Copy>(object: DeviceId, address: PropertyAddress, value: T) -> AudioResult<()> {
    let address = sys_address(address);

    // SAFETY: `address` and `value` outlive the call and the size passed is
    // the exact byte size of `value`.
    let status = unsafe {
        AudioObjectSetPropertyData(
            AudioObjectID::from(object.0),
            &address,
            0,
            ptr::null(),
            data_size::<T>(),
            ptr::from_ref(&value).cast::<c_void>(),
        )
    };
    check(status)
}

impl AudioHardware for CoreAudioHardware {
    fn default_output_device(&self) -> AudioResult<DeviceId> {
        let id: AudioObjectID =
            get_property(DeviceId::SYSTEM_OBJECT, PropertyAddress::DEFAULT_OUTPUT_DEVICE)?;
        let device = DeviceId(id);
        if device.is_unknown() {
            return Err(AudioError::UnknownDevice(device));
        }
        trace!(%device, "Resolved default output device");
        Ok(device)
    }

    fn scalar(&self, device: DeviceId, address: PropertyAddress) -> AudioResult<f32> {
        get_property::<f32>(device, address)
    }

    fn set_scalar(
        &self,
        device: DeviceId,
        address: PropertyAddress,
        value: f32,
    ) -> AudioResult<()> {
        set_property(device, address, value)
    }

    fn integer(&self, device: DeviceId, address: PropertyAddress) -> AudioResult<u32> {
        get_property::<u32>(device, address)
    }

    fn set_integer(
        &self,
        device: DeviceId,
        address: PropertyAddress,
        value: u32,
    ) -> AudioResult<()> {
        set_property(device, address, value)
    }
}
