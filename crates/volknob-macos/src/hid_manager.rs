//! IOHIDManager input source.
//!
//! The manager delivers every input value change of the matched devices to a
//! C callback on the run loop it is scheduled with. The registered
//! [`InputCallback`] is boxed and handed to IOKit as the callback context;
//! the manager owns that box for as long as IOKit may call into it.

use std::os::raw::c_void;

use core_foundation::array::CFArray;
use core_foundation::base::{CFIndex, CFRelease, CFTypeRef, TCFType, kCFAllocatorDefault};
use core_foundation::dictionary::CFDictionary;
use core_foundation::number::CFNumber;
use core_foundation::runloop::{CFRunLoop, kCFRunLoopDefaultMode};
use core_foundation::string::CFString;
use tracing::debug;

use volknob_core::{DeviceMatch, HidError, HidResult, HidSource, InputCallback, RawInputEvent};

type IOHIDManagerRef = *mut c_void;
type IOHIDValueRef = *mut c_void;
type IOHIDElementRef = *mut c_void;
type IOReturn = i32;
type IOOptionBits = u32;

type IOHIDValueCallback = unsafe extern "C" fn(
    context: *mut c_void,
    result: IOReturn,
    sender: *mut c_void,
    value: IOHIDValueRef,
);

const K_IO_RETURN_SUCCESS: IOReturn = 0;
const K_IOHID_OPTIONS_TYPE_NONE: IOOptionBits = 0;

/// `kIOHIDDeviceUsagePageKey`
const DEVICE_USAGE_PAGE_KEY: &str = "DeviceUsagePage";
/// `kIOHIDDeviceUsageKey`
const DEVICE_USAGE_KEY: &str = "DeviceUsage";

#[link(name = "IOKit", kind = "framework")]
unsafe extern "C" {
    fn IOHIDManagerCreate(allocator: CFTypeRef, options: IOOptionBits) -> IOHIDManagerRef;
    fn IOHIDManagerSetDeviceMatchingMultiple(manager: IOHIDManagerRef, multiple: CFTypeRef);
    fn IOHIDManagerRegisterInputValueCallback(
        manager: IOHIDManagerRef,
        callback: Option<IOHIDValueCallback>,
        context: *mut c_void,
    );
    fn IOHIDManagerScheduleWithRunLoop(
        manager: IOHIDManagerRef,
        run_loop: CFTypeRef,
        mode: CFTypeRef,
    );
    fn IOHIDManagerOpen(manager: IOHIDManagerRef, options: IOOptionBits) -> IOReturn;
    fn IOHIDManagerClose(manager: IOHIDManagerRef, options: IOOptionBits) -> IOReturn;

    fn IOHIDValueGetElement(value: IOHIDValueRef) -> IOHIDElementRef;
    fn IOHIDValueGetIntegerValue(value: IOHIDValueRef) -> CFIndex;
    fn IOHIDElementGetUsagePage(element: IOHIDElementRef) -> u32;
    fn IOHIDElementGetUsage(element: IOHIDElementRef) -> u32;
}

/// An `IOHIDManager` matching consumer-control style devices.
pub struct HidManager {
    manager: IOHIDManagerRef,
    callback: Option<Box<InputCallback>>,
    opened: bool,
}

impl HidManager {
    /// Create a manager with no matching criteria.
    ///
    /// # Errors
    /// Returns [`HidError::CreateFailed`] if IOKit returns no manager.
    pub fn new() -> HidResult<Self> {
        // SAFETY: plain constructor; a null return is handled below.
        let manager = unsafe {
            IOHIDManagerCreate(kCFAllocatorDefault.cast(), K_IOHID_OPTIONS_TYPE_NONE)
        };
        if manager.is_null() {
            return Err(HidError::CreateFailed);
        }
        Ok(Self { manager, callback: None, opened: false })
    }
}

fn matching_dictionary(criterion: DeviceMatch) -> CFDictionary<CFString, CFNumber> {
    CFDictionary::from_CFType_pairs(&[
        (
            CFString::from_static_string(DEVICE_USAGE_PAGE_KEY),
            CFNumber::from(i64::from(criterion.usage_page)),
        ),
        (
            CFString::from_static_string(DEVICE_USAGE_KEY),
            CFNumber::from(i64::from(criterion.usage)),
        ),
    ])
}

impl HidSource for HidManager {
    fn set_device_matching(&mut self, criteria: &[DeviceMatch]) {
        let dictionaries: Vec<_> = criteria.iter().copied().map(matching_dictionary).collect();
        let array = CFArray::from_CFTypes(&dictionaries);

        // SAFETY: the manager copies the matching array.
        unsafe {
            IOHIDManagerSetDeviceMatchingMultiple(self.manager, array.as_CFTypeRef());
        }
        debug!(?criteria, "HID device matching set");
    }

    fn register_input_callback(&mut self, callback: InputCallback) {
        let mut boxed = Box::new(callback);
        let context: *mut InputCallback = &mut *boxed;

        // SAFETY: `context` points into `boxed`, which is stored in `self`
        // below and only dropped after the manager is released or the
        // callback replaced.
        unsafe {
            IOHIDManagerRegisterInputValueCallback(
                self.manager,
                Some(input_value_trampoline),
                context.cast(),
            );
        }
        self.callback = Some(boxed);
    }

    fn schedule_with_event_loop(&mut self) {
        let run_loop = CFRunLoop::get_current();

        // SAFETY: the manager retains what it needs from the run loop.
        unsafe {
            IOHIDManagerScheduleWithRunLoop(
                self.manager,
                run_loop.as_CFTypeRef(),
                kCFRunLoopDefaultMode.cast(),
            );
        }
    }

    fn open(&mut self) -> HidResult<()> {
        // SAFETY: `self.manager` is a valid manager for the lifetime of `self`.
        let status = unsafe { IOHIDManagerOpen(self.manager, K_IOHID_OPTIONS_TYPE_NONE) };
        if status != K_IO_RETURN_SUCCESS {
            return Err(HidError::OpenFailed { status });
        }
        self.opened = true;
        Ok(())
    }
}

impl Drop for HidManager {
    fn drop(&mut self) {
        // SAFETY: closing stops callbacks before the context box is dropped;
        // the manager reference is released exactly once.
        unsafe {
            if self.opened {
                let _ = IOHIDManagerClose(self.manager, K_IOHID_OPTIONS_TYPE_NONE);
            }
            CFRelease(self.manager.cast_const());
        }
    }
}

unsafe extern "C" fn input_value_trampoline(
    context: *mut c_void,
    result: IOReturn,
    _sender: *mut c_void,
    value: IOHIDValueRef,
) {
    if result != K_IO_RETURN_SUCCESS || context.is_null() || value.is_null() {
        return;
    }

    // SAFETY: `value` is valid for the duration of the callback and always
    // carries an element.
    #[allow(clippy::cast_possible_truncation)]
    let event = unsafe {
        let element = IOHIDValueGetElement(value);
        RawInputEvent::new(
            IOHIDElementGetUsagePage(element),
            IOHIDElementGetUsage(element),
            IOHIDValueGetIntegerValue(value) as i64,
        )
    };

    // SAFETY: `context` is the `InputCallback` box owned by the `HidManager`
    // that registered this trampoline; IOKit calls it on the run loop thread
    // only, so no aliasing mutable access exists.
    let callback = unsafe { &mut *context.cast::<InputCallback>() };
    callback(event);
}
