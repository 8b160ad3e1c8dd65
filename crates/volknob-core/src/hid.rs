//! HID usages, raw input events and their classification.

use tracing::debug;

use crate::error::HidResult;

/// HID usage pages.
pub mod page {
    pub const GENERIC_DESKTOP: u32 = 0x01;
    pub const CONSUMER: u32 = 0x0C;
}

/// Consumer page usages.
pub mod consumer {
    pub const CONSUMER_CONTROL: u32 = 0x01;
    /// Reported by some knobs as a signed relative step rather than the
    /// absolute level the usage tables describe.
    pub const VOLUME: u32 = 0xE0;
    pub const MUTE: u32 = 0xE2;
    pub const VOLUME_INCREMENT: u32 = 0xE9;
    pub const VOLUME_DECREMENT: u32 = 0xEA;
}

/// Generic desktop page usages.
pub mod generic_desktop {
    pub const DIAL: u32 = 0x37;
}

/// One input value change as delivered by the HID subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawInputEvent {
    pub usage_page: u32,
    pub usage: u32,
    pub value: i64,
}

impl RawInputEvent {
    #[must_use]
    pub const fn new(usage_page: u32, usage: u32, value: i64) -> Self {
        Self { usage_page, usage, value }
    }
}

/// What an input event asks the volume controller to do.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SemanticAction {
    IncrementBy(f32),
    DecrementBy(f32),
    SetDeltaScaled(f32),
    ToggleMute,
    Ignore,
}

/// Map a raw event to an action.
///
/// Consumer controls report a zero value on key release; those never change
/// the volume. Dial events only contribute their sign.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn classify(event: RawInputEvent, step: f32) -> SemanticAction {
    let RawInputEvent { usage_page, usage, value } = event;

    match (usage_page, usage) {
        (page::CONSUMER, consumer::VOLUME_INCREMENT) if value != 0 => {
            SemanticAction::IncrementBy(step)
        }
        (page::CONSUMER, consumer::VOLUME_DECREMENT) if value != 0 => {
            SemanticAction::DecrementBy(step)
        }
        (page::CONSUMER, consumer::MUTE) if value != 0 => SemanticAction::ToggleMute,
        (page::CONSUMER, consumer::VOLUME) => {
            let delta = value as f32 * step;
            if delta == 0.0 {
                SemanticAction::Ignore
            } else {
                SemanticAction::SetDeltaScaled(delta)
            }
        }
        (page::GENERIC_DESKTOP, generic_desktop::DIAL) => match value.signum() {
            1 => SemanticAction::IncrementBy(step),
            -1 => SemanticAction::DecrementBy(step),
            _ => SemanticAction::Ignore,
        },
        (
            page::CONSUMER,
            consumer::VOLUME_INCREMENT | consumer::VOLUME_DECREMENT | consumer::MUTE,
        ) => SemanticAction::Ignore,
        _ => {
            debug!(usage_page, usage, value, "Unhandled HID event");
            SemanticAction::Ignore
        }
    }
}

/// Device matching criterion for the HID subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceMatch {
    pub usage_page: u32,
    pub usage: u32,
}

/// Consumer-control devices: media keys and volume knobs.
pub const CONSUMER_CONTROL_MATCH: DeviceMatch =
    DeviceMatch { usage_page: page::CONSUMER, usage: consumer::CONSUMER_CONTROL };

/// Callback invoked once per input value change.
pub type InputCallback = Box<dyn FnMut(RawInputEvent)>;

/// The OS HID subsystem, reduced to what the router needs.
pub trait HidSource {
    /// Restrict delivery to devices matching any of `criteria`.
    fn set_device_matching(&mut self, criteria: &[DeviceMatch]);

    /// Register the input value callback.
    fn register_input_callback(&mut self, callback: InputCallback);

    /// Attach the source to the current thread's event loop.
    fn schedule_with_event_loop(&mut self);

    /// Open the source so it starts delivering events.
    ///
    /// # Errors
    /// Returns [`HidError::OpenFailed`](crate::HidError::OpenFailed) with the
    /// OS status when the subsystem refuses to open.
    fn open(&mut self) -> HidResult<()>;
}
