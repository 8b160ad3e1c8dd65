//! Routing of HID input events to the volume controller.

use std::rc::Rc;

use tracing::{error, info};

use crate::audio::AudioHardware;
use crate::hid::{CONSUMER_CONTROL_MATCH, HidSource, RawInputEvent, SemanticAction, classify};
use crate::volume::VolumeController;

/// Default volume change per knob detent.
pub const DEFAULT_STEP: f32 = 0.05;

/// Log target of the ready line printed once input is being received.
pub const READY_TARGET: &str = "volknob::ready";

/// Router lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RouterState {
    /// No subscription yet.
    #[default]
    Stopped,
    /// Subscribed; stays here until the process exits.
    Running,
}

/// Subscribes to consumer-control input and applies each event to the
/// default output device.
pub struct InputEventRouter<A> {
    controller: Rc<VolumeController<A>>,
    step: f32,
    state: RouterState,
}

impl<A: AudioHardware + 'static> InputEventRouter<A> {
    #[must_use]
    pub fn new(controller: VolumeController<A>, step: f32) -> Self {
        Self { controller: Rc::new(controller), step, state: RouterState::Stopped }
    }

    #[must_use]
    pub fn state(&self) -> RouterState {
        self.state
    }

    #[must_use]
    pub fn step(&self) -> f32 {
        self.step
    }

    #[must_use]
    pub fn controller(&self) -> &VolumeController<A> {
        &self.controller
    }

    /// Classify an event with this router's step.
    #[must_use]
    pub fn handle(&self, event: RawInputEvent) -> SemanticAction {
        classify(event, self.step)
    }

    /// Subscribe to `source` and start applying its events.
    ///
    /// The router is `Running` afterwards even if the source fails to open;
    /// it then simply never receives an event.
    ///
    /// Must be called at most once per router.
    pub fn start<S: HidSource>(&mut self, source: &mut S) {
        debug_assert_eq!(self.state, RouterState::Stopped, "router started twice");

        source.set_device_matching(&[CONSUMER_CONTROL_MATCH]);

        let controller = Rc::clone(&self.controller);
        let step = self.step;
        source.register_input_callback(Box::new(move |event| {
            apply(&controller, classify(event, step));
        }));

        source.schedule_with_event_loop();
        self.state = RouterState::Running;

        match source.open() {
            Ok(()) => info!(
                target: READY_TARGET,
                "Running. Rotate the knob to change the volume ({}% step).",
                (self.step * 100.0).round()
            ),
            Err(e) => error!(error = %e, "HID input unavailable, no events will be received"),
        }
    }
}

/// Apply one action to the controller.
pub fn apply<A: AudioHardware>(controller: &VolumeController<A>, action: SemanticAction) {
    match action {
        SemanticAction::IncrementBy(step) => controller.adjust_volume(step),
        SemanticAction::DecrementBy(step) => controller.adjust_volume(-step),
        SemanticAction::SetDeltaScaled(delta) => controller.adjust_volume(delta),
        SemanticAction::ToggleMute => controller.toggle_mute(),
        SemanticAction::Ignore => {}
    }
}
