use serde::{Deserialize, Serialize};

use crate::orientation::{resolve_screen_angle, ScreenRotation};

/// Whether orientation samples can be obtained on this device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrientationCapability {
    /// No orientation sensor API is exposed.
    #[default]
    Unavailable,
    /// The sensor API exists but must be unlocked by a user gesture.
    RequiresPermission,
    /// Samples flow without any prompt.
    Available,
}

/// Primary input device, from the `(pointer: coarse)` media query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerKind {
    /// Touch screens and other imprecise pointers.
    Coarse,
    #[default]
    Fine,
}

/// Queries the coordinator makes against the host environment.
///
/// Missing APIs are reported as `None` or [`OrientationCapability::Unavailable`]
/// rather than as errors.
pub trait Platform {
    fn pointer_kind(&self) -> PointerKind;

    fn is_landscape(&self) -> bool;

    /// Angle from the screen-orientation API, if present.
    fn screen_orientation_angle(&self) -> Option<i32>;

    /// Legacy `window.orientation` value, if present.
    fn window_orientation(&self) -> Option<i32>;

    fn orientation_capability(&self) -> OrientationCapability;

    fn screen_rotation(&self) -> ScreenRotation {
        ScreenRotation::from_degrees(resolve_screen_angle(
            self.screen_orientation_angle(),
            self.window_orientation(),
        ))
    }
}

/// Plain-data platform description, used for trace replays and tests.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StaticPlatform {
    pub pointer: PointerKind,
    pub landscape: bool,
    pub screen_angle: Option<i32>,
    pub window_orientation: Option<i32>,
    pub capability: OrientationCapability,
}

impl StaticPlatform {
    /// A touch device in portrait with a sensor that needs no prompt.
    pub fn touch_portrait() -> Self {
        Self {
            pointer: PointerKind::Coarse,
            landscape: false,
            screen_angle: Some(0),
            window_orientation: None,
            capability: OrientationCapability::Available,
        }
    }

    /// A mouse-driven desktop without orientation sensors.
    pub fn desktop() -> Self {
        Self::default()
    }

    pub fn set_screen_angle(&mut self, angle: Option<i32>) {
        self.screen_angle = angle;
    }
}

impl Platform for StaticPlatform {
    fn pointer_kind(&self) -> PointerKind {
        self.pointer
    }

    fn is_landscape(&self) -> bool {
        self.landscape
    }

    fn screen_orientation_angle(&self) -> Option<i32> {
        self.screen_angle
    }

    fn window_orientation(&self) -> Option<i32> {
        self.window_orientation
    }

    fn orientation_capability(&self) -> OrientationCapability {
        self.capability
    }
}

/// Result of a sensor permission request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionOutcome {
    Granted,
    Denied,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    /// Nothing to ask for: the sensor is either free or absent.
    Idle,
    /// Waiting for the first tap or click to issue the request.
    Armed,
    Settled(PermissionOutcome),
}

/// One-shot permission prompt tied to the first user interaction.
///
/// Interaction listeners are attached while the gate is armed and detached
/// once the request settles, whatever the outcome.
#[derive(Debug, Clone)]
pub struct PermissionGate {
    state: GateState,
    listeners_attached: bool,
}

impl PermissionGate {
    pub fn new(capability: OrientationCapability) -> Self {
        let state = match capability {
            OrientationCapability::RequiresPermission => GateState::Armed,
            OrientationCapability::Available => GateState::Settled(PermissionOutcome::Granted),
            OrientationCapability::Unavailable => GateState::Idle,
        };
        Self {
            state,
            listeners_attached: state == GateState::Armed,
        }
    }

    pub fn state(&self) -> GateState {
        self.state
    }

    pub fn listeners_attached(&self) -> bool {
        self.listeners_attached
    }

    pub fn is_granted(&self) -> bool {
        self.state == GateState::Settled(PermissionOutcome::Granted)
    }

    /// Issues the permission request on the first interaction after arming.
    ///
    /// A failing request counts as a denial. Later interactions do nothing and
    /// return `None`.
    pub fn on_interaction<F, E>(&mut self, request: F) -> Option<PermissionOutcome>
    where
        F: FnOnce() -> std::result::Result<PermissionOutcome, E>,
    {
        if self.state != GateState::Armed {
            self.detach_listeners();
            return None;
        }

        let outcome = request().unwrap_or(PermissionOutcome::Denied);
        self.state = GateState::Settled(outcome);
        self.detach_listeners();
        Some(outcome)
    }

    pub fn detach_listeners(&mut self) {
        self.listeners_attached = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn screen_rotation_prefers_screen_api() {
        let mut platform = StaticPlatform::touch_portrait();
        platform.set_screen_angle(Some(90));
        platform.window_orientation = Some(-90);
        assert_eq!(platform.screen_rotation(), ScreenRotation::Clockwise);

        platform.set_screen_angle(None);
        assert_eq!(platform.screen_rotation(), ScreenRotation::CounterClockwise);

        platform.window_orientation = None;
        assert_eq!(platform.screen_rotation(), ScreenRotation::Natural);
    }

    #[test]
    fn gate_requests_once_and_detaches() {
        let mut gate = PermissionGate::new(OrientationCapability::RequiresPermission);
        assert_eq!(gate.state(), GateState::Armed);
        assert!(gate.listeners_attached());

        let outcome = gate.on_interaction(|| Ok::<_, ()>(PermissionOutcome::Granted));
        assert_eq!(outcome, Some(PermissionOutcome::Granted));
        assert!(gate.is_granted());
        assert!(!gate.listeners_attached());

        let again = gate.on_interaction(|| -> Result<PermissionOutcome, ()> {
            panic!("permission must only be requested once")
        });
        assert!(again.is_none());
    }

    #[test]
    fn failed_request_counts_as_denied() {
        let mut gate = PermissionGate::new(OrientationCapability::RequiresPermission);
        let outcome = gate.on_interaction(|| Err("NotAllowedError"));
        assert_eq!(outcome, Some(PermissionOutcome::Denied));
        assert_eq!(gate.state(), GateState::Settled(PermissionOutcome::Denied));
        assert!(!gate.is_granted());
        assert!(!gate.listeners_attached());
    }

    #[test]
    fn gate_without_prompt_never_arms() {
        let gate = PermissionGate::new(OrientationCapability::Available);
        assert!(gate.is_granted());
        assert!(!gate.listeners_attached());

        let mut gate = PermissionGate::new(OrientationCapability::Unavailable);
        assert_eq!(gate.state(), GateState::Idle);
        gate.detach_listeners();
        gate.detach_listeners();
        assert!(!gate.listeners_attached());
    }
}
