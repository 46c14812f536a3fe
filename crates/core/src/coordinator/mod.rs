use tracing::{debug, trace};

use crate::{
    bounds::{AngleBounds, ViewportOrientation},
    engine::{TiltChange, TiltEngine},
    highlight::{render, update_highlight, HighlightState, RenderTarget},
    orientation::{normalize, RawOrientationSample},
    platform::{OrientationCapability, PermissionGate, PermissionOutcome, Platform, PointerKind},
    Result, TiltCardError,
};

/// One card element under tilt control.
#[derive(Debug, Clone)]
pub struct TiltSurface<E, R> {
    engine: E,
    front: Option<R>,
    highlight: HighlightState,
}

impl<E: TiltEngine, R: RenderTarget> TiltSurface<E, R> {
    /// Binds an engine instance to the card's front face. Surfaces without a
    /// front face still tilt but never show a highlight.
    pub fn new(engine: E, front: Option<R>) -> Self {
        Self {
            engine,
            front,
            highlight: HighlightState::NEUTRAL,
        }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn front(&self) -> Option<&R> {
        self.front.as_ref()
    }

    pub fn highlight(&self) -> HighlightState {
        self.highlight
    }

    fn apply_bounds(&mut self, bounds: AngleBounds) {
        self.engine.settings_mut().gyroscope_bounds = bounds;
        let samples = self.engine.settings().gyroscope_samples;
        self.engine.set_gyroscope_samples(samples);
        self.engine.clear_calibration();
        self.engine.reset();
        self.paint(HighlightState::NEUTRAL);
    }

    fn paint(&mut self, state: HighlightState) {
        if let Some(front) = self.front.as_mut() {
            render(front, &state);
            self.highlight = state;
        }
    }

    fn react(&mut self, change: Option<&TiltChange>) {
        let max_tilt = self.engine.settings().max;
        if let Some(front) = self.front.as_mut() {
            if let Some(state) = update_highlight(front, change, max_tilt) {
                self.highlight = state;
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordinatorState {
    Uninitialized,
    Active,
}

/// Owns every tilt surface on the page and routes platform events to them.
///
/// Each handler takes `&mut self`, so an orientation change is applied to the
/// whole set before any later sample is seen.
#[derive(Debug)]
pub struct TiltCoordinator<P, E, R> {
    platform: P,
    state: CoordinatorState,
    surfaces: Vec<TiltSurface<E, R>>,
    viewport: ViewportOrientation,
    listener_installed: bool,
    permission: PermissionGate,
}

impl<P, E, R> TiltCoordinator<P, E, R>
where
    P: Platform,
    E: TiltEngine,
    R: RenderTarget,
{
    pub fn new(platform: P) -> Self {
        let viewport = ViewportOrientation::from_landscape(platform.is_landscape());
        let permission = PermissionGate::new(platform.orientation_capability());
        Self {
            platform,
            state: CoordinatorState::Uninitialized,
            surfaces: Vec::new(),
            viewport,
            listener_installed: false,
            permission,
        }
    }

    /// Binds the surfaces and applies the bounds for the current viewport.
    ///
    /// On coarse-pointer devices with an orientation sensor, each engine's own
    /// orientation listener is unbound and the coordinator takes over.
    pub fn activate(&mut self, surfaces: Vec<TiltSurface<E, R>>) -> Result<()> {
        if self.state == CoordinatorState::Active {
            return Err(TiltCardError::AlreadyActive);
        }

        self.surfaces = surfaces;
        self.state = CoordinatorState::Active;
        self.apply_viewport();

        let coarse = self.platform.pointer_kind() == PointerKind::Coarse;
        let sensor = self.platform.orientation_capability() != OrientationCapability::Unavailable;
        if coarse && sensor {
            for surface in &mut self.surfaces {
                surface.engine.unbind_default_orientation_listener();
            }
            self.listener_installed = true;
        }

        debug!(
            surfaces = self.surfaces.len(),
            viewport = ?self.viewport,
            listener = self.listener_installed,
            "tilt coordinator active"
        );
        Ok(())
    }

    /// Applies the bounds for a new viewport orientation and recalibrates
    /// every surface.
    pub fn on_viewport_change(&mut self, is_landscape: bool) {
        self.viewport = ViewportOrientation::from_landscape(is_landscape);
        if self.state != CoordinatorState::Active {
            trace!(viewport = ?self.viewport, "viewport change before activation");
            return;
        }

        debug!(viewport = ?self.viewport, "viewport orientation changed");
        self.apply_viewport();
    }

    /// Normalises a raw sensor sample and forwards it to every surface.
    ///
    /// Returns the number of surfaces that received the sample. Unusable
    /// samples, or samples arriving while orientation tracking is inactive,
    /// are dropped.
    pub fn on_device_orientation(&mut self, raw: &RawOrientationSample) -> usize {
        if !self.tracking_orientation() {
            trace!("orientation sample ignored, tracking inactive");
            return 0;
        }

        let Some(sample) = normalize(raw, self.platform.screen_rotation()) else {
            trace!(?raw, "dropping orientation sample without beta/gamma");
            return 0;
        };

        for surface in &mut self.surfaces {
            let change = surface.engine.on_device_orientation(&sample);
            surface.react(change.as_ref());
        }
        self.surfaces.len()
    }

    /// Pointer movement over one surface, as fractions of its size.
    pub fn on_pointer_move(&mut self, index: usize, x: f64, y: f64) -> Result<TiltChange> {
        if self.state != CoordinatorState::Active {
            return Err(TiltCardError::NotActive);
        }

        let surface = self
            .surfaces
            .get_mut(index)
            .ok_or(TiltCardError::SurfaceIndex(index))?;
        let change = surface.engine.on_pointer_move(x, y);
        surface.react(Some(&change));
        Ok(change)
    }

    /// First tap or click on the page; issues the sensor permission request
    /// if one is pending.
    pub fn on_user_interaction<F, X>(&mut self, request: F) -> Option<PermissionOutcome>
    where
        F: FnOnce() -> std::result::Result<PermissionOutcome, X>,
    {
        let outcome = self.permission.on_interaction(request);
        if let Some(outcome) = outcome {
            debug!(?outcome, "orientation permission settled");
        }
        outcome
    }

    pub fn state(&self) -> CoordinatorState {
        self.state
    }

    pub fn viewport(&self) -> ViewportOrientation {
        self.viewport
    }

    pub fn listener_installed(&self) -> bool {
        self.listener_installed
    }

    pub fn permission(&self) -> &PermissionGate {
        &self.permission
    }

    pub fn surfaces(&self) -> &[TiltSurface<E, R>] {
        &self.surfaces
    }

    pub fn len(&self) -> usize {
        self.surfaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.surfaces.is_empty()
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn platform_mut(&mut self) -> &mut P {
        &mut self.platform
    }

    fn tracking_orientation(&self) -> bool {
        self.state == CoordinatorState::Active
            && self.listener_installed
            && self.permission.is_granted()
    }

    fn apply_viewport(&mut self) {
        let bounds = self.viewport.bounds();
        for surface in &mut self.surfaces {
            surface.apply_bounds(bounds);
        }
    }
}
