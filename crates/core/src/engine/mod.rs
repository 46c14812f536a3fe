//! Contract with the tilt-rendering engine plus a reference engine.
//!
//! The coordinator only talks to surfaces through [`TiltEngine`]. [`GyroTilt`]
//! reproduces the gyroscope maths of the vanilla-tilt engine the card is
//! rendered with, so the whole pipeline can run headless.

use serde::{Deserialize, Serialize};

use crate::{bounds::AngleBounds, orientation::CanonicalTiltSample};

/// Settings handed to the tilt engine at initialisation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TiltSettings {
    /// Maximum tilt rotation in degrees.
    pub max: f64,
    /// Transition speed in milliseconds.
    pub speed: u32,
    pub scale: f64,
    pub transition: bool,
    pub easing: String,
    pub perspective: f64,
    pub glare: bool,
    pub reverse: bool,
    /// Whether the engine reacts to orientation samples at all.
    pub gyroscope: bool,
    /// Number of samples averaged into the calibration baseline.
    pub gyroscope_samples: u32,
    pub gyroscope_bounds: AngleBounds,
}

impl Default for TiltSettings {
    fn default() -> Self {
        Self {
            max: 32.0,
            speed: 1400,
            scale: 1.04,
            transition: true,
            easing: "cubic-bezier(.03,.98,.52,.99)".to_string(),
            perspective: 900.0,
            glare: true,
            reverse: false,
            gyroscope: true,
            gyroscope_samples: 1,
            gyroscope_bounds: AngleBounds::ENGINE_BASE,
        }
    }
}

/// Notification emitted by a surface whenever its tilt changes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TiltChange {
    pub percentage_x: f64,
    pub percentage_y: f64,
    pub tilt_x: f64,
    pub tilt_y: f64,
}

/// Zero reference against which orientation deltas are measured.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Calibration {
    pub gammazero: Option<f64>,
    pub betazero: Option<f64>,
}

impl Calibration {
    pub fn is_empty(&self) -> bool {
        self.gammazero.is_none() && self.betazero.is_none()
    }
}

/// Live per-element instance exposed by the tilt engine.
pub trait TiltEngine {
    fn settings(&self) -> &TiltSettings;

    fn settings_mut(&mut self) -> &mut TiltSettings;

    /// Sets how many upcoming samples feed the calibration baseline.
    fn set_gyroscope_samples(&mut self, samples: u32);

    fn calibration(&self) -> Calibration;

    fn clear_calibration(&mut self);

    /// Returns the surface to its resting pose.
    fn reset(&mut self);

    /// Feeds one canonical orientation sample. Returns the resulting tilt
    /// notification, if the engine produced one.
    fn on_device_orientation(&mut self, sample: &CanonicalTiltSample) -> Option<TiltChange>;

    /// Pointer position relative to the surface, as fractions of its size.
    fn on_pointer_move(&mut self, x: f64, y: f64) -> TiltChange;

    /// Detaches the engine's own orientation listener. Safe to call twice.
    fn unbind_default_orientation_listener(&mut self);

    fn default_listener_bound(&self) -> bool;
}

/// Headless tilt engine following the vanilla-tilt gyroscope algorithm.
#[derive(Debug, Clone)]
pub struct GyroTilt {
    settings: TiltSettings,
    gyroscope_samples: u32,
    calibration: Calibration,
    position: (f64, f64),
    default_listener: bool,
    last_change: Option<TiltChange>,
}

impl GyroTilt {
    pub fn new(settings: TiltSettings) -> Self {
        let gyroscope_samples = settings.gyroscope_samples;
        let default_listener = settings.gyroscope;
        Self {
            settings,
            gyroscope_samples,
            calibration: Calibration::default(),
            position: (0.5, 0.5),
            default_listener,
            last_change: None,
        }
    }

    /// Pointer-relative position as fractions in `[0, 1]`.
    pub fn position(&self) -> (f64, f64) {
        self.position
    }

    pub fn last_change(&self) -> Option<TiltChange> {
        self.last_change
    }

    pub fn remaining_calibration_samples(&self) -> u32 {
        self.gyroscope_samples
    }

    fn calibrate(&mut self, sample: &CanonicalTiltSample) {
        if self.gyroscope_samples == 0 {
            return;
        }

        let Calibration {
            gammazero,
            betazero,
        } = self.calibration;
        self.calibration = match (gammazero, betazero) {
            (Some(gamma), Some(beta)) => Calibration {
                gammazero: Some((sample.gamma() + gamma) / 2.0),
                betazero: Some((sample.beta() + beta) / 2.0),
            },
            _ => Calibration {
                gammazero: Some(sample.gamma()),
                betazero: Some(sample.beta()),
            },
        };
        self.gyroscope_samples -= 1;
    }

    fn update(&mut self, x: f64, y: f64) -> TiltChange {
        let x = x.clamp(0.0, 1.0);
        let y = y.clamp(0.0, 1.0);
        self.position = (x, y);

        let max = self.settings.max;
        let direction = if self.settings.reverse { -1.0 } else { 1.0 };
        let change = TiltChange {
            percentage_x: x * 100.0,
            percentage_y: y * 100.0,
            tilt_x: round_hundredths(direction * (max - x * max * 2.0)),
            tilt_y: round_hundredths(direction * (y * max * 2.0 - max)),
        };
        self.last_change = Some(change);
        change
    }
}

impl Default for GyroTilt {
    fn default() -> Self {
        Self::new(TiltSettings::default())
    }
}

impl TiltEngine for GyroTilt {
    fn settings(&self) -> &TiltSettings {
        &self.settings
    }

    fn settings_mut(&mut self) -> &mut TiltSettings {
        &mut self.settings
    }

    fn set_gyroscope_samples(&mut self, samples: u32) {
        self.gyroscope_samples = samples;
    }

    fn calibration(&self) -> Calibration {
        self.calibration
    }

    fn clear_calibration(&mut self) {
        self.calibration = Calibration::default();
    }

    fn reset(&mut self) {
        self.position = (0.5, 0.5);
        self.last_change = None;
    }

    fn on_device_orientation(&mut self, sample: &CanonicalTiltSample) -> Option<TiltChange> {
        if !self.settings.gyroscope {
            return None;
        }

        self.calibrate(sample);

        let bounds = self.settings.gyroscope_bounds;
        let gammazero = self.calibration.gammazero.unwrap_or(0.0);
        let betazero = self.calibration.betazero.unwrap_or(0.0);
        let x = window_fraction(sample.gamma() - (bounds.min_angle_x + gammazero), bounds.span_x());
        let y = window_fraction(sample.beta() - (bounds.min_angle_y + betazero), bounds.span_y());

        Some(self.update(x, y))
    }

    fn on_pointer_move(&mut self, x: f64, y: f64) -> TiltChange {
        self.update(x, y)
    }

    fn unbind_default_orientation_listener(&mut self) {
        self.default_listener = false;
    }

    fn default_listener_bound(&self) -> bool {
        self.default_listener
    }
}

fn window_fraction(offset: f64, span: f64) -> f64 {
    if span <= f64::EPSILON {
        0.5
    } else {
        offset / span
    }
}

fn round_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orientation::{normalize, RawOrientationSample};

    fn canonical(beta: f64, gamma: f64) -> CanonicalTiltSample {
        // Undo the sensitivity gain so the canonical values match the inputs.
        let raw = RawOrientationSample::new(None, Some(beta / 1.6), Some(gamma / 1.6));
        normalize(&raw, 0).unwrap()
    }

    #[test]
    fn first_sample_sets_baseline_and_centres() {
        let mut engine = GyroTilt::default();
        let change = engine.on_device_orientation(&canonical(20.0, -8.0)).unwrap();

        let calibration = engine.calibration();
        assert!((calibration.gammazero.unwrap() + 8.0).abs() < 1e-9);
        assert!((calibration.betazero.unwrap() - 20.0).abs() < 1e-9);
        assert!((change.percentage_x - 50.0).abs() < 1e-9);
        assert!((change.percentage_y - 50.0).abs() < 1e-9);
        assert_eq!(change.tilt_x, 0.0);
        assert_eq!(change.tilt_y, 0.0);
        assert_eq!(engine.remaining_calibration_samples(), 0);
    }

    #[test]
    fn later_samples_move_within_bounds() {
        let mut engine = GyroTilt::default();
        engine.on_device_orientation(&canonical(0.0, 0.0));

        let change = engine.on_device_orientation(&canonical(9.0, 18.0)).unwrap();
        assert!((change.percentage_x - 100.0).abs() < 1e-9);
        assert!((change.percentage_y - 75.0).abs() < 1e-9);
        assert_eq!(change.tilt_x, -32.0);
        assert_eq!(change.tilt_y, 16.0);

        let change = engine.on_device_orientation(&canonical(-90.0, -90.0)).unwrap();
        assert_eq!(change.percentage_x, 0.0);
        assert_eq!(change.percentage_y, 0.0);
    }

    #[test]
    fn averages_baseline_over_multiple_samples() {
        let mut engine = GyroTilt::default();
        engine.set_gyroscope_samples(2);
        engine.on_device_orientation(&canonical(10.0, 4.0));
        engine.on_device_orientation(&canonical(20.0, 8.0));

        let calibration = engine.calibration();
        assert!((calibration.betazero.unwrap() - 15.0).abs() < 1e-9);
        assert!((calibration.gammazero.unwrap() - 6.0).abs() < 1e-9);
    }

    #[test]
    fn reverse_flips_tilt_direction() {
        let settings = TiltSettings {
            reverse: true,
            ..TiltSettings::default()
        };
        let mut engine = GyroTilt::new(settings);
        let change = engine.on_pointer_move(0.0, 1.0);
        assert_eq!(change.tilt_x, -32.0);
        assert_eq!(change.tilt_y, -32.0);
    }

    #[test]
    fn reset_recentres_and_keeps_settings() {
        let mut engine = GyroTilt::default();
        engine.on_pointer_move(0.9, 0.1);
        engine.settings_mut().gyroscope_bounds = AngleBounds::LANDSCAPE;
        engine.reset();

        assert_eq!(engine.position(), (0.5, 0.5));
        assert!(engine.last_change().is_none());
        assert_eq!(engine.settings().gyroscope_bounds, AngleBounds::LANDSCAPE);
    }

    #[test]
    fn ignores_samples_when_gyroscope_disabled() {
        let settings = TiltSettings {
            gyroscope: false,
            ..TiltSettings::default()
        };
        let mut engine = GyroTilt::new(settings);
        assert!(!engine.default_listener_bound());
        assert!(engine.on_device_orientation(&canonical(10.0, 10.0)).is_none());
        assert!(engine.calibration().is_empty());
    }

    #[test]
    fn unbinding_default_listener_is_idempotent() {
        let mut engine = GyroTilt::default();
        assert!(engine.default_listener_bound());
        engine.unbind_default_orientation_listener();
        engine.unbind_default_orientation_listener();
        assert!(!engine.default_listener_bound());
    }
}
