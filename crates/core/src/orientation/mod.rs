use serde::{Deserialize, Serialize};

/// Gain applied to raw `beta`/`gamma` readings so small physical tilts cover
/// a fuller visual range.
pub const SENSITIVITY: f64 = 1.6;

/// Largest magnitude any canonical axis may take.
pub const AXIS_LIMIT: f64 = 90.0;

/// Device-reported rotation around the three axes, in degrees.
///
/// Devices without a usable sensor report `null` for `beta`/`gamma`, which
/// is why every axis is optional.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RawOrientationSample {
    #[serde(default)]
    pub alpha: Option<f64>,
    #[serde(default)]
    pub beta: Option<f64>,
    #[serde(default)]
    pub gamma: Option<f64>,
}

impl RawOrientationSample {
    pub fn new(alpha: Option<f64>, beta: Option<f64>, gamma: Option<f64>) -> Self {
        Self { alpha, beta, gamma }
    }
}

/// Orientation sample expressed in the device's natural orientation, with
/// `beta` and `gamma` amplified and clamped to `[-90, 90]`.
///
/// Only [`normalize`] produces these, so a canonical sample always comes from
/// a raw sample that carried both tilt axes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CanonicalTiltSample {
    alpha: Option<f64>,
    beta: f64,
    gamma: f64,
}

impl CanonicalTiltSample {
    pub fn alpha(&self) -> Option<f64> {
        self.alpha
    }

    pub fn beta(&self) -> f64 {
        self.beta
    }

    pub fn gamma(&self) -> f64 {
        self.gamma
    }
}

/// How the physical screen is rotated relative to its natural orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScreenRotation {
    #[default]
    Natural,
    /// Rotated by +90 degrees.
    Clockwise,
    /// Rotated by -90 degrees.
    CounterClockwise,
    /// Rotated by 180 degrees. Not axis-corrected.
    UpsideDown,
}

impl ScreenRotation {
    /// Maps a reported angle onto a rotation. Unknown angles count as natural.
    pub fn from_degrees(angle: i32) -> Self {
        match angle {
            90 => Self::Clockwise,
            -90 => Self::CounterClockwise,
            180 | -180 => Self::UpsideDown,
            _ => Self::Natural,
        }
    }

    pub fn degrees(self) -> i32 {
        match self {
            Self::Natural => 0,
            Self::Clockwise => 90,
            Self::CounterClockwise => -90,
            Self::UpsideDown => 180,
        }
    }
}

impl From<i32> for ScreenRotation {
    fn from(angle: i32) -> Self {
        Self::from_degrees(angle)
    }
}

/// Picks the screen angle from the screen-orientation API, falling back to
/// the legacy window orientation and finally to zero.
pub fn resolve_screen_angle(screen_angle: Option<i32>, window_orientation: Option<i32>) -> i32 {
    screen_angle.or(window_orientation).unwrap_or(0)
}

/// Converts a raw sensor sample into canonical tilt space.
///
/// Returns `None` when either `beta` or `gamma` is missing; such samples must
/// be dropped without touching any surface.
pub fn normalize(
    raw: &RawOrientationSample,
    rotation: impl Into<ScreenRotation>,
) -> Option<CanonicalTiltSample> {
    let (beta, gamma) = (raw.beta?, raw.gamma?);

    let beta = clamp_axis(beta * SENSITIVITY);
    let gamma = clamp_axis(gamma * SENSITIVITY);

    let (beta, gamma) = match rotation.into() {
        ScreenRotation::Clockwise => (clamp_axis(gamma), clamp_axis(-beta)),
        ScreenRotation::CounterClockwise => (clamp_axis(-gamma), clamp_axis(beta)),
        // TODO: decide on an axis mapping for 180 degree rotation once it can
        // be checked on an upside-down device.
        ScreenRotation::Natural | ScreenRotation::UpsideDown => (beta, gamma),
    };

    Some(CanonicalTiltSample {
        alpha: raw.alpha,
        beta,
        gamma,
    })
}

fn clamp_axis(value: f64) -> f64 {
    value.clamp(-AXIS_LIMIT, AXIS_LIMIT)
}
