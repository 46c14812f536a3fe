use serde::{Deserialize, Serialize};

/// Range the gyroscope-driven rotation of a surface may occupy, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AngleBounds {
    pub min_angle_x: f64,
    pub max_angle_x: f64,
    pub min_angle_y: f64,
    pub max_angle_y: f64,
}

impl AngleBounds {
    /// Narrow, square window used while the viewport is portrait.
    pub const PORTRAIT: Self = Self {
        min_angle_x: -16.0,
        max_angle_x: 16.0,
        min_angle_y: -16.0,
        max_angle_y: 16.0,
    };
    /// Wider horizontal swing, tighter vertical swing for landscape viewports.
    pub const LANDSCAPE: Self = Self {
        min_angle_x: -24.0,
        max_angle_x: 24.0,
        min_angle_y: -14.0,
        max_angle_y: 14.0,
    };
    /// Bounds the tilt engine starts with before any orientation is applied.
    pub const ENGINE_BASE: Self = Self {
        min_angle_x: -18.0,
        max_angle_x: 18.0,
        min_angle_y: -18.0,
        max_angle_y: 18.0,
    };

    pub fn span_x(&self) -> f64 {
        self.max_angle_x - self.min_angle_x
    }

    pub fn span_y(&self) -> f64 {
        self.max_angle_y - self.min_angle_y
    }
}

impl Default for AngleBounds {
    fn default() -> Self {
        Self::ENGINE_BASE
    }
}

/// Viewport orientation as reported by the `(orientation: landscape)` query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewportOrientation {
    #[default]
    Portrait,
    Landscape,
}

impl ViewportOrientation {
    pub fn from_landscape(is_landscape: bool) -> Self {
        if is_landscape {
            Self::Landscape
        } else {
            Self::Portrait
        }
    }

    pub fn is_landscape(self) -> bool {
        matches!(self, Self::Landscape)
    }

    pub fn bounds(self) -> AngleBounds {
        bounds_for(self.is_landscape())
    }
}

/// Returns the gyroscope bounds for the given viewport orientation.
pub fn bounds_for(is_landscape: bool) -> AngleBounds {
    if is_landscape {
        AngleBounds::LANDSCAPE
    } else {
        AngleBounds::PORTRAIT
    }
}
