use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::engine::TiltChange;

pub const HIGHLIGHT_X_PROPERTY: &str = "--highlight-x";
pub const HIGHLIGHT_Y_PROPERTY: &str = "--highlight-y";
pub const HIGHLIGHT_STRENGTH_PROPERTY: &str = "--highlight-strength";

const MIN_STRENGTH: f64 = 0.24;
const MAX_STRENGTH: f64 = 0.55;
const BASE_STRENGTH: f64 = 0.22;

/// Position (percent of the card face) and intensity of the simulated glare.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HighlightState {
    pub x: f64,
    pub y: f64,
    pub strength: f64,
}

impl HighlightState {
    /// Resting highlight painted at start-up and after every orientation change.
    pub const NEUTRAL: Self = Self {
        x: 50.0,
        y: 40.0,
        strength: 0.32,
    };
}

impl Default for HighlightState {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

/// Sink for the style properties of a card's front face.
pub trait RenderTarget {
    fn set_property(&mut self, name: &str, value: String);
}

/// In-memory render target keyed by property name.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StyleMap {
    properties: BTreeMap<String, String>,
}

impl StyleMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.properties.get(name).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

impl RenderTarget for StyleMap {
    fn set_property(&mut self, name: &str, value: String) {
        self.properties.insert(name.to_string(), value);
    }
}

/// Derives the highlight from a tilt notification.
///
/// Percentages are mapped onto an inset travel range so the glare never
/// reaches the card edges. `max_tilt` is the engine's configured maximum
/// tilt angle.
pub fn compute_highlight(change: &TiltChange, max_tilt: f64) -> HighlightState {
    let x = lerp(20.0, 80.0, change.percentage_x / 100.0).clamp(10.0, 90.0);
    let y = lerp(25.0, 75.0, change.percentage_y / 100.0).clamp(15.0, 85.0);
    let movement = (change.tilt_x.abs() + change.tilt_y.abs()) / (max_tilt * 1.5);
    let strength = (BASE_STRENGTH + movement).clamp(MIN_STRENGTH, MAX_STRENGTH);

    HighlightState { x, y, strength }
}

/// Writes the highlight onto a render target.
pub fn render<R: RenderTarget + ?Sized>(target: &mut R, state: &HighlightState) {
    target.set_property(HIGHLIGHT_X_PROPERTY, format!("{}%", state.x));
    target.set_property(HIGHLIGHT_Y_PROPERTY, format!("{}%", state.y));
    target.set_property(HIGHLIGHT_STRENGTH_PROPERTY, format!("{:.3}", state.strength));
}

/// Recomputes and renders the highlight for one surface. Does nothing until a
/// tilt notification is available.
pub fn update_highlight<R: RenderTarget + ?Sized>(
    target: &mut R,
    change: Option<&TiltChange>,
    max_tilt: f64,
) -> Option<HighlightState> {
    let state = compute_highlight(change?, max_tilt);
    render(target, &state);
    Some(state)
}

fn lerp(start: f64, end: f64, t: f64) -> f64 {
    start + (end - start) * t
}

#[cfg(test)]
mod tests {
    use super::*;

    fn change(percentage_x: f64, percentage_y: f64, tilt_x: f64, tilt_y: f64) -> TiltChange {
        TiltChange {
            percentage_x,
            percentage_y,
            tilt_x,
            tilt_y,
        }
    }

    #[test]
    fn maps_percentage_extremes_to_inset_range() {
        let low = compute_highlight(&change(0.0, 0.0, 0.0, 0.0), 32.0);
        assert_eq!((low.x, low.y), (20.0, 25.0));

        let high = compute_highlight(&change(100.0, 100.0, 0.0, 0.0), 32.0);
        assert_eq!((high.x, high.y), (80.0, 75.0));
    }

    #[test]
    fn clamps_out_of_range_percentages() {
        let state = compute_highlight(&change(-200.0, 300.0, 0.0, 0.0), 32.0);
        assert_eq!((state.x, state.y), (10.0, 85.0));
    }

    #[test]
    fn strength_stays_within_limits() {
        for tilt in [0.0, 1.0, 8.0, 16.0, 32.0, 500.0, -1e9] {
            for max in [30.0, 32.0] {
                let state = compute_highlight(&change(50.0, 50.0, tilt, -tilt), max);
                assert!(state.strength >= 0.24 && state.strength <= 0.55);
            }
        }
        let flat = compute_highlight(&change(50.0, 50.0, 0.0, 0.0), 32.0);
        assert_eq!(flat.strength, 0.24);
    }

    #[test]
    fn strength_grows_with_combined_tilt() {
        let state = compute_highlight(&change(50.0, 50.0, 12.0, -12.0), 32.0);
        assert!((state.strength - 0.55).abs() < 1e-9);

        let state = compute_highlight(&change(50.0, 50.0, 4.8, 0.0), 32.0);
        assert!((state.strength - 0.32).abs() < 1e-9);
    }

    #[test]
    fn update_without_change_is_noop() {
        let mut style = StyleMap::new();
        assert!(update_highlight(&mut style, None, 32.0).is_none());
        assert!(style.is_empty());
    }

    #[test]
    fn renders_named_properties() {
        let mut style = StyleMap::new();
        update_highlight(&mut style, Some(&change(0.0, 100.0, 0.0, 0.0)), 32.0);

        assert_eq!(style.get(HIGHLIGHT_X_PROPERTY), Some("20%"));
        assert_eq!(style.get(HIGHLIGHT_Y_PROPERTY), Some("75%"));
        assert_eq!(style.get(HIGHLIGHT_STRENGTH_PROPERTY), Some("0.240"));

        render(&mut style, &HighlightState::NEUTRAL);
        assert_eq!(style.get(HIGHLIGHT_X_PROPERTY), Some("50%"));
        assert_eq!(style.get(HIGHLIGHT_Y_PROPERTY), Some("40%"));
        assert_eq!(style.get(HIGHLIGHT_STRENGTH_PROPERTY), Some("0.320"));
    }
}
