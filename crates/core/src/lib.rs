//! Core library for the Tilt Card greeting card.
//!
//! Turns device-orientation readings into card tilt. Raw sensor samples are
//! corrected for screen rotation and amplified ([`orientation`]), gyroscope
//! bounds follow the viewport orientation ([`bounds`]), and the
//! [`TiltCoordinator`] routes both to every tilt surface, whose front face
//! receives a specular highlight derived from its tilt ([`highlight`]).
//! The tilt engine and the host platform sit behind the [`TiltEngine`] and
//! [`Platform`] traits.

pub mod bounds;
pub mod config;
pub mod coordinator;
pub mod engine;
pub mod error;
pub mod highlight;
pub mod orientation;
pub mod platform;

pub use bounds::{bounds_for, AngleBounds, ViewportOrientation};
pub use config::AppConfig;
pub use coordinator::{CoordinatorState, TiltCoordinator, TiltSurface};
pub use engine::{Calibration, GyroTilt, TiltChange, TiltEngine, TiltSettings};
pub use error::{Result, TiltCardError};
pub use highlight::{
    compute_highlight, render, update_highlight, HighlightState, RenderTarget, StyleMap,
};
pub use orientation::{
    normalize, resolve_screen_angle, CanonicalTiltSample, RawOrientationSample, ScreenRotation,
};
pub use platform::{
    GateState, OrientationCapability, PermissionGate, PermissionOutcome, Platform, PointerKind,
    StaticPlatform,
};
