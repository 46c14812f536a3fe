/// Result alias that carries the custom [`TiltCardError`] type.
pub type Result<T> = std::result::Result<T, TiltCardError>;

/// Common error type for the core crate.
///
/// Sensor dropouts, missing platform APIs and denied permissions never show
/// up here; those degrade silently inside the coordinator. The variants below
/// cover API misuse and the I/O performed by the application crate.
#[derive(Debug, thiserror::Error)]
pub enum TiltCardError {
    /// Input rejected by a validating constructor.
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),
    /// The coordinator has already bound its surfaces.
    #[error("tilt coordinator is already active")]
    AlreadyActive,
    /// The coordinator has not bound its surfaces yet.
    #[error("tilt coordinator is not active")]
    NotActive,
    /// A surface index outside the tracked set.
    #[error("no tilt surface at index {0}")]
    SurfaceIndex(usize),
    /// Wrapper around standard IO errors.
    #[error("{0}")]
    Io(#[from] std::io::Error),
    /// Wrapper around JSON (de)serialisation errors.
    #[error("{0}")]
    Json(#[from] serde_json::Error),
}
