//! Error types

/// Engine construction failures.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The render surface or its GPU context could not be created.
    #[error("Render surface unavailable: {0}")]
    SurfaceUnavailable(String),

    /// Configuration rejected by validation.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),
}

/// Configuration validation and parsing failures.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// A size, speed or interval that must be positive was not.
    #[error("{field} must be positive (got {value})")]
    NotPositive { field: &'static str, value: f64 },

    /// A physics or layout value was NaN or infinite.
    #[error("{field} must be finite (got {value})")]
    NotFinite { field: &'static str, value: f64 },

    /// Gap plus both margins does not fit in the viewport.
    #[error("gap {gap} with margin {margin} does not fit viewport height {height}")]
    GapDoesNotFit { gap: f32, margin: f32, height: f32 },

    /// Delta clamp below one target interval.
    #[error("max_delta_clamp must be >= 1.0 (got {0})")]
    ClampTooSmall(f32),

    /// Flap tilt outside the allowed rotation range.
    #[error("look_up_angle {angle} outside [-{up}, {down}]")]
    LookUpOutOfRange { angle: f32, up: f32, down: f32 },

    /// JSON could not be parsed.
    #[error("Failed to parse config: {0}")]
    Parse(String),
}

/// Errors reported by a render surface while presenting a frame.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SurfaceError {
    /// Surface must be reconfigured before the next frame.
    #[error("Surface lost")]
    Lost,

    /// GPU ran out of memory.
    #[error("Out of memory")]
    OutOfMemory,

    /// Anything else (timeouts, outdated swapchain, ...).
    #[error("Surface error: {0}")]
    Other(String),
}

/// High-score storage failures. Never affect engine state.
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    /// Backing store missing or refused the write.
    #[error("Storage unavailable: {0}")]
    Storage(String),

    /// Stored data could not be (de)serialized.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Remote service unreachable.
    #[error("Network error: {0}")]
    Network(String),
}
