//! Flappy Engine - a side-scrolling obstacle-avoidance arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, spawning, collisions, game state)
//! - `scheduler`: Frame pacing and delta normalization
//! - `engine`: Public facade tying simulation, scheduler and renderer together
//! - `renderer`: Pure frame building plus WebGPU/headless surfaces
//! - `config`: Data-driven tunables
//! - `highscores`: Leaderboard and score-service contract

pub mod config;
pub mod engine;
pub mod error;
pub mod highscores;
pub mod input;
pub mod renderer;
pub mod scheduler;
pub mod sim;

pub use config::{EngineConfig, Viewport};
pub use engine::{Engine, GameObserver};
pub use error::{ConfigError, EngineError, PersistenceError, SurfaceError};
pub use highscores::{HighScoreEntry, HighScores, ScoreKeeper};
pub use input::Command;
pub use sim::{GamePhase, Snapshot};

/// Default tunables
pub mod consts {
    /// Downward acceleration per tick (pixels/tick²)
    pub const GRAVITY: f32 = 0.5;
    /// Velocity set by a flap (negative = upward)
    pub const FLAP_IMPULSE: f32 = -8.0;

    /// Rotation change per unit of vertical velocity (radians)
    pub const ROTATION_FACTOR: f32 = 0.05;
    /// Maximum nose-up tilt (radians)
    pub const MAX_ROTATION_UP: f32 = 0.5;
    /// Maximum nose-down tilt (radians)
    pub const MAX_ROTATION_DOWN: f32 = std::f32::consts::FRAC_PI_2;
    /// Tilt applied on every flap
    pub const LOOK_UP_ANGLE: f32 = -0.5;

    /// Avatar bounding box
    pub const AVATAR_WIDTH: f32 = 40.0;
    pub const AVATAR_HEIGHT: f32 = 40.0;
    /// Avatar horizontal position as a fraction of viewport width
    pub const AVATAR_X_FRACTION: f32 = 0.25;

    /// Obstacle defaults
    pub const SCROLL_SPEED: f32 = 2.0;
    pub const OBSTACLE_WIDTH: f32 = 60.0;
    pub const OBSTACLE_SPACING: f32 = 300.0;
    pub const OBSTACLE_GAP: f32 = 150.0;
    pub const OBSTACLE_MARGIN: f32 = 100.0;

    /// Viewport defaults (pixels)
    pub const VIEWPORT_WIDTH: f32 = 800.0;
    pub const VIEWPORT_HEIGHT: f32 = 600.0;

    /// Target frame interval (60 Hz)
    pub const TARGET_FRAME_INTERVAL_MS: f64 = 1000.0 / 60.0;
    /// Largest delta scale a single tick may apply
    pub const MAX_DELTA_CLAMP: f32 = 3.0;
}
