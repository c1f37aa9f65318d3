//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time enters only as a delta scale
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod physics;
pub mod spawner;
pub mod state;
pub mod tick;

pub use collision::{Collision, Evaluation, check_bounds, check_obstacle, evaluate};
pub use spawner::{advance, ensure_supply, random_gap, recycle, spawn_obstacle};
pub use state::{
    Aabb, Avatar, EngineState, GamePhase, Obstacle, ObstacleSet, ObstacleView, Snapshot,
};
pub use tick::{GameEvent, activate, tick};
