//! Game state and core simulation types
//!
//! Everything the engine mutates lives here. External readers only ever see
//! a [`Snapshot`].

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;

/// Lifecycle phase of the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Constructed, never started
    Idle,
    /// Started, avatar holds still until the first activation
    AwaitingActivation,
    /// Physics, spawning and scoring running
    Engaged,
    /// Terminal; state frozen until the next start
    GameOver,
}

impl GamePhase {
    /// AwaitingActivation or Engaged
    pub fn is_playing(&self) -> bool {
        matches!(self, GamePhase::AwaitingActivation | GamePhase::Engaged)
    }
}

/// Axis-aligned box in viewport pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        let half = size * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.min.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.max.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.min.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.max.y
    }
}

/// The player-controlled body
#[derive(Debug, Clone, PartialEq)]
pub struct Avatar {
    /// Box centre; x never changes within an episode
    pub pos: Vec2,
    /// Vertical velocity (pixels/tick, positive = down)
    pub velocity: f32,
    /// Visual tilt (radians, positive = nose down)
    pub rotation: f32,
    pub size: Vec2,
}

impl Avatar {
    /// Avatar centred vertically at the configured horizontal position
    pub fn centered(config: &EngineConfig) -> Self {
        Self {
            pos: Vec2::new(config.avatar_x(), config.viewport.height / 2.0),
            velocity: 0.0,
            rotation: 0.0,
            size: Vec2::new(config.avatar_width, config.avatar_height),
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_center(self.pos, self.size)
    }
}

/// A scrolling pair of blocks separated by a gap
#[derive(Debug, Clone, PartialEq)]
pub struct Obstacle {
    pub id: u32,
    /// Left edge
    pub x: f32,
    pub width: f32,
    pub gap_top: f32,
    pub gap_height: f32,
    /// Set once the avatar has cleared this obstacle
    pub scored: bool,
}

impl Obstacle {
    /// Right edge
    #[inline]
    pub fn trailing_edge(&self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn gap_bottom(&self) -> f32 {
        self.gap_top + self.gap_height
    }

    /// Whether the horizontal spans of the obstacle and `aabb` overlap
    pub fn overlaps_horizontally(&self, aabb: &Aabb) -> bool {
        self.x < aabb.right() && self.trailing_edge() > aabb.left()
    }
}

/// Active obstacles in spawn order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObstacleSet {
    items: Vec<Obstacle>,
}

impl ObstacleSet {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn push(&mut self, obstacle: Obstacle) {
        self.items.push(obstacle);
    }

    /// Most recently spawned obstacle still active
    pub fn newest(&self) -> Option<&Obstacle> {
        self.items.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Obstacle> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Obstacle> {
        self.items.iter_mut()
    }

    /// Drop obstacles failing `keep`; survivors stay in spawn order
    pub fn retain(&mut self, keep: impl FnMut(&Obstacle) -> bool) -> usize {
        let before = self.items.len();
        self.items.retain(keep);
        before - self.items.len()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn as_slice(&self) -> &[Obstacle] {
        &self.items
    }
}

/// Complete engine state (deterministic given the seed)
#[derive(Debug, Clone)]
pub struct EngineState {
    /// Seed of the current episode
    pub seed: u64,
    /// Gap-selection RNG
    pub rng: Pcg32,
    pub avatar: Avatar,
    pub obstacles: ObstacleSet,
    pub score: u32,
    pub phase: GamePhase,
    /// Simulation ticks processed this episode
    pub time_ticks: u64,
    /// Next obstacle ID
    next_id: u32,
}

impl EngineState {
    /// Fresh Idle state with the avatar centred
    pub fn new(config: &EngineConfig, seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            avatar: Avatar::centered(config),
            obstacles: ObstacleSet::new(),
            score: 0,
            phase: GamePhase::Idle,
            time_ticks: 0,
            next_id: 1,
        }
    }

    /// Reset for a new episode, awaiting the first activation
    pub fn reset(&mut self, config: &EngineConfig, seed: u64) {
        *self = Self::new(config, seed);
        self.phase = GamePhase::AwaitingActivation;
    }

    /// Allocate a new obstacle ID
    pub fn next_obstacle_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Read-only copy for rendering and telemetry
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            avatar_x: self.avatar.pos.x,
            avatar_y: self.avatar.pos.y,
            avatar_width: self.avatar.size.x,
            avatar_height: self.avatar.size.y,
            rotation: self.avatar.rotation,
            obstacles: self
                .obstacles
                .iter()
                .map(|o| ObstacleView {
                    id: o.id,
                    x: o.x,
                    width: o.width,
                    gap_top: o.gap_top,
                    gap_height: o.gap_height,
                    scored: o.scored,
                })
                .collect(),
            score: self.score,
            phase: self.phase,
        }
    }
}

/// Obstacle as seen through a snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObstacleView {
    pub id: u32,
    pub x: f32,
    pub width: f32,
    pub gap_top: f32,
    pub gap_height: f32,
    pub scored: bool,
}

/// Immutable copy of the engine state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Avatar box centre
    pub avatar_x: f32,
    pub avatar_y: f32,
    pub avatar_width: f32,
    pub avatar_height: f32,
    pub rotation: f32,
    /// In spawn order
    pub obstacles: Vec<ObstacleView>,
    pub score: u32,
    pub phase: GamePhase,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_is_idle_and_centered() {
        let config = EngineConfig::default();
        let state = EngineState::new(&config, 7);
        assert_eq!(state.phase, GamePhase::Idle);
        assert_eq!(state.avatar.pos, Vec2::new(200.0, 300.0));
        assert!(state.obstacles.is_empty());
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_reset_clears_episode() {
        let config = EngineConfig::default();
        let mut state = EngineState::new(&config, 7);
        state.score = 5;
        state.avatar.velocity = 3.0;
        state.avatar.rotation = 0.4;
        state.obstacles.push(Obstacle {
            id: 1,
            x: 100.0,
            width: 60.0,
            gap_top: 120.0,
            gap_height: 150.0,
            scored: false,
        });

        state.reset(&config, 8);
        assert_eq!(state.phase, GamePhase::AwaitingActivation);
        assert_eq!(state.score, 0);
        assert_eq!(state.avatar.velocity, 0.0);
        assert_eq!(state.avatar.rotation, 0.0);
        assert!(state.obstacles.is_empty());
        assert_eq!(state.seed, 8);
    }

    #[test]
    fn test_retain_keeps_spawn_order() {
        let mut set = ObstacleSet::new();
        for (id, x) in [(1, -100.0), (2, 200.0), (3, 500.0)] {
            set.push(Obstacle {
                id,
                x,
                width: 60.0,
                gap_top: 100.0,
                gap_height: 150.0,
                scored: false,
            });
        }
        let removed = set.retain(|o| o.trailing_edge() >= 0.0);
        assert_eq!(removed, 1);
        let ids: Vec<u32> = set.iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![2, 3]);
        assert_eq!(set.newest().map(|o| o.id), Some(3));
    }

    #[test]
    fn test_horizontal_overlap_is_strict() {
        let obstacle = Obstacle {
            id: 1,
            x: 220.0,
            width: 60.0,
            gap_top: 100.0,
            gap_height: 150.0,
            scored: false,
        };
        let touching = Aabb::from_center(Vec2::new(200.0, 300.0), Vec2::new(40.0, 40.0));
        assert!(!obstacle.overlaps_horizontally(&touching));
        let inside = Aabb::from_center(Vec2::new(230.0, 300.0), Vec2::new(40.0, 40.0));
        assert!(obstacle.overlaps_horizontally(&inside));
    }
}
