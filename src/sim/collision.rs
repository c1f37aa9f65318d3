//! Collision and scoring evaluation
//!
//! Pure checks over the avatar box and the obstacle list. Scoring and
//! collision use disjoint conditions: an obstacle can only score once it no
//! longer overlaps the avatar horizontally.

use super::state::{Aabb, EngineState, Obstacle};
use crate::config::Viewport;

/// Why an episode ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collision {
    /// Avatar left the top of the viewport
    Ceiling,
    /// Avatar left the bottom of the viewport
    Floor,
    /// Avatar hit the block above the gap
    UpperBlock { obstacle_id: u32 },
    /// Avatar hit the block below the gap
    LowerBlock { obstacle_id: u32 },
}

/// Result of one evaluation pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Evaluation {
    /// First collision found, if any
    pub collision: Option<Collision>,
    /// Obstacles newly cleared this pass, in spawn order
    pub scored: Vec<u32>,
}

impl Evaluation {
    pub fn is_terminal(&self) -> bool {
        self.collision.is_some()
    }
}

/// Check the avatar against the viewport's top and bottom
pub fn check_bounds(avatar: &Aabb, viewport: &Viewport) -> Option<Collision> {
    if avatar.top() < 0.0 {
        Some(Collision::Ceiling)
    } else if avatar.bottom() > viewport.height {
        Some(Collision::Floor)
    } else {
        None
    }
}

/// Check the avatar against one obstacle's blocks
pub fn check_obstacle(avatar: &Aabb, obstacle: &Obstacle) -> Option<Collision> {
    if !obstacle.overlaps_horizontally(avatar) {
        return None;
    }
    if avatar.top() < obstacle.gap_top {
        Some(Collision::UpperBlock {
            obstacle_id: obstacle.id,
        })
    } else if avatar.bottom() > obstacle.gap_bottom() {
        Some(Collision::LowerBlock {
            obstacle_id: obstacle.id,
        })
    } else {
        None
    }
}

/// Whether the avatar has fully cleared the obstacle
#[inline]
pub fn has_passed(avatar: &Aabb, obstacle: &Obstacle) -> bool {
    obstacle.trailing_edge() < avatar.left()
}

/// Run bounds, obstacle and scoring checks in order
///
/// Marks newly passed obstacles as scored and bumps the score by one per
/// obstacle. Does not change the phase.
pub fn evaluate(state: &mut EngineState, viewport: &Viewport) -> Evaluation {
    let avatar = state.avatar.bounds();
    let mut eval = Evaluation {
        collision: check_bounds(&avatar, viewport),
        scored: Vec::new(),
    };

    if eval.collision.is_none() {
        eval.collision = state
            .obstacles
            .iter()
            .find_map(|obstacle| check_obstacle(&avatar, obstacle));
    }

    for obstacle in state.obstacles.iter_mut() {
        if !obstacle.scored && has_passed(&avatar, obstacle) {
            obstacle.scored = true;
            state.score += 1;
            eval.scored.push(obstacle.id);
        }
    }

    eval
}
