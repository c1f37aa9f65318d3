//! Frame building
//!
//! `render` turns a snapshot into a flat triangle list. It only reads the
//! snapshot, so it can run at any cadence without touching engine state.

use glam::Vec2;

use super::shapes;
use super::vertex::{Vertex, colors};
use crate::config::Viewport;
use crate::sim::Snapshot;

/// Extra width of the cap drawn at the gap edge of each block
const CAP_OVERHANG: f32 = 4.0;
const CAP_HEIGHT: f32 = 20.0;
const SCORE_TOP: f32 = 24.0;
const SCORE_HEIGHT: f32 = 48.0;

/// A drawable frame in viewport pixels (y down)
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub vertices: Vec<Vertex>,
    pub viewport: Viewport,
    pub clear_color: [f32; 4],
    pub score: u32,
}

/// Build the frame for a snapshot
pub fn render(snapshot: &Snapshot, viewport: &Viewport) -> Frame {
    let mut vertices = Vec::with_capacity(64 + snapshot.obstacles.len() * 24);

    for obstacle in &snapshot.obstacles {
        let left = obstacle.x;
        let right = obstacle.x + obstacle.width;
        let gap_bottom = obstacle.gap_top + obstacle.gap_height;

        // Upper block and its cap
        shapes::rect(
            &mut vertices,
            Vec2::new(left, 0.0),
            Vec2::new(right, obstacle.gap_top),
            colors::OBSTACLE,
        );
        shapes::rect(
            &mut vertices,
            Vec2::new(left - CAP_OVERHANG, obstacle.gap_top - CAP_HEIGHT),
            Vec2::new(right + CAP_OVERHANG, obstacle.gap_top),
            colors::OBSTACLE_CAP,
        );

        // Lower block and its cap
        shapes::rect(
            &mut vertices,
            Vec2::new(left, gap_bottom),
            Vec2::new(right, viewport.height),
            colors::OBSTACLE,
        );
        shapes::rect(
            &mut vertices,
            Vec2::new(left - CAP_OVERHANG, gap_bottom),
            Vec2::new(right + CAP_OVERHANG, gap_bottom + CAP_HEIGHT),
            colors::OBSTACLE_CAP,
        );
    }

    // Avatar body with a beak on the leading edge
    let center = Vec2::new(snapshot.avatar_x, snapshot.avatar_y);
    let size = Vec2::new(snapshot.avatar_width, snapshot.avatar_height);
    shapes::rotated_rect(&mut vertices, center, size, snapshot.rotation, colors::AVATAR);
    let beak_offset = Vec2::from_angle(snapshot.rotation).rotate(Vec2::new(size.x * 0.5, 0.0));
    shapes::rotated_rect(
        &mut vertices,
        center + beak_offset,
        size * 0.3,
        snapshot.rotation,
        colors::AVATAR_BEAK,
    );

    // Score with a drop shadow
    let center_x = viewport.width / 2.0;
    shapes::number(
        &mut vertices,
        snapshot.score,
        center_x + 2.0,
        SCORE_TOP + 2.0,
        SCORE_HEIGHT,
        colors::SCORE_SHADOW,
    );
    shapes::number(
        &mut vertices,
        snapshot.score,
        center_x,
        SCORE_TOP,
        SCORE_HEIGHT,
        colors::SCORE,
    );

    Frame {
        vertices,
        viewport: *viewport,
        clear_color: colors::SKY,
        score: snapshot.score,
    }
}
