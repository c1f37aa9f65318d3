//! Obstacle spawning, scrolling and recycling
//!
//! One trigger only: a new obstacle appears when the newest one has scrolled
//! `obstacle_spacing` in from the right edge (or when none are left).

use rand::Rng;

use super::state::{EngineState, Obstacle};
use crate::config::EngineConfig;

/// Pick gap height and top for a new obstacle
///
/// Gap top is uniform in `[margin, viewport_height - gap_height - margin]`.
pub fn random_gap<R: Rng + ?Sized>(rng: &mut R, config: &EngineConfig) -> (f32, f32) {
    let (min_gap, max_gap) = config.gap_bounds();
    let gap_height = if max_gap > min_gap {
        rng.random_range(min_gap..=max_gap)
    } else {
        min_gap
    };

    let low = config.obstacle_margin;
    let high = config.viewport.height - gap_height - config.obstacle_margin;
    let gap_top = if high > low {
        rng.random_range(low..=high)
    } else {
        low
    };
    (gap_top, gap_height)
}

/// Spawn a single obstacle
///
/// The first obstacle enters at the right edge; later ones sit exactly
/// `obstacle_spacing` behind the newest so spacing survives fractional deltas.
pub fn spawn_obstacle(state: &mut EngineState, config: &EngineConfig) -> u32 {
    let x = match state.obstacles.newest() {
        Some(newest) => newest.x + config.obstacle_spacing,
        None => config.viewport.width,
    };
    let (gap_top, gap_height) = random_gap(&mut state.rng, config);
    let id = state.next_obstacle_id();

    state.obstacles.push(Obstacle {
        id,
        x,
        width: config.obstacle_width,
        gap_top,
        gap_height,
        scored: false,
    });
    log::debug!(
        "Spawned obstacle {} at x={:.1} gap=[{:.1}, {:.1}]",
        id,
        x,
        gap_top,
        gap_top + gap_height
    );
    id
}

/// Spawn while the newest obstacle has cleared the spacing threshold
pub fn ensure_supply(state: &mut EngineState, config: &EngineConfig) -> usize {
    let threshold = config.viewport.width - config.obstacle_spacing;
    let mut spawned = 0;
    loop {
        let due = match state.obstacles.newest() {
            None => true,
            Some(newest) => newest.x <= threshold,
        };
        if !due {
            break;
        }
        spawn_obstacle(state, config);
        spawned += 1;
    }
    spawned
}

/// Scroll every obstacle left
pub fn advance(state: &mut EngineState, config: &EngineConfig, delta_scale: f32) {
    let dx = config.scroll_speed * delta_scale;
    for obstacle in state.obstacles.iter_mut() {
        obstacle.x -= dx;
    }
}

/// Remove obstacles whose trailing edge left the viewport
pub fn recycle(state: &mut EngineState) -> usize {
    let removed = state.obstacles.retain(|o| o.trailing_edge() >= 0.0);
    if removed > 0 {
        log::debug!("Recycled {} obstacle(s)", removed);
    }
    removed
}
