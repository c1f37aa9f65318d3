//! Fixed timestep simulation tick
//!
//! Advances the engine state by one scheduler pass. Order within a tick:
//! physics, spawn/scroll/recycle, collision and scoring.

use super::collision::{Collision, evaluate};
use super::spawner::{advance, ensure_supply, recycle, spawn_obstacle};
use super::state::{EngineState, GamePhase};
use crate::config::EngineConfig;

/// Something observers care about, produced by a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// An obstacle was cleared; `score` is the new total
    Scored { obstacle_id: u32, score: u32 },
    /// The episode ended
    GameOver { score: u32, cause: Collision },
}

/// Advance the state by one tick scaled by `delta_scale`
///
/// Only does work while `Engaged`. Events are in the order observers must
/// see them: scores in spawn order, then at most one game over.
pub fn tick(state: &mut EngineState, config: &EngineConfig, delta_scale: f32) -> Vec<GameEvent> {
    let mut events = Vec::new();
    if state.phase != GamePhase::Engaged {
        return events;
    }

    state.time_ticks += 1;

    // 1. Avatar physics
    state.avatar.integrate(config, delta_scale);

    // 2. Obstacle supply, scroll, retire
    ensure_supply(state, config);
    advance(state, config, delta_scale);
    recycle(state);

    // 3. Collision and scoring
    let eval = evaluate(state, &config.viewport);
    let mut running = state.score - eval.scored.len() as u32;
    for obstacle_id in eval.scored {
        running += 1;
        events.push(GameEvent::Scored {
            obstacle_id,
            score: running,
        });
    }

    if let Some(cause) = eval.collision {
        state.phase = GamePhase::GameOver;
        log::info!(
            "Game over after {} ticks: {:?} (score {})",
            state.time_ticks,
            cause,
            state.score
        );
        events.push(GameEvent::GameOver {
            score: state.score,
            cause,
        });
    }

    events
}

/// Apply a flap
///
/// The first flap of an episode engages physics and spawns the first
/// obstacle. Returns false when the phase ignores activation.
pub fn activate(state: &mut EngineState, config: &EngineConfig) -> bool {
    match state.phase {
        GamePhase::Idle | GamePhase::GameOver => false,
        GamePhase::AwaitingActivation => {
            state.avatar.flap(config);
            state.phase = GamePhase::Engaged;
            spawn_obstacle(state, config);
            true
        }
        GamePhase::Engaged => {
            state.avatar.flap(config);
            true
        }
    }
}
