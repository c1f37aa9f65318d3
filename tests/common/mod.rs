//! Helpers shared by the integration tests

use flappy_engine::{GameObserver, Snapshot};

#[derive(Debug, Default)]
pub struct Recorder {
    pub scores: Vec<u32>,
    pub game_overs: Vec<u32>,
}

impl GameObserver for Recorder {
    fn on_score(&mut self, score: u32) {
        self.scores.push(score);
    }

    fn on_game_over(&mut self, final_score: u32) {
        self.game_overs.push(final_score);
    }
}

/// Flap whenever the avatar sinks below the next gap's lower half
pub fn should_flap(snapshot: &Snapshot) -> bool {
    let avatar_left = snapshot.avatar_x - snapshot.avatar_width / 2.0;
    let target = snapshot
        .obstacles
        .iter()
        .find(|o| o.x + o.width >= avatar_left)
        .map(|o| o.gap_top + o.gap_height * 0.6)
        .unwrap_or(300.0);
    snapshot.avatar_y > target
}
