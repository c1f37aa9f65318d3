//! Engine facade
//!
//! Owns the simulation state, the frame scheduler, the render surface and the
//! observer. Hosts drive it with [`Engine::tick`] from their frame callback and
//! feed input through [`Engine::dispatch`] (or `start`/`activate` directly).
//! Out-of-order calls are silent no-ops.

use crate::config::{EngineConfig, Viewport};
use crate::error::{ConfigError, EngineError, SurfaceError};
use crate::input::Command;
use crate::renderer::{self, RenderSurface};
use crate::scheduler::FrameScheduler;
use crate::sim::{self, EngineState, GameEvent, GamePhase, Snapshot};

/// Seed used when the host does not supply one
pub const DEFAULT_SEED: u64 = 0x5EED_F1A9;

/// Receives gameplay notifications, synchronously, inside the tick that
/// produced them
pub trait GameObserver {
    /// An obstacle was cleared; `score` is the new total
    fn on_score(&mut self, score: u32);

    /// The episode ended
    fn on_game_over(&mut self, final_score: u32);
}

pub struct Engine<O: GameObserver, S: RenderSurface> {
    config: EngineConfig,
    state: EngineState,
    scheduler: FrameScheduler,
    observer: O,
    /// `None` once released by `cleanup`
    surface: Option<S>,
    /// Physical pixel size last handed to the surface
    surface_size: (u32, u32),
    /// Viewport from a mid-episode resize, applied at the next `start`
    pending_viewport: Option<Viewport>,
    base_seed: u64,
    episodes: u64,
}

impl<O: GameObserver, S: RenderSurface> Engine<O, S> {
    /// Build an engine in the `Idle` phase with the default seed
    pub fn new(observer: O, config: EngineConfig, surface: S) -> Result<Self, EngineError> {
        Self::with_seed(observer, config, surface, DEFAULT_SEED)
    }

    /// Build an engine whose episode seeds derive from `seed`
    pub fn with_seed(
        observer: O,
        config: EngineConfig,
        mut surface: S,
        seed: u64,
    ) -> Result<Self, EngineError> {
        config.validate()?;

        let surface_size = (
            config.viewport.width.round() as u32,
            config.viewport.height.round() as u32,
        );
        surface.resize(surface_size.0, surface_size.1);

        log::info!(
            "Engine created ({}x{}, seed {})",
            config.viewport.width,
            config.viewport.height,
            seed
        );

        Ok(Self {
            state: EngineState::new(&config, seed),
            scheduler: FrameScheduler::from_config(&config),
            config,
            observer,
            surface: Some(surface),
            surface_size,
            pending_viewport: None,
            base_seed: seed,
            episodes: 0,
        })
    }

    /// Begin a new episode from `Idle` or `GameOver`
    pub fn start(&mut self) {
        let seed = self
            .base_seed
            .wrapping_add(self.episodes.wrapping_mul(0x9E37_79B9_7F4A_7C15));
        self.start_with_seed(seed);
    }

    /// Begin a new episode with an explicit gap-selection seed
    pub fn start_with_seed(&mut self, seed: u64) {
        if !self.scheduler.is_alive() {
            log::debug!("start() ignored: engine cleaned up");
            return;
        }
        if self.state.phase.is_playing() {
            log::debug!("start() ignored: episode already running");
            return;
        }

        if let Some(viewport) = self.pending_viewport.take() {
            self.config.viewport = viewport;
            log::info!("Applied viewport {}x{}", viewport.width, viewport.height);
        }
        self.state.reset(&self.config, seed);
        self.scheduler.reset_clock();
        self.episodes += 1;
        log::info!("Episode {} started (seed {})", self.episodes, seed);
        self.render();
    }

    /// Flap. The first flap of an episode engages physics.
    pub fn activate(&mut self) {
        if !self.scheduler.is_alive() {
            log::debug!("activate() ignored: engine cleaned up");
            return;
        }
        if !sim::activate(&mut self.state, &self.config) {
            log::debug!("activate() ignored in phase {:?}", self.state.phase);
        }
    }

    /// Route an input command
    pub fn dispatch(&mut self, command: Command) {
        match command {
            Command::Primary => {
                if self.state.phase.is_playing() {
                    self.activate();
                } else {
                    self.start();
                }
            }
        }
    }

    /// Host frame callback. Returns true when a simulation pass ran.
    pub fn tick(&mut self, now_ms: f64) -> bool {
        if !self.scheduler.is_alive() {
            return false;
        }
        match self.scheduler.poll(now_ms) {
            Some(delta_scale) => {
                self.step(delta_scale);
                true
            }
            None => false,
        }
    }

    /// Run one simulation and render pass with an explicit delta scale
    pub fn step(&mut self, delta_scale: f32) {
        if !self.scheduler.is_alive() {
            return;
        }
        let delta_scale = delta_scale.clamp(0.0, self.config.max_delta_clamp);

        for event in sim::tick(&mut self.state, &self.config, delta_scale) {
            match event {
                GameEvent::Scored { score, .. } => self.observer.on_score(score),
                GameEvent::GameOver { score, .. } => self.observer.on_game_over(score),
            }
        }

        self.render();
    }

    /// Apply a new viewport and surface size
    ///
    /// The surface follows at once. While an episode is running the world
    /// viewport is held back until the next `start`, so obstacles already
    /// placed keep the margins they were spawned with.
    pub fn resize(
        &mut self,
        viewport: Viewport,
        pixel_size: (u32, u32),
    ) -> Result<(), ConfigError> {
        let mut config = self.config.clone();
        config.viewport = viewport;
        config.validate()?;
        if self.state.phase.is_playing() {
            self.pending_viewport = Some(viewport);
        } else {
            self.pending_viewport = None;
            self.config = config;
        }

        self.surface_size = pixel_size;
        if let Some(surface) = self.surface.as_mut() {
            surface.resize(pixel_size.0, pixel_size.1);
        }
        log::info!(
            "Viewport resized to {}x{} ({}x{} px)",
            viewport.width,
            viewport.height,
            pixel_size.0,
            pixel_size.1
        );
        Ok(())
    }

    /// Stop the scheduler and release the surface. Safe to call repeatedly.
    pub fn cleanup(&mut self) {
        if !self.scheduler.is_alive() {
            return;
        }
        self.scheduler.stop();
        if let Some(mut surface) = self.surface.take() {
            surface.release();
        }
        log::info!("Engine cleaned up after {} episode(s)", self.episodes);
    }

    /// Read-only copy of the current state
    pub fn snapshot(&self) -> Snapshot {
        self.state.snapshot()
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn score(&self) -> u32 {
        self.state.score
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn is_alive(&self) -> bool {
        self.scheduler.is_alive()
    }

    pub fn episodes(&self) -> u64 {
        self.episodes
    }

    pub fn scheduler(&self) -> &FrameScheduler {
        &self.scheduler
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    /// The surface, until `cleanup` releases it
    pub fn surface(&self) -> Option<&S> {
        self.surface.as_ref()
    }

    fn render(&mut self) {
        let Some(surface) = self.surface.as_mut() else {
            return;
        };
        let frame = renderer::render(&self.state.snapshot(), &self.config.viewport);
        match surface.present(&frame) {
            Ok(()) => {}
            Err(SurfaceError::Lost) => {
                surface.resize(self.surface_size.0, self.surface_size.1);
            }
            Err(SurfaceError::OutOfMemory) => {
                log::error!("Out of memory!");
            }
            Err(e) => log::warn!("Render error: {:?}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::HeadlessSurface;

    #[derive(Debug, Default)]
    struct Recorder {
        scores: Vec<u32>,
        game_overs: Vec<u32>,
        calls: Vec<&'static str>,
    }

    impl GameObserver for Recorder {
        fn on_score(&mut self, score: u32) {
            self.scores.push(score);
            self.calls.push("score");
        }

        fn on_game_over(&mut self, final_score: u32) {
            self.game_overs.push(final_score);
            self.calls.push("game_over");
        }
    }

    fn engine() -> Engine<Recorder, HeadlessSurface> {
        Engine::new(
            Recorder::default(),
            EngineConfig::default(),
            HeadlessSurface::default(),
        )
        .expect("valid config")
    }

    #[test]
    fn test_invalid_config_fails_construction() {
        let config = EngineConfig {
            avatar_width: -1.0,
            ..Default::default()
        };
        let result = Engine::new(Recorder::default(), config, HeadlessSurface::default());
        assert!(matches!(result, Err(EngineError::InvalidConfig(_))));
    }

    #[test]
    fn test_construction_sizes_surface() {
        let e = engine();
        assert_eq!(e.surface().map(|s| s.size), Some((800, 600)));
        assert_eq!(e.phase(), GamePhase::Idle);
    }

    #[test]
    fn test_activate_before_start_is_noop() {
        let mut e = engine();
        let before = e.snapshot();
        e.activate();
        e.step(1.0);
        assert_eq!(e.phase(), GamePhase::Idle);
        assert_eq!(e.snapshot(), before);
    }

    #[test]
    fn test_double_start_is_noop() {
        let mut e = engine();
        e.start();
        e.activate();
        e.step(1.0);
        let running = e.snapshot();
        e.start();
        assert_eq!(e.snapshot(), running);
        assert_eq!(e.episodes(), 1);
    }

    #[test]
    fn test_dispatch_primary_starts_then_flaps() {
        let mut e = engine();
        e.dispatch(Command::Primary);
        assert_eq!(e.phase(), GamePhase::AwaitingActivation);
        e.dispatch(Command::Primary);
        assert_eq!(e.phase(), GamePhase::Engaged);
    }

    #[test]
    fn test_single_game_over_callback() {
        let mut e = engine();
        e.start();
        e.activate();
        for _ in 0..600 {
            e.step(1.0);
        }
        assert_eq!(e.phase(), GamePhase::GameOver);
        assert_eq!(e.observer().game_overs, vec![e.score()]);
    }

    #[test]
    fn test_score_reported_before_crash_in_same_pass() {
        let mut e = engine();
        e.start();
        e.activate();

        // Obstacle about to clear the avatar while the avatar hits the floor
        let avatar_left = e.state.avatar.bounds().left();
        if let Some(first) = e.state.obstacles.iter_mut().next() {
            first.x = avatar_left - first.width;
        }
        e.state.avatar.pos.y = e.config.viewport.height;
        e.step(1.0);

        assert_eq!(e.phase(), GamePhase::GameOver);
        assert_eq!(e.observer().calls, vec!["score", "game_over"]);
        assert_eq!(e.observer().scores, vec![1]);
        assert_eq!(e.observer().game_overs, vec![1]);
    }

    #[test]
    fn test_restart_after_game_over() {
        let mut e = engine();
        e.start();
        e.activate();
        while e.phase() != GamePhase::GameOver {
            e.step(1.0);
        }
        e.dispatch(Command::Primary);
        assert_eq!(e.phase(), GamePhase::AwaitingActivation);
        let snap = e.snapshot();
        assert_eq!(snap.score, 0);
        assert!(snap.obstacles.is_empty());
        assert_eq!(snap.avatar_y, 300.0);
        assert_eq!(snap.rotation, 0.0);
    }

    #[test]
    fn test_tick_waits_for_interval() {
        let mut e = engine();
        e.start();
        e.activate();
        assert!(!e.tick(0.0));
        assert!(!e.tick(5.0));
        assert!(e.tick(20.0));
    }

    #[test]
    fn test_each_pass_presents_a_frame() {
        let mut e = engine();
        e.start();
        let after_start = e.surface().map(|s| s.frames_presented()).unwrap_or(0);
        e.step(1.0);
        e.step(1.0);
        assert_eq!(
            e.surface().map(|s| s.frames_presented()),
            Some(after_start + 2)
        );
    }

    #[test]
    fn test_cleanup_is_idempotent_and_final() {
        let mut e = engine();
        e.start();
        e.activate();
        e.tick(0.0);
        e.cleanup();
        e.cleanup();
        assert!(!e.is_alive());
        assert!(e.surface().is_none());

        let frozen = e.snapshot();
        assert!(!e.tick(1000.0));
        e.step(1.0);
        e.activate();
        e.start();
        assert_eq!(e.snapshot(), frozen);
    }

    #[test]
    fn test_resize_validates_and_applies() {
        let mut e = engine();
        assert!(e.resize(Viewport::new(1024.0, 200.0), (1024, 200)).is_err());
        assert_eq!(e.config().viewport, Viewport::default());

        e.resize(Viewport::new(1024.0, 768.0), (2048, 1536))
            .expect("valid viewport");
        assert_eq!(e.surface().map(|s| s.size), Some((2048, 1536)));
        e.start();
        assert_eq!(e.snapshot().avatar_x, 256.0);
    }

    #[test]
    fn test_resize_mid_episode_waits_for_next_start() {
        let mut e = engine();
        e.start();
        e.activate();
        e.step(1.0);
        let gap_top = e.snapshot().obstacles[0].gap_top;

        e.resize(Viewport::new(800.0, 400.0), (800, 400))
            .expect("valid viewport");
        assert_eq!(e.surface().map(|s| s.size), Some((800, 400)));
        assert_eq!(e.config().viewport, Viewport::default());
        e.step(1.0);
        assert_eq!(e.snapshot().obstacles[0].gap_top, gap_top);

        while e.phase() != GamePhase::GameOver {
            e.step(1.0);
        }
        assert_eq!(e.config().viewport, Viewport::default());
        e.start();
        assert_eq!(e.config().viewport, Viewport::new(800.0, 400.0));
        assert_eq!(e.snapshot().avatar_y, 200.0);
    }

    #[test]
    fn test_episode_seeds_differ() {
        let mut e = engine();
        e.start();
        e.activate();
        let first_gap = e.snapshot().obstacles[0].gap_top;
        while e.phase() != GamePhase::GameOver {
            e.step(1.0);
        }
        e.start();
        e.activate();
        let second_gap = e.snapshot().obstacles[0].gap_top;
        assert_ne!(first_gap, second_gap);
    }
}
