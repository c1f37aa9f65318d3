//! Flappy Engine entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, KeyboardEvent, MouseEvent, TouchEvent};

    use flappy_engine::highscores::{DEFAULT_PLAYER_NAME, LocalScoreService};
    use flappy_engine::input::{command_for_key, command_for_pointer};
    use flappy_engine::renderer::GpuSurface;
    use flappy_engine::{Engine, EngineConfig, EngineError, GameObserver, ScoreKeeper};

    type Game = Engine<SessionObserver, GpuSurface>;

    /// Passes between tick-rate HUD refreshes
    const HUD_RATE_EVERY: u64 = 30;

    /// Bridges engine notifications to the DOM HUD and the leaderboard
    struct SessionObserver {
        document: Document,
        keeper: ScoreKeeper<LocalScoreService>,
    }

    impl SessionObserver {
        fn new(document: Document) -> Self {
            let mut keeper = ScoreKeeper::new(LocalScoreService::new(), DEFAULT_PLAYER_NAME);
            keeper.refresh();
            let observer = Self { document, keeper };
            observer.set_text("score", "0");
            observer.set_text("high-score", &observer.keeper.high_score().to_string());
            observer
        }

        fn set_text(&self, id: &str, text: &str) {
            if let Some(el) = self.document.get_element_by_id(id) {
                el.set_text_content(Some(text));
            }
        }

        fn set_visible(&self, id: &str, visible: bool) {
            if let Some(el) = self.document.get_element_by_id(id) {
                let _ = el.set_attribute("class", if visible { "" } else { "hidden" });
            }
        }

        /// Reset the HUD for a fresh episode
        fn episode_started(&self) {
            self.set_text("score", "0");
            self.set_visible("game-over", false);
            self.set_visible("start-prompt", false);
        }
    }

    impl GameObserver for SessionObserver {
        fn on_score(&mut self, score: u32) {
            self.keeper.on_score(score);
            self.set_text("score", &score.to_string());
        }

        fn on_game_over(&mut self, final_score: u32) {
            self.keeper.on_game_over(final_score);
            self.set_text("final-score", &final_score.to_string());
            self.set_text("high-score", &self.keeper.high_score().to_string());
            self.set_visible("game-over", true);
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            return;
        }

        log::info!("Flappy Engine starting...");

        if let Err(e) = start().await {
            log::error!("Startup failed: {}", e);
            if let Some(el) = web_sys::window()
                .and_then(|w| w.document())
                .and_then(|d| d.get_element_by_id("loading"))
            {
                el.set_text_content(Some(&e.to_string()));
            }
        }
    }

    async fn start() -> Result<(), EngineError> {
        let unavailable = |what: &str| EngineError::SurfaceUnavailable(what.to_string());

        let window = web_sys::window().ok_or_else(|| unavailable("no window"))?;
        let document = window.document().ok_or_else(|| unavailable("no document"))?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or_else(|| unavailable("no canvas"))?
            .dyn_into()
            .map_err(|_| unavailable("#canvas is not a canvas"))?;

        // Set canvas size
        let (width, height) = canvas_pixel_size(&canvas);
        canvas.set_width(width);
        canvas.set_height(height);

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(|e| EngineError::SurfaceUnavailable(e.to_string()))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| EngineError::SurfaceUnavailable(e.to_string()))?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let gpu = GpuSurface::new(surface, &adapter, width, height).await?;

        // Write back so the stored copy lists every tunable
        let config = EngineConfig::load();
        config.save();

        let seed = js_sys::Date::now() as u64;
        let mut engine =
            Engine::with_seed(SessionObserver::new(document.clone()), config, gpu, seed)?;
        engine.resize(engine.config().viewport, (width, height))?;
        log::info!("Engine initialized with seed: {}", seed);

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let game = Rc::new(RefCell::new(engine));
        setup_input_handlers(&window, &canvas, game.clone());
        setup_lifecycle_handlers(&window, canvas, game.clone());

        // Start game loop
        request_animation_frame(game);

        log::info!("Flappy Engine running!");
        Ok(())
    }

    fn canvas_pixel_size(canvas: &HtmlCanvasElement) -> (u32, u32) {
        let dpr = web_sys::window()
            .map(|w| w.device_pixel_ratio())
            .unwrap_or(1.0);
        (
            (canvas.client_width() as f64 * dpr) as u32,
            (canvas.client_height() as f64 * dpr) as u32,
        )
    }

    /// Run the primary command, refreshing the HUD when it begins an episode
    fn primary(game: &Rc<RefCell<Game>>) {
        let mut g = game.borrow_mut();
        let episodes = g.episodes();
        g.dispatch(command_for_pointer());
        if g.episodes() != episodes {
            g.observer().episode_started();
        }
    }

    fn setup_input_handlers(
        window: &web_sys::Window,
        canvas: &HtmlCanvasElement,
        game: Rc<RefCell<Game>>,
    ) {
        // Mouse click
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                primary(&game);
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch start
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                primary(&game);
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if event.repeat() || command_for_key(&event.key()).is_none() {
                    return;
                }
                event.prevent_default();
                primary(&game);
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_lifecycle_handlers(
        window: &web_sys::Window,
        canvas: HtmlCanvasElement,
        game: Rc<RefCell<Game>>,
    ) {
        // Window resize keeps the world viewport and rescales the surface
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let (width, height) = canvas_pixel_size(&canvas);
                canvas.set_width(width);
                canvas.set_height(height);
                let mut g = game.borrow_mut();
                let viewport = g.config().viewport;
                if let Err(e) = g.resize(viewport, (width, height)) {
                    log::warn!("Resize rejected: {}", e);
                }
            });
            let _ = window
                .add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Page teardown
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                game.borrow_mut().cleanup();
            });
            let _ = window
                .add_event_listener_with_callback("pagehide", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        let alive = {
            let mut g = game.borrow_mut();
            if g.tick(time) && g.scheduler().ticks() % HUD_RATE_EVERY == 0 {
                let rate = g.scheduler().tick_rate();
                g.observer().set_text("tick-rate", &rate.to_string());
            }
            g.is_alive()
        };

        if alive {
            request_animation_frame(game);
        } else {
            log::info!("Game loop stopped");
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    //! Headless autoplay: a synthetic clock drives the engine and a simple
    //! policy flaps whenever the avatar sinks below the next gap's centre.

    use flappy_engine::highscores::{DEFAULT_PLAYER_NAME, LocalScoreService, ScoreKeeper};
    use flappy_engine::renderer::HeadlessSurface;
    use flappy_engine::{Command, Engine, EngineConfig, EngineError, GamePhase, Snapshot};

    /// Frames per episode before the demo gives up on it
    const MAX_FRAMES: u32 = 20_000;

    pub fn run(seed: u64, episodes: u32) -> Result<(), EngineError> {
        let config = EngineConfig::default();
        let interval = config.target_frame_interval_ms;
        let keeper = ScoreKeeper::new(LocalScoreService::new(), DEFAULT_PLAYER_NAME);
        let mut engine = Engine::with_seed(keeper, config, HeadlessSurface::default(), seed)?;

        let mut now = 0.0;
        for _ in 0..episodes {
            engine.dispatch(Command::Primary);
            engine.dispatch(Command::Primary);

            let mut frames = 0;
            while engine.phase() == GamePhase::Engaged && frames < MAX_FRAMES {
                // Slightly irregular frame pacing
                now += interval * if frames % 7 == 0 { 1.5 } else { 1.0 };
                if engine.tick(now) && should_flap(&engine.snapshot()) {
                    engine.activate();
                }
                frames += 1;
            }

            log::info!(
                "Episode {} finished with score {} after {} frames (best {})",
                engine.episodes(),
                engine.score(),
                frames,
                engine.observer().high_score()
            );
        }

        let frames_presented = engine
            .surface()
            .map(|s| s.frames_presented())
            .unwrap_or_default();
        engine.cleanup();
        log::info!("Demo presented {} frames", frames_presented);
        Ok(())
    }

    fn should_flap(snapshot: &Snapshot) -> bool {
        let avatar_left = snapshot.avatar_x - snapshot.avatar_width / 2.0;
        let target = snapshot
            .obstacles
            .iter()
            .find(|o| o.x + o.width >= avatar_left)
            .map(|o| o.gap_top + o.gap_height * 0.6)
            .unwrap_or(300.0);
        snapshot.avatar_y > target
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Flappy Engine (native) starting...");
    log::info!(
        "Native mode runs a headless autoplay demo - run with `trunk serve` for the web version"
    );

    let mut args = std::env::args().skip(1);
    let seed = args
        .next()
        .and_then(|s| s.parse().ok())
        .unwrap_or(flappy_engine::engine::DEFAULT_SEED);
    let episodes = args.next().and_then(|s| s.parse().ok()).unwrap_or(3);

    if let Err(e) = demo::run(seed, episodes) {
        log::error!("Demo failed: {}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
