//! Engine configuration
//!
//! Immutable tunables handed to the engine at construction. The viewport is
//! part of the config and only changes through `Engine::resize`.
//! Persisted in LocalStorage on the web build.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;

/// Drawable area in pixels (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: VIEWPORT_WIDTH,
            height: VIEWPORT_HEIGHT,
        }
    }
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Complete engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    // === Avatar physics ===
    pub gravity: f32,
    pub flap_impulse: f32,
    /// Maximum fall speed; `None` leaves the fall unbounded
    pub terminal_velocity: Option<f32>,
    pub rotation_factor: f32,
    pub max_rotation_up: f32,
    pub max_rotation_down: f32,
    pub look_up_angle: f32,

    // === Avatar shape ===
    pub avatar_width: f32,
    pub avatar_height: f32,
    pub avatar_x_fraction: f32,

    // === Obstacles ===
    pub scroll_speed: f32,
    pub obstacle_width: f32,
    pub obstacle_spacing: f32,
    pub obstacle_gap: f32,
    /// Per-obstacle gap height varies within `obstacle_gap ± jitter`
    pub obstacle_gap_jitter: f32,
    pub obstacle_margin: f32,

    // === Viewport & timing ===
    pub viewport: Viewport,
    pub target_frame_interval_ms: f64,
    /// Largest delta scale applied in one tick, in multiples of the interval
    pub max_delta_clamp: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            flap_impulse: FLAP_IMPULSE,
            terminal_velocity: None,
            rotation_factor: ROTATION_FACTOR,
            max_rotation_up: MAX_ROTATION_UP,
            max_rotation_down: MAX_ROTATION_DOWN,
            look_up_angle: LOOK_UP_ANGLE,

            avatar_width: AVATAR_WIDTH,
            avatar_height: AVATAR_HEIGHT,
            avatar_x_fraction: AVATAR_X_FRACTION,

            scroll_speed: SCROLL_SPEED,
            obstacle_width: OBSTACLE_WIDTH,
            obstacle_spacing: OBSTACLE_SPACING,
            obstacle_gap: OBSTACLE_GAP,
            obstacle_gap_jitter: 0.0,
            obstacle_margin: OBSTACLE_MARGIN,

            viewport: Viewport::default(),
            target_frame_interval_ms: TARGET_FRAME_INTERVAL_MS,
            max_delta_clamp: MAX_DELTA_CLAMP,
        }
    }
}

impl EngineConfig {
    /// Smallest and largest gap height an obstacle may get
    pub fn gap_bounds(&self) -> (f32, f32) {
        let jitter = self.obstacle_gap_jitter.max(0.0);
        ((self.obstacle_gap - jitter).max(1.0), self.obstacle_gap + jitter)
    }

    /// Horizontal avatar position for the current viewport
    pub fn avatar_x(&self) -> f32 {
        self.viewport.width * self.avatar_x_fraction
    }

    /// Reject configurations the engine cannot honor
    pub fn validate(&self) -> Result<(), ConfigError> {
        let finite: [(&'static str, f32); 10] = [
            ("gravity", self.gravity),
            ("flap_impulse", self.flap_impulse),
            ("rotation_factor", self.rotation_factor),
            ("max_rotation_up", self.max_rotation_up),
            ("max_rotation_down", self.max_rotation_down),
            ("look_up_angle", self.look_up_angle),
            ("avatar_x_fraction", self.avatar_x_fraction),
            ("obstacle_gap_jitter", self.obstacle_gap_jitter),
            ("obstacle_margin", self.obstacle_margin),
            ("max_delta_clamp", self.max_delta_clamp),
        ];
        for (field, value) in finite {
            if !value.is_finite() {
                return Err(ConfigError::NotFinite {
                    field,
                    value: value as f64,
                });
            }
        }

        let positives: [(&'static str, f64); 9] = [
            ("avatar_width", self.avatar_width as f64),
            ("avatar_height", self.avatar_height as f64),
            ("scroll_speed", self.scroll_speed as f64),
            ("obstacle_width", self.obstacle_width as f64),
            ("obstacle_spacing", self.obstacle_spacing as f64),
            ("obstacle_gap", self.obstacle_gap as f64),
            ("viewport.width", self.viewport.width as f64),
            ("viewport.height", self.viewport.height as f64),
            ("target_frame_interval_ms", self.target_frame_interval_ms),
        ];
        for (field, value) in positives {
            if !(value > 0.0) {
                return Err(ConfigError::NotPositive { field, value });
            }
        }
        if let Some(cap) = self.terminal_velocity {
            if !(cap > 0.0) {
                return Err(ConfigError::NotPositive {
                    field: "terminal_velocity",
                    value: cap as f64,
                });
            }
        }

        let (_, max_gap) = self.gap_bounds();
        if max_gap + 2.0 * self.obstacle_margin.max(0.0) > self.viewport.height {
            return Err(ConfigError::GapDoesNotFit {
                gap: max_gap,
                margin: self.obstacle_margin,
                height: self.viewport.height,
            });
        }

        if !(self.max_delta_clamp >= 1.0) {
            return Err(ConfigError::ClampTooSmall(self.max_delta_clamp));
        }

        if self.look_up_angle < -self.max_rotation_up || self.look_up_angle > self.max_rotation_down
        {
            return Err(ConfigError::LookUpOutOfRange {
                angle: self.look_up_angle,
                up: self.max_rotation_up,
                down: self.max_rotation_down,
            });
        }

        Ok(())
    }

    /// Parse and validate a JSON config. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> String {
        // Plain data with string keys; serialization cannot fail
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "flappy_engine_config";

    /// Load config from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(config) => {
                        log::info!("Loaded config from LocalStorage");
                        return config;
                    }
                    Err(e) => log::warn!("Ignoring stored config: {}", e),
                }
            }
        }

        log::info!("Using default config");
        Self::default()
    }

    /// Save config to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            let _ = storage.set_item(Self::STORAGE_KEY, &self.to_json());
            log::info!("Config saved");
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}
