//! Avatar integrator
//!
//! Semi-implicit Euler in tick units: velocity first, then position from the
//! new velocity.

use super::state::Avatar;
use crate::config::EngineConfig;

impl Avatar {
    /// Advance one tick scaled by `delta_scale`
    pub fn integrate(&mut self, config: &EngineConfig, delta_scale: f32) {
        self.velocity += config.gravity * delta_scale;
        if let Some(cap) = config.terminal_velocity {
            self.velocity = self.velocity.min(cap);
        }
        self.pos.y += self.velocity;
        self.rotation = (self.rotation + self.velocity * config.rotation_factor)
            .clamp(-config.max_rotation_up, config.max_rotation_down);
    }

    /// Apply the flap impulse, replacing any prior velocity
    pub fn flap(&mut self, config: &EngineConfig) {
        self.velocity = config.flap_impulse;
        self.rotation = config
            .look_up_angle
            .clamp(-config.max_rotation_up, config.max_rotation_down);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn avatar(config: &EngineConfig) -> Avatar {
        Avatar::centered(config)
    }

    #[test]
    fn test_flap_then_integrate() {
        let config = EngineConfig::default();
        let mut a = avatar(&config);
        let y0 = a.pos.y;

        a.flap(&config);
        assert_eq!(a.velocity, -8.0);
        assert_eq!(a.rotation, config.look_up_angle);

        a.integrate(&config, 1.0);
        assert!((a.velocity - (-7.5)).abs() < 1e-6);
        assert!((a.pos.y - (y0 - 7.5)).abs() < 1e-4);
    }

    #[test]
    fn test_flap_ignores_prior_velocity() {
        let config = EngineConfig::default();
        let mut a = avatar(&config);
        a.velocity = 25.0;
        a.flap(&config);
        assert_eq!(a.velocity, config.flap_impulse);
    }

    #[test]
    fn test_delta_scale_multiplies_gravity() {
        let config = EngineConfig::default();
        let mut a = avatar(&config);
        a.integrate(&config, 2.0);
        assert!((a.velocity - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_rotation_clamped() {
        let config = EngineConfig::default();
        let mut a = avatar(&config);
        for _ in 0..200 {
            a.integrate(&config, 1.0);
        }
        assert_eq!(a.rotation, config.max_rotation_down);

        a.velocity = -500.0;
        a.integrate(&config, 0.0);
        assert_eq!(a.rotation, -config.max_rotation_up);
    }

    #[test]
    fn test_fall_unbounded_by_default() {
        let config = EngineConfig::default();
        let mut a = avatar(&config);
        for _ in 0..100 {
            a.integrate(&config, 1.0);
        }
        assert!((a.velocity - 50.0).abs() < 1e-3);
    }

    #[test]
    fn test_terminal_velocity_caps_fall() {
        let config = EngineConfig {
            terminal_velocity: Some(10.0),
            ..Default::default()
        };
        let mut a = avatar(&config);
        for _ in 0..100 {
            a.integrate(&config, 1.0);
        }
        assert_eq!(a.velocity, 10.0);
    }
}
