//! Frame pacing
//!
//! The host calls [`FrameScheduler::poll`] from its frame callback (for
//! example `requestAnimationFrame`). The scheduler decides whether a
//! simulation pass is due and how large its delta scale is.

use crate::config::EngineConfig;

/// Window for the rolling tick-rate estimate
const RATE_WINDOW: usize = 60;

#[derive(Debug, Clone)]
pub struct FrameScheduler {
    target_interval_ms: f64,
    max_delta_clamp: f32,
    /// Reference time of the last processed pass (None until primed)
    last_time: Option<f64>,
    /// Cleared by `stop`; checked before anything else in `poll`
    alive: bool,
    ticks: u64,
    // Tick-rate tracking
    tick_times: [f64; RATE_WINDOW],
    tick_index: usize,
}

impl FrameScheduler {
    pub fn new(target_interval_ms: f64, max_delta_clamp: f32) -> Self {
        Self {
            target_interval_ms,
            max_delta_clamp,
            last_time: None,
            alive: true,
            ticks: 0,
            tick_times: [0.0; RATE_WINDOW],
            tick_index: 0,
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.target_frame_interval_ms, config.max_delta_clamp)
    }

    /// Decide whether a pass is due at `now_ms`
    ///
    /// Returns the delta scale (elapsed / target interval, clamped to
    /// `max_delta_clamp`) or `None` to defer. The first call only primes the
    /// reference time. The whole elapsed interval is folded into the delta
    /// scale, so resetting the reference to `now_ms` does not drift.
    pub fn poll(&mut self, now_ms: f64) -> Option<f32> {
        if !self.alive {
            return None;
        }

        let Some(last) = self.last_time else {
            self.last_time = Some(now_ms);
            return None;
        };

        let elapsed = now_ms - last;
        if elapsed < 0.0 {
            // Host clock went backwards; re-prime
            self.last_time = Some(now_ms);
            return None;
        }
        if elapsed < self.target_interval_ms {
            return None;
        }

        let raw = (elapsed / self.target_interval_ms) as f32;
        let delta_scale = raw.min(self.max_delta_clamp);
        if raw > self.max_delta_clamp {
            log::debug!(
                "Clamped delta scale {:.2} -> {:.2} ({:.0} ms elapsed)",
                raw,
                delta_scale,
                elapsed
            );
        }

        self.last_time = Some(now_ms);
        self.ticks += 1;
        self.tick_times[self.tick_index] = now_ms;
        self.tick_index = (self.tick_index + 1) % RATE_WINDOW;

        Some(delta_scale)
    }

    /// Forget the reference time so the next poll re-primes
    pub fn reset_clock(&mut self) {
        self.last_time = None;
    }

    /// Stop for good; every later poll defers
    pub fn stop(&mut self) {
        self.alive = false;
        self.last_time = None;
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    /// Passes processed since construction
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Processed passes per second over the last window (0 until filled)
    pub fn tick_rate(&self) -> u32 {
        let newest = self.tick_times[(self.tick_index + RATE_WINDOW - 1) % RATE_WINDOW];
        let oldest = self.tick_times[self.tick_index];
        if self.ticks < RATE_WINDOW as u64 || newest <= oldest {
            return 0;
        }
        (((RATE_WINDOW - 1) as f64 * 1000.0) / (newest - oldest)).round() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INTERVAL: f64 = 1000.0 / 60.0;

    #[test]
    fn test_first_poll_primes() {
        let mut s = FrameScheduler::new(INTERVAL, 3.0);
        assert_eq!(s.poll(1000.0), None);
        assert_eq!(s.ticks(), 0);
    }

    #[test]
    fn test_defers_until_interval_elapsed() {
        let mut s = FrameScheduler::new(INTERVAL, 3.0);
        s.poll(0.0);
        assert_eq!(s.poll(10.0), None);
        let delta = s.poll(INTERVAL).expect("due");
        assert!((delta - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_deferred_time_accumulates() {
        let mut s = FrameScheduler::new(INTERVAL, 3.0);
        s.poll(0.0);
        assert_eq!(s.poll(10.0), None);
        let delta = s.poll(25.0).expect("due");
        assert!((delta - 1.5).abs() < 1e-4);
    }

    #[test]
    fn test_large_gap_is_clamped() {
        let mut s = FrameScheduler::new(INTERVAL, 3.0);
        s.poll(0.0);
        // Tab backgrounded for five seconds
        assert_eq!(s.poll(5000.0), Some(3.0));
        // Next pass is back to normal
        let delta = s.poll(5000.0 + INTERVAL + 0.01).expect("due");
        assert!((delta - 1.0).abs() < 1e-3);
    }

    #[test]
    fn test_total_time_preserved_without_clamp() {
        let mut s = FrameScheduler::new(INTERVAL, 3.0);
        s.poll(0.0);
        let mut total = 0.0f64;
        let mut now = 0.0;
        for i in 0..600 {
            now += if i % 3 == 0 { 21.0 } else { 17.0 };
            if let Some(delta) = s.poll(now) {
                total += delta as f64;
            }
        }
        let expected = now / INTERVAL;
        assert!((total - expected).abs() < 1e-2);
    }

    #[test]
    fn test_stop_blocks_queued_frames() {
        let mut s = FrameScheduler::new(INTERVAL, 3.0);
        s.poll(0.0);
        s.stop();
        assert!(!s.is_alive());
        assert_eq!(s.poll(100.0), None);
        assert_eq!(s.poll(200.0), None);
    }

    #[test]
    fn test_clock_going_backwards_reprimes() {
        let mut s = FrameScheduler::new(INTERVAL, 3.0);
        s.poll(1000.0);
        assert_eq!(s.poll(500.0), None);
        assert!(s.poll(500.0 + INTERVAL + 0.01).is_some());
    }

    #[test]
    fn test_tick_rate_at_sixty_hz() {
        let mut s = FrameScheduler::new(INTERVAL, 3.0);
        s.poll(0.0);
        for i in 1..=120 {
            s.poll(i as f64 * (INTERVAL + 0.001));
        }
        assert_eq!(s.tick_rate(), 60);
    }
}
