//! Frame timing

/// Turns the driver's monotonic timestamps into clamped simulation steps
#[derive(Debug, Clone)]
pub struct FrameClock {
    max_dt: f32,
    last: Option<f64>,
}

impl FrameClock {
    pub fn new(max_dt: f32) -> Self {
        Self { max_dt, last: None }
    }

    /// Step for a frame at `now` seconds; the first frame after creation or
    /// `rearm` has `dt = 0`
    pub fn advance(&mut self, now: f64) -> f32 {
        let dt = match self.last {
            Some(last) => ((now - last).max(0.0) as f32).min(self.max_dt),
            None => 0.0,
        };
        self.last = Some(now);
        dt
    }

    /// Forget the previous frame, e.g. after resuming from pause
    pub fn rearm(&mut self) {
        self.last = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamps_long_frames() {
        let mut clock = FrameClock::new(0.1);
        assert_eq!(clock.advance(10.0), 0.0);
        assert!((clock.advance(10.016) - 0.016).abs() < 1e-6);
        assert_eq!(clock.advance(15.0), 0.1);
    }

    #[test]
    fn test_rearm_and_backwards_time() {
        let mut clock = FrameClock::new(0.1);
        clock.advance(1.0);
        assert_eq!(clock.advance(0.5), 0.0);
        clock.rearm();
        assert_eq!(clock.advance(30.0), 0.0);
        assert!((clock.advance(30.05) - 0.05).abs() < 1e-5);
    }
}
