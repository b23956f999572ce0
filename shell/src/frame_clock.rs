use std::time::{Duration, Instant};

/// Elapsed and per frame time, in seconds since the clock started.
#[derive(Debug, Clone)]
pub struct FrameClock {
    start: Instant,
    last_time: f64,
    current_time: f64,
    delta_time: f64,
    frames: u64,
}

impl FrameClock {
    pub fn new(start: Instant) -> Self {
        Self {
            start,
            last_time: 0.0,
            current_time: 0.0,
            delta_time: 0.0,
            frames: 0,
        }
    }

    /// Advances to `now` and returns the seconds passed since the previous tick.
    ///
    /// The first tick measures from the clock's start.
    pub fn tick(&mut self, now: Instant) -> f64 {
        self.last_time = self.current_time;
        self.current_time = now
            .checked_duration_since(self.start)
            .unwrap_or(Duration::ZERO)
            .as_secs_f64();
        // Instants are monotonic, but don't trust callers.
        self.delta_time = (self.current_time - self.last_time).max(0.0);
        self.frames += 1;
        self.delta_time
    }

    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    pub fn delta_time(&self) -> f64 {
        self.delta_time
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::FrameClock;

    #[test]
    fn delta_is_time_between_ticks() {
        let start = Instant::now();
        let mut clock = FrameClock::new(start);

        let dt = clock.tick(start + Duration::from_millis(500));
        assert_eq!(dt, 0.5);

        let dt = clock.tick(start + Duration::from_millis(750));
        assert_eq!(dt, 0.25);
        assert_eq!(clock.current_time(), 0.75);
        assert_eq!(clock.frames(), 2);
    }

    #[test]
    fn time_never_runs_backwards() {
        let start = Instant::now();
        let mut clock = FrameClock::new(start + Duration::from_secs(1));
        assert_eq!(clock.tick(start), 0.0);
        assert_eq!(clock.current_time(), 0.0);
    }
}
