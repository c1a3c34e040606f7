/// Monotonic time sources and frame delta tracking
use std::cell::Cell;
use std::time::Instant;

/// A monotonic timestamp source, in seconds
pub trait Clock {
    fn now(&self) -> f64;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> f64 {
        (**self).now()
    }
}

/// Wall clock backed by [`Instant`], counting from its creation
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }
}

/// Manually driven clock for tests and replays
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<f64>,
}

impl ManualClock {
    pub fn new(start: f64) -> Self {
        Self {
            now: Cell::new(start),
        }
    }

    pub fn set(&self, seconds: f64) {
        self.now.set(seconds);
    }

    pub fn advance(&self, seconds: f64) {
        self.now.set(self.now.get() + seconds);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> f64 {
        self.now.get()
    }
}

/// Derives the elapsed time between successive frames
#[derive(Debug, Clone, Copy)]
pub struct FrameTimer {
    previous: f64,
}

impl FrameTimer {
    /// Start timing from the clock's current reading
    pub fn start(clock: &impl Clock) -> Self {
        Self {
            previous: clock.now(),
        }
    }

    /// Forget everything measured so far; the next delta counts from now
    pub fn restart(&mut self, clock: &impl Clock) {
        self.previous = clock.now();
    }

    /// Seconds since the previous tick (or since start for the first tick)
    pub fn tick(&mut self, clock: &impl Clock) -> f32 {
        let current = clock.now();
        let delta = current - self.previous;
        self.previous = current;
        delta as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_tick_measures_from_start() {
        let clock = ManualClock::new(10.0);
        let mut timer = FrameTimer::start(&clock);

        // slow scene construction
        clock.advance(2.5);
        assert_eq!(timer.tick(&clock), 2.5);

        clock.advance(0.25);
        assert_eq!(timer.tick(&clock), 0.25);
    }

    #[test]
    fn test_restart_drops_setup_time() {
        let clock = ManualClock::new(0.0);
        let mut timer = FrameTimer::start(&clock);
        clock.advance(3.0);
        timer.restart(&clock);
        clock.advance(0.5);
        assert_eq!(timer.tick(&clock), 0.5);
    }

    #[test]
    fn test_monotonic_clock_never_goes_back() {
        let clock = MonotonicClock::new();
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
        assert!(a >= 0.0);
    }
}
