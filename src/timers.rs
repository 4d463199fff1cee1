//! RAII timing for guard evaluations.

use std::time::{Duration, Instant};

/// Adds the time between construction and drop to `slot`.
///
/// The elapsed time is recorded on every exit path, including early returns.
pub(crate) struct PhaseTimer<'a> {
    start: Instant,
    slot: &'a mut Duration,
}

impl<'a> PhaseTimer<'a> {
    pub(crate) fn new(slot: &'a mut Duration) -> Self {
        Self {
            start: Instant::now(),
            slot,
        }
    }
}

impl Drop for PhaseTimer<'_> {
    fn drop(&mut self) {
        *self.slot += self.start.elapsed();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_phase_timer_records_elapsed() {
        let mut elapsed = Duration::ZERO;
        {
            let _timer = PhaseTimer::new(&mut elapsed);
            thread::sleep(Duration::from_millis(10));
        }
        assert!(elapsed >= Duration::from_millis(10));
    }

    #[test]
    fn test_phase_timer_accumulates_across_guards() {
        let mut elapsed = Duration::ZERO;
        for _ in 0..3 {
            let _timer = PhaseTimer::new(&mut elapsed);
            thread::sleep(Duration::from_millis(5));
        }
        assert!(elapsed >= Duration::from_millis(15));
    }
}
