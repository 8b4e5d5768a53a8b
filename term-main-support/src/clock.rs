use std::time::{Duration, Instant};

/// Decides on which frames a generation step is due.
#[derive(Debug)]
pub struct GenerationClock {
    next_update: Instant,
}

impl GenerationClock {
    pub fn new(now: Instant, interval: Duration) -> Self {
        Self {
            next_update: now + interval,
        }
    }

    /// True at most once per call. Missed deadlines are skipped rather than
    /// replayed, so a slow frame never causes a burst of steps.
    pub fn due(&mut self, now: Instant, interval: Duration) -> bool {
        if now < self.next_update {
            return false;
        }
        while self.next_update <= now {
            self.next_update += interval;
        }
        true
    }

    pub fn restart(&mut self, now: Instant, interval: Duration) {
        self.next_update = now + interval;
    }
}
