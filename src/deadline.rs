use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// Wall-clock budget that trips an interrupt flag once it runs out.
///
/// The library checks the flag at every sweep boundary; `tick` is meant to be
/// called from the per-sweep callback, so an expired run stops after at most
/// one more sweep per chain.
#[derive(Debug)]
pub struct Deadline {
    start: Instant,
    limit: Option<Duration>,
    interrupted: AtomicBool,
}

impl Deadline {
    pub fn new(limit: Option<Duration>) -> Self {
        Self {
            start: Instant::now(),
            limit,
            interrupted: AtomicBool::new(false),
        }
    }

    pub fn tick(&self) {
        if let Some(limit) = self.limit {
            if self.start.elapsed() >= limit {
                self.interrupted.store(true, Ordering::Relaxed);
            }
        }
    }

    pub fn flag(&self) -> &AtomicBool {
        &self.interrupted
    }

    pub fn expired(&self) -> bool {
        self.interrupted.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_limit_trips_on_first_tick() {
        let deadline = Deadline::new(Some(Duration::ZERO));
        assert!(!deadline.expired());
        deadline.tick();
        assert!(deadline.expired());
        assert!(deadline.flag().load(Ordering::Relaxed));
    }

    #[test]
    fn no_limit_never_trips() {
        let deadline = Deadline::new(None);
        for _ in 0..100 {
            deadline.tick();
        }
        assert!(!deadline.expired());
    }

    #[test]
    fn generous_limit_does_not_trip() {
        let deadline = Deadline::new(Some(Duration::from_secs(3600)));
        deadline.tick();
        assert!(!deadline.expired());
    }
}
