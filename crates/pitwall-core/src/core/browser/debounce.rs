//! Trailing debounce and generation counter.
//!
//! Both are plain data: the owner feeds them the current time and decides
//! when to poll.

use tokio::time::{Duration, Instant};

/// Default quiet period before a search edit is committed.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(350);

/// Holds the latest value until it has been stable for `window`.
///
/// Every `schedule` replaces the pending value and restarts the window.
#[derive(Debug)]
pub struct Debouncer<T> {
    window: Duration,
    pending: Option<(T, Instant)>,
}

impl<T> Debouncer<T> {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: None,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Replace the pending value; it becomes due `window` after `now`.
    pub fn schedule(&mut self, value: T, now: Instant) {
        self.pending = Some((value, now + self.window));
    }

    /// Drop the pending value, returning it if there was one.
    pub fn cancel(&mut self) -> Option<T> {
        self.pending.take().map(|(value, _)| value)
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, deadline)| *deadline)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Take the pending value if its deadline has passed.
    pub fn take_due(&mut self, now: Instant) -> Option<T> {
        match self.pending {
            Some((_, deadline)) if now >= deadline => self.cancel(),
            _ => None,
        }
    }
}

/// Monotonic stamp used to recognise superseded async results.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Generation(u64);

impl Generation {
    pub fn current(&self) -> u64 {
        self.0
    }

    /// Move to a new generation and return it.
    pub fn advance(&mut self) -> u64 {
        self.0 = self.0.wrapping_add(1);
        self.0
    }

    pub fn is_current(&self, stamp: u64) -> bool {
        self.0 == stamp
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nothing_due_without_schedule() {
        let mut debouncer: Debouncer<&str> = Debouncer::new(SEARCH_DEBOUNCE);
        assert!(!debouncer.is_pending());
        assert!(debouncer.deadline().is_none());
        assert_eq!(debouncer.take_due(Instant::now()), None);
    }

    #[test]
    fn test_value_due_after_window() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(Duration::from_millis(350));
        debouncer.schedule("ham", start);

        assert_eq!(debouncer.take_due(start + Duration::from_millis(349)), None);
        assert_eq!(
            debouncer.take_due(start + Duration::from_millis(350)),
            Some("ham")
        );
        assert!(!debouncer.is_pending());
    }

    #[test]
    fn test_reschedule_restarts_window() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(Duration::from_millis(350));
        debouncer.schedule("h", start);
        debouncer.schedule("ha", start + Duration::from_millis(300));

        assert_eq!(
            debouncer.deadline(),
            Some(start + Duration::from_millis(650))
        );
        assert_eq!(debouncer.take_due(start + Duration::from_millis(400)), None);
        assert_eq!(
            debouncer.take_due(start + Duration::from_millis(650)),
            Some("ha")
        );
    }

    #[test]
    fn test_cancel_discards_value() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(Duration::from_millis(10));
        debouncer.schedule(1, start);
        assert_eq!(debouncer.cancel(), Some(1));
        assert_eq!(debouncer.take_due(start + Duration::from_secs(1)), None);
    }

    #[test]
    fn test_generation_supersedes_older_stamps() {
        let mut generation = Generation::default();
        let first = generation.advance();
        let second = generation.advance();

        assert!(second > first);
        assert!(!generation.is_current(first));
        assert!(generation.is_current(second));
        assert_eq!(generation.current(), second);
    }
}
