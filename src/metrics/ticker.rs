use std::time::{Duration, Instant};

/// Repeating timer polled from the owner's loop.
///
/// Firing schedules the next deadline one period after the firing instant, so
/// missed periods are skipped instead of queued.
#[derive(Debug, Clone)]
pub struct Ticker {
    period: Duration,
    next_due: Option<Instant>,
}

impl Default for Ticker {
    fn default() -> Self {
        Self::new(Duration::from_millis(1000))
    }
}

impl Ticker {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            next_due: None,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Takes effect from the next firing.
    pub fn set_period(&mut self, period: Duration) {
        self.period = period;
    }

    pub fn is_armed(&self) -> bool {
        self.next_due.is_some()
    }

    /// Arms the timer one period from `now`. Re-arming an armed timer keeps its deadline.
    pub fn arm(&mut self, now: Instant) {
        if self.next_due.is_none() {
            self.next_due = Some(now + self.period);
        }
    }

    pub fn disarm(&mut self) {
        self.next_due = None;
    }

    pub fn is_due(&self, now: Instant) -> bool {
        self.next_due.is_some_and(|due| now >= due)
    }

    pub fn fire(&mut self, now: Instant) {
        if self.next_due.is_some() {
            self.next_due = Some(now + self.period);
        }
    }

    /// `None` while disarmed.
    pub fn time_until_due(&self, now: Instant) -> Option<Duration> {
        self.next_due.map(|due| due.saturating_duration_since(now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECOND: Duration = Duration::from_secs(1);

    #[test]
    fn disarmed_is_never_due() {
        let ticker = Ticker::new(SECOND);
        let now = Instant::now();
        assert!(!ticker.is_armed());
        assert!(!ticker.is_due(now + SECOND * 10));
        assert_eq!(ticker.time_until_due(now), None);
    }

    #[test]
    fn due_one_period_after_arming() {
        let mut ticker = Ticker::new(SECOND);
        let start = Instant::now();
        ticker.arm(start);
        assert!(!ticker.is_due(start + Duration::from_millis(999)));
        assert!(ticker.is_due(start + SECOND));
        assert_eq!(ticker.time_until_due(start), Some(SECOND));
    }

    #[test]
    fn rearming_keeps_deadline() {
        let mut ticker = Ticker::new(SECOND);
        let start = Instant::now();
        ticker.arm(start);
        ticker.arm(start + Duration::from_millis(900));
        assert!(ticker.is_due(start + SECOND));
    }

    #[test]
    fn late_fire_skips_missed_periods() {
        let mut ticker = Ticker::new(SECOND);
        let start = Instant::now();
        ticker.arm(start);
        let late = start + SECOND * 5;
        assert!(ticker.is_due(late));
        ticker.fire(late);
        assert!(!ticker.is_due(late + Duration::from_millis(500)));
        assert!(ticker.is_due(late + SECOND));
    }

    #[test]
    fn disarm_stops_firing() {
        let mut ticker = Ticker::new(SECOND);
        let start = Instant::now();
        ticker.arm(start);
        ticker.disarm();
        ticker.fire(start + SECOND);
        assert!(!ticker.is_armed());
    }
}
