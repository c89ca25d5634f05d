use std::time::{Duration, Instant};

/// Source of simulation pulses.
pub trait Clock {
    /// Time left before the next pulse is due.
    fn time_until_pulse(&self, now: Instant) -> Duration;

    /// Returns true, at most once per period, when a pulse is due.
    fn poll_pulse(&mut self, now: Instant) -> bool;
}

/// Fixed-period clock driven by wall time.
#[derive(Debug, Clone)]
pub struct IntervalClock {
    period: Duration,
    next_pulse: Instant,
}

impl IntervalClock {
    /// First pulse fires one period after `start`.
    #[must_use]
    pub fn new(period: Duration, start: Instant) -> Self {
        Self {
            period,
            next_pulse: start + period,
        }
    }

    #[must_use]
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Re-arms the clock as if it had just been created at `now`.
    pub fn reset(&mut self, now: Instant) {
        self.next_pulse = now + self.period;
    }
}

impl Clock for IntervalClock {
    fn time_until_pulse(&self, now: Instant) -> Duration {
        self.next_pulse.saturating_duration_since(now)
    }

    fn poll_pulse(&mut self, now: Instant) -> bool {
        if now < self.next_pulse {
            return false;
        }

        self.next_pulse += self.period;
        // Never burst missed pulses after a stall.
        if self.next_pulse <= now {
            self.next_pulse = now + self.period;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::{Clock, IntervalClock};

    const PERIOD: Duration = Duration::from_millis(200);

    #[test]
    fn pulses_once_per_period() {
        let start = Instant::now();
        let mut clock = IntervalClock::new(PERIOD, start);

        assert!(!clock.poll_pulse(start + Duration::from_millis(199)));
        assert_eq!(
            clock.time_until_pulse(start + Duration::from_millis(150)),
            Duration::from_millis(50)
        );
        assert!(clock.poll_pulse(start + Duration::from_millis(210)));
        assert!(!clock.poll_pulse(start + Duration::from_millis(220)));
        assert!(clock.poll_pulse(start + Duration::from_millis(400)));
    }

    #[test]
    fn stall_does_not_burst_pulses() {
        let start = Instant::now();
        let mut clock = IntervalClock::new(PERIOD, start);
        let late = start + Duration::from_millis(1_000);

        assert!(clock.poll_pulse(late));
        assert!(!clock.poll_pulse(late));
        assert_eq!(clock.time_until_pulse(late), PERIOD);
    }

    #[test]
    fn overdue_pulse_has_no_wait() {
        let start = Instant::now();
        let clock = IntervalClock::new(PERIOD, start);

        assert_eq!(clock.time_until_pulse(start + PERIOD * 2), Duration::ZERO);
        assert_eq!(clock.period(), PERIOD);
    }
}
