use std::time::{Duration, Instant};

pub const TIME_PER_QUESTION: u32 = 25;

/// Identifies one started countdown. A tick carrying an old handle is stale.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimerHandle(u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimerTick {
    Stale,
    Paused,
    Counting(u32),
    Expired,
}

/// Per-question countdown. At most one countdown is live: starting a new
/// one invalidates the previous handle.
#[derive(Debug)]
pub struct QuestionTimer {
    duration: u32,
    remaining: u32,
    generation: u64,
    active: Option<TimerHandle>,
    paused: bool,
}

impl QuestionTimer {
    pub fn new(duration: u32) -> Self {
        Self {
            duration,
            remaining: duration,
            generation: 0,
            active: None,
            paused: false,
        }
    }

    pub fn duration(&self) -> u32 {
        self.duration
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn start(&mut self) -> TimerHandle {
        self.cancel();
        self.generation += 1;
        let handle = TimerHandle(self.generation);
        self.active = Some(handle);
        self.remaining = self.duration;
        self.paused = false;
        handle
    }

    pub fn cancel(&mut self) {
        self.active = None;
        self.paused = false;
    }

    pub fn pause(&mut self) {
        if self.active.is_some() {
            self.paused = true;
        }
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// Handle of the countdown that should currently receive ticks.
    pub fn running_handle(&self) -> Option<TimerHandle> {
        if self.paused { None } else { self.active }
    }

    pub fn tick(&mut self, handle: TimerHandle) -> TimerTick {
        if self.active != Some(handle) {
            return TimerTick::Stale;
        }
        if self.paused {
            return TimerTick::Paused;
        }
        if self.remaining <= 1 {
            self.remaining = 0;
            self.active = None;
            return TimerTick::Expired;
        }
        self.remaining -= 1;
        TimerTick::Counting(self.remaining)
    }
}

/// Turns wall-clock time into whole-second ticks for one running countdown.
/// Re-anchors whenever the handle changes, so pauses and restarts never
/// produce catch-up ticks.
#[derive(Debug)]
pub struct Ticker {
    interval: Duration,
    anchor: Option<(TimerHandle, Instant)>,
}

impl Ticker {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            anchor: None,
        }
    }

    /// Number of ticks due for `handle` at `now`.
    pub fn poll(&mut self, handle: Option<TimerHandle>, now: Instant) -> u32 {
        let Some(handle) = handle else {
            self.anchor = None;
            return 0;
        };

        match self.anchor {
            Some((anchored, since)) if anchored == handle => {
                let elapsed = now.saturating_duration_since(since);
                let due = (elapsed.as_millis() / self.interval.as_millis().max(1)) as u32;
                if due > 0 {
                    self.anchor = Some((handle, since + self.interval * due));
                }
                due
            }
            _ => {
                self.anchor = Some((handle, now));
                0
            }
        }
    }
}

impl Default for Ticker {
    fn default() -> Self {
        Self::new(Duration::from_secs(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_down_then_expires_once() {
        let mut timer = QuestionTimer::new(3);
        let h = timer.start();
        assert_eq!(timer.tick(h), TimerTick::Counting(2));
        assert_eq!(timer.tick(h), TimerTick::Counting(1));
        assert_eq!(timer.tick(h), TimerTick::Expired);
        assert_eq!(timer.remaining(), 0);
        assert_eq!(timer.tick(h), TimerTick::Stale);
    }

    #[test]
    fn restart_invalidates_previous_handle() {
        let mut timer = QuestionTimer::new(25);
        let old = timer.start();
        timer.tick(old);
        let new = timer.start();
        assert_ne!(old, new);
        assert_eq!(timer.tick(old), TimerTick::Stale);
        assert_eq!(timer.remaining(), 25);
        assert_eq!(timer.tick(new), TimerTick::Counting(24));
    }

    #[test]
    fn pause_holds_remaining_time() {
        let mut timer = QuestionTimer::new(10);
        let h = timer.start();
        timer.tick(h);
        timer.pause();
        assert_eq!(timer.running_handle(), None);
        assert_eq!(timer.tick(h), TimerTick::Paused);
        assert_eq!(timer.remaining(), 9);
        timer.resume();
        assert_eq!(timer.running_handle(), Some(h));
        assert_eq!(timer.tick(h), TimerTick::Counting(8));
    }

    #[test]
    fn cancelled_timer_ignores_ticks_and_pause() {
        let mut timer = QuestionTimer::new(10);
        let h = timer.start();
        timer.cancel();
        timer.pause();
        timer.resume();
        assert_eq!(timer.running_handle(), None);
        assert_eq!(timer.tick(h), TimerTick::Stale);
    }

    #[test]
    fn ticker_fires_whole_seconds_only() {
        let mut timer = QuestionTimer::new(25);
        let h = timer.start();
        let mut ticker = Ticker::default();
        let t0 = Instant::now();

        assert_eq!(ticker.poll(Some(h), t0), 0);
        assert_eq!(ticker.poll(Some(h), t0 + Duration::from_millis(900)), 0);
        assert_eq!(ticker.poll(Some(h), t0 + Duration::from_millis(1100)), 1);
        assert_eq!(ticker.poll(Some(h), t0 + Duration::from_millis(1900)), 0);
        assert_eq!(ticker.poll(Some(h), t0 + Duration::from_millis(4050)), 3);
    }

    #[test]
    fn ticker_reanchors_after_pause() {
        let mut ticker = Ticker::default();
        let mut timer = QuestionTimer::new(25);
        let h = timer.start();
        let t0 = Instant::now();

        ticker.poll(Some(h), t0);
        assert_eq!(ticker.poll(None, t0 + Duration::from_secs(10)), 0);
        assert_eq!(ticker.poll(Some(h), t0 + Duration::from_secs(11)), 0);
        assert_eq!(ticker.poll(Some(h), t0 + Duration::from_millis(12_100)), 1);
    }
}
