// Tap tempo - derive a bpm estimate from the intervals between user taps

use std::collections::VecDeque;
use std::time::Duration;

use crate::host::Clock;
use crate::timing::tempo::Tempo;

/// Tap tempo estimator.
///
/// Averages the intervals of a sliding window of recent taps, forgetting
/// taps older than the timeout. Pure calculator: it owns no timer and
/// never schedules anything, the caller invokes [`tap`](TapTempo::tap)
/// once per user tap and applies the returned estimate itself.
#[derive(Debug)]
pub struct TapTempo<C: Clock> {
    clock: C,
    max_taps: usize,
    timeout: Duration,
    taps: VecDeque<f64>, // tap timestamps, seconds on the host clock
}

impl<C: Clock> TapTempo<C> {
    /// Number of recent taps feeding one bpm calculation.
    pub const DEFAULT_MAX_TAPS: usize = 8;
    /// Taps older than this relative to the newest are discarded.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(2);
    /// Hard retention cap on the history, independent of (and looser
    /// than) the calculation window. Purely a memory bound.
    pub const MAX_HISTORY: usize = 100;

    pub fn new(clock: C) -> Self {
        Self::with_settings(clock, Self::DEFAULT_MAX_TAPS, Self::DEFAULT_TIMEOUT)
    }

    pub fn with_settings(clock: C, max_taps: usize, timeout: Duration) -> Self {
        Self {
            clock,
            max_taps,
            timeout,
            taps: VecDeque::new(),
        }
    }

    /// Register a tap and return the current estimate, or `None` when
    /// fewer than two taps remain within the timeout window.
    ///
    /// The estimate is the mean of the successive intervals among the
    /// most recent `max_taps` taps, converted to bpm, rounded, and
    /// clamped to the valid tempo range so it is always directly usable
    /// as a `set_tempo` argument.
    pub fn tap(&mut self) -> Option<u16> {
        let now = self.clock.now().as_secs_f64();

        // Drop taps that fell out of the timeout window
        let cutoff = now - self.timeout.as_secs_f64();
        while self.taps.front().is_some_and(|&t| t <= cutoff) {
            self.taps.pop_front();
        }

        self.taps.push_back(now);
        while self.taps.len() > Self::MAX_HISTORY {
            self.taps.pop_front();
        }

        if self.taps.len() < 2 {
            return None;
        }

        let window = self.taps.len().min(self.max_taps);
        let start = self.taps.len() - window;
        let mut interval_sum = 0.0;
        let mut interval_count = 0u32;
        let mut previous: Option<f64> = None;
        for &t in self.taps.iter().skip(start) {
            if let Some(p) = previous {
                interval_sum += t - p;
                interval_count += 1;
            }
            previous = Some(t);
        }

        let average_interval = interval_sum / interval_count as f64;
        let bpm = (60.0 / average_interval).round() as i64;
        Some(bpm.clamp(Tempo::MIN_BPM as i64, Tempo::MAX_BPM as i64) as u16)
    }

    /// Forget all taps.
    pub fn reset(&mut self) {
        self.taps.clear();
    }

    /// Number of taps currently held, for caller display only.
    pub fn tap_count(&self) -> usize {
        self.taps.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::ManualClock;

    fn tapper() -> (TapTempo<ManualClock>, ManualClock) {
        let clock = ManualClock::new();
        let tap = TapTempo::new(clock.clone());
        (tap, clock)
    }

    #[test]
    fn test_first_tap_has_no_estimate() {
        let (mut tap, _clock) = tapper();
        assert_eq!(tap.tap(), None);
        assert_eq!(tap.tap_count(), 1);
    }

    #[test]
    fn test_half_second_interval_is_120_bpm() {
        let (mut tap, clock) = tapper();
        tap.tap();
        clock.advance_secs(0.5);
        assert_eq!(tap.tap(), Some(120));
    }

    #[test]
    fn test_one_second_interval_is_60_bpm() {
        let (mut tap, clock) = tapper();
        tap.tap();
        clock.advance_secs(1.0);
        assert_eq!(tap.tap(), Some(60));
    }

    #[test]
    fn test_slow_taps_clamp_to_40() {
        // 3.0s apart implies 20 bpm; timeout must not evict, so widen it
        let clock = ManualClock::new();
        let mut tap = TapTempo::with_settings(clock.clone(), 8, Duration::from_secs(10));
        tap.tap();
        clock.advance_secs(3.0);
        assert_eq!(tap.tap(), Some(40));
    }

    #[test]
    fn test_fast_taps_clamp_to_240() {
        let (mut tap, clock) = tapper();
        tap.tap();
        clock.advance_secs(0.1); // implies 600 bpm
        assert_eq!(tap.tap(), Some(240));
    }

    #[test]
    fn test_timeout_evicts_stale_taps() {
        let (mut tap, clock) = tapper();
        tap.tap();
        clock.advance_secs(0.5);
        tap.tap();
        assert_eq!(tap.tap_count(), 2);

        clock.advance_secs(2.5); // past the 2.0s timeout
        assert_eq!(tap.tap(), None);
        assert_eq!(tap.tap_count(), 1);
    }

    #[test]
    fn test_estimate_averages_the_window() {
        let (mut tap, clock) = tapper();
        // Intervals 0.4 and 0.6 average to 0.5s -> 120 bpm
        tap.tap();
        clock.advance_secs(0.4);
        tap.tap();
        clock.advance_secs(0.6);
        assert_eq!(tap.tap(), Some(120));
    }

    #[test]
    fn test_window_caps_taps_used_for_calculation() {
        let clock = ManualClock::new();
        let mut tap = TapTempo::with_settings(clock.clone(), 3, Duration::from_secs(60));

        // Old slow taps (1.0s apart), then fast taps (0.25s apart). With
        // a window of 3 only the last two intervals count.
        tap.tap();
        clock.advance_secs(1.0);
        tap.tap();
        clock.advance_secs(1.0);
        tap.tap();
        clock.advance_secs(0.25);
        tap.tap();
        clock.advance_secs(0.25);
        assert_eq!(tap.tap(), Some(240));
        // History keeps more than the window
        assert_eq!(tap.tap_count(), 5);
    }

    #[test]
    fn test_history_is_bounded() {
        let clock = ManualClock::new();
        let mut tap =
            TapTempo::with_settings(clock.clone(), 8, Duration::from_secs(100_000));

        for _ in 0..(TapTempo::<ManualClock>::MAX_HISTORY + 50) {
            clock.advance_secs(0.5);
            tap.tap();
        }
        assert_eq!(tap.tap_count(), TapTempo::<ManualClock>::MAX_HISTORY);
    }

    #[test]
    fn test_reset_clears_history() {
        let (mut tap, clock) = tapper();
        tap.tap();
        clock.advance_secs(0.5);
        tap.tap();
        tap.reset();
        assert_eq!(tap.tap_count(), 0);
        assert_eq!(tap.tap(), None);
    }

    #[test]
    fn test_steady_tapping_converges() {
        let (mut tap, clock) = tapper();
        let mut estimate = None;
        for _ in 0..8 {
            estimate = tap.tap();
            clock.advance_secs(0.75); // 80 bpm
        }
        assert_eq!(estimate, Some(80));
    }
}
