// Timing engine - drift-corrected beat scheduler
//
// Each tick is scheduled against an absolute time reference: after a
// beat fires, the next deadline is the previous ideal deadline plus one
// beat duration, never "now + duration". Callback latency therefore
// shifts individual ticks but never accumulates into tempo error.

use std::fmt;
use std::time::Duration;

use log::{debug, warn};

use crate::host::{Clock, TickScheduler, TimerHandle};
use crate::messaging::BeatEvent;
use crate::timing::tempo::{Tempo, TimeSignature, ValidationError};

type BeatSubscriber = Box<dyn FnMut(BeatEvent)>;

/// Schedule diagnostics, for caller display and debugging only.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimingStats {
    /// Seconds between consecutive beats at the current configuration.
    pub beat_duration: f64,
    /// Absolute deadline of the pending tick, seconds on the host clock.
    pub next_beat_time: f64,
    /// Seconds until the pending tick; negative when overdue.
    pub time_until_next_beat: f64,
}

/// Beat scheduler with validated tempo configuration.
///
/// The engine never blocks and spawns no thread: it arms one delayed
/// callback at a time through the host's [`TickScheduler`], and the host
/// calls [`on_tick`](TimingEngine::on_tick) when that callback matures.
/// All calls must come from the host's single logical event loop; the
/// engine performs no locking of its own.
pub struct TimingEngine<C: Clock, S: TickScheduler> {
    clock: C,
    scheduler: S,
    tempo: Tempo,
    time_signature: TimeSignature,
    running: bool,
    current_beat: u64,
    beat_duration: f64,  // seconds per beat at the current configuration
    next_beat_time: f64, // absolute deadline of the pending tick, seconds
    pending: Option<TimerHandle>,
    subscribers: Vec<BeatSubscriber>,
}

impl<C: Clock, S: TickScheduler> TimingEngine<C, S> {
    /// Create a stopped engine at the defaults (120 BPM, 4/4).
    pub fn new(clock: C, scheduler: S) -> Self {
        let tempo = Tempo::default();
        let time_signature = TimeSignature::default();
        let beat_duration =
            tempo.beat_duration_seconds() * time_signature.beat_duration_multiplier();
        Self {
            clock,
            scheduler,
            tempo,
            time_signature,
            running: false,
            current_beat: 0,
            beat_duration,
            next_beat_time: 0.0,
            pending: None,
            subscribers: Vec::new(),
        }
    }

    /// Register a beat subscriber. Subscribers are invoked synchronously
    /// inside the tick handler, in registration order.
    pub fn on_beat(&mut self, subscriber: impl FnMut(BeatEvent) + 'static) {
        self.subscribers.push(Box::new(subscriber));
    }

    /// Set the tempo in beats per minute (40-240).
    ///
    /// While running, the already pending tick keeps its deadline; the
    /// new duration applies from the next full beat period.
    pub fn set_tempo(&mut self, bpm: u16) -> Result<(), ValidationError> {
        self.tempo = Tempo::new(bpm)?;
        self.beat_duration = self.configured_beat_duration();
        debug!("tempo set to {}", self.tempo);
        Ok(())
    }

    /// Set the time signature (numerator 1-16, denominator 2/4/8/16).
    ///
    /// Validation is atomic: an invalid pair leaves both fields
    /// unchanged. A denominator change rescales the beat duration with
    /// the same next-full-period semantics as `set_tempo`.
    pub fn set_time_signature(
        &mut self,
        numerator: u8,
        denominator: u8,
    ) -> Result<(), ValidationError> {
        self.time_signature = TimeSignature::new(numerator, denominator)?;
        self.beat_duration = self.configured_beat_duration();
        debug!("time signature set to {}", self.time_signature);
        Ok(())
    }

    /// Start the beat scheduler. No-op while already running.
    pub fn start(&mut self) {
        if self.running {
            return;
        }
        self.running = true;
        self.current_beat = 0;
        self.beat_duration = self.configured_beat_duration();
        let now = self.clock.now().as_secs_f64();
        self.next_beat_time = now + self.beat_duration;
        self.pending = Some(
            self.scheduler
                .schedule(Duration::from_secs_f64(self.beat_duration)),
        );
        debug!(
            "engine started at {} {}",
            self.tempo, self.time_signature
        );
    }

    /// Stop the beat scheduler. No-op while already stopped.
    /// `current_beat` keeps its last value until the next start.
    pub fn stop(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;
        if let Some(handle) = self.pending.take() {
            self.scheduler.cancel(handle);
        }
        debug!("engine stopped at beat {}", self.current_beat);
    }

    /// Reset the beat counter to 0 without touching the schedule.
    pub fn reset_beat_counter(&mut self) {
        self.current_beat = 0;
    }

    /// Tick handler, called by the host when the armed timer matures.
    ///
    /// Emits exactly one [`BeatEvent`] and re-arms the timer. A stale
    /// fire after a stop is ignored. If the clock shows the engine more
    /// than one full beat behind (system suspend, scheduler starvation),
    /// the deadline is reset to one beat from now instead of firing a
    /// burst of make-up ticks; skipped beats do not count.
    pub fn on_tick(&mut self) {
        if !self.running {
            return;
        }
        self.pending = None;

        self.current_beat += 1;
        let beats_per_bar = self.time_signature.beats_per_bar() as u64;
        let event = BeatEvent {
            beat_number: self.current_beat,
            is_downbeat: (self.current_beat - 1) % beats_per_bar == 0,
        };
        for subscriber in &mut self.subscribers {
            subscriber(event);
        }

        // Absolute-time advance: the reference point is the previous
        // ideal deadline, not the actual firing time.
        self.next_beat_time += self.beat_duration;

        let now = self.clock.now().as_secs_f64();
        let lag = now - self.next_beat_time;
        if lag > self.beat_duration {
            warn!(
                "beat clock fell behind by {:.3}s, resuming one beat from now",
                lag
            );
            self.next_beat_time = now + self.beat_duration;
        }

        let delay = (self.next_beat_time - now).max(0.0);
        self.pending = Some(self.scheduler.schedule(Duration::from_secs_f64(delay)));
    }

    pub fn tempo(&self) -> Tempo {
        self.tempo
    }

    pub fn bpm(&self) -> u16 {
        self.tempo.bpm()
    }

    pub fn time_signature(&self) -> TimeSignature {
        self.time_signature
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Beats emitted since the last start (or counter reset).
    pub fn current_beat(&self) -> u64 {
        self.current_beat
    }

    /// 1-based position of the current beat within its bar, 0 before
    /// the first tick of a run.
    pub fn beat_in_bar(&self) -> u64 {
        if self.current_beat == 0 {
            return 0;
        }
        (self.current_beat - 1) % self.time_signature.beats_per_bar() as u64 + 1
    }

    /// Current schedule diagnostics.
    pub fn stats(&self) -> TimingStats {
        let now = self.clock.now().as_secs_f64();
        TimingStats {
            beat_duration: self.beat_duration,
            next_beat_time: self.next_beat_time,
            time_until_next_beat: self.next_beat_time - now,
        }
    }

    fn configured_beat_duration(&self) -> f64 {
        self.tempo.beat_duration_seconds() * self.time_signature.beat_duration_multiplier()
    }
}

impl<C: Clock + fmt::Debug, S: TickScheduler + fmt::Debug> fmt::Debug for TimingEngine<C, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimingEngine")
            .field("tempo", &self.tempo)
            .field("time_signature", &self.time_signature)
            .field("running", &self.running)
            .field("current_beat", &self.current_beat)
            .field("beat_duration", &self.beat_duration)
            .field("next_beat_time", &self.next_beat_time)
            .field("pending", &self.pending)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}
