// Beat event - the notification delivered to subscribers once per tick

use std::fmt;

/// One metronome tick.
///
/// `beat_number` counts from 1 for the first tick after a start;
/// `is_downbeat` marks the first beat of each bar. Events are ephemeral:
/// produced once per tick, consumed immediately, never stored by the
/// engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BeatEvent {
    pub beat_number: u64,
    pub is_downbeat: bool,
}

impl fmt::Display for BeatEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_downbeat {
            write!(f, "beat {} (downbeat)", self.beat_number)
        } else {
            write!(f, "beat {}", self.beat_number)
        }
    }
}
