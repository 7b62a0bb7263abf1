// Beatkeeper - metronome timing core
//
// Produces evenly spaced beat events at a configured tempo and time
// signature without cumulative drift, and estimates a tempo from manual
// taps. Audio rendering, UI, and preference persistence belong to the
// embedding application; it drives this core through the inbound calls
// and the beat notifications.

pub mod command;
pub mod host;
pub mod messaging;
pub mod timing;

// Re-export commonly used types for convenience
pub use command::EngineCommand;
pub use host::{Clock, ManualClock, SystemClock, TickScheduler, TimerHandle, TimerQueue};
pub use messaging::{
    beat_channel_subscriber, create_beat_channel, BeatConsumer, BeatEvent, BeatProducer,
};
pub use timing::{
    TapTempo, Tempo, TimeSignature, TimeSignatureError, TimingEngine, TimingStats,
    ValidationError,
};
