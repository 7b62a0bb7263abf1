// Beat notifications - payload type and fan-out plumbing

pub mod beat;
pub mod channels;

pub use beat::BeatEvent;
pub use channels::{beat_channel_subscriber, create_beat_channel, BeatConsumer, BeatProducer};
