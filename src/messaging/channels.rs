// Lock-free beat channel for consumers that poll instead of subscribing

use ringbuf::{traits::Split, HeapRb};

use crate::messaging::beat::BeatEvent;

pub type BeatProducer = ringbuf::HeapProd<BeatEvent>;
pub type BeatConsumer = ringbuf::HeapCons<BeatEvent>;

/// Create a bounded beat channel. The producer end is typically wrapped
/// with [`beat_channel_subscriber`] and registered on the engine; the
/// consumer end is drained by the UI loop.
pub fn create_beat_channel(capacity: usize) -> (BeatProducer, BeatConsumer) {
    let rb = HeapRb::<BeatEvent>::new(capacity);
    rb.split()
}

/// Adapt a channel producer into a beat subscriber closure.
/// A full channel drops the event rather than blocking the tick handler.
pub fn beat_channel_subscriber(mut producer: BeatProducer) -> impl FnMut(BeatEvent) {
    use ringbuf::traits::Producer;
    move |event| {
        let _ = producer.try_push(event);
    }
}
