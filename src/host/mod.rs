// Host capabilities - monotonic clock and delayed-callback scheduling
// The engine is generic over these so hosts (and tests) supply their own

pub mod clock;
pub mod timer;

pub use clock::{Clock, ManualClock, SystemClock};
pub use timer::{TickScheduler, TimerHandle, TimerQueue};
