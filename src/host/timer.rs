// Delayed-callback scheduling
// Fire-once cancelable timers, pumped cooperatively by the host loop

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use super::clock::Clock;

/// Opaque handle to one armed timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

/// Fire-once cancelable delayed-callback capability.
///
/// Implementations only record wakeups; they never invoke anything
/// themselves. The host notices a matured wakeup and calls back into
/// whoever armed it (for the timing engine, `TimingEngine::on_tick`).
pub trait TickScheduler {
    /// Arm a timer that matures after `delay`.
    fn schedule(&mut self, delay: Duration) -> TimerHandle;

    /// Disarm a previously armed timer. Unknown or already matured
    /// handles are ignored.
    fn cancel(&mut self, handle: TimerHandle);
}

#[derive(Debug, Default)]
struct QueueInner {
    next_id: u64,
    // (handle, absolute deadline on the clock's timeline)
    armed: Vec<(TimerHandle, Duration)>,
}

/// Shared timer queue for single-threaded cooperative hosts.
///
/// The engine arms timers through [`TickScheduler`]; the host keeps a
/// clone of the queue and pumps [`pop_due`](TimerQueue::pop_due) from its
/// event loop, invoking the tick handler for every matured handle.
/// Nothing here blocks or spawns threads.
#[derive(Debug, Clone)]
pub struct TimerQueue<C: Clock> {
    clock: C,
    inner: Rc<RefCell<QueueInner>>,
}

impl<C: Clock> TimerQueue<C> {
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            inner: Rc::new(RefCell::new(QueueInner::default())),
        }
    }

    /// Earliest armed deadline, if any. A real host sleeps or idles
    /// until this before pumping again.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.inner.borrow().armed.iter().map(|(_, d)| *d).min()
    }

    /// Remove and return the earliest timer whose deadline has passed.
    pub fn pop_due(&self) -> Option<TimerHandle> {
        let now = self.clock.now();
        let mut inner = self.inner.borrow_mut();
        let index = inner
            .armed
            .iter()
            .enumerate()
            .filter(|(_, (_, deadline))| *deadline <= now)
            .min_by_key(|(_, (_, deadline))| *deadline)
            .map(|(index, _)| index)?;
        Some(inner.armed.swap_remove(index).0)
    }

    /// Number of currently armed timers.
    pub fn armed_count(&self) -> usize {
        self.inner.borrow().armed.len()
    }
}

impl<C: Clock> TickScheduler for TimerQueue<C> {
    fn schedule(&mut self, delay: Duration) -> TimerHandle {
        let deadline = self.clock.now() + delay;
        let mut inner = self.inner.borrow_mut();
        inner.next_id += 1;
        let handle = TimerHandle(inner.next_id);
        inner.armed.push((handle, deadline));
        handle
    }

    fn cancel(&mut self, handle: TimerHandle) {
        self.inner.borrow_mut().armed.retain(|(h, _)| *h != handle);
    }
}
