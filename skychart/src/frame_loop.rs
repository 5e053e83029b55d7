//! Cooperative frame pacing.
//!
//! Everything runs on one thread. A [`FrameSource`] is the only place where the
//! loop yields: it waits for the next display refresh (or pretends to) and
//! reports the monotonic time of that frame. A [`FrameLoop`] tracks the single
//! frame callback a view may have outstanding.

use std::cell::Cell;
use std::time::{Duration, Instant};

/// Refresh interval of a 60 Hz display
pub const DEFAULT_FRAME_INTERVAL: Duration = Duration::from_micros(16_667);

/// Monotonic time source.
pub trait Clock {
    /// Time elapsed since the clock's origin
    fn now(&self) -> Duration;
}

/// Wall-clock backed monotonic clock.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Clock that only moves when told to.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<Duration>,
}

impl ManualClock {
    pub fn new(start: Duration) -> Self {
        Self {
            now: Cell::new(start),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }

    /// Move to `to`; a reading earlier than the current one is ignored.
    pub fn set(&self, to: Duration) {
        if to > self.now.get() {
            self.now.set(to);
        }
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now.get()
    }
}

/// A clock plus the point where the frame loop suspends.
pub trait FrameSource: Clock {
    /// Block until the next frame is due and return its clock reading.
    fn wait_next_frame(&mut self) -> Duration;
}

/// Frames paced by sleeping the current thread.
#[derive(Debug, Clone, Copy)]
pub struct RealtimeFrames {
    clock: MonotonicClock,
    interval: Duration,
}

impl RealtimeFrames {
    pub fn new(interval: Duration) -> Self {
        Self {
            clock: MonotonicClock::new(),
            interval,
        }
    }
}

impl Default for RealtimeFrames {
    fn default() -> Self {
        Self::new(DEFAULT_FRAME_INTERVAL)
    }
}

impl Clock for RealtimeFrames {
    fn now(&self) -> Duration {
        self.clock.now()
    }
}

impl FrameSource for RealtimeFrames {
    fn wait_next_frame(&mut self) -> Duration {
        std::thread::sleep(self.interval);
        self.clock.now()
    }
}

/// Frames on a virtual clock that advances by a fixed step per frame.
///
/// Runs as fast as the caller can render, which makes transitions reproducible.
#[derive(Debug)]
pub struct SimulatedFrames {
    clock: ManualClock,
    interval: Duration,
    frames: u64,
}

impl SimulatedFrames {
    pub fn new(interval: Duration) -> Self {
        Self {
            clock: ManualClock::default(),
            interval,
            frames: 0,
        }
    }

    pub fn clock(&self) -> &ManualClock {
        &self.clock
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Frames handed out so far
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl Default for SimulatedFrames {
    fn default() -> Self {
        Self::new(DEFAULT_FRAME_INTERVAL)
    }
}

impl Clock for SimulatedFrames {
    fn now(&self) -> Duration {
        self.clock.now()
    }
}

impl FrameSource for SimulatedFrames {
    fn wait_next_frame(&mut self) -> Duration {
        self.clock.advance(self.interval);
        self.frames += 1;
        self.clock.now()
    }
}

/// Identifies one requested frame callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(u64);

/// Bookkeeping for the one frame callback a view may have outstanding.
#[derive(Debug, Default)]
pub struct FrameLoop {
    next_id: u64,
    pending: Option<FrameHandle>,
}

impl FrameLoop {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule a frame, cancelling any frame still outstanding.
    pub fn request_frame(&mut self) -> FrameHandle {
        if let Some(previous) = self.pending.take() {
            log::debug!("Frame {:?} cancelled by a newer request", previous);
        }
        let handle = FrameHandle(self.next_id);
        self.next_id += 1;
        self.pending = Some(handle);
        handle
    }

    /// Drop the outstanding frame, if any.
    pub fn cancel(&mut self) -> Option<FrameHandle> {
        self.pending.take()
    }

    pub fn pending(&self) -> Option<FrameHandle> {
        self.pending
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Consume the outstanding frame so it can run.
    pub fn take_due(&mut self) -> Option<FrameHandle> {
        self.pending.take()
    }
}
