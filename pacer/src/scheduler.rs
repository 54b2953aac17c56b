//! # Scheduler Module - Cancelable Frame Loop and Sampler
//!
//! A typing session runs on two timing domains that must never be merged:
//!
//! - [`FrameLoop`]: fires as often as the host renders (nominally 60 Hz) and yields the
//!   wall-clock delta since the previous frame. The pacing cursor integrates these deltas,
//!   so its speed is correct regardless of frame rate or dropped frames.
//! - [`Interval`]: a fixed cadence (one second by default) that tells the session how many
//!   sample periods elapsed since it was last polled.
//!
//! Both tasks share one [`TaskHandle`]. Cancelling it stops every outstanding task at once:
//! after cancellation no poll yields a delta or a sample, so a discarded session can't be
//! mutated by a leaked timer.
//!
#![doc = simple_mermaid::mermaid!("../diagrams/scheduler_poll.mmd")]

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use web_time::{Duration, Instant};

/// Cancellation token shared by scheduled tasks
///
/// Cloning a handle gives another owner the ability to cancel the same tasks.
#[derive(Debug, Clone, Default)]
pub struct TaskHandle(Arc<AtomicBool>);

impl TaskHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel every task holding this handle
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Variable-rate task yielding the time since the previous frame
#[derive(Debug, Clone)]
pub struct FrameLoop {
    handle: TaskHandle,
    last_frame: Option<Instant>,
}

impl FrameLoop {
    pub const fn new(handle: TaskHandle) -> Self {
        Self {
            handle,
            last_frame: None,
        }
    }

    /// Start measuring frames from `now`
    pub fn arm(&mut self, now: Instant) {
        self.last_frame = Some(now);
    }

    /// Advance to the frame at `now`, returning the elapsed seconds since the last one
    ///
    /// Returns `None` if the loop was never armed or has been cancelled.
    pub fn advance(&mut self, now: Instant) -> Option<f64> {
        if self.handle.is_cancelled() {
            return None;
        }

        let last = self.last_frame.replace(now)?;
        Some(now.saturating_duration_since(last).as_secs_f64())
    }
}

/// Fixed-rate task counting elapsed periods
#[derive(Debug, Clone)]
pub struct Interval {
    handle: TaskHandle,
    period: Duration,
    next_due: Option<Instant>,
}

impl Interval {
    pub const fn new(period: Duration, handle: TaskHandle) -> Self {
        Self {
            handle,
            period,
            next_due: None,
        }
    }

    /// Start the cadence at `now`; the first period is due one `period` later
    pub fn arm(&mut self, now: Instant) {
        self.next_due = Some(now + self.period);
    }

    /// How many periods have come due at `now`
    ///
    /// Every due period is consumed, so a late poll catches up with one count per
    /// missed period instead of drifting.
    pub fn due(&mut self, now: Instant) -> usize {
        if self.handle.is_cancelled() || self.period.is_zero() {
            return 0;
        }

        let Some(mut next_due) = self.next_due else {
            return 0;
        };

        let mut count = 0;
        while next_due <= now {
            count += 1;
            next_due += self.period;
        }
        self.next_due = Some(next_due);

        count
    }
}

/// The outcome of polling the [`Scheduler`] once
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Poll {
    /// Seconds since the previous frame, if the frame loop is running
    pub delta_seconds: Option<f64>,
    /// Sample periods that came due
    pub samples: usize,
}

/// The pair of tasks owned by a typing session
///
/// A clone continues from the same frame and sample position under its own
/// [`TaskHandle`], so cancelling one scheduler never stops the other.
#[derive(Debug)]
pub struct Scheduler {
    handle: TaskHandle,
    frame_loop: FrameLoop,
    sampler: Interval,
}

impl Scheduler {
    pub fn new(sample_period: Duration) -> Self {
        let handle = TaskHandle::new();
        Self {
            frame_loop: FrameLoop::new(handle.clone()),
            sampler: Interval::new(sample_period, handle.clone()),
            handle,
        }
    }

    /// Arm both tasks at `now`
    pub fn arm(&mut self, now: Instant) {
        self.frame_loop.arm(now);
        self.sampler.arm(now);
    }

    pub fn poll(&mut self, now: Instant) -> Poll {
        Poll {
            delta_seconds: self.frame_loop.advance(now),
            samples: self.sampler.due(now),
        }
    }

    /// Cancel both tasks
    pub fn cancel(&self) {
        self.handle.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.handle.is_cancelled()
    }

    /// A handle that cancels this scheduler's tasks
    pub fn handle(&self) -> TaskHandle {
        self.handle.clone()
    }
}

impl Clone for Scheduler {
    fn clone(&self) -> Self {
        let handle = TaskHandle::new();
        if self.is_cancelled() {
            handle.cancel();
        }

        Self {
            frame_loop: FrameLoop {
                handle: handle.clone(),
                last_frame: self.frame_loop.last_frame,
            },
            sampler: Interval {
                handle: handle.clone(),
                period: self.sampler.period,
                next_due: self.sampler.next_due,
            },
            handle,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_loop_yields_deltas() {
        let origin = Instant::now();
        let mut frames = FrameLoop::new(TaskHandle::new());

        // Not armed yet
        assert_eq!(frames.advance(origin), None);

        frames.arm(origin);
        let delta = frames.advance(origin + Duration::from_millis(16)).unwrap();
        assert!((delta - 0.016).abs() < 1e-9);

        // A dropped frame simply produces a larger delta
        let delta = frames.advance(origin + Duration::from_millis(66)).unwrap();
        assert!((delta - 0.050).abs() < 1e-9);
    }

    #[test]
    fn test_interval_counts_missed_periods() {
        let origin = Instant::now();
        let mut interval = Interval::new(Duration::from_secs(1), TaskHandle::new());
        interval.arm(origin);

        assert_eq!(interval.due(origin + Duration::from_millis(999)), 0);
        assert_eq!(interval.due(origin + Duration::from_secs(1)), 1);
        assert_eq!(interval.due(origin + Duration::from_millis(1500)), 0);
        assert_eq!(interval.due(origin + Duration::from_millis(4200)), 3);
    }

    #[test]
    fn test_zero_period_never_fires() {
        let origin = Instant::now();
        let mut interval = Interval::new(Duration::ZERO, TaskHandle::new());
        interval.arm(origin);
        assert_eq!(interval.due(origin + Duration::from_secs(5)), 0);
    }

    #[test]
    fn test_cancel_stops_all_tasks() {
        let origin = Instant::now();
        let mut scheduler = Scheduler::new(Duration::from_secs(1));
        scheduler.arm(origin);

        let poll = scheduler.poll(origin + Duration::from_secs(2));
        assert_eq!(poll.samples, 2);
        assert!(poll.delta_seconds.is_some());

        let handle = scheduler.handle();
        handle.cancel();
        assert!(scheduler.is_cancelled());

        let poll = scheduler.poll(origin + Duration::from_secs(10));
        assert_eq!(
            poll,
            Poll {
                delta_seconds: None,
                samples: 0
            }
        );
    }

    #[test]
    fn test_clone_has_its_own_handle() {
        let origin = Instant::now();
        let mut scheduler = Scheduler::new(Duration::from_secs(1));
        scheduler.arm(origin);
        scheduler.poll(origin + Duration::from_millis(1500));

        let mut copy = scheduler.clone();
        copy.cancel();
        assert!(!scheduler.is_cancelled());

        let poll = scheduler.poll(origin + Duration::from_secs(3));
        assert_eq!(poll.samples, 2);
        assert!((poll.delta_seconds.unwrap() - 1.5).abs() < 1e-9);

        // A cancelled scheduler stays cancelled in its clones
        assert!(copy.clone().is_cancelled());
    }
}
