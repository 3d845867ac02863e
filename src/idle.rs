//! Idle-scheduling capability: how the host grants the renderer time slices.
//!
//! An [`IdleHost`] hands out one [`Deadline`] per slice. The work loop runs
//! units of work until the deadline says too little time remains, then goes
//! back to the host for the next slice.

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;

/// Remaining time in the current slice.
pub trait Deadline {
    fn time_remaining(&self) -> Duration;
}

/// A slice that never runs out. Ticking with it drains all pending work.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unbounded;

impl Deadline for Unbounded {
    fn time_remaining(&self) -> Duration {
        Duration::MAX
    }
}

/// A wall-clock slice ending at a fixed instant.
#[derive(Debug, Clone, Copy)]
pub struct SliceDeadline {
    end: Instant,
}

impl SliceDeadline {
    /// A slice of `length` starting now.
    pub fn new(length: Duration) -> Self {
        Self {
            end: Instant::now() + length,
        }
    }

    pub fn ends_at(end: Instant) -> Self {
        Self { end }
    }
}

impl Deadline for SliceDeadline {
    fn time_remaining(&self) -> Duration {
        self.end.saturating_duration_since(Instant::now())
    }
}

/// Grants time slices to the work loop.
pub trait IdleHost {
    type Deadline: Deadline;

    /// Wait for the next idle opportunity and return its deadline.
    fn next_slice(&mut self) -> impl Future<Output = Self::Deadline>;
}

/// Default slice length for [`TokioIdle`], one frame at 60 fps.
pub const DEFAULT_SLICE: Duration = Duration::from_millis(16);

/// Idle host backed by the tokio scheduler.
///
/// Each slice starts after yielding to the runtime once, so other tasks on
/// the same thread get to run between slices.
#[derive(Debug, Clone)]
pub struct TokioIdle {
    slice: Duration,
    gap: Option<Duration>,
}

impl TokioIdle {
    pub fn new(slice: Duration) -> Self {
        Self { slice, gap: None }
    }

    /// Sleep for `gap` between slices instead of just yielding (builder).
    pub fn with_gap(mut self, gap: Duration) -> Self {
        self.gap = Some(gap);
        self
    }

    pub fn slice(&self) -> Duration {
        self.slice
    }
}

impl Default for TokioIdle {
    fn default() -> Self {
        Self::new(DEFAULT_SLICE)
    }
}

impl IdleHost for TokioIdle {
    type Deadline = SliceDeadline;

    async fn next_slice(&mut self) -> SliceDeadline {
        match self.gap {
            Some(gap) => tokio::time::sleep(gap).await,
            None => tokio::task::yield_now().await,
        }
        SliceDeadline::new(self.slice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unbounded_never_runs_out() {
        assert_eq!(Unbounded.time_remaining(), Duration::MAX);
    }

    #[test]
    fn elapsed_slice_reports_zero() {
        let deadline = SliceDeadline::ends_at(Instant::now() - Duration::from_millis(5));
        assert_eq!(deadline.time_remaining(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn slice_deadline_counts_down() {
        let deadline = SliceDeadline::new(Duration::from_millis(10));
        assert_eq!(deadline.time_remaining(), Duration::from_millis(10));
        tokio::time::advance(Duration::from_millis(4)).await;
        assert_eq!(deadline.time_remaining(), Duration::from_millis(6));
        tokio::time::advance(Duration::from_millis(20)).await;
        assert_eq!(deadline.time_remaining(), Duration::ZERO);
    }

    #[tokio::test]
    async fn tokio_idle_grants_configured_slice() {
        let mut idle = TokioIdle::new(Duration::from_secs(60));
        let deadline = idle.next_slice().await;
        assert!(deadline.time_remaining() > Duration::from_secs(59));
    }

    #[tokio::test(start_paused = true)]
    async fn tokio_idle_gap_sleeps_between_slices() {
        let mut idle = TokioIdle::new(Duration::from_millis(5)).with_gap(Duration::from_millis(100));
        let before = Instant::now();
        let _ = idle.next_slice().await;
        assert!(Instant::now() - before >= Duration::from_millis(100));
    }

    #[test]
    fn default_slice_is_one_frame() {
        assert_eq!(TokioIdle::default().slice(), DEFAULT_SLICE);
    }
}
