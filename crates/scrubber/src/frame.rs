use tracing::trace;

/// Identifies one scheduled display refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameToken(u64);

/// Cancellable repeating task driven by display refreshes.
///
/// At most one frame is pending at a time. The host runs the step when the
/// display refreshes; the step may request the next frame to keep repeating.
/// Cancelling drops the pending token so a late refresh becomes a no-op.
///
/// # Example
/// ```
/// use scrubber::frame::FrameLoop;
///
/// let mut frames = FrameLoop::default();
/// assert!(frames.request().is_some());
/// assert!(frames.request().is_none());
///
/// frames.cancel();
/// assert!(!frames.begin());
/// ```
#[derive(Debug, Default)]
pub struct FrameLoop {
    next_id: u64,
    pending: Option<FrameToken>,
}

impl FrameLoop {
    /// Schedules a frame. Returns `None` when one is already pending.
    pub fn request(&mut self) -> Option<FrameToken> {
        if self.pending.is_some() {
            return None;
        }
        let token = FrameToken(self.next_id);
        self.next_id += 1;
        self.pending = Some(token);
        trace!(token = token.0, "frame requested");
        Some(token)
    }

    /// Releases the pending frame, if any.
    pub fn cancel(&mut self) -> Option<FrameToken> {
        let cancelled = self.pending.take();
        if let Some(token) = cancelled {
            trace!(token = token.0, "frame cancelled");
        }
        cancelled
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Consumes the pending frame at refresh time.
    ///
    /// Returns false when nothing was scheduled, i.e. the frame was cancelled.
    pub fn begin(&mut self) -> bool {
        self.pending.take().is_some()
    }
}
