//! HTTP body of an open stream session.
//!
//! The stream owns the receiving half of the session's event channel and acts as
//! the session's scope guard: however the response ends (client disconnect,
//! idle timeout, server shutdown) the session reaches a terminal state.

use bytes::Bytes;
use futures_util::Stream;
use ordercast_commons::SseEvent;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{self, Instant, Interval, MissedTickBehavior, Sleep};
use tokio_util::sync::WaitForCancellationFutureOwned;

use super::session::{SessionState, StreamSession};
use crate::error::LiveError;

/// One unit of the open-stream limit, released when dropped.
pub(crate) struct StreamSlot {
    open: Arc<AtomicUsize>,
}

impl StreamSlot {
    /// Take a slot unless `max` streams are already open.
    pub(crate) fn acquire(open: &Arc<AtomicUsize>, max: usize) -> Option<Self> {
        open.fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| {
            (n < max).then_some(n + 1)
        })
        .ok()
        .map(|_| Self {
            open: Arc::clone(open),
        })
    }
}

impl Drop for StreamSlot {
    fn drop(&mut self) {
        self.open.fetch_sub(1, Ordering::AcqRel);
    }
}

pub struct SessionStream {
    session: Arc<StreamSession>,
    event_rx: mpsc::Receiver<SseEvent>,
    idle_timeout: Duration,
    idle: Pin<Box<Sleep>>,
    keepalive: Option<Interval>,
    cancelled: Pin<Box<WaitForCancellationFutureOwned>>,
    finished: bool,
    slot: Option<StreamSlot>,
}

impl SessionStream {
    /// Must be created inside a tokio runtime (timers).
    pub fn new(
        session: Arc<StreamSession>,
        event_rx: mpsc::Receiver<SseEvent>,
        idle_timeout: Duration,
        keepalive_interval: Option<Duration>,
    ) -> Self {
        let keepalive = keepalive_interval.map(|period| {
            let mut interval = time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            interval
        });
        let cancelled = Box::pin(session.cancellation_token().cancelled_owned());

        Self {
            session,
            event_rx,
            idle_timeout,
            idle: Box::pin(time::sleep(idle_timeout)),
            keepalive,
            cancelled,
            finished: false,
            slot: None,
        }
    }

    /// Count this stream against the open-stream limit for as long as it lives.
    pub(crate) fn with_slot(mut self, slot: StreamSlot) -> Self {
        self.slot = Some(slot);
        self
    }

    pub fn session(&self) -> &Arc<StreamSession> {
        &self.session
    }
}

impl Stream for SessionStream {
    type Item = Result<Bytes, LiveError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        if this.finished {
            return Poll::Ready(None);
        }

        // Queued events are flushed before honouring a close
        match this.event_rx.poll_recv(cx) {
            Poll::Ready(Some(event)) => {
                let deadline = Instant::now() + this.idle_timeout;
                this.idle.as_mut().reset(deadline);
                return Poll::Ready(Some(Ok(event.to_frame())));
            },
            Poll::Ready(None) => {
                this.finished = true;
                this.session.close(SessionState::Completed);
                return Poll::Ready(None);
            },
            Poll::Pending => {},
        }

        if this.cancelled.as_mut().poll(cx).is_ready() {
            this.finished = true;
            return Poll::Ready(None);
        }

        if this.idle.as_mut().poll(cx).is_ready() {
            this.finished = true;
            if this.session.close(SessionState::TimedOut) {
                log::info!(
                    "Session {} for {} timed out after {:?} idle",
                    this.session.session_id(),
                    this.session.recipient(),
                    this.idle_timeout
                );
            }
            return Poll::Ready(None);
        }

        if let Some(keepalive) = this.keepalive.as_mut() {
            if keepalive.poll_tick(cx).is_ready() {
                return Poll::Ready(Some(Ok(SseEvent::keep_alive_frame())));
            }
        }

        Poll::Pending
    }
}

impl Drop for SessionStream {
    fn drop(&mut self) {
        self.session.close(SessionState::Completed);
    }
}
