//! Delayed-action queue and outbound sink for the Warclock bot.
//!
//! [`Dispatcher::schedule`] is the single primitive every component uses
//! for time-offset side effects: "deliver this line after N
//! milliseconds." Each call arms an independent one-shot timer task;
//! when it fires, the fully formatted line is pushed into an unbounded
//! outbound channel drained by one sink task. The scheduling site never
//! blocks, never observes completion, and cannot cancel an armed action
//! -- a countdown line may land after its war was force-ended, and that
//! staleness is accepted.
//!
//! Delivery failures are logged and swallowed: a dead sink must never
//! take the war clock down with it.

use chrono::{Duration as ChronoDuration, Utc};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use warclock_types::{ActionId, ActionKind, OutboundLine};

/// Errors surfaced by an [`OutboundSink`] delivery attempt.
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    /// The underlying transport rejected or dropped the line.
    #[error("transport delivery failed: {message}")]
    Delivery {
        /// Description of the transport failure.
        message: String,
    },
}

/// The external send primitive the sink task drains into.
///
/// Real deployments hand the line to the chat-protocol client; the
/// bundled [`TracingSink`] just logs it, and tests collect lines in
/// memory. Errors are logged by the sink loop and never retried.
pub trait OutboundSink {
    /// Deliver a single outbound line.
    ///
    /// # Errors
    ///
    /// Returns [`SinkError`] when the transport cannot deliver; the
    /// caller logs and drops the line.
    fn deliver(&mut self, line: &OutboundLine) -> Result<(), SinkError>;
}

/// A sink that logs every line instead of sending it anywhere.
///
/// Useful when running the bot core without a transport attached.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl OutboundSink for TracingSink {
    fn deliver(&mut self, line: &OutboundLine) -> Result<(), SinkError> {
        tracing::info!(
            id = %line.id,
            target = line.target,
            kind = ?line.kind,
            text = line.text,
            "outbound"
        );
        Ok(())
    }
}

/// Fire-and-forget scheduler for delayed outbound actions.
///
/// Cloning is cheap; every component that wants to emit lines holds its
/// own handle. Dropping all handles closes the outbound channel, which
/// stops the sink task after it drains.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    out: mpsc::UnboundedSender<OutboundLine>,
}

impl Dispatcher {
    /// Create a dispatcher and the receiving end for its sink task.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<OutboundLine>) {
        let (out, rx) = mpsc::unbounded_channel();
        (Self { out }, rx)
    }

    /// Schedule a line for delivery after `delay_ms` milliseconds.
    ///
    /// Returns the action's correlation ID. There is no completion
    /// handle and no cancellation: once armed, the action fires (or is
    /// silently dropped if the outbound channel has closed by then).
    pub fn schedule(
        &self,
        target: &str,
        text: &str,
        kind: ActionKind,
        delay_ms: u64,
    ) -> ActionId {
        let id = ActionId::new();
        let fire_at = Utc::now()
            + ChronoDuration::milliseconds(i64::try_from(delay_ms).unwrap_or(i64::MAX));
        let line = OutboundLine {
            id,
            target: target.to_owned(),
            text: text.to_owned(),
            kind,
            fire_at,
        };
        debug!(%id, target, ?kind, delay_ms, "delayed action armed");

        let out = self.out.clone();
        tokio::spawn(async move {
            if delay_ms > 0 {
                tokio::time::sleep(tokio::time::Duration::from_millis(delay_ms)).await;
            }
            if out.send(line).is_err() {
                // The sink is gone; nothing downstream to notify.
                warn!(%id, "outbound channel closed, delayed action dropped");
            }
        });

        id
    }
}

/// Drain the outbound channel into a sink until the channel closes.
///
/// Runs as its own task. A failed delivery is logged and the line is
/// dropped; the loop keeps going so one bad line cannot wedge the
/// queue.
pub async fn run_sink(
    mut rx: mpsc::UnboundedReceiver<OutboundLine>,
    mut sink: impl OutboundSink,
) {
    while let Some(line) = rx.recv().await {
        if let Err(error) = sink.deliver(&line) {
            warn!(id = %line.id, target = line.target, %error, "outbound delivery failed");
        }
    }
    debug!("outbound channel closed, sink task exiting");
}
