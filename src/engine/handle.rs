//! The Director-side handle to a spawned engine task.

// Layer 1: Standard library
// (none)

// Layer 2: Third-party
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{info, warn};

// Layer 3: Internal
use super::traits::{Engine, EngineContext};
use crate::error::DirectorError;
use crate::message::Message;
use crate::util::Source;

/// Mailbox capacity for the Director-to-engine fan-out channel.
const INBOX_CAPACITY: usize = 256;

/// Director-side handle to a running engine task: exposes the naming,
/// liveness, cooperative stop, message delivery, and fatal-error
/// capabilities of the engine contract (ยง4.2) without requiring the
/// Director to retain the boxed `Engine` value itself (which has
/// already been moved onto its own task by the time the Director holds
/// this handle).
pub struct EngineHandle {
    source: Source,
    join: JoinHandle<Result<(), DirectorError>>,
    stop_tx: watch::Sender<bool>,
    inbox_tx: mpsc::Sender<Message>,
    fatal_error: Option<DirectorError>,
}

impl EngineHandle {
    /// Spawn `engine` onto its own task. `outbox` is the Director's own
    /// mailbox sender, shared so the engine can publish messages back
    /// (ยง5: MPSC from engines into the Director).
    pub fn spawn(source: Source, engine: Box<dyn Engine>, outbox: mpsc::Sender<Message>) -> Self {
        let (inbox_tx, inbox_rx) = mpsc::channel(INBOX_CAPACITY);
        let (stop_tx, stop_rx) = watch::channel(false);
        let ctx = EngineContext {
            inbox: inbox_rx,
            outbox,
            stop: stop_rx,
        };

        info!(engine = %source, "engine.start");
        let join = tokio::spawn(async move { engine.run(ctx).await });

        Self {
            source,
            join,
            stop_tx,
            inbox_tx,
            fatal_error: None,
        }
    }

    /// The engine's name.
    pub fn name(&self) -> Source {
        self.source
    }

    /// `true` while the engine's task has not yet completed.
    pub fn is_alive(&self) -> bool {
        !self.join.is_finished()
    }

    /// Deliver a broadcast message to this engine's inbox, in the order
    /// the Director calls `deliver` (ยง5 ordering requirement). A
    /// delivery failure means the engine's task has already exited and
    /// is not itself an error for the broadcaster.
    pub async fn deliver(&self, message: Message) {
        if self.inbox_tx.send(message).await.is_err() {
            warn!(engine = %self.source, "dropped message: engine inbox closed");
        }
    }

    /// Ask the engine to stop cooperatively. Idempotent; a dropped
    /// receiver (engine already exited) is not an error.
    pub fn stop(&self) {
        info!(engine = %self.source, "engine.stop");
        let _ = self.stop_tx.send(true);
    }

    /// Poll for a fatal error without blocking. Once observed, the
    /// error is cached and returned on every subsequent call.
    pub fn poll_fatal_error(&mut self) -> Option<&DirectorError> {
        if self.fatal_error.is_none() && self.join.is_finished() {
            // `is_finished()` guarantees this poll resolves immediately.
            match futures_now_or_never(&mut self.join) {
                Some(Ok(Ok(()))) => {}
                Some(Ok(Err(err))) => {
                    warn!(engine = %self.source, error = %err, "engine.fatal");
                    self.fatal_error = Some(err);
                }
                Some(Err(join_err)) => {
                    let err = DirectorError::engine_fatal(self.source, join_err.to_string());
                    warn!(engine = %self.source, error = %err, "engine.fatal");
                    self.fatal_error = Some(err);
                }
                None => {}
            }
        }
        self.fatal_error.as_ref()
    }
}

/// Resolve an already-finished `JoinHandle` without an async context.
///
/// `JoinHandle::is_finished()` having returned `true` guarantees the
/// task's result is ready, but retrieving it still requires `.await`ing
/// the handle. We poll it exactly once with a no-op waker, which is
/// sound because a finished task's future never returns `Pending`.
fn futures_now_or_never<T>(
    handle: &mut JoinHandle<T>,
) -> Option<Result<T, tokio::task::JoinError>> {
    use std::future::Future;
    use std::pin::Pin;
    use std::task::{Context, Poll, Waker};

    let waker = Waker::noop().clone();
    let mut cx = Context::from_waker(&waker);
    match Pin::new(handle).poll(&mut cx) {
        Poll::Ready(result) => Some(result),
        Poll::Pending => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct ImmediateOk;

    #[async_trait]
    impl Engine for ImmediateOk {
        async fn run(self: Box<Self>, _ctx: EngineContext) -> Result<(), DirectorError> {
            Ok(())
        }
    }

    struct ImmediateFatal;

    #[async_trait]
    impl Engine for ImmediateFatal {
        async fn run(self: Box<Self>, _ctx: EngineContext) -> Result<(), DirectorError> {
            Err(DirectorError::engine_fatal(Source::Bmc, "boom"))
        }
    }

    struct EchoesToOutbox;

    #[async_trait]
    impl Engine for EchoesToOutbox {
        async fn run(self: Box<Self>, mut ctx: EngineContext) -> Result<(), DirectorError> {
            if let Some(msg) = ctx.inbox.recv().await {
                let _ = ctx.outbox.send(msg).await;
            }
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_handle_reports_liveness() {
        let (out_tx, _out_rx) = mpsc::channel(1);
        let handle = EngineHandle::spawn(Source::Bmc, Box::new(ImmediateOk), out_tx);
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        assert!(!handle.is_alive());
    }

    #[tokio::test]
    async fn test_handle_captures_fatal_error() {
        let (out_tx, _out_rx) = mpsc::channel(1);
        let mut handle = EngineHandle::spawn(Source::Bmc, Box::new(ImmediateFatal), out_tx);
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        let err = handle.poll_fatal_error();
        assert!(err.is_some());
        assert!(err.unwrap().is_fatal());
    }

    #[tokio::test]
    async fn test_handle_name_matches_source() {
        let (out_tx, _out_rx) = mpsc::channel(1);
        let handle = EngineHandle::spawn(Source::Pdr, Box::new(ImmediateOk), out_tx);
        assert_eq!(handle.name(), Source::Pdr);
    }

    #[tokio::test]
    async fn test_deliver_reaches_engine_inbox() {
        let (out_tx, mut out_rx) = mpsc::channel(1);
        let handle = EngineHandle::spawn(Source::Bmc, Box::new(EchoesToOutbox), out_tx);
        handle
            .deliver(Message::BaseStep {
                step: 1,
                properties: vec![],
            })
            .await;
        let echoed = out_rx.recv().await;
        assert!(matches!(echoed, Some(Message::BaseStep { step: 1, .. })));
    }
}
