//! Core trait for the engine framework.
//!
//! # Design
//!
//! The Director holds a fixed but heterogeneous set of engines (BMC,
//! k-induction, invariant generation, smoothing, PDR, advice, IVC
//! reduction, all-IVCs) in a single collection and dispatches startup
//! over it uniformly. This workspace otherwise prefers generic
//! constraints to `dyn` trait objects; here that preference is set
//! aside deliberately, since the engine set is heterogeneous, fixed in
//! count, and small, and `Vec<Box<dyn Engine>>` is the only
//! representation that lets construction iterate the engine list as
//! data rather than as unrolled generic code.

// Layer 1: Standard library
// (none)

// Layer 2: Third-party
use async_trait::async_trait;
use tokio::sync::{mpsc, watch};

// Layer 3: Internal
use crate::error::DirectorError;
use crate::message::Message;

/// Everything an engine's `run` needs to participate in the mailbox
/// topology: an inbox of messages broadcast by the Director, an outbox
/// to publish messages back, and a cooperative stop signal.
pub struct EngineContext {
    /// Messages the Director broadcasts to this engine, in delivery
    /// order (ยง4.4.7 Broadcast).
    pub inbox: mpsc::Receiver<Message>,
    /// Channel back to the Director's own mailbox.
    pub outbox: mpsc::Sender<Message>,
    /// Cooperative stop signal; observing `true` means the engine
    /// should wind down and return.
    pub stop: watch::Receiver<bool>,
}

/// An engine: a named unit of work that can be run on its own task,
/// accepts messages via its inbox, and can be asked to stop
/// cooperatively (ยง4.2).
///
/// `run` consumes the engine (`self: Box<Self>`) because it is always
/// driven to completion on a dedicated `tokio::spawn`'d task; the
/// Director never calls back into the engine value after spawning it.
/// Naming, liveness, cooperative stop, and fatal-error inspection are
/// instead exposed on [`crate::engine::EngineHandle`], the Director-side
/// handle returned by spawning -- mirroring how actor behavior (this
/// trait) and lifecycle tracking are kept separate elsewhere in this
/// workspace.
#[async_trait]
pub trait Engine: Send {
    /// Run the engine to completion (normal exit, cooperative stop, or
    /// fatal error).
    async fn run(self: Box<Self>, ctx: EngineContext) -> Result<(), DirectorError>;
}
