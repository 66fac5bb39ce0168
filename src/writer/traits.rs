//! Core trait for writer implementations.

// Layer 1: Standard library
use std::collections::HashMap;

// Layer 2: Third-party
use async_trait::async_trait;

// Layer 3: Internal
use crate::error::DirectorError;
use crate::message::{Invariant, Ivc, Message};
use crate::util::{PropertyName, Source};

/// Output sink for settled verdicts (ยง4.3).
///
/// `begin` is called exactly once before any write, `end` exactly once
/// after the last write. Every write carries the elapsed `runtime` in
/// seconds since Director construction. Writers may fail to open
/// (fatal, aborts Director construction); writes themselves are
/// assumed to succeed or the writer buffers internally, so the write
/// methods here do not return `Result` -- only `begin` and `end` can
/// fail, mirroring the observed contract.
///
/// XML, spreadsheet, and in-memory-string backends are external
/// collaborators (ยง1); [`ConsoleWriter`](super::ConsoleWriter) is the
/// one concrete backend this crate ships.
#[async_trait]
pub trait Writer: Send + Sync {
    /// Open the writer. Called exactly once before any write.
    async fn begin(&mut self) -> Result<(), DirectorError>;

    /// Record properties proven valid.
    #[allow(clippy::too_many_arguments)]
    async fn write_valid(
        &mut self,
        properties: &[PropertyName],
        source: Source,
        k: u32,
        proof_time: f64,
        runtime: f64,
        invariants: &[Invariant],
        ivc: Option<&Ivc>,
        all_ivcs: Option<&[Ivc]>,
        mivc_timed_out: bool,
    );

    /// Record properties refuted, one concrete counterexample per
    /// property.
    async fn write_invalid(
        &mut self,
        property: &PropertyName,
        counterexample_length: u32,
        runtime: f64,
    );

    /// Record properties committed to the *completely unknown* verdict.
    async fn write_unknown(
        &mut self,
        properties: &[PropertyName],
        base_step: u32,
        inductive_counterexamples: &HashMap<PropertyName, Message>,
        runtime: f64,
    );

    /// Record a new BMC base step.
    async fn write_base_step(&mut self, step: u32, properties: &[PropertyName], runtime: f64);

    /// Finalize the writer. Called exactly once after the last write.
    async fn end(&mut self) -> Result<(), DirectorError>;

    /// The writer's rendered content, emitted once at the end of
    /// `run()` immediately after the output buffer (ยง6, Output buffer).
    fn rendered(&self) -> String;
}
