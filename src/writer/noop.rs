//! A writer that discards everything. Used for embedding and tests.

// Layer 1: Standard library
use std::collections::HashMap;

// Layer 2: Third-party
use async_trait::async_trait;

// Layer 3: Internal
use super::traits::Writer;
use crate::error::DirectorError;
use crate::message::{Invariant, Ivc, Message};
use crate::util::{PropertyName, Source};

/// A writer that performs no I/O and renders nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopWriter;

#[async_trait]
impl Writer for NoopWriter {
    async fn begin(&mut self) -> Result<(), DirectorError> {
        Ok(())
    }

    async fn write_valid(
        &mut self,
        _properties: &[PropertyName],
        _source: Source,
        _k: u32,
        _proof_time: f64,
        _runtime: f64,
        _invariants: &[Invariant],
        _ivc: Option<&Ivc>,
        _all_ivcs: Option<&[Ivc]>,
        _mivc_timed_out: bool,
    ) {
    }

    async fn write_invalid(
        &mut self,
        _property: &PropertyName,
        _counterexample_length: u32,
        _runtime: f64,
    ) {
    }

    async fn write_unknown(
        &mut self,
        _properties: &[PropertyName],
        _base_step: u32,
        _inductive_counterexamples: &HashMap<PropertyName, Message>,
        _runtime: f64,
    ) {
    }

    async fn write_base_step(&mut self, _step: u32, _properties: &[PropertyName], _runtime: f64) {}

    async fn end(&mut self) -> Result<(), DirectorError> {
        Ok(())
    }

    fn rendered(&self) -> String {
        String::new()
    }
}
