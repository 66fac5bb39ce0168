//! Human-readable console writer.

// Layer 1: Standard library
use std::collections::HashMap;
use std::fmt::Write as _;

// Layer 2: Third-party
use async_trait::async_trait;
use tracing::warn;

// Layer 3: Internal
use super::traits::Writer;
use crate::error::DirectorError;
use crate::message::{Invariant, Ivc, Message};
use crate::util::{PropertyName, Source};

/// Renders verdicts as human-readable lines into an in-memory buffer.
///
/// This is the one concrete writer this crate ships, matching the
/// "console" selector (ยง6 External Interfaces); `excel`/`xml`/
/// `xml_to_stdout`/in-memory-string selectors are external
/// collaborators, represented in configuration but not implemented
/// here.
#[derive(Debug, Default)]
pub struct ConsoleWriter {
    buffer: String,
    began: bool,
    ended: bool,
}

impl ConsoleWriter {
    /// Create a fresh, unopened console writer.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Writer for ConsoleWriter {
    async fn begin(&mut self) -> Result<(), DirectorError> {
        if self.began {
            warn!("writer.begin called more than once");
        }
        self.began = true;
        self.buffer.push_str("=== analysis results ===\n");
        Ok(())
    }

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
    ) {
        for property in properties {
            let _ = writeln!(
                self.buffer,
                "VALID {property} (via {source}, k={k}, proof_time={proof_time:.3}s, runtime={runtime:.3}s)"
            );
        }
        if !invariants.is_empty() {
            let _ = writeln!(self.buffer, "  invariants learned: {}", invariants.len());
        }
        if let Some(ivc) = ivc {
            let _ = writeln!(self.buffer, "  ivc: {} equations", ivc.0.len());
        }
        if let Some(all_ivcs) = all_ivcs {
            let _ = writeln!(self.buffer, "  all-ivcs: {} cores", all_ivcs.len());
        }
        if mivc_timed_out {
            let _ = writeln!(self.buffer, "  (minimal-IVC computation timed out)");
        }
    }

    async fn write_invalid(
        &mut self,
        property: &PropertyName,
        counterexample_length: u32,
        runtime: f64,
    ) {
        let _ = writeln!(
            self.buffer,
            "INVALID {property} (counterexample length={counterexample_length}, runtime={runtime:.3}s)"
        );
    }

    async fn write_unknown(
        &mut self,
        properties: &[PropertyName],
        base_step: u32,
        inductive_counterexamples: &HashMap<PropertyName, Message>,
        runtime: f64,
    ) {
        for property in properties {
            let has_inductive_cex = inductive_counterexamples.contains_key(property);
            let _ = writeln!(
                self.buffer,
                "UNKNOWN {property} (base_step={base_step}, inductive_cex={has_inductive_cex}, runtime={runtime:.3}s)"
            );
        }
    }

    async fn write_base_step(&mut self, step: u32, properties: &[PropertyName], runtime: f64) {
        if properties.is_empty() {
            return;
        }
        let names: Vec<&str> = properties.iter().map(PropertyName::as_str).collect();
        let _ = writeln!(
            self.buffer,
            "BASE STEP {step} reached for [{}] (runtime={runtime:.3}s)",
            names.join(", ")
        );
    }

    async fn end(&mut self) -> Result<(), DirectorError> {
        if self.ended {
            warn!("writer.end called more than once");
        }
        self.ended = true;
        self.buffer.push_str("=== end ===\n");
        Ok(())
    }

    fn rendered(&self) -> String {
        self.buffer.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_begin_then_write_then_end() {
        let mut writer = ConsoleWriter::new();
        writer.begin().await.unwrap();
        writer
            .write_valid(
                &[PropertyName::new("p1")],
                Source::Bmc,
                3,
                0.5,
                1.2,
                &[],
                None,
                None,
                false,
            )
            .await;
        writer.end().await.unwrap();

        let rendered = writer.rendered();
        assert!(rendered.contains("VALID p1"));
        assert!(rendered.starts_with("=== analysis results ==="));
        assert!(rendered.ends_with("=== end ===\n"));
    }

    #[tokio::test]
    async fn test_write_invalid_reports_length() {
        let mut writer = ConsoleWriter::new();
        writer.begin().await.unwrap();
        writer
            .write_invalid(&PropertyName::new("p1"), 2, 0.8)
            .await;
        let rendered = writer.rendered();
        assert!(rendered.contains("INVALID p1"));
        assert!(rendered.contains("length=2"));
    }

    #[tokio::test]
    async fn test_write_unknown_reports_inductive_cex_presence() {
        let mut writer = ConsoleWriter::new();
        writer.begin().await.unwrap();
        let mut cex = HashMap::new();
        cex.insert(
            PropertyName::new("p1"),
            Message::InductiveCounterexample {
                properties: vec![PropertyName::new("p1")],
                length: 4,
                model: crate::message::Model(json!({})),
            },
        );
        writer
            .write_unknown(&[PropertyName::new("p1")], 5, &cex, 2.0)
            .await;
        let rendered = writer.rendered();
        assert!(rendered.contains("UNKNOWN p1"));
        assert!(rendered.contains("inductive_cex=true"));
    }

    #[tokio::test]
    async fn test_write_base_step_skips_empty_properties() {
        let mut writer = ConsoleWriter::new();
        writer.begin().await.unwrap();
        writer.write_base_step(5, &[], 1.0).await;
        assert_eq!(writer.rendered(), "=== analysis results ===\n");
    }
}
