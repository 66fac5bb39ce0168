//! The advice abstraction (ยง6 External Interfaces): persisted hints
//! (invariants, IVCs) reusable across runs.
//!
//! Advice file encoding and decoding are out of scope (ยง1); this module
//! only defines the `read`/`write` abstraction the Director depends on
//! and a minimal JSON-lines-backed implementation.

// Layer 1: Standard library
use std::io::Write as _;
use std::path::{Path, PathBuf};

// Layer 2: Third-party
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

// Layer 3: Internal
use crate::error::DirectorError;
use crate::message::Invariant;

/// Advice loaded at startup: invariants learned on a previous run,
/// available for the configured engines to reuse.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Advice {
    /// Variable declarations the advice file was seeded with.
    pub variable_declarations: Vec<String>,
    /// Invariants carried over from a previous run.
    pub invariants: Vec<Invariant>,
}

/// Reads advice from a previous run. Decoding format is an external
/// collaborator concern (ยง1); this trait is the only seam the Director
/// depends on.
#[async_trait]
pub trait AdviceReader: Send + Sync {
    /// Load advice from the configured path.
    async fn read(&self) -> Result<Advice, DirectorError>;
}

/// Accepts a sequence of variable declarations at construction and
/// invariants appended over the run, then is flushed exactly once
/// (ยง6 External Interfaces).
#[async_trait]
pub trait AdviceWriter: Send + Sync {
    /// Seed the writer with the analysis node's variable declarations.
    fn seed(&mut self, variable_declarations: Vec<String>);

    /// Append an invariant learned during the run.
    fn append(&mut self, invariant: Invariant);

    /// Flush accumulated advice to its destination. Called exactly once.
    async fn flush(&mut self) -> Result<(), DirectorError>;
}

/// Minimal JSON-lines-backed advice reader/writer.
pub struct FileAdvice {
    path: PathBuf,
    variable_declarations: Vec<String>,
    invariants: Vec<Invariant>,
}

impl FileAdvice {
    /// Target the given path for reading and/or writing.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            variable_declarations: Vec::new(),
            invariants: Vec::new(),
        }
    }
}

#[async_trait]
impl AdviceReader for FileAdvice {
    async fn read(&self) -> Result<Advice, DirectorError> {
        read_advice_file(&self.path)
    }
}

#[async_trait]
impl AdviceWriter for FileAdvice {
    fn seed(&mut self, variable_declarations: Vec<String>) {
        self.variable_declarations = variable_declarations;
    }

    fn append(&mut self, invariant: Invariant) {
        self.invariants.push(invariant);
    }

    async fn flush(&mut self) -> Result<(), DirectorError> {
        let advice = Advice {
            variable_declarations: self.variable_declarations.clone(),
            invariants: self.invariants.clone(),
        };
        let json = serde_json::to_string(&advice)
            .map_err(|err| DirectorError::AdviceIoError(err.to_string()))?;
        let mut file = std::fs::File::create(&self.path)
            .map_err(|err| DirectorError::AdviceIoError(err.to_string()))?;
        file.write_all(json.as_bytes())
            .map_err(|err| DirectorError::AdviceIoError(err.to_string()))?;
        Ok(())
    }
}

fn read_advice_file(path: &Path) -> Result<Advice, DirectorError> {
    let contents =
        std::fs::read_to_string(path).map_err(|err| DirectorError::AdviceIoError(err.to_string()))?;
    serde_json::from_str(&contents).map_err(|err| DirectorError::AdviceIoError(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_file_advice_round_trip() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        let path = tmp.path().to_path_buf();

        let mut writer = FileAdvice::new(&path);
        writer.seed(vec!["x".to_string(), "y".to_string()]);
        writer.append(Invariant("x >= 0".to_string()));
        writer.flush().await.unwrap();

        let reader = FileAdvice::new(&path);
        let advice = reader.read().await.unwrap();
        assert_eq!(advice.variable_declarations, vec!["x", "y"]);
        assert_eq!(advice.invariants, vec![Invariant("x >= 0".to_string())]);
    }

    #[tokio::test]
    async fn test_read_missing_file_is_advice_io_error() {
        let reader = FileAdvice::new("/nonexistent/path/advice.json");
        let result = reader.read().await;
        assert!(matches!(result, Err(DirectorError::AdviceIoError(_))));
    }
}
