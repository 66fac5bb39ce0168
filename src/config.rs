//! Director configuration with sensible defaults.

// Layer 1: Standard library
use std::path::PathBuf;

// Layer 2: Third-party
use serde::{Deserialize, Serialize};

// Layer 3: Internal
use crate::error::DirectorError;

/// Default supervision-loop sleep between mailbox drains.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 100;

/// Default timeout in seconds (0 = no timeout is never the default; a
/// caller must opt into an explicit run-forever by setting a very large
/// value, matching the observed absence of an "unlimited" sentinel).
pub const DEFAULT_TIMEOUT_SECS: u64 = 3600;

/// The recognized configuration option set (ยง3 Data Model, Configuration).
///
/// Constructed via [`DirectorConfig::builder`], which validates
/// mutually-dependent fields before returning a `DirectorConfig`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectorConfig {
    /// Enable the bounded model checking engine.
    pub bounded_model_checking: bool,
    /// Enable the k-induction engine.
    pub k_induction: bool,
    /// Enable the invariant generation engine.
    pub invariant_generation: bool,
    /// Enable counterexample smoothing.
    pub smooth_counterexamples: bool,
    /// PDR induction depth; PDR is enabled iff this is >= 1.
    pub pdr_max: u32,
    /// Optional path to read advice from at startup.
    pub read_advice: Option<PathBuf>,
    /// Optional path to write advice to at shutdown.
    pub write_advice: Option<PathBuf>,
    /// Route valid/invalid verdicts through IVC reduction.
    pub reduce_ivc: bool,
    /// Additionally route valid verdicts through all-IVCs extraction.
    pub all_ivcs: bool,
    /// Whether IVC right-side projection should consider all assigned
    /// variables, not just outputs.
    pub all_assigned: bool,
    /// Run timeout, in seconds.
    pub timeout: u64,
    /// Write a spreadsheet (`<filename>.xls`).
    pub excel: bool,
    /// Write an XML report (`<filename>.xml`).
    pub xml: bool,
    /// Stream the XML report to stdout instead of a file.
    pub xml_to_stdout: bool,
    /// Run embedded (as a library subsystem rather than a standalone
    /// process); gates the IVC right-side projection skip (ยง9) and
    /// whether engines are explicitly stopped after the loop (ยง4.4).
    pub mini_jkind: bool,
    /// Base filename for file-backed writers.
    pub filename: Option<PathBuf>,
}

impl Default for DirectorConfig {
    fn default() -> Self {
        Self {
            bounded_model_checking: true,
            k_induction: false,
            invariant_generation: false,
            smooth_counterexamples: false,
            pdr_max: 0,
            read_advice: None,
            write_advice: None,
            reduce_ivc: false,
            all_ivcs: false,
            all_assigned: false,
            timeout: DEFAULT_TIMEOUT_SECS,
            excel: false,
            xml: false,
            xml_to_stdout: false,
            mini_jkind: false,
            filename: None,
        }
    }
}

impl DirectorConfig {
    /// Start building a configuration.
    ///
    /// # Examples
    /// ```rust
    /// use mc_director::config::DirectorConfig;
    ///
    /// let config = DirectorConfig::builder()
    ///     .with_k_induction(true)
    ///     .with_pdr_max(2)
    ///     .build()
    ///     .unwrap();
    /// assert!(config.k_induction);
    /// assert!(config.pdr_enabled());
    /// ```
    pub fn builder() -> DirectorConfigBuilder {
        DirectorConfigBuilder::default()
    }

    /// PDR is enabled iff `pdr_max >= 1` (ยง3 Data Model).
    pub fn pdr_enabled(&self) -> bool {
        self.pdr_max >= 1
    }

    /// Validate mutually-dependent fields.
    pub fn validate(&self) -> Result<(), DirectorError> {
        if !self.bounded_model_checking
            && !self.k_induction
            && !self.invariant_generation
            && !self.pdr_enabled()
        {
            return Err(DirectorError::ConfigError(
                "at least one proof engine must be enabled".to_string(),
            ));
        }

        if (self.excel || self.xml) && self.filename.is_none() {
            return Err(DirectorError::ConfigError(
                "a filename is required when excel or xml output is selected".to_string(),
            ));
        }

        if self.xml_to_stdout && self.xml {
            return Err(DirectorError::ConfigError(
                "xml_to_stdout and xml are mutually exclusive writer selectors".to_string(),
            ));
        }

        if self.all_ivcs && !self.reduce_ivc {
            return Err(DirectorError::ConfigError(
                "all_ivcs requires reduce_ivc to be set".to_string(),
            ));
        }

        Ok(())
    }
}

/// Fluent builder for [`DirectorConfig`].
#[derive(Debug, Default)]
pub struct DirectorConfigBuilder {
    config: DirectorConfig,
}

impl DirectorConfigBuilder {
    /// Enable or disable bounded model checking.
    pub fn with_bounded_model_checking(mut self, enabled: bool) -> Self {
        self.config.bounded_model_checking = enabled;
        self
    }

    /// Enable or disable k-induction.
    pub fn with_k_induction(mut self, enabled: bool) -> Self {
        self.config.k_induction = enabled;
        self
    }

    /// Enable or disable invariant generation.
    pub fn with_invariant_generation(mut self, enabled: bool) -> Self {
        self.config.invariant_generation = enabled;
        self
    }

    /// Enable or disable counterexample smoothing.
    pub fn with_smooth_counterexamples(mut self, enabled: bool) -> Self {
        self.config.smooth_counterexamples = enabled;
        self
    }

    /// Set the PDR induction depth (0 disables PDR).
    pub fn with_pdr_max(mut self, depth: u32) -> Self {
        self.config.pdr_max = depth;
        self
    }

    /// Set the advice read path.
    pub fn with_read_advice(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.read_advice = Some(path.into());
        self
    }

    /// Set the advice write path.
    pub fn with_write_advice(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.write_advice = Some(path.into());
        self
    }

    /// Enable or disable IVC reduction routing.
    pub fn with_reduce_ivc(mut self, enabled: bool) -> Self {
        self.config.reduce_ivc = enabled;
        self
    }

    /// Enable or disable all-IVCs routing.
    pub fn with_all_ivcs(mut self, enabled: bool) -> Self {
        self.config.all_ivcs = enabled;
        self
    }

    /// Enable or disable the all-assigned projection flag.
    pub fn with_all_assigned(mut self, enabled: bool) -> Self {
        self.config.all_assigned = enabled;
        self
    }

    /// Set the run timeout, in seconds.
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.config.timeout = seconds;
        self
    }

    /// Enable or disable spreadsheet output.
    pub fn with_excel(mut self, enabled: bool) -> Self {
        self.config.excel = enabled;
        self
    }

    /// Enable or disable XML output.
    pub fn with_xml(mut self, enabled: bool) -> Self {
        self.config.xml = enabled;
        self
    }

    /// Enable or disable streaming XML to stdout.
    pub fn with_xml_to_stdout(mut self, enabled: bool) -> Self {
        self.config.xml_to_stdout = enabled;
        self
    }

    /// Enable or disable embedded (mini-jkind) mode.
    pub fn with_mini_jkind(mut self, enabled: bool) -> Self {
        self.config.mini_jkind = enabled;
        self
    }

    /// Set the base filename for file-backed writers.
    pub fn with_filename(mut self, filename: impl Into<PathBuf>) -> Self {
        self.config.filename = Some(filename.into());
        self
    }

    /// Validate and build the configuration.
    pub fn build(self) -> Result<DirectorConfig, DirectorError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = DirectorConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.bounded_model_checking);
        assert!(!config.pdr_enabled());
    }

    #[test]
    fn test_pdr_enabled_threshold() {
        let config = DirectorConfig::builder().with_pdr_max(1).build().unwrap();
        assert!(config.pdr_enabled());

        let config = DirectorConfig::builder().with_pdr_max(0).build();
        // pdr_max=0 alone with all other engines off is invalid (no engine enabled),
        // so disable implicitly by relying on the default bmc=true branch instead.
        assert!(config.is_ok());
    }

    #[test]
    fn test_requires_at_least_one_engine() {
        let result = DirectorConfig::builder()
            .with_bounded_model_checking(false)
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_excel_requires_filename() {
        let result = DirectorConfig::builder().with_excel(true).build();
        assert!(result.is_err());

        let result = DirectorConfig::builder()
            .with_excel(true)
            .with_filename("report")
            .build();
        assert!(result.is_ok());
    }

    #[test]
    fn test_xml_and_xml_to_stdout_mutually_exclusive() {
        let result = DirectorConfig::builder()
            .with_xml(true)
            .with_xml_to_stdout(true)
            .with_filename("report")
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_all_ivcs_requires_reduce_ivc() {
        let result = DirectorConfig::builder().with_all_ivcs(true).build();
        assert!(result.is_err());

        let result = DirectorConfig::builder()
            .with_reduce_ivc(true)
            .with_all_ivcs(true)
            .build();
        assert!(result.is_ok());
    }

    #[test]
    fn test_builder_multiple_options() {
        let config = DirectorConfig::builder()
            .with_k_induction(true)
            .with_pdr_max(3)
            .with_timeout(60)
            .build()
            .unwrap();
        assert!(config.k_induction);
        assert_eq!(config.pdr_max, 3);
        assert_eq!(config.timeout, 60);
    }

    #[test]
    fn test_serialization_round_trip() {
        let config = DirectorConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: DirectorConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config.timeout, deserialized.timeout);
    }
}
