//! Director-level error types.

// Layer 1: Standard library
// (none)

// Layer 2: Third-party
use thiserror::Error;

// Layer 3: Internal
use crate::util::Source;

/// Errors the Director core must distinguish (ยง7 Error Handling Design).
///
/// Follows the workspace's canonical-struct pattern: structured variants
/// plus `is_transient`/`is_fatal`/`is_recoverable` helper predicates so
/// callers can branch on error category without matching every variant.
#[derive(Error, Debug)]
pub enum DirectorError {
    /// The configured writer failed to open. Fatal at construction time.
    #[error("writer failed to open: {0}")]
    WriterOpenFailed(String),

    /// An engine recorded a fatal error on its task.
    #[error("engine {source} reported a fatal error: {message}")]
    EngineFatal {
        /// Which engine failed.
        source: Source,
        /// The engine's own error text.
        message: String,
    },

    /// The IVC subsystem's subclass of `EngineFatal`, detected by
    /// substring match on the rendered message (ยง9 Open Questions: a
    /// typed channel would be strictly better, but the observed
    /// behavior is preserved verbatim).
    #[error("IVC subsystem reported a fatal error: {message}")]
    IvcFatal {
        /// The engine's own error text.
        message: String,
    },

    /// `DirectorConfig::build()` validation failure.
    #[error("configuration error: {0}")]
    ConfigError(String),

    /// Advice file read/write failure.
    #[error("advice I/O error: {0}")]
    AdviceIoError(String),

    /// The shutdown hook and the supervision loop's own post-processing
    /// both attempted to run. Guarded against by construction (ยง4.5);
    /// this variant exists for the defensive branch and is normally
    /// unreachable.
    #[error("shutdown coordinator raced the supervision loop's post-processing")]
    ShutdownRace,
}

/// Substring that marks an engine-fatal message as IVC-specific.
///
/// The original system distinguishes the IVC exit code from a generic
/// engine-fatal exit code by string matching rather than a typed error
/// channel (ยง9 Open Questions); this constant is the one match point.
pub const IVC_FATAL_MARKER: &str = "IVC";

impl DirectorError {
    /// Build an `EngineFatal`, automatically upgrading to `IvcFatal` when
    /// the message text identifies the IVC subsystem.
    pub fn engine_fatal(source: Source, message: impl Into<String>) -> Self {
        let message = message.into();
        if source == Source::IvcReduction || source == Source::AllIvcs || message.contains(IVC_FATAL_MARKER) {
            DirectorError::IvcFatal { message }
        } else {
            DirectorError::EngineFatal { source, message }
        }
    }

    /// Transient errors are temporary conditions that may resolve with
    /// retry logic. None of the Director's own error kinds are
    /// transient -- they are all terminal conditions -- but the
    /// predicate is provided for interface symmetry with sibling crates.
    pub fn is_transient(&self) -> bool {
        false
    }

    /// Fatal errors indicate the Director cannot continue operating.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            DirectorError::WriterOpenFailed(_)
                | DirectorError::EngineFatal { .. }
                | DirectorError::IvcFatal { .. }
        )
    }

    /// Recoverable errors can be handled without stopping the Director.
    pub fn is_recoverable(&self) -> bool {
        !self.is_fatal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writer_open_failed_is_fatal() {
        let err = DirectorError::WriterOpenFailed("disk full".into());
        assert!(err.is_fatal());
        assert!(!err.is_recoverable());
        assert!(!err.is_transient());
    }

    #[test]
    fn test_config_error_is_recoverable() {
        let err = DirectorError::ConfigError("pdr_max must be >= 1".into());
        assert!(!err.is_fatal());
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_engine_fatal_from_plain_message() {
        let err = DirectorError::engine_fatal(Source::Bmc, "solver crashed");
        assert!(matches!(err, DirectorError::EngineFatal { .. }));
        assert!(err.is_fatal());
    }

    #[test]
    fn test_engine_fatal_upgrades_to_ivc_by_source() {
        let err = DirectorError::engine_fatal(Source::IvcReduction, "minimization failed");
        assert!(matches!(err, DirectorError::IvcFatal { .. }));
    }

    #[test]
    fn test_engine_fatal_upgrades_to_ivc_by_message_marker() {
        let err = DirectorError::engine_fatal(Source::Pdr, "IVC extraction timed out");
        assert!(matches!(err, DirectorError::IvcFatal { .. }));
    }

    #[test]
    fn test_display_contains_source_name() {
        let err = DirectorError::EngineFatal {
            source: Source::Pdr,
            message: "oops".into(),
        };
        let text = err.to_string();
        assert!(text.contains("PDR"));
        assert!(text.contains("oops"));
    }
}
