// Layer 1: Standard library imports
use std::fmt::{self, Display};

// Layer 2: Third-party crate imports
use serde::{Deserialize, Serialize};

// Layer 3: Internal module imports
// (none)

/// Name of a property under analysis.
///
/// Properties are referred to by name throughout the roster and the
/// unknown trackers; this newtype keeps that name out of raw `String`
/// soup and gives it cheap `Clone`/`Hash`/`Display`.
///
/// # Example
/// ```rust
/// use mc_director::util::PropertyName;
///
/// let p = PropertyName::new("p1");
/// assert_eq!(p.as_str(), "p1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PropertyName(String);

impl PropertyName {
    /// Build a property name from anything string-like.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Borrow the underlying name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for PropertyName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for PropertyName {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for PropertyName {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Closed taxonomy of message sources: every configured engine, plus the
/// Director itself (used when the Director re-broadcasts a message, e.g.
/// a committed `Unknown` verdict).
///
/// Modeled as a closed enum rather than a free-form string because the
/// set of engines is fixed at startup (§4.4 Startup) and the Director
/// needs a reliable equality check to recognize and drop messages that
/// originated from itself (§4.4.4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Source {
    /// Bounded model checking.
    Bmc,
    /// k-induction.
    KInduction,
    /// Property-directed reachability.
    Pdr,
    /// Invariant generation.
    InvariantGeneration,
    /// Counterexample smoothing.
    Smoothing,
    /// Advice ingestion.
    Advice,
    /// Minimal inductive-validity-core reduction.
    IvcReduction,
    /// All-IVCs extraction.
    AllIvcs,
    /// The Director, used on self-sourced broadcasts.
    Director,
}

impl Source {
    /// Human-readable engine name, used in reports and log lines.
    pub fn name(&self) -> &'static str {
        match self {
            Source::Bmc => "BMC",
            Source::KInduction => "k-induction",
            Source::Pdr => "PDR",
            Source::InvariantGeneration => "invariant generation",
            Source::Smoothing => "smoothing",
            Source::Advice => "advice",
            Source::IvcReduction => "IVC reduction",
            Source::AllIvcs => "all-IVCs",
            Source::Director => "director",
        }
    }
}

impl Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_property_name_display() {
        let p = PropertyName::new("p1");
        assert_eq!(format!("{p}"), "p1");
    }

    #[test]
    fn test_property_name_equality() {
        assert_eq!(PropertyName::new("p1"), PropertyName::from("p1"));
        assert_ne!(PropertyName::new("p1"), PropertyName::new("p2"));
    }

    #[test]
    fn test_source_name() {
        assert_eq!(Source::Bmc.name(), "BMC");
        assert_eq!(Source::Director.name(), "director");
    }

    #[test]
    fn test_source_equality_is_self_check() {
        assert_eq!(Source::Director, Source::Director);
        assert_ne!(Source::Director, Source::Bmc);
    }
}
