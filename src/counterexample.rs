//! Counterexample extraction and model reconstruction (ยง1 Out of scope).
//!
//! These are external collaborators: the real extraction algorithm
//! walks the user-facing specification and the solver model to build a
//! step-by-step trace, a concern this crate does not implement. What
//! the Director depends on is the *shape* of that collaboration: two
//! pure functions it calls while handling `Invalid` (ยง4.4.2) and while
//! recording `InductiveCounterexample` (ยง4.4.3).

// Layer 1: Standard library
// (none)

// Layer 2: Third-party
use serde::{Deserialize, Serialize};

// Layer 3: Internal
use crate::message::Model;
use crate::util::PropertyName;

/// A concrete, per-property counterexample trace extracted from a
/// solver model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Counterexample {
    /// The property this trace refutes.
    pub property: PropertyName,
    /// Trace length (matches the `length` field of the originating
    /// `Invalid`/`InductiveCounterexample` message).
    pub length: u32,
    /// The raw model slice backing this trace, opaque to the Director.
    pub trace: serde_json::Value,
}

/// Extract a concrete counterexample for `property` from `model` at the
/// given `length`.
///
/// Pure function: no I/O, no mutation. The real implementation (out of
/// scope here) would walk the user-facing specification to resolve
/// variable names against the model's raw step encoding; this stub
/// carries the model slice through unchanged so the Director's handler
/// logic (ยง4.4.2) has a concrete value to forward to the writer.
pub fn extract_counterexample(
    model: &Model,
    property: &PropertyName,
    length: u32,
) -> Counterexample {
    Counterexample {
        property: property.clone(),
        length,
        trace: model.0.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extract_counterexample_carries_length_and_property() {
        let model = Model(json!({"x": [0, 1, 2]}));
        let property = PropertyName::new("p1");
        let cex = extract_counterexample(&model, &property, 3);
        assert_eq!(cex.property, property);
        assert_eq!(cex.length, 3);
        assert_eq!(cex.trace, json!({"x": [0, 1, 2]}));
    }
}
