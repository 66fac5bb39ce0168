//! IVC right-side projection (§4.4.1 step 4, §1 Out of scope).
//!
//! Projecting an inductive-validity core onto the right-hand side of
//! the analysis node's equations requires the parsed analysis form,
//! which is out of scope here (§1: "parsing the input specification and
//! translating it into the analysis form"). This is the pure
//! external-collaborator function the Director calls when `reduce_ivc`
//! is set on a non-embedded run (§9: the embedded case observed-skips
//! this step verbatim).

// Layer 1/2: none

// Layer 3: Internal
use crate::message::Ivc;

/// Project `ivc` onto the right-hand side of the analysis node's
/// equations. `all_assigned` selects whether every assigned variable is
/// eligible for the projection or only declared outputs; both are
/// properties of the analysis form this crate does not parse, so the
/// flag is carried through unused by this stub.
pub fn project_right_side(ivc: &Ivc, _all_assigned: bool) -> Ivc {
    ivc.clone()
}
