//! The closed message taxonomy (ยง4.1) and itinerary routing.

// Layer 1: Standard library
use std::collections::VecDeque;

// Layer 2: Third-party
use serde::{Deserialize, Serialize};

// Layer 3: Internal
use crate::util::{PropertyName, Source};

/// A learned invariant, carried opaquely between engines and the advice
/// writer. Invariant *generation* is out of scope (ยง1); the Director
/// only ever forwards this text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invariant(pub String);

/// A minimal inductive-validity core: the subset of model equation names
/// sufficient to prove a property. IVC computation is out of scope; the
/// Director only forwards and, when configured, projects this list.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Ivc(pub Vec<String>);

/// An opaque solver model attached to `Invalid`/`InductiveCounterexample`
/// messages. Counterexample extraction and model reconstruction are out
/// of scope (ยง1) and consumed through two pure functions (see
/// `crate::counterexample`); the Director never inspects the contents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Model(pub serde_json::Value);

/// An ordered routing destination a routable message still has to visit
/// before it is terminal for the Director.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Destination {
    /// Minimal inductive-validity-core reduction.
    IvcReduction,
    /// All-IVCs extraction, visited after IVC reduction.
    IvcReductionAll,
    /// Counterexample smoothing.
    Smoothing,
}

/// An ordered, immutable sequence of further engine destinations
/// attached to a routable message (ยง4.1).
///
/// `next_destination` inspects the head without consuming it, matching
/// the observed contract: a handler that sees a non-empty itinerary
/// must forward the message without mutating roster state, and only
/// popping the head (via `advance`) makes progress toward termination.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Itinerary(VecDeque<Destination>);

impl Itinerary {
    /// An empty itinerary: the message is already terminal.
    pub fn empty() -> Self {
        Self(VecDeque::new())
    }

    /// Build an itinerary from an ordered list of destinations.
    pub fn new(destinations: impl IntoIterator<Item = Destination>) -> Self {
        Self(destinations.into_iter().collect())
    }

    /// The next destination, without consuming it.
    pub fn next_destination(&self) -> Option<Destination> {
        self.0.front().copied()
    }

    /// `true` iff there is no remaining destination, i.e. the owning
    /// message is terminal for the Director.
    pub fn is_terminal(&self) -> bool {
        self.0.is_empty()
    }

    /// Consume the head destination, returning the itinerary that
    /// remains after the message is forwarded.
    pub fn advance(mut self) -> Self {
        self.0.pop_front();
        self
    }
}

/// The closed sum type of inter-engine events (ยง4.1).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Message {
    /// A set of properties proven valid at depth `k`.
    Valid {
        /// The engine that produced this verdict.
        source: Source,
        /// Properties proven valid by this message.
        properties: Vec<PropertyName>,
        /// The depth at which validity was proven.
        k: u32,
        /// Wall-clock proof time, in seconds.
        proof_time: f64,
        /// Invariants learned in the course of the proof.
        invariants: Vec<Invariant>,
        /// The inductive-validity core, if computed.
        ivc: Option<Ivc>,
        /// The all-IVCs result, if computed.
        all_ivcs: Option<Vec<Ivc>>,
        /// Whether minimal-IVC computation timed out.
        mivc_timed_out: bool,
        /// Remaining routing destinations.
        itinerary: Itinerary,
    },
    /// Properties refuted with a counterexample of the given length.
    Invalid {
        /// The engine that produced this verdict.
        source: Source,
        /// Properties refuted by this message.
        properties: Vec<PropertyName>,
        /// Counterexample length.
        length: u32,
        /// The solver model backing the counterexample.
        model: Model,
        /// Remaining routing destinations.
        itinerary: Itinerary,
    },
    /// A counterexample to k-induction that does not refute the
    /// property; purely informational.
    InductiveCounterexample {
        /// Properties this counterexample applies to.
        properties: Vec<PropertyName>,
        /// Counterexample length.
        length: u32,
        /// The solver model backing the counterexample.
        model: Model,
    },
    /// The named engine gave up on these properties at the current base
    /// step.
    Unknown {
        /// The engine giving up (or `Source::Director` on re-broadcast).
        source: Source,
        /// Properties the engine has abandoned.
        properties: Vec<PropertyName>,
    },
    /// BMC reached depth `step` without refutation for the named
    /// properties.
    BaseStep {
        /// The new base step.
        step: u32,
        /// Properties that reached this depth.
        properties: Vec<PropertyName>,
    },
    /// Invariants learned and broadcast for cross-engine reuse.
    Invariant {
        /// The learned invariants.
        invariants: Vec<Invariant>,
    },
}

impl Message {
    /// The source engine, for message kinds that carry one.
    pub fn source(&self) -> Option<Source> {
        match self {
            Message::Valid { source, .. }
            | Message::Invalid { source, .. }
            | Message::Unknown { source, .. } => Some(*source),
            Message::InductiveCounterexample { .. }
            | Message::BaseStep { .. }
            | Message::Invariant { .. } => None,
        }
    }

    /// A short tag used in log lines; never parsed by tests.
    pub fn kind(&self) -> &'static str {
        match self {
            Message::Valid { .. } => "Valid",
            Message::Invalid { .. } => "Invalid",
            Message::InductiveCounterexample { .. } => "InductiveCounterexample",
            Message::Unknown { .. } => "Unknown",
            Message::BaseStep { .. } => "BaseStep",
            Message::Invariant { .. } => "Invariant",
        }
    }
}
