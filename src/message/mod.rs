//! The inter-engine message taxonomy and itinerary routing (ยง4.1).

pub mod types;

pub use types::{Destination, Invariant, Itinerary, Ivc, Message, Model};
