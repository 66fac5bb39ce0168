//! Small identifier and naming types shared across the Director.

pub mod ids;

pub use ids::{PropertyName, Source};
