//! # mc-director - Coordination core for a parallel model-checking tool
//!
//! Spawns several independent proof engines (bounded model checking,
//! k-induction, property-directed reachability, invariant generation,
//! counterexample smoothing, advice ingestion, minimal
//! inductive-validity-core reduction, all-IVCs extraction), lets them
//! run concurrently against the same analysis specification, and
//! arbitrates their findings by transforming a live property roster and
//! emitting status events to an output writer.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use mc_director::config::DirectorConfig;
//! use mc_director::director::{Director, EngineFactory};
//! use mc_director::engine::Engine;
//! use mc_director::util::{PropertyName, Source};
//! use mc_director::writer::ConsoleWriter;
//!
//! struct MyEngines;
//! impl EngineFactory for MyEngines {
//!     fn build(&self, source: Source) -> Option<Box<dyn Engine>> {
//!         // Construct the concrete engine for `source`; out of scope here.
//!         None
//!     }
//! }
//!
//! # async fn run() -> Result<(), mc_director::error::DirectorError> {
//! let config = DirectorConfig::builder().with_k_induction(true).build()?;
//! let (mut director, _advice) = Director::new(
//!     config,
//!     vec![PropertyName::new("p1")],
//!     vec![],
//!     Box::new(ConsoleWriter::new()),
//!     None,
//!     None,
//! )
//! .await?;
//! director.start(&MyEngines);
//! let exit_code = director.run().await;
//! std::process::exit(exit_code.as_i32());
//! # }
//! ```
//!
//! # Architecture
//!
//! - [`message`] - the closed inter-engine message taxonomy and itinerary routing
//! - [`engine`] - the `Engine` contract and the Director-side `EngineHandle`
//! - [`writer`] - the output-sink contract and its concrete/no-op backends
//! - [`advice`] - persisted invariants/IVCs reusable across runs
//! - [`roster`] - the property roster and per-engine unknown trackers
//! - [`shutdown`] - the idempotent post-processing guard
//! - [`director`] - the coordination core itself
//! - [`config`] - validated run configuration
//! - [`error`] - the `DirectorError` taxonomy
//! - [`util`] - small identifier and naming types
//!
//! # Standards Compliance
//!
//! - 3-layer import organization (std -> third-party -> internal)
//! - `chrono::DateTime<Utc>` for all timestamps
//! - `tracing` for operational telemetry, never `println!`/`eprintln!`
//! - Generic constraints preferred over `dyn` trait objects, except at
//!   the one seam (the engine set) documented in [`engine::traits`]

pub mod advice;
pub mod config;
pub mod counterexample;
pub mod director;
pub mod engine;
pub mod error;
pub mod ivc_projection;
pub mod message;
pub mod roster;
pub mod shutdown;
pub mod stdin_probe;
pub mod util;
pub mod writer;

pub use config::DirectorConfig;
pub use director::{Director, EngineFactory, ExitCode};
pub use error::DirectorError;
pub use message::{Destination, Invariant, Itinerary, Ivc, Message, Model};
pub use util::{PropertyName, Source};
