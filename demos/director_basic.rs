//! Basic Director Example - Running a Coordination Loop to Completion
//!
//! Demonstrates constructing a `Director` with a console writer, spawning
//! a pair of toy engines, and running the supervision loop until every
//! property settles.
//!
//! # What You'll Learn
//!
//! - Constructing a `DirectorConfig` via its builder
//! - Implementing the `Engine` trait for a toy worker
//! - Implementing `EngineFactory` to wire engines into a `Director`
//! - Running `Director::run()` to completion and reading the exit code
//!
//! # Run This Example
//!
//! ```bash
//! cargo run --example director_basic
//! ```

use async_trait::async_trait;
use mc_director::config::DirectorConfig;
use mc_director::director::{Director, EngineFactory};
use mc_director::engine::{Engine, EngineContext};
use mc_director::error::DirectorError;
use mc_director::message::{Itinerary, Message};
use mc_director::util::{PropertyName, Source};
use mc_director::writer::ConsoleWriter;
use tracing_subscriber::EnvFilter;

/// A toy engine that immediately proves every property it is given.
struct ImmediateBmc {
    properties: Vec<PropertyName>,
}

#[async_trait]
impl Engine for ImmediateBmc {
    async fn run(self: Box<Self>, ctx: EngineContext) -> Result<(), DirectorError> {
        let message = Message::Valid {
            source: Source::Bmc,
            properties: self.properties,
            k: 1,
            proof_time: 0.01,
            invariants: vec![],
            ivc: None,
            all_ivcs: None,
            mivc_timed_out: false,
            itinerary: Itinerary::empty(),
        };
        let _ = ctx.outbox.send(message).await;
        Ok(())
    }
}

struct DemoEngines {
    properties: Vec<PropertyName>,
}

impl EngineFactory for DemoEngines {
    fn build(&self, source: Source) -> Option<Box<dyn Engine>> {
        match source {
            Source::Bmc => Some(Box::new(ImmediateBmc {
                properties: self.properties.clone(),
            })),
            _ => None,
        }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!("=== Basic Director Example ===\n");

    let properties = vec![PropertyName::new("p1"), PropertyName::new("p2")];
    let config = DirectorConfig::builder()
        .with_bounded_model_checking(true)
        .with_timeout(5)
        .build()
        .expect("valid configuration");

    let (mut director, _advice) = Director::new(
        config,
        properties.clone(),
        vec![],
        Box::new(ConsoleWriter::new()),
        None,
        None,
    )
    .await
    .expect("director constructs cleanly");

    director.start(&DemoEngines { properties });
    let exit_code = director.run().await;

    println!("\nexit code: {}", exit_code.as_i32());
}
