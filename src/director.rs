//! The Director: lifecycle, roster arbitration, message fan-out,
//! termination, and summary (§4.4).

// Layer 1: Standard library
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

// Layer 2: Third-party
use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

// Layer 3: Internal
use crate::advice::{Advice, AdviceReader, AdviceWriter};
use crate::config::{DirectorConfig, DEFAULT_POLL_INTERVAL_MS};
use crate::counterexample::extract_counterexample;
use crate::engine::{Engine, EngineHandle};
use crate::error::DirectorError;
use crate::ivc_projection::project_right_side;
use crate::message::{Destination, Invariant, Itinerary, Ivc, Message, Model};
use crate::roster::{InductiveCounterexamples, PropertyRoster, UnknownTrackers};
use crate::shutdown::ShutdownCoordinator;
use crate::stdin_probe;
use crate::util::{PropertyName, Source};
use crate::writer::Writer;

/// Capacity of the engines-into-Director mailbox.
const MAILBOX_CAPACITY: usize = 1024;

/// Fixed construction order for the configured engine set (§4.4 Startup).
const ENGINE_ORDER: [Source; 8] = [
    Source::Bmc,
    Source::KInduction,
    Source::InvariantGeneration,
    Source::Smoothing,
    Source::Pdr,
    Source::Advice,
    Source::IvcReduction,
    Source::AllIvcs,
];

/// Process exit codes (§6 External Interfaces).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// All properties settled or the run wound down without a fatal
    /// engine error. Timeout alone never changes this.
    Success,
    /// An engine reported a fatal error.
    EngineFatal,
    /// The IVC subsystem's subclass of `EngineFatal`.
    IvcFatal,
}

impl ExitCode {
    /// The process exit status this code maps to.
    pub fn as_i32(self) -> i32 {
        match self {
            ExitCode::Success => 0,
            ExitCode::EngineFatal => 1,
            ExitCode::IvcFatal => 2,
        }
    }
}

impl From<&DirectorError> for ExitCode {
    fn from(err: &DirectorError) -> Self {
        match err {
            DirectorError::IvcFatal { .. } => ExitCode::IvcFatal,
            _ => ExitCode::EngineFatal,
        }
    }
}

/// Builds the concrete engine for a given `Source`.
///
/// Engine algorithms are external collaborators (§1 Out of scope); the
/// Director owns the fixed construction order and the enable/disable
/// gating (§4.4 Startup), and calls out to a factory for the engine
/// values themselves. Returning `None` skips that engine even if its
/// corresponding configuration flag is set, which lets a factory that
/// does not implement a given engine degrade gracefully.
pub trait EngineFactory: Send + Sync {
    /// Build the engine for `source`, or `None` if this factory does
    /// not provide one.
    fn build(&self, source: Source) -> Option<Box<dyn Engine>>;
}

/// The coordination core (§4.4). Owns the property roster, the
/// per-engine unknown trackers, the inductive-counterexample map, the
/// writer, and the fixed set of spawned engines.
pub struct Director {
    config: DirectorConfig,
    roster: PropertyRoster,
    trackers: UnknownTrackers,
    inductive_counterexamples: InductiveCounterexamples,
    base_step: u32,
    start_time: DateTime<Utc>,
    writer: Box<dyn Writer>,
    advice_writer: Option<Box<dyn AdviceWriter>>,
    engines: Vec<EngineHandle>,
    mailbox_tx: mpsc::Sender<Message>,
    mailbox_rx: mpsc::Receiver<Message>,
    output_buffer: String,
    shutdown: ShutdownCoordinator,
    fatal_exit_code: Option<ExitCode>,
}

impl Director {
    /// Construct a Director: opens the writer, reads advice if
    /// configured, seeds the advice writer, and seeds the unknown
    /// trackers for every disabled engine (§4.4 Construction).
    ///
    /// Returns the constructed Director together with any advice read
    /// at startup, since applying learned invariants/IVCs to the
    /// concrete engines being constructed is the caller's
    /// responsibility (engine construction is out of scope, §1).
    pub async fn new(
        config: DirectorConfig,
        properties: Vec<PropertyName>,
        variable_declarations: Vec<String>,
        mut writer: Box<dyn Writer>,
        advice_reader: Option<Box<dyn AdviceReader>>,
        mut advice_writer: Option<Box<dyn AdviceWriter>>,
    ) -> Result<(Self, Option<Advice>), DirectorError> {
        writer.begin().await?;

        let advice = match advice_reader {
            Some(reader) => Some(reader.read().await?),
            None => None,
        };

        if let Some(aw) = advice_writer.as_mut() {
            aw.seed(variable_declarations);
        }

        let trackers = UnknownTrackers::new(&config, &properties);
        let roster = PropertyRoster::new(properties);
        let (mailbox_tx, mailbox_rx) = mpsc::channel(MAILBOX_CAPACITY);

        let director = Self {
            config,
            roster,
            trackers,
            inductive_counterexamples: InductiveCounterexamples::new(),
            base_step: 0,
            start_time: Utc::now(),
            writer,
            advice_writer,
            engines: Vec::new(),
            mailbox_tx,
            mailbox_rx,
            output_buffer: String::new(),
            shutdown: ShutdownCoordinator::new(),
            fatal_exit_code: None,
        };
        Ok((director, advice))
    }

    /// Construct the configured engine set in the fixed order and spawn
    /// one task per engine (§4.4 Startup).
    pub fn start(&mut self, factory: &dyn EngineFactory) {
        for source in ENGINE_ORDER {
            if !self.engine_enabled(source) {
                continue;
            }
            match factory.build(source) {
                Some(engine) => {
                    let handle = EngineHandle::spawn(source, engine, self.mailbox_tx.clone());
                    self.engines.push(handle);
                }
                None => {
                    warn!(engine = %source, "factory declined to build an enabled engine");
                }
            }
        }

        if !self.config.xml_to_stdout {
            self.output_buffer.push_str(&self.preamble());
        }
    }

    fn engine_enabled(&self, source: Source) -> bool {
        match source {
            Source::Bmc => self.config.bounded_model_checking,
            Source::KInduction => self.config.k_induction,
            Source::InvariantGeneration => self.config.invariant_generation,
            Source::Smoothing => self.config.smooth_counterexamples,
            Source::Pdr => self.config.pdr_enabled(),
            Source::Advice => {
                self.config.read_advice.is_some() || self.config.write_advice.is_some()
            }
            Source::IvcReduction => self.config.reduce_ivc,
            Source::AllIvcs => self.config.all_ivcs,
            Source::Director => false,
        }
    }

    fn preamble(&self) -> String {
        let total =
            self.roster.remaining().len() + self.roster.valid().len() + self.roster.invalid().len();
        format!(
            "director: analyzing {total} propert{} with {} engine(s)\n",
            if total == 1 { "y" } else { "ies" },
            self.engines.len(),
        )
    }

    fn summary(&self, runtime: f64) -> String {
        format!(
            "director: done in {runtime:.3}s -- valid={}, invalid={}, remaining={}\n",
            self.roster.valid().len(),
            self.roster.invalid().len(),
            self.roster.remaining().len(),
        )
    }

    /// Properties not yet settled. Exposed for snapshotting in tests
    /// and embedding callers; the Director itself is the only writer.
    pub fn remaining(&self) -> &[PropertyName] {
        self.roster.remaining()
    }

    /// Properties proven valid, in commit order.
    pub fn valid(&self) -> &[PropertyName] {
        self.roster.valid()
    }

    /// Properties proven invalid, in commit order.
    pub fn invalid(&self) -> &[PropertyName] {
        self.roster.invalid()
    }

    /// The elapsed time since construction, in seconds.
    fn runtime_seconds(&self) -> f64 {
        (Utc::now() - self.start_time).num_milliseconds() as f64 / 1000.0
    }

    fn timed_out(&self) -> bool {
        self.runtime_seconds() > self.config.timeout as f64
    }

    /// The itinerary a fresh `Valid` message should carry (§4.4.6).
    pub fn valid_message_itinerary(&self) -> Itinerary {
        let mut destinations = Vec::new();
        if self.config.reduce_ivc {
            destinations.push(Destination::IvcReduction);
        }
        if self.config.all_ivcs {
            destinations.push(Destination::IvcReductionAll);
        }
        Itinerary::new(destinations)
    }

    /// The itinerary a fresh `Invalid` message should carry (§4.4.6).
    pub fn invalid_message_itinerary(&self) -> Itinerary {
        let mut destinations = Vec::new();
        if self.config.smooth_counterexamples {
            destinations.push(Destination::Smoothing);
        }
        Itinerary::new(destinations)
    }

    /// Run the supervision loop to completion (§4.4 Supervision loop).
    ///
    /// Races the loop's own poll interval against an interrupt signal
    /// (`SIGINT`/ctrl-c) on every iteration (§4.5 Shutdown coordinator):
    /// whichever reaches termination first -- a tripped termination
    /// condition or the signal -- drives the single, `try_claim()`-gated
    /// call into `finish()`.
    pub async fn run(&mut self) -> ExitCode {
        let ctrl_c = tokio::signal::ctrl_c();
        tokio::pin!(ctrl_c);

        let exit_code = loop {
            self.drain_mailbox().await;
            if self.should_terminate() {
                break self.finish().await;
            }

            tokio::select! {
                _ = tokio::time::sleep(Duration::from_millis(DEFAULT_POLL_INTERVAL_MS)) => {}
                result = &mut ctrl_c => {
                    if let Err(err) = result {
                        warn!(error = %err, "ctrl_c signal handler failed");
                    }
                    info!("termination: interrupt signal");
                    break self.finish().await;
                }
            }
        };

        if self.config.mini_jkind {
            for engine in &self.engines {
                engine.stop();
            }
        }

        print!("{}", self.output_buffer);
        print!("{}", self.writer.rendered());

        exit_code
    }

    /// Claim post-processing exactly once and run it (§4.5). Reached
    /// either from the loop's own termination check or from the
    /// interrupt-signal branch in `run()`; the two call sites race, and
    /// [`ShutdownCoordinator`] arbitrates which one actually runs
    /// `post_process`.
    async fn finish(&mut self) -> ExitCode {
        // Drain once more to process any late messages before settling.
        self.drain_mailbox().await;

        if self.shutdown.try_claim() {
            self.post_process().await
        } else {
            error!("shutdown coordinator raced the supervision loop's post-processing");
            self.fatal_exit_code.unwrap_or(ExitCode::Success)
        }
    }

    fn should_terminate(&mut self) -> bool {
        if self.timed_out() {
            debug!("termination: timeout");
            return true;
        }
        if self.roster.is_empty_remaining() {
            debug!("termination: remaining empty");
            return true;
        }
        if !self.engines.is_empty() && self.engines.iter().all(|e| !e.is_alive()) {
            debug!("termination: no engine alive");
            return true;
        }

        let mut newly_fatal = None;
        for engine in &mut self.engines {
            let name = engine.name();
            if let Some(err) = engine.poll_fatal_error() {
                warn!(engine = %name, error = %err, "termination: engine fatal");
                newly_fatal = Some(ExitCode::from(err));
                break;
            }
        }
        if let Some(code) = newly_fatal {
            self.fatal_exit_code = Some(code);
        }
        if self.fatal_exit_code.is_some() {
            return true;
        }

        if stdin_probe::end_of_text_requested() {
            info!("termination: external cancel");
            return true;
        }

        false
    }

    async fn post_process(&mut self) -> ExitCode {
        let runtime = self.runtime_seconds();
        let remaining: Vec<PropertyName> = self.roster.remaining().to_vec();
        if !remaining.is_empty() {
            self.writer
                .write_unknown(&remaining, self.base_step, &self.inductive_counterexamples, runtime)
                .await;
            self.roster.drop_unknown(&remaining);
            for property in &remaining {
                self.inductive_counterexamples.remove(property);
            }
        }

        if let Err(err) = self.writer.end().await {
            error!(error = %err, "writer.end() failed during post-processing");
        }

        if let Some(aw) = self.advice_writer.as_mut() {
            if let Err(err) = aw.flush().await {
                warn!(error = %err, "advice writer flush failed");
            }
        }

        self.output_buffer.push_str(&self.summary(runtime));
        self.fatal_exit_code.unwrap_or(ExitCode::Success)
    }

    async fn drain_mailbox(&mut self) {
        while let Ok(message) = self.mailbox_rx.try_recv() {
            self.dispatch(message).await;
        }
    }

    async fn dispatch(&mut self, message: Message) {
        debug!(kind = message.kind(), "dispatch");
        match message {
            Message::Valid {
                source,
                properties,
                k,
                proof_time,
                invariants,
                ivc,
                all_ivcs,
                mivc_timed_out,
                itinerary,
            } => {
                self.handle_valid(
                    source,
                    properties,
                    k,
                    proof_time,
                    invariants,
                    ivc,
                    all_ivcs,
                    mivc_timed_out,
                    itinerary,
                )
                .await;
            }
            Message::Invalid {
                source: _,
                properties,
                length,
                model,
                itinerary,
            } => {
                self.handle_invalid(properties, length, model, itinerary).await;
            }
            Message::InductiveCounterexample {
                properties,
                length,
                model,
            } => {
                self.handle_inductive_counterexample(properties, length, model);
            }
            Message::Unknown { source, properties } => {
                self.handle_unknown(source, properties).await;
            }
            Message::BaseStep { step, properties } => {
                self.handle_base_step(step, properties).await;
            }
            Message::Invariant { invariants } => {
                self.handle_invariant(invariants);
            }
        }
    }

    /// §4.4.1.
    #[allow(clippy::too_many_arguments)]
    async fn handle_valid(
        &mut self,
        source: Source,
        properties: Vec<PropertyName>,
        k: u32,
        proof_time: f64,
        invariants: Vec<Invariant>,
        ivc: Option<Ivc>,
        all_ivcs: Option<Vec<Ivc>>,
        mivc_timed_out: bool,
        itinerary: Itinerary,
    ) {
        if let Some(next) = itinerary.next_destination() {
            if next == Destination::IvcReduction {
                if let Some(aw) = self.advice_writer.as_mut() {
                    for invariant in &invariants {
                        aw.append(invariant.clone());
                    }
                }
            }
            return;
        }

        let newly_valid = self.roster.intersect_remaining(&properties);
        if newly_valid.is_empty() {
            warn!(source = %source, "duplicate Valid absorbed");
            return;
        }

        self.roster.commit_valid(&newly_valid);
        for property in &newly_valid {
            self.inductive_counterexamples.remove(property);
        }

        if let Some(aw) = self.advice_writer.as_mut() {
            for invariant in &invariants {
                aw.append(invariant.clone());
            }
        }

        let reported_invariants = if self.config.reduce_ivc {
            invariants
        } else {
            Vec::new()
        };

        let (reported_ivc, reported_all_ivcs) = if self.config.reduce_ivc && !self.config.mini_jkind {
            let ivc = ivc.as_ref().map(|v| project_right_side(v, self.config.all_assigned));
            let all_ivcs = all_ivcs
                .as_ref()
                .map(|list| list.iter().map(|v| project_right_side(v, self.config.all_assigned)).collect());
            (ivc, all_ivcs)
        } else {
            (ivc, all_ivcs)
        };

        let runtime = self.runtime_seconds();
        self.writer
            .write_valid(
                &newly_valid,
                source,
                k,
                proof_time,
                runtime,
                &reported_invariants,
                reported_ivc.as_ref(),
                reported_all_ivcs.as_deref(),
                mivc_timed_out,
            )
            .await;
    }

    /// §4.4.2.
    async fn handle_invalid(
        &mut self,
        properties: Vec<PropertyName>,
        length: u32,
        model: Model,
        itinerary: Itinerary,
    ) {
        if !itinerary.is_terminal() {
            return;
        }

        let newly_invalid = self.roster.intersect_remaining(&properties);
        if newly_invalid.is_empty() {
            warn!("duplicate Invalid absorbed");
            return;
        }

        self.roster.commit_invalid(&newly_invalid);
        for property in &newly_invalid {
            self.inductive_counterexamples.remove(property);
        }

        let runtime = self.runtime_seconds();
        for property in &newly_invalid {
            let cex = extract_counterexample(&model, property, length);
            self.writer.write_invalid(property, cex.length, runtime).await;
        }
    }

    /// §4.4.3.
    fn handle_inductive_counterexample(
        &mut self,
        properties: Vec<PropertyName>,
        length: u32,
        model: Model,
    ) {
        let message = Message::InductiveCounterexample {
            properties: properties.clone(),
            length,
            model,
        };
        for property in &properties {
            self.inductive_counterexamples.insert(property.clone(), message.clone());
        }
    }

    /// §4.4.4.
    async fn handle_unknown(&mut self, source: Source, properties: Vec<PropertyName>) {
        if source == Source::Director {
            return;
        }

        match source {
            Source::Bmc => self.trackers.mark_bmc_unknown(&properties, self.base_step),
            Source::KInduction => self.trackers.mark_k_induction_unknown(&properties),
            Source::Pdr => self.trackers.mark_pdr_unknown(&properties),
            _ => {}
        }

        let groups = self.trackers.group_completely_unknown_by_base_step(&properties);
        for (base_step, group) in groups {
            let runtime = self.runtime_seconds();
            self.roster.drop_unknown(&group);
            self.writer
                .write_unknown(&group, base_step, &self.inductive_counterexamples, runtime)
                .await;
            for property in &group {
                self.inductive_counterexamples.remove(property);
            }
            self.broadcast(Message::Unknown {
                source: Source::Director,
                properties: group,
            })
            .await;
        }
    }

    /// §4.4.5.
    async fn handle_base_step(&mut self, step: u32, properties: Vec<PropertyName>) {
        self.base_step = step;
        if !properties.is_empty() {
            let runtime = self.runtime_seconds();
            self.writer.write_base_step(step, &properties, runtime).await;
        }
    }

    /// §4.4.8: logged no-op, per the recorded resolution of this open
    /// question (no snapshot or rebroadcast is invented here).
    fn handle_invariant(&self, invariants: Vec<Invariant>) {
        debug!(count = invariants.len(), "invariant broadcast received (no-op)");
    }

    /// §4.4.7: deliver to the Director's own handler, then to every
    /// engine's handler, in registration order.
    ///
    /// Returns a boxed future rather than a plain `async fn` because
    /// this method is itself called from within `dispatch` (via
    /// `handle_unknown`); a directly self-referential `async fn` here
    /// would make `dispatch`'s state machine infinitely sized.
    fn broadcast<'a>(&'a mut self, message: Message) -> Pin<Box<dyn Future<Output = ()> + Send + 'a>> {
        Box::pin(async move {
            self.dispatch(message.clone()).await;
            for engine in &self.engines {
                engine.deliver(message.clone()).await;
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::writer::NoopWriter;

    fn names(strs: &[&str]) -> Vec<PropertyName> {
        strs.iter().map(|s| PropertyName::new(*s)).collect()
    }

    struct NoEngines;
    impl EngineFactory for NoEngines {
        fn build(&self, _source: Source) -> Option<Box<dyn Engine>> {
            None
        }
    }

    async fn new_director(config: DirectorConfig, properties: Vec<PropertyName>) -> Director {
        let (director, _advice) = Director::new(
            config,
            properties,
            vec![],
            Box::new(NoopWriter),
            None,
            None,
        )
        .await
        .unwrap();
        director
    }

    #[tokio::test]
    async fn test_single_valid_commits_and_reports() {
        let config = DirectorConfig::builder().with_bounded_model_checking(true).build().unwrap();
        let mut director = new_director(config, names(&["p1", "p2"])).await;
        director.start(&NoEngines);

        director
            .dispatch(Message::Valid {
                source: Source::Bmc,
                properties: names(&["p1"]),
                k: 3,
                proof_time: 0.1,
                invariants: vec![],
                ivc: None,
                all_ivcs: None,
                mivc_timed_out: false,
                itinerary: Itinerary::empty(),
            })
            .await;

        assert_eq!(director.roster.valid(), names(&["p1"]).as_slice());
        assert_eq!(director.roster.remaining(), names(&["p2"]).as_slice());
    }

    #[tokio::test]
    async fn test_duplicate_valid_is_absorbed() {
        let config = DirectorConfig::builder().with_bounded_model_checking(true).build().unwrap();
        let mut director = new_director(config, names(&["p1"])).await;
        director.start(&NoEngines);

        let msg = || Message::Valid {
            source: Source::Bmc,
            properties: names(&["p1"]),
            k: 3,
            proof_time: 0.1,
            invariants: vec![],
            ivc: None,
            all_ivcs: None,
            mivc_timed_out: false,
            itinerary: Itinerary::empty(),
        };
        director.dispatch(msg()).await;
        director.dispatch(msg()).await;

        assert_eq!(director.roster.valid(), names(&["p1"]).as_slice());
        assert!(director.roster.is_empty_remaining());
    }

    #[tokio::test]
    async fn test_invalid_with_counterexample() {
        let config = DirectorConfig::builder().with_bounded_model_checking(true).build().unwrap();
        let mut director = new_director(config, names(&["p1"])).await;
        director.start(&NoEngines);

        director
            .dispatch(Message::Invalid {
                source: Source::Bmc,
                properties: names(&["p1"]),
                length: 2,
                model: Model(serde_json::json!({"x": 1})),
                itinerary: Itinerary::empty(),
            })
            .await;

        assert_eq!(director.roster.invalid(), names(&["p1"]).as_slice());
        assert!(director.roster.is_empty_remaining());
    }

    #[tokio::test]
    async fn test_completely_unknown_commit() {
        let config = DirectorConfig::builder()
            .with_bounded_model_checking(true)
            .with_k_induction(true)
            .with_pdr_max(1)
            .build()
            .unwrap();
        let mut director = new_director(config, names(&["p1"])).await;
        director.start(&NoEngines);

        director
            .dispatch(Message::BaseStep {
                step: 5,
                properties: names(&["p1"]),
            })
            .await;
        director
            .dispatch(Message::Unknown {
                source: Source::Bmc,
                properties: names(&["p1"]),
            })
            .await;
        assert!(!director.roster.is_empty_remaining());

        director
            .dispatch(Message::Unknown {
                source: Source::KInduction,
                properties: names(&["p1"]),
            })
            .await;
        assert!(!director.roster.is_empty_remaining());

        director
            .dispatch(Message::Unknown {
                source: Source::Pdr,
                properties: names(&["p1"]),
            })
            .await;
        assert!(director.roster.is_empty_remaining());
    }

    #[tokio::test]
    async fn test_itinerary_routing_blocks_roster_change() {
        let config = DirectorConfig::builder()
            .with_bounded_model_checking(true)
            .with_reduce_ivc(true)
            .with_all_ivcs(true)
            .build()
            .unwrap();
        let mut director = new_director(config, names(&["p1"])).await;
        director.start(&NoEngines);

        director
            .dispatch(Message::Valid {
                source: Source::Bmc,
                properties: names(&["p1"]),
                k: 1,
                proof_time: 0.0,
                invariants: vec![],
                ivc: None,
                all_ivcs: None,
                mivc_timed_out: false,
                itinerary: Itinerary::new([Destination::IvcReduction, Destination::IvcReductionAll]),
            })
            .await;

        assert!(director.roster.valid().is_empty());
        assert_eq!(director.roster.remaining(), names(&["p1"]).as_slice());
    }

    #[tokio::test]
    async fn test_timeout_sweep_reports_unknown_and_succeeds() {
        let config = DirectorConfig::builder()
            .with_bounded_model_checking(true)
            .with_timeout(0)
            .build()
            .unwrap();
        let mut director = new_director(config, names(&["p1", "p2"])).await;
        director.start(&NoEngines);

        let exit_code = director.run().await;
        assert_eq!(exit_code, ExitCode::Success);
        assert!(director.roster.is_empty_remaining());
    }

    #[tokio::test]
    async fn test_valid_and_invalid_message_itineraries() {
        let config = DirectorConfig::builder()
            .with_bounded_model_checking(true)
            .with_reduce_ivc(true)
            .with_smooth_counterexamples(true)
            .build()
            .unwrap();
        let director = new_director(config, names(&["p1"])).await;

        assert_eq!(
            director.valid_message_itinerary().next_destination(),
            Some(Destination::IvcReduction)
        );
        assert_eq!(
            director.invalid_message_itinerary().next_destination(),
            Some(Destination::Smoothing)
        );
    }
}
