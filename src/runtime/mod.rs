//! Local runtime: delivers addressed messages to vertex actors
//!
//! This is the process-local stand-in for the messaging substrate. For each
//! envelope it loads the actor's state, runs the function, commits the write
//! batch and forwards the egress record to the sink.
//!
//! # Ordering
//!
//! ```text
//!  records ─► Router ─► envelopes ─► shard = hash(address) % workers
//!                                        │
//!             ┌──────────────────────────┼──────────────────────────┐
//!             ▼                          ▼                          ▼
//!         shard 0                    shard 1          ...       shard N-1
//!   (bounded channel, FIFO)    (bounded channel, FIFO)
//! ```
//!
//! One address always maps to one shard and each shard drains its channel in
//! order, so an actor sees its messages in input order and never processes
//! two at once. Distinct actors run concurrently.

mod sink;

pub use sink::{EgressSink, JsonLinesSink, MemorySink, SinkError};

use crate::actor::{function_for, Address, Effects, Envelope};
use crate::config::RuntimeConfig;
use crate::models::EgressRecord;
use crate::router::Router;
use crate::store::{StateStore, StoreError};
use crate::wire::{IngressRecord, WireError};
use crossbeam_channel::{bounded, Sender};
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, trace, warn};

#[derive(Error, Debug)]
pub enum RuntimeError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Sink(#[from] SinkError),

    #[error(transparent)]
    Wire(#[from] WireError),

    #[error("runtime worker panicked")]
    WorkerPanicked,
}

/// Options for a [`Runtime::run`] pass
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Number of shards; 1 runs everything on the calling thread
    pub workers: usize,
    /// Envelopes buffered per shard
    pub channel_capacity: usize,
    /// Abort on the first malformed record instead of skipping it
    pub strict: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self::from(&RuntimeConfig::default())
    }
}

impl From<&RuntimeConfig> for RunConfig {
    fn from(config: &RuntimeConfig) -> Self {
        Self {
            workers: config.workers.max(1),
            channel_capacity: config.channel_capacity.max(1),
            strict: false,
        }
    }
}

/// Counters since the runtime was created
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RuntimeStats {
    pub messages_delivered: usize,
    pub state_writes: usize,
    pub egress_records: usize,
}

/// Outcome of one [`Runtime::run`] pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    pub records: usize,
    pub malformed: usize,
    pub messages_delivered: usize,
    pub state_writes: usize,
    pub egress_records: usize,
}

#[derive(Debug, Default)]
struct Counters {
    delivered: AtomicUsize,
    writes: AtomicUsize,
    egress: AtomicUsize,
}

pub struct Runtime {
    store: Arc<dyn StateStore>,
    sink: Arc<dyn EgressSink>,
    router: Router,
    counters: Counters,
}

impl Runtime {
    pub fn new(store: Arc<dyn StateStore>, sink: Arc<dyn EgressSink>, router: Router) -> Self {
        Self {
            store,
            sink,
            router,
            counters: Counters::default(),
        }
    }

    pub fn store(&self) -> &dyn StateStore {
        self.store.as_ref()
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    pub fn stats(&self) -> RuntimeStats {
        RuntimeStats {
            messages_delivered: self.counters.delivered.load(Ordering::Relaxed),
            state_writes: self.counters.writes.load(Ordering::Relaxed),
            egress_records: self.counters.egress.load(Ordering::Relaxed),
        }
    }

    /// Process one envelope: load, handle, commit, send.
    ///
    /// Callers must not deliver to the same address from two threads at once;
    /// [`run`](Self::run) upholds that through sharding.
    pub fn deliver(&self, envelope: &Envelope) -> Result<Effects, RuntimeError> {
        let address = &envelope.address;
        let function = function_for(address.function);

        let state = self.store.load(address)?;
        let effects = function.handle(address, &state, &envelope.message);

        if !effects.writes.is_empty() {
            self.store.commit(address, &effects.writes)?;
            self.counters
                .writes
                .fetch_add(effects.writes.len(), Ordering::Relaxed);
        }

        if let Some(record) = &effects.egress {
            self.sink.send(record.clone())?;
            self.counters.egress.fetch_add(1, Ordering::Relaxed);
        }

        self.counters.delivered.fetch_add(1, Ordering::Relaxed);
        trace!(
            address = %address,
            kind = envelope.message.kind(),
            writes = effects.writes.len(),
            "Delivered message"
        );

        Ok(effects)
    }

    /// Route one record and deliver its envelopes on the calling thread
    pub fn ingest(&self, record: &IngressRecord) -> Result<Vec<Effects>, RuntimeError> {
        self.router
            .route(record)
            .iter()
            .map(|envelope| self.deliver(envelope))
            .collect()
    }

    /// Deliver a query record and return the egress record it produced
    pub fn query(&self, record: &IngressRecord) -> Result<Option<EgressRecord>, RuntimeError> {
        Ok(self
            .ingest(record)?
            .into_iter()
            .find_map(|effects| effects.egress))
    }

    /// Process a stream of decoded records.
    ///
    /// Malformed records are skipped with a warning unless `config.strict`;
    /// read failures and store or sink errors always abort the run. After a
    /// store or sink error no further envelope is delivered on any shard,
    /// apart from deliveries already in progress on other shards.
    pub fn run<I>(&self, records: I, config: &RunConfig) -> Result<RunStats, RuntimeError>
    where
        I: IntoIterator<Item = Result<IngressRecord, WireError>>,
    {
        let before = self.stats();
        let mut intake = Intake::new(config.strict);

        if config.workers <= 1 {
            for record in records {
                if let Some(record) = intake.accept(record)? {
                    self.ingest(&record)?;
                }
            }
        } else {
            self.run_sharded(records, config, &mut intake)?;
        }

        self.sink.flush()?;

        let after = self.stats();
        let stats = RunStats {
            records: intake.records,
            malformed: intake.malformed,
            messages_delivered: after.messages_delivered - before.messages_delivered,
            state_writes: after.state_writes - before.state_writes,
            egress_records: after.egress_records - before.egress_records,
        };

        info!(
            "Processed {} records ({} malformed): {} messages, {} state writes, {} egress records",
            stats.records,
            stats.malformed,
            stats.messages_delivered,
            stats.state_writes,
            stats.egress_records
        );

        Ok(stats)
    }

    fn run_sharded<I>(
        &self,
        records: I,
        config: &RunConfig,
        intake: &mut Intake,
    ) -> Result<(), RuntimeError>
    where
        I: IntoIterator<Item = Result<IngressRecord, WireError>>,
    {
        let shards = config.workers;
        // Raised by the first failing worker; nothing is delivered after it
        let stop = AtomicBool::new(false);
        let stop = &stop;

        std::thread::scope(|scope| {
            let mut senders = Vec::with_capacity(shards);
            let mut handles = Vec::with_capacity(shards);

            for shard in 0..shards {
                let (tx, rx) = bounded::<Envelope>(config.channel_capacity);
                senders.push(tx);
                handles.push(scope.spawn(move || -> Result<usize, RuntimeError> {
                    let mut processed = 0usize;
                    for envelope in rx {
                        if stop.load(Ordering::Acquire) {
                            debug!(shard, processed, "Shard stopped after a failure elsewhere");
                            return Ok(processed);
                        }
                        if let Err(e) = self.deliver(&envelope) {
                            stop.store(true, Ordering::Release);
                            return Err(e);
                        }
                        processed += 1;
                    }
                    debug!(shard, processed, "Shard drained");
                    Ok(processed)
                }));
            }

            let fed = self.feed(records, &senders, intake, stop);

            // Closing the channels lets the workers finish
            drop(senders);

            let mut first_error = fed.err();
            for handle in handles {
                match handle.join() {
                    Ok(Ok(_)) => {}
                    Ok(Err(e)) => {
                        first_error.get_or_insert(e);
                    }
                    Err(_) => {
                        first_error.get_or_insert(RuntimeError::WorkerPanicked);
                    }
                }
            }

            match first_error {
                Some(e) => Err(e),
                None => Ok(()),
            }
        })
    }

    fn feed<I>(
        &self,
        records: I,
        senders: &[Sender<Envelope>],
        intake: &mut Intake,
        stop: &AtomicBool,
    ) -> Result<(), RuntimeError>
    where
        I: IntoIterator<Item = Result<IngressRecord, WireError>>,
    {
        for record in records {
            let Some(record) = intake.accept(record)? else {
                continue;
            };
            for envelope in self.router.route(&record) {
                if stop.load(Ordering::Acquire) {
                    return Ok(());
                }
                let shard = shard_for(&envelope.address, senders.len());
                if senders[shard].send(envelope).is_err() {
                    // The worker stopped on an error; it is reported on join
                    return Ok(());
                }
            }
        }
        Ok(())
    }
}

/// Stable shard index for an address
pub fn shard_for(address: &Address, shards: usize) -> usize {
    let mut hasher = rustc_hash::FxHasher::default();
    address.hash(&mut hasher);
    (hasher.finish() % shards.max(1) as u64) as usize
}

/// Decode-error policy and record counting for one run
struct Intake {
    strict: bool,
    records: usize,
    malformed: usize,
}

impl Intake {
    fn new(strict: bool) -> Self {
        Self {
            strict,
            records: 0,
            malformed: 0,
        }
    }

    fn accept(
        &mut self,
        record: Result<IngressRecord, WireError>,
    ) -> Result<Option<IngressRecord>, RuntimeError> {
        match record {
            Ok(record) => {
                self.records += 1;
                Ok(Some(record))
            }
            Err(e @ WireError::Malformed { .. }) if !self.strict => {
                warn!("Skipping {}", e);
                self.malformed += 1;
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }
}
