use std::collections::HashMap;
use std::sync::Arc;

use halo_model::{ImageSet, SlotPhase};
use tokio::sync::{mpsc, watch};
use tokio::task::{self, JoinError, JoinHandle, JoinSet};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::view::ClusterView;
use crate::{
    error::{HaloError, Result},
    probe::{LoadOutcome, LoadProbe},
    slots::{BackoffExpired, RetryPolicy, SlotStore},
};

/// Handle to a running cluster.
///
/// A single background task owns the [`SlotStore`] and serialises every
/// event that touches it: probe outcomes, outcomes reported by the host and
/// backoff expiries. After each event the task publishes a fresh
/// [`ClusterView`] which can be read with [`view`](Self::view) or awaited
/// through [`subscribe`](Self::subscribe).
///
/// Dropping the handle stops the task; [`shutdown`](Self::shutdown) also
/// waits for it to finish.
#[derive(Debug)]
pub struct ClusterSession {
    commands: mpsc::UnboundedSender<Command>,
    view: watch::Receiver<ClusterView>,
    shutdown: CancellationToken,
    worker: Option<JoinHandle<()>>,
}

#[derive(Debug)]
enum Command {
    Replace(ImageSet),
    Report { slot: usize, outcome: LoadOutcome },
}

impl ClusterSession {
    /// Validate `set`, initialise one slot per image and start issuing load
    /// attempts through `probe`. Must be called from within a Tokio runtime.
    pub fn start(
        set: ImageSet,
        probe: Arc<dyn LoadProbe>,
        policy: RetryPolicy,
    ) -> Result<Self> {
        set.validate()?;

        let (commands_tx, commands_rx) = mpsc::unbounded_channel();
        let (expirations_tx, expirations_rx) = mpsc::unbounded_channel();
        let mut store = SlotStore::new(policy, expirations_tx);
        store.init(&set.images);

        let initial = ClusterView::project(&set, store.table().as_slice());
        let (view_tx, view_rx) = watch::channel(initial);
        let shutdown = CancellationToken::new();

        info!(
            name = %set.name,
            slots = set.slot_count(),
            max_retries = policy.max_retries,
            backoff = ?policy.backoff,
            "starting cluster session"
        );

        let worker = Worker {
            set,
            store,
            probe,
            attempts: JoinSet::new(),
            in_flight: HashMap::new(),
            view: view_tx,
        };
        let handle = tokio::spawn(worker.run(
            commands_rx,
            expirations_rx,
            shutdown.clone(),
        ));

        Ok(Self {
            commands: commands_tx,
            view: view_rx,
            shutdown,
            worker: Some(handle),
        })
    }

    /// The most recently published view.
    pub fn view(&self) -> ClusterView {
        self.view.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ClusterView> {
        self.view.clone()
    }

    /// Swap in a new image set. Every slot restarts from scratch and timers
    /// armed for the previous set are cancelled.
    pub fn replace(&self, set: ImageSet) -> Result<()> {
        set.validate()?;
        self.send(Command::Replace(set))
    }

    /// Feed an outcome observed outside the session's own probe.
    pub fn report(&self, slot: usize, outcome: LoadOutcome) -> Result<()> {
        self.send(Command::Report { slot, outcome })
    }

    /// Stop the session, cancel outstanding timers and attempts, and wait for
    /// the background task to exit.
    pub async fn shutdown(mut self) -> Result<()> {
        self.shutdown.cancel();
        match self.worker.take() {
            Some(worker) => worker.await.map_err(|err| {
                HaloError::Internal(format!("cluster task failed: {err}"))
            }),
            None => Ok(()),
        }
    }

    fn send(&self, command: Command) -> Result<()> {
        self.commands.send(command).map_err(|_| {
            HaloError::Cancelled("cluster session has stopped".to_string())
        })
    }
}

impl Drop for ClusterSession {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

struct Worker {
    set: ImageSet,
    store: SlotStore,
    probe: Arc<dyn LoadProbe>,
    attempts: JoinSet<LoadOutcome>,
    /// Running attempts by task id. Cleared whenever the set is replaced,
    /// so an id missing here belongs to an aborted or superseded attempt.
    in_flight: HashMap<task::Id, usize>,
    view: watch::Sender<ClusterView>,
}

impl Worker {
    async fn run(
        mut self,
        mut commands: mpsc::UnboundedReceiver<Command>,
        mut expirations: mpsc::UnboundedReceiver<BackoffExpired>,
        shutdown: CancellationToken,
    ) {
        self.launch_pending();
        self.publish();

        loop {
            tokio::select! {
                biased;
                _ = shutdown.cancelled() => break,
                Some(command) = commands.recv() => self.handle_command(command),
                Some(expired) = expirations.recv() => {
                    if self.store.on_backoff_elapsed(expired) {
                        self.launch(expired.slot);
                    }
                }
                Some(joined) = self.attempts.join_next_with_id(),
                    if !self.attempts.is_empty() => self.settle(joined),
                else => break,
            }
            self.publish();
        }

        self.attempts.abort_all();
        self.in_flight.clear();
        self.store.teardown();
        info!(name = %self.set.name, "cluster session stopped");
    }

    fn handle_command(&mut self, command: Command) {
        match command {
            Command::Replace(set) => {
                self.attempts.abort_all();
                self.in_flight.clear();
                self.store.init(&set.images);
                info!(
                    name = %set.name,
                    slots = set.slot_count(),
                    "image set replaced"
                );
                self.set = set;
                self.launch_pending();
            }
            Command::Report { slot, outcome } => self.record(slot, outcome),
        }
    }

    /// Feed a finished attempt back into the store. A panicked attempt
    /// counts as a failed load so the slot stays inside its retry budget.
    fn settle(
        &mut self,
        joined: std::result::Result<(task::Id, LoadOutcome), JoinError>,
    ) {
        let (id, outcome) = match joined {
            Ok(done) => done,
            Err(err) if err.is_cancelled() => {
                self.in_flight.remove(&err.id());
                return;
            }
            Err(err) => {
                warn!(error = %err, "load attempt panicked");
                (err.id(), LoadOutcome::Failed)
            }
        };

        let Some(slot) = self.in_flight.remove(&id) else {
            debug!(task = %id, "discarding outcome from replaced set");
            return;
        };
        self.record(slot, outcome);
    }

    fn record(&mut self, slot: usize, outcome: LoadOutcome) {
        match outcome {
            LoadOutcome::Succeeded => self.store.on_load_succeeded(slot),
            LoadOutcome::Failed => self.store.on_load_failed(slot),
        };
    }

    fn launch_pending(&mut self) {
        for slot in 0..self.set.images.len() {
            self.launch(slot);
        }
    }

    /// Issue a probe for `slot` if its descriptor is loadable, the slot is
    /// pending and no attempt for it is already running.
    fn launch(&mut self, slot: usize) {
        let Some(descriptor) = self.set.images.get(slot) else {
            return;
        };
        let pending = self
            .store
            .table()
            .get(slot)
            .is_some_and(|state| state.phase() == SlotPhase::Pending);
        let running = self.in_flight.values().any(|&busy| busy == slot);
        if !descriptor.is_loadable() || !pending || running {
            return;
        }

        let probe = Arc::clone(&self.probe);
        let locator = descriptor.locator.clone();
        debug!(slot, %locator, "issuing load attempt");

        let handle = self
            .attempts
            .spawn(async move { probe.probe(&locator).await });
        self.in_flight.insert(handle.id(), slot);
    }

    fn publish(&self) {
        let next =
            ClusterView::project(&self.set, self.store.table().as_slice());
        self.view.send_if_modified(|current| {
            if *current == next {
                false
            } else {
                *current = next;
                true
            }
        });
    }
}
