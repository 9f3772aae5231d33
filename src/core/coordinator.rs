//! Search and category filtering over the menu cache.
//!
//! The coordinator runs as a single tokio task. Keystrokes are debounced
//! (trailing edge), category toggles re-query immediately, and every query
//! carries a sequence number so only the latest one may publish results.

use std::time::Duration;

use futures::{StreamExt, future::BoxFuture, stream::FuturesUnordered};
use tokio::{
    sync::{mpsc, oneshot, watch},
    time::{Instant, sleep_until},
};
use tracing::{debug, warn};

use crate::{
    core::{
        db::{MenuItem, MenuRepository},
        grouping::{SectionGroup, group_by_category},
    },
    error::{ErrorKind, MenuError},
};

pub const DEFAULT_CATEGORIES: [&str; 3] = ["starters", "mains", "desserts"];
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryPhase {
    Idle,
    PendingDebounce,
    Querying,
    Ready,
}

/// Published to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuEvent {
    ResultsChanged(Vec<SectionGroup>),
    Error { kind: ErrorKind, message: String },
}

/// Committed search text plus one on/off switch per category.
#[derive(Debug, Clone)]
pub struct QueryState {
    search_text: String,
    categories: Vec<String>,
    selections: Vec<bool>,
}

impl QueryState {
    pub fn new(categories: Vec<String>) -> Self {
        let selections = vec![false; categories.len()];
        Self {
            search_text: String::new(),
            categories,
            selections,
        }
    }

    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    pub fn toggle(&mut self, index: usize) -> Result<(), MenuError> {
        let count = self.selections.len();
        match self.selections.get_mut(index) {
            Some(selected) => {
                *selected = !*selected;
                Ok(())
            }
            None => Err(MenuError::InvalidInput(format!(
                "category index {index} out of range (have {count} categories)"
            ))),
        }
    }

    /// Categories explicitly switched on.
    pub fn active_categories(&self) -> Vec<&str> {
        self.categories
            .iter()
            .zip(&self.selections)
            .filter(|(_, selected)| **selected)
            .map(|(category, _)| category.as_str())
            .collect()
    }

    /// Categories to pass to the store. Nothing switched on means every category.
    pub fn resolved_categories(&self) -> Vec<String> {
        let active = self.active_categories();
        if active.is_empty() {
            self.categories.clone()
        } else {
            active.into_iter().map(str::to_string).collect()
        }
    }
}

#[derive(Debug, Clone)]
pub struct CoordinatorConfig {
    pub debounce: Duration,
    pub categories: Vec<String>,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
            categories: DEFAULT_CATEGORIES.iter().map(|c| c.to_string()).collect(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("query coordinator has stopped")]
pub struct CoordinatorStopped;

enum Command {
    SearchText(String),
    ToggleCategory(usize),
    Settled(oneshot::Sender<()>),
}

/// Input side of a running coordinator. The task stops once every handle is dropped.
#[derive(Debug, Clone)]
pub struct CoordinatorHandle {
    commands: mpsc::UnboundedSender<Command>,
    phase: watch::Receiver<QueryPhase>,
}

impl CoordinatorHandle {
    pub fn search_text_changed(&self, text: impl Into<String>) -> Result<(), CoordinatorStopped> {
        self.send(Command::SearchText(text.into()))
    }

    pub fn category_toggled(&self, index: usize) -> Result<(), CoordinatorStopped> {
        self.send(Command::ToggleCategory(index))
    }

    pub fn phase(&self) -> QueryPhase {
        *self.phase.borrow()
    }

    /// Resolves once no debounce is pending and the latest query has completed.
    pub async fn settled(&self) -> Result<(), CoordinatorStopped> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::Settled(tx))?;
        rx.await.map_err(|_| CoordinatorStopped)
    }

    fn send(&self, command: Command) -> Result<(), CoordinatorStopped> {
        self.commands.send(command).map_err(|_| CoordinatorStopped)
    }
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Command::SearchText(text) => f.debug_tuple("SearchText").field(text).finish(),
            Command::ToggleCategory(index) => f.debug_tuple("ToggleCategory").field(index).finish(),
            Command::Settled(_) => f.write_str("Settled"),
        }
    }
}

pub struct QueryCoordinator<S> {
    store: S,
    state: QueryState,
    debounce: Duration,
    has_results: bool,
}

impl<S> QueryCoordinator<S>
where
    S: MenuRepository + Clone + Send + 'static,
{
    pub fn new(store: S, config: CoordinatorConfig) -> Self {
        Self {
            store,
            state: QueryState::new(config.categories),
            debounce: config.debounce,
            has_results: false,
        }
    }

    /// Start in `Ready`, for use after cold start has already published results.
    pub fn mark_ready(mut self) -> Self {
        self.has_results = true;
        self
    }

    /// Run the coordinator on the current tokio runtime.
    pub fn spawn(self) -> (CoordinatorHandle, mpsc::UnboundedReceiver<MenuEvent>) {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let initial_phase = if self.has_results {
            QueryPhase::Ready
        } else {
            QueryPhase::Idle
        };
        let (phase_tx, phase_rx) = watch::channel(initial_phase);

        let worker = Worker {
            store: self.store,
            state: self.state,
            debounce: self.debounce,
            has_results: self.has_results,
            pending_text: None,
            deadline: None,
            issued_seq: 0,
            awaiting_latest: false,
            in_flight: FuturesUnordered::new(),
            settle_waiters: Vec::new(),
            phase: phase_tx,
            events: event_tx,
        };
        tokio::spawn(worker.run(command_rx));

        (
            CoordinatorHandle {
                commands: command_tx,
                phase: phase_rx,
            },
            event_rx,
        )
    }
}

type QueryFuture = BoxFuture<'static, (u64, Result<Vec<MenuItem>, MenuError>)>;

struct Worker<S> {
    store: S,
    state: QueryState,
    debounce: Duration,
    has_results: bool,
    /// Typed text not yet committed by the debounce timer.
    pending_text: Option<String>,
    deadline: Option<Instant>,
    issued_seq: u64,
    awaiting_latest: bool,
    in_flight: FuturesUnordered<QueryFuture>,
    settle_waiters: Vec<oneshot::Sender<()>>,
    phase: watch::Sender<QueryPhase>,
    events: mpsc::UnboundedSender<MenuEvent>,
}

impl<S> Worker<S>
where
    S: MenuRepository + Clone + Send + 'static,
{
    async fn run(mut self, mut commands: mpsc::UnboundedReceiver<Command>) {
        loop {
            tokio::select! {
                biased;

                command = commands.recv() => match command {
                    Some(command) => self.handle_command(command),
                    None => break,
                },
                Some((seq, result)) = self.in_flight.next(), if !self.in_flight.is_empty() => {
                    self.apply(seq, result);
                }
                _ = sleep_until(self.deadline.unwrap_or_else(Instant::now)), if self.deadline.is_some() => {
                    self.debounce_elapsed();
                }
            }
            self.refresh_phase();
            self.notify_if_settled();
        }
        debug!("query coordinator stopped");
    }

    fn handle_command(&mut self, command: Command) {
        match command {
            Command::SearchText(text) => {
                self.pending_text = Some(text);
                self.deadline = Some(Instant::now() + self.debounce);
            }
            Command::ToggleCategory(index) => match self.state.toggle(index) {
                Ok(()) => self.issue_query(),
                Err(err) => self.report(err),
            },
            Command::Settled(waiter) => self.settle_waiters.push(waiter),
        }
    }

    fn debounce_elapsed(&mut self) {
        self.deadline = None;
        let Some(text) = self.pending_text.take() else {
            return;
        };
        if text == self.state.search_text {
            debug!("search text unchanged, skipping query");
            return;
        }
        self.state.search_text = text;
        self.issue_query();
    }

    fn issue_query(&mut self) {
        self.issued_seq += 1;
        self.awaiting_latest = true;

        let seq = self.issued_seq;
        let store = self.store.clone();
        let search = self.state.search_text.clone();
        let categories = self.state.resolved_categories();
        debug!(seq, search = %search, ?categories, "issuing menu query");

        self.in_flight.push(Box::pin(async move {
            let result = store.query(&search, &categories).await;
            (seq, result)
        }));
    }

    fn apply(&mut self, seq: u64, result: Result<Vec<MenuItem>, MenuError>) {
        if seq != self.issued_seq {
            debug!(seq, latest = self.issued_seq, "discarding stale query result");
            return;
        }
        self.awaiting_latest = false;

        match result {
            Ok(items) => {
                let groups = group_by_category(&items);
                debug!(seq, items = items.len(), sections = groups.len(), "query results ready");
                self.has_results = true;
                let _ = self.events.send(MenuEvent::ResultsChanged(groups));
            }
            // Previously published results stay on screen.
            Err(err) => self.report(err),
        }
    }

    fn report(&self, err: MenuError) {
        warn!(kind = %err.kind(), error = %err, "menu query failed");
        let _ = self.events.send(MenuEvent::Error {
            kind: err.kind(),
            message: err.to_string(),
        });
    }

    fn refresh_phase(&self) {
        let phase = if self.deadline.is_some() {
            QueryPhase::PendingDebounce
        } else if self.awaiting_latest {
            QueryPhase::Querying
        } else if self.has_results {
            QueryPhase::Ready
        } else {
            QueryPhase::Idle
        };
        self.phase.send_if_modified(|current| {
            let changed = *current != phase;
            *current = phase;
            changed
        });
    }

    fn notify_if_settled(&mut self) {
        if self.deadline.is_some() || self.awaiting_latest {
            return;
        }
        for waiter in self.settle_waiters.drain(..) {
            let _ = waiter.send(());
        }
    }
}
