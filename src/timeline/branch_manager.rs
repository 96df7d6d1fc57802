use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};
use uuid::Uuid;

use super::navigator::{TimelineKey, TimelineNavigator};
use super::TimelineSource;
use crate::client::{ClientError, ClientResult};
use crate::domain::{Branch, BranchIndex, PathHistory};

/// Result of one load, tagged with the generation that requested it.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub generation: u64,
    pub path_history: PathHistory,
    pub branch_index: BranchIndex,
}

/// Handle for an issued load. Issuing a newer load cancels this one.
#[derive(Debug, Clone)]
pub struct LoadTicket {
    pub generation: u64,
    token: CancellationToken,
}

impl LoadTicket {
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

/// Loads path history and branches for one session, restores branches and
/// keeps the timeline navigator in step with the loaded path.
pub struct BranchManager<S> {
    source: S,
    session_id: Uuid,
    path_history: PathHistory,
    branch_index: BranchIndex,
    navigator: TimelineNavigator,
    issued: u64,
    applied: u64,
    in_flight: Option<CancellationToken>,
    last_error: Option<String>,
}

impl<S: TimelineSource> BranchManager<S> {
    pub fn new(source: S, session_id: Uuid) -> Self {
        let key = TimelineKey {
            session_id,
            path_version: 0,
        };

        BranchManager {
            source,
            session_id,
            path_history: PathHistory::default(),
            branch_index: BranchIndex::default(),
            navigator: TimelineNavigator::new(key, Vec::new()),
            issued: 0,
            applied: 0,
            in_flight: None,
            last_error: None,
        }
    }

    pub fn on_node_select(mut self, callback: impl FnMut(Uuid) + Send + 'static) -> Self {
        self.navigator = self.navigator.on_node_select(callback);
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn path_history(&self) -> &PathHistory {
        &self.path_history
    }

    pub fn branch_index(&self) -> &BranchIndex {
        &self.branch_index
    }

    pub fn navigator(&self) -> &TimelineNavigator {
        &self.navigator
    }

    pub fn navigator_mut(&mut self) -> &mut TimelineNavigator {
        &mut self.navigator
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Inactive branches in the order the backend returned them.
    pub fn list_branches(&self) -> &[Branch] {
        &self.branch_index.inactive_branches
    }

    /// Inactive branches, newest first.
    pub fn branches_by_recency(&self) -> Vec<&Branch> {
        let mut branches: Vec<&Branch> = self.branch_index.inactive_branches.iter().collect();
        branches.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        branches
    }

    /// Issue a new load generation, cancelling the one still in flight.
    pub fn begin_load(&mut self) -> LoadTicket {
        if let Some(previous) = self.in_flight.take() {
            previous.cancel();
        }

        self.issued += 1;
        let token = CancellationToken::new();
        self.in_flight = Some(token.clone());

        LoadTicket {
            generation: self.issued,
            token,
        }
    }

    /// Fetch both indexes for `ticket`. Borrows only the source so several
    /// loads may be outstanding at once.
    pub async fn fetch(source: &S, session_id: Uuid, ticket: LoadTicket) -> ClientResult<Snapshot> {
        let work = async {
            tokio::try_join!(
                source.fetch_path_history(session_id),
                source.fetch_branch_index(session_id)
            )
        };

        tokio::select! {
            biased;
            _ = ticket.token.cancelled() => Err(ClientError::Cancelled),
            result = work => {
                let (path_history, branch_index) = result?;
                Ok(Snapshot {
                    generation: ticket.generation,
                    path_history,
                    branch_index,
                })
            }
        }
    }

    /// Apply a snapshot unless a newer one was already applied. Returns
    /// whether it was applied.
    pub fn apply(&mut self, snapshot: Snapshot) -> bool {
        if snapshot.generation <= self.applied {
            debug!(
                generation = snapshot.generation,
                applied = self.applied,
                "Discarding stale timeline snapshot"
            );
            return false;
        }

        let key = TimelineKey {
            session_id: self.session_id,
            path_version: snapshot.path_history.path_version,
        };
        let path = snapshot.path_history.current_path.clone();
        if self.applied == 0 {
            self.navigator.reset(key, path);
        } else {
            self.navigator.sync(key, path);
        }

        self.path_history = snapshot.path_history;
        self.branch_index = snapshot.branch_index;
        self.applied = snapshot.generation;
        self.last_error = None;
        if snapshot.generation == self.issued {
            self.in_flight = None;
        }

        true
    }

    /// Reload path history and branches. On failure the previous state stays.
    pub async fn load_data(&mut self) -> ClientResult<()> {
        let ticket = self.begin_load();
        let generation = ticket.generation;

        match Self::fetch(&self.source, self.session_id, ticket).await {
            Ok(snapshot) => {
                self.apply(snapshot);
                Ok(())
            }
            Err(err) => {
                error!(
                    session_id = %self.session_id,
                    generation,
                    error = %err,
                    "Failed to load timeline"
                );
                if generation == self.issued {
                    self.in_flight = None;
                }
                self.last_error = Some(err.to_string());
                Err(err)
            }
        }
    }

    /// Make `branch_id` the active path, then reload. Navigation history of
    /// the superseded path is discarded.
    pub async fn restore_branch(&mut self, branch_id: Uuid) -> ClientResult<()> {
        if let Err(err) = self.source.restore_branch(self.session_id, branch_id).await {
            error!(
                session_id = %self.session_id,
                branch_id = %branch_id,
                error = %err,
                "Failed to restore branch"
            );
            self.last_error = Some(err.to_string());
            return Err(err);
        }

        info!(session_id = %self.session_id, branch_id = %branch_id, "Branch restored");
        self.navigator.clear_history();
        self.load_data().await
    }
}
