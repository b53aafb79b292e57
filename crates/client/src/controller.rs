//! Local request cache and the optimistic mutation discipline.
//!
//! Every admin-side mutation follows one shape: validate locally, mark the
//! row as updating, apply the hopeful value, call the server, then reconcile:
//! fold the server's echo in on success, restore the pre-change snapshot on
//! failure. Centralizing that here guarantees the revert behavior is uniform
//! instead of re-implemented per screen.

use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use helix_lifecycle::{Priority, Status};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::error::ApiError;
use crate::models::{NewRequest, Request, RequestUpdate};
use crate::service::RequestService;

/// Which list the store mirrors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListScope {
    /// The authenticated user's own requests.
    Mine,
    /// Every request (administrator).
    All,
}

/// Shared snapshot cache of requests plus per-row update markers.
///
/// The `updating` set is an advisory per-row lock: the presentation layer
/// disables the controls of a marked row, which is what keeps two mutations
/// for one request from ever being in flight together. Unmarked rows stay
/// fully interactive.
#[derive(Default)]
pub struct RequestStore {
    state: Mutex<StoreState>,
}

#[derive(Default)]
struct StoreState {
    requests: HashMap<i64, Request>,
    updating: HashSet<i64>,
    /// Bumped on detach; results captured under an older epoch are discarded
    /// instead of applied.
    epoch: u64,
}

impl RequestStore {
    /// All cached requests, most recently created first.
    pub async fn snapshot(&self) -> Vec<Request> {
        let state = self.state.lock().await;
        let mut requests: Vec<_> = state.requests.values().cloned().collect();
        requests.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        requests
    }

    /// The cached record for `id`, if loaded.
    pub async fn get(&self, id: i64) -> Option<Request> {
        self.state.lock().await.requests.get(&id).cloned()
    }

    /// Whether a mutation for `id` is in flight.
    pub async fn is_updating(&self, id: i64) -> bool {
        self.state.lock().await.updating.contains(&id)
    }
}

/// Mediates UI-initiated changes against the transition table and reconciles
/// optimistic local state with the server's authoritative response.
///
/// Mutations on distinct requests may run concurrently. There is no retry;
/// a failed mutation is re-initiated by the user.
#[derive(Clone)]
pub struct LifecycleController {
    service: RequestService,
    store: Arc<RequestStore>,
}

impl LifecycleController {
    #[must_use]
    pub fn new(service: RequestService) -> Self {
        Self {
            service,
            store: Arc::new(RequestStore::default()),
        }
    }

    /// The shared cache this controller reconciles into.
    #[must_use]
    pub fn store(&self) -> Arc<RequestStore> {
        Arc::clone(&self.store)
    }

    /// The underlying service, for reads with no local state (activity logs,
    /// profile).
    #[must_use]
    pub fn service(&self) -> &RequestService {
        &self.service
    }

    /// Stop applying pending results to the store.
    ///
    /// Called when the presenting view goes away. In-flight calls run to
    /// completion (the network request is not cancelled) but their results
    /// are discarded instead of applied to unmounted state.
    pub async fn detach(&self) {
        let mut state = self.store.state.lock().await;
        state.epoch += 1;
    }

    /// Re-fetch the full list and merge it into the store.
    ///
    /// Deterministic tie-break against in-flight work: an incoming record
    /// replaces the local one only when its `updated_at` is strictly newer,
    /// and rows with a mutation in flight always keep their local value
    /// until that mutation's own echo settles them. Rows absent from the
    /// fetch are dropped unless updating.
    pub async fn refresh(&self, scope: ListScope) -> Result<(), ApiError> {
        let epoch = self.store.state.lock().await.epoch;
        let incoming = match scope {
            ListScope::Mine => self.service.list_mine().await?,
            ListScope::All => self.service.list_all().await?,
        };

        let mut state = self.store.state.lock().await;
        if state.epoch != epoch {
            debug!(?scope, "discarding refresh results for a detached view");
            return Ok(());
        }

        let mut merged: HashMap<i64, Request> = HashMap::with_capacity(incoming.len());
        for request in incoming {
            let local = state.requests.get(&request.id);
            let keep_local = local.is_some_and(|local| {
                state.updating.contains(&request.id) || local.updated_at > request.updated_at
            });
            if keep_local {
                if let Some(local) = local {
                    merged.insert(local.id, local.clone());
                }
            } else {
                merged.insert(request.id, request);
            }
        }
        for id in &state.updating {
            if let Some(local) = state.requests.get(id) {
                merged.entry(*id).or_insert_with(|| local.clone());
            }
        }
        state.requests = merged;
        Ok(())
    }

    /// Create a request and cache the server's record.
    pub async fn create(&self, input: &NewRequest) -> Result<Request, ApiError> {
        let epoch = self.store.state.lock().await.epoch;
        let request = self.service.create(input).await?;
        let mut state = self.store.state.lock().await;
        if state.epoch == epoch {
            state.requests.insert(request.id, request.clone());
        }
        Ok(request)
    }

    /// Change a request's workflow status.
    ///
    /// Legality is checked against the transition table before any network
    /// traffic. An illegal target is rejected locally but surfaces through
    /// the same error path as a server rejection, so callers report both the
    /// same way. A self-transition is a successful no-op.
    pub async fn change_status(&self, id: i64, target: Status) -> Result<Request, ApiError> {
        let current = self.store.get(id).await.ok_or_else(|| not_loaded(id))?;
        if current.status == target {
            return Ok(current);
        }
        if !current.status.allows_transition_to(&target) {
            return Err(ApiError::IllegalTransition {
                from: current.status,
                to: target,
            });
        }

        let update = RequestUpdate::status(target.clone());
        self.reconcile(
            id,
            move |request| request.status = target,
            self.service.update(id, &update),
        )
        .await
    }

    /// Change a request's priority. Priorities carry no transition
    /// restrictions, so no table is consulted.
    pub async fn change_priority(&self, id: i64, target: Priority) -> Result<Request, ApiError> {
        let current = self.store.get(id).await.ok_or_else(|| not_loaded(id))?;
        if current.priority == target {
            return Ok(current);
        }

        let update = RequestUpdate::priority(target.clone());
        self.reconcile(
            id,
            move |request| request.priority = target,
            self.service.update(id, &update),
        )
        .await
    }

    /// Assign or unassign an administrator.
    ///
    /// No optimistic write: the client does not know the assignee's email
    /// until the echo arrives. The row is still marked while in flight.
    pub async fn assign(&self, id: i64, assignee: Option<i64>) -> Result<Request, ApiError> {
        self.reconcile(id, |_| {}, self.service.assign(id, assignee))
            .await
    }

    /// Delete a request and drop it from the cache.
    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        self.service.delete(id).await?;
        let mut state = self.store.state.lock().await;
        state.requests.remove(&id);
        Ok(())
    }

    /// Periodically re-fetch the list into the store.
    ///
    /// Failures are logged and the next tick retries; aborting the returned
    /// handle stops the loop.
    #[must_use]
    pub fn spawn_poller(&self, scope: ListScope, interval: Duration) -> JoinHandle<()> {
        let controller = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if let Err(error) = controller.refresh(scope).await {
                    warn!(%error, ?scope, "background refresh failed");
                }
            }
        })
    }

    /// The one optimistic-update routine every mutation goes through.
    ///
    /// Applies `optimistic` to the cached row, marks it updating, awaits the
    /// server call, then either folds the echo in verbatim (the server is
    /// authoritative and may have enriched the record) or restores the
    /// pre-change snapshot. The updating marker clears on every path.
    async fn reconcile<F, Fut>(&self, id: i64, optimistic: F, call: Fut) -> Result<Request, ApiError>
    where
        F: FnOnce(&mut Request),
        Fut: Future<Output = Result<Request, ApiError>>,
    {
        let (epoch, prior) = {
            let mut state = self.store.state.lock().await;
            let Some(request) = state.requests.get_mut(&id) else {
                return Err(not_loaded(id));
            };
            let prior = request.clone();
            optimistic(request);
            state.updating.insert(id);
            (state.epoch, prior)
        };

        let result = call.await;

        let mut state = self.store.state.lock().await;
        state.updating.remove(&id);
        match result {
            Ok(echo) => {
                if state.epoch == epoch {
                    state.requests.insert(id, echo.clone());
                }
                Ok(echo)
            }
            Err(error) => {
                if state.epoch == epoch {
                    state.requests.insert(id, prior);
                }
                Err(error)
            }
        }
    }
}

fn not_loaded(id: i64) -> ApiError {
    ApiError::RequestFailed(format!("request {id} is not loaded"))
}
