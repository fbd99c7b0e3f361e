//! Generation-checked fetch cell.
//!
//! [`Query`] drives a caller-supplied fetcher and tracks
//! `Idle → Loading → (Success | Error)` state, keeping the last good value
//! across failures. Superseding fetches invalidate earlier ones but do not
//! forcibly stop them: each fetch captures a generation number and a child
//! [`CancellationToken`], and a result is committed only when both are still
//! current. Late arrivals from abandoned fetches are discarded, so at most
//! one fetch per generation ever writes state.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use futures::future::BoxFuture;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::error::ClientError;

/// Lifecycle of a query. The cycle is re-enterable: every refetch goes back
/// through `Loading`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryStatus {
    Idle,
    Loading,
    Success,
    Error,
}

/// Point-in-time view of a query.
#[derive(Debug, Clone)]
pub struct QuerySnapshot<T> {
    /// Last successfully fetched value. Errors leave this untouched.
    pub data: Option<T>,
    /// Error of the most recent failed fetch, cleared when a new one starts.
    pub error: Option<Arc<ClientError>>,
    pub status: QueryStatus,
}

struct QueryCell<T> {
    data: Option<T>,
    error: Option<Arc<ClientError>>,
    status: QueryStatus,
}

type Fetcher<T> =
    Arc<dyn Fn(CancellationToken) -> BoxFuture<'static, Result<T, ClientError>> + Send + Sync>;

/// Options controlling a [`Query`].
pub struct QueryOptions<T> {
    /// When false, automatic fetching (and refetching) is suppressed.
    pub enabled: bool,
    /// Seeds `data` before any fetch completes (cache-warm rendering).
    pub initial_data: Option<T>,
}

impl<T> Default for QueryOptions<T> {
    fn default() -> Self {
        Self {
            enabled: true,
            initial_data: None,
        }
    }
}

/// A cancellable, dependency-driven fetch cell.
///
/// `D` is the dependency snapshot compared by [`Query::run_if_changed`];
/// handles are cheap to clone and share one state cell.
pub struct Query<T, D = ()> {
    cell: Arc<Mutex<QueryCell<T>>>,
    fetcher: Fetcher<T>,
    generation: Arc<AtomicU64>,
    in_flight: Arc<Mutex<Option<CancellationToken>>>,
    last_deps: Arc<Mutex<Option<D>>>,
    enabled: bool,
}

impl<T, D> Clone for Query<T, D> {
    fn clone(&self) -> Self {
        Self {
            cell: Arc::clone(&self.cell),
            fetcher: Arc::clone(&self.fetcher),
            generation: Arc::clone(&self.generation),
            in_flight: Arc::clone(&self.in_flight),
            last_deps: Arc::clone(&self.last_deps),
            enabled: self.enabled,
        }
    }
}

impl<T, D> Query<T, D>
where
    T: Clone + Send + 'static,
    D: PartialEq + Send,
{
    /// Build a query around a fetcher. The fetcher receives the fetch's own
    /// cancellation token; well-behaved fetchers thread it through to
    /// [`crate::http::HttpClient::execute`].
    pub fn new<F>(fetcher: F, options: QueryOptions<T>) -> Self
    where
        F: Fn(CancellationToken) -> BoxFuture<'static, Result<T, ClientError>>
            + Send
            + Sync
            + 'static,
    {
        Self {
            cell: Arc::new(Mutex::new(QueryCell {
                data: options.initial_data,
                error: None,
                status: QueryStatus::Idle,
            })),
            fetcher: Arc::new(fetcher),
            generation: Arc::new(AtomicU64::new(0)),
            in_flight: Arc::new(Mutex::new(None)),
            last_deps: Arc::new(Mutex::new(None)),
            enabled: options.enabled,
        }
    }

    fn cell(&self) -> std::sync::MutexGuard<'_, QueryCell<T>> {
        self.cell.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Current snapshot of data/error/status.
    pub fn snapshot(&self) -> QuerySnapshot<T> {
        let cell = self.cell();
        QuerySnapshot {
            data: cell.data.clone(),
            error: cell.error.clone(),
            status: cell.status,
        }
    }

    /// Last good value, if any.
    pub fn data(&self) -> Option<T> {
        self.cell().data.clone()
    }

    pub fn status(&self) -> QueryStatus {
        self.cell().status
    }

    pub fn error(&self) -> Option<Arc<ClientError>> {
        self.cell().error.clone()
    }

    /// Run the fetcher if the dependency snapshot changed since the last run
    /// (or this is the first activation). Disabled queries never fetch.
    pub async fn run_if_changed(&self, deps: D) -> Result<Option<T>, Arc<ClientError>> {
        if !self.enabled {
            return Ok(self.data());
        }
        let changed = {
            let mut last = self
                .last_deps
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            match last.as_ref() {
                Some(previous) if *previous == deps => false,
                _ => {
                    *last = Some(deps);
                    true
                }
            }
        };
        if changed {
            self.refetch().await
        } else {
            Ok(self.data())
        }
    }

    /// Start a new fetch, superseding any in-flight one.
    ///
    /// The caller gets this fetch's own outcome either way; state is only
    /// written when the fetch is still the newest at completion time.
    pub async fn refetch(&self) -> Result<Option<T>, Arc<ClientError>> {
        if !self.enabled {
            return Ok(self.data());
        }

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let token = CancellationToken::new();
        let superseded = {
            let mut in_flight = self
                .in_flight
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            in_flight.replace(token.clone())
        };
        if let Some(previous) = superseded {
            previous.cancel();
        }

        {
            let mut cell = self.cell();
            cell.status = QueryStatus::Loading;
            cell.error = None;
        }

        let result = (self.fetcher)(token.clone()).await;
        let still_current =
            self.generation.load(Ordering::SeqCst) == generation && !token.is_cancelled();

        match result {
            Ok(value) => {
                if still_current {
                    let mut cell = self.cell();
                    cell.data = Some(value.clone());
                    cell.status = QueryStatus::Success;
                } else {
                    debug!(generation, "discarding stale query result");
                }
                Ok(Some(value))
            }
            Err(err) => {
                let err = Arc::new(err);
                if still_current {
                    let mut cell = self.cell();
                    cell.status = QueryStatus::Error;
                    cell.error = Some(Arc::clone(&err));
                } else {
                    debug!(generation, "discarding stale query failure");
                }
                Err(err)
            }
        }
    }

    /// Abandon the in-flight fetch, if any (the unmount analogue). Whatever
    /// it eventually resolves to will be discarded.
    pub fn cancel(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        let token = {
            let mut in_flight = self
                .in_flight
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            in_flight.take()
        };
        if let Some(token) = token {
            token.cancel();
        }
    }
}
