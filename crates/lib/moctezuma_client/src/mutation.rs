//! Imperative action state machine.
//!
//! [`Mutation`] wraps a fire-on-demand action (submit login, add to cart) and
//! tracks its `Idle → Loading → (Success | Error)` state, with optional
//! success/error/settled hooks. Unlike queries there is no cancellation and
//! no concurrency guard: overlapping dispatches race freely and whichever
//! settles last owns the visible state — callers wanting strict ordering
//! serialize dispatches themselves. Errors are never swallowed: they are
//! stored for observers *and* returned to the dispatching caller.

use std::sync::{Arc, Mutex, PoisonError};

use futures::future::BoxFuture;

use crate::error::ClientError;

/// Lifecycle of a mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationStatus {
    Idle,
    Loading,
    Success,
    Error,
}

struct MutationCell<T> {
    data: Option<T>,
    error: Option<Arc<ClientError>>,
    status: MutationStatus,
}

type MutationFn<V, T> =
    Arc<dyn Fn(V) -> BoxFuture<'static, Result<T, ClientError>> + Send + Sync>;
type SuccessHook<V, T> = Arc<dyn Fn(&T, &V) + Send + Sync>;
type ErrorHook<V> = Arc<dyn Fn(&ClientError, &V) + Send + Sync>;
type SettledHook<V, T> = Arc<dyn Fn(Option<&T>, Option<&ClientError>, &V) + Send + Sync>;

/// A dispatchable action with observable state.
pub struct Mutation<V, T> {
    cell: Arc<Mutex<MutationCell<T>>>,
    action: MutationFn<V, T>,
    on_success: Option<SuccessHook<V, T>>,
    on_error: Option<ErrorHook<V>>,
    on_settled: Option<SettledHook<V, T>>,
}

impl<V, T> Clone for Mutation<V, T> {
    fn clone(&self) -> Self {
        Self {
            cell: Arc::clone(&self.cell),
            action: Arc::clone(&self.action),
            on_success: self.on_success.clone(),
            on_error: self.on_error.clone(),
            on_settled: self.on_settled.clone(),
        }
    }
}

impl<V, T> Mutation<V, T>
where
    V: Clone + Send + 'static,
    T: Clone + Send + 'static,
{
    /// Wrap an action.
    pub fn new<F>(action: F) -> Self
    where
        F: Fn(V) -> BoxFuture<'static, Result<T, ClientError>> + Send + Sync + 'static,
    {
        Self {
            cell: Arc::new(Mutex::new(MutationCell {
                data: None,
                error: None,
                status: MutationStatus::Idle,
            })),
            action: Arc::new(action),
            on_success: None,
            on_error: None,
            on_settled: None,
        }
    }

    /// Hook invoked with the result and variables after a success, before
    /// `on_settled`.
    pub fn on_success<F>(mut self, hook: F) -> Self
    where
        F: Fn(&T, &V) + Send + Sync + 'static,
    {
        self.on_success = Some(Arc::new(hook));
        self
    }

    /// Hook invoked with the error and variables after a failure, before
    /// `on_settled`.
    pub fn on_error<F>(mut self, hook: F) -> Self
    where
        F: Fn(&ClientError, &V) + Send + Sync + 'static,
    {
        self.on_error = Some(Arc::new(hook));
        self
    }

    /// Hook invoked after every settle, success or failure.
    pub fn on_settled<F>(mut self, hook: F) -> Self
    where
        F: Fn(Option<&T>, Option<&ClientError>, &V) + Send + Sync + 'static,
    {
        self.on_settled = Some(Arc::new(hook));
        self
    }

    fn cell(&self) -> std::sync::MutexGuard<'_, MutationCell<T>> {
        self.cell.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn status(&self) -> MutationStatus {
        self.cell().status
    }

    pub fn data(&self) -> Option<T> {
        self.cell().data.clone()
    }

    pub fn error(&self) -> Option<Arc<ClientError>> {
        self.cell().error.clone()
    }

    /// Run the action once with the given variables.
    ///
    /// On success the value is stored and returned; on failure the error is
    /// stored and propagated. There are no retries.
    pub async fn dispatch(&self, variables: V) -> Result<T, Arc<ClientError>> {
        {
            let mut cell = self.cell();
            cell.status = MutationStatus::Loading;
            cell.error = None;
        }

        match (self.action)(variables.clone()).await {
            Ok(value) => {
                {
                    let mut cell = self.cell();
                    cell.data = Some(value.clone());
                    cell.status = MutationStatus::Success;
                }
                if let Some(hook) = &self.on_success {
                    hook(&value, &variables);
                }
                if let Some(hook) = &self.on_settled {
                    hook(Some(&value), None, &variables);
                }
                Ok(value)
            }
            Err(err) => {
                let err = Arc::new(err);
                {
                    let mut cell = self.cell();
                    cell.status = MutationStatus::Error;
                    cell.error = Some(Arc::clone(&err));
                }
                if let Some(hook) = &self.on_error {
                    hook(&err, &variables);
                }
                if let Some(hook) = &self.on_settled {
                    hook(None, Some(&err), &variables);
                }
                Err(err)
            }
        }
    }

    /// Return to `Idle` with cleared data and error. Callable at any time.
    pub fn reset(&self) {
        let mut cell = self.cell();
        cell.status = MutationStatus::Idle;
        cell.data = None;
        cell.error = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::FutureExt;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn doubling() -> Mutation<u32, u32> {
        Mutation::new(|v: u32| async move { Ok(v * 2) }.boxed())
    }

    fn failing() -> Mutation<u32, u32> {
        Mutation::new(|_v: u32| {
            async move { Err(ClientError::Decode("nope".into())) }.boxed()
        })
    }

    #[tokio::test]
    async fn dispatch_success_stores_data_and_returns_it() {
        let mutation = doubling();
        assert_eq!(mutation.status(), MutationStatus::Idle);
        let result = mutation.dispatch(21).await.expect("dispatch");
        assert_eq!(result, 42);
        assert_eq!(mutation.status(), MutationStatus::Success);
        assert_eq!(mutation.data(), Some(42));
        assert!(mutation.error().is_none());
    }

    #[tokio::test]
    async fn dispatch_failure_stores_and_propagates_error() {
        let mutation = failing();
        let err = mutation.dispatch(1).await.expect_err("must fail");
        assert!(matches!(*err, ClientError::Decode(_)));
        assert_eq!(mutation.status(), MutationStatus::Error);
        assert!(mutation.error().is_some());
    }

    #[tokio::test]
    async fn hooks_fire_in_order() {
        let order = Arc::new(Mutex::new(Vec::new()));
        let success_order = Arc::clone(&order);
        let settled_order = Arc::clone(&order);

        let mutation = doubling()
            .on_success(move |data, vars| {
                success_order
                    .lock()
                    .expect("lock")
                    .push(format!("success:{data}:{vars}"));
            })
            .on_settled(move |data, error, _vars| {
                settled_order
                    .lock()
                    .expect("lock")
                    .push(format!("settled:{}:{}", data.is_some(), error.is_some()));
            });

        mutation.dispatch(5).await.expect("dispatch");
        assert_eq!(
            *order.lock().expect("lock"),
            vec!["success:10:5".to_string(), "settled:true:false".to_string()]
        );
    }

    #[tokio::test]
    async fn error_hooks_fire_before_settled() {
        let order = Arc::new(Mutex::new(Vec::new()));
        let error_order = Arc::clone(&order);
        let settled_order = Arc::clone(&order);

        let mutation = failing()
            .on_error(move |_err, vars| {
                error_order.lock().expect("lock").push(format!("error:{vars}"));
            })
            .on_settled(move |data, error, _vars| {
                settled_order
                    .lock()
                    .expect("lock")
                    .push(format!("settled:{}:{}", data.is_some(), error.is_some()));
            });

        let _ = mutation.dispatch(3).await;
        assert_eq!(
            *order.lock().expect("lock"),
            vec!["error:3".to_string(), "settled:false:true".to_string()]
        );
    }

    #[tokio::test]
    async fn reset_returns_to_idle_after_error() {
        let mutation = failing();
        let _ = mutation.dispatch(1).await;
        assert_eq!(mutation.status(), MutationStatus::Error);

        mutation.reset();
        assert_eq!(mutation.status(), MutationStatus::Idle);
        assert!(mutation.data().is_none());
        assert!(mutation.error().is_none());
    }

    #[tokio::test]
    async fn loading_clears_previous_error() {
        let fail_first = Arc::new(AtomicUsize::new(0));
        let flag = Arc::clone(&fail_first);
        let mutation: Mutation<u32, u32> = Mutation::new(move |v: u32| {
            let call = flag.fetch_add(1, Ordering::SeqCst);
            async move {
                if call == 0 {
                    Err(ClientError::Decode("first".into()))
                } else {
                    Ok(v)
                }
            }
            .boxed()
        });

        let _ = mutation.dispatch(1).await;
        assert!(mutation.error().is_some());

        mutation.dispatch(2).await.expect("second succeeds");
        assert!(mutation.error().is_none());
        assert_eq!(mutation.data(), Some(2));
    }
}
