//! Shared handle to an in-flight loader fetch.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::task::{Context, Poll};

use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use tokio::sync::oneshot;

use super::{FetchError, LoaderError};

/// Outcome every waiter of a load observes.
pub type LoadOutcome<T> = Result<T, Arc<LoaderError>>;

static NEXT_LOAD_ID: AtomicU64 = AtomicU64::new(1);

/// A clonable future resolving to the outcome of one loader fetch.
///
/// All callers that joined the same fetch hold clones of the same load, which
/// [`PendingLoad::is_same_load`] reports. Dropping a handle does not cancel the
/// fetch.
pub struct PendingLoad<T> {
    id: u64,
    inner: Shared<BoxFuture<'static, LoadOutcome<T>>>,
}

impl<T> Clone for PendingLoad<T> {
    fn clone(&self) -> Self {
        Self { id: self.id, inner: self.inner.clone() }
    }
}

impl<T> fmt::Debug for PendingLoad<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingLoad").field("id", &self.id).finish_non_exhaustive()
    }
}

impl<T> PendingLoad<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Create a load fed by `receiver`.
    ///
    /// If the sender is dropped without a value, every waiter sees the same
    /// `Interrupted` error for `path`.
    pub(crate) fn new(path: String, receiver: oneshot::Receiver<LoadOutcome<T>>) -> Self {
        let id = NEXT_LOAD_ID.fetch_add(1, Ordering::Relaxed);
        let inner = receiver
            .map(move |received| {
                received.unwrap_or_else(|_| Err(Arc::new(LoaderError::new(path, FetchError::Interrupted))))
            })
            .boxed()
            .shared();
        Self { id, inner }
    }
}

impl<T> PendingLoad<T> {
    /// Identifier unique to the underlying fetch.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Whether both handles wait on the same fetch.
    pub fn is_same_load(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<T: Clone> Future for PendingLoad<T> {
    type Output = LoadOutcome<T>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.inner.poll_unpin(cx)
    }
}
