//! The fetch capability the loader accessor depends on.

use std::future::Future;
use std::sync::Arc;

use futures::FutureExt;
use futures::future::BoxFuture;

use super::FetchError;

/// Produces loader data for a canonical loader path.
///
/// The returned future must be `'static` because it is spawned and outlives
/// the caller that triggered it.
pub trait LoaderFetcher<T>: Send + Sync {
    fn fetch(&self, path: &str) -> BoxFuture<'static, Result<T, FetchError>>;
}

impl<T, F> LoaderFetcher<T> for Arc<F>
where
    F: LoaderFetcher<T> + ?Sized,
{
    fn fetch(&self, path: &str) -> BoxFuture<'static, Result<T, FetchError>> {
        (**self).fetch(path)
    }
}

/// A [`LoaderFetcher`] backed by a closure. See [`fetcher_fn`].
#[derive(Clone)]
pub struct FnFetcher<F> {
    f: F,
}

/// Build a fetcher from a closure taking the loader path.
///
/// ```ignore
/// let fetcher = fetcher_fn(|path: String| async move { Ok(serde_json::json!({ "path": path })) });
/// ```
pub fn fetcher_fn<F>(f: F) -> FnFetcher<F> {
    FnFetcher { f }
}

impl<T, F, Fut> LoaderFetcher<T> for FnFetcher<F>
where
    F: Fn(String) -> Fut + Send + Sync,
    Fut: Future<Output = Result<T, FetchError>> + Send + 'static,
{
    fn fetch(&self, path: &str) -> BoxFuture<'static, Result<T, FetchError>> {
        (self.f)(path.to_string()).boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fetcher_fn_receives_path() {
        let fetcher = fetcher_fn(|path: String| async move { Ok::<_, FetchError>(path.len()) });
        let len = fetcher.fetch("/_expo/loaders/index").await.unwrap();
        assert_eq!(len, "/_expo/loaders/index".len());
    }

    #[tokio::test]
    async fn test_arc_fetcher_delegates() {
        let fetcher: Arc<dyn LoaderFetcher<u8>> =
            Arc::new(fetcher_fn(|_path: String| async { Err(FetchError::Http { status: 503 }) }));
        let err = fetcher.fetch("/x").await.unwrap_err();
        assert!(matches!(err, FetchError::Http { status: 503 }));
    }
}
