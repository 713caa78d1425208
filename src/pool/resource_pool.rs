//! The resource pool implementation.

// Layer 1: Standard library imports
use std::collections::VecDeque;
use std::future::Future;
use std::ops::{Deref, DerefMut};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

// Layer 2: Third-party crate imports
use parking_lot::Mutex;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tracing::debug;

// Layer 3: Internal module imports
use super::error::PoolError;
use super::factory::ResourceFactory;

/// Default pool size
pub const DEFAULT_POOL_SIZE: usize = 5;

/// Bounded, lazily filled pool of reusable resources.
///
/// A semaphore with one permit per pool slot caps how many resources are
/// out at once; borrowers suspend while every permit is taken. Resources
/// are created on first demand, validated on every return via
/// [`ResourceFactory::test`], and finalized via
/// [`ResourceFactory::release`] when invalid and at drain or shutdown. An
/// invalid resource is *not* eagerly replaced; the next borrower creates
/// one.
///
/// Cloning the pool is cheap and shares all state. Dropping the last clone
/// without calling [`shutdown`](Self::shutdown) finalizes the idle
/// resources as a best effort.
///
/// # Example
///
/// ```rust,ignore
/// let pool = ResourcePool::new(PgFactory { dsn });
/// let rows = pool
///     .use_resource(|conn| async move { conn.query("select 1").await })
///     .await?;
/// pool.shutdown().await;
/// ```
pub struct ResourcePool<F: ResourceFactory> {
    inner: Arc<PoolInner<F>>,
}

struct PoolInner<F: ResourceFactory> {
    factory: F,
    size: usize,
    permits: Arc<Semaphore>,
    idle: Mutex<VecDeque<F::Resource>>,
    shutting_down: AtomicBool,
}

impl<F: ResourceFactory> ResourcePool<F> {
    /// Create a pool of [`DEFAULT_POOL_SIZE`] slots.
    pub fn new(factory: F) -> Self {
        Self::build(factory, DEFAULT_POOL_SIZE)
    }

    /// Create a pool with an explicit number of slots.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::InvalidSize`] when `size` is zero.
    pub fn with_size(factory: F, size: usize) -> Result<Self, PoolError<F::Error>> {
        if size == 0 {
            return Err(PoolError::InvalidSize);
        }
        Ok(Self::build(factory, size))
    }

    fn build(factory: F, size: usize) -> Self {
        Self {
            inner: Arc::new(PoolInner {
                factory,
                size,
                permits: Arc::new(Semaphore::new(size)),
                idle: Mutex::new(VecDeque::with_capacity(size)),
                shutting_down: AtomicBool::new(false),
            }),
        }
    }

    /// Number of pool slots.
    pub fn size(&self) -> usize {
        self.inner.size
    }

    /// Number of idle resources currently queued.
    pub fn idle_count(&self) -> usize {
        self.inner.idle.lock().len()
    }

    /// Whether shutdown has begun.
    pub fn is_shutdown(&self) -> bool {
        self.inner.shutting_down.load(Ordering::SeqCst)
    }

    /// Borrow one resource, suspending while every slot is taken.
    ///
    /// The guard returns the resource on drop: validated, then either
    /// requeued or released.
    ///
    /// # Errors
    ///
    /// [`PoolError::ShuttingDown`] once shutdown has begun,
    /// [`PoolError::Factory`] when a new resource cannot be created.
    pub async fn get(&self) -> Result<PoolGuard<F>, PoolError<F::Error>> {
        if self.is_shutdown() {
            return Err(PoolError::ShuttingDown);
        }
        let permit = Arc::clone(&self.inner.permits)
            .acquire_owned()
            .await
            .map_err(|_| PoolError::ShuttingDown)?;

        let existing = self.inner.idle.lock().pop_front();
        let resource = match existing {
            Some(resource) => resource,
            None => self
                .inner
                .factory
                .acquire()
                .await
                .map_err(PoolError::Factory)?,
        };

        Ok(PoolGuard {
            resource: Some(resource),
            inner: Arc::clone(&self.inner),
            _permit: permit,
        })
    }

    /// Borrow one resource and run `f` with it.
    ///
    /// The closure receives the guard by value; whatever it returns is
    /// handed back to the caller after the resource has been returned to
    /// the pool. A panic inside `f` also returns the resource first
    /// (unwinding drops the guard) and then propagates.
    ///
    /// # Errors
    ///
    /// As [`get`](Self::get).
    pub async fn use_resource<T, Fut>(
        &self,
        f: impl FnOnce(PoolGuard<F>) -> Fut,
    ) -> Result<T, PoolError<F::Error>>
    where
        Fut: Future<Output = T>,
    {
        let guard = self.get().await?;
        Ok(f(guard).await)
    }

    /// Eagerly create resources until every slot has an idle one.
    ///
    /// Holds all permits for the duration, so it waits for outstanding
    /// borrows to return and excludes concurrent borrowers.
    ///
    /// # Errors
    ///
    /// [`PoolError::ShuttingDown`] once shutdown has begun,
    /// [`PoolError::Factory`] when creation fails; resources created before
    /// the failure stay queued.
    pub async fn fill(&self) -> Result<(), PoolError<F::Error>> {
        if self.is_shutdown() {
            return Err(PoolError::ShuttingDown);
        }
        let _all = self
            .inner
            .permits
            .acquire_many(self.inner.size as u32)
            .await
            .map_err(|_| PoolError::ShuttingDown)?;

        while self.idle_count() < self.inner.size {
            let resource = self
                .inner
                .factory
                .acquire()
                .await
                .map_err(PoolError::Factory)?;
            self.inner.idle.lock().push_back(resource);
        }
        debug!(size = self.inner.size, "pool filled");
        Ok(())
    }

    /// Release every idle resource.
    ///
    /// Waits for outstanding borrows to return first by taking all permits.
    /// The pool stays usable afterwards; the next borrower creates a fresh
    /// resource.
    pub async fn drain(&self) {
        let _all = self
            .inner
            .permits
            .acquire_many(self.inner.size as u32)
            .await;
        // With all permits held (or the semaphore closed by shutdown, which
        // also means no borrowers), the idle queue is ours.
        let drained: Vec<F::Resource> = {
            let mut idle = self.inner.idle.lock();
            idle.drain(..).collect()
        };
        let count = drained.len();
        for resource in drained {
            self.inner.factory.release(resource);
        }
        if count > 0 {
            debug!(count, "pool drained");
        }
    }

    /// Stop the pool: reject new borrows, wait for outstanding ones, then
    /// release every resource. Idempotent.
    pub async fn shutdown(&self) {
        if self.inner.shutting_down.swap(true, Ordering::SeqCst) {
            return;
        }
        self.drain().await;
        self.inner.permits.close();
        debug!("pool shut down");
    }
}

impl<F: ResourceFactory> Clone for ResourcePool<F> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<F: ResourceFactory> Drop for PoolInner<F> {
    /// Best-effort finalization for pools dropped without `shutdown()`.
    fn drop(&mut self) {
        if self.shutting_down.swap(true, Ordering::SeqCst) {
            return;
        }
        for resource in self.idle.lock().drain(..) {
            self.factory.release(resource);
        }
    }
}

/// RAII borrow of one pooled resource.
///
/// Dereferences to the resource. On drop the resource is validated with
/// [`ResourceFactory::test`] (a panicking validator counts as invalid) and
/// either requeued or released; the permit frees only after that, so the
/// pool's cap is never exceeded.
pub struct PoolGuard<F: ResourceFactory> {
    resource: Option<F::Resource>,
    inner: Arc<PoolInner<F>>,
    _permit: OwnedSemaphorePermit,
}

impl<F: ResourceFactory> Deref for PoolGuard<F> {
    type Target = F::Resource;

    fn deref(&self) -> &Self::Target {
        match self.resource.as_ref() {
            Some(resource) => resource,
            // Invariant: the resource is present until drop.
            None => unreachable!("pool guard accessed after drop"),
        }
    }
}

impl<F: ResourceFactory> DerefMut for PoolGuard<F> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        match self.resource.as_mut() {
            Some(resource) => resource,
            None => unreachable!("pool guard accessed after drop"),
        }
    }
}

impl<F: ResourceFactory> Drop for PoolGuard<F> {
    fn drop(&mut self) {
        let Some(resource) = self.resource.take() else {
            return;
        };
        if self.inner.shutting_down.load(Ordering::SeqCst) {
            self.inner.factory.release(resource);
            return;
        }
        let valid = catch_unwind(AssertUnwindSafe(|| self.inner.factory.test(&resource)))
            .unwrap_or(false);
        if valid {
            self.inner.idle.lock().push_back(resource);
        } else {
            debug!("returned resource failed validation, releasing");
            self.inner.factory.release(resource);
        }
        // The permit drops after the resource is back in the queue.
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use std::fmt;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;
    use tokio::time::sleep;

    #[derive(Debug)]
    struct NeverFails;

    impl fmt::Display for NeverFails {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "never fails")
        }
    }

    impl std::error::Error for NeverFails {}

    struct CountingFactory {
        created: AtomicUsize,
        live: AtomicUsize,
        valid: AtomicBool,
    }

    impl CountingFactory {
        fn new() -> Self {
            Self {
                created: AtomicUsize::new(0),
                live: AtomicUsize::new(0),
                valid: AtomicBool::new(true),
            }
        }
    }

    #[async_trait::async_trait]
    impl ResourceFactory for Arc<CountingFactory> {
        type Resource = usize;
        type Error = NeverFails;

        async fn acquire(&self) -> Result<usize, NeverFails> {
            self.live.fetch_add(1, Ordering::SeqCst);
            Ok(self.created.fetch_add(1, Ordering::SeqCst))
        }

        fn release(&self, _resource: usize) {
            self.live.fetch_sub(1, Ordering::SeqCst);
        }

        fn test(&self, _resource: &usize) -> bool {
            self.valid.load(Ordering::SeqCst)
        }
    }

    #[tokio::test]
    async fn test_lazy_creation_and_reuse() {
        let factory = Arc::new(CountingFactory::new());
        let pool = ResourcePool::new(Arc::clone(&factory));
        assert_eq!(pool.idle_count(), 0);

        {
            let first = pool.get().await.unwrap();
            assert_eq!(*first, 0);
        }
        assert_eq!(pool.idle_count(), 1);

        // A returned, valid resource is reused instead of creating another.
        {
            let again = pool.get().await.unwrap();
            assert_eq!(*again, 0);
        }
        assert_eq!(factory.created.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_invalid_resource_released_not_replaced() {
        let factory = Arc::new(CountingFactory::new());
        let pool = ResourcePool::new(Arc::clone(&factory));

        factory.valid.store(false, Ordering::SeqCst);
        {
            let _guard = pool.get().await.unwrap();
        }
        assert_eq!(pool.idle_count(), 0);
        assert_eq!(factory.live.load(Ordering::SeqCst), 0);

        // Replacement is lazy: the next borrower creates a fresh resource.
        factory.valid.store(true, Ordering::SeqCst);
        let guard = pool.get().await.unwrap();
        assert_eq!(*guard, 1);
    }

    #[tokio::test]
    async fn test_size_one_second_borrower_waits() {
        let factory = Arc::new(CountingFactory::new());
        let pool = ResourcePool::with_size(Arc::clone(&factory), 1).unwrap();

        let first = pool.get().await.unwrap();

        let contender = {
            let pool = pool.clone();
            tokio::spawn(async move {
                let _second = pool.get().await.unwrap();
            })
        };

        sleep(Duration::from_millis(50)).await;
        assert!(!contender.is_finished());

        drop(first);
        tokio::time::timeout(Duration::from_secs(1), contender)
            .await
            .unwrap()
            .unwrap();
    }

    #[tokio::test]
    async fn test_fill_and_drain() {
        let factory = Arc::new(CountingFactory::new());
        let pool = ResourcePool::with_size(Arc::clone(&factory), 3).unwrap();

        pool.fill().await.unwrap();
        assert_eq!(pool.idle_count(), 3);
        assert_eq!(factory.live.load(Ordering::SeqCst), 3);

        pool.drain().await;
        assert_eq!(pool.idle_count(), 0);
        assert_eq!(factory.live.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_shutdown_rejects_borrows_and_is_idempotent() {
        let factory = Arc::new(CountingFactory::new());
        let pool = ResourcePool::with_size(Arc::clone(&factory), 2).unwrap();
        pool.fill().await.unwrap();

        pool.shutdown().await;
        assert!(pool.is_shutdown());
        assert_eq!(factory.live.load(Ordering::SeqCst), 0);
        assert!(matches!(pool.get().await, Err(PoolError::ShuttingDown)));

        // Idempotent.
        pool.shutdown().await;
        assert_eq!(factory.live.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_return_during_shutdown_releases_directly() {
        let factory = Arc::new(CountingFactory::new());
        let pool = ResourcePool::with_size(Arc::clone(&factory), 1).unwrap();

        let guard = pool.get().await.unwrap();
        let shutdown = {
            let pool = pool.clone();
            tokio::spawn(async move { pool.shutdown().await })
        };

        sleep(Duration::from_millis(20)).await;
        drop(guard);
        shutdown.await.unwrap();
        assert_eq!(factory.live.load(Ordering::SeqCst), 0);
        assert_eq!(pool.idle_count(), 0);
    }

    #[tokio::test]
    async fn test_use_resource_returns_value() {
        let factory = Arc::new(CountingFactory::new());
        let pool = ResourcePool::new(Arc::clone(&factory));

        let doubled = pool.use_resource(|guard| async move { *guard * 2 }).await;
        assert_eq!(doubled.unwrap(), 0);
        assert_eq!(pool.idle_count(), 1);
    }

    #[tokio::test]
    async fn test_panic_in_use_returns_resource_first() {
        let factory = Arc::new(CountingFactory::new());
        let pool = ResourcePool::new(Arc::clone(&factory));

        let task = {
            let pool = pool.clone();
            tokio::spawn(async move {
                pool.use_resource(|guard| async move {
                    let _held = guard;
                    panic!("user code failure");
                })
                .await
            })
        };

        assert!(task.await.unwrap_err().is_panic());
        // The resource came back on unwind.
        assert_eq!(pool.idle_count(), 1);
        assert_eq!(factory.live.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_panicking_validator_counts_as_invalid() {
        struct PanickyFactory {
            live: Arc<AtomicUsize>,
        }

        #[async_trait::async_trait]
        impl ResourceFactory for PanickyFactory {
            type Resource = ();
            type Error = NeverFails;

            async fn acquire(&self) -> Result<(), NeverFails> {
                self.live.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }

            fn release(&self, _resource: ()) {
                self.live.fetch_sub(1, Ordering::SeqCst);
            }

            fn test(&self, _resource: &()) -> bool {
                panic!("validator bug")
            }
        }

        let live = Arc::new(AtomicUsize::new(0));
        let pool = ResourcePool::new(PanickyFactory {
            live: Arc::clone(&live),
        });

        {
            let _guard = pool.get().await.unwrap();
        }
        assert_eq!(pool.idle_count(), 0);
        assert_eq!(live.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_zero_size_rejected() {
        let factory = Arc::new(CountingFactory::new());
        assert!(matches!(
            ResourcePool::with_size(factory, 0),
            Err(PoolError::InvalidSize)
        ));
    }

    #[tokio::test]
    async fn test_drop_without_shutdown_releases_idle() {
        let factory = Arc::new(CountingFactory::new());
        {
            let pool = ResourcePool::with_size(Arc::clone(&factory), 2).unwrap();
            pool.fill().await.unwrap();
            assert_eq!(factory.live.load(Ordering::SeqCst), 2);
        }
        assert_eq!(factory.live.load(Ordering::SeqCst), 0);
    }
}
