// Layer 1: Standard library imports
use std::error::Error;

// Layer 2: Third-party crate imports
use async_trait::async_trait;

// Layer 3: Internal module imports
// (none)

/// User-supplied lifecycle hooks for pooled resources.
///
/// The pool calls `acquire` lazily when a borrower finds the idle queue
/// empty, `test` every time a resource comes back, and `release` for
/// resources that failed validation and for every idle resource at drain
/// or shutdown. `release` is infallible from the pool's point of view;
/// implementations that can fail should log and swallow.
///
/// # Example
///
/// ```rust,ignore
/// struct PgFactory {
///     dsn: String,
/// }
///
/// #[async_trait]
/// impl ResourceFactory for PgFactory {
///     type Resource = PgConnection;
///     type Error = PgError;
///
///     async fn acquire(&self) -> Result<PgConnection, PgError> {
///         PgConnection::connect(&self.dsn).await
///     }
///
///     fn release(&self, conn: PgConnection) {
///         conn.close();
///     }
///
///     fn test(&self, conn: &PgConnection) -> bool {
///         conn.is_valid()
///     }
/// }
/// ```
#[async_trait]
pub trait ResourceFactory: Send + Sync + 'static {
    /// The pooled resource type.
    type Resource: Send;

    /// Error produced when creating a resource fails.
    type Error: Error + Send + Sync + 'static;

    /// Create a new resource.
    async fn acquire(&self) -> Result<Self::Resource, Self::Error>;

    /// Finalize a resource that is leaving the pool for good.
    fn release(&self, resource: Self::Resource);

    /// Whether a returned resource is still usable. Defaults to `true`.
    fn test(&self, _resource: &Self::Resource) -> bool {
        true
    }
}
