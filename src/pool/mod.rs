//! Bounded pool of reusable resources with lazy creation and
//! validate-on-return.
//!
//! # Components
//!
//! - [`ResourceFactory`] - user-supplied create/release/validate hooks
//! - [`ResourcePool`] - the pool: permit cap, idle queue, lifecycle
//! - [`PoolGuard`] - RAII borrow; returns the resource on drop
//! - [`PoolError`] - borrow and lifecycle errors
//!
//! The pool never holds more than its size in resources and never creates
//! one until a borrower needs it. Resources are validated when returned; an
//! invalid resource is released and lazily replaced by the next borrower.

pub mod error;
pub mod factory;
pub mod resource_pool;

pub use error::PoolError;
pub use factory::ResourceFactory;
pub use resource_pool::{PoolGuard, ResourcePool, DEFAULT_POOL_SIZE};
