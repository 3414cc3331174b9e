//! # Board Framework
//!
//! Foundational building blocks for coordinating a component-based,
//! event-driven application: a dependency-ordered component registry, a
//! validated publish/subscribe event bus with deferred dispatch, and a
//! generic order-preserving container for hierarchical entities.
//!
//! ## Architecture Overview
//!
//! The framework separates three concerns:
//!
//! 1. **Wiring** ([`Registry`]) - components register under unique names with
//!    declared dependencies; registration order *is* the dependency order.
//! 2. **Communication** ([`EventBus`]) - a closed set of event kinds with
//!    subscribe/publish; delivery is deferred to later Tokio tasks so a
//!    publisher is never blocked by (or re-entered from) its own subscribers.
//! 3. **Containment** ([`OrderedChildren`]) - children keep a zero-based
//!    position among their siblings, kept contiguous across insertion and
//!    removal by a single shared index-repair implementation.
//!
//! ## Concurrency Model
//!
//! The registry is write-once-then-read-only: fill it in the composition
//! root, then share the resolved components freely. The bus snapshots its
//! subscriber list at publish time and queues the publish for a single
//! dispatcher task, so publishes apply strictly in issue order and handler
//! failures are isolated from each other. Entity state itself is plain
//! mutable data;
//! callers serialize access to it (a single coordinating task, or a mutex
//! around the tree).
//!
//! ## Error Handling
//!
//! Configuration errors (registry wiring bugs, unsupported event kinds) and
//! logic errors (stale child positions) surface immediately as `Err` at the
//! call site. Handler-execution errors are reported by the dispatch task via
//! `tracing` and never abort delivery to other handlers. Nothing in this
//! crate retries: every operation is in-memory and deterministic.

pub mod bus;
pub mod error;
pub mod logging;
pub mod ordered;
pub mod registry;

// Re-export core types for convenience
pub use bus::{BusEvent, EventBus, Subscription, SubscriptionId};
pub use error::{BusError, HandlerError, OrderedError, RegistryError};
pub use ordered::{Indexed, OrderedChildren};
pub use registry::{Component, Registry};
