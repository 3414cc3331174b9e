//! # Framework Errors
//!
//! This module defines the error types used throughout the coordination
//! framework. By centralizing error definitions, we keep the error taxonomy
//! in one place: configuration errors (registry wiring, unsupported event
//! kinds) and logic errors (positional-index violations) are fatal at the
//! point of occurrence, while handler-execution errors are isolated and
//! reported by the dispatch task instead of propagating to the publisher.

use std::fmt::Debug;

/// Boxed error type carried out of event handlers.
///
/// Handlers are fire-and-forget units of work; whatever error they produce is
/// logged by the dispatch task and never reaches the publisher, so a type-
/// erased error is all the bus needs.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

/// Errors raised by the component registry.
///
/// Every variant is a configuration error: it indicates a wiring bug in the
/// composition root and must stop setup rather than degrade silently.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// A component with this name has already been registered.
    #[error("component '{0}' is already registered")]
    AlreadyRegistered(String),
    /// A declared dependency has not been registered yet. Registration order
    /// is the dependency order; there is no lazy resolution.
    #[error("component '{component}' depends on unregistered component '{dependency}'")]
    MissingDependency {
        component: String,
        dependency: String,
    },
    /// A component declared itself as one of its own dependencies.
    #[error("component '{0}' cannot depend on itself")]
    SelfDependency(String),
    /// The factory produced no component.
    #[error("factory for component '{0}' produced no component")]
    EmptyComponent(String),
    /// Lookup of a name that was never registered.
    #[error("no component registered under '{0}'")]
    NotRegistered(String),
    /// A typed lookup found the component but it holds a different type.
    #[error("component '{name}' is not a {expected}")]
    TypeMismatch {
        name: String,
        expected: &'static str,
    },
}

/// Errors raised by the event bus.
///
/// The supported kind set is fixed at construction, so the only failure mode
/// for subscribe and publish is a kind outside that set.
#[derive(Debug, thiserror::Error)]
pub enum BusError<K: Debug> {
    /// The event kind is not in the set declared at bus construction.
    #[error("event kind {0:?} is not supported by this bus")]
    UnsupportedKind(K),
}

/// Errors raised by the ordered container.
///
/// An out-of-range removal means a caller holds a stale position for a child
/// that is no longer where it claims to be. That is a logic error under
/// correct handler wiring and is surfaced immediately, never auto-corrected.
#[derive(Debug, thiserror::Error)]
pub enum OrderedError {
    #[error("child index {index} is out of range ({len} children)")]
    OutOfRange { index: usize, len: usize },
}
