//! # System Lifecycle & Composition Root
//!
//! This module owns startup and teardown: it is the one place that knows how
//! the application's components fit together.
//!
//! ## The Composition Root Pattern
//!
//! All wiring happens through the component [`Registry`], in dependency
//! order:
//!
//! 1. **storage** - the key-value store boundary (injected from outside)
//! 2. **events** - the bus, constructed over the full fixed kind set
//! 3. **app-data** - the entity tree, restored from storage
//! 4. **coordinator** - subscribes the handlers, depending on all three
//!
//! A component can only depend on components registered strictly before it;
//! any wiring mistake (missing dependency, duplicate name, factory producing
//! nothing) is a fatal configuration error surfaced from
//! [`BoardSystem::start`] before any event flows.
//!
//! The registry instance lives inside the [`BoardSystem`] rather than in
//! process-wide state, so tests can stand up and tear down as many systems
//! as they like.
//!
//! ## Teardown
//!
//! [`BoardSystem::shutdown`] detaches the coordinator, revoking all of its
//! subscriptions. Handler invocations already issued by an earlier publish
//! still run to completion; nothing new is delivered.
//!
//! [`Registry`]: board_framework::Registry

pub mod board_system;

pub use board_system::*;
