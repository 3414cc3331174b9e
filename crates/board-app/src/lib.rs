//! # Board App
//!
//! A board/list/card organizer built on the `board-framework` coordination
//! core.
//!
//! ## Core Components
//!
//! - **[model]**: the containment tree ([`Board`](model::Board) →
//!   [`List`](model::List) → [`Card`](model::Card)) with contiguous
//!   zero-based sibling positions, rooted in [`AppData`](model::AppData).
//! - **[events]**: the closed set of ten event kinds the UI publishes, as one
//!   tagged enum with typed payloads.
//! - **[storage]**: the persistence boundary, a JSON snapshot of
//!   titles/content/nesting under a fixed key, behind the
//!   [`BoardStore`](storage::BoardStore) trait.
//! - **[coordinator]**: the single consumer of events; mutates the model and
//!   persists after every change.
//! - **[lifecycle]**: the [`BoardSystem`](lifecycle::BoardSystem) composition
//!   root wiring everything through the component registry.
//!
//! ## Data Flow
//!
//! UI publishes → bus defers → coordinator handler locks the tree, mutates,
//! persists. Publishers are never blocked by, and never re-entered from,
//! their own subscribers.

pub mod coordinator;
pub mod events;
pub mod lifecycle;
pub mod model;
pub mod storage;
