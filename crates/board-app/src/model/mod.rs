//! # Entity Model
//!
//! The hierarchical, order-preserving data model: [`Board`]s contain
//! [`List`]s contain [`Card`]s, each child carrying a zero-based position
//! among its siblings that stays contiguous across every insertion and
//! removal (see [`board_framework::ordered`] for the shared index repair).
//!
//! Parents exclusively own their children; children refer back to their
//! parents with typed ids ([`BoardId`], [`ListId`], [`CardId`]), not owning
//! pointers. [`ListHandle`] and [`CardHandle`] bundle those ids into
//! navigation handles that event payloads can carry across the bus: a handle
//! into a deleted subtree simply stops resolving, and every operation given
//! one fails with a [`ModelError`] instead of touching the wrong entity.

mod app_data;
mod board;
mod card;
mod list;

pub use app_data::AppData;
pub use board::{Board, BoardId};
pub use card::{Card, CardId};
pub use list::{List, ListId};

use board_framework::OrderedError;

/// Navigation handle for a list: the owning board plus the list itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListHandle {
    pub board: BoardId,
    pub list: ListId,
}

/// Navigation handle for a card. The board id is denormalized so handlers
/// can reach the board without walking the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CardHandle {
    pub board: BoardId,
    pub list: ListId,
    pub card: CardId,
}

/// Logic errors raised by model operations.
///
/// These indicate a stale handle or a broken positional invariant. They are
/// surfaced immediately and never auto-corrected; a handler hitting one
/// reports it through the bus's isolated-failure path.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("board {0} does not exist")]
    BoardNotFound(BoardId),
    #[error("list {0} does not exist")]
    ListNotFound(ListId),
    #[error("card {0} does not exist")]
    CardNotFound(CardId),
    /// An entity's recorded position disagrees with where its parent is
    /// actually storing it. Should never occur under correct handler wiring.
    #[error("{entity} records index {recorded} but is stored at {actual}")]
    IndexMismatch {
        entity: String,
        recorded: usize,
        actual: usize,
    },
    #[error(transparent)]
    Ordered(#[from] OrderedError),
}
