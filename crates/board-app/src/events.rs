//! # Application Events
//!
//! The closed set of occurrences the UI layer exchanges with the
//! coordinator, as one tagged enum: each [`BoardEvent`] variant is an event
//! kind together with its strongly-typed payload, so no caller needs to know
//! per-kind field-name conventions. [`BoardEventKind`] is the matching
//! fieldless discriminant used to pick a subscriber list, and
//! [`BoardEventKind::ALL`] is the full supported set handed to the bus at
//! construction.

use crate::model::{BoardId, CardHandle, ListHandle};
use board_framework::BusEvent;

/// Discriminants for the supported event kinds. The set is fixed; the bus is
/// not extensible at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoardEventKind {
    BoardCreated,
    BoardChanged,
    BoardUpdated,
    BoardDeleted,
    ListCreated,
    ListUpdated,
    ListDeleted,
    CardCreated,
    CardUpdated,
    CardDeleted,
}

impl BoardEventKind {
    /// Every supported kind, in declaration order.
    pub const ALL: [BoardEventKind; 10] = [
        BoardEventKind::BoardCreated,
        BoardEventKind::BoardChanged,
        BoardEventKind::BoardUpdated,
        BoardEventKind::BoardDeleted,
        BoardEventKind::ListCreated,
        BoardEventKind::ListUpdated,
        BoardEventKind::ListDeleted,
        BoardEventKind::CardCreated,
        BoardEventKind::CardUpdated,
        BoardEventKind::CardDeleted,
    ];
}

/// One event as published by the UI layer.
///
/// Creation events carry the container plus the new text; update events carry
/// the entity plus its new value; deletion and board-switch events carry the
/// entity alone.
#[derive(Debug, Clone)]
pub enum BoardEvent {
    /// A new board was created with this title.
    BoardCreated { title: String },
    /// The user switched to another board.
    BoardChanged { board: BoardId },
    /// A board was retitled.
    BoardUpdated { board: BoardId, new_title: String },
    /// A board was deleted.
    BoardDeleted { board: BoardId },
    /// A new list was created on the board.
    ListCreated { board: BoardId, title: String },
    /// A list was retitled.
    ListUpdated { list: ListHandle, new_title: String },
    /// A list was deleted.
    ListDeleted { list: ListHandle },
    /// A new card was created in the list.
    CardCreated { list: ListHandle, content: String },
    /// A card's content was edited.
    CardUpdated { card: CardHandle, new_content: String },
    /// A card was deleted.
    CardDeleted { card: CardHandle },
}

impl BusEvent for BoardEvent {
    type Kind = BoardEventKind;

    fn kind(&self) -> BoardEventKind {
        match self {
            BoardEvent::BoardCreated { .. } => BoardEventKind::BoardCreated,
            BoardEvent::BoardChanged { .. } => BoardEventKind::BoardChanged,
            BoardEvent::BoardUpdated { .. } => BoardEventKind::BoardUpdated,
            BoardEvent::BoardDeleted { .. } => BoardEventKind::BoardDeleted,
            BoardEvent::ListCreated { .. } => BoardEventKind::ListCreated,
            BoardEvent::ListUpdated { .. } => BoardEventKind::ListUpdated,
            BoardEvent::ListDeleted { .. } => BoardEventKind::ListDeleted,
            BoardEvent::CardCreated { .. } => BoardEventKind::CardCreated,
            BoardEvent::CardUpdated { .. } => BoardEventKind::CardUpdated,
            BoardEvent::CardDeleted { .. } => BoardEventKind::CardDeleted,
        }
    }
}
