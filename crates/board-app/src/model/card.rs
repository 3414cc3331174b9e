use crate::model::{BoardId, ListId};
use board_framework::Indexed;
use std::fmt::Display;

/// Type-safe identifier for Cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CardId(pub u32);

impl From<u32> for CardId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "card_{}", self.0)
    }
}

/// A card: the leaf of the containment tree.
///
/// `list` and `board` are non-owning back-references for navigation; the
/// board reference is denormalized so a card handle can reach its board
/// without walking the tree. Neither reference keeps the parent alive, and
/// once the parent is deleted any retained reference to this card is stale.
#[derive(Debug, Clone)]
pub struct Card {
    pub id: CardId,
    pub content: String,
    /// Zero-based position among the list's cards. Stamped by the owning
    /// list at insertion and repaired on sibling deletion.
    index: usize,
    pub list: ListId,
    pub board: BoardId,
}

impl Card {
    /// Builds a card for insertion; the owning list stamps the real position.
    pub(crate) fn new(id: CardId, content: String, list: ListId, board: BoardId) -> Self {
        Self {
            id,
            content,
            index: 0,
            list,
            board,
        }
    }
}

impl Indexed for Card {
    fn index(&self) -> usize {
        self.index
    }

    fn set_index(&mut self, index: usize) {
        self.index = index;
    }
}
