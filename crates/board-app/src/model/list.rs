use crate::model::{BoardId, Card, CardId, ModelError};
use board_framework::{Indexed, OrderedChildren};
use std::fmt::Display;

/// Type-safe identifier for Lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListId(pub u32);

impl From<u32> for ListId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl Display for ListId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "list_{}", self.0)
    }
}

/// A list of cards, owned by a board.
///
/// The list exclusively owns its cards; `board` is a non-owning back-reference
/// for navigation only.
#[derive(Debug, Clone)]
pub struct List {
    pub id: ListId,
    pub title: String,
    /// Zero-based position among the board's lists.
    index: usize,
    pub board: BoardId,
    cards: OrderedChildren<Card>,
}

impl List {
    pub(crate) fn new(id: ListId, title: String, board: BoardId) -> Self {
        Self {
            id,
            title,
            index: 0,
            board,
            cards: OrderedChildren::new(),
        }
    }

    /// The cards in storage order.
    pub fn cards(&self) -> &OrderedChildren<Card> {
        &self.cards
    }

    /// The card with the given id, if it is still in this list.
    pub fn card(&self, id: CardId) -> Option<&Card> {
        self.cards.iter().find(|card| card.id == id)
    }

    pub(crate) fn card_mut(&mut self, id: CardId) -> Option<&mut Card> {
        self.cards.iter_mut().find(|card| card.id == id)
    }

    /// Constructs a card with its back-references and stamps its position at
    /// the tail. Returns the stamped index.
    pub(crate) fn add_card(&mut self, id: CardId, content: String) -> usize {
        self.cards.push(Card::new(id, content, self.id, self.board))
    }

    /// Removes the card at its recorded index, repairing the indices of every
    /// card that followed it.
    ///
    /// # Errors
    ///
    /// [`ModelError::CardNotFound`] if no card with this id is in the list;
    /// [`ModelError::IndexMismatch`] if the card's recorded index does not
    /// match where the list is actually storing it (a logic error that should
    /// never occur under correct handler wiring).
    pub(crate) fn delete_card(&mut self, id: CardId) -> Result<Card, ModelError> {
        let position = self
            .cards
            .iter()
            .position(|card| card.id == id)
            .ok_or(ModelError::CardNotFound(id))?;
        let recorded = self.cards.get(position).map(Indexed::index);
        if recorded != Some(position) {
            return Err(ModelError::IndexMismatch {
                entity: id.to_string(),
                recorded: recorded.unwrap_or(usize::MAX),
                actual: position,
            });
        }
        Ok(self.cards.remove(position)?)
    }
}

impl Indexed for List {
    fn index(&self) -> usize {
        self.index
    }

    fn set_index(&mut self, index: usize) {
        self.index = index;
    }
}
