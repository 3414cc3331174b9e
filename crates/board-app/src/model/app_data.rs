use crate::model::{
    Board, BoardId, Card, CardHandle, CardId, List, ListHandle, ListId, ModelError,
};
use board_framework::{Indexed, OrderedChildren};
use tracing::{debug, info};

/// The application's data root: every board, in display order.
///
/// All mutation goes through this type, which is the single owner of the
/// containment tree. Entities are created only through its factory operations
/// (which stamp back-references and positions at insertion time) and removed
/// only through its delete operations (which repair sibling indices). There
/// is no locking here; callers serialize access, one mutation at a time.
#[derive(Debug, Default)]
pub struct AppData {
    boards: OrderedChildren<Board>,
    next_id: u32,
}

impl AppData {
    pub fn new() -> Self {
        Self::default()
    }

    fn alloc_id(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }

    /// The boards in display order.
    pub fn boards(&self) -> &OrderedChildren<Board> {
        &self.boards
    }

    /// The board with the given id.
    pub fn board(&self, id: BoardId) -> Result<&Board, ModelError> {
        self.boards
            .iter()
            .find(|board| board.id == id)
            .ok_or(ModelError::BoardNotFound(id))
    }

    fn board_mut(&mut self, id: BoardId) -> Result<&mut Board, ModelError> {
        self.boards
            .iter_mut()
            .find(|board| board.id == id)
            .ok_or(ModelError::BoardNotFound(id))
    }

    /// Resolves a list handle against the live tree.
    pub fn list(&self, handle: ListHandle) -> Result<&List, ModelError> {
        self.board(handle.board)?
            .list(handle.list)
            .ok_or(ModelError::ListNotFound(handle.list))
    }

    /// Resolves a card handle against the live tree.
    pub fn card(&self, handle: CardHandle) -> Result<&Card, ModelError> {
        let list = self.list(ListHandle {
            board: handle.board,
            list: handle.list,
        })?;
        list.card(handle.card)
            .ok_or(ModelError::CardNotFound(handle.card))
    }

    /// Creates a board at the tail position.
    pub fn add_board(&mut self, title: String) -> BoardId {
        let id = BoardId(self.alloc_id());
        let index = self.boards.push(Board::new(id, title));
        info!(board = %id, index, "Board created");
        id
    }

    /// Creates a list at the tail of the given board.
    pub fn add_list(&mut self, board: BoardId, title: String) -> Result<ListHandle, ModelError> {
        let id = ListId(self.alloc_id());
        let index = self.board_mut(board)?.add_list(id, title);
        info!(%board, list = %id, index, "List created");
        Ok(ListHandle { board, list: id })
    }

    /// Creates a card at the tail of the given list.
    pub fn add_card(&mut self, list: ListHandle, content: String) -> Result<CardHandle, ModelError> {
        let id = CardId(self.alloc_id());
        let owner = self
            .board_mut(list.board)?
            .list_mut(list.list)
            .ok_or(ModelError::ListNotFound(list.list))?;
        let index = owner.add_card(id, content);
        info!(board = %list.board, list = %list.list, card = %id, index, "Card created");
        Ok(CardHandle {
            board: list.board,
            list: list.list,
            card: id,
        })
    }

    /// Replaces the board's title. Positions are unaffected.
    pub fn set_board_title(&mut self, board: BoardId, title: String) -> Result<(), ModelError> {
        self.board_mut(board)?.title = title;
        debug!(%board, "Board title updated");
        Ok(())
    }

    /// Replaces the list's title. Positions are unaffected.
    pub fn set_list_title(&mut self, list: ListHandle, title: String) -> Result<(), ModelError> {
        let owner = self
            .board_mut(list.board)?
            .list_mut(list.list)
            .ok_or(ModelError::ListNotFound(list.list))?;
        owner.title = title;
        debug!(board = %list.board, list = %list.list, "List title updated");
        Ok(())
    }

    /// Replaces the card's content. Positions are unaffected.
    pub fn set_card_content(&mut self, card: CardHandle, content: String) -> Result<(), ModelError> {
        let owner = self
            .board_mut(card.board)?
            .list_mut(card.list)
            .ok_or(ModelError::ListNotFound(card.list))?;
        let target = owner
            .card_mut(card.card)
            .ok_or(ModelError::CardNotFound(card.card))?;
        target.content = content;
        debug!(card = %card.card, "Card content updated");
        Ok(())
    }

    /// Deletes a board and its whole subtree, repairing the positions of the
    /// boards that followed it. Handles into the subtree become stale.
    pub fn delete_board(&mut self, id: BoardId) -> Result<Board, ModelError> {
        let position = self
            .boards
            .iter()
            .position(|board| board.id == id)
            .ok_or(ModelError::BoardNotFound(id))?;
        let recorded = self.boards.get(position).map(Indexed::index);
        if recorded != Some(position) {
            return Err(ModelError::IndexMismatch {
                entity: id.to_string(),
                recorded: recorded.unwrap_or(usize::MAX),
                actual: position,
            });
        }
        let removed = self.boards.remove(position)?;
        info!(board = %id, remaining = self.boards.len(), "Board deleted");
        Ok(removed)
    }

    /// Deletes a list (and its cards) from its board.
    pub fn delete_list(&mut self, handle: ListHandle) -> Result<List, ModelError> {
        let removed = self.board_mut(handle.board)?.delete_list(handle.list)?;
        info!(board = %handle.board, list = %handle.list, "List deleted");
        Ok(removed)
    }

    /// Deletes a card from its list.
    pub fn delete_card(&mut self, handle: CardHandle) -> Result<Card, ModelError> {
        let owner = self
            .board_mut(handle.board)?
            .list_mut(handle.list)
            .ok_or(ModelError::ListNotFound(handle.list))?;
        let removed = owner.delete_card(handle.card)?;
        info!(list = %handle.list, card = %handle.card, "Card deleted");
        Ok(removed)
    }
}
