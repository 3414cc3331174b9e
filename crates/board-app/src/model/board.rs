use crate::model::{List, ListId, ModelError};
use board_framework::{Indexed, OrderedChildren};
use std::fmt::Display;

/// Type-safe identifier for Boards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BoardId(pub u32);

impl From<u32> for BoardId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl Display for BoardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "board_{}", self.0)
    }
}

/// The root entity of one containment tree: a board exclusively owns its
/// lists, which in turn own their cards. Deleting a board drops the whole
/// subtree; references into it held elsewhere become stale.
#[derive(Debug, Clone)]
pub struct Board {
    pub id: BoardId,
    pub title: String,
    /// Zero-based position among all boards.
    index: usize,
    lists: OrderedChildren<List>,
}

impl Board {
    pub(crate) fn new(id: BoardId, title: String) -> Self {
        Self {
            id,
            title,
            index: 0,
            lists: OrderedChildren::new(),
        }
    }

    /// The lists in storage order.
    pub fn lists(&self) -> &OrderedChildren<List> {
        &self.lists
    }

    /// The list with the given id, if it is still on this board.
    pub fn list(&self, id: ListId) -> Option<&List> {
        self.lists.iter().find(|list| list.id == id)
    }

    pub(crate) fn list_mut(&mut self, id: ListId) -> Option<&mut List> {
        self.lists.iter_mut().find(|list| list.id == id)
    }

    /// Constructs a list with its back-reference and stamps its position at
    /// the tail. Returns the stamped index.
    pub(crate) fn add_list(&mut self, id: ListId, title: String) -> usize {
        self.lists.push(List::new(id, title, self.id))
    }

    /// Removes the list at its recorded index, repairing the indices of every
    /// list that followed it. The removed list carries its cards with it.
    pub(crate) fn delete_list(&mut self, id: ListId) -> Result<List, ModelError> {
        let position = self
            .lists
            .iter()
            .position(|list| list.id == id)
            .ok_or(ModelError::ListNotFound(id))?;
        let recorded = self.lists.get(position).map(Indexed::index);
        if recorded != Some(position) {
            return Err(ModelError::IndexMismatch {
                entity: id.to_string(),
                recorded: recorded.unwrap_or(usize::MAX),
                actual: position,
            });
        }
        Ok(self.lists.remove(position)?)
    }
}

impl Indexed for Board {
    fn index(&self) -> usize {
        self.index
    }

    fn set_index(&mut self, index: usize) {
        self.index = index;
    }
}
