//! # Persistence Boundary
//!
//! The coordinator persists the whole Board/List/Card tree as one JSON string
//! record under a fixed key in a key-value store. Only `title`/`content` and
//! the nesting survive serialization: positions, ids and back-references are
//! never written out. Loading feeds each restored record through the entity
//! factories in array order, which re-derives every index as `0..n-1` per
//! container; traversal order is the sole source of truth for positions at
//! load time.
//!
//! The store itself sits behind the [`BoardStore`] trait; the browser-side
//! key-value store is an external collaborator, and [`MemoryStore`] is the
//! in-process implementation used by the demo and the tests.

use crate::model::AppData;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use tracing::debug;

/// The fixed record key the tree is stored under.
pub const STORAGE_KEY: &str = "boards";

/// Errors raised at the persistence boundary.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The backing store failed to read or write the record.
    #[error("storage backend error: {0}")]
    Backend(String),
    /// The stored payload is not a valid snapshot.
    #[error("malformed snapshot payload: {0}")]
    Malformed(#[from] serde_json::Error),
    /// Restoring the snapshot through the entity factories failed.
    #[error(transparent)]
    Restore(#[from] crate::model::ModelError),
}

/// A string-keyed record store.
#[async_trait]
pub trait BoardStore: Send + Sync {
    /// Reads the record under `key`, or `None` if it was never written.
    async fn load(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Writes `payload` under `key`, replacing any previous record.
    async fn save(&self, key: &str, payload: &str) -> Result<(), StoreError>;
}

/// In-memory [`BoardStore`], the stand-in for the browser's key-value store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BoardStore for MemoryStore {
    async fn load(&self, key: &str) -> Result<Option<String>, StoreError> {
        let records = self
            .records
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        Ok(records.get(key).cloned())
    }

    async fn save(&self, key: &str, payload: &str) -> Result<(), StoreError> {
        let mut records = self
            .records
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        records.insert(key.to_string(), payload.to_string());
        Ok(())
    }
}

/// Persisted shape of a card: content only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardSnapshot {
    pub content: String,
}

/// Persisted shape of a list: title plus its cards in order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListSnapshot {
    pub title: String,
    pub cards: Vec<CardSnapshot>,
}

/// Persisted shape of a board: title plus its lists in order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    pub title: String,
    pub lists: Vec<ListSnapshot>,
}

/// Captures the tree in its persisted shape, titles and nesting only.
pub fn snapshot(data: &AppData) -> Vec<BoardSnapshot> {
    data.boards()
        .iter()
        .map(|board| BoardSnapshot {
            title: board.title.clone(),
            lists: board
                .lists()
                .iter()
                .map(|list| ListSnapshot {
                    title: list.title.clone(),
                    cards: list
                        .cards()
                        .iter()
                        .map(|card| CardSnapshot {
                            content: card.content.clone(),
                        })
                        .collect(),
                })
                .collect(),
        })
        .collect()
}

/// Serializes the tree and writes it under [`STORAGE_KEY`].
#[tracing::instrument(skip_all)]
pub async fn persist(store: &dyn BoardStore, data: &AppData) -> Result<(), StoreError> {
    let payload = serde_json::to_string(&snapshot(data))?;
    debug!(bytes = payload.len(), "Persisting snapshot");
    store.save(STORAGE_KEY, &payload).await
}

/// Reads [`STORAGE_KEY`] and rebuilds the tree through the entity factories,
/// re-stamping ids, back-references and positions in traversal order. A store
/// with no record yields an empty tree.
#[tracing::instrument(skip_all)]
pub async fn restore(store: &dyn BoardStore) -> Result<AppData, StoreError> {
    let mut data = AppData::new();
    let Some(payload) = store.load(STORAGE_KEY).await? else {
        return Ok(data);
    };
    let snapshots: Vec<BoardSnapshot> = serde_json::from_str(&payload)?;
    for board_snapshot in snapshots {
        let board = data.add_board(board_snapshot.title);
        for list_snapshot in board_snapshot.lists {
            let list = data.add_list(board, list_snapshot.title)?;
            for card_snapshot in list_snapshot.cards {
                data.add_card(list, card_snapshot.content)?;
            }
        }
    }
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use board_framework::Indexed;

    fn sample_tree() -> AppData {
        let mut data = AppData::new();
        let board = data.add_board("Groceries".into());
        let list = data.add_list(board, "Today".into()).unwrap();
        data.add_card(list, "buy milk".into()).unwrap();
        data.add_card(list, "call mom".into()).unwrap();
        data.add_list(board, "Done".into()).unwrap();
        data
    }

    #[tokio::test]
    async fn snapshot_omits_indices_ids_and_back_references() {
        let data = sample_tree();
        let payload = serde_json::to_string(&snapshot(&data)).unwrap();

        assert!(payload.contains("buy milk"));
        assert!(!payload.contains("index"));
        assert!(!payload.contains("board"));
        assert!(!payload.contains("\"id\""));
    }

    #[tokio::test]
    async fn round_trip_rederives_positions_in_traversal_order() {
        let store = MemoryStore::new();
        let data = sample_tree();
        persist(&store, &data).await.expect("persist succeeds");

        let restored = restore(&store).await.expect("restore succeeds");
        let board = restored.boards().get(0).expect("one board");
        assert_eq!(board.title, "Groceries");
        assert_eq!(board.lists().len(), 2);
        for (position, list) in board.lists().iter().enumerate() {
            assert_eq!(list.index(), position);
            assert_eq!(list.board, board.id);
        }
        let today = board.lists().get(0).unwrap();
        let contents: Vec<_> = today.cards().iter().map(|c| c.content.as_str()).collect();
        assert_eq!(contents, ["buy milk", "call mom"]);
        for (position, card) in today.cards().iter().enumerate() {
            assert_eq!(card.index(), position);
            assert_eq!(card.list, today.id);
        }
    }

    #[tokio::test]
    async fn empty_store_restores_an_empty_tree() {
        let store = MemoryStore::new();
        let restored = restore(&store).await.expect("restore succeeds");
        assert!(restored.boards().is_empty());
    }

    #[tokio::test]
    async fn malformed_payload_is_a_store_error() {
        let store = MemoryStore::new();
        store.save(STORAGE_KEY, "not json").await.unwrap();
        let err = restore(&store).await.unwrap_err();
        assert!(matches!(err, StoreError::Malformed(_)));
    }
}
