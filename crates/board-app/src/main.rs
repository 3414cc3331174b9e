//! Demo entry point: stands up the full system over an in-memory store and
//! drives it the way the UI layer would, by publishing events and letting the
//! deferred handlers do the mutating and persisting.

use board_app::events::BoardEvent;
use board_app::lifecycle::{BoardSystem, SystemError};
use board_app::model::{CardHandle, ListHandle};
use board_app::storage::{BoardStore, MemoryStore, StoreError, STORAGE_KEY};
use board_framework::logging::setup_tracing;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Gives the deferred handler invocations of prior publishes time to run.
async fn settle() {
    tokio::time::sleep(Duration::from_millis(50)).await;
}

#[tokio::main]
async fn main() -> Result<(), SystemError> {
    // Setup tracing once for the entire application
    setup_tracing();

    info!("Starting board system demo");

    let store: Arc<dyn BoardStore> = Arc::new(MemoryStore::new());
    let system = BoardSystem::start(store.clone()).await?;

    // A new board, the way the board menu would create one.
    system.bus().publish(BoardEvent::BoardCreated {
        title: "Weekend Plans".to_string(),
    })?;
    settle().await;

    let board = match system.active_board() {
        Some(board) => board,
        None => {
            info!("Board was not created; nothing to demo");
            system.shutdown();
            return Ok(());
        }
    };
    info!(%board, "Active board ready");

    // Two lists on the board.
    for title in ["To Do", "Done"] {
        system.bus().publish(BoardEvent::ListCreated {
            board,
            title: title.to_string(),
        })?;
    }
    settle().await;

    let todo: ListHandle = {
        let data = system.data();
        let model = data.lock().await;
        let list = model
            .board(board)
            .map_err(StoreError::from)?
            .lists()
            .get(0)
            .map(|list| ListHandle {
                board,
                list: list.id,
            });
        match list {
            Some(handle) => handle,
            None => {
                info!("List was not created; nothing more to demo");
                system.shutdown();
                return Ok(());
            }
        }
    };

    // Cards in the first list.
    for content in ["buy milk", "call mom", "water plants"] {
        system.bus().publish(BoardEvent::CardCreated {
            list: todo,
            content: content.to_string(),
        })?;
    }
    settle().await;

    // Edit the middle card, then delete it.
    let middle: Option<CardHandle> = {
        let data = system.data();
        let model = data.lock().await;
        model
            .list(todo)
            .ok()
            .and_then(|list| list.cards().get(1))
            .map(|card| CardHandle {
                board,
                list: todo.list,
                card: card.id,
            })
    };
    if let Some(card) = middle {
        system.bus().publish(BoardEvent::CardUpdated {
            card,
            new_content: "call mom back".to_string(),
        })?;
        settle().await;
        system.bus().publish(BoardEvent::CardDeleted { card })?;
        settle().await;
    }

    // Show what the handlers built and what got persisted.
    {
        let data = system.data();
        let model = data.lock().await;
        for board in model.boards() {
            info!(title = %board.title, lists = board.lists().len(), "Board");
            for list in board.lists() {
                let contents: Vec<&str> =
                    list.cards().iter().map(|c| c.content.as_str()).collect();
                info!(title = %list.title, cards = ?contents, "List");
            }
        }
    }
    if let Some(payload) = store.load(STORAGE_KEY).await? {
        info!(%payload, "Persisted snapshot");
    }

    system.shutdown();
    info!("Demo completed");
    Ok(())
}
