//! # Application Coordinator
//!
//! The coordinator is the single consumer of UI events: it subscribes one
//! handler per event kind, and each handler applies the corresponding model
//! mutation and persists a fresh snapshot. Views publish; the coordinator
//! owns every write to the tree.
//!
//! # Architecture Note
//! Handlers run as deferred work on the bus's dispatch queue, possibly on a
//! different runtime thread than the publisher, so the model sits behind an
//! async mutex and every handler takes it for the full mutate-then-persist
//! span. That serializes tree access one mutation at a time: the
//! index-rewrite inside a deletion is not atomic, so no other writer may
//! observe the tree mid-repair.
//!
//! A handler that hits a stale handle or a broken positional invariant
//! returns the error to the dispatch task, which logs it; delivery to other
//! handlers and later events is unaffected.

use crate::events::{BoardEvent, BoardEventKind};
use crate::model::{AppData, BoardId};
use crate::storage::{self, BoardStore};
use board_framework::{BusError, EventBus, Subscription};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::Mutex as AsyncMutex;
use tracing::{debug, info};

/// The shared, serialized-access handle to the entity tree.
pub type SharedData = Arc<AsyncMutex<AppData>>;

/// Wires bus subscriptions to model mutations and persistence.
#[derive(Debug)]
pub struct Coordinator {
    subscriptions: Mutex<Vec<Subscription<BoardEvent>>>,
    active_board: Arc<Mutex<Option<BoardId>>>,
}

impl Coordinator {
    /// Subscribes a handler for every supported event kind. `initial_board`
    /// seeds the active-board view, the way a restored tree opens on its
    /// first board.
    ///
    /// The returned coordinator keeps the revocation handles; [`detach`]
    /// revokes them all.
    ///
    /// # Errors
    ///
    /// Returns [`BusError::UnsupportedKind`] if the bus was constructed
    /// without one of the kinds: a configuration error that stops setup. Any
    /// subscriptions already installed are revoked before the error is
    /// returned, so a failed attach leaves nothing on the bus.
    ///
    /// [`detach`]: Coordinator::detach
    pub fn attach(
        bus: &EventBus<BoardEvent>,
        data: SharedData,
        store: Arc<dyn BoardStore>,
        initial_board: Option<BoardId>,
    ) -> Result<Self, BusError<BoardEventKind>> {
        let active_board = Arc::new(Mutex::new(initial_board));
        let mut subscriptions = Vec::with_capacity(BoardEventKind::ALL.len());

        if let Err(error) = Self::wire(bus, data, store, &active_board, &mut subscriptions) {
            for subscription in subscriptions.drain(..) {
                subscription.revoke();
            }
            return Err(error);
        }

        info!(subscriptions = subscriptions.len(), "Coordinator attached");
        Ok(Self {
            subscriptions: Mutex::new(subscriptions),
            active_board,
        })
    }

    fn wire(
        bus: &EventBus<BoardEvent>,
        data: SharedData,
        store: Arc<dyn BoardStore>,
        active_board: &Arc<Mutex<Option<BoardId>>>,
        subscriptions: &mut Vec<Subscription<BoardEvent>>,
    ) -> Result<(), BusError<BoardEventKind>> {
        // board-created: add the board, switch to it, persist
        {
            let data = data.clone();
            let store = store.clone();
            let active = active_board.clone();
            subscriptions.push(bus.subscribe(BoardEventKind::BoardCreated, move |event| {
                let data = data.clone();
                let store = store.clone();
                let active = active.clone();
                async move {
                    if let BoardEvent::BoardCreated { title } = event {
                        let mut model = data.lock().await;
                        let board = model.add_board(title);
                        *active.lock().unwrap_or_else(PoisonError::into_inner) = Some(board);
                        storage::persist(store.as_ref(), &model).await?;
                    }
                    Ok(())
                }
            })?);
        }

        // board-changed: switch the active board; nothing to persist
        {
            let data = data.clone();
            let active = active_board.clone();
            subscriptions.push(bus.subscribe(BoardEventKind::BoardChanged, move |event| {
                let data = data.clone();
                let active = active.clone();
                async move {
                    if let BoardEvent::BoardChanged { board } = event {
                        let model = data.lock().await;
                        model.board(board)?;
                        *active.lock().unwrap_or_else(PoisonError::into_inner) = Some(board);
                        debug!(%board, "Active board switched");
                    }
                    Ok(())
                }
            })?);
        }

        // board-updated: retitle, persist
        {
            let data = data.clone();
            let store = store.clone();
            subscriptions.push(bus.subscribe(BoardEventKind::BoardUpdated, move |event| {
                let data = data.clone();
                let store = store.clone();
                async move {
                    if let BoardEvent::BoardUpdated { board, new_title } = event {
                        let mut model = data.lock().await;
                        model.set_board_title(board, new_title)?;
                        storage::persist(store.as_ref(), &model).await?;
                    }
                    Ok(())
                }
            })?);
        }

        // board-deleted: drop the subtree, clear the active board if it was
        // the one deleted, persist
        {
            let data = data.clone();
            let store = store.clone();
            let active = active_board.clone();
            subscriptions.push(bus.subscribe(BoardEventKind::BoardDeleted, move |event| {
                let data = data.clone();
                let store = store.clone();
                let active = active.clone();
                async move {
                    if let BoardEvent::BoardDeleted { board } = event {
                        let mut model = data.lock().await;
                        model.delete_board(board)?;
                        {
                            let mut current =
                                active.lock().unwrap_or_else(PoisonError::into_inner);
                            if *current == Some(board) {
                                *current = None;
                            }
                        }
                        storage::persist(store.as_ref(), &model).await?;
                    }
                    Ok(())
                }
            })?);
        }

        // list-created
        {
            let data = data.clone();
            let store = store.clone();
            subscriptions.push(bus.subscribe(BoardEventKind::ListCreated, move |event| {
                let data = data.clone();
                let store = store.clone();
                async move {
                    if let BoardEvent::ListCreated { board, title } = event {
                        let mut model = data.lock().await;
                        model.add_list(board, title)?;
                        storage::persist(store.as_ref(), &model).await?;
                    }
                    Ok(())
                }
            })?);
        }

        // list-updated
        {
            let data = data.clone();
            let store = store.clone();
            subscriptions.push(bus.subscribe(BoardEventKind::ListUpdated, move |event| {
                let data = data.clone();
                let store = store.clone();
                async move {
                    if let BoardEvent::ListUpdated { list, new_title } = event {
                        let mut model = data.lock().await;
                        model.set_list_title(list, new_title)?;
                        storage::persist(store.as_ref(), &model).await?;
                    }
                    Ok(())
                }
            })?);
        }

        // list-deleted
        {
            let data = data.clone();
            let store = store.clone();
            subscriptions.push(bus.subscribe(BoardEventKind::ListDeleted, move |event| {
                let data = data.clone();
                let store = store.clone();
                async move {
                    if let BoardEvent::ListDeleted { list } = event {
                        let mut model = data.lock().await;
                        model.delete_list(list)?;
                        storage::persist(store.as_ref(), &model).await?;
                    }
                    Ok(())
                }
            })?);
        }

        // card-created
        {
            let data = data.clone();
            let store = store.clone();
            subscriptions.push(bus.subscribe(BoardEventKind::CardCreated, move |event| {
                let data = data.clone();
                let store = store.clone();
                async move {
                    if let BoardEvent::CardCreated { list, content } = event {
                        let mut model = data.lock().await;
                        model.add_card(list, content)?;
                        storage::persist(store.as_ref(), &model).await?;
                    }
                    Ok(())
                }
            })?);
        }

        // card-updated
        {
            let data = data.clone();
            let store = store.clone();
            subscriptions.push(bus.subscribe(BoardEventKind::CardUpdated, move |event| {
                let data = data.clone();
                let store = store.clone();
                async move {
                    if let BoardEvent::CardUpdated { card, new_content } = event {
                        let mut model = data.lock().await;
                        model.set_card_content(card, new_content)?;
                        storage::persist(store.as_ref(), &model).await?;
                    }
                    Ok(())
                }
            })?);
        }

        // card-deleted
        {
            let data = data.clone();
            let store = store.clone();
            subscriptions.push(bus.subscribe(BoardEventKind::CardDeleted, move |event| {
                let data = data.clone();
                let store = store.clone();
                async move {
                    if let BoardEvent::CardDeleted { card } = event {
                        let mut model = data.lock().await;
                        model.delete_card(card)?;
                        storage::persist(store.as_ref(), &model).await?;
                    }
                    Ok(())
                }
            })?);
        }

        Ok(())
    }

    /// The board the user is currently viewing, if any.
    pub fn active_board(&self) -> Option<BoardId> {
        *self
            .active_board
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Revokes every subscription. Events published afterwards go nowhere;
    /// invocations already issued still run.
    pub fn detach(&self) {
        let subscriptions: Vec<_> = self
            .subscriptions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .drain(..)
            .collect();
        for subscription in subscriptions {
            subscription.revoke();
        }
        info!("Coordinator detached");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AppData;
    use crate::storage::MemoryStore;

    #[tokio::test]
    async fn failed_attach_revokes_the_subscriptions_already_installed() {
        // CardDeleted is missing, so attach fails on its last subscribe.
        let bus = EventBus::<BoardEvent>::new(
            BoardEventKind::ALL
                .into_iter()
                .filter(|kind| *kind != BoardEventKind::CardDeleted),
        );
        let data: SharedData = Arc::new(AsyncMutex::new(AppData::new()));
        let store: Arc<dyn BoardStore> = Arc::new(MemoryStore::new());

        let err = Coordinator::attach(&bus, data, store, None).unwrap_err();
        assert!(matches!(
            err,
            BusError::UnsupportedKind(BoardEventKind::CardDeleted)
        ));

        // Nothing stays wired: the earlier subscriptions were revoked.
        for kind in BoardEventKind::ALL {
            assert_eq!(
                bus.subscriber_count(kind).unwrap_or(0),
                0,
                "{kind:?} still has a subscriber after a failed attach"
            );
        }
    }

    #[tokio::test]
    async fn initial_board_seeds_the_active_view() {
        let bus = EventBus::<BoardEvent>::new(BoardEventKind::ALL);
        let data: SharedData = Arc::new(AsyncMutex::new(AppData::new()));
        let store: Arc<dyn BoardStore> = Arc::new(MemoryStore::new());

        let coordinator =
            Coordinator::attach(&bus, data, store, Some(BoardId(7))).expect("attach succeeds");
        assert_eq!(coordinator.active_board(), Some(BoardId(7)));
    }
}
