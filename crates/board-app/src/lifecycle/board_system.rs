use crate::coordinator::{Coordinator, SharedData};
use crate::events::{BoardEvent, BoardEventKind};
use crate::model::BoardId;
use crate::storage::{self, BoardStore, StoreError};
use board_framework::{BusError, Component, EventBus, Registry, RegistryError};
use std::sync::Arc;
use tokio::sync::Mutex as AsyncMutex;
use tracing::info;

/// Component names, in registration (= dependency) order.
const STORAGE: &str = "storage";
const EVENTS: &str = "events";
const APP_DATA: &str = "app-data";
const COORDINATOR: &str = "coordinator";

/// Errors that can stop system startup.
///
/// All of these are configuration errors: they surface before any event is
/// published and indicate a wiring or persisted-state problem.
#[derive(Debug, thiserror::Error)]
pub enum SystemError {
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error(transparent)]
    Bus(#[from] BusError<BoardEventKind>),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// The running application: registry-wired bus, model and coordinator.
///
/// # Example
///
/// ```ignore
/// let store = Arc::new(MemoryStore::new());
/// let system = BoardSystem::start(store).await?;
///
/// system.bus().publish(BoardEvent::BoardCreated { title: "Chores".into() })?;
/// // ... let the deferred handlers run ...
///
/// system.shutdown();
/// ```
pub struct BoardSystem {
    registry: Registry,
    bus: EventBus<BoardEvent>,
    data: SharedData,
    coordinator: Arc<Coordinator>,
}

impl BoardSystem {
    /// Builds the registry, restores the tree from `store`, and attaches the
    /// coordinator. On return the system is live: published events will be
    /// handled.
    ///
    /// # Errors
    ///
    /// Any [`SystemError`] here is fatal; a half-wired system is never
    /// returned.
    pub async fn start(store: Arc<dyn BoardStore>) -> Result<Self, SystemError> {
        let mut registry = Registry::new();

        {
            let store = store.clone();
            registry.register(STORAGE, &[], move |_| Some(Arc::new(store) as Component))?;
        }

        registry.register(EVENTS, &[], |_| {
            Some(Arc::new(EventBus::<BoardEvent>::new(BoardEventKind::ALL)) as Component)
        })?;

        // The tree is restored before its registration; the declared
        // dependency records that storage had to come first.
        let restored = storage::restore(store.as_ref()).await?;
        // A restored tree opens on its first board, as a fresh page load does.
        let first_board = restored.boards().get(0).map(|board| board.id);
        let data: SharedData = Arc::new(AsyncMutex::new(restored));
        {
            let data = data.clone();
            registry.register(APP_DATA, &[STORAGE], move |_| {
                Some(Arc::new(data) as Component)
            })?;
        }

        registry.register(COORDINATOR, &[EVENTS, APP_DATA, STORAGE], |deps| {
            let bus = deps[0].clone().downcast::<EventBus<BoardEvent>>().ok()?;
            let data = deps[1].clone().downcast::<SharedData>().ok()?;
            let store = deps[2].clone().downcast::<Arc<dyn BoardStore>>().ok()?;
            let coordinator = Coordinator::attach(
                bus.as_ref(),
                SharedData::clone(&data),
                Arc::clone(&store),
                first_board,
            )
            .ok()?;
            Some(Arc::new(coordinator) as Component)
        })?;

        let bus = registry.lookup_as::<EventBus<BoardEvent>>(EVENTS)?;
        let coordinator = registry.lookup_as::<Coordinator>(COORDINATOR)?;

        info!(components = registry.len(), "Board system started");
        Ok(Self {
            registry,
            bus: EventBus::clone(bus.as_ref()),
            data,
            coordinator,
        })
    }

    /// The event bus; clone it freely to hand to publishers.
    pub fn bus(&self) -> &EventBus<BoardEvent> {
        &self.bus
    }

    /// The shared entity tree. Lock it to inspect state the deferred
    /// handlers have produced.
    pub fn data(&self) -> SharedData {
        SharedData::clone(&self.data)
    }

    /// The board the user is currently viewing, if any.
    pub fn active_board(&self) -> Option<BoardId> {
        self.coordinator.active_board()
    }

    /// The underlying component registry.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Detaches the coordinator from the bus. Already-issued handler
    /// invocations still run; nothing new is delivered afterwards.
    pub fn shutdown(self) {
        self.coordinator.detach();
        info!("Board system shut down");
    }
}
