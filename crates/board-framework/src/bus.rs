//! # Event Bus
//!
//! This module defines the [`EventBus`], a publish/subscribe channel over a
//! fixed, closed set of event kinds with **deferred dispatch**: `publish`
//! returns before any subscriber runs. Dispatch goes through a single FIFO
//! queue drained by one dispatcher task, so deferred work is applied strictly
//! in the order it was issued, on any runtime flavor.
//!
//! # Architecture Note
//! The deferral is the point. A caller that publishes an event must not be
//! blocked by its own subscribers, nor observe re-entrant mutation from them
//! within its own synchronous stretch of work. `publish` only snapshots the
//! subscriber list and enqueues; the dispatcher task picks the entry up
//! later and awaits each handler in turn.
//!
//! Four guarantees, and one non-guarantee:
//!
//! - the subscriber list is snapshotted at publish time, so a handler
//!   subscribed afterwards never sees that publish;
//! - publishes are dispatched in publish order, and within one publish the
//!   handlers run in subscription order, each awaited to completion before
//!   the next starts;
//! - a publish made from inside a handler lands at the queue tail and runs
//!   only after the current publish's remaining handlers;
//! - a failing or panicking handler is isolated, logged, and never prevents
//!   delivery to the rest of the snapshot;
//! - there is no cancellation of an enqueued publish, no completion signal,
//!   and no timeout on a handler.
//!
//! Revocation is by stable subscription identity, never by list position, so
//! a revocation handle stays valid no matter how many other subscriptions for
//! the same kind come and go around it.

use crate::error::{BusError, HandlerError};
use std::collections::HashMap;
use std::fmt::Debug;
use std::future::Future;
use std::hash::Hash;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, Weak};
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Contract for event types carried by an [`EventBus`].
///
/// An event is a tagged value: the payload lives in the event itself and the
/// [`kind`](BusEvent::kind) discriminant selects which subscriber list it is
/// delivered to. One enum with one variant per kind is the expected shape.
pub trait BusEvent: Clone + Send + 'static {
    /// Discriminant identifying the event's kind.
    type Kind: Copy + Eq + Hash + Debug + Send + Sync + 'static;

    /// The kind this event is delivered under.
    fn kind(&self) -> Self::Kind;
}

/// Stable identity of a single subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "sub_{}", self.0)
    }
}

type BoxedHandler<E> =
    Arc<dyn Fn(E) -> Pin<Box<dyn Future<Output = Result<(), HandlerError>> + Send>> + Send + Sync>;

struct Subscriber<E: BusEvent> {
    id: SubscriptionId,
    handler: BoxedHandler<E>,
}

/// One publish, captured at issue time: the event plus the subscriber
/// snapshot it will be delivered to.
struct Dispatch<E: BusEvent> {
    event: E,
    handlers: Vec<(SubscriptionId, BoxedHandler<E>)>,
}

struct Inner<E: BusEvent> {
    /// One subscriber list per supported kind. Kind membership in this map is
    /// the "supported set" check: the map is populated at construction and
    /// never gains or loses keys afterwards.
    subscribers: Mutex<HashMap<E::Kind, Vec<Subscriber<E>>>>,
    next_id: AtomicU64,
}

/// Publish/subscribe bus over a closed set of event kinds.
///
/// Cheap to clone and share: clones are handles onto the same subscriber
/// state and the same dispatch queue, like channel senders.
pub struct EventBus<E: BusEvent> {
    inner: Arc<Inner<E>>,
    queue: mpsc::UnboundedSender<Dispatch<E>>,
}

impl<E: BusEvent> Clone for EventBus<E> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            queue: self.queue.clone(),
        }
    }
}

impl<E: BusEvent> EventBus<E> {
    /// Creates a bus supporting exactly the given kinds.
    ///
    /// The set is fixed for the lifetime of the bus; it is not extensible at
    /// runtime. The dispatcher task is spawned here, so the bus must be
    /// created from within a Tokio runtime; the task exits once every clone
    /// of the bus has been dropped.
    pub fn new<I>(kinds: I) -> Self
    where
        I: IntoIterator<Item = E::Kind>,
    {
        let subscribers = kinds.into_iter().map(|kind| (kind, Vec::new())).collect();
        let inner = Arc::new(Inner {
            subscribers: Mutex::new(subscribers),
            next_id: AtomicU64::new(1),
        });

        let (queue, mut pending) = mpsc::unbounded_channel::<Dispatch<E>>();
        tokio::spawn(async move {
            while let Some(Dispatch { event, handlers }) = pending.recv().await {
                for (id, handler) in handlers {
                    // Each invocation runs in its own task so a panic is
                    // contained; awaiting it keeps dispatch sequential.
                    match tokio::spawn(handler(event.clone())).await {
                        Ok(Ok(())) => {}
                        Ok(Err(error)) => {
                            warn!(subscription = %id, %error, "Event handler failed");
                        }
                        Err(_) => {
                            warn!(subscription = %id, "Event handler panicked");
                        }
                    }
                }
            }
        });

        Self { inner, queue }
    }

    /// Appends `handler` to the subscriber list for `kind`.
    ///
    /// Returns a [`Subscription`] handle that revokes exactly this
    /// subscription. The handler runs once per future publish of `kind`, as a
    /// deferred unit of work; its `Err` results are logged, never propagated.
    ///
    /// # Errors
    ///
    /// Returns [`BusError::UnsupportedKind`] if `kind` was not declared at
    /// construction.
    pub fn subscribe<H, Fut>(
        &self,
        kind: E::Kind,
        handler: H,
    ) -> Result<Subscription<E>, BusError<E::Kind>>
    where
        H: Fn(E) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), HandlerError>> + Send + 'static,
    {
        let id = SubscriptionId(self.inner.next_id.fetch_add(1, Ordering::Relaxed));
        let boxed: BoxedHandler<E> = Arc::new(move |event| Box::pin(handler(event)));

        let mut subscribers = self
            .inner
            .subscribers
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let list = subscribers
            .get_mut(&kind)
            .ok_or(BusError::UnsupportedKind(kind))?;
        list.push(Subscriber { id, handler: boxed });
        debug!(?kind, %id, subscribers = list.len(), "Subscribed");

        Ok(Subscription {
            id,
            kind,
            inner: Arc::downgrade(&self.inner),
        })
    }

    /// Publishes `event` to every handler currently subscribed to its kind.
    ///
    /// The subscriber list is snapshotted before returning and the publish is
    /// placed at the tail of the dispatch queue; the dispatcher task delivers
    /// queued publishes in order, one handler at a time. The call returns
    /// without waiting for any handler.
    ///
    /// # Errors
    ///
    /// Returns [`BusError::UnsupportedKind`] if the event's kind was not
    /// declared at construction. Handler failures are not errors of `publish`.
    pub fn publish(&self, event: E) -> Result<(), BusError<E::Kind>> {
        let kind = event.kind();
        let handlers: Vec<(SubscriptionId, BoxedHandler<E>)> = {
            let subscribers = self
                .inner
                .subscribers
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            let list = subscribers
                .get(&kind)
                .ok_or(BusError::UnsupportedKind(kind))?;
            list.iter()
                .map(|s| (s.id, Arc::clone(&s.handler)))
                .collect()
        };

        debug!(?kind, subscribers = handlers.len(), "Publishing");
        // The dispatcher outlives every sender, so this only fails after the
        // last bus clone is gone.
        if self.queue.send(Dispatch { event, handlers }).is_err() {
            warn!(?kind, "Dispatcher is gone; event dropped");
        }
        Ok(())
    }

    /// Number of live subscriptions for `kind`, or `None` for an unsupported
    /// kind.
    pub fn subscriber_count(&self, kind: E::Kind) -> Option<usize> {
        let subscribers = self
            .inner
            .subscribers
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        subscribers.get(&kind).map(Vec::len)
    }
}

/// Revocation capability for one subscription.
///
/// Revoking removes exactly the subscription it was returned for, by identity:
/// handles held for other subscriptions of the same kind stay valid regardless
/// of how the list has shifted since. Dropping the handle does *not* revoke;
/// an unrevoked subscription lives as long as the bus.
#[derive(Debug)]
pub struct Subscription<E: BusEvent> {
    id: SubscriptionId,
    kind: E::Kind,
    inner: Weak<Inner<E>>,
}

impl<E: BusEvent> Subscription<E> {
    /// This subscription's stable identity.
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// The kind this subscription listens to.
    pub fn kind(&self) -> E::Kind {
        self.kind
    }

    /// Removes this subscription from its kind's list.
    ///
    /// Future publishes no longer reach the handler; publishes already in the
    /// dispatch queue still deliver to it. Revoking after the bus itself has
    /// been dropped is a no-op.
    pub fn revoke(self) {
        if let Some(inner) = self.inner.upgrade() {
            let mut subscribers = inner
                .subscribers
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            if let Some(list) = subscribers.get_mut(&self.kind) {
                list.retain(|s| s.id != self.id);
                debug!(kind = ?self.kind, id = %self.id, "Subscription revoked");
            }
        }
    }
}
