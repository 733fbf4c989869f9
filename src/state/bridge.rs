/// Entity synchronization bridge
///
/// Exposes a derived value computed from a possibly-absent external entity.
/// The value is recomputed whenever the entity reference changes, and — if
/// the entity supports event subscription — whenever the entity emits an
/// "updated" event. Entities without the subscription capability are a
/// degraded mode, not an error: their value only refreshes on reference
/// swap.
///
/// The external session handle is a long-lived object whose internal fields
/// mutate without the holder replacing the reference, so reference-equality
/// refresh alone would miss updates.

use std::sync::{Arc, Mutex, Weak};

/// Event name emitted by entities when their internal state changes
pub const UPDATED_EVENT: &str = "updated";

/// Callback registered with a subscribable entity
pub type Listener = Arc<dyn Fn() + Send + Sync>;

/// Handle of one registered listener
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionId(pub u64);

/// Event-subscription capability surface of an external entity
///
/// The bridge uses only this surface, never the entity's internal fields.
pub trait Subscribe {
    fn subscribe(&self, event: &str, listener: Listener) -> SubscriptionId;
    fn unsubscribe(&self, id: SubscriptionId);
}

/// Tagged capability check, resolved once per entity swap
pub enum Capability<'a> {
    Subscribable(&'a dyn Subscribe),
    Opaque,
}

/// An opaque external object the bridge can observe
///
/// Entities that cannot be subscribed to simply keep the default.
pub trait Entity {
    fn capability(&self) -> Capability<'_> {
        Capability::Opaque
    }
}

/// Bridge from an external entity to a render-ready derived value
///
/// At most one subscription is live at a time; every subscribe is paired
/// with exactly one unsubscribe before the next subscribe or on teardown.
pub struct EntityBridge<E: Entity, V> {
    entity: Option<Arc<E>>,
    getter: Arc<dyn Fn(Option<&E>) -> V + Send + Sync>,
    value: Arc<Mutex<V>>,
    subscription: Option<SubscriptionId>,
}

impl<E: Entity, V> EntityBridge<E, V> {
    /// Release the current subscription, if any
    ///
    /// Safe to call on every exit path; a bridge with no subscription is
    /// left untouched.
    pub fn detach(&mut self) {
        if let (Some(entity), Some(id)) = (self.entity.as_ref(), self.subscription.take()) {
            if let Capability::Subscribable(sub) = entity.capability() {
                sub.unsubscribe(id);
            }
        }
    }
}

impl<E, V> EntityBridge<E, V>
where
    E: Entity + Send + Sync + 'static,
    V: Clone + Send + 'static,
{
    /// Create a bridge with no entity attached
    ///
    /// `getter` is a pure projection; it is invoked with `None` while no
    /// entity is attached.
    pub fn new(getter: impl Fn(Option<&E>) -> V + Send + Sync + 'static) -> Self {
        let getter: Arc<dyn Fn(Option<&E>) -> V + Send + Sync> = Arc::new(getter);
        let value = Arc::new(Mutex::new(getter(None)));

        EntityBridge {
            entity: None,
            getter,
            value,
            subscription: None,
        }
    }

    /// Swap the observed entity reference
    ///
    /// Unsubscribes from the previous entity, recomputes and publishes the
    /// derived value immediately, then subscribes to the new entity's
    /// "updated" event when the capability is present.
    pub fn set_entity(&mut self, entity: Option<Arc<E>>) {
        self.detach();
        self.entity = entity;

        *self.value.lock().unwrap() = (self.getter)(self.entity.as_deref());

        if let Some(entity) = &self.entity {
            if let Capability::Subscribable(sub) = entity.capability() {
                // Weak reference: the entity's own listener table must not
                // keep the entity alive
                let weak = Arc::downgrade(entity);
                let getter = Arc::clone(&self.getter);
                let slot = Arc::clone(&self.value);

                let id = sub.subscribe(
                    UPDATED_EVENT,
                    Arc::new(move || {
                        if let Some(entity) = weak.upgrade() {
                            *slot.lock().unwrap() = getter(Some(&entity));
                        }
                    }),
                );
                self.subscription = Some(id);
            }
        }
    }

    /// Latest published derived value
    pub fn value(&self) -> V {
        self.value.lock().unwrap().clone()
    }
}

impl<E: Entity, V> Drop for EntityBridge<E, V> {
    fn drop(&mut self) {
        self.detach();
    }
}

impl<E: Entity, V: std::fmt::Debug> std::fmt::Debug for EntityBridge<E, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityBridge")
            .field("attached", &self.entity.is_some())
            .field("subscribed", &self.subscription.is_some())
            .finish()
    }
}
