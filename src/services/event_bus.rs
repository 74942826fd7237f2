//! services/event_bus.rs
//! Bus de eventos en proceso. Se inyecta en cada componente que publica o
//! escucha; el despacho es síncrono a los oyentes registrados en ese momento.

use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc, Weak,
};

use parking_lot::RwLock;

use crate::models::event_model::{AppEvent, EventKind};

type Listener = Arc<dyn Fn(AppEvent) + Send + Sync>;

struct Entry {
    id: u64,
    kind: Option<EventKind>,
    listener: Listener,
}

#[derive(Default)]
struct BusInner {
    next_id: AtomicU64,
    listeners: RwLock<Vec<Entry>>,
}

#[derive(Clone, Default)]
pub struct EventBus {
    inner: Arc<BusInner>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Escucha solo los eventos de tipo `kind`.
    pub fn subscribe<F>(&self, kind: EventKind, listener: F) -> Subscription
    where
        F: Fn(AppEvent) + Send + Sync + 'static,
    {
        self.register(Some(kind), Arc::new(listener))
    }

    /// Escucha todos los eventos.
    #[cfg(test)]
    pub fn subscribe_all<F>(&self, listener: F) -> Subscription
    where
        F: Fn(AppEvent) + Send + Sync + 'static,
    {
        self.register(None, Arc::new(listener))
    }

    fn register(&self, kind: Option<EventKind>, listener: Listener) -> Subscription {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        self.inner.listeners.write().push(Entry { id, kind, listener });
        Subscription {
            id,
            bus: Arc::downgrade(&self.inner),
        }
    }

    /// Despacha `event` y devuelve cuántos oyentes lo recibieron.
    /// Los oyentes se copian antes de llamarlos, así pueden publicar
    /// o suscribirse dentro del callback.
    pub fn publish(&self, event: AppEvent) -> usize {
        let kind = event.kind();
        let targets: Vec<Listener> = self
            .inner
            .listeners
            .read()
            .iter()
            .filter(|e| e.kind.map_or(true, |k| k == kind))
            .map(|e| e.listener.clone())
            .collect();

        log::debug!("(publish) {:?} -> {} oyentes", event, targets.len());
        for listener in &targets {
            listener(event);
        }
        targets.len()
    }

    #[cfg(test)]
    pub fn listener_count(&self) -> usize {
        self.inner.listeners.read().len()
    }
}

/// Mantiene registrado al oyente; se desregistra al hacer drop.
pub struct Subscription {
    id: u64,
    bus: Weak<BusInner>,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(bus) = self.bus.upgrade() {
            bus.listeners.write().retain(|e| e.id != self.id);
        }
    }
}
