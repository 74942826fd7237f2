//! tests/event_bus_tests.rs

#[cfg(test)]
mod tests {
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    use crate::models::event_model::{AppEvent, EventKind};
    use crate::services::event_bus::EventBus;

    #[test]
    fn test_publish_without_listeners() {
        let bus = EventBus::new();
        assert_eq!(bus.publish(AppEvent::ConnectionToggled { connected: false }), 0);
    }

    #[test]
    fn test_subscribe_filters_by_kind() {
        let bus = EventBus::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        let _sub = bus.subscribe(EventKind::MessageSent, move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        bus.publish(AppEvent::MetricsUpdated { ok: true, latency: Some(700.0) });
        bus.publish(AppEvent::MessageSent { success: true });

        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_dropping_subscription_detaches() {
        let bus = EventBus::new();
        let all = bus.subscribe_all(|_| {});
        assert_eq!(bus.listener_count(), 1);

        drop(all);
        assert_eq!(bus.listener_count(), 0);
        assert_eq!(bus.publish(AppEvent::MessageSent { success: false }), 0);
    }

    #[test]
    fn test_listener_can_publish_reentrantly() {
        let bus = EventBus::new();
        let sent = Arc::new(AtomicUsize::new(0));

        let inner_bus = bus.clone();
        let _relay = bus.subscribe(EventKind::ConnectionToggled, move |_| {
            inner_bus.publish(AppEvent::MessageSent { success: false });
        });
        let counter = sent.clone();
        let _sink = bus.subscribe(EventKind::MessageSent, move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        bus.publish(AppEvent::ConnectionToggled { connected: true });
        assert_eq!(sent.load(Ordering::SeqCst), 1);
    }
}
