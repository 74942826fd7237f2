//! services/stats_service.rs
//! Panel de estadísticas: contadores alimentados por el bus y el
//! interruptor manual de conexión.

use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;

use crate::{
    models::{
        event_model::{AppEvent, EventKind},
        metrics_model::MetricsAccumulator,
    },
    services::{
        event_bus::{EventBus, Subscription},
        storage_service::{keys, Collection, KvStore},
    },
};

#[derive(Debug, Clone)]
struct StatsState {
    connected: bool,
    ok_count: u64,
    fail_count: u64,
    latency_ms: Option<u64>,
    offline_queue: u64,
}

impl Default for StatsState {
    fn default() -> Self {
        Self {
            connected: true,
            ok_count: 0,
            fail_count: 0,
            latency_ms: None,
            offline_queue: 0,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StatsSnapshot {
    pub connected: bool,
    pub connection_label: &'static str,
    pub toggle_label: &'static str,
    pub ok_count: u64,
    pub fail_count: u64,
    /// Última latencia exitosa, redondeada.
    pub latency_ms: Option<u64>,
    pub offline_queue: u64,
    /// Promedio de todas las latencias guardadas en `metrics`.
    pub stored_mean_latency_ms: Option<f64>,
}

#[derive(Clone)]
pub struct StatsService {
    state: Arc<Mutex<StatsState>>,
    metrics: Collection<MetricsAccumulator>,
    bus: EventBus,
    _metrics_sub: Arc<Subscription>,
}

impl StatsService {
    pub fn new(store: Arc<dyn KvStore>, bus: EventBus) -> Self {
        let state = Arc::new(Mutex::new(StatsState::default()));

        let listener_state = state.clone();
        let subscription = bus.subscribe(EventKind::MetricsUpdated, move |event| {
            if let AppEvent::MetricsUpdated { ok, latency } = event {
                let mut st = listener_state.lock();
                if ok {
                    st.ok_count += 1;
                    if let Some(ms) = latency.filter(|ms| *ms > 0.0) {
                        st.latency_ms = Some(ms.round() as u64);
                    }
                } else {
                    st.fail_count += 1;
                }
            }
        });

        Self {
            state,
            metrics: Collection::new(store, keys::METRICS),
            bus,
            _metrics_sub: Arc::new(subscription),
        }
    }

    pub async fn snapshot(&self) -> anyhow::Result<StatsSnapshot> {
        let stored = self.metrics.load().await?;
        let st = self.state.lock().clone();
        Ok(StatsSnapshot {
            connected: st.connected,
            connection_label: if st.connected {
                "🟢 CONECTADO"
            } else {
                "🔴 DESCONECTADO"
            },
            toggle_label: if st.connected {
                "Apagar Conexión"
            } else {
                "Encender Conexión"
            },
            ok_count: st.ok_count,
            fail_count: st.fail_count,
            latency_ms: st.latency_ms,
            offline_queue: st.offline_queue,
            stored_mean_latency_ms: stored.mean_latency(),
        })
    }

    /// Invierte el flag y lo anuncia en el bus (puede no haber oyentes).
    pub fn toggle_connection(&self) -> bool {
        let connected = {
            let mut st = self.state.lock();
            st.connected = !st.connected;
            if st.connected {
                st.offline_queue = 0;
            } else {
                st.offline_queue += 1;
            }
            st.connected
        };

        let delivered = self.bus.publish(AppEvent::ConnectionToggled { connected });
        log::info!(
            "(toggle_connection) Conexión {} ({} oyentes)",
            if connected { "encendida" } else { "apagada" },
            delivered
        );
        connected
    }
}
