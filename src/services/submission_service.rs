//! services/submission_service.rs
//! Envío simulado del formulario de contacto: no hay red, solo una espera,
//! una moneda cargada y reintentos con backoff lineal.

use std::sync::Arc;

use crate::{
    config::app_config::SubmissionConfig,
    error::AppError,
    models::{
        contact_model::{ContactPayload, HistoryEntry, SendOutcome},
        event_model::AppEvent,
        metrics_model::{MetricSample, MetricsAccumulator},
    },
    services::{
        clock_service::{Clock, RandomSource},
        event_bus::EventBus,
        storage_service::{keys, Collection, KvStore},
    },
};

#[derive(Clone)]
pub struct SubmissionService {
    metrics: Collection<MetricsAccumulator>,
    history: Collection<Vec<HistoryEntry>>,
    bus: EventBus,
    clock: Arc<dyn Clock>,
    random: Arc<dyn RandomSource>,
    config: SubmissionConfig,
}

impl SubmissionService {
    pub fn new(
        store: Arc<dyn KvStore>,
        bus: EventBus,
        clock: Arc<dyn Clock>,
        random: Arc<dyn RandomSource>,
        config: SubmissionConfig,
    ) -> Self {
        Self {
            metrics: Collection::new(store.clone(), keys::METRICS),
            history: Collection::new(store, keys::SUBMISSION_HISTORY),
            bus,
            clock,
            random,
            config,
        }
    }

    /// Hace hasta `max_retries + 1` intentos. Cada intento registra una
    /// muestra en `metrics` y publica `MetricsUpdated`.
    pub async fn send_contact(&self, payload: &ContactPayload) -> Result<SendOutcome, AppError> {
        let max_attempts = self.config.max_attempts();
        let mut attempt: u32 = 0;

        loop {
            attempt += 1;
            let t0 = self.clock.monotonic_ms();
            self.clock.sleep(self.config.attempt_delay).await;
            let success = self.random.next_f64() > self.config.failure_threshold;
            let latency = self.clock.monotonic_ms() - t0;

            if success {
                self.track_metric(MetricSample {
                    ok: true,
                    latency: Some(latency),
                })
                .await?;
                self.save_to_history(payload, true).await?;
                log::info!(
                    "(send_contact) Mensaje simulado correctamente para {} en el intento {} ({:.0} ms)",
                    payload.email,
                    attempt,
                    latency
                );
                return Ok(SendOutcome {
                    success: true,
                    message: "Mensaje enviado correctamente (sin backend)".to_string(),
                    attempts: attempt,
                });
            }

            self.track_metric(MetricSample {
                ok: false,
                latency: None,
            })
            .await?;
            log::warn!("(send_contact) Error intento {}/{}", attempt, max_attempts);

            if attempt >= max_attempts {
                self.save_to_history(payload, false).await?;
                log::error!(
                    "(send_contact) No se pudo enviar el mensaje de {} tras {} intentos",
                    payload.email,
                    attempt
                );
                return Err(AppError::SimulatedFailure { attempts: attempt });
            }

            self.clock.sleep(self.config.backoff_base * attempt).await;
        }
    }

    pub async fn metrics(&self) -> anyhow::Result<MetricsAccumulator> {
        self.metrics.load().await
    }

    pub async fn history(&self) -> anyhow::Result<Vec<HistoryEntry>> {
        self.history.load().await
    }

    async fn track_metric(&self, sample: MetricSample) -> anyhow::Result<()> {
        self.metrics.update(|m| m.record(sample)).await?;
        self.bus.publish(AppEvent::MetricsUpdated {
            ok: sample.ok,
            latency: sample.latency,
        });
        Ok(())
    }

    async fn save_to_history(&self, payload: &ContactPayload, success: bool) -> anyhow::Result<()> {
        let entry = HistoryEntry::new(payload, self.clock.now(), success);
        self.history.prepend(entry).await?;
        Ok(())
    }
}
