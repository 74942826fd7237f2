//! tests/support.rs
//! Dobles de prueba: reloj manual, azar guionado y renderizador falso.

use std::{
    collections::VecDeque,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    time::Duration,
};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{DateTime, Local, TimeZone};
use parking_lot::Mutex;

use crate::{
    app::AppServices,
    config::app_config::AppConfig,
    models::pdf_model::PdfRequest,
    services::{
        clock_service::{Clock, RandomSource},
        pdf_service::TicketRenderer,
        storage_service::{KvStore, MemoryKvStore},
    },
};

/// Reloj que avanza solo cuando alguien "duerme" o se llama a `advance`.
pub struct ManualClock {
    now: DateTime<Local>,
    elapsed_ms: Mutex<f64>,
    sleeps: Mutex<Vec<Duration>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Local
                .with_ymd_and_hms(2026, 10, 14, 10, 30, 0)
                .single()
                .unwrap_or_else(Local::now),
            elapsed_ms: Mutex::new(0.0),
            sleeps: Mutex::new(Vec::new()),
        }
    }

    pub fn advance(&self, ms: f64) {
        *self.elapsed_ms.lock() += ms;
    }

    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().clone()
    }
}

#[async_trait]
impl Clock for ManualClock {
    fn now(&self) -> DateTime<Local> {
        self.now
    }

    fn monotonic_ms(&self) -> f64 {
        *self.elapsed_ms.lock()
    }

    async fn sleep(&self, duration: Duration) {
        self.sleeps.lock().push(duration);
        self.advance(duration.as_secs_f64() * 1000.0);
        // Cede el turno para poder intercalar futuros en los tests
        tokio::task::yield_now().await;
    }
}

/// Devuelve los valores en orden; agotados, repite el último.
pub struct ScriptedRandom {
    values: Mutex<VecDeque<f64>>,
    last: Mutex<f64>,
}

impl ScriptedRandom {
    pub fn new(values: Vec<f64>) -> Self {
        Self {
            values: Mutex::new(values.into()),
            last: Mutex::new(0.5),
        }
    }
}

impl RandomSource for ScriptedRandom {
    fn next_f64(&self) -> f64 {
        match self.values.lock().pop_front() {
            Some(v) => {
                *self.last.lock() = v;
                v
            }
            None => *self.last.lock(),
        }
    }
}

pub const OK: f64 = 0.5;
pub const FAIL: f64 = 0.05;

pub struct FakeRenderer {
    pub fail: bool,
    pub calls: AtomicUsize,
    pub last_file_name: Mutex<Option<String>>,
}

impl FakeRenderer {
    pub fn new(fail: bool) -> Self {
        Self {
            fail,
            calls: AtomicUsize::new(0),
            last_file_name: Mutex::new(None),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TicketRenderer for FakeRenderer {
    async fn render(&self, req: PdfRequest) -> Result<Vec<u8>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_file_name.lock() = Some(req.file_name.clone());
        if self.fail {
            return Err(anyhow!("rasterizado falló"));
        }
        Ok(b"%PDF-1.4 ticket".to_vec())
    }
}

pub struct Harness {
    pub services: AppServices,
    pub store: Arc<MemoryKvStore>,
    pub clock: Arc<ManualClock>,
    pub renderer: Arc<FakeRenderer>,
}

pub async fn harness(rolls: Vec<f64>) -> Harness {
    harness_with(Arc::new(MemoryKvStore::new()), rolls, false).await
}

pub async fn harness_with(store: Arc<MemoryKvStore>, rolls: Vec<f64>, failing_renderer: bool) -> Harness {
    let clock = Arc::new(ManualClock::new());
    let renderer = Arc::new(FakeRenderer::new(failing_renderer));
    let kv: Arc<dyn KvStore> = store.clone();
    let services = AppServices::build(
        &AppConfig::default(),
        kv,
        clock.clone(),
        Arc::new(ScriptedRandom::new(rolls)),
        renderer.clone(),
    )
    .await
    .expect("servicios de prueba");

    Harness {
        services,
        store,
        clock,
        renderer,
    }
}

pub fn valid_payload() -> crate::models::contact_model::ContactPayload {
    crate::models::contact_model::ContactPayload {
        name: "Ana Torres".to_string(),
        email: "ana@example.com".to_string(),
        subject: "Cotización".to_string(),
        message: "Quisiera una cotización del servicio.".to_string(),
        budget: Some("150.00".to_string()),
        consent: true,
    }
}
