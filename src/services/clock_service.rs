//! services/clock_service.rs
//! Fuentes de tiempo y azar inyectables.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::{DateTime, Local};
use rand::Rng;

#[async_trait]
pub trait Clock: Send + Sync {
    /// Hora local para las marcas que ve el usuario.
    fn now(&self) -> DateTime<Local>;
    /// Milisegundos monotónicos (latencias y expiración de toasts).
    fn monotonic_ms(&self) -> f64;
    async fn sleep(&self, duration: Duration);
}

pub trait RandomSource: Send + Sync {
    /// Número uniforme en [0, 1).
    fn next_f64(&self) -> f64;
}

#[derive(Debug, Clone)]
pub struct SystemClock {
    origin: Instant,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

#[async_trait]
impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }

    fn monotonic_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn next_f64(&self) -> f64 {
        rand::rng().random::<f64>()
    }
}
