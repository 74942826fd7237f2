//! models/metrics_model.rs

use serde::{Deserialize, Serialize};

/// Muestra de un intento de envío.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricSample {
    pub ok: bool,
    pub latency: Option<f64>,
}

/// Documento `metrics`: contadores y latencias (ms) de los intentos exitosos.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricsAccumulator {
    pub ok: u64,
    pub fail: u64,
    #[serde(default)]
    pub latency: Vec<f64>,
}

impl MetricsAccumulator {
    pub fn record(&mut self, sample: MetricSample) {
        if sample.ok {
            self.ok += 1;
            self.latency.push(sample.latency.unwrap_or(0.0));
        } else {
            self.fail += 1;
        }
    }

    #[cfg(test)]
    pub fn attempts(&self) -> u64 {
        self.ok + self.fail
    }

    pub fn mean_latency(&self) -> Option<f64> {
        if self.latency.is_empty() {
            return None;
        }
        Some(self.latency.iter().sum::<f64>() / self.latency.len() as f64)
    }
}
