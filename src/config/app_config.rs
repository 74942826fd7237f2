//! config/app_config.rs
//! Configuración global leída del entorno (`.env` incluido vía dotenv).

use std::{env, path::PathBuf, str::FromStr, time::Duration};

/// Parámetros del envío simulado.
#[derive(Debug, Clone)]
pub struct SubmissionConfig {
    /// Latencia simulada de cada intento.
    pub attempt_delay: Duration,
    /// El intento falla cuando el número aleatorio es <= este umbral.
    pub failure_threshold: f64,
    /// Reintentos después del primer intento (total = max_retries + 1).
    pub max_retries: u32,
    /// Base del backoff lineal: base * intento.
    pub backoff_base: Duration,
}

impl Default for SubmissionConfig {
    fn default() -> Self {
        Self {
            attempt_delay: Duration::from_millis(700),
            failure_threshold: 0.1,
            max_retries: 2,
            backoff_base: Duration::from_millis(500),
        }
    }
}

impl SubmissionConfig {
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }
}

/// Duración de las notificaciones transitorias de cada pantalla.
#[derive(Debug, Clone)]
pub struct ToastDurations {
    pub contact: Duration,
    pub payment: Duration,
    pub ticket: Duration,
}

impl Default for ToastDurations {
    fn default() -> Self {
        Self {
            contact: Duration::from_millis(4000),
            payment: Duration::from_millis(3000),
            ticket: Duration::from_millis(3500),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub data_dir: PathBuf,
    pub submission: SubmissionConfig,
    pub toasts: ToastDurations,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5022,
            data_dir: PathBuf::from("data"),
            submission: SubmissionConfig::default(),
            toasts: ToastDurations::default(),
        }
    }
}

impl AppConfig {
    /// Lee la configuración del entorno. Los valores inválidos
    /// se reemplazan por el default (con un warning).
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let sim = SubmissionConfig::default();

        Self {
            host: env::var("APP_HOST").unwrap_or(defaults.host),
            port: parse_var("APP_PORT", defaults.port),
            data_dir: env::var("APP_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            submission: SubmissionConfig {
                attempt_delay: Duration::from_millis(parse_var(
                    "SIM_DELAY_MS",
                    sim.attempt_delay.as_millis() as u64,
                )),
                failure_threshold: parse_var("SIM_FAILURE_THRESHOLD", sim.failure_threshold),
                max_retries: parse_var("SIM_MAX_RETRIES", sim.max_retries),
                backoff_base: Duration::from_millis(parse_var(
                    "SIM_BACKOFF_MS",
                    sim.backoff_base.as_millis() as u64,
                )),
            },
            toasts: defaults.toasts,
        }
    }

    /// Ruta final de la base SQLite: <data_dir>/demo.db
    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join("demo.db")
    }
}

fn parse_var<T>(key: &str, default: T) -> T
where
    T: FromStr + Copy + std::fmt::Debug,
{
    match env::var(key) {
        Ok(raw) => match raw.trim().parse::<T>() {
            Ok(v) => v,
            Err(_) => {
                log::warn!(
                    "Valor inválido para {}='{}', usando default {:?}",
                    key,
                    raw,
                    default
                );
                default
            }
        },
        Err(_) => default,
    }
}
