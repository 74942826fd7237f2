//! services/storage_service.rs
//! Persistencia por documentos: cada colección lógica se guarda completa
//! como un JSON bajo su clave (lectura completa, mutación, escritura completa).

use std::{marker::PhantomData, path::Path, sync::Arc};
#[cfg(test)]
use std::collections::HashMap;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
#[cfg(test)]
use parking_lot::Mutex;
use serde::{de::DeserializeOwned, Serialize};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Pool, Row, Sqlite,
};

/// Claves de los documentos persistidos.
pub mod keys {
    pub const CONTACT_LOGS: &str = "contactLogs";
    pub const PAYMENTS: &str = "payments";
    pub const METRICS: &str = "metrics";
    pub const SENT_SMS: &str = "sentSMS";
    pub const SUBMISSION_HISTORY: &str = "paymentsHistory";
}

/// Almacén clave-valor de documentos JSON.
#[async_trait]
pub trait KvStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;
    async fn put(&self, key: &str, value: String) -> Result<()>;
}

// --------------------------------------------------------------------------------
// SQLite
// --------------------------------------------------------------------------------
#[derive(Clone, Debug)]
pub struct SqliteKvStore {
    db_pool: Pool<Sqlite>,
}

impl SqliteKvStore {
    pub fn new(db_pool: Pool<Sqlite>) -> Self {
        SqliteKvStore { db_pool }
    }

    /// Abre (o crea) la base en `path`.
    pub async fn connect(path: &Path) -> Result<Self> {
        log::info!("Conectando a SQLite en {}", path.display());
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);
        let db_pool = SqlitePoolOptions::new()
            .connect_with(options)
            .await
            .with_context(|| format!("No se pudo conectar a SQLite en {:?}", path))?;
        Ok(Self::new(db_pool))
    }

    /// Corre migraciones con sqlx
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.db_pool)
            .await
            .context("Fallo en migraciones de 'kv_store'")?;
        Ok(())
    }
}

#[async_trait]
impl KvStore for SqliteKvStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let row = sqlx::query("SELECT value FROM kv_store WHERE key = ?1")
            .bind(key)
            .fetch_optional(&self.db_pool)
            .await
            .with_context(|| format!("Fallo al leer la clave '{}'", key))?;

        match row {
            Some(row) => Ok(Some(row.try_get::<String, _>("value")?)),
            None => Ok(None),
        }
    }

    async fn put(&self, key: &str, value: String) -> Result<()> {
        let now = Utc::now().to_rfc3339();
        sqlx::query(
            r#"
            INSERT INTO kv_store (key, value, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(now)
        .execute(&self.db_pool)
        .await
        .with_context(|| format!("Fallo al escribir la clave '{}'", key))?;
        Ok(())
    }
}

// --------------------------------------------------------------------------------
// Memoria (tests)
// --------------------------------------------------------------------------------
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemoryKvStore {
    docs: Mutex<HashMap<String, String>>,
}

#[cfg(test)]
impl MemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Documento crudo, tal como quedó guardado.
    pub fn raw(&self, key: &str) -> Option<String> {
        self.docs.lock().get(key).cloned()
    }
}

#[cfg(test)]
#[async_trait]
impl KvStore for MemoryKvStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.docs.lock().get(key).cloned())
    }

    async fn put(&self, key: &str, value: String) -> Result<()> {
        self.docs.lock().insert(key.to_string(), value);
        Ok(())
    }
}

// --------------------------------------------------------------------------------
// Colecciones tipadas
// --------------------------------------------------------------------------------

/// Vista tipada de un documento. Una clave ausente se lee como `T::default()`.
pub struct Collection<T> {
    store: Arc<dyn KvStore>,
    key: &'static str,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for Collection<T> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            key: self.key,
            _marker: PhantomData,
        }
    }
}

impl<T> Collection<T>
where
    T: Serialize + DeserializeOwned + Default,
{
    pub fn new(store: Arc<dyn KvStore>, key: &'static str) -> Self {
        Self {
            store,
            key,
            _marker: PhantomData,
        }
    }

    pub async fn load(&self) -> Result<T> {
        match self.store.get(self.key).await? {
            Some(raw) => serde_json::from_str(&raw)
                .with_context(|| format!("Documento '{}' corrupto", self.key)),
            None => Ok(T::default()),
        }
    }

    pub async fn save(&self, value: &T) -> Result<()> {
        let raw = serde_json::to_string(value)
            .with_context(|| format!("No se pudo serializar '{}'", self.key))?;
        self.store.put(self.key, raw).await
    }

    /// Lee, aplica `f` y escribe el documento completo. No es atómico.
    pub async fn update<F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut T),
    {
        let mut value = self.load().await?;
        f(&mut value);
        self.save(&value).await?;
        Ok(value)
    }
}

impl<T> Collection<Vec<T>>
where
    T: Serialize + DeserializeOwned,
{
    /// Agrega al final (orden de llegada).
    pub async fn append(&self, item: T) -> Result<Vec<T>> {
        self.update(|items| items.push(item)).await
    }

    /// Agrega al inicio (más reciente primero).
    pub async fn prepend(&self, item: T) -> Result<Vec<T>> {
        self.update(|items| items.insert(0, item)).await
    }
}
