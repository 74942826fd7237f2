//! tests/storage_tests.rs
//! Pruebas del almacén de documentos y las colecciones tipadas.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_rt::test;

    use crate::models::contact_model::ContactLogEntry;
    use crate::models::metrics_model::{MetricSample, MetricsAccumulator};
    use crate::models::payment_model::{PaymentMethod, PaymentRecord};
    use crate::services::storage_service::{
        keys, Collection, KvStore, MemoryKvStore, SqliteKvStore,
    };

    fn entry(subject: &str) -> ContactLogEntry {
        ContactLogEntry {
            name: "Ana".to_string(),
            email: "ana@example.com".to_string(),
            subject: subject.to_string(),
            message: "Hola, este es un mensaje".to_string(),
            budget: None,
            date: "14/10/2026".to_string(),
            time: "10:30:00".to_string(),
            status: "✅ Enviado correctamente".to_string(),
        }
    }

    #[test]
    async fn test_missing_key_reads_as_default() {
        let store: Arc<dyn KvStore> = Arc::new(MemoryKvStore::new());
        let logs: Collection<Vec<ContactLogEntry>> = Collection::new(store.clone(), keys::CONTACT_LOGS);
        let metrics: Collection<MetricsAccumulator> = Collection::new(store, keys::METRICS);

        assert!(logs.load().await.unwrap().is_empty());
        assert_eq!(metrics.load().await.unwrap(), MetricsAccumulator::default());
    }

    #[test]
    async fn test_append_keeps_arrival_order() {
        let store: Arc<dyn KvStore> = Arc::new(MemoryKvStore::new());
        let payments: Collection<Vec<PaymentRecord>> = Collection::new(store, keys::PAYMENTS);

        for i in 0..3 {
            payments
                .append(PaymentRecord {
                    id: format!("id-{}", i),
                    name: "Ana".to_string(),
                    email: "ana@example.com".to_string(),
                    amount: format!("{}0", i + 1),
                    method: PaymentMethod::Yape,
                    description: String::new(),
                    date: "14/10/2026, 10:30:00".to_string(),
                })
                .await
                .unwrap();
        }

        let ids: Vec<_> = payments.load().await.unwrap().into_iter().map(|p| p.id).collect();
        assert_eq!(ids, vec!["id-0", "id-1", "id-2"]);
    }

    #[test]
    async fn test_prepend_puts_latest_first() {
        let store: Arc<dyn KvStore> = Arc::new(MemoryKvStore::new());
        let logs: Collection<Vec<ContactLogEntry>> = Collection::new(store, keys::CONTACT_LOGS);

        logs.prepend(entry("primero")).await.unwrap();
        logs.prepend(entry("segundo")).await.unwrap();

        let subjects: Vec<_> = logs.load().await.unwrap().into_iter().map(|e| e.subject).collect();
        assert_eq!(subjects, vec!["segundo", "primero"]);
    }

    #[test]
    async fn test_reload_reproduces_same_list() {
        let store = Arc::new(MemoryKvStore::new());
        let kv: Arc<dyn KvStore> = store.clone();
        let logs: Collection<Vec<ContactLogEntry>> = Collection::new(kv.clone(), keys::CONTACT_LOGS);

        let original = vec![entry("a"), entry("b"), entry("c")];
        logs.save(&original).await.unwrap();

        let reopened: Collection<Vec<ContactLogEntry>> = Collection::new(kv, keys::CONTACT_LOGS);
        assert_eq!(reopened.load().await.unwrap(), original);
    }

    #[test]
    async fn test_metrics_document_uses_original_shape() {
        let store = Arc::new(MemoryKvStore::new());
        let kv: Arc<dyn KvStore> = store.clone();
        let metrics: Collection<MetricsAccumulator> = Collection::new(kv, keys::METRICS);

        metrics
            .update(|m| {
                m.record(MetricSample { ok: true, latency: Some(701.0) });
                m.record(MetricSample { ok: false, latency: None });
            })
            .await
            .unwrap();

        let raw: serde_json::Value = serde_json::from_str(&store.raw("metrics").unwrap()).unwrap();
        assert_eq!(raw, serde_json::json!({ "ok": 1, "fail": 1, "latency": [701.0] }));
    }

    #[test]
    async fn test_corrupt_document_is_an_error() {
        let store = Arc::new(MemoryKvStore::new());
        store.put(keys::SENT_SMS, "{no es json".to_string()).await.unwrap();
        let kv: Arc<dyn KvStore> = store;
        let sent: Collection<Vec<ContactLogEntry>> = Collection::new(kv, keys::SENT_SMS);

        assert!(sent.load().await.is_err());
    }

    #[test]
    async fn test_sqlite_store_upserts_documents() {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteKvStore::connect(&dir.path().join("demo.db")).await.unwrap();
        store.run_migrations().await.unwrap();

        assert_eq!(store.get("contactLogs").await.unwrap(), None);

        store.put("contactLogs", "[]".to_string()).await.unwrap();
        store.put("contactLogs", "[1,2]".to_string()).await.unwrap();
        assert_eq!(store.get("contactLogs").await.unwrap().as_deref(), Some("[1,2]"));
    }

    #[test]
    async fn test_sqlite_collection_survives_reconnect() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("demo.db");
        let original = vec![entry("uno"), entry("dos")];

        {
            let store = SqliteKvStore::connect(&path).await.unwrap();
            store.run_migrations().await.unwrap();
            let kv: Arc<dyn KvStore> = Arc::new(store);
            let logs: Collection<Vec<ContactLogEntry>> = Collection::new(kv, keys::CONTACT_LOGS);
            logs.save(&original).await.unwrap();
        }

        let store = SqliteKvStore::connect(&path).await.unwrap();
        let kv: Arc<dyn KvStore> = Arc::new(store);
        let logs: Collection<Vec<ContactLogEntry>> = Collection::new(kv, keys::CONTACT_LOGS);
        assert_eq!(logs.load().await.unwrap(), original);
    }
}
