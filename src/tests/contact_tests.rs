//! tests/contact_tests.rs
//! Pruebas de la página de contacto.

#[cfg(test)]
mod tests {
    use std::{
        future::{poll_fn, Future},
        sync::{
            atomic::{AtomicUsize, Ordering},
            Arc,
        },
        task::Poll,
    };

    use actix_rt::test;

    use crate::error::AppError;
    use crate::models::contact_model::{ContactPayload, STATUS_FAILED, STATUS_OFFLINE, STATUS_SENT};
    use crate::models::event_model::{AppEvent, EventKind};
    use crate::models::toast_model::ToastKind;
    use crate::services::storage_service::keys;
    use crate::tests::support::{harness, harness_with, valid_payload, FAIL, OK};

    #[test]
    async fn test_validation_failure_changes_nothing() {
        let h = harness(vec![OK]).await;
        let payload = ContactPayload {
            name: "A".to_string(),
            email: "no-es-correo".to_string(),
            subject: "Hi".to_string(),
            message: "corto".to_string(),
            budget: None,
            consent: false,
        };

        let err = h.services.contact.submit(payload).await.unwrap_err();
        match err {
            AppError::Validation { errors } => {
                let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
                assert_eq!(fields, vec!["name", "email", "subject", "message", "consent"]);
            }
            other => panic!("se esperaba validación, llegó {:?}", other),
        }

        assert!(h.services.contact.logs().is_empty());
        assert!(h.clock.sleeps().is_empty());
        assert!(h.store.raw(keys::CONTACT_LOGS).is_none());
    }

    #[test]
    async fn test_message_too_long_is_rejected() {
        let h = harness(vec![OK]).await;
        let mut payload = valid_payload();
        payload.message = "x".repeat(2001);

        let err = h.services.contact.submit(payload).await.unwrap_err();
        assert!(matches!(err, AppError::Validation { ref errors } if errors[0].message == "Máximo 2000 caracteres"));
    }

    #[test]
    async fn test_success_logs_entry_and_resets_form() {
        let h = harness(vec![OK]).await;

        let report = h.services.contact.submit(valid_payload()).await.unwrap();
        assert!(report.success);
        assert_eq!(report.entry.status, STATUS_SENT);
        assert_eq!(report.entry.date, "14/10/2026");
        assert_eq!(report.entry.time, "10:30:00");

        let snap = h.services.contact.snapshot();
        assert!(!snap.submitting);
        assert_eq!(snap.submit_label, "Enviar mensaje");
        assert_eq!(snap.form, ContactPayload::default());
        assert_eq!(snap.logs.len(), 1);
        assert_eq!(snap.toast.unwrap().kind, ToastKind::Success);
    }

    #[test]
    async fn test_failure_keeps_form_and_logs_failure() {
        let h = harness(vec![FAIL, FAIL, FAIL]).await;

        let report = h.services.contact.submit(valid_payload()).await.unwrap();
        assert!(!report.success);
        assert_eq!(report.attempts, 3);
        assert_eq!(report.entry.status, STATUS_FAILED);

        let snap = h.services.contact.snapshot();
        assert_eq!(snap.form, valid_payload());
        assert_eq!(snap.logs[0].status, STATUS_FAILED);
        assert_eq!(snap.toast.unwrap().kind, ToastKind::Error);
    }

    #[test]
    async fn test_logs_are_most_recent_first_and_persisted() {
        let store = Arc::new(crate::services::storage_service::MemoryKvStore::new());
        let h = harness_with(store.clone(), vec![OK], false).await;

        let mut first = valid_payload();
        first.subject = "Primero".to_string();
        let mut second = valid_payload();
        second.subject = "Segundo".to_string();
        h.services.contact.submit(first).await.unwrap();
        h.services.contact.submit(second).await.unwrap();

        let before = h.services.contact.logs();
        assert_eq!(before[0].subject, "Segundo");

        // Recarga sobre el mismo almacén
        let reloaded = harness_with(store, vec![OK], false).await;
        assert_eq!(reloaded.services.contact.logs(), before);
    }

    #[test]
    async fn test_disconnected_submission_short_circuits() {
        let h = harness(vec![OK]).await;
        let sent = Arc::new(AtomicUsize::new(0));
        let counter = sent.clone();
        let _sub = h.services.bus.subscribe(EventKind::MessageSent, move |e| {
            if e == (AppEvent::MessageSent { success: false }) {
                counter.fetch_add(1, Ordering::SeqCst);
            }
        });

        assert!(!h.services.stats.toggle_connection());
        assert!(!h.services.contact.is_connected());

        let report = h.services.contact.submit(valid_payload()).await.unwrap();
        assert!(!report.success);
        assert_eq!(report.attempts, 0);
        assert_eq!(report.entry.status, STATUS_OFFLINE);

        // Ni espera simulada ni métricas
        assert!(h.clock.sleeps().is_empty());
        assert_eq!(h.services.submission.metrics().await.unwrap().attempts(), 0);
        assert_eq!(sent.load(Ordering::SeqCst), 1);

        // Al reconectar vuelve a enviar
        assert!(h.services.stats.toggle_connection());
        let report = h.services.contact.submit(valid_payload()).await.unwrap();
        assert!(report.success);
    }

    #[test]
    async fn test_overlapping_submission_is_busy() {
        let h = harness(vec![OK]).await;
        let contact = h.services.contact.clone();

        let (first, second) = tokio::join!(
            contact.submit(valid_payload()),
            contact.submit(valid_payload())
        );

        assert!(first.unwrap().success);
        assert!(matches!(second, Err(AppError::Busy)));
        assert_eq!(contact.logs().len(), 1);
    }

    #[test]
    async fn test_dropped_submission_returns_to_idle() {
        let h = harness(vec![OK]).await;
        let contact = h.services.contact.clone();

        {
            let mut pending = Box::pin(contact.submit(valid_payload()));
            let ready = poll_fn(|cx| Poll::Ready(pending.as_mut().poll(cx).is_ready())).await;
            assert!(!ready);
            assert!(contact.snapshot().submitting);
        }

        assert!(!contact.snapshot().submitting);
        assert!(contact.logs().is_empty());

        let report = contact.submit(valid_payload()).await.unwrap();
        assert!(report.success);
        assert!(!contact.snapshot().submitting);
        assert_eq!(contact.logs().len(), 1);
    }

    #[test]
    async fn test_toast_auto_dismisses() {
        let h = harness(vec![OK]).await;
        h.services.contact.submit(valid_payload()).await.unwrap();

        h.clock.advance(3999.0);
        assert!(h.services.contact.snapshot().toast.is_some());
        h.clock.advance(1.0);
        assert!(h.services.contact.snapshot().toast.is_none());
    }
}
