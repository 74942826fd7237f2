//! app.rs
//! Armado de servicios y tabla de rutas.

use std::sync::Arc;

use actix_web::{web, HttpResponse};

use crate::{
    config::{app_config::AppConfig, pdf_config::TicketPdfConfig},
    handlers::{contact_handler, payment_handler, stats_handler, ticket_handler},
    services::{
        clock_service::{Clock, RandomSource},
        contact_service::ContactService,
        event_bus::EventBus,
        payment_service::PaymentService,
        pdf_service::TicketRenderer,
        stats_service::StatsService,
        storage_service::KvStore,
        submission_service::SubmissionService,
        ticket_service::TicketService,
    },
};

/// Todos los servicios, compartiendo el mismo bus y almacén.
#[derive(Clone)]
pub struct AppServices {
    #[cfg(test)]
    pub bus: EventBus,
    pub submission: SubmissionService,
    pub contact: ContactService,
    pub payment: PaymentService,
    pub stats: StatsService,
    pub tickets: TicketService,
}

impl AppServices {
    pub async fn build(
        config: &AppConfig,
        store: Arc<dyn KvStore>,
        clock: Arc<dyn Clock>,
        random: Arc<dyn RandomSource>,
        renderer: Arc<dyn TicketRenderer>,
    ) -> anyhow::Result<Self> {
        let bus = EventBus::new();

        let submission = SubmissionService::new(
            store.clone(),
            bus.clone(),
            clock.clone(),
            random,
            config.submission.clone(),
        );
        let stats = StatsService::new(store.clone(), bus.clone());
        let contact = ContactService::load(
            store.clone(),
            submission.clone(),
            bus.clone(),
            clock.clone(),
            config.toasts.contact,
        )
        .await?;
        let payment = PaymentService::load(store.clone(), clock.clone(), config.toasts.payment).await?;
        let tickets = TicketService::new(
            store,
            contact.clone(),
            renderer,
            TicketPdfConfig::default(),
            clock,
            config.toasts.ticket,
        );

        Ok(Self {
            #[cfg(test)]
            bus,
            submission,
            contact,
            payment,
            stats,
            tickets,
        })
    }

    /// Registra cada servicio como `web::Data`.
    pub fn register(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(web::Data::new(self.submission.clone()))
            .app_data(web::Data::new(self.contact.clone()))
            .app_data(web::Data::new(self.payment.clone()))
            .app_data(web::Data::new(self.stats.clone()))
            .app_data(web::Data::new(self.tickets.clone()));
    }
}

pub fn init_app(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(contact_handler::contact_page))
        .route("/payment", web::get().to(payment_handler::payment_page))
        .route("/health", web::get().to(health))
        .service(
            web::scope("/api")
                .service(
                    web::scope("/contact")
                        .route("/submit", web::post().to(contact_handler::submit_contact_endpoint)),
                )
                .route(
                    "/history",
                    web::get().to(contact_handler::submission_history_endpoint),
                )
                .service(
                    web::scope("/payment")
                        .route("/form", web::put().to(payment_handler::update_form_endpoint))
                        .route("/submit", web::post().to(payment_handler::submit_payment_endpoint)),
                )
                .service(
                    web::scope("/stats")
                        .route("", web::get().to(stats_handler::stats_endpoint))
                        .route(
                            "/connection/toggle",
                            web::post().to(stats_handler::toggle_connection_endpoint),
                        ),
                )
                .service(
                    web::scope("/tickets")
                        .route("", web::get().to(ticket_handler::list_tickets_endpoint))
                        .route("/close", web::post().to(ticket_handler::close_ticket_endpoint))
                        .route("/preview", web::get().to(ticket_handler::preview_ticket_endpoint))
                        .route("/pdf", web::get().to(ticket_handler::download_ticket_endpoint))
                        .route("/sms", web::post().to(ticket_handler::send_sms_endpoint))
                        .route("/sms", web::get().to(ticket_handler::list_sms_endpoint))
                        .route(
                            "/{index}/open",
                            web::post().to(ticket_handler::open_ticket_endpoint),
                        ),
                ),
        );
}

async fn health() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}
