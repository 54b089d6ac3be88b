use actix_web::{web, App, HttpResponse, HttpServer, Responder};
use prometheus::{Encoder, TextEncoder};
use serde::Serialize;
use std::sync::Arc;

use super::Metrics;

/// Which backends this process was started with
#[derive(Debug, Clone, Copy, Serialize)]
pub struct RuntimeInfo {
    pub store: &'static str,
    pub dispatcher: &'static str,
}

/// Start the metrics HTTP server. `/health` here is liveness only; the API
/// port's `/health` checks the store.
pub async fn start_metrics_server(metrics: Arc<Metrics>, runtime: RuntimeInfo, port: u16) -> std::io::Result<()> {
    tracing::info!(
        store = runtime.store,
        dispatcher = runtime.dispatcher,
        "📊 Starting metrics server on http://0.0.0.0:{}/metrics",
        port
    );

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(metrics.clone()))
            .app_data(web::Data::new(runtime))
            .route("/metrics", web::get().to(metrics_handler))
            .route("/health", web::get().to(liveness_handler))
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}

async fn metrics_handler(metrics: web::Data<Arc<Metrics>>) -> impl Responder {
    let mut buffer = Vec::new();
    if let Err(e) = TextEncoder::new().encode(&metrics.registry().gather(), &mut buffer) {
        tracing::error!(error = %e, "Failed to encode metrics");
        return HttpResponse::InternalServerError().finish();
    }

    HttpResponse::Ok()
        .content_type("text/plain; version=0.0.4")
        .body(buffer)
}

async fn liveness_handler(runtime: web::Data<RuntimeInfo>) -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "alive",
        "service": "student-enrollment",
        "store": runtime.store,
        "dispatcher": runtime.dispatcher,
    }))
}
