use actix_web::{web, HttpResponse, Responder};
use chrono::{DateTime, Utc};
use serde::Serialize;

use super::AppState;

// ============================================================================
// Health Check
// ============================================================================

/// Health status of a component
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "reason", rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Unhealthy(String),
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        matches!(self, HealthStatus::Healthy)
    }
}

/// Health information for a component
#[derive(Debug, Clone, Serialize)]
pub struct ComponentHealth {
    pub name: String,
    pub status: HealthStatus,
    pub last_check: DateTime<Utc>,
}

impl ComponentHealth {
    pub fn new(name: impl Into<String>, status: HealthStatus) -> Self {
        Self {
            name: name.into(),
            status,
            last_check: Utc::now(),
        }
    }
}

#[derive(Debug, Serialize)]
struct HealthReport {
    healthy: bool,
    components: Vec<ComponentHealth>,
}

pub async fn health(state: web::Data<AppState>) -> impl Responder {
    let database = match state.persistence.ping().await {
        Ok(()) => ComponentHealth::new("database", HealthStatus::Healthy),
        Err(e) => {
            tracing::warn!(error = %e, "Database health check failed");
            ComponentHealth::new("database", HealthStatus::Unhealthy(e.to_string()))
        }
    };

    let report = HealthReport {
        healthy: database.status.is_healthy(),
        components: vec![database],
    };

    if report.healthy {
        HttpResponse::Ok().json(report)
    } else {
        HttpResponse::ServiceUnavailable().json(report)
    }
}
