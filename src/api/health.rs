use chrono::Utc;
use poem_openapi::{OpenApi, Tags, payload::Json};
use sea_orm::DatabaseConnection;

use crate::types::dto::common::HealthResponse;

/// Liveness probe that also checks the ticket store is reachable
pub struct HealthApi {
    db: DatabaseConnection,
}

#[derive(Tags)]
enum HealthTags {
    Health,
}

impl HealthApi {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[OpenApi]
impl HealthApi {
    /// Service health
    ///
    /// `healthy` when the database answers a ping, `degraded` otherwise.
    #[oai(path = "/health", method = "get", tag = "HealthTags::Health")]
    async fn health(&self) -> Json<HealthResponse> {
        let database = match self.db.ping().await {
            Ok(()) => "reachable",
            Err(e) => {
                tracing::error!("Health check could not reach the database: {}", e);
                "unreachable"
            }
        };

        Json(HealthResponse {
            status: if database == "reachable" { "healthy" } else { "degraded" }.to_string(),
            database: database.to_string(),
            timestamp: Utc::now().to_rfc3339(),
        })
    }
}
