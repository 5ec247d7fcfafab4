// API layer - HTTP endpoints
pub mod admin;
pub mod auth;
pub mod health;
pub mod helpers;
pub mod profile;
pub mod tickets;

pub use admin::AdminApi;
pub use auth::AuthApi;
pub use health::HealthApi;
pub use profile::ProfileApi;
pub use tickets::TicketsApi;

use std::sync::Arc;

use poem::Route;
use poem_openapi::OpenApiService;

use crate::app_data::AppData;
use crate::coordinators::{AdminCoordinator, AuthCoordinator, ProfileCoordinator, TicketCoordinator};

/// Compose all endpoints under `/api` with Swagger UI under `/swagger`
pub fn build_route(app_data: Arc<AppData>, server_url: &str) -> Route {
    let session_provider = app_data.session_provider.clone();
    let health_api = HealthApi::new(app_data.db.clone());

    let auth_api = AuthApi::new(
        Arc::new(AuthCoordinator::new(app_data.clone())),
        session_provider.clone(),
    );
    let tickets_api = TicketsApi::new(
        Arc::new(TicketCoordinator::new(app_data.clone())),
        session_provider.clone(),
    );
    let admin_api = AdminApi::new(
        Arc::new(AdminCoordinator::new(app_data.clone())),
        session_provider.clone(),
    );
    let profile_api = ProfileApi::new(Arc::new(ProfileCoordinator::new(app_data)), session_provider);

    let api_service = OpenApiService::new(
        (health_api, auth_api, tickets_api, admin_api, profile_api),
        "Helpdesk API",
        env!("CARGO_PKG_VERSION"),
    )
    .server(server_url);
    let ui = api_service.swagger_ui();

    Route::new().nest("/api", api_service).nest("/swagger", ui)
}
