use std::sync::Arc;

use poem::Request;
use poem_openapi::param::{Path, Query};
use poem_openapi::{OpenApi, Tags, payload::Json};

use crate::api::helpers::{self, ApiResult};
use crate::coordinators::AdminCoordinator;
use crate::coordinators::admin_coordinator::DashboardQuery;
use crate::providers::SessionProvider;
use crate::types::db::{TicketCategory, TicketPriority, TicketStatus};
use crate::types::dto::dashboard::{
    AdminDashboardResponse, AssignWorkResponse, CategoryCount, OverviewResponse, StatusCount,
    TicketStats,
};
use crate::types::dto::ticket::{AssignTicketRequest, TicketResponse};
use crate::types::dto::user::{CreateUserRequest, UserListResponse, UserResponse};

/// Dashboards, user management and work assignment
pub struct AdminApi {
    admin_coordinator: Arc<AdminCoordinator>,
    session_provider: Arc<SessionProvider>,
}

impl AdminApi {
    pub fn new(admin_coordinator: Arc<AdminCoordinator>, session_provider: Arc<SessionProvider>) -> Self {
        Self {
            admin_coordinator,
            session_provider,
        }
    }
}

/// API tags for admin endpoints
#[derive(Tags)]
enum AdminTags {
    /// Admin and super admin views
    Admin,
}

#[OpenApi(prefix_path = "/admin")]
impl AdminApi {
    /// Tickets assigned to the calling admin
    ///
    /// Filters narrow the list; the counts always cover every assigned ticket.
    #[oai(path = "/dashboard", method = "get", tag = "AdminTags::Admin")]
    async fn dashboard(
        &self,
        req: &Request,
        status: Query<Option<TicketStatus>>,
        priority: Query<Option<TicketPriority>>,
        category: Query<Option<TicketCategory>>,
        search: Query<Option<String>>,
    ) -> ApiResult<AdminDashboardResponse> {
        let ctx = helpers::create_request_context(req, &self.session_provider).await;

        let dashboard = self
            .admin_coordinator
            .admin_dashboard(
                &ctx,
                DashboardQuery {
                    status: status.0,
                    priority: priority.0,
                    category: category.0,
                    search: search.0,
                },
            )
            .await?;

        Ok(Json(AdminDashboardResponse {
            tickets: dashboard.tickets.into_iter().map(Into::into).collect(),
            stats: TicketStats {
                total: dashboard.stats.total,
                open: dashboard.stats.open,
                in_progress: dashboard.stats.in_progress,
                resolved: dashboard.stats.resolved,
            },
        }))
    }

    /// Global workload overview (super admin)
    #[oai(path = "/overview", method = "get", tag = "AdminTags::Admin")]
    async fn overview(&self, req: &Request) -> ApiResult<OverviewResponse> {
        let ctx = helpers::create_request_context(req, &self.session_provider).await;

        let overview = self.admin_coordinator.global_overview(&ctx).await?;

        Ok(Json(OverviewResponse {
            total_tickets: overview.total_tickets,
            by_status: overview
                .by_status
                .into_iter()
                .map(|(status, count)| StatusCount { status, count })
                .collect(),
            by_category: overview
                .by_category
                .into_iter()
                .map(|(category, count)| CategoryCount { category, count })
                .collect(),
            total_users: overview.total_users,
            total_admins: overview.total_admins,
            recent_tickets: overview.recent_tickets.into_iter().map(Into::into).collect(),
        }))
    }

    /// All accounts (super admin)
    #[oai(path = "/users", method = "get", tag = "AdminTags::Admin")]
    async fn list_users(&self, req: &Request) -> ApiResult<UserListResponse> {
        let ctx = helpers::create_request_context(req, &self.session_provider).await;

        let users = self.admin_coordinator.list_users(&ctx).await?;

        Ok(Json(UserListResponse {
            users: users.into_iter().map(Into::into).collect(),
        }))
    }

    /// Create an account with any role (super admin)
    #[oai(path = "/users", method = "post", tag = "AdminTags::Admin")]
    async fn create_user(&self, req: &Request, body: Json<CreateUserRequest>) -> ApiResult<UserResponse> {
        let ctx = helpers::create_request_context(req, &self.session_provider).await;

        let user = self.admin_coordinator.create_user(&ctx, body.0).await?;

        Ok(Json(user.into()))
    }

    /// Candidate admins for a ticket (super admin)
    #[oai(path = "/assign-work/:id", method = "get", tag = "AdminTags::Admin")]
    async fn assign_work_candidates(&self, req: &Request, id: Path<i32>) -> ApiResult<AssignWorkResponse> {
        let ctx = helpers::create_request_context(req, &self.session_provider).await;

        let work = self.admin_coordinator.assign_work_candidates(&ctx, id.0).await?;

        Ok(Json(AssignWorkResponse {
            ticket: work.ticket.into(),
            department: work.department.map(str::to_string),
            candidates: work.candidates.iter().map(Into::into).collect(),
        }))
    }

    /// Route a ticket to one of its candidates (super admin)
    #[oai(path = "/assign-work/:id", method = "post", tag = "AdminTags::Admin")]
    async fn assign_work(
        &self,
        req: &Request,
        id: Path<i32>,
        body: Json<AssignTicketRequest>,
    ) -> ApiResult<TicketResponse> {
        let ctx = helpers::create_request_context(req, &self.session_provider).await;

        let ticket = self
            .admin_coordinator
            .assign_work(&ctx, id.0, body.assigned_to)
            .await?;

        Ok(Json(ticket.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AppData;
    use crate::errors::ApiError;
    use crate::test::utils::{insert_test_ticket, insert_test_user, setup_test_app_data};
    use crate::types::db::{Role, user};

    async fn bearer_for(app_data: &AppData, user: &user::Model) -> Request {
        let token = app_data.session_provider.create(&app_data.db, user.id).await.unwrap();
        Request::builder()
            .header("Authorization", format!("Bearer {}", token))
            .finish()
    }

    fn api(app_data: Arc<AppData>) -> AdminApi {
        AdminApi::new(
            Arc::new(AdminCoordinator::new(app_data.clone())),
            app_data.session_provider.clone(),
        )
    }

    #[tokio::test]
    async fn test_overview_lists_every_status_and_category() {
        let dir = tempfile::tempdir().unwrap();
        let app_data = setup_test_app_data(dir.path()).await;
        let boss = insert_test_user(&app_data.db, "superadmin", Role::SuperAdmin, Some("IT")).await;
        let alice = insert_test_user(&app_data.db, "alice", Role::User, None).await;
        insert_test_ticket(&app_data.db, &alice, "Printer jammed", TicketCategory::Hardware).await;
        let req = bearer_for(&app_data, &boss).await;
        let api = api(app_data);

        let overview = api.overview(&req).await.unwrap();

        assert_eq!(overview.total_tickets, 1);
        assert_eq!(overview.by_status.len(), 4);
        assert_eq!(overview.by_category.len(), 4);
        let open = overview
            .by_status
            .iter()
            .find(|c| c.status == TicketStatus::Open)
            .unwrap();
        assert_eq!(open.count, 1);
    }

    #[tokio::test]
    async fn test_admin_cannot_manage_users() {
        let dir = tempfile::tempdir().unwrap();
        let app_data = setup_test_app_data(dir.path()).await;
        let hw = insert_test_user(&app_data.db, "yuvaraj", Role::Admin, Some("IT Hardware")).await;
        let req = bearer_for(&app_data, &hw).await;
        let api = api(app_data);

        let err = api.list_users(&req).await.unwrap_err();

        assert!(matches!(err, ApiError::Forbidden(_)));
        assert_eq!(err.message(), "Super Admin access required.");
    }

    #[tokio::test]
    async fn test_dashboard_requires_admin_login() {
        let dir = tempfile::tempdir().unwrap();
        let api = api(setup_test_app_data(dir.path()).await);

        let err = api
            .dashboard(&Request::default(), Query(None), Query(None), Query(None), Query(None))
            .await
            .unwrap_err();

        assert_eq!(err.response().login_path.as_deref(), Some("/api/auth/admin-login"));
    }
}
