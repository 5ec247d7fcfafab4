use std::sync::Arc;

use chrono::Utc;
use sea_orm::DatabaseConnection;

use crate::app_data::AppData;
use crate::config::database::{begin_transaction, commit_transaction};
use crate::coordinators::auth_coordinator::non_blank;
use crate::errors::InternalError;
use crate::errors::internal::TicketError;
use crate::providers::form_validator::{self, AccountForm};
use crate::providers::ticket_lifecycle;
use crate::providers::{CryptoProvider, access_policy};
use crate::stores::{NewUser, TicketStore, UserStore};
use crate::types::db::{Role, TicketCategory, TicketPriority, TicketStatus, ticket, user};
use crate::types::dto::user::CreateUserRequest;
use crate::types::internal::context::RequestContext;
use crate::types::internal::{LoginEntry, TicketFilter};

const RECENT_TICKET_LIMIT: u64 = 10;

/// Counts over the tickets assigned to one admin
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignedStats {
    pub total: u64,
    pub open: u64,
    pub in_progress: u64,
    pub resolved: u64,
}

#[derive(Debug)]
pub struct AdminDashboard {
    pub tickets: Vec<ticket::Model>,
    pub stats: AssignedStats,
}

/// Super-admin view of the whole workload
#[derive(Debug)]
pub struct GlobalOverview {
    pub total_tickets: u64,
    pub by_status: Vec<(TicketStatus, u64)>,
    pub by_category: Vec<(TicketCategory, u64)>,
    pub total_users: u64,
    pub total_admins: u64,
    pub recent_tickets: Vec<ticket::Model>,
}

/// Filters accepted by the admin dashboard
#[derive(Debug, Clone, Default)]
pub struct DashboardQuery {
    pub status: Option<TicketStatus>,
    pub priority: Option<TicketPriority>,
    pub category: Option<TicketCategory>,
    pub search: Option<String>,
}

/// Ticket plus the admins the super admin may route it to
#[derive(Debug)]
pub struct AssignWorkCandidates {
    pub ticket: ticket::Model,
    pub department: Option<&'static str>,
    pub candidates: Vec<user::Model>,
}

/// Orchestrates dashboards, user management and work assignment
pub struct AdminCoordinator {
    db: DatabaseConnection,
    user_store: Arc<UserStore>,
    ticket_store: Arc<TicketStore>,
    crypto_provider: Arc<CryptoProvider>,
}

impl AdminCoordinator {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            db: app_data.db.clone(),
            user_store: app_data.user_store.clone(),
            ticket_store: app_data.ticket_store.clone(),
            crypto_provider: app_data.crypto_provider.clone(),
        }
    }

    /// Tickets assigned to the calling admin, filtered, with per-status counts
    pub async fn admin_dashboard(
        &self,
        ctx: &RequestContext,
        query: DashboardQuery,
    ) -> Result<AdminDashboard, InternalError> {
        let actor = ctx.require_actor(LoginEntry::Admin)?;
        access_policy::require_admin(actor)?;

        let assigned = TicketFilter::assigned_to(actor.user_id);
        let filter = assigned
            .clone()
            .with_status(query.status)
            .with_priority(query.priority)
            .with_category(query.category)
            .with_search(query.search);

        let tickets = self.ticket_store.list(&self.db, &filter).await?;

        let count_with = |status| assigned.clone().with_status(Some(status));
        let stats = AssignedStats {
            total: self.ticket_store.count(&self.db, &assigned).await?,
            open: self.ticket_store.count(&self.db, &count_with(TicketStatus::Open)).await?,
            in_progress: self
                .ticket_store
                .count(&self.db, &count_with(TicketStatus::InProgress))
                .await?,
            resolved: self
                .ticket_store
                .count(&self.db, &count_with(TicketStatus::Resolved))
                .await?,
        };

        Ok(AdminDashboard { tickets, stats })
    }

    /// Workload totals across every ticket and account
    pub async fn global_overview(&self, ctx: &RequestContext) -> Result<GlobalOverview, InternalError> {
        let actor = ctx.require_actor(LoginEntry::Admin)?;
        access_policy::require_global_dashboard(actor)?;

        // One read transaction so the totals agree with each other
        let txn = begin_transaction(&self.db).await?;

        let overview = GlobalOverview {
            total_tickets: self.ticket_store.count(&txn, &TicketFilter::default()).await?,
            by_status: self.ticket_store.count_by_status(&txn).await?,
            by_category: self.ticket_store.count_by_category(&txn).await?,
            total_users: self.user_store.count_by_role(&txn, Role::User).await?,
            total_admins: self.user_store.count_by_role(&txn, Role::Admin).await?,
            recent_tickets: self.ticket_store.recent(&txn, RECENT_TICKET_LIMIT).await?,
        };

        commit_transaction(txn).await?;

        Ok(overview)
    }

    pub async fn list_users(&self, ctx: &RequestContext) -> Result<Vec<user::Model>, InternalError> {
        let actor = ctx.require_actor(LoginEntry::Admin)?;
        access_policy::require_manage_users(actor)?;

        self.user_store.list_all(&self.db).await
    }

    /// Create an account with any role
    pub async fn create_user(
        &self,
        ctx: &RequestContext,
        request: CreateUserRequest,
    ) -> Result<user::Model, InternalError> {
        let actor = ctx.require_actor(LoginEntry::Admin)?;
        access_policy::require_create_user(actor)?;

        form_validator::validate_account(&AccountForm {
            username: &request.username,
            email: &request.email,
            first_name: &request.first_name,
            last_name: &request.last_name,
            department: request.department.as_deref(),
            password: &request.password,
            password2: &request.password2,
        })?;

        let password_hash = self.crypto_provider.hash_password(&request.password)?;

        let txn = begin_transaction(&self.db).await?;
        let user = self
            .user_store
            .insert(
                &txn,
                NewUser {
                    username: request.username.trim().to_string(),
                    email: request.email.trim().to_string(),
                    password_hash,
                    first_name: request.first_name.trim().to_string(),
                    last_name: request.last_name.trim().to_string(),
                    department: non_blank(request.department),
                    role: request.role,
                },
                Utc::now().timestamp(),
            )
            .await?;
        commit_transaction(txn).await?;

        tracing::info!("User {} ({}) created by {}", user.username, user.role, actor.username);

        Ok(user)
    }

    /// Admins a ticket may be routed to, narrowed by its category's department
    pub async fn assign_work_candidates(
        &self,
        ctx: &RequestContext,
        ticket_id: i32,
    ) -> Result<AssignWorkCandidates, InternalError> {
        let actor = ctx.require_actor(LoginEntry::Admin)?;
        access_policy::require_manage_users(actor)?;

        let ticket = self.ticket_store.get_by_id(&self.db, ticket_id).await?;
        let department = ticket_lifecycle::assignable_department(ticket.category);
        let candidates = self
            .user_store
            .list_by_role(&self.db, Role::Admin, department)
            .await?;

        Ok(AssignWorkCandidates {
            ticket,
            department,
            candidates,
        })
    }

    /// Route a ticket to one of its candidate admins
    pub async fn assign_work(
        &self,
        ctx: &RequestContext,
        ticket_id: i32,
        assignee_id: i32,
    ) -> Result<ticket::Model, InternalError> {
        let actor = ctx.require_actor(LoginEntry::Admin)?;
        access_policy::require_manage_users(actor)?;

        let now = Utc::now().timestamp();
        let txn = begin_transaction(&self.db).await?;

        let ticket = self.ticket_store.get_by_id(&txn, ticket_id).await?;
        let department = ticket_lifecycle::assignable_department(ticket.category);
        let candidates = self
            .user_store
            .list_by_role(&txn, Role::Admin, department)
            .await?;

        let assignee = candidates
            .into_iter()
            .find(|candidate| candidate.id == assignee_id)
            .ok_or(TicketError::InvalidAssignee {
                user_id: assignee_id,
            })?;

        let assigned = ticket_lifecycle::apply_assignment(ticket, &assignee, now)?;
        let ticket = self.ticket_store.update(&txn, assigned).await?;

        commit_transaction(txn).await?;

        tracing::info!(
            "Work on {} assigned to {} by {}",
            ticket.ticket_number(),
            assignee.username,
            actor.username
        );

        Ok(ticket)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::internal::{AccessError, UserError};
    use crate::test::utils::{insert_test_ticket, insert_test_user, setup_test_app_data};

    fn ctx_for(user: &user::Model) -> RequestContext {
        RequestContext::new().with_actor(user.into())
    }

    fn create_user_request(username: &str, role: Role) -> CreateUserRequest {
        CreateUserRequest {
            username: username.to_string(),
            email: format!("{}@gtnengineering.com", username),
            first_name: "Network".to_string(),
            last_name: "Admin".to_string(),
            department: Some("IT Network".to_string()),
            role,
            password: "admin123".to_string(),
            password2: "admin123".to_string(),
        }
    }

    #[tokio::test]
    async fn test_admin_dashboard_shows_only_assigned_tickets() {
        let dir = tempfile::tempdir().unwrap();
        let app_data = setup_test_app_data(dir.path()).await;
        let alice = insert_test_user(&app_data.db, "alice", Role::User, None).await;
        let hw = insert_test_user(&app_data.db, "yuvaraj", Role::Admin, Some("IT Hardware")).await;
        let sw = insert_test_user(&app_data.db, "sathish", Role::Admin, Some("IT Software")).await;
        let store = app_data.ticket_store.clone();

        let printer = insert_test_ticket(&app_data.db, &alice, "Printer jammed", TicketCategory::Hardware).await;
        let monitor = insert_test_ticket(&app_data.db, &alice, "Monitor flickers", TicketCategory::Hardware).await;
        insert_test_ticket(&app_data.db, &alice, "Excel keeps crashing", TicketCategory::Software).await;
        for (ticket, assignee) in [(printer, &hw), (monitor, &hw)] {
            let assigned = ticket_lifecycle::apply_assignment(ticket, assignee, 10).unwrap();
            store.update(&app_data.db, assigned).await.unwrap();
        }
        let coordinator = AdminCoordinator::new(app_data);

        let dashboard = coordinator
            .admin_dashboard(&ctx_for(&hw), DashboardQuery::default())
            .await
            .unwrap();
        assert_eq!(dashboard.tickets.len(), 2);
        assert_eq!(
            dashboard.stats,
            AssignedStats {
                total: 2,
                open: 0,
                in_progress: 2,
                resolved: 0
            }
        );

        let searched = coordinator
            .admin_dashboard(
                &ctx_for(&hw),
                DashboardQuery {
                    search: Some("monitor".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(searched.tickets.len(), 1);
        assert_eq!(searched.stats.total, 2);

        let other = coordinator
            .admin_dashboard(&ctx_for(&sw), DashboardQuery::default())
            .await
            .unwrap();
        assert!(other.tickets.is_empty());

        let err = coordinator
            .admin_dashboard(&ctx_for(&alice), DashboardQuery::default())
            .await
            .unwrap_err();
        assert!(matches!(err, InternalError::Access(AccessError::Forbidden { .. })));
    }

    #[tokio::test]
    async fn test_global_overview_is_super_admin_only() {
        let dir = tempfile::tempdir().unwrap();
        let app_data = setup_test_app_data(dir.path()).await;
        let hw = insert_test_user(&app_data.db, "yuvaraj", Role::Admin, Some("IT Hardware")).await;
        let boss = insert_test_user(&app_data.db, "superadmin", Role::SuperAdmin, Some("IT")).await;
        let alice = insert_test_user(&app_data.db, "alice", Role::User, None).await;
        insert_test_ticket(&app_data.db, &alice, "Printer jammed", TicketCategory::Hardware).await;
        let coordinator = AdminCoordinator::new(app_data);

        let err = coordinator.global_overview(&ctx_for(&hw)).await.unwrap_err();
        assert!(matches!(err, InternalError::Access(AccessError::Forbidden { .. })));

        let overview = coordinator.global_overview(&ctx_for(&boss)).await.unwrap();
        assert_eq!(overview.total_tickets, 1);
        assert_eq!(overview.total_users, 1);
        assert_eq!(overview.total_admins, 1);
        assert_eq!(overview.recent_tickets.len(), 1);
    }

    #[tokio::test]
    async fn test_create_user_with_elevated_role() {
        let dir = tempfile::tempdir().unwrap();
        let app_data = setup_test_app_data(dir.path()).await;
        let boss = insert_test_user(&app_data.db, "superadmin", Role::SuperAdmin, Some("IT")).await;
        let hw = insert_test_user(&app_data.db, "yuvaraj", Role::Admin, Some("IT Hardware")).await;
        let coordinator = AdminCoordinator::new(app_data);

        let err = coordinator
            .create_user(&ctx_for(&hw), create_user_request("netadmin", Role::Admin))
            .await
            .unwrap_err();
        assert!(matches!(err, InternalError::Access(AccessError::Forbidden { .. })));

        let created = coordinator
            .create_user(&ctx_for(&boss), create_user_request("netadmin", Role::Admin))
            .await
            .unwrap();
        assert_eq!(created.role, Role::Admin);
        assert!(created.is_admin());

        let err = coordinator
            .create_user(&ctx_for(&boss), create_user_request("netadmin", Role::User))
            .await
            .unwrap_err();
        assert!(matches!(err, InternalError::User(UserError::DuplicateUsername { .. })));

        assert_eq!(coordinator.list_users(&ctx_for(&boss)).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_assign_work_uses_category_department() {
        let dir = tempfile::tempdir().unwrap();
        let app_data = setup_test_app_data(dir.path()).await;
        let boss = insert_test_user(&app_data.db, "superadmin", Role::SuperAdmin, Some("IT")).await;
        let hw = insert_test_user(&app_data.db, "yuvaraj", Role::Admin, Some("IT Hardware")).await;
        let sw = insert_test_user(&app_data.db, "sathish", Role::Admin, Some("IT Software")).await;
        let alice = insert_test_user(&app_data.db, "alice", Role::User, None).await;
        let software = insert_test_ticket(&app_data.db, &alice, "Excel keeps crashing", TicketCategory::Software).await;
        let network = insert_test_ticket(&app_data.db, &alice, "VPN drops every hour", TicketCategory::Network).await;
        let coordinator = AdminCoordinator::new(app_data);

        let candidates = coordinator
            .assign_work_candidates(&ctx_for(&boss), software.id)
            .await
            .unwrap();
        assert_eq!(candidates.department, Some("IT Software"));
        assert_eq!(candidates.candidates.iter().map(|u| u.id).collect::<Vec<_>>(), vec![sw.id]);

        let anyone = coordinator
            .assign_work_candidates(&ctx_for(&boss), network.id)
            .await
            .unwrap();
        assert_eq!(anyone.department, None);
        assert_eq!(anyone.candidates.len(), 2);

        let err = coordinator
            .assign_work(&ctx_for(&boss), software.id, hw.id)
            .await
            .unwrap_err();
        assert!(matches!(err, InternalError::Ticket(TicketError::InvalidAssignee { .. })));

        let assigned = coordinator.assign_work(&ctx_for(&boss), software.id, sw.id).await.unwrap();
        assert_eq!(assigned.assigned_to, Some(sw.id));
        assert_eq!(assigned.status, TicketStatus::InProgress);
    }
}
