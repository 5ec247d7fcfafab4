use std::sync::Arc;

use chrono::Utc;
use sea_orm::DatabaseConnection;

use crate::app_data::AppData;
use crate::config::database::{begin_transaction, commit_transaction};
use crate::errors::InternalError;
use crate::errors::internal::TicketError;
use crate::providers::ticket_lifecycle::{self, CreatorSnapshot, NewTicket, TicketEdit};
use crate::providers::{access_policy, form_validator};
use crate::stores::{TicketStore, UserStore};
use crate::types::db::{TicketStatus, ticket, ticket_comment, user};
use crate::types::dto::ticket::{
    AddCommentRequest, AssignTicketRequest, CreateTicketRequest, UpdateTicketRequest,
};
use crate::types::internal::context::RequestContext;
use crate::types::internal::{LoginEntry, TicketFilter};

/// Everything the ticket detail view shows
#[derive(Debug)]
pub struct TicketDetail {
    pub ticket: ticket::Model,
    pub assignee: Option<user::Model>,
    pub comments: Vec<(ticket_comment::Model, Option<user::Model>)>,
    pub can_edit: bool,
}

/// Orchestrates the ticket lifecycle: create, view, comment, edit, assign
pub struct TicketCoordinator {
    db: DatabaseConnection,
    user_store: Arc<UserStore>,
    ticket_store: Arc<TicketStore>,
}

impl TicketCoordinator {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            db: app_data.db.clone(),
            user_store: app_data.user_store.clone(),
            ticket_store: app_data.ticket_store.clone(),
        }
    }

    /// File a new ticket for the calling user
    ///
    /// Captures a snapshot of the owner's name, address and system label, and
    /// refreshes the same details on the owner's live profile.
    pub async fn create_ticket(
        &self,
        ctx: &RequestContext,
        request: CreateTicketRequest,
    ) -> Result<ticket::Model, InternalError> {
        let actor = ctx.require_actor(LoginEntry::User)?;
        form_validator::validate_ticket(&request.title, &request.description, request.system_name.as_deref())?;

        let now = Utc::now().timestamp();
        let txn = begin_transaction(&self.db).await?;

        let owner = self.user_store.get_by_id(&txn, actor.user_id).await?;
        let snapshot = CreatorSnapshot::capture(
            &owner,
            ctx.ip_string(),
            request.system_name.as_deref(),
            ctx.user_agent.as_deref(),
        );

        self.user_store
            .update_request_metadata(
                &txn,
                owner.id,
                snapshot.ip_address.clone(),
                Some(snapshot.system_name.clone()),
            )
            .await?;

        let row = ticket_lifecycle::open_ticket(
            owner.id,
            NewTicket {
                title: request.title.trim().to_string(),
                description: request.description.trim().to_string(),
                category: request.category,
                priority: request.priority,
            },
            snapshot,
            now,
        );
        let ticket = self.ticket_store.insert(&txn, row).await?;

        commit_transaction(txn).await?;

        tracing::info!(
            "Ticket {} created by {} ({}, {:?})",
            ticket.ticket_number(),
            actor.username,
            ticket.category,
            ticket.priority
        );

        Ok(ticket)
    }

    /// Ticket detail for its owner or any admin
    pub async fn view_ticket(&self, ctx: &RequestContext, ticket_id: i32) -> Result<TicketDetail, InternalError> {
        let actor = ctx.require_actor(LoginEntry::User)?;
        let ticket = self.ticket_store.get_by_id(&self.db, ticket_id).await?;

        if let Err(denied) = access_policy::require_view(actor, &ticket) {
            tracing::warn!("{} denied view of {}", ctx.actor_label(), ticket.ticket_number());
            return Err(denied.into());
        }

        let assignee = match ticket.assigned_to {
            Some(assignee_id) => self.user_store.find_by_id(&self.db, assignee_id).await?,
            None => None,
        };
        let comments = self.ticket_store.list_comments(&self.db, ticket.id).await?;

        Ok(TicketDetail {
            can_edit: access_policy::can_edit_fields(actor, &ticket),
            ticket,
            assignee,
            comments,
        })
    }

    /// Append a comment; the ticket's `updated_at` advances, status does not change
    pub async fn add_comment(
        &self,
        ctx: &RequestContext,
        ticket_id: i32,
        request: AddCommentRequest,
    ) -> Result<ticket_comment::Model, InternalError> {
        let actor = ctx.require_actor(LoginEntry::User)?;

        let now = Utc::now().timestamp();
        let txn = begin_transaction(&self.db).await?;

        let ticket = self.ticket_store.get_by_id(&txn, ticket_id).await?;
        if let Err(denied) = access_policy::require_comment(actor, &ticket) {
            tracing::warn!("{} denied comment on {}", ctx.actor_label(), ticket.ticket_number());
            return Err(denied.into());
        }
        form_validator::validate_comment(&request.comment)?;

        let now = ticket_lifecycle::next_updated_at(ticket.updated_at, now);
        let comment = self
            .ticket_store
            .add_comment(&txn, ticket.id, actor.user_id, request.comment.trim().to_string(), now)
            .await?;
        self.ticket_store.touch(&txn, ticket.id, now).await?;

        commit_transaction(txn).await?;

        tracing::info!("Comment added to {} by {}", ticket.ticket_number(), actor.username);

        Ok(comment)
    }

    /// Admin field edit, including status transitions
    pub async fn update_ticket(
        &self,
        ctx: &RequestContext,
        ticket_id: i32,
        request: UpdateTicketRequest,
    ) -> Result<ticket::Model, InternalError> {
        let actor = ctx.require_actor(LoginEntry::Admin)?;

        let now = Utc::now().timestamp();
        let txn = begin_transaction(&self.db).await?;

        let ticket = self.ticket_store.get_by_id(&txn, ticket_id).await?;
        if let Err(denied) = access_policy::require_edit_fields(actor, &ticket) {
            tracing::warn!("{} denied edit of {}", ctx.actor_label(), ticket.ticket_number());
            return Err(denied.into());
        }
        form_validator::validate_ticket(&request.title, &request.description, None)?;

        let previous_status = ticket.status;
        let edited = ticket_lifecycle::apply_edit(
            ticket,
            TicketEdit {
                title: request.title.trim().to_string(),
                description: request.description.trim().to_string(),
                category: request.category,
                priority: request.priority,
                status: request.status,
            },
            now,
        );
        let ticket = self.ticket_store.update(&txn, edited).await?;

        commit_transaction(txn).await?;

        if previous_status != ticket.status {
            tracing::info!(
                "Ticket {} moved {} -> {} by {}",
                ticket.ticket_number(),
                previous_status,
                ticket.status,
                actor.username
            );
        } else {
            tracing::info!("Ticket {} updated by {}", ticket.ticket_number(), actor.username);
        }

        Ok(ticket)
    }

    /// Assign a ticket to an administrative user
    pub async fn assign_ticket(
        &self,
        ctx: &RequestContext,
        ticket_id: i32,
        request: AssignTicketRequest,
    ) -> Result<ticket::Model, InternalError> {
        let actor = ctx.require_actor(LoginEntry::Admin)?;

        let now = Utc::now().timestamp();
        let txn = begin_transaction(&self.db).await?;

        let ticket = self.ticket_store.get_by_id(&txn, ticket_id).await?;
        if let Err(denied) = access_policy::require_assign(actor, &ticket) {
            tracing::warn!("{} denied assignment of {}", ctx.actor_label(), ticket.ticket_number());
            return Err(denied.into());
        }

        let assignee = self
            .user_store
            .find_by_id(&txn, request.assigned_to)
            .await?
            .ok_or(TicketError::InvalidAssignee {
                user_id: request.assigned_to,
            })?;

        let assigned = ticket_lifecycle::apply_assignment(ticket, &assignee, now)?;
        let ticket = self.ticket_store.update(&txn, assigned).await?;

        commit_transaction(txn).await?;

        tracing::info!(
            "Ticket {} assigned to {} by {} (status {})",
            ticket.ticket_number(),
            assignee.username,
            actor.username,
            ticket.status
        );

        Ok(ticket)
    }

    /// Users the ticket may be assigned to: every administrative account
    pub async fn assignable_admins(
        &self,
        ctx: &RequestContext,
        ticket_id: i32,
    ) -> Result<Vec<user::Model>, InternalError> {
        let actor = ctx.require_actor(LoginEntry::Admin)?;
        let ticket = self.ticket_store.get_by_id(&self.db, ticket_id).await?;
        access_policy::require_assign(actor, &ticket)?;

        self.user_store.list_admins(&self.db).await
    }

    /// The caller's own tickets, newest first
    pub async fn list_mine(
        &self,
        ctx: &RequestContext,
        status: Option<TicketStatus>,
        search: Option<String>,
    ) -> Result<Vec<ticket::Model>, InternalError> {
        let actor = ctx.require_actor(LoginEntry::User)?;

        let filter = TicketFilter::owned_by(actor.user_id)
            .with_status(status)
            .with_search(search);

        self.ticket_store.list(&self.db, &filter).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::internal::{AccessError, ValidationError};
    use crate::types::db::{Role, TicketCategory, TicketPriority};
    use crate::test::utils::{insert_test_user, setup_test_app_data};

    fn ctx_for(user: &user::Model) -> RequestContext {
        RequestContext::new()
            .with_actor(user.into())
            .with_ip_address("192.168.1.20".parse().unwrap())
            .with_user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64)")
    }

    fn create_request(title: &str) -> CreateTicketRequest {
        CreateTicketRequest {
            title: title.to_string(),
            description: "Outlook crashes when opening attachments".to_string(),
            category: TicketCategory::Software,
            priority: TicketPriority::High,
            system_name: None,
        }
    }

    fn edit_request(ticket: &ticket::Model, status: TicketStatus) -> UpdateTicketRequest {
        UpdateTicketRequest {
            title: ticket.title.clone(),
            description: ticket.description.clone(),
            category: ticket.category,
            priority: ticket.priority,
            status,
        }
    }

    #[tokio::test]
    async fn test_create_ticket_starts_open_with_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let app_data = setup_test_app_data(dir.path()).await;
        let alice = insert_test_user(&app_data.db, "alice", Role::User, None).await;
        let coordinator = TicketCoordinator::new(app_data.clone());

        let ticket = coordinator
            .create_ticket(&ctx_for(&alice), create_request("Outlook crashing"))
            .await
            .unwrap();

        assert_eq!(ticket.status, TicketStatus::Open);
        assert_eq!(ticket.resolved_at, None);
        assert_eq!(ticket.created_at, ticket.updated_at);
        assert_eq!(ticket.user_id, alice.id);
        assert_eq!(ticket.user_name, alice.full_name());
        assert_eq!(ticket.user_ip_address.as_deref(), Some("192.168.1.20"));
        assert_eq!(ticket.user_system_name.as_deref(), Some("Windows System"));

        let refreshed = app_data.user_store.get_by_id(&app_data.db, alice.id).await.unwrap();
        assert_eq!(refreshed.system_name.as_deref(), Some("Windows System"));
    }

    #[tokio::test]
    async fn test_create_requires_login_and_valid_form() {
        let dir = tempfile::tempdir().unwrap();
        let app_data = setup_test_app_data(dir.path()).await;
        let alice = insert_test_user(&app_data.db, "alice", Role::User, None).await;
        let coordinator = TicketCoordinator::new(app_data);

        let err = coordinator
            .create_ticket(&RequestContext::new(), create_request("Outlook crashing"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            InternalError::Access(AccessError::Unauthenticated { entry: LoginEntry::User })
        ));

        let err = coordinator
            .create_ticket(&ctx_for(&alice), create_request("Oops"))
            .await
            .unwrap_err();
        assert!(matches!(err, InternalError::Validation(ref v) if v.has_field("title")));
        assert!(coordinator.list_mine(&ctx_for(&alice), None, None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_stranger_cannot_view_or_comment() {
        let dir = tempfile::tempdir().unwrap();
        let app_data = setup_test_app_data(dir.path()).await;
        let alice = insert_test_user(&app_data.db, "alice", Role::User, None).await;
        let carol = insert_test_user(&app_data.db, "carol", Role::User, None).await;
        let admin = insert_test_user(&app_data.db, "sathish", Role::Admin, Some("IT Software")).await;
        let coordinator = TicketCoordinator::new(app_data);
        let ticket = coordinator
            .create_ticket(&ctx_for(&alice), create_request("Outlook crashing"))
            .await
            .unwrap();

        let err = coordinator.view_ticket(&ctx_for(&carol), ticket.id).await.unwrap_err();
        assert!(matches!(err, InternalError::Access(AccessError::Forbidden { .. })));

        let err = coordinator
            .add_comment(
                &ctx_for(&carol),
                ticket.id,
                AddCommentRequest {
                    comment: "Me too!".to_string(),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, InternalError::Access(AccessError::Forbidden { .. })));

        let own = coordinator.view_ticket(&ctx_for(&alice), ticket.id).await.unwrap();
        assert!(!own.can_edit);
        let as_admin = coordinator.view_ticket(&ctx_for(&admin), ticket.id).await.unwrap();
        assert!(as_admin.can_edit);
    }

    #[tokio::test]
    async fn test_comment_advances_updated_at_only() {
        let dir = tempfile::tempdir().unwrap();
        let app_data = setup_test_app_data(dir.path()).await;
        let alice = insert_test_user(&app_data.db, "alice", Role::User, None).await;
        let coordinator = TicketCoordinator::new(app_data);
        let ticket = coordinator
            .create_ticket(&ctx_for(&alice), create_request("Outlook crashing"))
            .await
            .unwrap();

        coordinator
            .add_comment(
                &ctx_for(&alice),
                ticket.id,
                AddCommentRequest {
                    comment: "Still happening today".to_string(),
                },
            )
            .await
            .unwrap();

        let detail = coordinator.view_ticket(&ctx_for(&alice), ticket.id).await.unwrap();
        assert_eq!(detail.comments.len(), 1);
        assert_eq!(detail.ticket.status, TicketStatus::Open);
        assert!(detail.ticket.updated_at > ticket.updated_at);
    }

    #[tokio::test]
    async fn test_user_cannot_edit_or_assign() {
        let dir = tempfile::tempdir().unwrap();
        let app_data = setup_test_app_data(dir.path()).await;
        let alice = insert_test_user(&app_data.db, "alice", Role::User, None).await;
        let admin = insert_test_user(&app_data.db, "sathish", Role::Admin, Some("IT Software")).await;
        let coordinator = TicketCoordinator::new(app_data);
        let ticket = coordinator
            .create_ticket(&ctx_for(&alice), create_request("Outlook crashing"))
            .await
            .unwrap();

        let err = coordinator
            .update_ticket(&ctx_for(&alice), ticket.id, edit_request(&ticket, TicketStatus::Closed))
            .await
            .unwrap_err();
        assert!(matches!(err, InternalError::Access(AccessError::Forbidden { .. })));

        let err = coordinator
            .assign_ticket(&ctx_for(&alice), ticket.id, AssignTicketRequest { assigned_to: admin.id })
            .await
            .unwrap_err();
        assert!(matches!(err, InternalError::Access(AccessError::Forbidden { .. })));
    }

    #[tokio::test]
    async fn test_assignment_rejects_non_admin_and_keeps_ticket_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let app_data = setup_test_app_data(dir.path()).await;
        let alice = insert_test_user(&app_data.db, "alice", Role::User, None).await;
        let admin = insert_test_user(&app_data.db, "sathish", Role::Admin, Some("IT Software")).await;
        let coordinator = TicketCoordinator::new(app_data);
        let ticket = coordinator
            .create_ticket(&ctx_for(&alice), create_request("Outlook crashing"))
            .await
            .unwrap();

        for bad_target in [alice.id, 9999] {
            let err = coordinator
                .assign_ticket(&ctx_for(&admin), ticket.id, AssignTicketRequest { assigned_to: bad_target })
                .await
                .unwrap_err();
            assert!(matches!(err, InternalError::Ticket(TicketError::InvalidAssignee { .. })));
        }

        let detail = coordinator.view_ticket(&ctx_for(&admin), ticket.id).await.unwrap();
        assert_eq!(detail.ticket.assigned_to, None);
        assert_eq!(detail.ticket.status, TicketStatus::Open);
    }

    #[tokio::test]
    async fn test_invalid_edit_is_not_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let app_data = setup_test_app_data(dir.path()).await;
        let alice = insert_test_user(&app_data.db, "alice", Role::User, None).await;
        let admin = insert_test_user(&app_data.db, "sathish", Role::Admin, Some("IT Software")).await;
        let coordinator = TicketCoordinator::new(app_data);
        let ticket = coordinator
            .create_ticket(&ctx_for(&alice), create_request("Outlook crashing"))
            .await
            .unwrap();

        let mut request = edit_request(&ticket, TicketStatus::Resolved);
        request.description = "short".to_string();
        let err = coordinator
            .update_ticket(&ctx_for(&admin), ticket.id, request)
            .await
            .unwrap_err();

        assert!(matches!(err, InternalError::Validation(ValidationError { .. })));
        let detail = coordinator.view_ticket(&ctx_for(&admin), ticket.id).await.unwrap();
        assert_eq!(detail.ticket.status, TicketStatus::Open);
        assert_eq!(detail.ticket.resolved_at, None);
    }

    #[tokio::test]
    async fn test_assignable_admins_lists_every_admin_role() {
        let dir = tempfile::tempdir().unwrap();
        let app_data = setup_test_app_data(dir.path()).await;
        let alice = insert_test_user(&app_data.db, "alice", Role::User, None).await;
        let admin = insert_test_user(&app_data.db, "sathish", Role::Admin, Some("IT Software")).await;
        insert_test_user(&app_data.db, "boss", Role::SuperAdmin, Some("IT")).await;
        let coordinator = TicketCoordinator::new(app_data);
        let ticket = coordinator
            .create_ticket(&ctx_for(&alice), create_request("Outlook crashing"))
            .await
            .unwrap();

        let admins = coordinator.assignable_admins(&ctx_for(&admin), ticket.id).await.unwrap();

        assert_eq!(admins.len(), 2);
        assert!(admins.iter().all(|u| u.is_admin()));
    }
}
