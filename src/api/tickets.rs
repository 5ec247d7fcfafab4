use std::sync::Arc;

use poem::Request;
use poem_openapi::param::{Path, Query};
use poem_openapi::{OpenApi, Tags, payload::Json};

use crate::api::helpers::{self, ApiResult};
use crate::coordinators::TicketCoordinator;
use crate::coordinators::ticket_coordinator::TicketDetail;
use crate::providers::SessionProvider;
use crate::types::db::TicketStatus;
use crate::types::dto::ticket::{
    AddCommentRequest, AssignTicketRequest, AssigneeListResponse, CommentResponse,
    CreateTicketRequest, TicketDetailResponse, TicketListResponse, TicketResponse,
    UpdateTicketRequest,
};

/// Ticket lifecycle endpoints
pub struct TicketsApi {
    ticket_coordinator: Arc<TicketCoordinator>,
    session_provider: Arc<SessionProvider>,
}

impl TicketsApi {
    pub fn new(ticket_coordinator: Arc<TicketCoordinator>, session_provider: Arc<SessionProvider>) -> Self {
        Self {
            ticket_coordinator,
            session_provider,
        }
    }
}

#[derive(Tags)]
enum TicketTags {
    /// Filing, viewing and working tickets
    Tickets,
}

impl From<TicketDetail> for TicketDetailResponse {
    fn from(detail: TicketDetail) -> Self {
        Self {
            assignee: detail.assignee.as_ref().map(Into::into),
            ticket: detail.ticket.into(),
            comments: detail.comments.into_iter().map(Into::into).collect(),
            can_edit: detail.can_edit,
        }
    }
}

#[OpenApi]
impl TicketsApi {
    /// File a new ticket
    ///
    /// The creator's name, network address and system label are captured on the ticket.
    #[oai(path = "/tickets", method = "post", tag = "TicketTags::Tickets")]
    async fn create_ticket(&self, req: &Request, body: Json<CreateTicketRequest>) -> ApiResult<TicketResponse> {
        let ctx = helpers::create_request_context(req, &self.session_provider).await;

        let ticket = self.ticket_coordinator.create_ticket(&ctx, body.0).await?;

        Ok(Json(ticket.into()))
    }

    /// Caller's own tickets, newest first
    #[oai(path = "/tickets/mine", method = "get", tag = "TicketTags::Tickets")]
    async fn list_mine(
        &self,
        req: &Request,
        status: Query<Option<TicketStatus>>,
        search: Query<Option<String>>,
    ) -> ApiResult<TicketListResponse> {
        let ctx = helpers::create_request_context(req, &self.session_provider).await;

        let tickets = self.ticket_coordinator.list_mine(&ctx, status.0, search.0).await?;

        Ok(Json(TicketListResponse {
            tickets: tickets.into_iter().map(Into::into).collect(),
        }))
    }

    /// Ticket with assignee and comment thread
    #[oai(path = "/tickets/:id", method = "get", tag = "TicketTags::Tickets")]
    async fn view_ticket(&self, req: &Request, id: Path<i32>) -> ApiResult<TicketDetailResponse> {
        let ctx = helpers::create_request_context(req, &self.session_provider).await;

        let detail = self.ticket_coordinator.view_ticket(&ctx, id.0).await?;

        Ok(Json(detail.into()))
    }

    /// Edit fields and status (admins)
    #[oai(path = "/tickets/:id", method = "put", tag = "TicketTags::Tickets")]
    async fn update_ticket(
        &self,
        req: &Request,
        id: Path<i32>,
        body: Json<UpdateTicketRequest>,
    ) -> ApiResult<TicketResponse> {
        let ctx = helpers::create_request_context(req, &self.session_provider).await;

        let ticket = self.ticket_coordinator.update_ticket(&ctx, id.0, body.0).await?;

        Ok(Json(ticket.into()))
    }

    /// Add a comment (owner or admins)
    #[oai(path = "/tickets/:id/comments", method = "post", tag = "TicketTags::Tickets")]
    async fn add_comment(
        &self,
        req: &Request,
        id: Path<i32>,
        body: Json<AddCommentRequest>,
    ) -> ApiResult<CommentResponse> {
        let ctx = helpers::create_request_context(req, &self.session_provider).await;

        let comment = self.ticket_coordinator.add_comment(&ctx, id.0, body.0).await?;

        let mut response = CommentResponse::from((comment, None));
        response.author_name = ctx.actor.map(|actor| actor.display_name);
        Ok(Json(response))
    }

    /// Assign to an administrative user (admins)
    #[oai(path = "/tickets/:id/assign", method = "post", tag = "TicketTags::Tickets")]
    async fn assign_ticket(
        &self,
        req: &Request,
        id: Path<i32>,
        body: Json<AssignTicketRequest>,
    ) -> ApiResult<TicketResponse> {
        let ctx = helpers::create_request_context(req, &self.session_provider).await;

        let ticket = self.ticket_coordinator.assign_ticket(&ctx, id.0, body.0).await?;

        Ok(Json(ticket.into()))
    }

    /// Users a ticket may be assigned to (admins)
    #[oai(path = "/tickets/:id/assignees", method = "get", tag = "TicketTags::Tickets")]
    async fn assignable_admins(&self, req: &Request, id: Path<i32>) -> ApiResult<AssigneeListResponse> {
        let ctx = helpers::create_request_context(req, &self.session_provider).await;

        let admins = self.ticket_coordinator.assignable_admins(&ctx, id.0).await?;

        Ok(Json(AssigneeListResponse {
            assignees: admins.iter().map(Into::into).collect(),
        }))
    }
}
