use std::collections::HashMap;

use sea_orm::ActiveValue::{NotSet, Set, Unchanged};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, Iterable,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Select,
};

use crate::errors::InternalError;
use crate::errors::internal::TicketError;
use crate::types::db::{TicketCategory, TicketStatus, ticket, ticket_comment, user};
use crate::types::internal::TicketFilter;

/// Data access for tickets and their comment threads
#[derive(Debug, Default)]
pub struct TicketStore;

impl TicketStore {
    pub fn new() -> Self {
        Self
    }

    pub async fn insert(
        &self,
        conn: &impl ConnectionTrait,
        ticket: ticket::ActiveModel,
    ) -> Result<ticket::Model, InternalError> {
        ticket
            .insert(conn)
            .await
            .map_err(|e| InternalError::database("insert_ticket", e))
    }

    pub async fn find_by_id(
        &self,
        conn: &impl ConnectionTrait,
        ticket_id: i32,
    ) -> Result<Option<ticket::Model>, InternalError> {
        ticket::Entity::find_by_id(ticket_id)
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_ticket", e))
    }

    pub async fn get_by_id(
        &self,
        conn: &impl ConnectionTrait,
        ticket_id: i32,
    ) -> Result<ticket::Model, InternalError> {
        self.find_by_id(conn, ticket_id)
            .await?
            .ok_or_else(|| TicketError::NotFound { ticket_id }.into())
    }

    /// Persist the mutable fields of a ticket
    ///
    /// Owner and creator snapshot are never written after creation.
    pub async fn update(
        &self,
        conn: &impl ConnectionTrait,
        ticket: ticket::Model,
    ) -> Result<ticket::Model, InternalError> {
        let active = ticket::ActiveModel {
            id: Unchanged(ticket.id),
            title: Set(ticket.title),
            description: Set(ticket.description),
            category: Set(ticket.category),
            priority: Set(ticket.priority),
            status: Set(ticket.status),
            assigned_to: Set(ticket.assigned_to),
            updated_at: Set(ticket.updated_at),
            resolved_at: Set(ticket.resolved_at),
            user_name: NotSet,
            user_ip_address: NotSet,
            user_system_name: NotSet,
            user_id: NotSet,
            created_at: NotSet,
        };

        active
            .update(conn)
            .await
            .map_err(|e| InternalError::database("update_ticket", e))
    }

    /// Advance `updated_at` without touching anything else
    pub async fn touch(
        &self,
        conn: &impl ConnectionTrait,
        ticket_id: i32,
        now: i64,
    ) -> Result<(), InternalError> {
        let result = ticket::Entity::update_many()
            .col_expr(ticket::Column::UpdatedAt, Expr::value(now))
            .filter(ticket::Column::Id.eq(ticket_id))
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("touch_ticket", e))?;

        if result.rows_affected == 0 {
            return Err(TicketError::NotFound { ticket_id }.into());
        }
        Ok(())
    }

    /// Tickets matching `filter`, newest first
    pub async fn list(
        &self,
        conn: &impl ConnectionTrait,
        filter: &TicketFilter,
    ) -> Result<Vec<ticket::Model>, InternalError> {
        filtered(filter)
            .order_by_desc(ticket::Column::CreatedAt)
            .order_by_desc(ticket::Column::Id)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("list_tickets", e))
    }

    pub async fn count(
        &self,
        conn: &impl ConnectionTrait,
        filter: &TicketFilter,
    ) -> Result<u64, InternalError> {
        filtered(filter)
            .count(conn)
            .await
            .map_err(|e| InternalError::database("count_tickets", e))
    }

    /// Ticket count per status; every status is present, zero if unused
    pub async fn count_by_status(
        &self,
        conn: &impl ConnectionTrait,
    ) -> Result<Vec<(TicketStatus, u64)>, InternalError> {
        let rows: Vec<(TicketStatus, i64)> = ticket::Entity::find()
            .select_only()
            .column(ticket::Column::Status)
            .column_as(Expr::col(ticket::Column::Id).count(), "count")
            .group_by(ticket::Column::Status)
            .into_tuple()
            .all(conn)
            .await
            .map_err(|e| InternalError::database("count_tickets_by_status", e))?;

        let counts: HashMap<TicketStatus, i64> = rows.into_iter().collect();
        Ok(TicketStatus::iter()
            .map(|status| (status, counts.get(&status).copied().unwrap_or(0) as u64))
            .collect())
    }

    /// Ticket count per category; every category is present, zero if unused
    pub async fn count_by_category(
        &self,
        conn: &impl ConnectionTrait,
    ) -> Result<Vec<(TicketCategory, u64)>, InternalError> {
        let rows: Vec<(TicketCategory, i64)> = ticket::Entity::find()
            .select_only()
            .column(ticket::Column::Category)
            .column_as(Expr::col(ticket::Column::Id).count(), "count")
            .group_by(ticket::Column::Category)
            .into_tuple()
            .all(conn)
            .await
            .map_err(|e| InternalError::database("count_tickets_by_category", e))?;

        let counts: HashMap<TicketCategory, i64> = rows.into_iter().collect();
        Ok(TicketCategory::iter()
            .map(|category| (category, counts.get(&category).copied().unwrap_or(0) as u64))
            .collect())
    }

    pub async fn recent(
        &self,
        conn: &impl ConnectionTrait,
        limit: u64,
    ) -> Result<Vec<ticket::Model>, InternalError> {
        ticket::Entity::find()
            .order_by_desc(ticket::Column::CreatedAt)
            .order_by_desc(ticket::Column::Id)
            .limit(limit)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("recent_tickets", e))
    }

    /// Remove a ticket; its comments go with it
    pub async fn delete(&self, conn: &impl ConnectionTrait, ticket_id: i32) -> Result<(), InternalError> {
        let result = ticket::Entity::delete_by_id(ticket_id)
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("delete_ticket", e))?;

        if result.rows_affected == 0 {
            return Err(TicketError::NotFound { ticket_id }.into());
        }
        Ok(())
    }

    pub async fn add_comment(
        &self,
        conn: &impl ConnectionTrait,
        ticket_id: i32,
        user_id: i32,
        comment: String,
        now: i64,
    ) -> Result<ticket_comment::Model, InternalError> {
        let active = ticket_comment::ActiveModel {
            id: NotSet,
            ticket_id: Set(ticket_id),
            user_id: Set(user_id),
            comment: Set(comment),
            created_at: Set(now),
        };

        active
            .insert(conn)
            .await
            .map_err(|e| InternalError::database("insert_comment", e))
    }

    /// Comment thread oldest first, each with its author when still present
    pub async fn list_comments(
        &self,
        conn: &impl ConnectionTrait,
        ticket_id: i32,
    ) -> Result<Vec<(ticket_comment::Model, Option<user::Model>)>, InternalError> {
        ticket_comment::Entity::find()
            .filter(ticket_comment::Column::TicketId.eq(ticket_id))
            .order_by_asc(ticket_comment::Column::CreatedAt)
            .order_by_asc(ticket_comment::Column::Id)
            .find_also_related(user::Entity)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("list_comments", e))
    }
}

fn filtered(filter: &TicketFilter) -> Select<ticket::Entity> {
    let mut condition = Condition::all();
    if let Some(owner_id) = filter.owner_id {
        condition = condition.add(ticket::Column::UserId.eq(owner_id));
    }
    if let Some(assignee) = filter.assigned_to {
        condition = condition.add(ticket::Column::AssignedTo.eq(assignee));
    }
    if let Some(status) = filter.status {
        condition = condition.add(ticket::Column::Status.eq(status));
    }
    if let Some(priority) = filter.priority {
        condition = condition.add(ticket::Column::Priority.eq(priority));
    }
    if let Some(category) = filter.category {
        condition = condition.add(ticket::Column::Category.eq(category));
    }
    if let Some(search) = &filter.search {
        condition = condition.add(ticket::Column::Title.contains(search.as_str()));
    }
    ticket::Entity::find().filter(condition)
}
