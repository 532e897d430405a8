use sqlx::PgPool;

use crate::error::AppError;
use crate::models::Ticket;

const TICKET_COLUMNS: &str = "id, title, description, category, priority, status, location, \
                              requester_name, requester_sector, assigned_to, user_id, \
                              created_at, updated_at";

pub struct TicketRepository {
    db_pool: PgPool,
}

impl TicketRepository {
    pub fn new(db_pool: PgPool) -> Self {
        Self { db_pool }
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Ticket>, AppError> {
        let ticket = sqlx::query_as::<_, Ticket>(&format!(
            "SELECT {} FROM tickets WHERE id = $1",
            TICKET_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.db_pool)
        .await
        .map_err(|e| AppError::Database(format!("Failed to fetch ticket: {}", e)))?;

        Ok(ticket)
    }

    pub async fn insert(&self, ticket: &Ticket) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO tickets (id, title, description, category, priority, status, location,
                                  requester_name, requester_sector, assigned_to, user_id,
                                  created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)",
        )
        .bind(&ticket.id)
        .bind(&ticket.title)
        .bind(&ticket.description)
        .bind(&ticket.category)
        .bind(&ticket.priority)
        .bind(&ticket.status)
        .bind(&ticket.location)
        .bind(&ticket.requester_name)
        .bind(&ticket.requester_sector)
        .bind(&ticket.assigned_to)
        .bind(&ticket.user_id)
        .bind(&ticket.created_at)
        .bind(&ticket.updated_at)
        .execute(&self.db_pool)
        .await
        .map_err(|e| AppError::Database(format!("Failed to create ticket: {}", e)))?;

        Ok(())
    }

    /// Writes back every content column of an already-merged ticket.
    pub async fn update(&self, ticket: &Ticket) -> Result<(), AppError> {
        sqlx::query(
            "UPDATE tickets
             SET title = $1, description = $2, category = $3, priority = $4, status = $5,
                 location = $6, requester_name = $7, requester_sector = $8, assigned_to = $9,
                 updated_at = $10
             WHERE id = $11",
        )
        .bind(&ticket.title)
        .bind(&ticket.description)
        .bind(&ticket.category)
        .bind(&ticket.priority)
        .bind(&ticket.status)
        .bind(&ticket.location)
        .bind(&ticket.requester_name)
        .bind(&ticket.requester_sector)
        .bind(&ticket.assigned_to)
        .bind(&ticket.updated_at)
        .bind(&ticket.id)
        .execute(&self.db_pool)
        .await
        .map_err(|e| AppError::Database(format!("Failed to update ticket: {}", e)))?;

        Ok(())
    }

    pub async fn update_status(
        &self,
        id: &str,
        status: &str,
        updated_at: &str,
    ) -> Result<(), AppError> {
        sqlx::query("UPDATE tickets SET status = $1, updated_at = $2 WHERE id = $3")
            .bind(status)
            .bind(updated_at)
            .bind(id)
            .execute(&self.db_pool)
            .await
            .map_err(|e| AppError::Database(format!("Failed to update ticket status: {}", e)))?;

        Ok(())
    }

    pub async fn delete_by_id(&self, id: &str) -> Result<(), AppError> {
        sqlx::query("DELETE FROM tickets WHERE id = $1")
            .bind(id)
            .execute(&self.db_pool)
            .await
            .map_err(|e| AppError::Database(format!("Failed to delete ticket: {}", e)))?;

        Ok(())
    }

    pub async fn list(&self) -> Result<Vec<Ticket>, AppError> {
        let tickets = sqlx::query_as::<_, Ticket>(&format!(
            "SELECT {} FROM tickets ORDER BY created_at DESC",
            TICKET_COLUMNS
        ))
        .fetch_all(&self.db_pool)
        .await
        .map_err(|e| AppError::Database(format!("Failed to list tickets: {}", e)))?;

        Ok(tickets)
    }
}
