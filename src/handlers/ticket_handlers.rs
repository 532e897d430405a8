use actix_web::{HttpResponse, web};
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::policy::{self, Action};
use crate::db::repositories::TicketRepository;
use crate::error::{AppError, storage_context};
use crate::handlers::{now_iso, parse_body};
use crate::models::{Claims, Ticket, ticket::normalize_assignee};

/// Lists tickets through the role's visibility filter: technicians see
/// everything, requesters only what they own.
pub async fn list_tickets(
    claims: Claims,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    policy::authorize(claims.role, Action::ListTickets)?;

    let tickets = TicketRepository::new(pool.get_ref().clone())
        .list()
        .await
        .map_err(storage_context("Falha ao listar tickets"))?;

    Ok(HttpResponse::Ok().json(policy::visible_tickets(&claims, tickets)))
}

/// Creates a ticket. The owner is always the token subject; any
/// client-supplied owner field is ignored.
pub async fn create_ticket(
    claims: Claims,
    pool: web::Data<PgPool>,
    body: web::Bytes,
) -> Result<HttpResponse, AppError> {
    policy::authorize(claims.role, Action::CreateTicket)?;

    let fields = parse_body(&body);
    let get = |key: &str| fields.get(key).cloned().unwrap_or_default();
    let now = now_iso();

    let ticket = Ticket {
        id: Uuid::new_v4().to_string(),
        title: get("title"),
        description: get("description"),
        category: fields
            .get("category")
            .cloned()
            .unwrap_or_else(|| "Geral".to_string()),
        priority: fields
            .get("priority")
            .cloned()
            .unwrap_or_else(|| "Média".to_string()),
        status: fields
            .get("status")
            .cloned()
            .unwrap_or_else(|| "Aberto".to_string()),
        location: Some(get("location")),
        requester_name: Some(get("requester_name")),
        requester_sector: Some(get("requester_sector")),
        assigned_to: fields
            .get("responsible_name")
            .and_then(|v| normalize_assignee(v)),
        user_id: claims.sub.clone(),
        created_at: now.clone(),
        updated_at: now,
    };

    TicketRepository::new(pool.get_ref().clone())
        .insert(&ticket)
        .await
        .map_err(storage_context("Falha ao criar ticket"))?;

    log::info!("Ticket {} created by {}", ticket.id, claims.sub);
    Ok(HttpResponse::Created().json(ticket))
}

/// Replaces a ticket's content fields from a flat body. Any authenticated
/// principal may edit any ticket by id — there is no ownership check here,
/// a preserved behavior tracked as a known gap.
pub async fn update_ticket(
    claims: Claims,
    pool: web::Data<PgPool>,
    path: web::Path<String>,
    body: web::Bytes,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let repo = TicketRepository::new(pool.get_ref().clone());

    let mut ticket = repo
        .find_by_id(&id)
        .await
        .map_err(storage_context("Falha ao manipular ticket"))?
        .ok_or_else(|| AppError::NotFound("Ticket não encontrado".to_string()))?;

    policy::authorize(claims.role, Action::UpdateTicket)?;

    ticket.apply_update(&parse_body(&body));
    ticket.updated_at = now_iso();

    repo.update(&ticket)
        .await
        .map_err(storage_context("Falha ao manipular ticket"))?;

    Ok(HttpResponse::Ok().json(ticket))
}

/// Changes a ticket's status. Existence is checked first, then the status
/// field, then the role — in that order, so a requester probing a missing
/// ticket still sees 404.
pub async fn change_ticket_status(
    claims: Claims,
    pool: web::Data<PgPool>,
    path: web::Path<String>,
    body: web::Bytes,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let repo = TicketRepository::new(pool.get_ref().clone());

    let mut ticket = repo
        .find_by_id(&id)
        .await
        .map_err(storage_context("Falha ao manipular ticket"))?
        .ok_or_else(|| AppError::NotFound("Ticket não encontrado".to_string()))?;

    let fields = parse_body(&body);
    let status = fields
        .get("status")
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::Validation("Status inválido".to_string()))?;

    policy::authorize(claims.role, Action::ChangeTicketStatus)?;

    ticket.status = status;
    ticket.updated_at = now_iso();
    repo.update_status(&ticket.id, &ticket.status, &ticket.updated_at)
        .await
        .map_err(storage_context("Falha ao manipular ticket"))?;

    Ok(HttpResponse::Ok().json(ticket))
}

/// Deletes a ticket. Existence before role, preserving source order.
pub async fn delete_ticket(
    claims: Claims,
    pool: web::Data<PgPool>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let repo = TicketRepository::new(pool.get_ref().clone());

    repo.find_by_id(&id)
        .await
        .map_err(storage_context("Falha ao manipular ticket"))?
        .ok_or_else(|| AppError::NotFound("Ticket não encontrado".to_string()))?;

    policy::authorize(claims.role, Action::DeleteTicket)?;

    repo.delete_by_id(&id)
        .await
        .map_err(storage_context("Falha ao manipular ticket"))?;

    log::info!("Ticket {} deleted by {}", id, claims.sub);
    Ok(HttpResponse::NoContent().finish())
}
