use crate::error::AppError;
use crate::models::{Claims, Role, Ticket};

/// Every gated operation the backend exposes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    ListTickets,
    CreateTicket,
    UpdateTicket,
    ChangeTicketStatus,
    DeleteTicket,
    ListUsers,
    ViewProfile,
    UpdateProfile,
}

/// What a principal may see when listing tickets.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TicketVisibility {
    /// Technicians see every ticket.
    All,
    /// Requesters see only tickets they own.
    OwnedBy(String),
}

/// State-free allow/deny decision for an authenticated principal.
///
/// Status changes, deletions and user listing are technician-only; every
/// other operation is open to any authenticated role. Note there is
/// deliberately no ownership check on `UpdateTicket`: any authenticated
/// principal may edit any ticket by id (preserved behavior, tracked as a
/// known gap).
pub fn authorize(role: Role, action: Action) -> Result<(), AppError> {
    match action {
        Action::ChangeTicketStatus if role != Role::Tecnico => Err(AppError::Forbidden(
            "Apenas técnicos podem alterar status".to_string(),
        )),
        Action::DeleteTicket if role != Role::Tecnico => Err(AppError::Forbidden(
            "Apenas técnicos podem deletar tickets".to_string(),
        )),
        Action::ListUsers if role != Role::Tecnico => Err(AppError::Forbidden(
            "Apenas técnicos podem listar usuários".to_string(),
        )),
        _ => Ok(()),
    }
}

pub fn ticket_visibility(claims: &Claims) -> TicketVisibility {
    match claims.role {
        Role::Tecnico => TicketVisibility::All,
        Role::Usuario => TicketVisibility::OwnedBy(claims.sub.clone()),
    }
}

/// Applies the list visibility filter for the given principal.
pub fn visible_tickets(claims: &Claims, tickets: Vec<Ticket>) -> Vec<Ticket> {
    match ticket_visibility(claims) {
        TicketVisibility::All => tickets,
        TicketVisibility::OwnedBy(owner) => tickets
            .into_iter()
            .filter(|t| t.user_id == owner)
            .collect(),
    }
}

/// Applies the profile-update rules: technicians may not change their own
/// sector, so the field is dropped from their updates before it reaches
/// storage.
pub fn sanitize_profile_update(
    role: Role,
    name: Option<String>,
    sector: Option<String>,
) -> (Option<String>, Option<String>) {
    match role {
        Role::Tecnico => (name, None),
        Role::Usuario => (name, sector),
    }
}
