use serde::Serialize;
use std::collections::HashMap;

#[derive(Clone, Debug, Serialize, sqlx::FromRow)]
pub struct Ticket {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub priority: String,
    pub status: String,
    pub location: Option<String>,
    pub requester_name: Option<String>,
    pub requester_sector: Option<String>,
    pub assigned_to: Option<String>,
    pub user_id: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Clients write the assignee under this key; the column is `assigned_to`.
const RESPONSIBLE_NAME_ALIAS: &str = "responsible_name";

impl Ticket {
    /// Merges a flat PUT body into the ticket. Every content column can be
    /// overwritten; `responsible_name` aliases `assigned_to`, and a blank
    /// or literal "null" assignee clears the column. Unknown keys are
    /// ignored. Identity columns (`id`, `user_id`, `created_at`) are not
    /// client-writable.
    pub fn apply_update(&mut self, fields: &HashMap<String, String>) {
        for (key, value) in fields {
            match key.as_str() {
                "title" => self.title = value.clone(),
                "description" => self.description = value.clone(),
                "category" => self.category = value.clone(),
                "priority" => self.priority = value.clone(),
                "status" => self.status = value.clone(),
                "location" => self.location = Some(value.clone()),
                "requester_name" => self.requester_name = Some(value.clone()),
                "requester_sector" => self.requester_sector = Some(value.clone()),
                "assigned_to" => self.assigned_to = normalize_assignee(value),
                RESPONSIBLE_NAME_ALIAS => self.assigned_to = normalize_assignee(value),
                _ => {}
            }
        }
    }
}

/// Blank and the literal string "null" (a de-quoted JSON null from the flat
/// body scanner) both mean "no assignee".
pub fn normalize_assignee(value: &str) -> Option<String> {
    if value.trim().is_empty() || value == "null" {
        None
    } else {
        Some(value.to_string())
    }
}
