pub mod auth_handlers;
pub mod health;
pub mod profile_handlers;
pub mod ticket_handlers;
pub mod user_handlers;

use chrono::{SecondsFormat, Utc};
use std::collections::HashMap;

use crate::auth::json;

/// ISO-8601 UTC timestamp for created_at/updated_at columns.
pub(crate) fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parses a request body with the lenient flat-object scanner. Bodies that
/// are not object-shaped simply come back empty.
pub(crate) fn parse_body(body: &actix_web::web::Bytes) -> HashMap<String, String> {
    json::decode_flat_object(&String::from_utf8_lossy(body))
}
