use serde::Serialize;

/// Full user row, including the credential digest. Only the repository and
/// the auth handlers ever see this shape.
#[derive(Clone, Debug, sqlx::FromRow)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: String,
    pub sector: Option<String>,
    pub password_hash: String,
    pub created_at: String,
}

/// User as exposed over the API: never carries the credential digest.
#[derive(Clone, Debug, Serialize, sqlx::FromRow)]
pub struct PublicUser {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: String,
    pub sector: Option<String>,
    pub created_at: String,
}
