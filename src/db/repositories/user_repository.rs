use sqlx::PgPool;

use crate::error::AppError;
use crate::models::{PublicUser, User};

pub struct UserRepository {
    db_pool: PgPool,
}

impl UserRepository {
    pub fn new(db_pool: PgPool) -> Self {
        Self { db_pool }
    }

    /// Looks a user up by email, case-insensitively.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, name, role, sector, password_hash, created_at
             FROM users
             WHERE LOWER(email) = LOWER($1)",
        )
        .bind(email)
        .fetch_optional(&self.db_pool)
        .await
        .map_err(|e| AppError::Database(format!("Failed to fetch user by email: {}", e)))?;

        Ok(user)
    }

    pub async fn insert(&self, user: &User) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO users (id, email, name, role, sector, password_hash, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(&user.id)
        .bind(&user.email)
        .bind(&user.name)
        .bind(&user.role)
        .bind(&user.sector)
        .bind(&user.password_hash)
        .bind(&user.created_at)
        .execute(&self.db_pool)
        .await
        .map_err(|e| AppError::Database(format!("Failed to create user: {}", e)))?;

        Ok(())
    }

    /// Updates name and/or sector. A `None` (or blank) value keeps the
    /// stored column, so callers pass only what the client actually sent.
    pub async fn update_profile(
        &self,
        id: &str,
        name: Option<&str>,
        sector: Option<&str>,
    ) -> Result<(), AppError> {
        let name = name.filter(|s| !s.trim().is_empty());
        let sector = sector.filter(|s| !s.trim().is_empty());

        sqlx::query(
            "UPDATE users
             SET name = COALESCE($1, name),
                 sector = COALESCE($2, sector)
             WHERE id = $3",
        )
        .bind(name)
        .bind(sector)
        .bind(id)
        .execute(&self.db_pool)
        .await
        .map_err(|e| AppError::Database(format!("Failed to update user profile: {}", e)))?;

        Ok(())
    }

    /// Lists users without their credential digests, newest first.
    pub async fn list(&self) -> Result<Vec<PublicUser>, AppError> {
        let users = sqlx::query_as::<_, PublicUser>(
            "SELECT id, email, name, role, sector, created_at
             FROM users
             ORDER BY created_at DESC",
        )
        .fetch_all(&self.db_pool)
        .await
        .map_err(|e| AppError::Database(format!("Failed to list users: {}", e)))?;

        Ok(users)
    }
}
