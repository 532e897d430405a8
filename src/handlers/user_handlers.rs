use actix_web::{HttpResponse, web};
use sqlx::PgPool;

use crate::auth::policy::{self, Action};
use crate::db::repositories::UserRepository;
use crate::error::{AppError, storage_context};
use crate::models::Claims;

/// Lists users, technician-only. Rows never include credential digests.
pub async fn list_users(claims: Claims, pool: web::Data<PgPool>) -> Result<HttpResponse, AppError> {
    policy::authorize(claims.role, Action::ListUsers)?;

    let users = UserRepository::new(pool.get_ref().clone())
        .list()
        .await
        .map_err(storage_context("Falha ao listar usuários"))?;

    Ok(HttpResponse::Ok().json(users))
}
