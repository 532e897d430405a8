use actix_web::{HttpResponse, web};
use serde_json::json;
use sqlx::PgPool;

use crate::auth::policy::{self, Action};
use crate::auth::TokenCodec;
use crate::db::repositories::UserRepository;
use crate::error::{AppError, storage_context};
use crate::handlers::parse_body;
use crate::models::Claims;

/// Returns the caller's own profile, derived entirely from the verified
/// claims — no storage round-trip and no client-supplied id.
pub async fn get_profile(claims: Claims) -> Result<HttpResponse, AppError> {
    policy::authorize(claims.role, Action::ViewProfile)?;

    Ok(HttpResponse::Ok().json(json!({
        "id": claims.sub,
        "email": claims.email,
        "name": claims.name,
        "role": claims.role.as_str(),
        "sector": claims.sector,
    })))
}

/// Updates the caller's own name and/or sector, then reissues the token so
/// the claims reflect the stored record. Blank fields keep their stored
/// values; a technician's sector change is dropped by policy.
pub async fn update_profile(
    claims: Claims,
    pool: web::Data<PgPool>,
    codec: web::Data<TokenCodec>,
    body: web::Bytes,
) -> Result<HttpResponse, AppError> {
    policy::authorize(claims.role, Action::UpdateProfile)?;

    let fields = parse_body(&body);
    let (name, sector) = policy::sanitize_profile_update(
        claims.role,
        fields.get("name").cloned(),
        fields.get("sector").cloned(),
    );

    let repo = UserRepository::new(pool.get_ref().clone());
    repo.update_profile(&claims.sub, name.as_deref(), sector.as_deref())
        .await
        .map_err(storage_context("Falha ao atualizar perfil"))?;

    let user = repo
        .find_by_email(&claims.email)
        .await
        .map_err(storage_context("Falha ao atualizar perfil"))?
        .ok_or_else(|| AppError::NotFound("Usuário não encontrado".to_string()))?;

    let sector = user.sector.clone().unwrap_or_default();
    let token = codec.issue(&claims.sub, &user.email, &user.name, claims.role, &sector);

    Ok(HttpResponse::Ok().json(json!({
        "token": token,
        "user": {
            "id": claims.sub,
            "email": user.email,
            "name": user.name,
            "role": claims.role.as_str(),
            "sector": sector,
        }
    })))
}
