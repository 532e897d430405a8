use actix_web::{HttpResponse, web};
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::{TokenCodec, password};
use crate::db::repositories::UserRepository;
use crate::error::{AppError, storage_context};
use crate::handlers::{now_iso, parse_body};
use crate::models::{Role, User};

/// Creates a new account. Role must be one of the two known roles; the
/// email is the unique key, compared case-insensitively.
pub async fn signup(pool: web::Data<PgPool>, body: web::Bytes) -> Result<HttpResponse, AppError> {
    let fields = parse_body(&body);
    let email = fields
        .get("email")
        .map(|s| s.trim().to_lowercase())
        .unwrap_or_default();
    let password = fields.get("password").cloned().unwrap_or_default();
    let name = fields
        .get("name")
        .map(|s| s.trim().to_string())
        .unwrap_or_default();
    let role_raw = fields
        .get("role")
        .map(|s| s.trim().to_lowercase())
        .unwrap_or_default();
    let sector = fields
        .get("sector")
        .map(|s| s.trim().to_string())
        .unwrap_or_default();

    if email.is_empty() || password.is_empty() {
        return Err(AppError::Validation(
            "Email e senha são obrigatórios".to_string(),
        ));
    }
    if name.is_empty() {
        return Err(AppError::Validation("Nome é obrigatório".to_string()));
    }
    let role = Role::parse(&role_raw).ok_or_else(|| {
        AppError::Validation("Papel inválido: use 'usuario' ou 'tecnico'".to_string())
    })?;

    let repo = UserRepository::new(pool.get_ref().clone());
    let existing = repo
        .find_by_email(&email)
        .await
        .map_err(storage_context("Falha ao criar usuário"))?;
    if existing.is_some() {
        return Err(AppError::Conflict("Usuário já existe".to_string()));
    }

    let user = User {
        id: Uuid::new_v4().to_string(),
        email,
        name,
        role: role.as_str().to_string(),
        sector: Some(sector),
        password_hash: password::hash_password(&password),
        created_at: now_iso(),
    };
    repo.insert(&user)
        .await
        .map_err(storage_context("Falha ao criar usuário"))?;

    log::info!("User {} created with role {}", user.id, user.role);
    Ok(HttpResponse::Created().json(json!({
        "id": user.id,
        "email": user.email,
        "name": user.name,
        "role": user.role,
        "sector": user.sector,
    })))
}

/// Authenticates a credential pair and issues a bearer token.
///
/// The three failure messages are distinguishable on purpose (unknown
/// account, wrong password, role mismatch) but share the 401 class; they go
/// out as plain text, matching what the web client displays verbatim.
pub async fn login(
    pool: web::Data<PgPool>,
    codec: web::Data<TokenCodec>,
    body: web::Bytes,
) -> Result<HttpResponse, AppError> {
    let fields = parse_body(&body);
    let email = fields
        .get("email")
        .map(|s| s.trim().to_lowercase())
        .unwrap_or_default();
    let password = fields.get("password").cloned().unwrap_or_default();
    let requested_role = fields
        .get("role")
        .map(|s| s.trim().to_lowercase())
        .unwrap_or_default();

    if email.is_empty() || password.is_empty() {
        return Err(AppError::Validation(
            "Email e senha são obrigatórios".to_string(),
        ));
    }

    let repo = UserRepository::new(pool.get_ref().clone());
    let Some(user) = repo
        .find_by_email(&email)
        .await
        .map_err(storage_context("Falha ao autenticar"))?
    else {
        return Ok(unauthorized_text(
            "Usuário não encontrado. Cadastre-se para acessar o sistema",
        ));
    };

    if !password::verify_password(&password, &user.password_hash) {
        return Ok(unauthorized_text("Login inválido"));
    }

    let role = Role::parse(&user.role).unwrap_or(Role::Usuario);
    if !requested_role.is_empty() && requested_role != role.as_str() {
        let message = match role {
            Role::Usuario => "Login cadastrado como usuário",
            Role::Tecnico => "Login cadastrado como técnico",
        };
        return Ok(unauthorized_text(message));
    }

    let sector = user.sector.clone().unwrap_or_default();
    let token = codec.issue(&user.id, &user.email, &user.name, role, &sector);

    log::info!("User {} logged in", user.id);
    Ok(HttpResponse::Ok().json(json!({
        "token": token,
        "user": {
            "id": user.id,
            "email": user.email,
            "name": user.name,
            "role": role.as_str(),
            "sector": sector,
        }
    })))
}

fn unauthorized_text(message: &str) -> HttpResponse {
    HttpResponse::Unauthorized()
        .content_type("text/plain; charset=utf-8")
        .body(message.to_string())
}
