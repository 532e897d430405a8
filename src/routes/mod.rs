use actix_web::web;

use crate::handlers::{auth_handlers, health, profile_handlers, ticket_handlers, user_handlers};
use crate::middleware::BearerAuthentication;

/// Routes reachable without a token: health plus signup/login.
pub fn configure_public_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/health").route(web::get().to(health::health_check)));
    cfg.service(web::resource("/auth/signup").route(web::post().to(auth_handlers::signup)));
    cfg.service(web::resource("/auth/login").route(web::post().to(auth_handlers::login)));
}

/// Bearer-protected routes. Each resource carries the authentication gate
/// itself so the public `/auth/*` endpoints above stay open.
pub fn configure_protected_routes(cfg: &mut web::ServiceConfig, auth: &BearerAuthentication) {
    cfg.service(
        web::resource("/auth/me")
            .wrap(auth.clone())
            .route(web::get().to(profile_handlers::get_profile))
            .route(web::put().to(profile_handlers::update_profile)),
    );
    cfg.service(
        web::resource("/tickets")
            .wrap(auth.clone())
            .route(web::get().to(ticket_handlers::list_tickets))
            .route(web::post().to(ticket_handlers::create_ticket)),
    );
    cfg.service(
        web::resource("/ticket/{id}/status")
            .wrap(auth.clone())
            .route(web::patch().to(ticket_handlers::change_ticket_status)),
    );
    cfg.service(
        web::resource("/ticket/{id}")
            .wrap(auth.clone())
            .route(web::put().to(ticket_handlers::update_ticket))
            .route(web::delete().to(ticket_handlers::delete_ticket)),
    );
    cfg.service(
        web::resource("/users")
            .wrap(auth.clone())
            .route(web::get().to(user_handlers::list_users)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::TokenCodec;
    use actix_web::{App, test};

    #[actix_web::test]
    async fn routes_compile_and_reject_anonymous_access() {
        let auth = BearerAuthentication::new(TokenCodec::new("segredo-de-teste"));
        let app = test::init_service(
            App::new()
                .configure(configure_public_routes)
                .configure(|cfg| configure_protected_routes(cfg, &auth)),
        )
        .await;

        let resp = test::call_service(
            &app,
            test::TestRequest::get().uri("/health").to_request(),
        )
        .await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::OK);

        for uri in ["/auth/me", "/tickets", "/users"] {
            let result =
                test::try_call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
            let status = match result {
                Ok(resp) => resp.status(),
                Err(err) => err.error_response().status(),
            };
            assert_eq!(
                status,
                actix_web::http::StatusCode::UNAUTHORIZED,
                "{} should require a token",
                uri
            );
        }
    }
}
