use actix_web::{
    Error, HttpMessage,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    http::{Method, header::AUTHORIZATION},
};
use futures_util::future::{Ready, ok, ready};
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll};

use crate::auth::TokenCodec;
use crate::error::AppError;
use crate::models::Claims;

/// Authentication gate: extracts the bearer token from the Authorization
/// header, verifies it against the process secret and stores the typed
/// claim set in the request extensions for handlers to pick up.
///
/// Every failure — missing header, wrong prefix, malformed token, bad
/// signature — collapses into the single `NotAuthenticated` outcome;
/// handlers never see which one it was. OPTIONS requests (CORS pre-flight)
/// bypass the gate.
#[derive(Clone)]
pub struct BearerAuthentication {
    codec: TokenCodec,
}

impl BearerAuthentication {
    pub fn new(codec: TokenCodec) -> Self {
        Self { codec }
    }
}

impl<S, B> Transform<S, ServiceRequest> for BearerAuthentication
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = BearerAuthenticationMiddleware<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(BearerAuthenticationMiddleware {
            service: Rc::new(service),
            codec: self.codec.clone(),
        })
    }
}

pub struct BearerAuthenticationMiddleware<S> {
    service: Rc<S>,
    codec: TokenCodec,
}

impl<S, B> Service<ServiceRequest> for BearerAuthenticationMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        if req.method() == Method::OPTIONS {
            return Box::pin(self.service.call(req));
        }

        match self.authenticate(&req) {
            Ok(claims) => {
                req.extensions_mut().insert(claims);
                Box::pin(self.service.call(req))
            }
            Err(err) => Box::pin(ready(Err(err.into()))),
        }
    }
}

impl<S> BearerAuthenticationMiddleware<S> {
    fn authenticate(&self, req: &ServiceRequest) -> Result<Claims, AppError> {
        let header = req
            .headers()
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .ok_or(AppError::NotAuthenticated)?;

        // The prefix is the literal "Bearer " — case-sensitive, space
        // included; the remainder is the token, taken verbatim.
        let token = header.strip_prefix("Bearer ").ok_or_else(|| {
            log::warn!("Authorization header without Bearer prefix for {}", req.path());
            AppError::NotAuthenticated
        })?;

        let payload = self.codec.verify(token).map_err(|e| {
            log::warn!("Token rejected for {}: {}", req.path(), e);
            AppError::NotAuthenticated
        })?;

        Claims::from_payload(&payload).ok_or(AppError::NotAuthenticated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;
    use actix_web::{App, HttpResponse, test, web};
    use pretty_assertions::assert_eq;

    async fn whoami(claims: Claims) -> HttpResponse {
        HttpResponse::Ok().body(format!("{}:{}", claims.sub, claims.role))
    }

    fn codec() -> TokenCodec {
        TokenCodec::new("segredo-de-teste")
    }

    macro_rules! guarded_app {
        () => {
            test::init_service(
                App::new().service(
                    web::resource("/whoami")
                        .wrap(BearerAuthentication::new(codec()))
                        .route(web::get().to(whoami)),
                ),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn valid_token_reaches_the_handler() {
        let app = guarded_app!();
        let token = codec().issue("u-1", "a@b.com", "Ana", Role::Tecnico, "TI");

        let req = test::TestRequest::get()
            .uri("/whoami")
            .insert_header((AUTHORIZATION, format!("Bearer {}", token)))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::OK);

        let body = test::read_body(resp).await;
        assert_eq!(body, "u-1:tecnico");
    }

    #[actix_web::test]
    async fn missing_header_is_not_authenticated() {
        let app = guarded_app!();
        let req = test::TestRequest::get().uri("/whoami").to_request();
        let status = match test::try_call_service(&app, req).await {
            Ok(resp) => resp.status(),
            Err(err) => err.error_response().status(),
        };
        assert_eq!(status, actix_web::http::StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn wrong_prefix_is_not_authenticated() {
        let app = guarded_app!();
        let token = codec().issue("u-1", "a@b.com", "Ana", Role::Usuario, "");

        for value in [format!("bearer {}", token), token.clone(), format!("Token {}", token)] {
            let req = test::TestRequest::get()
                .uri("/whoami")
                .insert_header((AUTHORIZATION, value))
                .to_request();
            let status = match test::try_call_service(&app, req).await {
                Ok(resp) => resp.status(),
                Err(err) => err.error_response().status(),
            };
            assert_eq!(status, actix_web::http::StatusCode::UNAUTHORIZED);
        }
    }

    #[actix_web::test]
    async fn tampered_token_is_not_authenticated() {
        let app = guarded_app!();
        let token = codec().issue("u-1", "a@b.com", "Ana", Role::Usuario, "");
        let tampered = format!("{}x", token);

        let req = test::TestRequest::get()
            .uri("/whoami")
            .insert_header((AUTHORIZATION, format!("Bearer {}", tampered)))
            .to_request();
        let status = match test::try_call_service(&app, req).await {
            Ok(resp) => resp.status(),
            Err(err) => err.error_response().status(),
        };
        assert_eq!(status, actix_web::http::StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn token_from_another_secret_is_not_authenticated() {
        let app = guarded_app!();
        let foreign = TokenCodec::new("outro-segredo").issue("u-1", "a@b.com", "Ana", Role::Usuario, "");

        let req = test::TestRequest::get()
            .uri("/whoami")
            .insert_header((AUTHORIZATION, format!("Bearer {}", foreign)))
            .to_request();
        let status = match test::try_call_service(&app, req).await {
            Ok(resp) => resp.status(),
            Err(err) => err.error_response().status(),
        };
        assert_eq!(status, actix_web::http::StatusCode::UNAUTHORIZED);
    }
}
