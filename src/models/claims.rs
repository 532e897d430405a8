use actix_web::{Error, FromRequest, HttpMessage, HttpRequest, dev::Payload};
use std::collections::HashMap;
use std::future::{Ready, ready};

use crate::error::AppError;
use crate::models::Role;

/// Typed claim set of a verified bearer token. Built per-request by the
/// authentication gate from the decoded payload map and discarded at end of
/// request; never persisted.
#[derive(Clone, Debug)]
pub struct Claims {
    pub sub: String,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub sector: String,
    /// Seconds since epoch, string-encoded as issued.
    pub iat: String,
}

impl Claims {
    /// Converts a verified payload map into typed claims. `sub` and `email`
    /// are required; everything else has a fallback (missing role reads as
    /// requester).
    pub fn from_payload(payload: &HashMap<String, String>) -> Option<Claims> {
        let sub = payload.get("sub")?.clone();
        let email = payload.get("email")?.clone();
        let role = payload
            .get("role")
            .and_then(|r| Role::parse(r))
            .unwrap_or(Role::Usuario);

        Some(Claims {
            sub,
            email,
            name: payload.get("name").cloned().unwrap_or_default(),
            role,
            sector: payload.get("sector").cloned().unwrap_or_default(),
            iat: payload.get("iat").cloned().unwrap_or_default(),
        })
    }
}

impl FromRequest for Claims {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        if let Some(claims) = req.extensions().get::<Claims>() {
            ready(Ok(claims.clone()))
        } else {
            log::error!(
                "Claims missing from request extensions for {}; auth middleware did not run",
                req.path()
            );
            ready(Err(AppError::NotAuthenticated.into()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn payload(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn builds_full_claim_set() {
        let claims = Claims::from_payload(&payload(&[
            ("sub", "u-1"),
            ("email", "a@b.com"),
            ("name", "Ana"),
            ("role", "tecnico"),
            ("sector", "TI"),
            ("iat", "1700000000"),
        ]))
        .unwrap();

        assert_eq!(claims.sub, "u-1");
        assert_eq!(claims.role, Role::Tecnico);
        assert_eq!(claims.sector, "TI");
        assert_eq!(claims.iat, "1700000000");
    }

    #[test]
    fn missing_optional_fields_fall_back() {
        let claims =
            Claims::from_payload(&payload(&[("sub", "u-1"), ("email", "a@b.com")])).unwrap();
        assert_eq!(claims.name, "");
        assert_eq!(claims.role, Role::Usuario);
        assert_eq!(claims.sector, "");
    }

    #[test]
    fn unknown_role_reads_as_requester() {
        let claims = Claims::from_payload(&payload(&[
            ("sub", "u-1"),
            ("email", "a@b.com"),
            ("role", "root"),
        ]))
        .unwrap();
        assert_eq!(claims.role, Role::Usuario);
    }

    #[test]
    fn missing_subject_or_email_is_rejected() {
        assert!(Claims::from_payload(&payload(&[("email", "a@b.com")])).is_none());
        assert!(Claims::from_payload(&payload(&[("sub", "u-1")])).is_none());
    }
}
