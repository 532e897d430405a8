use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::Utc;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::collections::HashMap;
use std::fmt;

use crate::auth::json::{self, JsonValue};
use crate::models::Role;

type HmacSha256 = Hmac<Sha256>;

/// Token-level failure. The authentication gate collapses both kinds into a
/// single 401 outcome; the distinction exists for logging and tests.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenError {
    /// Not three dot-joined segments, or the payload does not decode.
    Malformed,
    /// Well-formed, but the recomputed signature does not match.
    SignatureMismatch,
}

impl fmt::Display for TokenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenError::Malformed => write!(f, "token is structurally invalid"),
            TokenError::SignatureMismatch => write!(f, "token signature does not verify"),
        }
    }
}

impl std::error::Error for TokenError {}

/// Issues and verifies the bearer tokens this backend exchanges with its
/// clients: `base64url(header).base64url(payload).base64url(hmac)`, no
/// padding on any segment, signed with HMAC-SHA256 over the dot-joined
/// encoded header and payload.
///
/// The scheme is intentionally single-secret and single-algorithm: the
/// `alg` header field is not inspected on verify and tokens carry no
/// expiry, so a token stays valid for as long as the process secret does.
#[derive(Clone)]
pub struct TokenCodec {
    secret: String,
}

impl TokenCodec {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Issues a token for the given identity, stamping `iat` with the
    /// current whole-second UTC timestamp.
    pub fn issue(&self, sub: &str, email: &str, name: &str, role: Role, sector: &str) -> String {
        self.issue_at(sub, email, name, role, sector, Utc::now().timestamp())
    }

    /// Deterministic issuance for a fixed timestamp. All claim values,
    /// including `iat`, are carried as JSON strings.
    pub fn issue_at(
        &self,
        sub: &str,
        email: &str,
        name: &str,
        role: Role,
        sector: &str,
        iat: i64,
    ) -> String {
        let header = JsonValue::Object(vec![
            ("alg".to_string(), "HS256".into()),
            ("typ".to_string(), "JWT".into()),
        ]);
        let payload = JsonValue::Object(vec![
            ("sub".to_string(), sub.into()),
            ("email".to_string(), email.into()),
            ("name".to_string(), name.into()),
            ("role".to_string(), role.as_str().into()),
            ("sector".to_string(), sector.into()),
            ("iat".to_string(), iat.to_string().into()),
        ]);

        let header_b64 = URL_SAFE_NO_PAD.encode(json::encode(&header));
        let payload_b64 = URL_SAFE_NO_PAD.encode(json::encode(&payload));
        let signature = self.sign(&format!("{}.{}", header_b64, payload_b64));
        format!("{}.{}.{}", header_b64, payload_b64, signature)
    }

    /// Verifies a token against the current secret and returns its payload
    /// as a flat claim map.
    ///
    /// The signature is recomputed over the first two still-encoded
    /// segments and compared by exact string equality before anything is
    /// decoded, so a token issued under a different secret — or with any
    /// altered segment — is rejected without its payload being looked at.
    pub fn verify(&self, token: &str) -> Result<HashMap<String, String>, TokenError> {
        let segments: Vec<&str> = token.split('.').collect();
        if segments.len() != 3 {
            return Err(TokenError::Malformed);
        }

        let expected = self.sign(&format!("{}.{}", segments[0], segments[1]));
        if expected != segments[2] {
            return Err(TokenError::SignatureMismatch);
        }

        let payload_bytes = URL_SAFE_NO_PAD
            .decode(segments[1])
            .map_err(|_| TokenError::Malformed)?;
        let payload_text = String::from_utf8(payload_bytes).map_err(|_| TokenError::Malformed)?;
        Ok(json::decode_flat_object(&payload_text))
    }

    fn sign(&self, signing_input: &str) -> String {
        let mut mac = HmacSha256::new_from_slice(self.secret.as_bytes())
            .expect("HMAC accepts keys of any length");
        mac.update(signing_input.as_bytes());
        URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn codec() -> TokenCodec {
        TokenCodec::new("segredo-de-teste")
    }

    #[test]
    fn issue_then_verify_round_trips_claims() {
        let token = codec().issue("u-1", "ana@hospital.br", "Ana", Role::Usuario, "UTI");
        let claims = codec().verify(&token).unwrap();

        assert_eq!(claims.get("sub").map(String::as_str), Some("u-1"));
        assert_eq!(
            claims.get("email").map(String::as_str),
            Some("ana@hospital.br")
        );
        assert_eq!(claims.get("name").map(String::as_str), Some("Ana"));
        assert_eq!(claims.get("role").map(String::as_str), Some("usuario"));
        assert_eq!(claims.get("sector").map(String::as_str), Some("UTI"));
        assert!(claims.contains_key("iat"));
    }

    #[test]
    fn issuance_is_deterministic_for_a_fixed_timestamp() {
        let a = codec().issue_at("u-1", "a@b.com", "Ana", Role::Tecnico, "TI", 1_700_000_000);
        let b = codec().issue_at("u-1", "a@b.com", "Ana", Role::Tecnico, "TI", 1_700_000_000);
        assert_eq!(a, b);
    }

    #[test]
    fn token_has_three_unpadded_segments() {
        let token = codec().issue("u-1", "a@b.com", "Ana", Role::Usuario, "");
        let segments: Vec<&str> = token.split('.').collect();
        assert_eq!(segments.len(), 3);
        assert!(!token.contains('='));
    }

    #[test]
    fn tampering_with_the_payload_breaks_the_signature() {
        let token = codec().issue("u-1", "a@b.com", "Ana", Role::Usuario, "ER");
        let segments: Vec<&str> = token.split('.').collect();

        // Flip one character of the payload segment.
        let mut payload: Vec<char> = segments[1].chars().collect();
        payload[0] = if payload[0] == 'A' { 'B' } else { 'A' };
        let tampered: String = payload.into_iter().collect();

        let forged = format!("{}.{}.{}", segments[0], tampered, segments[2]);
        assert_eq!(codec().verify(&forged), Err(TokenError::SignatureMismatch));
    }

    #[test]
    fn token_issued_under_another_secret_is_rejected() {
        let token =
            TokenCodec::new("secret-one").issue("u-1", "a@b.com", "Ana", Role::Usuario, "");
        let result = TokenCodec::new("secret-two").verify(&token);
        assert_eq!(result, Err(TokenError::SignatureMismatch));
    }

    #[test]
    fn wrong_segment_count_is_malformed() {
        assert_eq!(codec().verify("abc.def"), Err(TokenError::Malformed));
        assert_eq!(codec().verify(""), Err(TokenError::Malformed));
        assert_eq!(codec().verify("a.b.c.d"), Err(TokenError::Malformed));
    }

    #[test]
    fn garbage_segments_fail_on_signature_not_on_decoding() {
        // Structurally three segments, so verification reaches the
        // signature comparison and stops there.
        assert_eq!(
            codec().verify("!!!.???.***"),
            Err(TokenError::SignatureMismatch)
        );
    }

    #[test]
    fn payload_segment_decodes_independently_via_the_json_codec() {
        let token = codec().issue("abc", "a@b.com", "Ana", Role::Usuario, "ER");
        let payload_segment = token.split('.').nth(1).unwrap();

        let bytes = URL_SAFE_NO_PAD.decode(payload_segment).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let map = json::decode_flat_object(&text);

        assert_eq!(map.get("role").map(String::as_str), Some("usuario"));
        assert_eq!(map.get("sub").map(String::as_str), Some("abc"));
    }
}
