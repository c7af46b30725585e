//! Token issuance and verification.
//!
//! Tokens are HS256 JWTs and nothing else: issuance pins the algorithm
//! and verification rejects any token whose header names a different
//! one, including forged `none` headers. The verifier's clock is always
//! passed in as a parameter, so expiry behavior is deterministic under
//! test and wall-clock reads stay at the request boundary.

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use thiserror::Error;

use super::claims::{AuthContext, Claims};
use super::config::AuthConfig;
use super::error::AuthError;

/// The only accepted signing algorithm.
const SIGNING_ALGORITHM: Algorithm = Algorithm::HS256;

/// Why a token failed verification.
///
/// Variants are ordered the way the checks run: signature and shape
/// first, then issuer, audience, expiry, and issued-at. Display strings
/// go on the wire with 401 responses and stay generic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum VerifyError {
    /// Not three base64url segments with a decodable header and claims.
    #[error("malformed token")]
    Malformed,

    /// Signature does not match the configured secret.
    #[error("signature verification failed")]
    BadSignature,

    /// Header names an algorithm other than HS256.
    #[error("unexpected signing algorithm")]
    WrongAlgorithm,

    /// `iss` claim differs from the configured issuer.
    #[error("issuer mismatch")]
    IssuerMismatch,

    /// `aud` claim differs from the configured audience.
    #[error("audience mismatch")]
    AudienceMismatch,

    /// `exp` has passed. The bound is exclusive: a token is already
    /// expired at the instant `now == exp`.
    #[error("token expired")]
    Expired,

    /// `iat` lies in the future beyond the skew tolerance.
    #[error("token not yet valid")]
    NotYetValid,
}

/// Issues and verifies bearer tokens for one issuer/audience pair.
pub struct TokenService {
    issuer: String,
    audience: String,
    ttl_seconds: i64,
    clock_skew_seconds: i64,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl TokenService {
    /// Build a service from validated configuration. The secret must
    /// already be resolved; no `env:` expansion happens here.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            issuer: config.jwt_issuer.clone(),
            audience: config.jwt_audience.clone(),
            ttl_seconds: config.jwt_exp_seconds,
            clock_skew_seconds: config.clock_skew_seconds,
            encoding_key: EncodingKey::from_secret(config.secret_key.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret_key.as_bytes()),
        }
    }

    /// Issue a signed token for `subject` carrying `roles`, valid from
    /// `now` for the configured lifetime.
    pub fn issue(&self, subject: &str, roles: &[String], now: i64) -> Result<String, AuthError> {
        let claims = Claims {
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            iat: now,
            exp: now + self.ttl_seconds,
            sub: subject.to_string(),
            roles: roles.to_vec(),
        };

        encode(&Header::new(SIGNING_ALGORITHM), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Internal(e.to_string()))
    }

    /// Verify a token against the configured secret, issuer and
    /// audience at time `now`.
    ///
    /// Checks run in a fixed order and the first failure wins:
    /// signature (with the algorithm pinned to HS256), issuer equality,
    /// audience equality, `now < exp`, `now >= iat`. The configured
    /// clock-skew tolerance widens the two time bounds symmetrically.
    pub fn verify(&self, token: &str, now: i64) -> Result<AuthContext, VerifyError> {
        // The library only checks shape, algorithm and signature here;
        // every claim check below has to see the injected clock, so the
        // built-in ones are disabled.
        let mut validation = Validation::new(SIGNING_ALGORITHM);
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.validate_nbf = false;
        validation.required_spec_claims.clear();

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(classify_decode_error)?;
        let claims = token_data.claims;

        if claims.iss != self.issuer {
            return Err(VerifyError::IssuerMismatch);
        }

        if claims.aud != self.audience {
            return Err(VerifyError::AudienceMismatch);
        }

        if now >= claims.exp + self.clock_skew_seconds {
            return Err(VerifyError::Expired);
        }

        if now + self.clock_skew_seconds < claims.iat {
            return Err(VerifyError::NotYetValid);
        }

        Ok(claims.into())
    }
}

fn classify_decode_error(err: jsonwebtoken::errors::Error) -> VerifyError {
    use jsonwebtoken::errors::ErrorKind;

    match err.kind() {
        ErrorKind::InvalidSignature => VerifyError::BadSignature,
        ErrorKind::InvalidAlgorithm | ErrorKind::InvalidAlgorithmName => {
            VerifyError::WrongAlgorithm
        }
        _ => VerifyError::Malformed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const T0: i64 = 1_700_000_000;

    fn test_config() -> AuthConfig {
        AuthConfig {
            secret_key: "test-secret-key".to_string(),
            jwt_issuer: "ops-portal-test".to_string(),
            jwt_audience: "ops-test".to_string(),
            jwt_exp_seconds: 3600,
            clock_skew_seconds: 0,
            ..AuthConfig::default()
        }
    }

    fn service() -> TokenService {
        TokenService::new(&test_config())
    }

    fn ops_roles() -> Vec<String> {
        vec!["ops".to_string()]
    }

    /// Flip the first character of the signature segment. The first
    /// character encodes the top bits of the first signature byte, so
    /// the change always survives base64 decoding.
    fn tamper_signature(token: &str) -> String {
        let dot = token.rfind('.').unwrap();
        let (head, sig) = token.split_at(dot + 1);
        let mut sig_chars: Vec<char> = sig.chars().collect();
        sig_chars[0] = if sig_chars[0] == 'A' { 'B' } else { 'A' };
        let sig: String = sig_chars.into_iter().collect();
        format!("{head}{sig}")
    }

    /// Assemble a token from a raw header JSON and claims, with an
    /// arbitrary signature segment.
    fn forge_token(header_json: &str, claims: &Claims, signature: &str) -> String {
        use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};

        let header = URL_SAFE_NO_PAD.encode(header_json);
        let payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(claims).unwrap());
        format!("{header}.{payload}.{signature}")
    }

    fn fixed_claims() -> Claims {
        Claims {
            iss: "ops-portal-test".to_string(),
            aud: "ops-test".to_string(),
            iat: T0,
            exp: T0 + 3600,
            sub: "alice".to_string(),
            roles: ops_roles(),
        }
    }

    #[test]
    fn test_round_trip() {
        let svc = service();
        let token = svc.issue("alice", &ops_roles(), T0).unwrap();

        let ctx = svc.verify(&token, T0 + 10).unwrap();
        assert_eq!(ctx.subject, "alice");
        assert_eq!(ctx.roles, vec!["ops"]);
    }

    #[test]
    fn test_wire_claims() {
        use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};

        let svc = service();
        let token = svc
            .issue("admin", &["admin".to_string(), "ops".to_string()], T0)
            .unwrap();

        let payload = token.split('.').nth(1).unwrap();
        let decoded = URL_SAFE_NO_PAD.decode(payload).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&decoded).unwrap();

        assert_eq!(value["iss"], "ops-portal-test");
        assert_eq!(value["aud"], "ops-test");
        assert_eq!(value["iat"], T0);
        assert_eq!(value["exp"], T0 + 3600);
        assert_eq!(value["sub"], "admin");
        assert_eq!(value["roles"], serde_json::json!(["admin", "ops"]));
    }

    #[test]
    fn test_signed_token_without_roles_claim() {
        // Signed with the right secret but no roles claim at all: the
        // token still verifies and the context carries no roles, so
        // any role-gated route answers forbidden rather than 401.
        let svc = service();
        let payload = serde_json::json!({
            "iss": "ops-portal-test",
            "aud": "ops-test",
            "iat": T0,
            "exp": T0 + 3600,
            "sub": "alice",
        });
        let key = EncodingKey::from_secret("test-secret-key".as_bytes());
        let token = encode(&Header::new(SIGNING_ALGORITHM), &payload, &key).unwrap();

        let ctx = svc.verify(&token, T0 + 10).unwrap();
        assert_eq!(ctx.subject, "alice");
        assert!(ctx.roles.is_empty());
    }

    #[test]
    fn test_valid_over_whole_lifetime() {
        let svc = service();
        let token = svc.issue("alice", &ops_roles(), T0).unwrap();

        // Inclusive at issuance, exclusive at expiry.
        assert!(svc.verify(&token, T0).is_ok());
        assert!(svc.verify(&token, T0 + 1800).is_ok());
        assert!(svc.verify(&token, T0 + 3599).is_ok());
    }

    #[test]
    fn test_expiry_bound_is_exclusive() {
        let svc = service();
        let token = svc.issue("alice", &ops_roles(), T0).unwrap();

        assert_eq!(svc.verify(&token, T0 + 3600), Err(VerifyError::Expired));
        assert_eq!(svc.verify(&token, T0 + 7200), Err(VerifyError::Expired));
    }

    #[test]
    fn test_token_from_the_future_rejected() {
        let svc = service();
        let token = svc.issue("alice", &ops_roles(), T0 + 100).unwrap();

        assert_eq!(svc.verify(&token, T0), Err(VerifyError::NotYetValid));
        assert!(svc.verify(&token, T0 + 100).is_ok());
    }

    #[test]
    fn test_clock_skew_widens_both_bounds() {
        let mut config = test_config();
        config.clock_skew_seconds = 30;
        let svc = TokenService::new(&config);

        let token = svc.issue("alice", &ops_roles(), T0).unwrap();
        assert!(svc.verify(&token, T0 + 3600 + 29).is_ok());
        assert_eq!(
            svc.verify(&token, T0 + 3600 + 30),
            Err(VerifyError::Expired)
        );

        let future = svc.issue("alice", &ops_roles(), T0 + 30).unwrap();
        assert!(svc.verify(&future, T0).is_ok());

        let too_far = svc.issue("alice", &ops_roles(), T0 + 31).unwrap();
        assert_eq!(svc.verify(&too_far, T0), Err(VerifyError::NotYetValid));
    }

    #[test]
    fn test_tampered_signature_rejected() {
        let svc = service();
        let token = svc.issue("alice", &ops_roles(), T0).unwrap();

        let tampered = tamper_signature(&token);
        assert_eq!(
            svc.verify(&tampered, T0 + 10),
            Err(VerifyError::BadSignature)
        );
    }

    #[test]
    fn test_other_secret_rejected() {
        let svc = service();

        let mut other_config = test_config();
        other_config.secret_key = "a-completely-different-secret".to_string();
        let other = TokenService::new(&other_config);

        let token = other.issue("alice", &ops_roles(), T0).unwrap();
        assert_eq!(svc.verify(&token, T0 + 10), Err(VerifyError::BadSignature));
    }

    #[test]
    fn test_issuer_mismatch() {
        let svc = service();

        let mut other_config = test_config();
        other_config.jwt_issuer = "somebody-else".to_string();
        let other = TokenService::new(&other_config);

        let token = other.issue("alice", &ops_roles(), T0).unwrap();
        assert_eq!(
            svc.verify(&token, T0 + 10),
            Err(VerifyError::IssuerMismatch)
        );
    }

    #[test]
    fn test_audience_mismatch() {
        let svc = service();

        let mut other_config = test_config();
        other_config.jwt_audience = "somebody-else".to_string();
        let other = TokenService::new(&other_config);

        let token = other.issue("alice", &ops_roles(), T0).unwrap();
        assert_eq!(
            svc.verify(&token, T0 + 10),
            Err(VerifyError::AudienceMismatch)
        );
    }

    #[test]
    fn test_issuer_checked_before_expiry() {
        let svc = service();

        let mut other_config = test_config();
        other_config.jwt_issuer = "somebody-else".to_string();
        let other = TokenService::new(&other_config);

        // Expired AND wrong issuer: issuer is reported first.
        let token = other.issue("alice", &ops_roles(), T0).unwrap();
        assert_eq!(
            svc.verify(&token, T0 + 7200),
            Err(VerifyError::IssuerMismatch)
        );
    }

    #[test]
    fn test_garbage_rejected() {
        let svc = service();
        for garbage in ["", "x", "a.b", "a.b.c", "....."] {
            assert_eq!(
                svc.verify(garbage, T0),
                Err(VerifyError::Malformed),
                "{garbage:?} should be malformed"
            );
        }
    }

    #[test]
    fn test_none_algorithm_rejected() {
        let svc = service();
        let token = forge_token(r#"{"alg":"none","typ":"JWT"}"#, &fixed_claims(), "");

        assert_eq!(svc.verify(&token, T0 + 10), Err(VerifyError::Malformed));
    }

    #[test]
    fn test_foreign_algorithm_rejected() {
        let svc = service();
        let token = forge_token(r#"{"alg":"HS384","typ":"JWT"}"#, &fixed_claims(), "AAAA");

        assert_eq!(
            svc.verify(&token, T0 + 10),
            Err(VerifyError::WrongAlgorithm)
        );
    }
}
