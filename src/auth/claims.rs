//! JWT claims and the per-request authentication context.

use serde::{Deserialize, Serialize};

/// JWT claims structure.
///
/// Field names are the wire names. Every claim except `roles` is
/// required; a missing claim fails deserialization during
/// verification, while a token without `roles` reads as carrying none.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Issuer.
    pub iss: String,

    /// Audience.
    pub aud: String,

    /// Issued at (Unix timestamp, seconds).
    pub iat: i64,

    /// Expiration time (Unix timestamp, seconds). Exclusive upper bound.
    pub exp: i64,

    /// Subject (username).
    pub sub: String,

    /// Roles granted to the subject. Absent reads as empty.
    #[serde(default)]
    pub roles: Vec<String>,
}

/// Identity extracted from a verified token, carried in request
/// extensions for the lifetime of one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    /// Username the token was issued to.
    pub subject: String,
    /// Roles carried by the token.
    pub roles: Vec<String>,
}

impl AuthContext {
    /// Check whether the context carries the given role.
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }
}

impl From<Claims> for AuthContext {
    fn from(claims: Claims) -> Self {
        Self {
            subject: claims.sub,
            roles: claims.roles,
        }
    }
}
