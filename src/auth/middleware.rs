//! Request-side access control.
//!
//! [`authorize`] is the whole policy as a pure function: header to
//! authenticated context, with the clock passed in. The axum layer
//! [`require_roles`] only feeds it real requests and a real clock, then
//! stashes the resulting [`AuthContext`] in request extensions for
//! handlers to extract.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::{FromRequestParts, State},
    http::{Request, header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};
use chrono::Utc;

use super::claims::AuthContext;
use super::error::AuthError;
use super::token::TokenService;

/// Pull the token out of an `Authorization` header value.
///
/// Accepts exactly `Bearer <token>` with a case-insensitive scheme.
/// Anything else reads as no token at all; callers never learn whether
/// the scheme, the shape or the token itself was the problem.
fn bearer_token(header: &str) -> Result<&str, AuthError> {
    let mut parts = header.split_whitespace();
    let scheme = parts.next().ok_or(AuthError::MissingToken)?;
    let token = parts.next().ok_or(AuthError::MissingToken)?;

    if !scheme.eq_ignore_ascii_case("bearer") || parts.next().is_some() {
        return Err(AuthError::MissingToken);
    }

    Ok(token)
}

/// Roles that satisfy a route, any-of semantics.
#[derive(Debug, Clone)]
pub struct RoleSet(Vec<String>);

impl RoleSet {
    pub fn new<I, S>(roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(roles.into_iter().map(Into::into).collect())
    }

    /// The empty set: any authenticated caller passes.
    pub fn any() -> Self {
        Self(Vec::new())
    }

    pub fn is_satisfied_by(&self, context: &AuthContext) -> bool {
        self.0.is_empty() || self.0.iter().any(|role| context.has_role(role))
    }
}

/// Decide whether a request may proceed.
///
/// Runs the full chain: header present, bearer shape, token valid at
/// `now`, role requirement satisfied. The first failing step decides
/// the error, so an expired token on an admin route reports the token
/// problem, not the role one.
pub fn authorize(
    tokens: &TokenService,
    authorization: Option<&str>,
    required: &RoleSet,
    now: i64,
) -> Result<AuthContext, AuthError> {
    let header = authorization.ok_or(AuthError::MissingToken)?;
    let token = bearer_token(header)?;

    let context = tokens.verify(token, now)?;

    if !required.is_satisfied_by(&context) {
        return Err(AuthError::InsufficientRole);
    }

    Ok(context)
}

/// Token service plus role requirement for one gated router.
#[derive(Clone)]
pub struct RoleGuard {
    tokens: Arc<TokenService>,
    required: RoleSet,
}

impl RoleGuard {
    pub fn new(tokens: Arc<TokenService>, required: RoleSet) -> Self {
        Self { tokens, required }
    }
}

/// Middleware for `axum::middleware::from_fn_with_state`.
///
/// On success the request continues with an [`AuthContext`] inserted
/// into its extensions. On failure the guard's error becomes the
/// response and the inner handler never runs. Token contents are never
/// logged here.
pub async fn require_roles(
    State(guard): State<RoleGuard>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AuthError> {
    let authorization = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    let now = Utc::now().timestamp();
    let context = authorize(&guard.tokens, authorization, &guard.required, now)?;

    request.extensions_mut().insert(context);
    Ok(next.run(request).await)
}

impl<S> FromRequestParts<S> for AuthContext
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthContext>()
            .cloned()
            .ok_or(AuthError::MissingToken)
    }
}
