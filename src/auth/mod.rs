//! Authentication and authorization.
//!
//! The pieces compose in request order: [`CredentialStore`] checks
//! username/password pairs at login, [`TokenService`] turns a verified
//! login into a signed bearer token and later verifies it back into an
//! [`AuthContext`], and [`require_roles`] gates protected routers on
//! the roles that context carries. All failures surface as
//! [`AuthError`] with fixed wire bodies.

pub mod claims;
pub mod config;
pub mod credentials;
pub mod error;
pub mod middleware;
pub mod token;

pub use claims::{AuthContext, Claims};
pub use config::{AuthConfig, ConfigValidationError, DEFAULT_SECRET_KEY, UserEntry};
pub use credentials::{Credential, CredentialStore};
pub use error::{AuthError, ErrorBody};
pub use middleware::{RoleGuard, RoleSet, authorize, require_roles};
pub use token::{TokenService, VerifyError};
