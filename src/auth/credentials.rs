//! In-memory credential store.
//!
//! Loaded once from configuration at startup and immutable afterwards.
//! Password comparison is constant-time over the supplied bytes, and an
//! unknown username burns an equal-cost comparison so the two failure
//! modes are indistinguishable to callers and to timing observers.

use std::collections::HashMap;

use super::config::UserEntry;

/// Fixed operand for the comparison burned on unknown usernames.
const DUMMY_PASSWORD: &[u8] = b"invalid-credential-placeholder";

/// One stored credential.
#[derive(Clone)]
pub struct Credential {
    /// Username, the store key.
    pub username: String,
    password: String,
    /// Roles granted to tokens issued for this user.
    pub roles: Vec<String>,
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("roles", &self.roles)
            .finish()
    }
}

/// Credential table keyed by username.
#[derive(Debug, Clone, Default)]
pub struct CredentialStore {
    users: HashMap<String, Credential>,
}

impl CredentialStore {
    /// Build a store from configuration entries. Later entries win on
    /// duplicate usernames; config validation rejects duplicates before
    /// this point in normal operation.
    pub fn from_entries(entries: &[UserEntry]) -> Self {
        let users = entries
            .iter()
            .map(|entry| {
                (
                    entry.username.clone(),
                    Credential {
                        username: entry.username.clone(),
                        password: entry.password.clone(),
                        roles: entry.roles.clone(),
                    },
                )
            })
            .collect();
        Self { users }
    }

    /// Look up a credential by username.
    pub fn lookup(&self, username: &str) -> Option<&Credential> {
        self.users.get(username)
    }

    /// Verify a username/password pair. Returns the credential on
    /// success so the caller can read the granted roles.
    pub fn verify(&self, username: &str, password: &str) -> Option<&Credential> {
        match self.users.get(username) {
            Some(cred) if constant_time_eq(password.as_bytes(), cred.password.as_bytes()) => {
                Some(cred)
            }
            Some(_) => None,
            None => {
                let _ = constant_time_eq(password.as_bytes(), DUMMY_PASSWORD);
                None
            }
        }
    }

    /// Number of stored credentials.
    pub fn len(&self) -> usize {
        self.users.len()
    }

    /// True when the store holds no credentials.
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

/// Compare two byte slices without short-circuiting on the first
/// mismatching byte. Length is not hidden.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut diff = 0u8;
    for (left, right) in a.iter().zip(b.iter()) {
        diff |= left ^ right;
    }
    diff == 0
}
