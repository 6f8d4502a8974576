pub mod rules;

use std::collections::HashMap;
use std::fmt;

use base64::{engine::general_purpose, Engine as _};

pub use rules::{required_access, Access};

/// Named permission groupings gating the person operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    ReadOnly,
    ReadWrite,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::ReadOnly => "READ_ONLY",
            Role::ReadWrite => "READ_WRITE",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("{0}")]
    MalformedHeader(String),
    #[error("password hashing error: {0}")]
    Hash(#[from] bcrypt::BcryptError),
    #[error("password verification task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Username and password decoded from an `Authorization: Basic` header
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"****")
            .finish()
    }
}

impl Credentials {
    /// Parse an `Authorization` header value. The scheme is matched
    /// case-insensitively; the password may itself contain `:`.
    pub fn from_basic_header(value: &str) -> Result<Self, AuthError> {
        let (scheme, encoded) = value
            .trim()
            .split_once(' ')
            .ok_or_else(|| AuthError::MalformedHeader("Authorization header must use Basic scheme".to_string()))?;

        if !scheme.eq_ignore_ascii_case("basic") {
            return Err(AuthError::MalformedHeader(
                "Authorization header must use Basic scheme".to_string(),
            ));
        }

        let decoded = general_purpose::STANDARD
            .decode(encoded.trim())
            .map_err(|_| AuthError::MalformedHeader("Failed to decode basic authentication token".to_string()))?;
        let decoded = String::from_utf8(decoded)
            .map_err(|_| AuthError::MalformedHeader("Failed to decode basic authentication token".to_string()))?;

        let (username, password) = decoded
            .split_once(':')
            .ok_or_else(|| AuthError::MalformedHeader("Invalid basic authentication token".to_string()))?;

        Ok(Self {
            username: username.to_string(),
            password: password.to_string(),
        })
    }
}

/// Authenticated caller, injected into request extensions by the access-control middleware
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub username: String,
    pub roles: Vec<Role>,
}

impl AuthUser {
    pub fn has_any_role(&self, roles: &[Role]) -> bool {
        self.roles.iter().any(|r| roles.contains(r))
    }
}

struct Identity {
    password_hash: String,
    roles: Vec<Role>,
}

/// Static in-memory identity table. Passwords are held only as bcrypt hashes.
pub struct IdentityStore {
    identities: HashMap<String, Identity>,
}

/// Built-in accounts: (username, password, roles)
const DEFAULT_IDENTITIES: &[(&str, &str, &[Role])] = &[
    ("testUsername", "testPassword", &[Role::ReadOnly]),
    ("admin", "testPassword", &[Role::ReadWrite]),
];

impl IdentityStore {
    /// Hash the built-in accounts with the given bcrypt cost
    pub fn with_default_identities(cost: u32) -> Result<Self, AuthError> {
        let mut identities = HashMap::new();
        for (username, password, roles) in DEFAULT_IDENTITIES {
            identities.insert(
                username.to_string(),
                Identity {
                    password_hash: bcrypt::hash(password, cost)?,
                    roles: roles.to_vec(),
                },
            );
        }

        tracing::info!("Loaded {} identities", identities.len());
        Ok(Self { identities })
    }

    /// Check credentials. `Ok(None)` means unknown user or wrong password.
    ///
    /// bcrypt is deliberately slow; call this off the async executor.
    pub fn authenticate(&self, credentials: &Credentials) -> Result<Option<AuthUser>, AuthError> {
        let Some(identity) = self.identities.get(&credentials.username) else {
            return Ok(None);
        };

        if !bcrypt::verify(&credentials.password, &identity.password_hash)? {
            return Ok(None);
        }

        Ok(Some(AuthUser {
            username: credentials.username.clone(),
            roles: identity.roles.clone(),
        }))
    }
}
