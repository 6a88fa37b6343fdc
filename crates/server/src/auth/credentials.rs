//! Static credential store.
//!
//! Built once from [`PortalConfig`] at startup and never mutated. This is
//! the single source of principals: both login and token issuance resolve
//! against it, so there is no second user table to drift out of sync.

use std::collections::HashMap;

use secrecy::{ExposeSecret, SecretString};

use branchboard_core::{Email, Role};

use crate::config::PortalConfig;

/// An identity the portal will authenticate.
#[derive(Debug, Clone)]
pub struct Principal {
    /// Login identifier (`admin@<domain>` or `<branch>@<domain>`).
    pub email: Email,
    /// Login password.
    pub password: SecretString,
    /// Role granted on login.
    pub role: Role,
    /// The single branch a `Branch` principal is scoped to; `None` for the
    /// admin.
    pub branch: Option<String>,
}

/// Immutable identifier-to-principal lookup.
pub struct CredentialStore {
    principals: HashMap<String, Principal>,
}

impl CredentialStore {
    /// Build the store from configuration.
    ///
    /// Derives one admin principal plus one principal per configured
    /// branch. Branch identifiers lower-case the branch name, so
    /// `Kolathur` logs in as `kolathur@<domain>`.
    ///
    /// # Panics
    ///
    /// Panics if a derived identifier is not a valid email, which only
    /// happens when `account_domain` or a branch name is empty - both are
    /// rejected by config loading before this runs.
    #[must_use]
    pub fn from_config(config: &PortalConfig) -> Self {
        let parse = |local: &str| {
            Email::parse(&format!("{local}@{}", config.account_domain))
                .expect("config validation guarantees a well-formed identifier")
        };

        let mut principals = HashMap::new();

        let admin = Principal {
            email: parse("admin"),
            password: config.admin_password.clone(),
            role: Role::Admin,
            branch: None,
        };
        principals.insert(admin.email.as_str().to_owned(), admin);

        for branch in &config.branches {
            let principal = Principal {
                email: parse(&branch.name.to_lowercase()),
                password: branch.password.clone(),
                role: Role::Branch,
                branch: Some(branch.name.clone()),
            };
            principals.insert(principal.email.as_str().to_owned(), principal);
        }

        Self { principals }
    }

    /// Look up a principal by identifier. Unknown identifiers yield `None`,
    /// never an error.
    #[must_use]
    pub fn resolve(&self, identifier: &str) -> Option<&Principal> {
        let email = Email::parse(identifier).ok()?;
        self.principals.get(email.as_str())
    }

    /// Check a login attempt.
    ///
    /// Returns the principal on an exact identifier + password match. The
    /// unknown-identifier and wrong-password cases are indistinguishable to
    /// the caller.
    #[must_use]
    pub fn authenticate(&self, identifier: &str, password: &str) -> Option<&Principal> {
        let principal = self.resolve(identifier)?;
        if principal.password.expose_secret() == password {
            Some(principal)
        } else {
            None
        }
    }

    /// Number of configured principals (admin included).
    #[must_use]
    pub fn len(&self) -> usize {
        self.principals.len()
    }

    /// Whether the store is empty. Never true for a store built via
    /// [`CredentialStore::from_config`].
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.principals.is_empty()
    }
}
