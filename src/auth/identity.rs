// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Identity verification performed before a token is signed.

use std::collections::HashMap;
use std::fmt;

use super::{AuthError, Credential};

/// Decides whether a credential proves an identity, returning the subject.
pub trait IdentityVerifier: Send + Sync {
    fn authenticate(&self, credential: &Credential) -> Result<String, AuthError>;
}

/// Accepts any credential with a non-empty username; the password is ignored.
///
/// This is the open-issuance mode used when no user table is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct AcceptAnyIdentity;

impl IdentityVerifier for AcceptAnyIdentity {
    fn authenticate(&self, credential: &Credential) -> Result<String, AuthError> {
        if credential.username.is_empty() {
            return Err(AuthError::EmptyUsername);
        }
        Ok(credential.username.clone())
    }
}

/// Fixed username/password table.
#[derive(Clone, Default)]
pub struct StaticIdentities {
    users: HashMap<String, String>,
}

impl StaticIdentities {
    pub fn new(users: HashMap<String, String>) -> Self {
        Self { users }
    }

    pub fn with_user(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.users.insert(username.into(), password.into());
        self
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

impl fmt::Debug for StaticIdentities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&String> = self.users.keys().collect();
        names.sort();
        f.debug_struct("StaticIdentities")
            .field("users", &names)
            .finish()
    }
}

impl IdentityVerifier for StaticIdentities {
    fn authenticate(&self, credential: &Credential) -> Result<String, AuthError> {
        match self.users.get(&credential.username) {
            Some(expected) if *expected == credential.password => Ok(credential.username.clone()),
            _ => Err(AuthError::InvalidCredentials),
        }
    }
}
