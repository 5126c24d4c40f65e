//! Identity and roles.
//!
//! Credential checks happen upstream: an identity proxy authenticates the
//! visitor and forwards the verified email in `x-auth-email`. This module
//! only decides what that email may do.

use std::collections::HashSet;

/// Header carrying the authenticated email from the identity proxy.
pub const AUTH_EMAIL_HEADER: &str = "x-auth-email";

/// Cookie recording that the visitor passed the age gate.
pub const AGE_VERIFIED_COOKIE: &str = "age_verified";

/// Lifetime of the age-verification cookie, in days.
pub const AGE_VERIFIED_DAYS: i64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Admin,
    Customer,
}

/// Case-insensitive admin allow-list.
#[derive(Debug, Clone, Default)]
pub struct AdminPolicy {
    emails: HashSet<String>,
}

impl AdminPolicy {
    pub fn new<I, S>(emails: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self { emails: emails.into_iter().map(|e| normalize(e.as_ref())).filter(|e| !e.is_empty()).collect() }
    }

    #[must_use]
    pub fn role_of(&self, email: &str) -> Role {
        if self.emails.contains(&normalize(email)) { Role::Admin } else { Role::Customer }
    }

    #[must_use]
    pub fn is_admin(&self, email: &str) -> bool {
        self.role_of(email) == Role::Admin
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.emails.is_empty()
    }
}

fn normalize(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
