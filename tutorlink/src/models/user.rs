//! User model and role capabilities

use super::subject::SubjectId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::num::NonZeroU32;

/// Opaque unique identifier of a user account
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the id is empty or whitespace only
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for UserId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Provider-only data: what a provider teaches and how many accepted
/// relationships it can hold at once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderProfile {
    pub offered_subjects: BTreeSet<SubjectId>,
    pub capacity_limit: NonZeroU32,
}

impl ProviderProfile {
    pub fn new(
        offered_subjects: impl IntoIterator<Item = SubjectId>,
        capacity_limit: NonZeroU32,
    ) -> Self {
        Self {
            offered_subjects: offered_subjects.into_iter().collect(),
            capacity_limit,
        }
    }

    /// Whether every subject in `subjects` is offered by this provider.
    /// Returns the first subject that is not offered.
    pub fn first_unoffered<'a>(
        &self,
        subjects: impl IntoIterator<Item = &'a SubjectId>,
    ) -> Option<&'a SubjectId> {
        subjects
            .into_iter()
            .find(|subject| !self.offered_subjects.contains(*subject))
    }
}

/// Role capabilities of an account.
///
/// Provider-only fields exist only on the variants that include the provider
/// capability, so a requester-only account can never carry a capacity limit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Role {
    /// Can only request relationships
    RequesterOnly,

    /// Can only receive relationship requests
    ProviderOnly { profile: ProviderProfile },

    /// Can do both
    Both { profile: ProviderProfile },
}

impl Role {
    pub fn can_request(&self) -> bool {
        matches!(self, Role::RequesterOnly | Role::Both { .. })
    }

    pub fn provider_profile(&self) -> Option<&ProviderProfile> {
        match self {
            Role::RequesterOnly => None,
            Role::ProviderOnly { profile } | Role::Both { profile } => Some(profile),
        }
    }

    pub fn is_provider(&self) -> bool {
        self.provider_profile().is_some()
    }

    /// Short label used in logs and CLI output
    pub fn label(&self) -> &'static str {
        match self {
            Role::RequesterOnly => "requester",
            Role::ProviderOnly { .. } => "provider",
            Role::Both { .. } => "requester+provider",
        }
    }
}

/// A user account as resolved by the identity lookup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,

    /// Display name used in notifications
    pub name: String,

    /// Contact address for notifications, if known
    pub email: Option<String>,

    pub role: Role,
}

impl User {
    pub fn requester(id: impl Into<UserId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: None,
            role: Role::RequesterOnly,
        }
    }

    pub fn provider(id: impl Into<UserId>, name: impl Into<String>, profile: ProviderProfile) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: None,
            role: Role::ProviderOnly { profile },
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn provider_profile(&self) -> Option<&ProviderProfile> {
        self.role.provider_profile()
    }
}
