//! User domain model.
//!
//! Authentication happens elsewhere; this model carries the flags and group
//! set that role derivation needs, plus order ownership.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use longbox_core::{Role, UserId};

/// A user account.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Email address (unique; doubles as the login name).
    pub email: String,
    /// Display name.
    pub display_name: String,
    /// Superuser flag.
    pub is_superuser: bool,
    /// Staff flag.
    pub is_staff: bool,
    /// Group memberships.
    pub groups: Vec<String>,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
}

impl User {
    /// The derived access role. Never stored; recomputed per request.
    #[must_use]
    pub fn role(&self) -> Role {
        Role::derive(self.is_superuser, self.is_staff, &self.groups)
    }
}

/// Input for creating a user (CLI / seeding only).
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUserInput {
    /// Email address.
    pub email: String,
    /// Display name.
    pub display_name: String,
    /// Superuser flag.
    #[serde(default)]
    pub is_superuser: bool,
    /// Staff flag.
    #[serde(default)]
    pub is_staff: bool,
    /// Group memberships.
    #[serde(default)]
    pub groups: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(is_superuser: bool, is_staff: bool, groups: &[&str]) -> User {
        User {
            id: UserId::new(1),
            email: "reader@example.com".to_string(),
            display_name: "Reader".to_string(),
            is_superuser,
            is_staff,
            groups: groups.iter().map(ToString::to_string).collect(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_role_is_derived_from_flags() {
        assert_eq!(user(true, false, &[]).role(), Role::Superadmin);
        assert_eq!(user(false, false, &["Owner"]).role(), Role::Owner);
        assert_eq!(user(false, true, &[]).role(), Role::Staff);
        assert_eq!(user(false, false, &[]).role(), Role::Customer);
    }
}
