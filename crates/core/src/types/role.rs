//! User roles derived from account flags and group membership.
//!
//! Roles are never stored. They are recomputed from the user's flags and
//! group set on every request, so revoking a group or the staff bit takes
//! effect immediately.

use serde::{Deserialize, Serialize};

/// Group name that grants the [`Role::Owner`] role.
pub const OWNER_GROUP: &str = "Owner";

/// Access role, highest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Regular shopper. Default for everyone.
    Customer,
    /// Store staff: can manage the catalog.
    Staff,
    /// Store owner: staff plus settings and user management.
    Owner,
    /// Full access, including destructive operations.
    Superadmin,
}

impl Role {
    /// Derive the role hierarchy: Superadmin > Owner > Staff > Customer.
    ///
    /// `groups` is the user's group-name set; only membership in
    /// [`OWNER_GROUP`] is significant here.
    #[must_use]
    pub fn derive(is_superuser: bool, is_staff: bool, groups: &[String]) -> Self {
        if is_superuser {
            Self::Superadmin
        } else if groups.iter().any(|g| g == OWNER_GROUP) {
            Self::Owner
        } else if is_staff {
            Self::Staff
        } else {
            Self::Customer
        }
    }

    /// Whether this role may manage the catalog.
    #[must_use]
    pub fn is_staff(self) -> bool {
        self >= Self::Staff
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Customer => "Customer",
            Self::Staff => "Staff",
            Self::Owner => "Owner",
            Self::Superadmin => "Superadmin",
        };
        write!(f, "{s}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn groups(names: &[&str]) -> Vec<String> {
        names.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_superuser_wins() {
        // Superuser outranks everything, even Owner group membership
        let role = Role::derive(true, true, &groups(&["Owner"]));
        assert_eq!(role, Role::Superadmin);
    }

    #[test]
    fn test_owner_group_outranks_staff() {
        let role = Role::derive(false, true, &groups(&["Owner", "Warehouse"]));
        assert_eq!(role, Role::Owner);
    }

    #[test]
    fn test_staff_flag() {
        assert_eq!(Role::derive(false, true, &[]), Role::Staff);
    }

    #[test]
    fn test_customer_default() {
        assert_eq!(Role::derive(false, false, &[]), Role::Customer);
        // Unrelated groups grant nothing
        assert_eq!(
            Role::derive(false, false, &groups(&["Newsletter"])),
            Role::Customer
        );
    }

    #[test]
    fn test_staff_check_respects_hierarchy() {
        assert!(Role::Superadmin.is_staff());
        assert!(Role::Owner.is_staff());
        assert!(Role::Staff.is_staff());
        assert!(!Role::Customer.is_staff());
    }
}
