//! Cart identity: who a cart belongs to.
//!
//! Every request resolves to exactly one identity (an authenticated user id
//! or a guest cart key), and every pending order is owned by exactly one of
//! the two. Guest and user carts are distinct; logging in mid-session does
//! not merge them.

use serde::{Deserialize, Serialize};

use super::id::UserId;

/// The owner of a cart: an authenticated user XOR a guest session key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CartIdentity {
    /// Authenticated user.
    User(UserId),
    /// Guest, identified by the cart key stored in the session.
    Guest(String),
}

impl CartIdentity {
    /// The user id, when authenticated.
    #[must_use]
    pub const fn user_id(&self) -> Option<UserId> {
        match self {
            Self::User(id) => Some(*id),
            Self::Guest(_) => None,
        }
    }

    /// The guest session key, when anonymous.
    #[must_use]
    pub fn session_key(&self) -> Option<&str> {
        match self {
            Self::User(_) => None,
            Self::Guest(key) => Some(key),
        }
    }
}

impl std::fmt::Display for CartIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::User(id) => write!(f, "user:{id}"),
            Self::Guest(key) => write!(f, "guest:{key}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_is_exclusive() {
        let user = CartIdentity::User(UserId::new(3));
        assert_eq!(user.user_id(), Some(UserId::new(3)));
        assert_eq!(user.session_key(), None);

        let guest = CartIdentity::Guest("abc123".to_string());
        assert_eq!(guest.user_id(), None);
        assert_eq!(guest.session_key(), Some("abc123"));
    }

    #[test]
    fn test_same_key_same_identity() {
        let a = CartIdentity::Guest("k".to_string());
        let b = CartIdentity::Guest("k".to_string());
        assert_eq!(a, b);
        // A user and a guest are never the same identity
        assert_ne!(a, CartIdentity::User(UserId::new(1)));
    }
}
