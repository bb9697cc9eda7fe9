//! Session key constants.
//!
//! The session is the only thing shared with the external auth collaborator:
//! it writes `user_id` on login and clears it on logout. `cart_key` is ours,
//! generated lazily for guests.

/// Keys used for session storage.
pub mod session_keys {
    /// Authenticated user id, set by the auth service.
    pub const USER_ID: &str = "user_id";
    /// Guest cart key (UUID string), generated on first cart interaction.
    pub const CART_KEY: &str = "cart_key";
}
