//! User management commands.
//!
//! # Usage
//!
//! ```bash
//! # Create a customer
//! longbox-cli user create -e reader@example.com -n "Reader"
//!
//! # Create a staff member
//! longbox-cli user create -e staff@example.com -n "Staff" --staff
//!
//! # Create an owner
//! longbox-cli user create -e owner@example.com -n "Owner" -g Owner
//! ```

use tracing::info;

use longbox_server::db::UserRepository;
use longbox_server::models::user::CreateUserInput;

use super::{CommandError, connect};

/// Create a new user with the given flags and groups.
///
/// # Errors
///
/// Returns an error if the email is taken or the database is unreachable.
pub async fn create(
    email: &str,
    display_name: &str,
    is_superuser: bool,
    is_staff: bool,
    groups: Vec<String>,
) -> Result<(), CommandError> {
    let pool = connect().await?;

    let input = CreateUserInput {
        email: email.to_string(),
        display_name: display_name.to_string(),
        is_superuser,
        is_staff,
        groups,
    };
    let user = UserRepository::new(&pool).create(&input).await?;

    info!(
        id = %user.id,
        email = %user.email,
        role = %user.role(),
        "Created user"
    );
    Ok(())
}
