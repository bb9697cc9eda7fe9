//! Identity extractors.
//!
//! Every request maps to exactly one [`CartIdentity`]: the session's user id
//! when the auth service has set one, otherwise a guest cart key generated
//! lazily and stored in the session. Logging in mid-session does not merge
//! the guest cart into the user's cart: the two identities own distinct
//! carts until some outer collaborator reconciles them.

use axum::{extract::FromRequestParts, http::request::Parts};
use tower_sessions::Session;
use uuid::Uuid;

use longbox_core::{CartIdentity, UserId};

use crate::error::AppError;
use crate::models::session::session_keys;
use crate::models::user::User;
use crate::state::AppState;

/// Extractor for the request's cart identity.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(Identity(identity): Identity) -> impl IntoResponse {
///     format!("cart owner: {identity}")
/// }
/// ```
pub struct Identity(pub CartIdentity);

impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let session = session_from_parts(parts)?;

        if let Some(user_id) = session
            .get::<UserId>(session_keys::USER_ID)
            .await
            .map_err(session_error)?
        {
            return Ok(Self(CartIdentity::User(user_id)));
        }

        if let Some(key) = session
            .get::<String>(session_keys::CART_KEY)
            .await
            .map_err(session_error)?
        {
            return Ok(Self(CartIdentity::Guest(key)));
        }

        let key = Uuid::new_v4().to_string();
        session
            .insert(session_keys::CART_KEY, &key)
            .await
            .map_err(session_error)?;
        Ok(Self(CartIdentity::Guest(key)))
    }
}

/// Extractor for the authenticated user, when there is one.
///
/// Does not reject guests; handlers branch on the `Option`.
pub struct CurrentUser(pub Option<User>);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let session = session_from_parts(parts)?;

        let Some(user_id) = session
            .get::<UserId>(session_keys::USER_ID)
            .await
            .map_err(session_error)?
        else {
            return Ok(Self(None));
        };

        let user = crate::db::UserRepository::new(state.pool())
            .get(user_id)
            .await?;
        Ok(Self(user))
    }
}

/// Extractor that requires a staff-or-better user.
///
/// Rejects guests with 401 and non-staff users with 403.
pub struct RequireStaff(pub User);

impl FromRequestParts<AppState> for RequireStaff {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let CurrentUser(user) = CurrentUser::from_request_parts(parts, state).await?;
        let user = user.ok_or(AppError::Unauthorized)?;
        if !user.role().is_staff() {
            return Err(AppError::Forbidden);
        }
        Ok(Self(user))
    }
}

/// Get the session installed by `SessionManagerLayer`.
fn session_from_parts(parts: &Parts) -> Result<Session, AppError> {
    parts
        .extensions
        .get::<Session>()
        .cloned()
        .ok_or_else(|| AppError::Internal("session layer not installed".to_string()))
}

fn session_error(err: tower_sessions::session::Error) -> AppError {
    AppError::Internal(format!("session error: {err}"))
}
