use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::database::models::Role;
use crate::error::ApiError;
use crate::middleware::session::SessionUser;
use crate::services::identity;
use crate::AppState;

/// Roles allowed on the financial and content back-office routes.
pub const BACK_OFFICE: &[Role] = &[Role::Admin, Role::SuperAdmin];

/// Roles allowed on the repair-desk routes (appointments).
pub const REPAIR_DESK: &[Role] = &[Role::Admin, Role::SuperAdmin, Role::Technician];

/// Binary allow/deny. An absent role is denied by every allow-list.
pub fn is_allowed(role: Option<Role>, allowed: &[Role]) -> bool {
    role.map_or(false, |r| allowed.contains(&r))
}

/// Fetches the stored role for the session's profile and checks it against the
/// allow-list. Fail-closed: a failed lookup denies with 401, never 500.
async fn authorize(
    state: &AppState,
    session: Option<&SessionUser>,
    allowed: &[Role],
) -> Result<(), ApiError> {
    let session = session.ok_or_else(|| ApiError::unauthorized("session required"))?;

    let role = identity::fetch_role(&state.db, session.profile_id)
        .await
        .map_err(|e| {
            tracing::error!("role lookup failed for {}: {}", session.profile_id, e);
            ApiError::unauthorized("unable to verify role")
        })?;

    if is_allowed(role, allowed) {
        Ok(())
    } else {
        Err(ApiError::unauthorized("insufficient role"))
    }
}

pub async fn require_back_office(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let session = request.extensions().get::<SessionUser>().cloned();
    authorize(&state, session.as_ref(), BACK_OFFICE).await?;
    Ok(next.run(request).await)
}

pub async fn require_repair_desk(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let session = request.extensions().get::<SessionUser>().cloned();
    authorize(&state, session.as_ref(), REPAIR_DESK).await?;
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_role_is_denied_by_every_list() {
        assert!(!is_allowed(None, BACK_OFFICE));
        assert!(!is_allowed(None, REPAIR_DESK));
        assert!(!is_allowed(None, &[]));
    }

    #[test]
    fn matching_role_is_allowed() {
        assert!(is_allowed(Some(Role::Admin), BACK_OFFICE));
        assert!(is_allowed(Some(Role::SuperAdmin), BACK_OFFICE));
        assert!(is_allowed(Some(Role::Technician), REPAIR_DESK));
    }

    #[test]
    fn non_matching_role_is_denied() {
        assert!(!is_allowed(Some(Role::Customer), BACK_OFFICE));
        assert!(!is_allowed(Some(Role::Technician), BACK_OFFICE));
        assert!(!is_allowed(Some(Role::Customer), REPAIR_DESK));
        assert!(!is_allowed(Some(Role::Admin), &[]));
    }
}
