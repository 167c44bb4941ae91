use axum::{
    extract::{Extension, State},
    middleware,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};

use crate::error::AppError;
use crate::middleware::auth::{api_auth_middleware, CurrentUser};
use crate::state::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/api/me", get(me))
        .layer(middleware::from_fn_with_state(state, api_auth_middleware))
}

/// Caller-identity lookup for the profile page.
async fn me(
    State(state): State<AppState>,
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
) -> Result<Json<Value>, AppError> {
    let profile = state
        .users
        .load_profile(user_id)
        .await
        .map_err(|e| AppError::InternalServerError(e.to_string()))?
        .ok_or_else(|| {
            // A valid session always references a stored user; a miss means
            // the row was removed out from under it.
            AppError::InternalServerError(format!("session user {} not found", user_id))
        })?;

    Ok(Json(json!({ "ok": true, "user": profile })))
}
