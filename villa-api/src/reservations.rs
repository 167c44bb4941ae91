use axum::{
    extract::{Extension, Form, State},
    http::StatusCode,
    middleware,
    response::{IntoResponse, Redirect, Response},
    routing::post,
    Json, Router,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use villa_core::authority::{reserve, ReserveError};

use crate::middleware::auth::{api_auth_middleware, page_auth_middleware, CurrentUser};
use crate::state::AppState;

/// Two submission entry points, one internal operation: both handlers run
/// the same `admit` call and only differ in how they format the outcome.
pub fn routes(state: AppState) -> Router<AppState> {
    let form = Router::new()
        .route("/reserve", post(reserve_form))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            page_auth_middleware,
        ));

    let api = Router::new()
        .route("/api/reserve", post(reserve_api))
        .layer(middleware::from_fn_with_state(state, api_auth_middleware));

    form.merge(api)
}

#[derive(Debug, Deserialize)]
struct ReserveRequest {
    start_date: String,
    end_date: String,
}

async fn admit(state: &AppState, user_id: Uuid, req: &ReserveRequest) -> Result<Uuid, ReserveError> {
    let today = Utc::now().date_naive();
    reserve(
        state.reservations.as_ref(),
        today,
        user_id,
        &req.start_date,
        &req.end_date,
    )
    .await
}

/// HTML form flow: success goes back to the landing page, failures come back
/// as plain text.
async fn reserve_form(
    State(state): State<AppState>,
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
    Form(req): Form<ReserveRequest>,
) -> Response {
    match admit(&state, user_id, &req).await {
        Ok(_) => Redirect::to("/").into_response(),
        Err(e) => (form_status(&e), e.to_string()).into_response(),
    }
}

/// Programmatic flow: `{ "ok": true }`, or `{ "ok": false, "message" }` with
/// a status that tells a conflict apart from everything else.
async fn reserve_api(
    State(state): State<AppState>,
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
    Json(req): Json<ReserveRequest>,
) -> Response {
    match admit(&state, user_id, &req).await {
        Ok(_) => Json(json!({ "ok": true })).into_response(),
        Err(e) => {
            let body = Json(json!({ "ok": false, "message": e.to_string() }));
            (api_status(&e), body).into_response()
        }
    }
}

fn form_status(e: &ReserveError) -> StatusCode {
    match e {
        ReserveError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        _ => StatusCode::BAD_REQUEST,
    }
}

fn api_status(e: &ReserveError) -> StatusCode {
    match e {
        ReserveError::Conflict => StatusCode::CONFLICT,
        ReserveError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        ReserveError::PastDate | ReserveError::InvalidRange => StatusCode::BAD_REQUEST,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_statuses() {
        assert_eq!(form_status(&ReserveError::PastDate), StatusCode::BAD_REQUEST);
        assert_eq!(
            form_status(&ReserveError::InvalidRange),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(form_status(&ReserveError::Conflict), StatusCode::BAD_REQUEST);
        assert_eq!(
            form_status(&ReserveError::Store("down".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_api_statuses_distinguish_conflict() {
        assert_eq!(api_status(&ReserveError::Conflict), StatusCode::CONFLICT);
        assert_eq!(api_status(&ReserveError::PastDate), StatusCode::BAD_REQUEST);
        assert_eq!(
            api_status(&ReserveError::Store("down".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_conflict_message_is_user_facing() {
        assert_eq!(
            ReserveError::Conflict.to_string(),
            "Those dates are already reserved."
        );
        // Store detail never leaks into the response body.
        assert_eq!(
            ReserveError::Store("connection pool timed out".into()).to_string(),
            "Server error."
        );
    }
}
