use std::path::Path;

use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use tracing::error;

use crate::middleware::auth::page_auth_middleware;
use crate::state::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    let gated = Router::new()
        .route("/profile", get(profile_page))
        .layer(middleware::from_fn_with_state(state, page_auth_middleware));

    Router::new().route("/", get(home_page)).merge(gated)
}

async fn home_page(State(state): State<AppState>) -> Response {
    serve_page(&state, "main_index.html").await
}

async fn profile_page(State(state): State<AppState>) -> Response {
    serve_page(&state, "profile.html").await
}

pub(crate) async fn serve_page(state: &AppState, file: &str) -> Response {
    let path = Path::new(&state.frontend_dir).join(file);
    match tokio::fs::read_to_string(&path).await {
        Ok(body) => Html(body).into_response(),
        Err(e) => {
            error!("Failed to read page {}: {}", path.display(), e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
