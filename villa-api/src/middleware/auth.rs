use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use jsonwebtoken::{decode, DecodingKey, Validation};
use uuid::Uuid;

use villa_core::identity::SessionClaims;

use crate::state::AppState;

pub const SESSION_COOKIE: &str = "villa_session";

/// Authenticated caller identity, injected into request extensions by the
/// auth middleware.
#[derive(Debug, Clone, Copy)]
pub struct CurrentUser(pub Uuid);

/// Decode the session cookie into a user id. Any failure (missing cookie,
/// bad signature, expired token, junk sub) means no session.
pub fn session_user(secret: &str, jar: &CookieJar) -> Option<Uuid> {
    let token = jar.get(SESSION_COOKIE)?.value();

    let data = decode::<SessionClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .ok()?;

    Uuid::parse_str(&data.claims.sub).ok()
}

/// Browser-facing routes: a missing session redirects to the login page.
pub async fn page_auth_middleware(
    State(state): State<AppState>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Response {
    match session_user(&state.auth.secret, &jar) {
        Some(id) => {
            req.extensions_mut().insert(CurrentUser(id));
            next.run(req).await
        }
        None => Redirect::to("/login").into_response(),
    }
}

/// API routes: a missing session is a plain 401.
pub async fn api_auth_middleware(
    State(state): State<AppState>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let id = session_user(&state.auth.secret, &jar).ok_or(StatusCode::UNAUTHORIZED)?;

    req.extensions_mut().insert(CurrentUser(id));
    Ok(next.run(req).await)
}
