use axum::{
    extract::{Form, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
    Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::Deserialize;
use tracing::error;
use uuid::Uuid;

use villa_core::identity::{is_valid_password, NewUser, SessionClaims};
use villa_store::UserStoreError;

use crate::middleware::auth::{session_user, SESSION_COOKIE};
use crate::pages::serve_page;
use crate::state::AppState;

const WEAK_PASSWORD_MESSAGE: &str =
    "Password must be at least 15 characters, or at least 8 characters with at least one lowercase letter and one digit.";

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/register", get(register_page).post(register))
        .route("/login", get(login_page).post(login))
        .route("/logout", get(logout))
}

/// Login and register pages bounce an already-authenticated visitor home.
async fn login_page(State(state): State<AppState>, jar: CookieJar) -> Response {
    if session_user(&state.auth.secret, &jar).is_some() {
        return Redirect::to("/").into_response();
    }
    serve_page(&state, "login.html").await
}

async fn register_page(State(state): State<AppState>, jar: CookieJar) -> Response {
    if session_user(&state.auth.secret, &jar).is_some() {
        return Redirect::to("/").into_response();
    }
    serve_page(&state, "register.html").await
}

fn session_cookie(state: &AppState, user_id: Uuid) -> Result<Cookie<'static>, jsonwebtoken::errors::Error> {
    let claims = SessionClaims {
        sub: user_id.to_string(),
        exp: (Utc::now() + Duration::seconds(state.auth.expiration as i64)).timestamp() as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(state.auth.secret.as_bytes()),
    )?;

    let mut cookie = Cookie::new(SESSION_COOKIE, token);
    cookie.set_http_only(true);
    cookie.set_same_site(SameSite::Lax);
    cookie.set_path("/");
    Ok(cookie)
}

async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<NewUser>,
) -> Response {
    if !is_valid_password(&form.password) {
        return (StatusCode::BAD_REQUEST, WEAK_PASSWORD_MESSAGE).into_response();
    }

    if form.email.is_empty() || form.password.is_empty() {
        return (StatusCode::BAD_REQUEST, "Email and password are required.").into_response();
    }

    let password_hash = match bcrypt::hash(&form.password, bcrypt::DEFAULT_COST) {
        Ok(hash) => hash,
        Err(e) => {
            error!("Password hashing failed: {}", e);
            return (StatusCode::INTERNAL_SERVER_ERROR, "Server error (register).").into_response();
        }
    };

    match state.users.create(&form, &password_hash).await {
        // Auto-login after registration
        Ok(id) => login_redirect(&state, jar, id, "/"),
        Err(UserStoreError::DuplicateEmail) => {
            (StatusCode::BAD_REQUEST, "Email already exists.").into_response()
        }
        Err(UserStoreError::Unavailable(msg)) => {
            error!("Register failed: {}", msg);
            (StatusCode::INTERNAL_SERVER_ERROR, "Server error (register).").into_response()
        }
    }
}

#[derive(Debug, Deserialize)]
struct LoginForm {
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
}

async fn login(State(state): State<AppState>, jar: CookieJar, Form(form): Form<LoginForm>) -> Response {
    let credentials = match state.users.find_credentials(&form.email).await {
        Ok(c) => c,
        Err(e) => {
            error!("Login lookup failed: {}", e);
            return (StatusCode::INTERNAL_SERVER_ERROR, "Server error (login).").into_response();
        }
    };

    // Unknown email and wrong password get the same answer.
    let Some((user_id, password_hash)) = credentials else {
        return (StatusCode::BAD_REQUEST, "Invalid email or password.").into_response();
    };

    match bcrypt::verify(&form.password, &password_hash) {
        Ok(true) => login_redirect(&state, jar, user_id, "/"),
        Ok(false) => (StatusCode::BAD_REQUEST, "Invalid email or password.").into_response(),
        Err(e) => {
            error!("Password verification failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Server error (login).").into_response()
        }
    }
}

fn login_redirect(state: &AppState, jar: CookieJar, user_id: Uuid, to: &str) -> Response {
    match session_cookie(state, user_id) {
        Ok(cookie) => (jar.add(cookie), Redirect::to(to)).into_response(),
        Err(e) => {
            error!("Session token encoding failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Server error (login).").into_response()
        }
    }
}

async fn logout(jar: CookieJar) -> impl IntoResponse {
    let mut cookie = Cookie::from(SESSION_COOKIE);
    cookie.set_path("/");
    (jar.remove(cookie), Redirect::to("/login"))
}
