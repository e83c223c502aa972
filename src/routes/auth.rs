//! Authentication routes: register, login, token refresh, logout, profile.
//!
//! The refresh token never appears in a response body; it travels in an
//! HttpOnly cookie scoped to the auth routes, and `POST /auth/accessToken`
//! exchanges it for a fresh access token plus the user-info payload.

use axum::{extract::State, http::StatusCode, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::errors::AppError;
use crate::middleware::auth::CurrentUser;
use crate::models::user::{RegisterUser, UserResponse};
use crate::services::auth as auth_service;
use crate::services::auth::TokenPair;
use crate::AppState;

const REFRESH_COOKIE: &str = "refresh_token";
const AUTH_COOKIE_PATH: &str = "/api/v1/auth";

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Access token plus user info; the refresh token is cookie-only.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub user: UserResponse,
}

impl AuthResponse {
    fn new(tokens: &TokenPair, user: UserResponse) -> Self {
        Self {
            access_token: tokens.access_token.clone(),
            token_type: tokens.token_type.clone(),
            expires_in: tokens.expires_in,
            user,
        }
    }
}

fn refresh_cookie(token: String) -> Cookie<'static> {
    Cookie::build((REFRESH_COOKIE, token))
        .path(AUTH_COOKIE_PATH)
        .http_only(true)
        .same_site(SameSite::Strict)
        .build()
}

/// POST /api/v1/auth/register — self-service account creation.
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterUser>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    body.validate()?;
    let user = auth_service::register(&state.db, &body).await?;
    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// POST /api/v1/auth/login
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<LoginRequest>,
) -> Result<(CookieJar, Json<AuthResponse>), AppError> {
    let (tokens, user) = auth_service::login(
        &state.db,
        &body.username,
        &body.password,
        &state.config.jwt_secret,
        state.config.jwt_access_token_expiry_secs,
        state.config.jwt_refresh_token_expiry_secs,
    )
    .await?;

    let jar = jar.add(refresh_cookie(tokens.refresh_token.clone()));
    Ok((jar, Json(AuthResponse::new(&tokens, user.into()))))
}

/// POST /api/v1/auth/accessToken — cookie-carried refresh token exchange.
pub async fn access_token(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, Json<AuthResponse>), AppError> {
    let refresh_token = jar
        .get(REFRESH_COOKIE)
        .map(|c| c.value().to_string())
        .ok_or(AppError::Unauthorized)?;

    let (tokens, user) = auth_service::refresh(
        &state.db,
        &refresh_token,
        &state.config.jwt_secret,
        state.config.jwt_access_token_expiry_secs,
        state.config.jwt_refresh_token_expiry_secs,
    )
    .await?;

    let jar = jar.add(refresh_cookie(tokens.refresh_token.clone()));
    Ok((jar, Json(AuthResponse::new(&tokens, user.into()))))
}

/// POST /api/v1/auth/logout — revoke the session behind the refresh cookie.
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, StatusCode), AppError> {
    if let Some(cookie) = jar.get(REFRESH_COOKIE) {
        auth_service::logout(&state.db, cookie.value()).await?;
    }
    let jar = jar.remove(Cookie::build(REFRESH_COOKIE).path(AUTH_COOKIE_PATH));
    Ok((jar, StatusCode::NO_CONTENT))
}

/// GET /api/v1/auth/me — current user profile.
pub async fn me(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> Result<Json<UserResponse>, AppError> {
    let user = auth_service::find_user_by_id(&state.db, current_user.id).await?;
    Ok(Json(UserResponse::from(user)))
}
