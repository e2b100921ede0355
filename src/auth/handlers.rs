use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{
            AuthResponse, ChangeEmailRequest, ChangePasswordRequest, LoginRequest, PublicAccount,
            RefreshRequest, RegisterRequest,
        },
        jwt::{AuthUser, JwtKeys},
        repo::Account,
        services::{hash_password, is_valid_email, verify_password},
    },
    error::AppError,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh))
}

pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/me", get(get_me))
        .route("/me/email", put(change_email))
        .route("/me/password", put(change_password))
}

fn public(account: &Account) -> PublicAccount {
    PublicAccount {
        id: account.id,
        username: account.username.clone(),
        email: account.email.clone(),
    }
}

fn issue_tokens(state: &AppState, account: &Account) -> Result<AuthResponse, AppError> {
    let keys = JwtKeys::from_ref(state);
    let access_token = keys.sign_access(account.id)?;
    let refresh_token = keys.sign_refresh(account.id)?;
    Ok(AuthResponse {
        access_token,
        refresh_token,
        user: public(account),
    })
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(mut payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    payload.username = payload.username.trim().to_string();
    payload.email = payload.email.trim().to_lowercase();

    if payload.username.is_empty() {
        warn!("empty username");
        return Err(AppError::Validation("username must not be empty".into()));
    }
    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "invalid email");
        return Err(AppError::Validation("invalid e-mail address".into()));
    }
    if payload.password.len() < 8 {
        warn!("password too short");
        return Err(AppError::Validation(
            "password must be at least 8 characters".into(),
        ));
    }

    if Account::find_by_username(&state.db, &payload.username)
        .await?
        .is_some()
    {
        warn!(username = %payload.username, "username already taken");
        return Err(AppError::Conflict("username already taken"));
    }

    let hash = hash_password(&payload.password)?;
    let account = Account::create(&state.db, &payload.username, &payload.email, &hash).await?;

    info!(user_id = %account.id, username = %account.username, "account registered");
    Ok((StatusCode::CREATED, Json(issue_tokens(&state, &account)?)))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let username = payload.username.trim();

    let account = match Account::find_by_username(&state.db, username).await? {
        Some(a) => a,
        None => {
            warn!(username = %username, "login unknown username");
            return Err(AppError::Unauthorized("invalid credentials"));
        }
    };

    if !verify_password(&payload.password, &account.password_hash)? {
        warn!(user_id = %account.id, "login invalid password");
        return Err(AppError::Unauthorized("invalid credentials"));
    }

    info!(user_id = %account.id, "user logged in");
    Ok(Json(issue_tokens(&state, &account)?))
}

#[instrument(skip(state, payload))]
pub async fn refresh(
    State(state): State<AppState>,
    Json(payload): Json<RefreshRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let keys = JwtKeys::from_ref(&state);
    let claims = keys
        .verify_refresh(&payload.refresh_token)
        .map_err(|_| AppError::Unauthorized("invalid refresh token"))?;

    let account = Account::find_by_id(&state.db, claims.sub)
        .await?
        .ok_or(AppError::Unauthorized("account no longer exists"))?;

    Ok(Json(issue_tokens(&state, &account)?))
}

#[instrument(skip(state))]
pub async fn get_me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<PublicAccount>, AppError> {
    let account = Account::find_by_id(&state.db, user_id)
        .await?
        .ok_or(AppError::Unauthorized("account no longer exists"))?;
    Ok(Json(public(&account)))
}

#[instrument(skip(state, payload))]
pub async fn change_email(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(mut payload): Json<ChangeEmailRequest>,
) -> Result<Json<PublicAccount>, AppError> {
    payload.new_email = payload.new_email.trim().to_lowercase();

    if !is_valid_email(&payload.new_email) {
        return Err(AppError::Validation("invalid e-mail address".into()));
    }

    let account = Account::find_by_id(&state.db, user_id)
        .await?
        .ok_or(AppError::Unauthorized("account no longer exists"))?;

    if payload.new_email == account.email {
        return Err(AppError::Validation(
            "new e-mail matches the current one".into(),
        ));
    }

    Account::update_email(&state.db, user_id, &payload.new_email).await?;
    info!(user_id = %user_id, "e-mail changed");

    Ok(Json(PublicAccount {
        id: account.id,
        username: account.username,
        email: payload.new_email,
    }))
}

#[instrument(skip(state, payload))]
pub async fn change_password(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<ChangePasswordRequest>,
) -> Result<StatusCode, AppError> {
    let account = Account::find_by_id(&state.db, user_id)
        .await?
        .ok_or(AppError::Unauthorized("account no longer exists"))?;

    if !verify_password(&payload.old_password, &account.password_hash)? {
        warn!(user_id = %user_id, "password change with wrong old password");
        return Err(AppError::Unauthorized("wrong password"));
    }
    if payload.new_password.len() < 8 {
        return Err(AppError::Validation(
            "password must be at least 8 characters".into(),
        ));
    }

    let hash = hash_password(&payload.new_password)?;
    Account::update_password(&state.db, user_id, &hash).await?;
    info!(user_id = %user_id, "password changed");

    Ok(StatusCode::NO_CONTENT)
}
