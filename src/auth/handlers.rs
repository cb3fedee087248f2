use axum::{
    extract::{FromRef, State},
    routing::post,
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{AuthResponse, LoginRequest, PublicUser, RefreshRequest, RegisterRequest},
        extractors::AuthUser,
        jwt::JwtKeys,
        password::{hash_password, verify_password},
        repo::CreateUserError,
        repo_types::{NewUser, User},
    },
    error::{ApiError, FieldError},
    extract::JsonBody,
    state::AppState,
    validation::Validator,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/users", post(register))
        .route("/auth", post(login).get(get_me))
        .route("/auth/refresh", post(refresh))
}

fn issue_tokens(state: &AppState, user: User) -> Result<AuthResponse, ApiError> {
    let keys = JwtKeys::from_ref(state);
    let access_token = keys.sign_access(user.id)?;
    let refresh_token = keys.sign_refresh(user.id)?;
    Ok(AuthResponse {
        access_token,
        refresh_token,
        user: PublicUser::from(user),
    })
}

/// POST /api/users
#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<RegisterRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let email = payload.email.as_deref().map(|e| e.trim().to_lowercase());

    let mut v = Validator::new();
    v.not_empty("name", payload.name.as_deref(), "Name is required")
        .email("email", email.as_deref(), "Please include a valid email")
        .min_len(
            "password",
            payload.password.as_deref(),
            6,
            "Please enter a password with 6 or more characters",
        );
    v.finish()?;

    let name = payload.name.unwrap_or_default();
    let email = email.unwrap_or_default();
    let password = payload.password.unwrap_or_default();

    let exists = || ApiError::Validation(vec![FieldError::message("User already exists")]);

    if state.users.find_by_email(&email).await?.is_some() {
        warn!(email = %email, "email already registered");
        return Err(exists());
    }

    let hash = hash_password(&password)?;
    let created = state
        .users
        .create(NewUser {
            name: name.trim(),
            email: &email,
            password_hash: &hash,
            avatar: payload.avatar.as_deref(),
        })
        .await;
    let user = match created {
        Ok(user) => user,
        Err(CreateUserError::DuplicateEmail(_)) => {
            warn!(email = %email, "email registered concurrently");
            return Err(exists());
        }
        Err(CreateUserError::Other(e)) => return Err(e.into()),
    };

    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok(Json(issue_tokens(&state, user)?))
}

/// POST /api/auth
#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let email = payload.email.as_deref().map(|e| e.trim().to_lowercase());

    let mut v = Validator::new();
    v.email("email", email.as_deref(), "Please include a valid email");
    if payload.password.as_deref().map_or(true, str::is_empty) {
        v.not_empty("password", None, "Password is required");
    }
    v.finish()?;

    let email = email.unwrap_or_default();
    let password = payload.password.unwrap_or_default();
    let invalid = || ApiError::Validation(vec![FieldError::message("Invalid Credentials")]);

    let Some(user) = state.users.find_by_email(&email).await? else {
        warn!(email = %email, "login unknown email");
        return Err(invalid());
    };

    if !verify_password(&password, &user.password_hash)? {
        warn!(user_id = %user.id, "login invalid password");
        return Err(invalid());
    }

    info!(user_id = %user.id, "user logged in");
    Ok(Json(issue_tokens(&state, user)?))
}

/// POST /api/auth/refresh
#[instrument(skip(state, payload))]
pub async fn refresh(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<RefreshRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let keys = JwtKeys::from_ref(&state);
    let claims = keys.verify_refresh(&payload.refresh_token).map_err(|e| {
        warn!(error = %e, "refresh rejected");
        ApiError::Unauthorized("Token is not valid".into())
    })?;

    let user = state
        .users
        .find_by_id(claims.sub)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("User not found".into()))?;

    Ok(Json(issue_tokens(&state, user)?))
}

/// GET /api/auth
#[instrument(skip(state))]
pub async fn get_me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<PublicUser>, ApiError> {
    let user = state.users.find_by_id(user_id).await?.ok_or_else(|| {
        warn!(%user_id, "token for unknown user");
        ApiError::Unauthorized("User not found".into())
    })?;
    Ok(Json(PublicUser::from(user)))
}
