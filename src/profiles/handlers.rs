use axum::{
    extract::{Path, State},
    routing::{delete, get, put},
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use super::{
    dto::{EducationRequest, ExperienceRequest, ProfileOwner, ProfileRequest, ProfileView},
    github,
    repo_types::{Education, Experience, Profile},
    services,
};
use crate::{
    auth::AuthUser,
    error::ApiError,
    extract::JsonBody,
    posts::dto::MessageResponse,
    state::AppState,
    validation::{parse_id, Validator},
};

pub fn profile_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/profile",
            get(list_profiles).post(upsert_profile).delete(delete_account),
        )
        .route("/profile/me", get(my_profile))
        .route("/profile/user/:user_id", get(profile_by_user))
        .route("/profile/experience", put(add_experience))
        .route("/profile/experience/:exp_id", delete(delete_experience))
        .route("/profile/education", put(add_education))
        .route("/profile/education/:edu_id", delete(delete_education))
        .route("/profile/github/:username", get(github_repos))
}

const NO_PROFILE: &str = "There is no profile for this user";
const NO_GITHUB: &str = "No Github profile found";

/// Attaches owner details; `None` when the owner no longer exists.
async fn view(state: &AppState, profile: Profile) -> anyhow::Result<Option<ProfileView>> {
    let Some(user) = state.users.find_by_id(profile.user).await? else {
        return Ok(None);
    };
    Ok(Some(ProfileView {
        user: ProfileOwner {
            id: user.id,
            name: user.name,
            avatar: user.avatar,
        },
        profile,
    }))
}

async fn own_profile(state: &AppState, user_id: Uuid) -> Result<Profile, ApiError> {
    state
        .profiles
        .find_by_user(user_id)
        .await?
        .ok_or_else(|| ApiError::BadRequest(NO_PROFILE.into()))
}

async fn save_and_view(state: &AppState, profile: Profile) -> Result<Json<ProfileView>, ApiError> {
    state.profiles.upsert(&profile).await?;
    view(state, profile)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::Unauthorized("User not found".into()))
}

/// GET /api/profile/me
#[instrument(skip(state))]
pub async fn my_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<ProfileView>, ApiError> {
    let profile = own_profile(&state, user_id).await?;
    view(&state, profile)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::BadRequest(NO_PROFILE.into()))
}

/// POST /api/profile
#[instrument(skip(state, body))]
pub async fn upsert_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    JsonBody(body): JsonBody<ProfileRequest>,
) -> Result<Json<ProfileView>, ApiError> {
    let has_skills = body
        .skills
        .as_deref()
        .is_some_and(|raw| !services::split_skills(raw).is_empty());
    let mut v = Validator::new();
    v.not_empty("status", body.status.as_deref(), "Status is required")
        .check(has_skills, "skills", body.skills.as_deref(), "Skills is required");
    v.finish()?;

    let existing = state.profiles.find_by_user(user_id).await?;
    let created = existing.is_none();
    let profile = services::upsert_fields(existing, user_id, &body);

    let view = save_and_view(&state, profile).await?;
    info!(%user_id, created, "profile saved");
    Ok(view)
}

/// GET /api/profile
#[instrument(skip(state))]
pub async fn list_profiles(State(state): State<AppState>) -> Result<Json<Vec<ProfileView>>, ApiError> {
    let profiles = state.profiles.list().await?;
    let mut out = Vec::with_capacity(profiles.len());
    for p in profiles {
        if let Some(v) = view(&state, p).await? {
            out.push(v);
        }
    }
    Ok(Json(out))
}

/// GET /api/profile/user/:user_id
#[instrument(skip(state))]
pub async fn profile_by_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<ProfileView>, ApiError> {
    const NOT_FOUND: &str = "Profile not found";
    let user_id = parse_id(&user_id, NOT_FOUND)?;
    let profile = state
        .profiles
        .find_by_user(user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(NOT_FOUND.into()))?;
    view(&state, profile)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(NOT_FOUND.into()))
}

/// DELETE /api/profile: removes posts, profile and user.
#[instrument(skip(state))]
pub async fn delete_account(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<MessageResponse>, ApiError> {
    let posts = state.posts.delete_by_user(user_id).await?;
    let had_profile = state.profiles.delete_by_user(user_id).await?;
    state.users.delete(user_id).await?;

    info!(%user_id, posts, had_profile, "account deleted");
    Ok(Json(MessageResponse {
        msg: "User deleted",
    }))
}

/// PUT /api/profile/experience
#[instrument(skip(state, body))]
pub async fn add_experience(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    JsonBody(body): JsonBody<ExperienceRequest>,
) -> Result<Json<ProfileView>, ApiError> {
    let mut v = Validator::new();
    v.not_empty("title", body.title.as_deref(), "Title is required")
        .not_empty("company", body.company.as_deref(), "Company is required");
    let from = v.date("from", body.from.as_deref(), "From date is required");
    let to = v.optional_date("to", body.to.as_deref());
    v.finish()?;
    let Some(from) = from else {
        return Err(ApiError::BadRequest("From date is required".into()));
    };

    let current = body.current.unwrap_or(false);
    let exp = Experience {
        id: Uuid::new_v4(),
        title: body.title.unwrap_or_default().trim().to_string(),
        company: body.company.unwrap_or_default().trim().to_string(),
        location: body.location.filter(|s| !s.trim().is_empty()),
        from,
        to: if current { None } else { to },
        current,
        description: body.description.filter(|s| !s.trim().is_empty()),
    };

    let mut profile = own_profile(&state, user_id).await?;
    services::add_experience(&mut profile, exp);
    save_and_view(&state, profile).await
}

/// DELETE /api/profile/experience/:exp_id
#[instrument(skip(state))]
pub async fn delete_experience(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(exp_id): Path<String>,
) -> Result<Json<ProfileView>, ApiError> {
    let exp_id = parse_id(&exp_id, "Experience not found")?;
    let mut profile = own_profile(&state, user_id).await?;
    services::remove_experience(&mut profile, exp_id)?;
    save_and_view(&state, profile).await
}

/// PUT /api/profile/education
#[instrument(skip(state, body))]
pub async fn add_education(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    JsonBody(body): JsonBody<EducationRequest>,
) -> Result<Json<ProfileView>, ApiError> {
    let mut v = Validator::new();
    v.not_empty("school", body.school.as_deref(), "School is required")
        .not_empty("degree", body.degree.as_deref(), "Degree is required")
        .not_empty(
            "fieldofstudy",
            body.fieldofstudy.as_deref(),
            "Field of study is required",
        );
    let from = v.date("from", body.from.as_deref(), "From date is required");
    let to = v.optional_date("to", body.to.as_deref());
    v.finish()?;
    let Some(from) = from else {
        return Err(ApiError::BadRequest("From date is required".into()));
    };

    let current = body.current.unwrap_or(false);
    let edu = Education {
        id: Uuid::new_v4(),
        school: body.school.unwrap_or_default().trim().to_string(),
        degree: body.degree.unwrap_or_default().trim().to_string(),
        field_of_study: body.fieldofstudy.unwrap_or_default().trim().to_string(),
        from,
        to: if current { None } else { to },
        current,
        description: body.description.filter(|s| !s.trim().is_empty()),
    };

    let mut profile = own_profile(&state, user_id).await?;
    services::add_education(&mut profile, edu);
    save_and_view(&state, profile).await
}

/// DELETE /api/profile/education/:edu_id
#[instrument(skip(state))]
pub async fn delete_education(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(edu_id): Path<String>,
) -> Result<Json<ProfileView>, ApiError> {
    let edu_id = parse_id(&edu_id, "Education not found")?;
    let mut profile = own_profile(&state, user_id).await?;
    services::remove_education(&mut profile, edu_id)?;
    save_and_view(&state, profile).await
}

/// GET /api/profile/github/:username
#[instrument(skip(state))]
pub async fn github_repos(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if !github::is_valid_username(&username) {
        return Err(ApiError::NotFound(NO_GITHUB.into()));
    }
    github::latest_repos(&state.http, &state.config.github, &username)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(NO_GITHUB.into()))
}
