use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::repo_types::Profile;

/// Body of `POST /profile`. `skills` is a comma separated list.
#[derive(Debug, Default, Deserialize)]
pub struct ProfileRequest {
    pub company: Option<String>,
    pub website: Option<String>,
    pub location: Option<String>,
    pub bio: Option<String>,
    pub status: Option<String>,
    pub githubusername: Option<String>,
    pub skills: Option<String>,
    pub youtube: Option<String>,
    pub twitter: Option<String>,
    pub facebook: Option<String>,
    pub linkedin: Option<String>,
    pub instagram: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ExperienceRequest {
    pub title: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub current: Option<bool>,
    pub description: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct EducationRequest {
    pub school: Option<String>,
    pub degree: Option<String>,
    pub fieldofstudy: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub current: Option<bool>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProfileOwner {
    pub id: Uuid,
    pub name: String,
    pub avatar: Option<String>,
}

/// A profile together with its owner's public details.
#[derive(Debug, Serialize)]
pub struct ProfileView {
    pub user: ProfileOwner,
    #[serde(flatten)]
    pub profile: Profile,
}
