use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

time::serde::format_description!(ymd, Date, "[year]-[month]-[day]");

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Experience {
    pub id: Uuid,
    pub title: String,
    pub company: String,
    pub location: Option<String>,
    #[serde(with = "ymd")]
    pub from: Date,
    #[serde(with = "ymd::option", default)]
    pub to: Option<Date>,
    #[serde(default)]
    pub current: bool,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Education {
    pub id: Uuid,
    pub school: String,
    pub degree: String,
    #[serde(rename = "fieldofstudy")]
    pub field_of_study: String,
    #[serde(with = "ymd")]
    pub from: Date,
    #[serde(with = "ymd::option", default)]
    pub to: Option<Date>,
    #[serde(default)]
    pub current: bool,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Social {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub youtube: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facebook: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instagram: Option<String>,
}

/// One per user. Serialized through `ProfileView`, which adds the owner.
#[derive(Debug, Clone, Serialize)]
pub struct Profile {
    #[serde(skip_serializing)]
    pub user: Uuid,
    pub company: Option<String>,
    pub website: Option<String>,
    pub location: Option<String>,
    pub status: String,
    pub skills: Vec<String>,
    pub bio: Option<String>,
    #[serde(rename = "githubusername")]
    pub github_username: Option<String>,
    pub experience: Vec<Experience>,
    pub education: Vec<Education>,
    pub social: Social,
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
}

#[derive(Debug, FromRow)]
pub struct ProfileRow {
    pub user_id: Uuid,
    pub company: Option<String>,
    pub website: Option<String>,
    pub location: Option<String>,
    pub status: String,
    pub skills: Vec<String>,
    pub bio: Option<String>,
    pub github_username: Option<String>,
    pub experience: Json<Vec<Experience>>,
    pub education: Json<Vec<Education>>,
    pub social: Json<Social>,
    pub date: OffsetDateTime,
}

impl From<ProfileRow> for Profile {
    fn from(r: ProfileRow) -> Self {
        Self {
            user: r.user_id,
            company: r.company,
            website: r.website,
            location: r.location,
            status: r.status,
            skills: r.skills,
            bio: r.bio,
            github_username: r.github_username,
            experience: r.experience.0,
            education: r.education.0,
            social: r.social.0,
            date: r.date,
        }
    }
}
