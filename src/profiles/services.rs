use time::OffsetDateTime;
use uuid::Uuid;

use super::{
    dto::ProfileRequest,
    repo_types::{Education, Experience, Profile, Social},
};
use crate::error::ApiError;

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// "rust, go ,,sql" -> ["rust", "go", "sql"]
pub fn split_skills(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn build_social(req: &ProfileRequest) -> Social {
    Social {
        youtube: non_blank(&req.youtube),
        twitter: non_blank(&req.twitter),
        facebook: non_blank(&req.facebook),
        linkedin: non_blank(&req.linkedin),
        instagram: non_blank(&req.instagram),
    }
}

/// Creates the profile or updates it in place. Blank or missing scalar
/// fields keep their stored value; the social links are replaced wholesale.
pub fn upsert_fields(existing: Option<Profile>, user_id: Uuid, req: &ProfileRequest) -> Profile {
    let mut profile = existing.unwrap_or_else(|| Profile {
        user: user_id,
        company: None,
        website: None,
        location: None,
        status: String::new(),
        skills: Vec::new(),
        bio: None,
        github_username: None,
        experience: Vec::new(),
        education: Vec::new(),
        social: Social::default(),
        date: OffsetDateTime::now_utc(),
    });

    if let Some(v) = non_blank(&req.company) {
        profile.company = Some(v);
    }
    if let Some(v) = non_blank(&req.website) {
        profile.website = Some(v);
    }
    if let Some(v) = non_blank(&req.location) {
        profile.location = Some(v);
    }
    if let Some(v) = non_blank(&req.bio) {
        profile.bio = Some(v);
    }
    if let Some(v) = non_blank(&req.githubusername) {
        profile.github_username = Some(v);
    }
    if let Some(v) = non_blank(&req.status) {
        profile.status = v;
    }
    if let Some(v) = non_blank(&req.skills) {
        profile.skills = split_skills(&v);
    }
    profile.social = build_social(req);
    profile
}

pub fn add_experience(profile: &mut Profile, exp: Experience) {
    profile.experience.insert(0, exp);
}

pub fn remove_experience(profile: &mut Profile, id: Uuid) -> Result<Experience, ApiError> {
    let idx = profile
        .experience
        .iter()
        .position(|e| e.id == id)
        .ok_or_else(|| ApiError::NotFound("Experience not found".into()))?;
    Ok(profile.experience.remove(idx))
}

pub fn add_education(profile: &mut Profile, edu: Education) {
    profile.education.insert(0, edu);
}

pub fn remove_education(profile: &mut Profile, id: Uuid) -> Result<Education, ApiError> {
    let idx = profile
        .education
        .iter()
        .position(|e| e.id == id)
        .ok_or_else(|| ApiError::NotFound("Education not found".into()))?;
    Ok(profile.education.remove(idx))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use time::{Date, Month};

    fn request(status: &str, skills: &str) -> ProfileRequest {
        ProfileRequest {
            status: Some(status.into()),
            skills: Some(skills.into()),
            ..Default::default()
        }
    }

    fn experience(title: &str) -> Experience {
        Experience {
            id: Uuid::new_v4(),
            title: title.into(),
            company: "Acme".into(),
            location: None,
            from: Date::from_calendar_date(2020, Month::January, 1).unwrap(),
            to: None,
            current: true,
            description: None,
        }
    }

    #[test]
    fn skills_are_split_and_trimmed() {
        assert_eq!(split_skills("rust, go ,,sql "), vec!["rust", "go", "sql"]);
        assert!(split_skills(" , ").is_empty());
    }

    #[test]
    fn create_then_update_keeps_unspecified_fields() {
        let user = Uuid::new_v4();
        let mut first = request("Developer", "rust,sql");
        first.company = Some("Acme".into());
        first.twitter = Some("https://twitter.com/ada".into());
        let profile = upsert_fields(None, user, &first);
        assert_eq!(profile.user, user);
        assert_eq!(profile.company.as_deref(), Some("Acme"));
        assert_eq!(profile.social.twitter.as_deref(), Some("https://twitter.com/ada"));

        let mut second = request("Senior Developer", "rust");
        second.company = Some("   ".into());
        let updated = upsert_fields(Some(profile), user, &second);
        assert_eq!(updated.status, "Senior Developer");
        assert_eq!(updated.skills, vec!["rust"]);
        assert_eq!(updated.company.as_deref(), Some("Acme"));
        assert_eq!(updated.social, Social::default());
    }

    #[test]
    fn experience_is_prepended_and_removed_by_id() {
        let mut profile = upsert_fields(None, Uuid::new_v4(), &request("Dev", "rust"));
        let old = experience("Junior");
        let new = experience("Senior");
        add_experience(&mut profile, old.clone());
        add_experience(&mut profile, new.clone());
        assert_eq!(profile.experience[0].title, "Senior");

        let removed = remove_experience(&mut profile, old.id).unwrap();
        assert_eq!(removed, old);
        assert_eq!(profile.experience, vec![new]);

        let err = remove_experience(&mut profile, Uuid::new_v4()).unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(profile.experience.len(), 1);
    }

    #[test]
    fn unknown_education_is_not_found() {
        let mut profile = upsert_fields(None, Uuid::new_v4(), &request("Dev", "rust"));
        let err = remove_education(&mut profile, Uuid::new_v4()).unwrap_err();
        assert!(matches!(err, ApiError::NotFound(ref m) if m == "Education not found"));
    }
}
