use anyhow::Context;
use reqwest::{header, Client, StatusCode};
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::GithubConfig;

const USER_AGENT: &str = "devconnector";

/// GitHub logins are 1-39 ASCII alphanumerics or hyphens, not starting with a hyphen.
pub fn is_valid_username(name: &str) -> bool {
    (1..=39).contains(&name.len())
        && !name.starts_with('-')
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}

/// The user's five oldest public repositories as GitHub returns them;
/// `None` when GitHub does not answer 200.
pub async fn latest_repos(
    client: &Client,
    config: &GithubConfig,
    username: &str,
) -> anyhow::Result<Option<Value>> {
    let url = format!(
        "{}/users/{}/repos",
        config.api_url.trim_end_matches('/'),
        username
    );
    let mut req = client
        .get(&url)
        .query(&[("per_page", "5"), ("sort", "created:asc")])
        .header(header::USER_AGENT, USER_AGENT);
    if let Some(token) = &config.token {
        req = req.header(header::AUTHORIZATION, format!("token {token}"));
    }

    let res = req.send().await.context("request github repos")?;
    let status = res.status();
    if status != StatusCode::OK {
        warn!(%username, %status, "github lookup failed");
        return Ok(None);
    }

    let repos = res.json::<Value>().await.context("decode github repos")?;
    debug!(%username, "github repos fetched");
    Ok(Some(repos))
}
