use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
    pub refresh_ttl_minutes: i64,
}

/// Outbound GitHub API access for the profile repository list.
#[derive(Debug, Clone, Deserialize)]
pub struct GithubConfig {
    pub api_url: String,
    pub token: Option<String>,
}

/// Where users, profiles and posts are persisted.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub enum StoreBackend {
    Postgres { database_url: String },
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub store: StoreBackend,
    pub jwt: JwtConfig,
    pub github: GithubConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let store = match std::env::var("STORE_BACKEND")
            .unwrap_or_else(|_| "postgres".into())
            .as_str()
        {
            "memory" => StoreBackend::Memory,
            "postgres" => StoreBackend::Postgres {
                database_url: std::env::var("DATABASE_URL")?,
            },
            other => anyhow::bail!("unknown STORE_BACKEND {other:?}"),
        };
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "devconnector".into()),
            audience: std::env::var("JWT_AUDIENCE")
                .unwrap_or_else(|_| "devconnector-users".into()),
            ttl_minutes: std::env::var("JWT_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(60),
            refresh_ttl_minutes: std::env::var("JWT_REFRESH_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(60 * 24 * 14),
        };
        let github = GithubConfig {
            api_url: std::env::var("GITHUB_API_URL")
                .unwrap_or_else(|_| "https://api.github.com".into()),
            token: std::env::var("GITHUB_TOKEN").ok().filter(|t| !t.is_empty()),
        };
        Ok(Self {
            host: std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: std::env::var("APP_PORT")
                .ok()
                .and_then(|v| v.parse::<u16>().ok())
                .unwrap_or(5000),
            store,
            jwt,
            github,
        })
    }

    #[cfg(test)]
    pub fn for_tests() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 0,
            store: StoreBackend::Memory,
            jwt: JwtConfig {
                secret: "test-secret".into(),
                issuer: "test-issuer".into(),
                audience: "test-aud".into(),
                ttl_minutes: 5,
                refresh_ttl_minutes: 60,
            },
            github: GithubConfig {
                api_url: "http://127.0.0.1:9".into(),
                token: None,
            },
        }
    }
}
