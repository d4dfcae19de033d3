use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
    pub refresh_ttl_minutes: i64,
}

/// Per-IP budget for the register and login routes.
#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    pub max_requests: u32,
    pub window_secs: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 10,
            window_secs: 15 * 60,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
    pub auth_rate_limit: RateLimitConfig,
    /// Shared showcase account; it can read but never write.
    pub demo_user_id: Option<Uuid>,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "jobtrack".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "jobtrack-users".into()),
            ttl_minutes: std::env::var("JWT_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(60),
            refresh_ttl_minutes: std::env::var("JWT_REFRESH_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(60 * 24 * 14),
        };
        let defaults = RateLimitConfig::default();
        let auth_rate_limit = RateLimitConfig {
            max_requests: std::env::var("AUTH_RATE_LIMIT_MAX")
                .ok()
                .and_then(|v| v.parse::<u32>().ok())
                .unwrap_or(defaults.max_requests),
            window_secs: std::env::var("AUTH_RATE_LIMIT_WINDOW_SECS")
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(defaults.window_secs),
        };
        let demo_user_id = match std::env::var("DEMO_USER_ID") {
            Ok(v) if !v.trim().is_empty() => Some(v.trim().parse::<Uuid>()?),
            _ => None,
        };
        Ok(Self {
            database_url,
            jwt,
            auth_rate_limit,
            demo_user_id,
        })
    }

    pub fn is_demo_user(&self, user_id: Uuid) -> bool {
        self.demo_user_id == Some(user_id)
    }
}
