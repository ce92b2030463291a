use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResetConfig {
    pub code_ttl_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub jwt: JwtConfig,
    pub reset: ResetConfig,
}

fn env_minutes(key: &str, default: i64) -> i64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<i64>().ok())
        .unwrap_or(default)
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")
                .map_err(|_| anyhow::anyhow!("JWT_SECRET must be set"))?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "flockr".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "flockr-users".into()),
            ttl_minutes: env_minutes("JWT_TTL_MINUTES", 60 * 24),
        };
        let reset = ResetConfig {
            code_ttl_minutes: env_minutes("RESET_CODE_TTL_MINUTES", 60),
        };
        Ok(Self { jwt, reset })
    }

    /// Fixed settings for unit tests.
    #[cfg(test)]
    pub fn for_tests() -> Self {
        Self {
            jwt: JwtConfig {
                secret: "test-secret".into(),
                issuer: "test-issuer".into(),
                audience: "test-aud".into(),
                ttl_minutes: 5,
            },
            reset: ResetConfig {
                code_ttl_minutes: 60,
            },
        }
    }
}
