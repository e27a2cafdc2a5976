//! Service configuration

use rust_decimal::Decimal;

use crate::db::BoxError;

/// Service configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// PostgreSQL connection URL
    pub database_url: String,
    /// HTTP port
    pub http_port: u16,
    /// Environment: development | staging | production
    pub environment: String,
    /// HS256 secret shared with the auth provider
    pub jwt_secret: String,
    /// Expected `aud` claim, if the provider sets one
    pub jwt_audience: Option<String>,
    /// Address always treated as platform admin
    pub fallback_admin_email: String,
    /// Public site root used to build storefront URLs
    pub public_base_url: String,
    /// Monthly price per active subscription, for the MRR estimate
    pub plan_monthly_price: Decimal,
    /// Allowed CORS origins (empty = any)
    pub cors_allowed_origins: Vec<String>,
}

impl Config {
    /// Require a secret env var: must be set and non-empty in non-development environments.
    fn require_secret(
        lookup: &impl Fn(&str) -> Option<String>,
        name: &str,
        environment: &str,
    ) -> Result<String, BoxError> {
        let val = match lookup(name) {
            Some(v) => v,
            None => {
                if environment != "development" {
                    return Err(format!("{name} must be set in {environment} environment").into());
                }
                format!("dev-{name}-not-for-production")
            }
        };
        if val.is_empty() && environment != "development" {
            return Err(format!("{name} must not be empty in {environment} environment").into());
        }
        Ok(val)
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, BoxError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, BoxError> {
        let environment = lookup("ENVIRONMENT").unwrap_or_else(|| "development".into());

        let plan_monthly_price = match lookup("PLAN_MONTHLY_PRICE") {
            Some(raw) => raw
                .trim()
                .parse::<Decimal>()
                .map_err(|e| format!("PLAN_MONTHLY_PRICE is not a number: {e}"))?,
            None => Decimal::from(29),
        };

        Ok(Self {
            database_url: lookup("DATABASE_URL").ok_or("DATABASE_URL must be set")?,
            http_port: lookup("HTTP_PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            jwt_secret: Self::require_secret(&lookup, "JWT_SECRET", &environment)?,
            jwt_audience: lookup("JWT_AUDIENCE").filter(|s| !s.is_empty()),
            fallback_admin_email: lookup("FALLBACK_ADMIN_EMAIL")
                .unwrap_or_else(|| "admin@restauplus.com".into()),
            public_base_url: lookup("PUBLIC_BASE_URL")
                .unwrap_or_else(|| "https://restauplus.com".into())
                .trim_end_matches('/')
                .to_string(),
            plan_monthly_price,
            cors_allowed_origins: lookup("CORS_ALLOWED_ORIGINS")
                .map(|raw| {
                    raw.split(',')
                        .map(str::trim)
                        .filter(|s| !s.is_empty())
                        .map(String::from)
                        .collect()
                })
                .unwrap_or_default(),
            environment,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config, BoxError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| map.get(name).cloned())
    }

    #[test]
    fn defaults_in_development() {
        let config = load(&[("DATABASE_URL", "postgres://localhost/restau")]).unwrap();
        assert_eq!(config.http_port, 8080);
        assert_eq!(config.environment, "development");
        assert_eq!(config.jwt_secret, "dev-JWT_SECRET-not-for-production");
        assert_eq!(config.fallback_admin_email, "admin@restauplus.com");
        assert_eq!(config.public_base_url, "https://restauplus.com");
        assert_eq!(config.plan_monthly_price, Decimal::from(29));
        assert!(config.cors_allowed_origins.is_empty());
        assert!(config.jwt_audience.is_none());
    }

    #[test]
    fn database_url_required() {
        assert!(load(&[]).is_err());
    }

    #[test]
    fn jwt_secret_required_outside_development() {
        let err = load(&[
            ("DATABASE_URL", "postgres://db"),
            ("ENVIRONMENT", "production"),
        ])
        .unwrap_err();
        assert!(err.to_string().contains("JWT_SECRET"));

        let err = load(&[
            ("DATABASE_URL", "postgres://db"),
            ("ENVIRONMENT", "production"),
            ("JWT_SECRET", ""),
        ])
        .unwrap_err();
        assert!(err.to_string().contains("must not be empty"));
    }

    #[test]
    fn explicit_values() {
        let config = load(&[
            ("DATABASE_URL", "postgres://db"),
            ("HTTP_PORT", "9000"),
            ("ENVIRONMENT", "production"),
            ("JWT_SECRET", "s3cret"),
            ("JWT_AUDIENCE", "authenticated"),
            ("PUBLIC_BASE_URL", "https://menu.example.com/"),
            ("PLAN_MONTHLY_PRICE", "49.90"),
            ("CORS_ALLOWED_ORIGINS", "https://a.example, ,https://b.example"),
        ])
        .unwrap();
        assert_eq!(config.http_port, 9000);
        assert_eq!(config.jwt_secret, "s3cret");
        assert_eq!(config.jwt_audience.as_deref(), Some("authenticated"));
        assert_eq!(config.public_base_url, "https://menu.example.com");
        assert_eq!(config.plan_monthly_price, Decimal::new(4990, 2));
        assert_eq!(
            config.cors_allowed_origins,
            vec!["https://a.example", "https://b.example"]
        );
    }

    #[test]
    fn invalid_plan_price_rejected() {
        assert!(
            load(&[
                ("DATABASE_URL", "postgres://db"),
                ("PLAN_MONTHLY_PRICE", "cheap")
            ])
            .is_err()
        );
    }
}
