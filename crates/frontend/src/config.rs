//! Application configuration.
//!
//! The config is an embedded TOML document. `CRM_API_BASE_URL` set at build
//! time replaces the API host.

use once_cell::sync::Lazy;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub list: ListConfig,
    pub auth: AuthConfig,
    pub features: FeatureFlags,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ApiConfig {
    pub base_url: String,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ListConfig {
    pub default_page_size: usize,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct AuthConfig {
    /// Team id used when a manager or field officer has no resolvable team.
    pub fallback_team_id: i64,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Default)]
pub struct FeatureFlags {
    /// Admin store listing filtered by assigned employee goes to the dedicated
    /// employee endpoint, dropping every other filter.
    #[serde(default)]
    pub employee_scoped_store_filter: bool,
}

/// Default configuration embedded in the bundle
const DEFAULT_CONFIG: &str = r#"
[api]
base_url = "https://api.fieldsales-crm.com"

[list]
default_page_size = 10

[auth]
fallback_team_id = 6

[features]
employee_scoped_store_filter = true
"#;

static CONFIG: Lazy<AppConfig> = Lazy::new(|| match load_config() {
    Ok(config) => config,
    Err(e) => {
        log::error!("Invalid embedded configuration: {e:#}");
        AppConfig::fallback()
    }
});

/// Parse the embedded config and apply build-time overrides.
pub fn load_config() -> anyhow::Result<AppConfig> {
    let mut config = parse_config(DEFAULT_CONFIG)?;
    if let Some(base_url) = option_env!("CRM_API_BASE_URL") {
        log::info!("API base URL overridden at build time: {base_url}");
        config.api.base_url = base_url.to_string();
    }
    Ok(config)
}

pub fn parse_config(source: &str) -> anyhow::Result<AppConfig> {
    let mut config: AppConfig = toml::from_str(source)?;
    config.api.base_url = config.api.base_url.trim_end_matches('/').to_string();
    if config.list.default_page_size == 0 {
        anyhow::bail!("list.default_page_size must be positive");
    }
    Ok(config)
}

/// Loaded once per page load.
pub fn config() -> &'static AppConfig {
    &CONFIG
}

impl AppConfig {
    fn fallback() -> Self {
        Self {
            api: ApiConfig {
                base_url: "https://api.fieldsales-crm.com".to_string(),
            },
            list: ListConfig {
                default_page_size: 10,
            },
            auth: AuthConfig { fallback_team_id: 6 },
            features: FeatureFlags {
                employee_scoped_store_filter: true,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_loads() {
        let config = parse_config(DEFAULT_CONFIG).unwrap();
        assert_eq!(config, AppConfig::fallback());
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let source = DEFAULT_CONFIG.replace(
            "https://api.fieldsales-crm.com",
            "http://localhost:8081/",
        );
        let config = parse_config(&source).unwrap();
        assert_eq!(config.api.base_url, "http://localhost:8081");
    }

    #[test]
    fn test_zero_page_size_rejected() {
        let source = DEFAULT_CONFIG.replace("default_page_size = 10", "default_page_size = 0");
        assert!(parse_config(&source).is_err());
    }
}
