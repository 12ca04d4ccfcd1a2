use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::http::APP_USER_AGENT;
use crate::core::mods::ModLoader;
use crate::core::registry::{CURSEFORGE_API, MODRINTH_API};
use crate::core::version::VERSION_MANIFEST_URL;

pub const ENV_CURSEFORGE_API_KEY: &str = "CURSEFORGE_API_KEY";
pub const ENV_MODRINTH_API: &str = "MODREFRESH_MODRINTH_API";
pub const ENV_CURSEFORGE_API: &str = "MODREFRESH_CURSEFORGE_API";
pub const ENV_USER_AGENT: &str = "MODREFRESH_USER_AGENT";

/// Runtime settings for one update session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdaterConfig {
    pub modrinth_api: String,
    pub curseforge_api: String,
    pub version_manifest_url: String,
    /// Sent as `x-api-key`. CurseForge queries fail without it.
    #[serde(skip_serializing)]
    pub curseforge_api_key: Option<String>,
    pub user_agent: String,
    pub search_page_size: u32,
    pub curseforge_files_page_size: u32,
    pub default_game_versions: Vec<String>,
    pub default_loaders: Vec<ModLoader>,
}

impl Default for UpdaterConfig {
    fn default() -> Self {
        Self {
            modrinth_api: MODRINTH_API.to_string(),
            curseforge_api: CURSEFORGE_API.to_string(),
            version_manifest_url: VERSION_MANIFEST_URL.to_string(),
            curseforge_api_key: None,
            user_agent: APP_USER_AGENT.to_string(),
            search_page_size: 10,
            curseforge_files_page_size: 20,
            default_game_versions: vec!["1.20.4".to_string()],
            default_loaders: vec![ModLoader::Fabric],
        }
    }
}

impl UpdaterConfig {
    /// Defaults overlaid with whatever the process environment sets.
    pub fn from_env() -> Self {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from `lookup`; blank values are ignored.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        if let Some(key) = get(ENV_CURSEFORGE_API_KEY) {
            debug!("CurseForge API key taken from {}", ENV_CURSEFORGE_API_KEY);
            self.curseforge_api_key = Some(key);
        }
        if let Some(url) = get(ENV_MODRINTH_API) {
            self.modrinth_api = url;
        }
        if let Some(url) = get(ENV_CURSEFORGE_API) {
            self.curseforge_api = url;
        }
        if let Some(agent) = get(ENV_USER_AGENT) {
            self.user_agent = agent;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults_point_at_public_apis() {
        let config = UpdaterConfig::default();
        assert_eq!(config.modrinth_api, "https://api.modrinth.com/v2");
        assert_eq!(config.curseforge_api, "https://api.curseforge.com/v1");
        assert!(config.curseforge_api_key.is_none());
        assert_eq!(config.search_page_size, 10);
        assert_eq!(config.curseforge_files_page_size, 20);
    }

    #[test]
    fn overrides_replace_defaults_and_skip_blanks() {
        let env: HashMap<&str, &str> = HashMap::from([
            (ENV_CURSEFORGE_API_KEY, " secret "),
            (ENV_MODRINTH_API, "http://localhost:8080/v2"),
            (ENV_USER_AGENT, "   "),
        ]);

        let config =
            UpdaterConfig::default().with_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.curseforge_api_key.as_deref(), Some("secret"));
        assert_eq!(config.modrinth_api, "http://localhost:8080/v2");
        assert_eq!(config.curseforge_api, CURSEFORGE_API);
        assert_eq!(config.user_agent, APP_USER_AGENT);
    }

    #[test]
    fn partial_json_fills_defaults_and_never_echoes_key() {
        let config: UpdaterConfig =
            serde_json::from_str(r#"{ "default_loaders": ["forge", "neoforge"] }"#).unwrap();
        assert_eq!(
            config.default_loaders,
            vec![ModLoader::Forge, ModLoader::NeoForge]
        );
        assert_eq!(config.search_page_size, 10);

        let config = UpdaterConfig {
            curseforge_api_key: Some("secret".into()),
            ..UpdaterConfig::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("secret"));
    }
}
