use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::endpoint;
use crate::core::error::{UpdaterError, UpdaterResult};

pub const CURSEFORGE_API: &str = "https://api.curseforge.com/v1";

const REGISTRY: &str = "CurseForge";
const API_KEY_HEADER: &str = "x-api-key";
const MINECRAFT_GAME_ID: &str = "432";
const MC_MODS_CLASS_ID: &str = "6";
/// `hashes[].algo` value for SHA-1.
const HASH_ALGO_SHA1: u32 = 1;

/// A CurseForge mod. Only the fields the pipeline reads.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CurseForgeMod {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub logo: Option<CurseForgeLogo>,
    #[serde(default)]
    pub links: Option<CurseForgeLinks>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CurseForgeLogo {
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CurseForgeLinks {
    #[serde(default)]
    pub website_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurseForgeFile {
    pub id: u64,
    pub display_name: String,
    pub file_name: String,
    pub file_date: DateTime<Utc>,
    /// `null` when the author disabled third-party distribution.
    #[serde(default)]
    pub download_url: Option<String>,
    #[serde(default)]
    pub hashes: Vec<CurseForgeHash>,
    #[serde(default)]
    pub game_versions: Vec<String>,
}

impl CurseForgeFile {
    pub fn sha1(&self) -> Option<&str> {
        self.hashes
            .iter()
            .find(|h| h.algo == HASH_ALGO_SHA1)
            .map(|h| h.value.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurseForgeHash {
    pub value: String,
    pub algo: u32,
}

/// CurseForge wraps every payload in `{"data": ...}`.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: T,
}

/// Read-only view of CurseForge used by the matcher and the resolver.
#[async_trait]
pub trait CurseForgeApi: Send + Sync {
    async fn search(&self, query: &str) -> UpdaterResult<Vec<CurseForgeMod>>;

    /// Mod by numeric id; `None` when CurseForge has no such mod.
    async fn get_mod(&self, mod_id: u64) -> UpdaterResult<Option<CurseForgeMod>>;

    /// Files of a mod, optionally narrowed to one game version and one
    /// `modLoaderType` code.
    async fn files(
        &self,
        mod_id: u64,
        game_version: Option<&str>,
        loader_code: Option<u32>,
    ) -> UpdaterResult<Vec<CurseForgeFile>>;
}

pub struct CurseForgeClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    search_page_size: u32,
    files_page_size: u32,
}

impl CurseForgeClient {
    pub fn new(
        client: Client,
        base_url: impl Into<String>,
        api_key: Option<String>,
        search_page_size: u32,
        files_page_size: u32,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            search_page_size,
            files_page_size,
        }
    }

    fn authorized(&self, url: reqwest::Url) -> UpdaterResult<RequestBuilder> {
        let key = self
            .api_key
            .as_deref()
            .ok_or(UpdaterError::MissingCredential(REGISTRY))?;
        Ok(self.client.get(url).header(API_KEY_HEADER, key))
    }

    /// Send and unwrap the `data` envelope; `None` on 404.
    async fn fetch<T: DeserializeOwned>(
        &self,
        url: reqwest::Url,
        query: &[(&str, String)],
    ) -> UpdaterResult<Option<T>> {
        let resp = self.authorized(url.clone())?.query(query).send().await?;

        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !resp.status().is_success() {
            return Err(UpdaterError::RegistryStatus {
                registry: REGISTRY,
                url: url.to_string(),
                status: resp.status().as_u16(),
            });
        }

        Ok(Some(resp.json::<Envelope<T>>().await?.data))
    }
}

#[async_trait]
impl CurseForgeApi for CurseForgeClient {
    async fn search(&self, query: &str) -> UpdaterResult<Vec<CurseForgeMod>> {
        let url = endpoint(REGISTRY, &self.base_url, &["mods", "search"])?;
        let params = [
            ("gameId", MINECRAFT_GAME_ID.to_string()),
            ("classId", MC_MODS_CLASS_ID.to_string()),
            ("searchFilter", query.to_string()),
            ("pageSize", self.search_page_size.to_string()),
        ];

        let mods: Vec<CurseForgeMod> = self.fetch(url, &params).await?.unwrap_or_default();
        debug!("CurseForge search {:?}: {} hits", query, mods.len());
        Ok(mods)
    }

    async fn get_mod(&self, mod_id: u64) -> UpdaterResult<Option<CurseForgeMod>> {
        let id = mod_id.to_string();
        let url = endpoint(REGISTRY, &self.base_url, &["mods", id.as_str()])?;
        self.fetch(url, &[]).await
    }

    async fn files(
        &self,
        mod_id: u64,
        game_version: Option<&str>,
        loader_code: Option<u32>,
    ) -> UpdaterResult<Vec<CurseForgeFile>> {
        let id = mod_id.to_string();
        let url = endpoint(REGISTRY, &self.base_url, &["mods", id.as_str(), "files"])?;

        let mut params = vec![("pageSize", self.files_page_size.to_string())];
        if let Some(version) = game_version {
            params.push(("gameVersion", version.to_string()));
        }
        if let Some(code) = loader_code {
            params.push(("modLoaderType", code.to_string()));
        }

        let files: Vec<CurseForgeFile> = self.fetch(url, &params).await?.unwrap_or_default();
        debug!(
            "CurseForge files for {} ({:?} / {:?}): {}",
            mod_id,
            game_version,
            loader_code,
            files.len()
        );
        Ok(files)
    }
}
