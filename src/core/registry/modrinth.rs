use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::endpoint;
use crate::core::error::{UpdaterError, UpdaterResult};

pub const MODRINTH_API: &str = "https://api.modrinth.com/v2";

const REGISTRY: &str = "Modrinth";
const MOD_FACET: &str = r#"[["project_type:mod"]]"#;

/// A Modrinth project, as returned by both `/search` hits and `/project/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ModrinthProject {
    /// Search hits call this `project_id`.
    #[serde(alias = "project_id")]
    pub id: String,
    #[serde(default)]
    pub slug: Option<String>,
    pub title: String,
    #[serde(default)]
    pub icon_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    hits: Vec<ModrinthProject>,
}

/// One release of a project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModrinthVersion {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    pub version_number: String,
    #[serde(default)]
    pub game_versions: Vec<String>,
    #[serde(default)]
    pub loaders: Vec<String>,
    pub date_published: DateTime<Utc>,
    #[serde(default)]
    pub files: Vec<ModrinthFile>,
}

impl ModrinthVersion {
    /// The file flagged primary, else the first one listed.
    pub fn primary_file(&self) -> Option<&ModrinthFile> {
        self.files
            .iter()
            .find(|f| f.primary)
            .or_else(|| self.files.first())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModrinthFile {
    pub url: String,
    pub filename: String,
    #[serde(default)]
    pub primary: bool,
    #[serde(default)]
    pub hashes: ModrinthHashes,
    #[serde(default)]
    pub size: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModrinthHashes {
    pub sha1: Option<String>,
    pub sha512: Option<String>,
}

/// Read-only view of Modrinth used by the matcher and the resolver.
#[async_trait]
pub trait ModrinthApi: Send + Sync {
    async fn search(&self, query: &str) -> UpdaterResult<Vec<ModrinthProject>>;

    /// Project by id or slug; `None` when Modrinth has no such project.
    async fn project(&self, id_or_slug: &str) -> UpdaterResult<Option<ModrinthProject>>;

    /// Releases compatible with any of the given game versions and loaders.
    /// Empty filter slices are not sent.
    async fn versions(
        &self,
        project_id: &str,
        game_versions: &[String],
        loaders: &[String],
    ) -> UpdaterResult<Vec<ModrinthVersion>>;
}

pub struct ModrinthClient {
    client: Client,
    base_url: String,
    search_limit: u32,
}

impl ModrinthClient {
    pub fn new(client: Client, base_url: impl Into<String>, search_limit: u32) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            search_limit,
        }
    }

    fn status_error(url: &reqwest::Url, status: StatusCode) -> UpdaterError {
        UpdaterError::RegistryStatus {
            registry: REGISTRY,
            url: url.to_string(),
            status: status.as_u16(),
        }
    }
}

#[async_trait]
impl ModrinthApi for ModrinthClient {
    async fn search(&self, query: &str) -> UpdaterResult<Vec<ModrinthProject>> {
        let url = endpoint(REGISTRY, &self.base_url, &["search"])?;
        let limit = self.search_limit.to_string();

        let resp = self
            .client
            .get(url.clone())
            .query(&[("query", query), ("facets", MOD_FACET), ("limit", limit.as_str())])
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(Self::status_error(&url, resp.status()));
        }

        let body = resp.json::<SearchResponse>().await?;
        debug!("Modrinth search {:?}: {} hits", query, body.hits.len());
        Ok(body.hits)
    }

    async fn project(&self, id_or_slug: &str) -> UpdaterResult<Option<ModrinthProject>> {
        let url = endpoint(REGISTRY, &self.base_url, &["project", id_or_slug])?;
        let resp = self.client.get(url.clone()).send().await?;

        if resp.status() == StatusCode::NOT_FOUND {
            debug!("Modrinth has no project {:?}", id_or_slug);
            return Ok(None);
        }
        if !resp.status().is_success() {
            return Err(Self::status_error(&url, resp.status()));
        }

        Ok(Some(resp.json::<ModrinthProject>().await?))
    }

    async fn versions(
        &self,
        project_id: &str,
        game_versions: &[String],
        loaders: &[String],
    ) -> UpdaterResult<Vec<ModrinthVersion>> {
        let url = endpoint(REGISTRY, &self.base_url, &["project", project_id, "version"])?;

        let mut params = Vec::new();
        if !game_versions.is_empty() {
            params.push(("game_versions", serde_json::to_string(game_versions)?));
        }
        if !loaders.is_empty() {
            params.push(("loaders", serde_json::to_string(loaders)?));
        }

        let resp = self.client.get(url.clone()).query(&params).send().await?;

        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(Vec::new());
        }
        if !resp.status().is_success() {
            return Err(Self::status_error(&url, resp.status()));
        }

        let versions = resp.json::<Vec<ModrinthVersion>>().await?;
        debug!(
            "Modrinth versions for {} ({:?} / {:?}): {}",
            project_id,
            game_versions,
            loaders,
            versions.len()
        );
        Ok(versions)
    }
}
