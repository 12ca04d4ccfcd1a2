// ─── Update Session ───
// One user session: uploaded jars in, an update archive out.
//
// The session owns the shared HTTP client and both registry clients. Each
// step is a separate call so a UI can show matches for review (and fix them
// by hand) before resolving and packaging.

use reqwest::Client;
use tracing::{info, warn};

use crate::core::config::UpdaterConfig;
use crate::core::downloader::{ArtifactFetcher, Downloader};
use crate::core::error::UpdaterResult;
use crate::core::http::build_http_client;
use crate::core::matcher::{MatchResult, ModMatcher};
use crate::core::metadata;
use crate::core::mods::{ModDescriptor, ModLoader, UploadedFile};
use crate::core::package::{UpdatePackage, UpdatePackager};
use crate::core::registry::{
    CurseForgeApi, CurseForgeClient, ModrinthApi, ModrinthClient, RegistrySource,
};
use crate::core::resolver::{UpdateOutcome, UpdateProgress, VersionResolver};
use crate::core::version::VersionManifest;

/// Offered when the version manifest cannot be reached.
pub const FALLBACK_GAME_VERSIONS: &[&str] = &[
    "1.20.4", "1.20.3", "1.20.2", "1.20.1", "1.20", "1.19.4", "1.19.3", "1.19.2", "1.19.1",
    "1.19", "1.18.2", "1.18.1", "1.18", "1.17.1", "1.17", "1.16.5", "1.16.4", "1.16.3",
    "1.16.2", "1.16.1", "1.16", "1.15.2", "1.15.1", "1.15", "1.14.4", "1.14.3", "1.14.2",
    "1.14.1", "1.14", "1.12.2", "1.12.1", "1.12",
];

pub struct UpdateSession<M = ModrinthClient, C = CurseForgeClient, F = Downloader> {
    config: UpdaterConfig,
    http_client: Client,
    modrinth: M,
    curseforge: C,
    fetcher: F,
}

impl UpdateSession {
    /// Build the HTTP client and registry clients described by `config`.
    pub fn from_config(config: UpdaterConfig) -> UpdaterResult<Self> {
        let http_client = build_http_client(&config.user_agent)?;

        let modrinth = ModrinthClient::new(
            http_client.clone(),
            config.modrinth_api.clone(),
            config.search_page_size,
        );
        let curseforge = CurseForgeClient::new(
            http_client.clone(),
            config.curseforge_api.clone(),
            config.curseforge_api_key.clone(),
            config.search_page_size,
            config.curseforge_files_page_size,
        );
        if config.curseforge_api_key.is_none() {
            warn!("No CurseForge API key configured, only Modrinth will be searched");
        }

        let fetcher = Downloader::new(http_client.clone());
        Ok(Self::from_parts(config, http_client, modrinth, curseforge, fetcher))
    }
}

impl<M: ModrinthApi, C: CurseForgeApi, F: ArtifactFetcher> UpdateSession<M, C, F> {
    pub fn from_parts(
        config: UpdaterConfig,
        http_client: Client,
        modrinth: M,
        curseforge: C,
        fetcher: F,
    ) -> Self {
        Self {
            config,
            http_client,
            modrinth,
            curseforge,
            fetcher,
        }
    }

    pub fn config(&self) -> &UpdaterConfig {
        &self.config
    }

    /// Extract and match every file, one after another, in input order.
    pub async fn identify(&self, files: &[UploadedFile]) -> Vec<MatchResult> {
        info!("Identifying {} uploaded files", files.len());
        let matcher = ModMatcher::new(&self.modrinth, &self.curseforge);

        let mut results = Vec::with_capacity(files.len());
        for file in files {
            let descriptor = metadata::extract(file);
            results.push(matcher.match_mod(descriptor).await);
        }

        let found = results.iter().filter(|r| r.candidate().is_some()).count();
        info!("Matched {}/{} files", found, files.len());
        results
    }

    /// Attach a registry entry picked by hand to a descriptor.
    pub async fn assign(
        &self,
        descriptor: ModDescriptor,
        source: RegistrySource,
        reference: &str,
    ) -> UpdaterResult<MatchResult> {
        ModMatcher::new(&self.modrinth, &self.curseforge)
            .match_by_reference(descriptor, source, reference)
            .await
    }

    pub async fn update(
        &self,
        matches: &[MatchResult],
        game_versions: &[String],
        loaders: &[ModLoader],
        on_progress: impl FnMut(UpdateProgress),
    ) -> Vec<UpdateOutcome> {
        VersionResolver::new(&self.modrinth, &self.curseforge)
            .resolve_all(matches, game_versions, loaders, on_progress)
            .await
    }

    /// `update` against the configured default versions and loaders.
    pub async fn update_with_defaults(
        &self,
        matches: &[MatchResult],
        on_progress: impl FnMut(UpdateProgress),
    ) -> Vec<UpdateOutcome> {
        self.update(
            matches,
            &self.config.default_game_versions,
            &self.config.default_loaders,
            on_progress,
        )
        .await
    }

    pub async fn package(&self, outcomes: &[UpdateOutcome]) -> UpdaterResult<UpdatePackage> {
        UpdatePackager::new(&self.fetcher).package(outcomes).await
    }

    /// Selectable game versions, newest first.
    pub async fn game_versions(&self) -> Vec<String> {
        match VersionManifest::fetch(&self.http_client, &self.config.version_manifest_url).await {
            Ok(manifest) => manifest.release_ids(),
            Err(e) => {
                warn!("Version manifest unavailable ({}), using built-in list", e);
                FALLBACK_GAME_VERSIONS.iter().map(|v| v.to_string()).collect()
            }
        }
    }
}
