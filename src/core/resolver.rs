// ─── Version Resolver ───
// Release resolution for matched mods.
//
// For every matched mod the newest release compatible with the target game
// versions and loaders is looked up on the registry the mod was matched on.
// Batches run strictly one mod after another and never abort: every input
// yields exactly one outcome.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::core::error::UpdaterResult;
use crate::core::matcher::MatchResult;
use crate::core::mods::{ModDescriptor, ModLoader};
use crate::core::registry::{
    CurseForgeApi, CurseForgeFile, CurseForgeMod, MatchCandidate, ModrinthApi, ModrinthProject,
};

pub const REASON_NOT_MATCHED: &str = "not matched on any registry";
pub const REASON_NO_COMPATIBLE: &str = "no compatible versions found";
pub const REASON_NO_FILES_IN_RELEASE: &str = "release has no downloadable files";
pub const REASON_NO_FILES: &str = "no files found for this mod";

/// A concrete downloadable file picked for a mod.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResolvedRelease {
    pub download_url: String,
    pub filename: String,
    pub version_label: String,
    pub published_at: DateTime<Utc>,
    pub sha1: Option<String>,
}

/// Per-mod result of a resolution batch.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UpdateOutcome {
    pub descriptor: ModDescriptor,
    pub updated: bool,
    pub resolved_release: Option<ResolvedRelease>,
    pub error_reason: Option<String>,
}

impl UpdateOutcome {
    pub fn success(descriptor: ModDescriptor, release: ResolvedRelease) -> Self {
        Self {
            descriptor,
            updated: true,
            resolved_release: Some(release),
            error_reason: None,
        }
    }

    pub fn failure(descriptor: ModDescriptor, reason: impl Into<String>) -> Self {
        Self {
            descriptor,
            updated: false,
            resolved_release: None,
            error_reason: Some(reason.into()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UpdateProgress {
    pub index: usize,
    pub total: usize,
    pub fraction: f64,
    /// Display name of the mod that was just processed.
    pub current: String,
}

/// Outcome of a registry lookup that did not fail at the transport level.
type Lookup = Result<ResolvedRelease, &'static str>;

pub struct VersionResolver<'a, M, C> {
    modrinth: &'a M,
    curseforge: &'a C,
}

impl<'a, M: ModrinthApi, C: CurseForgeApi> VersionResolver<'a, M, C> {
    pub fn new(modrinth: &'a M, curseforge: &'a C) -> Self {
        Self {
            modrinth,
            curseforge,
        }
    }

    /// Resolve the newest compatible release for one match.
    pub async fn resolve(
        &self,
        result: &MatchResult,
        game_versions: &[String],
        loaders: &[ModLoader],
    ) -> UpdateOutcome {
        let descriptor = result.descriptor.clone();
        let Some(candidate) = result.candidate() else {
            return UpdateOutcome::failure(descriptor, REASON_NOT_MATCHED);
        };

        let game_versions = dedup(game_versions);
        let loaders = dedup(loaders);

        let lookup = match candidate {
            MatchCandidate::Modrinth(project) => {
                self.resolve_modrinth(project, &game_versions, &loaders).await
            }
            MatchCandidate::CurseForge(entry) => {
                self.resolve_curseforge(entry, &game_versions, &loaders).await
            }
        };

        match lookup {
            Ok(Ok(release)) => {
                debug!(
                    "Resolved {} to {} ({})",
                    descriptor.file_name, release.filename, release.version_label
                );
                UpdateOutcome::success(descriptor, release)
            }
            Ok(Err(reason)) => {
                info!("Cannot update {}: {}", descriptor.file_name, reason);
                UpdateOutcome::failure(descriptor, reason)
            }
            Err(e) => {
                warn!("Resolving {} failed: {}", descriptor.file_name, e);
                UpdateOutcome::failure(descriptor, format!("update failed: {e}"))
            }
        }
    }

    /// Resolve every match in order, reporting progress after each one.
    pub async fn resolve_all(
        &self,
        matches: &[MatchResult],
        game_versions: &[String],
        loaders: &[ModLoader],
        mut on_progress: impl FnMut(UpdateProgress),
    ) -> Vec<UpdateOutcome> {
        let total = matches.len();
        info!(
            "Resolving {} mods for versions {:?} and loaders {:?}",
            total, game_versions, loaders
        );

        let mut outcomes = Vec::with_capacity(total);
        for (index, result) in matches.iter().enumerate() {
            let outcome = self.resolve(result, game_versions, loaders).await;
            outcomes.push(outcome);

            on_progress(UpdateProgress {
                index,
                total,
                fraction: (index + 1) as f64 / total as f64,
                current: result.descriptor.display_name.clone(),
            });
        }

        let updated = outcomes.iter().filter(|o| o.updated).count();
        info!("Resolved {}/{} mods", updated, total);
        outcomes
    }

    async fn resolve_modrinth(
        &self,
        project: &ModrinthProject,
        game_versions: &[String],
        loaders: &[ModLoader],
    ) -> UpdaterResult<Lookup> {
        let loader_names: Vec<String> = loaders.iter().map(ToString::to_string).collect();
        let releases = self
            .modrinth
            .versions(&project.id, game_versions, &loader_names)
            .await?;

        let Some(latest) = latest_by(&releases, |r| r.date_published) else {
            return Ok(Err(REASON_NO_COMPATIBLE));
        };
        let Some(file) = latest.primary_file() else {
            return Ok(Err(REASON_NO_FILES_IN_RELEASE));
        };

        Ok(Ok(ResolvedRelease {
            download_url: file.url.clone(),
            filename: file.filename.clone(),
            version_label: latest.version_number.clone(),
            published_at: latest.date_published,
            sha1: file.hashes.sha1.clone(),
        }))
    }

    async fn resolve_curseforge(
        &self,
        entry: &CurseForgeMod,
        game_versions: &[String],
        loaders: &[ModLoader],
    ) -> UpdaterResult<Lookup> {
        let mut files = Vec::new();
        let mut seen = HashSet::new();

        for (version, loader_code) in filter_pairs(game_versions, loaders) {
            let page = self
                .curseforge
                .files(entry.id, Some(version), Some(loader_code))
                .await?;
            files.extend(page.into_iter().filter(|f| seen.insert(f.id)));
        }

        if files.is_empty() {
            debug!(
                "No filtered files for CurseForge mod {}, listing all files",
                entry.id
            );
            files = self.curseforge.files(entry.id, None, None).await?;
        }

        let Some(latest) = latest_by(&files, |f| f.file_date) else {
            return Ok(Err(REASON_NO_FILES));
        };

        Ok(release_from_file(latest))
    }
}

fn release_from_file(file: &CurseForgeFile) -> Lookup {
    // Authors can opt out of third-party distribution, which hides the URL.
    let Some(download_url) = file.download_url.clone() else {
        return Err(REASON_NO_FILES_IN_RELEASE);
    };

    Ok(ResolvedRelease {
        download_url,
        filename: file.file_name.clone(),
        version_label: file.display_name.clone(),
        published_at: file.file_date,
        sha1: file.sha1().map(str::to_string),
    })
}

/// Every `(game version, loader code)` pair to query. An empty target set
/// yields no pairs at all.
fn filter_pairs<'v>(game_versions: &'v [String], loaders: &[ModLoader]) -> Vec<(&'v str, u32)> {
    game_versions
        .iter()
        .flat_map(|v| loaders.iter().map(move |l| (v.as_str(), l.curseforge_code())))
        .collect()
}

/// Entry with the greatest timestamp; the earliest one wins a tie.
fn latest_by<T>(items: &[T], timestamp: impl Fn(&T) -> DateTime<Utc>) -> Option<&T> {
    let mut best: Option<&T> = None;
    for item in items {
        if best.map_or(true, |b| timestamp(item) > timestamp(b)) {
            best = Some(item);
        }
    }
    best
}

fn dedup<T: Clone + Eq + std::hash::Hash>(items: &[T]) -> Vec<T> {
    let mut seen = HashSet::new();
    items
        .iter()
        .filter(|item| seen.insert((*item).clone()))
        .cloned()
        .collect()
}
