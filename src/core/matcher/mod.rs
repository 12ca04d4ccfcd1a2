// ─── Registry Matcher ───
// Registry matching for extracted descriptors.
//
// Order of attempts, stopping at the first hit:
//   1. direct Modrinth lookup by the jar's declared mod id (raw, then slugified)
//   2. for each name variant: Modrinth search, then CurseForge search
//   3. not found
//
// Registry failures never abort a match; they count as empty results.

mod selection;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::core::error::{UpdaterError, UpdaterResult};
use crate::core::mods::ModDescriptor;
use crate::core::naming;
use crate::core::registry::{
    CurseForgeApi, MatchCandidate, ModrinthApi, ModrinthProject, RegistrySource,
};

pub use selection::{
    fuzzy_distance, select_candidate, Selection, SelectionTier, FUZZY_ACCEPT_THRESHOLD,
};

/// Where a descriptor stands in the matching flow.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "status", content = "candidate", rename_all = "snake_case")]
pub enum MatchState {
    Found(MatchCandidate),
    NotFound,
    /// Shown while a match is in flight; the matcher never returns it.
    Pending,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MatchResult {
    pub descriptor: ModDescriptor,
    pub state: MatchState,
}

impl MatchResult {
    pub fn pending(descriptor: ModDescriptor) -> Self {
        Self {
            descriptor,
            state: MatchState::Pending,
        }
    }

    pub fn found(descriptor: ModDescriptor, candidate: MatchCandidate) -> Self {
        Self {
            descriptor,
            state: MatchState::Found(candidate),
        }
    }

    pub fn not_found(descriptor: ModDescriptor) -> Self {
        Self {
            descriptor,
            state: MatchState::NotFound,
        }
    }

    pub fn candidate(&self) -> Option<&MatchCandidate> {
        match &self.state {
            MatchState::Found(candidate) => Some(candidate),
            _ => None,
        }
    }

    pub fn source(&self) -> Option<RegistrySource> {
        self.candidate().map(MatchCandidate::source)
    }
}

/// Lowercase the id and collapse every run of other characters into one
/// hyphen: `Better_Foliage` → `better-foliage`.
pub fn slugify(id: &str) -> String {
    let mut slug = String::with_capacity(id.len());
    for c in id.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.ends_with('-') {
            slug.push('-');
        }
    }
    slug.trim_matches('-').to_string()
}

pub struct ModMatcher<'a, M, C> {
    modrinth: &'a M,
    curseforge: &'a C,
}

impl<'a, M: ModrinthApi, C: CurseForgeApi> ModMatcher<'a, M, C> {
    pub fn new(modrinth: &'a M, curseforge: &'a C) -> Self {
        Self {
            modrinth,
            curseforge,
        }
    }

    /// Find the registry entry behind one descriptor.
    pub async fn match_mod(&self, descriptor: ModDescriptor) -> MatchResult {
        if let Some(registry_id) = descriptor.registry_id.as_deref() {
            if let Some(project) = self.lookup_direct(registry_id).await {
                info!(
                    "Matched {} to Modrinth project {} by mod id",
                    descriptor.file_name, project.title
                );
                return MatchResult::found(descriptor, MatchCandidate::Modrinth(project));
            }
        }

        let registry_id = descriptor.registry_id.as_deref();
        let variants = naming::generate_variants(&descriptor.display_name);
        debug!("Search variants for {}: {:?}", descriptor.file_name, variants);

        for query in &variants {
            let hits = self.search_modrinth(query).await;
            if let Some(selection) = select_candidate(query, registry_id, &hits) {
                return self.accept(descriptor, query, selection);
            }

            let hits = self.search_curseforge(query).await;
            if let Some(selection) = select_candidate(query, registry_id, &hits) {
                return self.accept(descriptor, query, selection);
            }
        }

        info!(
            "No registry match for {} ({})",
            descriptor.file_name, descriptor.display_name
        );
        MatchResult::not_found(descriptor)
    }

    /// Attach a registry entry the user picked by hand (a Modrinth id/slug or
    /// a CurseForge numeric id). Unlike `match_mod`, registry errors surface.
    pub async fn match_by_reference(
        &self,
        descriptor: ModDescriptor,
        source: RegistrySource,
        reference: &str,
    ) -> UpdaterResult<MatchResult> {
        let reference = reference.trim();
        let candidate = match source {
            RegistrySource::Modrinth => self
                .modrinth
                .project(reference)
                .await?
                .map(MatchCandidate::Modrinth),
            RegistrySource::CurseForge => {
                let mod_id = reference.parse::<u64>().map_err(|_| {
                    UpdaterError::Other(format!("Invalid CurseForge mod id: {reference}"))
                })?;
                self.curseforge
                    .get_mod(mod_id)
                    .await?
                    .map(MatchCandidate::CurseForge)
            }
        };

        Ok(match candidate {
            Some(candidate) => MatchResult::found(descriptor, candidate),
            None => MatchResult::not_found(descriptor),
        })
    }

    fn accept(
        &self,
        descriptor: ModDescriptor,
        query: &str,
        selection: Selection<'_>,
    ) -> MatchResult {
        let candidate = selection.candidate.clone();
        info!(
            "Matched {} to {} entry {} via {:?} (query {:?})",
            descriptor.file_name,
            candidate.source(),
            candidate.display_name(),
            selection.tier,
            query
        );
        MatchResult::found(descriptor, candidate)
    }

    async fn lookup_direct(&self, registry_id: &str) -> Option<ModrinthProject> {
        match self.modrinth.project(registry_id).await {
            Ok(Some(project)) => return Some(project),
            Ok(None) => {}
            Err(e) => warn!("Modrinth lookup for {:?} failed: {}", registry_id, e),
        }

        let slug = slugify(registry_id);
        if slug.is_empty() || slug == registry_id {
            return None;
        }

        match self.modrinth.project(&slug).await {
            Ok(project) => project,
            Err(e) => {
                warn!("Modrinth lookup for {:?} failed: {}", slug, e);
                None
            }
        }
    }

    async fn search_modrinth(&self, query: &str) -> Vec<MatchCandidate> {
        match self.modrinth.search(query).await {
            Ok(hits) => hits.into_iter().map(MatchCandidate::Modrinth).collect(),
            Err(e) => {
                warn!("Modrinth search for {:?} failed: {}", query, e);
                Vec::new()
            }
        }
    }

    async fn search_curseforge(&self, query: &str) -> Vec<MatchCandidate> {
        match self.curseforge.search(query).await {
            Ok(hits) => hits.into_iter().map(MatchCandidate::CurseForge).collect(),
            Err(e) => {
                warn!("CurseForge search for {:?} failed: {}", query, e);
                Vec::new()
            }
        }
    }
}
