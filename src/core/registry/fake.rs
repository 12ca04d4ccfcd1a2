// ─── Registry Fakes ───
// In-memory registries for pipeline tests. Every call is logged so tests can
// assert on what was (and was not) queried.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::{
    CurseForgeApi, CurseForgeFile, CurseForgeHash, CurseForgeMod, ModrinthApi, ModrinthFile,
    ModrinthHashes, ModrinthProject, ModrinthVersion,
};
use crate::core::error::{UpdaterError, UpdaterResult};

pub fn project(id: &str, slug: &str, title: &str) -> ModrinthProject {
    ModrinthProject {
        id: id.into(),
        slug: Some(slug.into()),
        title: title.into(),
        icon_url: None,
    }
}

pub fn cf_mod(id: u64, slug: &str, name: &str) -> CurseForgeMod {
    CurseForgeMod {
        id,
        name: name.into(),
        slug: Some(slug.into()),
        logo: None,
        links: None,
    }
}

pub fn timestamp(raw: &str) -> DateTime<Utc> {
    raw.parse().unwrap()
}

pub fn release(version_number: &str, published: &str, files: &[(&str, bool)]) -> ModrinthVersion {
    ModrinthVersion {
        id: format!("v-{version_number}"),
        name: None,
        version_number: version_number.into(),
        game_versions: vec![],
        loaders: vec![],
        date_published: timestamp(published),
        files: files
            .iter()
            .map(|(name, primary)| ModrinthFile {
                url: format!("https://cdn.modrinth.com/{name}"),
                filename: name.to_string(),
                primary: *primary,
                hashes: ModrinthHashes {
                    sha1: Some(format!("sha1-{name}")),
                    sha512: None,
                },
                size: None,
            })
            .collect(),
    }
}

pub fn cf_file(id: u64, file_name: &str, published: &str) -> CurseForgeFile {
    CurseForgeFile {
        id,
        display_name: file_name.trim_end_matches(".jar").into(),
        file_name: file_name.into(),
        file_date: timestamp(published),
        download_url: Some(format!("https://edge.forgecdn.net/files/{id}/{file_name}")),
        hashes: vec![CurseForgeHash {
            value: format!("sha1-{file_name}"),
            algo: 1,
        }],
        game_versions: vec![],
    }
}

#[derive(Default)]
pub struct FakeModrinth {
    pub projects: Vec<ModrinthProject>,
    pub searches: HashMap<String, Vec<ModrinthProject>>,
    pub versions: HashMap<String, Vec<ModrinthVersion>>,
    /// Queries for which `search` returns a transport error.
    pub failing_queries: Vec<String>,
    pub fail_projects: bool,
    pub fail_versions: bool,
    pub calls: Mutex<Vec<String>>,
}

impl FakeModrinth {
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn log(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl ModrinthApi for FakeModrinth {
    async fn search(&self, query: &str) -> UpdaterResult<Vec<ModrinthProject>> {
        self.log(format!("search:{query}"));
        if self.failing_queries.iter().any(|q| q == query) {
            return Err(UpdaterError::Other("connection reset".into()));
        }
        Ok(self.searches.get(query).cloned().unwrap_or_default())
    }

    async fn project(&self, id_or_slug: &str) -> UpdaterResult<Option<ModrinthProject>> {
        self.log(format!("project:{id_or_slug}"));
        if self.fail_projects {
            return Err(UpdaterError::Other("connection reset".into()));
        }
        Ok(self
            .projects
            .iter()
            .find(|p| p.id == id_or_slug || p.slug.as_deref() == Some(id_or_slug))
            .cloned())
    }

    async fn versions(
        &self,
        project_id: &str,
        game_versions: &[String],
        loaders: &[String],
    ) -> UpdaterResult<Vec<ModrinthVersion>> {
        self.log(format!(
            "versions:{project_id}:{}:{}",
            game_versions.join(","),
            loaders.join(",")
        ));
        if self.fail_versions {
            return Err(UpdaterError::Other("connection reset".into()));
        }
        Ok(self.versions.get(project_id).cloned().unwrap_or_default())
    }
}

#[derive(Default)]
pub struct FakeCurseForge {
    pub mods: Vec<CurseForgeMod>,
    pub searches: HashMap<String, Vec<CurseForgeMod>>,
    /// Files keyed by `(game_version, loader_code)`; `(None, None)` is the
    /// unfiltered listing.
    pub files: HashMap<(Option<String>, Option<u32>), Vec<CurseForgeFile>>,
    /// Queries for which `search` returns a transport error.
    pub failing_queries: Vec<String>,
    /// Every call fails the way an unconfigured client does.
    pub missing_key: bool,
    pub fail_files: bool,
    pub calls: Mutex<Vec<String>>,
}

impl FakeCurseForge {
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn log(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl CurseForgeApi for FakeCurseForge {
    async fn search(&self, query: &str) -> UpdaterResult<Vec<CurseForgeMod>> {
        self.log(format!("search:{query}"));
        if self.missing_key {
            return Err(UpdaterError::MissingCredential("CurseForge"));
        }
        if self.failing_queries.iter().any(|q| q == query) {
            return Err(UpdaterError::Other("connection reset".into()));
        }
        Ok(self.searches.get(query).cloned().unwrap_or_default())
    }

    async fn get_mod(&self, mod_id: u64) -> UpdaterResult<Option<CurseForgeMod>> {
        self.log(format!("mod:{mod_id}"));
        if self.missing_key {
            return Err(UpdaterError::MissingCredential("CurseForge"));
        }
        Ok(self.mods.iter().find(|m| m.id == mod_id).cloned())
    }

    async fn files(
        &self,
        mod_id: u64,
        game_version: Option<&str>,
        loader_code: Option<u32>,
    ) -> UpdaterResult<Vec<CurseForgeFile>> {
        self.log(format!(
            "files:{mod_id}:{}:{}",
            game_version.unwrap_or("*"),
            loader_code.map(|c| c.to_string()).unwrap_or_else(|| "*".into())
        ));
        if self.missing_key {
            return Err(UpdaterError::MissingCredential("CurseForge"));
        }
        if self.fail_files {
            return Err(UpdaterError::Other("connection reset".into()));
        }
        let key = (game_version.map(str::to_string), loader_code);
        Ok(self.files.get(&key).cloned().unwrap_or_default())
    }
}
