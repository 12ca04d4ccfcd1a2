use serde::{Deserialize, Serialize};

use super::{CurseForgeMod, ModrinthProject};

/// The two catalogs a mod can be matched against.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum RegistrySource {
    Modrinth,
    CurseForge,
}

impl std::fmt::Display for RegistrySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistrySource::Modrinth => write!(f, "Modrinth"),
            RegistrySource::CurseForge => write!(f, "CurseForge"),
        }
    }
}

/// A registry entry under consideration, whichever catalog it came from.
///
/// The matcher and resolver only go through the accessors below, never the
/// registry-specific field names.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "source", content = "entry", rename_all = "lowercase")]
pub enum MatchCandidate {
    Modrinth(ModrinthProject),
    CurseForge(CurseForgeMod),
}

impl MatchCandidate {
    pub fn source(&self) -> RegistrySource {
        match self {
            MatchCandidate::Modrinth(_) => RegistrySource::Modrinth,
            MatchCandidate::CurseForge(_) => RegistrySource::CurseForge,
        }
    }

    pub fn id(&self) -> String {
        match self {
            MatchCandidate::Modrinth(p) => p.id.clone(),
            MatchCandidate::CurseForge(m) => m.id.to_string(),
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            MatchCandidate::Modrinth(p) => &p.title,
            MatchCandidate::CurseForge(m) => &m.name,
        }
    }

    pub fn slug(&self) -> Option<&str> {
        match self {
            MatchCandidate::Modrinth(p) => p.slug.as_deref(),
            MatchCandidate::CurseForge(m) => m.slug.as_deref(),
        }
    }

    pub fn image_url(&self) -> Option<&str> {
        match self {
            MatchCandidate::Modrinth(p) => p.icon_url.as_deref(),
            MatchCandidate::CurseForge(m) => m.logo.as_ref().map(|l| l.url.as_str()),
        }
    }

    /// Public project page.
    pub fn external_ref(&self) -> String {
        match self {
            MatchCandidate::Modrinth(p) => format!(
                "https://modrinth.com/mod/{}",
                p.slug.as_deref().unwrap_or(&p.id)
            ),
            MatchCandidate::CurseForge(m) => {
                if let Some(url) = m.links.as_ref().and_then(|l| l.website_url.clone()) {
                    return url;
                }
                match &m.slug {
                    Some(slug) => format!("https://www.curseforge.com/minecraft/mc-mods/{slug}"),
                    None => format!("https://www.curseforge.com/projects/{}", m.id),
                }
            }
        }
    }
}
