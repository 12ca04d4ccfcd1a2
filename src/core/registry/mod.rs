mod candidate;
mod curseforge;
mod modrinth;

#[cfg(test)]
pub(crate) mod fake;

pub use candidate::{MatchCandidate, RegistrySource};
pub use curseforge::{
    CurseForgeApi, CurseForgeClient, CurseForgeFile, CurseForgeHash, CurseForgeLinks,
    CurseForgeLogo, CurseForgeMod, CURSEFORGE_API,
};
pub use modrinth::{
    ModrinthApi, ModrinthClient, ModrinthFile, ModrinthHashes, ModrinthProject, ModrinthVersion,
    MODRINTH_API,
};

use reqwest::Url;

use crate::core::error::{UpdaterError, UpdaterResult};

/// Join percent-encoded path segments onto a registry base URL.
pub(crate) fn endpoint(registry: &str, base_url: &str, segments: &[&str]) -> UpdaterResult<Url> {
    let invalid = || UpdaterError::Other(format!("Invalid {registry} base URL: {base_url}"));

    let mut url = Url::parse(base_url).map_err(|_| invalid())?;
    url.path_segments_mut()
        .map_err(|_| invalid())?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_appends_segments() {
        let url = endpoint("Modrinth", MODRINTH_API, &["project", "sodium", "version"]).unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.modrinth.com/v2/project/sodium/version"
        );
    }

    #[test]
    fn endpoint_encodes_unsafe_ids() {
        let url = endpoint("Modrinth", "https://api.modrinth.com/v2/", &["project", "a b/c"]).unwrap();
        assert_eq!(url.as_str(), "https://api.modrinth.com/v2/project/a%20b%2Fc");
    }

    #[test]
    fn endpoint_rejects_bad_base() {
        assert!(endpoint("CurseForge", "not a url", &["mods"]).is_err());
    }
}
