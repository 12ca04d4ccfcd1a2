// ─── Version Manifest ───
// Fetches the Mojang version manifest v2 to list selectable game versions.

use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use tracing::info;

use crate::core::error::{UpdaterError, UpdaterResult};

pub const VERSION_MANIFEST_URL: &str =
    "https://piston-meta.mojang.com/mc/game/version_manifest_v2.json";

/// Top-level Mojang version manifest.
#[derive(Debug, Deserialize)]
pub struct VersionManifest {
    pub latest: LatestVersions,
    pub versions: Vec<VersionEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LatestVersions {
    pub release: String,
    pub snapshot: String,
}

/// A single entry in the manifest.
#[derive(Debug, Clone, Deserialize)]
pub struct VersionEntry {
    pub id: String,
    #[serde(rename = "type")]
    pub version_type: String,
    #[serde(rename = "releaseTime")]
    pub release_time: DateTime<Utc>,
}

impl VersionManifest {
    /// Fetch the version manifest using the shared HTTP client.
    pub async fn fetch(client: &Client, url: &str) -> UpdaterResult<Self> {
        info!("Fetching Minecraft version manifest...");

        let response = client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(UpdaterError::DownloadFailed {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let manifest: VersionManifest = response.json().await?;
        info!("Loaded {} versions from manifest", manifest.versions.len());
        Ok(manifest)
    }

    /// Release version ids, newest first.
    pub fn release_ids(&self) -> Vec<String> {
        let mut releases: Vec<&VersionEntry> = self
            .versions
            .iter()
            .filter(|v| v.version_type == "release")
            .collect();
        releases.sort_by(|a, b| b.release_time.cmp(&a.release_time));
        releases.into_iter().map(|v| v.id.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MANIFEST: &str = r#"{
        "latest": { "release": "1.20.4", "snapshot": "24w03a" },
        "versions": [
            { "id": "24w03a", "type": "snapshot", "url": "https://example.com/a.json",
              "time": "2024-01-17T13:00:00+00:00", "releaseTime": "2024-01-17T12:00:00+00:00" },
            { "id": "1.20.1", "type": "release", "url": "https://example.com/b.json",
              "time": "2023-06-12T13:00:00+00:00", "releaseTime": "2023-06-12T13:25:51+00:00" },
            { "id": "1.20.4", "type": "release", "url": "https://example.com/c.json",
              "time": "2023-12-07T12:00:00+00:00", "releaseTime": "2023-12-07T12:56:20+00:00" },
            { "id": "b1.7.3", "type": "old_beta", "url": "https://example.com/d.json",
              "time": "2011-07-08T00:00:00+00:00", "releaseTime": "2011-07-08T00:00:00+00:00" }
        ]
    }"#;

    #[test]
    fn release_ids_are_newest_first() {
        let manifest: VersionManifest = serde_json::from_str(MANIFEST).unwrap();
        assert_eq!(manifest.latest.release, "1.20.4");
        assert_eq!(manifest.release_ids(), vec!["1.20.4", "1.20.1"]);
    }
}
