pub mod manifest;

pub use manifest::{LatestVersions, VersionEntry, VersionManifest, VERSION_MANIFEST_URL};
