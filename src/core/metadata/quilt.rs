use serde::Deserialize;

use super::reader::{non_empty, MetadataReader, RawMetadata};
use crate::core::mods::ModLoader;

/// Subset of `quilt.mod.json`.
#[derive(Debug, Deserialize)]
pub struct QuiltModJson {
    pub quilt_loader: QuiltLoaderSection,
}

#[derive(Debug, Deserialize)]
pub struct QuiltLoaderSection {
    pub id: Option<String>,
    pub version: Option<String>,
    pub metadata: Option<QuiltDisplayMetadata>,
}

#[derive(Debug, Deserialize)]
pub struct QuiltDisplayMetadata {
    pub name: Option<String>,
}

pub struct QuiltReader;

impl MetadataReader for QuiltReader {
    fn entry_path(&self) -> &'static str {
        "quilt.mod.json"
    }

    fn loader(&self) -> ModLoader {
        ModLoader::Quilt
    }

    fn parse(&self, content: &str) -> Option<RawMetadata> {
        let json: QuiltModJson = serde_json::from_str(content).ok()?;
        let section = json.quilt_loader;
        let name = section.metadata.and_then(|m| m.name);

        Some(RawMetadata {
            mod_id: non_empty(section.id.as_deref()),
            version: non_empty(section.version.as_deref()),
            name: non_empty(name.as_deref()),
        })
    }
}
