use serde::Deserialize;

use super::reader::{non_empty, MetadataReader, RawMetadata};
use crate::core::mods::ModLoader;

/// Subset of `fabric.mod.json`.
#[derive(Debug, Deserialize)]
pub struct FabricModJson {
    pub id: Option<String>,
    pub version: Option<String>,
    pub name: Option<String>,
}

pub struct FabricReader;

impl MetadataReader for FabricReader {
    fn entry_path(&self) -> &'static str {
        "fabric.mod.json"
    }

    fn loader(&self) -> ModLoader {
        ModLoader::Fabric
    }

    fn parse(&self, content: &str) -> Option<RawMetadata> {
        let json: FabricModJson = serde_json::from_str(content).ok()?;
        Some(RawMetadata {
            mod_id: non_empty(json.id.as_deref()),
            version: non_empty(json.version.as_deref()),
            name: non_empty(json.name.as_deref()),
        })
    }
}
