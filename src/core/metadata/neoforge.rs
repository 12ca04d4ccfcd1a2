use super::forge::parse_mods_toml;
use super::reader::{MetadataReader, RawMetadata};
use crate::core::mods::ModLoader;

/// NeoForge 20.5+ renamed `mods.toml` but kept its layout.
pub struct NeoForgeTomlReader;

impl MetadataReader for NeoForgeTomlReader {
    fn entry_path(&self) -> &'static str {
        "META-INF/neoforge.mods.toml"
    }

    fn loader(&self) -> ModLoader {
        ModLoader::NeoForge
    }

    fn parse(&self, content: &str) -> Option<RawMetadata> {
        parse_mods_toml(content)
    }
}
