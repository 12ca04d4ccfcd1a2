use crate::core::mods::ModLoader;

use super::{
    fabric::FabricReader, forge::ModsTomlReader, legacy::McmodInfoReader,
    neoforge::NeoForgeTomlReader, quilt::QuiltReader,
};

/// Fields read from one embedded metadata file, before normalization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawMetadata {
    pub mod_id: Option<String>,
    pub version: Option<String>,
    pub name: Option<String>,
}

pub trait MetadataReader {
    /// Path of the metadata entry inside the jar.
    fn entry_path(&self) -> &'static str;

    fn loader(&self) -> ModLoader;

    /// `None` when the content is unusable; the extractor then moves on.
    fn parse(&self, content: &str) -> Option<RawMetadata>;
}

/// Enum dispatcher over the known metadata formats.
pub enum MetadataFormat {
    Fabric(FabricReader),
    ModsToml(ModsTomlReader),
    McmodInfo(McmodInfoReader),
    Quilt(QuiltReader),
    NeoForgeToml(NeoForgeTomlReader),
}

impl MetadataFormat {
    /// Formats in the order they are tried; the first usable one wins.
    pub fn priority() -> [MetadataFormat; 5] {
        [
            MetadataFormat::Fabric(FabricReader),
            MetadataFormat::ModsToml(ModsTomlReader),
            MetadataFormat::McmodInfo(McmodInfoReader),
            MetadataFormat::Quilt(QuiltReader),
            MetadataFormat::NeoForgeToml(NeoForgeTomlReader),
        ]
    }

    fn reader(&self) -> &dyn MetadataReader {
        match self {
            MetadataFormat::Fabric(r) => r,
            MetadataFormat::ModsToml(r) => r,
            MetadataFormat::McmodInfo(r) => r,
            MetadataFormat::Quilt(r) => r,
            MetadataFormat::NeoForgeToml(r) => r,
        }
    }

    pub fn entry_path(&self) -> &'static str {
        self.reader().entry_path()
    }

    pub fn loader(&self) -> ModLoader {
        self.reader().loader()
    }

    pub fn parse(&self, content: &str) -> Option<RawMetadata> {
        self.reader().parse(content)
    }
}

/// Trimmed, non-empty string or nothing.
pub(super) fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
