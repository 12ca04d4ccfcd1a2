use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::error::{UpdaterError, UpdaterResult};

/// Mod loaders a jar can declare.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ModLoader {
    Forge,
    Fabric,
    Quilt,
    NeoForge,
}

impl ModLoader {
    pub const ALL: [ModLoader; 4] = [
        ModLoader::Forge,
        ModLoader::Fabric,
        ModLoader::Quilt,
        ModLoader::NeoForge,
    ];

    /// CurseForge `modLoaderType` code.
    pub fn curseforge_code(self) -> u32 {
        match self {
            ModLoader::Forge => 1,
            ModLoader::Fabric => 4,
            ModLoader::Quilt => 5,
            ModLoader::NeoForge => 6,
        }
    }
}

impl std::fmt::Display for ModLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModLoader::Forge => write!(f, "forge"),
            ModLoader::Fabric => write!(f, "fabric"),
            ModLoader::Quilt => write!(f, "quilt"),
            ModLoader::NeoForge => write!(f, "neoforge"),
        }
    }
}

impl FromStr for ModLoader {
    type Err = UpdaterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "forge" => Ok(ModLoader::Forge),
            "fabric" => Ok(ModLoader::Fabric),
            "quilt" => Ok(ModLoader::Quilt),
            "neoforge" => Ok(ModLoader::NeoForge),
            other => Err(UpdaterError::Other(format!("Unknown mod loader: {other}"))),
        }
    }
}

/// A file handed over by the upload collaborator. Only the name and the raw
/// bytes are consumed by the pipeline.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    /// Read a jar from disk, keeping only its file name.
    pub async fn from_path(path: &Path) -> UpdaterResult<Self> {
        let bytes = tokio::fs::read(path).await.map_err(|e| UpdaterError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        Ok(Self { name, bytes })
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// Normalized identity of one uploaded mod, produced once by the extractor.
///
/// `display_name` is never empty.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ModDescriptor {
    /// Name of the uploaded file this descriptor was built from.
    pub file_name: String,
    pub display_name: String,
    pub declared_version: Option<String>,
    /// Loader-native mod id (`modId`, `id`, `modid`), not a registry id.
    pub registry_id: Option<String>,
    pub loader_hint: Option<ModLoader>,
}

impl ModDescriptor {
    /// Descriptor carrying nothing but a name, used when no metadata could be read.
    pub fn from_name(file_name: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            display_name: display_name.into(),
            declared_version: None,
            registry_id: None,
            loader_hint: None,
        }
    }
}
