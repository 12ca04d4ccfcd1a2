// ─── Metadata Extraction ───
// Embedded metadata extraction for uploaded mod jars.
//
// Loaders ship their descriptors at fixed paths inside the jar. Formats are
// tried in a fixed priority order and the first usable one wins; anything
// unreadable degrades to a name derived from the file name.

mod fabric;
mod forge;
mod legacy;
mod neoforge;
mod quilt;
mod reader;

use std::io::{Cursor, Read, Seek};

use tracing::debug;
use zip::ZipArchive;

use crate::core::mods::{ModDescriptor, UploadedFile};
use crate::core::naming;

pub use reader::{MetadataFormat, MetadataReader, RawMetadata};

/// Metadata files larger than this are not metadata.
const MAX_ENTRY_BYTES: u64 = 1024 * 1024;

const JAR_MANIFEST: &str = "META-INF/MANIFEST.MF";

/// Build the descriptor for one uploaded file. Never fails: a file that is not
/// an archive, or carries no readable metadata, yields a name-only descriptor.
pub fn extract(file: &UploadedFile) -> ModDescriptor {
    let fallback = fallback_display_name(&file.name);

    let mut archive = match ZipArchive::new(Cursor::new(file.bytes.as_slice())) {
        Ok(archive) => archive,
        Err(e) => {
            debug!("{} is not a readable archive ({}), using file name", file.name, e);
            return ModDescriptor::from_name(&file.name, fallback);
        }
    };

    for format in MetadataFormat::priority() {
        let Some(content) = read_entry(&mut archive, format.entry_path()) else {
            continue;
        };

        let Some(raw) = format.parse(&content) else {
            debug!(
                "Ignoring malformed {} in {}",
                format.entry_path(),
                file.name
            );
            continue;
        };

        let version = match raw.version {
            Some(v) if is_build_placeholder(&v) => manifest_version(&mut archive),
            other => other,
        };

        debug!(
            "Read {} from {}: id={:?} version={:?}",
            format.entry_path(),
            file.name,
            raw.mod_id,
            version
        );

        return ModDescriptor {
            file_name: file.name.clone(),
            display_name: raw.name.unwrap_or(fallback),
            declared_version: version,
            registry_id: raw.mod_id,
            loader_hint: Some(format.loader()),
        };
    }

    debug!("No embedded metadata in {}, using file name", file.name);
    ModDescriptor::from_name(&file.name, fallback)
}

/// Name used when the jar does not declare one: the search name derived from
/// the file name, or the bare stem when nothing survives normalization.
pub fn fallback_display_name(file_name: &str) -> String {
    let search_name = naming::extract_search_name(file_name);
    if !search_name.is_empty() {
        return search_name;
    }

    let stem = naming::strip_archive_extension(file_name).trim();
    if !stem.is_empty() {
        return stem.to_string();
    }
    if !file_name.trim().is_empty() {
        return file_name.trim().to_string();
    }
    "unnamed mod".to_string()
}

fn read_entry<R: Read + Seek>(archive: &mut ZipArchive<R>, path: &str) -> Option<String> {
    let file = archive.by_name(path).ok()?;
    let mut content = String::new();
    file.take(MAX_ENTRY_BYTES)
        .read_to_string(&mut content)
        .ok()?;
    Some(content)
}

/// `${file.jarVersion}` and friends, left unexpanded by the build.
fn is_build_placeholder(version: &str) -> bool {
    version.starts_with("${")
}

/// `Implementation-Version` from the jar manifest.
fn manifest_version<R: Read + Seek>(archive: &mut ZipArchive<R>) -> Option<String> {
    let manifest = read_entry(archive, JAR_MANIFEST)?;
    manifest.lines().find_map(|line| {
        let (key, value) = line.split_once(':')?;
        if key.trim() != "Implementation-Version" {
            return None;
        }
        let value = value.trim();
        (!value.is_empty()).then(|| value.to_string())
    })
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    use super::*;
    use crate::core::mods::ModLoader;

    fn jar(name: &str, entries: &[(&str, &str)]) -> UploadedFile {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        for (path, content) in entries {
            writer
                .start_file(path.to_string(), SimpleFileOptions::default())
                .unwrap();
            writer.write_all(content.as_bytes()).unwrap();
        }
        let bytes = writer.finish().unwrap().into_inner();
        UploadedFile::new(name, bytes)
    }

    #[test]
    fn fabric_metadata_maps_to_descriptor() {
        let file = jar(
            "sodium-fabric-0.5.3+mc1.20.1.jar",
            &[(
                "fabric.mod.json",
                r#"{"id": "sodium", "version": "0.5.3+mc1.20.1", "name": "Sodium"}"#,
            )],
        );
        let descriptor = extract(&file);

        assert_eq!(descriptor.file_name, "sodium-fabric-0.5.3+mc1.20.1.jar");
        assert_eq!(descriptor.display_name, "Sodium");
        assert_eq!(descriptor.registry_id.as_deref(), Some("sodium"));
        assert_eq!(descriptor.declared_version.as_deref(), Some("0.5.3+mc1.20.1"));
        assert_eq!(descriptor.loader_hint, Some(ModLoader::Fabric));
    }

    #[test]
    fn first_format_wins_without_merging() {
        let file = jar(
            "both.jar",
            &[
                ("quilt.mod.json", r#"{"quilt_loader": {"id": "q", "version": "2"}}"#),
                ("META-INF/mods.toml", "modId=\"forgeside\"\nversion=\"1.0\"\n"),
            ],
        );
        let descriptor = extract(&file);

        assert_eq!(descriptor.registry_id.as_deref(), Some("forgeside"));
        assert_eq!(descriptor.loader_hint, Some(ModLoader::Forge));
        // mods.toml carried no displayName; quilt's name is not merged in.
        assert_eq!(descriptor.display_name, "both");
    }

    #[test]
    fn malformed_entry_falls_through_to_next_format() {
        let file = jar(
            "journeymap-1.12.2-5.7.1.jar",
            &[
                ("fabric.mod.json", "{ broken"),
                (
                    "mcmod.info",
                    r#"[{"modid": "journeymap", "name": "JourneyMap", "version": "5.7.1"}]"#,
                ),
            ],
        );
        let descriptor = extract(&file);

        assert_eq!(descriptor.registry_id.as_deref(), Some("journeymap"));
        assert_eq!(descriptor.loader_hint, Some(ModLoader::Forge));
    }

    #[test]
    fn quilt_metadata_sets_quilt_hint() {
        let file = jar(
            "qsl.jar",
            &[(
                "quilt.mod.json",
                r#"{"quilt_loader": {"id": "qsl", "version": "6.1.2", "metadata": {"name": "QSL"}}}"#,
            )],
        );
        let descriptor = extract(&file);
        assert_eq!(descriptor.display_name, "QSL");
        assert_eq!(descriptor.loader_hint, Some(ModLoader::Quilt));
    }

    #[test]
    fn neoforge_toml_is_recognized() {
        let file = jar(
            "ae2-neoforge-19.0.1.jar",
            &[(
                "META-INF/neoforge.mods.toml",
                "[[mods]]\nmodId=\"ae2\"\nversion=\"19.0.1\"\ndisplayName=\"Applied Energistics 2\"\n",
            )],
        );
        let descriptor = extract(&file);
        assert_eq!(descriptor.display_name, "Applied Energistics 2");
        assert_eq!(descriptor.loader_hint, Some(ModLoader::NeoForge));
    }

    #[test]
    fn placeholder_version_uses_jar_manifest() {
        let file = jar(
            "waystones.jar",
            &[
                (
                    "META-INF/mods.toml",
                    "modId=\"waystones\"\nversion=\"${file.jarVersion}\"\n",
                ),
                (
                    "META-INF/MANIFEST.MF",
                    "Manifest-Version: 1.0\r\nImplementation-Version: 14.1.3\r\n",
                ),
            ],
        );
        let descriptor = extract(&file);
        assert_eq!(descriptor.declared_version.as_deref(), Some("14.1.3"));
    }

    #[test]
    fn placeholder_version_without_manifest_is_dropped() {
        let file = jar(
            "waystones.jar",
            &[("META-INF/mods.toml", "modId=\"waystones\"\nversion=\"${file.jarVersion}\"\n")],
        );
        assert_eq!(extract(&file).declared_version, None);
    }

    #[test]
    fn non_archive_degrades_to_file_name() {
        let file = UploadedFile::new("examplemod-forge-1.16.5-3.2.1.jar", b"not a zip".to_vec());
        let descriptor = extract(&file);

        assert_eq!(descriptor.display_name, "examplemod");
        assert_eq!(descriptor.registry_id, None);
        assert_eq!(descriptor.loader_hint, None);
    }

    #[test]
    fn archive_without_metadata_degrades_to_file_name() {
        let file = jar("Mouse_Tweaks-2.25.jar", &[("assets/readme.txt", "hi")]);
        let descriptor = extract(&file);
        assert_eq!(descriptor.display_name, "Mouse Tweaks");
        assert_eq!(descriptor.declared_version, None);
    }

    #[test]
    fn fallback_name_is_never_empty() {
        assert_eq!(fallback_display_name("__.jar"), "__");
        assert_eq!(fallback_display_name(".jar"), ".jar");
        assert_eq!(fallback_display_name(""), "unnamed mod");
    }
}
