use std::sync::LazyLock;

use regex::Regex;

use super::reader::{non_empty, MetadataReader, RawMetadata};
use crate::core::mods::ModLoader;

static RE_MOD_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?m)^\s*modId\s*=\s*["']([^"']+)["']"#).expect("Invalid regex")
});
static RE_VERSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?m)^\s*version\s*=\s*["']([^"']+)["']"#).expect("Invalid regex")
});
static RE_DISPLAY_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?m)^\s*displayName\s*=\s*["']([^"']+)["']"#).expect("Invalid regex")
});

/// Pattern search over a `mods.toml`-style file.
///
/// The first quoted assignment of each key wins, which is the `[[mods]]` entry
/// in every jar seen in practice. No TOML parser is involved: many jars ship
/// files that a strict parser rejects.
pub(super) fn parse_mods_toml(content: &str) -> Option<RawMetadata> {
    let capture = |re: &Regex| {
        let value = re
            .captures(content)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str());
        non_empty(value)
    };

    let raw = RawMetadata {
        mod_id: capture(&RE_MOD_ID),
        version: capture(&RE_VERSION),
        name: capture(&RE_DISPLAY_NAME),
    };

    if raw == RawMetadata::default() {
        return None;
    }
    Some(raw)
}

pub struct ModsTomlReader;

impl MetadataReader for ModsTomlReader {
    fn entry_path(&self) -> &'static str {
        "META-INF/mods.toml"
    }

    fn loader(&self) -> ModLoader {
        ModLoader::Forge
    }

    fn parse(&self, content: &str) -> Option<RawMetadata> {
        parse_mods_toml(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const JEI_TOML: &str = r#"
modLoader="javafml"
loaderVersion="[47,)"
license="MIT"

[[mods]]
modId="jei"
version="15.2.0.27"
displayName='Just Enough Items'
description='''
JEI is an item and recipe viewing mod for Minecraft.
'''

[[dependencies.jei]]
    modId="forge"
    mandatory=true
    versionRange="[47.1.3,)"
"#;

    #[test]
    fn reads_first_mod_entry() {
        let raw = parse_mods_toml(JEI_TOML).unwrap();
        assert_eq!(raw.mod_id.as_deref(), Some("jei"));
        assert_eq!(raw.version.as_deref(), Some("15.2.0.27"));
        assert_eq!(raw.name.as_deref(), Some("Just Enough Items"));
    }

    #[test]
    fn loader_version_is_not_mistaken_for_version() {
        let raw = parse_mods_toml("loaderVersion=\"[47,)\"\nmodId=\"x\"\n").unwrap();
        assert_eq!(raw.version, None);
    }

    #[test]
    fn file_without_known_keys_is_absent() {
        assert!(parse_mods_toml("license=\"MIT\"\n").is_none());
        assert!(parse_mods_toml("").is_none());
    }
}
