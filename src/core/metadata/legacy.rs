use serde_json::Value;

use super::reader::{non_empty, MetadataReader, RawMetadata};
use crate::core::mods::ModLoader;

/// Pre-1.13 Forge `mcmod.info`.
///
/// Seen in three shapes: a bare object, an array of objects, and the v2
/// `{"modListVersion": 2, "modList": [...]}` wrapper. Only the first mod of a
/// list is used.
pub struct McmodInfoReader;

impl McmodInfoReader {
    fn first_entry(value: &Value) -> Option<&Value> {
        match value {
            Value::Array(entries) => entries.first(),
            Value::Object(map) => match map.get("modList") {
                Some(Value::Array(entries)) => entries.first(),
                _ => Some(value),
            },
            _ => None,
        }
    }
}

impl MetadataReader for McmodInfoReader {
    fn entry_path(&self) -> &'static str {
        "mcmod.info"
    }

    fn loader(&self) -> ModLoader {
        ModLoader::Forge
    }

    fn parse(&self, content: &str) -> Option<RawMetadata> {
        let value: Value = serde_json::from_str(content).ok()?;
        let entry = Self::first_entry(&value)?.as_object()?;
        let field = |key: &str| non_empty(entry.get(key).and_then(Value::as_str));

        Some(RawMetadata {
            mod_id: field("modid"),
            version: field("version"),
            name: field("name"),
        })
    }
}
