// ─── Name Normalizer ───
// Search-name derivation for mod jars.
//
// Release jars are named `<name>-<loader>-<mc version>-<mod version>.jar` in a
// dozen slightly different ways. `extract_search_name` peels those suffixes off
// so that only the human part of the name is sent to the registries, and
// `generate_variants` spells that name the ways registries tend to store it.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

static RE_ARCHIVE_EXT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\.(jar|zip)$").expect("Invalid regex"));

/// Suffix rules, applied once each and in this order.
static SUFFIX_RULES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        // -1.2.3, _1.20.1-forge-15.2.0
        r"(?i)[-_+]\d+\.\d+[\d\w.\-+]*$",
        // -v1.2.3-beta
        r"(?i)[-_+]v?\d+\.\d+[\d\w.\-+]*$",
        // -[1.20.1]
        r"(?i)[-_+]\[.*?\]$",
        // -(fabric)
        r"(?i)[-_+]\(.*?\)$",
        // -mc1.20.1, -minecraft-1.19
        r"(?i)[-_+](mc|minecraft)[-_+]?\d+\.\d+[\d\w.\-+]*$",
        r"(?i)[-_+](forge|fabric|quilt|neoforge)$",
        r"(?i)[-_+](forge|fabric|quilt|neoforge)[-_+]\d+\.\d+[\d\w.\-+]*$",
        r"(?i)[-_+](client|server|universal|api|lib|core)$",
        r"(?i)[-_+](mod|addon|plugin)$",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("Invalid regex"))
    .collect()
});

static RE_SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[-_+]+").expect("Invalid regex"));

static RE_WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("Invalid regex"));

static RE_GENERIC_WORDS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(mod|addon|plugin|api|lib|core)\b").expect("Invalid regex")
});

/// File name without its `.jar`/`.zip` extension.
pub fn strip_archive_extension(file_name: &str) -> &str {
    match RE_ARCHIVE_EXT.find(file_name) {
        Some(ext) => &file_name[..ext.start()],
        None => file_name,
    }
}

/// Derive a registry search name from a raw jar file name.
///
/// May return an empty string when the whole name is made of version and
/// classifier noise; callers fall back to the plain stem in that case.
pub fn extract_search_name(file_name: &str) -> String {
    let mut name = strip_archive_extension(file_name).to_string();

    for rule in SUFFIX_RULES.iter() {
        name = rule.replace(&name, "").into_owned();
    }

    RE_SEPARATORS.replace_all(&name, " ").trim().to_string()
}

/// Expand a base name into the spellings registries commonly use.
///
/// The base name is always first; the result is deduplicated in order and
/// never contains empty strings.
pub fn generate_variants(base_name: &str) -> Vec<String> {
    let mut variants = vec![
        base_name.to_string(),
        RE_WHITESPACE.replace_all(base_name, "-").into_owned(),
        RE_WHITESPACE.replace_all(base_name, "_").into_owned(),
        RE_WHITESPACE.replace_all(base_name, "").into_owned(),
    ];

    let without_generic = RE_GENERIC_WORDS.replace_all(base_name, "");
    let without_generic = RE_WHITESPACE
        .replace_all(without_generic.trim(), " ")
        .into_owned();
    if !without_generic.is_empty() && without_generic != base_name {
        variants.push(without_generic);
    }

    let mut seen = HashSet::new();
    variants
        .into_iter()
        .filter(|v| !v.is_empty() && seen.insert(v.clone()))
        .collect()
}
