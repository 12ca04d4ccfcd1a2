use crate::core::registry::MatchCandidate;

/// A fuzzy match is accepted only strictly below this distance.
pub const FUZZY_ACCEPT_THRESHOLD: f64 = 0.4;

/// Which rule picked the candidate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SelectionTier {
    /// Candidate id or slug equals the jar's declared mod id.
    RegistryId,
    /// Candidate name equals the query, ignoring case and separators.
    ExactName,
    /// Closest name under the acceptance threshold; carries the distance.
    Fuzzy(f64),
}

#[derive(Debug, Clone, Copy)]
pub struct Selection<'a> {
    pub candidate: &'a MatchCandidate,
    pub tier: SelectionTier,
}

/// Pick the single best candidate of one result set for one query.
///
/// Tiers are tried in order and the first one that yields a candidate wins,
/// even when a later tier would pick a different entry.
pub fn select_candidate<'a>(
    query: &str,
    registry_id: Option<&str>,
    candidates: &'a [MatchCandidate],
) -> Option<Selection<'a>> {
    if candidates.is_empty() {
        return None;
    }

    if let Some(id) = registry_id {
        if let Some(candidate) = candidates.iter().find(|c| matches_registry_id(c, id)) {
            return Some(Selection {
                candidate,
                tier: SelectionTier::RegistryId,
            });
        }
    }

    if let Some(candidate) = candidates
        .iter()
        .find(|c| names_equal(c.display_name(), query))
    {
        return Some(Selection {
            candidate,
            tier: SelectionTier::ExactName,
        });
    }

    let (candidate, distance) = best_fuzzy(query, candidates)?;
    (distance < FUZZY_ACCEPT_THRESHOLD).then_some(Selection {
        candidate,
        tier: SelectionTier::Fuzzy(distance),
    })
}

fn matches_registry_id(candidate: &MatchCandidate, registry_id: &str) -> bool {
    let id_lower = registry_id.to_lowercase();
    if candidate.id().to_lowercase() == id_lower {
        return true;
    }

    let Some(slug) = candidate.slug() else {
        return false;
    };
    if slug.to_lowercase() == id_lower {
        return true;
    }

    let id_alnum = alphanumeric_lowercase(registry_id);
    !id_alnum.is_empty() && alphanumeric_lowercase(slug) == id_alnum
}

fn names_equal(name: &str, query: &str) -> bool {
    let name = name.to_lowercase();
    let query = query.to_lowercase();
    if name == query {
        return true;
    }

    let query = strip_separators(&query);
    !query.is_empty() && strip_separators(&name) == query
}

/// Best (lowest) distance over each candidate's name and slug. Earlier
/// candidates win ties.
fn best_fuzzy<'a>(
    query: &str,
    candidates: &'a [MatchCandidate],
) -> Option<(&'a MatchCandidate, f64)> {
    let mut best: Option<(&MatchCandidate, f64)> = None;

    for candidate in candidates {
        let mut distance = fuzzy_distance(query, candidate.display_name());
        if let Some(slug) = candidate.slug() {
            distance = distance.min(fuzzy_distance(query, slug));
        }

        if best.map_or(true, |(_, d)| distance < d) {
            best = Some((candidate, distance));
        }
    }

    best
}

/// Distance in `[0, 1]`, 0 meaning identical.
///
/// Normalized Levenshtein over lowercase strings, except that a field which
/// contains the whole query scores by how much extra text surrounds it, so
/// `sodium` stays close to `Sodium Extra`.
pub fn fuzzy_distance(query: &str, field: &str) -> f64 {
    let query = query.to_lowercase();
    let field = field.to_lowercase();
    if query.is_empty() || field.is_empty() {
        return 1.0;
    }

    let edit = 1.0 - strsim::normalized_levenshtein(&query, &field);
    let containment = if field.contains(&query) {
        let ratio = query.chars().count() as f64 / field.chars().count() as f64;
        0.5 * (1.0 - ratio)
    } else {
        1.0
    };

    edit.min(containment)
}

fn alphanumeric_lowercase(value: &str) -> String {
    value
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

fn strip_separators(value: &str) -> String {
    value
        .chars()
        .filter(|c| !matches!(c, '-' | '_') && !c.is_whitespace())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::registry::fake::{cf_mod, project};
    use crate::core::registry::ModrinthProject;

    fn modrinth(id: &str, slug: &str, title: &str) -> MatchCandidate {
        MatchCandidate::Modrinth(project(id, slug, title))
    }

    fn titled(title: &str) -> MatchCandidate {
        MatchCandidate::Modrinth(ModrinthProject {
            id: format!("id-{title}"),
            slug: None,
            title: title.into(),
            icon_url: None,
        })
    }

    #[test]
    fn empty_result_set_yields_nothing() {
        assert!(select_candidate("sodium", Some("sodium"), &[]).is_none());
    }

    #[test]
    fn registry_id_beats_exact_name_and_fuzzy() {
        let candidates = vec![
            modrinth("a1", "sodium-extra", "Sodium Extra"),
            modrinth("a2", "sodium-renamed", "Sodium"),
            modrinth("a3", "sodium", "Rubidium"),
        ];

        let selection = select_candidate("Sodium", Some("sodium"), &candidates).unwrap();
        assert_eq!(selection.candidate.id(), "a3");
        assert_eq!(selection.tier, SelectionTier::RegistryId);
    }

    #[test]
    fn exact_name_beats_fuzzy() {
        let candidates = vec![
            modrinth("a1", "sodium-extra", "Sodium Extra"),
            modrinth("a2", "sodium-renamed", "Sodium"),
        ];

        let selection = select_candidate("sodium", None, &candidates).unwrap();
        assert_eq!(selection.candidate.id(), "a2");
        assert_eq!(selection.tier, SelectionTier::ExactName);
    }

    #[test]
    fn registry_id_matches_alphanumeric_slug() {
        let candidates = vec![modrinth("P7dR8mSH", "fabric-api", "Fabric API")];
        let selection = select_candidate("whatever", Some("fabric_api"), &candidates).unwrap();
        assert_eq!(selection.tier, SelectionTier::RegistryId);
    }

    #[test]
    fn registry_id_matches_numeric_curseforge_id() {
        let candidates = vec![MatchCandidate::CurseForge(cf_mod(238222, "jei", "JEI"))];
        let selection = select_candidate("x", Some("238222"), &candidates).unwrap();
        assert_eq!(selection.tier, SelectionTier::RegistryId);
    }

    #[test]
    fn exact_name_ignores_separators() {
        let candidates = vec![titled("Mouse Tweaks")];
        let selection = select_candidate("mouse-tweaks", None, &candidates).unwrap();
        assert_eq!(selection.tier, SelectionTier::ExactName);
    }

    #[test]
    fn fuzzy_accepts_close_name() {
        let candidates = vec![titled("Completely Different"), titled("Sodium Extra")];
        let selection = select_candidate("sodium", None, &candidates).unwrap();
        assert_eq!(selection.candidate.display_name(), "Sodium Extra");
        assert!(matches!(selection.tier, SelectionTier::Fuzzy(d) if d < FUZZY_ACCEPT_THRESHOLD));
    }

    #[test]
    fn fuzzy_rejects_distance_at_threshold() {
        // Two substitutions over five characters: distance exactly 0.4.
        let candidates = vec![titled("abcxy")];
        assert_eq!(fuzzy_distance("abcde", "abcxy"), 0.4);
        assert!(select_candidate("abcde", None, &candidates).is_none());
    }

    #[test]
    fn fuzzy_accepts_distance_below_threshold() {
        let candidates = vec![titled("abcdx")];
        let selection = select_candidate("abcde", None, &candidates).unwrap();
        assert!(matches!(selection.tier, SelectionTier::Fuzzy(d) if (d - 0.2).abs() < 1e-9));
    }

    #[test]
    fn fuzzy_rejects_unrelated_names() {
        let candidates = vec![titled("Iris Shaders"), titled("Lithium")];
        assert!(select_candidate("journeymap", None, &candidates).is_none());
    }

    #[test]
    fn fuzzy_tie_keeps_first_candidate() {
        let candidates = vec![titled("abcdx"), titled("abcdy")];
        let selection = select_candidate("abcde", None, &candidates).unwrap();
        assert_eq!(selection.candidate.display_name(), "abcdx");
    }

    #[test]
    fn distance_is_zero_for_identical_strings() {
        assert_eq!(fuzzy_distance("JEI", "jei"), 0.0);
        assert_eq!(fuzzy_distance("", "jei"), 1.0);
    }
}
