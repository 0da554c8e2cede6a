//! Three-tier reconciliation of sample names against the alias table.

use super::normalize::normalize;
use super::table::RegionTable;
use crate::types::{RegionSample, ResolvedRegion, ShapeId};

/// Resolves free-text region names to shape ids.
///
/// Tiers, tried in order, first success wins:
/// 1. exact raw match (post-trim/uppercase),
/// 2. exact normalized match,
/// 3. containment: the normalized name contains, or is contained by, a
///    normalized alias; the longest matching alias wins.
pub struct Resolver<'a> {
    table: &'a RegionTable,
}

/// Outcome of a batch resolution: reconciled samples plus the ones no tier
/// could place. Unresolved samples are diagnostics, never an error.
#[derive(Debug, Default)]
pub struct Resolution {
    pub resolved: Vec<ResolvedRegion>,
    pub unresolved: Vec<RegionSample>,
}

impl<'a> Resolver<'a> {
    pub fn new(table: &'a RegionTable) -> Self {
        Self { table }
    }

    /// Resolve a single sample name. `None` means unresolved; this never
    /// fails, whatever the input looks like.
    pub fn resolve(&self, name: &str) -> Option<ShapeId> {
        // Tier 1: exact raw alias.
        let raw = name.trim().to_uppercase();
        if let Some(id) = self.table.lookup_raw(&raw) {
            return Some(id.clone());
        }

        let key = normalize(name);
        if key.is_empty() {
            // An empty key would "contain" every alias in tier 3.
            return None;
        }

        // Tier 2: exact normalized alias.
        if let Some(id) = self.table.lookup_normalized(&key) {
            return Some(id.clone());
        }

        // Tier 3: containment, longest alias first to reduce false positives
        // from short substrings.
        self.table
            .normalized_keys()
            .filter(|(alias, _)| alias.contains(&key) || key.contains(alias))
            .max_by_key(|(alias, _)| alias.len())
            .map(|(_, id)| id.clone())
    }

    /// Resolve a batch. One bad sample never aborts the rest; failures are
    /// collected into [`Resolution::unresolved`].
    pub fn resolve_all(&self, samples: Vec<RegionSample>) -> Resolution {
        let mut out = Resolution::default();
        for sample in samples {
            match self.resolve(&sample.name) {
                Some(shape_id) => out.resolved.push(ResolvedRegion { shape_id, sample }),
                None => out.unresolved.push(sample),
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> Resolver<'static> {
        Resolver::new(RegionTable::get())
    }

    #[test]
    fn tier1_exact_raw() {
        assert_eq!(resolver().resolve("LIMA").unwrap().as_str(), "PELMA");
        assert_eq!(resolver().resolve("  lima  ").unwrap().as_str(), "PELMA");
    }

    #[test]
    fn tier1_wins_over_containment() {
        // "LIMA" is a substring of the "LIMA PROVINCIA" alias, but the exact
        // raw match must take precedence over any tier-3 result.
        assert_eq!(resolver().resolve("LIMA").unwrap().as_str(), "PELMA");
        // And the longer exact alias still resolves to the provincial shape.
        assert_eq!(resolver().resolve("LIMA PROVINCIA").unwrap().as_str(), "PELIM");
    }

    #[test]
    fn tier2_normalized() {
        assert_eq!(resolver().resolve("Áncash").unwrap().as_str(), "PEANC");
        assert_eq!(resolver().resolve("san martín").unwrap().as_str(), "PESAM");
        assert_eq!(resolver().resolve("Junín!").unwrap().as_str(), "PEJUN");
    }

    #[test]
    fn tier3_containment() {
        // "DEPARTAMENTO DE CAJAMARCA" contains the "CAJAMARCA" alias.
        assert_eq!(
            resolver().resolve("Departamento de Cajamarca").unwrap().as_str(),
            "PECAJ"
        );
        // Truncated name contained by an alias.
        assert_eq!(resolver().resolve("LAMBAYEQ").unwrap().as_str(), "PELAM");
    }

    #[test]
    fn tier3_longest_alias_wins() {
        // Contains both "LIMA" (PELMA) and "LIMA PROVINCE" (PELIM); the
        // longer alias must win.
        assert_eq!(
            resolver().resolve("GOBIERNO REGIONAL LIMA PROVINCE").unwrap().as_str(),
            "PELIM"
        );
    }

    #[test]
    fn capital_stands_in_for_region() {
        assert_eq!(resolver().resolve("Huancayo").unwrap().as_str(), "PEJUN");
    }

    #[test]
    fn total_under_bad_input() {
        assert!(resolver().resolve("").is_none());
        assert!(resolver().resolve("   ").is_none());
        assert!(resolver().resolve("???").is_none());
        assert!(resolver().resolve("REGION DESCONOCIDA XYZQW").is_none());
    }

    #[test]
    fn unresolvable_sample_is_reported_not_fatal() {
        let samples = vec![
            RegionSample::new("LIMA", 100.0),
            RegionSample::new("REGION DESCONOCIDA XYZQW", 500.0),
            RegionSample::new("CUSCO", 50.0),
        ];
        let res = resolver().resolve_all(samples);
        assert_eq!(res.resolved.len(), 2);
        assert_eq!(res.unresolved.len(), 1);
        assert_eq!(res.unresolved[0].name, "REGION DESCONOCIDA XYZQW");
        assert!(!res
            .resolved
            .iter()
            .any(|r| r.sample.name == "REGION DESCONOCIDA XYZQW"));
    }
}
