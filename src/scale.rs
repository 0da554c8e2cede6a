//! Logarithmic intensity scaling with outlier suppression.

use std::collections::{HashMap, HashSet};

use crate::types::{ResolvedRegion, ShapeId};

/// Per-shape color intensity in `[0, 1]`, one entry per resolved shape id.
pub type IntensityMap = HashMap<ShapeId, f64>;

/// Log-scaled intensity of one total against the dataset maximum:
/// `log10(total + 1) / log10(max + 1)`, clamped to `[0, 1]`.
///
/// A zero total is exactly zero; the visibility floor applies only in color
/// mapping, never here.
pub fn intensity(total: f64, max: f64) -> f64 {
    if !(total > 0.0) || !(max > 0.0) {
        return 0.0;
    }
    ((total + 1.0).log10() / (max + 1.0).log10()).clamp(0.0, 1.0)
}

/// Compute the intensity map for a resolved set.
///
/// The max is taken over entries whose shape id is not in `excluded` and
/// whose total is positive; it falls back to 1 when nothing qualifies. The
/// metropolitan capital's total dominates the dataset by more than an order
/// of magnitude, so keeping it in the max would compress every other
/// region's intensity toward zero.
///
/// Excluded shapes still receive an intensity (so they can be colored and
/// ranked); only their totals are left out of the max computation, which
/// clamps them to 1. When two samples resolve to the same shape the later
/// one wins, matching upstream behavior.
pub fn intensity_map(resolved: &[ResolvedRegion], excluded: &HashSet<ShapeId>) -> IntensityMap {
    let max = resolved
        .iter()
        .filter(|r| !excluded.contains(&r.shape_id) && r.sample.total > 0.0)
        .map(|r| r.sample.total)
        .fold(None, |acc: Option<f64>, t| Some(acc.map_or(t, |m| m.max(t))))
        .unwrap_or(1.0);

    let mut map = IntensityMap::with_capacity(resolved.len());
    for region in resolved {
        map.insert(region.shape_id.clone(), intensity(region.sample.total, max));
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RegionSample;

    fn region(id: &str, total: f64) -> ResolvedRegion {
        ResolvedRegion {
            shape_id: ShapeId::new(id),
            sample: RegionSample::new(id, total),
        }
    }

    #[test]
    fn bounds_and_zero() {
        assert_eq!(intensity(0.0, 100.0), 0.0);
        assert_eq!(intensity(-5.0, 100.0), 0.0);
        assert!(intensity(f64::NAN, 100.0) == 0.0);
        for total in [0.5, 1.0, 50.0, 100.0, 1e9] {
            let v = intensity(total, 100.0);
            assert!((0.0..=1.0).contains(&v), "intensity({total}) = {v}");
        }
    }

    #[test]
    fn monotonic_in_total() {
        let max = 280_000.0;
        let a = intensity(280_000.0, max);
        let b = intensity(190_000.0, max);
        let c = intensity(41_675.0, max);
        assert!(a > b && b > c, "{a} > {b} > {c}");
    }

    #[test]
    fn example_scenario_with_capital_excluded() {
        let resolved = vec![
            region("PELMA", 4_778_414.63),
            region("PEARE", 280_000.0),
            region("PECUS", 190_000.0),
        ];
        let excluded: HashSet<ShapeId> = [ShapeId::new("PELMA")].into_iter().collect();
        let map = intensity_map(&resolved, &excluded);

        // max = 280_000: AREQUIPA pins the top of the scale.
        assert!((map[&ShapeId::new("PEARE")] - 1.0).abs() < 1e-12);
        let cusco = map[&ShapeId::new("PECUS")];
        assert!((cusco - 0.965).abs() < 0.005, "CUSCO = {cusco}");
        // LIMA's raw value exceeds the max and clamps to 1.
        assert_eq!(map[&ShapeId::new("PELMA")], 1.0);
    }

    #[test]
    fn outlier_exclusion_never_lowers_other_intensities() {
        let resolved = vec![
            region("PELMA", 4_778_414.63),
            region("PEARE", 280_000.0),
            region("PECUS", 190_000.0),
            region("PETAC", 25_000.0),
        ];
        let none: HashSet<ShapeId> = HashSet::new();
        let capital: HashSet<ShapeId> = [ShapeId::new("PELMA")].into_iter().collect();

        let with_outlier = intensity_map(&resolved, &none);
        let without = intensity_map(&resolved, &capital);

        for id in ["PEARE", "PECUS", "PETAC"] {
            let id = ShapeId::new(id);
            assert!(
                without[&id] >= with_outlier[&id],
                "{id}: {} < {}",
                without[&id],
                with_outlier[&id]
            );
        }
    }

    #[test]
    fn one_entry_per_shape_last_sample_wins() {
        let resolved = vec![region("PEICA", 100.0), region("PEICA", 200.0)];
        let map = intensity_map(&resolved, &HashSet::new());
        assert_eq!(map.len(), 1);
        assert_eq!(map[&ShapeId::new("PEICA")], 1.0);
    }

    #[test]
    fn empty_or_all_excluded_falls_back_to_max_1() {
        let map = intensity_map(&[], &HashSet::new());
        assert!(map.is_empty());

        let resolved = vec![region("PELMA", 500.0)];
        let excluded: HashSet<ShapeId> = [ShapeId::new("PELMA")].into_iter().collect();
        let map = intensity_map(&resolved, &excluded);
        // max falls back to 1, so the excluded shape clamps to 1.
        assert_eq!(map[&ShapeId::new("PELMA")], 1.0);
    }
}
