//! The ranked list view: the same resolved data as the map, sorted by
//! descending total.

use std::collections::HashSet;

use serde::Serialize;

use crate::scale::IntensityMap;
use crate::types::{ResolvedRegion, ShapeId};

/// One row of the ranked region list. Intensity matches the map's coloring
/// of the same shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedEntry {
    pub rank: usize,
    pub shape_id: ShapeId,
    pub name: String,
    pub total: f64,
    pub intensity: f64,
}

/// Build the ranked list from a resolved set: positive totals only, sorted
/// by descending total, ranks starting at 1. A shape appears once, keyed by
/// the same last-sample-wins rule as the intensity map.
pub fn ranked_list(resolved: &[ResolvedRegion], intensities: &IntensityMap) -> Vec<RankedEntry> {
    let mut rows: Vec<&ResolvedRegion> = Vec::with_capacity(resolved.len());
    let mut seen: HashSet<&ShapeId> = HashSet::with_capacity(resolved.len());

    // Later samples replace earlier ones for the same shape.
    for region in resolved.iter().rev() {
        if region.sample.total > 0.0 && seen.insert(&region.shape_id) {
            rows.push(region);
        }
    }

    rows.sort_by(|a, b| {
        b.sample
            .total
            .partial_cmp(&a.sample.total)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    rows.iter()
        .enumerate()
        .map(|(i, region)| RankedEntry {
            rank: i + 1,
            shape_id: region.shape_id.clone(),
            name: region.sample.name.clone(),
            total: region.sample.total,
            intensity: intensities.get(&region.shape_id).copied().unwrap_or(0.0),
        })
        .collect()
}
