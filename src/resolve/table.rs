//! The hand-curated alias table: every region name variant the upstream
//! sales source is known to emit, mapped to the shape ids of the national
//! vector map asset.

use std::collections::HashMap;
use std::sync::OnceLock;

use super::normalize::normalize;
use crate::types::ShapeId;

/// Known aliases per shape id. Covers historical and alternate spellings as
/// well as city names that stand in for their region (Huancayo is the
/// capital of Junín). Shape ids are exactly the `id` attributes used by the
/// Peru department asset.
///
/// Metropolitan Lima (`PELMA`) and the surrounding Lima province (`PELIM`)
/// are distinct shapes and must stay distinct here.
const ENTRIES: &[(&str, &[&str])] = &[
    ("PELMA", &["LIMA", "LIMA METROPOLITANA", "LIMA METROPOLITAN"]),
    ("PELIM", &["LIMA PROVINCE", "LIMA PROVINCIA"]),
    ("PECAL", &["CALLAO", "PROVINCIA CONSTITUCIONAL DEL CALLAO"]),
    ("PEICA", &["ICA"]),
    ("PEARE", &["AREQUIPA"]),
    ("PECUS", &["CUSCO", "CUSC", "CUSCO REGION"]),
    ("PEPIU", &["PIURA"]),
    ("PELAL", &["LA LIBERTAD", "LIBERTAD", "LIBERTAD REGION"]),
    ("PEANC", &["ANCASH", "ÁNCASH", "ANCASH REGION"]),
    ("PECAJ", &["CAJAMARCA"]),
    ("PELAM", &["LAMBAYEQUE"]),
    ("PETUM", &["TUMBES"]),
    ("PEAMA", &["AMAZONAS"]),
    ("PELOR", &["LORETO"]),
    ("PESAM", &["SAN MARTIN", "SAN MARTÍN", "SAN MARTIN REGION"]),
    ("PEUCA", &["UCAYALI", "UCAYAL", "UCAYALI REGION"]),
    ("PEMDD", &["MADRE DE DIOS", "MADRE DE DIOS REGION"]),
    ("PEPAS", &["PASCO"]),
    ("PEHUC", &["HUANUCO", "HUÁNUCO", "HUANUCO REGION"]),
    ("PEJUN", &["JUNIN", "JUNÍN", "JUNIN REGION", "HUANCAYO"]),
    ("PEHUV", &["HUANCAVELICA", "HUANCAVELICA REGION"]),
    ("PEAYA", &["AYACUCHO", "AYACUCHO REGION"]),
    ("PEAPU", &["APURIMAC", "APURÍMAC", "APURIMAC REGION"]),
    ("PEPUN", &["PUNO", "PUNO REGION"]),
    ("PEMOQ", &["MOQUEGUA", "MOQUEGUA REGION"]),
    ("PETAC", &["TACNA", "TACNA REGION"]),
];

/// Shape id of metropolitan Lima, the dataset's dominant outlier. Excluded
/// from the scale maximum by default.
pub const CAPITAL_SHAPE_ID: &str = "PELMA";

/// Bidirectional lookup over the static alias set: raw alias and normalized
/// alias, each to a shape id. Loaded once per process lifetime.
pub struct RegionTable {
    raw: HashMap<&'static str, ShapeId>,
    normalized: HashMap<String, ShapeId>,
}

impl RegionTable {
    /// The process-wide table for the Peru department asset.
    pub fn get() -> &'static RegionTable {
        static TABLE: OnceLock<RegionTable> = OnceLock::new();
        TABLE.get_or_init(RegionTable::build)
    }

    fn build() -> Self {
        let mut raw = HashMap::new();
        let mut normalized: HashMap<String, ShapeId> = HashMap::new();

        for (id, aliases) in ENTRIES {
            let shape = ShapeId::new(id);
            for alias in *aliases {
                raw.insert(*alias, shape.clone());

                let key = normalize(alias);
                // Two shape ids sharing a normalized alias would make tier-2
                // and tier-3 resolution ambiguous. That is an authoring error
                // in ENTRIES, not a runtime condition.
                debug_assert!(
                    normalized.get(&key).map_or(true, |prev| *prev == shape),
                    "normalized alias {key:?} maps to both {} and {id}",
                    normalized[&key],
                );
                normalized.entry(key).or_insert_with(|| shape.clone());
            }
        }

        Self { raw, normalized }
    }

    /// Exact raw-alias lookup. Callers pass the name already uppercased and
    /// trimmed (tier-1 contract).
    #[inline]
    pub fn lookup_raw(&self, name: &str) -> Option<&ShapeId> {
        self.raw.get(name)
    }

    /// Exact normalized-key lookup.
    #[inline]
    pub fn lookup_normalized(&self, key: &str) -> Option<&ShapeId> {
        self.normalized.get(key)
    }

    /// All `(normalized key, shape id)` pairs, for containment scans.
    pub fn normalized_keys(&self) -> impl Iterator<Item = (&str, &ShapeId)> {
        self.normalized.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Every distinct shape id in the table.
    pub fn shape_ids(&self) -> impl Iterator<Item = ShapeId> + '_ {
        ENTRIES.iter().map(|(id, _)| ShapeId::new(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn raw_lookup_hits_known_aliases() {
        let table = RegionTable::get();
        assert_eq!(table.lookup_raw("LIMA").unwrap().as_str(), "PELMA");
        assert_eq!(table.lookup_raw("LIMA PROVINCIA").unwrap().as_str(), "PELIM");
        assert_eq!(table.lookup_raw("HUANCAYO").unwrap().as_str(), "PEJUN");
        assert!(table.lookup_raw("lima").is_none()); // tier-1 is case-exact
    }

    #[test]
    fn normalized_lookup_folds_accents() {
        let table = RegionTable::get();
        let key = normalize("Áncash");
        assert_eq!(table.lookup_normalized(&key).unwrap().as_str(), "PEANC");
        let key = normalize("San Martín");
        assert_eq!(table.lookup_normalized(&key).unwrap().as_str(), "PESAM");
    }

    #[test]
    fn normalized_aliases_are_disjoint_across_shapes() {
        // No normalized alias may map to two distinct shape ids; a collision
        // here is a data-authoring defect in ENTRIES.
        let mut seen: HashMap<String, &str> = HashMap::new();
        for (id, aliases) in ENTRIES {
            for alias in *aliases {
                let key = normalize(alias);
                if let Some(prev) = seen.insert(key.clone(), id) {
                    assert_eq!(prev, *id, "alias {alias:?} ({key:?}) is ambiguous");
                }
            }
        }
    }

    #[test]
    fn metropolitan_and_provincial_lima_stay_distinct() {
        let table = RegionTable::get();
        let metro = table.lookup_raw("LIMA METROPOLITANA").unwrap();
        let prov = table.lookup_raw("LIMA PROVINCIA").unwrap();
        assert_ne!(metro, prov);
    }

    #[test]
    fn covers_all_26_shapes() {
        assert_eq!(RegionTable::get().shape_ids().count(), 26);
    }
}
