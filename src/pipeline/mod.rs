use serde::Serialize;

pub mod reconcile;
pub mod select;

use crate::input::profile::ProfileRow;
use crate::model::taxonomy::{is_sentinel, is_species_level};
use reconcile::MarkerRecord;

/// Detects the fully-unclassified sample: a profile whose only row carries a
/// sentinel clade label. The returned record bypasses selection and join
/// entirely, so neither the reference database nor the coefficient list is
/// consulted; the sample id is kept untruncated on this path.
pub fn unclassified_shortcut(sample: &str, profile: &[ProfileRow]) -> Option<MarkerRecord> {
    let [row] = profile else {
        return None;
    };
    if !is_sentinel(&row.clade_name) {
        return None;
    }
    Some(MarkerRecord {
        sample: sample.to_string(),
        species: row.clade_name.clone(),
        user_abundance: Some(row.rel_abundance),
        db_median: None,
        db_mean: None,
    })
}

/// Filters a profile down to its species-rank rows.
pub fn species_rows(profile: &[ProfileRow]) -> Vec<ProfileRow> {
    profile
        .iter()
        .filter(|row| is_species_level(&row.clade_name))
        .cloned()
        .collect()
}

/// Machine-readable account of one reconciliation run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub tool: &'static str,
    pub version: &'static str,
    pub sample: String,
    pub profile_rows: usize,
    pub species_rows: usize,
    pub primary: usize,
    pub fallback: usize,
    pub emitted: usize,
    pub unclassified: bool,
}
