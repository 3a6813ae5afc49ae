use crate::input::refdb::RefDb;
use crate::model::candidate::SpeciesCandidate;

/// One row of the final reconciled table. Records built by `reconcile` carry
/// all three numeric fields; only the unclassified shortcut leaves the
/// reference fields empty (rendered as `NA`).
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerRecord {
    pub sample: String,
    pub species: String,
    pub user_abundance: Option<f64>,
    pub db_median: Option<f64>,
    pub db_mean: Option<f64>,
}

/// Left-joins the candidate set against the reference database and keeps
/// only complete records: a candidate without an observed abundance (the
/// fallback tier) or without matching stats is dropped, not an error.
/// Numerics are rounded to 3 decimals, the sample id is truncated at the
/// first `_`.
pub fn reconcile(sample: &str, candidates: &[SpeciesCandidate], db: &RefDb) -> Vec<MarkerRecord> {
    let prefix = sample_prefix(sample);
    let mut records = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        let Some(abundance) = candidate.user_abundance else {
            continue;
        };
        let Some(stats) = db.lookup(&candidate.species) else {
            continue;
        };
        records.push(MarkerRecord {
            sample: prefix.to_string(),
            species: candidate.species.clone(),
            user_abundance: Some(round3(abundance)),
            db_median: Some(round3(stats.median)),
            db_mean: Some(round3(stats.mean)),
        });
    }
    records
}

/// Half-away-from-zero rounding to 3 decimal places.
pub fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

pub fn sample_prefix(sample: &str) -> &str {
    sample.split('_').next().unwrap_or(sample)
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/reconcile.rs"]
mod tests;
