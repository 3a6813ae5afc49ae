use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::path::Path;

use tracing::warn;

use crate::input::InputError;

const TAXON_COLUMN: &str = "Taxon";
const MEAN_COLUMN: &str = "mean";
const MEDIAN_COLUMN: &str = "median";

/// Population statistics for one taxon in the reference database.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReferenceStats {
    pub mean: f64,
    pub median: f64,
}

/// The reference statistics database: an exact-string lookup from species
/// name to population stats. Loaded once per run, read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct RefDb {
    stats: HashMap<String, ReferenceStats>,
}

impl RefDb {
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (String, ReferenceStats)>,
    {
        RefDb {
            stats: entries.into_iter().collect(),
        }
    }

    pub fn lookup(&self, species: &str) -> Option<&ReferenceStats> {
        self.stats.get(species)
    }

    pub fn contains(&self, species: &str) -> bool {
        self.stats.contains_key(species)
    }

    pub fn len(&self) -> usize {
        self.stats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stats.is_empty()
    }
}

/// Loads the reference database CSV. Requires `Taxon`, `mean` and `median`
/// columns; rows whose stats are not numeric are skipped (they could never
/// survive the join filter), duplicate taxa keep the first occurrence.
pub fn load_refdb(path: &Path) -> Result<RefDb, InputError> {
    let mut reader = csv::Reader::from_path(path)?;
    let headers = reader.headers()?.clone();
    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h.trim() == name)
            .ok_or_else(|| InputError::MissingColumn {
                file: path.display().to_string(),
                column: name.to_string(),
            })
    };
    let taxon_col = column(TAXON_COLUMN)?;
    let mean_col = column(MEAN_COLUMN)?;
    let median_col = column(MEDIAN_COLUMN)?;

    let mut stats: HashMap<String, ReferenceStats> = HashMap::new();
    for (idx, result) in reader.records().enumerate() {
        let record = result?;
        let line_no = idx + 2;
        let taxon = record.get(taxon_col).unwrap_or("").trim();
        if taxon.is_empty() {
            warn!("reference row has empty taxon; skipping (line {})", line_no);
            continue;
        }
        let mean = record.get(mean_col).unwrap_or("").trim().parse::<f64>();
        let median = record.get(median_col).unwrap_or("").trim().parse::<f64>();
        let (Ok(mean), Ok(median)) = (mean, median) else {
            warn!(
                "reference row for '{}' has non-numeric stats; skipping (line {})",
                taxon, line_no
            );
            continue;
        };
        match stats.entry(taxon.to_string()) {
            Entry::Occupied(_) => {
                warn!(
                    "duplicate taxon in reference database; keeping first (line {}, taxon {})",
                    line_no, taxon
                );
            }
            Entry::Vacant(slot) => {
                slot.insert(ReferenceStats { mean, median });
            }
        }
    }

    Ok(RefDb { stats })
}
