use std::collections::HashSet;

use tracing::debug;

use crate::input::profile::ProfileRow;
use crate::input::refdb::RefDb;
use crate::model::candidate::{PRIMARY_CAP, SpeciesCandidate};
use crate::model::taxonomy::{is_species_level, species_key};

#[derive(Debug, Default)]
pub struct Selection {
    /// Primary tier first, fallback tier after, each in construction order.
    pub candidates: Vec<SpeciesCandidate>,
    pub n_primary: usize,
    pub n_fallback: usize,
}

/// Builds the candidate set from the sample's species-level rows plus the
/// optional coefficient taxa list.
///
/// Primary tier: rows ranked by abundance descending (stable, ties keep
/// input order), keeping only species present in the reference database,
/// capped at `PRIMARY_CAP`. Rows absent from the database are skipped and do
/// not count against the cap. Fallback tier: species-level entries of the
/// coefficient list that are in the database and not already selected, in
/// list order, uncapped, with no observed abundance.
pub fn select_candidates(
    species_rows: &[ProfileRow],
    coef_taxa: Option<&[String]>,
    db: &RefDb,
) -> Selection {
    let mut order: Vec<usize> = (0..species_rows.len()).collect();
    order.sort_by(|&a, &b| {
        species_rows[b]
            .rel_abundance
            .partial_cmp(&species_rows[a].rel_abundance)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut seen: HashSet<String> = HashSet::new();
    let mut candidates = Vec::new();
    for idx in order {
        if candidates.len() >= PRIMARY_CAP {
            break;
        }
        let row = &species_rows[idx];
        let species = species_key(&row.clade_name);
        if !db.contains(&species) || seen.contains(&species) {
            continue;
        }
        seen.insert(species.clone());
        candidates.push(SpeciesCandidate {
            taxon: row.clade_name.clone(),
            species,
            user_abundance: Some(row.rel_abundance),
        });
    }
    let n_primary = candidates.len();
    debug!("primary tier: {} candidates", n_primary);

    if let Some(taxa) = coef_taxa {
        for taxon in taxa {
            if !is_species_level(taxon) {
                continue;
            }
            let species = species_key(taxon);
            if !db.contains(&species) || seen.contains(&species) {
                continue;
            }
            seen.insert(species.clone());
            candidates.push(SpeciesCandidate {
                taxon: taxon.clone(),
                species,
                user_abundance: None,
            });
        }
    }
    let n_fallback = candidates.len() - n_primary;
    debug!("fallback tier: {} candidates", n_fallback);

    Selection {
        candidates,
        n_primary,
        n_fallback,
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/select.rs"]
mod tests;
