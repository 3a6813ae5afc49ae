/// Normalized key for rows whose species name cannot be resolved.
pub const UNCLASSIFIED: &str = "unclassified";

/// Labels a classifier emits for a fully unassigned sample.
const SENTINELS: [&str; 2] = ["UNKNOWN", "unclassified"];

const SPECIES_MARKER: &str = "|s__";
const STRAIN_MARKER: &str = "|t__";

pub fn is_sentinel(label: &str) -> bool {
    SENTINELS.iter().any(|&s| s == label)
}

/// A clade label is species rank when its lineage resolves to `s__` and no
/// deeper: strain-resolved (`t__`) rows sit below species and are excluded.
pub fn is_species_level(clade: &str) -> bool {
    clade.contains(SPECIES_MARKER) && !clade.contains(STRAIN_MARKER)
}

/// Extracts the species name from a hierarchical clade label: the text after
/// the last `|s__`. A missing marker, an empty extraction, or a sentinel all
/// normalize to `unclassified` instead of failing the row.
pub fn species_key(clade: &str) -> String {
    let Some(pos) = clade.rfind(SPECIES_MARKER) else {
        return UNCLASSIFIED.to_string();
    };
    let name = clade[pos + SPECIES_MARKER.len()..].trim();
    if name.is_empty() || is_sentinel(name) {
        UNCLASSIFIED.to_string()
    } else {
        name.to_string()
    }
}
