/// Maximum size of the abundance-ranked primary tier.
pub const PRIMARY_CAP: usize = 10;

/// A taxon picked for reconciliation, either from the sample's own profile
/// (primary tier, observed abundance present) or from the coefficient taxa
/// list (fallback tier, no observed abundance).
#[derive(Debug, Clone, PartialEq)]
pub struct SpeciesCandidate {
    /// Full hierarchical label, preserved for inspection output.
    pub taxon: String,
    /// Species-rank key used for reference database lookups.
    pub species: String,
    pub user_abundance: Option<f64>,
}
