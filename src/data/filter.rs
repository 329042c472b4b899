use std::collections::HashSet;

use super::model::{SpeciesGroup, Table};

// ---------------------------------------------------------------------------
// Species enumeration
// ---------------------------------------------------------------------------

/// Distinct species labels in the order they first appear in the table.
pub fn species_labels(table: &Table) -> Vec<&str> {
    let mut seen: HashSet<&str> = HashSet::new();
    table
        .records()
        .iter()
        .map(|r| r.species.as_str())
        .filter(|label| seen.insert(*label))
        .collect()
}

// ---------------------------------------------------------------------------
// Per-species filter
// ---------------------------------------------------------------------------

/// Records whose species equals `species`, in table order.
///
/// The group is empty when the label does not occur in the table.
pub fn filter_species<'a>(table: &'a Table, species: &'a str) -> SpeciesGroup<'a> {
    let records = table
        .records()
        .iter()
        .filter(|r| r.species == species)
        .collect();
    SpeciesGroup { species, records }
}
