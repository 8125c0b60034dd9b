use std::collections::BTreeSet;

use super::model::PatientCollection;

// ---------------------------------------------------------------------------
// Filter predicate: which sex values are selected
// ---------------------------------------------------------------------------

/// Selected `sex` values; `None` selects patients whose sex is missing.
pub type FilterState = BTreeSet<Option<String>>;

/// Initialise a [`FilterState`] with every value selected (i.e., show everyone).
pub fn init_filter_state(patients: &PatientCollection) -> FilterState {
    patients.sex_values()
}

/// Return indices of patients whose sex is selected.
///
/// An empty selection hides everyone; selecting every value that occurs in
/// the collection shows everyone.
pub fn filtered_indices(patients: &PatientCollection, filters: &FilterState) -> Vec<usize> {
    patients
        .iter()
        .enumerate()
        .filter(|(_, p)| filters.contains(&p.sex))
        .map(|(i, _)| i)
        .collect()
}
