use std::collections::BTreeMap;

use super::model::{DonorAttributes, PatientCollection, PatientRecord};

// ---------------------------------------------------------------------------
// DonorTable – secondary attributes looked up by donor id
// ---------------------------------------------------------------------------

/// Cleaned rows of a secondary table, keyed by donor id. Rows are joined to
/// patients by identifier, never by position in the file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DonorTable {
    donors: BTreeMap<String, DonorAttributes>,
}

impl DonorTable {
    /// Insert unless the donor is already present. Returns `false` for a
    /// duplicate, which leaves the existing entry untouched.
    pub fn insert(&mut self, donor_id: String, attrs: DonorAttributes) -> bool {
        match self.donors.entry(donor_id) {
            std::collections::btree_map::Entry::Occupied(_) => false,
            std::collections::btree_map::Entry::Vacant(slot) => {
                slot.insert(attrs);
                true
            }
        }
    }

    pub fn get(&self, donor_id: &str) -> Option<&DonorAttributes> {
        self.donors.get(donor_id)
    }

    pub fn len(&self) -> usize {
        self.donors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.donors.is_empty()
    }
}

/// Result of [`merge_by_donor`].
#[derive(Debug, Clone, PartialEq)]
pub struct MergeOutcome {
    pub patients: PatientCollection,
    /// Records that gained at least one value from the donor table.
    pub enriched: usize,
    /// Records with a donor id that the table does not contain.
    pub unmatched: usize,
    /// Matched records whose onset age differs from the donor table's.
    pub onset_conflicts: usize,
}

/// Fill fields missing from each patient with the matching donor's values.
///
/// Values already present are never replaced and the onset age is never
/// touched, so the set of patients is exactly the input set.
pub fn merge_by_donor(patients: PatientCollection, table: &DonorTable) -> MergeOutcome {
    let mut enriched = 0usize;
    let mut unmatched = 0usize;
    let mut onset_conflicts = 0usize;

    let records = patients
        .into_records()
        .into_iter()
        .map(|mut p| {
            let Some(id) = p.donor_id.as_deref() else {
                return p;
            };
            match table.get(id) {
                Some(attrs) => {
                    if let Some(other) = attrs.age_of_onset.filter(|&o| o != p.age_of_onset) {
                        log::warn!(
                            "Donor {id}: onset {} kept, donor table has {other}",
                            p.age_of_onset
                        );
                        onset_conflicts += 1;
                    }
                    if fill_missing(&mut p, attrs) {
                        enriched += 1;
                    }
                }
                None => unmatched += 1,
            }
            p
        })
        .collect();

    log::info!("Merged donor table: {enriched} patients enriched, {unmatched} without a match");
    if onset_conflicts > 0 {
        log::warn!("{onset_conflicts} patients disagree with the donor table on onset age");
    }
    MergeOutcome {
        patients: PatientCollection::from_records(records),
        enriched,
        unmatched,
        onset_conflicts,
    }
}

fn fill_missing(p: &mut PatientRecord, attrs: &DonorAttributes) -> bool {
    fn fill<T: Clone>(slot: &mut Option<T>, from: &Option<T>) -> bool {
        if slot.is_none() && from.is_some() {
            *slot = from.clone();
            true
        } else {
            false
        }
    }

    let mut changed = fill(&mut p.genotype, &attrs.genotype);
    changed |= fill(&mut p.age_of_diagnosis, &attrs.age_of_diagnosis);
    changed |= fill(&mut p.sex, &attrs.sex);
    changed |= fill(&mut p.years_education, &attrs.years_education);
    changed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patient(id: Option<&str>, education: Option<f64>) -> PatientRecord {
        PatientRecord {
            donor_id: id.map(str::to_string),
            genotype: Some("3/3".to_string()),
            age_of_onset: 70.0,
            age_of_diagnosis: None,
            sex: None,
            years_education: education,
        }
    }

    fn table() -> DonorTable {
        let mut t = DonorTable::default();
        t.insert(
            "D1".to_string(),
            DonorAttributes {
                genotype: Some("4/4".to_string()),
                age_of_onset: Some(50.0),
                sex: Some("F".to_string()),
                years_education: Some(16.0),
                ..Default::default()
            },
        );
        t.insert(
            "D2".to_string(),
            DonorAttributes {
                years_education: Some(9.0),
                ..Default::default()
            },
        );
        t
    }

    #[test]
    fn first_donor_row_wins() {
        let mut t = table();
        let inserted = t.insert(
            "D1".to_string(),
            DonorAttributes {
                years_education: Some(1.0),
                ..Default::default()
            },
        );
        assert!(!inserted);
        assert_eq!(t.get("D1").unwrap().years_education, Some(16.0));
    }

    #[test]
    fn fills_only_absent_fields() {
        let patients = PatientCollection::from_records(vec![
            patient(Some("D1"), None),
            patient(Some("D2"), Some(12.0)),
            patient(Some("D9"), None),
            patient(None, None),
        ]);
        let out = merge_by_donor(patients, &table());
        let r = out.patients.records();

        // D1: education and sex filled; genotype and onset kept.
        assert_eq!(r[0].years_education, Some(16.0));
        assert_eq!(r[0].sex.as_deref(), Some("F"));
        assert_eq!(r[0].genotype.as_deref(), Some("3/3"));
        assert_eq!(r[0].age_of_onset, 70.0);

        // D2 already had education.
        assert_eq!(r[1].years_education, Some(12.0));

        assert_eq!(out.enriched, 1);
        assert_eq!(out.unmatched, 1);
        assert_eq!(out.patients.len(), 4);
    }

    #[test]
    fn onset_disagreement_is_counted_not_applied() {
        let mut t = table();
        t.insert(
            "D3".to_string(),
            DonorAttributes {
                age_of_onset: Some(70.0),
                ..Default::default()
            },
        );
        let patients = PatientCollection::from_records(vec![
            patient(Some("D1"), None),
            patient(Some("D2"), None),
            patient(Some("D3"), None),
        ]);
        let out = merge_by_donor(patients, &t);
        // Only D1 (table onset 50) disagrees; D2 has no onset, D3 matches.
        assert_eq!(out.onset_conflicts, 1);
        assert_eq!(out.patients.records()[0].age_of_onset, 70.0);
    }
}
