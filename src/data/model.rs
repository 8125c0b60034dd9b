use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

// ---------------------------------------------------------------------------
// PatientRecord – one accepted row of the source table
// ---------------------------------------------------------------------------

/// A single patient. Only rows with a usable onset age become records, so
/// `age_of_onset` is a plain `f64` rather than an optional.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatientRecord {
    pub donor_id: Option<String>,
    /// APOE genotype with all whitespace removed (`"3/4"`).
    pub genotype: Option<String>,
    /// Age in years at the first cognitive symptom.
    pub age_of_onset: f64,
    pub age_of_diagnosis: Option<f64>,
    pub sex: Option<String>,
    pub years_education: Option<f64>,
}

impl fmt::Display for PatientRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn opt<T: fmt::Display>(v: &Option<T>) -> String {
            v.as_ref().map_or_else(|| "-".to_string(), |v| v.to_string())
        }
        write!(
            f,
            "Patient(ID={}, APOE={}, Onset={}, Diagnosis={}, Sex={}, Education={})",
            opt(&self.donor_id),
            opt(&self.genotype),
            self.age_of_onset,
            opt(&self.age_of_diagnosis),
            opt(&self.sex),
            opt(&self.years_education),
        )
    }
}

// ---------------------------------------------------------------------------
// DonorAttributes – a row of a secondary table, no inclusion rule applied
// ---------------------------------------------------------------------------

/// Cleaned fields of a row that is looked up by donor id rather than
/// analysed directly, e.g. an education table kept in a separate file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DonorAttributes {
    pub genotype: Option<String>,
    pub age_of_onset: Option<f64>,
    pub age_of_diagnosis: Option<f64>,
    pub sex: Option<String>,
    pub years_education: Option<f64>,
}

// ---------------------------------------------------------------------------
// PatientCollection – the complete result of one load
// ---------------------------------------------------------------------------

/// Records in source order. Each load produces a new collection; nothing is
/// appended to a previous one.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PatientCollection {
    records: Vec<PatientRecord>,
}

impl PatientCollection {
    pub fn from_records(records: Vec<PatientRecord>) -> Self {
        PatientCollection { records }
    }

    pub fn records(&self) -> &[PatientRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PatientRecord> {
        self.records.iter()
    }

    /// Number of patients.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the load produced no usable rows.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Sorted distinct `sex` values, `None` standing for a missing cell.
    pub fn sex_values(&self) -> BTreeSet<Option<String>> {
        self.records.iter().map(|r| r.sex.clone()).collect()
    }

    /// Copy out the records at `indices`, in that order.
    pub fn subset(&self, indices: &[usize]) -> PatientCollection {
        let records = indices
            .iter()
            .filter_map(|&i| self.records.get(i).cloned())
            .collect();
        PatientCollection { records }
    }

    pub fn into_records(self) -> Vec<PatientRecord> {
        self.records
    }
}

impl<'a> IntoIterator for &'a PatientCollection {
    type Item = &'a PatientRecord;
    type IntoIter = std::slice::Iter<'a, PatientRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
