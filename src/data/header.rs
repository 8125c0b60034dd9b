use std::collections::BTreeMap;
use std::fmt;

// ---------------------------------------------------------------------------
// Logical fields and their accepted header spellings
// ---------------------------------------------------------------------------

/// A column the loader knows how to interpret, independent of how the source
/// file happens to spell its header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LogicalField {
    DonorId,
    Genotype,
    AgeOfOnset,
    AgeOfDiagnosis,
    Sex,
    YearsEducation,
}

impl LogicalField {
    pub const ALL: [LogicalField; 6] = [
        LogicalField::DonorId,
        LogicalField::Genotype,
        LogicalField::AgeOfOnset,
        LogicalField::AgeOfDiagnosis,
        LogicalField::Sex,
        LogicalField::YearsEducation,
    ];

    /// Normalized header keys accepted for this field, highest priority first.
    pub fn candidates(self) -> &'static [&'static str] {
        match self {
            LogicalField::DonorId => &["donorid", "donor_id", "id", "donoridnumber"],
            LogicalField::Genotype => &["apoegenotype", "apoe", "apoe_genotype"],
            LogicalField::AgeOfOnset => &[
                "ageofonsetcognitivesymptoms",
                "ageofonset",
                "onsetage",
                "ageatcognitivesymptomonset",
            ],
            LogicalField::AgeOfDiagnosis => {
                &["ageofdementiadiagnosis", "ageatdiagnosis", "diagnosisage"]
            }
            LogicalField::Sex => &["sex", "gender"],
            LogicalField::YearsEducation => &["education", "yearsofeducation", "yoe"],
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            LogicalField::DonorId => "donor_id",
            LogicalField::Genotype => "genotype",
            LogicalField::AgeOfOnset => "age_of_onset",
            LogicalField::AgeOfDiagnosis => "age_of_diagnosis",
            LogicalField::Sex => "sex",
            LogicalField::YearsEducation => "years_education",
        }
    }
}

impl fmt::Display for LogicalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Normalization and resolution
// ---------------------------------------------------------------------------

/// Lowercase and drop everything that is not an ASCII letter or digit, so
/// `"APOE Genotype"`, `"apoe_genotype"` and `"APOE(Genotype)"` compare equal.
pub fn normalize_header(header: &str) -> String {
    header
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// A header that matched one of a field's candidate keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedColumn {
    /// Position of the column in the source row.
    pub index: usize,
    /// Header text exactly as it appears in the source.
    pub header: String,
}

/// Find the first candidate key that some header normalizes to.
///
/// Candidates are tried in order, so the caller's priority wins over the
/// column order of the file. When two headers normalize to the same key the
/// later column shadows the earlier one.
pub fn resolve(headers: &[String], candidates: &[&str]) -> Option<ResolvedColumn> {
    let by_key: BTreeMap<String, usize> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| (normalize_header(h), i))
        .collect();

    candidates.iter().find_map(|key| {
        by_key.get(*key).map(|&index| ResolvedColumn {
            index,
            header: headers[index].clone(),
        })
    })
}

// ---------------------------------------------------------------------------
// HeaderMapping – resolved once per source, reused for every row
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderMapping {
    columns: BTreeMap<LogicalField, ResolvedColumn>,
}

impl HeaderMapping {
    /// Resolve every [`LogicalField`] against a header row.
    pub fn from_headers(headers: &[String]) -> Self {
        let columns = LogicalField::ALL
            .iter()
            .filter_map(|&field| resolve(headers, field.candidates()).map(|col| (field, col)))
            .collect();
        HeaderMapping { columns }
    }

    pub fn column(&self, field: LogicalField) -> Option<&ResolvedColumn> {
        self.columns.get(&field)
    }

    /// Fields for which no header matched.
    pub fn unresolved(&self) -> Vec<LogicalField> {
        LogicalField::ALL
            .iter()
            .copied()
            .filter(|f| !self.columns.contains_key(f))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Raw cell for `field` in `row`; `None` when the field is unresolved or
    /// the row is too short to reach the column.
    pub fn cell<'r>(&self, field: LogicalField, row: &'r [String]) -> Option<&'r str> {
        let col = self.columns.get(&field)?;
        row.get(col.index).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn normalization_collapses_spacing_case_and_punctuation() {
        assert_eq!(normalize_header("APOE Genotype"), "apoegenotype");
        assert_eq!(normalize_header("apoe_genotype"), "apoegenotype");
        assert_eq!(normalize_header("APOE(Genotype)"), "apoegenotype");
        assert_eq!(normalize_header("  Age of Onset (cognitive symptoms) "), "ageofonsetcognitivesymptoms");
        assert_eq!(normalize_header(""), "");
    }

    #[test]
    fn equivalent_spellings_resolve_the_same_field() {
        for spelling in ["APOE Genotype", "apoe_genotype", "APOE(Genotype)", "apoe-genotype"] {
            let hs = headers(&["Donor ID", spelling, "Sex"]);
            let col = resolve(&hs, LogicalField::Genotype.candidates()).expect("resolved");
            assert_eq!(col.index, 1);
            assert_eq!(col.header, spelling);
        }
    }

    #[test]
    fn candidate_priority_beats_column_order() {
        // "apoe" appears first in the file but "apoegenotype" is the preferred key.
        let hs = headers(&["APOE", "APOE Genotype"]);
        let col = resolve(&hs, LogicalField::Genotype.candidates()).unwrap();
        assert_eq!(col.header, "APOE Genotype");
    }

    #[test]
    fn duplicate_normalized_headers_keep_the_last_column() {
        let hs = headers(&["Sex", "SEX"]);
        let col = resolve(&hs, LogicalField::Sex.candidates()).unwrap();
        assert_eq!(col.index, 1);
    }

    #[test]
    fn unknown_headers_are_unresolved() {
        let hs = headers(&["foo", "bar"]);
        let mapping = HeaderMapping::from_headers(&hs);
        assert!(mapping.is_empty());
        assert_eq!(mapping.unresolved().len(), LogicalField::ALL.len());
    }

    #[test]
    fn mapping_reads_cells_and_tolerates_short_rows() {
        let hs = headers(&["Donor ID", "Age of Onset", "Years of Education"]);
        let mapping = HeaderMapping::from_headers(&hs);
        assert_eq!(mapping.unresolved(), vec![
            LogicalField::Genotype,
            LogicalField::AgeOfDiagnosis,
            LogicalField::Sex,
        ]);

        let row = headers(&["D1", "71"]);
        assert_eq!(mapping.cell(LogicalField::DonorId, &row), Some("D1"));
        assert_eq!(mapping.cell(LogicalField::AgeOfOnset, &row), Some("71"));
        assert_eq!(mapping.cell(LogicalField::YearsEducation, &row), None);
        assert_eq!(mapping.cell(LogicalField::Sex, &row), None);
    }
}
