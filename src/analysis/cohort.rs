use std::fmt;

use serde::Serialize;

use crate::data::model::PatientRecord;

/// Genotypes carrying at least one E4 allele that define the E4 cohort.
pub const E4_GENOTYPES: [&str; 2] = ["3/4", "4/4"];

/// The two cohorts patients are split into. There is no third "unknown"
/// cohort: a missing genotype is grouped with the non-carriers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum CohortLabel {
    E4Present,
    E4NotPresent,
}

impl CohortLabel {
    pub const ALL: [CohortLabel; 2] = [CohortLabel::E4Present, CohortLabel::E4NotPresent];

    pub fn label(self) -> &'static str {
        match self {
            CohortLabel::E4Present => "E4 Present",
            CohortLabel::E4NotPresent => "E4 Not Present",
        }
    }
}

impl fmt::Display for CohortLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// `E4Present` iff the trimmed genotype is exactly one of [`E4_GENOTYPES`].
pub fn classify(genotype: Option<&str>) -> CohortLabel {
    match genotype {
        // Not genotyped: counted as a non-carrier.
        None => CohortLabel::E4NotPresent,
        Some(g) if E4_GENOTYPES.contains(&g.trim()) => CohortLabel::E4Present,
        Some(_) => CohortLabel::E4NotPresent,
    }
}

pub fn classify_record(p: &PatientRecord) -> CohortLabel {
    classify(p.genotype.as_deref())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn e4_genotypes_are_present() {
        assert_eq!(classify(Some("3/4")), CohortLabel::E4Present);
        assert_eq!(classify(Some("4/4")), CohortLabel::E4Present);
        assert_eq!(classify(Some(" 4/4 ")), CohortLabel::E4Present);
    }

    #[test]
    fn everything_else_is_not_present() {
        assert_eq!(classify(Some("3/3")), CohortLabel::E4NotPresent);
        assert_eq!(classify(Some("2/3")), CohortLabel::E4NotPresent);
        assert_eq!(classify(Some("2/4 ")), CohortLabel::E4NotPresent);
        assert_eq!(classify(Some("4/3")), CohortLabel::E4NotPresent);
        assert_eq!(classify(Some("3/4/4")), CohortLabel::E4NotPresent);
        assert_eq!(classify(Some("")), CohortLabel::E4NotPresent);
    }

    #[test]
    fn missing_genotype_is_folded_into_not_present() {
        assert_eq!(classify(None), CohortLabel::E4NotPresent);
    }

    #[test]
    fn labels() {
        assert_eq!(CohortLabel::E4Present.to_string(), "E4 Present");
        assert_eq!(CohortLabel::E4NotPresent.to_string(), "E4 Not Present");
    }
}
