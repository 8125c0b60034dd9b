/// Cell values (compared case-insensitively after trimming) that mean "no data".
pub const MISSING_TOKENS: [&str; 7] = ["", "na", "n/a", "nan", "none", "null", "."];

// ---------------------------------------------------------------------------
// Numeric – outcome of coercing a cell to a number
// ---------------------------------------------------------------------------

/// A numeric cell is either a parsed value or absent. Malformed text lands in
/// `Absent` just like an empty cell, so it can never be mistaken for zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Numeric {
    Parsed(f64),
    Absent,
}

impl Numeric {
    pub fn value(self) -> Option<f64> {
        match self {
            Numeric::Parsed(v) => Some(v),
            Numeric::Absent => None,
        }
    }

    pub fn is_absent(self) -> bool {
        matches!(self, Numeric::Absent)
    }
}

// ---------------------------------------------------------------------------
// Coercions
// ---------------------------------------------------------------------------

/// Trim the cell and map missing-value markers to `None`.
pub fn clean_missing(raw: Option<&str>) -> Option<&str> {
    let trimmed = raw?.trim();
    let lowered = trimmed.to_lowercase();
    if MISSING_TOKENS.contains(&lowered.as_str()) {
        None
    } else {
        Some(trimmed)
    }
}

/// [`clean_missing`] followed by a float parse. Text that does not parse, or
/// parses to an infinity, is reported as [`Numeric::Absent`].
pub fn clean_numeric(raw: Option<&str>) -> Numeric {
    let Some(text) = clean_missing(raw) else {
        return Numeric::Absent;
    };
    match text.parse::<f64>() {
        Ok(v) if v.is_finite() => Numeric::Parsed(v),
        Ok(_) | Err(_) => {
            log::trace!("Treating non-numeric cell '{text}' as missing");
            Numeric::Absent
        }
    }
}

/// Remove every whitespace character, so `"3 / 4"` becomes `"3/4"`.
pub fn strip_whitespace(s: &str) -> String {
    s.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Genotype cells: cleaned like any text cell, then internal spacing removed.
pub fn clean_genotype(raw: Option<&str>) -> Option<String> {
    clean_missing(raw).map(strip_whitespace)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_tokens_in_any_case_and_padding_are_absent() {
        for token in MISSING_TOKENS {
            for variant in [
                token.to_string(),
                token.to_uppercase(),
                format!("  {token}\t"),
                format!(" {} ", token.to_uppercase()),
            ] {
                assert_eq!(clean_missing(Some(variant.as_str())), None, "token {variant:?}");
            }
        }
        assert_eq!(clean_missing(Some("N/a")), None);
        assert_eq!(clean_missing(Some("NaN")), None);
        assert_eq!(clean_missing(None), None);
    }

    #[test]
    fn present_values_are_trimmed() {
        assert_eq!(clean_missing(Some("  F ")), Some("F"));
        assert_eq!(clean_missing(Some("nana")), Some("nana"));
        assert_eq!(clean_missing(Some("..")), Some(".."));
    }

    #[test]
    fn numeric_coercion() {
        assert_eq!(clean_numeric(Some("81.0")), Numeric::Parsed(81.0));
        assert_eq!(clean_numeric(Some(" 67 ")), Numeric::Parsed(67.0));
        assert_eq!(clean_numeric(Some("-1.5e1")), Numeric::Parsed(-15.0));
        assert_eq!(clean_numeric(Some("abc")), Numeric::Absent);
        assert_eq!(clean_numeric(Some("")), Numeric::Absent);
        assert_eq!(clean_numeric(Some("N/A")), Numeric::Absent);
        assert_eq!(clean_numeric(Some("12 years")), Numeric::Absent);
        assert_eq!(clean_numeric(None), Numeric::Absent);
    }

    #[test]
    fn infinities_are_not_numbers_we_keep() {
        assert!(clean_numeric(Some("inf")).is_absent());
        assert!(clean_numeric(Some("-Infinity")).is_absent());
    }

    #[test]
    fn genotype_spacing_is_removed() {
        assert_eq!(clean_genotype(Some(" 3 / 4 ")), Some("3/4".to_string()));
        assert_eq!(clean_genotype(Some("4/\t4")), Some("4/4".to_string()));
        assert_eq!(clean_genotype(Some("na")), None);
    }
}
