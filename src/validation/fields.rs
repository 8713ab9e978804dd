use crate::models::{MrzRecord, ValidationWarning};
use chrono::{Datelike, Local, NaiveDate};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Document number as printed in the MRZ, filler characters included.
    static ref DOC_NUMBER_RE: Regex = Regex::new(r"^[A-Z0-9<]{6,20}$").unwrap();
}

/// FieldValidator checks a reconciled record against domain rules and
/// accumulates human-readable warnings. No check is fatal and none
/// short-circuits: the warning order is fixed regardless of which checks
/// fire. A `RawLines` record has no decoded fields, so every check
/// reports its unparseable/malformed warning.
pub struct FieldValidator;

impl FieldValidator {
    pub fn validate(record: &MrzRecord) -> Vec<ValidationWarning> {
        Self::validate_at(record, Local::now().date_naive())
    }

    /// Validation against an explicit reference date, so tests are
    /// deterministic.
    pub fn validate_at(record: &MrzRecord, today: NaiveDate) -> Vec<ValidationWarning> {
        let (date_of_birth, expiration_date, number, sex) = match record {
            MrzRecord::Decoded {
                date_of_birth,
                expiration_date,
                number,
                sex,
                ..
            } => (
                date_of_birth.as_deref(),
                expiration_date.as_deref(),
                number.as_deref(),
                sex.as_deref(),
            ),
            MrzRecord::RawLines { .. } => (None, None, None, None),
        };

        let mut warnings = Vec::new();

        match date_of_birth.and_then(|s| parse_mrz_date(s, today)) {
            Some(date) if date > today => warnings.push(ValidationWarning::BirthDateInFuture),
            Some(_) => {}
            None => warnings.push(ValidationWarning::BirthDateUnparseable),
        }

        match expiration_date.and_then(|s| parse_mrz_date(s, today)) {
            Some(date) if date < today => warnings.push(ValidationWarning::ExpiryDateInPast),
            Some(_) => {}
            None => warnings.push(ValidationWarning::ExpiryDateUnparseable),
        }

        match number {
            Some(n) if DOC_NUMBER_RE.is_match(n) => {}
            _ => warnings.push(ValidationWarning::DocumentNumberMalformed),
        }

        match sex {
            Some("M") | Some("F") | Some("<") => {}
            _ => warnings.push(ValidationWarning::SexCodeUnknown),
        }

        warnings
    }
}

/// Parse a `YYMMDD` MRZ date. Two-digit years pivot on the reference
/// year: `yy` maps into the 2000s when it is at most ten years past the
/// reference year's last two digits, otherwise into the 1900s.
fn parse_mrz_date(s: &str, today: NaiveDate) -> Option<NaiveDate> {
    if s.len() != 6 || !s.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let yy: i32 = s[0..2].parse().ok()?;
    let month: u32 = s[2..4].parse().ok()?;
    let day: u32 = s[4..6].parse().ok()?;
    let pivot = today.year() % 100 + 10;
    let year = if yy <= pivot { 2000 + yy } else { 1900 + yy };
    NaiveDate::from_ymd_opt(year, month, day)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ValidationWarning::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 29).unwrap()
    }

    fn record(
        date_of_birth: Option<&str>,
        expiration_date: Option<&str>,
        number: Option<&str>,
        sex: Option<&str>,
    ) -> MrzRecord {
        MrzRecord::Decoded {
            names: Some("ERIKSSON ANNA MARIA".to_string()),
            nationality: Some("UTO".to_string()),
            number: number.map(str::to_string),
            date_of_birth: date_of_birth.map(str::to_string),
            expiration_date: expiration_date.map(str::to_string),
            sex: sex.map(str::to_string),
        }
    }

    #[test]
    fn fully_valid_record_produces_no_warnings() {
        let rec = record(Some("740812"), Some("301231"), Some("L898902C3"), Some("F"));
        assert!(FieldValidator::validate_at(&rec, today()).is_empty());
    }

    #[test]
    fn warnings_accumulate_in_fixed_order() {
        let rec = record(Some("ZZZZZZ"), Some("120415"), Some("a!"), Some("X"));
        assert_eq!(
            FieldValidator::validate_at(&rec, today()),
            vec![
                BirthDateUnparseable,
                ExpiryDateInPast,
                DocumentNumberMalformed,
                SexCodeUnknown
            ]
        );
    }

    #[test]
    fn raw_lines_record_fails_every_decoded_field_check() {
        let rec = MrzRecord::RawLines {
            line1: "P<UTOERIKSSON<<ANNA<MARIA<<<<<<<<<<<<<<<<<<<".to_string(),
            line2: "L898902C36UTO7408122F1204159ZE184226B<<<<<10".to_string(),
        };
        assert_eq!(
            FieldValidator::validate_at(&rec, today()),
            vec![
                BirthDateUnparseable,
                ExpiryDateUnparseable,
                DocumentNumberMalformed,
                SexCodeUnknown
            ]
        );
    }

    #[test]
    fn century_pivot_maps_fifty_into_the_nineteen_hundreds() {
        // Reference year 2026: pivot is 36, so 50 means 1950, which is in
        // the past and produces no warning.
        let rec = record(Some("500101"), Some("301231"), Some("L898902C3"), Some("M"));
        assert!(FieldValidator::validate_at(&rec, today()).is_empty());
    }

    #[test]
    fn birth_date_in_the_future_is_flagged() {
        let rec = record(Some("301231"), Some("311231"), Some("L898902C3"), Some("M"));
        assert_eq!(
            FieldValidator::validate_at(&rec, today()),
            vec![BirthDateInFuture]
        );
    }

    #[test]
    fn expired_document_is_flagged() {
        let rec = record(Some("740812"), Some("120415"), Some("L898902C3"), Some("F"));
        assert_eq!(
            FieldValidator::validate_at(&rec, today()),
            vec![ExpiryDateInPast]
        );
    }

    #[test]
    fn document_number_with_fillers_is_well_formed() {
        let rec = record(Some("740812"), Some("301231"), Some("AB12<<99"), Some("F"));
        assert!(FieldValidator::validate_at(&rec, today()).is_empty());
    }

    #[test]
    fn short_lowercase_document_number_is_malformed() {
        let rec = record(Some("740812"), Some("301231"), Some("a!"), Some("F"));
        assert_eq!(
            FieldValidator::validate_at(&rec, today()),
            vec![DocumentNumberMalformed]
        );
    }

    #[test]
    fn absent_fields_warn_without_discarding_the_record() {
        let rec = record(None, None, None, None);
        assert_eq!(
            FieldValidator::validate_at(&rec, today()),
            vec![
                BirthDateUnparseable,
                ExpiryDateUnparseable,
                DocumentNumberMalformed,
                SexCodeUnknown
            ]
        );
    }

    #[test]
    fn filler_sex_code_is_accepted() {
        let rec = record(Some("740812"), Some("301231"), Some("L898902C3"), Some("<"));
        assert!(FieldValidator::validate_at(&rec, today()).is_empty());
    }

    #[test]
    fn nonexistent_calendar_date_is_unparseable() {
        let rec = record(Some("740231"), Some("301231"), Some("L898902C3"), Some("F"));
        assert_eq!(
            FieldValidator::validate_at(&rec, today()),
            vec![BirthDateUnparseable]
        );
    }
}
