use crate::models::MrzRecord;
use lazy_static::lazy_static;
use regex::Regex;

/// Minimum plausible length of an MRZ line. Real TD3 lines are 44
/// characters; anything at or below this is OCR noise.
pub const MIN_LINE_LEN: usize = 30;

/// TD3 line width (passport booklet format).
pub const TD3_LINE_LEN: usize = 44;

lazy_static! {
    static ref MRZ_LINE_RE: Regex = Regex::new(r"^[A-Z0-9<]+$").unwrap();
}

/// Normalize a raw OCR line: trim, uppercase, spaces become the filler
/// character.
pub fn clean_line(line: &str) -> String {
    line.trim().to_uppercase().replace(' ', "<")
}

/// Locate MRZ-shaped lines in full-page OCR output. A candidate is longer
/// than the minimum MRZ line length, drawn entirely from the MRZ alphabet
/// after cleanup, and contains at least one filler character.
pub fn candidate_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(clean_line)
        .filter(|line| {
            line.chars().count() > MIN_LINE_LEN && line.contains('<') && MRZ_LINE_RE.is_match(line)
        })
        .collect()
}

/// Repair digit lookalikes the OCR engine commonly confuses. Applied only
/// to all-numeric MRZ subfields (the two dates); letters are legitimate
/// everywhere else.
pub fn fix_digit_confusables(field: &str) -> String {
    field
        .chars()
        .map(|c| match c {
            'O' | 'Q' | 'D' => '0',
            'I' | 'L' => '1',
            'Z' => '2',
            'S' => '5',
            'G' => '6',
            'B' => '8',
            other => other,
        })
        .collect()
}

/// Decode two cleaned MRZ lines following the TD3 layout (ICAO Doc 9303).
/// Line 1: document type, issuing country, then names from position 5.
/// Line 2: document number (0..9), nationality (10..13), birth date
/// (13..19), sex (20), expiry date (21..27).
///
/// Every field is independently nullable: a line too short or a
/// filler-only slice yields `None` for that field without discarding the
/// rest of the record.
pub fn decode_td3(line1: &str, line2: &str) -> MrzRecord {
    let line1: String = line1.chars().take(TD3_LINE_LEN).collect();
    let line2: String = line2.chars().take(TD3_LINE_LEN).collect();

    let names = decode_names(&line1);
    let number = slice_chars(&line2, 0, 9).filter(|s| !is_filler_only(s));
    let nationality = slice_chars(&line2, 10, 13)
        .map(|s| s.trim_matches('<').to_string())
        .filter(|s| !s.is_empty());
    let date_of_birth = slice_chars(&line2, 13, 19).map(|s| fix_digit_confusables(&s));
    let sex = slice_chars(&line2, 20, 21);
    let expiration_date = slice_chars(&line2, 21, 27).map(|s| fix_digit_confusables(&s));

    MrzRecord::Decoded {
        names,
        nationality,
        number,
        date_of_birth,
        expiration_date,
        sex,
    }
}

/// The name field runs from position 5 to the end of line 1: surname,
/// double filler, given names, filler-padded.
fn decode_names(line1: &str) -> Option<String> {
    let raw: String = line1.chars().skip(5).collect();
    if raw.is_empty() {
        return None;
    }
    let mut parts = raw.splitn(2, "<<");
    let surname = parts.next().unwrap_or("").replace('<', " ");
    let given = parts.next().unwrap_or("").replace('<', " ");
    let full = format!("{} {}", surname.trim(), given.trim());
    let full = full.trim().to_string();
    if full.is_empty() {
        None
    } else {
        Some(full)
    }
}

/// Fallback line-shape heuristic over raw OCR output: keep lines longer
/// than the minimum MRZ length and accept only if at least two qualify.
/// The accepted lines are returned verbatim.
pub fn fallback_lines_from_text(text: &str, min_len: usize) -> Option<(String, String)> {
    let mut qualifying = text.lines().filter(|line| line.chars().count() > min_len);
    let line1 = qualifying.next()?.to_string();
    let line2 = qualifying.next()?.to_string();
    Some((line1, line2))
}

fn slice_chars(s: &str, start: usize, end: usize) -> Option<String> {
    if s.chars().count() < end {
        return None;
    }
    Some(s.chars().skip(start).take(end - start).collect())
}

fn is_filler_only(s: &str) -> bool {
    s.chars().all(|c| c == '<')
}

#[cfg(test)]
mod tests {
    use super::*;

    // ICAO Doc 9303 specimen MRZ.
    const LINE1: &str = "P<UTOERIKSSON<<ANNA<MARIA<<<<<<<<<<<<<<<<<<<";
    const LINE2: &str = "L898902C36UTO7408122F1204159ZE184226B<<<<<10";

    #[test]
    fn decodes_the_specimen_td3_mrz() {
        let record = decode_td3(LINE1, LINE2);
        match record {
            MrzRecord::Decoded {
                names,
                nationality,
                number,
                date_of_birth,
                expiration_date,
                sex,
            } => {
                assert_eq!(names.as_deref(), Some("ERIKSSON ANNA MARIA"));
                assert_eq!(nationality.as_deref(), Some("UTO"));
                assert_eq!(number.as_deref(), Some("L898902C3"));
                assert_eq!(date_of_birth.as_deref(), Some("740812"));
                assert_eq!(expiration_date.as_deref(), Some("120415"));
                assert_eq!(sex.as_deref(), Some("F"));
            }
            MrzRecord::RawLines { .. } => panic!("expected a decoded record"),
        }
    }

    #[test]
    fn short_second_line_leaves_missing_fields_absent() {
        let record = decode_td3(LINE1, "L898902C36UTO7408");
        match record {
            MrzRecord::Decoded {
                number,
                nationality,
                date_of_birth,
                expiration_date,
                sex,
                ..
            } => {
                assert_eq!(number.as_deref(), Some("L898902C3"));
                assert_eq!(nationality.as_deref(), Some("UTO"));
                assert_eq!(date_of_birth, None);
                assert_eq!(sex, None);
                assert_eq!(expiration_date, None);
            }
            MrzRecord::RawLines { .. } => panic!("expected a decoded record"),
        }
    }

    #[test]
    fn candidate_lines_keep_only_mrz_shaped_text() {
        let text = format!(
            "REPUBLIC OF UTOPIA\nPassport No L898902C3\n{}\n{}\nshort<<line",
            LINE1, LINE2
        );
        let lines = candidate_lines(&text);
        assert_eq!(lines, vec![LINE1.to_string(), LINE2.to_string()]);
    }

    #[test]
    fn candidate_lines_normalize_case_and_spaces() {
        let noisy = "p<utoeriksson<<anna maria<<<<<<<<<<<<<<<<<<<";
        let lines = candidate_lines(noisy);
        assert_eq!(lines, vec![LINE1.to_string()]);
    }

    #[test]
    fn digit_confusables_are_repaired() {
        assert_eq!(fix_digit_confusables("74O8I2"), "740812");
        assert_eq!(fix_digit_confusables("IZO4S9"), "120459");
        assert_eq!(fix_digit_confusables("120415"), "120415");
    }

    #[test]
    fn fallback_requires_two_long_lines() {
        assert_eq!(fallback_lines_from_text("", MIN_LINE_LEN), None);
        assert_eq!(
            fallback_lines_from_text("ONE<SHORT<LINE", MIN_LINE_LEN),
            None
        );
        let one_long = format!("{}\ntiny", LINE1);
        assert_eq!(fallback_lines_from_text(&one_long, MIN_LINE_LEN), None);
    }

    #[test]
    fn fallback_returns_qualifying_lines_verbatim() {
        let text = format!("noise\n{}\nshort\n{}\n", LINE1, LINE2);
        let (l1, l2) = fallback_lines_from_text(&text, MIN_LINE_LEN).unwrap();
        assert_eq!(l1, LINE1);
        assert_eq!(l2, LINE2);
    }
}
