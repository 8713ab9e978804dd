use serde::{Deserialize, Serialize};
use std::fmt;

/// Result of MRZ recognition. `Decoded` carries the named fields, each
/// independently nullable since recognition may partially fail; `RawLines`
/// is the fallback reader's undecoded two-line result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MrzRecord {
    Decoded {
        names: Option<String>,
        nationality: Option<String>,
        number: Option<String>,
        date_of_birth: Option<String>,
        expiration_date: Option<String>,
        sex: Option<String>,
    },
    RawLines {
        line1: String,
        line2: String,
    },
}

impl MrzRecord {
    pub fn empty_decoded() -> Self {
        MrzRecord::Decoded {
            names: None,
            nationality: None,
            number: None,
            date_of_birth: None,
            expiration_date: None,
            sex: None,
        }
    }
}

/// Which recognition strategy produced the reconciled record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    Structured,
    Fallback,
    None,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Strategy::Structured => write!(f, "structured"),
            Strategy::Fallback => write!(f, "fallback"),
            Strategy::None => write!(f, "none"),
        }
    }
}

/// Non-fatal annotation that a decoded field is implausible or malformed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationWarning {
    BirthDateInFuture,
    BirthDateUnparseable,
    ExpiryDateInPast,
    ExpiryDateUnparseable,
    DocumentNumberMalformed,
    SexCodeUnknown,
}

impl fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let msg = match self {
            ValidationWarning::BirthDateInFuture => "birth date in future",
            ValidationWarning::BirthDateUnparseable => "birth date unparseable",
            ValidationWarning::ExpiryDateInPast => "expiry date in past",
            ValidationWarning::ExpiryDateUnparseable => "expiry date unparseable",
            ValidationWarning::DocumentNumberMalformed => "document number malformed",
            ValidationWarning::SexCodeUnknown => "sex code unknown",
        };
        write!(f, "{}", msg)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub record: Option<MrzRecord>,
    pub strategy: Strategy,
    pub warnings: Vec<ValidationWarning>,
}

impl ExtractionResult {
    pub fn absent() -> Self {
        ExtractionResult {
            record: None,
            strategy: Strategy::None,
            warnings: Vec::new(),
        }
    }
}
