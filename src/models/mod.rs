pub mod data;

pub use data::{ExtractionResult, MrzRecord, Strategy, ValidationWarning};
