pub mod diag;
pub mod error;

pub use diag::{DiagnosticsSink, LogSink};
pub use error::ExtractError;
