pub mod image;
pub mod mrz;
pub mod ocr;
pub mod readers;
pub mod reconcile;

pub use image::ImageNormalizer;
pub use ocr::OcrEngine;
pub use readers::{FallbackReader, MrzReader, StructuredReader};
pub use reconcile::Reconciler;
