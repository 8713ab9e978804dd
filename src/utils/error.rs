use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("image decode error: {0}")]
    Decode(#[from] image::ImageError),
    #[error("image processing error: {0}")]
    ImageProcessing(String),
    #[error("OCR error: {0}")]
    Ocr(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
