use crate::utils::ExtractError;
use image::{DynamicImage, ImageFormat};
use std::io::Cursor;
use tempfile::NamedTempFile;
use tesseract::{PageSegMode, Tesseract};

/// Characters valid in a machine-readable zone.
pub const MRZ_CHARSET: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789<";

/// Thin wrapper around Tesseract constrained to the MRZ alphabet.
///
/// Tesseract reads from a file path, so each call round-trips the image
/// through a named temporary file; the file is removed when the handle
/// drops, on success and on every error path.
pub struct OcrEngine;

impl OcrEngine {
    pub fn recognize(image: &DynamicImage, mode: PageSegMode) -> Result<String, ExtractError> {
        let temp_file = write_temp_png(image)?;
        let path_str = temp_file
            .path()
            .to_str()
            .ok_or_else(|| ExtractError::Ocr("temp path is not valid UTF-8".to_string()))?;

        let mut tess = Tesseract::new(None, Some("eng"))
            .map_err(|e| ExtractError::Ocr(format!("failed to initialize Tesseract: {}", e)))?
            .set_variable("tessedit_char_whitelist", MRZ_CHARSET)
            .map_err(|e| ExtractError::Ocr(format!("failed to set char whitelist: {}", e)))?;

        tess.set_page_seg_mode(mode);

        let mut tess = tess
            .set_image(path_str)
            .map_err(|e| ExtractError::Ocr(format!("failed to set image: {}", e)))?;

        tess.get_text()
            .map_err(|e| ExtractError::Ocr(format!("failed to extract text: {}", e)))
    }
}

fn write_temp_png(image: &DynamicImage) -> Result<NamedTempFile, ExtractError> {
    let mut buffer = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
        .map_err(|e| ExtractError::ImageProcessing(format!("failed to encode image: {}", e)))?;

    let temp_file = tempfile::Builder::new().suffix(".png").tempfile()?;
    std::fs::write(temp_file.path(), &buffer)?;
    Ok(temp_file)
}
