use crate::models::{MrzRecord, Strategy};
use crate::processing::image::stretch_gray_contrast;
use crate::processing::mrz;
use crate::processing::ocr::OcrEngine;
use crate::utils::ExtractError;
use image::{DynamicImage, GenericImageView};
use log::debug;
use tesseract::PageSegMode;

/// A recognition strategy. The pipeline holds an ordered preference list
/// of these; adding a strategy requires no reconciler changes.
pub trait MrzReader {
    fn strategy(&self) -> Strategy;

    /// One attempt, no retries. `Ok(None)` means the image holds nothing
    /// this strategy can read; `Err` is a stage fault the pipeline logs
    /// and treats the same way.
    fn attempt_read(&self, image: &DynamicImage) -> Result<Option<MrzRecord>, ExtractError>;
}

/// Structured reader: one full-page OCR pass, then MRZ-region location in
/// the recognized text and TD3 field decoding.
pub struct StructuredReader;

impl MrzReader for StructuredReader {
    fn strategy(&self) -> Strategy {
        Strategy::Structured
    }

    fn attempt_read(&self, image: &DynamicImage) -> Result<Option<MrzRecord>, ExtractError> {
        let text = OcrEngine::recognize(image, PageSegMode::PsmAuto)?;
        let lines = mrz::candidate_lines(&text);
        if lines.len() < 2 {
            debug!("structured reader found {} MRZ candidate line(s)", lines.len());
            return Ok(None);
        }
        Ok(Some(mrz::decode_td3(&lines[0], &lines[1])))
    }
}

/// Fallback reader: crop the conventional MRZ band at the bottom of the
/// page, boost it, and check the OCR output for MRZ-shaped lines. Never
/// decodes fields; a hit carries the two raw lines only.
pub struct FallbackReader {
    crop_ratio: f32,
    contrast_factor: f32,
    min_line_len: usize,
}

impl FallbackReader {
    pub fn new(crop_ratio: f32, contrast_factor: f32, min_line_len: usize) -> Self {
        FallbackReader {
            crop_ratio,
            contrast_factor,
            min_line_len,
        }
    }
}

impl Default for FallbackReader {
    fn default() -> Self {
        FallbackReader::new(0.15, 3.0, mrz::MIN_LINE_LEN)
    }
}

impl MrzReader for FallbackReader {
    fn strategy(&self) -> Strategy {
        Strategy::Fallback
    }

    fn attempt_read(&self, image: &DynamicImage) -> Result<Option<MrzRecord>, ExtractError> {
        let (width, height) = image.dimensions();
        let band_height = (height as f32 * self.crop_ratio).round() as u32;
        if width == 0 || band_height == 0 {
            return Ok(None);
        }

        let band = image.crop_imm(0, height - band_height, width, band_height);
        let boosted = stretch_gray_contrast(&band.to_luma8(), self.contrast_factor);
        let text = OcrEngine::recognize(
            &DynamicImage::ImageLuma8(boosted),
            PageSegMode::PsmSingleBlock,
        )?;

        Ok(mrz::fallback_lines_from_text(&text, self.min_line_len)
            .map(|(line1, line2)| MrzRecord::RawLines { line1, line2 }))
    }
}
