use crate::utils::DiagnosticsSink;
use image::{imageops, DynamicImage, GenericImageView, GrayImage, RgbImage};
use imageproc::contrast::equalize_histogram;
use imageproc::filter::median_filter;
use std::sync::Arc;

/// ImageNormalizer applies the deterministic enhancement chain that both
/// readers run against: contrast boost, sharpening, grayscale conversion,
/// tile-based local equalization and median denoising.
///
/// Normalization never fails. A stage that cannot run (degenerate image
/// size) is reported to the diagnostics sink and skipped; the previous
/// stage's output carries forward, ultimately the original image.
pub struct ImageNormalizer {
    contrast_factor: f32,
    sharpen_factor: f32,
    tile_grid: u32,
    sink: Arc<dyn DiagnosticsSink>,
}

impl ImageNormalizer {
    pub fn new(
        contrast_factor: f32,
        sharpen_factor: f32,
        tile_grid: u32,
        sink: Arc<dyn DiagnosticsSink>,
    ) -> Self {
        ImageNormalizer {
            contrast_factor,
            sharpen_factor,
            tile_grid,
            sink,
        }
    }

    pub fn normalize(&self, raw: &DynamicImage) -> DynamicImage {
        let mut current = raw.clone();

        match self.boost_contrast(&current) {
            Ok(img) => current = img,
            Err(e) => self.sink.stage_failure("contrast", &e),
        }

        match self.sharpen(&current) {
            Ok(img) => current = img,
            Err(e) => self.sink.stage_failure("sharpen", &e),
        }

        current = DynamicImage::ImageLuma8(current.to_luma8());

        match self.equalize_tiles(&current.to_luma8()) {
            Ok(gray) => current = DynamicImage::ImageLuma8(gray),
            Err(e) => self.sink.stage_failure("equalize", &e),
        }

        match self.denoise(&current.to_luma8()) {
            Ok(gray) => current = DynamicImage::ImageLuma8(gray),
            Err(e) => self.sink.stage_failure("denoise", &e),
        }

        current
    }

    /// Linear contrast stretch about the global mean brightness.
    fn boost_contrast(&self, img: &DynamicImage) -> Result<DynamicImage, String> {
        let (w, h) = img.dimensions();
        if w == 0 || h == 0 {
            return Err("empty image".to_string());
        }
        let mean = mean_luma(img);
        let mut rgb: RgbImage = img.to_rgb8();
        for pixel in rgb.pixels_mut() {
            for c in 0..3 {
                pixel.0[c] = scale_about(pixel.0[c], mean, self.contrast_factor);
            }
        }
        Ok(DynamicImage::ImageRgb8(rgb))
    }

    /// Unsharp-style boost: blend each pixel away from a gaussian blur of
    /// itself. Factor 1.0 reproduces the input.
    fn sharpen(&self, img: &DynamicImage) -> Result<DynamicImage, String> {
        let (w, h) = img.dimensions();
        if w < 3 || h < 3 {
            return Err("image too small to sharpen".to_string());
        }
        let orig = img.to_rgb8();
        let blurred = imageops::blur(&orig, 1.0);
        let mut out = RgbImage::new(w, h);
        for (x, y, pixel) in out.enumerate_pixels_mut() {
            let o = orig.get_pixel(x, y);
            let b = blurred.get_pixel(x, y);
            for c in 0..3 {
                let v = b.0[c] as f32 + (o.0[c] as f32 - b.0[c] as f32) * self.sharpen_factor;
                pixel.0[c] = v.round().clamp(0.0, 255.0) as u8;
            }
        }
        Ok(DynamicImage::ImageRgb8(out))
    }

    /// Local adaptive contrast: the image is split into a tile grid and each
    /// tile is histogram-equalized independently. Edge tiles absorb the
    /// division remainder.
    fn equalize_tiles(&self, gray: &GrayImage) -> Result<GrayImage, String> {
        let (w, h) = gray.dimensions();
        let grid = self.tile_grid.max(1);
        let tw = w / grid;
        let th = h / grid;
        if tw < 8 || th < 8 {
            return Err(format!(
                "image too small for {}x{} tile equalization",
                grid, grid
            ));
        }
        let mut out = gray.clone();
        for ty in 0..grid {
            for tx in 0..grid {
                let x = tx * tw;
                let y = ty * th;
                let cw = if tx == grid - 1 { w - x } else { tw };
                let ch = if ty == grid - 1 { h - y } else { th };
                let tile = imageops::crop_imm(gray, x, y, cw, ch).to_image();
                let eq = equalize_histogram(&tile);
                imageops::replace(&mut out, &eq, x as i64, y as i64);
            }
        }
        Ok(out)
    }

    fn denoise(&self, gray: &GrayImage) -> Result<GrayImage, String> {
        if gray.width() < 3 || gray.height() < 3 {
            return Err("image too small to denoise".to_string());
        }
        Ok(median_filter(gray, 1, 1))
    }
}

/// Contrast stretch for a grayscale crop, used by the fallback reader's
/// dedicated MRZ-band boost.
pub fn stretch_gray_contrast(gray: &GrayImage, factor: f32) -> GrayImage {
    let count = gray.width() as u64 * gray.height() as u64;
    if count == 0 {
        return gray.clone();
    }
    let sum: u64 = gray.pixels().map(|p| p.0[0] as u64).sum();
    let mean = sum as f32 / count as f32;
    let mut out = gray.clone();
    for pixel in out.pixels_mut() {
        pixel.0[0] = scale_about(pixel.0[0], mean, factor);
    }
    out
}

fn scale_about(value: u8, mean: f32, factor: f32) -> u8 {
    (mean + (value as f32 - mean) * factor)
        .round()
        .clamp(0.0, 255.0) as u8
}

fn mean_luma(img: &DynamicImage) -> f32 {
    let gray = img.to_luma8();
    let sum: u64 = gray.pixels().map(|p| p.0[0] as u64).sum();
    sum as f32 / (gray.width() as f32 * gray.height() as f32)
}
