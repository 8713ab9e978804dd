use crate::models::ExtractionResult;
use crate::processing::{FallbackReader, ImageNormalizer, MrzReader, Reconciler, StructuredReader};
use crate::utils::{DiagnosticsSink, LogSink};
use crate::validation::FieldValidator;
use image::DynamicImage;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

/// Tunables for the enhancement stages and the fallback reader.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub contrast_factor: f32,
    pub sharpen_factor: f32,
    pub tile_grid: u32,
    pub fallback_crop_ratio: f32,
    pub fallback_contrast_factor: f32,
    pub min_line_len: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            contrast_factor: 2.0,
            sharpen_factor: 2.0,
            tile_grid: 8,
            fallback_crop_ratio: 0.15,
            fallback_contrast_factor: 3.0,
            min_line_len: 30,
        }
    }
}

/// ExtractionPipeline composes normalization, the reader preference list,
/// reconciliation and field validation into a single call: raw image in,
/// record-or-absent plus strategy plus warnings out.
///
/// The pipeline is stateless across calls and never propagates a fault to
/// its caller: every stage failure is reported to the diagnostics sink and
/// degrades to that stage's weakest output, ultimately an absent record.
pub struct ExtractionPipeline {
    normalizer: ImageNormalizer,
    readers: Vec<Box<dyn MrzReader>>,
    sink: Arc<dyn DiagnosticsSink>,
}

impl ExtractionPipeline {
    pub fn new() -> Self {
        Self::with_config(PipelineConfig::default())
    }

    pub fn with_config(config: PipelineConfig) -> Self {
        Self::with_sink(config, Arc::new(LogSink))
    }

    pub fn with_sink(config: PipelineConfig, sink: Arc<dyn DiagnosticsSink>) -> Self {
        let readers: Vec<Box<dyn MrzReader>> = vec![
            Box::new(StructuredReader),
            Box::new(FallbackReader::new(
                config.fallback_crop_ratio,
                config.fallback_contrast_factor,
                config.min_line_len,
            )),
        ];
        Self::with_readers(config, readers, sink)
    }

    /// Custom reader list, in preference order. The reconciler trusts
    /// earlier readers over later ones.
    pub fn with_readers(
        config: PipelineConfig,
        readers: Vec<Box<dyn MrzReader>>,
        sink: Arc<dyn DiagnosticsSink>,
    ) -> Self {
        ExtractionPipeline {
            normalizer: ImageNormalizer::new(
                config.contrast_factor,
                config.sharpen_factor,
                config.tile_grid,
                sink.clone(),
            ),
            readers,
            sink,
        }
    }

    /// Extract from encoded image bytes. Input that does not decode as an
    /// image is terminal for this call: the failure is reported to the
    /// sink and an absent result is returned instead of an error.
    pub fn extract(&self, raw: &[u8]) -> ExtractionResult {
        match image::load_from_memory(raw) {
            Ok(img) => self.extract_image(&img),
            Err(e) => {
                self.sink.stage_failure("decode", &e.to_string());
                ExtractionResult::absent()
            }
        }
    }

    /// Extract from an image file on disk.
    pub fn extract_file(&self, path: &Path) -> ExtractionResult {
        match std::fs::read(path) {
            Ok(bytes) => self.extract(&bytes),
            Err(e) => {
                self.sink.stage_failure("read", &e.to_string());
                ExtractionResult::absent()
            }
        }
    }

    /// Extract from an already decoded image. Every reader runs against
    /// the same normalized image; reconciliation then picks the winner
    /// and validation annotates it.
    pub fn extract_image(&self, raw: &DynamicImage) -> ExtractionResult {
        let normalized = self.normalizer.normalize(raw);

        let mut candidates = Vec::with_capacity(self.readers.len());
        for reader in &self.readers {
            let strategy = reader.strategy();
            let record = match reader.attempt_read(&normalized) {
                Ok(record) => record,
                Err(e) => {
                    self.sink
                        .stage_failure(&format!("{} reader", strategy), &e.to_string());
                    None
                }
            };
            candidates.push((strategy, record));
        }

        let (record, strategy) = Reconciler::reconcile(candidates);
        let warnings = record
            .as_ref()
            .map(FieldValidator::validate)
            .unwrap_or_default();

        ExtractionResult {
            record,
            strategy,
            warnings,
        }
    }
}

impl Default for ExtractionPipeline {
    fn default() -> Self {
        Self::new()
    }
}
