use log::warn;

/// Sink for stage-level failure diagnostics. The pipeline reports every
/// recoverable stage fault here and carries on; the sink has no influence
/// on pipeline behavior.
pub trait DiagnosticsSink: Send + Sync {
    fn stage_failure(&self, stage: &str, detail: &str);
}

/// Default sink forwarding to the process-wide logger.
pub struct LogSink;

impl DiagnosticsSink for LogSink {
    fn stage_failure(&self, stage: &str, detail: &str) {
        warn!("stage '{}' failed: {}", stage, detail);
    }
}

#[cfg(test)]
pub mod testing {
    use super::DiagnosticsSink;
    use std::sync::Mutex;

    /// Records every reported failure so tests can assert on diagnostics.
    #[derive(Default)]
    pub struct CaptureSink {
        pub entries: Mutex<Vec<(String, String)>>,
    }

    impl DiagnosticsSink for CaptureSink {
        fn stage_failure(&self, stage: &str, detail: &str) {
            self.entries
                .lock()
                .unwrap()
                .push((stage.to_string(), detail.to_string()));
        }
    }
}
