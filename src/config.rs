//! Pipeline run configuration.

/// Configuration for pipeline runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Name used in log events (default: "pipeline").
    pub label: String,
    /// Maximum number of source elements pulled per run (default: unlimited).
    ///
    /// Useful as a guard when the source may be infinite. Elements past the
    /// limit are never pulled from the source.
    pub element_limit: Option<usize>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            label: "pipeline".to_string(),
            element_limit: None,
        }
    }
}

impl PipelineConfig {
    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the label used in log events.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Cap the number of source elements pulled per run.
    pub fn with_element_limit(mut self, limit: usize) -> Self {
        self.element_limit = Some(limit);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PipelineConfig::new();
        assert_eq!(config.label, "pipeline");
        assert_eq!(config.element_limit, None);
    }

    #[test]
    fn test_builder() {
        let config = PipelineConfig::default()
            .with_label("ingest")
            .with_element_limit(100);
        assert_eq!(config.label, "ingest");
        assert_eq!(config.element_limit, Some(100));
    }
}
