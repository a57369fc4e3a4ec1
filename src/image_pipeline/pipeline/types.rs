use std::time::Duration;

use crate::image_pipeline::edges::{EdgeConfig, ThresholdPair};
use crate::image_pipeline::frame::ChromaOrder;
use crate::image_pipeline::throttle::MIN_FRAME_INTERVAL;

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub edges: EdgeConfig,
    /// `None` processes every frame.
    pub min_frame_interval: Option<Duration>,
    pub chroma_order: ChromaOrder,
    pub validate_dimensions: bool,
    pub max_dimension: Option<usize>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            edges: EdgeConfig::default(),
            min_frame_interval: Some(MIN_FRAME_INTERVAL),
            chroma_order: ChromaOrder::default(),
            validate_dimensions: true,
            max_dimension: Some(16384),
        }
    }
}

impl PipelineConfig {
    pub fn builder() -> PipelineConfigBuilder {
        PipelineConfigBuilder::default()
    }
}

#[derive(Default)]
pub struct PipelineConfigBuilder {
    thresholds: Option<ThresholdPair>,
    blur: Option<bool>,
    min_frame_interval: Option<Option<Duration>>,
    chroma_order: Option<ChromaOrder>,
    validate_dimensions: Option<bool>,
    max_dimension: Option<Option<usize>>,
}

impl PipelineConfigBuilder {
    pub fn thresholds(mut self, thresholds: ThresholdPair) -> Self {
        self.thresholds = Some(thresholds);
        self
    }

    pub fn blur(mut self, enable: bool) -> Self {
        self.blur = Some(enable);
        self
    }

    pub fn min_frame_interval(mut self, interval: Option<Duration>) -> Self {
        self.min_frame_interval = Some(interval);
        self
    }

    pub fn chroma_order(mut self, order: ChromaOrder) -> Self {
        self.chroma_order = Some(order);
        self
    }

    pub fn validate_dimensions(mut self, validate: bool) -> Self {
        self.validate_dimensions = Some(validate);
        self
    }

    pub fn max_dimension(mut self, max: Option<usize>) -> Self {
        self.max_dimension = Some(max);
        self
    }

    pub fn build(self) -> PipelineConfig {
        let default = PipelineConfig::default();
        PipelineConfig {
            edges: EdgeConfig {
                thresholds: self.thresholds.unwrap_or(default.edges.thresholds),
                blur: self.blur.unwrap_or(default.edges.blur),
            },
            min_frame_interval: self.min_frame_interval.unwrap_or(default.min_frame_interval),
            chroma_order: self.chroma_order.unwrap_or(default.chroma_order),
            validate_dimensions: self.validate_dimensions.unwrap_or(default.validate_dimensions),
            max_dimension: self.max_dimension.unwrap_or(default.max_dimension),
        }
    }
}

/// What happened to a frame handed to the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    Delivered { width: usize, height: usize },
    /// Arrived too soon after the last processed frame.
    Throttled,
    /// The pipeline was not running.
    Stopped,
}

/// Frame counters since the pipeline was created.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineStats {
    pub received: u64,
    pub delivered: u64,
    pub throttled: u64,
    /// Frames discarded because of a frame-local error.
    pub dropped: u64,
    pub stopped: u64,
}
