//! Frame worker: throttle, convert, rotate, detect, deliver.

mod edge_pipeline;
mod timing;
pub mod types;


pub use edge_pipeline::EdgePipeline;
pub use timing::{PipelineTimings, StageTiming, Timer};
pub use types::{FrameOutcome, PipelineConfig, PipelineConfigBuilder, PipelineStats};
