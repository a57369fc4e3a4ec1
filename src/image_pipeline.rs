//! Edge detection pipeline module
//!
//! Camera frames come in as planar YUV or packed colour, get converted to BGR,
//! rotated upright, reduced to a Canny edge map, and handed to a sink. Each
//! stage lives in its own module and can be used on its own.

pub mod common;
pub mod edges;
pub mod frame;
pub mod io;
pub mod pipeline;
pub mod rotate;
pub mod throttle;
pub mod tiff;
pub mod yuv;

pub use common::{FrameError, Result};

pub use frame::{CapturedFrame, ChannelLayout, ChromaOrder, Frame, Rotation};

pub use yuv::YuvConverter;

pub use rotate::rotate;

pub use edges::{
    CANNY_HIGH_THRESHOLD, CANNY_LOW_THRESHOLD, EdgeConfig, EdgeDetector, ThresholdPair,
};

pub use throttle::{FrameThrottle, MIN_FRAME_INTERVAL};

pub use io::{
    ChannelSink, FrameFormat, FrameSink, FrameSource, LatestFrameReceiver, LatestFrameSender,
    RawFrameSource, TiffFileSink, latest_frame_slot,
};

pub use tiff::{StandardTiffWriter, TiffCompression, TiffOptions, TiffWriter};

pub use pipeline::{
    EdgePipeline, FrameOutcome, PipelineConfig, PipelineConfigBuilder, PipelineStats,
    PipelineTimings,
};
