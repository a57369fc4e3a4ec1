use thiserror::Error;

use crate::image_pipeline::frame::ChannelLayout;

#[derive(Error, Debug)]
pub enum FrameError {
    #[error("Malformed {layout:?} buffer: expected {expected} bytes, got {actual}")]
    MalformedInput {
        layout: ChannelLayout,
        expected: usize,
        actual: usize,
    },

    #[error("Invalid image dimensions: width={0}, height={1}")]
    InvalidDimensions(usize, usize),

    #[error("{operation} does not support {layout:?} frames")]
    UnsupportedLayout {
        layout: ChannelLayout,
        operation: &'static str,
    },

    #[error("Stage {stage} produced {actual} samples, expected {expected}")]
    StageMismatch {
        stage: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Invalid rotation: {0} degrees")]
    InvalidRotation(u32),

    #[error("Invalid threshold pair: low={low}, high={high}")]
    InvalidThresholds { low: f64, high: f64 },

    #[error("Failed to read input file: {0}")]
    InputReadError(String),

    #[error("Failed to write output file: {0}")]
    OutputWriteError(String),

    #[error("Failed to encode TIFF image: {0}")]
    EncodeError(String),

    #[error("Frame sink is closed")]
    SinkClosed,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl FrameError {
    /// Errors that only poison the current frame. The pipeline drops the frame
    /// and moves on to the next one.
    pub fn is_frame_local(&self) -> bool {
        matches!(
            self,
            FrameError::MalformedInput { .. }
                | FrameError::InvalidDimensions(..)
                | FrameError::UnsupportedLayout { .. }
                | FrameError::StageMismatch { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, FrameError>;
