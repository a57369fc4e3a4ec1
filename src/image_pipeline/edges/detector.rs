use tracing::{debug, instrument};

use crate::image_pipeline::common::error::{FrameError, Result};
use crate::image_pipeline::edges::canny::canny;
use crate::image_pipeline::edges::gray::{expand_gray, to_gray};
use crate::image_pipeline::edges::types::EdgeConfig;
use crate::image_pipeline::frame::Frame;

/// Renders edges as white pixels on black, in the layout of the input frame.
#[derive(Debug, Clone, Default)]
pub struct EdgeDetector {
    config: EdgeConfig,
}

impl EdgeDetector {
    pub fn new(config: EdgeConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EdgeConfig {
        &self.config
    }

    #[instrument(skip(self, frame), fields(width = frame.width(), height = frame.height(), layout = ?frame.layout()))]
    pub fn detect(&self, frame: &Frame) -> Result<Frame> {
        frame.channels("edge detection")?;
        let (width, height) = (frame.width(), frame.height());
        let pixels = frame.pixel_count();

        let gray = to_gray(frame)?;
        check_stage("grayscale", pixels, gray.len())?;

        let edges = canny(&gray, width, height, &self.config);
        check_stage("canny", pixels, edges.len())?;

        let output = expand_gray(edges, width, height, frame.layout())?;
        check_stage("expansion", frame.data().len(), output.data().len())?;

        debug!("Edge detection complete");
        Ok(output)
    }
}

/// Stage outputs must match the frame size. A mismatch is a bug: loud in
/// debug builds, a dropped frame in release builds.
fn check_stage(stage: &'static str, expected: usize, actual: usize) -> Result<()> {
    debug_assert_eq!(expected, actual, "{stage} stage produced a buffer of the wrong size");
    if expected != actual {
        return Err(FrameError::StageMismatch {
            stage,
            expected,
            actual,
        });
    }
    Ok(())
}
