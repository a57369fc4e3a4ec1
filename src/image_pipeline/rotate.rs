//! Rotation normalizer
//!
//! Bakes a [`Rotation`] into a packed frame so later stages only ever see
//! upright images.

use tracing::debug;

use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::frame::{Frame, Rotation};

/// Rotates `frame` clockwise by `rotation`.
///
/// [`Rotation::Rotate0`] hands the frame back untouched. Quarter turns swap
/// width and height. Planar frames are rejected.
pub fn rotate(frame: Frame, rotation: Rotation) -> Result<Frame> {
    let channels = frame.channels("rotation")?;
    if rotation == Rotation::Rotate0 {
        return Ok(frame);
    }

    let (width, height) = (frame.width(), frame.height());
    debug!(width, height, degrees = rotation.degrees(), "Rotating frame");

    let src = frame.data();
    let mut out = vec![0u8; src.len()];
    let (out_width, out_height) = if rotation.swaps_dimensions() {
        (height, width)
    } else {
        (width, height)
    };

    for row in 0..out_height {
        for col in 0..out_width {
            let (src_x, src_y) = match rotation {
                Rotation::Rotate90 => (row, height - 1 - col),
                Rotation::Rotate180 => (width - 1 - col, height - 1 - row),
                Rotation::Rotate270 => (width - 1 - row, col),
                Rotation::Rotate0 => (col, row),
            };
            let from = (src_y * width + src_x) * channels;
            let to = (row * out_width + col) * channels;
            out[to..to + channels].copy_from_slice(&src[from..from + channels]);
        }
    }

    Frame::new(out_width, out_height, frame.layout(), out)
}
