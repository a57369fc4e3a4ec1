//! Canny edge detection module
//!
//! Reduces a packed frame to intensity, extracts edges with a Canny detector,
//! and expands the binary edge map back into the caller's channel layout.

mod canny;
mod detector;
mod gaussian;
mod gray;
pub mod types;

pub use canny::canny;
pub use detector::EdgeDetector;
pub use gaussian::gaussian_blur;
pub use gray::{expand_gray, to_gray};
pub use types::{
    CANNY_HIGH_THRESHOLD, CANNY_LOW_THRESHOLD, EdgeConfig, EdgeConfigBuilder, ThresholdPair,
};
