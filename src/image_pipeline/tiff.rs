//! TIFF writing module
//!
//! Encodes edge frames as TIFF files with various compression options.

mod standard_tiff_writer;
pub mod types;
mod writer;

pub use standard_tiff_writer::StandardTiffWriter;
pub use types::{TiffCompression, TiffOptions};
pub use writer::TiffWriter;
