use std::io::Write;

use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::frame::Frame;
use crate::image_pipeline::tiff::types::TiffOptions;

pub trait TiffWriter {
    fn write_frame(&self, frame: &Frame, output: &mut dyn Write, options: &TiffOptions) -> Result<()>;
}
