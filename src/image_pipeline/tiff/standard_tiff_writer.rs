use std::io::{Cursor, Write};

use tiff::encoder::colortype::{Gray8, RGB8, RGBA8};
use tiff::encoder::{Compression, TiffEncoder, compression::DeflateLevel};
use tiff::tags::Predictor;
use tracing::debug;

use crate::image_pipeline::common::error::{FrameError, Result};
use crate::image_pipeline::frame::{ChannelLayout, Frame};
use crate::image_pipeline::tiff::types::{TiffCompression, TiffOptions};
use crate::image_pipeline::tiff::writer::TiffWriter;

/// Writes gray frames as 8-bit grayscale, BGR as RGB and BGRA as RGBA.
pub struct StandardTiffWriter;

impl TiffWriter for StandardTiffWriter {
    fn write_frame(&self, frame: &Frame, output: &mut dyn Write, options: &TiffOptions) -> Result<()> {
        debug!("Encoding TIFF image: {}x{}", frame.width(), frame.height());

        let (width, height) = (frame.width() as u32, frame.height() as u32);
        let compression = match options.compression {
            TiffCompression::None => Compression::Uncompressed,
            TiffCompression::Lzw => Compression::Lzw,
            TiffCompression::Deflate => Compression::Deflate(DeflateLevel::Balanced),
        };

        let mut buffer = Vec::new();
        {
            let mut encoder = TiffEncoder::new(Cursor::new(&mut buffer))
                .map_err(|e| FrameError::EncodeError(e.to_string()))?
                .with_compression(compression);

            if let Some(predictor_val) = options.predictor {
                let predictor = match predictor_val {
                    2 => Predictor::Horizontal,
                    _ => Predictor::None,
                };
                encoder = encoder.with_predictor(predictor);
            }

            let written = match frame.layout() {
                ChannelLayout::PackedGray1 => encoder.write_image::<Gray8>(width, height, frame.data()),
                ChannelLayout::PackedColor3 => {
                    encoder.write_image::<RGB8>(width, height, &frame.to_rgb_bytes()?)
                }
                ChannelLayout::PackedColor4WithAlpha => {
                    encoder.write_image::<RGBA8>(width, height, &frame.to_display_rgba()?)
                }
                ChannelLayout::PlanarYuv420 => {
                    return Err(FrameError::UnsupportedLayout {
                        layout: frame.layout(),
                        operation: "tiff encoding",
                    });
                }
            };
            written.map_err(|e| FrameError::EncodeError(e.to_string()))?;
        }

        output.write_all(&buffer)?;

        debug!("TIFF encoding complete");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tiff::decoder::{Decoder, DecodingResult};

    fn decode(bytes: Vec<u8>) -> ((u32, u32), Vec<u8>) {
        let mut decoder = Decoder::new(Cursor::new(bytes)).unwrap();
        let dimensions = decoder.dimensions().unwrap();
        match decoder.read_image().unwrap() {
            DecodingResult::U8(data) => (dimensions, data),
            _ => panic!("expected 8-bit samples"),
        }
    }

    #[test]
    fn test_gray_frame() {
        let frame = Frame::new(3, 2, ChannelLayout::PackedGray1, vec![0, 255, 0, 255, 0, 255]).unwrap();
        let mut output = Vec::new();
        StandardTiffWriter
            .write_frame(&frame, &mut output, &TiffOptions::default())
            .unwrap();

        let (dimensions, data) = decode(output);
        assert_eq!(dimensions, (3, 2));
        assert_eq!(data, frame.data());
    }

    #[test]
    fn test_bgr_frame_is_written_as_rgb() {
        let frame = Frame::new(1, 1, ChannelLayout::PackedColor3, vec![1, 2, 3]).unwrap();
        let mut output = Vec::new();
        let options = TiffOptions::default().with_compression(TiffCompression::Lzw);
        StandardTiffWriter.write_frame(&frame, &mut output, &options).unwrap();

        let (_, data) = decode(output);
        assert_eq!(data, vec![3, 2, 1]);
    }

    #[test]
    fn test_bgra_frame_is_written_as_rgba() {
        let frame = Frame::new(2, 1, ChannelLayout::PackedColor4WithAlpha, vec![1, 2, 3, 255, 10, 20, 30, 128]).unwrap();
        let mut output = Vec::new();
        StandardTiffWriter
            .write_frame(&frame, &mut output, &TiffOptions::default())
            .unwrap();

        let (dimensions, data) = decode(output);
        assert_eq!(dimensions, (2, 1));
        assert_eq!(data, vec![3, 2, 1, 255, 30, 20, 10, 128]);
    }

    #[test]
    fn test_horizontal_predictor_round_trip() {
        let data: Vec<u8> = (0..16 * 4).map(|i| (i * 3 % 256) as u8).collect();
        let frame = Frame::new(16, 4, ChannelLayout::PackedGray1, data).unwrap();

        for compression in [TiffCompression::Lzw, TiffCompression::Deflate] {
            let options = TiffOptions::default()
                .with_compression(compression)
                .with_predictor(Some(2));
            let mut output = Vec::new();
            StandardTiffWriter.write_frame(&frame, &mut output, &options).unwrap();

            let (_, decoded) = decode(output);
            assert_eq!(decoded, frame.data(), "{compression:?}");
        }
    }

    #[test]
    fn test_planar_frame_is_rejected() {
        let frame = Frame::filled(2, 2, ChannelLayout::PlanarYuv420, 0).unwrap();
        let mut output = Vec::new();
        let result = StandardTiffWriter.write_frame(&frame, &mut output, &TiffOptions::default());
        assert!(matches!(result, Err(FrameError::UnsupportedLayout { .. })));
        assert!(output.is_empty());
    }
}
