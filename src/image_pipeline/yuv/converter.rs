use tracing::debug;

use crate::image_pipeline::common::error::{FrameError, Result};
use crate::image_pipeline::frame::{ChannelLayout, ChromaOrder, Frame};
use crate::image_pipeline::yuv::{bt601::yuv_to_bgr, interleave::interleave_vu};

/// Converts YUV 4:2:0 frames into packed BGR frames of the same size.
#[derive(Debug, Clone, Copy, Default)]
pub struct YuvConverter {
    chroma_order: ChromaOrder,
}

impl YuvConverter {
    pub fn new(chroma_order: ChromaOrder) -> Self {
        Self { chroma_order }
    }

    pub fn chroma_order(&self) -> ChromaOrder {
        self.chroma_order
    }

    /// Converts a `PlanarYuv420` frame.
    pub fn convert(&self, frame: &Frame) -> Result<Frame> {
        if frame.layout() != ChannelLayout::PlanarYuv420 {
            return Err(FrameError::UnsupportedLayout {
                layout: frame.layout(),
                operation: "yuv conversion",
            });
        }
        self.convert_bytes(frame.data(), frame.width(), frame.height())
    }

    /// Converts a raw YUV 4:2:0 buffer straight from a source.
    ///
    /// The buffer must hold exactly `width * height * 3 / 2` bytes and both
    /// dimensions must be even.
    pub fn convert_bytes(&self, data: &[u8], width: usize, height: usize) -> Result<Frame> {
        if width == 0 || height == 0 || width % 2 != 0 || height % 2 != 0 {
            return Err(FrameError::InvalidDimensions(width, height));
        }
        let expected = ChannelLayout::PlanarYuv420
            .buffer_len(width, height)
            .ok_or(FrameError::InvalidDimensions(width, height))?;
        if data.len() != expected {
            return Err(FrameError::MalformedInput {
                layout: ChannelLayout::PlanarYuv420,
                expected,
                actual: data.len(),
            });
        }

        debug!(width, height, chroma = ?self.chroma_order, "Converting YUV frame to BGR");

        let (luma, chroma) = data.split_at(width * height);
        let vu = interleave_vu(chroma, self.chroma_order);

        let mut bgr = vec![0u8; width * height * 3];
        for (row, out_row) in bgr.chunks_exact_mut(width * 3).enumerate() {
            let luma_row = &luma[row * width..(row + 1) * width];
            let chroma_start = (row / 2) * width;
            let chroma_row = &vu[chroma_start..chroma_start + width];

            for (x, out) in out_row.chunks_exact_mut(3).enumerate() {
                let pair = x & !1;
                let v = chroma_row[pair];
                let u = chroma_row[pair + 1];
                out.copy_from_slice(&yuv_to_bgr(luma_row[x], u, v));
            }
        }

        Frame::new(width, height, ChannelLayout::PackedColor3, bgr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_yuv(width: usize, height: usize, y: u8) -> Vec<u8> {
        let mut data = vec![y; width * height];
        data.extend(std::iter::repeat_n(128u8, width * height / 2));
        data
    }

    /// Builds the same 4x2 image in every chroma order: two chroma sites with
    /// distinct U and V values.
    fn encode(order: ChromaOrder) -> Vec<u8> {
        let luma: Vec<u8> = (0..8).map(|i| 60 + i * 10).collect();
        let (u, v) = ([90u8, 200], [170u8, 40]);
        let chroma: Vec<u8> = match order {
            ChromaOrder::I420 => [u, v].concat(),
            ChromaOrder::Yv12 => [v, u].concat(),
            ChromaOrder::Nv12 => vec![u[0], v[0], u[1], v[1]],
            ChromaOrder::Nv21 => vec![v[0], u[0], v[1], u[1]],
        };
        [luma, chroma].concat()
    }

    #[test]
    fn test_flat_gray_scenario() {
        let converter = YuvConverter::default();
        let frame = converter.convert_bytes(&flat_yuv(64, 48, 128), 64, 48).unwrap();

        assert_eq!(frame.width(), 64);
        assert_eq!(frame.height(), 48);
        assert_eq!(frame.layout(), ChannelLayout::PackedColor3);
        assert!(frame.data().iter().all(|&v| v == 128));
    }

    #[test]
    fn test_dimensions_are_preserved() {
        let converter = YuvConverter::new(ChromaOrder::Nv21);
        for (width, height) in [(2, 2), (6, 4), (640, 480), (18, 2)] {
            let frame = converter.convert_bytes(&flat_yuv(width, height, 30), width, height).unwrap();
            assert_eq!((frame.width(), frame.height()), (width, height));
            assert_eq!(frame.data().len(), width * height * 3);
        }
    }

    #[test]
    fn test_malformed_length_is_rejected() {
        let converter = YuvConverter::default();
        let mut data = flat_yuv(64, 48, 128);
        data.pop();

        let result = converter.convert_bytes(&data, 64, 48);
        assert!(matches!(
            result,
            Err(FrameError::MalformedInput { expected: 4608, actual: 4607, .. })
        ));
    }

    #[test]
    fn test_odd_dimensions_are_rejected() {
        let converter = YuvConverter::default();
        assert!(matches!(
            converter.convert_bytes(&[0; 9], 3, 2),
            Err(FrameError::InvalidDimensions(3, 2))
        ));
    }

    #[test]
    fn test_chroma_orders_agree() {
        let reference = YuvConverter::new(ChromaOrder::I420)
            .convert_bytes(&encode(ChromaOrder::I420), 4, 2)
            .unwrap();
        for order in [ChromaOrder::Yv12, ChromaOrder::Nv12, ChromaOrder::Nv21] {
            let frame = YuvConverter::new(order).convert_bytes(&encode(order), 4, 2).unwrap();
            assert_eq!(frame, reference, "{order:?}");
        }
    }

    #[test]
    fn test_chroma_is_shared_by_2x2_block() {
        let frame = YuvConverter::new(ChromaOrder::I420)
            .convert_bytes(&encode(ChromaOrder::I420), 4, 2)
            .unwrap();
        let left = yuv_to_bgr(60, 90, 170);
        let right_bottom = yuv_to_bgr(130, 200, 40);
        assert_eq!(frame.pixel(0, 0), Some(&left[..]));
        assert_eq!(frame.pixel(3, 1), Some(&right_bottom[..]));
    }

    #[test]
    fn test_output_stays_in_range_for_extreme_inputs() {
        let converter = YuvConverter::new(ChromaOrder::Nv12);
        for y in [0u8, 255] {
            for u in [0u8, 255] {
                for v in [0u8, 255] {
                    let mut data = vec![y; 4];
                    data.extend([u, v]);
                    let frame = converter.convert_bytes(&data, 2, 2).unwrap();
                    let expected = yuv_to_bgr(y, u, v);
                    assert!(frame.data().chunks_exact(3).all(|px| px == expected));
                }
            }
        }
    }

    #[test]
    fn test_packed_frame_is_rejected() {
        let frame = Frame::filled(2, 2, ChannelLayout::PackedColor3, 0).unwrap();
        assert!(matches!(
            YuvConverter::default().convert(&frame),
            Err(FrameError::UnsupportedLayout { .. })
        ));
    }
}
