use crate::image_pipeline::common::error::{FrameError, Result};
use crate::image_pipeline::frame::{ChannelLayout, Frame};

// BT.601 luma weights in 14-bit fixed point. They sum to exactly 1 << 14.
const WEIGHT_R: u32 = 4899;
const WEIGHT_G: u32 = 9617;
const WEIGHT_B: u32 = 1868;
const WEIGHT_SHIFT: u32 = 14;
const WEIGHT_ROUND: u32 = 1 << (WEIGHT_SHIFT - 1);

#[inline]
fn luma(b: u8, g: u8, r: u8) -> u8 {
    ((r as u32 * WEIGHT_R + g as u32 * WEIGHT_G + b as u32 * WEIGHT_B + WEIGHT_ROUND) >> WEIGHT_SHIFT)
        as u8
}

/// Reduces a packed frame to one intensity sample per pixel. Alpha is ignored.
pub fn to_gray(frame: &Frame) -> Result<Vec<u8>> {
    match frame.layout() {
        ChannelLayout::PackedGray1 => Ok(frame.data().to_vec()),
        ChannelLayout::PackedColor3 => Ok(frame
            .data()
            .chunks_exact(3)
            .map(|px| luma(px[0], px[1], px[2]))
            .collect()),
        ChannelLayout::PackedColor4WithAlpha => Ok(frame
            .data()
            .chunks_exact(4)
            .map(|px| luma(px[0], px[1], px[2]))
            .collect()),
        ChannelLayout::PlanarYuv420 => Err(FrameError::UnsupportedLayout {
            layout: frame.layout(),
            operation: "grayscale reduction",
        }),
    }
}

/// Replicates an intensity image into `layout`, with an opaque alpha channel
/// for four-channel layouts.
pub fn expand_gray(gray: Vec<u8>, width: usize, height: usize, layout: ChannelLayout) -> Result<Frame> {
    let data = match layout {
        ChannelLayout::PackedGray1 => gray,
        ChannelLayout::PackedColor3 => gray.iter().flat_map(|&v| [v, v, v]).collect(),
        ChannelLayout::PackedColor4WithAlpha => {
            gray.iter().flat_map(|&v| [v, v, v, u8::MAX]).collect()
        }
        ChannelLayout::PlanarYuv420 => {
            return Err(FrameError::UnsupportedLayout {
                layout,
                operation: "channel expansion",
            });
        }
    };
    Frame::new(width, height, layout, data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weights_sum_to_one() {
        assert_eq!(WEIGHT_R + WEIGHT_G + WEIGHT_B, 1 << WEIGHT_SHIFT);
    }

    #[test]
    fn test_gray_of_primaries() {
        let frame = Frame::new(
            3,
            1,
            ChannelLayout::PackedColor3,
            vec![255, 0, 0, 0, 255, 0, 0, 0, 255],
        )
        .unwrap();
        // blue, green, red
        assert_eq!(to_gray(&frame).unwrap(), vec![29, 150, 76]);
    }

    #[test]
    fn test_alpha_is_dropped() {
        let opaque = Frame::new(1, 1, ChannelLayout::PackedColor4WithAlpha, vec![10, 200, 90, 255]).unwrap();
        let clear = Frame::new(1, 1, ChannelLayout::PackedColor4WithAlpha, vec![10, 200, 90, 0]).unwrap();
        assert_eq!(to_gray(&opaque).unwrap(), to_gray(&clear).unwrap());
    }

    #[test]
    fn test_expand_then_reduce_is_exact_for_binary_images() {
        let binary = vec![0u8, 255, 255, 0, 0, 255];
        for layout in [
            ChannelLayout::PackedColor3,
            ChannelLayout::PackedColor4WithAlpha,
            ChannelLayout::PackedGray1,
        ] {
            let expanded = expand_gray(binary.clone(), 3, 2, layout).unwrap();
            assert_eq!(expanded.layout(), layout);
            assert_eq!(to_gray(&expanded).unwrap(), binary, "{layout:?}");
        }
    }

    #[test]
    fn test_expansion_sets_opaque_alpha() {
        let expanded = expand_gray(vec![0, 255], 2, 1, ChannelLayout::PackedColor4WithAlpha).unwrap();
        assert_eq!(expanded.data(), &[0, 0, 0, 255, 255, 255, 255, 255]);
    }

    #[test]
    fn test_planar_is_rejected() {
        assert!(expand_gray(vec![0; 4], 2, 2, ChannelLayout::PlanarYuv420).is_err());
        let yuv = Frame::filled(2, 2, ChannelLayout::PlanarYuv420, 0).unwrap();
        assert!(to_gray(&yuv).is_err());
    }
}
