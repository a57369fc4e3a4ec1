//! ITU-R BT.601 full range (JFIF) YUV to BGR

const V_TO_R: f32 = 1.402;
const U_TO_G: f32 = 0.344_136;
const V_TO_G: f32 = 0.714_136;
const U_TO_B: f32 = 1.772;

const CHROMA_OFFSET: f32 = 128.0;

/// Converts one luma sample and its chroma pair to blue, green, red.
#[inline]
pub fn yuv_to_bgr(y: u8, u: u8, v: u8) -> [u8; 3] {
    let y = y as f32;
    let u = u as f32 - CHROMA_OFFSET;
    let v = v as f32 - CHROMA_OFFSET;

    let r = y + V_TO_R * v;
    let g = y - U_TO_G * u - V_TO_G * v;
    let b = y + U_TO_B * u;

    [clamp_to_u8(b), clamp_to_u8(g), clamp_to_u8(r)]
}

#[inline]
fn clamp_to_u8(value: f32) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neutral_chroma_is_gray() {
        for y in [0u8, 16, 128, 235, 255] {
            assert_eq!(yuv_to_bgr(y, 128, 128), [y, y, y]);
        }
    }

    #[test]
    fn test_extremes_are_clamped() {
        // Saturated red and blue push past 255 and below 0 respectively.
        assert_eq!(yuv_to_bgr(255, 128, 255)[2], 255);
        assert_eq!(yuv_to_bgr(0, 0, 128)[0], 0);
        assert_eq!(yuv_to_bgr(255, 255, 128)[0], 255);
        assert_eq!(yuv_to_bgr(0, 128, 0)[2], 0);
    }

    #[test]
    fn test_known_colours() {
        // Pure red in full range YUV: Y=76, U=85, V=255
        let [b, g, r] = yuv_to_bgr(76, 85, 255);
        assert!(r >= 250, "r={r}");
        assert!(g <= 5, "g={g}");
        assert!(b <= 5, "b={b}");
    }
}
