/// Binomial approximation of a Gaussian with sigma close to 1.
const KERNEL: [u32; 5] = [1, 4, 6, 4, 1];
const RADIUS: usize = KERNEL.len() / 2;
/// Sum of the separable 2-D kernel (16 * 16).
const NORM_SHIFT: u32 = 8;

#[inline]
fn clamp_index(i: usize, offset: usize, len: usize) -> usize {
    (i + offset).saturating_sub(RADIUS).min(len - 1)
}

/// 5x5 Gaussian smoothing of an intensity image with replicated borders.
pub fn gaussian_blur(gray: &[u8], width: usize, height: usize) -> Vec<u8> {
    debug_assert_eq!(gray.len(), width * height);
    if width == 0 || height == 0 {
        return Vec::new();
    }

    // Horizontal pass keeps full precision, values fit in 255 * 16.
    let mut horizontal = vec![0u32; gray.len()];
    for (src_row, dst_row) in gray.chunks_exact(width).zip(horizontal.chunks_exact_mut(width)) {
        for (x, dst) in dst_row.iter_mut().enumerate() {
            *dst = KERNEL
                .iter()
                .enumerate()
                .map(|(k, &w)| w * src_row[clamp_index(x, k, width)] as u32)
                .sum();
        }
    }

    let mut out = vec![0u8; gray.len()];
    for y in 0..height {
        for x in 0..width {
            let sum: u32 = KERNEL
                .iter()
                .enumerate()
                .map(|(k, &w)| w * horizontal[clamp_index(y, k, height) * width + x])
                .sum();
            out[y * width + x] = ((sum + (1 << (NORM_SHIFT - 1))) >> NORM_SHIFT) as u8;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_image_is_unchanged() {
        let gray = vec![77u8; 9 * 5];
        assert_eq!(gaussian_blur(&gray, 9, 5), gray);
    }

    #[test]
    fn test_impulse_spreads_symmetrically() {
        let mut gray = vec![0u8; 7 * 7];
        gray[3 * 7 + 3] = 255;
        let blurred = gaussian_blur(&gray, 7, 7);

        // centre weight 36/256
        assert_eq!(blurred[3 * 7 + 3], 36);
        assert_eq!(blurred[3 * 7 + 2], blurred[3 * 7 + 4]);
        assert_eq!(blurred[2 * 7 + 3], blurred[4 * 7 + 3]);
        assert_eq!(blurred[0], 0);
    }

    #[test]
    fn test_tiny_images_use_replicated_border() {
        assert_eq!(gaussian_blur(&[200], 1, 1), vec![200]);
        assert_eq!(gaussian_blur(&[10, 10], 2, 1), vec![10, 10]);
    }

    #[test]
    fn test_empty_image() {
        assert!(gaussian_blur(&[], 0, 3).is_empty());
        assert!(gaussian_blur(&[], 4, 0).is_empty());
    }
}
