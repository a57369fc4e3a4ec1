use std::borrow::Cow;

use crate::image_pipeline::frame::ChromaOrder;

/// Rearranges the chroma part of a YUV 4:2:0 buffer into interleaved V,U pairs.
///
/// `chroma` is everything after the luma plane. Buffers that are already V,U
/// interleaved are borrowed as is.
pub fn interleave_vu(chroma: &[u8], order: ChromaOrder) -> Cow<'_, [u8]> {
    match order {
        ChromaOrder::Nv21 => Cow::Borrowed(chroma),
        ChromaOrder::Nv12 => Cow::Owned(
            chroma
                .chunks_exact(2)
                .flat_map(|uv| [uv[1], uv[0]])
                .collect(),
        ),
        ChromaOrder::I420 => {
            let (u, v) = chroma.split_at(chroma.len() / 2);
            Cow::Owned(zip_planes(v, u))
        }
        ChromaOrder::Yv12 => {
            let (v, u) = chroma.split_at(chroma.len() / 2);
            Cow::Owned(zip_planes(v, u))
        }
    }
}

fn zip_planes(first: &[u8], second: &[u8]) -> Vec<u8> {
    first
        .iter()
        .zip(second)
        .flat_map(|(&a, &b)| [a, b])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_order_lands_on_vu() {
        // Two chroma sites: (u0=1, v0=2), (u1=3, v1=4)
        let expected = vec![2u8, 1, 4, 3];
        assert_eq!(interleave_vu(&[1, 3, 2, 4], ChromaOrder::I420).as_ref(), &expected[..]);
        assert_eq!(interleave_vu(&[2, 4, 1, 3], ChromaOrder::Yv12).as_ref(), &expected[..]);
        assert_eq!(interleave_vu(&[1, 2, 3, 4], ChromaOrder::Nv12).as_ref(), &expected[..]);
        assert_eq!(interleave_vu(&[2, 1, 4, 3], ChromaOrder::Nv21).as_ref(), &expected[..]);
    }

    #[test]
    fn test_nv21_is_borrowed() {
        let chroma = [9u8, 8];
        assert!(matches!(interleave_vu(&chroma, ChromaOrder::Nv21), Cow::Borrowed(_)));
    }
}
