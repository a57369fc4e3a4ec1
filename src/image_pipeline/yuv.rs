//! YUV 4:2:0 to packed colour conversion
//!
//! Planar sources are first interleaved into the semi-planar V,U representation,
//! then every pixel is converted with the BT.601 full range matrix.

mod bt601;
mod converter;
mod interleave;

pub use bt601::yuv_to_bgr;
pub use converter::YuvConverter;
pub use interleave::interleave_vu;
