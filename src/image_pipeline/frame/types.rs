//! Frame types shared by every pipeline stage

use std::time::Duration;

use crate::image_pipeline::common::error::{FrameError, Result};

/// Memory layout of a frame buffer.
///
/// Packed colour layouts use blue-green-red order everywhere in the crate.
/// Conversion to red-green-blue only happens when a sink asks for display bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelLayout {
    /// Full resolution luma plane followed by two quarter resolution chroma planes
    PlanarYuv420,
    /// B, G, R
    PackedColor3,
    /// Single intensity channel
    PackedGray1,
    /// B, G, R, A
    PackedColor4WithAlpha,
}

impl ChannelLayout {
    /// Interleaved channel count, `None` for planar layouts.
    pub fn channels(self) -> Option<usize> {
        match self {
            ChannelLayout::PlanarYuv420 => None,
            ChannelLayout::PackedColor3 => Some(3),
            ChannelLayout::PackedGray1 => Some(1),
            ChannelLayout::PackedColor4WithAlpha => Some(4),
        }
    }

    /// Exact buffer length for a `width x height` frame, `None` on overflow.
    pub fn buffer_len(self, width: usize, height: usize) -> Option<usize> {
        let pixels = width.checked_mul(height)?;
        match self.channels() {
            Some(channels) => pixels.checked_mul(channels),
            None => pixels.checked_add(pixels / 2),
        }
    }
}

/// Order of the chroma samples in a YUV 4:2:0 buffer, as delivered by the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChromaOrder {
    /// Planar, U plane then V plane
    #[default]
    I420,
    /// Planar, V plane then U plane
    Yv12,
    /// Semi-planar, interleaved U,V
    Nv12,
    /// Semi-planar, interleaved V,U
    Nv21,
}

/// Clockwise rotation needed to bring a frame upright.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Rotation {
    #[default]
    Rotate0,
    Rotate90,
    Rotate180,
    Rotate270,
}

impl Rotation {
    pub fn from_degrees(degrees: u32) -> Result<Self> {
        match degrees {
            0 => Ok(Rotation::Rotate0),
            90 => Ok(Rotation::Rotate90),
            180 => Ok(Rotation::Rotate180),
            270 => Ok(Rotation::Rotate270),
            other => Err(FrameError::InvalidRotation(other)),
        }
    }

    pub fn degrees(self) -> u32 {
        match self {
            Rotation::Rotate0 => 0,
            Rotation::Rotate90 => 90,
            Rotation::Rotate180 => 180,
            Rotation::Rotate270 => 270,
        }
    }

    pub fn swaps_dimensions(self) -> bool {
        matches!(self, Rotation::Rotate90 | Rotation::Rotate270)
    }
}

impl TryFrom<u32> for Rotation {
    type Error = FrameError;

    fn try_from(degrees: u32) -> Result<Self> {
        Rotation::from_degrees(degrees)
    }
}

/// An owned, validated pixel buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    width: usize,
    height: usize,
    layout: ChannelLayout,
    data: Vec<u8>,
}

impl Frame {
    /// Wraps `data` after checking it against `layout`.
    ///
    /// Zero-sized frames and odd-sized YUV frames are rejected with
    /// [`FrameError::InvalidDimensions`]; a buffer of the wrong length is
    /// [`FrameError::MalformedInput`].
    pub fn new(width: usize, height: usize, layout: ChannelLayout, data: Vec<u8>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(FrameError::InvalidDimensions(width, height));
        }
        if layout == ChannelLayout::PlanarYuv420 && (width % 2 != 0 || height % 2 != 0) {
            return Err(FrameError::InvalidDimensions(width, height));
        }

        let expected = layout
            .buffer_len(width, height)
            .ok_or(FrameError::InvalidDimensions(width, height))?;
        if data.len() != expected {
            return Err(FrameError::MalformedInput {
                layout,
                expected,
                actual: data.len(),
            });
        }

        Ok(Self {
            width,
            height,
            layout,
            data,
        })
    }

    /// A frame of `layout` with every sample set to `value`.
    pub fn filled(width: usize, height: usize, layout: ChannelLayout, value: u8) -> Result<Self> {
        let len = layout
            .buffer_len(width, height)
            .ok_or(FrameError::InvalidDimensions(width, height))?;
        Frame::new(width, height, layout, vec![value; len])
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn layout(&self) -> ChannelLayout {
        self.layout
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn pixel_count(&self) -> usize {
        self.width * self.height
    }

    /// Packed channel count, or an error for planar frames.
    pub fn channels(&self, operation: &'static str) -> Result<usize> {
        self.layout.channels().ok_or(FrameError::UnsupportedLayout {
            layout: self.layout,
            operation,
        })
    }

    /// Samples of the pixel at `(x, y)` for packed layouts.
    pub fn pixel(&self, x: usize, y: usize) -> Option<&[u8]> {
        let channels = self.layout.channels()?;
        if x >= self.width || y >= self.height {
            return None;
        }
        let start = (y * self.width + x) * channels;
        self.data.get(start..start + channels)
    }

    /// Red-green-blue bytes of a `PackedColor3` frame.
    pub fn to_rgb_bytes(&self) -> Result<Vec<u8>> {
        if self.layout != ChannelLayout::PackedColor3 {
            return Err(FrameError::UnsupportedLayout {
                layout: self.layout,
                operation: "rgb export",
            });
        }
        Ok(self
            .data
            .chunks_exact(3)
            .flat_map(|bgr| [bgr[2], bgr[1], bgr[0]])
            .collect())
    }

    /// Red-green-blue-alpha bytes for display surfaces.
    ///
    /// Colour frames are reordered, grayscale frames replicated, and an opaque
    /// alpha channel is added where the frame has none.
    pub fn to_display_rgba(&self) -> Result<Vec<u8>> {
        match self.layout {
            ChannelLayout::PackedColor3 => Ok(self
                .data
                .chunks_exact(3)
                .flat_map(|bgr| [bgr[2], bgr[1], bgr[0], u8::MAX])
                .collect()),
            ChannelLayout::PackedColor4WithAlpha => Ok(self
                .data
                .chunks_exact(4)
                .flat_map(|bgra| [bgra[2], bgra[1], bgra[0], bgra[3]])
                .collect()),
            ChannelLayout::PackedGray1 => Ok(self
                .data
                .iter()
                .flat_map(|&v| [v, v, v, u8::MAX])
                .collect()),
            ChannelLayout::PlanarYuv420 => Err(FrameError::UnsupportedLayout {
                layout: self.layout,
                operation: "display export",
            }),
        }
    }
}

/// A frame as handed over by a [`FrameSource`](crate::image_pipeline::io::FrameSource).
#[derive(Debug, Clone)]
pub struct CapturedFrame {
    pub frame: Frame,
    /// Rotation to apply once the frame is in packed colour
    pub rotation: Rotation,
    /// Capture time on the source's monotonic clock
    pub timestamp: Duration,
}

impl CapturedFrame {
    pub fn new(frame: Frame, rotation: Rotation, timestamp: Duration) -> Self {
        Self {
            frame,
            rotation,
            timestamp,
        }
    }
}
