use std::fs::File;
use std::io::{BufReader, ErrorKind, Read};
use std::path::Path;
use std::time::Duration;

use tracing::{debug, info};

use crate::image_pipeline::common::error::{FrameError, Result};
use crate::image_pipeline::frame::{CapturedFrame, ChannelLayout, Frame, Rotation};
use crate::image_pipeline::throttle::MIN_FRAME_INTERVAL;

/// Anything that hands the pipeline one frame at a time.
pub trait FrameSource {
    /// Returns the next frame, or `None` once the source is exhausted.
    fn next_frame(&mut self) -> Result<Option<CapturedFrame>>;
}

/// Geometry and cadence of the frames in a raw dump.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameFormat {
    pub width: usize,
    pub height: usize,
    pub layout: ChannelLayout,
    pub rotation: Rotation,
    /// Time between consecutive captures
    pub frame_interval: Duration,
}

impl FrameFormat {
    pub fn new(width: usize, height: usize, layout: ChannelLayout) -> Self {
        Self {
            width,
            height,
            layout,
            rotation: Rotation::Rotate0,
            frame_interval: MIN_FRAME_INTERVAL,
        }
    }

    pub fn with_rotation(mut self, rotation: Rotation) -> Self {
        self.rotation = rotation;
        self
    }

    /// Sets the capture cadence from a frame rate. Zero is treated as one.
    pub fn with_frame_rate(mut self, fps: u32) -> Self {
        self.frame_interval = Duration::from_secs(1) / fps.max(1);
        self
    }

    pub fn frame_len(&self) -> Result<usize> {
        self.layout
            .buffer_len(self.width, self.height)
            .filter(|&len| len > 0)
            .ok_or(FrameError::InvalidDimensions(self.width, self.height))
    }
}

/// Reads fixed-size frames stored back to back, as written by most raw
/// camera dump tools.
///
/// Each frame is stamped with `index * frame_interval`. A trailing partial
/// frame is reported once as [`FrameError::MalformedInput`], after which the
/// source is exhausted.
pub struct RawFrameSource<R: Read> {
    reader: R,
    format: FrameFormat,
    frames_read: u32,
    finished: bool,
}

impl RawFrameSource<BufReader<File>> {
    pub fn open<P: AsRef<Path>>(path: P, format: FrameFormat) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .map_err(|e| FrameError::InputReadError(format!("{}: {}", path.display(), e)))?;

        info!(
            input = %path.display(),
            width = format.width,
            height = format.height,
            layout = ?format.layout,
            "Opened raw frame source"
        );
        Ok(Self::from_reader(BufReader::new(file), format))
    }
}

impl<R: Read> RawFrameSource<R> {
    pub fn from_reader(reader: R, format: FrameFormat) -> Self {
        Self {
            reader,
            format,
            frames_read: 0,
            finished: false,
        }
    }

    pub fn frames_read(&self) -> u32 {
        self.frames_read
    }

    fn fill(&mut self, buf: &mut [u8]) -> Result<usize> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.reader.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
        Ok(filled)
    }
}

impl<R: Read> FrameSource for RawFrameSource<R> {
    fn next_frame(&mut self) -> Result<Option<CapturedFrame>> {
        if self.finished {
            return Ok(None);
        }

        let expected = match self.format.frame_len() {
            Ok(len) => len,
            Err(e) => {
                self.finished = true;
                return Err(e);
            }
        };
        let mut data = vec![0u8; expected];
        let filled = self.fill(&mut data)?;

        if filled == 0 {
            self.finished = true;
            debug!(frames = self.frames_read, "Raw frame source exhausted");
            return Ok(None);
        }
        if filled < expected {
            self.finished = true;
            return Err(FrameError::MalformedInput {
                layout: self.format.layout,
                expected,
                actual: filled,
            });
        }

        let timestamp = self.format.frame_interval.saturating_mul(self.frames_read);
        self.frames_read += 1;

        let frame = Frame::new(self.format.width, self.format.height, self.format.layout, data)?;
        Ok(Some(CapturedFrame::new(frame, self.format.rotation, timestamp)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_reads_frames_with_timestamps() {
        let format = FrameFormat::new(4, 2, ChannelLayout::PlanarYuv420).with_frame_rate(25);
        let bytes = vec![7u8; 12 * 3];
        let mut source = RawFrameSource::from_reader(Cursor::new(bytes), format);

        let mut timestamps = Vec::new();
        while let Some(captured) = source.next_frame().unwrap() {
            assert_eq!(captured.frame.layout(), ChannelLayout::PlanarYuv420);
            timestamps.push(captured.timestamp);
        }

        assert_eq!(
            timestamps,
            vec![Duration::ZERO, Duration::from_millis(40), Duration::from_millis(80)]
        );
        assert_eq!(source.frames_read(), 3);
    }

    #[test]
    fn test_trailing_partial_frame_is_malformed_once() {
        let format = FrameFormat::new(2, 2, ChannelLayout::PackedColor3);
        let mut source = RawFrameSource::from_reader(Cursor::new(vec![0u8; 12 + 5]), format);

        assert!(source.next_frame().unwrap().is_some());
        assert!(matches!(
            source.next_frame(),
            Err(FrameError::MalformedInput { expected: 12, actual: 5, .. })
        ));
        assert!(source.next_frame().unwrap().is_none());
    }

    #[test]
    fn test_rotation_hint_is_attached() {
        let format = FrameFormat::new(1, 1, ChannelLayout::PackedGray1).with_rotation(Rotation::Rotate270);
        let mut source = RawFrameSource::from_reader(Cursor::new(vec![1u8]), format);
        let captured = source.next_frame().unwrap().unwrap();
        assert_eq!(captured.rotation, Rotation::Rotate270);
    }

    #[test]
    fn test_missing_file() {
        let format = FrameFormat::new(2, 2, ChannelLayout::PackedGray1);
        let result = RawFrameSource::open("/nonexistent/frames.yuv", format);
        assert!(matches!(result, Err(FrameError::InputReadError(_))));
    }

    #[test]
    fn test_zero_sized_format_is_rejected() {
        let format = FrameFormat::new(0, 2, ChannelLayout::PackedGray1);
        let mut source = RawFrameSource::from_reader(Cursor::new(vec![1u8; 4]), format);
        assert!(matches!(source.next_frame(), Err(FrameError::InvalidDimensions(0, 2))));
        assert!(source.next_frame().unwrap().is_none());
    }
}
