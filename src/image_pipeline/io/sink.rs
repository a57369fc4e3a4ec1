use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{Receiver, SyncSender, TrySendError, sync_channel};

use tracing::{debug, info};

use crate::image_pipeline::common::error::{FrameError, Result};
use crate::image_pipeline::frame::Frame;
use crate::image_pipeline::tiff::{StandardTiffWriter, TiffOptions, TiffWriter};

/// Receives finished frames. The sink owns any format adaptation and its own
/// threading context.
pub trait FrameSink {
    fn deliver(&mut self, frame: Frame) -> Result<()>;
}

/// Hands frames to a display thread over a bounded channel.
///
/// Delivery never blocks: when the display is still busy with earlier frames
/// the new frame is dropped.
pub struct ChannelSink {
    sender: SyncSender<Frame>,
    dropped: u64,
}

impl ChannelSink {
    pub fn new(capacity: usize) -> (Self, Receiver<Frame>) {
        let (sender, receiver) = sync_channel(capacity);
        (Self { sender, dropped: 0 }, receiver)
    }

    /// Frames discarded because the display was behind.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}

impl FrameSink for ChannelSink {
    fn deliver(&mut self, frame: Frame) -> Result<()> {
        match self.sender.try_send(frame) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) => {
                self.dropped += 1;
                debug!(dropped = self.dropped, "Display busy, frame discarded");
                Ok(())
            }
            Err(TrySendError::Disconnected(_)) => Err(FrameError::SinkClosed),
        }
    }
}

/// Writes every delivered frame to `frame_NNNNNN.tiff` in a directory.
pub struct TiffFileSink<W: TiffWriter> {
    dir: PathBuf,
    writer: W,
    options: TiffOptions,
    written: u64,
}

impl TiffFileSink<StandardTiffWriter> {
    pub fn create<P: AsRef<Path>>(dir: P, options: TiffOptions) -> Result<Self> {
        Self::with_writer(dir, StandardTiffWriter, options)
    }
}

impl<W: TiffWriter> TiffFileSink<W> {
    pub fn with_writer<P: AsRef<Path>>(dir: P, writer: W, options: TiffOptions) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir)
            .map_err(|e| FrameError::OutputWriteError(format!("{}: {}", dir.display(), e)))?;

        info!(output = %dir.display(), compression = ?options.compression, "Writing edge frames");
        Ok(Self {
            dir,
            writer,
            options,
            written: 0,
        })
    }

    pub fn frame_path(&self, index: u64) -> PathBuf {
        self.dir.join(format!("frame_{index:06}.tiff"))
    }

    pub fn written(&self) -> u64 {
        self.written
    }
}

impl<W: TiffWriter> FrameSink for TiffFileSink<W> {
    fn deliver(&mut self, frame: Frame) -> Result<()> {
        let path = self.frame_path(self.written);
        let file = File::create(&path)
            .map_err(|e| FrameError::OutputWriteError(format!("{}: {}", path.display(), e)))?;

        let mut output = BufWriter::new(file);
        self.writer.write_frame(&frame, &mut output, &self.options)?;
        output
            .into_inner()
            .map_err(|e| FrameError::OutputWriteError(format!("{}: {}", path.display(), e.error())))?;

        self.written += 1;
        debug!(path = %path.display(), "Frame written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image_pipeline::frame::ChannelLayout;

    fn frame(value: u8) -> Frame {
        Frame::filled(2, 2, ChannelLayout::PackedColor3, value).unwrap()
    }

    #[test]
    fn test_channel_sink_delivers_in_order() {
        let (mut sink, receiver) = ChannelSink::new(4);
        sink.deliver(frame(1)).unwrap();
        sink.deliver(frame(2)).unwrap();

        assert_eq!(receiver.recv().unwrap(), frame(1));
        assert_eq!(receiver.recv().unwrap(), frame(2));
    }

    #[test]
    fn test_channel_sink_drops_when_display_is_behind() {
        let (mut sink, receiver) = ChannelSink::new(1);
        sink.deliver(frame(1)).unwrap();
        sink.deliver(frame(2)).unwrap();

        assert_eq!(sink.dropped(), 1);
        assert_eq!(receiver.recv().unwrap(), frame(1));
        assert!(receiver.try_recv().is_err());
    }

    #[test]
    fn test_channel_sink_reports_closed_display() {
        let (mut sink, receiver) = ChannelSink::new(1);
        drop(receiver);
        assert!(matches!(sink.deliver(frame(1)), Err(FrameError::SinkClosed)));
    }

    #[test]
    fn test_tiff_sink_numbers_files() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = TiffFileSink::create(dir.path().join("edges"), TiffOptions::default()).unwrap();

        sink.deliver(frame(0)).unwrap();
        sink.deliver(frame(255)).unwrap();

        assert_eq!(sink.written(), 2);
        assert!(dir.path().join("edges/frame_000000.tiff").is_file());
        assert!(dir.path().join("edges/frame_000001.tiff").is_file());
    }
}
