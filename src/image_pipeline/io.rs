//! Frame sources and sinks
//!
//! The pipeline never talks to a camera or a screen directly. Drivers plug
//! those in through [`FrameSource`] and [`FrameSink`].

mod latest;
mod sink;
mod source;

pub use latest::{LatestFrameReceiver, LatestFrameSender, latest_frame_slot};
pub use sink::{ChannelSink, FrameSink, TiffFileSink};
pub use source::{FrameFormat, FrameSource, RawFrameSource};
