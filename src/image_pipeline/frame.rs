//! Frame buffers and their layout tags
//!
//! Every stage of the pipeline consumes and produces [`Frame`] values. A frame
//! owns its pixel buffer and is validated against its layout on construction.

pub mod types;

pub use types::{CapturedFrame, ChannelLayout, ChromaOrder, Frame, Rotation};
