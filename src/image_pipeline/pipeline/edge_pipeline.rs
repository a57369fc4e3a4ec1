use tracing::{debug, error, info, info_span, instrument, warn};

use crate::image_pipeline::common::error::{FrameError, Result};
use crate::image_pipeline::edges::EdgeDetector;
use crate::image_pipeline::frame::{CapturedFrame, ChannelLayout, Frame, Rotation};
use crate::image_pipeline::io::{FrameSink, FrameSource};
use crate::image_pipeline::pipeline::timing::{PipelineTimings, Timer};
use crate::image_pipeline::pipeline::types::{FrameOutcome, PipelineConfig, PipelineStats};
use crate::image_pipeline::rotate::rotate;
use crate::image_pipeline::throttle::FrameThrottle;
use crate::image_pipeline::yuv::YuvConverter;

/// Turns captured frames into edge maps and hands them to a sink.
///
/// The pipeline is created stopped. Frames offered before [`start`] or after
/// [`stop`] are counted and ignored.
///
/// [`start`]: EdgePipeline::start
/// [`stop`]: EdgePipeline::stop
pub struct EdgePipeline<K: FrameSink> {
    converter: YuvConverter,
    detector: EdgeDetector,
    throttle: Option<FrameThrottle>,
    sink: K,
    config: PipelineConfig,
    running: bool,
    stats: PipelineStats,
    timings: PipelineTimings,
}

impl<K: FrameSink> EdgePipeline<K> {
    pub fn new(config: PipelineConfig, sink: K) -> Self {
        Self {
            converter: YuvConverter::new(config.chroma_order),
            detector: EdgeDetector::new(config.edges.clone()),
            throttle: config.min_frame_interval.map(FrameThrottle::new),
            sink,
            config,
            running: false,
            stats: PipelineStats::default(),
            timings: PipelineTimings::new(),
        }
    }

    pub fn start(&mut self) {
        if self.running {
            return;
        }
        self.running = true;
        if let Some(throttle) = self.throttle.as_mut() {
            throttle.reset();
        }
        info!(
            low = self.config.edges.thresholds.low(),
            high = self.config.edges.thresholds.high(),
            min_frame_interval = ?self.config.min_frame_interval,
            "Edge pipeline started"
        );
    }

    pub fn stop(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;
        info!(
            delivered = self.stats.delivered,
            throttled = self.stats.throttled,
            dropped = self.stats.dropped,
            "Edge pipeline stopped"
        );
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    fn validate_dimensions(&self, width: usize, height: usize) -> Result<()> {
        if !self.config.validate_dimensions {
            return Ok(());
        }

        if width == 0 || height == 0 {
            return Err(FrameError::InvalidDimensions(width, height));
        }

        if let Some(max) = self.config.max_dimension {
            if width > max || height > max {
                warn!(width, height, max, "Frame dimensions exceed maximum");
                return Err(FrameError::InvalidDimensions(width, height));
            }
        }

        Ok(())
    }

    /// Runs one frame through the pipeline.
    ///
    /// A frame-local error drops only this frame; the pipeline stays usable.
    #[instrument(skip(self, captured), fields(timestamp_ms = captured.timestamp.as_millis() as u64))]
    pub fn process(&mut self, captured: CapturedFrame) -> Result<FrameOutcome> {
        self.stats.received += 1;

        if !self.running {
            self.stats.stopped += 1;
            debug!("Pipeline stopped, frame ignored");
            return Ok(FrameOutcome::Stopped);
        }

        if let Some(throttle) = self.throttle.as_mut() {
            if !throttle.admit(captured.timestamp) {
                self.stats.throttled += 1;
                debug!("Frame throttled");
                return Ok(FrameOutcome::Throttled);
            }
        }

        match self.process_admitted(captured.frame, captured.rotation) {
            Ok((width, height)) => {
                self.stats.delivered += 1;
                debug!(width, height, "Frame delivered");
                Ok(FrameOutcome::Delivered { width, height })
            }
            Err(e) => {
                if e.is_frame_local() {
                    self.stats.dropped += 1;
                }
                Err(e)
            }
        }
    }

    fn process_admitted(&mut self, frame: Frame, rotation: Rotation) -> Result<(usize, usize)> {
        {
            let _span = info_span!("validate_dimensions", width = frame.width(), height = frame.height()).entered();
            self.validate_dimensions(frame.width(), frame.height())?;
        }

        let frame = if frame.layout() == ChannelLayout::PlanarYuv420 {
            let _span = info_span!("convert", chroma_order = ?self.converter.chroma_order()).entered();
            let timer = Timer::start("convert");
            let converted = self.converter.convert(&frame)?;
            self.record(timer);
            converted
        } else {
            frame
        };

        let frame = {
            let _span = info_span!("rotate", degrees = rotation.degrees()).entered();
            let timer = Timer::start("rotate");
            let rotated = rotate(frame, rotation)?;
            self.record(timer);
            rotated
        };

        let edges = {
            let _span = info_span!("detect").entered();
            let timer = Timer::start("detect");
            let edges = self.detector.detect(&frame)?;
            self.record(timer);
            edges
        };

        let dimensions = (edges.width(), edges.height());
        {
            let _span = info_span!("deliver").entered();
            let timer = Timer::start("deliver");
            self.sink.deliver(edges)?;
            self.record(timer);
        }

        Ok(dimensions)
    }

    fn record(&mut self, timer: Timer) {
        let (name, duration) = timer.stop();
        self.timings.add_step(name, duration);
    }

    /// Drains `source` through the pipeline, starting it first and stopping it
    /// once the source ends or a fatal error occurs.
    ///
    /// Frame-local errors are logged and skipped. I/O and sink failures end the
    /// run and are returned.
    #[instrument(skip(self, source))]
    pub fn run<S: FrameSource>(&mut self, source: &mut S) -> Result<PipelineStats> {
        self.start();
        let result = self.drain(source);
        self.stop();

        if let Err(e) = result {
            error!(error = %e, "Edge pipeline aborted");
            return Err(e);
        }

        info!(
            received = self.stats.received,
            delivered = self.stats.delivered,
            throttled = self.stats.throttled,
            dropped = self.stats.dropped,
            "Source exhausted"
        );
        Ok(self.stats)
    }

    fn drain<S: FrameSource>(&mut self, source: &mut S) -> Result<()> {
        loop {
            let captured = match source.next_frame() {
                Ok(Some(captured)) => captured,
                Ok(None) => return Ok(()),
                Err(e) if e.is_frame_local() => {
                    self.stats.dropped += 1;
                    warn!(error = %e, "Unreadable frame dropped");
                    continue;
                }
                Err(e) => return Err(e),
            };

            match self.process(captured) {
                Ok(_) => {}
                Err(e) if e.is_frame_local() => warn!(error = %e, "Frame dropped"),
                Err(e) => return Err(e),
            }
        }
    }

    pub fn stats(&self) -> PipelineStats {
        self.stats
    }

    pub fn timings(&self) -> &PipelineTimings {
        &self.timings
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Replaces the configuration. Takes effect from the next frame; the
    /// throttle starts over.
    pub fn set_config(&mut self, config: PipelineConfig) {
        self.converter = YuvConverter::new(config.chroma_order);
        self.detector = EdgeDetector::new(config.edges.clone());
        self.throttle = config.min_frame_interval.map(FrameThrottle::new);
        self.config = config;
    }

    pub fn throttle(&self) -> Option<&FrameThrottle> {
        self.throttle.as_ref()
    }

    pub fn sink(&self) -> &K {
        &self.sink
    }

    pub fn into_sink(self) -> K {
        self.sink
    }
}
