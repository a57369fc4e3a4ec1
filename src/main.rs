use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::thread;

use anyhow::{Context, Result, anyhow};
use clap::{Parser, ValueEnum};
use tracing::{debug, error, info, warn};

use cannyedge_rs::image_pipeline::{
    ChannelLayout, ChannelSink, ChromaOrder, EdgePipeline, FrameFormat, FrameSink, FrameSource,
    MIN_FRAME_INTERVAL, PipelineConfig, PipelineStats, RawFrameSource, Rotation, TiffCompression,
    TiffFileSink, TiffOptions, latest_frame_slot,
};
use cannyedge_rs::logger;

#[derive(Parser, Debug)]
#[command(name = "cannyedge", version, about = "Canny edge maps from raw camera frame dumps")]
struct Args {
    /// Raw frame dump, frames stored back to back.
    #[arg(long)]
    input: PathBuf,
    #[arg(long)]
    width: usize,
    #[arg(long)]
    height: usize,
    #[arg(long, value_enum, default_value_t = LayoutArg::Yuv420)]
    layout: LayoutArg,
    /// Chroma arrangement of yuv420 input.
    #[arg(long, value_enum, default_value_t = ChromaOrderArg::I420)]
    chroma_order: ChromaOrderArg,
    /// Clockwise rotation that makes the frames upright (0, 90, 180 or 270).
    #[arg(long, default_value_t = 0)]
    rotation: u32,
    /// Capture rate of the dump, used to timestamp frames.
    #[arg(long, default_value_t = 30)]
    fps: u32,
    /// Process every frame instead of at most one per 33ms.
    #[arg(long)]
    no_throttle: bool,
    /// Replay the dump in real time from a reader thread, keeping only the newest frame.
    #[arg(long)]
    keep_latest: bool,
    /// Write edge maps as TIFF files here. Without it frames go to a display thread.
    #[arg(long)]
    output_dir: Option<PathBuf>,
    #[arg(long, value_enum, default_value_t = CompressionArg::None)]
    compression: CompressionArg,
    /// TIFF predictor applied before compression.
    #[arg(long, value_enum, default_value_t = PredictorArg::None)]
    predictor: PredictorArg,
    /// Print per-stage timings when done.
    #[arg(long)]
    timings: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LayoutArg {
    Yuv420,
    Bgr,
    Bgra,
    Gray,
}

impl LayoutArg {
    fn to_core(self) -> ChannelLayout {
        match self {
            Self::Yuv420 => ChannelLayout::PlanarYuv420,
            Self::Bgr => ChannelLayout::PackedColor3,
            Self::Bgra => ChannelLayout::PackedColor4WithAlpha,
            Self::Gray => ChannelLayout::PackedGray1,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ChromaOrderArg {
    I420,
    Yv12,
    Nv12,
    Nv21,
}

impl ChromaOrderArg {
    fn to_core(self) -> ChromaOrder {
        match self {
            Self::I420 => ChromaOrder::I420,
            Self::Yv12 => ChromaOrder::Yv12,
            Self::Nv12 => ChromaOrder::Nv12,
            Self::Nv21 => ChromaOrder::Nv21,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CompressionArg {
    None,
    Lzw,
    Deflate,
}

impl CompressionArg {
    fn to_core(self) -> TiffCompression {
        match self {
            Self::None => TiffCompression::None,
            Self::Lzw => TiffCompression::Lzw,
            Self::Deflate => TiffCompression::Deflate,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PredictorArg {
    None,
    Horizontal,
}

impl PredictorArg {
    fn to_core(self) -> Option<u16> {
        match self {
            Self::None => None,
            Self::Horizontal => Some(2),
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    logger::init();

    info!("Starting cannyedge...");

    let rotation = Rotation::from_degrees(args.rotation).context("invalid --rotation")?;
    let format = FrameFormat::new(args.width, args.height, args.layout.to_core())
        .with_rotation(rotation)
        .with_frame_rate(args.fps);

    let config = PipelineConfig::builder()
        .chroma_order(args.chroma_order.to_core())
        .min_frame_interval((!args.no_throttle).then_some(MIN_FRAME_INTERVAL))
        .build();

    info!(
        width = format.width,
        height = format.height,
        layout = ?format.layout,
        rotation = rotation.degrees(),
        "Edge pipeline configured"
    );

    let stats = match &args.output_dir {
        Some(dir) => {
            let options = TiffOptions::default()
                .with_compression(args.compression.to_core())
                .with_predictor(args.predictor.to_core());
            let sink = TiffFileSink::create(dir, options)?;
            let (stats, sink) = drive(&args, format, EdgePipeline::new(config, sink))?;
            info!(written = sink.written(), output = %dir.display(), "Edge frames written");
            stats
        }
        None => {
            let (sink, frames) = ChannelSink::new(2);
            let display = thread::Builder::new()
                .name("display".into())
                .spawn(move || {
                    let mut shown = 0u64;
                    for frame in frames {
                        match frame.to_display_rgba() {
                            Ok(rgba) => {
                                shown += 1;
                                debug!(bytes = rgba.len(), shown, "Frame displayed");
                            }
                            Err(e) => warn!(error = %e, "Frame not displayable"),
                        }
                    }
                    shown
                })
                .context("failed to spawn display thread")?;

            let pipeline = EdgePipeline::new(config, sink);
            let (stats, sink) = drive(&args, format, pipeline)?;
            info!(discarded = sink.dropped(), "Display hand-off finished");
            drop(sink);
            let shown = display.join().map_err(|_| anyhow!("display thread panicked"))?;
            info!(shown, "Display closed");
            stats
        }
    };

    info!(
        received = stats.received,
        delivered = stats.delivered,
        throttled = stats.throttled,
        dropped = stats.dropped,
        "Done"
    );
    Ok(())
}

/// Feeds the dump through `pipeline`, either directly or from a real-time
/// reader thread, and hands the sink back once the run is over.
fn drive<K: FrameSink>(
    args: &Args,
    format: FrameFormat,
    mut pipeline: EdgePipeline<K>,
) -> Result<(PipelineStats, K)> {
    let stats = if args.keep_latest {
        let (sender, mut receiver) = latest_frame_slot();
        let mut source = open_source(&args.input, format)?;
        let interval = format.frame_interval;

        let reader = thread::Builder::new()
            .name("reader".into())
            .spawn(move || {
                while !sender.is_closed() {
                    match source.next_frame() {
                        Ok(Some(frame)) => {
                            sender.offer(frame);
                            thread::sleep(interval);
                        }
                        Ok(None) => break,
                        Err(e) if e.is_frame_local() => warn!(error = %e, "Unreadable frame skipped"),
                        Err(e) => {
                            error!(error = %e, "Reader stopped");
                            break;
                        }
                    }
                }
            })
            .context("failed to spawn reader thread")?;

        let stats = pipeline.run(&mut receiver);
        let superseded = receiver.superseded();
        // closes the slot so the reader stops early when the run failed
        drop(receiver);
        reader.join().map_err(|_| anyhow!("reader thread panicked"))?;
        info!(superseded, "Reader finished");
        stats?
    } else {
        let mut source = open_source(&args.input, format)?;
        pipeline.run(&mut source)?
    };

    if args.timings {
        pipeline.timings().print_summary();
    }
    Ok((stats, pipeline.into_sink()))
}

fn open_source(path: &Path, format: FrameFormat) -> Result<RawFrameSource<BufReader<File>>> {
    RawFrameSource::open(path, format).with_context(|| format!("cannot read {}", path.display()))
}
