//! Frame-based execution adapter using libav bindings
//!
//! Decodes the source video stream and re-encodes exactly the frames of each
//! range into a new video-only file. Used when no cutting binary is
//! available; audio is never carried.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use ffmpeg_next as ffmpeg;
use ffmpeg::codec::context::Context as CodecContext;
use ffmpeg::codec::Id;
use ffmpeg::format::{self, Pixel};
use ffmpeg::frame::Video as VideoFrame;
use ffmpeg::media::Type;
use ffmpeg::software::scaling::{Context as ScalingContext, Flags as ScalingFlags};
use ffmpeg::{Packet, Rational};

use crate::domain::errors::DomainError;
use crate::domain::model::*;
use crate::domain::rules::FrameCursor;
use crate::ports::*;

/// Default target bit rate for re-encoded clips
pub const DEFAULT_FRAME_BIT_RATE: usize = 2_000_000;

/// Rate assumed when the container reports none
const FALLBACK_FRAME_RATE: Rational = Rational(30, 1);

const OUTPUT_PIXEL: Pixel = Pixel::YUV420P;

fn processing(context: &str, e: impl std::fmt::Display) -> DomainError {
    DomainError::ProcessingError(format!("{}: {}", context, e))
}

/// MPEG-4 Part 2 stores the time base in 16 bits
const MAX_RATE_TERM: i64 = 65_535;

/// Prefer the average frame rate, then the real base rate
fn pick_frame_rate(average: Rational, base: Rational) -> Rational {
    [average, base]
        .into_iter()
        .find(|rate| rate.numerator() > 0 && rate.denominator() > 0)
        .unwrap_or(FALLBACK_FRAME_RATE)
}

/// Closest rate whose numerator and denominator both fit the encoder.
///
/// Variable-frame-rate sources report averages like `5994000/200029`,
/// which the MPEG-4 encoder refuses as a time base.
fn encodable_frame_rate(rate: Rational) -> Rational {
    let (num, den) = (i64::from(rate.numerator()), i64::from(rate.denominator()));
    if num <= 0 || den <= 0 {
        return FALLBACK_FRAME_RATE;
    }
    let divisor = gcd(num, den);
    let (num, den) = (num / divisor, den / divisor);
    if num <= MAX_RATE_TERM && den <= MAX_RATE_TERM {
        return Rational(num as i32, den as i32);
    }

    // Last continued-fraction convergent that still fits
    let value = num as f64 / den as f64;
    let (mut h_prev, mut h) = (0_i64, 1_i64);
    let (mut k_prev, mut k) = (1_i64, 0_i64);
    let mut x = value;
    for _ in 0..64 {
        let a = x.floor() as i64;
        let h_next = a.saturating_mul(h).saturating_add(h_prev);
        let k_next = a.saturating_mul(k).saturating_add(k_prev);
        if h_next > MAX_RATE_TERM || k_next > MAX_RATE_TERM {
            break;
        }
        (h_prev, h, k_prev, k) = (h, h_next, k, k_next);
        let fraction = x - a as f64;
        if fraction < 1e-12 {
            break;
        }
        x = 1.0 / fraction;
    }

    if h <= 0 || k <= 0 {
        return FALLBACK_FRAME_RATE;
    }
    Rational(h as i32, k as i32)
}

fn gcd(mut a: i64, mut b: i64) -> i64 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// Converts decoder timestamps into frame indices
#[derive(Debug, Clone, Copy)]
struct FrameClock {
    time_base: Rational,
    start_pts: i64,
    fps: f64,
}

impl FrameClock {
    fn index(&self, frame: &VideoFrame) -> Option<i64> {
        let pts = frame.timestamp().or_else(|| frame.pts())?;
        let seconds = (pts - self.start_pts) as f64 * f64::from(self.time_base);
        Some((seconds * self.fps).round() as i64)
    }
}

/// Open source with its video decoder, kept across ranges
struct FrameSource {
    input: format::context::Input,
    stream_index: usize,
    decoder: ffmpeg::decoder::Video,
    frame_rate: Rational,
    clock: FrameClock,
}

impl FrameSource {
    fn open(path: &Path) -> Result<Self, DomainError> {
        let input = format::input(&path).map_err(|e| processing("Failed to open input", e))?;

        let (stream_index, time_base, start_pts, frame_rate, decoder) = {
            let stream = input
                .streams()
                .best(Type::Video)
                .ok_or_else(|| DomainError::ProcessingError("No video stream found".to_string()))?;

            let start = stream.start_time();
            let start_pts = if start == ffmpeg::ffi::AV_NOPTS_VALUE { 0 } else { start };
            let frame_rate =
                encodable_frame_rate(pick_frame_rate(stream.avg_frame_rate(), stream.rate()));

            let decoder = CodecContext::from_parameters(stream.parameters())
                .map_err(|e| processing("Failed to create decoder context", e))?
                .decoder()
                .video()
                .map_err(|e| processing("Failed to create video decoder", e))?;

            (stream.index(), stream.time_base(), start_pts, frame_rate, decoder)
        };

        let fps = f64::from(frame_rate);
        debug!(
            "Opened {} video stream {} at {:.3} fps ({}x{})",
            path.display(),
            stream_index,
            fps,
            decoder.width(),
            decoder.height()
        );

        Ok(Self {
            input,
            stream_index,
            decoder,
            frame_rate,
            clock: FrameClock {
                time_base,
                start_pts,
                fps,
            },
        })
    }

    /// Seek to the keyframe at or before `seconds` and reset the decoder
    fn seek(&mut self, seconds: f64) -> Result<(), DomainError> {
        let ts = (seconds * ffmpeg::ffi::AV_TIME_BASE as f64) as i64;
        self.input
            .seek(ts, ..ts)
            .map_err(|e| processing("Failed to seek", e))?;
        self.decoder.flush();
        Ok(())
    }

    /// Decode from the range start and write the window's frames
    fn write_clip(
        &mut self,
        job: &ClipJob,
        window: FrameWindow,
        bit_rate: usize,
    ) -> Result<u64, DomainError> {
        self.seek(job.range.start())?;

        let mut sink = ClipSink::create(
            &job.output_path,
            self.decoder.width(),
            self.decoder.height(),
            self.frame_rate,
            bit_rate,
        )?;
        let mut cursor = FrameCursor::new(window);
        let clock = self.clock;
        let stream_index = self.stream_index;

        for (stream, packet) in self.input.packets() {
            if stream.index() != stream_index {
                continue;
            }
            self.decoder
                .send_packet(&packet)
                .map_err(|e| processing("Failed to send packet to decoder", e))?;
            drain_decoder(&mut self.decoder, clock, &mut cursor, &mut sink)?;
            if cursor.is_done() {
                break;
            }
        }

        if !cursor.is_done() {
            self.decoder
                .send_eof()
                .map_err(|e| processing("Failed to flush decoder", e))?;
            drain_decoder(&mut self.decoder, clock, &mut cursor, &mut sink)?;
            if let Some((frame, repeat)) = cursor.finish() {
                sink.write(frame, repeat)?;
            }
        }

        sink.finish()
    }
}

fn drain_decoder(
    decoder: &mut ffmpeg::decoder::Video,
    clock: FrameClock,
    cursor: &mut FrameCursor<VideoFrame>,
    sink: &mut ClipSink,
) -> Result<(), DomainError> {
    let mut decoded = VideoFrame::empty();
    while decoder.receive_frame(&mut decoded).is_ok() {
        let frame = std::mem::replace(&mut decoded, VideoFrame::empty());
        let Some(index) = clock.index(&frame) else {
            continue;
        };
        if let Some((emit, repeat)) = cursor.push(index, frame) {
            sink.write(emit, repeat)?;
        }
        if cursor.is_done() {
            break;
        }
    }
    Ok(())
}

/// Video-only output file for one clip
struct ClipSink {
    output: format::context::Output,
    encoder: ffmpeg::encoder::video::Encoder,
    stream_index: usize,
    encoder_time_base: Rational,
    stream_time_base: Rational,
    scaler: Option<ScalingContext>,
    width: u32,
    height: u32,
    next_pts: i64,
}

impl ClipSink {
    fn create(
        path: &Path,
        width: u32,
        height: u32,
        frame_rate: Rational,
        bit_rate: usize,
    ) -> Result<Self, DomainError> {
        let mut output = format::output(&path).map_err(|e| processing("Failed to create output", e))?;
        let global_header = output.format().flags().contains(format::Flags::GLOBAL_HEADER);

        let codec = ffmpeg::encoder::find(Id::MPEG4)
            .ok_or_else(|| DomainError::ProcessingError("MPEG-4 encoder not available".to_string()))?;
        let encoder_time_base = frame_rate.invert();

        let (stream_index, encoder) = {
            let mut stream = output
                .add_stream(codec)
                .map_err(|e| processing("Failed to add video stream", e))?;

            let mut encoder = CodecContext::from_parameters(stream.parameters())
                .map_err(|e| processing("Failed to create encoder context", e))?
                .encoder()
                .video()
                .map_err(|e| processing("Failed to create video encoder", e))?;

            encoder.set_width(width);
            encoder.set_height(height);
            encoder.set_format(OUTPUT_PIXEL);
            encoder.set_time_base(encoder_time_base);
            encoder.set_frame_rate(Some(frame_rate));
            encoder.set_bit_rate(bit_rate);
            if global_header {
                unsafe {
                    (*encoder.as_mut_ptr()).flags |= ffmpeg::ffi::AV_CODEC_FLAG_GLOBAL_HEADER as i32;
                }
            }

            let encoder = encoder
                .open_as(codec)
                .map_err(|e| processing("Failed to open video encoder", e))?;
            stream.set_parameters(&encoder);
            stream.set_time_base(encoder_time_base);
            (stream.index(), encoder)
        };

        output
            .write_header()
            .map_err(|e| processing("Failed to write header", e))?;

        // The muxer may pick its own time base while writing the header
        let stream_time_base = output
            .stream(stream_index)
            .map(|s| s.time_base())
            .ok_or_else(|| DomainError::ProcessingError("Output stream vanished".to_string()))?;

        Ok(Self {
            output,
            encoder,
            stream_index,
            encoder_time_base,
            stream_time_base,
            scaler: None,
            width,
            height,
            next_pts: 0,
        })
    }

    /// Encode `frame` into `repeat` consecutive output slots
    fn write(&mut self, frame: VideoFrame, repeat: u64) -> Result<(), DomainError> {
        let mut frame = self.convert(frame)?;
        for _ in 0..repeat {
            frame.set_pts(Some(self.next_pts));
            frame.set_kind(ffmpeg::picture::Type::None);
            self.next_pts += 1;
            self.encoder
                .send_frame(&frame)
                .map_err(|e| processing("Failed to send frame to encoder", e))?;
            self.write_packets()?;
        }
        Ok(())
    }

    fn convert(&mut self, frame: VideoFrame) -> Result<VideoFrame, DomainError> {
        if frame.format() == OUTPUT_PIXEL && frame.width() == self.width && frame.height() == self.height {
            return Ok(frame);
        }

        if self.scaler.is_none() {
            let scaler = ScalingContext::get(
                frame.format(),
                frame.width(),
                frame.height(),
                OUTPUT_PIXEL,
                self.width,
                self.height,
                ScalingFlags::BILINEAR,
            )
            .map_err(|e| processing("Failed to create scaler", e))?;
            self.scaler = Some(scaler);
        }
        let scaler = self
            .scaler
            .as_mut()
            .ok_or_else(|| DomainError::ProcessingError("Scaler unavailable".to_string()))?;

        let mut converted = VideoFrame::empty();
        scaler
            .run(&frame, &mut converted)
            .map_err(|e| processing("Failed to convert frame", e))?;
        Ok(converted)
    }

    fn write_packets(&mut self) -> Result<(), DomainError> {
        let mut packet = Packet::empty();
        while self.encoder.receive_packet(&mut packet).is_ok() {
            packet.set_stream(self.stream_index);
            packet.rescale_ts(self.encoder_time_base, self.stream_time_base);
            packet
                .write_interleaved(&mut self.output)
                .map_err(|e| processing("Failed to write packet", e))?;
        }
        Ok(())
    }

    /// Flush the encoder and close the file; returns frames written
    fn finish(mut self) -> Result<u64, DomainError> {
        self.encoder
            .send_eof()
            .map_err(|e| processing("Failed to flush encoder", e))?;
        self.write_packets()?;
        self.output
            .write_trailer()
            .map_err(|e| processing("Failed to write trailer", e))?;
        Ok(self.next_pts as u64)
    }
}

/// Frame-based extractor (fallback when no cutting binary is present)
pub struct FrameExtractor {
    source_path: PathBuf,
    bit_rate: usize,
    source: Option<FrameSource>,
}

impl FrameExtractor {
    /// Create an extractor for `source_path`; the file is opened on first use
    pub fn new(source_path: impl Into<PathBuf>) -> Result<Self, DomainError> {
        ffmpeg::init().map_err(|e| processing("FFmpeg initialization failed", e))?;
        Ok(Self {
            source_path: source_path.into(),
            bit_rate: DEFAULT_FRAME_BIT_RATE,
            source: None,
        })
    }

    pub fn with_bit_rate(mut self, bit_rate: usize) -> Self {
        self.bit_rate = bit_rate;
        self
    }

    fn source(&mut self) -> Result<&mut FrameSource, DomainError> {
        if self.source.is_none() {
            self.source = Some(FrameSource::open(&self.source_path)?);
        }
        self.source
            .as_mut()
            .ok_or_else(|| DomainError::ProcessingError("Source not open".to_string()))
    }

    fn cut(&mut self, job: &ClipJob) -> Result<ClipOutcome, DomainError> {
        let bit_rate = self.bit_rate;
        let source = self.source()?;
        let fps = source.clock.fps;
        let window = FrameWindow::from_range(&job.range, fps);
        if window.is_empty() {
            return Err(DomainError::OutOfBounds(format!(
                "range {} covers zero frames at {:.3} fps",
                job.range, fps
            )));
        }

        debug!(
            "Clip {}: frames [{}, {})",
            job.index, window.start_frame, window.end_frame
        );
        let written = match source.write_clip(job, window, bit_rate) {
            Ok(written) => written,
            Err(e) => {
                let _ = std::fs::remove_file(&job.output_path);
                return Err(e);
            }
        };

        if written == 0 {
            let _ = std::fs::remove_file(&job.output_path);
            return Err(DomainError::ProcessingError(format!(
                "no frames decoded for range {}",
                job.range
            )));
        }

        info!("Clip {}: wrote {} frames", job.index, written);
        Ok(ClipOutcome {
            audio_preserved: false,
            frames_written: Some(written),
        })
    }
}

#[async_trait]
impl ExtractPort for FrameExtractor {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Frames
    }

    fn output_extension(&self, _source: &Path) -> String {
        "mp4".to_string()
    }

    async fn extract_clip(&mut self, job: &ClipJob) -> Result<ClipOutcome, DomainError> {
        self.cut(job)
    }
}
