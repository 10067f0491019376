// src/video/ffmpeg_source.rs - Sequential decoding through libavformat/libavcodec

use std::path::Path;

use ffmpeg_next as ffmpeg;
use ffmpeg::format::{context::Input, Pixel};
use ffmpeg::media::Type;
use ffmpeg::software::scaling::{Context as Scaler, Flags};
use ffmpeg::util::frame::video::Video;
use tracing::{debug, info, warn};

use crate::error::{Result, VideoError};
use crate::video::source::{ensure_video_file, VideoSource};
use crate::video::types::{Frame, VideoInfo};

/// A video file decoded frame by frame with FFmpeg
///
/// Frames are converted to packed RGB24 at the source resolution; scaling to
/// the display size happens later so it stays independent of the backend.
pub struct FfmpegSource {
    input: Input,
    stream_index: usize,
    decoder: ffmpeg::decoder::Video,
    scaler: Scaler,
    info: VideoInfo,
    decoded: Video,
    rgb: Video,
    draining: bool,
}

impl FfmpegSource {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        ensure_video_file(path)?;

        let label = path.display().to_string();
        let open_failed = |reason: String| VideoError::SourceOpenFailed {
            path: label.clone(),
            reason,
        };

        ffmpeg::init().map_err(|e| open_failed(e.to_string()))?;
        let input = ffmpeg::format::input(&path).map_err(|e| open_failed(e.to_string()))?;

        let (stream_index, fps, frame_count, parameters) = {
            let stream = input
                .streams()
                .best(Type::Video)
                .ok_or_else(|| open_failed("no video stream".to_string()))?;

            let frame_count = u64::try_from(stream.frames()).ok().filter(|&n| n > 0);
            (stream.index(), stream_frame_rate(&stream), frame_count, stream.parameters())
        };

        let decoder = ffmpeg::codec::context::Context::from_parameters(parameters)
            .and_then(|context| context.decoder().video())
            .map_err(|e| open_failed(e.to_string()))?;

        let (width, height) = (decoder.width(), decoder.height());
        if width == 0 || height == 0 {
            return Err(open_failed("stream reports zero-sized frames".to_string()).into());
        }

        let scaler = Scaler::get(
            decoder.format(),
            width,
            height,
            Pixel::RGB24,
            width,
            height,
            Flags::BILINEAR,
        )
        .map_err(|e| open_failed(e.to_string()))?;

        info!("Video metadata: {}x{} @ {:.2}fps, {} frames",
              width, height, fps,
              frame_count.map(|n| n.to_string()).unwrap_or_else(|| "unknown".to_string()));

        Ok(Self {
            input,
            stream_index,
            decoder,
            scaler,
            info: VideoInfo {
                label,
                width,
                height,
                fps,
                frame_count,
            },
            decoded: Video::empty(),
            rgb: Video::empty(),
            draining: false,
        })
    }

    fn decode_failed(&self, reason: String) -> VideoError {
        VideoError::DecodeFailed {
            path: self.info.label.clone(),
            reason,
        }
    }

    /// Convert the last decoded picture into a tightly packed RGB frame
    fn convert_decoded(&mut self) -> Result<Frame> {
        let expected = self.scaler.input();
        let (format, width, height) = (self.decoded.format(), self.decoded.width(), self.decoded.height());
        if expected.format != format || expected.width != width || expected.height != height {
            debug!("Picture format changed to {:?} {}x{}, rebuilding scaler", format, width, height);
            self.scaler = Scaler::get(format, width, height, Pixel::RGB24, width, height, Flags::BILINEAR)
                .map_err(|e| self.decode_failed(e.to_string()))?;
            self.rgb = Video::empty();
        }

        if let Err(e) = self.scaler.run(&self.decoded, &mut self.rgb) {
            return Err(self.decode_failed(e.to_string()).into());
        }

        let width = self.rgb.width();
        let height = self.rgb.height();
        let row_len = width as usize * 3;
        let stride = self.rgb.stride(0);

        let mut pixels = Vec::with_capacity(row_len * height as usize);
        for row in self.rgb.data(0).chunks(stride).take(height as usize) {
            pixels.extend_from_slice(&row[..row_len]);
        }

        Frame::from_rgb_bytes(width, height, pixels).ok_or_else(|| {
            self.decode_failed(format!("short picture buffer for {}x{}", width, height)).into()
        })
    }
}

/// Average frame rate, falling back to the stream's base rate
fn stream_frame_rate(stream: &ffmpeg::format::stream::Stream) -> f64 {
    let average = f64::from(stream.avg_frame_rate());
    if average.is_finite() && average > 0.0 {
        return average;
    }
    f64::from(stream.rate())
}

impl VideoSource for FfmpegSource {
    fn info(&self) -> &VideoInfo {
        &self.info
    }

    fn read_frame(&mut self) -> Result<Option<Frame>> {
        loop {
            if self.decoder.receive_frame(&mut self.decoded).is_ok() {
                return self.convert_decoded().map(Some);
            }

            if self.draining {
                return Ok(None);
            }

            let next = self.input
                .packets()
                .next()
                .map(|(stream, packet)| (stream.index(), packet));

            match next {
                Some((index, packet)) => {
                    if index != self.stream_index {
                        continue;
                    }
                    if let Err(e) = self.decoder.send_packet(&packet) {
                        warn!("Skipping undecodable packet in {}: {}", self.info.label, e);
                    }
                }
                None => {
                    if let Err(e) = self.decoder.send_eof() {
                        return Err(self.decode_failed(e.to_string()).into());
                    }
                    self.draining = true;
                }
            }
        }
    }

    fn rewind(&mut self) -> Result<()> {
        if let Err(e) = self.input.seek(0, ..) {
            return Err(self.decode_failed(format!("seek to start failed: {}", e)).into());
        }
        self.decoder.flush();
        self.draining = false;
        debug!("Rewound {} to the first frame", self.info.label);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compositor::Compositor;
    use crate::config::Config;
    use std::time::Duration;
    use tempfile::tempdir;

    const WIDTH: u32 = 64;
    const HEIGHT: u32 = 48;
    const FRAMES: u8 = 5;

    // Limited-range luma for frame `index`; decodes to R = G = B of about 46.6 * index.
    fn luma(index: u8) -> u8 {
        16 + 40 * index
    }

    /// Write a grey 4:4:4 YUV4MPEG2 clip at 30 fps whose brightness encodes the frame number
    fn write_numbered_clip(path: &Path) {
        let plane = (WIDTH * HEIGHT) as usize;
        let mut data = format!("YUV4MPEG2 W{} H{} F30:1 Ip A1:1 C444\n", WIDTH, HEIGHT).into_bytes();
        for index in 0..FRAMES {
            data.extend_from_slice(b"FRAME\n");
            data.extend(std::iter::repeat(luma(index)).take(plane));
            data.extend(std::iter::repeat(128u8).take(plane * 2));
        }
        std::fs::write(path, data).unwrap();
    }

    fn frame_number(frame: &Frame) -> u8 {
        let [r, g, b] = frame.get_pixel(frame.width() / 2, frame.height() / 2);
        assert!(r.abs_diff(g) <= 2 && g.abs_diff(b) <= 2, "grey frame decoded as {:?}", [r, g, b]);
        (f64::from(r) / (40.0 * 255.0 / 219.0)).round() as u8
    }

    fn open_clip() -> (tempfile::TempDir, FfmpegSource) {
        let dir = tempdir().unwrap();
        let path = dir.path().join("numbered.y4m");
        write_numbered_clip(&path);
        let source = FfmpegSource::open(&path).unwrap();
        (dir, source)
    }

    #[test]
    fn test_open_reports_stream_info() {
        let (_dir, source) = open_clip();
        let info = source.info();

        assert_eq!((info.width, info.height), (WIDTH, HEIGHT));
        assert!((info.fps - 30.0).abs() < 1e-9);
        assert!(info.label.ends_with("numbered.y4m"));
    }

    #[test]
    fn test_open_missing_file_is_file_not_found() {
        let dir = tempdir().unwrap();
        let result = FfmpegSource::open(dir.path().join("absent.y4m"));
        assert!(matches!(
            result,
            Err(crate::OverlayError::Video(VideoError::FileNotFound { .. }))
        ));
    }

    #[test]
    fn test_open_non_video_is_source_open_failed() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("notes.y4m");
        std::fs::write(&path, b"definitely not a video").unwrap();

        assert!(matches!(
            FfmpegSource::open(&path),
            Err(crate::OverlayError::Video(VideoError::SourceOpenFailed { .. }))
        ));
    }

    #[test]
    fn test_reads_every_frame_in_order_then_ends() {
        let (_dir, mut source) = open_clip();

        for expected in 0..FRAMES {
            let frame = source.read_frame().unwrap().expect("frame before end of stream");
            assert_eq!((frame.width(), frame.height()), (WIDTH, HEIGHT));
            assert_eq!(frame_number(&frame), expected);
        }

        assert!(source.read_frame().unwrap().is_none());
        assert!(source.read_frame().unwrap().is_none());
    }

    #[test]
    fn test_rewind_restarts_from_first_frame() {
        let (_dir, mut source) = open_clip();

        source.read_frame().unwrap();
        source.read_frame().unwrap();
        source.rewind().unwrap();
        assert_eq!(frame_number(&source.read_frame().unwrap().unwrap()), 0);

        while source.read_frame().unwrap().is_some() {}
        source.rewind().unwrap();
        assert_eq!(frame_number(&source.read_frame().unwrap().unwrap()), 0);
        assert_eq!(frame_number(&source.read_frame().unwrap().unwrap()), 1);
    }

    #[test]
    fn test_compositor_loops_decoded_clip_twice() {
        let (_dir, source) = open_clip();
        let mut compositor = Compositor::new(source, &Config::default()).unwrap();

        assert_eq!(compositor.display_size().width, 500);
        assert_eq!(compositor.display_size().height, 375);
        assert_eq!(compositor.delay(), Duration::from_millis(15));

        let mut seen = Vec::new();
        for _ in 0..2 * FRAMES {
            let image = compositor.produce_next_frame().unwrap();
            assert_eq!((image.width(), image.height()), (500, 375));
            assert_eq!(image.transparent_pixels(), 0);

            let [r, _, _, _] = image.get_pixel(250, 187);
            seen.push((f64::from(r) / (40.0 * 255.0 / 219.0)).round() as u8);
        }

        assert_eq!(seen, vec![0, 1, 2, 3, 4, 0, 1, 2, 3, 4]);
        assert_eq!(compositor.stats().rewinds, 1);
        assert_eq!(compositor.stats().frames_produced, 10);
    }
}
