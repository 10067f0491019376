use std::time::Duration;
use tracing::{debug, info};

use crate::{
    chroma::ChromaKey,
    config::Config,
    error::{Result, VideoError},
    video::{frame_delay, CompositedImage, DisplaySize, Frame, VideoSource},
};

/// A surface that shows composited images
///
/// Each call replaces whatever was presented before.
pub trait Presenter {
    fn present(&mut self, image: CompositedImage) -> Result<()>;
}

/// Counters describing playback so far
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlaybackStats {
    /// Composited images produced
    pub frames_produced: u64,

    /// Composited images handed to a presenter
    pub frames_presented: u64,

    /// Times the source wrapped back to its first frame
    pub rewinds: u64,

    /// Frames read since the last rewind
    pub position: u64,
}

/// The compositor loop: decode, fit, key, present, reschedule
///
/// Owns the video source exclusively. All derived values (display size,
/// per-frame delay) are computed once at construction.
///
/// The loop has two layers:
/// 1. [`produce_next_frame`](Self::produce_next_frame) - pure frame production
/// 2. [`tick`](Self::tick) - present the frame and report when to run again
pub struct Compositor<S> {
    source: S,
    key: ChromaKey,
    display_size: DisplaySize,
    delay: Duration,
    stats: PlaybackStats,
}

impl<S: VideoSource> Compositor<S> {
    /// Validate the source and derive display size and frame delay.
    ///
    /// Fails with `InvalidFrameRate` when the source reports a zero or
    /// unavailable frame rate, and with `SourceOpenFailed` when it reports a
    /// zero-sized picture.
    pub fn new(source: S, config: &Config) -> Result<Self> {
        let info = source.info();

        let delay = frame_delay(info.fps, config.playback.delay_numerator_ms)
            .ok_or_else(|| VideoError::InvalidFrameRate { path: info.label.clone() })?;

        if info.width == 0 || info.height == 0 {
            return Err(VideoError::SourceOpenFailed {
                path: info.label.clone(),
                reason: format!("source reports a {}x{} picture", info.width, info.height),
            }.into());
        }

        let display_size = DisplaySize::fit_within(
            info.width,
            info.height,
            config.window.width,
            config.window.height,
        );

        info!("Compositing {} ({}x{} @ {:.2}fps) at {}x{}, {}ms per frame",
              info.label, info.width, info.height, info.fps,
              display_size.width, display_size.height, delay.as_millis());

        Ok(Self {
            source,
            key: ChromaKey::green(),
            display_size,
            delay,
            stats: PlaybackStats::default(),
        })
    }

    pub fn display_size(&self) -> DisplaySize {
        self.display_size
    }

    /// Delay between the end of one tick and the start of the next
    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn stats(&self) -> PlaybackStats {
        self.stats
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Decode, resize and key the next frame, looping at end of stream
    pub fn produce_next_frame(&mut self) -> Result<CompositedImage> {
        let frame = self.next_source_frame()?;
        let resized = frame.resized(self.display_size);
        let image = self.key.apply(&resized);

        self.stats.frames_produced += 1;
        Ok(image)
    }

    /// Run one iteration: produce a frame, present it, and return the delay
    /// the host should wait before calling `tick` again.
    pub fn tick<P: Presenter + ?Sized>(&mut self, presenter: &mut P) -> Result<Duration> {
        let image = self.produce_next_frame()?;
        presenter.present(image)?;
        self.stats.frames_presented += 1;
        Ok(self.delay)
    }

    fn next_source_frame(&mut self) -> Result<Frame> {
        if let Some(frame) = self.source.read_frame()? {
            self.stats.position += 1;
            return Ok(frame);
        }

        debug!("End of stream after {} frames, rewinding", self.stats.position);
        self.source.rewind()?;
        self.stats.rewinds += 1;
        self.stats.position = 0;

        match self.source.read_frame()? {
            Some(frame) => {
                self.stats.position = 1;
                Ok(frame)
            }
            None => Err(VideoError::DecodeFailed {
                path: self.source.info().label.clone(),
                reason: "no frame available after rewinding to the start".to_string(),
            }.into()),
        }
    }
}
