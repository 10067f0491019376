use std::path::Path;

use tracing::{debug, info};

use crate::error::{Result, VideoError};
use crate::video::types::{Frame, VideoInfo};

/// Frame rate assumed for still images
pub const STILL_IMAGE_FPS: f64 = 30.0;

/// A sequential source of decoded frames
///
/// Implementations own their decoder state exclusively; the compositor is the
/// only reader.
pub trait VideoSource {
    /// Dimensions, frame rate and name of the source
    fn info(&self) -> &VideoInfo;

    /// Decode the next frame, or `Ok(None)` at end of stream
    fn read_frame(&mut self) -> Result<Option<Frame>>;

    /// Seek back to the first frame
    fn rewind(&mut self) -> Result<()>;
}

impl<S: VideoSource + ?Sized> VideoSource for Box<S> {
    fn info(&self) -> &VideoInfo {
        (**self).info()
    }

    fn read_frame(&mut self) -> Result<Option<Frame>> {
        (**self).read_frame()
    }

    fn rewind(&mut self) -> Result<()> {
        (**self).rewind()
    }
}

/// Fail with `FileNotFound` unless `path` is an existing regular file.
pub fn ensure_video_file(path: &Path) -> Result<()> {
    if !path.is_file() {
        return Err(VideoError::FileNotFound {
            path: path.display().to_string(),
        }.into());
    }
    Ok(())
}

/// Open `path` with the backend that fits it.
///
/// Still images become a one-frame [`MemorySource`]; everything else goes to
/// the FFmpeg decoder.
pub fn open_source<P: AsRef<Path>>(path: P) -> Result<Box<dyn VideoSource>> {
    let path = path.as_ref();
    info!("Loading video from: {}", path.display());
    ensure_video_file(path)?;

    if is_image_file(path) {
        debug!("{} is a still image, looping a single frame", path.display());
        return Ok(Box::new(MemorySource::from_image(path)?));
    }

    open_video_backend(path)
}

#[cfg(feature = "ffmpeg")]
fn open_video_backend(path: &Path) -> Result<Box<dyn VideoSource>> {
    Ok(Box::new(crate::video::FfmpegSource::open(path)?))
}

#[cfg(not(feature = "ffmpeg"))]
fn open_video_backend(path: &Path) -> Result<Box<dyn VideoSource>> {
    Err(VideoError::SourceOpenFailed {
        path: path.display().to_string(),
        reason: "built without the `ffmpeg` feature".to_string(),
    }.into())
}

pub fn is_image_file(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some(ext) if matches!(
            ext.to_lowercase().as_str(),
            "jpg" | "jpeg" | "png" | "bmp" | "gif" | "tiff" | "webp"
        )
    )
}

/// A source backed by frames held in memory
///
/// Used for still images and wherever frames are produced without a
/// container, such as tests.
pub struct MemorySource {
    info: VideoInfo,
    frames: Vec<Frame>,
    position: usize,
}

impl MemorySource {
    /// Build a source from a list of frames; dimensions come from the first frame.
    pub fn new<S: Into<String>>(label: S, frames: Vec<Frame>, fps: f64) -> Self {
        let (width, height) = frames
            .first()
            .map(|frame| (frame.width(), frame.height()))
            .unwrap_or((0, 0));

        Self {
            info: VideoInfo {
                label: label.into(),
                width,
                height,
                fps,
                frame_count: Some(frames.len() as u64),
            },
            frames,
            position: 0,
        }
    }

    /// Load a still image as a single-frame source
    pub fn from_image(path: &Path) -> Result<Self> {
        let image = image::open(path).map_err(|e| VideoError::SourceOpenFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        let frame = Frame::new(image.to_rgb8());
        Ok(Self::new(path.display().to_string(), vec![frame], STILL_IMAGE_FPS))
    }

    /// Index of the frame the next read returns
    pub fn position(&self) -> usize {
        self.position
    }
}

impl VideoSource for MemorySource {
    fn info(&self) -> &VideoInfo {
        &self.info
    }

    fn read_frame(&mut self) -> Result<Option<Frame>> {
        let frame = self.frames.get(self.position).cloned();
        if frame.is_some() {
            self.position += 1;
        }
        Ok(frame)
    }

    fn rewind(&mut self) -> Result<()> {
        self.position = 0;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OverlayError;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_is_file_not_found() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("video.mp4");

        let result = open_source(&missing);
        assert!(matches!(
            result,
            Err(OverlayError::Video(VideoError::FileNotFound { .. }))
        ));
    }

    #[test]
    fn test_directory_is_not_a_video_file() {
        let dir = tempdir().unwrap();
        let result = ensure_video_file(dir.path());
        assert!(matches!(
            result,
            Err(OverlayError::Video(VideoError::FileNotFound { .. }))
        ));
    }

    #[test]
    fn test_image_extension_detection() {
        assert!(is_image_file(Path::new("mascot.PNG")));
        assert!(is_image_file(Path::new("frames/still.jpeg")));
        assert!(!is_image_file(Path::new("video.mp4")));
        assert!(!is_image_file(Path::new("no_extension")));
    }

    #[test]
    fn test_still_image_opens_as_single_frame_loop() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("still.png");
        Frame::new_filled(8, 6, [0, 255, 0]).as_image().save(&path).unwrap();

        let mut source = open_source(&path).unwrap();
        assert_eq!(source.info().width, 8);
        assert_eq!(source.info().height, 6);
        assert_eq!(source.info().fps, STILL_IMAGE_FPS);

        assert!(source.read_frame().unwrap().is_some());
        assert!(source.read_frame().unwrap().is_none());
        source.rewind().unwrap();
        assert_eq!(source.read_frame().unwrap().unwrap().get_pixel(0, 0), [0, 255, 0]);
    }

    #[test]
    fn test_corrupt_image_is_source_open_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"not a png").unwrap();

        let result = open_source(&path);
        assert!(matches!(
            result,
            Err(OverlayError::Video(VideoError::SourceOpenFailed { .. }))
        ));
    }

    #[test]
    fn test_memory_source_reads_in_order_and_rewinds() {
        let frames = vec![
            Frame::new_filled(2, 2, [1, 1, 1]),
            Frame::new_filled(2, 2, [2, 2, 2]),
        ];
        let mut source = MemorySource::new("two", frames, 24.0);

        assert_eq!(source.read_frame().unwrap().unwrap().get_pixel(0, 0), [1, 1, 1]);
        assert_eq!(source.read_frame().unwrap().unwrap().get_pixel(0, 0), [2, 2, 2]);
        assert!(source.read_frame().unwrap().is_none());
        assert_eq!(source.position(), 2);

        source.rewind().unwrap();
        assert_eq!(source.position(), 0);
        assert_eq!(source.read_frame().unwrap().unwrap().get_pixel(0, 0), [1, 1, 1]);
    }
}
