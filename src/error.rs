use thiserror::Error;

/// Main error type for chroma-overlay
#[derive(Error, Debug)]
pub enum OverlayError {
    #[error("Video error: {0}")]
    Video(#[from] VideoError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Window error: {0}")]
    Window(#[from] WindowError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while opening or decoding the video source.
///
/// None of these are retried: they abort startup, or stop the overlay when
/// they surface during playback.
#[derive(Error, Debug)]
pub enum VideoError {
    #[error("Video file '{path}' not found")]
    FileNotFound { path: String },

    #[error("Error opening video file '{path}': {reason}")]
    SourceOpenFailed { path: String, reason: String },

    #[error("Video file '{path}' has zero FPS, unable to calculate delay")]
    InvalidFrameRate { path: String },

    #[error("Failed to decode a frame from '{path}': {reason}")]
    DecodeFailed { path: String, reason: String },
}

/// Configuration-specific errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse configuration file: {path}: {reason}")]
    ParseFailed { path: String, reason: String },

    #[error("Invalid configuration value: {key} = {value}")]
    InvalidValue { key: String, value: String },

    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },
}

/// Window system and presentation errors
///
/// Backend errors are kept as text.
#[derive(Error, Debug)]
pub enum WindowError {
    #[error("Event loop failed: {0}")]
    EventLoop(String),

    #[error("Window creation failed: {0}")]
    Os(String),

    #[error("Drawing surface failed: {0}")]
    Surface(String),

    #[error("Graphics device unavailable: {0}")]
    Graphics(String),
}

impl From<winit::error::EventLoopError> for WindowError {
    fn from(e: winit::error::EventLoopError) -> Self {
        Self::EventLoop(e.to_string())
    }
}

impl From<winit::error::OsError> for WindowError {
    fn from(e: winit::error::OsError) -> Self {
        Self::Os(e.to_string())
    }
}

impl From<wgpu::CreateSurfaceError> for WindowError {
    fn from(e: wgpu::CreateSurfaceError) -> Self {
        Self::Surface(e.to_string())
    }
}

impl From<wgpu::SurfaceError> for WindowError {
    fn from(e: wgpu::SurfaceError) -> Self {
        Self::Surface(e.to_string())
    }
}

impl From<wgpu::RequestAdapterError> for WindowError {
    fn from(e: wgpu::RequestAdapterError) -> Self {
        Self::Graphics(e.to_string())
    }
}

impl From<wgpu::RequestDeviceError> for WindowError {
    fn from(e: wgpu::RequestDeviceError) -> Self {
        Self::Graphics(e.to_string())
    }
}

/// Convenience type alias for Results using OverlayError
pub type Result<T> = std::result::Result<T, OverlayError>;

impl OverlayError {
    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            Self::Video(VideoError::FileNotFound { path }) => {
                format!("Video file '{}' not found. Pass a video path or set [video] path in the config.", path)
            }
            Self::Video(VideoError::SourceOpenFailed { path, reason }) => {
                format!("Could not open video file '{}' ({}). Please check it is a supported format.", path, reason)
            }
            Self::Video(err) => err.to_string(),
            Self::Config(ConfigError::FileNotFound { path }) => {
                format!("Configuration file '{}' not found.", path)
            }
            _ => self.to_string(),
        }
    }
}
