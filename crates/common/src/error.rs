//! Error types shared across handlens crates.
//!
//! The stabilizer itself is total and never returns an error. Everything
//! here belongs to the collaborators around it: frame sources, detectors,
//! renderers, configuration and the CLI.

/// Top-level error type for handlens operations.
#[derive(Debug, thiserror::Error)]
pub enum HandlensError {
    /// The detector has not finished loading its model.
    #[error("Detector not ready: {detector} has no model loaded")]
    ModelNotLoaded { detector: String },

    /// Frame metadata is missing or inconsistent.
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    /// The underlying inference engine failed on a single frame.
    #[error("Inference error: {message}")]
    Inference { message: String },

    #[error("Render error: {message}")]
    Render { message: String },

    #[error("Session error: {message}")]
    Session { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using HandlensError.
pub type HandlensResult<T> = Result<T, HandlensError>;

/// How a failure relates to the per-frame processing cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameErrorKind {
    /// Rejected before the stabilizer runs because a precondition is unmet.
    Precondition,
    /// Rejected before the stabilizer runs because the frame is malformed.
    MalformedInput,
    /// The detector failed; the frame is skipped and state is retained.
    InferenceRuntime,
    /// Anything that should stop the session.
    Fatal,
}

impl HandlensError {
    pub fn model_not_loaded(detector: impl Into<String>) -> Self {
        Self::ModelNotLoaded {
            detector: detector.into(),
        }
    }

    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: msg.into(),
        }
    }

    pub fn inference(msg: impl Into<String>) -> Self {
        Self::Inference {
            message: msg.into(),
        }
    }

    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render {
            message: msg.into(),
        }
    }

    pub fn session(msg: impl Into<String>) -> Self {
        Self::Session {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Classify this error against the frame-processing cycle.
    pub fn kind(&self) -> FrameErrorKind {
        match self {
            Self::ModelNotLoaded { .. } => FrameErrorKind::Precondition,
            Self::InvalidArgument { .. } => FrameErrorKind::MalformedInput,
            Self::Inference { .. } => FrameErrorKind::InferenceRuntime,
            _ => FrameErrorKind::Fatal,
        }
    }

    /// Whether the pipeline may drop this frame and keep going.
    pub fn is_recoverable(&self) -> bool {
        self.kind() != FrameErrorKind::Fatal
    }
}
