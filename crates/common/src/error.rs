//! Error types shared across GazeTrace crates.

/// Top-level error type for GazeTrace operations.
#[derive(Debug, thiserror::Error)]
pub enum GazeError {
    #[error("Session error: {message}")]
    Session { message: String },

    #[error("Sample parsing error: {message}")]
    Parse { message: String },

    #[error("Scoring error: {message}")]
    Scoring { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Unknown user: {user_id}")]
    UnknownUser { user_id: String },

    #[error("Unknown region: {region_id}")]
    UnknownRegion { region_id: u64 },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using GazeError.
pub type GazeResult<T> = Result<T, GazeError>;

impl GazeError {
    pub fn session(msg: impl Into<String>) -> Self {
        Self::Session {
            message: msg.into(),
        }
    }

    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse {
            message: msg.into(),
        }
    }

    pub fn scoring(msg: impl Into<String>) -> Self {
        Self::Scoring {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    pub fn unknown_user(user_id: impl Into<String>) -> Self {
        Self::UnknownUser {
            user_id: user_id.into(),
        }
    }
}
