//! Error types for launching and running training.
//!
//! [`ConfigError`] covers bad user input and is never retried.
//! [`TrainError`] covers runtime failures; only the transient kinds are
//! retryable.
use thiserror::Error;

pub type TrainResult<T> = Result<T, TrainError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("either the flag --{0} or the environment variable TF_CONFIG can be set but not both")]
    Conflict(&'static str),

    #[error("malformed TF_CONFIG: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TF_CONFIG assigns task {job}:{index} but has no cluster")]
    MissingCluster { job: String, index: usize },

    #[error("task {job}:{index} is not in the cluster ({tasks} tasks)")]
    TaskOutOfRange {
        job: String,
        index: usize,
        tasks: usize,
    },

    #[error("invalid endpoint {0:?}: expected host:port")]
    Endpoint(String),

    #[error("unknown model name: {0}")]
    UnknownModel(String),

    #[error("dataset config {path}: {reason}")]
    DatasetConfig { path: String, reason: String },

    #[error("batch size must be positive")]
    ZeroBatchSize,
}

#[derive(Debug, Error)]
pub enum TrainError {
    /// Transient distributed communication failure.
    #[error("unavailable: {0}")]
    Unavailable(String),

    /// Internal failure inside the training backend.
    #[error("internal: {0}")]
    Internal(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl TrainError {
    /// Unavailable and internal errors are worth another attempt.
    pub fn retryable(&self) -> bool {
        matches!(self, Self::Unavailable(_) | Self::Internal(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_transient_errors_retry() {
        assert!(TrainError::Unavailable("socket closed".into()).retryable());
        assert!(TrainError::Internal("session aborted".into()).retryable());
        assert!(!TrainError::Config(ConfigError::ZeroBatchSize).retryable());
        assert!(!TrainError::Other("boom".into()).retryable());
        assert!(!TrainError::Io(std::io::Error::other("disk")).retryable());
    }
    #[test]
    fn conflict_names_the_flag() {
        let message = ConfigError::Conflict("master").to_string();
        assert!(message.contains("--master"));
        assert!(message.contains("TF_CONFIG"));
    }
}
