use crate::*;
use std::fmt::Display;
use std::fmt::Formatter;

/// Role a task plays in the cluster.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum JobName {
    Ps,
    Worker,
    Master,
    Other(String),
}

impl JobName {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Ps => JOB_PS,
            Self::Worker => JOB_WORKER,
            Self::Master => JOB_MASTER,
            Self::Other(name) => name,
        }
    }
    /// Workers and the master run training steps.
    pub fn is_replica(&self) -> bool {
        matches!(self, Self::Worker | Self::Master)
    }
}

impl From<&str> for JobName {
    fn from(name: &str) -> Self {
        match name {
            JOB_PS => Self::Ps,
            JOB_WORKER => Self::Worker,
            JOB_MASTER => Self::Master,
            other => Self::Other(other.to_string()),
        }
    }
}
impl From<String> for JobName {
    fn from(name: String) -> Self {
        Self::from(name.as_str())
    }
}

impl Display for JobName {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
