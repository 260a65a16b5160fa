use crate::*;
use serde::Deserialize;
use std::collections::BTreeMap;

/// The `TF_CONFIG` document.
///
/// ```json
/// {
///   "cluster": {"ps": ["p0:2222"], "worker": ["w0:2222", "w1:2222"]},
///   "task": {"type": "worker", "index": 1}
/// }
/// ```
///
/// Other keys (`environment`, `job`, ...) are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TfConfig {
    #[serde(default)]
    pub cluster: Option<BTreeMap<String, Vec<String>>>,
    #[serde(default)]
    pub task: Option<TaskConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskConfig {
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub index: Option<TaskIndex>,
}

impl TfConfig {
    pub fn parse(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// This task's `(job, index)`, present only when both are given.
    pub fn assignment(&self) -> Option<(JobName, TaskIndex)> {
        let task = self.task.as_ref()?;
        match (task.kind.as_deref(), task.index) {
            (Some(kind), Some(index)) => Some((JobName::from(kind), index)),
            _ => None,
        }
    }

    pub fn cluster_spec(&self) -> Result<Option<ClusterSpec>, ConfigError> {
        self.cluster.as_ref().map(ClusterSpec::new).transpose()
    }
}
