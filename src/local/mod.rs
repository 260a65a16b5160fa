//! In-process reference backend.
//!
//! Lets the `trainer` binary run end to end without an external runtime.
//! It honours the contracts in [`crate::framework`] but does no tensor math:
//! each step consumes one batch and advances the global step.
//!
//! ## Core Types
//!
//! - [`LocalFramework`]: factory wiring the pieces below
//! - [`DatasetConfig`] / [`LocalDataset`]: text-proto dataset description
//! - [`LocalModel`] / [`LocalEstimator`]: model registry and step loop
//! - [`Checkpoints`]: `model.ckpt-<step>` files in the model directory
//! - [`LocalServer`]: TCP endpoint for a cluster task
mod checkpoint;
mod dataset;
mod estimator;
mod model;
mod server;

pub use checkpoint::*;
pub use dataset::*;
pub use estimator::*;
pub use model::*;
pub use server::*;

use crate::*;
use std::path::Path;
use std::path::PathBuf;

#[derive(Debug, Clone, Default)]
pub struct LocalFramework {
    pretrained: Option<PathBuf>,
}

impl LocalFramework {
    /// Look for `model_default` weights under `dir/<model name>/`.
    pub fn pretrained(self, dir: impl Into<PathBuf>) -> Self {
        Self {
            pretrained: Some(dir.into()),
        }
    }
}

#[async_trait::async_trait]
impl Framework for LocalFramework {
    async fn dataset(
        &self,
        config: &Path,
        mode: Mode,
        use_tpu: bool,
    ) -> TrainResult<Box<dyn InputFn>> {
        if use_tpu {
            log::warn!("no TPU in the local backend, feeding {:?} from host", mode);
        }
        let config = DatasetConfig::load(config)?;
        Ok(Box::new(LocalDataset::new(config, mode)))
    }

    fn model(&self, name: &str) -> TrainResult<Box<dyn Model>> {
        Ok(Box::new(LocalModel::lookup(name, self.pretrained.as_deref())?))
    }

    async fn server(
        &self,
        cluster: &ClusterSpec,
        job: &JobName,
        index: TaskIndex,
    ) -> TrainResult<Box<dyn Server>> {
        let endpoint = cluster.task_address(job, index)?;
        Ok(Box::new(LocalServer::bind(endpoint).await?))
    }
}
