//! Contracts of the training framework and its collaborators.
//!
//! The launcher never looks inside a dataset, a model or the cluster
//! runtime. It only drives them through these traits:
//!
//! - [`Framework`]: factory for datasets, models and servers
//! - [`InputFn`]: a batched input pipeline
//! - [`Model`] / [`Estimator`]: model lookup and its training driver
//! - [`Server`]: this task's endpoint in a distributed job
use crate::*;
use std::fmt::Display;
use std::path::Path;
use std::path::PathBuf;

/// Which estimator phase a dataset is built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Train,
    Eval,
    Predict,
}

/// One unit of input handed to a training step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Batch {
    pub index: u64,
    pub size: usize,
}

/// Hyperparameters derived by the launcher and passed to the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Params {
    pub batches_per_epoch: u64,
}

/// Everything a model needs to build its estimator.
#[derive(Debug)]
pub struct EstimatorConfig {
    pub batch_size: usize,
    pub model_dir: PathBuf,
    pub params: Params,
    pub use_tpu: bool,
    /// Session target; empty runs in process.
    pub master: String,
    pub devices: ReplicaDeviceSetter,
    pub chief: bool,
    pub worker_replicas: usize,
    pub max_checkpoints_to_keep: usize,
    pub warm_start: WarmStart,
}

#[async_trait::async_trait]
pub trait InputFn: Display + Send + Sync {
    /// Examples in one pass over the data.
    fn num_examples(&self) -> u64;
    /// Next batch, or `None` once a finite pipeline is drained.
    async fn next_batch(&mut self, batch_size: usize) -> TrainResult<Option<Batch>>;
}

#[async_trait::async_trait]
pub trait Estimator: Send + Sync {
    /// Train until `max_steps` global steps. Returns the final global step.
    async fn train(&mut self, input: &mut dyn InputFn, max_steps: Step) -> TrainResult<Step>;
}

pub trait Model: Send + Sync {
    fn name(&self) -> &str;
    /// Weights used when warm starting from `model_default`.
    fn pretrained_checkpoint(&self) -> Option<PathBuf>;
    fn make_estimator(&self, config: EstimatorConfig) -> TrainResult<Box<dyn Estimator>>;
}

#[async_trait::async_trait]
pub trait Server: Send + Sync {
    /// Session target other tasks and the local estimator connect to.
    fn target(&self) -> String;
    /// Serve until shut down.
    async fn join(&self) -> TrainResult<()>;
}

#[async_trait::async_trait]
pub trait Framework: Send + Sync {
    /// Input pipeline described by a dataset config file.
    async fn dataset(&self, config: &Path, mode: Mode, use_tpu: bool)
    -> TrainResult<Box<dyn InputFn>>;
    /// Model registered under `name`.
    fn model(&self, name: &str) -> TrainResult<Box<dyn Model>>;
    /// Start this task's server in the cluster.
    async fn server(
        &self,
        cluster: &ClusterSpec,
        job: &JobName,
        index: TaskIndex,
    ) -> TrainResult<Box<dyn Server>>;
}
