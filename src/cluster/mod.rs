//! Cluster topology.
//!
//! - [`TfConfig`]: the `TF_CONFIG` JSON document
//! - [`ClusterSpec`]: validated job → endpoint mapping
//! - [`JobName`] / [`Endpoint`]: typed pieces of the above
mod config;
mod endpoint;
mod job;
mod spec;

pub use config::*;
pub use endpoint::*;
pub use job::*;
pub use spec::*;
