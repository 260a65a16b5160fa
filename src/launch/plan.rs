use crate::*;
use std::fmt::Display;
use std::fmt::Formatter;

/// What this process does, decided from flags or `TF_CONFIG`.
#[derive(Debug, PartialEq)]
pub enum Plan {
    /// Single process, or placement configured entirely by flags.
    Local {
        target: String,
        chief: bool,
        devices: ReplicaDeviceSetter,
    },
    /// Serve variables until shut down. Never trains.
    ParameterServer {
        cluster: ClusterSpec,
        index: TaskIndex,
    },
    /// A `master` or `worker` task training against its own server.
    Replica {
        cluster: ClusterSpec,
        job: JobName,
        index: TaskIndex,
        chief: bool,
        devices: ReplicaDeviceSetter,
    },
    /// A job with no training role (e.g. an evaluator).
    Idle {
        cluster: ClusterSpec,
        job: JobName,
        index: TaskIndex,
    },
}

impl Plan {
    /// `tf_config` counts as unset when absent or empty.
    pub fn resolve(flags: &Flags, tf_config: Option<&str>) -> Result<Self, ConfigError> {
        let tf_config = tf_config.filter(|json| !json.is_empty());
        if let Some(flag) = tf_config.and(flags.conflicts().first().copied()) {
            return Err(ConfigError::Conflict(flag));
        }
        let Some(json) = tf_config else {
            return Ok(Self::Local {
                target: flags.master.clone(),
                chief: flags.task == 0,
                devices: ReplicaDeviceSetter::new(flags.ps_tasks),
            });
        };
        let config = TfConfig::parse(json)?;
        let Some((job, index)) = config.assignment() else {
            return Ok(Self::Local {
                target: String::new(),
                chief: true,
                devices: ReplicaDeviceSetter::new(0),
            });
        };
        let cluster = config
            .cluster_spec()?
            .ok_or_else(|| ConfigError::MissingCluster {
                job: job.to_string(),
                index,
            })?;
        cluster.task_address(&job, index)?;
        Ok(match job {
            JobName::Ps => Self::ParameterServer { cluster, index },
            job if job.is_replica() => Self::Replica {
                chief: job == JobName::Master,
                devices: ReplicaDeviceSetter::new(cluster.num_ps())
                    .worker_device(job.clone(), index)
                    .cluster(cluster.clone()),
                cluster,
                job,
                index,
            },
            job => Self::Idle {
                cluster,
                job,
                index,
            },
        })
    }

    /// True for plans that call into the estimator.
    pub fn trains(&self) -> bool {
        matches!(self, Self::Local { .. } | Self::Replica { .. })
    }
}

impl Display for Plan {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Local { target, .. } if target.is_empty() => write!(f, "local training"),
            Self::Local { target, .. } => write!(f, "training against {}", target),
            Self::ParameterServer { index, .. } => write!(f, "parameter server {}", index),
            Self::Replica { job, index, .. } => write!(f, "replica {}:{}", job, index),
            Self::Idle { job, index, .. } => write!(f, "idle task {}:{}", job, index),
        }
    }
}
