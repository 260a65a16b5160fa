//! Replica device placement.
//!
//! [`ReplicaDeviceSetter`] decides which device each graph op lands on when
//! training is spread over parameter servers: variable-holding ops go to ps
//! tasks round-robin, everything else stays on this replica's worker device.
use crate::*;
use std::fmt::Display;
use std::fmt::Formatter;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

/// Device of the parameter server job as a whole.
pub const PS_DEVICE: &str = const_format::concatcp!("/job:", JOB_PS);

/// Op types that own variable state and therefore live on parameter servers.
pub const PS_OPS: &[&str] = &[
    "Variable",
    "VariableV2",
    "AutoReloadVariable",
    "VarHandleOp",
    "MutableHashTable",
    "MutableHashTableV2",
    "MutableHashTableOfTensors",
    "MutableHashTableOfTensorsV2",
    "MutableDenseHashTable",
    "MutableDenseHashTableV2",
];

/// A job, optionally narrowed to one of its tasks.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Device {
    job: JobName,
    task: Option<TaskIndex>,
}

impl Device {
    pub fn job(job: JobName) -> Self {
        Self { job, task: None }
    }
    pub fn task(job: JobName, task: TaskIndex) -> Self {
        Self {
            job,
            task: Some(task),
        }
    }
}

impl Display for Device {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.task {
            Some(task) => write!(f, "/job:{}/task:{}", self.job, task),
            None => write!(f, "/job:{}", self.job),
        }
    }
}

/// Placement function for a replicated training job.
#[derive(Debug, Default)]
pub struct ReplicaDeviceSetter {
    ps_tasks: usize,
    worker: Option<Device>,
    cluster: Option<ClusterSpec>,
    next: AtomicUsize,
}

impl ReplicaDeviceSetter {
    /// With zero `ps_tasks` every op is left to the local device.
    pub fn new(ps_tasks: usize) -> Self {
        Self {
            ps_tasks,
            ..Self::default()
        }
    }
    pub fn worker_device(self, job: JobName, index: TaskIndex) -> Self {
        Self {
            worker: Some(Device::task(job, index)),
            ..self
        }
    }
    pub fn cluster(self, cluster: ClusterSpec) -> Self {
        Self {
            cluster: Some(cluster),
            ..self
        }
    }

    pub fn ps_tasks(&self) -> usize {
        self.ps_tasks
    }
    pub fn worker(&self) -> Option<&Device> {
        self.worker.as_ref()
    }
    pub fn cluster_spec(&self) -> Option<&ClusterSpec> {
        self.cluster.as_ref()
    }
    /// True when every op stays on the local device.
    pub fn is_local(&self) -> bool {
        self.ps_tasks == 0
    }

    /// Device for an op of the given type, or `None` to leave it unplaced.
    pub fn place(&self, op_type: &str) -> Option<Device> {
        if self.is_local() {
            None
        } else if PS_OPS.contains(&op_type) {
            let task = self.next.fetch_add(1, Ordering::Relaxed) % self.ps_tasks;
            Some(Device::task(JobName::Ps, task))
        } else {
            self.worker.clone()
        }
    }

    /// Every ps task device, in task order.
    pub fn ps_devices(&self) -> Vec<Device> {
        (0..self.ps_tasks)
            .map(|task| Device::task(JobName::Ps, task))
            .collect()
    }
}

/// Equal when configured alike; the round-robin position is ignored.
impl PartialEq for ReplicaDeviceSetter {
    fn eq(&self, other: &Self) -> bool {
        self.ps_tasks == other.ps_tasks
            && self.worker == other.worker
            && self.cluster == other.cluster
    }
}

impl Display for ReplicaDeviceSetter {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match (self.ps_tasks, &self.worker) {
            (0, _) => write!(f, "local"),
            (n, Some(worker)) => write!(f, "{} tasks of {} from {}", n, PS_DEVICE, worker),
            (n, None) => write!(f, "{} tasks of {}", n, PS_DEVICE),
        }
    }
}
