use crate::*;
use std::collections::BTreeMap;

/// Validated mapping from job name to the endpoints of its tasks.
/// Task `i` of a job listens on the `i`th endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClusterSpec(BTreeMap<JobName, Vec<Endpoint>>);

impl ClusterSpec {
    pub fn new<J, E>(jobs: &BTreeMap<J, Vec<E>>) -> Result<Self, ConfigError>
    where
        J: AsRef<str>,
        E: AsRef<str>,
    {
        jobs.iter()
            .map(|(job, endpoints)| {
                endpoints
                    .iter()
                    .map(|e| Endpoint::try_from(e.as_ref()))
                    .collect::<Result<Vec<_>, _>>()
                    .map(|endpoints| (JobName::from(job.as_ref()), endpoints))
            })
            .collect::<Result<BTreeMap<_, _>, _>>()
            .map(Self)
    }
    pub fn jobs(&self) -> impl Iterator<Item = &JobName> {
        self.0.keys()
    }
    pub fn num_tasks(&self, job: &JobName) -> usize {
        self.0.get(job).map_or(0, Vec::len)
    }
    /// Zero when the cluster has no `ps` job.
    pub fn num_ps(&self) -> usize {
        self.num_tasks(&JobName::Ps)
    }
    /// Whether a `master` task exists to act as chief.
    pub fn has_chief(&self) -> bool {
        self.num_tasks(&JobName::Master) > 0
    }
    pub fn task_address(&self, job: &JobName, index: TaskIndex) -> Result<&Endpoint, ConfigError> {
        self.0
            .get(job)
            .and_then(|endpoints| endpoints.get(index))
            .ok_or_else(|| ConfigError::TaskOutOfRange {
                job: job.to_string(),
                index,
                tasks: self.num_tasks(job),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cluster() -> ClusterSpec {
        ClusterSpec::new(&BTreeMap::from([
            ("master", vec!["m0:2222"]),
            ("ps", vec!["p0:2222", "p1:2222"]),
            ("worker", vec!["w0:2222", "w1:2222", "w2:2222"]),
        ]))
        .unwrap()
    }

    #[test]
    fn counts_tasks_per_job() {
        let cluster = cluster();
        assert_eq!(cluster.num_ps(), 2);
        assert_eq!(cluster.num_tasks(&JobName::Worker), 3);
        assert_eq!(cluster.num_tasks(&JobName::Master), 1);
        assert_eq!(cluster.num_tasks(&JobName::from("evaluator")), 0);
        assert_eq!(cluster.jobs().count(), 3);
    }
    #[test]
    fn no_ps_job_means_zero_ps() {
        let cluster = ClusterSpec::new(&BTreeMap::from([("worker", vec!["w0:1"])])).unwrap();
        assert_eq!(cluster.num_ps(), 0);
    }
    #[test]
    fn chief_needs_a_master_job() {
        assert!(cluster().has_chief());
        let workers = ClusterSpec::new(&BTreeMap::from([("worker", vec!["w0:1", "w1:1"])]));
        assert!(!workers.unwrap().has_chief());
    }
    #[test]
    fn task_address_by_index() {
        let cluster = cluster();
        assert_eq!(
            cluster.task_address(&JobName::Worker, 2).unwrap().to_string(),
            "w2:2222"
        );
        assert!(matches!(
            cluster.task_address(&JobName::Ps, 2),
            Err(ConfigError::TaskOutOfRange { tasks: 2, .. })
        ));
    }
    #[test]
    fn bad_endpoint_rejects_whole_cluster() {
        let result = ClusterSpec::new(&BTreeMap::from([("ps", vec!["p0:2222", "p1"])]));
        assert!(matches!(result, Err(ConfigError::Endpoint(e)) if e == "p1"));
    }
}
