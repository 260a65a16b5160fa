use crate::*;
use super::*;
use std::time::Instant;

/// Step loop that checkpoints like a real estimator but trains nothing.
///
/// Resumes from the newest checkpoint in the model directory. Only the chief
/// writes checkpoints.
#[derive(Debug)]
pub struct LocalEstimator {
    model: String,
    pretrained: Option<std::path::PathBuf>,
    config: EstimatorConfig,
    checkpoints: Checkpoints,
}

impl LocalEstimator {
    pub fn new(model: &LocalModel, config: EstimatorConfig) -> Self {
        Self {
            model: model.name().to_string(),
            pretrained: model.pretrained_checkpoint(),
            checkpoints: Checkpoints::new(&config.model_dir),
            config,
        }
    }

    /// Global step to continue from, after announcing where weights come from.
    fn restore(&self) -> TrainResult<Step> {
        if let Some(step) = self.checkpoints.latest()? {
            log::info!("restoring {} from global step {}", self.model, step);
            return Ok(step);
        }
        match &self.config.warm_start {
            WarmStart::Random => log::info!("initializing {} from random weights", self.model),
            WarmStart::ModelDefault => match &self.pretrained {
                Some(path) => log::info!("warm starting {} from {}", self.model, path.display()),
                None => log::info!("no pretrained weights for {}, using random", self.model),
            },
            WarmStart::Path(path) if path.exists() => {
                log::info!("warm starting {} from {}", self.model, path.display())
            }
            WarmStart::Path(path) => {
                return Err(TrainError::Other(format!(
                    "warm start checkpoint {} not found",
                    path.display()
                )));
            }
        }
        Ok(0)
    }

    fn save(&self, step: Step) -> TrainResult<()> {
        self.checkpoints.save(step)?;
        self.checkpoints.prune(self.config.max_checkpoints_to_keep)?;
        Ok(())
    }
}

/// A replica in a cluster with no master: nobody is chief.
fn unowned(config: &EstimatorConfig) -> bool {
    !config.chief
        && config
            .devices
            .cluster_spec()
            .is_some_and(|cluster| !cluster.has_chief())
}

#[async_trait::async_trait]
impl Estimator for LocalEstimator {
    async fn train(&mut self, input: &mut dyn InputFn, max_steps: Step) -> TrainResult<Step> {
        let ref config = self.config;
        let start = self.restore()?;
        if config.use_tpu {
            log::warn!("no TPU in the local backend, training on host");
        }
        if !config.master.is_empty() {
            log::info!("session target {}", config.master);
        }
        if unowned(config) {
            log::warn!("cluster has no {} task, no checkpoints will be written", JOB_MASTER);
        } else if !config.chief {
            log::info!("not the chief, checkpoints are left to the master");
        }
        let mut step = start;
        let mut last = Instant::now();
        while step < max_steps {
            let Some(batch) = input.next_batch(config.batch_size).await? else {
                log::info!("input exhausted at global step {}", step);
                break;
            };
            step += 1;
            if config.chief && step % CHECKPOINT_INTERVAL_STEPS == 0 {
                self.save(step)?;
            }
            if last.elapsed() >= TRAINING_LOG_INTERVAL {
                last = Instant::now();
                log::info!(
                    "global step {} (batch {} of {} per epoch)",
                    step,
                    batch.index,
                    config.params.batches_per_epoch
                );
            }
            if interrupted() {
                log::warn!("stopping at global step {}", step);
                break;
            }
        }
        if config.chief && step > start && step % CHECKPOINT_INTERVAL_STEPS != 0 {
            self.save(step)?;
        }
        Ok(step)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn config(dir: &Path, chief: bool, keep: usize, warm_start: WarmStart) -> EstimatorConfig {
        EstimatorConfig {
            batch_size: 4,
            model_dir: dir.to_path_buf(),
            params: Params {
                batches_per_epoch: 25,
            },
            use_tpu: false,
            master: String::new(),
            devices: ReplicaDeviceSetter::new(0),
            chief,
            worker_replicas: 1,
            max_checkpoints_to_keep: keep,
            warm_start,
        }
    }
    fn dataset() -> LocalDataset {
        LocalDataset::new(
            DatasetConfig {
                num_examples: 100,
                ..DatasetConfig::default()
            },
            Mode::Train,
        )
    }
    fn estimator(dir: &Path, chief: bool, keep: usize) -> Box<dyn Estimator> {
        LocalModel::lookup("inception_v3", None)
            .unwrap()
            .make_estimator(config(dir, chief, keep, WarmStart::ModelDefault))
            .unwrap()
    }

    #[tokio::test]
    async fn trains_to_max_steps_and_checkpoints() {
        let dir = tempfile::tempdir().unwrap();
        let step = estimator(dir.path(), true, 0)
            .train(&mut dataset(), 2500)
            .await
            .unwrap();
        assert_eq!(step, 2500);
        assert_eq!(
            Checkpoints::new(dir.path()).steps().unwrap(),
            vec![1000, 2000, 2500]
        );
    }
    #[tokio::test]
    async fn retention_keeps_newest() {
        let dir = tempfile::tempdir().unwrap();
        estimator(dir.path(), true, 2)
            .train(&mut dataset(), 4000)
            .await
            .unwrap();
        assert_eq!(
            Checkpoints::new(dir.path()).steps().unwrap(),
            vec![3000, 4000]
        );
    }
    #[tokio::test]
    async fn resumes_from_latest_checkpoint() {
        let dir = tempfile::tempdir().unwrap();
        Checkpoints::new(dir.path()).save(1500).unwrap();
        let step = estimator(dir.path(), true, 0)
            .train(&mut dataset(), 1500)
            .await
            .unwrap();
        assert_eq!(step, 1500);
        assert_eq!(Checkpoints::new(dir.path()).steps().unwrap(), vec![1500]);
    }
    #[tokio::test]
    async fn non_chief_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let step = estimator(dir.path(), false, 0)
            .train(&mut dataset(), 2000)
            .await
            .unwrap();
        assert_eq!(step, 2000);
        assert!(Checkpoints::new(dir.path()).steps().unwrap().is_empty());
    }
    #[tokio::test]
    async fn empty_input_stops_early() {
        let dir = tempfile::tempdir().unwrap();
        let mut empty = LocalDataset::new(DatasetConfig::default(), Mode::Train);
        let step = estimator(dir.path(), true, 0)
            .train(&mut empty, 100)
            .await
            .unwrap();
        assert_eq!(step, 0);
        assert!(Checkpoints::new(dir.path()).steps().unwrap().is_empty());
    }
    #[test]
    fn workers_without_master_have_no_chief() {
        let dir = Path::new("/tmp");
        let cluster = |jobs: &[&str]| {
            let map = jobs
                .iter()
                .map(|job| (*job, vec!["h:1"]))
                .collect::<std::collections::BTreeMap<_, _>>();
            ReplicaDeviceSetter::new(0)
                .worker_device(JobName::Worker, 0)
                .cluster(ClusterSpec::new(&map).unwrap())
        };
        let mut worker = config(dir, false, 0, WarmStart::Random);
        worker.devices = cluster(&["worker"]);
        assert!(unowned(&worker));
        worker.devices = cluster(&["master", "worker"]);
        assert!(!unowned(&worker));
        let local = config(dir, false, 0, WarmStart::Random);
        assert!(!unowned(&local));
    }
    #[tokio::test]
    async fn missing_warm_start_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        let missing = WarmStart::Path(dir.path().join("nowhere/model.ckpt"));
        let result = LocalModel::lookup("inception_v3", None)
            .unwrap()
            .make_estimator(config(dir.path(), true, 0, missing))
            .unwrap()
            .train(&mut dataset(), 10)
            .await;
        assert!(matches!(result, Err(TrainError::Other(_))));
    }
}
