//! Launch pipeline - from flags and `TF_CONFIG` to a training run.
//!
//! 1. Resolve this process's [`Plan`] (pure, no side effects)
//! 2. Start a server if the plan is part of a cluster
//! 3. Either block serving variables or train against the server target
mod plan;


pub use plan::*;

use crate::*;

/// Drives one training attempt through a [`Framework`].
pub struct Launch<'a> {
    flags: &'a Flags,
    framework: &'a dyn Framework,
}

impl<'a> Launch<'a> {
    pub fn new(flags: &'a Flags, framework: &'a dyn Framework) -> Self {
        Self { flags, framework }
    }

    /// Resolve the cluster role from `tf_config`, then act on it.
    pub async fn parse_and_run(&self, tf_config: Option<&str>) -> TrainResult<()> {
        log::info!("{} {}", TF_CONFIG, tf_config.unwrap_or("<unset>"));
        let plan = Plan::resolve(self.flags, tf_config)?;
        log::info!("resolved {}", plan);
        self.execute(plan).await
    }

    pub async fn execute(&self, plan: Plan) -> TrainResult<()> {
        match plan {
            Plan::Local {
                target,
                chief,
                devices,
            } => self.train(target, chief, devices).await,
            Plan::ParameterServer { cluster, index } => {
                let server = self.framework.server(&cluster, &JobName::Ps, index).await?;
                log::info!("parameter server {} joining", server.target());
                server.join().await
            }
            Plan::Replica {
                cluster,
                job,
                index,
                chief,
                devices,
            } => {
                let server = self.framework.server(&cluster, &job, index).await?;
                self.train(server.target(), chief, devices).await
            }
            Plan::Idle {
                cluster,
                job,
                index,
            } => {
                let server = self.framework.server(&cluster, &job, index).await?;
                log::warn!(
                    "job {} has no training role, leaving {} idle",
                    job,
                    server.target()
                );
                Ok(())
            }
        }
    }

    /// Build the dataset, model and estimator, then train.
    /// Without a dataset config, or with an empty one, this logs an error
    /// and returns normally.
    pub async fn train(
        &self,
        target: String,
        chief: bool,
        devices: ReplicaDeviceSetter,
    ) -> TrainResult<()> {
        let Some(config) = self
            .flags
            .dataset_config_pbtxt
            .as_deref()
            .filter(|path| !path.as_os_str().is_empty())
        else {
            log::error!("need to specify --dataset_config_pbtxt");
            return Ok(());
        };
        let flags = self.flags;
        let mut dataset = self
            .framework
            .dataset(config, Mode::Train, flags.use_tpu)
            .await?;
        let model = self.framework.model(&flags.model_name)?;
        log::info!(
            "running training on {} with model {} and tpu {}",
            dataset,
            model.name(),
            flags.use_tpu
        );
        let batches_per_epoch = dataset
            .num_examples()
            .checked_div(flags.batch_size as u64)
            .ok_or(ConfigError::ZeroBatchSize)?;
        log::info!("batches per epoch {}", batches_per_epoch);
        log::debug!("placing variables on {}", devices);
        let mut estimator = model.make_estimator(EstimatorConfig {
            batch_size: flags.batch_size,
            model_dir: flags.train_dir.clone(),
            params: Params { batches_per_epoch },
            use_tpu: flags.use_tpu,
            master: target,
            devices,
            chief,
            worker_replicas: flags.worker_replicas,
            max_checkpoints_to_keep: flags.max_checkpoints_to_keep,
            warm_start: flags.warm_start(),
        })?;
        let step = estimator
            .train(dataset.as_mut(), flags.number_of_steps)
            .await?;
        log::info!("training stopped at global step {}", step);
        Ok(())
    }
}
