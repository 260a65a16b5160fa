//! Command-line flags for the trainer.
use crate::*;
use clap::Parser;
use std::path::PathBuf;

/// Trains the variant-calling model.
///
/// Cluster placement comes either from `--master`, `--task` and `--ps_tasks`
/// or from the `TF_CONFIG` environment variable, never both.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Flags {
    /// The path to the dataset config file. Empty counts as unset.
    #[arg(long = "dataset_config_pbtxt", value_parser = path)]
    pub dataset_config_pbtxt: Option<PathBuf>,

    /// The name of the model to use for predictions.
    #[arg(long = "model_name", default_value = DEFAULT_MODEL_NAME)]
    pub model_name: String,

    /// The number of samples in each batch.
    #[arg(long = "batch_size", default_value_t = DEFAULT_BATCH_SIZE)]
    pub batch_size: usize,

    /// The master to use. Empty lets the framework pick a local default.
    #[arg(long, default_value = "")]
    pub master: String,

    /// Directory where to write checkpoints and event logs.
    #[arg(long = "train_dir", default_value = DEFAULT_TRAIN_DIR)]
    pub train_dir: PathBuf,

    /// Use TPU if available.
    #[arg(long = "use_tpu")]
    pub use_tpu: bool,

    /// Number of worker replicas.
    #[arg(long = "worker_replicas", default_value_t = DEFAULT_WORKER_REPLICAS)]
    pub worker_replicas: usize,

    /// The number of parameter servers. At 0, parameters are handled locally by the worker.
    #[arg(long = "ps_tasks", default_value_t = DEFAULT_PS_TASKS)]
    pub ps_tasks: usize,

    /// Task id of the replica running the training.
    #[arg(long, default_value_t = DEFAULT_TASK)]
    pub task: TaskIndex,

    /// Maximum number of global steps to take when training.
    #[arg(long = "number_of_steps", default_value_t = DEFAULT_NUMBER_OF_STEPS)]
    pub number_of_steps: Step,

    /// The number of times to retry on internal or unavailable errors.
    #[arg(long = "num_retries", default_value_t = DEFAULT_NUM_RETRIES)]
    pub num_retries: usize,

    /// Checkpoint to initialize weights from. Empty starts from random
    /// weights; "model_default" uses the model's pretrained checkpoint.
    #[arg(long = "start_from_checkpoint", default_value = MODEL_DEFAULT_CHECKPOINT)]
    pub start_from_checkpoint: String,

    /// Number of last checkpoints to keep during training. 0 preserves all.
    #[arg(long = "max_checkpoints_to_keep", default_value_t = DEFAULT_MAX_CHECKPOINTS_TO_KEEP)]
    pub max_checkpoints_to_keep: usize,

    /// Terminal log level (error, warn, info, debug, trace, off).
    #[arg(long = "logging_level", default_value = "info", value_parser = level)]
    pub logging_level: log::LevelFilter,
}

/// Where initial weights come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WarmStart {
    Random,
    ModelDefault,
    Path(PathBuf),
}

impl Flags {
    /// Placement flags holding a non-default value, in check order.
    /// These may not be combined with `TF_CONFIG`.
    pub fn conflicts(&self) -> Vec<&'static str> {
        [
            ("master", !self.master.is_empty()),
            ("task", self.task != 0),
            ("ps_tasks", self.ps_tasks != 0),
        ]
        .into_iter()
        .filter(|(_, set)| *set)
        .map(|(name, _)| name)
        .collect()
    }

    pub fn warm_start(&self) -> WarmStart {
        match self.start_from_checkpoint.as_str() {
            "" => WarmStart::Random,
            MODEL_DEFAULT_CHECKPOINT => WarmStart::ModelDefault,
            path => WarmStart::Path(PathBuf::from(path)),
        }
    }
}

impl Default for Flags {
    fn default() -> Self {
        Self::parse_from(["trainer"])
    }
}

/// Unlike clap's own path parser this accepts an empty value.
fn path(s: &str) -> Result<PathBuf, String> {
    Ok(PathBuf::from(s))
}

fn level(s: &str) -> Result<log::LevelFilter, String> {
    s.parse::<log::LevelFilter>()
        .map_err(|_| format!("unknown logging level: {}", s))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flags(args: &[&str]) -> Flags {
        Flags::try_parse_from(std::iter::once("trainer").chain(args.iter().copied()))
            .expect("valid flags")
    }

    #[test]
    fn defaults_match_documented_values() {
        let flags = Flags::default();
        assert_eq!(flags.dataset_config_pbtxt, None);
        assert_eq!(flags.model_name, "inception_v3");
        assert_eq!(flags.batch_size, 64);
        assert_eq!(flags.master, "");
        assert_eq!(flags.train_dir, PathBuf::from("/tmp/deepvariant/"));
        assert!(!flags.use_tpu);
        assert_eq!(flags.worker_replicas, 1);
        assert_eq!(flags.ps_tasks, 0);
        assert_eq!(flags.task, 0);
        assert_eq!(flags.number_of_steps, 30_000_000);
        assert_eq!(flags.num_retries, 0);
        assert_eq!(flags.max_checkpoints_to_keep, 10);
        assert_eq!(flags.logging_level, log::LevelFilter::Info);
        assert!(flags.conflicts().is_empty());
    }
    #[test]
    fn snake_case_long_names() {
        let flags = flags(&[
            "--dataset_config_pbtxt",
            "/data/train.pbtxt",
            "--batch_size",
            "32",
            "--ps_tasks",
            "2",
            "--use_tpu",
            "--logging_level",
            "debug",
        ]);
        assert_eq!(
            flags.dataset_config_pbtxt,
            Some(PathBuf::from("/data/train.pbtxt"))
        );
        assert_eq!(flags.batch_size, 32);
        assert_eq!(flags.ps_tasks, 2);
        assert!(flags.use_tpu);
        assert_eq!(flags.logging_level, log::LevelFilter::Debug);
    }
    #[test]
    fn empty_dataset_config_parses() {
        let spaced = flags(&["--dataset_config_pbtxt", ""]);
        let joined = flags(&["--dataset_config_pbtxt="]);
        assert_eq!(spaced.dataset_config_pbtxt, Some(PathBuf::new()));
        assert_eq!(joined.dataset_config_pbtxt, Some(PathBuf::new()));
    }
    #[test]
    fn bad_logging_level_is_rejected() {
        assert!(Flags::try_parse_from(["trainer", "--logging_level", "loud"]).is_err());
    }
    #[test]
    fn conflicts_listed_in_check_order() {
        let all = flags(&["--ps_tasks", "1", "--master", "grpc://m:1", "--task", "3"]);
        assert_eq!(all.conflicts(), vec!["master", "task", "ps_tasks"]);
        let only = flags(&["--task", "1"]);
        assert_eq!(only.conflicts(), vec!["task"]);
    }
    #[test]
    fn warm_start_sentinels() {
        assert_eq!(Flags::default().warm_start(), WarmStart::ModelDefault);
        assert_eq!(
            flags(&["--start_from_checkpoint", ""]).warm_start(),
            WarmStart::Random
        );
        assert_eq!(
            flags(&["--start_from_checkpoint", "/ckpt/model.ckpt-10"]).warm_start(),
            WarmStart::Path(PathBuf::from("/ckpt/model.ckpt-10"))
        );
    }
}
