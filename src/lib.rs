//! Distributed training launcher for a variant-calling classifier.
//!
//! Resolves this process's role in a training cluster from flags or the
//! `TF_CONFIG` environment variable, builds a replica device setter, and hands
//! a dataset and model to an estimator, retrying on transient failures.
//!
//! ## Modules
//!
//! - [`flags`]: command-line configuration
//! - [`cluster`]: `TF_CONFIG` and cluster topology
//! - [`placement`]: replica device placement
//! - [`framework`]: collaborator contracts (dataset, model, estimator, server)
//! - [`launch`]: role resolution and the training run
//! - [`retry`]: bounded retries on transient errors
//! - [`local`]: in-process reference backend
pub mod cluster;
pub mod error;
pub mod flags;
pub mod framework;
pub mod launch;
pub mod local;
pub mod loss;
pub mod placement;
pub mod retry;

pub use cluster::*;
pub use error::*;
pub use flags::*;
pub use framework::*;
pub use launch::*;
pub use loss::*;
pub use placement::*;
pub use retry::*;

// ============================================================================
// TYPE ALIASES
// ============================================================================
/// Global training step counter.
pub type Step = u64;
/// Position of a task within its job.
pub type TaskIndex = usize;
/// Unnormalized model outputs.
pub type Logit = f32;
/// Label weights and softmax outputs.
pub type Probability = f32;

// ============================================================================
// CLUSTER
// ============================================================================
/// Environment variable carrying the cluster topology as JSON.
pub const TF_CONFIG: &str = "TF_CONFIG";
/// Job holding sharded model variables.
pub const JOB_PS: &str = "ps";
/// Job running training replicas.
pub const JOB_WORKER: &str = "worker";
/// Chief training replica.
pub const JOB_MASTER: &str = "master";
/// Scheme prefix for server targets.
pub const GRPC_SCHEME: &str = "grpc://";

// ============================================================================
// FLAG DEFAULTS
// ============================================================================
pub const DEFAULT_MODEL_NAME: &str = "inception_v3";
pub const DEFAULT_BATCH_SIZE: usize = 64;
pub const DEFAULT_TRAIN_DIR: &str = "/tmp/deepvariant/";
pub const DEFAULT_WORKER_REPLICAS: usize = 1;
pub const DEFAULT_PS_TASKS: usize = 0;
pub const DEFAULT_TASK: TaskIndex = 0;
pub const DEFAULT_NUMBER_OF_STEPS: Step = 30_000_000;
pub const DEFAULT_NUM_RETRIES: usize = 0;
/// Sentinel meaning "the selected model's pretrained checkpoint".
pub const MODEL_DEFAULT_CHECKPOINT: &str = "model_default";
/// Number of most recent checkpoints retained. Zero keeps all.
pub const DEFAULT_MAX_CHECKPOINTS_TO_KEEP: usize = 10;

// ============================================================================
// LOCAL BACKEND
// ============================================================================
/// Steps between checkpoint writes.
pub const CHECKPOINT_INTERVAL_STEPS: Step = 1000;
/// Interval between progress log messages during training.
pub const TRAINING_LOG_INTERVAL: std::time::Duration = std::time::Duration::from_secs(60);
/// Checkpoint file prefix inside the model directory.
pub const CHECKPOINT_PREFIX: &str = "model.ckpt-";

// ============================================================================
// RUNTIME UTILITIES
// ============================================================================
/// Initialize dual logging (terminal + file) with timestamped log files.
/// Creates `<dir>/logs/` and writes DEBUG level to file, `level` to terminal.
pub fn log(level: log::LevelFilter, dir: &std::path::Path) -> anyhow::Result<()> {
    let logs = dir.join("logs");
    std::fs::create_dir_all(&logs)?;
    let config = simplelog::ConfigBuilder::new()
        .set_location_level(log::LevelFilter::Off)
        .set_target_level(log::LevelFilter::Off)
        .set_thread_level(log::LevelFilter::Off)
        .build();
    let time = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)?
        .as_secs();
    let file = simplelog::WriteLogger::new(
        log::LevelFilter::Debug,
        config.clone(),
        std::fs::File::create(logs.join(format!("{}.log", time)))?,
    );
    let term = simplelog::TermLogger::new(
        level,
        config.clone(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    );
    simplelog::CombinedLogger::init(vec![term, file])?;
    Ok(())
}

/// Register Ctrl+C handler for immediate (non-graceful) termination.
/// This is the only Ctrl+C handler; parameter servers leave `join()` through it.
pub fn kys() {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            println!();
            log::warn!("violent interrupt received, exiting immediately");
            std::process::exit(0);
        }
    });
}

/// Set once "Q" is read from stdin.
static STOP_REQUESTED: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(false);
/// Wall-clock limit taken from TRAIN_DURATION.
static STOP_AT: std::sync::OnceLock<std::time::Instant> = std::sync::OnceLock::new();

/// True once a stop was typed on stdin or the TRAIN_DURATION limit passed.
/// Step loops poll this between steps.
pub fn interrupted() -> bool {
    STOP_REQUESTED.load(std::sync::atomic::Ordering::Relaxed)
        || STOP_AT
            .get()
            .is_some_and(|at| std::time::Instant::now() >= *at)
}

/// Arm graceful stopping: "Q" + Enter on stdin, or TRAIN_DURATION ("30m", "2h").
/// A limit that does not parse or does not fit the clock is ignored with a warning.
pub fn brb() {
    if let Ok(limit) = std::env::var("TRAIN_DURATION") {
        match stop_at(std::time::Instant::now(), &limit) {
            Some(at) => {
                let _ = STOP_AT.set(at);
                log::info!("training stops after {}", limit.trim());
            }
            None => log::warn!("ignoring TRAIN_DURATION {:?}", limit),
        }
    }
    std::thread::spawn(watch_stdin);
}

fn watch_stdin() {
    for line in std::io::stdin().lines() {
        match line {
            Ok(line) if line.trim().eq_ignore_ascii_case("q") => {
                log::warn!("stop requested, finishing the current step");
                STOP_REQUESTED.store(true, std::sync::atomic::Ordering::Relaxed);
                return;
            }
            Ok(_) => continue,
            Err(_) => return,
        }
    }
}

/// `limit` after `now`, or `None` if it is malformed or past the clock's range.
fn stop_at(now: std::time::Instant, limit: &str) -> Option<std::time::Instant> {
    now.checked_add(parse_duration(limit)?)
}

/// `<count><unit>` with unit one of `s`, `m`, `h`, `d`.
fn parse_duration(s: &str) -> Option<std::time::Duration> {
    let s = s.trim();
    let unit = s.chars().last()?;
    let seconds = match unit {
        's' => 1,
        'm' => 60,
        'h' => 60 * 60,
        'd' => 24 * 60 * 60,
        _ => return None,
    };
    s[..s.len() - unit.len_utf8()]
        .parse::<u64>()
        .ok()?
        .checked_mul(seconds)
        .map(std::time::Duration::from_secs)
}
