//! Trainer Binary
//!
//! Trains a variant-calling model, locally or as one task of a cluster
//! described by `TF_CONFIG`.
//!
//! Set PRETRAINED_MODELS to a directory of `<model>/model.ckpt` weights to
//! enable `--start_from_checkpoint=model_default`.
//! Type "Q" + Enter to stop after the current step.

use clap::Parser;
use vctrain::local::LocalFramework;
use vctrain::*;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let flags = Flags::parse();
    log(flags.logging_level, &flags.train_dir)?;
    kys();
    brb();
    let tf_config = std::env::var(TF_CONFIG).ok();
    let framework = match std::env::var("PRETRAINED_MODELS") {
        Ok(dir) => LocalFramework::default().pretrained(dir),
        Err(_) => LocalFramework::default(),
    };
    let launch = Launch::new(&flags, &framework);
    match retry(flags.num_retries, || launch.parse_and_run(tf_config.as_deref())).await? {
        Outcome::Completed { attempts } => log::info!("training finished after {} attempt(s)", attempts),
        Outcome::Exhausted { attempts } => log::warn!("giving up after {} failed attempts", attempts),
    }
    Ok(())
}
