use crate::*;
use std::path::Path;
use std::path::PathBuf;

/// The `model.ckpt-<step>` files of one model directory.
#[derive(Debug, Clone)]
pub struct Checkpoints {
    dir: PathBuf,
}

impl Checkpoints {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path(&self, step: Step) -> PathBuf {
        self.dir.join(format!("{}{}", CHECKPOINT_PREFIX, step))
    }

    /// Saved steps in ascending order. A missing directory has none.
    pub fn steps(&self) -> std::io::Result<Vec<Step>> {
        let entries = match std::fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e),
        };
        let mut steps = entries
            .filter_map(Result::ok)
            .filter_map(|entry| step_of(&entry.path()))
            .collect::<Vec<_>>();
        steps.sort_unstable();
        Ok(steps)
    }

    pub fn latest(&self) -> std::io::Result<Option<Step>> {
        Ok(self.steps()?.last().copied())
    }

    pub fn save(&self, step: Step) -> std::io::Result<PathBuf> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.path(step);
        std::fs::write(&path, format!("global_step: {}\n", step))?;
        log::debug!("saved checkpoint {}", path.display());
        Ok(path)
    }

    /// Delete all but the newest `keep` checkpoints. Zero keeps everything.
    pub fn prune(&self, keep: usize) -> std::io::Result<Vec<Step>> {
        if keep == 0 {
            return Ok(Vec::new());
        }
        let steps = self.steps()?;
        let stale = steps[..steps.len().saturating_sub(keep)].to_vec();
        for step in stale.iter() {
            std::fs::remove_file(self.path(*step))?;
            log::debug!("removed checkpoint {}", step);
        }
        Ok(stale)
    }
}

fn step_of(path: &Path) -> Option<Step> {
    path.file_name()?
        .to_str()?
        .strip_prefix(CHECKPOINT_PREFIX)?
        .parse()
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_dir_has_no_checkpoints() {
        let dir = tempfile::tempdir().unwrap();
        let checkpoints = Checkpoints::new(dir.path().join("absent"));
        assert_eq!(checkpoints.latest().unwrap(), None);
    }
    #[test]
    fn steps_sort_numerically_and_skip_strangers() {
        let dir = tempfile::tempdir().unwrap();
        let checkpoints = Checkpoints::new(dir.path());
        for step in [1000, 20, 300] {
            checkpoints.save(step).unwrap();
        }
        std::fs::write(dir.path().join("model.ckpt-latest"), "").unwrap();
        std::fs::write(dir.path().join("events.out"), "").unwrap();
        assert_eq!(checkpoints.steps().unwrap(), vec![20, 300, 1000]);
        assert_eq!(checkpoints.latest().unwrap(), Some(1000));
    }
    #[test]
    fn prune_keeps_newest() {
        let dir = tempfile::tempdir().unwrap();
        let checkpoints = Checkpoints::new(dir.path());
        for step in 1..=5 {
            checkpoints.save(step).unwrap();
        }
        assert_eq!(checkpoints.prune(2).unwrap(), vec![1, 2, 3]);
        assert_eq!(checkpoints.steps().unwrap(), vec![4, 5]);
        assert!(!checkpoints.path(1).exists());
    }
    #[test]
    fn prune_zero_keeps_all() {
        let dir = tempfile::tempdir().unwrap();
        let checkpoints = Checkpoints::new(dir.path());
        for step in 1..=3 {
            checkpoints.save(step).unwrap();
        }
        assert!(checkpoints.prune(0).unwrap().is_empty());
        assert_eq!(checkpoints.steps().unwrap().len(), 3);
    }
}
