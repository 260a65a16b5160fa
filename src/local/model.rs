use crate::*;
use super::*;
use std::path::Path;
use std::path::PathBuf;

/// Models the local backend knows, and whether they ship pretrained weights.
pub const LOCAL_MODELS: &[(&str, bool)] = &[
    ("inception_v3", true),
    ("mobilenet_v1", true),
    ("random_guess", false),
    ("constant_prediction", false),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalModel {
    name: String,
    pretrained: Option<PathBuf>,
}

impl LocalModel {
    /// Pretrained weights live at `<root>/<name>/model.ckpt` when a root is given.
    pub fn lookup(name: &str, root: Option<&Path>) -> Result<Self, ConfigError> {
        let (_, weights) = LOCAL_MODELS
            .iter()
            .find(|(known, _)| *known == name)
            .ok_or_else(|| ConfigError::UnknownModel(name.to_string()))?;
        Ok(Self {
            name: name.to_string(),
            pretrained: root
                .filter(|_| *weights)
                .map(|root| root.join(name).join("model.ckpt")),
        })
    }
}

impl Model for LocalModel {
    fn name(&self) -> &str {
        &self.name
    }
    fn pretrained_checkpoint(&self) -> Option<PathBuf> {
        self.pretrained.clone()
    }
    fn make_estimator(&self, config: EstimatorConfig) -> TrainResult<Box<dyn Estimator>> {
        Ok(Box::new(LocalEstimator::new(self, config)))
    }
}
