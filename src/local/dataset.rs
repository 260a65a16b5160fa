//! Dataset configs and the batch source built from them.
use crate::*;
use std::fmt::Display;
use std::fmt::Formatter;
use std::path::Path;

/// A dataset config in protobuf text format.
///
/// ```text
/// # training examples for HG001
/// name: "HG001"
/// tfrecord_path: "/data/HG001/train.tfrecord-?????-of-00016.gz"
/// num_examples: 3000000
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DatasetConfig {
    pub name: String,
    pub tfrecord_path: String,
    pub num_examples: u64,
}

impl DatasetConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::DatasetConfig {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::parse(&text).map_err(|reason| ConfigError::DatasetConfig {
            path: path.display().to_string(),
            reason,
        })
    }

    pub fn parse(text: &str) -> Result<Self, String> {
        let mut config = Self::default();
        let mut examples = None;
        for (n, line) in text.lines().enumerate() {
            let line = strip_comment(line).trim();
            if line.is_empty() {
                continue;
            }
            let at = |e: String| format!("line {}: {}", n + 1, e);
            let (key, value) = line
                .split_once(':')
                .ok_or_else(|| at("expected `field: value`".to_string()))?;
            let value = value.trim();
            match key.trim() {
                "name" => config.name = unquote(value).map_err(at)?,
                "tfrecord_path" => config.tfrecord_path = unquote(value).map_err(at)?,
                "num_examples" => {
                    let parsed = value.parse::<u64>();
                    examples = Some(parsed.map_err(|_| at(format!("bad num_examples {}", value)))?);
                }
                other => log::debug!("ignoring dataset config field {}", other),
            }
        }
        config.num_examples = examples.ok_or("missing num_examples")?;
        Ok(config)
    }
}

/// Drop a trailing `#` comment that is not inside a quoted string.
fn strip_comment(line: &str) -> &str {
    let mut quoted = false;
    let mut escaped = false;
    for (i, c) in line.char_indices() {
        match c {
            _ if escaped => escaped = false,
            '\\' if quoted => escaped = true,
            '"' => quoted = !quoted,
            '#' if !quoted => return &line[..i],
            _ => {}
        }
    }
    line
}

fn unquote(value: &str) -> Result<String, String> {
    let inner = value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .ok_or_else(|| format!("expected a quoted string, got {}", value))?;
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some('n') => out.push('\n'),
                Some('t') => out.push('\t'),
                Some(c @ ('\\' | '"' | '\'')) => out.push(c),
                Some(c) => return Err(format!("unsupported escape \\{}", c)),
                None => return Err("dangling escape".to_string()),
            },
            c => out.push(c),
        }
    }
    Ok(out)
}

/// Cycles through the batches of one epoch forever.
#[derive(Debug)]
pub struct LocalDataset {
    config: DatasetConfig,
    mode: Mode,
    cursor: u64,
}

impl LocalDataset {
    pub fn new(config: DatasetConfig, mode: Mode) -> Self {
        Self {
            config,
            mode,
            cursor: 0,
        }
    }
}

impl Display for LocalDataset {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ({:?}, {} examples from {})",
            self.config.name, self.mode, self.config.num_examples, self.config.tfrecord_path
        )
    }
}

#[async_trait::async_trait]
impl InputFn for LocalDataset {
    fn num_examples(&self) -> u64 {
        self.config.num_examples
    }
    async fn next_batch(&mut self, batch_size: usize) -> TrainResult<Option<Batch>> {
        if self.config.num_examples == 0 || batch_size == 0 {
            return Ok(None);
        }
        let size = (batch_size as u64).min(self.config.num_examples);
        let per_epoch = (self.config.num_examples / size).max(1);
        let index = self.cursor % per_epoch;
        self.cursor += 1;
        Ok(Some(Batch {
            index,
            size: size as usize,
        }))
    }
}
