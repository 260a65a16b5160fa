//! Training loss for the genotype classifier.
use crate::*;

/// Softmax cross entropy of `logits` against one-hot labels, averaged over rows.
///
/// With `label_smoothing = s` over `K` classes each label becomes
/// `y * (1 - s) + s / K`. Every row carries weight 1. This is the only loss
/// registered, so it is also the total loss.
pub fn loss<L, Y>(
    logits: &[L],
    one_hot_labels: &[Y],
    label_smoothing: Probability,
) -> TrainResult<Logit>
where
    L: AsRef<[Logit]>,
    Y: AsRef<[Probability]>,
{
    if logits.len() != one_hot_labels.len() {
        return Err(TrainError::Other(format!(
            "{} rows of logits but {} rows of labels",
            logits.len(),
            one_hot_labels.len()
        )));
    }
    if logits.is_empty() {
        return Ok(0.);
    }
    logits
        .iter()
        .zip(one_hot_labels)
        .map(|(row, labels)| cross_entropy(row.as_ref(), labels.as_ref(), label_smoothing))
        .sum::<TrainResult<Logit>>()
        .map(|total| total / logits.len() as Logit)
}

fn cross_entropy(
    logits: &[Logit],
    labels: &[Probability],
    smoothing: Probability,
) -> TrainResult<Logit> {
    if logits.len() != labels.len() || logits.is_empty() {
        return Err(TrainError::Other(format!(
            "{} logits for {} classes",
            logits.len(),
            labels.len()
        )));
    }
    let classes = labels.len() as Probability;
    let max = logits.iter().copied().fold(Logit::NEG_INFINITY, Logit::max);
    let norm = logits.iter().map(|x| (x - max).exp()).sum::<Logit>().ln() + max;
    Ok(labels
        .iter()
        .map(|y| y * (1. - smoothing) + smoothing / classes)
        .zip(logits)
        .map(|(y, x)| -y * (x - norm))
        .sum())
}
