use std::collections::BTreeSet;

use serde::Serialize;

use crate::error::{Error, Result};

/// Counts of true class (rows) against predicted class (columns).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfusionMatrix {
    /// Class indices present in either the truth or the prediction, ascending.
    pub labels: Vec<usize>,
    /// `counts[i][j]`: samples of class `labels[i]` predicted as `labels[j]`.
    pub counts: Vec<Vec<u64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_names: Option<Vec<String>>,
}

/// Index of the first maximum in `row`.
pub fn argmax(row: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &v) in row.iter().enumerate() {
        match best {
            Some((_, b)) if v <= b || v.is_nan() => {}
            _ if v.is_nan() => {}
            _ => best = Some((i, v)),
        }
    }
    best.map(|(i, _)| i)
}

/// Build the confusion matrix of a multi-class problem from a one-hot
/// truth matrix `y` and a score matrix `y_hat`, both `[n_samples][n_classes]`.
/// Each row is reduced to the index of its maximum.
pub fn confusion_matrix(y: &[Vec<f64>], y_hat: &[Vec<f64>]) -> Result<ConfusionMatrix> {
    if y.len() != y_hat.len() {
        return Err(Error::Shape(format!(
            "{} true rows but {} predicted rows",
            y.len(),
            y_hat.len()
        )));
    }
    let reduce = |rows: &[Vec<f64>], what: &str| -> Result<Vec<usize>> {
        rows.iter()
            .enumerate()
            .map(|(i, row)| {
                argmax(row).ok_or_else(|| Error::Shape(format!("{what} row {i} has no finite value")))
            })
            .collect()
    };
    let truth = reduce(y, "true")?;
    let predicted = reduce(y_hat, "predicted")?;

    let labels: Vec<usize> = truth
        .iter()
        .chain(&predicted)
        .copied()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let position = |label: usize| labels.binary_search(&label).unwrap_or_default();

    let mut counts = vec![vec![0u64; labels.len()]; labels.len()];
    for (t, p) in truth.iter().zip(&predicted) {
        counts[position(*t)][position(*p)] += 1;
    }

    Ok(ConfusionMatrix {
        labels,
        counts,
        class_names: None,
    })
}

impl ConfusionMatrix {
    /// Attach display names, one per label.
    pub fn with_class_names(mut self, names: Vec<String>) -> Result<Self> {
        if names.len() != self.labels.len() {
            return Err(Error::Shape(format!(
                "{} class names for {} classes",
                names.len(),
                self.labels.len()
            )));
        }
        self.class_names = Some(names);
        Ok(self)
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().flatten().sum()
    }

    /// Fraction of samples on the diagonal.
    pub fn accuracy(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        let diagonal: u64 = (0..self.labels.len()).map(|i| self.counts[i][i]).sum();
        diagonal as f64 / total as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn argmax_takes_first_maximum() {
        assert_eq!(argmax(&[0.2, 0.7, 0.7]), Some(1));
        assert_eq!(argmax(&[f64::NAN, 0.1]), Some(1));
        assert_eq!(argmax(&[]), None);
    }

    #[test]
    fn counts_true_against_predicted() {
        let y = vec![
            vec![1.0, 0.0, 0.0],
            vec![0.0, 1.0, 0.0],
            vec![0.0, 1.0, 0.0],
            vec![0.0, 0.0, 1.0],
        ];
        let y_hat = vec![
            vec![0.8, 0.1, 0.1],
            vec![0.3, 0.6, 0.1],
            vec![0.1, 0.2, 0.7],
            vec![0.2, 0.2, 0.6],
        ];
        let cm = confusion_matrix(&y, &y_hat).unwrap();
        assert_eq!(cm.labels, vec![0, 1, 2]);
        assert_eq!(cm.counts, vec![vec![1, 0, 0], vec![0, 1, 1], vec![0, 0, 1]]);
        assert_eq!(cm.total(), 4);
        assert_eq!(cm.accuracy(), 0.75);
    }

    #[test]
    fn labels_are_the_observed_classes() {
        let y = vec![vec![0.0, 0.0, 1.0], vec![0.0, 0.0, 1.0]];
        let y_hat = vec![vec![0.9, 0.0, 0.1], vec![0.0, 0.0, 1.0]];
        let cm = confusion_matrix(&y, &y_hat).unwrap();
        assert_eq!(cm.labels, vec![0, 2]);
        assert_eq!(cm.counts, vec![vec![0, 0], vec![1, 1]]);
        assert!(cm.clone().with_class_names(vec!["a".into()]).is_err());
        assert!(cm.with_class_names(vec!["a".into(), "c".into()]).is_ok());
    }

    #[test]
    fn row_count_mismatch() {
        assert!(matches!(
            confusion_matrix(&[vec![1.0]], &[]),
            Err(Error::Shape(_))
        ));
    }
}
