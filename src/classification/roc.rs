use serde::Serialize;

use crate::error::{Error, Result};

/// Receiver operating characteristic of one binary problem.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RocCurve {
    pub fpr: Vec<f64>,
    pub tpr: Vec<f64>,
    /// Decreasing; the first entry is `+inf` for the (0, 0) point.
    pub thresholds: Vec<f64>,
}

/// ROC curve and area for one class of a multi-class problem.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassRoc {
    pub class: String,
    pub curve: RocCurve,
    pub auc: f64,
    pub legend: String,
}

/// Compute the ROC curve of `scores` against binary truth `y_true`.
///
/// One point per distinct score, taken in decreasing order; samples
/// sharing a score move the curve in a single step.
pub fn roc_curve(y_true: &[bool], scores: &[f64]) -> Result<RocCurve> {
    if y_true.len() != scores.len() {
        return Err(Error::Shape(format!(
            "{} labels but {} scores",
            y_true.len(),
            scores.len()
        )));
    }
    if let Some(i) = scores.iter().position(|s| !s.is_finite()) {
        return Err(Error::Shape(format!("score {i} is not finite")));
    }
    let positives = y_true.iter().filter(|&&t| t).count();
    let negatives = y_true.len() - positives;
    if positives == 0 || negatives == 0 {
        return Err(Error::DegenerateRoc(format!(
            "{positives} positive and {negatives} negative samples"
        )));
    }

    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));

    let mut curve = RocCurve {
        fpr: vec![0.0],
        tpr: vec![0.0],
        thresholds: vec![f64::INFINITY],
    };
    let (mut tp, mut fp) = (0usize, 0usize);
    for (k, &i) in order.iter().enumerate() {
        if y_true[i] {
            tp += 1;
        } else {
            fp += 1;
        }
        let last_of_run = order
            .get(k + 1)
            .map_or(true, |&next| scores[next] != scores[i]);
        if last_of_run {
            curve.fpr.push(fp as f64 / negatives as f64);
            curve.tpr.push(tp as f64 / positives as f64);
            curve.thresholds.push(scores[i]);
        }
    }
    Ok(curve)
}

/// Area under a curve by the trapezoidal rule. `x` must be monotonic;
/// decreasing `x` gives the same positive area as its reverse.
pub fn auc(x: &[f64], y: &[f64]) -> Result<f64> {
    if x.len() != y.len() {
        return Err(Error::Shape(format!("{} x values but {} y values", x.len(), y.len())));
    }
    if x.len() < 2 {
        return Err(Error::Shape("at least 2 points are needed to compute an area".into()));
    }
    let increasing = x.windows(2).all(|w| w[1] >= w[0]);
    let decreasing = x.windows(2).all(|w| w[1] <= w[0]);
    let direction = match (increasing, decreasing) {
        (true, _) => 1.0,
        (false, true) => -1.0,
        (false, false) => {
            return Err(Error::Shape("x is neither increasing nor decreasing".into()))
        }
    };
    let area: f64 = x
        .windows(2)
        .zip(y.windows(2))
        .map(|(xw, yw)| (xw[1] - xw[0]) * (yw[0] + yw[1]) / 2.0)
        .sum();
    Ok(direction * area)
}

/// ROC and AUC for every class.
///
/// `y_classes` is the one-hot truth `[n_samples][n_classes]` (a value above
/// zero marks the positive class). `y_hat` holds either one score per
/// class or a single score column shared by every class.
pub fn roc_per_class(
    class_names: &[String],
    y_classes: &[Vec<f64>],
    y_hat: &[Vec<f64>],
) -> Result<Vec<ClassRoc>> {
    if y_classes.len() != y_hat.len() {
        return Err(Error::Shape(format!(
            "{} true rows but {} score rows",
            y_classes.len(),
            y_hat.len()
        )));
    }
    let n_classes = class_names.len();
    if let Some(i) = y_classes.iter().position(|r| r.len() != n_classes) {
        return Err(Error::Shape(format!(
            "true row {i} has {} columns, expected {n_classes}",
            y_classes[i].len()
        )));
    }
    let single = y_hat.first().is_some_and(|r| r.len() == 1);
    let score_width = if single { 1 } else { n_classes };
    if let Some(i) = y_hat.iter().position(|r| r.len() != score_width) {
        return Err(Error::Shape(format!(
            "score row {i} has {} columns, expected {score_width}",
            y_hat[i].len()
        )));
    }

    class_names
        .iter()
        .enumerate()
        .map(|(c, class)| {
            let truth: Vec<bool> = y_classes.iter().map(|r| r[c] > 0.0).collect();
            let column = if single { 0 } else { c };
            let scores: Vec<f64> = y_hat.iter().map(|r| r[column]).collect();
            let curve = roc_curve(&truth, &scores)?;
            let area = auc(&curve.fpr, &curve.tpr)?;
            Ok(ClassRoc {
                class: class.clone(),
                legend: format!("ROC curve of class {class} (area = {area:.2})"),
                curve,
                auc: area,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn perfect_separation_has_unit_area() {
        let curve = roc_curve(&[false, false, true, true], &[0.1, 0.4, 0.35, 0.8]).unwrap();
        assert_eq!(curve.thresholds[0], f64::INFINITY);
        assert_eq!(curve.fpr, vec![0.0, 0.0, 0.5, 0.5, 1.0]);
        assert_eq!(curve.tpr, vec![0.0, 0.5, 0.5, 1.0, 1.0]);
        assert_eq!(auc(&curve.fpr, &curve.tpr).unwrap(), 0.75);

        let perfect = roc_curve(&[false, true], &[0.2, 0.9]).unwrap();
        assert_eq!(auc(&perfect.fpr, &perfect.tpr).unwrap(), 1.0);
    }

    #[test]
    fn tied_scores_move_together() {
        let curve = roc_curve(&[true, false], &[0.5, 0.5]).unwrap();
        assert_eq!(curve.fpr, vec![0.0, 1.0]);
        assert_eq!(curve.tpr, vec![0.0, 1.0]);
        assert_eq!(auc(&curve.fpr, &curve.tpr).unwrap(), 0.5);
    }

    #[test]
    fn single_class_truth_is_degenerate() {
        assert!(matches!(
            roc_curve(&[true, true], &[0.1, 0.2]),
            Err(Error::DegenerateRoc(_))
        ));
    }

    #[test]
    fn auc_direction() {
        assert_eq!(auc(&[0.0, 1.0], &[1.0, 1.0]).unwrap(), 1.0);
        assert_eq!(auc(&[1.0, 0.0], &[1.0, 1.0]).unwrap(), 1.0);
        assert!(auc(&[0.0, 1.0, 0.5], &[1.0, 1.0, 1.0]).is_err());
        assert!(auc(&[0.0], &[1.0]).is_err());
    }

    #[test]
    fn per_class_with_shared_score_column() {
        let names = vec!["healthy".to_string(), "disease".to_string()];
        let y = vec![
            vec![1.0, 0.0],
            vec![1.0, 0.0],
            vec![0.0, 1.0],
            vec![0.0, 1.0],
        ];
        let scores = vec![vec![0.1], vec![0.2], vec![0.8], vec![0.9]];
        let rocs = roc_per_class(&names, &y, &scores).unwrap();
        assert_eq!(rocs.len(), 2);
        assert_eq!(rocs[0].auc, 0.0);
        assert_eq!(rocs[1].auc, 1.0);
        assert_eq!(rocs[1].legend, "ROC curve of class disease (area = 1.00)");
    }

    #[test]
    fn per_class_rejects_ragged_scores() {
        let names = vec!["a".to_string(), "b".to_string()];
        let y = vec![vec![1.0, 0.0], vec![0.0, 1.0]];
        let scores = vec![vec![0.1, 0.9], vec![0.2]];
        assert!(matches!(roc_per_class(&names, &y, &scores), Err(Error::Shape(_))));
    }
}
