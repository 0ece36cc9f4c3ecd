//! Evaluation helpers for multi-class models: confusion matrix and
//! per-class ROC/AUC. The numbers are emitted for an external plotting tool.

pub mod confusion;
pub mod roc;

pub use confusion::{confusion_matrix, ConfusionMatrix};
pub use roc::{auc, roc_curve, roc_per_class, ClassRoc, RocCurve};
