//! Bootstrap random forest classifier.

mod model;
mod train;

pub use model::{ForestModel, TreeNode};
pub use train::{TrainOptions, train_forest};
