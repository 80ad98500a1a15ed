//! Feature preprocessing: one-hot encoding, label mapping, scaling, splitting.

pub mod encoding;
pub mod scaling;
pub mod split;

pub use encoding::{FeatureEncoder, LabelMapping};
pub use scaling::Scaler;
pub use split::{SplitOptions, stratified_split};
