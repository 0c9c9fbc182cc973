//! Classifier feature encoding

pub mod encoder;

pub use encoder::{
    normalize_category, safe_encode, weight_bin, weight_log, CategoricalField, CategoryEncoder,
    CategoryEncoderSet, FeatureEncoder, FeatureVector, FEATURE_COUNT, FEATURE_NAMES,
};
