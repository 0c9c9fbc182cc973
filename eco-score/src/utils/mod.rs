//! Utility modules for eco-score

pub mod numeric;
pub mod text;

pub use numeric::round_to;
pub use text::{contains_phrase, is_unknown, normalize_key, title_case};
