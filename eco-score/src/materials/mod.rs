//! Material composition: parsing, prioritization and recyclability

pub mod aggregator;
pub mod recyclability;

pub use aggregator::{primary_material, MaterialAggregator};
pub use recyclability::weighted_recyclability;
