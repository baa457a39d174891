//! Analysis over loaded datasets: filtering, aggregation, sampling and
//! summary statistics

pub mod aggregate;
pub mod columnar;
pub mod filter;
pub mod sampling;
pub mod stats;

pub use aggregate::{Aggregation, group_aggregate};
pub use sampling::{quantile_indices, sample_indices, stratified_indices, stride_indices};
pub use stats::{Describe, describe};
