//! Benefit calculation engine.
//!
//! Every function here is pure: the output depends only on the income and
//! the [`PolicyConfig`](crate::PolicyConfig) passed in. Nothing is cached and
//! nothing is shared, so calls can be made from any number of threads.

mod benefit;
mod clawback;
pub mod common;
mod sweep;
mod tax;

pub use benefit::evaluate;
pub use clawback::compute_clawback;
pub use sweep::{SweepError, SweepIter, SweepPoint, SweepSeries, sweep};
pub use tax::compute_tax;
