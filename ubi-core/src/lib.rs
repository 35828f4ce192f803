pub mod calculations;
pub mod models;
pub mod policy;

pub use calculations::{
    SweepError, SweepIter, SweepPoint, SweepSeries, compute_clawback, compute_tax, evaluate, sweep,
};
pub use models::*;
pub use policy::{ConfigError, PolicyConfig, Preset, UnknownPresetError};
