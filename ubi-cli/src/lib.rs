//! Command-line front end for the UBI benefit calculator: input parsing,
//! report rendering and chart descriptions around `ubi-core`.

pub mod app;
pub mod chart;
pub mod input;
pub mod logging;
pub mod report;
