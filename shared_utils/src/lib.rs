//! Small helpers shared by the clinic statistics crates.

pub mod env;
pub mod logging;
