//! Foundation utilities shared by every subsystem
//!
//! Vector aliases and interpolation helpers, the loop's time sources, and
//! logger setup for binaries and tests.

pub mod logging;
pub mod math;
pub mod time;
