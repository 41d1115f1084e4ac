//! Active-learning benchmark harness: runs every configured emulator against
//! every acquisition strategy on a simulated league and reports prediction
//! quality.

pub mod analytics;
pub mod config;
pub mod logging;
pub mod runner;
