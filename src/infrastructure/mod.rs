//! Infrastructure layer
//!
//! Process-level concerns that sit outside the preparation pipeline.

mod logging;

pub use logging::init_logging;
