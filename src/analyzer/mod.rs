// Analyzer module: rolling statistics and threshold flagging.

pub mod market_indicators;
pub mod volume_anomaly;

// Re-export the detector entry points for ease of use.
pub use volume_anomaly::{detect, ROLLING_WINDOW};
