//! Bias structure detectors.

pub mod butterfly;
pub mod m_bias;

pub use butterfly::detect_butterfly;
pub use m_bias::detect_m_bias;
