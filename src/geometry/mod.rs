//! Hotspot polygon geometry.

/// Centroid, outline strings, shrinking and hit testing.
pub mod polygon;
