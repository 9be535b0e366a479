//! Derived view geometry.

/// Zoom viewports and spotlight masks.
pub mod zoom;
