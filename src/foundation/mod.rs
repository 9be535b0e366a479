//! Shared primitives: page numbers, image sizes, errors and numeric helpers.

pub(crate) mod core;
pub(crate) mod error;
pub(crate) mod math;
