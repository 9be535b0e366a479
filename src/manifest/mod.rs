//! Boundary manifest model and everything derived from it.
//!
//! The raw JSON is decoded once into [`model::ManifestDef`] and normalized into dense
//! [`normalize::NormalizedPage`]s; downstream code never re-reads raw manifest optionality.

/// Asset path and URL resolution.
pub mod assets;
/// Last-request-wins manifest loading.
pub mod loader;
/// Serde boundary types (`dx`/`dy` points, `page_groups`).
pub mod model;
/// Dense page sequence, placeholders and playlists.
pub mod normalize;
