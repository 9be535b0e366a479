use std::path::Path;

use anyhow::Context as _;

use crate::{
    foundation::error::{PagespotError, PagespotResult},
    manifest::assets::AssetResolverConfig,
    navigation::guard::DEFAULT_COOLDOWN_MS,
    reader::state::{DEFAULT_MAX_ZOOM_SCALE, FeatureFlags, MIN_ZOOM_SCALE},
};

/// Delay before the active hotspot is cleared after a zoom-out.
pub const DEFAULT_CLEAR_ACTIVE_AFTER_MS: u64 = 600;

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// Runtime knobs for a reader session.
pub struct ReaderConfig {
    /// Initial feature flags.
    #[serde(default)]
    pub feature_flags: FeatureFlags,
    /// Upper bound for zoom scales.
    #[serde(default = "default_max_zoom_scale")]
    pub max_zoom_scale: f64,
    /// Minimum spacing between page moves.
    #[serde(default = "default_navigation_cooldown_ms")]
    pub navigation_cooldown_ms: u64,
    /// Delay before a zoomed-out hotspot stops being active.
    #[serde(default = "default_clear_active_after_ms")]
    pub clear_active_after_ms: u64,
    /// Asset URL resolution.
    #[serde(default)]
    pub assets: AssetResolverConfig,
}

fn default_max_zoom_scale() -> f64 {
    DEFAULT_MAX_ZOOM_SCALE
}

fn default_navigation_cooldown_ms() -> u64 {
    DEFAULT_COOLDOWN_MS
}

fn default_clear_active_after_ms() -> u64 {
    DEFAULT_CLEAR_ACTIVE_AFTER_MS
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            feature_flags: FeatureFlags::default(),
            max_zoom_scale: default_max_zoom_scale(),
            navigation_cooldown_ms: default_navigation_cooldown_ms(),
            clear_active_after_ms: default_clear_active_after_ms(),
            assets: AssetResolverConfig::default(),
        }
    }
}

impl ReaderConfig {
    /// Parse and validate a JSON config.
    pub fn from_json(json: &str) -> PagespotResult<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| PagespotError::serde(format!("invalid reader config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file.
    pub fn from_path(path: impl AsRef<Path>) -> PagespotResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("read reader config '{}'", path.display()))?;
        Self::from_json(&json)
    }

    /// Reject non-finite or sub-1 zoom scales and a blank CDN origin.
    pub fn validate(&self) -> PagespotResult<()> {
        if !self.max_zoom_scale.is_finite() || self.max_zoom_scale < MIN_ZOOM_SCALE {
            return Err(PagespotError::validation(format!(
                "maxZoomScale must be finite and >= {MIN_ZOOM_SCALE}, got {}",
                self.max_zoom_scale
            )));
        }
        let zoom = self.feature_flags.default_zoom_scale;
        if !zoom.is_finite() || zoom < MIN_ZOOM_SCALE {
            return Err(PagespotError::validation(format!(
                "defaultZoomScale must be finite and >= {MIN_ZOOM_SCALE}, got {zoom}"
            )));
        }
        if let Some(url) = &self.assets.cdn_base_url
            && url.trim().is_empty()
        {
            return Err(PagespotError::validation("cdnBaseUrl must not be blank"));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/reader/config.rs"]
mod tests;
