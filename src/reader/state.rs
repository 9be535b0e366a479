use std::collections::BTreeMap;

use crate::{foundation::core::Point, manifest::normalize::PlaylistItem};

/// Smallest zoom scale (unzoomed).
pub const MIN_ZOOM_SCALE: f64 = 1.0;
/// Default upper bound for zoom scales.
pub const DEFAULT_MAX_ZOOM_SCALE: f64 = 4.0;

/// Reading mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReaderMode {
    /// Reader-driven reading.
    #[default]
    Standard,
    /// Remote-controlled reading; autoplay is forced off.
    Quiet,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
/// Media playback lifecycle.
pub enum PlaybackPhase {
    /// Nothing loading or playing.
    #[default]
    Idle,
    /// Media is loading.
    Loading,
    /// Media is playing.
    Playing,
    /// Playback paused.
    Paused,
    /// Playback failed; see [`PlaybackState::error`].
    Error,
}

/// Playback part of the reader state.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackState {
    /// Lifecycle phase.
    pub phase: PlaybackPhase,
    /// Hotspot whose playlist is active.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_hotspot_id: Option<String>,
    /// Playlist item being played.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_item_id: Option<String>,
    /// Reading mode.
    pub mode: ReaderMode,
    /// Queued playlist.
    #[serde(default)]
    pub queue: Vec<PlaylistItem>,
    /// Last playback or manifest error.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// Zoom animation state. `is_animating` spans a target request until its completion signal.
pub struct ZoomState {
    /// Current scale.
    pub scale: f64,
    /// Scale being animated towards.
    pub target_scale: f64,
    /// Whether an animation is running.
    pub is_animating: bool,
    /// Zoom centre in image pixels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub focal_point: Option<Point>,
}

impl Default for ZoomState {
    fn default() -> Self {
        Self {
            scale: MIN_ZOOM_SCALE,
            target_scale: MIN_ZOOM_SCALE,
            is_animating: false,
            focal_point: None,
        }
    }
}

/// Hotspot ids the reader has visited; every stored value is `true`.
pub type ReadState = BTreeMap<String, bool>;

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// Runtime-tunable behaviour switches.
pub struct FeatureFlags {
    /// Zoom onto selected hotspots.
    #[serde(default = "default_true")]
    pub enable_auto_zoom: bool,
    /// Zoom factor used for hotspot selection.
    #[serde(default = "default_zoom_scale")]
    pub default_zoom_scale: f64,
    /// Delay before autoplay starts.
    #[serde(default = "default_autoplay_delay_ms")]
    pub autoplay_delay_ms: u64,
    /// Initial subtitle setting.
    #[serde(default = "default_true")]
    pub subtitle_default_on: bool,
    /// Audio retries before reporting an error.
    #[serde(default = "default_max_audio_retry_count")]
    pub max_audio_retry_count: u32,
    /// Whether analytics events may be emitted.
    #[serde(default = "default_true")]
    pub analytics_enabled: bool,
}

fn default_true() -> bool {
    true
}

fn default_zoom_scale() -> f64 {
    2.5
}

fn default_autoplay_delay_ms() -> u64 {
    2_000
}

fn default_max_audio_retry_count() -> u32 {
    3
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            enable_auto_zoom: true,
            default_zoom_scale: default_zoom_scale(),
            autoplay_delay_ms: default_autoplay_delay_ms(),
            subtitle_default_on: true,
            max_audio_retry_count: default_max_audio_retry_count(),
            analytics_enabled: true,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// Partial update for [`FeatureFlags`]; `None` fields are left alone.
pub struct FeatureFlagsPatch {
    /// See [`FeatureFlags::enable_auto_zoom`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_auto_zoom: Option<bool>,
    /// See [`FeatureFlags::default_zoom_scale`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_zoom_scale: Option<f64>,
    /// See [`FeatureFlags::autoplay_delay_ms`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub autoplay_delay_ms: Option<u64>,
    /// See [`FeatureFlags::subtitle_default_on`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle_default_on: Option<bool>,
    /// See [`FeatureFlags::max_audio_retry_count`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_audio_retry_count: Option<u32>,
    /// See [`FeatureFlags::analytics_enabled`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analytics_enabled: Option<bool>,
}

impl FeatureFlags {
    /// Flags with every field present in `patch` replaced.
    pub fn merged(self, patch: &FeatureFlagsPatch) -> Self {
        Self {
            enable_auto_zoom: patch.enable_auto_zoom.unwrap_or(self.enable_auto_zoom),
            default_zoom_scale: patch.default_zoom_scale.unwrap_or(self.default_zoom_scale),
            autoplay_delay_ms: patch.autoplay_delay_ms.unwrap_or(self.autoplay_delay_ms),
            subtitle_default_on: patch.subtitle_default_on.unwrap_or(self.subtitle_default_on),
            max_audio_retry_count: patch
                .max_audio_retry_count
                .unwrap_or(self.max_audio_retry_count),
            analytics_enabled: patch.analytics_enabled.unwrap_or(self.analytics_enabled),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
/// User preferences that survive reloads. Missing keys take their defaults.
pub struct ReaderSettings {
    /// Show subtitles.
    pub subtitles_enabled: bool,
    /// Play the next item automatically.
    pub autoplay_enabled: bool,
}

impl ReaderSettings {
    /// Settings derived from the feature flags.
    pub fn defaults_for(flags: &FeatureFlags) -> Self {
        Self {
            subtitles_enabled: flags.subtitle_default_on,
            autoplay_enabled: false,
        }
    }
}

impl Default for ReaderSettings {
    fn default() -> Self {
        Self::defaults_for(&FeatureFlags::default())
    }
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// Complete reader state. Replaced wholesale by each committed transition.
pub struct ReaderState {
    /// Playback state.
    pub playback: PlaybackState,
    /// Zoom state.
    pub zoom: ZoomState,
    /// Visited hotspots.
    #[serde(default)]
    pub read_state: ReadState,
    /// Active feature flags.
    pub feature_flags: FeatureFlags,
    /// User settings.
    pub settings: ReaderSettings,
}

impl ReaderState {
    /// Fresh state for a session using `flags`.
    pub fn with_flags(flags: FeatureFlags) -> Self {
        Self {
            feature_flags: flags,
            settings: ReaderSettings::defaults_for(&flags),
            ..Self::default()
        }
    }

    /// Whether `hotspot_id` has been visited.
    pub fn is_read(&self, hotspot_id: &str) -> bool {
        self.read_state.get(hotspot_id).copied().unwrap_or(false)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/reader/state.rs"]
mod tests;
