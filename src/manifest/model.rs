use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Manifest document as authored, before normalization.
///
/// Every field the core does not strictly need is optional so that manifests produced by
/// older authoring tools still parse. Downstream code should only ever see the
/// [`crate::NormalizedPage`] values produced by [`crate::normalize`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ManifestDef {
    /// Document identifier, also used as an optional asset folder.
    #[serde(default)]
    pub slug: String,
    /// Declared page count; absent, non-positive or non-finite values fall back to key count.
    #[serde(rename = "totalPages", default, skip_serializing_if = "Option::is_none")]
    pub total_pages: Option<f64>,
    /// Avatar used when a hotspot does not carry one.
    #[serde(rename = "defaultAvatar", default, skip_serializing_if = "Option::is_none")]
    pub default_avatar: Option<AvatarDef>,
    /// Pages keyed by stringified 1-based page number.
    #[serde(default)]
    pub page_groups: BTreeMap<String, PageDef>,
}

/// One authored page.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PageDef {
    /// Image file name, relative to the asset root.
    #[serde(rename = "pageImage")]
    pub page_image: String,
    /// Interactive regions, in authored order.
    #[serde(default)]
    pub hotspots: Vec<HotspotDef>,
}

/// Authored hotspot polygon with its playlist.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct HotspotDef {
    /// Stable id; synthesized during normalization when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Polygon outline in image pixel space.
    #[serde(default)]
    pub points: Vec<PointDef>,
    /// Playlist entries in authored order.
    #[serde(default)]
    pub contents: Vec<ContentDef>,
    /// Ordering hint among the page's hotspots.
    #[serde(default)]
    pub sequence: i64,
    /// Whether the speaker sits on the left side.
    #[serde(rename = "isLeft", default)]
    pub is_left: bool,
    /// Overrides the manifest's default avatar.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<AvatarDef>,
}

/// Manifest point; `dx`/`dy` are pixel offsets, not normalized coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PointDef {
    /// Horizontal pixel offset.
    pub dx: f64,
    /// Vertical pixel offset.
    pub dy: f64,
}

impl From<PointDef> for kurbo::Point {
    fn from(value: PointDef) -> Self {
        kurbo::Point::new(value.dx, value.dy)
    }
}

impl From<kurbo::Point> for PointDef {
    fn from(value: kurbo::Point) -> Self {
        Self {
            dx: value.x,
            dy: value.y,
        }
    }
}

/// One playlist entry attached to a hotspot.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentDef {
    /// Stable id; synthesized when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Position in the hotspot playlist.
    #[serde(default)]
    pub sequence: i64,
    /// Start offset in milliseconds.
    #[serde(rename = "startTime", default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<f64>,
    /// Authored content type (`audio`, `video`, ...).
    #[serde(rename = "type", default)]
    pub kind: String,
    /// Audio payload, for audio entries.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<AudioContentDef>,
    /// Start without user interaction.
    #[serde(rename = "autoPlay", default)]
    pub auto_play: bool,
    /// Duration in milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
}

/// Audio file with its subtitle tracks.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AudioContentDef {
    /// Stable id; defaults to the owning content id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Audio file name.
    #[serde(rename = "audioFile", default)]
    pub audio_file: String,
    /// Subtitle tracks for this audio.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitles: Option<Vec<SubtitleDef>>,
    /// Spoken language.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    /// Preferred when several languages exist.
    #[serde(rename = "isDefault", default)]
    pub is_default: bool,
}

/// One subtitle track.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SubtitleDef {
    /// Stable id; synthesized when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Subtitle file name.
    #[serde(rename = "srtFile", default)]
    pub srt_file: String,
    /// Subtitle language.
    #[serde(default)]
    pub language: String,
    /// Preferred track for the language.
    #[serde(rename = "isDefault", default)]
    pub is_default: bool,
}

/// Speaker portrait shown next to playing content.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AvatarDef {
    /// Optional avatar id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Image file name, resolved under the avatar folder.
    #[serde(rename = "avatarImage", default, skip_serializing_if = "Option::is_none")]
    pub avatar_image: Option<String>,
}

#[cfg(test)]
#[path = "../../tests/unit/manifest/model.rs"]
mod tests;
