use crate::{
    foundation::core::{PageNumber, Point},
    manifest::model::{AvatarDef, ContentDef, HotspotDef, ManifestDef, PageDef},
};

/// Extension used when no page image in the manifest exposes a numeric pattern.
pub const FALLBACK_IMAGE_EXTENSION: &str = "jpg";

/// Upper bound on synthesized pages, guarding against absurd `totalPages` values.
pub const MAX_PAGES: u32 = 10_000;

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
/// A page resolved from the manifest, or synthesized when the manifest has a gap.
pub struct NormalizedPage {
    /// 1-based page number.
    pub page_number: PageNumber,
    /// Stable page identifier (the page number as a string).
    pub id: String,
    /// Page image file name, relative to the asset root.
    pub page_image: String,
    /// Hotspots in manifest order.
    pub hotspots: Vec<Hotspot>,
    /// `true` when the page had no manifest entry and was synthesized.
    pub placeholder: bool,
}

impl NormalizedPage {
    /// Look up a hotspot on this page by id.
    pub fn hotspot(&self, id: &str) -> Option<&Hotspot> {
        self.hotspots.iter().find(|h| h.id == id)
    }

    /// Whether `id` names a hotspot on this page.
    pub fn has_hotspot(&self, id: &str) -> bool {
        self.hotspot(id).is_some()
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
/// Interactive polygonal region of a page.
pub struct Hotspot {
    /// Stable id (authored, or `page<N>-hotspot<i>`).
    pub id: String,
    /// Outline in image pixel space, in authored order.
    pub points: Vec<Point>,
    /// Playlist sorted by sequence.
    pub playlist: Vec<PlaylistItem>,
    /// Authored ordering hint.
    pub sequence: i64,
    /// Speaker sits on the left.
    pub is_left: bool,
    /// Hotspot avatar override.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<AvatarDef>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// Kind of a playlist entry.
pub enum ContentKind {
    /// Narration audio.
    Audio,
    /// Video clip.
    Video,
    /// Interactive question.
    Question,
    /// Text popup.
    PopupText,
    /// Rive animation.
    Rive,
    /// Standalone subtitle.
    Subtitle,
    /// Unrecognized `type`.
    Unknown,
}

impl ContentKind {
    /// Map an authored `type` string; anything unrecognized is [`ContentKind::Unknown`].
    pub fn parse(kind: &str) -> Self {
        match kind.trim().to_ascii_lowercase().as_str() {
            "audio" => Self::Audio,
            "video" => Self::Video,
            "question" => Self::Question,
            "popuptext" | "popup_text" => Self::PopupText,
            "rive" => Self::Rive,
            "subtitle" => Self::Subtitle,
            _ => Self::Unknown,
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// One content item queued when a hotspot plays.
pub struct PlaylistItem {
    /// Stable id (authored, or `<hotspotId>-<index>`).
    pub id: String,
    /// Playlist position.
    pub sequence: i64,
    /// Content kind.
    pub kind: ContentKind,
    /// Start offset in milliseconds.
    pub start_time_ms: f64,
    /// Start without user interaction.
    pub auto_play: bool,
    /// Duration in milliseconds, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<f64>,
    /// Audio payload, for audio entries.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio: Option<AudioContent>,
}

/// Audio payload of a playlist item.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioContent {
    /// Stable id.
    pub id: String,
    /// Audio file name.
    pub audio_file: String,
    /// Subtitle tracks.
    #[serde(default)]
    pub subtitles: Vec<SubtitleTrack>,
    /// Spoken language.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    /// Preferred language variant.
    #[serde(default)]
    pub is_default: bool,
}

/// Subtitle track of an audio item.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubtitleTrack {
    /// Stable id.
    pub id: String,
    /// Subtitle file name.
    pub file_name: String,
    /// Track language.
    pub language: String,
    /// Preferred track.
    #[serde(default)]
    pub is_default: bool,
}

/// Number of pages the document has.
///
/// A positive, finite `totalPages` wins (fractional values are floored); otherwise the
/// number of distinct `page_groups` keys is used.
pub fn page_count(manifest: &ManifestDef) -> u32 {
    let declared = manifest
        .total_pages
        .filter(|n| n.is_finite() && *n > 0.0)
        .map(|n| n.floor().min(f64::from(MAX_PAGES)) as u32);
    match declared {
        Some(n) => n,
        None => u32::try_from(manifest.page_groups.len())
            .unwrap_or(MAX_PAGES)
            .min(MAX_PAGES),
    }
}

/// Ascending list of page numbers a reader may navigate between.
///
/// With a declared page count this is `1..=count`; otherwise the numeric `page_groups`
/// keys, sorted and deduplicated.
pub fn available_pages(manifest: &ManifestDef) -> Vec<PageNumber> {
    let declared = manifest
        .total_pages
        .is_some_and(|n| n.is_finite() && n > 0.0);
    if declared {
        return (1..=page_count(manifest)).map(PageNumber).collect();
    }

    let mut pages = manifest
        .page_groups
        .keys()
        .filter_map(|k| PageNumber::parse_key(k))
        .collect::<Vec<_>>();
    pages.sort();
    pages.dedup();
    pages
}

/// Expand a sparse manifest into one [`NormalizedPage`] per page number `1..=page_count`.
///
/// Pages missing from `page_groups` become placeholders with no hotspots and an image
/// name inferred from a sibling page.
#[tracing::instrument(skip(manifest), fields(slug = %manifest.slug))]
pub fn normalize(manifest: &ManifestDef) -> Vec<NormalizedPage> {
    let count = page_count(manifest);
    let pages = (1..=count)
        .map(|n| resolve_page(manifest, PageNumber(n)))
        .collect::<Vec<_>>();
    let synthesized = pages.iter().filter(|p| p.placeholder).count();
    if synthesized > 0 {
        tracing::debug!(synthesized, total = count, "filled manifest page gaps");
    }
    pages
}

/// Resolve a single page, or `None` when `page` is outside `1..=page_count`.
pub fn manifest_page(manifest: &ManifestDef, page: PageNumber) -> Option<NormalizedPage> {
    if page.0 < 1 || page.0 > page_count(manifest) {
        return None;
    }
    Some(resolve_page(manifest, page))
}

fn lookup<'a>(manifest: &'a ManifestDef, page: PageNumber) -> Option<&'a PageDef> {
    manifest.page_groups.get(&page.key()).or_else(|| {
        manifest
            .page_groups
            .iter()
            .find(|(k, _)| PageNumber::parse_key(k) == Some(page))
            .map(|(_, v)| v)
    })
}

fn resolve_page(manifest: &ManifestDef, page: PageNumber) -> NormalizedPage {
    match lookup(manifest, page) {
        Some(def) => NormalizedPage {
            page_number: page,
            id: page.key(),
            page_image: def.page_image.clone(),
            hotspots: def
                .hotspots
                .iter()
                .enumerate()
                .map(|(i, h)| normalize_hotspot(page, i, h))
                .collect(),
            placeholder: false,
        },
        None => NormalizedPage {
            page_number: page,
            id: page.key(),
            page_image: infer_page_image_file_name(manifest, page),
            hotspots: Vec::new(),
            placeholder: true,
        },
    }
}

fn normalize_hotspot(page: PageNumber, index: usize, def: &HotspotDef) -> Hotspot {
    let id = match def.id.as_deref() {
        Some(id) if !id.trim().is_empty() => id.to_string(),
        _ => format!("page{page}-hotspot{index}"),
    };
    let mut playlist = def
        .contents
        .iter()
        .enumerate()
        .map(|(i, c)| normalize_content(&id, i, c))
        .collect::<Vec<_>>();
    playlist.sort_by_key(|item| item.sequence);

    Hotspot {
        points: def.points.iter().map(|p| Point::from(*p)).collect(),
        playlist,
        sequence: def.sequence,
        is_left: def.is_left,
        avatar: def.avatar.clone(),
        id,
    }
}

fn normalize_content(hotspot_id: &str, index: usize, def: &ContentDef) -> PlaylistItem {
    let id = def
        .id
        .clone()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| format!("{hotspot_id}-{index}"));
    let audio = def.content.as_ref().map(|c| AudioContent {
        id: c.id.clone().unwrap_or_else(|| id.clone()),
        audio_file: c.audio_file.clone(),
        subtitles: c
            .subtitles
            .iter()
            .flatten()
            .enumerate()
            .map(|(i, s)| SubtitleTrack {
                id: s.id.clone().unwrap_or_else(|| format!("{id}-sub{i}")),
                file_name: s.srt_file.clone(),
                language: s.language.clone(),
                is_default: s.is_default,
            })
            .collect(),
        language: c.language.clone(),
        is_default: c.is_default,
    });

    PlaylistItem {
        sequence: def.sequence,
        kind: ContentKind::parse(&def.kind),
        start_time_ms: def.start_time.filter(|t| t.is_finite()).unwrap_or(0.0),
        auto_play: def.auto_play,
        duration_ms: def.duration.filter(|d| d.is_finite() && *d >= 0.0),
        audio,
        id,
    }
}

/// Guess the image file name for `page` from a sibling page's naming pattern.
///
/// The reference image is page 1 when present, else the lowest-numbered entry. Its
/// trailing digit run (right before the extension) is replaced by `page`, zero-padded to
/// the same width when the original run starts with `0`. Without a usable pattern the
/// result is `page_<n>.jpg`.
pub fn infer_page_image_file_name(manifest: &ManifestDef, page: PageNumber) -> String {
    let fallback = || format!("page_{page}.{FALLBACK_IMAGE_EXTENSION}");

    let Some(reference) = reference_image(manifest) else {
        return fallback();
    };
    let Some((prefix, digits, extension)) = split_numbered_name(reference) else {
        return fallback();
    };

    let number = if digits.starts_with('0') {
        format!("{:0width$}", page.0, width = digits.len())
    } else {
        page.0.to_string()
    };
    format!("{prefix}{number}{extension}")
}

fn reference_image(manifest: &ManifestDef) -> Option<&str> {
    let numbered = manifest
        .page_groups
        .iter()
        .filter_map(|(k, v)| PageNumber::parse_key(k).map(|n| (n, v)))
        .min_by_key(|(n, _)| *n)
        .map(|(_, v)| v);
    numbered
        .or_else(|| manifest.page_groups.values().next())
        .map(|p| p.page_image.as_str())
        .filter(|s| !s.is_empty())
}

/// Split `"<prefix><digits><.ext>"`; `digits` is the maximal digit run before the last dot.
fn split_numbered_name(name: &str) -> Option<(&str, &str, &str)> {
    let dot = name.rfind('.')?;
    let (stem, extension) = name.split_at(dot);
    if extension.len() < 2 {
        return None;
    }
    let digits_start = stem
        .char_indices()
        .rev()
        .take_while(|(_, c)| c.is_ascii_digit())
        .last()
        .map(|(i, _)| i)?;
    Some((&stem[..digits_start], &stem[digits_start..], extension))
}

#[cfg(test)]
#[path = "../../tests/unit/manifest/normalize.rs"]
mod tests;
