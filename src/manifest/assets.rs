use std::collections::BTreeMap;

use crate::manifest::model::ManifestDef;

/// Base path used when none is configured.
pub const DEFAULT_ASSET_BASE_PATH: &str = "/assets";

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// Asset categories that may live in their own sub-folders.
pub enum AssetCategory {
    /// Page background images.
    PageImage,
    /// Narration audio.
    Audio,
    /// Subtitle (`.srt`) files.
    Subtitle,
    /// Speaker avatars.
    Avatar,
    /// Anything else referenced by name.
    Generic,
}

impl AssetCategory {
    fn default_folder(self) -> &'static str {
        match self {
            Self::Avatar => "avatars",
            Self::PageImage | Self::Audio | Self::Subtitle | Self::Generic => "",
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// Where manifest-relative asset names resolve to.
pub struct AssetResolverConfig {
    /// Root path (or path prefix under the CDN origin).
    #[serde(default = "default_base_path")]
    pub base_path: String,
    /// When set, resolved URLs are absolute under this origin.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cdn_base_url: Option<String>,
    /// Insert the manifest slug after the base path.
    #[serde(default)]
    pub include_slug_folder: bool,
    /// Per-category sub-folder, replacing the category default.
    #[serde(default)]
    pub category_overrides: BTreeMap<AssetCategory, String>,
}

fn default_base_path() -> String {
    DEFAULT_ASSET_BASE_PATH.to_string()
}

impl Default for AssetResolverConfig {
    fn default() -> Self {
        Self {
            base_path: default_base_path(),
            cdn_base_url: None,
            include_slug_folder: false,
            category_overrides: BTreeMap::new(),
        }
    }
}

/// Turns manifest file names into fetchable paths or URLs.
#[derive(Clone, Debug)]
pub struct AssetResolver {
    config: AssetResolverConfig,
    slug: Option<String>,
}

impl AssetResolver {
    /// Resolver for `manifest`; its slug is used when the slug folder is enabled.
    pub fn new(config: AssetResolverConfig, manifest: Option<&ManifestDef>) -> Self {
        let slug = manifest
            .map(|m| m.slug.trim().to_string())
            .filter(|s| !s.is_empty());
        Self { config, slug }
    }

    /// Path or URL of a page image.
    pub fn page_image(&self, file_name: &str) -> String {
        self.resolve(AssetCategory::PageImage, file_name)
    }

    /// Path or URL of an audio file.
    pub fn audio(&self, file_name: &str) -> String {
        self.resolve(AssetCategory::Audio, file_name)
    }

    /// Path or URL of a subtitle file.
    pub fn subtitle(&self, file_name: &str) -> String {
        self.resolve(AssetCategory::Subtitle, file_name)
    }

    /// Avatars are optional in manifests; an absent or blank name resolves to `None`.
    pub fn avatar(&self, file_name: Option<&str>) -> Option<String> {
        file_name
            .filter(|f| !f.trim().is_empty())
            .map(|f| self.resolve(AssetCategory::Avatar, f))
    }

    /// Path or URL of any other asset.
    pub fn generic(&self, file_name: &str) -> String {
        self.resolve(AssetCategory::Generic, file_name)
    }

    fn resolve(&self, category: AssetCategory, file_name: &str) -> String {
        let base = if self.config.include_slug_folder
            && let Some(slug) = &self.slug
        {
            join_segments(&[&self.config.base_path, slug])
        } else {
            self.config.base_path.clone()
        };
        let folder = self
            .config
            .category_overrides
            .get(&category)
            .map(String::as_str)
            .unwrap_or_else(|| category.default_folder());
        let path = join_segments(&[&base, folder, file_name]);
        with_base_url(&path, self.config.cdn_base_url.as_deref())
    }
}

fn encode_segments(value: &str) -> String {
    value
        .split('/')
        .filter(|s| !s.is_empty())
        .map(|s| urlencoding::encode(s).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

fn join_segments(segments: &[&str]) -> String {
    segments
        .iter()
        .filter(|s| !s.is_empty())
        .map(|s| encode_segments(s.trim_matches('/')))
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

fn with_base_url(path: &str, cdn_base_url: Option<&str>) -> String {
    if path.is_empty() {
        return String::new();
    }
    match cdn_base_url {
        None if path.starts_with('/') => path.to_string(),
        None => format!("/{path}"),
        Some(base) => format!("{}/{}", base.trim_end_matches('/'), path),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/manifest/assets.rs"]
mod tests;
