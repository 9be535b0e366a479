pub use kurbo::{Point, Rect, Size, Vec2};

/// 1-based page number within a manifest.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct PageNumber(pub u32);

impl PageNumber {
    /// The first page of every document.
    pub const FIRST: Self = Self(1);

    /// Parse a `page_groups` key (`"7"`, `" 07 "`); non-numeric and zero keys yield `None`.
    pub fn parse_key(key: &str) -> Option<Self> {
        match key.trim().parse::<u32>() {
            Ok(0) | Err(_) => None,
            Ok(n) => Some(Self(n)),
        }
    }

    /// Key used for this page in `page_groups`.
    pub fn key(self) -> String {
        self.0.to_string()
    }
}

impl std::fmt::Display for PageNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Natural pixel dimensions of a page image.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ImageSize {
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
}

impl ImageSize {
    /// Size from raw pixel dimensions.
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// A size is usable for viewport math only when both sides are finite and positive.
    pub fn is_usable(self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    /// As a kurbo [`Size`].
    pub fn to_size(self) -> Size {
        Size::new(self.width, self.height)
    }
}

impl From<Size> for ImageSize {
    fn from(value: Size) -> Self {
        Self::new(value.width, value.height)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
