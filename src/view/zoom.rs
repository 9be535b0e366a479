use crate::{
    foundation::core::{ImageSize, Point, Rect},
    foundation::math::clamp_f64,
    geometry::polygon,
};

#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
/// Visible sub-rectangle of a page image, in image pixels.
pub struct Viewport {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Window width.
    pub width: f64,
    /// Window height.
    pub height: f64,
}

impl Viewport {
    /// As a kurbo [`Rect`].
    pub fn to_rect(self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.width, self.y + self.height)
    }

    /// SVG-style `viewBox` value: `"x y width height"`.
    pub fn to_view_box(self) -> String {
        format!("{} {} {} {}", self.x, self.y, self.width, self.height)
    }

    /// Whether this viewport shows the whole image.
    pub fn is_full(self, image: ImageSize) -> bool {
        self == full_viewport(image)
    }
}

/// Unzoomed viewport covering the entire image.
pub fn full_viewport(image: ImageSize) -> Viewport {
    if !image.is_usable() {
        return Viewport::default();
    }
    Viewport {
        x: 0.0,
        y: 0.0,
        width: image.width,
        height: image.height,
    }
}

/// Window of `image / zoom_factor` centred on `focal`, shifted to stay inside the image.
///
/// The window keeps the image's aspect ratio. Factors below 1 (or non-finite) are treated
/// as 1, so the result never samples outside `[0, image]`.
pub fn compute_viewport(image: ImageSize, focal: Point, zoom_factor: f64) -> Viewport {
    if !image.is_usable() {
        return Viewport::default();
    }
    let factor = if zoom_factor.is_finite() {
        zoom_factor.max(1.0)
    } else {
        1.0
    };
    let width = image.width / factor;
    let height = image.height / factor;
    let max_x = (image.width - width).max(0.0);
    let max_y = (image.height - height).max(0.0);
    Viewport {
        x: clamp_f64(focal.x - width / 2.0, 0.0, max_x),
        y: clamp_f64(focal.y - height / 2.0, 0.0, max_y),
        width,
        height,
    }
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// Radial mask stops (percentages) darkening everything outside the zoomed window.
pub struct SpotlightStops {
    /// Radius (percent) of the fully transparent core.
    pub transparent_stop: f64,
    /// Start of the feathered edge.
    pub feather_start: f64,
    /// Middle of the feathered edge.
    pub feather_mid: f64,
    /// End of the feathered edge.
    pub feather_end: f64,
}

/// Mask centre in percent of the visible window; the zoom window is always centred on it.
pub const SPOTLIGHT_CENTER: Point = Point::new(50.0, 50.0);

impl SpotlightStops {
    /// `(offset %, darkness alpha)` pairs from the centre outwards.
    pub fn gradient_stops(self) -> [(f64, f64); 6] {
        [
            (0.0, 0.0),
            (self.transparent_stop, 0.0),
            (self.feather_start, 0.35),
            (self.feather_mid, 0.75),
            (self.feather_end, 0.98),
            (100.0, 1.0),
        ]
    }
}

/// Scale the mask with how much of the page the viewport shows: smaller windows get a
/// tighter transparent core.
pub fn compute_spotlight_stops(viewport: Viewport, image: ImageSize) -> SpotlightStops {
    let relative = (viewport.width / image.width).max(viewport.height / image.height);
    let transparent_stop = clamp_f64(relative * 60.0, 28.0, 44.0);
    let feather_start = clamp_f64(transparent_stop + 10.0, 38.0, 56.0);
    let feather_mid = clamp_f64(feather_start + 16.0, 54.0, 72.0);
    let feather_end = clamp_f64(feather_mid + 14.0, 68.0, 90.0);
    SpotlightStops {
        transparent_stop,
        feather_start,
        feather_mid,
        feather_end,
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
/// The hotspot the view is currently zoomed onto.
pub struct ZoomSelection {
    /// Zoomed hotspot.
    pub hotspot_id: String,
    /// Focal point (hotspot centroid) in image pixels.
    pub focal: Point,
}

impl ZoomSelection {
    /// Viewport for this selection; recompute whenever the image size changes.
    pub fn viewport(&self, image: ImageSize, zoom_factor: f64) -> Viewport {
        compute_viewport(image, self.focal, zoom_factor)
    }
}

/// Resolve the zoom selection after a hotspot is picked.
///
/// Picking the zoomed hotspot again zooms out. Without known image dimensions the
/// current zoom is kept as is. A hotspot with no outline cannot be zoomed onto: it only
/// zooms out if it was the zoomed one.
pub fn toggle_zoom(
    current: Option<ZoomSelection>,
    hotspot_id: &str,
    points: &[Point],
    image: Option<ImageSize>,
) -> Option<ZoomSelection> {
    if !image.is_some_and(ImageSize::is_usable) {
        return current;
    }
    let same = current.as_ref().is_some_and(|z| z.hotspot_id == hotspot_id);
    if same {
        return None;
    }
    match polygon::centroid(points) {
        Some(focal) => Some(ZoomSelection {
            hotspot_id: hotspot_id.to_string(),
            focal,
        }),
        None => current,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/view/zoom.rs"]
mod tests;
