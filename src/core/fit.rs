//! Zoom levels that frame a geographic extent

use crate::core::config::ChromeMargins;
use crate::core::constants::DEGENERATE_EXTENT_ZOOM;
use crate::core::geo::{Extent, LatLng, Point};
use crate::core::viewport::Viewport;

/// The largest zoom at which `extent` fits inside `dimensions` pixels.
///
/// The extent is measured at the current zoom and the difference is
/// converted back to zoom levels. Rotation is ignored. Extents that cannot
/// be measured (zero area, empty) yield `max(current zoom, 19)`.
pub fn extent_zoom(viewport: &Viewport, extent: &Extent, dimensions: Point) -> f64 {
    let top_left = viewport.project_unrotated(&LatLng::new(extent.max.lat, extent.min.lng));
    let bottom_right = viewport.project_unrotated(&LatLng::new(extent.min.lat, extent.max.lng));

    let h_factor = (bottom_right.x - top_left.x) / dimensions.x;
    let v_factor = (bottom_right.y - top_left.y) / dimensions.y;
    let zoom_diff = h_factor.abs().log2().max(v_factor.abs().log2());

    let current = viewport.zoom();
    if zoom_diff.is_finite() {
        current - zoom_diff
    } else {
        current.max(DEGENERATE_EXTENT_ZOOM)
    }
}

/// Like [`extent_zoom`] but leaves room for the surrounding chrome
pub fn trimmed_extent_zoom(viewport: &Viewport, extent: &Extent, chrome: &ChromeMargins) -> f64 {
    extent_zoom(viewport, extent, chrome.trimmed(viewport.dimensions))
}
