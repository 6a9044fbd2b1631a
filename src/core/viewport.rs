use crate::core::constants::{
    DEFAULT_ZOOM, MAX_LATITUDE, ROTATION_PRECISION, TILE_SIZE, TRANSLATION_EPSILON,
};
use crate::core::geo::{num_wrap, round_to, Extent, LatLng, Point};
use serde::{Deserialize, Serialize};
use std::f64::consts::{PI, TAU};

/// Converts a zoom level to a Web Mercator scale factor
pub fn zoom_to_scale(zoom: f64) -> f64 {
    TILE_SIZE * 2_f64.powf(zoom)
}

/// Converts a Web Mercator scale factor back to a zoom level
pub fn scale_to_zoom(scale: f64) -> f64 {
    (scale / TILE_SIZE).log2()
}

/// The camera: pixel translation, scale and clockwise rotation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    /// Translation in pixels
    pub x: f64,
    pub y: f64,
    /// Scale factor (`TILE_SIZE * 2^zoom`)
    pub k: f64,
    /// Clockwise rotation in radians, `[0, 2π)`
    pub r: f64,
}

impl Transform {
    pub fn new(x: f64, y: f64, k: f64, r: f64) -> Self {
        Self { x, y, k, r }
    }

    pub fn zoom(&self) -> f64 {
        scale_to_zoom(self.k)
    }

    pub fn translation(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Rotation rounded to storage precision and wrapped into `[0, 2π)`
    pub fn normalize_rotation(r: f64) -> f64 {
        let r = if r.is_finite() { r } else { 0.0 };
        let wrapped = num_wrap(round_to(r, ROTATION_PRECISION), 0.0, TAU);
        // a normalized rotation must normalize to itself
        round_to(wrapped, ROTATION_PRECISION)
    }

    /// Returns a copy with the rotation normalized
    pub fn normalized(&self) -> Transform {
        Transform {
            r: Self::normalize_rotation(self.r),
            ..*self
        }
    }

    /// Same scale and rotation, translation within a sub-pixel tolerance
    pub fn approx_eq(&self, other: &Transform) -> bool {
        self.k == other.k
            && self.r == other.r
            && (self.x - other.x).abs() < TRANSLATION_EPSILON
            && (self.y - other.y).abs() < TRANSLATION_EPSILON
    }
}

/// The authoritative view: a transform plus the pixel size it is drawn into
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub transform: Transform,
    /// The size of the viewport in pixels
    pub dimensions: Point,
}

impl Viewport {
    pub fn new(transform: Transform, dimensions: Point) -> Self {
        Self {
            transform,
            dimensions,
        }
    }

    /// Startup view: zoom 2, centered on `[0, 0]`, no rotation
    pub fn centered(dimensions: Point) -> Self {
        let transform = Transform::new(
            dimensions.x / 2.0,
            dimensions.y / 2.0,
            zoom_to_scale(DEFAULT_ZOOM),
            0.0,
        );
        Self::new(transform, dimensions)
    }

    pub fn zoom(&self) -> f64 {
        self.transform.zoom()
    }

    pub fn set_scale(&mut self, k: f64) {
        self.transform.k = k;
    }

    pub fn set_dimensions(&mut self, dimensions: Point) {
        self.dimensions = dimensions;
    }

    /// Pixel at the middle of the viewport (also the rotation pivot)
    pub fn center(&self) -> Point {
        Point::new(self.dimensions.x / 2.0, self.dimensions.y / 2.0)
    }

    pub fn center_loc(&self) -> LatLng {
        self.unproject(&self.center())
    }

    /// Projects a location to screen pixels, ignoring rotation
    pub fn project_unrotated(&self, loc: &LatLng) -> Point {
        let t = &self.transform;
        let lat = loc.lat.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();
        let mx = loc.lng / 360.0;
        let my = -(PI / 4.0 + lat / 2.0).tan().ln() / TAU;
        Point::new(mx * t.k + t.x, my * t.k + t.y)
    }

    /// Projects a location to screen pixels
    pub fn project(&self, loc: &LatLng) -> Point {
        self.project_unrotated(loc)
            .rotate(self.transform.r, &self.center())
    }

    /// Converts screen pixels back to a location
    pub fn unproject(&self, point: &Point) -> LatLng {
        let t = &self.transform;
        let p = point.rotate(-t.r, &self.center());
        let mx = (p.x - t.x) / t.k;
        let my = (p.y - t.y) / t.k;
        let lng = mx * 360.0;
        let lat = (2.0 * (-my * TAU).exp().atan() - PI / 2.0).to_degrees();
        LatLng::new(lat, lng)
    }

    /// The geographic box covering everything on screen
    pub fn visible_extent(&self) -> Extent {
        let (w, h) = (self.dimensions.x, self.dimensions.y);
        let corners = [
            Point::new(0.0, 0.0),
            Point::new(w, 0.0),
            Point::new(w, h),
            Point::new(0.0, h),
        ];
        Extent::from_points(corners.iter().map(|p| self.unproject(p)))
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::centered(Point::new(800.0, 600.0))
    }
}
