use crate::core::constants::EQUATORIAL_CIRCUMFERENCE;
use serde::{Deserialize, Serialize};

/// Represents a geographical coordinate with latitude and longitude
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    /// Creates a new LatLng coordinate
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Validates that the coordinates are within valid ranges
    pub fn is_valid(&self) -> bool {
        self.lat >= -90.0 && self.lat <= 90.0 && self.lng >= -180.0 && self.lng <= 180.0
    }

    /// Clamps to the geographic domain. NaN components become 0.
    pub fn clamped(&self) -> LatLng {
        LatLng::new(
            nan_to_zero(self.lat).clamp(-90.0, 90.0),
            nan_to_zero(self.lng).clamp(-180.0, 180.0),
        )
    }
}

impl Default for LatLng {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

/// Represents a point in screen coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn add(&self, other: &Point) -> Point {
        Point::new(self.x + other.x, self.y + other.y)
    }

    pub fn subtract(&self, other: &Point) -> Point {
        Point::new(self.x - other.x, self.y - other.y)
    }

    pub fn multiply(&self, scalar: f64) -> Point {
        Point::new(self.x * scalar, self.y * scalar)
    }

    pub fn distance_to(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Rotates clockwise (screen space, y down) by `angle` radians around `around`
    pub fn rotate(&self, angle: f64, around: &Point) -> Point {
        if angle == 0.0 {
            return *self;
        }
        let (sin, cos) = angle.sin_cos();
        let dx = self.x - around.x;
        let dy = self.y - around.y;
        Point::new(
            dx * cos - dy * sin + around.x,
            dx * sin + dy * cos + around.y,
        )
    }
}

impl Default for Point {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

/// Axis-aligned box in geographic space. `min` is the south-west corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Extent {
    pub min: LatLng,
    pub max: LatLng,
}

impl Extent {
    pub fn new(min: LatLng, max: LatLng) -> Self {
        Self { min, max }
    }

    /// Creates an extent from individual coordinates
    pub fn from_coords(south: f64, west: f64, north: f64, east: f64) -> Self {
        Self::new(LatLng::new(south, west), LatLng::new(north, east))
    }

    /// An extent around a single location
    pub fn from_point(loc: LatLng) -> Self {
        Self::new(loc, loc)
    }

    /// The smallest extent containing all `points`
    pub fn from_points<I: IntoIterator<Item = LatLng>>(points: I) -> Self {
        let mut extent = Self::empty();
        for point in points {
            extent.extend(&point);
        }
        extent
    }

    /// Creates an empty extent that can be extended. Its area is infinite.
    pub fn empty() -> Self {
        Self::new(
            LatLng::new(f64::INFINITY, f64::INFINITY),
            LatLng::new(f64::NEG_INFINITY, f64::NEG_INFINITY),
        )
    }

    pub fn is_empty(&self) -> bool {
        self.min.lat > self.max.lat || self.min.lng > self.max.lng
    }

    /// Extends the extent to include a point
    pub fn extend(&mut self, point: &LatLng) {
        self.min.lat = self.min.lat.min(point.lat);
        self.min.lng = self.min.lng.min(point.lng);
        self.max.lat = self.max.lat.max(point.lat);
        self.max.lng = self.max.lng.max(point.lng);
    }

    /// Returns the union of this extent with another extent
    pub fn union(&self, other: &Extent) -> Extent {
        Extent::new(
            LatLng::new(
                self.min.lat.min(other.min.lat),
                self.min.lng.min(other.min.lng),
            ),
            LatLng::new(
                self.max.lat.max(other.max.lat),
                self.max.lng.max(other.max.lng),
            ),
        )
    }

    pub fn center(&self) -> LatLng {
        LatLng::new(
            (self.min.lat + self.max.lat) / 2.0,
            (self.min.lng + self.max.lng) / 2.0,
        )
    }

    /// Area in square degrees. Infinite for an empty extent.
    pub fn area(&self) -> f64 {
        ((self.max.lng - self.min.lng) * (self.max.lat - self.min.lat)).abs()
    }

    /// Checks if the extent contains a point
    pub fn contains_point(&self, point: &LatLng) -> bool {
        point.lat >= self.min.lat
            && point.lat <= self.max.lat
            && point.lng >= self.min.lng
            && point.lng <= self.max.lng
    }

    /// Checks if `other` lies entirely inside this extent
    pub fn contains(&self, other: &Extent) -> bool {
        other.min.lng >= self.min.lng
            && other.min.lat >= self.min.lat
            && other.max.lng <= self.max.lng
            && other.max.lat <= self.max.lat
    }

    /// Checks if the extent intersects with another extent
    pub fn intersects(&self, other: &Extent) -> bool {
        !(other.max.lat < self.min.lat
            || other.min.lat > self.max.lat
            || other.max.lng < self.min.lng
            || other.min.lng > self.max.lng)
    }

    /// The overlapping box, or a zero-area extent when disjoint
    pub fn intersection(&self, other: &Extent) -> Extent {
        if !self.intersects(other) {
            return Extent::default();
        }
        Extent::new(
            LatLng::new(
                self.min.lat.max(other.min.lat),
                self.min.lng.max(other.min.lng),
            ),
            LatLng::new(
                self.max.lat.min(other.max.lat),
                self.max.lng.min(other.max.lng),
            ),
        )
    }

    /// Fraction of this extent's area that lies inside `other`, in `[0, 1]`.
    ///
    /// Zero-area extents (points, lines) count as fully contained when they
    /// sit inside `other` and as not contained otherwise.
    pub fn percent_contained_in(&self, other: &Extent) -> f64 {
        let a1 = self.intersection(other).area();
        let a2 = self.area();

        if a1.is_infinite() || a2.is_infinite() || a1.is_nan() || a2.is_nan() {
            0.0
        } else if a1 == 0.0 || a2 == 0.0 {
            if other.contains(self) {
                1.0
            } else {
                0.0
            }
        } else {
            a1 / a2
        }
    }
}

impl Default for Extent {
    fn default() -> Self {
        Self::new(LatLng::default(), LatLng::default())
    }
}

/// Wraps `value` into `[min, max)`
pub fn num_wrap(value: f64, min: f64, max: f64) -> f64 {
    if value >= min && value < max {
        return value;
    }
    let delta = max - min;
    ((value - min) % delta + delta) % delta + min
}

/// Rounds to `digits` decimal places the way a fixed-point formatter does
pub fn round_to(value: f64, digits: usize) -> f64 {
    if !value.is_finite() {
        return value;
    }
    format!("{:.*}", digits, value).parse().unwrap_or(value)
}

/// Degrees of longitude spanned by `meters` at latitude `at_lat`
pub fn meters_to_lon(meters: f64, at_lat: f64) -> f64 {
    if at_lat.abs() >= 90.0 {
        0.0
    } else {
        meters / (EQUATORIAL_CIRCUMFERENCE / 360.0 * at_lat.to_radians().cos())
    }
}

pub(crate) fn nan_to_zero(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value
    }
}
