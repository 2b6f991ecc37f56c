//! Geometry primitives and the distance oracle used for entry/exit matching.
//!
//! The oracle answers one question: how far is an equipment anchor from a
//! containment element? Two accuracy modes exist. [`Accuracy::High`] measures
//! against the centre line of runs and the connector origins of fittings,
//! [`Accuracy::Standard`] measures against the axis-aligned bounding box.

use serde::{Deserialize, Serialize};

use crate::model::ContainmentElement;

/// Cartesian point in the graph's native length unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 3]", into = "[f64; 3]")]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Calculate the Euclidean distance to another point.
    pub fn distance_to(&self, other: &Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    fn sub(&self, other: &Self) -> Self {
        Self::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }

    fn dot(&self, other: &Self) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    fn lerp(&self, other: &Self, t: f64) -> Self {
        Self::new(
            self.x + (other.x - self.x) * t,
            self.y + (other.y - self.y) * t,
            self.z + (other.z - self.z) * t,
        )
    }
}

impl From<[f64; 3]> for Point3 {
    fn from(value: [f64; 3]) -> Self {
        Self::new(value[0], value[1], value[2])
    }
}

impl From<Point3> for [f64; 3] {
    fn from(value: Point3) -> Self {
        [value.x, value.y, value.z]
    }
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: Point3,
    pub max: Point3,
}

impl BoundingBox {
    /// Build a box from two corners in any order.
    pub fn new(a: Point3, b: Point3) -> Self {
        Self {
            min: Point3::new(a.x.min(b.x), a.y.min(b.y), a.z.min(b.z)),
            max: Point3::new(a.x.max(b.x), a.y.max(b.y), a.z.max(b.z)),
        }
    }

    /// Smallest box enclosing every point, or `None` for an empty input.
    pub fn from_points<'a, I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Point3>,
    {
        let mut iter = points.into_iter();
        let first = *iter.next()?;
        Some(iter.fold(Self::new(first, first), |acc, point| Self {
            min: Point3::new(
                acc.min.x.min(point.x),
                acc.min.y.min(point.y),
                acc.min.z.min(point.z),
            ),
            max: Point3::new(
                acc.max.x.max(point.x),
                acc.max.y.max(point.y),
                acc.max.z.max(point.z),
            ),
        }))
    }

    pub fn contains(&self, point: &Point3) -> bool {
        (self.min.x..=self.max.x).contains(&point.x)
            && (self.min.y..=self.max.y).contains(&point.y)
            && (self.min.z..=self.max.z).contains(&point.z)
    }

    /// Distance from a point to the box; zero when the point is inside or on it.
    pub fn distance_to_point(&self, point: &Point3) -> f64 {
        let dx = axis_gap(point.x, point.x, self.min.x, self.max.x);
        let dy = axis_gap(point.y, point.y, self.min.y, self.max.y);
        let dz = axis_gap(point.z, point.z, self.min.z, self.max.z);
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    /// Shortest distance between two boxes; zero when they touch or overlap.
    pub fn distance_to_box(&self, other: &Self) -> f64 {
        let dx = axis_gap(other.min.x, other.max.x, self.min.x, self.max.x);
        let dy = axis_gap(other.min.y, other.max.y, self.min.y, self.max.y);
        let dz = axis_gap(other.min.z, other.max.z, self.min.z, self.max.z);
        (dx * dx + dy * dy + dz * dz).sqrt()
    }
}

fn axis_gap(a_min: f64, a_max: f64, b_min: f64, b_max: f64) -> f64 {
    (b_min - a_max).max(a_min - b_max).max(0.0)
}

/// Distance from `point` to the segment `a`-`b`.
pub fn distance_to_segment(point: &Point3, a: &Point3, b: &Point3) -> f64 {
    let ab = b.sub(a);
    let denom = ab.dot(&ab);
    if denom <= f64::EPSILON {
        return point.distance_to(a);
    }
    let t = (point.sub(a).dot(&ab) / denom).clamp(0.0, 1.0);
    point.distance_to(&a.lerp(b, t))
}

/// Distance from `point` to a polyline. A single vertex is treated as a point.
pub fn distance_to_polyline(point: &Point3, vertices: &[Point3]) -> Option<f64> {
    match vertices {
        [] => None,
        [only] => Some(point.distance_to(only)),
        _ => vertices
            .windows(2)
            .map(|pair| distance_to_segment(point, &pair[0], &pair[1]))
            .min_by(f64::total_cmp),
    }
}

/// Accuracy mode for anchor-to-element distances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Accuracy {
    /// Bounding-box distances.
    #[default]
    Standard,
    /// Centre-line and connector distances, used for short routes.
    High,
}

/// Distance from an anchor point to a containment element.
///
/// Returns `None` when the element carries no usable geometry or the result
/// is not finite.
pub fn element_distance(
    anchor: &Point3,
    element: &ContainmentElement,
    accuracy: Accuracy,
) -> Option<f64> {
    let precise = match accuracy {
        Accuracy::High if element.kind.is_linear() => distance_to_polyline(anchor, &element.curve),
        Accuracy::High if !element.connectors.is_empty() => element
            .connectors
            .iter()
            .map(|connector| anchor.distance_to(connector))
            .min_by(f64::total_cmp),
        _ => None,
    };

    precise
        .or_else(|| element.bounds().map(|bounds| bounds.distance_to_point(anchor)))
        .filter(|distance| distance.is_finite())
}

/// Gap between two elements measured on their bounding boxes.
pub fn element_gap(a: &ContainmentElement, b: &ContainmentElement) -> Option<f64> {
    let gap = a.bounds()?.distance_to_box(&b.bounds()?);
    gap.is_finite().then_some(gap)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ContainmentKind;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    #[test]
    fn box_distance_is_zero_inside_and_on_faces() {
        let bounds = BoundingBox::new(p(0.0, 0.0, 0.0), p(2.0, 2.0, 2.0));
        assert_eq!(bounds.distance_to_point(&p(1.0, 1.0, 1.0)), 0.0);
        assert_eq!(bounds.distance_to_point(&p(2.0, 1.0, 0.0)), 0.0);
        assert!((bounds.distance_to_point(&p(5.0, 6.0, 1.0)) - 5.0).abs() < 1e-9);
    }

    #[test]
    fn box_to_box_gap() {
        let a = BoundingBox::new(p(0.0, 0.0, 0.0), p(1.0, 1.0, 1.0));
        let b = BoundingBox::new(p(4.0, 0.5, 0.0), p(6.0, 2.0, 1.0));
        assert!((a.distance_to_box(&b) - 3.0).abs() < 1e-9);
        assert!((b.distance_to_box(&a) - 3.0).abs() < 1e-9);

        let overlapping = BoundingBox::new(p(0.5, 0.5, 0.5), p(3.0, 3.0, 3.0));
        assert_eq!(a.distance_to_box(&overlapping), 0.0);
    }

    #[test]
    fn corners_are_normalised() {
        let bounds = BoundingBox::new(p(3.0, -1.0, 2.0), p(1.0, 4.0, 0.0));
        assert_eq!(bounds.min, p(1.0, -1.0, 0.0));
        assert_eq!(bounds.max, p(3.0, 4.0, 2.0));
    }

    #[test]
    fn segment_distance_clamps_to_endpoints() {
        let a = p(0.0, 0.0, 0.0);
        let b = p(10.0, 0.0, 0.0);
        assert!((distance_to_segment(&p(5.0, 3.0, 0.0), &a, &b) - 3.0).abs() < 1e-9);
        assert!((distance_to_segment(&p(-4.0, 3.0, 0.0), &a, &b) - 5.0).abs() < 1e-9);
        assert!((distance_to_segment(&p(1.0, 1.0, 0.0), &a, &a) - 2f64.sqrt()).abs() < 1e-9);
    }

    #[test]
    fn polyline_takes_closest_leg() {
        let vertices = [p(0.0, 0.0, 0.0), p(10.0, 0.0, 0.0), p(10.0, 10.0, 0.0)];
        let distance = distance_to_polyline(&p(12.0, 5.0, 0.0), &vertices).unwrap();
        assert!((distance - 2.0).abs() < 1e-9);
        assert!(distance_to_polyline(&p(0.0, 0.0, 0.0), &[]).is_none());
    }

    #[test]
    fn high_accuracy_uses_centre_line_for_runs() {
        let run = ContainmentElement::new(1, ContainmentKind::CableTray, 10.0)
            .with_curve(vec![p(0.0, 0.0, 0.0), p(10.0, 0.0, 0.0)])
            .with_bounding_box(BoundingBox::new(p(0.0, -1.0, -1.0), p(10.0, 1.0, 1.0)));
        let anchor = p(5.0, 4.0, 0.0);

        let precise = element_distance(&anchor, &run, Accuracy::High).unwrap();
        let coarse = element_distance(&anchor, &run, Accuracy::Standard).unwrap();
        assert!((precise - 4.0).abs() < 1e-9);
        assert!((coarse - 3.0).abs() < 1e-9);
    }

    #[test]
    fn high_accuracy_uses_connectors_for_fittings() {
        let fitting = ContainmentElement::new(2, ContainmentKind::CableTrayFitting, 0.5)
            .with_connectors(vec![p(0.0, 0.0, 0.0), p(1.0, 1.0, 0.0)]);
        let distance = element_distance(&p(1.0, 4.0, 0.0), &fitting, Accuracy::High).unwrap();
        assert!((distance - 3.0).abs() < 1e-9);
    }

    #[test]
    fn run_without_curve_falls_back_to_bounds() {
        let run = ContainmentElement::new(3, ContainmentKind::Conduit, 2.0)
            .with_bounding_box(BoundingBox::new(p(0.0, 0.0, 0.0), p(2.0, 0.0, 0.0)));
        let distance = element_distance(&p(1.0, 2.0, 0.0), &run, Accuracy::High).unwrap();
        assert!((distance - 2.0).abs() < 1e-9);
    }

    #[test]
    fn element_without_geometry_has_no_distance() {
        let bare = ContainmentElement::new(4, ContainmentKind::Conduit, 2.0);
        assert!(element_distance(&p(0.0, 0.0, 0.0), &bare, Accuracy::Standard).is_none());
        assert!(element_distance(&p(0.0, 0.0, 0.0), &bare, Accuracy::High).is_none());
    }

    #[test]
    fn non_finite_geometry_is_excluded() {
        let broken = ContainmentElement::new(5, ContainmentKind::Conduit, 2.0)
            .with_location(p(f64::NAN, 0.0, 0.0));
        assert!(element_distance(&p(0.0, 0.0, 0.0), &broken, Accuracy::Standard).is_none());
    }

    #[test]
    fn points_round_trip_as_arrays() {
        let json = serde_json::to_string(&p(1.0, 2.5, -3.0)).unwrap();
        assert_eq!(json, "[1.0,2.5,-3.0]");
        let back: Point3 = serde_json::from_str(&json).unwrap();
        assert_eq!(back, p(1.0, 2.5, -3.0));
    }
}
