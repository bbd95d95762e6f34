//! Geometry kernel for OCR bounding polygons.
//!
//! Every detected element carries a quadrilateral in page coordinates. This
//! module provides the handful of measurements the layout pass needs: areas,
//! intersection areas, vertical intervals, and the fractional overlap tests
//! used for region containment and line membership.

use geo::{Area, BooleanOps, Coord, Intersects, Line, LineString};
use serde::{Deserialize, Serialize};

/// Default threshold for region containment checks (selection mark inside a
/// paragraph group's word region).
pub const DEFAULT_REGION_THRESHOLD: f64 = 0.9;

/// Default threshold for same-line membership checks.
pub const DEFAULT_LINE_THRESHOLD: f64 = 0.7;

/// A point in page coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal coordinate
    pub x: f64,
    /// Vertical coordinate (grows downwards)
    pub y: f64,
}

impl Point {
    /// Create a new point.
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A quadrilateral bounding region.
///
/// Points are kept in detector order (normally TL, TR, BR, BL). Winding is
/// not validated. Deserializes from either a flat array of 8 numbers or an
/// array of 4 `{x, y}` objects, and always serializes to the flat form.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawPolygon", into = "[f64; 8]")]
pub struct Polygon {
    points: [Point; 4],
}

/// Wire shapes a polygon can arrive in.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawPolygon {
    Flat(Vec<f64>),
    Points(Vec<Point>),
}

impl TryFrom<RawPolygon> for Polygon {
    type Error = String;

    fn try_from(raw: RawPolygon) -> Result<Self, Self::Error> {
        match raw {
            RawPolygon::Flat(coords) => {
                let coords: [f64; 8] = coords.as_slice().try_into().map_err(|_| {
                    format!(
                        "polygon must have 8 coordinates (4 points), got {}",
                        coords.len()
                    )
                })?;
                Ok(Polygon::from_coords(coords))
            }
            RawPolygon::Points(points) => {
                let points: [Point; 4] = points
                    .as_slice()
                    .try_into()
                    .map_err(|_| format!("polygon must have 4 points, got {}", points.len()))?;
                Ok(Polygon::new(points))
            }
        }
    }
}

impl From<Polygon> for [f64; 8] {
    fn from(polygon: Polygon) -> Self {
        let p = polygon.points;
        [
            p[0].x, p[0].y, p[1].x, p[1].y, p[2].x, p[2].y, p[3].x, p[3].y,
        ]
    }
}

impl Polygon {
    /// Create a polygon from four points.
    pub fn new(points: [Point; 4]) -> Self {
        Self { points }
    }

    /// Create a polygon from flat coordinates `[x1, y1, ..., x4, y4]`.
    pub fn from_coords(c: [f64; 8]) -> Self {
        Self::new([
            Point::new(c[0], c[1]),
            Point::new(c[2], c[3]),
            Point::new(c[4], c[5]),
            Point::new(c[6], c[7]),
        ])
    }

    /// Create an axis-aligned rectangle in TL, TR, BR, BL order.
    pub fn rect(x_min: f64, y_min: f64, x_max: f64, y_max: f64) -> Self {
        Self::from_coords([x_min, y_min, x_max, y_min, x_max, y_max, x_min, y_max])
    }

    /// The four vertices.
    pub fn points(&self) -> &[Point; 4] {
        &self.points
    }

    /// Flat coordinates `[x1, y1, ..., x4, y4]`.
    pub fn coords(&self) -> [f64; 8] {
        (*self).into()
    }

    /// Smallest x over the four vertices.
    pub fn x_min(&self) -> f64 {
        self.points.iter().map(|p| p.x).fold(f64::INFINITY, f64::min)
    }

    /// Largest x over the four vertices.
    pub fn x_max(&self) -> f64 {
        self.points
            .iter()
            .map(|p| p.x)
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// Smallest y over the four vertices.
    pub fn y_min(&self) -> f64 {
        self.points.iter().map(|p| p.y).fold(f64::INFINITY, f64::min)
    }

    /// Largest y over the four vertices.
    pub fn y_max(&self) -> f64 {
        self.points
            .iter()
            .map(|p| p.y)
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// Signed shoelace area over the closed ring.
    pub fn signed_area(&self) -> f64 {
        self.to_geo().signed_area()
    }

    /// Absolute shoelace area over the closed ring.
    pub fn area(&self) -> f64 {
        self.to_geo().unsigned_area()
    }

    /// Vertical extent of the polygon.
    pub fn vertical_interval(&self) -> VerticalInterval {
        let mut ys = self.points.map(|p| p.y);
        ys.sort_by(f64::total_cmp);
        VerticalInterval::new(ys[0], ys[3])
    }

    /// Midpoint of the diagonal between the first and third vertices.
    ///
    /// This is the reference point used for horizontal ordering. It is not
    /// the centroid of all four vertices and must stay that way: ordering
    /// ties are resolved against exactly this value.
    pub fn diagonal_midpoint(&self) -> Point {
        let (x1, y1) = (self.points[0].x, self.points[0].y);
        let (x3, y3) = (self.points[2].x, self.points[2].y);
        Point::new(x3 - (x3 - x1) / 2.0, y3 - (y3 - y1) / 2.0)
    }

    /// Whether every coordinate is finite.
    pub fn is_finite(&self) -> bool {
        self.points.iter().all(|p| p.x.is_finite() && p.y.is_finite())
    }

    /// Whether opposite edges cross each other (a "bow tie").
    pub fn is_self_intersecting(&self) -> bool {
        let [a, b, c, d] = self.points.map(to_coord);
        Line::new(a, b).intersects(&Line::new(c, d)) || Line::new(b, c).intersects(&Line::new(d, a))
    }

    /// Whether the polygon has no usable area for overlap computations.
    pub fn is_degenerate(&self) -> bool {
        !self.is_finite() || self.area() <= 0.0 || self.is_self_intersecting()
    }

    /// The polygon as bounds `(x_min, y_min, x_max, y_max)` if it is an
    /// axis-aligned rectangle in TL, TR, BR, BL order.
    fn as_axis_aligned(&self) -> Option<(f64, f64, f64, f64)> {
        let [tl, tr, br, bl] = self.points;
        let aligned = tl.y == tr.y && bl.y == br.y && tl.x == bl.x && tr.x == br.x;
        (aligned && tl.x < tr.x && tl.y < bl.y).then_some((tl.x, tl.y, br.x, br.y))
    }

    fn to_geo(self) -> geo::Polygon<f64> {
        let ring: Vec<Coord<f64>> = self.points.iter().copied().map(to_coord).collect();
        geo::Polygon::new(LineString::from(ring), vec![])
    }
}

fn to_coord(p: Point) -> Coord<f64> {
    Coord { x: p.x, y: p.y }
}

/// Area of the geometric intersection of two quadrilaterals.
///
/// Returns 0 for disjoint or degenerate (zero-area, non-finite,
/// self-intersecting) polygons.
pub fn intersection_area(a: &Polygon, b: &Polygon) -> f64 {
    if a.is_degenerate() || b.is_degenerate() {
        return 0.0;
    }

    // Bounding boxes that do not overlap cannot intersect.
    if a.x_min() >= b.x_max() || b.x_min() >= a.x_max() {
        return 0.0;
    }
    if a.y_min() >= b.y_max() || b.y_min() >= a.y_max() {
        return 0.0;
    }

    if let (Some(ra), Some(rb)) = (a.as_axis_aligned(), b.as_axis_aligned()) {
        let x_min = ra.0.max(rb.0);
        let y_min = ra.1.max(rb.1);
        let x_max = ra.2.min(rb.2);
        let y_max = ra.3.min(rb.3);
        return (x_max - x_min) * (y_max - y_min);
    }

    let area = a.to_geo().intersection(&b.to_geo()).unsigned_area();
    if area.is_finite() {
        area
    } else {
        0.0
    }
}

/// Whether the intersection covers more than `threshold` of EITHER polygon.
///
/// This is a "contained in either" test, not intersection-over-union: a
/// small polygon fully inside a large one passes even though it covers a
/// tiny fraction of the large one. The comparison is strict.
pub fn overlaps_above(a: &Polygon, b: &Polygon, threshold: f64) -> bool {
    let inter = intersection_area(a, b);
    if inter <= 0.0 {
        return false;
    }
    fraction(inter, a.area()) > threshold || fraction(inter, b.area()) > threshold
}

/// Axis-aligned rectangle covering all polygons, in TL, TR, BR, BL order.
///
/// Returns `None` when there is nothing to cover.
pub fn union_bounding_box<'a, I>(polygons: I) -> Option<Polygon>
where
    I: IntoIterator<Item = &'a Polygon>,
{
    let mut iter = polygons.into_iter();
    let first = iter.next()?;
    let init = (first.x_min(), first.y_min(), first.x_max(), first.y_max());
    let (x_min, y_min, x_max, y_max) = iter.fold(init, |acc, p| {
        (
            acc.0.min(p.x_min()),
            acc.1.min(p.y_min()),
            acc.2.max(p.x_max()),
            acc.3.max(p.y_max()),
        )
    });
    Some(Polygon::rect(x_min, y_min, x_max, y_max))
}

/// Guarded ratio: a zero or invalid denominator yields 0.
fn fraction(part: f64, whole: f64) -> f64 {
    if whole > 0.0 && whole.is_finite() {
        part / whole
    } else {
        0.0
    }
}

/// Vertical extent `[y_min, y_max]` of an element.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VerticalInterval {
    /// Top edge
    pub y_min: f64,
    /// Bottom edge
    pub y_max: f64,
}

/// Covered fractions of two intervals by their common sub-interval.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlapRatios {
    /// Common length over the first interval's length
    pub of_first: f64,
    /// Common length over the second interval's length
    pub of_second: f64,
}

impl OverlapRatios {
    /// Whether either fraction is strictly above `threshold`.
    pub fn exceeds(&self, threshold: f64) -> bool {
        self.of_first > threshold || self.of_second > threshold
    }
}

impl VerticalInterval {
    /// Create a new interval.
    pub fn new(y_min: f64, y_max: f64) -> Self {
        Self { y_min, y_max }
    }

    /// Midpoint of the interval, used as a line key.
    pub fn midpoint(&self) -> f64 {
        (self.y_max + self.y_min) / 2.0
    }

    /// Length of the interval.
    pub fn len(&self) -> f64 {
        self.y_max - self.y_min
    }

    /// Whether the interval has zero length.
    pub fn is_empty(&self) -> bool {
        self.len() <= 0.0
    }

    /// Common sub-interval of `self` and `other`, as fractions of each.
    ///
    /// The comparison is one-sided: the common part is only computed when one
    /// interval's bottom lies strictly below the other's top and at or above
    /// the other's bottom. Anything else (including exact edge contact)
    /// yields `None`.
    pub fn overlap(&self, other: &VerticalInterval) -> Option<OverlapRatios> {
        let (a, b) = (self, other);
        let (common_min, common_max) = if b.y_min < a.y_max && a.y_max <= b.y_max {
            (a.y_min.max(b.y_min), a.y_max)
        } else if a.y_min < b.y_max && b.y_max <= a.y_max {
            (b.y_min.max(a.y_min), b.y_max)
        } else {
            return None;
        };

        let common = common_max - common_min;
        Some(OverlapRatios {
            of_first: fraction(common, a.len()),
            of_second: fraction(common, b.len()),
        })
    }

    /// Whether the intervals overlap by more than `threshold` of either one.
    pub fn overlaps_above(&self, other: &VerticalInterval, threshold: f64) -> bool {
        self.overlap(other)
            .is_some_and(|ratios| ratios.exceeds(threshold))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(x: f64, y: f64, size: f64) -> Polygon {
        Polygon::rect(x, y, x + size, y + size)
    }

    #[test]
    fn test_polygon_area() {
        assert_eq!(square(0.0, 0.0, 10.0).area(), 100.0);

        // Diamond with diagonals of length 2
        let diamond = Polygon::from_coords([1.0, 0.0, 2.0, 1.0, 1.0, 2.0, 0.0, 1.0]);
        assert!((diamond.area() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_signed_area_follows_winding() {
        let cw = Polygon::rect(0.0, 0.0, 2.0, 2.0);
        let ccw = Polygon::from_coords([0.0, 0.0, 0.0, 2.0, 2.0, 2.0, 2.0, 0.0]);
        assert_eq!(cw.signed_area(), -ccw.signed_area());
        assert_eq!(cw.area(), ccw.area());
    }

    #[test]
    fn test_intersection_area_rectangles() {
        let a = square(0.0, 0.0, 10.0);
        let b = square(5.0, 5.0, 10.0);
        assert_eq!(intersection_area(&a, &b), 25.0);

        let far = square(50.0, 50.0, 10.0);
        assert_eq!(intersection_area(&a, &far), 0.0);

        // Edge contact has no area
        let touching = square(10.0, 0.0, 10.0);
        assert_eq!(intersection_area(&a, &touching), 0.0);
    }

    #[test]
    fn test_intersection_area_rotated() {
        let a = square(0.0, 0.0, 2.0);
        let diamond = Polygon::from_coords([1.0, 0.0, 2.0, 1.0, 1.0, 2.0, 0.0, 1.0]);
        // The diamond lies entirely inside the square
        assert!((intersection_area(&a, &diamond) - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_intersection_area_degenerate() {
        let a = square(0.0, 0.0, 10.0);
        let flat = Polygon::rect(2.0, 2.0, 8.0, 2.0);
        assert_eq!(intersection_area(&a, &flat), 0.0);

        let bow_tie = Polygon::from_coords([0.0, 0.0, 10.0, 10.0, 10.0, 0.0, 0.0, 10.0]);
        assert!(bow_tie.is_self_intersecting());
        assert_eq!(intersection_area(&a, &bow_tie), 0.0);

        let nan = Polygon::from_coords([f64::NAN, 0.0, 1.0, 0.0, 1.0, 1.0, 0.0, 1.0]);
        assert_eq!(intersection_area(&a, &nan), 0.0);
        assert!(!overlaps_above(&a, &nan, 0.5));
    }

    #[test]
    fn test_overlaps_above_is_asymmetric_containment() {
        let big = square(0.0, 0.0, 100.0);
        let small = square(10.0, 10.0, 5.0);
        // small is fully inside big: 100% of small, 0.25% of big
        assert!(overlaps_above(&big, &small, 0.9));
        assert!(overlaps_above(&small, &big, 0.9));
    }

    #[test]
    fn test_overlaps_above_threshold_boundary() {
        let mark = square(0.0, 0.0, 10.0);

        // Exactly 90% of the mark is covered: must not match
        let region = Polygon::rect(1.0, 0.0, 50.0, 10.0);
        assert!(!overlaps_above(&region, &mark, 0.9));

        // 95% covered: matches
        let region = Polygon::rect(0.5, 0.0, 50.0, 10.0);
        assert!(overlaps_above(&region, &mark, 0.9));
    }

    #[test]
    fn test_vertical_interval() {
        let p = Polygon::from_coords([0.0, 3.0, 5.0, 1.0, 5.0, 9.0, 0.0, 7.0]);
        let interval = p.vertical_interval();
        assert_eq!(interval, VerticalInterval::new(1.0, 9.0));
        assert_eq!(interval.midpoint(), 5.0);
    }

    #[test]
    fn test_diagonal_midpoint_uses_first_and_third_vertex() {
        // Skewed quad: the 4-point centroid would be (2.5, 1.0)
        let p = Polygon::from_coords([0.0, 0.0, 4.0, 0.0, 2.0, 2.0, 4.0, 2.0]);
        assert_eq!(p.diagonal_midpoint(), Point::new(1.0, 1.0));
    }

    #[test]
    fn test_union_bounding_box() {
        let a = square(0.0, 0.0, 10.0);
        let b = square(20.0, 5.0, 10.0);
        let union = union_bounding_box([&a, &b]).unwrap();
        assert_eq!(union, Polygon::rect(0.0, 0.0, 30.0, 15.0));

        let none: [&Polygon; 0] = [];
        assert!(union_bounding_box(none).is_none());
    }

    #[test]
    fn test_vertical_overlap_partial() {
        let a = VerticalInterval::new(0.0, 10.0);
        let b = VerticalInterval::new(2.0, 12.0);
        let ratios = a.overlap(&b).unwrap();
        assert_eq!(ratios.of_first, 0.8);
        assert_eq!(ratios.of_second, 0.8);
        assert!(a.overlaps_above(&b, 0.7));
        assert!(!a.overlaps_above(&b, 0.8));
    }

    #[test]
    fn test_vertical_overlap_containment() {
        let tall = VerticalInterval::new(0.0, 100.0);
        let short = VerticalInterval::new(40.0, 50.0);
        // Short interval is fully covered even though tall barely is
        assert!(tall.overlaps_above(&short, 0.7));
        assert!(short.overlaps_above(&tall, 0.7));
    }

    #[test]
    fn test_vertical_overlap_none() {
        let a = VerticalInterval::new(0.0, 10.0);
        let b = VerticalInterval::new(10.0, 20.0);
        assert!(a.overlap(&b).is_none());
        assert!(!a.overlaps_above(&b, 0.0));
    }

    #[test]
    fn test_vertical_overlap_zero_length_guarded() {
        let flat = VerticalInterval::new(5.0, 5.0);
        let b = VerticalInterval::new(0.0, 10.0);
        let ratios = flat.overlap(&b).unwrap();
        assert_eq!(ratios.of_first, 0.0);
        assert!(!ratios.of_first.is_nan());
        assert!(!flat.overlaps_above(&b, 0.7));
        assert!(!flat.overlaps_above(&flat, 0.7));
    }

    #[test]
    fn test_polygon_deserialize_flat() {
        let p: Polygon = serde_json::from_str("[0, 0, 2, 0, 2, 1, 0, 1]").unwrap();
        assert_eq!(p, Polygon::rect(0.0, 0.0, 2.0, 1.0));
    }

    #[test]
    fn test_polygon_deserialize_points() {
        let json = r#"[{"x":0,"y":0},{"x":2,"y":0},{"x":2,"y":1},{"x":0,"y":1}]"#;
        let p: Polygon = serde_json::from_str(json).unwrap();
        assert_eq!(p, Polygon::rect(0.0, 0.0, 2.0, 1.0));
    }

    #[test]
    fn test_polygon_deserialize_wrong_length() {
        let err = serde_json::from_str::<Polygon>("[0, 0, 2, 0, 2, 1]").unwrap_err();
        assert!(err.to_string().contains("8 coordinates"));
    }

    #[test]
    fn test_polygon_serializes_flat() {
        let p = Polygon::rect(0.0, 0.0, 2.0, 1.0);
        let json = serde_json::to_string(&p).unwrap();
        assert_eq!(json, "[0.0,0.0,2.0,0.0,2.0,1.0,0.0,1.0]");
    }
}
