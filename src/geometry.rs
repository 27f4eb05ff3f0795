use eframe::egui;
use serde::{Deserialize, Serialize};

/// Scene-space point. Canvas coordinates, origin at the top-left of the
/// drawing surface, y grows downward.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn from_pos2(p: egui::Pos2) -> Self {
        Self { x: p.x, y: p.y }
    }

    pub fn to_pos2(self) -> egui::Pos2 {
        egui::pos2(self.x, self.y)
    }

    pub fn distance_to(self, other: Point) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Quantizes a coordinate to the nearest multiple of `grid`.
pub fn snap_to_grid(v: f32, grid: f32) -> f32 {
    (v / grid).round() * grid
}

pub fn snap_point(p: Point, grid: f32) -> Point {
    Point {
        x: snap_to_grid(p.x, grid),
        y: snap_to_grid(p.y, grid),
    }
}

/// Distance from `p` to the closest point on segment `a`..`b`.
pub fn distance_to_segment(p: Point, a: Point, b: Point) -> f32 {
    let abx = b.x - a.x;
    let aby = b.y - a.y;
    let apx = p.x - a.x;
    let apy = p.y - a.y;
    let ab_len2 = abx * abx + aby * aby;
    if ab_len2 <= f32::EPSILON {
        return p.distance_to(a);
    }
    let t = ((apx * abx + apy * aby) / ab_len2).clamp(0.0, 1.0);
    let closest = Point::new(a.x + abx * t, a.y + aby * t);
    p.distance_to(closest)
}

/// Minimum distance from `p` to an open polyline.
pub fn distance_to_path(p: Point, path: &[Point]) -> f32 {
    match path {
        [] => f32::INFINITY,
        [single] => p.distance_to(*single),
        _ => path
            .windows(2)
            .map(|seg| distance_to_segment(p, seg[0], seg[1]))
            .fold(f32::INFINITY, f32::min),
    }
}

/// Arithmetic mean of the path vertices, used to anchor labels.
pub fn path_centroid(path: &[Point]) -> Point {
    if path.is_empty() {
        return Point::default();
    }
    let n = path.len() as f32;
    let sum = path.iter().fold(Point::default(), |acc, p| Point {
        x: acc.x + p.x,
        y: acc.y + p.y,
    });
    Point::new(sum.x / n, sum.y / n)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snap_rounds_to_nearest_multiple() {
        assert_eq!(snap_to_grid(103.0, 20.0), 100.0);
        assert_eq!(snap_to_grid(110.0, 20.0), 120.0);
        assert_eq!(snap_to_grid(-7.0, 20.0), 0.0);
        assert_eq!(snap_to_grid(-13.0, 20.0), -20.0);
    }

    #[test]
    fn snap_is_idempotent() {
        for v in [-250.0, -13.0, 0.0, 7.5, 103.0, 999.9] {
            let once = snap_to_grid(v, 20.0);
            assert_eq!(snap_to_grid(once, 20.0), once);
        }
    }

    #[test]
    fn segment_distance_interior_and_endpoints() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(100.0, 0.0);
        assert_eq!(distance_to_segment(Point::new(50.0, 10.0), a, b), 10.0);
        assert_eq!(distance_to_segment(Point::new(-30.0, 0.0), a, b), 30.0);
        assert_eq!(distance_to_segment(Point::new(140.0, 0.0), a, b), 40.0);
    }

    #[test]
    fn degenerate_segment_uses_point_distance() {
        let a = Point::new(5.0, 5.0);
        assert_eq!(distance_to_segment(Point::new(5.0, 9.0), a, a), 4.0);
    }

    #[test]
    fn path_distance_takes_closest_segment() {
        let path = [
            Point::new(0.0, 0.0),
            Point::new(100.0, 0.0),
            Point::new(100.0, 100.0),
        ];
        assert_eq!(distance_to_path(Point::new(110.0, 50.0), &path), 10.0);
        assert_eq!(distance_to_path(Point::new(50.0, 5.0), &path), 5.0);
    }

    #[test]
    fn centroid_of_square() {
        let path = [
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
        ];
        assert_eq!(path_centroid(&path), Point::new(5.0, 5.0));
    }
}
