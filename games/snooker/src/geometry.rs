//! Ray casting against circles, segments and axis-aligned rectangles.
//!
//! Distances are ray parameters: with a unit direction they are world units.

use glam::Vec2;

/// Hits closer than this are ignored, so a ray leaving a surface does not
/// immediately hit it again.
pub const HIT_EPSILON: f32 = 0.001;

/// Denominators below this make a ray and a segment parallel.
const PARALLEL_EPSILON: f32 = 1e-6;

/// Distance along the ray to the near intersection with a circle.
///
/// Only the nearer root is considered: a ray starting inside the circle
/// reports no hit.
pub fn ray_circle(origin: Vec2, dir: Vec2, center: Vec2, radius: f32) -> Option<f32> {
    let oc = origin - center;
    let a = dir.dot(dir);
    let b = 2.0 * oc.dot(dir);
    let c = oc.dot(oc) - radius * radius;
    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 || a == 0.0 {
        return None;
    }
    let t = (-b - discriminant.sqrt()) / (2.0 * a);
    (t > HIT_EPSILON).then_some(t)
}

/// Distance along the ray to the segment `p1..p2`, if the ray crosses it.
pub fn ray_segment(origin: Vec2, dir: Vec2, p1: Vec2, p2: Vec2) -> Option<f32> {
    let v1 = origin - p1;
    let v2 = p2 - p1;
    let v3 = Vec2::new(-dir.y, dir.x);

    let denom = v2.dot(v3);
    if denom.abs() < PARALLEL_EPSILON {
        return None;
    }

    let t_ray = v2.perp_dot(v1) / denom;
    let t_seg = v1.dot(v3) / denom;
    (t_ray >= 0.0 && (0.0..=1.0).contains(&t_seg)).then_some(t_ray)
}

/// Reflect `dir` about a surface with unit normal `normal`.
pub fn reflect(dir: Vec2, normal: Vec2) -> Vec2 {
    dir - 2.0 * dir.dot(normal) * normal
}

/// Axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

/// One side of a rectangle with its outward normal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub from: Vec2,
    pub to: Vec2,
    pub normal: Vec2,
}

/// Where a ray struck a rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeHit {
    pub distance: f32,
    pub point: Vec2,
    pub normal: Vec2,
}

impl Rect {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    pub fn from_center_size(center: Vec2, size: Vec2) -> Self {
        let half = size * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    /// Top, right, bottom, left.
    pub fn edges(&self) -> [Edge; 4] {
        let (min, max) = (self.min, self.max);
        [
            Edge { from: min, to: Vec2::new(max.x, min.y), normal: Vec2::NEG_Y },
            Edge { from: Vec2::new(max.x, min.y), to: max, normal: Vec2::X },
            Edge { from: max, to: Vec2::new(min.x, max.y), normal: Vec2::Y },
            Edge { from: Vec2::new(min.x, max.y), to: min, normal: Vec2::NEG_X },
        ]
    }
}

/// Nearest edge of `rect` hit by the ray, further than [`HIT_EPSILON`].
pub fn ray_rect(origin: Vec2, dir: Vec2, rect: &Rect) -> Option<EdgeHit> {
    rect.edges()
        .iter()
        .filter_map(|edge| {
            let distance = ray_segment(origin, dir, edge.from, edge.to)?;
            (distance > HIT_EPSILON).then(|| EdgeHit {
                distance,
                point: origin + dir * distance,
                normal: edge.normal,
            })
        })
        .min_by(|a, b| a.distance.total_cmp(&b.distance))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn ray_hits_circle_near_side() {
        let t = ray_circle(Vec2::ZERO, Vec2::X, Vec2::new(10.0, 0.0), 2.0).unwrap();
        assert!(close(t, 8.0));
    }

    #[test]
    fn ray_misses_circle_behind_or_beside() {
        assert!(ray_circle(Vec2::ZERO, Vec2::X, Vec2::new(-10.0, 0.0), 2.0).is_none());
        assert!(ray_circle(Vec2::ZERO, Vec2::X, Vec2::new(10.0, 5.0), 2.0).is_none());
    }

    #[test]
    fn ray_from_inside_circle_is_a_miss() {
        assert!(ray_circle(Vec2::new(10.0, 0.0), Vec2::X, Vec2::new(10.0, 0.0), 2.0).is_none());
    }

    #[test]
    fn ray_crosses_segment() {
        let t = ray_segment(
            Vec2::ZERO,
            Vec2::X,
            Vec2::new(5.0, -1.0),
            Vec2::new(5.0, 1.0),
        )
        .unwrap();
        assert!(close(t, 5.0));
    }

    #[test]
    fn ray_segment_rejects_parallel_and_out_of_range() {
        // Parallel
        assert!(ray_segment(Vec2::ZERO, Vec2::X, Vec2::new(0.0, 1.0), Vec2::new(5.0, 1.0)).is_none());
        // Segment beyond its end
        assert!(ray_segment(Vec2::ZERO, Vec2::X, Vec2::new(5.0, 1.0), Vec2::new(5.0, 3.0)).is_none());
        // Behind the origin
        assert!(ray_segment(Vec2::ZERO, Vec2::X, Vec2::new(-5.0, -1.0), Vec2::new(-5.0, 1.0)).is_none());
    }

    #[test]
    fn reflection_preserves_length() {
        let d = Vec2::new(3.0, -4.0);
        let r = reflect(d, Vec2::NEG_Y);
        assert_eq!(r, Vec2::new(3.0, 4.0));
        assert!(close(r.length(), d.length()));

        let diagonal = reflect(Vec2::new(1.0, 0.0), Vec2::new(-1.0, 1.0).normalize());
        assert!(close(diagonal.length(), 1.0));
        assert!(close(diagonal.x, 0.0));
        assert!(close(diagonal.y, 1.0));
    }

    #[test]
    fn rect_edges_have_outward_normals() {
        let rect = Rect::new(Vec2::ZERO, Vec2::new(10.0, 4.0));
        for edge in rect.edges() {
            let mid = (edge.from + edge.to) * 0.5;
            assert!(!rect.contains(mid + edge.normal * 0.1));
            assert!(rect.contains(mid - edge.normal * 0.1));
        }
    }

    #[test]
    fn ray_rect_reports_nearest_edge() {
        let rect = Rect::from_center_size(Vec2::new(20.0, 0.0), Vec2::new(4.0, 10.0));
        let hit = ray_rect(Vec2::ZERO, Vec2::X, &rect).unwrap();
        assert!(close(hit.distance, 18.0));
        assert_eq!(hit.normal, Vec2::NEG_X);
        assert!(close(hit.point.x, 18.0));
    }

    #[test]
    fn ray_leaving_an_edge_ignores_it() {
        let rect = Rect::new(Vec2::new(0.0, -10.0), Vec2::new(100.0, 0.0));
        // Origin on the bottom edge, travelling away from the rectangle.
        let hit = ray_rect(Vec2::new(50.0, 0.0), Vec2::Y, &rect);
        assert!(hit.is_none());
    }
}
