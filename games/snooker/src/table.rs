//! Table layout: every measurement is derived from the canvas size so the
//! whole table scales with `length`.

use glam::Vec2;

use crate::balls::Colour;
use crate::geometry::Rect;

/// Share of the canvas width taken by the playing surface.
const LENGTH_RATIO: f32 = 0.9;
/// Baulk line distance from the left cushion, as a share of the length.
const BAULK_RATIO: f32 = 0.2;
/// Black spot distance from the right cushion, as a share of the length.
const BLACK_SPOT_RATIO: f32 = 0.05;

/// Table geometry for one canvas size. Built on every mode selection.
#[derive(Debug, Clone, PartialEq)]
pub struct TableLayout {
    pub center: Vec2,
    /// Long side of the playing surface.
    pub length: f32,
    /// Short side of the playing surface, half the length.
    pub width: f32,
    pub ball_radius: f32,
    pub pocket_radius: f32,
    pub baulk_line_x: f32,
    pub d_radius: f32,
    /// Top-left, top-right, bottom-left, bottom-right, top-middle, bottom-middle.
    pub pockets: [Vec2; 6],
    /// Left, right, top, bottom; outside the playing surface.
    pub cushions: [Rect; 4],
    pub cushion_thickness: f32,
    spots: [Vec2; 6],
}

impl TableLayout {
    pub fn new(canvas_width: f32, canvas_height: f32, cushion_thickness: f32) -> Self {
        let center = Vec2::new(canvas_width / 2.0, canvas_height / 2.0);
        let length = canvas_width * LENGTH_RATIO;
        let width = length / 2.0;
        let ball_radius = width / 72.0;
        let pocket_radius = ball_radius * 1.5;
        let d_radius = width / 4.0;

        let left = center.x - length / 2.0;
        let right = center.x + length / 2.0;
        let top = center.y - width / 2.0;
        let bottom = center.y + width / 2.0;
        let baulk_line_x = left + length * BAULK_RATIO;

        let pockets = [
            Vec2::new(left, top),
            Vec2::new(right, top),
            Vec2::new(left, bottom),
            Vec2::new(right, bottom),
            Vec2::new(center.x, top),
            Vec2::new(center.x, bottom),
        ];

        let t = cushion_thickness;
        let cushions = [
            Rect::from_center_size(
                Vec2::new(left - t / 2.0, center.y),
                Vec2::new(t, width + t),
            ),
            Rect::from_center_size(
                Vec2::new(right + t / 2.0, center.y),
                Vec2::new(t, width + t),
            ),
            Rect::from_center_size(
                Vec2::new(center.x, top - t / 2.0),
                Vec2::new(length + t, t),
            ),
            Rect::from_center_size(
                Vec2::new(center.x, bottom + t / 2.0),
                Vec2::new(length + t, t),
            ),
        ];

        let blue = center;
        let black = Vec2::new(right - length * BLACK_SPOT_RATIO, center.y);
        // Indexed by `Colour as usize`.
        let spots = [
            Vec2::new(baulk_line_x, center.y - d_radius),
            Vec2::new(baulk_line_x, center.y + d_radius),
            Vec2::new(baulk_line_x, center.y),
            blue,
            (blue + black) / 2.0,
            black,
        ];

        Self {
            center,
            length,
            width,
            ball_radius,
            pocket_radius,
            baulk_line_x,
            d_radius,
            pockets,
            cushions,
            cushion_thickness,
            spots,
        }
    }

    /// The playing surface, inside the cushions.
    pub fn surface(&self) -> Rect {
        Rect::from_center_size(self.center, Vec2::new(self.length, self.width))
    }

    pub fn spot(&self, colour: Colour) -> Vec2 {
        self.spots[colour as usize]
    }

    /// Centre of the D: the baulk line at mid width.
    pub fn d_center(&self) -> Vec2 {
        Vec2::new(self.baulk_line_x, self.center.y)
    }

    /// Where the cue ball waits after a new rack.
    pub fn cue_start(&self) -> Vec2 {
        Vec2::new(self.baulk_line_x - self.d_radius / 2.0, self.center.y)
    }

    /// Where the cue ball goes after being potted.
    pub fn cue_return(&self) -> Vec2 {
        Vec2::new(self.baulk_line_x - self.d_radius, self.center.y)
    }

    /// Strictly inside the D half disc, on the baulk side.
    pub fn point_in_d_zone(&self, p: Vec2) -> bool {
        p.distance(self.d_center()) < self.d_radius && p.x <= self.baulk_line_x
    }

    /// Clamp a point into the D. X is clamped to the baulk line first; a point
    /// still further than `d_radius` from the D centre is projected onto the
    /// arc along its own direction.
    pub fn constrain_to_d_zone(&self, p: Vec2) -> Vec2 {
        let center = self.d_center();
        let clamped = Vec2::new(p.x.min(self.baulk_line_x), p.y);
        let offset = clamped - center;
        if offset.length() > self.d_radius {
            center + offset.normalize() * self.d_radius
        } else {
            clamped
        }
    }

    /// Index of the pocket whose centre is within `pocket_radius` of `p`.
    pub fn pocket_at(&self, p: Vec2) -> Option<usize> {
        self.pockets
            .iter()
            .position(|pocket| pocket.distance(p) < self.pocket_radius)
    }
}
