//! Shot preview: traces the cue ball's line off the cushions until it meets
//! another ball.

use glam::Vec2;

use crate::geometry::{ray_circle, ray_rect, reflect, Rect};

pub const MAX_BOUNCES: usize = 5;
/// Length of the final segment when nothing is hit.
pub const FAR_DISTANCE: f32 = 1000.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub from: Vec2,
    pub to: Vec2,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Trajectory {
    pub segments: Vec<Segment>,
    /// Where the line first meets a ball, if it does.
    pub contact: Option<Vec2>,
}

enum Hit {
    Cushion { point: Vec2, normal: Vec2 },
    Ball { point: Vec2 },
}

/// Trace from `origin` along the unit direction `dir`.
///
/// `cushions` are struck and reflected off; `balls` are circles of
/// `ball_radius` (the cue ball must not be among them) and end the trace.
pub fn predict(
    origin: Vec2,
    dir: Vec2,
    cushions: &[Rect],
    balls: &[Vec2],
    ball_radius: f32,
) -> Trajectory {
    let mut trajectory = Trajectory::default();
    let mut pos = origin;
    let mut dir = dir;

    for _ in 0..MAX_BOUNCES {
        match closest_hit(pos, dir, cushions, balls, ball_radius) {
            Some(Hit::Cushion { point, normal }) => {
                trajectory.segments.push(Segment { from: pos, to: point });
                dir = reflect(dir, normal);
                pos = point;
            }
            Some(Hit::Ball { point }) => {
                trajectory.segments.push(Segment { from: pos, to: point });
                trajectory.contact = Some(point);
                break;
            }
            None => {
                trajectory.segments.push(Segment {
                    from: pos,
                    to: pos + dir * FAR_DISTANCE,
                });
                break;
            }
        }
    }

    trajectory
}

fn closest_hit(
    origin: Vec2,
    dir: Vec2,
    cushions: &[Rect],
    balls: &[Vec2],
    ball_radius: f32,
) -> Option<Hit> {
    let mut best: Option<(f32, Hit)> = None;

    for cushion in cushions {
        if let Some(hit) = ray_rect(origin, dir, cushion) {
            if best.as_ref().map_or(true, |(d, _)| hit.distance < *d) {
                best = Some((hit.distance, Hit::Cushion { point: hit.point, normal: hit.normal }));
            }
        }
    }

    for &center in balls {
        if let Some(t) = ray_circle(origin, dir, center, ball_radius) {
            if best.as_ref().map_or(true, |(d, _)| t < *d) {
                best = Some((t, Hit::Ball { point: origin + dir * t }));
            }
        }
    }

    best.map(|(_, hit)| hit)
}
