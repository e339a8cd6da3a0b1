//! Rack builder for the three table modes.

use glam::Vec2;
use rand::Rng;
use thiserror::Error;

use crate::balls::{BallKind, Colour};
use crate::table::TableLayout;

pub const RED_COUNT: usize = 15;
const TRIANGLE_ROWS: usize = 5;
/// Row and column spacing of the triangle, in ball radii.
const TRIANGLE_SPACING: f32 = 2.1;
/// Extra gap between the pink and the apex red.
const APEX_GAP: f32 = 2.0;

/// How the table is set up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableMode {
    /// Reds in a triangle behind the pink, colours on their spots.
    Triangle,
    /// Reds and colours anywhere on the table.
    Random,
    /// Reds anywhere, colours on their spots.
    RandomReds,
}

impl TableMode {
    /// Mode bound to a key (`1`, `2`, `3`).
    pub fn from_key_code(key_code: u32) -> Option<Self> {
        match key_code {
            49 => Some(TableMode::Triangle),
            50 => Some(TableMode::Random),
            51 => Some(TableMode::RandomReds),
            _ => None,
        }
    }

    pub fn number(self) -> u32 {
        match self {
            TableMode::Triangle => 1,
            TableMode::Random => 2,
            TableMode::RandomReds => 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RackError {
    #[error("no room for random balls: region is {width} x {height}")]
    EmptyRegion { width: f32, height: f32 },
    #[error("triangle runs past the cushion: back row at x={back_row_x}, cushion at x={cushion_x}")]
    TriangleOverflow { back_row_x: f32, cushion_x: f32 },
}

/// A ball to be placed when racking.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub kind: BallKind,
    pub pos: Vec2,
}

/// Object ball positions for `mode`. The cue ball is not included.
///
/// Random modes place balls independently and may overlap them.
pub fn build<R: Rng + ?Sized>(
    mode: TableMode,
    layout: &TableLayout,
    rng: &mut R,
) -> Result<Vec<Placement>, RackError> {
    let mut placements = Vec::with_capacity(RED_COUNT + Colour::SEQUENCE.len());

    let reds = match mode {
        TableMode::Triangle => triangle(layout)?,
        TableMode::Random | TableMode::RandomReds => scatter(layout, RED_COUNT, rng)?,
    };
    placements.extend(reds.into_iter().map(|pos| Placement { kind: BallKind::Red, pos }));

    let colours = match mode {
        TableMode::Triangle | TableMode::RandomReds => Colour::SEQUENCE
            .iter()
            .map(|&c| layout.spot(c))
            .collect(),
        TableMode::Random => scatter(layout, Colour::SEQUENCE.len(), rng)?,
    };
    placements.extend(
        Colour::SEQUENCE
            .iter()
            .zip(colours)
            .map(|(&colour, pos)| Placement { kind: BallKind::Colour(colour), pos }),
    );

    Ok(placements)
}

/// Fifteen reds in five rows, apex towards the pink.
pub fn triangle(layout: &TableLayout) -> Result<Vec<Vec2>, RackError> {
    let r = layout.ball_radius;
    let spacing = r * TRIANGLE_SPACING;
    let pink = layout.spot(Colour::Pink);
    let apex_x = pink.x + r * 2.0 + APEX_GAP;

    let back_row_x = apex_x + (TRIANGLE_ROWS - 1) as f32 * spacing;
    let cushion_x = layout.surface().max.x;
    if back_row_x + r > cushion_x {
        return Err(RackError::TriangleOverflow { back_row_x, cushion_x });
    }

    let mut reds = Vec::with_capacity(RED_COUNT);
    for row in 0..TRIANGLE_ROWS {
        let x = apex_x + row as f32 * spacing;
        for i in 0..=row {
            let y = pink.y + (i as f32 - row as f32 / 2.0) * spacing;
            reds.push(Vec2::new(x, y));
        }
    }
    Ok(reds)
}

/// `count` uniform positions, kept two pocket radii off every cushion.
fn scatter<R: Rng + ?Sized>(
    layout: &TableLayout,
    count: usize,
    rng: &mut R,
) -> Result<Vec<Vec2>, RackError> {
    let surface = layout.surface();
    let inset = Vec2::splat(layout.pocket_radius * 2.0);
    let min = surface.min + inset;
    let max = surface.max - inset;
    if !(min.x < max.x && min.y < max.y) {
        let size = max - min;
        return Err(RackError::EmptyRegion { width: size.x, height: size.y });
    }

    Ok((0..count)
        .map(|_| Vec2::new(rng.random_range(min.x..max.x), rng.random_range(min.y..max.y)))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn layout() -> TableLayout {
        TableLayout::new(1200.0, 600.0, 20.0)
    }

    fn count(placements: &[Placement], kind: BallKind) -> usize {
        placements.iter().filter(|p| p.kind == kind).count()
    }

    #[test]
    fn key_codes_select_modes() {
        assert_eq!(TableMode::from_key_code(49), Some(TableMode::Triangle));
        assert_eq!(TableMode::from_key_code(51), Some(TableMode::RandomReds));
        assert_eq!(TableMode::from_key_code(32), None);
        assert_eq!(TableMode::Random.number(), 2);
    }

    #[test]
    fn triangle_has_fifteen_reds_behind_the_pink() {
        let layout = layout();
        let reds = triangle(&layout).unwrap();
        assert_eq!(reds.len(), RED_COUNT);

        let pink = layout.spot(Colour::Pink);
        let apex = reds[0];
        assert!((apex.x - (pink.x + 2.0 * layout.ball_radius + 2.0)).abs() < 1e-3);
        assert_eq!(apex.y, pink.y);
        // Back row is five wide and symmetric about the pink line.
        let back: Vec<Vec2> = reds[10..].to_vec();
        assert!((back[0].y + back[4].y - 2.0 * pink.y).abs() < 1e-3);
    }

    #[test]
    fn triangle_balls_do_not_overlap() {
        let layout = layout();
        let reds = triangle(&layout).unwrap();
        for (i, a) in reds.iter().enumerate() {
            for b in &reds[i + 1..] {
                assert!(a.distance(*b) >= 2.0 * layout.ball_radius);
            }
        }
    }

    #[test]
    fn triangle_mode_spots_the_colours() {
        let layout = layout();
        let mut rng = SmallRng::seed_from_u64(7);
        let placements = build(TableMode::Triangle, &layout, &mut rng).unwrap();
        assert_eq!(count(&placements, BallKind::Red), 15);
        for colour in Colour::SEQUENCE {
            let p = placements
                .iter()
                .find(|p| p.kind == BallKind::Colour(colour))
                .unwrap();
            assert_eq!(p.pos, layout.spot(colour));
        }
    }

    #[test]
    fn random_modes_stay_inside_the_inset() {
        let layout = layout();
        let surface = layout.surface();
        let inset = layout.pocket_radius * 2.0;
        let mut rng = SmallRng::seed_from_u64(42);
        for mode in [TableMode::Random, TableMode::RandomReds] {
            let placements = build(mode, &layout, &mut rng).unwrap();
            assert_eq!(placements.len(), 21);
            for p in placements.iter().filter(|p| p.kind == BallKind::Red) {
                assert!(p.pos.x >= surface.min.x + inset && p.pos.x <= surface.max.x - inset);
                assert!(p.pos.y >= surface.min.y + inset && p.pos.y <= surface.max.y - inset);
            }
        }
    }

    #[test]
    fn random_reds_keeps_colours_on_spots() {
        let layout = layout();
        let mut rng = SmallRng::seed_from_u64(1);
        let placements = build(TableMode::RandomReds, &layout, &mut rng).unwrap();
        let black = placements
            .iter()
            .find(|p| p.kind == BallKind::Colour(Colour::Black))
            .unwrap();
        assert_eq!(black.pos, layout.spot(Colour::Black));
    }

    #[test]
    fn seeded_racks_repeat() {
        let layout = layout();
        let a = build(TableMode::Random, &layout, &mut SmallRng::seed_from_u64(9)).unwrap();
        let b = build(TableMode::Random, &layout, &mut SmallRng::seed_from_u64(9)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn tiny_canvas_cannot_hold_the_triangle() {
        let layout = TableLayout::new(10.0, 5.0, 20.0);
        let err = triangle(&layout).unwrap_err();
        assert!(matches!(err, RackError::TriangleOverflow { .. }));
    }
}
