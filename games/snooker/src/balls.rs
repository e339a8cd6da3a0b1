//! Ball identities and the registry that keeps them in step with physics.

use std::f32::consts::PI;
use std::fmt;

use glam::Vec2;
use baize_engine::{
    BodyDesc, ColliderDesc, ColliderMaterial, DrawColor, EngineContext, Entity, EntityId,
};

use crate::shot::is_moving;
use crate::table::TableLayout;

/// The six colours, in potting order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Colour {
    Yellow,
    Green,
    Brown,
    Blue,
    Pink,
    Black,
}

impl Colour {
    /// Order colours must be potted in once the reds are gone.
    pub const SEQUENCE: [Colour; 6] = [
        Colour::Yellow,
        Colour::Green,
        Colour::Brown,
        Colour::Blue,
        Colour::Pink,
        Colour::Black,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Colour::Yellow => "yellow",
            Colour::Green => "green",
            Colour::Brown => "brown",
            Colour::Blue => "blue",
            Colour::Pink => "pink",
            Colour::Black => "black",
        }
    }

    pub fn fill(self) -> DrawColor {
        match self {
            Colour::Yellow => DrawColor::rgb8(255, 255, 0),
            Colour::Green => DrawColor::rgb8(0, 128, 0),
            Colour::Brown => DrawColor::rgb8(139, 69, 19),
            Colour::Blue => DrawColor::rgb8(0, 0, 255),
            Colour::Pink => DrawColor::rgb8(255, 20, 147),
            Colour::Black => DrawColor::BLACK,
        }
    }
}

impl fmt::Display for Colour {
    /// Upper case, as shown in foul notices.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name().to_uppercase())
    }
}

/// What a ball is. Colour balls carry their colour; it is never recovered
/// from how the ball is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BallKind {
    Cue,
    Red,
    Colour(Colour),
}

impl BallKind {
    pub fn fill(self) -> DrawColor {
        match self {
            BallKind::Cue => DrawColor::WHITE,
            BallKind::Red => DrawColor::rgb8(255, 0, 0),
            BallKind::Colour(colour) => colour.fill(),
        }
    }

    fn tag(self) -> &'static str {
        match self {
            BallKind::Cue => "cue",
            BallKind::Red => "red",
            BallKind::Colour(colour) => colour.name(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ball {
    pub id: EntityId,
    pub kind: BallKind,
}

/// Physical properties shared by every ball.
#[derive(Debug, Clone, Copy)]
pub struct BallPhysics {
    pub radius: f32,
    pub material: ColliderMaterial,
    /// Felt friction.
    pub linear_damping: f32,
    pub angular_damping: f32,
}

impl BallPhysics {
    pub fn mass(&self) -> f32 {
        self.material.density * PI * self.radius * self.radius
    }
}

/// Every ball on the table. Registry membership and the physics body are
/// created and destroyed together.
pub struct BallRegistry {
    balls: Vec<Ball>,
    physics: BallPhysics,
}

impl BallRegistry {
    pub fn new(physics: BallPhysics) -> Self {
        Self {
            balls: Vec::with_capacity(22),
            physics,
        }
    }

    pub fn physics(&self) -> &BallPhysics {
        &self.physics
    }

    /// Applies to balls spawned from now on.
    pub fn set_physics(&mut self, physics: BallPhysics) {
        self.physics = physics;
    }

    /// Create a ball and its body at `pos`. There is only ever one cue ball:
    /// spawning another moves the existing one instead.
    pub fn spawn(&mut self, ctx: &mut EngineContext, kind: BallKind, pos: Vec2) -> EntityId {
        if kind == BallKind::Cue {
            if let Some(id) = self.cue() {
                ctx.place_at_rest(id, pos);
                return id;
            }
        }

        let id = ctx.next_id();
        let desc = BodyDesc::dynamic(ColliderDesc::Ball { radius: self.physics.radius })
            .with_position(pos)
            .with_linear_damping(self.physics.linear_damping)
            .with_angular_damping(self.physics.angular_damping)
            .with_ccd(true);
        ctx.spawn_with_body(Entity::new(id).with_tag(kind.tag()), desc, self.physics.material);
        self.balls.push(Ball { id, kind });
        id
    }

    /// Take an object ball off the table. The cue ball is never removed
    /// this way; use [`BallRegistry::clear`].
    pub fn remove(&mut self, ctx: &mut EngineContext, id: EntityId) -> Option<Ball> {
        let idx = self
            .balls
            .iter()
            .position(|b| b.id == id && b.kind != BallKind::Cue)?;
        let ball = self.balls.swap_remove(idx);
        ctx.despawn(id);
        Some(ball)
    }

    /// Put a ball back on `spot`, at rest.
    pub fn respot(&self, ctx: &mut EngineContext, id: EntityId, spot: Vec2) {
        ctx.place_at_rest(id, spot);
    }

    /// Remove every ball, the cue ball included.
    pub fn clear(&mut self, ctx: &mut EngineContext) {
        for ball in self.balls.drain(..) {
            ctx.despawn(ball.id);
        }
    }

    pub fn cue(&self) -> Option<EntityId> {
        self.balls
            .iter()
            .find(|b| b.kind == BallKind::Cue)
            .map(|b| b.id)
    }

    pub fn cue_position(&self, ctx: &EngineContext) -> Option<Vec2> {
        self.cue().and_then(|id| ctx.scene.get(id)).map(|e| e.pos)
    }

    pub fn kind(&self, id: EntityId) -> Option<BallKind> {
        self.balls.iter().find(|b| b.id == id).map(|b| b.kind)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Ball> {
        self.balls.iter()
    }

    pub fn len(&self) -> usize {
        self.balls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.balls.is_empty()
    }

    pub fn reds_remaining(&self) -> usize {
        self.balls.iter().filter(|b| b.kind == BallKind::Red).count()
    }

    pub fn colours_remaining(&self) -> usize {
        self.balls
            .iter()
            .filter(|b| matches!(b.kind, BallKind::Colour(_)))
            .count()
    }

    /// Positions of every ball except the cue ball.
    pub fn object_positions(&self, ctx: &EngineContext) -> Vec<Vec2> {
        self.balls
            .iter()
            .filter(|b| b.kind != BallKind::Cue)
            .filter_map(|b| ctx.scene.get(b.id))
            .map(|e| e.pos)
            .collect()
    }

    /// Balls whose centre lies within a pocket.
    pub fn pocketed(&self, ctx: &EngineContext, layout: &TableLayout) -> Vec<Ball> {
        self.balls
            .iter()
            .filter(|b| {
                ctx.scene
                    .get(b.id)
                    .is_some_and(|e| layout.pocket_at(e.pos).is_some())
            })
            .copied()
            .collect()
    }

    /// Whether any ball is still rolling, judged per tick of length `dt`.
    pub fn any_moving(&self, ctx: &EngineContext, dt: f32) -> bool {
        self.balls.iter().any(|b| is_moving(ctx.velocity(b.id), dt))
    }

    /// Strike the cue ball through its centre.
    pub fn strike_cue(&self, ctx: &mut EngineContext, impulse: Vec2) {
        if let Some(id) = self.cue() {
            ctx.apply_impulse(id, impulse);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use baize_engine::GameConfig;

    fn physics() -> BallPhysics {
        BallPhysics {
            radius: 7.5,
            material: ColliderMaterial {
                restitution: 0.9,
                friction: 0.02,
                density: 1.0,
            },
            linear_damping: 0.6,
            angular_damping: 1.0,
        }
    }

    fn setup() -> (EngineContext, BallRegistry) {
        (EngineContext::from_config(&GameConfig::default()), BallRegistry::new(physics()))
    }

    #[test]
    fn colour_names_and_sequence() {
        assert_eq!(Colour::SEQUENCE[0], Colour::Yellow);
        assert_eq!(Colour::SEQUENCE[5], Colour::Black);
        assert_eq!(Colour::Pink.to_string(), "PINK");
        assert_eq!(Colour::Brown.name(), "brown");
    }

    #[test]
    fn spawn_and_remove_keep_physics_in_step() {
        let (mut ctx, mut reg) = setup();
        let red = reg.spawn(&mut ctx, BallKind::Red, Vec2::new(100.0, 100.0));
        reg.spawn(&mut ctx, BallKind::Colour(Colour::Blue), Vec2::new(200.0, 100.0));
        assert_eq!(reg.len(), 2);
        assert_eq!(ctx.physics.body_count(), 2);

        let removed = reg.remove(&mut ctx, red).unwrap();
        assert_eq!(removed.kind, BallKind::Red);
        assert_eq!(reg.len(), 1);
        assert_eq!(ctx.physics.body_count(), 1);
        assert!(ctx.scene.get(red).is_none());
        assert_eq!(reg.reds_remaining(), 0);
        assert_eq!(reg.colours_remaining(), 1);
    }

    #[test]
    fn cue_ball_is_unique_and_not_removable() {
        let (mut ctx, mut reg) = setup();
        let cue = reg.spawn(&mut ctx, BallKind::Cue, Vec2::new(50.0, 50.0));
        let again = reg.spawn(&mut ctx, BallKind::Cue, Vec2::new(80.0, 60.0));
        assert_eq!(cue, again);
        assert_eq!(reg.len(), 1);
        assert_eq!(reg.cue_position(&ctx), Some(Vec2::new(80.0, 60.0)));

        assert!(reg.remove(&mut ctx, cue).is_none());
        assert_eq!(reg.cue(), Some(cue));
    }

    #[test]
    fn respot_stops_the_ball() {
        let (mut ctx, mut reg) = setup();
        let pink = reg.spawn(&mut ctx, BallKind::Colour(Colour::Pink), Vec2::new(10.0, 10.0));
        ctx.set_velocity(pink, Vec2::new(400.0, 0.0));
        assert!(reg.any_moving(&ctx, 1.0 / 60.0));

        reg.respot(&mut ctx, pink, Vec2::new(300.0, 300.0));
        assert_eq!(ctx.velocity(pink), Vec2::ZERO);
        assert_eq!(ctx.scene.get(pink).unwrap().pos, Vec2::new(300.0, 300.0));
        assert!(!reg.any_moving(&ctx, 1.0 / 60.0));
    }

    #[test]
    fn pocketed_uses_centre_distance() {
        let (mut ctx, mut reg) = setup();
        let layout = TableLayout::new(1200.0, 600.0, 20.0);
        let red = reg.spawn(&mut ctx, BallKind::Red, layout.pockets[4] + Vec2::new(0.0, 5.0));
        reg.spawn(&mut ctx, BallKind::Red, layout.center);

        let pocketed = reg.pocketed(&ctx, &layout);
        assert_eq!(pocketed.len(), 1);
        assert_eq!(pocketed[0].id, red);
    }

    #[test]
    fn clear_removes_everything() {
        let (mut ctx, mut reg) = setup();
        reg.spawn(&mut ctx, BallKind::Cue, Vec2::ZERO);
        reg.spawn(&mut ctx, BallKind::Red, Vec2::new(30.0, 0.0));
        reg.clear(&mut ctx);
        assert!(reg.is_empty());
        assert_eq!(reg.cue(), None);
        assert_eq!(ctx.physics.body_count(), 0);
    }

    #[test]
    fn strike_moves_the_cue_ball() {
        let (mut ctx, mut reg) = setup();
        let cue = reg.spawn(&mut ctx, BallKind::Cue, Vec2::new(100.0, 100.0));
        let mass = reg.physics().mass();
        reg.strike_cue(&mut ctx, Vec2::new(mass * 600.0, 0.0));
        let vel = ctx.velocity(cue);
        assert!((vel.x - 600.0).abs() < 1.0, "vel = {vel:?}");
    }
}
