use crate::core::scene::Scene;
use crate::core::time::Clock;
use crate::api::types::{EntityId, GameEvent};
use crate::draw::list::DrawList;
use crate::input::queue::InputQueue;
#[cfg(feature = "physics")]
use crate::core::physics::{
    PhysicsWorld, BodyDesc, ColliderMaterial, CollisionPair,
};
#[cfg(feature = "physics")]
use crate::components::entity::Entity;
#[cfg(feature = "physics")]
use glam::Vec2;

/// Configuration for the engine, provided by the game.
#[derive(Debug, Clone)]
pub struct GameConfig {
    /// Fixed timestep in seconds (default: 1/60).
    pub fixed_dt: f32,
    /// World width in game units.
    pub world_width: f32,
    /// World height in game units.
    pub world_height: f32,
    /// Maximum number of game events per frame (default: 32).
    pub max_events: usize,
    /// Gravity vector for physics simulation. Default: zero (top-down table).
    #[cfg(feature = "physics")]
    pub gravity: glam::Vec2,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            fixed_dt: 1.0 / 60.0,
            world_width: 800.0,
            world_height: 600.0,
            max_events: 32,
            #[cfg(feature = "physics")]
            gravity: glam::Vec2::ZERO,
        }
    }
}

/// The core contract every game must fulfill.
pub trait Game {
    /// Return engine configuration. Called once before init.
    fn config(&self) -> GameConfig {
        GameConfig::default()
    }

    /// Setup initial state, spawn entities, configure the scene.
    fn init(&mut self, ctx: &mut EngineContext);

    /// The game loop tick. Handle input, apply impulses, judge the outcome
    /// of the previous physics step, record draw commands.
    fn update(&mut self, ctx: &mut EngineContext, input: &InputQueue);

    /// Apply host-provided settings (JSON). Games without settings ignore it.
    fn load_settings(&mut self, _ctx: &mut EngineContext, _json: &str) {}
}

/// Mutable access to engine state, passed to Game::init and Game::update.
pub struct EngineContext {
    pub scene: Scene,
    pub draw: DrawList,
    pub events: Vec<GameEvent>,
    pub clock: Clock,
    next_id: u32,
    #[cfg(feature = "physics")]
    pub physics: PhysicsWorld,
    #[cfg(feature = "physics")]
    collision_events: Vec<CollisionPair>,
}

impl EngineContext {
    pub fn new() -> Self {
        Self {
            scene: Scene::new(),
            draw: DrawList::new(),
            events: Vec::new(),
            clock: Clock::new(),
            next_id: 1,
            #[cfg(feature = "physics")]
            physics: PhysicsWorld::new(Vec2::ZERO),
            #[cfg(feature = "physics")]
            collision_events: Vec::new(),
        }
    }

    /// Create an EngineContext configured from a GameConfig.
    pub fn from_config(config: &GameConfig) -> Self {
        #[allow(unused_mut)]
        let mut ctx = Self::new();
        #[cfg(feature = "physics")]
        {
            ctx.physics = PhysicsWorld::new(config.gravity);
            ctx.physics.set_dt(config.fixed_dt);
        }
        ctx.events.reserve(config.max_events);
        ctx
    }

    /// Generate the next unique entity ID.
    pub fn next_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Current time on the game clock, in milliseconds.
    pub fn now_ms(&self) -> f64 {
        self.clock.now_ms()
    }

    /// Emit a game event to be forwarded to the host page.
    pub fn emit_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Clear per-frame transient data. Collision events are kept: they
    /// belong to the last physics step and are read by the next update.
    pub fn clear_frame_data(&mut self) {
        self.events.clear();
    }

    // -- Physics convenience methods --

    /// Spawn an entity with a physics body. Returns the EntityId.
    /// The entity's position is set from the BodyDesc.
    #[cfg(feature = "physics")]
    pub fn spawn_with_body(
        &mut self,
        entity: Entity,
        desc: BodyDesc,
        material: ColliderMaterial,
    ) -> EntityId {
        let id = entity.id;
        let body = self.physics.create_body(id, &desc, material);
        let entity = entity.with_pos(desc.position).with_body(body);
        self.scene.spawn(entity);
        id
    }

    /// Despawn an entity, cleaning up its physics body if present.
    /// Returns `false` if the entity did not exist.
    #[cfg(feature = "physics")]
    pub fn despawn(&mut self, id: EntityId) -> bool {
        match self.scene.despawn(id) {
            Some(entity) => {
                if let Some(body) = &entity.body {
                    self.physics.remove_body(body);
                }
                true
            }
            None => false,
        }
    }

    /// Apply an instantaneous impulse through the centre of an entity's body.
    #[cfg(feature = "physics")]
    pub fn apply_impulse(&mut self, id: EntityId, impulse: Vec2) {
        if let Some(body) = self.scene.get(id).and_then(|e| e.body) {
            self.physics.apply_impulse(&body, impulse);
        }
    }

    /// Set the linear velocity of an entity's physics body.
    #[cfg(feature = "physics")]
    pub fn set_velocity(&mut self, id: EntityId, vel: Vec2) {
        if let Some(body) = self.scene.get(id).and_then(|e| e.body) {
            self.physics.set_velocity(&body, vel);
        }
    }

    /// Get the linear velocity of an entity's physics body.
    #[cfg(feature = "physics")]
    pub fn velocity(&self, id: EntityId) -> Vec2 {
        self.scene
            .get(id)
            .and_then(|e| e.body.as_ref())
            .map(|body| self.physics.velocity(body))
            .unwrap_or(Vec2::ZERO)
    }

    /// Move an entity and its body to `pos` at rest: velocity and spin are
    /// zeroed and the entity position is updated immediately, without
    /// waiting for the next physics sync.
    #[cfg(feature = "physics")]
    pub fn place_at_rest(&mut self, id: EntityId, pos: Vec2) {
        if let Some(entity) = self.scene.get_mut(id) {
            entity.pos = pos;
            if let Some(body) = entity.body {
                self.physics.set_position(&body, pos);
                self.physics.set_velocity(&body, Vec2::ZERO);
                self.physics.set_angular_velocity(&body, 0.0);
            }
        }
    }

    /// Get collision events from the most recent physics step.
    #[cfg(feature = "physics")]
    pub fn collisions(&self) -> &[CollisionPair] {
        &self.collision_events
    }

    /// Step the physics simulation and sync positions back to entities.
    /// Called by the game runner after `Game::update()`.
    #[cfg(feature = "physics")]
    pub fn step_physics(&mut self) {
        self.collision_events.clear();
        self.physics.step_into(&mut self.collision_events);

        for entity in self.scene.iter_mut() {
            if let Some(body) = &entity.body {
                let (pos, rot) = self.physics.body_position(body);
                entity.pos = pos;
                entity.rotation = rot;
            }
        }
    }
}

impl Default for EngineContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[cfg(feature = "physics")]
mod physics_tests {
    use super::*;
    use crate::core::physics::{BodyDesc, ColliderDesc, ColliderMaterial};

    fn spawn_ball(ctx: &mut EngineContext, pos: Vec2) -> EntityId {
        let id = ctx.next_id();
        let desc = BodyDesc::dynamic(ColliderDesc::Ball { radius: 10.0 }).with_position(pos);
        ctx.spawn_with_body(Entity::new(id), desc, ColliderMaterial::default())
    }

    #[test]
    fn spawn_with_body_creates_entity_and_physics() {
        let mut ctx = EngineContext::new();
        let id = spawn_ball(&mut ctx, Vec2::new(100.0, 200.0));

        assert_eq!(ctx.scene.len(), 1);
        assert_eq!(ctx.physics.body_count(), 1);
        let entity = ctx.scene.get(id).unwrap();
        assert!(entity.body.is_some());
        assert_eq!(entity.pos, Vec2::new(100.0, 200.0));
    }

    #[test]
    fn despawn_cleans_up_physics() {
        let mut ctx = EngineContext::new();
        let id = spawn_ball(&mut ctx, Vec2::ZERO);

        assert!(ctx.despawn(id));
        assert_eq!(ctx.scene.len(), 0);
        assert_eq!(ctx.physics.body_count(), 0);
        assert!(!ctx.despawn(id));
    }

    #[test]
    fn impulse_moves_the_body_at_once() {
        let mut ctx = EngineContext::from_config(&GameConfig::default());
        let id = spawn_ball(&mut ctx, Vec2::ZERO);
        ctx.apply_impulse(id, Vec2::new(0.0, 500.0));
        assert!(ctx.velocity(id).y > 0.0);
        assert_eq!(ctx.velocity(EntityId(999)), Vec2::ZERO);
    }

    #[test]
    fn step_physics_syncs_positions() {
        let mut ctx = EngineContext::from_config(&GameConfig::default());
        let id = spawn_ball(&mut ctx, Vec2::new(100.0, 0.0));
        ctx.set_velocity(id, Vec2::new(0.0, 120.0));

        for _ in 0..10 {
            ctx.step_physics();
        }

        let entity = ctx.scene.get(id).unwrap();
        assert!(entity.pos.y > 0.0, "Entity should have moved: y={}", entity.pos.y);
    }

    #[test]
    fn place_at_rest_stops_and_moves() {
        let mut ctx = EngineContext::from_config(&GameConfig::default());
        let id = spawn_ball(&mut ctx, Vec2::ZERO);
        ctx.set_velocity(id, Vec2::new(300.0, 0.0));

        ctx.place_at_rest(id, Vec2::new(40.0, 60.0));
        assert_eq!(ctx.scene.get(id).unwrap().pos, Vec2::new(40.0, 60.0));
        assert_eq!(ctx.velocity(id), Vec2::ZERO);

        ctx.step_physics();
        let pos = ctx.scene.get(id).unwrap().pos;
        assert!((pos - Vec2::new(40.0, 60.0)).length() < 0.001);
    }
}
