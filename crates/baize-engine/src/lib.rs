pub mod api;
pub mod core;
pub mod components;
pub mod input;
pub mod draw;

// Re-export key types at crate root for convenience
pub use api::game::{Game, GameConfig, EngineContext};
pub use api::types::{EntityId, GameEvent};
pub use components::entity::Entity;
pub use core::scene::Scene;
pub use core::time::{Clock, FixedTimestep};
pub use input::queue::{InputEvent, InputQueue};
pub use draw::list::{DrawColor, DrawList, DrawPrimitive, TextAlign, TextLabel};

#[cfg(feature = "physics")]
pub use core::physics::{
    PhysicsWorld, PhysicsBody, BodyDesc, BodyType,
    ColliderDesc, ColliderMaterial, CollisionPair,
};
