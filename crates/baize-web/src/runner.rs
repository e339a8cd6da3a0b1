use baize_engine::{
    Game, GameConfig, EngineContext,
    InputEvent, InputQueue, FixedTimestep,
};

/// Generic game runner that wires up the engine loop.
///
/// Each concrete game creates a `thread_local!` GameRunner and exports free
/// functions via `#[wasm_bindgen]`, because wasm-bindgen cannot export
/// generic structs directly.
pub struct GameRunner<G: Game> {
    game: G,
    ctx: EngineContext,
    input: InputQueue,
    /// Handed to every fixed step after the first of a frame, so input is
    /// applied exactly once.
    no_input: InputQueue,
    timestep: FixedTimestep,
    config: GameConfig,
    initialized: bool,
}

impl<G: Game> GameRunner<G> {
    pub fn new(game: G) -> Self {
        let config = game.config();
        let timestep = FixedTimestep::new(config.fixed_dt);

        Self {
            game,
            ctx: EngineContext::from_config(&config),
            input: InputQueue::new(),
            no_input: InputQueue::new(),
            timestep,
            config,
            initialized: false,
        }
    }

    /// Initialize the game. Call once after construction.
    pub fn init(&mut self) {
        self.config = self.game.config();
        self.game.init(&mut self.ctx);
        self.initialized = true;
    }

    /// Hand a JSON settings document to the game. The world size may change
    /// as a result, so the config is re-read.
    pub fn load_settings(&mut self, json: &str) {
        self.game.load_settings(&mut self.ctx, json);
        self.config = self.game.config();
    }

    /// Push an input event into the queue.
    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    /// Run one frame tick: for every fixed step, update the game, step
    /// physics and advance the clock.
    pub fn tick(&mut self, dt: f32) {
        if !self.initialized {
            return;
        }

        // Clear per-frame transient data
        self.ctx.clear_frame_data();

        let steps = self.timestep.accumulate(dt);
        for step in 0..steps {
            let input = if step == 0 { &self.input } else { &self.no_input };
            self.game.update(&mut self.ctx, input);
            #[cfg(feature = "physics")]
            self.ctx.step_physics();
            self.ctx.clock.advance(self.timestep.dt());
        }

        // Input that arrived during a frame too short for a step waits
        // for the next one.
        if steps > 0 {
            self.input.drain();
        }
    }

    // ---- Pointer accessors for zero-copy reads ----

    pub fn draw_primitives_ptr(&self) -> *const f32 {
        self.ctx.draw.primitives_ptr()
    }

    pub fn draw_primitive_count(&self) -> u32 {
        self.ctx.draw.primitive_count() as u32
    }

    /// Text labels for this frame, or an empty array if serialisation fails.
    pub fn draw_labels_json(&self) -> String {
        self.ctx.draw.labels_json().unwrap_or_else(|err| {
            log::warn!("failed to serialise text labels: {err}");
            String::from("[]")
        })
    }

    pub fn game_events_ptr(&self) -> *const f32 {
        self.ctx.events.as_ptr() as *const f32
    }

    pub fn game_events_len(&self) -> u32 {
        self.ctx.events.len() as u32
    }

    pub fn world_width(&self) -> f32 {
        self.config.world_width
    }

    pub fn world_height(&self) -> f32 {
        self.config.world_height
    }

    pub fn max_events(&self) -> u32 {
        self.config.max_events as u32
    }

    pub fn now_ms(&self) -> f64 {
        self.ctx.now_ms()
    }

    pub fn game(&self) -> &G {
        &self.game
    }

    pub fn context(&self) -> &EngineContext {
        &self.ctx
    }
}
