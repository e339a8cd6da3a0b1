//! Snooker - one table, Rapier2D ball physics, turn and foul rules.
//!
//! Each tick: judge the cue ball's contacts from the last physics step, apply
//! input, judge the pockets, track motion, then record the frame's draw list.
//! Table state goes to the host as one snapshot per frame.

use std::f32::consts::FRAC_PI_2;

use glam::Vec2;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use baize_engine::input::queue::{InputEvent, InputQueue};
use baize_engine::{BodyDesc, ColliderDesc, ColliderMaterial};
use baize_engine::{DrawColor, TextAlign};
use baize_engine::{EngineContext, Entity, EntityId, Game, GameConfig, GameEvent};

use crate::balls::{BallKind, BallPhysics, BallRegistry, Colour};
use crate::predictor::{predict, Trajectory};
use crate::rack::{self, TableMode};
use crate::rules::{BallAction, Score, TurnState};
use crate::settings::SnookerSettings;
use crate::shot::{CueControl, SHOT_FORCE};
use crate::table::TableLayout;

const FIXED_DT: f32 = 1.0 / 60.0;
const FIRE_KEY: u32 = 32;

// Physics
const BALL_DENSITY: f32 = 1.0;
const BALL_ANGULAR_DAMPING: f32 = 1.0;
const CUSHION_FRICTION: f32 = 0.1;

// Table drawing
const FRAME_MARGIN: f32 = 20.0;
const LINE_WIDTH: f32 = 2.0;
const SPOT_RADIUS: f32 = 2.5;

// Cue stick
const CUE_LENGTH: f32 = 200.0;
const CUE_TIP_LENGTH: f32 = 18.0;
const CUE_GAP: f32 = 4.0;
const CUE_WIDTH: f32 = 8.0;
const CUE_TIP_WIDTH: f32 = 10.0;

// Power bar, hung below the cue ball
const POWER_BAR_WIDTH: f32 = 120.0;
const POWER_BAR_HEIGHT: f32 = 16.0;
const POWER_BAR_OFFSET: f32 = 40.0;

const CONTACT_MARKER_RADIUS: f32 = 5.0;

/// Game event kinds to the host page
mod game_events {
    /// a = reds on the table
    pub const REDS_REMAINING: f32 = 1.0;
    /// a = reds potted, b = colours potted, c = clearance position
    pub const POTTED: f32 = 2.0;
    /// a = foul code, while the notice is showing
    pub const FOUL: f32 = 3.0;
    pub const FRAME_COMPLETE: f32 = 4.0;
    /// a = mode number
    pub const MODE_CHANGED: f32 = 5.0;

    /// State events are replaced every step; the rest accumulate over a frame.
    pub fn is_snapshot(kind: f32) -> bool {
        kind == REDS_REMAINING || kind == POTTED || kind == FOUL || kind == FRAME_COMPLETE
    }
}

mod palette {
    use baize_engine::DrawColor;

    pub const FRAME: DrawColor = DrawColor::rgb(80.0 / 255.0, 42.0 / 255.0, 42.0 / 255.0);
    pub const FELT: DrawColor = DrawColor::rgb(30.0 / 255.0, 110.0 / 255.0, 30.0 / 255.0);
    pub const SPOT: DrawColor = DrawColor::rgb(40.0 / 255.0, 30.0 / 255.0, 20.0 / 255.0);
    pub const CUE_WOOD: DrawColor = DrawColor::rgb(210.0 / 255.0, 180.0 / 255.0, 140.0 / 255.0);
    pub const CUE_TIP: DrawColor = DrawColor::rgb(70.0 / 255.0, 50.0 / 255.0, 30.0 / 255.0);
    pub const CUE_BALL_IN_HAND: DrawColor = DrawColor::WHITE.with_alpha(0.7);
    pub const CUE_BALL_OUTLINE: DrawColor = DrawColor::BLACK.with_alpha(0.24);
    pub const HUD_BACKGROUND: DrawColor = DrawColor::BLACK.with_alpha(0.6);
}

pub struct SnookerGame {
    settings: SnookerSettings,
    layout: TableLayout,
    mode: Option<TableMode>,
    balls: BallRegistry,
    cushions: Vec<EntityId>,
    turn: TurnState,
    cue: CueControl,
    rng: SmallRng,
    /// Last known pointer position.
    pointer: Option<Vec2>,
    /// A rack is waiting to be reported to the host.
    announce_mode: bool,
}

impl SnookerGame {
    pub fn new() -> Self {
        Self::with_settings(SnookerSettings::default())
    }

    pub fn with_settings(settings: SnookerSettings) -> Self {
        let layout = table_layout(&settings);
        Self {
            balls: BallRegistry::new(ball_physics(&settings, &layout)),
            cue: CueControl::new(settings.cue_lag_ms),
            rng: seeded_rng(settings.seed),
            layout,
            mode: None,
            cushions: Vec::with_capacity(4),
            turn: TurnState::new(),
            pointer: None,
            announce_mode: false,
            settings,
        }
    }

    pub fn layout(&self) -> &TableLayout {
        &self.layout
    }

    pub fn mode(&self) -> Option<TableMode> {
        self.mode
    }

    pub fn turn(&self) -> &TurnState {
        &self.turn
    }

    pub fn cue_control(&self) -> &CueControl {
        &self.cue
    }

    pub fn balls(&self) -> &BallRegistry {
        &self.balls
    }

    /// Rebuild the table from scratch and rack `mode`. `None` leaves only the
    /// cue ball.
    fn reset_table(&mut self, ctx: &mut EngineContext, mode: Option<TableMode>) {
        self.balls.clear(ctx);
        for id in self.cushions.drain(..) {
            ctx.despawn(id);
        }

        self.layout = table_layout(&self.settings);
        self.balls.set_physics(ball_physics(&self.settings, &self.layout));
        self.build_cushions(ctx);

        self.turn = TurnState::new();
        self.cue = CueControl::new(self.settings.cue_lag_ms);
        self.balls.spawn(ctx, BallKind::Cue, self.layout.cue_start());
        self.mode = mode;
        self.announce_mode = mode.is_some();

        let Some(mode) = mode else {
            return;
        };
        match rack::build(mode, &self.layout, &mut self.rng) {
            Ok(placements) => {
                for placement in placements {
                    self.balls.spawn(ctx, placement.kind, placement.pos);
                }
                log::info!("Mode {} racked: {} balls", mode.number(), self.balls.len());
            }
            Err(err) => log::warn!("Mode {} could not be racked: {}", mode.number(), err),
        }
    }

    /// Four static cushions around the playing surface.
    fn build_cushions(&mut self, ctx: &mut EngineContext) {
        let material = ColliderMaterial {
            restitution: self.settings.cushion_restitution,
            friction: CUSHION_FRICTION,
            density: 1.0,
        };

        for rect in self.layout.cushions {
            let half = rect.size() / 2.0;
            let id = ctx.next_id();
            let desc = BodyDesc::fixed(ColliderDesc::Cuboid {
                half_width: half.x,
                half_height: half.y,
            })
            .with_position(rect.center());
            ctx.spawn_with_body(Entity::new(id).with_tag("cushion"), desc, material);
            self.cushions.push(id);
        }
    }

    fn handle_input(&mut self, ctx: &mut EngineContext, input: &InputQueue) {
        for event in input.iter() {
            match *event {
                InputEvent::KeyDown { key_code } => {
                    if let Some(mode) = TableMode::from_key_code(key_code) {
                        self.reset_table(ctx, Some(mode));
                    } else if key_code == FIRE_KEY {
                        self.fire(ctx);
                    }
                }
                InputEvent::PointerDown { x, y } => {
                    let p = Vec2::new(x, y);
                    self.pointer = Some(p);
                    let Some(cue_pos) = self.balls.cue_position(ctx) else {
                        continue;
                    };
                    if let Some(pos) = self.cue.pointer_down(p, cue_pos, &self.layout) {
                        self.move_cue_ball(ctx, pos);
                    }
                }
                InputEvent::PointerMove { x, y } => {
                    let p = Vec2::new(x, y);
                    self.pointer = Some(p);
                    if let Some(pos) = self.cue.pointer_move(p, &self.layout) {
                        self.move_cue_ball(ctx, pos);
                    }
                }
                InputEvent::PointerUp { x, y } => {
                    self.pointer = Some(Vec2::new(x, y));
                    self.cue.pointer_up(ctx.now_ms());
                }
                InputEvent::Wheel { delta_y } => self.cue.wheel(delta_y),
                _ => {}
            }
        }
    }

    fn move_cue_ball(&self, ctx: &mut EngineContext, pos: Vec2) {
        if let Some(id) = self.balls.cue() {
            self.balls.respot(ctx, id, pos);
        }
    }

    /// Unit direction from the cue ball towards the pointer.
    fn aim_direction(&self, cue_pos: Vec2) -> Vec2 {
        self.pointer
            .and_then(|p| (p - cue_pos).try_normalize())
            .unwrap_or(Vec2::X)
    }

    fn fire(&mut self, ctx: &mut EngineContext) {
        let Some(cue_pos) = self.balls.cue_position(ctx) else {
            return;
        };
        let aim = cue_pos + self.aim_direction(cue_pos);
        let Some(shot) = self.cue.fire(cue_pos, aim) else {
            return;
        };

        // Full strength gives the configured top speed.
        let impulse_per_strength =
            self.balls.physics().mass() * self.settings.max_shot_speed / SHOT_FORCE;
        self.balls
            .strike_cue(ctx, shot.direction * shot.strength * impulse_per_strength);
        self.turn.arm_first_contact();
        log::info!(
            "Shot at {:.0}% power towards ({:.2}, {:.2})",
            shot.strength / SHOT_FORCE * 100.0,
            shot.direction.x,
            shot.direction.y
        );
    }

    /// First cue ball contact with another ball after a shot.
    fn judge_contacts(&mut self, ctx: &EngineContext) {
        let Some(cue) = self.balls.cue() else {
            return;
        };
        let touched: Vec<BallKind> = ctx
            .collisions()
            .iter()
            .filter(|c| c.started)
            .filter_map(|c| c.other(cue))
            .filter_map(|id| self.balls.kind(id))
            .collect();

        let reds = self.balls.reds_remaining();
        for kind in touched {
            log::debug!("Cue ball contact: {:?}", kind);
            if let Some(foul) = self.turn.judge_contact(kind, reds, ctx.now_ms()) {
                log::warn!("{}", foul);
            }
        }
    }

    /// Judge every ball sitting in a pocket against the state at the start
    /// of this tick.
    fn judge_pots(&mut self, ctx: &mut EngineContext) {
        let pocketed = self.balls.pocketed(ctx, &self.layout);
        if pocketed.is_empty() {
            return;
        }

        let now = ctx.now_ms();
        let snapshot = self.turn.clone();
        let reds_at_start = self.balls.reds_remaining();

        for ball in pocketed {
            let ruling = snapshot.judge(ball.kind, reds_at_start);
            let showing = self.turn.visible_foul(now, self.settings.foul_display_ms);
            self.turn.apply(&ruling, now);

            if let Some(foul) = ruling.foul {
                // A ball left in a pocket re-fouls every tick; log it once.
                if showing != Some(foul) {
                    log::warn!("{}", foul);
                }
            }

            match ruling.action {
                BallAction::ReturnCueToD => {
                    self.cue.enter_placing();
                    self.balls.respot(ctx, ball.id, self.layout.cue_return());
                    log::info!("Cue ball potted, back in hand");
                }
                BallAction::Remove => {
                    self.balls.remove(ctx, ball.id);
                    log::info!("{:?} potted", ball.kind);
                }
                BallAction::Respot(colour) => {
                    self.balls.respot(ctx, ball.id, self.layout.spot(colour));
                    log::info!("{} re-spotted", colour.name());
                }
                BallAction::Leave => {}
            }

            if ruling.score == Score::InSequence && self.turn.frame_complete() {
                log::info!("Frame complete: all colours potted in sequence");
            }
        }
    }

    fn emit_events(&mut self, ctx: &mut EngineContext) {
        // Reported from update so a rack made during init reaches the host.
        if std::mem::take(&mut self.announce_mode) {
            if let Some(mode) = self.mode {
                ctx.emit_event(GameEvent::new(
                    game_events::MODE_CHANGED,
                    mode.number() as f32,
                    0.0,
                    0.0,
                ));
            }
        }

        ctx.events.retain(|e| !game_events::is_snapshot(e.kind));
        let now = ctx.now_ms();
        ctx.emit_event(GameEvent::new(
            game_events::REDS_REMAINING,
            self.balls.reds_remaining() as f32,
            0.0,
            0.0,
        ));
        ctx.emit_event(GameEvent::new(
            game_events::POTTED,
            self.turn.reds_potted() as f32,
            self.turn.colours_potted() as f32,
            self.turn.sequence_index() as f32,
        ));
        if let Some(foul) = self.turn.visible_foul(now, self.settings.foul_display_ms) {
            ctx.emit_event(GameEvent::new(game_events::FOUL, foul.code() as f32, 0.0, 0.0));
        }
        if self.turn.frame_complete() {
            ctx.emit_event(GameEvent::new(game_events::FRAME_COMPLETE, 0.0, 0.0, 0.0));
        }
    }

    /// Multi-bounce preview from the cue ball towards the pointer.
    pub fn preview(&self, ctx: &EngineContext) -> Option<Trajectory> {
        let cue_pos = self.balls.cue_position(ctx)?;
        Some(predict(
            cue_pos,
            self.aim_direction(cue_pos),
            &self.layout.cushions,
            &self.balls.object_positions(ctx),
            self.layout.ball_radius,
        ))
    }

    // -- Drawing --

    fn render(&self, ctx: &mut EngineContext) {
        ctx.draw.clear();
        self.draw_table(ctx);
        self.draw_balls(ctx);

        let now = ctx.now_ms();
        if self.cue.cue_visible(now) {
            if let Some(cue_pos) = self.balls.cue_position(ctx) {
                self.draw_preview(ctx);
                self.draw_cue_stick(ctx, cue_pos);
                self.draw_power_bar(ctx, cue_pos);
            }
        }

        self.draw_hud(ctx, now);
    }

    fn draw_table(&self, ctx: &mut EngineContext) {
        let layout = &self.layout;
        let surface = layout.surface();
        let margin = Vec2::splat(FRAME_MARGIN);

        ctx.draw.fill_rect(surface.min - margin, surface.size() + margin * 2.0, 0.0, palette::FRAME);
        ctx.draw.fill_rect(surface.min, surface.size(), 0.0, palette::FELT);

        for pocket in layout.pockets {
            ctx.draw.fill_circle(pocket, layout.pocket_radius, DrawColor::BLACK);
        }

        ctx.draw.line(
            Vec2::new(layout.baulk_line_x, surface.min.y),
            Vec2::new(layout.baulk_line_x, surface.max.y),
            LINE_WIDTH,
            DrawColor::WHITE,
        );
        // The D opens towards the baulk cushion.
        ctx.draw.arc(
            layout.d_center(),
            layout.d_radius,
            FRAC_PI_2,
            3.0 * FRAC_PI_2,
            LINE_WIDTH,
            DrawColor::WHITE,
        );

        for colour in Colour::SEQUENCE {
            ctx.draw.fill_circle(layout.spot(colour), SPOT_RADIUS, palette::SPOT);
        }
    }

    fn draw_balls(&self, ctx: &mut EngineContext) {
        let radius = self.layout.ball_radius;
        for ball in self.balls.iter() {
            let Some(pos) = ctx.scene.get(ball.id).map(|e| e.pos) else {
                continue;
            };
            if ball.kind == BallKind::Cue && self.cue.is_placing() {
                ctx.draw.fill_circle(pos, radius, palette::CUE_BALL_IN_HAND);
                ctx.draw.stroke_circle(pos, radius, LINE_WIDTH, palette::CUE_BALL_OUTLINE);
            } else {
                ctx.draw.fill_circle(pos, radius, ball.kind.fill());
            }
        }
    }

    fn draw_preview(&self, ctx: &mut EngineContext) {
        let Some(trajectory) = self.preview(ctx) else {
            return;
        };
        for segment in &trajectory.segments {
            ctx.draw.dashed_line(segment.from, segment.to, LINE_WIDTH, DrawColor::WHITE);
        }
        if let Some(contact) = trajectory.contact {
            ctx.draw.fill_circle(contact, CONTACT_MARKER_RADIUS, DrawColor::RED);
        }
    }

    /// Only drawn while the pointer is over the playing surface.
    fn draw_cue_stick(&self, ctx: &mut EngineContext, cue_pos: Vec2) {
        let Some(pointer) = self.pointer else {
            return;
        };
        if !self.layout.surface().contains(pointer) {
            return;
        }

        let dir = self.aim_direction(cue_pos);
        let start = cue_pos - dir * (self.layout.ball_radius + CUE_GAP);
        let butt = start - dir * (CUE_LENGTH - CUE_TIP_LENGTH);
        ctx.draw.line(start, butt, CUE_WIDTH, palette::CUE_WOOD);
        ctx.draw.line(butt, butt - dir * CUE_TIP_LENGTH, CUE_TIP_WIDTH, palette::CUE_TIP);
    }

    fn draw_power_bar(&self, ctx: &mut EngineContext, cue_pos: Vec2) {
        let top_left = cue_pos + Vec2::new(-POWER_BAR_WIDTH / 2.0, POWER_BAR_OFFSET);
        let size = Vec2::new(POWER_BAR_WIDTH, POWER_BAR_HEIGHT);
        let corner = POWER_BAR_HEIGHT / 2.0;
        let power = self.cue.power();

        ctx.draw.fill_rect(top_left, size, corner, DrawColor::WHITE);
        ctx.draw.fill_rect(top_left, Vec2::new(size.x * power, size.y), corner, DrawColor::RED);
        ctx.draw.stroke_rect(top_left, size, corner, 1.0, DrawColor::BLACK);
        ctx.draw.text(
            format!("{:.0}%", power * 100.0),
            cue_pos + Vec2::new(0.0, POWER_BAR_OFFSET + POWER_BAR_HEIGHT / 2.0),
            12.0,
            TextAlign::Center,
            DrawColor::BLACK,
        );
    }

    fn draw_hud(&self, ctx: &mut EngineContext, now: f64) {
        let width = self.settings.canvas_width;

        if let Some(foul) = self.turn.visible_foul(now, self.settings.foul_display_ms) {
            ctx.draw.text(
                foul.to_string(),
                Vec2::new(width / 2.0, 50.0),
                32.0,
                TextAlign::Center,
                DrawColor::RED,
            );
        }
        if self.turn.frame_complete() {
            ctx.draw.text(
                "FRAME COMPLETE",
                Vec2::new(width / 2.0, 90.0),
                28.0,
                TextAlign::Center,
                DrawColor::WHITE,
            );
        }

        // Potted counters, top right
        let right = width - 20.0;
        let top = 70.0;
        ctx.draw.fill_rect(
            Vec2::new(right - 200.0, top - 10.0),
            Vec2::new(200.0, 85.0),
            8.0,
            palette::HUD_BACKGROUND,
        );
        let lines = [
            format!("Red Balls Potted: {}", self.turn.reds_potted()),
            format!("Colored Balls Potted: {}", self.turn.colours_potted()),
            format!("Reds Remaining: {}", self.balls.reds_remaining()),
        ];
        for (i, line) in lines.into_iter().enumerate() {
            ctx.draw.text(
                line,
                Vec2::new(right - 10.0, top + i as f32 * 25.0),
                16.0,
                TextAlign::Right,
                DrawColor::WHITE,
            );
        }
    }
}

impl Default for SnookerGame {
    fn default() -> Self {
        Self::new()
    }
}

impl Game for SnookerGame {
    fn config(&self) -> GameConfig {
        GameConfig {
            fixed_dt: FIXED_DT,
            world_width: self.settings.canvas_width,
            world_height: self.settings.canvas_height,
            max_events: 16,
            gravity: Vec2::ZERO, // Top-down table
        }
    }

    fn init(&mut self, ctx: &mut EngineContext) {
        self.reset_table(ctx, self.settings.initial_mode);
        log::info!(
            "Table {:.0} x {:.0}, ball radius {:.2}",
            self.layout.length,
            self.layout.width,
            self.layout.ball_radius
        );
    }

    fn update(&mut self, ctx: &mut EngineContext, input: &InputQueue) {
        // Contacts belong to the step before any shot fired below.
        self.judge_contacts(ctx);
        self.handle_input(ctx, input);
        self.judge_pots(ctx);

        let moving = self.balls.any_moving(ctx, ctx.physics.dt());
        self.cue.update_motion(moving, ctx.now_ms());

        self.emit_events(ctx);
        self.render(ctx);
    }

    /// New settings rebuild the table in the current mode.
    fn load_settings(&mut self, ctx: &mut EngineContext, json: &str) {
        match SnookerSettings::from_json(json) {
            Ok(settings) => {
                self.rng = seeded_rng(settings.seed);
                self.settings = settings;
                let mode = self.mode.or(self.settings.initial_mode);
                self.reset_table(ctx, mode);
                log::info!("Settings loaded");
            }
            Err(err) => log::warn!("Settings rejected, keeping previous: {}", err),
        }
    }
}

fn table_layout(settings: &SnookerSettings) -> TableLayout {
    TableLayout::new(
        settings.canvas_width,
        settings.canvas_height,
        settings.cushion_thickness,
    )
}

fn ball_physics(settings: &SnookerSettings, layout: &TableLayout) -> BallPhysics {
    BallPhysics {
        radius: layout.ball_radius,
        material: ColliderMaterial {
            restitution: settings.ball_restitution,
            friction: settings.ball_friction,
            density: BALL_DENSITY,
        },
        linear_damping: settings.felt_damping,
        angular_damping: BALL_ANGULAR_DAMPING,
    }
}

fn seeded_rng(seed: Option<u64>) -> SmallRng {
    SmallRng::seed_from_u64(seed.unwrap_or_else(session_seed))
}

#[cfg(target_arch = "wasm32")]
fn session_seed() -> u64 {
    (js_sys::Math::random() * u64::MAX as f64) as u64
}

#[cfg(not(target_arch = "wasm32"))]
fn session_seed() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0x5eed)
}
