//! Cue ball placement in the D, shot power and firing, and the motion
//! tracking that decides when the cue may be shown again.

use glam::Vec2;

use crate::table::TableLayout;

pub const MIN_POWER: f32 = 0.05;
pub const MAX_POWER: f32 = 1.0;
pub const DEFAULT_POWER: f32 = 0.5;
/// Power change per unit of wheel delta.
pub const WHEEL_SENSITIVITY: f32 = 0.0015;
/// Shot strength at full power.
pub const SHOT_FORCE: f32 = 0.02;
/// A ball moving less than this per tick along both axes is at rest.
pub const MOTION_THRESHOLD: f32 = 0.5;

/// Whether a ball with velocity `vel` (units per second) is moving.
pub fn is_moving(vel: Vec2, dt: f32) -> bool {
    let per_tick = vel * dt;
    per_tick.x.abs() > MOTION_THRESHOLD || per_tick.y.abs() > MOTION_THRESHOLD
}

/// Strength of a shot at `power`, or `None` below the firing minimum.
pub fn shot_strength(power: f32) -> Option<f32> {
    (power >= MIN_POWER).then_some(SHOT_FORCE * power)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// The cue ball is in hand and may be moved inside the D.
    Placing { dragging: bool },
    Placed,
}

/// A fired shot: unit direction and strength.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shot {
    pub direction: Vec2,
    pub strength: f32,
}

/// Cue control state.
#[derive(Debug, Clone)]
pub struct CueControl {
    placement: Placement,
    power: f32,
    shot_in_progress: bool,
    all_stopped_at_ms: Option<f64>,
    /// Set on entering placement, cleared by the first shot.
    in_hand: bool,
    cue_lag_ms: f64,
}

impl CueControl {
    pub fn new(cue_lag_ms: f64) -> Self {
        Self {
            placement: Placement::Placing { dragging: false },
            power: DEFAULT_POWER,
            shot_in_progress: false,
            all_stopped_at_ms: None,
            in_hand: true,
            cue_lag_ms,
        }
    }

    pub fn placement(&self) -> Placement {
        self.placement
    }

    pub fn is_placing(&self) -> bool {
        matches!(self.placement, Placement::Placing { .. })
    }

    pub fn is_dragging(&self) -> bool {
        self.placement == Placement::Placing { dragging: true }
    }

    pub fn power(&self) -> f32 {
        self.power
    }

    pub fn shot_in_progress(&self) -> bool {
        self.shot_in_progress
    }

    pub fn all_stopped_at_ms(&self) -> Option<f64> {
        self.all_stopped_at_ms
    }

    /// Ball in hand again. The caller moves the cue ball to its D point.
    pub fn enter_placing(&mut self) {
        self.placement = Placement::Placing { dragging: false };
        self.in_hand = true;
    }

    /// Pointer pressed at `p`. Returns where the cue ball should jump to, if
    /// anywhere.
    pub fn pointer_down(&mut self, p: Vec2, cue_pos: Vec2, layout: &TableLayout) -> Option<Vec2> {
        let on_cue = p.distance(cue_pos) < layout.ball_radius;
        match self.placement {
            Placement::Placing { .. } => {
                if on_cue {
                    self.placement = Placement::Placing { dragging: true };
                    None
                } else if layout.point_in_d_zone(p) {
                    self.placement = Placement::Placing { dragging: true };
                    Some(p)
                } else {
                    None
                }
            }
            Placement::Placed => {
                if on_cue && self.in_hand && !self.shot_in_progress {
                    self.placement = Placement::Placing { dragging: true };
                }
                None
            }
        }
    }

    /// Pointer moved to `p`. While dragging, returns the constrained cue
    /// ball position.
    pub fn pointer_move(&self, p: Vec2, layout: &TableLayout) -> Option<Vec2> {
        self.is_dragging().then(|| layout.constrain_to_d_zone(p))
    }

    /// Pointer released. Ends a drag and starts the cue reveal lag.
    pub fn pointer_up(&mut self, now_ms: f64) {
        if self.is_dragging() {
            self.placement = Placement::Placed;
            self.all_stopped_at_ms = Some(now_ms);
        }
    }

    /// Wheel scrolled; positive `delta_y` scrolls down and lowers power.
    pub fn wheel(&mut self, delta_y: f32) {
        if self.is_placing() || self.shot_in_progress {
            return;
        }
        self.power = (self.power - delta_y * WHEEL_SENSITIVITY).clamp(MIN_POWER, MAX_POWER);
    }

    /// Fire towards `aim`. Power resets afterwards.
    pub fn fire(&mut self, cue_pos: Vec2, aim: Vec2) -> Option<Shot> {
        if self.is_placing() || self.shot_in_progress {
            return None;
        }
        let strength = shot_strength(self.power)?;
        let direction = (aim - cue_pos).try_normalize().unwrap_or(Vec2::X);

        self.power = DEFAULT_POWER;
        self.in_hand = false;
        self.shot_in_progress = true;
        self.all_stopped_at_ms = None;
        Some(Shot { direction, strength })
    }

    /// Record whether anything is moving this tick.
    pub fn update_motion(&mut self, any_moving: bool, now_ms: f64) {
        if any_moving {
            self.shot_in_progress = true;
            self.all_stopped_at_ms = None;
        } else if self.shot_in_progress {
            self.shot_in_progress = false;
            self.all_stopped_at_ms = Some(now_ms);
        }
    }

    /// Cue, preview and power bar are shown once the table has been still
    /// for longer than the reveal lag.
    pub fn cue_visible(&self, now_ms: f64) -> bool {
        !self.is_placing()
            && !self.shot_in_progress
            && self
                .all_stopped_at_ms
                .is_some_and(|t| now_ms - t > self.cue_lag_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LAG: f64 = 3100.0;

    fn layout() -> TableLayout {
        TableLayout::new(1200.0, 600.0, 20.0)
    }

    /// Placed with the cue ball at the start point, `at_ms` into the game.
    fn placed(at_ms: f64) -> (CueControl, Vec2) {
        let layout = layout();
        let cue_pos = layout.cue_start();
        let mut cue = CueControl::new(LAG);
        cue.pointer_down(cue_pos, cue_pos, &layout);
        cue.pointer_up(at_ms);
        (cue, cue_pos)
    }

    #[test]
    fn motion_threshold_is_per_tick() {
        let dt = 1.0 / 60.0;
        assert!(!is_moving(Vec2::new(29.0, -29.0), dt));
        assert!(is_moving(Vec2::new(31.0, 0.0), dt));
        assert!(is_moving(Vec2::new(0.0, -31.0), dt));
    }

    #[test]
    fn strength_below_minimum_does_not_fire() {
        assert_eq!(shot_strength(0.04), None);
        assert_eq!(shot_strength(1.0), Some(SHOT_FORCE));
    }

    #[test]
    fn press_on_cue_starts_drag() {
        let layout = layout();
        let cue_pos = layout.cue_start();
        let mut cue = CueControl::new(LAG);
        let jump = cue.pointer_down(cue_pos + Vec2::new(3.0, 0.0), cue_pos, &layout);
        assert_eq!(jump, None);
        assert!(cue.is_dragging());
    }

    #[test]
    fn press_inside_d_snaps_cue() {
        let layout = layout();
        let mut cue = CueControl::new(LAG);
        let target = layout.d_center() + Vec2::new(-40.0, 60.0);
        let jump = cue.pointer_down(target, layout.cue_start(), &layout);
        assert_eq!(jump, Some(target));
        assert!(cue.is_dragging());
    }

    #[test]
    fn press_outside_d_is_ignored() {
        let layout = layout();
        let mut cue = CueControl::new(LAG);
        assert_eq!(cue.pointer_down(layout.center, layout.cue_start(), &layout), None);
        assert_eq!(cue.placement(), Placement::Placing { dragging: false });
    }

    #[test]
    fn drag_is_constrained_to_d() {
        let layout = layout();
        let (mut cue, cue_pos) = placed(0.0);
        assert_eq!(cue.pointer_move(Vec2::new(100.0, 500.0), &layout), None);

        cue.pointer_down(cue_pos, cue_pos, &layout);
        assert!(cue.is_dragging(), "ball still in hand before the first shot");
        let p = cue.pointer_move(Vec2::new(100.0, 500.0), &layout).unwrap();
        assert!(p.x <= layout.baulk_line_x);
        assert!((p.distance(layout.d_center()) - layout.d_radius).abs() < 1e-3);
    }

    #[test]
    fn release_places_and_starts_lag() {
        let (cue, _) = placed(1000.0);
        assert_eq!(cue.placement(), Placement::Placed);
        assert_eq!(cue.all_stopped_at_ms(), Some(1000.0));
        assert!(!cue.cue_visible(1000.0 + LAG));
        assert!(cue.cue_visible(1000.0 + LAG + 1.0));
    }

    #[test]
    fn wheel_adjusts_and_clamps_power() {
        let (mut cue, _) = placed(0.0);
        cue.wheel(-100.0);
        assert!((cue.power() - 0.65).abs() < 1e-5);
        cue.wheel(-10_000.0);
        assert_eq!(cue.power(), MAX_POWER);
        cue.wheel(10_000.0);
        assert_eq!(cue.power(), MIN_POWER);
    }

    #[test]
    fn wheel_ignored_while_placing() {
        let mut cue = CueControl::new(LAG);
        cue.wheel(-100.0);
        assert_eq!(cue.power(), DEFAULT_POWER);
    }

    #[test]
    fn fire_aims_at_pointer_and_resets_power() {
        let (mut cue, cue_pos) = placed(0.0);
        cue.wheel(-200.0);
        let shot = cue.fire(cue_pos, cue_pos + Vec2::new(0.0, 50.0)).unwrap();
        assert_eq!(shot.direction, Vec2::Y);
        assert!((shot.strength - SHOT_FORCE * 0.8).abs() < 1e-6);
        assert_eq!(cue.power(), DEFAULT_POWER);
        assert!(cue.shot_in_progress());
    }

    #[test]
    fn fire_refused_while_placing_or_moving() {
        let mut cue = CueControl::new(LAG);
        assert!(cue.fire(Vec2::ZERO, Vec2::X).is_none());

        let (mut cue, cue_pos) = placed(0.0);
        cue.update_motion(true, 10.0);
        assert!(cue.fire(cue_pos, Vec2::ZERO).is_none());
    }

    #[test]
    fn ball_leaves_hand_after_first_shot() {
        let layout = layout();
        let (mut cue, cue_pos) = placed(0.0);
        cue.fire(cue_pos, layout.center).unwrap();
        cue.update_motion(false, 500.0);
        cue.pointer_down(cue_pos, cue_pos, &layout);
        assert_eq!(cue.placement(), Placement::Placed);

        cue.enter_placing();
        cue.pointer_down(cue_pos, cue_pos, &layout);
        assert!(cue.is_dragging());
    }

    #[test]
    fn motion_tracking_records_stop_time() {
        let (mut cue, cue_pos) = placed(0.0);
        cue.fire(cue_pos, Vec2::ZERO).unwrap();
        cue.update_motion(true, 100.0);
        assert!(!cue.cue_visible(100.0));
        cue.update_motion(false, 2000.0);
        assert!(!cue.shot_in_progress());
        assert_eq!(cue.all_stopped_at_ms(), Some(2000.0));
        assert!(!cue.cue_visible(5000.0));
        assert!(cue.cue_visible(5200.0));
        // Still tables do not move the timestamp.
        cue.update_motion(false, 6000.0);
        assert_eq!(cue.all_stopped_at_ms(), Some(2000.0));
    }
}
