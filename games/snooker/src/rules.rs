//! Turn and foul state machine.
//!
//! Every ball found in a pocket during a tick is judged on its own against
//! the turn state as it stood when the tick began (`judge` takes `&self`),
//! then the rulings are applied one after another. Fouls are advisory: they
//! raise a notice and never stop play.

use thiserror::Error;

use crate::balls::{BallKind, Colour};

/// Which kind of ball the player is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Red,
    Colour,
}

/// A rule violation. The display text is the notice shown on the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Foul {
    #[error("FOUL: Cue ball potted!")]
    CueBallPotted,
    #[error("FOUL: Wrong ball potted, expected colored!")]
    RedInsteadOfColour,
    #[error("FOUL: Wrong ball potted, expected red!")]
    ColourInsteadOfRed,
    #[error("FOUL: Wrong ball! Expected {expected}!")]
    OutOfSequence { expected: Colour },
    #[error("FOUL: Hit color first while reds remain!")]
    ColourHitFirst,
}

impl Foul {
    /// Numeric code for host events.
    pub fn code(self) -> u32 {
        match self {
            Foul::CueBallPotted => 1,
            Foul::RedInsteadOfColour => 2,
            Foul::ColourInsteadOfRed => 3,
            Foul::OutOfSequence { .. } => 4,
            Foul::ColourHitFirst => 5,
        }
    }
}

/// What to do with a ball that dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BallAction {
    /// Back to the D, ball in hand.
    ReturnCueToD,
    Remove,
    Respot(Colour),
    /// Stays where it is.
    Leave,
}

/// Counter and target changes earned by a legal pot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Score {
    Nothing,
    Red,
    Colour,
    InSequence,
}

/// The verdict on one pocketed ball.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ruling {
    pub action: BallAction,
    pub score: Score,
    pub foul: Option<Foul>,
}

impl Ruling {
    fn legal(action: BallAction, score: Score) -> Self {
        Self { action, score, foul: None }
    }

    fn foul(action: BallAction, foul: Foul) -> Self {
        Self { action, score: Score::Nothing, foul: Some(foul) }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FoulNotice {
    pub foul: Foul,
    pub raised_at_ms: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FirstContact {
    Idle,
    /// A shot was fired and the cue ball has not touched a ball yet.
    Awaiting,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TurnState {
    target: Target,
    sequence_index: usize,
    reds_potted: u32,
    colours_potted: u32,
    foul: Option<FoulNotice>,
    first_contact: FirstContact,
}

impl TurnState {
    pub fn new() -> Self {
        Self {
            target: Target::Red,
            sequence_index: 0,
            reds_potted: 0,
            colours_potted: 0,
            foul: None,
            first_contact: FirstContact::Idle,
        }
    }

    pub fn target(&self) -> Target {
        self.target
    }

    pub fn sequence_index(&self) -> usize {
        self.sequence_index
    }

    pub fn reds_potted(&self) -> u32 {
        self.reds_potted
    }

    pub fn colours_potted(&self) -> u32 {
        self.colours_potted
    }

    pub fn foul_notice(&self) -> Option<FoulNotice> {
        self.foul
    }

    /// Next colour in the clearance, once the reds are gone.
    pub fn expected_colour(&self) -> Option<Colour> {
        Colour::SEQUENCE.get(self.sequence_index).copied()
    }

    /// Black has been potted in sequence.
    pub fn frame_complete(&self) -> bool {
        self.sequence_index >= Colour::SEQUENCE.len()
    }

    /// Judge one pocketed ball. `reds_on_table` is the red count when the
    /// tick began.
    pub fn judge(&self, kind: BallKind, reds_on_table: usize) -> Ruling {
        match kind {
            BallKind::Cue => Ruling::foul(BallAction::ReturnCueToD, Foul::CueBallPotted),
            BallKind::Red => match self.target {
                Target::Red => Ruling::legal(BallAction::Remove, Score::Red),
                Target::Colour => Ruling::foul(BallAction::Leave, Foul::RedInsteadOfColour),
            },
            BallKind::Colour(colour) if reds_on_table > 0 => match self.target {
                Target::Colour => Ruling::legal(BallAction::Respot(colour), Score::Colour),
                Target::Red => Ruling::foul(BallAction::Respot(colour), Foul::ColourInsteadOfRed),
            },
            BallKind::Colour(colour) => match self.expected_colour() {
                Some(expected) if expected == colour => {
                    Ruling::legal(BallAction::Remove, Score::InSequence)
                }
                Some(expected) => {
                    Ruling::foul(BallAction::Respot(colour), Foul::OutOfSequence { expected })
                }
                None => Ruling::legal(BallAction::Respot(colour), Score::Nothing),
            },
        }
    }

    /// Apply a ruling's score and foul.
    pub fn apply(&mut self, ruling: &Ruling, now_ms: f64) {
        match ruling.score {
            Score::Nothing => {}
            Score::Red => {
                self.reds_potted += 1;
                self.target = Target::Colour;
            }
            Score::Colour => {
                self.colours_potted += 1;
                self.target = Target::Red;
            }
            Score::InSequence => {
                self.colours_potted += 1;
                self.sequence_index += 1;
            }
        }
        if let Some(foul) = ruling.foul {
            self.raise(foul, now_ms);
        }
    }

    /// Show a foul notice, replacing any current one.
    pub fn raise(&mut self, foul: Foul, now_ms: f64) {
        self.foul = Some(FoulNotice { foul, raised_at_ms: now_ms });
    }

    /// The current foul, while younger than `display_ms`.
    pub fn visible_foul(&self, now_ms: f64, display_ms: f64) -> Option<Foul> {
        self.foul
            .filter(|notice| now_ms - notice.raised_at_ms < display_ms)
            .map(|notice| notice.foul)
    }

    /// A shot was fired: the next cue ball contact with a ball is judged.
    pub fn arm_first_contact(&mut self) {
        self.first_contact = FirstContact::Awaiting;
    }

    /// The cue ball touched `other`. Only the first ball contact after a
    /// shot counts; a colour struck first while reds remain and the player is
    /// on a red is a foul.
    pub fn judge_contact(
        &mut self,
        other: BallKind,
        reds_on_table: usize,
        now_ms: f64,
    ) -> Option<Foul> {
        if self.first_contact != FirstContact::Awaiting || other == BallKind::Cue {
            return None;
        }
        self.first_contact = FirstContact::Idle;

        let hit_colour = matches!(other, BallKind::Colour(_));
        if hit_colour && reds_on_table > 0 && self.target == Target::Red {
            self.raise(Foul::ColourHitFirst, now_ms);
            Some(Foul::ColourHitFirst)
        } else {
            None
        }
    }
}

impl Default for TurnState {
    fn default() -> Self {
        Self::new()
    }
}
