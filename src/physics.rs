//! Falling letter motion.
//!
//! Letters are launched from one of three lanes along the top edge of the play
//! area and fall under constant gravity. One call to [`step`] is one fixed
//! physics tick; the speed preference scales both gravity and the sideways
//! drift so that faster settings cover the same arc in fewer ticks.

use crate::config::GameConfig;
use crate::settings::Speed;

/// Identifier shared with the presentation surface for a letter glyph.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LetterId(pub u32);

/// Where a letter enters the play area.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Lane {
    Top,   // centre, straight down
    Left,  // left corner, drifting right
    Right, // right corner, drifting left
}

impl Lane {
    /// Lanes rotate top, left, right by letter index.
    pub fn for_index(index: usize) -> Self {
        match index % 3 {
            0 => Lane::Top,
            1 => Lane::Left,
            _ => Lane::Right,
        }
    }
}

/// Play area size in surface pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub width: f64,
    pub height: f64,
}

/// Per-round motion parameters derived from config and speed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Motion {
    pub gravity: f64,
    pub drift: f64,
    pub margin: f64,
}

impl Motion {
    pub fn new(config: &GameConfig, speed: Speed) -> Self {
        let base = 100.0 / speed.interval_ms();
        Self {
            gravity: config.gravity * base,
            drift: config.launch_speed * (base / 50.0),
            margin: config.offscreen_margin,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FallingLetter {
    pub id: LetterId,
    pub glyph: char,
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    /// Offset from round start at which the letter was scheduled to appear.
    pub spawn_delay_ms: u32,
}

impl FallingLetter {
    /// Place a fresh letter at its lane's launch point.
    pub fn launch(
        id: LetterId,
        glyph: char,
        lane: Lane,
        bounds: Bounds,
        motion: &Motion,
        spawn_delay_ms: u32,
    ) -> Self {
        let (x, vx) = match lane {
            Lane::Top => (bounds.width / 2.0, 0.0),
            Lane::Left => (0.0, motion.drift),
            Lane::Right => (bounds.width, -motion.drift),
        };
        Self {
            id,
            glyph,
            x,
            y: 0.0,
            vx,
            vy: 0.0,
            spawn_delay_ms,
        }
    }

    /// True once the letter has left the play area plus margin.
    pub fn is_expired(&self, bounds: Bounds, margin: f64) -> bool {
        self.y > bounds.height + margin || self.x < -margin || self.x > bounds.width + margin
    }
}

/// Advance one tick: accumulate velocity, then move.
pub fn step(letter: &FallingLetter, gravity: f64) -> FallingLetter {
    let vy = letter.vy + gravity;
    FallingLetter {
        vy,
        y: letter.y + vy,
        x: letter.x + letter.vx,
        ..letter.clone()
    }
}
