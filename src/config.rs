//! Tuning constants for a game session.
//!
//! Defaults reproduce the browser game as shipped. `relaxed()` is the slower
//! clock variant (3 s, whole-second ticks) used on the practice page.

use crate::settings::Difficulty;

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Clone, Debug, PartialEq)]
pub struct GameConfig {
    /// Physics step interval (~60 Hz).
    pub physics_tick_ms: u32,
    /// Vertical acceleration per tick, before speed scaling.
    pub gravity: f64,
    /// Horizontal launch speed of side lanes, before speed scaling.
    pub launch_speed: f64,
    /// How far past the play area a letter may travel before it expires.
    pub offscreen_margin: f64,
    /// Delay between consecutive letter spawns.
    pub spawn_stagger_ms: u32,
    /// Wait after the last spawn before input opens.
    pub settle_delay_ms: u32,
    pub clock_start_ms: u32,
    pub clock_tick_ms: u32,
    /// Pause between a correct answer and the next round.
    pub next_round_delay_ms: u32,
    /// Points per correct word, by difficulty.
    pub reward_low: u32,
    pub reward_mid: u32,
    pub reward_high: u32,
    pub play_width: f64,
    pub play_height: f64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            physics_tick_ms: 16,
            gravity: 0.5,
            launch_speed: 2.0,
            offscreen_margin: 50.0,
            spawn_stagger_ms: 300,
            settle_delay_ms: 2_000,
            clock_start_ms: 1_500,
            clock_tick_ms: 100,
            next_round_delay_ms: 500,
            reward_low: 10,
            reward_mid: 20,
            reward_high: 30,
            play_width: 600.0,
            play_height: 400.0,
        }
    }
}

impl GameConfig {
    pub fn relaxed() -> Self {
        Self {
            clock_start_ms: 3_000,
            clock_tick_ms: 1_000,
            ..Self::default()
        }
    }

    pub fn reward(&self, difficulty: Difficulty) -> u32 {
        match difficulty {
            Difficulty::Low => self.reward_low,
            Difficulty::Mid => self.reward_mid,
            Difficulty::High => self.reward_high,
        }
    }

    /// Total time from round start until input opens for a word of `letters` letters.
    pub fn input_delay_ms(&self, letters: usize) -> u32 {
        u32::try_from(letters)
            .unwrap_or(u32::MAX)
            .saturating_mul(self.spawn_stagger_ms)
            .saturating_add(self.settle_delay_ms)
    }

    /// Parse a (possibly partial) JSON object; missing fields keep their defaults.
    #[cfg(feature = "serde_json")]
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_delay() {
        let cfg = GameConfig::default();
        assert_eq!(cfg.input_delay_ms(2), 2_600);
        assert_eq!(cfg.input_delay_ms(0), 2_000);
    }

    #[test]
    fn test_rewards_by_tier() {
        let cfg = GameConfig::default();
        assert_eq!(cfg.reward(Difficulty::Low), 10);
        assert_eq!(cfg.reward(Difficulty::Mid), 20);
        assert_eq!(cfg.reward(Difficulty::High), 30);
    }

    #[test]
    fn test_relaxed_only_changes_clock() {
        let r = GameConfig::relaxed();
        assert_eq!(r.clock_start_ms, 3_000);
        assert_eq!(r.clock_tick_ms, 1_000);
        assert_eq!(r.spawn_stagger_ms, GameConfig::default().spawn_stagger_ms);
    }

    #[test]
    fn test_input_delay_saturates() {
        let cfg = GameConfig {
            spawn_stagger_ms: u32::MAX / 2,
            settle_delay_ms: u32::MAX,
            ..GameConfig::default()
        };
        assert_eq!(cfg.input_delay_ms(3), u32::MAX);
        assert_eq!(cfg.input_delay_ms(usize::MAX), u32::MAX);
    }

    #[cfg(feature = "serde_json")]
    #[test]
    fn test_partial_json_keeps_defaults() {
        let cfg = GameConfig::from_json(r#"{ "clock_start_ms": 3000 }"#).unwrap();
        assert_eq!(cfg.clock_start_ms, 3_000);
        assert_eq!(cfg.clock_tick_ms, 100);
    }
}
