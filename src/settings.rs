//! Player preferences: difficulty tier and letter fall speed.
//!
//! Both values live in browser `localStorage` under [`DIFFICULTY_KEY`] and
//! [`SPEED_KEY`]. The stored strings are the Korean labels shown on the
//! settings page; English aliases are accepted as well. Anything else falls
//! back to the middle tier without complaint.

/// Storage key for the difficulty tier.
pub const DIFFICULTY_KEY: &str = "gameDifficulty";
/// Storage key for the fall speed.
pub const SPEED_KEY: &str = "gameSpeed";

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Difficulty {
    Low,
    #[default]
    Mid,
    High,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Low, Difficulty::Mid, Difficulty::High];

    /// Parse a stored key. Unknown keys map to `Mid`.
    pub fn from_key(key: &str) -> Self {
        match key.trim() {
            "하" | "low" | "Low" => Difficulty::Low,
            "상" | "high" | "High" => Difficulty::High,
            _ => Difficulty::Mid,
        }
    }

    /// Label as stored and displayed.
    pub fn key(self) -> &'static str {
        match self {
            Difficulty::Low => "하",
            Difficulty::Mid => "중",
            Difficulty::High => "상",
        }
    }
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Speed {
    Slow,
    #[default]
    Mid,
    Fast,
    VeryFast,
}

impl Speed {
    pub const ALL: [Speed; 4] = [Speed::Slow, Speed::Mid, Speed::Fast, Speed::VeryFast];

    /// Parse a stored key. Unknown keys map to `Mid`.
    pub fn from_key(key: &str) -> Self {
        match key.trim() {
            "느림" | "slow" | "Slow" => Speed::Slow,
            "빠름" | "fast" | "Fast" => Speed::Fast,
            "매우빠름" | "veryfast" | "VeryFast" | "very_fast" => Speed::VeryFast,
            _ => Speed::Mid,
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            Speed::Slow => "느림",
            Speed::Mid => "중",
            Speed::Fast => "빠름",
            Speed::VeryFast => "매우빠름",
        }
    }

    /// Animation interval in milliseconds the speed setting was tuned against.
    /// Smaller is faster; physics scales its step by `100 / interval`.
    pub fn interval_ms(self) -> f64 {
        match self {
            Speed::Slow => 100.0,
            Speed::Mid => 50.0,
            Speed::Fast => 30.0,
            Speed::VeryFast => 15.0,
        }
    }
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Preferences {
    pub difficulty: Difficulty,
    pub speed: Speed,
}

/// Persistent key-value store the preferences are read from.
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
}

/// In-memory store, used natively and in tests.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    entries: std::collections::HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: &str) -> Self {
        self.set(key, value);
        self
    }
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }
}

pub fn load_preferences(store: &dyn PreferenceStore) -> Preferences {
    let difficulty = store
        .get(DIFFICULTY_KEY)
        .map(|v| Difficulty::from_key(&v))
        .unwrap_or_default();
    let speed = store
        .get(SPEED_KEY)
        .map(|v| Speed::from_key(&v))
        .unwrap_or_default();
    Preferences { difficulty, speed }
}

pub fn save_preferences(store: &mut dyn PreferenceStore, prefs: Preferences) {
    store.set(DIFFICULTY_KEY, prefs.difficulty.key());
    store.set(SPEED_KEY, prefs.speed.key());
}
