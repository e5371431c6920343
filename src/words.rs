// Word lists per difficulty tier and the random picker.
// Tiers grow with syllable count: every syllable becomes one falling letter.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::settings::Difficulty;

pub const LOW_WORDS: &[&str] = &[
    "물", "불", "눈", "비", "꽃", "달", "별", "산", "강", "집", "책", "차", "공", "밤", "숲",
];

pub const MID_WORDS: &[&str] = &[
    "사과", "포도", "하늘", "바다", "나무", "학교", "친구", "우유", "기차", "시계", "모자", "구름",
    "바람", "노래", "가방", "의자", "연필", "사랑", "고양이", "바나나",
];

pub const HIGH_WORDS: &[&str] = &[
    "무지개다리", "도서관", "자전거", "해바라기", "비행기표", "대한민국", "컴퓨터게임",
    "아이스크림", "초콜릿케이크", "운동장", "코끼리", "피아노학원", "오렌지주스", "눈사람만들기",
];

/// Fixed list for a tier.
pub fn words(difficulty: Difficulty) -> &'static [&'static str] {
    match difficulty {
        Difficulty::Low => LOW_WORDS,
        Difficulty::Mid => MID_WORDS,
        Difficulty::High => HIGH_WORDS,
    }
}

/// Random word source.
pub struct WordBank {
    rng: StdRng,
}

impl WordBank {
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Seeded from the platform entropy source (JS `crypto` in the browser).
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Uniformly random entry of the tier's list.
    pub fn pick_word(&mut self, difficulty: Difficulty) -> &'static str {
        let pool = words(difficulty);
        pool[self.rng.gen_range(0..pool.len())]
    }
}
