// Integration tests (native) for the `falling-words` crate.
// These drive the round state machine with synthetic time, exactly as the
// browser frame loop does with `performance.now()`.

use falling_words::settings::{DIFFICULTY_KEY, MemoryStore, SPEED_KEY};
use falling_words::{
    Difficulty, Game, GameConfig, Outcome, Phase, Rejected, Screen, SurfaceCommand, WordSource,
};

/// Hands out a scripted sequence of words, repeating the last one.
struct Script {
    words: Vec<&'static str>,
    next: usize,
}

impl WordSource for Script {
    fn pick_word(&mut self, _difficulty: Difficulty) -> &'static str {
        let w = self.words[self.next.min(self.words.len() - 1)];
        self.next += 1;
        w
    }
}

fn game(words: &[&'static str], difficulty: &str, config: GameConfig) -> Game {
    let store = MemoryStore::new()
        .with(DIFFICULTY_KEY, difficulty)
        .with(SPEED_KEY, "빠름");
    Game::new(
        config,
        Box::new(store),
        Box::new(Script {
            words: words.to_vec(),
            next: 0,
        }),
    )
}

fn failures(cmds: &[SurfaceCommand]) -> Vec<(String, String)> {
    cmds.iter()
        .filter_map(|c| match c {
            SurfaceCommand::ShowFailure { correct, given } => Some((correct.clone(), given.clone())),
            _ => None,
        })
        .collect()
}

#[test]
fn correct_answer_chains_into_next_round() {
    let mut g = game(&["사과", "포도"], "중", GameConfig::default());
    g.start().unwrap();
    // 2 letters * 300ms + 2000ms settle
    g.advance_by(2_599);
    assert_eq!(g.phase(), Phase::Spawning);
    g.advance_by(1);
    assert_eq!(g.phase(), Phase::AwaitingInput);

    let v = g.submit("사과").unwrap();
    assert_eq!(v.outcome, Outcome::Success);
    assert_eq!(g.score(), 20);
    assert_eq!(g.pending_timers(), 1);

    g.advance_by(499);
    assert_eq!(g.phase(), Phase::Resolved(Outcome::Success));
    g.advance_by(1);
    assert_eq!(g.phase(), Phase::Spawning, "next round skips the start screen");
    assert_eq!(g.target_word(), Some("포도"));
    assert_eq!(g.score(), 20);
}

#[test]
fn wrong_answer_resets_score_and_shows_result() {
    let mut g = game(&["사과", "사과"], "중", GameConfig::default());
    g.start().unwrap();
    g.advance_by(2_600);
    g.submit("사과").unwrap();
    g.advance_by(500 + 2_600);
    assert_eq!(g.phase(), Phase::AwaitingInput);
    g.drain_commands();

    let v = g.submit("바나나").unwrap();
    assert_eq!(v.outcome, Outcome::Failure);
    assert_eq!(g.score(), 0);
    assert_eq!(g.phase(), Phase::Resolved(Outcome::Failure));
    assert_eq!(g.pending_timers(), 0, "no next round after a miss");

    let cmds = g.drain_commands();
    assert!(cmds.contains(&SurfaceCommand::ShowScreen(Screen::Result)));
    assert_eq!(failures(&cmds), vec![("사과".to_string(), "바나나".to_string())]);

    g.advance_by(10_000);
    assert_eq!(g.phase(), Phase::Resolved(Outcome::Failure));
}

#[test]
fn difficulty_sets_the_reward() {
    for (key, reward) in [("하", 10), ("중", 20), ("상", 30)] {
        let mut g = game(&["나무"], key, GameConfig::default());
        g.start().unwrap();
        g.advance_by(2_600);
        g.submit("나무").unwrap();
        assert_eq!(g.score(), reward, "difficulty {}", key);
    }
}

#[test]
fn clock_expiry_submits_staged_text_once() {
    let mut g = game(&["사과"], "중", GameConfig::default());
    g.start().unwrap();
    g.advance_by(2_600);
    g.stage_input("사");
    g.drain_commands();

    g.advance_by(1_499);
    assert_eq!(g.phase(), Phase::AwaitingInput);
    g.advance_by(1);
    assert_eq!(g.phase(), Phase::Resolved(Outcome::Failure));

    g.advance_by(5_000);
    let cmds = g.drain_commands();
    assert_eq!(failures(&cmds), vec![("사과".to_string(), "사".to_string())]);
    assert!(cmds.contains(&SurfaceCommand::SetTimer("0.0".into())));
}

#[test]
fn clock_expiry_with_correct_text_still_scores() {
    let mut g = game(&["사과", "하늘"], "중", GameConfig::default());
    g.start().unwrap();
    g.advance_by(2_600);
    g.stage_input("사과");
    g.advance_by(1_500);
    assert_eq!(g.phase(), Phase::Resolved(Outcome::Success));
    assert_eq!(g.score(), 20);
}

#[test]
fn manual_submit_beats_pending_expiry() {
    let mut g = game(&["사과"], "중", GameConfig::default());
    g.start().unwrap();
    g.advance_by(2_600 + 1_400);
    g.submit("틀림").unwrap();
    g.drain_commands();
    // The expiry tick that would have fired at +1500 was cancelled.
    g.advance_by(1_000);
    assert!(failures(&g.drain_commands()).is_empty());
    assert_eq!(
        g.submit_staged(),
        Err(Rejected::NotAwaitingInput(Phase::Resolved(Outcome::Failure)))
    );
}

#[test]
fn reset_during_success_pause_cancels_next_round() {
    let mut g = game(&["사과"], "중", GameConfig::default());
    g.start().unwrap();
    g.advance_by(2_600);
    g.submit("사과").unwrap();
    g.reset();
    assert_eq!(g.pending_timers(), 0);
    g.advance_by(60_000);
    assert_eq!(g.phase(), Phase::Idle);
    assert_eq!(g.score(), 20, "reset keeps the running score");
}

#[test]
fn restart_after_failure_plays_again() {
    let mut g = game(&["사과", "포도"], "중", GameConfig::default());
    g.start().unwrap();
    g.advance_by(2_600);
    g.submit("").unwrap();
    g.reset();
    g.start().unwrap();
    assert_eq!(g.phase(), Phase::Spawning);
    assert_eq!(g.target_word(), Some("포도"));
}

#[test]
fn relaxed_clock_ticks_whole_seconds() {
    let mut g = game(&["물"], "하", GameConfig::relaxed());
    g.start().unwrap();
    g.advance_by(2_300);
    g.drain_commands();
    g.advance_by(1_000);
    let cmds = g.drain_commands();
    assert!(cmds.contains(&SurfaceCommand::SetTimer("2.0".into())));
    g.advance_by(1_999);
    assert_eq!(g.phase(), Phase::AwaitingInput);
    g.advance_by(1);
    assert_eq!(g.phase(), Phase::Resolved(Outcome::Failure));
}

#[test]
fn no_glyph_survives_its_round() {
    let mut g = game(&["고양이"], "중", GameConfig::default());
    g.start().unwrap();
    g.advance_by(650);
    assert!(!g.letters().is_empty());
    g.reset();
    assert!(g.letters().is_empty());

    let cmds = g.drain_commands();
    let spawned: Vec<_> = cmds
        .iter()
        .filter_map(|c| match c {
            SurfaceCommand::SpawnGlyph { id, .. } => Some(*id),
            _ => None,
        })
        .collect();
    for id in spawned {
        assert!(
            cmds.contains(&SurfaceCommand::RemoveGlyph { id }),
            "glyph {:?} never removed",
            id
        );
    }
}
