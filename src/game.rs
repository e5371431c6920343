//! Round lifecycle: start → spawn letters → await input → score → next round or fail.
//!
//! [`Game`] owns the session (score, preferences), the active round and every
//! timer the round depends on. It never touches the DOM; instead it queues
//! [`SurfaceCommand`]s which the presentation layer drains after each call.
//!
//! All deferred work goes through one [`Scheduler`]. Ending a round cancels
//! the whole queue and bumps the round epoch, and every timer carries the
//! epoch it was created in, so a callback from an earlier round can never
//! reach the current one.

use std::fmt;

use crate::clock::{ClockEvent, RoundClock};
use crate::config::GameConfig;
use crate::physics::{self, Bounds, FallingLetter, Lane, LetterId, Motion};
use crate::scheduler::{Scheduler, TimerId};
use crate::settings::{
    Difficulty, PreferenceStore, Preferences, Speed, load_preferences, save_preferences,
};
use crate::words::WordBank;

/// Shown in place of the player's answer when nothing was typed.
pub const NO_INPUT: &str = "(no input)";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Screen {
    Start,
    Game,
    Result,
}

#[derive(Clone, Debug, PartialEq)]
pub enum SurfaceCommand {
    ShowScreen(Screen),
    SetInputVisible(bool),
    ClearInput,
    FocusInput,
    ClearPlayArea,
    SpawnGlyph { id: LetterId, glyph: char, x: f64, y: f64 },
    MoveGlyph { id: LetterId, x: f64, y: f64 },
    RemoveGlyph { id: LetterId },
    SetScore(u32),
    /// Remaining time, already formatted.
    SetTimer(String),
    ShowSuccessBanner,
    HideSuccessBanner,
    ShowFailure { correct: String, given: String },
    UpdateStartScreen { difficulty: Difficulty, speed: Speed, score: u32 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failure,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Spawning,
    AwaitingInput,
    Resolved(Outcome),
}

/// A call the current phase does not accept. The game state is unchanged.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rejected {
    NotIdle(Phase),
    NotAwaitingInput(Phase),
}

impl fmt::Display for Rejected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejected::NotIdle(p) => write!(f, "start rejected: game is {:?}, not idle", p),
            Rejected::NotAwaitingInput(p) => {
                write!(f, "submit rejected: game is {:?}, not awaiting input", p)
            }
        }
    }
}

impl std::error::Error for Rejected {}

/// How a submitted answer was judged.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Verdict {
    pub outcome: Outcome,
    pub expected: &'static str,
    /// Trimmed answer as compared.
    pub given: String,
    /// Session score after judging.
    pub score: u32,
}

/// Source of target words. [`WordBank`] is the random implementation.
pub trait WordSource {
    fn pick_word(&mut self, difficulty: Difficulty) -> &'static str;
}

impl WordSource for WordBank {
    fn pick_word(&mut self, difficulty: Difficulty) -> &'static str {
        WordBank::pick_word(self, difficulty)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum GameTimer {
    SpawnLetter { index: usize },
    OpenInput,
    PhysicsTick,
    ClockTick,
    NextRound,
}

#[derive(Clone, Copy, Debug)]
struct Scheduled {
    epoch: u32,
    timer: GameTimer,
}

struct Round {
    target: &'static str,
    glyphs: Vec<char>,
    letters: Vec<FallingLetter>,
    motion: Motion,
    clock: Option<RoundClock>,
}

pub struct Game {
    config: GameConfig,
    store: Box<dyn PreferenceStore>,
    words: Box<dyn WordSource>,
    prefs: Preferences,
    score: u32,
    phase: Phase,
    round: Option<Round>,
    staged: String,
    bounds: Bounds,
    scheduler: Scheduler<Scheduled>,
    epoch: u32,
    next_letter_id: u32,
    physics_timer: Option<TimerId>,
    clock_timer: Option<TimerId>,
    commands: Vec<SurfaceCommand>,
}

impl Game {
    /// Create an idle game and queue the start screen.
    pub fn new(
        config: GameConfig,
        store: Box<dyn PreferenceStore>,
        words: Box<dyn WordSource>,
    ) -> Self {
        let prefs = load_preferences(store.as_ref());
        let bounds = Bounds {
            width: config.play_width,
            height: config.play_height,
        };
        let mut game = Self {
            config,
            store,
            words,
            prefs,
            score: 0,
            phase: Phase::Idle,
            round: None,
            staged: String::new(),
            bounds,
            scheduler: Scheduler::new(),
            epoch: 0,
            next_letter_id: 0,
            physics_timer: None,
            clock_timer: None,
            commands: Vec::new(),
        };
        game.show_start_screen();
        game
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn preferences(&self) -> Preferences {
        self.prefs
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn target_word(&self) -> Option<&'static str> {
        self.round.as_ref().map(|r| r.target)
    }

    /// Letters currently on screen.
    pub fn letters(&self) -> &[FallingLetter] {
        self.round.as_ref().map(|r| r.letters.as_slice()).unwrap_or(&[])
    }

    /// Remaining countdown, if the clock is running.
    pub fn remaining_ms(&self) -> Option<u32> {
        self.round
            .as_ref()
            .and_then(|r| r.clock.as_ref())
            .filter(|c| c.is_running())
            .map(|c| c.remaining_ms())
    }

    pub fn pending_timers(&self) -> usize {
        self.scheduler.pending()
    }

    pub fn now_ms(&self) -> u64 {
        self.scheduler.now_ms()
    }

    pub fn staged_input(&self) -> &str {
        &self.staged
    }

    /// Play area size, used for launch points and expiry.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.bounds = Bounds { width, height };
    }

    /// Persist new preferences. They apply immediately on the start screen,
    /// otherwise from the next game.
    pub fn set_preferences(&mut self, prefs: Preferences) {
        save_preferences(self.store.as_mut(), prefs);
        if self.phase == Phase::Idle {
            self.prefs = prefs;
            self.show_start_screen();
        }
    }

    /// Hand every queued command to the presentation surface.
    pub fn drain_commands(&mut self) -> Vec<SurfaceCommand> {
        std::mem::take(&mut self.commands)
    }

    // --- Player actions ------------------------------------------------------

    /// Begin a game from the start screen.
    pub fn start(&mut self) -> Result<(), Rejected> {
        if self.phase != Phase::Idle {
            console_warn!("{}", Rejected::NotIdle(self.phase));
            return Err(Rejected::NotIdle(self.phase));
        }
        self.prefs = load_preferences(self.store.as_ref());
        self.commands.push(SurfaceCommand::ShowScreen(Screen::Game));
        self.begin_round();
        Ok(())
    }

    /// Record what is currently typed; the clock submits this on expiry.
    pub fn stage_input(&mut self, text: &str) {
        self.staged.clear();
        self.staged.push_str(text);
    }

    /// Submit whatever is staged (submit button / Enter key).
    pub fn submit_staged(&mut self) -> Result<Verdict, Rejected> {
        let text = self.staged.clone();
        self.submit(&text)
    }

    /// Judge an answer. Only accepted while awaiting input; the first submit
    /// of a round wins and later ones are rejected.
    pub fn submit(&mut self, text: &str) -> Result<Verdict, Rejected> {
        let mut round = match (self.phase, self.round.take()) {
            (Phase::AwaitingInput, Some(round)) => round,
            (phase, round) => {
                self.round = round;
                console_warn!("{}", Rejected::NotAwaitingInput(phase));
                return Err(Rejected::NotAwaitingInput(phase));
            }
        };
        if let Some(clock) = round.clock.as_mut() {
            clock.cancel();
        }
        self.cancel_timers();
        self.clear_letters(&round.letters);

        let given = text.trim();
        let outcome = if given == round.target {
            self.score = self
                .score
                .saturating_add(self.config.reward(self.prefs.difficulty));
            self.phase = Phase::Resolved(Outcome::Success);
            self.commands.push(SurfaceCommand::SetScore(self.score));
            self.commands.push(SurfaceCommand::ShowSuccessBanner);
            self.schedule(
                self.config.next_round_delay_ms as u64,
                GameTimer::NextRound,
            );
            console_log!("correct: '{}', score {}", round.target, self.score);
            Outcome::Success
        } else {
            self.score = 0;
            self.phase = Phase::Resolved(Outcome::Failure);
            self.commands.push(SurfaceCommand::ShowScreen(Screen::Result));
            self.commands.push(SurfaceCommand::ShowFailure {
                correct: round.target.to_string(),
                given: if given.is_empty() {
                    NO_INPUT.to_string()
                } else {
                    given.to_string()
                },
            });
            self.commands.push(SurfaceCommand::SetScore(0));
            console_log!("wrong: expected '{}', got '{}'", round.target, given);
            Outcome::Failure
        };

        Ok(Verdict {
            outcome,
            expected: round.target,
            given: given.to_string(),
            score: self.score,
        })
    }

    /// Abandon whatever is running and go back to the start screen.
    pub fn reset(&mut self) {
        self.cancel_timers();
        if let Some(mut round) = self.round.take() {
            if let Some(clock) = round.clock.as_mut() {
                clock.cancel();
            }
            self.clear_letters(&round.letters);
        }
        self.staged.clear();
        self.phase = Phase::Idle;
        self.prefs = load_preferences(self.store.as_ref());
        self.commands.push(SurfaceCommand::HideSuccessBanner);
        self.commands.push(SurfaceCommand::SetInputVisible(false));
        self.show_start_screen();
    }

    // --- Time ----------------------------------------------------------------

    /// Run every timer due at or before `now_ms`, in order.
    pub fn advance_to(&mut self, now_ms: u64) {
        while let Some((_, scheduled)) = self.scheduler.pop_due(now_ms) {
            self.fire(scheduled);
        }
    }

    pub fn advance_by(&mut self, dt_ms: u64) {
        let target = self.scheduler.now_ms() + dt_ms;
        self.advance_to(target);
    }

    fn fire(&mut self, scheduled: Scheduled) {
        if scheduled.epoch != self.epoch {
            return;
        }
        match scheduled.timer {
            GameTimer::SpawnLetter { index } => self.spawn_letter(index),
            GameTimer::OpenInput => self.open_input(),
            GameTimer::PhysicsTick => self.physics_tick(),
            GameTimer::ClockTick => self.clock_tick(),
            GameTimer::NextRound => self.next_round(),
        }
    }

    fn schedule(&mut self, delay_ms: u64, timer: GameTimer) -> TimerId {
        let epoch = self.epoch;
        self.scheduler.schedule(delay_ms, Scheduled { epoch, timer })
    }

    fn schedule_every(&mut self, period_ms: u64, timer: GameTimer) -> TimerId {
        let epoch = self.epoch;
        self.scheduler
            .schedule_every(period_ms, Scheduled { epoch, timer })
    }

    fn cancel_timers(&mut self) {
        self.scheduler.cancel_all();
        self.epoch = self.epoch.wrapping_add(1);
        self.physics_timer = None;
        self.clock_timer = None;
    }

    // --- Round steps ---------------------------------------------------------

    fn begin_round(&mut self) {
        self.cancel_timers();
        let target = self.words.pick_word(self.prefs.difficulty);
        let glyphs: Vec<char> = target.chars().collect();
        self.staged.clear();

        self.commands.extend([
            SurfaceCommand::HideSuccessBanner,
            SurfaceCommand::ClearPlayArea,
            SurfaceCommand::ClearInput,
            SurfaceCommand::SetInputVisible(false),
            SurfaceCommand::SetScore(self.score),
        ]);

        let stagger = self.config.spawn_stagger_ms as u64;
        for index in 0..glyphs.len() {
            self.schedule(
                (index as u64).saturating_mul(stagger),
                GameTimer::SpawnLetter { index },
            );
        }
        self.schedule(
            self.config.input_delay_ms(glyphs.len()) as u64,
            GameTimer::OpenInput,
        );

        console_log!(
            "round start: {} letters, difficulty {}, speed {}",
            glyphs.len(),
            self.prefs.difficulty.key(),
            self.prefs.speed.key()
        );
        self.round = Some(Round {
            target,
            glyphs,
            letters: Vec::new(),
            motion: Motion::new(&self.config, self.prefs.speed),
            clock: None,
        });
        self.phase = Phase::Spawning;
    }

    fn spawn_letter(&mut self, index: usize) {
        let id = LetterId(self.next_letter_id);
        let bounds = self.bounds;
        let stagger = self.config.spawn_stagger_ms;
        let Some(round) = self.round.as_mut() else {
            return;
        };
        let Some(&glyph) = round.glyphs.get(index) else {
            return;
        };
        self.next_letter_id = self.next_letter_id.wrapping_add(1);
        let letter = FallingLetter::launch(
            id,
            glyph,
            Lane::for_index(index),
            bounds,
            &round.motion,
            u32::try_from(index)
                .unwrap_or(u32::MAX)
                .saturating_mul(stagger),
        );
        self.commands.push(SurfaceCommand::SpawnGlyph {
            id,
            glyph,
            x: letter.x,
            y: letter.y,
        });
        round.letters.push(letter);
        if self.physics_timer.is_none() {
            let tick = self.config.physics_tick_ms as u64;
            self.physics_timer = Some(self.schedule_every(tick, GameTimer::PhysicsTick));
        }
    }

    fn physics_tick(&mut self) {
        let bounds = self.bounds;
        let Some(round) = self.round.as_mut() else {
            return;
        };
        let motion = round.motion;
        let commands = &mut self.commands;
        round.letters.retain_mut(|letter| {
            *letter = physics::step(letter, motion.gravity);
            if letter.is_expired(bounds, motion.margin) {
                commands.push(SurfaceCommand::RemoveGlyph { id: letter.id });
                false
            } else {
                commands.push(SurfaceCommand::MoveGlyph {
                    id: letter.id,
                    x: letter.x,
                    y: letter.y,
                });
                true
            }
        });
        if round.letters.is_empty() {
            if let Some(id) = self.physics_timer.take() {
                self.scheduler.cancel(id);
            }
        }
    }

    fn open_input(&mut self) {
        if self.phase != Phase::Spawning {
            return;
        }
        let Some(round) = self.round.as_mut() else {
            return;
        };
        let clock = RoundClock::new(self.config.clock_start_ms, self.config.clock_tick_ms);
        let tick = clock.tick_ms() as u64;
        self.commands.extend([
            SurfaceCommand::SetInputVisible(true),
            SurfaceCommand::FocusInput,
            SurfaceCommand::SetTimer(clock.display()),
        ]);
        round.clock = Some(clock);
        self.phase = Phase::AwaitingInput;
        self.clock_timer = Some(self.schedule_every(tick, GameTimer::ClockTick));
    }

    fn clock_tick(&mut self) {
        let Some(clock) = self.round.as_mut().and_then(|r| r.clock.as_mut()) else {
            return;
        };
        match clock.tick() {
            ClockEvent::Tick(_) => {
                let shown = clock.display();
                self.commands.push(SurfaceCommand::SetTimer(shown));
            }
            ClockEvent::Expired => {
                let shown = clock.display();
                self.commands.push(SurfaceCommand::SetTimer(shown));
                if let Some(id) = self.clock_timer.take() {
                    self.scheduler.cancel(id);
                }
                console_log!("time up, auto-submitting");
                let _ = self.submit_staged();
            }
            ClockEvent::Idle => {}
        }
    }

    fn next_round(&mut self) {
        if self.phase != Phase::Resolved(Outcome::Success) {
            return;
        }
        self.begin_round();
    }

    fn clear_letters(&mut self, letters: &[FallingLetter]) {
        for letter in letters {
            self.commands
                .push(SurfaceCommand::RemoveGlyph { id: letter.id });
        }
        self.commands.push(SurfaceCommand::ClearPlayArea);
    }

    fn show_start_screen(&mut self) {
        self.commands.push(SurfaceCommand::ShowScreen(Screen::Start));
        self.commands.push(SurfaceCommand::UpdateStartScreen {
            difficulty: self.prefs.difficulty,
            speed: self.prefs.speed,
            score: self.score,
        });
    }
}
