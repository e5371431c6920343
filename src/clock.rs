//! Round countdown.
//!
//! Integer milliseconds throughout so that a 1.5 s clock with 100 ms ticks
//! reaches zero on exactly the fifteenth tick.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClockState {
    Running,
    Expired,
    Cancelled,
}

/// Result of one tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClockEvent {
    /// Still counting; remaining milliseconds.
    Tick(u32),
    /// Hit zero on this tick. Emitted once.
    Expired,
    /// Clock already stopped; nothing happened.
    Idle,
}

#[derive(Clone, Debug)]
pub struct RoundClock {
    remaining_ms: u32,
    tick_ms: u32,
    state: ClockState,
}

impl RoundClock {
    pub fn new(start_ms: u32, tick_ms: u32) -> Self {
        Self {
            remaining_ms: start_ms,
            tick_ms: tick_ms.max(1),
            state: ClockState::Running,
        }
    }

    pub fn remaining_ms(&self) -> u32 {
        self.remaining_ms
    }

    pub fn tick_ms(&self) -> u32 {
        self.tick_ms
    }

    pub fn state(&self) -> ClockState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == ClockState::Running
    }

    pub fn tick(&mut self) -> ClockEvent {
        if self.state != ClockState::Running {
            return ClockEvent::Idle;
        }
        self.remaining_ms = self.remaining_ms.saturating_sub(self.tick_ms);
        if self.remaining_ms == 0 {
            self.state = ClockState::Expired;
            ClockEvent::Expired
        } else {
            ClockEvent::Tick(self.remaining_ms)
        }
    }

    /// Stop without firing. No-op once expired.
    pub fn cancel(&mut self) {
        if self.state == ClockState::Running {
            self.state = ClockState::Cancelled;
        }
    }

    /// Seconds with one decimal, as shown next to the input box.
    pub fn display(&self) -> String {
        format!("{:.1}", self.remaining_ms as f64 / 1_000.0)
    }
}
