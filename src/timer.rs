/// Result of advancing a countdown by one second.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerSignal {
    Ticking(u64),
    /// Emitted once, on the tick that reaches zero.
    Expired,
    /// Already expired or stopped; nothing changed.
    Stopped,
}

/// One-second countdown that floors at zero and reports expiry once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Countdown {
    remaining_secs: u64,
    expired: bool,
    stopped: bool,
}

impl Countdown {
    pub fn new(secs: u64) -> Self {
        Self {
            remaining_secs: secs,
            expired: false,
            stopped: false,
        }
    }

    /// `None` for untimed quizzes.
    pub fn from_minutes(minutes: Option<u32>) -> Option<Self> {
        minutes.map(|m| Self::new(u64::from(m) * 60))
    }

    pub fn tick(&mut self) -> TimerSignal {
        if self.expired || self.stopped {
            return TimerSignal::Stopped;
        }

        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs == 0 {
            self.expired = true;
            TimerSignal::Expired
        } else {
            TimerSignal::Ticking(self.remaining_secs)
        }
    }

    /// Freeze the countdown where it is. Later ticks are no-ops.
    pub fn stop(&mut self) {
        self.stopped = true;
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    pub fn is_expired(&self) -> bool {
        self.expired
    }
}

/// `mm:ss`, minutes unbounded.
pub fn format_clock(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}
