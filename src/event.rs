//! The events crossing the engine boundary.
//!
//! [`Input`] is everything an input source or time source can feed in.
//! [`Notification`] is everything a presentation layer needs to render
//! outcomes; notifications are emitted in the order they happened.

use std::{fmt, time::Duration};

use serde::Serialize;

use crate::{sequence::SequenceStatus, symbol::Symbol};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// `true` for moves which change the column, `false` for those which change the row.
    pub fn is_horizontal(self) -> bool {
        matches!(self, Direction::Left | Direction::Right)
    }
}

/// A discrete action from the outside world.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Input {
    Move(Direction),
    Commit,
    Quit,
    /// Time elapsed since the previous tick.
    Tick(Duration),
    /// The external time source decided the deadline has passed.
    DeadlineExceeded,
    Choose(Choice),
}

/// What the player may pick once a round is over.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Choice {
    Continue,
    Restart,
    Quit,
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Choice::Continue => "Continue",
            Choice::Restart => "Restart",
            Choice::Quit => "Quit",
        })
    }
}

/// Why a round ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EndReason {
    BufferFull,
    /// Every sequence is done and at least one succeeded.
    AllCompleted,
    /// Every sequence is done and none succeeded.
    NotEnoughSpace,
    TimedOut,
}

impl fmt::Display for EndReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EndReason::BufferFull => "Buffer is full",
            EndReason::AllCompleted => "All sequences are completed",
            EndReason::NotEnoughSpace => "Not enough space to complete sequence",
            EndReason::TimedOut => "Timer is ended",
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Notification {
    RoundStarted {
        stage: usize,
        size: usize,
        capacity: usize,
        deadline_secs: u64,
    },
    /// The cursor moved onto a cell; `symbol` is `None` for a consumed cell.
    Hovered {
        x: usize,
        y: usize,
        symbol: Option<Symbol>,
    },
    SymbolSelected {
        x: usize,
        y: usize,
        symbol: Symbol,
    },
    BufferChanged {
        remaining: usize,
    },
    SequenceStatusChanged {
        id: usize,
        status: SequenceStatus,
        reward: u32,
    },
    RoundOver {
        reason: EndReason,
        won: bool,
        score: u32,
    },
    BriefingStarted {
        stage: usize,
        title: String,
        text: String,
    },
    /// A configured closing screen was reached.
    EndReached {
        stage: usize,
        message: String,
    },
    ChoiceOffered {
        options: Vec<Choice>,
        highlighted: Choice,
    },
    ChoiceHighlighted {
        choice: Choice,
    },
    /// Sent after every round, at an end stage, and when the campaign runs
    /// out of stages.
    ///
    /// `terminal` is set when the player cannot continue; `victory` tells a
    /// won round or finished campaign from a lost round.
    GameOver {
        terminal: bool,
        victory: bool,
        score: u32,
    },
    LoadFailed {
        stage: usize,
        error: String,
    },
    Terminated {
        score: u32,
    },
}
