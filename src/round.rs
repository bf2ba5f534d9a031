//! One breach round: a matrix, a buffer and the sequences to upload.
//!
//! Every input is run to completion through a FIFO queue of internal
//! messages before the next input is accepted. A commit is applied to the
//! buffer first, then to each sequence in configured order, and only then
//! are the resulting buffer and sequence messages evaluated. The feasibility
//! check therefore always sees fully updated sequence progress.

use std::{collections::VecDeque, time::Duration};

use rand::Rng;
use tracing::{debug, info, instrument, warn};

use crate::{
    buffer::{Buffer, BufferEvent},
    config::{ConfigError, RoundConfig, WinPolicy},
    event::{EndReason, Input, Notification},
    matrix::{Matrix, MatrixEvent},
    sequence::{Sequence, SequenceStatus, StatusEvent},
    symbol::Symbol,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoundState {
    Active,
    Over(EndReason),
}

/// How a finished round went.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RoundOutcome {
    pub reason: EndReason,
    pub won: bool,
    /// Sum of the rewards of every successful sequence.
    pub score: u32,
}

#[derive(Debug)]
enum Message {
    Matrix(MatrixEvent),
    Buffer(BufferEvent),
    Sequence(StatusEvent),
    Over,
}

#[derive(Debug, Clone)]
pub struct Round {
    stage: usize,
    matrix: Matrix,
    buffer: Buffer,
    sequences: Vec<Sequence>,
    deadline: Duration,
    elapsed: Duration,
    clock_running: bool,
    policy: WinPolicy,
    state: RoundState,
}

impl Round {
    /// Build the round described by `config` and run its opening checks.
    ///
    /// Sequences which cannot fit in the empty buffer are failed before any
    /// input is processed; if that fails all of them the round is already over.
    #[instrument(skip(config, rng))]
    pub fn start<R: Rng + ?Sized>(
        stage: usize,
        config: &RoundConfig,
        rng: &mut R,
    ) -> Result<(Self, Vec<Notification>), ConfigError> {
        let matrix = match &config.grid {
            Some(rows) => Matrix::from_rows(rows.clone()),
            None => Matrix::random(config.matrix, rng),
        }
        .map_err(|source| ConfigError::Matrix { stage, source })?;

        let sequences = config
            .sequences
            .iter()
            .enumerate()
            .map(|(id, cfg)| {
                let items = match &cfg.symbols {
                    Some(symbols) => symbols.clone(),
                    None => Symbol::random_run(rng, cfg.size),
                };
                let sequence = Sequence::new(id, items).with_reward(cfg.points);
                match &cfg.description {
                    Some(name) => sequence.with_name(name.clone()),
                    None => sequence,
                }
            })
            .collect();

        let mut round = Round {
            stage,
            matrix,
            buffer: Buffer::new(config.buffer),
            sequences,
            deadline: config.deadline(),
            elapsed: Duration::ZERO,
            clock_running: !config.timer_starts_on_commit,
            policy: config.win_policy,
            state: RoundState::Active,
        };
        info!(
            size = round.matrix.size(),
            capacity = round.buffer.capacity(),
            sequences = round.sequences.len(),
            "round started"
        );

        let mut out = vec![Notification::RoundStarted {
            stage,
            size: round.matrix.size(),
            capacity: round.buffer.capacity(),
            deadline_secs: config.timer_secs,
        }];
        let (x, y) = round.matrix.cursor();
        let opening = VecDeque::from([
            Message::Matrix(MatrixEvent::Hovered {
                x,
                y,
                cell: round.matrix.current(),
            }),
            Message::Buffer(BufferEvent::RemainingChanged(round.buffer.capacity())),
        ]);
        round.dispatch(opening, &mut out);
        Ok((round, out))
    }

    pub fn stage(&self) -> usize {
        self.stage
    }

    pub fn matrix(&self) -> &Matrix {
        &self.matrix
    }

    pub fn buffer(&self) -> &Buffer {
        &self.buffer
    }

    pub fn sequences(&self) -> &[Sequence] {
        &self.sequences
    }

    pub fn state(&self) -> RoundState {
        self.state
    }

    pub fn is_over(&self) -> bool {
        matches!(self.state, RoundState::Over(_))
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn time_left(&self) -> Duration {
        self.deadline.saturating_sub(self.elapsed)
    }

    pub fn score(&self) -> u32 {
        self.sequences
            .iter()
            .filter(|sequence| sequence.status() == SequenceStatus::Success)
            .map(Sequence::reward)
            .fold(0, u32::saturating_add)
    }

    pub fn is_won(&self) -> bool {
        let mut statuses = self.sequences.iter().map(Sequence::status);
        match self.policy {
            WinPolicy::AnySuccess => statuses.any(|status| status == SequenceStatus::Success),
            WinPolicy::AllSuccess => statuses.all(|status| status == SequenceStatus::Success),
        }
    }

    /// `None` while the round is still active.
    pub fn outcome(&self) -> Option<RoundOutcome> {
        match self.state {
            RoundState::Active => None,
            RoundState::Over(reason) => Some(RoundOutcome {
                reason,
                won: self.is_won(),
                score: self.score(),
            }),
        }
    }

    /// Apply one external input. Inputs reaching a finished round are ignored.
    #[instrument(skip(self), fields(stage = self.stage))]
    pub fn update(&mut self, input: Input) -> Vec<Notification> {
        let mut out = Vec::new();
        if self.is_over() {
            return out;
        }
        let mut queue = VecDeque::new();
        match input {
            Input::Move(direction) => {
                if let Some(event) = self.matrix.move_cursor(direction) {
                    queue.push_back(Message::Matrix(event));
                }
            }
            Input::Commit => {
                if let Some(event) = self.matrix.commit() {
                    queue.push_back(Message::Matrix(event));
                }
            }
            Input::Tick(delta) => {
                if self.clock_running {
                    self.elapsed = self.elapsed.saturating_add(delta);
                    if self.elapsed >= self.deadline {
                        self.end(EndReason::TimedOut, &mut queue);
                    }
                }
            }
            Input::DeadlineExceeded => self.end(EndReason::TimedOut, &mut queue),
            // quitting and choices belong to the game
            Input::Quit | Input::Choose(_) => {}
        }
        self.dispatch(queue, &mut out);
        out
    }

    fn end(&mut self, reason: EndReason, queue: &mut VecDeque<Message>) {
        if self.is_over() {
            return;
        }
        info!(%reason, "round over");
        self.state = RoundState::Over(reason);
        queue.push_back(Message::Over);
    }

    fn dispatch(&mut self, mut queue: VecDeque<Message>, out: &mut Vec<Notification>) {
        while let Some(message) = queue.pop_front() {
            match message {
                Message::Matrix(MatrixEvent::Hovered { x, y, cell }) => {
                    self.buffer.record(cell.symbol());
                    out.push(Notification::Hovered {
                        x,
                        y,
                        symbol: cell.symbol(),
                    });
                }
                Message::Matrix(MatrixEvent::Selected { x, y, symbol }) => {
                    out.push(Notification::SymbolSelected { x, y, symbol });
                    self.clock_running = true;
                    self.buffer.record(Some(symbol));
                    match self.buffer.advance() {
                        Ok(event) => queue.push_back(Message::Buffer(event)),
                        Err(err) => warn!(%err, "commit reached a full buffer"),
                    }
                    for sequence in &mut self.sequences {
                        if let Some(event) = sequence.submit(symbol) {
                            queue.push_back(Message::Sequence(event));
                        }
                    }
                }
                Message::Buffer(BufferEvent::RemainingChanged(remaining)) => {
                    out.push(Notification::BufferChanged { remaining });
                    if self.is_over() {
                        continue;
                    }
                    for sequence in &mut self.sequences {
                        if sequence.remaining_len() > remaining {
                            if let Some(event) = sequence.force_fail() {
                                queue.push_back(Message::Sequence(event));
                            }
                        }
                    }
                }
                Message::Buffer(BufferEvent::Exhausted) => {
                    out.push(Notification::BufferChanged { remaining: 0 });
                    self.end(EndReason::BufferFull, &mut queue);
                }
                Message::Sequence(StatusEvent { id, status, reward }) => {
                    debug!(id, ?status, reward, "sequence status changed");
                    out.push(Notification::SequenceStatusChanged { id, status, reward });
                    if !self.is_over() && self.sequences.iter().all(Sequence::is_done) {
                        let any_success = self
                            .sequences
                            .iter()
                            .any(|sequence| sequence.status() == SequenceStatus::Success);
                        let reason = if any_success {
                            EndReason::AllCompleted
                        } else {
                            EndReason::NotEnoughSpace
                        };
                        self.end(reason, &mut queue);
                    }
                }
                Message::Over => {
                    if let Some(RoundOutcome { reason, won, score }) = self.outcome() {
                        out.push(Notification::RoundOver { reason, won, score });
                    }
                }
            }
        }
    }
}
