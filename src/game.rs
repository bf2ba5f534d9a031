//! The campaign: sequences stages, keeps the score, and offers the
//! continue/restart/quit choice between rounds.

use rand::rngs::StdRng;
use tracing::{debug, info, instrument, warn};

use crate::{
    config::{GameConfig, StageConfig},
    event::{Choice, Direction, Input, Notification},
    round::{Round, RoundOutcome},
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Phase {
    /// A breach round is running at this stage index.
    Playing(usize),
    /// A briefing is shown at this stage index; committing moves on.
    Briefing(usize),
    AwaitingChoice {
        options: Vec<Choice>,
        highlighted: usize,
    },
    Terminated,
}

#[derive(Debug)]
pub struct Game {
    config: GameConfig,
    rng: StdRng,
    stage: usize,
    score: u32,
    round: Option<Round>,
    phase: Phase,
}

impl Game {
    /// Create a game and load its first stage.
    pub fn new(config: GameConfig, rng: StdRng) -> (Self, Vec<Notification>) {
        let mut game = Game {
            config,
            rng,
            stage: 0,
            score: 0,
            round: None,
            phase: Phase::Terminated,
        };
        let mut out = Vec::new();
        game.load_stage(&mut out);
        (game, out)
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn stage(&self) -> usize {
        self.stage
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    /// The current round; kept after it ends so its final state can be shown.
    pub fn round(&self) -> Option<&Round> {
        self.round.as_ref()
    }

    pub fn is_terminated(&self) -> bool {
        self.phase == Phase::Terminated
    }

    /// Apply one external input.
    #[instrument(skip(self), fields(stage = self.stage))]
    pub fn handle(&mut self, input: Input) -> Vec<Notification> {
        let mut out = Vec::new();
        if self.is_terminated() {
            return out;
        }
        if input == Input::Quit {
            self.terminate(&mut out);
            return out;
        }
        match &mut self.phase {
            Phase::Terminated => {}
            Phase::Playing(_) => {
                let Some(round) = self.round.as_mut() else {
                    warn!("playing without a round");
                    return out;
                };
                out.extend(round.update(input));
                if let Some(outcome) = round.outcome() {
                    self.on_round_over(outcome, &mut out);
                }
            }
            Phase::Briefing(_) => {
                if matches!(input, Input::Commit | Input::Choose(Choice::Continue)) {
                    self.stage += 1;
                    self.load_stage(&mut out);
                }
            }
            Phase::AwaitingChoice {
                options,
                highlighted,
            } => match input {
                Input::Move(direction @ (Direction::Left | Direction::Right)) => {
                    *highlighted = if direction == Direction::Right {
                        (*highlighted + 1) % options.len()
                    } else {
                        (*highlighted + options.len() - 1) % options.len()
                    };
                    out.push(Notification::ChoiceHighlighted {
                        choice: options[*highlighted],
                    });
                }
                Input::Commit => {
                    let choice = options[*highlighted];
                    self.apply_choice(choice, &mut out);
                }
                Input::Choose(choice) if options.contains(&choice) => {
                    self.apply_choice(choice, &mut out);
                }
                _ => {}
            },
        }
        out
    }

    fn on_round_over(&mut self, outcome: RoundOutcome, out: &mut Vec<Notification>) {
        self.score = self.score.saturating_add(outcome.score);
        info!(
            reason = %outcome.reason,
            won = outcome.won,
            round_score = outcome.score,
            score = self.score,
            "round finished"
        );
        out.push(Notification::GameOver {
            terminal: !outcome.won,
            victory: outcome.won,
            score: self.score,
        });
        let options = if outcome.won {
            vec![Choice::Continue, Choice::Quit]
        } else {
            vec![Choice::Restart, Choice::Quit]
        };
        self.offer(options, out);
    }

    fn offer(&mut self, options: Vec<Choice>, out: &mut Vec<Notification>) {
        out.push(Notification::ChoiceOffered {
            options: options.clone(),
            highlighted: options[0],
        });
        self.phase = Phase::AwaitingChoice {
            options,
            highlighted: 0,
        };
    }

    fn apply_choice(&mut self, choice: Choice, out: &mut Vec<Notification>) {
        debug!(%choice, "choice made");
        match choice {
            Choice::Continue => {
                self.stage += 1;
                self.load_stage(out);
            }
            Choice::Restart => {
                self.stage = 0;
                self.score = 0;
                self.load_stage(out);
            }
            Choice::Quit => self.terminate(out),
        }
    }

    fn load_stage(&mut self, out: &mut Vec<Notification>) {
        let Some(stage) = self.config.stages.get(self.stage) else {
            info!(score = self.score, "campaign complete");
            self.round = None;
            out.push(Notification::GameOver {
                terminal: true,
                victory: true,
                score: self.score,
            });
            self.offer(vec![Choice::Restart, Choice::Quit], out);
            return;
        };
        match stage {
            StageConfig::Breach(config) => match Round::start(self.stage, config, &mut self.rng) {
                Ok((round, opening)) => {
                    out.extend(opening);
                    let outcome = round.outcome();
                    self.round = Some(round);
                    self.phase = Phase::Playing(self.stage);
                    if let Some(outcome) = outcome {
                        self.on_round_over(outcome, out);
                    }
                }
                Err(err) => {
                    warn!(stage = self.stage, %err, "could not load stage");
                    out.push(Notification::LoadFailed {
                        stage: self.stage,
                        error: err.to_string(),
                    });
                    self.terminate(out);
                }
            },
            StageConfig::Briefing(briefing) => {
                self.round = None;
                out.push(Notification::BriefingStarted {
                    stage: self.stage,
                    title: briefing.title.clone(),
                    text: briefing.text.clone(),
                });
                self.phase = Phase::Briefing(self.stage);
            }
            StageConfig::End(end) => {
                info!(score = self.score, "end stage reached");
                self.round = None;
                out.push(Notification::EndReached {
                    stage: self.stage,
                    message: end.msg.clone(),
                });
                out.push(Notification::GameOver {
                    terminal: true,
                    victory: true,
                    score: self.score,
                });
                self.offer(vec![Choice::Restart, Choice::Quit], out);
            }
        }
    }

    fn terminate(&mut self, out: &mut Vec<Notification>) {
        info!(score = self.score, "game terminated");
        self.phase = Phase::Terminated;
        out.push(Notification::Terminated { score: self.score });
    }
}
