mod buffer;
mod config;
mod event;
mod game;
mod grid;
mod matrix;
mod round;
mod sequence;
mod symbol;

pub use buffer::{Buffer, BufferError, BufferEvent};
pub use config::{
    BriefingConfig, ConfigError, EndConfig, GameConfig, RoundConfig, SequenceConfig, StageConfig,
    WinPolicy,
};
pub use event::{Choice, Direction, EndReason, Input, Notification};
pub use game::{Game, Phase};
pub use grid::Grid;
pub use matrix::{Active, Cell, Error as MatrixError, Matrix, MatrixEvent};
pub use round::{Round, RoundOutcome, RoundState};
pub use sequence::{Sequence, SequenceStatus, StatusEvent};
pub use symbol::Symbol;
