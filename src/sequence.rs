use serde::Serialize;
use tracing::debug;

use crate::symbol::Symbol;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SequenceStatus {
    Running,
    Success,
    Failed,
}

/// Emitted when a sequence leaves [`SequenceStatus::Running`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StatusEvent {
    pub id: usize,
    pub status: SequenceStatus,
    /// The configured reward on success, zero on failure.
    pub reward: u32,
}

/// A run of symbols the player must commit consecutively.
#[derive(Debug, Clone)]
pub struct Sequence {
    id: usize,
    name: Option<String>,
    reward: u32,
    items: Vec<Symbol>,
    x: usize,
    status: SequenceStatus,
}

impl Sequence {
    pub fn new(id: usize, items: Vec<Symbol>) -> Self {
        Self {
            id,
            name: None,
            reward: 0,
            items,
            x: 0,
            status: SequenceStatus::Running,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_reward(mut self, reward: u32) -> Self {
        self.reward = reward;
        self
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn reward(&self) -> u32 {
        self.reward
    }

    pub fn items(&self) -> &[Symbol] {
        &self.items
    }

    /// How many leading items are currently matched.
    pub fn progress(&self) -> usize {
        self.x
    }

    pub fn status(&self) -> SequenceStatus {
        self.status
    }

    pub fn is_done(&self) -> bool {
        self.status != SequenceStatus::Running
    }

    /// Items still to be matched from the current progress.
    pub fn remaining_len(&self) -> usize {
        self.items.len() - self.x
    }

    fn finish(&mut self, status: SequenceStatus) -> StatusEvent {
        self.status = status;
        let reward = match status {
            SequenceStatus::Success => self.reward,
            _ => 0,
        };
        StatusEvent {
            id: self.id,
            status,
            reward,
        }
    }

    /// Feed one committed symbol.
    ///
    /// A match advances progress; a mismatch drops all progress back to the
    /// start. Completing the last item yields a success event.
    pub fn submit(&mut self, symbol: Symbol) -> Option<StatusEvent> {
        if self.is_done() {
            return None;
        }
        if self.items.get(self.x) == Some(&symbol) {
            self.x += 1;
        } else {
            self.x = 0;
        }
        if self.x == self.items.len() {
            debug!(id = self.id, reward = self.reward, "sequence completed");
            return Some(self.finish(SequenceStatus::Success));
        }
        None
    }

    /// Fail this sequence because it can no longer fit in the buffer.
    ///
    /// Does nothing once the sequence is done.
    pub fn force_fail(&mut self) -> Option<StatusEvent> {
        if self.is_done() {
            return None;
        }
        debug!(id = self.id, remaining = self.remaining_len(), "sequence failed");
        Some(self.finish(SequenceStatus::Failed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbol::Symbol::{Byte55 as A, ByteBd as B, ByteE9 as C};
    use rstest::rstest;

    #[test]
    fn exact_stream_succeeds_on_last_symbol() {
        let mut sequence = Sequence::new(3, vec![A, B, C]).with_reward(30);
        assert_eq!(sequence.submit(A), None);
        assert_eq!(sequence.submit(B), None);
        assert_eq!(sequence.status(), SequenceStatus::Running);
        assert_eq!(
            sequence.submit(C),
            Some(StatusEvent {
                id: 3,
                status: SequenceStatus::Success,
                reward: 30
            })
        );
        assert!(sequence.is_done());
        assert_eq!(sequence.remaining_len(), 0);
    }

    #[test]
    fn mismatch_resets_to_zero() {
        let mut sequence = Sequence::new(0, vec![A, B, C]);
        sequence.submit(A);
        sequence.submit(B);
        sequence.submit(B);
        assert_eq!(sequence.progress(), 0);

        // restart from position 1, not from the partial match
        sequence.submit(A);
        assert_eq!(sequence.progress(), 1);
        assert_eq!(sequence.submit(C), None);
        assert_eq!(sequence.progress(), 0);
    }

    #[test]
    fn mismatch_does_not_rematch_the_wrong_symbol() {
        // the symbol that broke progress is not reconsidered as a new start
        let mut sequence = Sequence::new(0, vec![A, A, B]);
        sequence.submit(A);
        sequence.submit(A);
        sequence.submit(A);
        assert_eq!(sequence.progress(), 0);
    }

    #[rstest]
    #[case(&[A, B, C], true)]
    #[case(&[C, A, B, C], true)]
    #[case(&[A, B, A, B, C], false)]
    #[case(&[A, B], false)]
    #[case(&[A, C, A, B, C], true)]
    fn stream_outcome(#[case] stream: &[Symbol], #[case] succeeds: bool) {
        let mut sequence = Sequence::new(0, vec![A, B, C]);
        let succeeded = stream.iter().filter_map(|s| sequence.submit(*s)).count() == 1;
        assert_eq!(succeeded, succeeds);
    }

    #[test]
    fn submit_after_done_is_ignored() {
        let mut sequence = Sequence::new(0, vec![A]);
        assert!(sequence.submit(A).is_some());
        assert_eq!(sequence.submit(A), None);
        assert_eq!(sequence.status(), SequenceStatus::Success);
    }

    #[test]
    fn force_fail_is_idempotent() {
        let mut sequence = Sequence::new(1, vec![A, B]).with_reward(50);
        assert_eq!(
            sequence.force_fail(),
            Some(StatusEvent {
                id: 1,
                status: SequenceStatus::Failed,
                reward: 0
            })
        );
        assert_eq!(sequence.force_fail(), None);
        assert_eq!(sequence.submit(A), None);
        assert_eq!(sequence.status(), SequenceStatus::Failed);
    }

    #[test]
    fn force_fail_after_success_keeps_success() {
        let mut sequence = Sequence::new(0, vec![A]);
        sequence.submit(A);
        assert_eq!(sequence.force_fail(), None);
        assert_eq!(sequence.status(), SequenceStatus::Success);
    }
}
