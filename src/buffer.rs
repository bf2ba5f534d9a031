use tracing::debug;

use crate::symbol::Symbol;

/// What the buffer reports after a slot is used.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BufferEvent {
    /// Slots are still free.
    RemainingChanged(usize),
    /// The last slot was used.
    Exhausted,
}

/// A fixed-capacity list of committed symbols.
///
/// Slots before the write cursor hold committed symbols. The slot under the
/// write cursor may hold a preview of the symbol the matrix cursor is over.
#[derive(Debug, Clone)]
pub struct Buffer {
    slots: Vec<Option<Symbol>>,
    x: usize,
    is_full: bool,
}

impl Buffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: vec![None; capacity],
            x: 0,
            is_full: capacity == 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn remaining_capacity(&self) -> usize {
        self.capacity() - self.x
    }

    pub fn is_full(&self) -> bool {
        self.is_full
    }

    /// The committed symbols, oldest first.
    pub fn committed(&self) -> impl Iterator<Item = Symbol> + '_ {
        self.slots[..self.x].iter().flatten().copied()
    }

    /// The preview in the slot under the write cursor, if any.
    pub fn preview(&self) -> Option<Symbol> {
        self.slots.get(self.x).copied().flatten()
    }

    /// Store `symbol` at the write position without using the slot.
    ///
    /// Ignored once the buffer is full.
    pub fn record(&mut self, symbol: Option<Symbol>) {
        if let Some(slot) = self.slots.get_mut(self.x) {
            *slot = symbol;
        }
    }

    /// Use the slot at the write position.
    pub fn advance(&mut self) -> Result<BufferEvent, BufferError> {
        if self.is_full {
            return Err(BufferError::Full {
                capacity: self.capacity(),
            });
        }
        self.x += 1;
        if self.x == self.capacity() {
            self.is_full = true;
            debug!(capacity = self.capacity(), "buffer exhausted");
            Ok(BufferEvent::Exhausted)
        } else {
            Ok(BufferEvent::RemainingChanged(self.remaining_capacity()))
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum BufferError {
    #[error("all {capacity} buffer slots are already used")]
    Full { capacity: usize },
}
