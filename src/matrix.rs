use tracing::{debug, trace};

use crate::{event::Direction, grid::Grid, symbol::Symbol};

/// The content of one matrix cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cell {
    Open(Symbol),
    /// Already picked this round; can never be picked again.
    Consumed,
}

impl Cell {
    pub fn symbol(self) -> Option<Symbol> {
        match self {
            Cell::Open(symbol) => Some(symbol),
            Cell::Consumed => None,
        }
    }
}

/// The line on which the next pick must happen.
///
/// `Row(y)` permits horizontal movement along row `y`; `Column(x)` permits
/// vertical movement along column `x`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Active {
    Row(usize),
    Column(usize),
}

impl Default for Active {
    fn default() -> Self {
        Self::Row(0)
    }
}

impl Active {
    /// Return the new active set if the specified point is valid, or `Error::NotActive`
    /// otherwise.
    pub fn toggle(self, x: usize, y: usize) -> Result<Self, Error> {
        let err = Err(Error::NotActive { x, y, active: self });
        match self {
            Active::Row(row) => {
                if y != row {
                    err
                } else {
                    Ok(Active::Column(x))
                }
            }
            Active::Column(column) => {
                if x != column {
                    err
                } else {
                    Ok(Active::Row(y))
                }
            }
        }
    }

    /// `true` when movement in this direction is legal.
    pub fn permits(self, direction: Direction) -> bool {
        match self {
            Active::Row(_) => direction.is_horizontal(),
            Active::Column(_) => !direction.is_horizontal(),
        }
    }
}

/// What happened to the matrix as the result of an action.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatrixEvent {
    /// The cursor is over a new cell, which is not yet selected.
    Hovered { x: usize, y: usize, cell: Cell },
    /// A symbol was committed; the cell now holds [`Cell::Consumed`].
    Selected { x: usize, y: usize, symbol: Symbol },
}

/// The code matrix: a square grid of symbols with a cursor and an axis lock.
#[derive(Debug, Clone)]
pub struct Matrix {
    values: Grid<Cell>,
    selections: Vec<(usize, usize)>,
    cursor: (usize, usize),
    active: Active,
}

impl Matrix {
    /// Build a matrix from explicit rows of symbols.
    pub fn from_rows(rows: Vec<Vec<Symbol>>) -> Result<Self, Error> {
        let rows = rows
            .into_iter()
            .map(|row| row.into_iter().map(Cell::Open).collect())
            .collect();
        let values = Grid::from_rows(rows).ok_or(Error::NotSquare)?;
        if values.is_empty() {
            return Err(Error::Empty);
        }
        Ok(Self::with_values(values))
    }

    /// Build a `size × size` matrix of random symbols.
    pub fn random<R: rand::Rng + ?Sized>(size: usize, rng: &mut R) -> Result<Self, Error> {
        if size == 0 {
            return Err(Error::Empty);
        }
        let values = Grid::from_fn(size, |_, _| Cell::Open(Symbol::random(rng)));
        Ok(Self::with_values(values))
    }

    fn with_values(values: Grid<Cell>) -> Self {
        Self {
            values,
            selections: Vec::new(),
            cursor: (0, 0),
            active: Active::default(),
        }
    }

    fn check_bounds(&self, x: usize, y: usize) -> Result<(), Error> {
        let size = self.values.size();
        if x < size && y < size {
            Ok(())
        } else {
            Err(Error::OutOfBounds { x, y, size })
        }
    }

    pub fn size(&self) -> usize {
        self.values.size()
    }

    pub fn cursor(&self) -> (usize, usize) {
        self.cursor
    }

    pub fn active(&self) -> Active {
        self.active
    }

    pub fn cell(&self, x: usize, y: usize) -> Option<Cell> {
        self.values.get(x, y).copied()
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.values.rows()
    }

    /// The cell under the cursor.
    pub fn current(&self) -> Cell {
        self.values[self.cursor]
    }

    /// The symbol under the cursor, or `None` if that cell was consumed.
    pub fn current_symbol(&self) -> Option<Symbol> {
        self.current().symbol()
    }

    /// Coordinates picked so far, in order.
    pub fn selections(&self) -> &[(usize, usize)] {
        &self.selections
    }

    /// Move the cursor one step, wrapping at the edges.
    ///
    /// Movement along the locked axis is ignored and returns `None`.
    pub fn move_cursor(&mut self, direction: Direction) -> Option<MatrixEvent> {
        if !self.active.permits(direction) {
            trace!(?direction, active = ?self.active, "movement along locked axis ignored");
            return None;
        }
        let last = self.size() - 1;
        let (x, y) = self.cursor;
        self.cursor = match direction {
            Direction::Left => (if x == 0 { last } else { x - 1 }, y),
            Direction::Right => (if x == last { 0 } else { x + 1 }, y),
            Direction::Up => (x, if y == 0 { last } else { y - 1 }),
            Direction::Down => (x, if y == last { 0 } else { y + 1 }),
        };
        let (x, y) = self.cursor;
        Some(MatrixEvent::Hovered {
            x,
            y,
            cell: self.current(),
        })
    }

    /// Select the point at the given coordinates if it is legal to do so.
    ///
    /// On success the cursor moves there, the cell is consumed and the axis flips.
    pub fn select(&mut self, x: usize, y: usize) -> Result<MatrixEvent, Error> {
        self.check_bounds(x, y)?;
        let Cell::Open(symbol) = self.values[(x, y)] else {
            return Err(Error::AlreadySelected { x, y });
        };
        // the following line modifies self, so we can't fail past that point
        self.active = self.active.toggle(x, y)?;
        self.values[(x, y)] = Cell::Consumed;
        self.cursor = (x, y);
        self.selections.push((x, y));

        debug!(x, y, %symbol, active = ?self.active, "symbol selected");
        Ok(MatrixEvent::Selected { x, y, symbol })
    }

    /// Commit the symbol under the cursor.
    ///
    /// Re-picking a consumed cell is a no-op and returns `None`.
    pub fn commit(&mut self) -> Option<MatrixEvent> {
        let (x, y) = self.cursor;
        match self.select(x, y) {
            Ok(event) => Some(event),
            Err(err) => {
                trace!(%err, "commit ignored");
                None
            }
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum Error {
    #[error("the point `({x}, {y})` is out of bounds. size: `{size}`")]
    OutOfBounds { x: usize, y: usize, size: usize },
    #[error("the point `({x}, {y})` is not a member of the active set: {active:?}")]
    NotActive { x: usize, y: usize, active: Active },
    #[error("the point `({x}, {y})` has already been selected")]
    AlreadySelected { x: usize, y: usize },
    #[error("a matrix needs at least one cell")]
    Empty,
    #[error("matrix rows do not form a square")]
    NotSquare,
}
