use std::ops::{Index, IndexMut};

/// A representation of a square 2d grid whose side is chosen at runtime.
///
/// For indexing operations on this grid, `(0, 0)` is the top left corner;
/// `x` selects the column and `y` the row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid<T> {
    size: usize,
    cells: Vec<T>,
}

impl<T> Grid<T>
where
    T: Clone,
{
    pub fn filled(size: usize, value: T) -> Self {
        Grid {
            size,
            cells: vec![value; size * size],
        }
    }
}

impl<T> Grid<T> {
    /// Build a grid by calling `f(x, y)` for every cell in row-major order.
    pub fn from_fn(size: usize, mut f: impl FnMut(usize, usize) -> T) -> Self {
        let mut cells = Vec::with_capacity(size * size);
        for y in 0..size {
            for x in 0..size {
                cells.push(f(x, y));
            }
        }
        Grid { size, cells }
    }

    /// Build a grid from its rows, or `None` if the rows do not form a square.
    pub fn from_rows(rows: Vec<Vec<T>>) -> Option<Self> {
        let size = rows.len();
        if rows.iter().any(|row| row.len() != size) {
            return None;
        }
        let cells = rows.into_iter().flatten().collect();
        Some(Grid { size, cells })
    }

    /// Length of one side.
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Get the internal index where the desired value is stored,
    /// or `None` if it is out of bounds.
    pub fn idx(&self, x: usize, y: usize) -> Option<usize> {
        (x < self.size && y < self.size).then_some((y * self.size) + x)
    }

    pub fn get(&self, x: usize, y: usize) -> Option<&T> {
        self.idx(x, y).map(|idx| &self.cells[idx])
    }

    pub fn get_mut(&mut self, x: usize, y: usize) -> Option<&mut T> {
        self.idx(x, y).map(|idx| &mut self.cells[idx])
    }

    /// Iterate over the rows, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[T]> {
        // `chunks` rejects a zero chunk size
        self.cells.chunks(self.size.max(1))
    }
}

impl<T> Index<(usize, usize)> for Grid<T> {
    type Output = T;

    fn index(&self, (x, y): (usize, usize)) -> &Self::Output {
        match self.get(x, y) {
            Some(value) => value,
            None => panic!("({x}, {y}) is out of bounds for a grid of size {}", self.size),
        }
    }
}

impl<T> IndexMut<(usize, usize)> for Grid<T> {
    fn index_mut(&mut self, (x, y): (usize, usize)) -> &mut Self::Output {
        let size = self.size;
        match self.get_mut(x, y) {
            Some(value) => value,
            None => panic!("({x}, {y}) is out of bounds for a grid of size {size}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_fn_is_row_major() {
        let grid = Grid::from_fn(3, |x, y| (x, y));
        assert_eq!(grid[(2, 0)], (2, 0));
        assert_eq!(grid[(0, 2)], (0, 2));
        assert_eq!(grid.rows().nth(1).unwrap(), &[(0, 1), (1, 1), (2, 1)]);
    }

    #[test]
    fn out_of_bounds_is_none() {
        let grid = Grid::filled(2, 0u8);
        assert!(grid.get(2, 0).is_none());
        assert!(grid.get(0, 2).is_none());
        assert!(grid.get(1, 1).is_some());
    }

    #[test]
    fn from_rows_rejects_ragged() {
        assert!(Grid::from_rows(vec![vec![1, 2], vec![3]]).is_none());
        assert!(Grid::from_rows(vec![vec![1, 2, 3], vec![4, 5, 6]]).is_none());
        let grid = Grid::from_rows(vec![vec![1, 2], vec![3, 4]]).unwrap();
        assert_eq!(grid[(0, 1)], 3);
    }

    #[test]
    fn empty_grid_has_no_rows() {
        let grid: Grid<u8> = Grid::from_rows(Vec::new()).unwrap();
        assert!(grid.is_empty());
        assert_eq!(grid.rows().count(), 0);
    }
}
