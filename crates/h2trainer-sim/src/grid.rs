//! Row-major scalar field.

/// A `ny × nx` field of concentration values. Row 0 is the ceiling.
#[derive(Debug, Clone, PartialEq)]
pub struct ConcentrationGrid {
    nx: usize,
    ny: usize,
    cells: Vec<f64>,
}

impl ConcentrationGrid {
    pub fn new(nx: usize, ny: usize) -> Self {
        Self {
            nx,
            ny,
            cells: vec![0.0; nx * ny],
        }
    }

    pub fn nx(&self) -> usize {
        self.nx
    }

    pub fn ny(&self) -> usize {
        self.ny
    }

    #[inline]
    pub fn idx(&self, row: usize, col: usize) -> usize {
        row * self.nx + col
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.cells[self.idx(row, col)]
    }

    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        let i = self.idx(row, col);
        self.cells[i] = value;
    }

    #[inline]
    pub fn add(&mut self, row: usize, col: usize, amount: f64) {
        let i = self.idx(row, col);
        self.cells[i] += amount;
    }

    pub fn cells(&self) -> &[f64] {
        &self.cells
    }

    pub fn cells_mut(&mut self) -> &mut [f64] {
        &mut self.cells
    }

    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        self.cells.chunks(self.nx.max(1))
    }

    pub fn copy_from(&mut self, other: &ConcentrationGrid) {
        debug_assert_eq!((self.nx, self.ny), (other.nx, other.ny));
        self.cells.copy_from_slice(&other.cells);
    }

    pub fn clear(&mut self) {
        self.cells.fill(0.0);
    }

    /// Sum over every cell.
    pub fn total(&self) -> f64 {
        self.cells.iter().sum()
    }

    /// Sum over cells not on the outer ring.
    pub fn interior_total(&self) -> f64 {
        if self.nx < 3 || self.ny < 3 {
            return 0.0;
        }
        (1..self.ny - 1)
            .flat_map(|row| (1..self.nx - 1).map(move |col| (row, col)))
            .map(|(row, col)| self.get(row, col))
            .sum()
    }

    pub fn max_value(&self) -> f64 {
        self.cells.iter().copied().fold(0.0, f64::max)
    }
}
