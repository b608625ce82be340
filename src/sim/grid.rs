//! Staggered hex grid
//!
//! Rows alternate a half-cell horizontal offset: odd rows sit `R` to the right
//! of even rows. Continuous space has its origin at the top-left corner of the
//! play area with `y` growing toward the launcher, so row 0 touches the ceiling
//! at `y = 0`.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Palette index of a cell or projectile color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color(pub u8);

/// Grid coordinate; orders row-major
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    pub row: usize,
    pub col: usize,
}

impl CellCoord {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// Fixed-size occupancy table with staggered-row geometry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cell_radius: f32,
    /// Row-major cell contents
    cells: Vec<Option<Color>>,
}

impl Grid {
    /// Create an empty grid
    pub fn new(rows: usize, cols: usize, cell_radius: f32) -> Self {
        assert!(rows > 0 && cols > 0, "grid must be at least 1x1");
        Self {
            rows,
            cols,
            cell_radius,
            cells: vec![None; rows * cols],
        }
    }

    /// Create a grid from row-major contents
    pub fn from_cells(rows: usize, cols: usize, cell_radius: f32, cells: Vec<Option<Color>>) -> Self {
        assert!(rows > 0 && cols > 0, "grid must be at least 1x1");
        assert_eq!(cells.len(), rows * cols, "cell count does not match {rows}x{cols}");
        Self {
            rows,
            cols,
            cell_radius,
            cells,
        }
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn cell_radius(&self) -> f32 {
        self.cell_radius
    }

    /// Vertical distance between row centers (tight hex packing: R·√3)
    #[inline]
    pub fn row_spacing(&self) -> f32 {
        self.cell_radius * 3.0_f32.sqrt()
    }

    /// Play-area width, wide enough for the offset odd rows
    pub fn width(&self) -> f32 {
        self.cols as f32 * 2.0 * self.cell_radius + self.cell_radius
    }

    /// Distance from the ceiling to the bottom edge of the last row
    pub fn height(&self) -> f32 {
        (self.rows - 1) as f32 * self.row_spacing() + 2.0 * self.cell_radius
    }

    /// Signed bounds check for neighbor arithmetic
    #[inline]
    pub fn contains(&self, row: isize, col: isize) -> bool {
        row >= 0 && col >= 0 && (row as usize) < self.rows && (col as usize) < self.cols
    }

    #[inline]
    fn index(&self, cell: CellCoord) -> usize {
        assert!(
            cell.row < self.rows && cell.col < self.cols,
            "cell {cell:?} outside {}x{} grid",
            self.rows,
            self.cols
        );
        cell.row * self.cols + cell.col
    }

    /// Contents of a cell (panics if out of range)
    #[inline]
    pub fn get(&self, cell: CellCoord) -> Option<Color> {
        self.cells[self.index(cell)]
    }

    /// Overwrite a cell (panics if out of range)
    #[inline]
    pub fn set(&mut self, cell: CellCoord, value: Option<Color>) {
        let idx = self.index(cell);
        self.cells[idx] = value;
    }

    #[inline]
    pub fn is_occupied(&self, cell: CellCoord) -> bool {
        self.get(cell).is_some()
    }

    /// Row-major contents, for renderers and snapshots
    pub fn cells(&self) -> &[Option<Color>] {
        &self.cells
    }

    /// Occupied cells in row-major order
    pub fn occupied(&self) -> impl Iterator<Item = (CellCoord, Color)> + '_ {
        let cols = self.cols;
        self.cells.iter().enumerate().filter_map(move |(i, c)| {
            c.map(|color| (CellCoord::new(i / cols, i % cols), color))
        })
    }

    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(Option::is_none)
    }

    /// Center of a cell in continuous space
    pub fn cell_center(&self, cell: CellCoord) -> Vec2 {
        let r = self.cell_radius;
        let stagger = if cell.row % 2 == 1 { r } else { 0.0 };
        Vec2::new(
            r + cell.col as f32 * 2.0 * r + stagger,
            r + cell.row as f32 * self.row_spacing(),
        )
    }

    /// Cell whose center is closest to `pos` (linear scan, always in range)
    pub fn nearest_cell(&self, pos: Vec2) -> CellCoord {
        let mut best = CellCoord::new(0, 0);
        let mut best_dist = f32::INFINITY;
        for row in 0..self.rows {
            for col in 0..self.cols {
                let cell = CellCoord::new(row, col);
                let dist = self.cell_center(cell).distance_squared(pos);
                if dist < best_dist {
                    best_dist = dist;
                    best = cell;
                }
            }
        }
        best
    }

    /// Hex neighbors of a cell: left, right, up, down, and the parity-dependent
    /// diagonal above and below
    pub fn neighbors(&self, cell: CellCoord) -> impl Iterator<Item = CellCoord> + '_ {
        let (r, c) = (cell.row as isize, cell.col as isize);
        // Odd rows lean right, so their diagonals are one column to the right
        let dc = if cell.row % 2 == 1 { 1 } else { -1 };
        [
            (r, c - 1),
            (r, c + 1),
            (r - 1, c),
            (r + 1, c),
            (r - 1, c + dc),
            (r + 1, c + dc),
        ]
        .into_iter()
        .filter(move |&(nr, nc)| self.contains(nr, nc))
        .map(|(nr, nc)| CellCoord::new(nr as usize, nc as usize))
    }

    /// Empty every cell
    pub fn clear(&mut self) {
        self.cells.fill(None);
    }

    /// Fill the top `rows` rows with uniformly random colors
    pub fn fill_random<R: Rng>(&mut self, rows: usize, palette_size: u8, rng: &mut R) {
        let filled = rows.min(self.rows) * self.cols;
        for cell in &mut self.cells[..filled] {
            *cell = Some(Color(rng.random_range(0..palette_size)));
        }
    }

    /// Move every row one index toward row 0; row 0 is discarded and an empty
    /// row appears at the bottom
    pub fn shift_toward_ceiling(&mut self) {
        let cols = self.cols;
        self.cells.rotate_left(cols);
        let len = self.cells.len();
        self.cells[len - cols..].fill(None);
    }

    /// Move every row one index away from row 0; the last row is discarded and
    /// an empty row appears at the top
    pub fn shift_away_from_ceiling(&mut self) {
        let cols = self.cols;
        self.cells.rotate_right(cols);
        self.cells[..cols].fill(None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn sorted_neighbors(grid: &Grid, row: usize, col: usize) -> Vec<CellCoord> {
        let mut n: Vec<_> = grid.neighbors(CellCoord::new(row, col)).collect();
        n.sort();
        n
    }

    #[test]
    fn test_stagger_offsets_odd_rows() {
        let grid = Grid::new(4, 4, 10.0);
        let even = grid.cell_center(CellCoord::new(0, 1));
        let odd = grid.cell_center(CellCoord::new(1, 1));
        assert!((even.x - 30.0).abs() < 1e-5);
        assert!((odd.x - 40.0).abs() < 1e-5);
        // Rows are closer together than one diameter
        assert!(odd.y - even.y < 20.0);
        assert!(odd.y - even.y > 17.0);
    }

    #[test]
    fn test_width_fits_offset_rows() {
        let grid = Grid::new(3, 8, 16.0);
        let last_odd = grid.cell_center(CellCoord::new(1, 7));
        assert!((last_odd.x + 16.0 - grid.width()).abs() < 1e-4);
    }

    #[test]
    fn test_neighbors_are_touching_cells() {
        let grid = Grid::new(6, 6, 16.0);
        for row in 0..6 {
            for col in 0..6 {
                let cell = CellCoord::new(row, col);
                let center = grid.cell_center(cell);
                for n in grid.neighbors(cell) {
                    let d = grid.cell_center(n).distance(center);
                    assert!((d - 32.0).abs() < 1e-3, "{cell:?} -> {n:?} at {d}");
                }
            }
        }
    }

    #[test]
    fn test_interior_cells_have_six_neighbors() {
        let grid = Grid::new(6, 6, 16.0);
        assert_eq!(grid.neighbors(CellCoord::new(2, 2)).count(), 6);
        assert_eq!(grid.neighbors(CellCoord::new(3, 2)).count(), 6);
    }

    #[test]
    fn test_neighbors_depend_on_row_parity() {
        let grid = Grid::new(4, 4, 16.0);
        // Even row: diagonals lean left
        assert_eq!(
            sorted_neighbors(&grid, 2, 1),
            vec![
                CellCoord::new(1, 0),
                CellCoord::new(1, 1),
                CellCoord::new(2, 0),
                CellCoord::new(2, 2),
                CellCoord::new(3, 0),
                CellCoord::new(3, 1),
            ]
        );
        // Odd row: diagonals lean right
        assert_eq!(
            sorted_neighbors(&grid, 1, 1),
            vec![
                CellCoord::new(0, 1),
                CellCoord::new(0, 2),
                CellCoord::new(1, 0),
                CellCoord::new(1, 2),
                CellCoord::new(2, 1),
                CellCoord::new(2, 2),
            ]
        );
    }

    #[test]
    fn test_corner_neighbors_are_clipped() {
        let grid = Grid::new(3, 3, 16.0);
        assert_eq!(
            sorted_neighbors(&grid, 0, 0),
            vec![CellCoord::new(0, 1), CellCoord::new(1, 0)]
        );
    }

    #[test]
    fn test_nearest_cell_clamps_far_points() {
        let grid = Grid::new(5, 5, 16.0);
        assert_eq!(grid.nearest_cell(Vec2::new(-500.0, -500.0)), CellCoord::new(0, 0));
        assert_eq!(grid.nearest_cell(Vec2::new(5000.0, 5000.0)), CellCoord::new(4, 4));
    }

    #[test]
    #[should_panic]
    fn test_out_of_range_access_panics() {
        let grid = Grid::new(2, 2, 16.0);
        grid.get(CellCoord::new(0, 2));
    }

    #[test]
    fn test_fill_random_only_fills_top_rows() {
        let mut grid = Grid::new(10, 8, 16.0);
        let mut rng = Pcg32::seed_from_u64(7);
        grid.fill_random(4, 3, &mut rng);
        assert_eq!(grid.occupied_count(), 32);
        assert!(grid.occupied().all(|(cell, color)| cell.row < 4 && color.0 < 3));
    }

    #[test]
    fn test_fill_random_is_reproducible() {
        let mut a = Grid::new(6, 6, 16.0);
        let mut b = Grid::new(6, 6, 16.0);
        a.fill_random(3, 5, &mut Pcg32::seed_from_u64(42));
        b.fill_random(3, 5, &mut Pcg32::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn test_shift_toward_ceiling() {
        let mut grid = Grid::new(3, 2, 16.0);
        grid.set(CellCoord::new(0, 0), Some(Color(1)));
        grid.set(CellCoord::new(1, 1), Some(Color(2)));
        grid.set(CellCoord::new(2, 0), Some(Color(3)));
        grid.shift_toward_ceiling();
        assert_eq!(grid.get(CellCoord::new(0, 1)), Some(Color(2)));
        assert_eq!(grid.get(CellCoord::new(1, 0)), Some(Color(3)));
        assert!((0..2).all(|c| grid.get(CellCoord::new(2, c)).is_none()));
        assert_eq!(grid.occupied_count(), 2);
    }

    #[test]
    fn test_shift_away_from_ceiling() {
        let mut grid = Grid::new(3, 2, 16.0);
        grid.set(CellCoord::new(0, 0), Some(Color(1)));
        grid.set(CellCoord::new(2, 1), Some(Color(3)));
        grid.shift_away_from_ceiling();
        assert_eq!(grid.get(CellCoord::new(1, 0)), Some(Color(1)));
        assert!((0..2).all(|c| grid.get(CellCoord::new(0, c)).is_none()));
        assert_eq!(grid.occupied_count(), 1);
    }

    proptest! {
        #[test]
        fn prop_nearest_cell_inverts_cell_center(
            rows in 1usize..16,
            cols in 1usize..12,
            radius in 4.0f32..40.0,
        ) {
            let grid = Grid::new(rows, cols, radius);
            for row in 0..rows {
                for col in 0..cols {
                    let cell = CellCoord::new(row, col);
                    prop_assert_eq!(grid.nearest_cell(grid.cell_center(cell)), cell);
                }
            }
        }
    }
}
