//! Flood fills over hex adjacency
//!
//! Both searches are stack-based and return ordered sets so callers (and
//! emitted events) see the same cells in the same order on every run.

use std::collections::BTreeSet;

use super::grid::{CellCoord, Color, Grid};

/// Same-colored cluster containing `seed`
///
/// Empty if `seed` does not currently hold `color`.
pub fn match_cluster(grid: &Grid, seed: CellCoord, color: Color) -> BTreeSet<CellCoord> {
    let mut cluster = BTreeSet::new();
    if grid.get(seed) != Some(color) {
        return cluster;
    }

    let mut stack = vec![seed];
    cluster.insert(seed);
    while let Some(cell) = stack.pop() {
        for next in grid.neighbors(cell) {
            if grid.get(next) == Some(color) && cluster.insert(next) {
                stack.push(next);
            }
        }
    }
    cluster
}

/// Every occupied cell with a hex path to row 0, regardless of color
pub fn ceiling_reachable(grid: &Grid) -> BTreeSet<CellCoord> {
    let mut reached = BTreeSet::new();
    let mut stack: Vec<CellCoord> = (0..grid.cols())
        .map(|col| CellCoord::new(0, col))
        .filter(|&cell| grid.is_occupied(cell))
        .collect();
    reached.extend(stack.iter().copied());

    while let Some(cell) = stack.pop() {
        for next in grid.neighbors(cell) {
            if grid.is_occupied(next) && reached.insert(next) {
                stack.push(next);
            }
        }
    }
    reached
}

/// Occupied cells cut off from the ceiling, in row-major order
pub fn floating_cells(grid: &Grid) -> Vec<CellCoord> {
    let anchored = ceiling_reachable(grid);
    grid.occupied()
        .map(|(cell, _)| cell)
        .filter(|cell| !anchored.contains(cell))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const RED: Color = Color(0);
    const BLUE: Color = Color(1);

    fn grid_with(rows: usize, cols: usize, cells: &[(usize, usize, Color)]) -> Grid {
        let mut grid = Grid::new(rows, cols, 16.0);
        for &(r, c, color) in cells {
            grid.set(CellCoord::new(r, c), Some(color));
        }
        grid
    }

    #[test]
    fn test_cluster_follows_stagger() {
        // (1,0) sits between (0,0) and (0,1) because odd rows lean right
        let grid = grid_with(4, 4, &[(0, 0, RED), (0, 1, RED), (1, 0, RED), (2, 3, RED)]);
        let cluster = match_cluster(&grid, CellCoord::new(1, 0), RED);
        assert_eq!(cluster.len(), 3);
        assert!(!cluster.contains(&CellCoord::new(2, 3)));
    }

    #[test]
    fn test_cluster_stops_at_other_colors() {
        let grid = grid_with(3, 4, &[(0, 0, RED), (0, 1, BLUE), (0, 2, RED)]);
        let cluster = match_cluster(&grid, CellCoord::new(0, 0), RED);
        assert_eq!(cluster.into_iter().collect::<Vec<_>>(), vec![CellCoord::new(0, 0)]);
    }

    #[test]
    fn test_even_row_diagonal_is_not_adjacent_to_the_right() {
        // Even row (2,1) touches (1,0) and (1,1) but not (1,2)
        let grid = grid_with(4, 4, &[(2, 1, RED), (1, 2, RED)]);
        assert_eq!(match_cluster(&grid, CellCoord::new(2, 1), RED).len(), 1);
    }

    #[test]
    fn test_cluster_of_wrong_seed_is_empty() {
        let grid = grid_with(2, 2, &[(0, 0, RED)]);
        assert!(match_cluster(&grid, CellCoord::new(0, 0), BLUE).is_empty());
        assert!(match_cluster(&grid, CellCoord::new(1, 1), RED).is_empty());
    }

    #[test]
    fn test_reachability_ignores_color() {
        let grid = grid_with(4, 4, &[(0, 0, RED), (1, 0, BLUE), (2, 0, RED), (3, 3, BLUE)]);
        let reached = ceiling_reachable(&grid);
        assert_eq!(reached.len(), 3);
        assert_eq!(floating_cells(&grid), vec![CellCoord::new(3, 3)]);
    }

    #[test]
    fn test_empty_grid_has_nothing_floating() {
        let grid = Grid::new(3, 3, 16.0);
        assert!(ceiling_reachable(&grid).is_empty());
        assert!(floating_cells(&grid).is_empty());
    }

    fn arb_grid() -> impl Strategy<Value = Grid> {
        (1usize..9, 1usize..9).prop_flat_map(|(rows, cols)| {
            prop::collection::vec(prop::option::of((0u8..3).prop_map(Color)), rows * cols)
                .prop_map(move |cells| Grid::from_cells(rows, cols, 16.0, cells))
        })
    }

    proptest! {
        #[test]
        fn prop_cluster_is_connected_same_color(grid in arb_grid(), seed_row in 0usize..9, seed_col in 0usize..9) {
            let seed = CellCoord::new(seed_row % grid.rows(), seed_col % grid.cols());
            let Some(color) = grid.get(seed) else {
                prop_assert!(match_cluster(&grid, seed, Color(0)).is_empty());
                return Ok(());
            };

            let cluster = match_cluster(&grid, seed, color);
            prop_assert!(cluster.contains(&seed));
            for &cell in &cluster {
                prop_assert_eq!(grid.get(cell), Some(color));
            }
            // Maximal: no same-colored neighbor is left outside
            for &cell in &cluster {
                for n in grid.neighbors(cell) {
                    if grid.get(n) == Some(color) {
                        prop_assert!(cluster.contains(&n));
                    }
                }
            }
            // Connected: every member reaches the seed inside the cluster
            for &cell in &cluster {
                let back = match_cluster(&grid, cell, color);
                prop_assert_eq!(&back, &cluster);
            }
            // Idempotent
            prop_assert_eq!(match_cluster(&grid, seed, color), cluster);
        }

        #[test]
        fn prop_reachability_is_closed_and_anchored(grid in arb_grid()) {
            let reached = ceiling_reachable(&grid);
            for col in 0..grid.cols() {
                let cell = CellCoord::new(0, col);
                if grid.is_occupied(cell) {
                    prop_assert!(reached.contains(&cell));
                }
            }
            for &cell in &reached {
                prop_assert!(grid.is_occupied(cell));
                // Closed under occupied adjacency: nothing with a path is excluded
                for n in grid.neighbors(cell) {
                    if grid.is_occupied(n) {
                        prop_assert!(reached.contains(&n));
                    }
                }
            }
            let floating = floating_cells(&grid);
            prop_assert_eq!(floating.len() + reached.len(), grid.occupied_count());
        }
    }
}
