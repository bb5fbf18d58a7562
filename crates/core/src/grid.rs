//! Grid module - the tile grid and its move rules
//!
//! The grid is a 3x3 square where each cell is empty (`0`) or holds a power of two.
//! Coordinates: (row, col) where row ranges 0..2 (top to bottom), col ranges 0..2
//! (left to right).
//!
//! A move is all-or-nothing: every function here returns a new grid and never
//! partially applies a slide. The only randomness is [`spawn_tile`], which draws
//! from a caller-owned [`SimpleRng`].
//!
//! Move rules, per row (columns for up/down):
//! 1. Compact non-zero tiles toward the move direction, preserving order.
//! 2. Scan once from the leading edge; two adjacent equal tiles merge into one tile
//!    of double value, and the merged tile does not merge again this move.
//! 3. Pad the trailing cells with zeros.
//!
//! Tiles of [`MAX_TILE`] never merge, so scores and cells cannot overflow.

use arrayvec::ArrayVec;
use serde::Serialize;

use crate::rng::SimpleRng;
use crate::types::{Cell, Direction, GRID_SIZE, INITIAL_TILES};

/// Total number of cells on the grid
pub const CELL_COUNT: usize = GRID_SIZE * GRID_SIZE;

/// Upper bound of merges in one move: each row merges at most `GRID_SIZE / 2` times
pub const MAX_MERGES: usize = GRID_SIZE * (GRID_SIZE / 2);

/// Values produced by merges during one move, in scan order
pub type MergeLog = ArrayVec<Cell, MAX_MERGES>;

/// Largest representable tile. Two of these cannot merge.
pub const MAX_TILE: Cell = 1 << (Cell::BITS - 1);

/// Two neighbouring cells combine on a move
#[inline]
pub fn mergeable(a: Cell, b: Cell) -> bool {
    a != 0 && a == b && a < MAX_TILE
}

/// The 3x3 tile grid, row-major
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(transparent)]
pub struct Grid {
    cells: [[Cell; GRID_SIZE]; GRID_SIZE],
}

impl Grid {
    /// Create a new empty grid
    pub fn new() -> Self {
        Self {
            cells: [[0; GRID_SIZE]; GRID_SIZE],
        }
    }

    /// Build a grid from explicit rows (no validation, see [`Grid::is_well_formed`])
    pub const fn from_rows(cells: [[Cell; GRID_SIZE]; GRID_SIZE]) -> Self {
        Self { cells }
    }

    pub fn rows(&self) -> &[[Cell; GRID_SIZE]; GRID_SIZE] {
        &self.cells
    }

    pub fn size(&self) -> usize {
        GRID_SIZE
    }

    /// Get cell at (row, col)
    /// Returns None if out of bounds
    pub fn get(&self, row: usize, col: usize) -> Option<Cell> {
        self.cells.get(row)?.get(col).copied()
    }

    /// Set cell at (row, col)
    /// Returns false if out of bounds
    pub fn set(&mut self, row: usize, col: usize, value: Cell) -> bool {
        match self.cells.get_mut(row).and_then(|r| r.get_mut(col)) {
            Some(cell) => {
                *cell = value;
                true
            }
            None => false,
        }
    }

    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.cells.iter().flatten().copied()
    }

    pub fn empty_count(&self) -> usize {
        self.cells().filter(|&v| v == 0).count()
    }

    pub fn tile_count(&self) -> usize {
        CELL_COUNT - self.empty_count()
    }

    pub fn is_full(&self) -> bool {
        self.empty_count() == 0
    }

    pub fn max_tile(&self) -> Cell {
        self.cells().max().unwrap_or(0)
    }

    /// Number of cells currently holding exactly `value`
    pub fn count_tile(&self, value: Cell) -> usize {
        self.cells().filter(|&v| v == value).count()
    }

    /// Every cell is 0 or a power of two >= 2
    pub fn is_well_formed(&self) -> bool {
        self.cells().all(|v| v == 0 || (v >= 2 && v.is_power_of_two()))
    }

    /// Swap rows and columns
    pub fn transpose(&self) -> Self {
        let mut out = Self::new();
        for (r, row) in self.cells.iter().enumerate() {
            for (c, &value) in row.iter().enumerate() {
                out.cells[c][r] = value;
            }
        }
        out
    }

    /// Reverse every row
    pub fn mirror(&self) -> Self {
        let mut out = *self;
        for row in &mut out.cells {
            row.reverse();
        }
        out
    }
}

/// Outcome of sliding the grid in one direction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveResult {
    pub grid: Grid,
    /// Whether any cell changed. `false` implies `gained == 0` and an identical grid.
    pub moved: bool,
    /// Sum of merged tile values
    pub gained: u32,
    /// One entry per merge event, holding the merged value
    pub merges: MergeLog,
}

/// Slide a single row toward index 0, merging equal neighbours once.
///
/// `on_merge` is called once per merge with the merged value. Returns the
/// score gained by this row. Works for any row length.
pub fn slide_row_left(row: &mut [Cell], mut on_merge: impl FnMut(Cell)) -> u32 {
    let mut gained: u32 = 0;
    let mut write = 0usize;
    // Last placed tile, if it may still absorb an equal neighbour.
    let mut open: Option<Cell> = None;

    for read in 0..row.len() {
        let value = row[read];
        if value == 0 {
            continue;
        }
        row[read] = 0;

        match open {
            Some(prev) if mergeable(prev, value) => {
                let merged = value * 2;
                row[write - 1] = merged;
                gained = gained.saturating_add(merged);
                on_merge(merged);
                open = None;
            }
            _ => {
                row[write] = value;
                write += 1;
                open = Some(value);
            }
        }
    }

    gained
}

/// Slide every row left
pub fn move_left(grid: &Grid) -> MoveResult {
    let mut next = *grid;
    let mut gained: u32 = 0;
    let mut merges = MergeLog::new();

    for row in &mut next.cells {
        gained = gained.saturating_add(slide_row_left(row, |value| merges.push(value)));
    }

    MoveResult {
        moved: next != *grid,
        grid: next,
        gained,
        merges,
    }
}

/// Slide every row right (mirror, left, mirror)
pub fn move_right(grid: &Grid) -> MoveResult {
    let mut result = move_left(&grid.mirror());
    result.grid = result.grid.mirror();
    result
}

/// Slide every column up (transpose, left, transpose)
pub fn move_up(grid: &Grid) -> MoveResult {
    let mut result = move_left(&grid.transpose());
    result.grid = result.grid.transpose();
    result
}

/// Slide every column down (transpose, right, transpose)
pub fn move_down(grid: &Grid) -> MoveResult {
    let mut result = move_right(&grid.transpose());
    result.grid = result.grid.transpose();
    result
}

/// Dispatch a move by direction
pub fn apply_move(grid: &Grid, direction: Direction) -> MoveResult {
    match direction {
        Direction::Left => move_left(grid),
        Direction::Right => move_right(grid),
        Direction::Up => move_up(grid),
        Direction::Down => move_down(grid),
    }
}

/// True if any cell is empty or any two orthogonal neighbours can merge
pub fn can_move(grid: &Grid) -> bool {
    let rows = grid.rows();

    if rows.iter().any(|row| row.contains(&0)) {
        return true;
    }

    let horizontal = rows
        .iter()
        .any(|row| row.windows(2).any(|pair| mergeable(pair[0], pair[1])));
    if horizontal {
        return true;
    }

    (0..GRID_SIZE).any(|c| (0..GRID_SIZE - 1).any(|r| mergeable(rows[r][c], rows[r + 1][c])))
}

/// True when no cell is empty and no two orthogonal neighbours can merge.
///
/// Always equal to `!can_move(grid)`.
pub fn is_terminal(grid: &Grid) -> bool {
    if !grid.is_full() {
        return false;
    }

    for r in 0..GRID_SIZE {
        for c in 0..GRID_SIZE {
            let value = grid.cells[r][c];
            if c + 1 < GRID_SIZE && mergeable(value, grid.cells[r][c + 1]) {
                return false;
            }
            if r + 1 < GRID_SIZE && mergeable(value, grid.cells[r + 1][c]) {
                return false;
            }
        }
    }

    true
}

/// Place a 2 (90%) or 4 (10%) on a uniformly chosen empty cell.
///
/// Returns the (row, col) that received the tile, or None if the grid was full
/// (the grid is left unchanged; this is not an error).
pub fn spawn_tile(grid: &mut Grid, rng: &mut SimpleRng) -> Option<(usize, usize)> {
    let empty: ArrayVec<(usize, usize), CELL_COUNT> = (0..GRID_SIZE)
        .flat_map(|r| (0..GRID_SIZE).map(move |c| (r, c)))
        .filter(|&(r, c)| grid.cells[r][c] == 0)
        .collect();

    if empty.is_empty() {
        return None;
    }

    let (r, c) = empty[rng.next_range(empty.len() as u32) as usize];
    grid.cells[r][c] = rng.next_tile_value();
    Some((r, c))
}

/// A fresh grid with the opening tiles spawned
pub fn initial_grid(rng: &mut SimpleRng) -> Grid {
    let mut grid = Grid::new();
    for _ in 0..INITIAL_TILES {
        spawn_tile(&mut grid, rng);
    }
    grid
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slide(row: &[Cell]) -> (Vec<Cell>, u32, Vec<Cell>) {
        let mut out = row.to_vec();
        let mut merges = Vec::new();
        let gained = slide_row_left(&mut out, |v| merges.push(v));
        (out, gained, merges)
    }

    #[test]
    fn test_slide_no_cascading_merge() {
        let (row, gained, merges) = slide(&[2, 2, 2, 2]);
        assert_eq!(row, vec![4, 4, 0, 0]);
        assert_eq!(gained, 8);
        assert_eq!(merges, vec![4, 4]);
    }

    #[test]
    fn test_slide_compacts_across_gaps() {
        let (row, gained, _) = slide(&[0, 2, 0, 2]);
        assert_eq!(row, vec![4, 0, 0, 0]);
        assert_eq!(gained, 4);
    }

    #[test]
    fn test_slide_merged_tile_not_remerged() {
        let (row, gained, merges) = slide(&[4, 2, 2]);
        assert_eq!(row, vec![4, 4, 0]);
        assert_eq!(gained, 4);
        assert_eq!(merges, vec![4]);
    }

    #[test]
    fn test_slide_leading_pair_wins() {
        let (row, gained, _) = slide(&[2, 2, 2]);
        assert_eq!(row, vec![4, 2, 0]);
        assert_eq!(gained, 4);
    }

    #[test]
    fn test_slide_packed_row_unchanged() {
        let (row, gained, merges) = slide(&[2, 4, 8]);
        assert_eq!(row, vec![2, 4, 8]);
        assert_eq!(gained, 0);
        assert!(merges.is_empty());
    }

    #[test]
    fn test_get_set_bounds() {
        let mut grid = Grid::new();
        assert!(grid.set(2, 2, 8));
        assert_eq!(grid.get(2, 2), Some(8));
        assert!(!grid.set(3, 0, 2));
        assert_eq!(grid.get(0, 3), None);
    }

    #[test]
    fn test_move_left_reports_merges() {
        let grid = Grid::from_rows([[2, 2, 0], [0, 4, 4], [8, 0, 8]]);
        let result = move_left(&grid);
        assert!(result.moved);
        assert_eq!(
            result.grid,
            Grid::from_rows([[4, 0, 0], [8, 0, 0], [16, 0, 0]])
        );
        assert_eq!(result.gained, 28);
        assert_eq!(result.merges.as_slice(), &[4, 8, 16]);
    }

    #[test]
    fn test_move_right() {
        let grid = Grid::from_rows([[2, 2, 2], [0, 0, 0], [4, 0, 0]]);
        let result = move_right(&grid);
        assert_eq!(
            result.grid,
            Grid::from_rows([[0, 2, 4], [0, 0, 0], [0, 0, 4]])
        );
        assert_eq!(result.gained, 4);
    }

    #[test]
    fn test_move_up_and_down() {
        let grid = Grid::from_rows([[2, 0, 4], [2, 0, 0], [4, 8, 4]]);

        let up = move_up(&grid);
        assert_eq!(up.grid, Grid::from_rows([[4, 8, 8], [4, 0, 0], [0, 0, 0]]));
        assert_eq!(up.gained, 12);

        let down = move_down(&grid);
        assert_eq!(down.grid, Grid::from_rows([[0, 0, 0], [4, 0, 0], [4, 8, 8]]));
        assert_eq!(down.gained, 12);
    }

    #[test]
    fn test_unmoved_is_identity() {
        let grid = Grid::from_rows([[2, 4, 0], [8, 0, 0], [0, 0, 0]]);
        let result = move_left(&grid);
        assert!(!result.moved);
        assert_eq!(result.gained, 0);
        assert_eq!(result.grid, grid);
    }

    #[test]
    fn test_can_move_and_terminal() {
        let empty = Grid::new();
        assert!(can_move(&empty));
        assert!(!is_terminal(&empty));

        let stuck = Grid::from_rows([[2, 4, 2], [4, 2, 4], [2, 4, 2]]);
        assert!(!can_move(&stuck));
        assert!(is_terminal(&stuck));

        let vertical_pair = Grid::from_rows([[2, 4, 2], [4, 2, 8], [2, 4, 8]]);
        assert!(can_move(&vertical_pair));
        assert!(!is_terminal(&vertical_pair));
    }

    #[test]
    fn test_spawn_on_full_grid_is_noop() {
        let mut grid = Grid::from_rows([[2, 4, 2], [4, 2, 4], [2, 4, 2]]);
        let before = grid;
        let mut rng = SimpleRng::new(3);
        assert_eq!(spawn_tile(&mut grid, &mut rng), None);
        assert_eq!(grid, before);
    }

    #[test]
    fn test_spawn_adds_exactly_one_tile() {
        let mut rng = SimpleRng::new(11);
        let mut grid = Grid::new();
        for expected in 1..=CELL_COUNT {
            let (r, c) = spawn_tile(&mut grid, &mut rng).unwrap();
            assert!(matches!(grid.get(r, c), Some(2) | Some(4)));
            assert_eq!(grid.tile_count(), expected);
        }
        assert!(grid.is_full());
    }

    #[test]
    fn test_initial_grid_has_two_tiles() {
        let mut rng = SimpleRng::new(5);
        let grid = initial_grid(&mut rng);
        assert_eq!(grid.tile_count(), INITIAL_TILES);
        assert!(grid.is_well_formed());
    }

    #[test]
    fn test_largest_tiles_do_not_merge() {
        let (row, gained, merges) = slide(&[MAX_TILE, MAX_TILE, 0]);
        assert_eq!(row, vec![MAX_TILE, MAX_TILE, 0]);
        assert_eq!(gained, 0);
        assert!(merges.is_empty());

        let half = MAX_TILE / 2;
        let (row, gained, _) = slide(&[half, half, 0]);
        assert_eq!(row, vec![MAX_TILE, 0, 0]);
        assert_eq!(gained, MAX_TILE);

        let (_, gained, _) = slide(&[half, half, half, half]);
        assert_eq!(gained, u32::MAX);
    }

    #[test]
    fn test_full_grid_of_largest_tiles_is_terminal() {
        let grid = Grid::from_rows([[MAX_TILE, MAX_TILE, MAX_TILE], [2, 4, 2], [4, 2, 4]]);
        assert!(grid.is_well_formed());
        assert!(!can_move(&grid));
        assert!(is_terminal(&grid));
        for dir in Direction::ALL {
            let result = apply_move(&grid, dir);
            assert!(!result.moved);
            assert_eq!(result.grid, grid);
        }
    }
}
