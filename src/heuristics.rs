// Board evaluation heuristics
//
// All functions are read-only over a Board and work in log2 space, so a
// difference of 1 means "one merge apart". Sign conventions are fixed:
// smoothness and both monotonicity variants are <= 0, islands and
// max_value are >= 0.

use std::collections::VecDeque;

use crate::board::Board;
use crate::config::WeightsConfig;
use crate::types::{Direction, Position, GRID_SIZE};

type Visited = [[bool; GRID_SIZE]; GRID_SIZE];

fn log2_value(board: &Board, position: Position) -> Option<f64> {
    board.cell_content(position).map(|t| f64::from(t.value).log2())
}

/// Negated sum of log2 differences between each tile and the next tile
/// to its right and below, looking past empty cells
pub fn smoothness(board: &Board) -> f64 {
    let mut smoothness = 0.0;

    for tile in board.tiles() {
        let value = f64::from(tile.value).log2();
        for direction in [Direction::Right, Direction::Down] {
            let target = board
                .find_farthest_position(tile.position, direction.vector())
                .next;
            if let Some(target_value) = log2_value(board, target) {
                smoothness -= (value - target_value).abs();
            }
        }
    }

    smoothness
}

/// Number of 4-connected groups of equal-valued tiles
pub fn islands(board: &Board) -> u32 {
    let mut visited: Visited = [[false; GRID_SIZE]; GRID_SIZE];
    let mut islands = 0;

    for tile in board.tiles() {
        let (x, y) = (tile.position.x as usize, tile.position.y as usize);
        if visited[x][y] {
            continue;
        }
        islands += 1;

        let mut stack = vec![tile.position];
        visited[x][y] = true;
        while let Some(cell) = stack.pop() {
            for direction in Direction::all() {
                let neighbour = direction.apply(&cell);
                let Some(other) = board.cell_content(neighbour) else { continue };
                let (nx, ny) = (neighbour.x as usize, neighbour.y as usize);
                if other.value == tile.value && !visited[nx][ny] {
                    visited[nx][ny] = true;
                    stack.push(neighbour);
                }
            }
        }
    }

    islands
}

/// Position of the highest tile; ties go to the first one in x-major scan order
fn highest_cell(board: &Board) -> Position {
    let mut highest_value = 0;
    let mut highest = Position::new(0, 0);
    for tile in board.tiles() {
        if tile.value > highest_value {
            highest_value = tile.value;
            highest = tile.position;
        }
    }
    highest
}

/// Breadth-first gradient check outward from the highest tile
///
/// Cells are expanded in waves; a wave's cells are only marked once the
/// whole wave has been processed, so neighbours within the same wave still
/// compare against each other. Every step to a higher neighbour adds its
/// log2 increase to the penalty. Empty cells count as 0.
pub fn monotonicity(board: &Board) -> f64 {
    let mut marked: Visited = [[false; GRID_SIZE]; GRID_SIZE];
    let mut queued: Visited = [[false; GRID_SIZE]; GRID_SIZE];

    let highest = highest_cell(board);
    let mut queue = VecDeque::from([highest]);
    queued[highest.x as usize][highest.y as usize] = true;
    let mut mark_list = vec![highest];
    let mut mark_after = 1usize;
    let mut increases = 0.0;

    while let Some(cell) = queue.pop_front() {
        mark_after = mark_after.saturating_sub(1);
        mark_list.push(cell);

        let value = log2_value(board, cell).unwrap_or(0.0);
        for direction in Direction::all() {
            let target = direction.apply(&cell);
            if !board.within_bounds(target) {
                continue;
            }
            let (tx, ty) = (target.x as usize, target.y as usize);
            if marked[tx][ty] {
                continue;
            }
            if let Some(target_value) = log2_value(board, target) {
                if target_value > value {
                    increases += target_value - value;
                }
            }
            if !queued[tx][ty] {
                queue.push_back(target);
                queued[tx][ty] = true;
            }
        }

        if mark_after == 0 {
            for done in mark_list.drain(..) {
                marked[done.x as usize][done.y as usize] = true;
            }
            mark_after = queue.len();
        }
    }

    -increases
}

/// Running totals for one line scan of `monotonicity2`
///
/// Both totals are <= 0. `increasing` collects the size of every
/// decreasing step (the cost of calling the line increasing); `decreasing`
/// collects every increasing step.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LineTotals {
    pub increasing: f64,
    pub decreasing: f64,
}

impl LineTotals {
    fn add(&mut self, other: LineTotals) {
        self.increasing += other.increasing;
        self.decreasing += other.decreasing;
    }

    /// Score of whichever direction the lines follow more closely
    pub fn best(&self) -> f64 {
        self.increasing.max(self.decreasing)
    }
}

/// Scans one line of values (None = empty), linking over empty cells
///
/// The first and last cells always take part in the comparison, with an
/// empty end cell counting as 0.
pub fn line_monotonicity(line: [Option<u32>; GRID_SIZE]) -> LineTotals {
    let log = |cell: Option<u32>| cell.map_or(0.0, |v| f64::from(v).log2());
    let mut totals = LineTotals::default();

    let mut current = 0;
    let mut next = current + 1;
    while next < GRID_SIZE {
        while next < GRID_SIZE && line[next].is_none() {
            next += 1;
        }
        if next >= GRID_SIZE {
            next -= 1;
        }

        let current_value = log(line[current]);
        let next_value = log(line[next]);
        if current_value > next_value {
            totals.increasing += next_value - current_value;
        } else if next_value > current_value {
            totals.decreasing += current_value - next_value;
        }

        current = next;
        next += 1;
    }

    totals
}

/// Per-axis monotonicity: rows and columns are each scored by their better direction
pub fn monotonicity2(board: &Board) -> f64 {
    let values = board.values();
    let cell = |x: usize, y: usize| match values[y][x] {
        0 => None,
        v => Some(v),
    };

    let mut columns = LineTotals::default();
    let mut rows = LineTotals::default();
    for i in 0..GRID_SIZE {
        columns.add(line_monotonicity(std::array::from_fn(|y| cell(i, y))));
        rows.add(line_monotonicity(std::array::from_fn(|x| cell(x, i))));
    }

    columns.best() + rows.best()
}

/// log2 of the highest tile, 0 for an empty board
pub fn max_value(board: &Board) -> f64 {
    board.max_tile().map_or(0.0, |v| f64::from(v).log2())
}

/// Weighted sum of all features, as used by the reference player
///
/// The empty-cell term is ln(empty cells) and contributes nothing when
/// the board is full.
pub fn evaluate(board: &Board, weights: &WeightsConfig) -> f64 {
    let empty = board.available_cells().len();
    let empty_term = if empty > 0 { (empty as f64).ln() } else { 0.0 };

    let mut score = smoothness(board) * weights.smoothness
        + monotonicity2(board) * weights.monotonicity2
        + empty_term * weights.empty
        + max_value(board) * weights.max_value;

    // The graph-based features are the most expensive; skip them when unweighted
    if weights.islands != 0.0 {
        score += f64::from(islands(board)) * weights.islands;
    }
    if weights.monotonicity != 0.0 {
        score += monotonicity(board) * weights.monotonicity;
    }

    score
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_line_monotonicity_descending() {
        let totals = line_monotonicity([Some(16), Some(8), Some(4), Some(2)]);
        assert!(approx(totals.decreasing, 0.0));
        assert!(approx(totals.increasing, -3.0));
        assert!(approx(totals.best(), 0.0));
    }

    #[test]
    fn test_line_monotonicity_skips_gaps() {
        let totals = line_monotonicity([Some(2), None, Some(8), Some(32)]);
        assert!(approx(totals.increasing, 0.0));
        assert!(approx(totals.decreasing, -4.0));
    }

    #[test]
    fn test_line_monotonicity_empty_ends_count_as_zero() {
        let totals = line_monotonicity([None, Some(4), None, None]);
        assert!(approx(totals.decreasing, -2.0));
        assert!(approx(totals.increasing, -2.0));
        assert!(approx(line_monotonicity([None; GRID_SIZE]).best(), 0.0));
    }

    #[test]
    fn test_highest_cell_tie_breaks_by_scan_order() {
        let board = Board::from_values([
            [0, 0, 0, 0],
            [0, 0, 0, 64],
            [0, 64, 0, 0],
            [0, 0, 0, 0],
        ]);
        // x-major scan reaches (1, 2) before (3, 1)
        assert_eq!(highest_cell(&board), Position::new(1, 2));
    }

    #[test]
    fn test_single_tile_monotonicity_is_zero() {
        let board = Board::from_values([
            [0, 0, 0, 0],
            [0, 8, 0, 0],
            [0, 0, 0, 0],
            [0, 0, 0, 0],
        ]);
        assert!(approx(monotonicity(&board), 0.0));
    }

    #[test]
    fn test_evaluate_full_board_has_finite_score() {
        let board = Board::from_values([[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 2]]);
        let weights = WeightsConfig {
            smoothness: 0.1,
            monotonicity2: 1.0,
            empty: 2.7,
            max_value: 1.0,
            islands: 0.5,
            monotonicity: 0.5,
        };
        assert!(evaluate(&board, &weights).is_finite());
    }
}
