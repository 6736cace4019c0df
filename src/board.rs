// 2048 board engine
//
// Owns the 4x4 grid of tiles and everything that mutates it:
// placement, random spawning, move simulation and snapshot conversion.
// Heuristics live in `heuristics` and only use the read-only queries here.

use log::{trace, warn};
use rand::Rng;
use std::fmt;

use crate::error::BoardError;
use crate::types::{
    BoardSnapshot, Direction, MoveOutcome, Position, Tile, TileSnapshot, FOUR_PROBABILITY,
    GRID_SIZE, MAX_TILE_VALUE, WIN_VALUE,
};

type Cells = [[Option<Tile>; GRID_SIZE]; GRID_SIZE];

fn valid_tile_value(value: u32) -> bool {
    (2..=MAX_TILE_VALUE).contains(&value) && value.is_power_of_two()
}

/// Order in which cells are visited during a move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Traversals {
    pub x: [usize; GRID_SIZE],
    pub y: [usize; GRID_SIZE],
}

/// Result of walking from a cell towards a direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FarthestPosition {
    /// Last in-bounds empty cell along the walk (or the start cell)
    pub farthest: Position,
    /// First obstacle after `farthest`; may be out of bounds
    pub next: Position,
}

/// Fixed-size grid of tiles, indexed `[x][y]`
///
/// Cloning produces a fully independent board: tiles are copied by value
/// and their per-move bookkeeping is dropped.
#[derive(Debug)]
pub struct Board {
    cells: Cells,
    player_turn: bool,
}

impl Default for Board {
    fn default() -> Self {
        Board::empty()
    }
}

impl Clone for Board {
    fn clone(&self) -> Self {
        let mut board = Board::empty();
        board.player_turn = self.player_turn;
        for tile in self.tiles() {
            board.insert_tile(tile.fresh_copy());
        }
        board
    }
}

impl PartialEq for Board {
    /// Boards are equal when the same cells hold the same values
    fn eq(&self, other: &Self) -> bool {
        self.serialize() == other.serialize()
    }
}

impl Board {
    /// Creates a board with every cell empty and the player to move
    pub fn empty() -> Self {
        Board {
            cells: [[None; GRID_SIZE]; GRID_SIZE],
            player_turn: true,
        }
    }

    /// Builds a board from tile values laid out as `rows[y][x]`; 0 marks an empty cell
    ///
    /// Values are taken as given. Use `from_snapshot` for untrusted input,
    /// which rejects anything that is not a power of two in `2..=MAX_TILE_VALUE`.
    pub fn from_values(rows: [[u32; GRID_SIZE]; GRID_SIZE]) -> Self {
        let mut board = Board::empty();
        for (y, row) in rows.iter().enumerate() {
            for (x, &value) in row.iter().enumerate() {
                if value != 0 {
                    board.insert_tile(Tile::new(Position::new(x as i32, y as i32), value));
                }
            }
        }
        board
    }

    /// Tile values laid out as `rows[y][x]`; 0 marks an empty cell
    pub fn values(&self) -> [[u32; GRID_SIZE]; GRID_SIZE] {
        let mut rows = [[0; GRID_SIZE]; GRID_SIZE];
        for tile in self.tiles() {
            rows[tile.position.y as usize][tile.position.x as usize] = tile.value;
        }
        rows
    }

    /// Reconstructs a board from a snapshot, producing fresh tiles
    pub fn from_snapshot(snapshot: &BoardSnapshot) -> Result<Self, BoardError> {
        if snapshot.size != GRID_SIZE {
            return Err(BoardError::MalformedSnapshot(format!(
                "expected size {}, got {}",
                GRID_SIZE, snapshot.size
            )));
        }
        if snapshot.cells.len() != GRID_SIZE {
            return Err(BoardError::MalformedSnapshot(format!(
                "expected {} columns, got {}",
                GRID_SIZE,
                snapshot.cells.len()
            )));
        }

        let mut board = Board::empty();
        for (x, column) in snapshot.cells.iter().enumerate() {
            if column.len() != GRID_SIZE {
                return Err(BoardError::MalformedSnapshot(format!(
                    "column {} has {} cells, expected {}",
                    x,
                    column.len(),
                    GRID_SIZE
                )));
            }
            for (y, entry) in column.iter().enumerate() {
                let Some(tile) = entry else { continue };
                let cell = Position::new(x as i32, y as i32);
                if tile.position != cell {
                    return Err(BoardError::MalformedSnapshot(format!(
                        "tile at ({}, {}) records position ({}, {})",
                        x, y, tile.position.x, tile.position.y
                    )));
                }
                if !valid_tile_value(tile.value) {
                    return Err(BoardError::MalformedSnapshot(format!(
                        "tile at ({}, {}) has invalid value {}",
                        x, y, tile.value
                    )));
                }
                board.insert_tile(Tile::new(cell, tile.value));
            }
        }

        Ok(board)
    }

    pub fn from_json(json: &str) -> Result<Self, BoardError> {
        let snapshot: BoardSnapshot = serde_json::from_str(json)?;
        Board::from_snapshot(&snapshot)
    }

    /// Snapshot of positions and values; per-move bookkeeping is not included
    pub fn serialize(&self) -> BoardSnapshot {
        let cells = self
            .cells
            .iter()
            .map(|column| column.iter().map(|cell| cell.map(|t| t.snapshot())).collect())
            .collect();

        BoardSnapshot {
            size: GRID_SIZE,
            cells,
        }
    }

    pub fn to_json(&self) -> Result<String, BoardError> {
        Ok(serde_json::to_string(&self.serialize())?)
    }

    /// True while the player (directional move) is to act
    pub fn player_turn(&self) -> bool {
        self.player_turn
    }

    pub fn within_bounds(&self, position: Position) -> bool {
        Self::index(position).is_some()
    }

    fn index(position: Position) -> Option<(usize, usize)> {
        let size = GRID_SIZE as i32;
        if position.x >= 0 && position.x < size && position.y >= 0 && position.y < size {
            Some((position.x as usize, position.y as usize))
        } else {
            None
        }
    }

    /// Tile at `position`; out-of-bounds positions are simply empty
    pub fn cell_content(&self, position: Position) -> Option<&Tile> {
        Self::index(position).and_then(|(x, y)| self.cells[x][y].as_ref())
    }

    pub fn cell_occupied(&self, position: Position) -> bool {
        self.cell_content(position).is_some()
    }

    pub fn cell_available(&self, position: Position) -> bool {
        !self.cell_occupied(position)
    }

    /// Iterates over occupied cells, x outer and y inner
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> + '_ {
        self.cells.iter().flat_map(|column| column.iter().flatten())
    }

    pub fn tile_count(&self) -> usize {
        self.tiles().count()
    }

    /// Empty positions in traversal order (x outer, y inner)
    pub fn available_cells(&self) -> Vec<Position> {
        let mut cells = Vec::with_capacity(GRID_SIZE * GRID_SIZE);
        for x in 0..GRID_SIZE {
            for y in 0..GRID_SIZE {
                if self.cells[x][y].is_none() {
                    cells.push(Position::new(x as i32, y as i32));
                }
            }
        }
        cells
    }

    pub fn cells_available(&self) -> bool {
        self.cells.iter().flatten().any(|cell| cell.is_none())
    }

    /// Picks an empty cell uniformly at random
    pub fn random_available_cell<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Position> {
        let cells = self.available_cells();
        if cells.is_empty() {
            None
        } else {
            Some(cells[rng.random_range(0..cells.len())])
        }
    }

    /// Places a tile at its own position, replacing any occupant
    pub fn insert_tile(&mut self, tile: Tile) {
        match Self::index(tile.position) {
            Some((x, y)) => self.cells[x][y] = Some(tile),
            None => warn!(
                "Ignoring tile inserted outside the grid at ({}, {})",
                tile.position.x, tile.position.y
            ),
        }
    }

    /// Clears the cell at the tile's position
    pub fn remove_tile(&mut self, tile: &Tile) {
        if let Some((x, y)) = Self::index(tile.position) {
            self.cells[x][y] = None;
        }
    }

    /// Spawns a 2 (90%) or a 4 (10%) in a random empty cell; no-op on a full board
    pub fn add_random_tile<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        if !self.cells_available() {
            return;
        }
        let value = if rng.random_bool(FOUR_PROBABILITY) { 4 } else { 2 };
        if let Some(position) = self.random_available_cell(rng) {
            trace!("Spawning {} at ({}, {})", value, position.x, position.y);
            self.insert_tile(Tile::new(position, value));
        }
    }

    pub fn add_start_tiles<R: Rng + ?Sized>(&mut self, count: usize, rng: &mut R) {
        for _ in 0..count {
            self.add_random_tile(rng);
        }
    }

    /// Environment response to a player move: spawn a tile and hand the turn back
    pub fn computer_move<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.add_random_tile(rng);
        self.player_turn = true;
    }

    /// Save all tile positions and remove merger info
    fn prepare_tiles(&mut self) {
        for tile in self.cells.iter_mut().flatten().flatten() {
            tile.merged_from = None;
            tile.save_position();
        }
    }

    fn move_tile(&mut self, from: Position, to: Position) {
        let (Some((fx, fy)), Some((tx, ty))) = (Self::index(from), Self::index(to)) else {
            return;
        };
        if let Some(mut tile) = self.cells[fx][fy].take() {
            tile.update_position(to);
            self.cells[tx][ty] = Some(tile);
        }
    }

    /// Builds the visiting order for a move so tiles nearest the target edge go first
    pub fn build_traversals(vector: Position) -> Traversals {
        let mut traversals = Traversals {
            x: [0; GRID_SIZE],
            y: [0; GRID_SIZE],
        };
        for pos in 0..GRID_SIZE {
            traversals.x[pos] = pos;
            traversals.y[pos] = pos;
        }

        if vector.x == 1 {
            traversals.x.reverse();
        }
        if vector.y == 1 {
            traversals.y.reverse();
        }

        traversals
    }

    /// Walks from `start` along `vector` until the next cell is out of bounds or occupied
    pub fn find_farthest_position(&self, start: Position, vector: Position) -> FarthestPosition {
        let mut previous = start;
        let mut cell = start.offset(vector);

        while self.within_bounds(cell) && self.cell_available(cell) {
            previous = cell;
            cell = previous.offset(vector);
        }

        FarthestPosition {
            farthest: previous,
            next: cell,
        }
    }

    /// Slides every tile in `direction`, merging equal neighbours at most once per tile
    ///
    /// The board is mutated in place. A move that changes nothing reports
    /// `moved == false` and scores 0.
    pub fn move_tiles(&mut self, direction: Direction) -> MoveOutcome {
        let vector = direction.vector();
        let traversals = Self::build_traversals(vector);
        let mut outcome = MoveOutcome::default();
        let mut merged = [[false; GRID_SIZE]; GRID_SIZE];

        self.prepare_tiles();

        for &x in &traversals.x {
            for &y in &traversals.y {
                let Some(tile) = self.cells[x][y] else { continue };
                let cell = Position::new(x as i32, y as i32);
                let positions = self.find_farthest_position(cell, vector);

                // Equal values whose sum would overflow u32 stay apart
                let merge_value = match (
                    self.cell_content(positions.next),
                    Self::index(positions.next),
                ) {
                    (Some(next), Some((nx, ny))) if next.value == tile.value && !merged[nx][ny] => {
                        tile.value.checked_mul(2)
                    }
                    _ => None,
                };

                let destination = if let Some(value) = merge_value {
                    let (nx, ny) = (positions.next.x as usize, positions.next.y as usize);
                    let source = self.cells[nx][ny]
                        .and_then(|t| t.previous_position)
                        .unwrap_or(positions.next);

                    let mut combined = Tile::new(positions.next, value);
                    combined.merged_from = Some([cell, source]);

                    self.insert_tile(combined);
                    self.remove_tile(&tile);
                    merged[nx][ny] = true;

                    outcome.score += u64::from(combined.value);
                    if combined.value == WIN_VALUE {
                        outcome.won = true;
                    }
                    positions.next
                } else {
                    self.move_tile(cell, positions.farthest);
                    positions.farthest
                };

                if destination != cell {
                    self.player_turn = false;
                    outcome.moved = true;
                }
            }
        }

        outcome
    }

    /// True while at least one direction would change the board
    pub fn moves_available(&self) -> bool {
        self.cells_available() || self.tile_matches_available()
    }

    /// Check for orthogonally adjacent tiles of equal value
    pub fn tile_matches_available(&self) -> bool {
        self.tiles().any(|tile| {
            Direction::all().iter().any(|dir| {
                self.cell_content(dir.apply(&tile.position))
                    .map_or(false, |other| other.value == tile.value)
            })
        })
    }

    pub fn max_tile(&self) -> Option<u32> {
        self.tiles().map(|t| t.value).max()
    }

    pub fn is_win(&self) -> bool {
        self.tiles().any(|t| t.value >= WIN_VALUE)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..GRID_SIZE {
            let row: Vec<String> = (0..GRID_SIZE)
                .map(|x| match self.cells[x][y] {
                    Some(tile) => tile.value.to_string(),
                    None => "_".to_string(),
                })
                .collect();
            writeln!(f, "{}", row.join(" "))?;
        }
        Ok(())
    }
}
