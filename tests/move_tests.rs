//! Move Simulation Tests
//!
//! Sliding, merging and scoring behaviour of `Board::move_tiles`,
//! plus terminal-state detection and clone isolation.

use grid_2048::board::Board;
use grid_2048::types::{Direction, Position};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn row(values: [u32; 4]) -> Board {
    Board::from_values([values, [0; 4], [0; 4], [0; 4]])
}

fn column(values: [u32; 4]) -> Board {
    let mut rows = [[0; 4]; 4];
    for (y, value) in values.iter().enumerate() {
        rows[y][0] = *value;
    }
    Board::from_values(rows)
}

fn random_board(rng: &mut StdRng) -> Board {
    let mut rows = [[0; 4]; 4];
    for row in rows.iter_mut() {
        for cell in row.iter_mut() {
            if rng.random_bool(0.7) {
                *cell = 1 << rng.random_range(1..5u32);
            }
        }
    }
    Board::from_values(rows)
}

#[test]
fn test_pair_then_single_moved_left() {
    let mut board = row([2, 2, 4, 0]);
    let outcome = board.move_tiles(Direction::Left);

    assert_eq!(board.values()[0], [4, 4, 0, 0]);
    assert_eq!(outcome.score, 4);
    assert!(outcome.moved);
    assert!(!outcome.won);
}

#[test]
fn test_four_equal_tiles_merge_pairwise() {
    let mut board = row([2, 2, 2, 2]);
    let outcome = board.move_tiles(Direction::Left);

    assert_eq!(board.values()[0], [4, 4, 0, 0], "Must not collapse into a single 8");
    assert_eq!(outcome.score, 8);
}

#[test]
fn test_four_equal_tiles_moved_right() {
    let mut board = row([2, 2, 2, 2]);
    let outcome = board.move_tiles(Direction::Right);

    assert_eq!(board.values()[0], [0, 0, 4, 4]);
    assert_eq!(outcome.score, 8);
}

#[test]
fn test_merged_tile_does_not_merge_again() {
    let mut board = row([4, 4, 8, 0]);
    let outcome = board.move_tiles(Direction::Left);

    assert_eq!(board.values()[0], [8, 8, 0, 0], "A fresh 8 must not absorb the sliding 8");
    assert_eq!(outcome.score, 8);
}

#[test]
fn test_merge_nearest_pair_first() {
    let mut board = row([0, 2, 2, 2]);
    board.move_tiles(Direction::Right);
    assert_eq!(board.values()[0], [0, 0, 2, 4]);

    let mut board = row([2, 2, 2, 0]);
    board.move_tiles(Direction::Left);
    assert_eq!(board.values()[0], [4, 2, 0, 0]);
}

#[test]
fn test_slide_over_gaps() {
    let mut board = row([2, 0, 0, 2]);
    let outcome = board.move_tiles(Direction::Right);
    assert_eq!(board.values()[0], [0, 0, 0, 4]);
    assert_eq!(outcome.score, 4);

    let mut board = row([0, 4, 0, 2]);
    let outcome = board.move_tiles(Direction::Left);
    assert_eq!(board.values()[0], [4, 2, 0, 0]);
    assert_eq!(outcome.score, 0);
    assert!(outcome.moved);
}

#[test]
fn test_vertical_moves() {
    let mut board = column([2, 2, 4, 0]);
    let outcome = board.move_tiles(Direction::Up);
    assert_eq!(board.values().map(|r| r[0]), [4, 4, 0, 0]);
    assert_eq!(outcome.score, 4);

    let mut board = column([2, 2, 4, 0]);
    let outcome = board.move_tiles(Direction::Down);
    assert_eq!(board.values().map(|r| r[0]), [0, 0, 4, 4]);
    assert_eq!(outcome.score, 4);
}

#[test]
fn test_packed_row_does_not_move() {
    let mut board = row([2, 4, 8, 16]);
    let outcome = board.move_tiles(Direction::Left);

    assert!(!outcome.moved);
    assert_eq!(outcome.score, 0);
    assert_eq!(board.values()[0], [2, 4, 8, 16]);
}

#[test]
fn test_empty_board_does_not_move() {
    let mut board = Board::empty();
    for direction in Direction::all() {
        let outcome = board.move_tiles(direction);
        assert!(!outcome.moved);
        assert_eq!(outcome.score, 0);
    }
}

#[test]
fn test_winning_merge_sets_flag() {
    let mut board = row([1024, 1024, 0, 0]);
    assert!(!board.is_win());

    let outcome = board.move_tiles(Direction::Left);
    assert!(outcome.won);
    assert_eq!(outcome.score, 2048);
    assert!(board.is_win());
}

#[test]
fn test_largest_tiles_merge_without_overflow() {
    let mut board = row([1 << 16, 1 << 16, 0, 0]);
    let outcome = board.move_tiles(Direction::Left);
    assert_eq!(board.values()[0], [1 << 17, 0, 0, 0]);
    assert_eq!(outcome.score, 1 << 17);
}

#[test]
fn test_unrepresentable_merge_leaves_tiles_apart() {
    let mut board = row([1 << 31, 1 << 31, 0, 0]);
    let outcome = board.move_tiles(Direction::Left);

    assert!(!outcome.moved);
    assert_eq!(outcome.score, 0);
    assert_eq!(board.values()[0], [1 << 31, 1 << 31, 0, 0]);
    assert!(board.tiles().all(|t| t.value != 0));
}

#[test]
fn test_tiles_keep_positions_consistent_with_cells() {
    let mut rng = StdRng::seed_from_u64(99);
    for _ in 0..50 {
        let mut board = random_board(&mut rng);
        for direction in Direction::all() {
            board.move_tiles(direction);
            for x in 0..4 {
                for y in 0..4 {
                    let pos = Position::new(x, y);
                    if let Some(tile) = board.cell_content(pos) {
                        assert_eq!(tile.position, pos);
                    }
                }
            }
        }
    }
}

#[test]
fn test_tile_count_drops_by_one_per_merge() {
    let mut rng = StdRng::seed_from_u64(2048);
    for _ in 0..200 {
        let board = random_board(&mut rng);
        for direction in Direction::all() {
            let mut moved = board.clone();
            let outcome = moved.move_tiles(direction);

            let merges: Vec<u32> = moved
                .tiles()
                .filter(|t| t.merged_from.is_some())
                .map(|t| t.value)
                .collect();

            assert_eq!(moved.tile_count(), board.tile_count() - merges.len());
            assert_eq!(outcome.score, merges.iter().map(|&v| u64::from(v)).sum::<u64>());
            if merges.is_empty() && !outcome.moved {
                assert_eq!(moved, board);
            }
        }
    }
}

#[test]
fn test_moves_available() {
    let stuck = Board::from_values([[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 2]]);
    assert!(!stuck.moves_available());
    assert!(!stuck.tile_matches_available());

    let mergeable = Board::from_values([[2, 2, 4, 8], [4, 8, 16, 32], [8, 16, 32, 64], [16, 32, 64, 128]]);
    assert!(!mergeable.cells_available());
    assert!(mergeable.moves_available());

    let vertical = Board::from_values([[2, 4, 2, 4], [2, 8, 4, 2], [4, 2, 8, 4], [8, 4, 2, 8]]);
    assert!(vertical.moves_available());

    let with_gap = Board::from_values([[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 0, 4], [4, 2, 4, 2]]);
    assert!(with_gap.moves_available());
}

#[test]
fn test_clone_is_isolated() {
    let original = row([2, 2, 0, 8]);
    let mut copy = original.clone();

    copy.move_tiles(Direction::Left);
    copy.insert_tile(grid_2048::types::Tile::new(Position::new(3, 3), 64));

    assert_eq!(original.values()[0], [2, 2, 0, 8]);
    assert!(original.cell_available(Position::new(3, 3)));
    assert_ne!(copy, original);
}

#[test]
fn test_clone_drops_move_bookkeeping() {
    let mut board = row([2, 2, 0, 0]);
    board.move_tiles(Direction::Left);
    assert!(!board.player_turn());

    let copy = board.clone();
    assert_eq!(copy, board);
    assert_eq!(copy.player_turn(), board.player_turn());
    assert!(copy
        .tiles()
        .all(|t| t.merged_from.is_none() && t.previous_position.is_none()));
}
