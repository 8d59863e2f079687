// tests/property/board_props.rs

//! Property-based tests for board invariants
//! Tests that rendering, flagging and digging behave for arbitrary layouts

use minesweeper::core::board::{Board, DigResult, Visibility};
use proptest::prelude::*;

#[derive(Debug, Clone, Copy)]
enum Move {
    Dig(usize, usize),
    Flag(usize, usize),
    Deflag(usize, usize),
}

/// Square layouts from 1x1 to 10x10 with roughly a quarter of squares mined.
fn layout_strategy() -> impl Strategy<Value = Vec<Vec<bool>>> {
    (1usize..=10).prop_flat_map(|size| {
        prop::collection::vec(prop::collection::vec(prop::bool::weighted(0.25), size), size)
    })
}

/// A layout together with an in-range coordinate.
fn layout_and_square() -> impl Strategy<Value = (Vec<Vec<bool>>, usize, usize)> {
    layout_strategy().prop_flat_map(|layout| {
        let size = layout.len();
        (Just(layout), 0..size, 0..size)
    })
}

/// Moves whose coordinates sometimes fall just outside a 10x10 board.
fn moves_strategy() -> impl Strategy<Value = Vec<Move>> {
    let coordinate = 0usize..12;
    let single = prop_oneof![
        (coordinate.clone(), coordinate.clone()).prop_map(|(x, y)| Move::Dig(x, y)),
        (coordinate.clone(), coordinate.clone()).prop_map(|(x, y)| Move::Flag(x, y)),
        (coordinate.clone(), coordinate).prop_map(|(x, y)| Move::Deflag(x, y)),
    ];
    prop::collection::vec(single, 0..40)
}

fn apply(board: &Board, mv: Move) {
    match mv {
        Move::Dig(x, y) => {
            board.dig(x, y);
        }
        Move::Flag(x, y) => {
            board.flag(x, y);
        }
        Move::Deflag(x, y) => {
            board.deflag(x, y);
        }
    }
}

fn orthogonal_bombs(layout: &[Vec<bool>], x: usize, y: usize) -> usize {
    let size = layout.len();
    let mut count = 0;
    if x > 0 && layout[x - 1][y] {
        count += 1;
    }
    if x + 1 < size && layout[x + 1][y] {
        count += 1;
    }
    if y > 0 && layout[x][y - 1] {
        count += 1;
    }
    if y + 1 < size && layout[x][y + 1] {
        count += 1;
    }
    count
}

fn surrounding(size: usize, x: usize, y: usize) -> Vec<(usize, usize)> {
    let mut out = Vec::new();
    for nx in x.saturating_sub(1)..=(x + 1).min(size - 1) {
        for ny in y.saturating_sub(1)..=(y + 1).min(size - 1) {
            if (nx, ny) != (x, y) {
                out.push((nx, ny));
            }
        }
    }
    out
}

fn is_dug(board: &Board, x: usize, y: usize) -> bool {
    board
        .square(x, y)
        .is_some_and(|sq| sq.visibility() == Visibility::Dug)
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 200,
        ..ProptestConfig::default()
    })]

    #[test]
    fn test_render_shape_holds_after_any_moves(layout in layout_strategy(), moves in moves_strategy()) {
        let size = layout.len();
        let board = Board::from_layout(&layout).unwrap();
        for mv in moves {
            apply(&board, mv);
        }

        let render = board.render();
        let rows: Vec<&str> = render.lines().collect();
        prop_assert_eq!(rows.len(), size);
        prop_assert!(render.ends_with('\n'));
        for row in rows {
            prop_assert_eq!(row.chars().count(), size);
            prop_assert!(row.chars().all(|c| matches!(c, '-' | 'F' | ' ')));
        }
    }

    #[test]
    fn test_flag_deflag_round_trip((layout, x, y) in layout_and_square(), dig in any::<bool>()) {
        let board = Board::from_layout(&layout).unwrap();
        // Optionally disturb another part of the board first.
        let size = layout.len();
        if dig && size > 1 {
            board.dig((x + 1) % size, (y + 1) % size);
        }
        prop_assume!(board.square(x, y).unwrap().is_untouched());

        let before = board.render();
        prop_assert!(board.flag(x, y));
        prop_assert_ne!(board.render(), before.clone());
        prop_assert!(board.deflag(x, y));
        prop_assert_eq!(board.render(), before);
    }

    #[test]
    fn test_second_dig_is_a_no_op((layout, x, y) in layout_and_square()) {
        let board = Board::from_layout(&layout).unwrap();
        let first = board.dig(x, y);
        prop_assert_ne!(first, DigResult::Unchanged);
        prop_assert_eq!(first == DigResult::Bomb, layout[x][y]);

        let after_first = board.render();
        prop_assert_eq!(board.dig(x, y), DigResult::Unchanged);
        prop_assert_eq!(board.render(), after_first);
    }

    #[test]
    fn test_cascade_reveals_a_maximal_safe_region((layout, x, y) in layout_and_square()) {
        prop_assume!(!layout[x][y]);
        let size = layout.len();
        let board = Board::from_layout(&layout).unwrap();

        let revealed = match board.dig(x, y) {
            DigResult::Revealed { squares } => squares,
            other => return Err(TestCaseError::fail(format!("unexpected {other:?}"))),
        };

        let mut dug = 0;
        for sx in 0..size {
            for sy in 0..size {
                if !is_dug(&board, sx, sy) {
                    continue;
                }
                dug += 1;
                // The fill never digs a bomb.
                prop_assert!(!layout[sx][sy]);
                // Every dug square other than the origin was reached from a
                // dug zero square next to it.
                if (sx, sy) != (x, y) {
                    prop_assert!(surrounding(size, sx, sy)
                        .into_iter()
                        .any(|(nx, ny)| is_dug(&board, nx, ny) && orthogonal_bombs(&layout, nx, ny) == 0));
                }
                // The fill does not stop early: every safe square around a
                // dug zero square is dug too.
                if orthogonal_bombs(&layout, sx, sy) == 0 {
                    for (nx, ny) in surrounding(size, sx, sy) {
                        prop_assert!(layout[nx][ny] || is_dug(&board, nx, ny));
                    }
                }
            }
        }
        prop_assert!(is_dug(&board, x, y));
        prop_assert_eq!(dug, revealed);
    }

    #[test]
    fn test_neighbor_count_matches_layout((layout, x, y) in layout_and_square()) {
        let board = Board::from_layout(&layout).unwrap();
        prop_assert_eq!(board.count_bomb_neighbors(x, y).unwrap(), orthogonal_bombs(&layout, x, y));
        prop_assert!(board.count_bomb_neighbors(layout.len(), y).is_err());
    }
}
