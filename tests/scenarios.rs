//! End-to-end scenarios over the public API.

use amazons_arena::{
    Board, Cell, ClickOutcome, GameConfig, GameController, Phase, Position, Rejection, Side,
    all_units_separated, flood_fill_area, is_valid_move, mobility_count, territory_for_side,
};

fn four_by_four() -> Board {
    let mut board = Board::new(4, 4);
    board
        .set(Position::new(0, 0), Cell::Owned(Side::White))
        .unwrap();
    board
        .set(Position::new(3, 3), Cell::Owned(Side::Black))
        .unwrap();
    board
}

#[test]
fn test_diagonal_onto_occupied_cell_is_invalid() {
    let board = four_by_four();
    assert!(!is_valid_move(&board, Position::new(0, 0), Position::new(3, 3)));
}

#[test]
fn test_clear_diagonal_move_applied() {
    let mut board = four_by_four();
    let (from, to) = (Position::new(0, 0), Position::new(2, 2));
    assert!(is_valid_move(&board, from, to));

    board.relocate(from, to).unwrap();
    assert_eq!(board.get(from), Ok(Cell::Empty));
    assert_eq!(board.get(to), Ok(Cell::Owned(Side::White)));
}

#[test]
fn test_ringed_unit_has_no_mobility() {
    let mut board = Board::new(3, 3);
    for (pos, _) in Board::new(3, 3).cells() {
        board.set(pos, Cell::Wall).unwrap();
    }
    board
        .set(Position::new(1, 1), Cell::Owned(Side::White))
        .unwrap();

    assert_eq!(mobility_count(&board, Side::White), 0);
}

#[test]
fn test_split_board_territory() {
    // Two 2x2 regions divided by a wall column
    let board = Board::parse(
        "
        W.#..
        ..#.B
        ",
    )
    .unwrap();

    assert!(all_units_separated(&board));
    assert_eq!(territory_for_side(&board, Side::White), 4);
    assert_eq!(territory_for_side(&board, Side::Black), 4);
    assert_eq!(
        flood_fill_area(&board, Position::new(0, 0), Side::White),
        4
    );
    assert_eq!(
        flood_fill_area(&board, Position::new(4, 1), Side::Black),
        4
    );
}

#[test]
fn test_win_detection_freezes_the_board() {
    let board = Board::parse(
        "
        W#..
        #...
        ...B
        ",
    )
    .unwrap();
    let mut game = GameController::from_board(board, Side::Black);

    assert_eq!(
        game.cell_clicked(3, 2),
        ClickOutcome::UnitSelected(Position::new(3, 2))
    );
    assert!(!game.cell_clicked(2, 2).is_ignored());
    let outcome = game.cell_clicked(1, 1);

    let ClickOutcome::ArrowPlaced { report, .. } = outcome else {
        panic!("expected arrow placement, got {:?}", outcome);
    };
    assert_eq!(report.next_player, Side::White);
    assert_eq!(report.next_player_mobility, 0);
    assert_eq!(report.winner, Some(Side::Black));
    assert_eq!(game.winner(), Some(Side::Black));
    assert_eq!(
        game.phase(),
        Phase::GameOver {
            winner: Side::Black
        }
    );

    let frozen = game.board().clone();
    for (x, y) in [(0, 0), (2, 2), (3, 0), (0, 2), (9, 9)] {
        assert_eq!(
            game.cell_clicked(x, y),
            ClickOutcome::Ignored(Rejection::GameOver)
        );
    }
    assert_eq!(game.board(), &frozen);
    assert_eq!(frozen.to_string(), "W#..\n##..\n..B.\n");
}

#[test]
fn test_full_game_from_config() {
    let config = GameConfig::from_json(
        r#"{
            "board_width": 3,
            "board_height": 2,
            "player_units": { "white": [[0, 0]], "black": [[2, 1]] }
        }"#,
    )
    .unwrap();
    let mut game = GameController::new(&config).unwrap();
    assert_eq!(game.current_player(), Side::White);

    // White: (0,0) -> (1,0), arrow back to (0,0)
    for (x, y) in [(0, 0), (1, 0), (0, 0)] {
        assert!(!game.cell_clicked(x, y).is_ignored());
    }
    assert_eq!(game.board().to_string(), "#W.\n..B\n");
    assert_eq!(game.winner(), None);

    // Black: (2,1) -> (0,1), arrow to (1,1) leaves White two moves
    for (x, y) in [(2, 1), (0, 1), (1, 1)] {
        assert!(!game.cell_clicked(x, y).is_ignored());
    }
    assert_eq!(game.board().to_string(), "#W.\nB#.\n");
    assert_eq!(mobility_count(game.board(), Side::White), 2);
    assert_eq!(game.current_player(), Side::White);
    assert_eq!(game.state().turns(), 2);
}
