//! Tests for tic-tac-toe positions and board parsing.

use strictly_arena::{Board, Player, Position, Square};

#[test]
fn test_position_to_index() {
    assert_eq!(Position::TopLeft.to_index(), 0);
    assert_eq!(Position::Center.to_index(), 4);
    assert_eq!(Position::BottomRight.to_index(), 8);
}

#[test]
fn test_position_from_index() {
    assert_eq!(Position::from_index(0), Some(Position::TopLeft));
    assert_eq!(Position::from_index(4), Some(Position::Center));
    assert_eq!(Position::from_index(8), Some(Position::BottomRight));
    assert_eq!(Position::from_index(9), None);
}

#[test]
fn test_row_col_round_trip_for_every_square() {
    for pos in Position::ALL {
        assert_eq!(Position::from_row_col(pos.row(), pos.col()), Some(pos));
    }
    assert_eq!(Position::from_row_col(3, 0), None);
}

#[test]
fn test_valid_moves_empty_board() {
    let board = Board::new();
    let valid = Position::valid_moves(&board);
    assert_eq!(valid.len(), 9); // All positions valid on empty board
}

#[test]
fn test_valid_moves_filters_occupied() {
    let mut board = Board::new();
    board.set(Position::TopLeft, Square::Occupied(Player::X));
    board.set(Position::Center, Square::Occupied(Player::O));

    let valid = Position::valid_moves(&board);
    assert_eq!(valid.len(), 7); // 2 occupied, 7 free
    assert!(!valid.contains(&Position::TopLeft));
    assert!(!valid.contains(&Position::Center));
    assert!(valid.contains(&Position::BottomRight));
}

#[test]
fn test_board_parse_ignores_separators() {
    let board: Board = "X|O|.\n.|X|.\n_|-|O".parse().expect("Parse failed");
    assert_eq!(board.compact(), "XO..X...O");
    assert_eq!(board.occupied_count(), 4);
}

#[test]
fn test_board_parse_rejects_wrong_length() {
    assert!("XO".parse::<Board>().is_err());
    assert!("..........".parse::<Board>().is_err());
    assert!("XX.OO..Z.".parse::<Board>().is_err());
}

#[test]
fn test_board_json_matches_wire_format() {
    let board: Board = "XX.OO....".parse().expect("Parse failed");
    let json = serde_json::to_value(board).expect("Serialize failed");
    assert_eq!(
        json,
        serde_json::json!(["X", "X", "", "O", "O", "", "", "", ""])
    );

    let back: Board = serde_json::from_value(json).expect("Deserialize failed");
    assert_eq!(back, board);
}

#[test]
fn test_board_json_rejects_unknown_symbol() {
    let result: Result<Board, _> =
        serde_json::from_value(serde_json::json!(["Z", "", "", "", "", "", "", "", ""]));
    assert!(result.is_err());
}
