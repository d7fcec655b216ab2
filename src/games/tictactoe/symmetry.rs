//! The eight symmetries of the square board (rotations and reflections).

use super::{Board, Position, Square};

/// A rigid transformation of the 3x3 grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::EnumIter)]
pub enum Symmetry {
    /// No change.
    Identity,
    /// Quarter turn clockwise.
    Rotate90,
    /// Half turn.
    Rotate180,
    /// Quarter turn counter-clockwise.
    Rotate270,
    /// Mirror across the vertical axis.
    FlipHorizontal,
    /// Mirror across the horizontal axis.
    FlipVertical,
    /// Mirror across the main diagonal.
    Transpose,
    /// Mirror across the anti-diagonal.
    AntiTranspose,
}

impl Symmetry {
    /// Where `pos` lands under this transformation.
    pub fn map(self, pos: Position) -> Position {
        let (r, c) = (pos.row(), pos.col());
        let (row, col) = match self {
            Symmetry::Identity => (r, c),
            Symmetry::Rotate90 => (c, 2 - r),
            Symmetry::Rotate180 => (2 - r, 2 - c),
            Symmetry::Rotate270 => (2 - c, r),
            Symmetry::FlipHorizontal => (r, 2 - c),
            Symmetry::FlipVertical => (2 - r, c),
            Symmetry::Transpose => (c, r),
            Symmetry::AntiTranspose => (2 - c, 2 - r),
        };
        // row and col stay within 0..3 for every arm above
        Position::ALL[row * 3 + col]
    }

    /// Applies the transformation to every square of `board`.
    pub fn apply(self, board: &Board) -> Board {
        let mut squares = [Square::Empty; 9];
        for pos in Position::ALL {
            squares[self.map(pos).to_index()] = board.get(pos);
        }
        Board::from_squares(squares)
    }
}
