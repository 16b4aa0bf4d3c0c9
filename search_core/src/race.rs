//! A 5x5 pawn race: a small board game for driving the searches.
//!
//! White (the maximizing side) starts with a pawn on every square of rank 1,
//! Black (minimizing) on rank 5. Pawns step straight forward onto empty
//! squares, diagonally forward onto empty or enemy squares, and may
//! double-step from their home rank. A double step leaves an en-passant
//! target in the flags for one ply. The first pawn to reach the far rank
//! promotes and ends the game.

use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

use crate::interface::{Evaluation, GameModel, Move, MoveKey, MoveOf, Position, Side};

pub const SIZE: usize = 5;
const CELLS: usize = SIZE * SIZE;

const WIN_SCORE: Evaluation = 1000.0;
const PAWN_SCORE: Evaluation = 10.0;

pub struct PawnRace;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Effect {
    Promote,
}

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct RaceFlags {
    /// Square skipped by a double step on the previous ply.
    pub en_passant: Option<u8>,
}

#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Board {
    cells: [Option<Side>; CELLS],
}

//  rank 5:  20  21  22  23  24
//  ...
//  rank 1:   0   1   2   3   4
fn coord(sq: u8) -> (usize, usize) {
    // row, col
    (sq as usize / SIZE, sq as usize % SIZE)
}

fn square(row: usize, col: usize) -> u8 {
    (col + row * SIZE) as u8
}

fn home_row(side: Side) -> usize {
    match side {
        Side::Max => 0,
        Side::Min => SIZE - 1,
    }
}

fn promotion_row(side: Side) -> usize {
    home_row(side.opponent())
}

fn step(side: Side, row: usize) -> Option<usize> {
    match side {
        Side::Max if row + 1 < SIZE => Some(row + 1),
        Side::Min if row > 0 => Some(row - 1),
        _ => None,
    }
}

pub fn square_name(sq: u8) -> String {
    let (row, col) = coord(sq);
    format!("{}{}", (b'a' + col as u8) as char, row + 1)
}

pub fn parse_square(text: &str) -> Option<u8> {
    let mut chars = text.trim().chars();
    let file = chars.next()?.to_ascii_lowercase();
    let rank = chars.as_str().parse::<usize>().ok()?;
    let col = (file as u32).checked_sub('a' as u32)? as usize;
    if col >= SIZE || rank == 0 || rank > SIZE {
        return None;
    }
    Some(square(rank - 1, col))
}

impl Board {
    pub fn empty() -> Self {
        Self {
            cells: [None; CELLS],
        }
    }

    pub fn start() -> Self {
        let mut board = Self::empty();
        for col in 0..SIZE {
            board.cells[square(home_row(Side::Max), col) as usize] = Some(Side::Max);
            board.cells[square(home_row(Side::Min), col) as usize] = Some(Side::Min);
        }
        board
    }

    /// Build a board from its ranks, top (rank 5) first.
    /// `X` is a White pawn, `O` a Black pawn, `.` or `_` an empty square.
    pub fn from_ranks(ranks: [&str; SIZE]) -> Option<Self> {
        let mut board = Self::empty();
        for (i, rank) in ranks.iter().enumerate() {
            let row = SIZE - 1 - i;
            let cells: Vec<char> = rank.chars().filter(|c| !c.is_whitespace()).collect();
            if cells.len() != SIZE {
                return None;
            }
            for (col, c) in cells.into_iter().enumerate() {
                board.cells[square(row, col) as usize] = match c {
                    'X' | 'x' => Some(Side::Max),
                    'O' | 'o' => Some(Side::Min),
                    '.' | '_' => None,
                    _ => return None,
                };
            }
        }
        Some(board)
    }

    pub fn get(&self, sq: u8) -> Option<Side> {
        self.cells[sq as usize]
    }

    pub fn count(&self, side: Side) -> usize {
        self.cells.iter().filter(|c| **c == Some(side)).count()
    }

    /// The side that has promoted a pawn, if any.
    pub fn promoted(&self) -> Option<Side> {
        [Side::Max, Side::Min].into_iter().find(|&side| {
            let row = promotion_row(side);
            (0..SIZE).any(|col| self.cells[square(row, col) as usize] == Some(side))
        })
    }

    pub fn is_over(&self) -> bool {
        self.promoted().is_some() || self.count(Side::Max) == 0 || self.count(Side::Min) == 0
    }
}

impl Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in (0..SIZE).rev() {
            write!(f, "{} ", row + 1)?;
            for col in 0..SIZE {
                let c = match self.cells[square(row, col) as usize] {
                    Some(Side::Max) => "X ",
                    Some(Side::Min) => "O ",
                    None => "_ ",
                };
                write!(f, "{}", c)?;
            }
            writeln!(f)?;
        }
        write!(f, "  ")?;
        for col in 0..SIZE {
            write!(f, "{} ", (b'a' + col as u8) as char)?;
        }
        writeln!(f)
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\n{}", self)
    }
}

impl PawnRace {
    pub fn start() -> Position<PawnRace> {
        Position::new(Side::Max, Board::start(), RaceFlags::default())
    }

    /// Find the legal move written as `"a2 a3"` or `"a2a3"`.
    pub fn parse_move(&self, position: &Position<Self>, text: &str) -> Option<MoveOf<Self>> {
        let text = text.trim();
        let (from, to) = match text.split_once(char::is_whitespace) {
            Some((from, to)) => (from, to),
            None if text.len() == 4 && text.is_char_boundary(2) => text.split_at(2),
            None => return None,
        };
        let (from, to) = (parse_square(from)?, parse_square(to)?);
        let mut moves = Vec::new();
        self.generate_moves(position, &mut moves);
        moves.into_iter().find(|m| m.from == from && m.to == to)
    }
}

impl GameModel for PawnRace {
    type Board = Board;
    type Flags = RaceFlags;
    type Square = u8;
    type Effect = Effect;

    fn generate_moves(&self, position: &Position<Self>, moves: &mut Vec<MoveOf<Self>>) {
        moves.clear();
        let board = &position.board;
        if board.is_over() {
            return;
        }
        let side = position.side;
        let promote = |row: usize| {
            if row == promotion_row(side) {
                Some(Effect::Promote)
            } else {
                None
            }
        };

        for sq in 0..CELLS as u8 {
            if board.get(sq) != Some(side) {
                continue;
            }
            let (row, col) = coord(sq);
            let Some(ahead) = step(side, row) else {
                continue;
            };

            let straight = square(ahead, col);
            if board.get(straight).is_none() {
                moves.push(Move {
                    from: sq,
                    to: straight,
                    effect: promote(ahead),
                });
                if row == home_row(side) {
                    if let Some(two) = step(side, ahead) {
                        if board.get(square(two, col)).is_none() {
                            moves.push(Move {
                                from: sq,
                                to: square(two, col),
                                effect: promote(two),
                            });
                        }
                    }
                }
            }

            for diag in [col.checked_sub(1), Some(col + 1)].into_iter().flatten() {
                if diag >= SIZE {
                    continue;
                }
                let target = square(ahead, diag);
                if board.get(target) != Some(side) {
                    moves.push(Move {
                        from: sq,
                        to: target,
                        effect: promote(ahead),
                    });
                }
            }
        }
    }

    fn apply_move(&self, position: &Position<Self>, m: &MoveOf<Self>) -> Position<Self> {
        let side = position.side;
        let mut board = position.board.clone();
        let (from_row, from_col) = coord(m.from);
        let (to_row, to_col) = coord(m.to);

        if from_col != to_col && position.flags.en_passant == Some(m.to) {
            // The double-stepped pawn sits one rank beyond the skipped square.
            board.cells[square(from_row, to_col) as usize] = None;
        }
        board.cells[m.from as usize] = None;
        board.cells[m.to as usize] = Some(side);

        let en_passant = if from_row.abs_diff(to_row) == 2 {
            Some(square((from_row + to_row) / 2, from_col))
        } else {
            None
        };
        Position::new(side.opponent(), board, RaceFlags { en_passant })
    }

    fn evaluate(&self, board: &Board) -> Evaluation {
        match board.promoted() {
            Some(Side::Max) => return WIN_SCORE,
            Some(Side::Min) => return -WIN_SCORE,
            None => {}
        }
        let (max, min) = (board.count(Side::Max), board.count(Side::Min));
        if min == 0 {
            return WIN_SCORE;
        }
        if max == 0 {
            return -WIN_SCORE;
        }

        let mut score = (max as Evaluation - min as Evaluation) * PAWN_SCORE;
        for sq in 0..CELLS as u8 {
            let (row, _) = coord(sq);
            if let Some(side) = board.get(sq) {
                let advance = row.abs_diff(home_row(side)) as Evaluation;
                score += if side == Side::Max { advance } else { -advance };
            }
        }
        score
    }

    fn move_key(&self, m: &MoveOf<Self>) -> MoveKey {
        let effect = match m.effect {
            None => 0,
            Some(Effect::Promote) => 1,
        };
        MoveKey::pack(m.from, m.to, effect)
    }

    fn notation(&self, m: &MoveOf<Self>) -> Option<String> {
        let mut text = format!("{}-{}", square_name(m.from), square_name(m.to));
        if m.effect == Some(Effect::Promote) {
            text.push_str("=P");
        }
        Some(text)
    }
}
