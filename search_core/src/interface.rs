//! The common structures and traits.

use std::fmt::{self, Debug, Display};

use serde::{Deserialize, Serialize};

/// A static assessment of a board.
/// Positive values favor [`Side::Max`], negative values favor [`Side::Min`].
pub type Evaluation = f64;

/// Which player acts next.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// The player trying to push the evaluation up.
    Max,
    /// The player trying to push the evaluation down.
    Min,
}

impl Side {
    pub fn opponent(self) -> Side {
        match self {
            Side::Max => Side::Min,
            Side::Min => Side::Max,
        }
    }

    /// The value this side's accumulator starts from before any child is seen.
    /// It is also what a search reports when the side has no legal moves.
    pub fn worst(self) -> Evaluation {
        match self {
            Side::Max => f64::NEG_INFINITY,
            Side::Min => f64::INFINITY,
        }
    }

    /// Strict preference: equal values never displace the incumbent.
    pub fn prefers(self, candidate: Evaluation, incumbent: Evaluation) -> bool {
        match self {
            Side::Max => candidate > incumbent,
            Side::Min => candidate < incumbent,
        }
    }
}

/// A move from one square to another, optionally carrying a special effect
/// such as a promotion.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move<Sq, Fx> {
    pub from: Sq,
    pub to: Sq,
    pub effect: Option<Fx>,
}

impl<Sq, Fx> Move<Sq, Fx> {
    pub fn new(from: Sq, to: Sq) -> Self {
        Self {
            from,
            to,
            effect: None,
        }
    }

    pub fn with_effect(mut self, effect: Fx) -> Self {
        self.effect = Some(effect);
        self
    }
}

/// Canonical, collision-free encoding of a move, used to key a [`MoveTree`](crate::MoveTree).
///
/// The packed layout is `from << 16 | to << 8 | effect`, so every `(u8, u8, u8)`
/// triple maps to exactly one key and back.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MoveKey(u32);

impl MoveKey {
    pub fn pack(from: u8, to: u8, effect: u8) -> Self {
        MoveKey((from as u32) << 16 | (to as u32) << 8 | effect as u32)
    }

    pub fn unpack(self) -> (u8, u8, u8) {
        ((self.0 >> 16) as u8, (self.0 >> 8) as u8, self.0 as u8)
    }
}

impl Debug for MoveKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MoveKey({})", self)
    }
}

impl Display for MoveKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (from, to, effect) = self.unpack();
        write!(f, "{}-{}", from, to)?;
        if effect != 0 {
            write!(f, "={}", effect)?;
        }
        Ok(())
    }
}

/// A board together with the side to move and the rule flags in force.
///
/// Searches never mutate a position; every transition builds a new one.
pub struct Position<G: GameModel> {
    pub side: Side,
    pub board: G::Board,
    pub flags: G::Flags,
}

impl<G: GameModel> Position<G> {
    pub fn new(side: Side, board: G::Board, flags: G::Flags) -> Self {
        Self { side, board, flags }
    }
}

impl<G: GameModel> Clone for Position<G> {
    fn clone(&self) -> Self {
        Self {
            side: self.side,
            board: self.board.clone(),
            flags: self.flags.clone(),
        }
    }
}

impl<G: GameModel> Debug for Position<G>
where
    G::Board: Debug,
    G::Flags: Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Position")
            .field("side", &self.side)
            .field("board", &self.board)
            .field("flags", &self.flags)
            .finish()
    }
}

/// The move type of a game model.
pub type MoveOf<G> = Move<<G as GameModel>::Square, <G as GameModel>::Effect>;

/// Defines the rules for a two-player, perfect-knowledge game.
///
/// The searches only ever talk to a game through this trait: they ask for the
/// legal moves, for the successor of a move, and for a static evaluation of
/// the boards at the search horizon.
pub trait GameModel: Sized {
    /// The type of the board layout.
    type Board: Clone;
    /// Rule state that affects legality, e.g. an en-passant target.
    type Flags: Clone;
    /// The type of a board square.
    type Square: Copy + Eq + Debug;
    /// Special effect a move may carry, e.g. a promotion.
    type Effect: Copy + Eq + Debug;

    /// Generate the legal moves for the side to move.
    /// `moves` is scratch space and is cleared first.
    fn generate_moves(&self, position: &Position<Self>, moves: &mut Vec<MoveOf<Self>>);

    /// Apply a move and return the successor position.
    fn apply_move(&self, position: &Position<Self>, m: &MoveOf<Self>) -> Position<Self>;

    /// Static evaluation of a board.
    fn evaluate(&self, board: &Self::Board) -> Evaluation;

    /// Encode a move as a tree key. Distinct moves must never share a key.
    fn move_key(&self, m: &MoveOf<Self>) -> MoveKey;

    /// Return a human-readable notation for this move.
    fn notation(&self, _m: &MoveOf<Self>) -> Option<String> {
        None
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_side_alternates() {
        assert_eq!(Side::Max.opponent(), Side::Min);
        assert_eq!(Side::Min.opponent().opponent(), Side::Min);
    }

    #[test]
    fn test_prefers_is_strict() {
        assert!(Side::Max.prefers(2.0, 1.0));
        assert!(!Side::Max.prefers(1.0, 1.0));
        assert!(Side::Min.prefers(1.0, 2.0));
        assert!(!Side::Min.prefers(1.0, 1.0));
        assert!(Side::Max.prefers(-1e9, Side::Max.worst()));
        assert!(Side::Min.prefers(1e9, Side::Min.worst()));
    }

    #[test]
    fn test_move_key_roundtrip_and_distinct() {
        let a = MoveKey::pack(1, 2, 0);
        let b = MoveKey::pack(2, 1, 0);
        let c = MoveKey::pack(1, 2, 1);
        assert_ne!(a, b);
        assert_ne!(a, c);
        assert_eq!(c.unpack(), (1, 2, 1));
        assert_eq!(MoveKey::pack(255, 255, 255).unpack(), (255, 255, 255));
        assert_eq!(format!("{}", c), "1-2=1");
        assert_eq!(format!("{}", a), "1-2");
    }
}
