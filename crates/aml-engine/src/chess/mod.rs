//! # Chess position resolution
//!
//! A `<chess>` block holds either a FEN position or a move list in SAN
//! (with or without PGN decoration). [`resolve`] turns either into the FEN
//! of the final position, plus the position after every ply when moves are
//! given so a viewer can replay the game.
//!
//! Move legality is checked in full: pins, checks, castling through check
//! and en passant are all honoured. A move that cannot be applied stops
//! replay at the last legal position and is reported in
//! [`Resolution::errors`].

mod board;
mod movegen;
mod pgn;
mod san;

pub use board::{Board, Castling, Color, Piece, Role, STARTING_FEN, Square};
pub use san::{CastleSide, SanMove, parse_san};

use serde::Serialize;
use thiserror::Error;

/// What a `<chess>` block contains, decided once at parse time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChessSource {
    Fen(String),
    Moves(Vec<String>),
}

impl ChessSource {
    /// A block whose first field has seven `/` separators is a FEN; anything
    /// else is a move list.
    pub fn from_raw(raw: &str) -> ChessSource {
        let trimmed = raw.trim();
        match trimmed.split_whitespace().next() {
            Some(first) if first.matches('/').count() == 7 => ChessSource::Fen(trimmed.to_string()),
            _ => ChessSource::Moves(pgn::move_tokens(trimmed)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("not a readable move")]
    Unreadable,
    #[error("no legal move matches")]
    Illegal,
    #[error("more than one piece can make this move")]
    Ambiguous,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChessError {
    #[error("invalid position: {0}")]
    InvalidFen(String),
    #[error("move {ply} ({san}): {reason}")]
    Move {
        /// 1-based ply number.
        ply: usize,
        san: String,
        reason: MoveError,
    },
}

/// One applied half-move and the position it produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ply {
    pub san: String,
    pub fen: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// FEN of the last legal position reached.
    pub fen: String,
    /// Every applied ply, in order. Empty for FEN sources.
    pub plies: Vec<Ply>,
    pub errors: Vec<ChessError>,
}

/// Resolves a block to a displayable position. Never fails outright: an
/// invalid FEN falls back to the starting position, an illegal move stops
/// replay where it occurs.
pub fn resolve(source: &ChessSource) -> Resolution {
    match source {
        ChessSource::Fen(fen) => match Board::from_fen(fen) {
            Ok(board) => Resolution {
                fen: board.to_fen(),
                plies: Vec::new(),
                errors: Vec::new(),
            },
            Err(err) => Resolution {
                fen: STARTING_FEN.to_string(),
                plies: Vec::new(),
                errors: vec![err],
            },
        },
        ChessSource::Moves(moves) => replay(Board::starting(), moves),
    }
}

/// Plays `moves` from `board`, stopping at the first move that fails.
pub fn replay(mut board: Board, moves: &[String]) -> Resolution {
    let mut plies = Vec::with_capacity(moves.len());
    let mut errors = Vec::new();
    for (index, san) in moves.iter().enumerate() {
        match movegen::play_san(&mut board, san) {
            Ok(()) => plies.push(Ply {
                san: san.clone(),
                fen: board.to_fen(),
            }),
            Err(reason) => {
                log::debug!("chess replay stopped at ply {}: {san} ({reason})", index + 1);
                errors.push(ChessError::Move {
                    ply: index + 1,
                    san: san.clone(),
                    reason,
                });
                break;
            }
        }
    }
    Resolution {
        fen: board.to_fen(),
        plies,
        errors,
    }
}
