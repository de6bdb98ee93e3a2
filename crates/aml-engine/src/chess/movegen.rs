//! Legal move matching and application.

use super::MoveError;
use super::board::{Board, Color, Piece, Role, Square};
use super::san::{CastleSide, SanMove, parse_san};

const KNIGHT: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];
const KING: [(i8, i8); 8] = [
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
    (-1, 0),
    (-1, 1),
];
const ROOK_DIRS: [(i8, i8); 4] = [(0, 1), (1, 0), (0, -1), (-1, 0)];
const BISHOP_DIRS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, -1), (-1, 1)];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Move {
    from: Square,
    to: Square,
    promotion: Option<Role>,
}

/// First occupied square from `from` along a direction.
fn ray_hit(board: &Board, from: Square, (df, dr): (i8, i8)) -> Option<(Square, Piece)> {
    let mut at = from;
    while let Some(next) = at.offset(df, dr) {
        if let Some(piece) = board.piece_at(next) {
            return Some((next, piece));
        }
        at = next;
    }
    None
}

fn slides_to(board: &Board, from: Square, to: Square, dirs: &[(i8, i8)]) -> bool {
    dirs.iter().any(|&(df, dr)| {
        let mut at = from;
        while let Some(next) = at.offset(df, dr) {
            if next == to {
                return true;
            }
            if board.piece_at(next).is_some() {
                return false;
            }
            at = next;
        }
        false
    })
}

/// Whether any piece of `by` attacks `square`.
pub(crate) fn is_attacked(board: &Board, square: Square, by: Color) -> bool {
    let has = |s: Option<Square>, role: Role| {
        s.and_then(|s| board.piece_at(s)) == Some(Piece::new(by, role))
    };

    if KNIGHT.iter().any(|&(df, dr)| has(square.offset(df, dr), Role::Knight)) {
        return true;
    }
    if KING.iter().any(|&(df, dr)| has(square.offset(df, dr), Role::King)) {
        return true;
    }
    // A pawn of `by` attacks diagonally forward, so look one rank behind.
    let back = -by.forward();
    if has(square.offset(-1, back), Role::Pawn) || has(square.offset(1, back), Role::Pawn) {
        return true;
    }
    let slider = |dirs: &[(i8, i8)], role: Role| {
        dirs.iter().any(|&dir| {
            matches!(ray_hit(board, square, dir),
                Some((_, p)) if p.color == by && (p.role == role || p.role == Role::Queen))
        })
    };
    slider(&ROOK_DIRS, Role::Rook) || slider(&BISHOP_DIRS, Role::Bishop)
}

pub(crate) fn in_check(board: &Board, color: Color) -> bool {
    board
        .king_square(color)
        .is_some_and(|king| is_attacked(board, king, color.opponent()))
}

/// Whether the piece on `from` could move to `to` by its movement rules,
/// ignoring whether its own king is left in check.
fn can_reach(board: &Board, from: Square, to: Square) -> bool {
    let Some(piece) = board.piece_at(from) else {
        return false;
    };
    if board.piece_at(to).is_some_and(|p| p.color == piece.color) {
        return false;
    }
    let df = to.file() as i8 - from.file() as i8;
    let dr = to.rank() as i8 - from.rank() as i8;
    match piece.role {
        Role::Knight => KNIGHT.contains(&(df, dr)),
        Role::King => KING.contains(&(df, dr)),
        Role::Rook => slides_to(board, from, to, &ROOK_DIRS),
        Role::Bishop => slides_to(board, from, to, &BISHOP_DIRS),
        Role::Queen => {
            slides_to(board, from, to, &ROOK_DIRS) || slides_to(board, from, to, &BISHOP_DIRS)
        }
        Role::Pawn => {
            let forward = piece.color.forward();
            let target = board.piece_at(to);
            if df == 0 && target.is_none() {
                if dr == forward {
                    return true;
                }
                let start_rank = if piece.color == Color::White { 1 } else { 6 };
                dr == 2 * forward
                    && from.rank() == start_rank
                    && from
                        .offset(0, forward)
                        .is_some_and(|mid| board.piece_at(mid).is_none())
            } else if df.abs() == 1 && dr == forward {
                target.is_some() || board.en_passant == Some(to)
            } else {
                false
            }
        }
    }
}

/// Plays `mv` on a copy and reports whether the mover's king is safe.
fn leaves_king_safe(board: &Board, mv: Move) -> bool {
    let mut next = board.clone();
    let mover = board.turn;
    apply(&mut next, mv);
    !in_check(&next, mover)
}

/// Applies a move known to be legal, updating every position field.
fn apply(board: &mut Board, mv: Move) {
    let Some(piece) = board.piece_at(mv.from) else {
        return;
    };
    let captured = board.piece_at(mv.to);
    let mut is_capture = captured.is_some();

    if piece.role == Role::Pawn && board.en_passant == Some(mv.to) && captured.is_none() {
        // En passant: the captured pawn sits beside the mover, not on `to`.
        let victim = Square::new(mv.to.file(), mv.from.rank());
        board.set(victim, None);
        is_capture = true;
    }

    if piece.role == Role::King && (mv.to.file() as i8 - mv.from.file() as i8).abs() == 2 {
        let rank = mv.from.rank();
        let (rook_from, rook_to) = if mv.to.file() == 6 {
            (Square::new(7, rank), Square::new(5, rank))
        } else {
            (Square::new(0, rank), Square::new(3, rank))
        };
        let rook = board.piece_at(rook_from);
        board.set(rook_from, None);
        board.set(rook_to, rook);
    }

    let placed = match mv.promotion {
        Some(role) if piece.role == Role::Pawn => Piece::new(piece.color, role),
        _ => piece,
    };
    board.set(mv.from, None);
    board.set(mv.to, Some(placed));

    board.castling.touch(mv.from);
    board.castling.touch(mv.to);

    board.en_passant = None;
    if piece.role == Role::Pawn && (mv.to.rank() as i8 - mv.from.rank() as i8).abs() == 2 {
        board.en_passant = mv.from.offset(0, piece.color.forward());
    }

    if piece.role == Role::Pawn || is_capture {
        board.halfmove = 0;
    } else {
        board.halfmove += 1;
    }
    if board.turn == Color::Black {
        board.fullmove += 1;
    }
    board.turn = board.turn.opponent();
}

fn castle_move(board: &Board, side: CastleSide) -> Result<Move, MoveError> {
    let color = board.turn;
    let rank = color.back_rank();
    let allowed = match side {
        CastleSide::King => board.castling.kingside(color),
        CastleSide::Queen => board.castling.queenside(color),
    };
    let king_from = Square::new(4, rank);
    let (king_to, rook_from, empty, safe): (u8, u8, &[u8], &[u8]) = match side {
        CastleSide::King => (6, 7, &[5, 6], &[4, 5, 6]),
        CastleSide::Queen => (2, 0, &[1, 2, 3], &[4, 3, 2]),
    };
    let pieces_home = board.piece_at(king_from) == Some(Piece::new(color, Role::King))
        && board.piece_at(Square::new(rook_from, rank)) == Some(Piece::new(color, Role::Rook));
    let path_clear = empty
        .iter()
        .all(|&f| board.piece_at(Square::new(f, rank)).is_none());
    let path_safe = safe
        .iter()
        .all(|&f| !is_attacked(board, Square::new(f, rank), color.opponent()));

    if allowed && pieces_home && path_clear && path_safe {
        Ok(Move {
            from: king_from,
            to: Square::new(king_to, rank),
            promotion: None,
        })
    } else {
        Err(MoveError::Illegal)
    }
}

/// Finds the unique legal move `san` describes and plays it.
pub(crate) fn play_san(board: &mut Board, san: &str) -> Result<(), MoveError> {
    let mv = match parse_san(san)? {
        SanMove::Castle(side) => castle_move(board, side)?,
        SanMove::Normal {
            role,
            from_file,
            from_rank,
            to,
            promotion,
        } => {
            let color = board.turn;
            // Bare coordinates (`g8f6`) name the piece by its square.
            let role = match (from_file, from_rank) {
                (Some(f), Some(r)) if role == Role::Pawn => board
                    .piece_at(Square::new(f, r))
                    .filter(|p| p.color == color)
                    .map_or(role, |p| p.role),
                _ => role,
            };
            let candidates: Vec<Move> = Square::all()
                .filter(|&from| board.piece_at(from) == Some(Piece::new(color, role)))
                .filter(|from| from_file.is_none_or(|f| f == from.file()))
                .filter(|from| from_rank.is_none_or(|r| r == from.rank()))
                .filter(|&from| can_reach(board, from, to))
                .map(|from| Move {
                    from,
                    to,
                    promotion: promotion_for(role, to, promotion),
                })
                .filter(|&mv| leaves_king_safe(board, mv))
                .collect();

            match candidates.as_slice() {
                [mv] => *mv,
                [] => {
                    // A king written as moving two files is a castle in disguise.
                    if role == Role::King
                        && from_file == Some(4)
                        && (to.file() == 6 || to.file() == 2)
                        && to.rank() == color.back_rank()
                    {
                        let side = if to.file() == 6 {
                            CastleSide::King
                        } else {
                            CastleSide::Queen
                        };
                        castle_move(board, side)?
                    } else {
                        return Err(MoveError::Illegal);
                    }
                }
                _ => return Err(MoveError::Ambiguous),
            }
        }
    };
    apply(board, mv);
    Ok(())
}

/// Pawns reaching the last rank promote to a queen unless told otherwise.
fn promotion_for(role: Role, to: Square, requested: Option<Role>) -> Option<Role> {
    if role != Role::Pawn || (to.rank() != 0 && to.rank() != 7) {
        return None;
    }
    Some(requested.unwrap_or(Role::Queen))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn board(fen: &str) -> Board {
        Board::from_fen(fen).unwrap()
    }

    fn sq(name: &str) -> Square {
        Square::parse(name).unwrap()
    }

    #[test]
    fn pawn_attacks_point_forward() {
        let b = board("4k3/8/8/3p4/8/8/8/4K3 w - - 0 1");
        assert!(is_attacked(&b, sq("e4"), Color::Black));
        assert!(is_attacked(&b, sq("c4"), Color::Black));
        assert!(!is_attacked(&b, sq("d4"), Color::Black));
        assert!(!is_attacked(&b, sq("e6"), Color::Black));
    }

    #[test]
    fn sliders_are_blocked() {
        let b = board("4k3/8/8/8/8/8/4P3/r3K3 w - - 0 1");
        assert!(in_check(&b, Color::White));
        let b = board("4k3/8/8/8/8/8/8/r2PK3 w - - 0 1");
        assert!(!in_check(&b, Color::White));
    }

    #[test]
    fn castling_through_check_is_illegal() {
        let mut b = board("4k3/8/8/8/8/8/5r2/4K2R w K - 0 1");
        assert_eq!(play_san(&mut b, "O-O"), Err(MoveError::Illegal));
        let mut b = board("4k3/8/8/8/8/8/8/4K2R w K - 0 1");
        assert_eq!(play_san(&mut b, "O-O"), Ok(()));
        assert_eq!(b.to_fen(), "4k3/8/8/8/8/8/8/5RK1 b - - 1 1");
    }

    #[test]
    fn king_two_files_is_castling() {
        let mut b = board("r3k3/8/8/8/8/8/8/4K3 b q - 0 1");
        assert_eq!(play_san(&mut b, "Ke8c8"), Ok(()));
        assert_eq!(b.to_fen(), "2kr4/8/8/8/8/8/8/4K3 w - - 1 2");
    }

    #[test]
    fn coordinate_notation() {
        let mut b = Board::starting();
        assert_eq!(play_san(&mut b, "e2e4"), Ok(()));
        assert_eq!(play_san(&mut b, "g8f6"), Ok(()));
        assert_eq!(
            b.to_fen(),
            "rnbqkb1r/pppppppp/5n2/8/4P3/8/PPPP1PPP/RNBQKBNR w KQkq - 1 2"
        );
    }

    #[test]
    fn rook_move_drops_one_castling_right() {
        let mut b = board("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
        assert_eq!(play_san(&mut b, "Rh2"), Ok(()));
        assert_eq!(b.to_fen(), "r3k2r/8/8/8/8/8/7R/R3K3 b Qkq - 1 1");
    }

    #[test]
    fn missing_promotion_piece_means_queen() {
        let mut b = board("4k3/P7/8/8/8/8/8/4K3 w - - 0 1");
        assert_eq!(play_san(&mut b, "a8"), Ok(()));
        assert_eq!(b.piece_at(sq("a8")), Some(Piece::new(Color::White, Role::Queen)));
    }

    #[test]
    fn pawn_cannot_capture_forward() {
        let mut b = board("4k3/8/8/8/4p3/4P3/8/4K3 w - - 0 1");
        assert_eq!(play_san(&mut b, "e4"), Err(MoveError::Illegal));
    }
}
