//! Board representation and FEN conversion.

use std::fmt;

use super::ChessError;

pub const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub fn opponent(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Rank direction pawns of this color advance in.
    pub(crate) fn forward(self) -> i8 {
        match self {
            Color::White => 1,
            Color::Black => -1,
        }
    }

    /// The rank (0-based) of this color's back row.
    pub(crate) fn back_rank(self) -> u8 {
        match self {
            Color::White => 0,
            Color::Black => 7,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl Role {
    /// Parses an uppercase SAN piece letter.
    pub fn from_san(c: char) -> Option<Role> {
        match c {
            'P' => Some(Role::Pawn),
            'N' => Some(Role::Knight),
            'B' => Some(Role::Bishop),
            'R' => Some(Role::Rook),
            'Q' => Some(Role::Queen),
            'K' => Some(Role::King),
            _ => None,
        }
    }

    fn letter(self) -> char {
        match self {
            Role::Pawn => 'p',
            Role::Knight => 'n',
            Role::Bishop => 'b',
            Role::Rook => 'r',
            Role::Queen => 'q',
            Role::King => 'k',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub color: Color,
    pub role: Role,
}

impl Piece {
    pub fn new(color: Color, role: Role) -> Self {
        Self { color, role }
    }

    fn from_fen(c: char) -> Option<Piece> {
        let role = Role::from_san(c.to_ascii_uppercase())?;
        let color = if c.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        Some(Piece { color, role })
    }

    fn fen_char(self) -> char {
        match self.color {
            Color::White => self.role.letter().to_ascii_uppercase(),
            Color::Black => self.role.letter(),
        }
    }
}

/// A square index, `a1 = 0` through `h8 = 63`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Square(u8);

impl Square {
    pub fn new(file: u8, rank: u8) -> Square {
        debug_assert!(file < 8 && rank < 8);
        Square(rank * 8 + file)
    }

    pub fn file(self) -> u8 {
        self.0 % 8
    }

    pub fn rank(self) -> u8 {
        self.0 / 8
    }

    fn index(self) -> usize {
        self.0 as usize
    }

    /// Parses `e4`-style names.
    pub fn parse(name: &str) -> Option<Square> {
        let mut chars = name.chars();
        let file = file_index(chars.next()?)?;
        let rank = rank_index(chars.next()?)?;
        if chars.next().is_some() {
            return None;
        }
        Some(Square::new(file, rank))
    }

    /// The square `df` files and `dr` ranks away, if still on the board.
    pub fn offset(self, df: i8, dr: i8) -> Option<Square> {
        let file = self.file() as i8 + df;
        let rank = self.rank() as i8 + dr;
        ((0..8).contains(&file) && (0..8).contains(&rank)).then(|| Square::new(file as u8, rank as u8))
    }

    pub fn all() -> impl Iterator<Item = Square> {
        (0..64).map(Square)
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", (b'a' + self.file()) as char, self.rank() + 1)
    }
}

pub(crate) fn file_index(c: char) -> Option<u8> {
    ('a'..='h').contains(&c).then(|| c as u8 - b'a')
}

pub(crate) fn rank_index(c: char) -> Option<u8> {
    ('1'..='8').contains(&c).then(|| c as u8 - b'1')
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Castling {
    pub white_king: bool,
    pub white_queen: bool,
    pub black_king: bool,
    pub black_queen: bool,
}

impl Castling {
    pub fn kingside(self, color: Color) -> bool {
        match color {
            Color::White => self.white_king,
            Color::Black => self.black_king,
        }
    }

    pub fn queenside(self, color: Color) -> bool {
        match color {
            Color::White => self.white_queen,
            Color::Black => self.black_queen,
        }
    }

    /// Drops the rights tied to a king or rook home square once anything
    /// moves from or to it.
    pub(crate) fn touch(&mut self, square: Square) {
        match (square.file(), square.rank()) {
            (4, 0) => {
                self.white_king = false;
                self.white_queen = false;
            }
            (0, 0) => self.white_queen = false,
            (7, 0) => self.white_king = false,
            (4, 7) => {
                self.black_king = false;
                self.black_queen = false;
            }
            (0, 7) => self.black_queen = false,
            (7, 7) => self.black_king = false,
            _ => {}
        }
    }

    fn to_fen(self) -> String {
        let mut out = String::new();
        for (set, c) in [
            (self.white_king, 'K'),
            (self.white_queen, 'Q'),
            (self.black_king, 'k'),
            (self.black_queen, 'q'),
        ] {
            if set {
                out.push(c);
            }
        }
        if out.is_empty() {
            out.push('-');
        }
        out
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    squares: [Option<Piece>; 64],
    pub turn: Color,
    pub castling: Castling,
    pub en_passant: Option<Square>,
    pub halfmove: u32,
    pub fullmove: u32,
}

impl Board {
    /// The standard initial position.
    pub fn starting() -> Board {
        let back = [
            Role::Rook,
            Role::Knight,
            Role::Bishop,
            Role::Queen,
            Role::King,
            Role::Bishop,
            Role::Knight,
            Role::Rook,
        ];
        let mut squares = [None; 64];
        for (file, role) in back.into_iter().enumerate() {
            let file = file as u8;
            squares[Square::new(file, 0).index()] = Some(Piece::new(Color::White, role));
            squares[Square::new(file, 1).index()] = Some(Piece::new(Color::White, Role::Pawn));
            squares[Square::new(file, 6).index()] = Some(Piece::new(Color::Black, Role::Pawn));
            squares[Square::new(file, 7).index()] = Some(Piece::new(Color::Black, role));
        }
        Board {
            squares,
            turn: Color::White,
            castling: Castling {
                white_king: true,
                white_queen: true,
                black_king: true,
                black_queen: true,
            },
            en_passant: None,
            halfmove: 0,
            fullmove: 1,
        }
    }

    /// Parses a FEN string. Only the placement field is required; missing
    /// trailing fields default to `w - - 0 1`.
    pub fn from_fen(fen: &str) -> Result<Board, ChessError> {
        let invalid = |reason: &str| ChessError::InvalidFen(format!("{reason} in {fen:?}"));
        let mut fields = fen.split_whitespace();
        let placement = fields.next().ok_or_else(|| invalid("empty position"))?;

        let mut squares = [None; 64];
        let rows: Vec<&str> = placement.split('/').collect();
        if rows.len() != 8 {
            return Err(invalid("expected 8 ranks"));
        }
        for (row, text) in rows.iter().enumerate() {
            let rank = 7 - row as u8;
            let mut file = 0u8;
            for c in text.chars() {
                if let Some(skip) = c.to_digit(10).filter(|d| (1..=8).contains(d)) {
                    file += skip as u8;
                } else {
                    let piece = Piece::from_fen(c).ok_or_else(|| invalid("unknown piece"))?;
                    if file >= 8 {
                        return Err(invalid("rank too long"));
                    }
                    squares[Square::new(file, rank).index()] = Some(piece);
                    file += 1;
                }
                if file > 8 {
                    return Err(invalid("rank too long"));
                }
            }
            if file != 8 {
                return Err(invalid("rank too short"));
            }
        }

        for color in [Color::White, Color::Black] {
            let kings = squares
                .iter()
                .filter(|p| **p == Some(Piece::new(color, Role::King)))
                .count();
            if kings != 1 {
                return Err(invalid("each side needs exactly one king"));
            }
        }

        let turn = match fields.next().unwrap_or("w") {
            "w" => Color::White,
            "b" => Color::Black,
            _ => return Err(invalid("side to move must be w or b")),
        };

        let mut castling = Castling::default();
        match fields.next().unwrap_or("-") {
            "-" => {}
            rights => {
                for c in rights.chars() {
                    match c {
                        'K' => castling.white_king = true,
                        'Q' => castling.white_queen = true,
                        'k' => castling.black_king = true,
                        'q' => castling.black_queen = true,
                        _ => return Err(invalid("bad castling rights")),
                    }
                }
            }
        }

        let en_passant = match fields.next().unwrap_or("-") {
            "-" => None,
            name => {
                let square = Square::parse(name)
                    .filter(|s| s.rank() == 2 || s.rank() == 5)
                    .ok_or_else(|| invalid("bad en passant square"))?;
                Some(square)
            }
        };

        let halfmove = match fields.next() {
            Some(n) => n.parse().map_err(|_| invalid("bad halfmove clock"))?,
            None => 0,
        };
        let fullmove = match fields.next() {
            Some(n) => n.parse().map_err(|_| invalid("bad fullmove number"))?,
            None => 1,
        };

        Ok(Board {
            squares,
            turn,
            castling,
            en_passant,
            halfmove,
            fullmove,
        })
    }

    pub fn to_fen(&self) -> String {
        let mut out = String::new();
        for rank in (0..8).rev() {
            let mut empty = 0;
            for file in 0..8 {
                match self.piece_at(Square::new(file, rank)) {
                    Some(piece) => {
                        if empty > 0 {
                            out.push_str(&empty.to_string());
                            empty = 0;
                        }
                        out.push(piece.fen_char());
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                out.push_str(&empty.to_string());
            }
            if rank > 0 {
                out.push('/');
            }
        }
        let turn = match self.turn {
            Color::White => 'w',
            Color::Black => 'b',
        };
        let en_passant = self
            .en_passant
            .map_or_else(|| "-".to_string(), |s| s.to_string());
        format!(
            "{out} {turn} {} {en_passant} {} {}",
            self.castling.to_fen(),
            self.halfmove,
            self.fullmove
        )
    }

    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.squares[square.index()]
    }

    pub(crate) fn set(&mut self, square: Square, piece: Option<Piece>) {
        self.squares[square.index()] = piece;
    }

    pub fn king_square(&self, color: Color) -> Option<Square> {
        Square::all().find(|&s| self.piece_at(s) == Some(Piece::new(color, Role::King)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn starting_position_round_trips() {
        assert_eq!(Board::starting().to_fen(), STARTING_FEN);
        assert_eq!(Board::from_fen(STARTING_FEN).unwrap(), Board::starting());
    }

    #[test]
    fn placement_only_gets_defaults() {
        let board = Board::from_fen("4k3/8/8/8/8/8/8/4K3").unwrap();
        assert_eq!(board.to_fen(), "4k3/8/8/8/8/8/8/4K3 w - - 0 1");
    }

    #[test]
    fn en_passant_square_is_kept() {
        let fen = "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1";
        assert_eq!(Board::from_fen(fen).unwrap().to_fen(), fen);
    }

    #[rstest]
    #[case("")]
    #[case("8/8/8/8/8/8/8/8 w - - 0 1")]
    #[case("4k3/8/8/8/8/8/4K3 w - - 0 1")]
    #[case("4k3/9/8/8/8/8/8/4K3 w - - 0 1")]
    #[case("4k3/8/8/8/8/8/8/4K2X w - - 0 1")]
    #[case("4k3/8/8/8/8/8/8/4K3 x - - 0 1")]
    #[case("4k3/8/8/8/8/8/8/4K3 w KX - 0 1")]
    #[case("4k3/8/8/8/8/8/8/4K3 w - e4 0 1")]
    #[case("4k3/8/8/8/8/8/8/4K3 w - - many 1")]
    fn rejects_invalid_fen(#[case] fen: &str) {
        assert!(matches!(Board::from_fen(fen), Err(ChessError::InvalidFen(_))));
    }

    #[test]
    fn square_names() {
        assert_eq!(Square::parse("a1"), Some(Square::new(0, 0)));
        assert_eq!(Square::parse("h8").map(|s| s.to_string()), Some("h8".to_string()));
        assert_eq!(Square::parse("i1"), None);
        assert_eq!(Square::parse("a9"), None);
        assert_eq!(Square::new(0, 0).offset(-1, 0), None);
    }
}
