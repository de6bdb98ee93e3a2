//! Standard algebraic notation.

use super::board::{Role, Square, file_index, rank_index};
use super::MoveError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CastleSide {
    King,
    Queen,
}

/// A move as written, before it is matched against a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SanMove {
    Castle(CastleSide),
    Normal {
        role: Role,
        from_file: Option<u8>,
        from_rank: Option<u8>,
        to: Square,
        promotion: Option<Role>,
    },
}

/// Parses one SAN move. Check and annotation suffixes (`+ # ! ?`) and the
/// capture mark are accepted and ignored; legality is not checked here.
/// Long algebraic (`Ng1-f3`) and bare coordinates (`e2e4`, `e7e8q`) read as
/// fully disambiguated moves.
pub fn parse_san(san: &str) -> Result<SanMove, MoveError> {
    let trimmed = san.trim_end_matches(['+', '#', '!', '?']);
    match trimmed {
        "O-O" | "0-0" => return Ok(SanMove::Castle(CastleSide::King)),
        "O-O-O" | "0-0-0" => return Ok(SanMove::Castle(CastleSide::Queen)),
        _ => {}
    }

    let mut chars: Vec<char> = trimmed
        .chars()
        .filter(|&c| !matches!(c, 'x' | ':' | '-'))
        .collect();

    let mut promotion = None;
    if let Some(&last) = chars.last()
        && let Some(role) = Role::from_san(last.to_ascii_uppercase())
        && chars.len() > 2
        && !chars[chars.len() - 2].is_ascii_uppercase()
        && (last.is_ascii_uppercase() || chars[chars.len() - 2].is_ascii_digit())
    {
        if matches!(role, Role::Pawn | Role::King) {
            return Err(MoveError::Unreadable);
        }
        promotion = Some(role);
        chars.pop();
        if chars.last() == Some(&'=') {
            chars.pop();
        }
    }

    let role = match chars.first() {
        Some(&c) if c.is_ascii_uppercase() => {
            chars.remove(0);
            Role::from_san(c).ok_or(MoveError::Unreadable)?
        }
        _ => Role::Pawn,
    };

    if chars.len() < 2 {
        return Err(MoveError::Unreadable);
    }
    let rank = rank_index(chars[chars.len() - 1]).ok_or(MoveError::Unreadable)?;
    let file = file_index(chars[chars.len() - 2]).ok_or(MoveError::Unreadable)?;
    let to = Square::new(file, rank);

    let mut from_file = None;
    let mut from_rank = None;
    for &c in &chars[..chars.len() - 2] {
        if let Some(f) = file_index(c)
            && from_file.is_none()
            && from_rank.is_none()
        {
            from_file = Some(f);
        } else if let Some(r) = rank_index(c)
            && from_rank.is_none()
        {
            from_rank = Some(r);
        } else {
            return Err(MoveError::Unreadable);
        }
    }

    if promotion.is_some() && role != Role::Pawn {
        return Err(MoveError::Unreadable);
    }

    Ok(SanMove::Normal {
        role,
        from_file,
        from_rank,
        to,
        promotion,
    })
}
