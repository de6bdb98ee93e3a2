//! Reduces PGN movetext to a plain list of SAN moves.

use std::sync::LazyLock;

use regex::Regex;

/// Tag pairs, `{comments}`, `;` line comments and `(variations)`.
static NOISE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)\[[^\]]*\]|\{[^}]*\}|;[^\n]*$|\([^()]*\)").expect("valid regex")
});

/// `12.` or `12...` prefixes, possibly glued to the move.
static MOVE_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\.+").expect("valid regex"));

fn is_result(token: &str) -> bool {
    matches!(token, "1-0" | "0-1" | "1/2-1/2" | "½-½" | "*")
}

/// Splits movetext into SAN tokens, dropping headers, comments, variations,
/// move numbers, numeric annotation glyphs and the game result.
pub(crate) fn move_tokens(text: &str) -> Vec<String> {
    let mut cleaned = text.to_string();
    // Variations nest, so strip until nothing changes.
    loop {
        let next = NOISE.replace_all(&cleaned, " ").into_owned();
        if next == cleaned {
            break;
        }
        cleaned = next;
    }

    cleaned
        .split_whitespace()
        .map(|token| MOVE_NUMBER.replace(token, "").into_owned())
        .filter(|token| !token.is_empty() && !token.starts_with('$') && !is_result(token))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn plain_moves_pass_through() {
        assert_eq!(move_tokens("e4 e5 Nf3"), vec!["e4", "e5", "Nf3"]);
    }

    #[test]
    fn numbers_and_results_are_dropped() {
        assert_eq!(
            move_tokens("1. e4 e5 2.Nf3 Nc6 3... a6 1/2-1/2"),
            vec!["e4", "e5", "Nf3", "Nc6", "a6"]
        );
    }

    #[test]
    fn pgn_decoration_is_stripped() {
        let pgn = "[Event \"Club\"]\n[Result \"1-0\"]\n\n\
                   1. e4 $1 {king's pawn} e5 (1... c5 2. Nf3 (2. c3)) 2. Nf3 ; develops\n\
                   Nc6 1-0";
        assert_eq!(move_tokens(pgn), vec!["e4", "e5", "Nf3", "Nc6"]);
    }

    #[test]
    fn empty_input() {
        assert!(move_tokens("  \n").is_empty());
    }
}
