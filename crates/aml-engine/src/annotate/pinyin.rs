//! Tone-number pinyin (`ni3 hao3`) to tone marks (`nǐ hǎo`).

const MARKED: [[char; 4]; 6] = [
    ['ā', 'á', 'ǎ', 'à'],
    ['ē', 'é', 'ě', 'è'],
    ['ī', 'í', 'ǐ', 'ì'],
    ['ō', 'ó', 'ǒ', 'ò'],
    ['ū', 'ú', 'ǔ', 'ù'],
    ['ǖ', 'ǘ', 'ǚ', 'ǜ'],
];

fn vowel_row(c: char) -> Option<usize> {
    match c.to_ascii_lowercase() {
        'a' => Some(0),
        'e' => Some(1),
        'i' => Some(2),
        'o' => Some(3),
        'u' => Some(4),
        'ü' | 'Ü' => Some(5),
        _ => None,
    }
}

/// Converts every syllable in a space-separated reading. Syllables without a
/// trailing tone digit are left as they are.
pub fn numbered_to_marked(reading: &str) -> String {
    reading
        .split(' ')
        .map(syllable)
        .collect::<Vec<_>>()
        .join(" ")
}

fn syllable(raw: &str) -> String {
    let letters: String = raw.replace("u:", "ü").replace("U:", "Ü").replace('v', "ü");
    let Some(tone) = letters.chars().last().and_then(|c| c.to_digit(10)) else {
        return letters;
    };
    let mut chars: Vec<char> = letters.chars().collect();
    chars.pop();
    if !(1..=4).contains(&tone) {
        return chars.into_iter().collect();
    }

    // `a` and `e` always take the mark, `o` does in `ou`, otherwise the last vowel.
    let find = |v: char| chars.iter().position(|c| c.eq_ignore_ascii_case(&v));
    let target = find('a')
        .or_else(|| find('e'))
        .or_else(|| {
            chars
                .windows(2)
                .position(|w| w[0].eq_ignore_ascii_case(&'o') && w[1].eq_ignore_ascii_case(&'u'))
        })
        .or_else(|| chars.iter().rposition(|&c| vowel_row(c).is_some()));

    if let Some(index) = target
        && let Some(row) = vowel_row(chars[index])
    {
        let marked = MARKED[row][tone as usize - 1];
        chars[index] = if chars[index].is_uppercase() {
            marked.to_uppercase().next().unwrap_or(marked)
        } else {
            marked
        };
    }
    chars.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("ni3 hao3", "nǐ hǎo")]
    #[case("lu:4", "lǜ")]
    #[case("nv3", "nǚ")]
    #[case("liu2", "liú")]
    #[case("gui4", "guì")]
    #[case("shou3", "shǒu")]
    #[case("zhong1 guo2", "zhōng guó")]
    #[case("de5", "de")]
    #[case("Bei3 jing1", "Běi jīng")]
    #[case("r5", "r")]
    #[case("xx", "xx")]
    #[case("İa1", "İā")]
    #[case("OU3", "ǑU")]
    fn converts(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(numbered_to_marked(input), expected);
    }
}
