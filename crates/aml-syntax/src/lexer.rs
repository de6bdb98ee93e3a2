//! # Lexer - Tokenizing AML Source
//!
//! Lexing happens in two layers:
//!
//! 1. **Raw scan**: a [Logos] DFA ([`RawKind`]) finds candidate markers such
//!    as `<<`, `<red>`, `*`, `[[`, URLs, dash runs and CJK runs.
//! 2. **Cooking**: [`lex`] walks the raw tokens and applies the rules that
//!    need context: raw zones (`<<<...>>>`, `<<...>>`, `<chess>...</chess>`)
//!    are not re-scanned, unknown tag names fall back to text, a `*` only
//!    becomes emphasis when a partner `*` follows on the same line without a
//!    tag in between (stars swallowed by raw zones or wiki links do not
//!    count), and a dash run is only a section break when it fills its whole
//!    line.
//!
//! [Logos]: https://docs.rs/logos
//!
//! ## The Lossless Guarantee
//!
//! Every byte in the input appears in exactly one token, and token offsets
//! are monotonic without gaps:
//!
//! ```
//! use aml_syntax::lex;
//!
//! let input = "<red>*so* sure</red> see [[Home]]\n";
//! let tokens = lex(input);
//!
//! let reconstructed: String = tokens.iter().map(|t| t.text).collect();
//! assert_eq!(input, reconstructed);
//! ```
//!
//! The lexer never fails. Input that matches nothing special ends up in
//! `Text` tokens, and adjacent text is merged into a single token.

use logos::Logos;

use crate::{
    registry::Tag,
    token::{Token, TokenKind, tag_parts},
    video::VideoRef,
};

/// Candidate markers found by the Logos DFA.
///
/// `Other` matches any single character no other rule can start with, so the
/// raw scan never produces an error for well-formed UTF-8.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
enum RawKind {
    #[token("<<<")]
    TripleOpen,

    #[token(">>>")]
    TripleClose,

    #[token("<<")]
    DoubleOpen,

    #[token(">>")]
    DoubleClose,

    #[regex(r"<[A-Za-z][A-Za-z0-9_-]*([ \t]+[A-Za-z][A-Za-z0-9_-]*)*[ \t]*>")]
    TagOpen,

    #[regex(r"</[A-Za-z][A-Za-z0-9_-]*[ \t]*>")]
    TagClose,

    #[token("*")]
    Star,

    #[token("[[")]
    WikiOpen,

    #[regex(r#"https?://[^\s<>\[\]"*]+"#)]
    Url,

    #[regex(r"-+")]
    Dashes,

    #[token("--MORE--")]
    More,

    /// Han, Kana, Hangul, CJK punctuation and fullwidth forms.
    #[regex(r"[\x{1100}-\x{11FF}\x{3000}-\x{303F}\x{3040}-\x{30FF}\x{3130}-\x{318F}\x{31F0}-\x{31FF}\x{3400}-\x{4DBF}\x{4E00}-\x{9FFF}\x{AC00}-\x{D7AF}\x{F900}-\x{FAFF}\x{FF00}-\x{FFEF}\x{20000}-\x{2FA1F}]+")]
    Cjk,

    #[regex(r"[A-Za-z0-9_]+")]
    Word,

    #[regex(r"[ \t]+")]
    Whitespace,

    #[regex(r"\r?\n")]
    Newline,

    #[regex(r"[^A-Za-z0-9_ \t\n*\-\x{1100}-\x{11FF}\x{3000}-\x{303F}\x{3040}-\x{30FF}\x{3130}-\x{318F}\x{31F0}-\x{31FF}\x{3400}-\x{4DBF}\x{4E00}-\x{9FFF}\x{AC00}-\x{D7AF}\x{F900}-\x{FAFF}\x{FF00}-\x{FFEF}\x{20000}-\x{2FA1F}]")]
    Other,
}

/// Lex the input into a sequence of tokens.
///
/// Guarantees that all bytes from the input appear in the output tokens, in
/// order, with no gaps.
pub fn lex(input: &str) -> Vec<Token<'_>> {
    let mut lexer = Lexer {
        input,
        raw: RawKind::lexer(input),
        tokens: Vec::new(),
        emphasis_open: false,
    };
    lexer.run();
    lexer.tokens
}

struct Lexer<'a> {
    input: &'a str,
    raw: logos::Lexer<'a, RawKind>,
    tokens: Vec<Token<'a>>,
    /// A `*` opened emphasis on the current line and awaits its partner.
    emphasis_open: bool,
}

impl<'a> Lexer<'a> {
    fn run(&mut self) {
        while let Some(result) = self.raw.next() {
            let span = self.raw.span();
            let (start, end) = (span.start, span.end);
            match result {
                Ok(RawKind::TripleOpen) => self.multiline(start, end),
                Ok(RawKind::DoubleOpen) => self.literal(start, end),
                Ok(RawKind::TagOpen) => self.tag_open(start, end),
                Ok(RawKind::TagClose) => self.tag_close(start, end),
                Ok(RawKind::Star) => self.star(start, end),
                Ok(RawKind::WikiOpen) => self.wiki_link(start, end),
                Ok(RawKind::Url) => self.url(start, end),
                Ok(RawKind::Dashes) => self.dashes(start, end),
                Ok(RawKind::More) => self.push(TokenKind::Truncation, start, end),
                Ok(RawKind::Cjk) => self.push(TokenKind::CjkRun, start, end),
                Ok(RawKind::Newline) => {
                    self.emphasis_open = false;
                    self.push(TokenKind::Text, start, end);
                }
                // Stray closers, words, whitespace, punctuation. Logos errors
                // are treated as text too.
                Ok(_) | Err(()) => self.push(TokenKind::Text, start, end),
            }
        }
    }

    /// Appends a token, merging adjacent text.
    fn push(&mut self, kind: TokenKind, start: usize, end: usize) {
        if start >= end {
            return;
        }
        if kind == TokenKind::Text
            && let Some(last) = self.tokens.last_mut()
            && last.kind == TokenKind::Text
            && last.end == start
        {
            last.end = end;
            last.text = &self.input[last.start..end];
            return;
        }
        self.tokens.push(Token {
            kind,
            text: &self.input[start..end],
            start,
            end,
        });
    }

    /// Moves the raw scanner forward so it resumes at `offset`.
    fn skip_to(&mut self, offset: usize) {
        let current = self.raw.span().end;
        if offset > current {
            self.raw.bump(offset - current);
        }
    }

    /// Emits the opaque content of a raw zone and its closer, given as
    /// `(offset, length)`. Without a closer the content runs to
    /// `fallback_end`.
    fn raw_zone(
        &mut self,
        content_start: usize,
        closer: Option<(usize, usize)>,
        close_kind: TokenKind,
        fallback_end: usize,
    ) {
        match closer {
            Some((close_start, len)) => {
                self.push(TokenKind::Text, content_start, close_start);
                self.push(close_kind, close_start, close_start + len);
                self.skip_to(close_start + len);
            }
            None => {
                self.push(TokenKind::Text, content_start, fallback_end);
                self.skip_to(fallback_end);
            }
        }
    }

    fn multiline(&mut self, start: usize, end: usize) {
        self.push(TokenKind::MultilineOpen, start, end);
        let closer = self.input[end..].find(">>>").map(|i| (end + i, 3));
        self.raw_zone(end, closer, TokenKind::MultilineClose, self.input.len());
    }

    fn literal(&mut self, start: usize, end: usize) {
        self.push(TokenKind::LiteralOpen, start, end);
        let closer = self.literal_close(end).map(|at| (at, 2));
        let scope_end = self.scope_end(end);
        self.raw_zone(end, closer, TokenKind::LiteralClose, scope_end);
    }

    /// Start of the `>>` closing a literal whose content begins at `from`.
    /// A `>>` beyond the enclosing block's closing tag does not count.
    fn literal_close(&self, from: usize) -> Option<usize> {
        let scope_end = self.scope_end(from);
        self.input[from..scope_end].find(">>").map(|i| from + i)
    }

    /// Offset of the next closing tag naming a registry entry, or the end of
    /// input. This is where an unterminated literal stops.
    fn scope_end(&self, from: usize) -> usize {
        let mut search = from;
        while let Some(i) = self.input[search..].find("</") {
            let at = search + i;
            let mut probe = RawKind::lexer(&self.input[at..]);
            if probe.next() == Some(Ok(RawKind::TagClose))
                && tag_parts(probe.slice()).and_then(|(name, _)| Tag::from_name(name)).is_some()
            {
                return at;
            }
            search = at + 2;
        }
        self.input.len()
    }

    fn tag_open(&mut self, start: usize, end: usize) {
        let text = &self.input[start..end];
        let Some((name, _)) = tag_parts(text) else {
            self.push(TokenKind::Text, start, end);
            return;
        };
        match Tag::from_name(name) {
            Some(tag) if tag.is_raw() => {
                self.push(TokenKind::TagOpen, start, end);
                let closer = raw_tag_close(&self.input[end..], tag).map(|(i, len)| (end + i, len));
                self.raw_zone(end, closer, TokenKind::TagClose, self.input.len());
            }
            Some(_) => self.push(TokenKind::TagOpen, start, end),
            None => self.push(TokenKind::Text, start, end),
        }
    }

    fn tag_close(&mut self, start: usize, end: usize) {
        let known = tag_parts(&self.input[start..end])
            .and_then(|(name, _)| Tag::from_name(name))
            .is_some();
        let kind = if known {
            TokenKind::TagClose
        } else {
            TokenKind::Text
        };
        self.push(kind, start, end);
    }

    fn star(&mut self, start: usize, end: usize) {
        if self.emphasis_open {
            self.emphasis_open = false;
            self.push(TokenKind::Emphasis, start, end);
            return;
        }
        if self.has_partner(end) {
            self.emphasis_open = true;
            self.push(TokenKind::Emphasis, start, end);
        } else {
            self.push(TokenKind::Text, start, end);
        }
    }

    /// Looks along the rest of the line for a `*` the scan will actually
    /// reach as a star. Raw zones and wiki links are stepped over; a known
    /// tag ends the search, so emphasis never straddles a block boundary.
    fn has_partner(&self, from: usize) -> bool {
        let line_end = from + rest_of_line(&self.input[from..]).len();
        let mut pos = from;
        while pos < line_end {
            let mut scan = RawKind::lexer(&self.input[pos..line_end]);
            let Some(result) = scan.next() else {
                return false;
            };
            let end = pos + scan.span().end;
            pos = match result {
                Ok(RawKind::Star) => return true,
                Ok(RawKind::TripleOpen) => match self.input[end..].find(">>>") {
                    Some(i) => end + i + 3,
                    None => return false,
                },
                Ok(RawKind::DoubleOpen) => match self.literal_close(end) {
                    Some(close_start) => close_start + 2,
                    None => return false,
                },
                Ok(RawKind::TagOpen | RawKind::TagClose)
                    if tag_parts(scan.slice())
                        .and_then(|(name, _)| Tag::from_name(name))
                        .is_some() =>
                {
                    return false;
                }
                Ok(RawKind::WikiOpen) => wiki_close(&self.input[end..]).map_or(end, |len| end + len),
                _ => end,
            };
        }
        false
    }

    fn wiki_link(&mut self, start: usize, end: usize) {
        match wiki_close(&self.input[end..]) {
            Some(close_end) => {
                let close_end = end + close_end;
                self.push(TokenKind::WikiLink, start, close_end);
                self.skip_to(close_end);
            }
            None => self.push(TokenKind::Text, start, end),
        }
    }

    fn url(&mut self, start: usize, end: usize) {
        let text = &self.input[start..end];
        let url = trim_url(text);
        let has_host = url
            .split_once("://")
            .is_some_and(|(_, rest)| !rest.is_empty());
        if !has_host {
            self.push(TokenKind::Text, start, end);
            return;
        }
        let kind = if VideoRef::parse(url).is_some() {
            TokenKind::VideoUrl
        } else {
            TokenKind::BareUrl
        };
        let url_end = start + url.len();
        self.push(kind, start, url_end);
        self.push(TokenKind::Text, url_end, end);
    }

    fn dashes(&mut self, start: usize, end: usize) {
        let at_line_start = start == 0 || self.input[..start].ends_with('\n');
        let rest = &self.input[end..];
        let at_line_end = rest.is_empty() || rest.starts_with('\n') || rest.starts_with("\r\n");
        let kind = if end - start >= 4 && at_line_start && at_line_end {
            TokenKind::SectionBreak
        } else {
            TokenKind::Text
        };
        self.push(kind, start, end);
    }
}

fn rest_of_line(s: &str) -> &str {
    &s[..s.find('\n').unwrap_or(s.len())]
}

/// End of the `]]` closing a wiki link whose text starts `rest`, relative to
/// `rest`. The link must close on the same line and have a non-blank title.
fn wiki_close(rest: &str) -> Option<usize> {
    let line = rest_of_line(rest);
    let i = line.find("]]")?;
    let inner = &line[..i];
    (!inner.trim().is_empty() && !inner.contains("[[")).then_some(i + 2)
}

/// Finds the closer of a raw tag, spelled with either its name or alias.
/// Returns the offset within `rest` and the closer's length.
fn raw_tag_close(rest: &str, tag: Tag) -> Option<(usize, usize)> {
    let entry = tag.entry();
    [entry.name, entry.alias]
        .into_iter()
        .filter_map(|name| {
            let closer = format!("</{name}>");
            rest.find(&closer).map(|i| (i, closer.len()))
        })
        .min()
}

/// Drops trailing sentence punctuation from a URL. A closing parenthesis is
/// kept when it balances an opening one inside the URL.
fn trim_url(url: &str) -> &str {
    let mut end = url.len();
    loop {
        let s = &url[..end];
        match s.chars().last() {
            Some('.' | ',' | ';' | ':' | '!' | '?' | '\'') => end -= 1,
            Some(')') if s.matches('(').count() < s.matches(')').count() => end -= 1,
            _ => return s,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn kinds(input: &str) -> Vec<(TokenKind, &str)> {
        lex(input).into_iter().map(|t| (t.kind, t.text)).collect()
    }

    fn assert_lossless(input: &str) {
        let tokens = lex(input);
        let mut offset = 0;
        for token in &tokens {
            assert_eq!(token.start, offset, "gap or overlap before {token:?}");
            assert!(token.end > token.start, "empty token {token:?}");
            assert_eq!(token.text, &input[token.start..token.end]);
            offset = token.end;
        }
        assert_eq!(offset, input.len(), "tokens do not reach end of input");
    }

    include!(concat!(env!("OUT_DIR"), "/fixture_tests.rs"));

    fn fixture_test(name: &str) {
        let path = format!("{}/src/fixtures/{name}.aml", env!("CARGO_MANIFEST_DIR"));
        let input = std::fs::read_to_string(path).unwrap();
        assert_lossless(&input);
    }

    #[test]
    fn lex_empty_input() {
        assert_eq!(lex(""), vec![]);
    }

    #[test]
    fn lex_plain_text_is_one_token() {
        assert_eq!(
            kinds("hello, world! 1 < 2 > 0"),
            vec![(TokenKind::Text, "hello, world! 1 < 2 > 0")]
        );
    }

    #[test]
    fn lex_known_tags() {
        assert_eq!(
            kinds("<red>abc</red>"),
            vec![
                (TokenKind::TagOpen, "<red>"),
                (TokenKind::Text, "abc"),
                (TokenKind::TagClose, "</red>"),
            ]
        );
    }

    #[test]
    fn lex_unknown_tag_is_text() {
        assert_eq!(kinds("<blink>hi</blink>"), vec![(TokenKind::Text, "<blink>hi</blink>")]);
    }

    #[test]
    fn lex_tag_with_attribute() {
        assert_eq!(
            kinds("<yellow open>q</yellow>"),
            vec![
                (TokenKind::TagOpen, "<yellow open>"),
                (TokenKind::Text, "q"),
                (TokenKind::TagClose, "</yellow>"),
            ]
        );
    }

    #[test]
    fn lex_literal_is_raw() {
        assert_eq!(
            kinds("a <<*x* [[y]]>> b"),
            vec![
                (TokenKind::Text, "a "),
                (TokenKind::LiteralOpen, "<<"),
                (TokenKind::Text, "*x* [[y]]"),
                (TokenKind::LiteralClose, ">>"),
                (TokenKind::Text, " b"),
            ]
        );
    }

    #[test]
    fn unterminated_literal_stops_at_enclosing_close() {
        assert_eq!(
            kinds("<red><<code</red> after"),
            vec![
                (TokenKind::TagOpen, "<red>"),
                (TokenKind::LiteralOpen, "<<"),
                (TokenKind::Text, "code"),
                (TokenKind::TagClose, "</red>"),
                (TokenKind::Text, " after"),
            ]
        );
    }

    #[test]
    fn unterminated_literal_runs_to_end() {
        assert_eq!(
            kinds("x <<never closed"),
            vec![
                (TokenKind::Text, "x "),
                (TokenKind::LiteralOpen, "<<"),
                (TokenKind::Text, "never closed"),
            ]
        );
    }

    #[test]
    fn lex_multiline_is_opaque() {
        assert_eq!(
            kinds("<<<line <red>one\n*two*>>>"),
            vec![
                (TokenKind::MultilineOpen, "<<<"),
                (TokenKind::Text, "line <red>one\n*two*"),
                (TokenKind::MultilineClose, ">>>"),
            ]
        );
    }

    #[test]
    fn lex_chess_content_is_raw() {
        assert_eq!(
            kinds("<chess flip>1. e4 *e5*</chess>"),
            vec![
                (TokenKind::TagOpen, "<chess flip>"),
                (TokenKind::Text, "1. e4 *e5*"),
                (TokenKind::TagClose, "</chess>"),
            ]
        );
    }

    #[rstest]
    #[case("*em*", vec![
        (TokenKind::Emphasis, "*"),
        (TokenKind::Text, "em"),
        (TokenKind::Emphasis, "*"),
    ])]
    #[case("2 * 3", vec![(TokenKind::Text, "2 * 3")])]
    #[case("*a\nb*", vec![(TokenKind::Text, "*a\nb*")])]
    #[case("*a <<x*y>>", vec![
        (TokenKind::Text, "*a "),
        (TokenKind::LiteralOpen, "<<"),
        (TokenKind::Text, "x*y"),
        (TokenKind::LiteralClose, ">>"),
    ])]
    #[case("*see [[a*b]]", vec![
        (TokenKind::Text, "*see "),
        (TokenKind::WikiLink, "[[a*b]]"),
    ])]
    #[case("<red>*a</red> b*", vec![
        (TokenKind::TagOpen, "<red>"),
        (TokenKind::Text, "*a"),
        (TokenKind::TagClose, "</red>"),
        (TokenKind::Text, " b*"),
    ])]
    #[case("*a <<<x*>>>", vec![
        (TokenKind::Text, "*a "),
        (TokenKind::MultilineOpen, "<<<"),
        (TokenKind::Text, "x*"),
        (TokenKind::MultilineClose, ">>>"),
    ])]
    #[case("*a [[b]] c*", vec![
        (TokenKind::Emphasis, "*"),
        (TokenKind::Text, "a "),
        (TokenKind::WikiLink, "[[b]]"),
        (TokenKind::Text, " c"),
        (TokenKind::Emphasis, "*"),
    ])]
    #[case("*a <blink> b*", vec![
        (TokenKind::Emphasis, "*"),
        (TokenKind::Text, "a <blink> b"),
        (TokenKind::Emphasis, "*"),
    ])]
    fn lex_emphasis_pairs_within_line(#[case] input: &str, #[case] expected: Vec<(TokenKind, &str)>) {
        assert_eq!(kinds(input), expected);
    }

    #[test]
    fn lex_wikilink() {
        assert_eq!(
            kinds("see [[Main Page|home]]."),
            vec![
                (TokenKind::Text, "see "),
                (TokenKind::WikiLink, "[[Main Page|home]]"),
                (TokenKind::Text, "."),
            ]
        );
    }

    #[rstest]
    #[case("[[unclosed link")]
    #[case("[[]] empty")]
    #[case("[[broken\n]]")]
    fn unterminated_wikilink_is_text(#[case] input: &str) {
        assert!(lex(input).iter().all(|t| t.kind == TokenKind::Text));
    }

    #[test]
    fn lex_bare_url_drops_trailing_punctuation() {
        assert_eq!(
            kinds("go to https://example.com/a?b=c."),
            vec![
                (TokenKind::Text, "go to "),
                (TokenKind::BareUrl, "https://example.com/a?b=c"),
                (TokenKind::Text, "."),
            ]
        );
    }

    #[test]
    fn url_keeps_balanced_parenthesis() {
        assert_eq!(
            kinds("(https://en.wikipedia.org/wiki/Rust_(language))"),
            vec![
                (TokenKind::Text, "("),
                (TokenKind::BareUrl, "https://en.wikipedia.org/wiki/Rust_(language)"),
                (TokenKind::Text, ")"),
            ]
        );
    }

    #[test]
    fn lex_video_url() {
        assert_eq!(
            kinds("https://youtu.be/dQw4w9WgXcQ"),
            vec![(TokenKind::VideoUrl, "https://youtu.be/dQw4w9WgXcQ")]
        );
    }

    #[rstest]
    #[case("----", true)]
    #[case("a\n--------\nb", true)]
    #[case("---", false)]
    #[case("x ----", false)]
    #[case("---- x", false)]
    fn section_break_needs_a_line_of_its_own(#[case] input: &str, #[case] is_break: bool) {
        let found = lex(input).iter().any(|t| t.kind == TokenKind::SectionBreak);
        assert_eq!(found, is_break);
    }

    #[test]
    fn lex_truncation_marker() {
        assert_eq!(
            kinds("intro --MORE-- rest"),
            vec![
                (TokenKind::Text, "intro "),
                (TokenKind::Truncation, "--MORE--"),
                (TokenKind::Text, " rest"),
            ]
        );
    }

    #[test]
    fn lex_cjk_run_kept_intact() {
        assert_eq!(
            kinds("I said 你好世界!"),
            vec![
                (TokenKind::Text, "I said "),
                (TokenKind::CjkRun, "你好世界"),
                (TokenKind::Text, "!"),
            ]
        );
    }

    #[rstest]
    #[case("こんにちは")]
    #[case("カタカナ")]
    #[case("안녕하세요")]
    #[case("你好，世界。")]
    #[case("ＡＢＣ")]
    #[case("𠀀𠀁")]
    fn lex_cjk_scripts_form_one_run(#[case] input: &str) {
        assert_eq!(kinds(input), vec![(TokenKind::CjkRun, input)]);
    }

    #[test]
    fn chess_zone_closes_with_either_spelling() {
        assert_eq!(
            kinds("<board>e4</chess> x"),
            vec![
                (TokenKind::TagOpen, "<board>"),
                (TokenKind::Text, "e4"),
                (TokenKind::TagClose, "</chess>"),
                (TokenKind::Text, " x"),
            ]
        );
    }

    #[test]
    fn stray_closers_are_text() {
        assert_eq!(kinds("a >> b >>> c ]]"), vec![(TokenKind::Text, "a >> b >>> c ]]")]);
    }

    #[test]
    fn offsets_cover_messy_input() {
        assert_lossless(
            "<red><orange>x</red>y</orange> *un [[closed <<lit ---- \u{1F600} 漢字 --MORE--\r\n",
        );
    }
}
