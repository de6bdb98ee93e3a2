//! Token kinds produced by the lexer.
//!
//! Every byte of the input lands in exactly one [`Token`]. Markup tokens
//! (`TagOpen`, `LiteralOpen`, ...) carry the delimiter text; everything the
//! author meant as content is a `Text`, `CjkRun`, `BareUrl`/`VideoUrl` or
//! `WikiLink` token.

use crate::registry::Tag;

/// The kind of a lexed token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// `<red>`, `<chess flip>` - an opening tag naming a registry entry
    TagOpen,
    /// `</red>`
    TagClose,
    /// `<<`
    LiteralOpen,
    /// `>>`
    LiteralClose,
    /// `<<<`
    MultilineOpen,
    /// `>>>`
    MultilineClose,
    /// A paired `*`
    Emphasis,
    /// `[[title]]` or `[[title|alias]]`, delimiters included
    WikiLink,
    /// `http://` or `https://` URL
    BareUrl,
    /// A URL on a known video host
    VideoUrl,
    /// A line of four or more `-`
    SectionBreak,
    /// `--MORE--`
    Truncation,
    /// A maximal run of CJK characters (Han, Kana, Hangul, CJK punctuation)
    CjkRun,
    /// Everything else
    Text,
}

/// A lexed token with its kind, text slice and byte offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    /// Inclusive start byte offset.
    pub start: usize,
    /// Exclusive end byte offset.
    pub end: usize,
}

impl<'a> Token<'a> {
    /// The tag name of a `TagOpen`/`TagClose` token, as written.
    pub fn tag_name(&self) -> Option<&'a str> {
        tag_parts(self.text).map(|(name, _)| name)
    }

    /// The registry tag of a `TagOpen`/`TagClose` token.
    pub fn tag(&self) -> Option<Tag> {
        match self.kind {
            TokenKind::TagOpen | TokenKind::TagClose => self.tag_name().and_then(Tag::from_name),
            _ => None,
        }
    }

    /// True if an opening tag carries the given bare attribute, e.g. `flip`
    /// in `<chess flip>`.
    pub fn has_attr(&self, attr: &str) -> bool {
        tag_parts(self.text).is_some_and(|(_, mut attrs)| attrs.any(|a| a == attr))
    }

    /// Inner content of a `WikiLink` token, without `[[` and `]]`.
    pub fn wiki_inner(&self) -> Option<&'a str> {
        if self.kind != TokenKind::WikiLink {
            return None;
        }
        self.text.strip_prefix("[[")?.strip_suffix("]]")
    }
}

/// Splits `<name attr ...>` or `</name>` into the name and its attributes.
pub(crate) fn tag_parts(text: &str) -> Option<(&str, std::str::SplitWhitespace<'_>)> {
    let inner = text.strip_prefix('<')?.strip_suffix('>')?;
    let inner = inner.strip_prefix('/').unwrap_or(inner);
    let mut parts = inner.split_whitespace();
    let name = parts.next()?;
    Some((name, parts))
}
