//! # Tag Registry
//!
//! The static table of semantic tags AML understands. Each tag names a
//! *meaning* (sarcasm, technical detail, quotation, ...) and is rendered as a
//! clickable glyph followed by collapsible content.
//!
//! Tags are a closed enum ([`Tag`]) with a parallel `const` table
//! ([`REGISTRY`]). Adding a tag means adding one variant and one entry; the
//! entry order must follow the variant order so [`Tag::entry`] can index
//! directly.
//!
//! Every tag is reachable by its color name (`<red>`) and by its semantic
//! alias (`<sarcasm>`). Both spellings resolve to the same [`Tag`], so
//! `<sarcasm>...</red>` is a well-formed pair.

/// A semantic tag known to the lexer and parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    Red,
    Orange,
    Yellow,
    Green,
    Blue,
    Purple,
    Gray,
    /// Embedded chess position. Its content is a raw zone handed to the
    /// chess renderer instead of being parsed as markup.
    Chess,
}

/// One row of the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryEntry {
    pub tag: Tag,
    /// Canonical tag name, as written between angle brackets.
    pub name: &'static str,
    /// Alternative spelling naming the meaning rather than the color.
    pub alias: &'static str,
    /// Glyph shown as the clickable sigil.
    pub glyph: &'static str,
    /// CSS class suffix applied to the block container.
    pub style_class: &'static str,
    /// Human readable description, used as the sigil's tooltip.
    pub description: &'static str,
    /// Whether the content container starts expanded.
    pub default_expanded: bool,
}

pub const REGISTRY: &[RegistryEntry] = &[
    RegistryEntry {
        tag: Tag::Red,
        name: "red",
        alias: "sarcasm",
        glyph: "\u{2757}",
        style_class: "red",
        description: "Sarcasm or irony, not meant literally",
        default_expanded: false,
    },
    RegistryEntry {
        tag: Tag::Orange,
        name: "orange",
        alias: "technical",
        glyph: "\u{2699}",
        style_class: "orange",
        description: "Technical explanation",
        default_expanded: false,
    },
    RegistryEntry {
        tag: Tag::Yellow,
        name: "yellow",
        alias: "quote",
        glyph: "\u{275D}",
        style_class: "yellow",
        description: "Quoted material",
        default_expanded: true,
    },
    RegistryEntry {
        tag: Tag::Green,
        name: "green",
        alias: "narrative",
        glyph: "\u{270E}",
        style_class: "green",
        description: "Narrative or story",
        default_expanded: true,
    },
    RegistryEntry {
        tag: Tag::Blue,
        name: "blue",
        alias: "aside",
        glyph: "\u{2139}",
        style_class: "blue",
        description: "Aside or background information",
        default_expanded: false,
    },
    RegistryEntry {
        tag: Tag::Purple,
        name: "purple",
        alias: "feeling",
        glyph: "\u{2665}",
        style_class: "purple",
        description: "Emotional subtext",
        default_expanded: false,
    },
    RegistryEntry {
        tag: Tag::Gray,
        name: "gray",
        alias: "spoiler",
        glyph: "\u{2026}",
        style_class: "gray",
        description: "Spoiler or digression",
        default_expanded: false,
    },
    RegistryEntry {
        tag: Tag::Chess,
        name: "chess",
        alias: "board",
        glyph: "\u{265E}",
        style_class: "chess",
        description: "Chess position",
        default_expanded: true,
    },
];

impl Tag {
    /// Looks a tag up by canonical name or alias. Names are case-sensitive.
    pub fn from_name(name: &str) -> Option<Tag> {
        REGISTRY
            .iter()
            .find(|e| e.name == name || e.alias == name)
            .map(|e| e.tag)
    }

    /// The registry row for this tag.
    pub fn entry(self) -> &'static RegistryEntry {
        &REGISTRY[self as usize]
    }

    pub fn name(self) -> &'static str {
        self.entry().name
    }

    /// True for tags whose content is opaque to the lexer.
    pub fn is_raw(self) -> bool {
        matches!(self, Tag::Chess)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn entries_follow_variant_order() {
        for (index, entry) in REGISTRY.iter().enumerate() {
            assert_eq!(entry.tag as usize, index, "entry {} out of order", entry.name);
            assert_eq!(entry.tag.entry(), entry);
        }
    }

    #[rstest]
    #[case("red", Some(Tag::Red))]
    #[case("sarcasm", Some(Tag::Red))]
    #[case("technical", Some(Tag::Orange))]
    #[case("chess", Some(Tag::Chess))]
    #[case("board", Some(Tag::Chess))]
    #[case("RED", None)]
    #[case("blink", None)]
    #[case("", None)]
    fn lookup_by_name_or_alias(#[case] name: &str, #[case] expected: Option<Tag>) {
        assert_eq!(Tag::from_name(name), expected);
    }

    #[test]
    fn names_are_unique() {
        let mut seen = std::collections::HashSet::new();
        for entry in REGISTRY {
            assert!(seen.insert(entry.name), "duplicate name {}", entry.name);
            assert!(seen.insert(entry.alias), "duplicate alias {}", entry.alias);
        }
    }

    #[test]
    fn only_chess_is_raw() {
        let raw: Vec<_> = REGISTRY.iter().filter(|e| e.tag.is_raw()).collect();
        assert_eq!(raw.len(), 1);
        assert_eq!(raw[0].tag, Tag::Chess);
    }
}
