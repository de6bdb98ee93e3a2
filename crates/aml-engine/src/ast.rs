//! # AST
//!
//! The typed tree the parser builds and the generator walks. Nodes own their
//! text; no node is shared between documents.
//!
//! Leaf content is stored exactly as written (wiki-link titles are not
//! trimmed, raw zones keep their whitespace), so [`Document::plain_text`]
//! can reproduce the source minus its markup.

use aml_syntax::{Tag, VideoHost};

use crate::chess::ChessSource;

/// The root of a parsed message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    pub children: Vec<Node>,
}

/// A video reference carried by an [`Node::AutoLink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Video {
    pub host: VideoHost,
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// A semantic tag rendered as a sigil plus collapsible content.
    ColorBlock {
        tag: Tag,
        children: Vec<Node>,
        default_expanded: bool,
    },
    /// `<<monospace>>`
    Literal(String),
    /// `<<<opaque multi-line text>>>`
    MultilineBlock(String),
    /// `*emphasis*`
    Emphasis(Vec<Node>),
    /// `[[title]]` or `[[title|alias]]`
    WikiLink {
        title: String,
        alias: Option<String>,
        offset: usize,
    },
    /// A bare URL; `video` is set when it points at a known video host.
    AutoLink { url: String, video: Option<Video> },
    /// A run of CJK characters, segmented and annotated at generation time.
    ChineseRun(String),
    /// A `<chess>` block. `raw` is the inner text as written.
    ChessDiagram {
        raw: String,
        source: ChessSource,
        flip: bool,
        offset: usize,
    },
    SectionBreak,
    /// `--MORE--`; `offset` is where a summary view cuts the message.
    Truncation { offset: usize },
    PlainText(String),
}

impl Node {
    /// Child nodes of container variants.
    pub fn children(&self) -> &[Node] {
        match self {
            Node::ColorBlock { children, .. } | Node::Emphasis(children) => children,
            _ => &[],
        }
    }

    fn write_plain_text(&self, out: &mut String) {
        match self {
            Node::ColorBlock { children, .. } | Node::Emphasis(children) => {
                for child in children {
                    child.write_plain_text(out);
                }
            }
            Node::Literal(text)
            | Node::MultilineBlock(text)
            | Node::ChineseRun(text)
            | Node::PlainText(text) => out.push_str(text),
            Node::WikiLink { title, alias, .. } => {
                out.push_str(title);
                if let Some(alias) = alias {
                    out.push('|');
                    out.push_str(alias);
                }
            }
            Node::AutoLink { url, .. } => out.push_str(url),
            Node::ChessDiagram { raw, .. } => out.push_str(raw),
            Node::SectionBreak | Node::Truncation { .. } => {}
        }
    }
}

impl Document {
    /// Concatenated leaf content in document order, with all markup removed.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        for node in &self.children {
            node.write_plain_text(&mut out);
        }
        out
    }

    /// Depth-first pre-order iteration over every node.
    pub fn walk(&self) -> impl Iterator<Item = &Node> {
        let mut stack: Vec<&Node> = self.children.iter().rev().collect();
        std::iter::from_fn(move || {
            let node = stack.pop()?;
            stack.extend(node.children().iter().rev());
            Some(node)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Node {
        Node::PlainText(s.to_string())
    }

    #[test]
    fn plain_text_skips_markup() {
        let doc = Document {
            children: vec![
                Node::ColorBlock {
                    tag: Tag::Red,
                    children: vec![text("so "), Node::Emphasis(vec![text("very")])],
                    default_expanded: false,
                },
                Node::SectionBreak,
                Node::WikiLink {
                    title: "Page".into(),
                    alias: Some("here".into()),
                    offset: 0,
                },
                Node::Literal("x < y".into()),
            ],
        };
        assert_eq!(doc.plain_text(), "so veryPage|herex < y");
    }

    #[test]
    fn walk_is_preorder() {
        let doc = Document {
            children: vec![
                Node::Emphasis(vec![text("a"), Node::Emphasis(vec![text("b")])]),
                text("c"),
            ],
        };
        let texts: Vec<_> = doc
            .walk()
            .map(|n| match n {
                Node::PlainText(t) => t.as_str(),
                Node::Emphasis(_) => "*",
                _ => "?",
            })
            .collect();
        assert_eq!(texts, vec!["*", "a", "*", "b", "c"]);
    }
}
