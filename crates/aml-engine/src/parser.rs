//! # Parser
//!
//! Turns the flat token stream into a [`Document`]. The parser never fails:
//! malformed nesting is repaired and reported as [`Diagnostic`]s.
//!
//! ## Frame Stack
//!
//! Open color blocks and emphasis spans live on an explicit stack of
//! [`Frame`]s rather than on the call stack. Nodes are appended to the
//! children of the top frame (or to the root when the stack is empty); a
//! closed frame becomes a node in its parent.
//!
//! Recovery rules:
//!
//! - A closing tag matching the top frame closes it.
//! - A closing tag matching a deeper frame closes every frame above it first,
//!   innermost-first, each with a `MismatchedClose` diagnostic. Each
//!   implicitly closed frame becomes a child of the frame below it, so
//!   `<red><orange>x</red>` yields `red(orange(x))`.
//! - A closing tag matching nothing is kept as text (`StrayClose`).
//! - Frames still open at end of input are closed innermost-first
//!   (`UnterminatedBlock`).
//! - An emphasis frame that is never closed by its own `*` (end of input,
//!   or a closing tag below it) is dissolved: the `*` goes back into the
//!   text and its children move up to the parent. No diagnostic.
//! - Opening a frame beyond [`ParseOptions::max_depth`] keeps the tag as
//!   text (`DepthLimit`).
//!
//! Raw zones (`<<...>>`, `<<<...>>>`, `<chess>...</chess>`) arrive from the
//! lexer as open token, one text token, close token; they become leaves.

use aml_syntax::{Tag, Token, TokenKind, VideoRef};

use crate::{
    ast::{Document, Node, Video},
    chess::ChessSource,
    diagnostics::{Diagnostic, DiagnosticKind},
};

/// Limits applied while parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Maximum number of simultaneously open blocks.
    pub max_depth: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self { max_depth: 64 }
    }
}

/// Parses with default options.
pub fn parse(tokens: &[Token<'_>]) -> (Document, Vec<Diagnostic>) {
    parse_with(tokens, &ParseOptions::default())
}

pub fn parse_with(tokens: &[Token<'_>], options: &ParseOptions) -> (Document, Vec<Diagnostic>) {
    let mut builder = TreeBuilder::new(tokens, *options);
    builder.run();
    builder.finish()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FrameKind {
    Color { tag: Tag, expanded: bool },
    Emphasis,
}

/// An open container awaiting its closer.
#[derive(Debug)]
struct Frame {
    kind: FrameKind,
    children: Vec<Node>,
    /// Offset of the opening token.
    offset: usize,
}

impl Frame {
    fn describe(&self) -> String {
        match self.kind {
            FrameKind::Color { tag, .. } => format!("<{}>", tag.name()),
            FrameKind::Emphasis => "emphasis".to_string(),
        }
    }

    fn into_node(self) -> Node {
        match self.kind {
            FrameKind::Color { tag, expanded } => Node::ColorBlock {
                tag,
                children: self.children,
                default_expanded: expanded,
            },
            FrameKind::Emphasis => Node::Emphasis(self.children),
        }
    }
}

struct TreeBuilder<'t, 'a> {
    tokens: &'t [Token<'a>],
    pos: usize,
    options: ParseOptions,
    frames: Vec<Frame>,
    root: Vec<Node>,
    diagnostics: Vec<Diagnostic>,
}

impl<'t, 'a> TreeBuilder<'t, 'a> {
    fn new(tokens: &'t [Token<'a>], options: ParseOptions) -> Self {
        Self {
            tokens,
            pos: 0,
            options,
            frames: Vec::new(),
            root: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    fn run(&mut self) {
        while let Some(token) = self.bump() {
            match token.kind {
                TokenKind::TagOpen => self.tag_open(token),
                TokenKind::TagClose => self.tag_close(token),
                TokenKind::Emphasis => self.emphasis(token),
                TokenKind::LiteralOpen => {
                    let (text, closed) = self.raw_content(TokenKind::LiteralClose);
                    self.unterminated_raw(closed, "literal", token.start);
                    self.attach(Node::Literal(text));
                }
                TokenKind::MultilineOpen => {
                    let (text, closed) = self.raw_content(TokenKind::MultilineClose);
                    self.unterminated_raw(closed, "multiline block", token.start);
                    self.attach(Node::MultilineBlock(text));
                }
                TokenKind::WikiLink => self.wiki_link(token),
                TokenKind::BareUrl => self.attach(Node::AutoLink {
                    url: token.text.to_string(),
                    video: None,
                }),
                TokenKind::VideoUrl => {
                    let video = VideoRef::parse(token.text).map(|v| Video {
                        host: v.host,
                        id: v.id.to_string(),
                    });
                    self.attach(Node::AutoLink {
                        url: token.text.to_string(),
                        video,
                    });
                }
                TokenKind::SectionBreak => self.attach(Node::SectionBreak),
                TokenKind::Truncation => self.attach(Node::Truncation {
                    offset: token.start,
                }),
                TokenKind::CjkRun => self.attach(Node::ChineseRun(token.text.to_string())),
                TokenKind::Text | TokenKind::LiteralClose | TokenKind::MultilineClose => {
                    self.push_text(token.text)
                }
            }
        }
    }

    fn finish(mut self) -> (Document, Vec<Diagnostic>) {
        while let Some(frame) = self.frames.last() {
            if frame.kind != FrameKind::Emphasis {
                self.diagnostics.push(Diagnostic::new(
                    DiagnosticKind::UnterminatedBlock,
                    format!("{} was never closed", frame.describe()),
                    frame.offset,
                ));
            }
            self.abandon_top();
        }
        (
            Document {
                children: self.root,
            },
            self.diagnostics,
        )
    }

    fn bump(&mut self) -> Option<Token<'a>> {
        let token = *self.tokens.get(self.pos)?;
        self.pos += 1;
        Some(token)
    }

    fn peek_kind(&self) -> Option<TokenKind> {
        self.tokens.get(self.pos).map(|t| t.kind)
    }

    /// Children list of the innermost open container.
    fn current(&mut self) -> &mut Vec<Node> {
        match self.frames.last_mut() {
            Some(frame) => &mut frame.children,
            None => &mut self.root,
        }
    }

    fn attach(&mut self, node: Node) {
        self.current().push(node);
    }

    fn push_text(&mut self, text: &str) {
        let children = self.current();
        if let Some(Node::PlainText(last)) = children.last_mut() {
            last.push_str(text);
        } else {
            children.push(Node::PlainText(text.to_string()));
        }
    }

    fn close_top(&mut self) {
        if let Some(frame) = self.frames.pop() {
            let node = frame.into_node();
            self.attach(node);
        }
    }

    /// Closes a frame that did not meet its own closer. Color blocks still
    /// become nodes; an emphasis turns back into a literal `*` followed by
    /// its children.
    fn abandon_top(&mut self) {
        match self.frames.last() {
            Some(frame) if frame.kind == FrameKind::Emphasis => {
                if let Some(frame) = self.frames.pop() {
                    self.push_text("*");
                    for child in frame.children {
                        match child {
                            Node::PlainText(text) => self.push_text(&text),
                            node => self.attach(node),
                        }
                    }
                }
            }
            _ => self.close_top(),
        }
    }

    /// Closes frames down to and including `index`. Color blocks above it
    /// are reported as implicitly closed by `closer`.
    fn close_through(&mut self, index: usize, closer: &str, offset: usize) {
        while self.frames.len() > index + 1 {
            if let Some(frame) = self.frames.last()
                && frame.kind != FrameKind::Emphasis
            {
                self.diagnostics.push(Diagnostic::new(
                    DiagnosticKind::MismatchedClose,
                    format!("{} closed implicitly by {closer}", frame.describe()),
                    offset,
                ));
            }
            self.abandon_top();
        }
        self.close_top();
    }

    fn open_frame(&mut self, kind: FrameKind, token: Token<'a>) {
        if self.frames.len() >= self.options.max_depth {
            log::debug!("nesting limit {} reached at {}", self.options.max_depth, token.start);
            self.diagnostics.push(Diagnostic::new(
                DiagnosticKind::DepthLimit,
                format!("nesting deeper than {} blocks", self.options.max_depth),
                token.start,
            ));
            self.push_text(token.text);
            return;
        }
        self.frames.push(Frame {
            kind,
            children: Vec::new(),
            offset: token.start,
        });
    }

    fn tag_open(&mut self, token: Token<'a>) {
        match token.tag() {
            Some(Tag::Chess) => self.chess(token),
            Some(tag) => {
                let expanded = tag.entry().default_expanded || token.has_attr("open");
                self.open_frame(FrameKind::Color { tag, expanded }, token);
            }
            None => self.push_text(token.text),
        }
    }

    fn tag_close(&mut self, token: Token<'a>) {
        let target = token.tag().and_then(|tag| {
            self.frames.iter().rposition(
                |f| matches!(f.kind, FrameKind::Color { tag: open, .. } if open == tag),
            )
        });
        match target {
            Some(index) => self.close_through(index, token.text, token.start),
            None => {
                self.diagnostics.push(Diagnostic::new(
                    DiagnosticKind::StrayClose,
                    format!("{} does not close any open block", token.text),
                    token.start,
                ));
                self.push_text(token.text);
            }
        }
    }

    fn emphasis(&mut self, token: Token<'a>) {
        let open = self
            .frames
            .iter()
            .rposition(|f| f.kind == FrameKind::Emphasis);
        match open {
            Some(index) => self.close_through(index, "closing *", token.start),
            None => self.open_frame(FrameKind::Emphasis, token),
        }
    }

    /// Consumes the opaque text of a raw zone and its closer, if present.
    fn raw_content(&mut self, close: TokenKind) -> (String, bool) {
        let mut text = String::new();
        if self.peek_kind() == Some(TokenKind::Text)
            && let Some(token) = self.bump()
        {
            text.push_str(token.text);
        }
        let closed = self.peek_kind() == Some(close);
        if closed {
            self.pos += 1;
        }
        (text, closed)
    }

    fn unterminated_raw(&mut self, closed: bool, what: &str, offset: usize) {
        if !closed {
            self.diagnostics.push(Diagnostic::new(
                DiagnosticKind::UnterminatedBlock,
                format!("{what} was never closed"),
                offset,
            ));
        }
    }

    fn chess(&mut self, token: Token<'a>) {
        let (raw, closed) = self.raw_content(TokenKind::TagClose);
        self.unterminated_raw(closed, "<chess>", token.start);
        let source = ChessSource::from_raw(&raw);
        self.attach(Node::ChessDiagram {
            raw,
            source,
            flip: token.has_attr("flip"),
            offset: token.start,
        });
    }

    fn wiki_link(&mut self, token: Token<'a>) {
        let inner = token.wiki_inner().unwrap_or_default();
        let (title, alias) = match inner.split_once('|') {
            Some((title, alias)) => (title, Some(alias.to_string())),
            None => (inner, None),
        };
        self.attach(Node::WikiLink {
            title: title.to_string(),
            alias,
            offset: token.start,
        });
    }
}
