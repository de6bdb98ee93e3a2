//! # HTML generation
//!
//! Walks a [`Document`] and writes an HTML fragment. Color blocks become a
//! clickable sigil followed by a content container the client script shows
//! or hides; chess diagrams and videos are emitted as empty mount points
//! carrying `data-*` attributes, so no player or board markup is produced
//! until the reader asks for it.
//!
//! Generation never fails. Problems found here (unknown wiki pages, bad chess
//! input) are returned as [`Diagnostic`]s next to the markup.

mod links;
mod writer;

pub use links::{LinkResolver, PrefixResolver, Unresolved};

use serde::Serialize;

use crate::annotate::{DEFAULT_MAX_WORD_LEN, Dictionary, NoDictionary, annotate};
use crate::ast::{Document, Node, Video};
use crate::chess::{self, ChessError, ChessSource};
use crate::diagnostics::{Diagnostic, DiagnosticKind};
use writer::{HtmlWriter, attr};

static NO_DICTIONARY: NoDictionary = NoDictionary;
static UNRESOLVED: Unresolved = Unresolved;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Attach every intermediate position to chess diagrams built from moves.
    pub chess_replay: bool,
    /// Longest dictionary word tried when annotating Chinese.
    pub max_word_len: usize,
    /// Prefix for links to wiki pages that do not exist yet.
    pub new_page_url: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            chess_replay: false,
            max_word_len: DEFAULT_MAX_WORD_LEN,
            new_page_url: "/wiki/new?title=".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rendered {
    pub html: String,
    /// The document up to the first `--MORE--`, with open elements closed.
    pub summary: Option<String>,
    /// Source offset of the first `--MORE--`.
    pub truncation: Option<usize>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Turns documents into HTML. Borrows its collaborators, so one renderer can
/// serve many documents and threads.
#[derive(Clone)]
pub struct Renderer<'d> {
    dictionary: &'d dyn Dictionary,
    links: &'d dyn LinkResolver,
    options: RenderOptions,
}

impl Default for Renderer<'static> {
    fn default() -> Self {
        Self::new(&NO_DICTIONARY, &UNRESOLVED)
    }
}

impl<'d> Renderer<'d> {
    pub fn new(dictionary: &'d dyn Dictionary, links: &'d dyn LinkResolver) -> Self {
        Self {
            dictionary,
            links,
            options: RenderOptions::default(),
        }
    }

    pub fn with_options(mut self, options: RenderOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    pub fn generate(&self, document: &Document) -> Rendered {
        let mut generation = Generation {
            renderer: self,
            writer: HtmlWriter::default(),
            diagnostics: Vec::new(),
            summary: None,
            truncation: None,
        };
        for node in &document.children {
            generation.node(node);
        }
        Rendered {
            html: generation.writer.finish(),
            summary: generation.summary,
            truncation: generation.truncation,
            diagnostics: generation.diagnostics,
        }
    }
}

/// State for one `generate` call.
struct Generation<'r, 'd> {
    renderer: &'r Renderer<'d>,
    writer: HtmlWriter,
    diagnostics: Vec<Diagnostic>,
    summary: Option<String>,
    truncation: Option<usize>,
}

impl Generation<'_, '_> {
    fn node(&mut self, node: &Node) {
        match node {
            Node::ColorBlock {
                tag,
                children,
                default_expanded,
            } => {
                let entry = tag.entry();
                self.writer.open(
                    &format!(
                        "<span class=\"aml-block aml-{}\"{}>",
                        entry.style_class,
                        attr("data-tag", entry.name)
                    ),
                    "</span>",
                );
                self.writer.raw(&format!(
                    "<span class=\"aml-sigil\" role=\"button\" tabindex=\"0\"{}{}>{}</span>",
                    attr("title", entry.description),
                    attr("aria-expanded", if *default_expanded { "true" } else { "false" }),
                    entry.glyph
                ));
                let hidden = if *default_expanded { "" } else { " hidden" };
                self.writer
                    .open(&format!("<span class=\"aml-content\"{hidden}>"), "</span>");
                for child in children {
                    self.node(child);
                }
                self.writer.close();
                self.writer.close();
            }
            Node::Emphasis(children) => {
                self.writer.open("<em>", "</em>");
                for child in children {
                    self.node(child);
                }
                self.writer.close();
            }
            Node::Literal(text) => {
                self.writer.raw("<code class=\"aml-literal\">");
                self.writer.verbatim(text);
                self.writer.raw("</code>");
            }
            Node::MultilineBlock(text) => {
                self.writer
                    .raw("<span class=\"aml-multiline\" style=\"white-space: pre-wrap\">");
                self.writer.verbatim(text);
                self.writer.raw("</span>");
            }
            Node::WikiLink {
                title,
                alias,
                offset,
            } => self.wiki_link(title, alias.as_deref(), *offset),
            Node::AutoLink { url, video } => self.auto_link(url, video.as_ref()),
            Node::ChineseRun(run) => self.chinese(run),
            Node::ChessDiagram {
                source,
                flip,
                offset,
                ..
            } => self.chess(source, *flip, *offset),
            Node::SectionBreak => self
                .writer
                .raw("<span class=\"aml-section-break\" role=\"separator\"></span>"),
            Node::Truncation { offset } => {
                if self.truncation.is_none() {
                    self.truncation = Some(*offset);
                    self.summary = Some(self.writer.closed_prefix());
                }
                self.writer.raw("<span class=\"aml-more\"></span>");
            }
            Node::PlainText(text) => self.writer.text(text),
        }
    }

    fn wiki_link(&mut self, title: &str, alias: Option<&str>, offset: usize) {
        let target = title.trim();
        let label = alias.unwrap_or(title);
        match self.renderer.links.resolve(target) {
            Some(url) => {
                self.writer.raw(&format!(
                    "<a class=\"aml-wikilink\"{}>",
                    attr("href", &url)
                ));
            }
            None => {
                let url = format!(
                    "{}{}",
                    self.renderer.options.new_page_url,
                    urlencoding::encode(target)
                );
                self.writer.raw(&format!(
                    "<a class=\"aml-wikilink aml-wikilink-new\"{}{}>",
                    attr("href", &url),
                    attr("data-title", target)
                ));
                self.diagnostics.push(Diagnostic::new(
                    DiagnosticKind::UnresolvedWikiLink,
                    format!("no page named {target:?}"),
                    offset,
                ));
            }
        }
        self.writer.verbatim(label);
        self.writer.raw("</a>");
    }

    fn auto_link(&mut self, url: &str, video: Option<&Video>) {
        match video {
            Some(video) => self.writer.raw(&format!(
                "<span class=\"aml-video\"{}{}{}></span>",
                attr("data-video-host", video.host.as_str()),
                attr("data-video-id", &video.id),
                attr("data-url", url)
            )),
            None => {
                self.writer.raw(&format!(
                    "<a class=\"aml-autolink\"{} rel=\"nofollow noopener\" target=\"_blank\">",
                    attr("href", url)
                ));
                self.writer.verbatim(url);
                self.writer.raw("</a>");
            }
        }
    }

    fn chinese(&mut self, run: &str) {
        let segments = annotate(
            run,
            self.renderer.dictionary,
            self.renderer.options.max_word_len,
        );
        self.writer.open("<span class=\"aml-zh\">", "</span>");
        for segment in &segments {
            match (&segment.pinyin, &segment.definition) {
                (Some(pinyin), definition) => self.writer.raw(&format!(
                    "<span class=\"aml-zh-word\"{}{}>",
                    attr("data-pinyin", pinyin),
                    attr("data-definition", definition.as_deref().unwrap_or(""))
                )),
                (None, _) => self.writer.raw("<span class=\"aml-zh-char\">"),
            }
            self.writer.verbatim(&segment.text);
            self.writer.raw("</span>");
        }
        self.writer.close();
    }

    fn chess(&mut self, source: &ChessSource, flip: bool, offset: usize) {
        let resolution = chess::resolve(source);
        for error in &resolution.errors {
            let kind = match error {
                ChessError::InvalidFen(_) => DiagnosticKind::ChessPosition,
                ChessError::Move { .. } => DiagnosticKind::ChessMove,
            };
            self.diagnostics
                .push(Diagnostic::new(kind, error.to_string(), offset));
        }

        let orientation = if flip { "black" } else { "white" };
        let mut start = format!(
            "<span class=\"aml-chess\"{}{}",
            attr("data-fen", &resolution.fen),
            attr("data-orientation", orientation)
        );
        if self.renderer.options.chess_replay && !resolution.plies.is_empty() {
            let fens: Vec<&str> = resolution.plies.iter().map(|p| p.fen.as_str()).collect();
            match serde_json::to_string(&fens) {
                Ok(json) => start.push_str(&attr("data-plies", &json)),
                Err(err) => log::warn!("could not encode chess replay: {err}"),
            }
        }
        start.push_str("></span>");
        self.writer.raw(&start);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;
    use aml_syntax::lex;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    use crate::annotate::DictEntry;

    fn render(input: &str) -> Rendered {
        Renderer::default().generate(&parse(&lex(input)).0)
    }

    #[test]
    fn collapsed_block() {
        let out = render("<red>sure</red>");
        assert_eq!(
            out.html,
            "<span class=\"aml-block aml-red\" data-tag=\"red\">\
             <span class=\"aml-sigil\" role=\"button\" tabindex=\"0\" \
             title=\"Sarcasm or irony, not meant literally\" aria-expanded=\"false\">\u{2757}</span>\
             <span class=\"aml-content\" hidden>sure</span></span>"
        );
        assert!(out.diagnostics.is_empty());
    }

    #[test]
    fn expanded_block_has_no_hidden_attribute() {
        let out = render("<yellow>q</yellow>");
        assert!(out.html.contains("<span class=\"aml-content\">q</span>"));
        assert!(out.html.contains("aria-expanded=\"true\""));
    }

    #[test]
    fn raw_zones_are_escaped_not_parsed() {
        assert_eq!(
            render("<<a <b> c>>").html,
            "<code class=\"aml-literal\">a &lt;b&gt; c</code>"
        );
        assert_eq!(
            render("<<<x\n*y*>>>").html,
            "<span class=\"aml-multiline\" style=\"white-space: pre-wrap\">x\n*y*</span>"
        );
    }

    #[test]
    fn text_breaks_lines() {
        assert_eq!(render("a\nb & c").html, "a<br>\nb &amp; c");
    }

    #[test]
    fn wiki_links_resolve_or_fall_back() {
        let pages = HashMap::from([("Home".to_string(), "/p/home".to_string())]);
        let renderer = Renderer::new(&NO_DICTIONARY, &pages);

        let out = renderer.generate(&parse(&lex("[[Home|start]] [[New Page]]")).0);
        assert_eq!(
            out.html,
            "<a class=\"aml-wikilink\" href=\"/p/home\">start</a> \
             <a class=\"aml-wikilink aml-wikilink-new\" href=\"/wiki/new?title=New%20Page\" \
             data-title=\"New Page\">New Page</a>"
        );
        assert_eq!(out.diagnostics.len(), 1);
        assert_eq!(out.diagnostics[0].kind, DiagnosticKind::UnresolvedWikiLink);
        assert_eq!(out.diagnostics[0].offset, 15);
    }

    #[test]
    fn videos_are_mount_points() {
        let out = render("see https://youtu.be/dQw4w9WgXcQ now");
        assert_eq!(
            out.html,
            "see <span class=\"aml-video\" data-video-host=\"youtube\" data-video-id=\"dQw4w9WgXcQ\" \
             data-url=\"https://youtu.be/dQw4w9WgXcQ\"></span> now"
        );
        assert!(!out.html.contains("<iframe"));
    }

    #[test]
    fn inline_containers_hold_only_phrasing_content() {
        let out = render(
            "<red>*see https://youtu.be/dQw4w9WgXcQ* <<<a\nb>>> <chess>e4</chess>\n----\nend</red>",
        );
        for block_level in ["<div", "<pre", "<hr", "<p>"] {
            assert!(!out.html.contains(block_level), "{block_level} in {}", out.html);
        }
        assert!(out.html.contains("<span class=\"aml-section-break\" role=\"separator\"></span>"));
        assert!(out.html.contains("<em>see <span class=\"aml-video\""));
    }

    #[test]
    fn plain_urls_are_links() {
        assert_eq!(
            render("https://example.com/a?b=1&c=2").html,
            "<a class=\"aml-autolink\" href=\"https://example.com/a?b=1&amp;c=2\" \
             rel=\"nofollow noopener\" target=\"_blank\">https://example.com/a?b=1&amp;c=2</a>"
        );
    }

    #[test]
    fn chinese_is_annotated() {
        let dict = HashMap::from([(
            "你好".to_string(),
            DictEntry {
                pinyin: "nǐ hǎo".into(),
                definition: "hello".into(),
            },
        )]);
        let renderer = Renderer::new(&dict, &UNRESOLVED);
        let out = renderer.generate(&parse(&lex("你好吗")).0);
        assert_eq!(
            out.html,
            "<span class=\"aml-zh\">\
             <span class=\"aml-zh-word\" data-pinyin=\"nǐ hǎo\" data-definition=\"hello\">你好</span>\
             <span class=\"aml-zh-char\">吗</span></span>"
        );
    }

    #[test]
    fn chess_diagram_with_replay() {
        let renderer = Renderer::default().with_options(RenderOptions {
            chess_replay: true,
            ..RenderOptions::default()
        });
        let out = renderer.generate(&parse(&lex("<chess flip>e4</chess>")).0);
        assert_eq!(
            out.html,
            "<span class=\"aml-chess\" \
             data-fen=\"rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1\" \
             data-orientation=\"black\" \
             data-plies=\"[&quot;rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1&quot;]\">\
             </span>"
        );
    }

    #[test]
    fn chess_errors_become_diagnostics() {
        let out = render("x <chess>e4 e4</chess>");
        assert_eq!(out.diagnostics.len(), 1);
        assert_eq!(out.diagnostics[0].kind, DiagnosticKind::ChessMove);
        assert_eq!(out.diagnostics[0].offset, 2);

        let out = render("<chess>8/8/8/8/8/8/8/8</chess>");
        assert_eq!(out.diagnostics[0].kind, DiagnosticKind::ChessPosition);
        assert!(out.html.contains(chess::STARTING_FEN));
    }

    #[test]
    fn summary_stops_at_first_more() {
        let out = render("<green>intro --MORE-- rest</green> --MORE-- end");
        assert_eq!(out.truncation, Some(13));
        let summary = out.summary.unwrap();
        assert!(summary.ends_with("intro </span></span>"));
        assert!(!summary.contains("rest"));
        assert_eq!(out.html.matches("aml-more").count(), 2);
    }
}
