//! # aml-engine
//!
//! Turns AML source into an HTML fragment.
//!
//! ```text
//! Source → lex (aml-syntax) → parse → Document → generate → Rendered
//!                               │                   │
//!                          diagnostics   chess · annotate · links
//! ```
//!
//! ## Module Structure
//!
//! ```text
//! aml-engine/
//! ├── lib.rs          # This file - compile() and re-exports
//! ├── ast.rs          # Document and Node
//! ├── parser.rs       # Tokens → Document, with recovery
//! ├── diagnostics.rs  # Non-fatal warnings
//! ├── chess/          # FEN, SAN and PGN handling
//! ├── annotate/       # Chinese segmentation and CC-CEDICT loading
//! └── render/         # HTML generation and link resolution
//! ```
//!
//! ## Quick Start
//!
//! ```
//! use aml_engine::{compile, Renderer};
//!
//! let out = compile("<yellow>*quoted*</yellow>", &Renderer::default());
//! assert!(out.html.contains("<em>quoted</em>"));
//! assert!(out.diagnostics.is_empty());
//! ```
//!
//! Nothing here fails on bad markup. Every call returns output plus a list of
//! [`Diagnostic`]s describing what was repaired.

pub mod annotate;
pub mod ast;
pub mod chess;
pub mod diagnostics;
pub mod parser;
pub mod render;

pub use annotate::{CedictDictionary, DictEntry, Dictionary, DictionaryError, NoDictionary};
pub use ast::{Document, Node, Video};
pub use diagnostics::{Diagnostic, DiagnosticKind};
pub use parser::{ParseOptions, parse, parse_with};
pub use render::{LinkResolver, PrefixResolver, RenderOptions, Rendered, Renderer, Unresolved};

/// Runs the whole pipeline with default parse options.
pub fn compile(text: &str, renderer: &Renderer<'_>) -> Rendered {
    compile_with(text, &ParseOptions::default(), renderer)
}

/// Lexes, parses and generates `text`. Parse and generation diagnostics are
/// merged into one list ordered by source offset.
pub fn compile_with(text: &str, options: &ParseOptions, renderer: &Renderer<'_>) -> Rendered {
    let tokens = aml_syntax::lex(text);
    let (document, mut diagnostics) = parse_with(&tokens, options);
    let mut rendered = renderer.generate(&document);

    diagnostics.append(&mut rendered.diagnostics);
    diagnostics.sort_by_key(|d| d.offset);
    log::debug!(
        "compiled {} bytes into {} bytes of html with {} diagnostics",
        text.len(),
        rendered.html.len(),
        diagnostics.len()
    );
    rendered.diagnostics = diagnostics;
    rendered
}
