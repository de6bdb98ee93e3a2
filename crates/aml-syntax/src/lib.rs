//! # aml-syntax
//!
//! The leaves of the AML compiler: the semantic tag [`registry`], the
//! lossless [`lexer`], and the [`token`] types it produces.
//!
//! ```text
//! Source Text → Raw scan → Cooking → Vec<Token>
//!               (Logos)    (context rules)
//! ```
//!
//! ## Module Structure
//!
//! ```text
//! aml-syntax/
//! ├── lib.rs       # This file - public API
//! ├── registry.rs  # Tag enum and the static registry table
//! ├── token.rs     # TokenKind and Token
//! ├── lexer.rs     # Logos raw scan plus the cooking pass
//! └── video.rs     # Video host recognition for bare URLs
//! ```
//!
//! ## Quick Start
//!
//! ```
//! use aml_syntax::{lex, Tag, TokenKind};
//!
//! let tokens = lex("<red>sure</red>");
//! assert_eq!(tokens[0].kind, TokenKind::TagOpen);
//! assert_eq!(tokens[0].tag(), Some(Tag::Red));
//! assert_eq!(tokens[1].text, "sure");
//! ```

pub mod lexer;
pub mod registry;
pub mod token;
pub mod video;

pub use lexer::lex;
pub use registry::{REGISTRY, RegistryEntry, Tag};
pub use token::{Token, TokenKind};
pub use video::{VideoHost, VideoRef};
