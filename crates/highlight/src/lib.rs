//! Syntax highlighting for code blocks.
//!
//! [`Highlighter`] is the seam; [`RegexHighlighter`] is the built-in
//! implementation. Callers normally go through [`highlight_or_plain`], which
//! never fails.

pub mod cache;
pub mod error;
pub mod grammar;
pub mod highlighter;
pub mod span;
pub mod theme;

pub use cache::{CacheKey, TokenCache};
pub use error::HighlightError;
pub use grammar::Language;
pub use highlighter::{Highlighted, Highlighter, RegexHighlighter, highlight_or_plain};
pub use span::{HighlightedLine, HighlightedSpan, plain_lines};
pub use theme::{Theme, ThemeKind, TokenKind};
