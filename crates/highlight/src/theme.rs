//! Color themes for code blocks.

use quire_types::Color;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lexical class of a highlighted span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Plain,
    Comment,
    String,
    Number,
    Keyword,
    Type,
    Literal,
    Punctuation,
    Tag,
    Attribute,
    Heading,
    Property,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeKind {
    #[default]
    Light,
    Dark,
}

impl ThemeKind {
    pub fn parse(s: &str) -> Result<Self, String> {
        match s.trim().to_lowercase().as_str() {
            "light" => Ok(ThemeKind::Light),
            "dark" => Ok(ThemeKind::Dark),
            _ => Err(format!("Unknown theme: {}", s)),
        }
    }
}

impl fmt::Display for ThemeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ThemeKind::Light => f.write_str("light"),
            ThemeKind::Dark => f.write_str("dark"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub kind: ThemeKind,
    pub background: Color,
    pub foreground: Color,
    pub border: Color,
    comment: Color,
    string: Color,
    number: Color,
    keyword: Color,
    type_name: Color,
    literal: Color,
    punctuation: Color,
    tag: Color,
    attribute: Color,
    heading: Color,
    property: Color,
}

impl Theme {
    pub fn light() -> Self {
        Self {
            kind: ThemeKind::Light,
            background: Color::rgb(0xf6, 0xf8, 0xfa),
            foreground: Color::rgb(0x24, 0x29, 0x2e),
            border: Color::rgb(0xe1, 0xe4, 0xe8),
            comment: Color::rgb(0x6a, 0x73, 0x7d),
            string: Color::rgb(0x03, 0x2f, 0x62),
            number: Color::rgb(0x00, 0x5c, 0xc5),
            keyword: Color::rgb(0xd7, 0x3a, 0x49),
            type_name: Color::rgb(0x6f, 0x42, 0xc1),
            literal: Color::rgb(0x00, 0x5c, 0xc5),
            punctuation: Color::rgb(0x24, 0x29, 0x2e),
            tag: Color::rgb(0x22, 0x86, 0x3a),
            attribute: Color::rgb(0x6f, 0x42, 0xc1),
            heading: Color::rgb(0x00, 0x5c, 0xc5),
            property: Color::rgb(0x00, 0x5c, 0xc5),
        }
    }

    pub fn dark() -> Self {
        Self {
            kind: ThemeKind::Dark,
            background: Color::rgb(0x28, 0x2c, 0x34),
            foreground: Color::rgb(0xab, 0xb2, 0xbf),
            border: Color::rgb(0x3e, 0x44, 0x51),
            comment: Color::rgb(0x5c, 0x63, 0x70),
            string: Color::rgb(0x98, 0xc3, 0x79),
            number: Color::rgb(0xd1, 0x9a, 0x66),
            keyword: Color::rgb(0xc6, 0x78, 0xdd),
            type_name: Color::rgb(0xe5, 0xc0, 0x7b),
            literal: Color::rgb(0xd1, 0x9a, 0x66),
            punctuation: Color::rgb(0xab, 0xb2, 0xbf),
            tag: Color::rgb(0xe0, 0x6c, 0x75),
            attribute: Color::rgb(0xd1, 0x9a, 0x66),
            heading: Color::rgb(0x61, 0xaf, 0xef),
            property: Color::rgb(0xe0, 0x6c, 0x75),
        }
    }

    pub fn from_kind(kind: ThemeKind) -> Self {
        match kind {
            ThemeKind::Light => Self::light(),
            ThemeKind::Dark => Self::dark(),
        }
    }

    pub fn color(&self, token: TokenKind) -> Color {
        match token {
            TokenKind::Plain => self.foreground,
            TokenKind::Comment => self.comment,
            TokenKind::String => self.string,
            TokenKind::Number => self.number,
            TokenKind::Keyword => self.keyword,
            TokenKind::Type => self.type_name,
            TokenKind::Literal => self.literal,
            TokenKind::Punctuation => self.punctuation,
            TokenKind::Tag => self.tag,
            TokenKind::Attribute => self.attribute,
            TokenKind::Heading => self.heading,
            TokenKind::Property => self.property,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::light()
    }
}
