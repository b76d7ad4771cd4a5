//! Maps the editor's boolean style flags onto concrete run attributes.

use crate::font::{FontFamily, FontStyle, FontWeight};
use crate::palette;
use crate::text::TextDecoration;
use quire_model::{TextRun, TextStyles};
use quire_types::Color;
use serde::Serialize;

/// Everything the renderer needs to draw one run. Block-level settings such
/// as size and base color are applied on top by the caller.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "camelCase")]
pub struct RunAttributes {
    pub weight: FontWeight,
    pub style: FontStyle,
    pub family: FontFamily,
    pub decoration: TextDecoration,
    pub color: Option<Color>,
    pub background: Option<Color>,
}

impl RunAttributes {
    pub fn is_bold(&self) -> bool {
        self.weight == FontWeight::Bold
    }

    pub fn is_italic(&self) -> bool {
        self.style == FontStyle::Italic
    }

    pub fn is_monospace(&self) -> bool {
        self.family == FontFamily::Mono
    }
}

/// Flags compose independently; none of them overrides another.
pub fn resolve(styles: &TextStyles) -> RunAttributes {
    RunAttributes {
        weight: if styles.bold {
            FontWeight::Bold
        } else {
            FontWeight::Regular
        },
        style: if styles.italic {
            FontStyle::Italic
        } else {
            FontStyle::Normal
        },
        family: if styles.code {
            FontFamily::Mono
        } else {
            FontFamily::Sans
        },
        decoration: TextDecoration {
            underline: styles.underline,
            line_through: styles.strikethrough,
        },
        color: styles.text_color.as_deref().and_then(palette::text_color),
        background: styles
            .background_color
            .as_deref()
            .and_then(palette::background_color)
            .or_else(|| styles.code.then_some(palette::INLINE_CODE_BACKGROUND)),
    }
}

/// Like [`resolve`], plus link styling: underlined, and link-colored unless
/// the run names its own color.
pub fn resolve_run(run: &TextRun) -> RunAttributes {
    let mut attrs = resolve(&run.styles);
    if run.link.is_some() {
        attrs.decoration.underline = true;
        attrs.color = attrs.color.or(Some(palette::LINK));
    }
    attrs
}
