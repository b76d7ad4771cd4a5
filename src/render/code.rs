use quire_highlight::{plain_lines, HighlightedLine, Theme, TokenKind};
use quire_layout::{CodeSpan, CodeSpec};

pub const CODE_SIZE: f32 = 9.5;
const PADDING: f32 = 8.0;

/// A framed monospace block. `lines` is `None` when no highlight result is
/// available, in which case the source is drawn as plain text.
pub fn render_code(source: &str, language: &str, lines: Option<&[HighlightedLine]>, theme: &Theme) -> CodeSpec {
    let fallback;
    let lines = match lines {
        Some(lines) => lines,
        None => {
            fallback = plain_lines(source, theme);
            &fallback
        }
    };
    let language = language.trim();
    CodeSpec {
        lines: lines
            .iter()
            .map(|line| {
                line.spans
                    .iter()
                    .map(|span| CodeSpan {
                        text: span.text.clone(),
                        color: span.color,
                    })
                    .collect()
            })
            .collect(),
        size: CODE_SIZE,
        background: theme.background,
        border: theme.border,
        padding: PADDING,
        label: (!language.is_empty()).then(|| (language.to_lowercase(), theme.color(TokenKind::Comment))),
    }
}
