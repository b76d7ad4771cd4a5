use crate::theme::{Theme, TokenKind};
use quire_types::Color;

#[derive(Debug, Clone, PartialEq)]
pub struct HighlightedSpan {
    pub text: String,
    pub kind: TokenKind,
    pub color: Color,
}

/// One source line. Spans concatenate to the original line exactly.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HighlightedLine {
    pub spans: Vec<HighlightedSpan>,
}

impl HighlightedLine {
    pub fn text(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }

    /// Appends `text`, merging with the previous span when the kind matches.
    pub(crate) fn push(&mut self, text: &str, kind: TokenKind, theme: &Theme) {
        if text.is_empty() {
            return;
        }
        match self.spans.last_mut() {
            Some(last) if last.kind == kind => last.text.push_str(text),
            _ => self.spans.push(HighlightedSpan {
                text: text.to_string(),
                kind,
                color: theme.color(kind),
            }),
        }
    }
}

/// Plain-text rendition: one foreground span per line, characters untouched.
pub fn plain_lines(code: &str, theme: &Theme) -> Vec<HighlightedLine> {
    code.split('\n')
        .map(|line| {
            let mut out = HighlightedLine::default();
            out.push(line, TokenKind::Plain, theme);
            out
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_lines_keep_every_line() {
        let lines = plain_lines("a\n\nb ✓", &Theme::light());
        assert_eq!(lines.len(), 3);
        assert!(lines[1].spans.is_empty());
        assert_eq!(lines[2].text(), "b ✓");
        assert_eq!(lines[0].spans[0].color, Theme::light().foreground);
    }
}
