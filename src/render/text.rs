use quire_layout::{Align, Span, StandardFont};
use quire_model::{TextAlignment, TextRun};
use quire_style::resolve_run;
use quire_types::Color;

/// Inline code is set slightly smaller so it matches the x-height of the
/// surrounding sans text.
const INLINE_CODE_SCALE: f32 = 0.9;

/// Block-level defaults that run flags add to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BaseStyle {
    pub size: f32,
    pub color: Color,
    pub bold: bool,
    pub italic: bool,
}

impl BaseStyle {
    pub fn new(size: f32, color: Color) -> Self {
        Self {
            size,
            color,
            bold: false,
            italic: false,
        }
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }
}

/// Converts styled runs into layout spans. Text is passed through unchanged.
pub fn spans_from_runs(runs: &[TextRun], base: &BaseStyle) -> Vec<Span> {
    runs.iter()
        .map(|run| {
            let attrs = resolve_run(run);
            let mono = attrs.is_monospace();
            let font = StandardFont::select(mono, base.bold || attrs.is_bold(), base.italic || attrs.is_italic());
            let size = if mono { base.size * INLINE_CODE_SCALE } else { base.size };
            Span {
                text: run.text.clone(),
                font,
                size,
                color: attrs.color.unwrap_or(base.color),
                background: attrs.background,
                underline: attrs.decoration.underline,
                line_through: attrs.decoration.line_through,
                href: run.link.clone(),
            }
        })
        .collect()
}

pub fn align(alignment: TextAlignment) -> Align {
    match alignment {
        TextAlignment::Left => Align::Left,
        TextAlignment::Center => Align::Center,
        TextAlignment::Right => Align::Right,
        TextAlignment::Justify => Align::Justify,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quire_model::TextStyles;

    fn base() -> BaseStyle {
        BaseStyle::new(11.0, Color::BLACK)
    }

    #[test]
    fn flags_pick_the_matching_font() {
        let runs = vec![
            TextRun::plain("a"),
            TextRun::styled(
                "b",
                TextStyles {
                    bold: true,
                    italic: true,
                    ..TextStyles::default()
                },
            ),
            TextRun::styled(
                "c",
                TextStyles {
                    code: true,
                    ..TextStyles::default()
                },
            ),
        ];
        let spans = spans_from_runs(&runs, &base());
        assert_eq!(spans[0].font, StandardFont::Helvetica);
        assert_eq!(spans[1].font, StandardFont::HelveticaBoldOblique);
        assert_eq!(spans[2].font, StandardFont::Courier);
        assert!(spans[2].background.is_some());
        assert!(spans[2].size < 11.0);
    }

    #[test]
    fn heading_base_makes_every_run_bold() {
        let spans = spans_from_runs(&[TextRun::plain("Title")], &base().bold());
        assert_eq!(spans[0].font, StandardFont::HelveticaBold);
    }

    #[test]
    fn links_are_underlined_and_keep_their_target() {
        let run = TextRun {
            link: Some("https://example.com".into()),
            ..TextRun::plain("site")
        };
        let spans = spans_from_runs(&[run], &base());
        assert!(spans[0].underline);
        assert_eq!(spans[0].href.as_deref(), Some("https://example.com"));
        assert_ne!(spans[0].color, Color::BLACK);
    }

    #[test]
    fn unicode_is_untouched() {
        let spans = spans_from_runs(&[TextRun::plain("🎉 Título")], &base());
        assert_eq!(spans[0].text, "🎉 Título");
    }
}
