//! Greedy line breaking over styled spans.
//!
//! Words are only broken between characters when a single word is wider
//! than the line. Adjacent spans with no whitespace between them form one
//! unbreakable word.

use crate::flow::{Align, Span};

const EPSILON: f32 = 0.01;

/// A piece of one span placed on a line.
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    pub span: usize,
    pub text: String,
    /// Offset from the start of the line box, alignment applied.
    pub x: f32,
    pub width: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineLayout {
    pub fragments: Vec<Fragment>,
    /// Width of the text itself, without alignment offset.
    pub width: f32,
    pub height: f32,
    /// Largest font size on the line.
    pub size: f32,
    /// Extra advance per space for justified lines.
    pub word_spacing: f32,
}

impl LineLayout {
    /// Baseline offset from the top of the line box.
    pub fn baseline(&self) -> f32 {
        (self.height - self.size) / 2.0 + self.size * 0.8
    }
}

#[derive(Debug, Clone)]
struct Piece {
    span: usize,
    text: String,
    width: f32,
    space: bool,
}

enum Token {
    Word(Vec<Piece>),
    Space(Piece),
    Newline,
}

fn char_width(span: &Span, c: char) -> f32 {
    span.font.char_width(c) as f32 * span.size / 1000.0
}

fn piece(index: usize, span: &Span, text: String, space: bool) -> Piece {
    let width = span.font.measure(&text, span.size);
    Piece {
        span: index,
        text,
        width,
        space,
    }
}

fn tokenize(spans: &[Span]) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut word: Vec<Piece> = Vec::new();
    for (index, span) in spans.iter().enumerate() {
        let mut buf = String::new();
        for c in span.text.chars() {
            match c {
                ' ' | '\t' | '\n' => {
                    if !buf.is_empty() {
                        word.push(piece(index, span, std::mem::take(&mut buf), false));
                    }
                    if !word.is_empty() {
                        tokens.push(Token::Word(std::mem::take(&mut word)));
                    }
                    if c == '\n' {
                        tokens.push(Token::Newline);
                    } else {
                        tokens.push(Token::Space(piece(index, span, " ".into(), true)));
                    }
                }
                '\r' => {}
                _ => buf.push(c),
            }
        }
        if !buf.is_empty() {
            word.push(piece(index, span, buf, false));
        }
    }
    if !word.is_empty() {
        tokens.push(Token::Word(word));
    }
    tokens
}

struct RawLine {
    pieces: Vec<Piece>,
    /// Ended by a newline or the end of the text.
    hard: bool,
}

struct LineBuilder<'a> {
    spans: &'a [Span],
    max_width: f32,
    pieces: Vec<Piece>,
    width: f32,
    after_wrap: bool,
    lines: Vec<RawLine>,
}

impl<'a> LineBuilder<'a> {
    fn has_word(&self) -> bool {
        self.pieces.iter().any(|p| !p.space)
    }

    fn finish(&mut self, hard: bool) {
        self.lines.push(RawLine {
            pieces: std::mem::take(&mut self.pieces),
            hard,
        });
        self.width = 0.0;
        self.after_wrap = !hard;
    }

    fn append(&mut self, piece: Piece) {
        self.width += piece.width;
        if let Some(last) = self.pieces.last_mut()
            && last.span == piece.span
            && last.space == piece.space
        {
            last.text.push_str(&piece.text);
            last.width += piece.width;
            return;
        }
        self.pieces.push(piece);
    }

    fn push_space(&mut self, piece: Piece) {
        if self.pieces.is_empty() && self.after_wrap {
            return;
        }
        self.append(piece);
    }

    fn push_word(&mut self, pieces: Vec<Piece>) {
        let width: f32 = pieces.iter().map(|p| p.width).sum();
        if self.has_word() && self.width + width > self.max_width + EPSILON {
            self.finish(false);
        }
        self.after_wrap = false;
        if width <= self.max_width + EPSILON || self.has_word() {
            for piece in pieces {
                self.append(piece);
            }
            return;
        }

        // Wider than a whole line: break between characters.
        for piece in pieces {
            let span = &self.spans[piece.span];
            for c in piece.text.chars() {
                let cw = char_width(span, c);
                if self.has_word() && self.width + cw > self.max_width + EPSILON {
                    self.finish(false);
                    self.after_wrap = false;
                }
                self.append(Piece {
                    span: piece.span,
                    text: c.to_string(),
                    width: cw,
                    space: false,
                });
            }
        }
    }
}

/// Breaks `spans` into lines no wider than `max_width`.
///
/// `line_height` is a multiple of the largest size on each line. Blank lines
/// produced by consecutive newlines use `fallback_size`. Returns no lines
/// when there is no text at all.
pub fn break_lines(
    spans: &[Span],
    max_width: f32,
    align: Align,
    line_height: f32,
    fallback_size: f32,
) -> Vec<LineLayout> {
    let mut builder = LineBuilder {
        spans,
        max_width,
        pieces: Vec::new(),
        width: 0.0,
        after_wrap: false,
        lines: Vec::new(),
    };

    for token in tokenize(spans) {
        match token {
            Token::Word(pieces) => builder.push_word(pieces),
            Token::Space(piece) => builder.push_space(piece),
            Token::Newline => builder.finish(true),
        }
    }
    if !builder.pieces.is_empty() {
        builder.finish(true);
    }

    builder
        .lines
        .into_iter()
        .map(|raw| finalize_line(raw, spans, max_width, align, line_height, fallback_size))
        .collect()
}

fn finalize_line(
    mut raw: RawLine,
    spans: &[Span],
    max_width: f32,
    align: Align,
    line_height: f32,
    fallback_size: f32,
) -> LineLayout {
    while raw.pieces.last().is_some_and(|p| p.space) {
        raw.pieces.pop();
    }

    let size = raw
        .pieces
        .iter()
        .map(|p| spans[p.span].size)
        .fold(0.0, f32::max);
    let size = if size > 0.0 { size } else { fallback_size };
    let width: f32 = raw.pieces.iter().map(|p| p.width).sum();
    let free = (max_width - width).max(0.0);

    let spaces: usize = raw
        .pieces
        .iter()
        .filter(|p| p.space)
        .map(|p| p.text.chars().count())
        .sum();
    let word_spacing = if align == Align::Justify && !raw.hard && spaces > 0 {
        free / spaces as f32
    } else {
        0.0
    };

    let mut x = match align {
        Align::Center => free / 2.0,
        Align::Right => free,
        Align::Left | Align::Justify => 0.0,
    };

    // Merge consecutive pieces from the same span into single fragments.
    let mut fragments: Vec<Fragment> = Vec::new();
    for piece in raw.pieces {
        let extra = if piece.space {
            word_spacing * piece.text.chars().count() as f32
        } else {
            0.0
        };
        let advance = piece.width + extra;
        match fragments.last_mut() {
            Some(last) if last.span == piece.span => {
                last.text.push_str(&piece.text);
                last.width += advance;
            }
            _ => fragments.push(Fragment {
                span: piece.span,
                text: piece.text,
                x,
                width: advance,
            }),
        }
        x += advance;
    }

    LineLayout {
        fragments,
        width,
        height: size * line_height,
        size,
        word_spacing,
    }
}

/// Shortens `text` with a trailing ellipsis until it fits `max_width`.
pub fn truncate_to_width(text: &str, span: &Span, max_width: f32) -> String {
    if span.font.measure(text, span.size) <= max_width + EPSILON {
        return text.to_string();
    }
    let ellipsis = '\u{2026}';
    let mut out = String::new();
    let mut width = char_width(span, ellipsis);
    for c in text.chars() {
        let cw = char_width(span, c);
        if width + cw > max_width + EPSILON {
            break;
        }
        width += cw;
        out.push(c);
    }
    out.truncate(out.trim_end().len());
    out.push(ellipsis);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fonts::StandardFont;
    use quire_types::Color;

    fn span(text: &str) -> Span {
        Span::new(text, StandardFont::Helvetica, 10.0, Color::BLACK)
    }

    fn line_text(line: &LineLayout) -> String {
        line.fragments.iter().map(|f| f.text.as_str()).collect()
    }

    #[test]
    fn short_text_stays_on_one_line() {
        let lines = break_lines(&[span("hello world")], 500.0, Align::Left, 1.4, 10.0);
        assert_eq!(lines.len(), 1);
        assert_eq!(line_text(&lines[0]), "hello world");
        assert!((lines[0].height - 14.0).abs() < 0.001);
    }

    #[test]
    fn wraps_at_spaces_and_drops_them() {
        let text = "alpha beta gamma delta epsilon";
        let lines = break_lines(&[span(text)], 60.0, Align::Left, 1.2, 10.0);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(line.width <= 60.0 + EPSILON, "{} too wide", line_text(line));
            assert!(!line_text(line).starts_with(' '));
            assert!(!line_text(line).ends_with(' '));
        }
        let joined: Vec<String> = lines.iter().map(line_text).collect();
        assert_eq!(joined.join(" "), text);
    }

    #[test]
    fn long_word_breaks_by_character() {
        let word = "x".repeat(80);
        let lines = break_lines(&[span(&word)], 100.0, Align::Left, 1.2, 10.0);
        assert!(lines.len() > 1);
        let joined: String = lines.iter().map(line_text).collect();
        assert_eq!(joined, word);
    }

    #[test]
    fn newlines_force_breaks_and_keep_blank_lines() {
        let lines = break_lines(&[span("a\n\nb")], 500.0, Align::Left, 1.0, 12.0);
        assert_eq!(lines.len(), 3);
        assert!(lines[1].fragments.is_empty());
        assert!((lines[1].height - 12.0).abs() < 0.001);
    }

    #[test]
    fn spans_without_whitespace_wrap_together() {
        let mut bold = span("bold");
        bold.font = StandardFont::HelveticaBold;
        let spans = vec![span("aaaa aaaa "), bold, span("ed")];
        let width = StandardFont::Helvetica.measure("aaaa aaaa bo", 10.0);
        let lines = break_lines(&spans, width, Align::Left, 1.2, 10.0);
        assert_eq!(lines.len(), 2);
        assert_eq!(line_text(&lines[1]), "bolded");
        assert_eq!(lines[1].fragments.len(), 2);
    }

    #[test]
    fn center_and_right_offset_the_line() {
        let centered = break_lines(&[span("hi")], 100.0, Align::Center, 1.2, 10.0);
        let right = break_lines(&[span("hi")], 100.0, Align::Right, 1.2, 10.0);
        let width = centered[0].width;
        assert!((centered[0].fragments[0].x - (100.0 - width) / 2.0).abs() < 0.001);
        assert!((right[0].fragments[0].x - (100.0 - width)).abs() < 0.001);
    }

    #[test]
    fn justify_spreads_all_but_the_last_line() {
        let text = "one two three four five six seven eight nine ten";
        let lines = break_lines(&[span(text)], 80.0, Align::Justify, 1.2, 10.0);
        assert!(lines.len() > 2);
        let (last, rest) = lines.split_last().unwrap();
        assert_eq!(last.word_spacing, 0.0);
        for line in rest {
            let end = line.fragments.last().map(|f| f.x + f.width).unwrap_or(0.0);
            assert!((end - 80.0).abs() < 0.05, "line ends at {end}");
        }
    }

    #[test]
    fn empty_input_has_no_lines() {
        assert!(break_lines(&[], 100.0, Align::Left, 1.2, 10.0).is_empty());
        assert!(break_lines(&[span("")], 100.0, Align::Left, 1.2, 10.0).is_empty());
    }

    #[test]
    fn truncation_appends_ellipsis() {
        let s = span("A rather long document title");
        let out = truncate_to_width(&s.text, &s, 60.0);
        assert!(out.ends_with('\u{2026}'));
        assert!(s.font.measure(&out, 10.0) <= 60.0 + EPSILON);
        assert_eq!(truncate_to_width("short", &s, 200.0), "short");
    }
}
