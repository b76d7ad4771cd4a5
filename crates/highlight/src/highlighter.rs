use crate::error::HighlightError;
use crate::grammar::{Language, grammar_for};
use crate::span::{HighlightedLine, plain_lines};
use crate::theme::Theme;
use async_trait::async_trait;
use log::{debug, warn};
use std::time::Duration;

/// Turns source code into colored lines. Implementations must return one
/// line per `\n`-separated source line with the characters unchanged.
#[async_trait]
pub trait Highlighter: Send + Sync {
    async fn highlight(
        &self,
        code: &str,
        language: &str,
        theme: &Theme,
    ) -> Result<Vec<HighlightedLine>, HighlightError>;
}

/// The built-in highlighter. Tokenizing is synchronous and deterministic.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegexHighlighter;

impl RegexHighlighter {
    pub fn new() -> Self {
        Self
    }

    pub fn highlight_sync(
        &self,
        code: &str,
        language: &str,
        theme: &Theme,
    ) -> Result<Vec<HighlightedLine>, HighlightError> {
        let lang = Language::from_name(language)
            .ok_or_else(|| HighlightError::UnsupportedLanguage(language.to_string()))?;
        let grammar = grammar_for(lang)?;

        let mut lines = vec![HighlightedLine::default()];
        for (kind, text) in grammar.tokenize(code) {
            let mut pieces = text.split('\n');
            if let Some(first) = pieces.next() {
                if let Some(line) = lines.last_mut() {
                    line.push(first, kind, theme);
                }
            }
            for piece in pieces {
                let mut line = HighlightedLine::default();
                line.push(piece, kind, theme);
                lines.push(line);
            }
        }
        Ok(lines)
    }
}

#[async_trait]
impl Highlighter for RegexHighlighter {
    async fn highlight(
        &self,
        code: &str,
        language: &str,
        theme: &Theme,
    ) -> Result<Vec<HighlightedLine>, HighlightError> {
        self.highlight_sync(code, language, theme)
    }
}

/// Result of a highlight attempt that never fails.
#[derive(Debug, Clone, PartialEq)]
pub struct Highlighted {
    pub lines: Vec<HighlightedLine>,
    /// Why plain text was used instead, if it was.
    pub fallback: Option<HighlightError>,
}

/// Highlights `code`, substituting plain lines on any error or when
/// `timeout` elapses first.
pub async fn highlight_or_plain(
    highlighter: &dyn Highlighter,
    code: &str,
    language: &str,
    theme: &Theme,
    timeout: Duration,
) -> Highlighted {
    let result = match tokio::time::timeout(timeout, highlighter.highlight(code, language, theme)).await {
        Ok(result) => result,
        Err(_) => Err(HighlightError::Timeout(timeout)),
    };
    match result {
        Ok(lines) if lines_match(&lines, code) => Highlighted {
            lines,
            fallback: None,
        },
        Ok(_) => {
            warn!("Highlighter altered '{}' source text; using plain text", language);
            Highlighted {
                lines: plain_lines(code, theme),
                fallback: Some(HighlightError::Tokenizer(
                    "highlighted lines do not match the source".to_string(),
                )),
            }
        }
        Err(e) => {
            debug!("Falling back to plain text: {}", e);
            Highlighted {
                lines: plain_lines(code, theme),
                fallback: Some(e),
            }
        }
    }
}

fn lines_match(lines: &[HighlightedLine], code: &str) -> bool {
    lines.len() == code.split('\n').count()
        && lines
            .iter()
            .zip(code.split('\n'))
            .all(|(line, source)| line.text() == source)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::TokenKind;

    struct Stalled;

    #[async_trait]
    impl Highlighter for Stalled {
        async fn highlight(
            &self,
            _code: &str,
            _language: &str,
            _theme: &Theme,
        ) -> Result<Vec<HighlightedLine>, HighlightError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(Vec::new())
        }
    }

    #[test]
    fn multiline_tokens_are_split_per_line() {
        let lines = RegexHighlighter
            .highlight_sync("/* a\nb */ x", "js", &Theme::light())
            .unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].spans[0].kind, TokenKind::Comment);
        assert_eq!(lines[1].spans[0].text, "b */");
        assert_eq!(lines[1].text(), "b */ x");
    }

    #[test]
    fn unknown_language_is_an_error() {
        let err = RegexHighlighter
            .highlight_sync("+[->+<]", "brainfuck", &Theme::light())
            .unwrap_err();
        assert_eq!(err, HighlightError::UnsupportedLanguage("brainfuck".into()));
    }

    #[tokio::test]
    async fn unsupported_language_falls_back_to_plain() {
        let out = highlight_or_plain(
            &RegexHighlighter,
            "++[>+<-]\n.",
            "brainfuck",
            &Theme::light(),
            Duration::from_secs(1),
        )
        .await;
        assert!(matches!(out.fallback, Some(HighlightError::UnsupportedLanguage(_))));
        assert_eq!(out.lines.len(), 2);
        assert_eq!(out.lines[0].text(), "++[>+<-]");
    }

    #[tokio::test(start_paused = true)]
    async fn slow_highlighter_times_out() {
        let out = highlight_or_plain(
            &Stalled,
            "let x = 1;",
            "rust",
            &Theme::dark(),
            Duration::from_millis(50),
        )
        .await;
        assert_eq!(out.fallback, Some(HighlightError::Timeout(Duration::from_millis(50))));
        assert_eq!(out.lines[0].text(), "let x = 1;");
        assert_eq!(out.lines[0].spans[0].color, Theme::dark().foreground);
    }

    #[tokio::test]
    async fn dark_theme_colors_keywords() {
        let out = highlight_or_plain(
            &RegexHighlighter,
            "fn main() {}",
            "rust",
            &Theme::dark(),
            Duration::from_secs(1),
        )
        .await;
        assert!(out.fallback.is_none());
        let keyword = out.lines[0].spans.iter().find(|s| s.text == "fn").unwrap();
        assert_eq!(keyword.color, Theme::dark().color(TokenKind::Keyword));
    }
}
