//! Splits legacy plain or markdown-ish text into blocks.

use crate::block::{Block, BlockKind, TextRun, TextStyles};
use once_cell::sync::Lazy;
use regex::Regex;

static HEADING: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(#{1,6})\s+(.*)$").unwrap());
static CHECK_ITEM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[-*]\s+\[([ xX])\]\s*(.*)$").unwrap());
static BULLET: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[-*+]\s+(.*)$").unwrap());
static NUMBERED: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+[.)]\s+(.*)$").unwrap());
static DIVIDER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(?:-{3,}|\*{3,}|_{3,})$").unwrap());
static FENCE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^```\s*([\w+#.-]*)").unwrap());
static INLINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\*\*(?P<bold>[^*]+)\*\*|~~(?P<strike>[^~]+)~~|`(?P<code>[^`]+)`|\*(?P<star>[^*\s][^*]*)\*|\b_(?P<under>[^_]+)_\b")
        .unwrap()
});

/// Parses `text` line by line. Consecutive plain lines are joined into one
/// paragraph; blank lines end it. Ids are left empty for the normalizer.
pub fn parse_text_blocks(text: &str) -> Vec<Block> {
    let mut blocks = Vec::new();
    let mut paragraph: Vec<&str> = Vec::new();
    let mut lines = text.lines();

    let flush = |paragraph: &mut Vec<&str>, blocks: &mut Vec<Block>| {
        if !paragraph.is_empty() {
            blocks.push(Block::paragraph("", parse_inline_markdown(&paragraph.join("\n"))));
            paragraph.clear();
        }
    };

    while let Some(raw) = lines.next() {
        let line = raw.trim_end();
        let trimmed = line.trim_start();

        if let Some(caps) = FENCE.captures(trimmed) {
            flush(&mut paragraph, &mut blocks);
            let language = caps.get(1).map_or("", |m| m.as_str()).to_string();
            let mut code = Vec::new();
            for inner in lines.by_ref() {
                if inner.trim_start().starts_with("```") {
                    break;
                }
                code.push(inner);
            }
            blocks.push(Block::code("", language, code.join("\n")));
            continue;
        }

        if trimmed.is_empty() {
            flush(&mut paragraph, &mut blocks);
            continue;
        }

        let block = if DIVIDER.is_match(trimmed) {
            Some(Block::new("", BlockKind::Divider))
        } else if let Some(caps) = HEADING.captures(trimmed) {
            let level = caps[1].len() as u8;
            Some(Block::new("", BlockKind::Heading { level }).with_content(parse_inline_markdown(&caps[2])))
        } else if let Some(caps) = CHECK_ITEM.captures(trimmed) {
            let checked = !caps[1].trim().is_empty();
            Some(
                Block::new("", BlockKind::CheckListItem { checked })
                    .with_content(parse_inline_markdown(&caps[2])),
            )
        } else if let Some(caps) = BULLET.captures(trimmed) {
            Some(Block::new("", BlockKind::BulletListItem).with_content(parse_inline_markdown(&caps[1])))
        } else if let Some(caps) = NUMBERED.captures(trimmed) {
            Some(Block::new("", BlockKind::NumberedListItem).with_content(parse_inline_markdown(&caps[1])))
        } else if let Some(rest) = trimmed.strip_prefix('>') {
            Some(Block::new("", BlockKind::Quote).with_content(parse_inline_markdown(rest.trim_start())))
        } else {
            None
        };

        match block {
            Some(block) => {
                flush(&mut paragraph, &mut blocks);
                blocks.push(block);
            }
            None => paragraph.push(line),
        }
    }
    flush(&mut paragraph, &mut blocks);
    blocks
}

/// Splits `**bold**`, `*italic*`, `_italic_`, `` `code` `` and `~~strike~~`
/// spans into styled runs. Markers are not nested.
pub fn parse_inline_markdown(text: &str) -> Vec<TextRun> {
    let mut runs = Vec::new();
    let mut last = 0;
    for caps in INLINE.captures_iter(text) {
        let Some(whole) = caps.get(0) else { continue };
        if whole.start() > last {
            runs.push(TextRun::plain(&text[last..whole.start()]));
        }
        let mut styles = TextStyles::default();
        let inner = if let Some(m) = caps.name("bold") {
            styles.bold = true;
            m
        } else if let Some(m) = caps.name("strike") {
            styles.strikethrough = true;
            m
        } else if let Some(m) = caps.name("code") {
            styles.code = true;
            m
        } else if let Some(m) = caps.name("star").or_else(|| caps.name("under")) {
            styles.italic = true;
            m
        } else {
            continue;
        };
        runs.push(TextRun::styled(inner.as_str(), styles));
        last = whole.end();
    }
    if last < text.len() {
        runs.push(TextRun::plain(&text[last..]));
    }
    runs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_markdown_lines_into_blocks() {
        let text = "# Title\n\nIntro line\ncontinues here\n\n- one\n* two\n1. first\n- [x] done\n- [ ] open\n> quoted\n---\n";
        let blocks = parse_text_blocks(text);
        let kinds: Vec<_> = blocks.iter().map(|b| b.type_tag().to_string()).collect();
        assert_eq!(
            kinds,
            vec![
                "heading",
                "paragraph",
                "bulletListItem",
                "bulletListItem",
                "numberedListItem",
                "checkListItem",
                "checkListItem",
                "quote",
                "divider"
            ]
        );
        assert_eq!(blocks[1].plain_text(), "Intro line\ncontinues here");
        assert_eq!(blocks[5].kind, BlockKind::CheckListItem { checked: true });
        assert_eq!(blocks[6].kind, BlockKind::CheckListItem { checked: false });
    }

    #[test]
    fn fenced_code_keeps_language_and_lines() {
        let blocks = parse_text_blocks("```rust\nfn main() {\n    # not a heading\n}\n```\nafter");
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].kind, BlockKind::CodeBlock { language: "rust".into() });
        assert_eq!(blocks[0].plain_text(), "fn main() {\n    # not a heading\n}");
        assert_eq!(blocks[1].plain_text(), "after");
    }

    #[test]
    fn unterminated_fence_takes_the_rest() {
        let blocks = parse_text_blocks("```\nline");
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].plain_text(), "line");
    }

    #[test]
    fn inline_markers_become_styles() {
        let runs = parse_inline_markdown("a **b** *c* `d` ~~e~~ snake_case_name");
        let bold = runs.iter().find(|r| r.text == "b").unwrap();
        assert!(bold.styles.bold);
        assert!(runs.iter().find(|r| r.text == "c").unwrap().styles.italic);
        assert!(runs.iter().find(|r| r.text == "d").unwrap().styles.code);
        assert!(runs.iter().find(|r| r.text == "e").unwrap().styles.strikethrough);
        let joined: String = runs.iter().map(|r| r.text.as_str()).collect();
        assert!(joined.ends_with("snake_case_name"));
    }
}
