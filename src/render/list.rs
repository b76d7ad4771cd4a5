use quire_layout::{Marker, StandardFont};
use quire_model::{Block, BlockKind};

pub const MARKER_WIDTH: f32 = 18.0;
const BULLETS: [&str; 3] = ["\u{2022}", "\u{2013}", "\u{00b7}"];

/// Numbers for each sibling: `Some(n)` for numbered items, counting from 1
/// at the start of every contiguous run of numbered siblings.
pub fn sibling_numbers(blocks: &[Block]) -> Vec<Option<usize>> {
    let mut counter = 0;
    blocks
        .iter()
        .map(|block| {
            if matches!(block.kind, BlockKind::NumberedListItem) {
                counter += 1;
                Some(counter)
            } else {
                counter = 0;
                None
            }
        })
        .collect()
}

/// Marker for a list-like block, or `None` for everything else.
pub fn marker_for(kind: &BlockKind, depth: usize, number: Option<usize>) -> Option<Marker> {
    match kind {
        BlockKind::BulletListItem => Some(Marker::Text(BULLETS[depth % BULLETS.len()].to_string())),
        BlockKind::NumberedListItem => Some(Marker::Text(format!("{}.", number.unwrap_or(1)))),
        BlockKind::CheckListItem { checked } => Some(Marker::Checkbox { checked: *checked }),
        BlockKind::ToggleListItem => Some(Marker::Disclosure),
        _ => None,
    }
}

/// Room reserved left of the text. Long numbers widen the gutter.
pub fn marker_width(marker: &Marker, size: f32) -> f32 {
    match marker {
        Marker::Text(text) => (StandardFont::Helvetica.measure(text, size) + 6.0).max(MARKER_WIDTH),
        _ => MARKER_WIDTH,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbering_restarts_after_an_interruption() {
        let items = vec![
            Block::new("a", BlockKind::NumberedListItem),
            Block::new("b", BlockKind::NumberedListItem),
            Block::paragraph("c", vec![]),
            Block::new("d", BlockKind::NumberedListItem),
        ];
        assert_eq!(sibling_numbers(&items), vec![Some(1), Some(2), None, Some(1)]);
    }

    #[test]
    fn bullets_vary_with_depth() {
        let top = marker_for(&BlockKind::BulletListItem, 0, None);
        let nested = marker_for(&BlockKind::BulletListItem, 1, None);
        assert_ne!(top, nested);
        assert_eq!(marker_for(&BlockKind::BulletListItem, 3, None), top);
    }

    #[test]
    fn check_marker_follows_checked_flag() {
        assert_eq!(
            marker_for(&BlockKind::CheckListItem { checked: true }, 0, None),
            Some(Marker::Checkbox { checked: true })
        );
        assert_eq!(
            marker_for(&BlockKind::CheckListItem { checked: false }, 0, None),
            Some(Marker::Checkbox { checked: false })
        );
        assert_eq!(marker_for(&BlockKind::Quote, 0, None), None);
    }

    #[test]
    fn wide_numbers_widen_the_gutter() {
        let marker = Marker::Text("1000.".into());
        assert!(marker_width(&marker, 11.0) > MARKER_WIDTH);
        assert_eq!(marker_width(&Marker::Disclosure, 11.0), MARKER_WIDTH);
    }
}
