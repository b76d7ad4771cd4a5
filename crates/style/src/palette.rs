//! The block editor's named color palette.

use quire_types::Color;

pub const LINK: Color = Color::rgb(0x0b, 0x6e, 0x99);
pub const INLINE_CODE_BACKGROUND: Color = Color::rgb(0xf0, 0xf0, 0xf0);

/// Foreground color for a palette name or `#hex` value. Unknown names
/// resolve to `None`.
pub fn text_color(name: &str) -> Option<Color> {
    let color = match name.trim().to_lowercase().as_str() {
        "gray" | "grey" => Color::rgb(0x9b, 0x9a, 0x97),
        "brown" => Color::rgb(0x64, 0x47, 0x3a),
        "red" => Color::rgb(0xe0, 0x3e, 0x3e),
        "orange" => Color::rgb(0xd9, 0x73, 0x0d),
        "yellow" => Color::rgb(0xdf, 0xab, 0x01),
        "green" => Color::rgb(0x4d, 0x64, 0x61),
        "blue" => Color::rgb(0x0b, 0x6e, 0x99),
        "purple" => Color::rgb(0x69, 0x40, 0xa5),
        "pink" => Color::rgb(0xad, 0x1a, 0x72),
        other => return Color::parse_hex(other).ok(),
    };
    Some(color)
}

/// Background tint for a palette name or `#hex` value.
pub fn background_color(name: &str) -> Option<Color> {
    let color = match name.trim().to_lowercase().as_str() {
        "gray" | "grey" => Color::rgb(0xeb, 0xec, 0xed),
        "brown" => Color::rgb(0xe9, 0xe5, 0xe3),
        "red" => Color::rgb(0xfb, 0xe4, 0xe4),
        "orange" => Color::rgb(0xf6, 0xe9, 0xd9),
        "yellow" => Color::rgb(0xfb, 0xf3, 0xdb),
        "green" => Color::rgb(0xdd, 0xed, 0xea),
        "blue" => Color::rgb(0xdd, 0xeb, 0xf1),
        "purple" => Color::rgb(0xea, 0xe4, 0xf2),
        "pink" => Color::rgb(0xf4, 0xdf, 0xeb),
        other => return Color::parse_hex(other).ok(),
    };
    Some(color)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_and_hex_values_resolve() {
        assert_eq!(text_color("Red"), Some(Color::rgb(0xe0, 0x3e, 0x3e)));
        assert_eq!(background_color("#fff"), Some(Color::WHITE));
        assert_eq!(text_color("chartreuse"), None);
        assert_eq!(background_color(""), None);
    }
}
