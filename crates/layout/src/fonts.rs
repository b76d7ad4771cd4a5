//! The eight standard PDF fonts used for all text, with their advance widths.
//!
//! Widths are in 1/1000 em, taken from the Adobe Core14 AFM files for the
//! printable ASCII range. Oblique faces share the upright widths.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum StandardFont {
    Helvetica,
    HelveticaBold,
    HelveticaOblique,
    HelveticaBoldOblique,
    Courier,
    CourierBold,
    CourierOblique,
    CourierBoldOblique,
}

/// Fallback advance for characters outside the tables.
const DEFAULT_WIDTH: u16 = 556;

#[rustfmt::skip]
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

#[rustfmt::skip]
const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

impl StandardFont {
    pub const ALL: [StandardFont; 8] = [
        StandardFont::Helvetica,
        StandardFont::HelveticaBold,
        StandardFont::HelveticaOblique,
        StandardFont::HelveticaBoldOblique,
        StandardFont::Courier,
        StandardFont::CourierBold,
        StandardFont::CourierOblique,
        StandardFont::CourierBoldOblique,
    ];

    pub fn select(monospace: bool, bold: bool, italic: bool) -> Self {
        match (monospace, bold, italic) {
            (false, false, false) => StandardFont::Helvetica,
            (false, true, false) => StandardFont::HelveticaBold,
            (false, false, true) => StandardFont::HelveticaOblique,
            (false, true, true) => StandardFont::HelveticaBoldOblique,
            (true, false, false) => StandardFont::Courier,
            (true, true, false) => StandardFont::CourierBold,
            (true, false, true) => StandardFont::CourierOblique,
            (true, true, true) => StandardFont::CourierBoldOblique,
        }
    }

    pub fn postscript_name(&self) -> &'static str {
        match self {
            StandardFont::Helvetica => "Helvetica",
            StandardFont::HelveticaBold => "Helvetica-Bold",
            StandardFont::HelveticaOblique => "Helvetica-Oblique",
            StandardFont::HelveticaBoldOblique => "Helvetica-BoldOblique",
            StandardFont::Courier => "Courier",
            StandardFont::CourierBold => "Courier-Bold",
            StandardFont::CourierOblique => "Courier-Oblique",
            StandardFont::CourierBoldOblique => "Courier-BoldOblique",
        }
    }

    /// Name of the font in the shared page resource dictionary.
    pub fn resource_name(&self) -> &'static str {
        match self {
            StandardFont::Helvetica => "F1",
            StandardFont::HelveticaBold => "F2",
            StandardFont::HelveticaOblique => "F3",
            StandardFont::HelveticaBoldOblique => "F4",
            StandardFont::Courier => "F5",
            StandardFont::CourierBold => "F6",
            StandardFont::CourierOblique => "F7",
            StandardFont::CourierBoldOblique => "F8",
        }
    }

    pub fn is_monospace(&self) -> bool {
        matches!(
            self,
            StandardFont::Courier
                | StandardFont::CourierBold
                | StandardFont::CourierOblique
                | StandardFont::CourierBoldOblique
        )
    }

    fn is_bold(&self) -> bool {
        matches!(
            self,
            StandardFont::HelveticaBold
                | StandardFont::HelveticaBoldOblique
                | StandardFont::CourierBold
                | StandardFont::CourierBoldOblique
        )
    }

    /// Advance width of `c` in 1/1000 em.
    pub fn char_width(&self, c: char) -> u16 {
        if self.is_monospace() {
            return 600;
        }
        let table = if self.is_bold() {
            &HELVETICA_BOLD
        } else {
            &HELVETICA
        };
        match c {
            ' '..='~' => table[c as usize - 32],
            '\u{a0}' => table[0],
            '\u{2022}' => 350,
            '\u{2013}' => 556,
            '\u{2014}' => 1000,
            '\u{2018}' | '\u{2019}' => 222,
            '\u{201c}' | '\u{201d}' => 333,
            '\u{2026}' => 1000,
            _ => DEFAULT_WIDTH,
        }
    }

    /// Width of `text` at `size` points.
    pub fn measure(&self, text: &str, size: f32) -> f32 {
        let units: u32 = text.chars().map(|c| self.char_width(c) as u32).sum();
        units as f32 * size / 1000.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn helvetica_widths_match_afm() {
        assert_eq!(StandardFont::Helvetica.char_width('W'), 944);
        assert_eq!(StandardFont::Helvetica.char_width('i'), 222);
        assert_eq!(StandardFont::HelveticaBold.char_width('i'), 278);
        assert_eq!(StandardFont::HelveticaOblique.char_width('m'), 833);
        assert_eq!(StandardFont::Helvetica.char_width('~'), 584);
    }

    #[test]
    fn courier_is_fixed_pitch() {
        let w = StandardFont::Courier.measure("iiii", 10.0);
        assert_eq!(w, StandardFont::Courier.measure("WWWW", 10.0));
        assert!((w - 24.0).abs() < 1e-4);
    }

    #[test]
    fn selection_covers_every_face() {
        let mut picked: Vec<_> = [false, true]
            .iter()
            .flat_map(|m| {
                [false, true].iter().flat_map(move |b| {
                    [false, true]
                        .iter()
                        .map(move |i| StandardFont::select(*m, *b, *i))
                })
            })
            .collect();
        picked.sort();
        assert_eq!(picked, StandardFont::ALL.to_vec());
    }
}
