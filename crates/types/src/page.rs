//! Page formats and margins, in PDF points.
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::hash::{Hash, Hasher};

const PT_PER_MM: f32 = 72.0 / 25.4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PageFormat {
    #[default]
    A4,
    Letter,
    A3,
}

impl PageFormat {
    pub fn dimensions_pt(&self) -> (f32, f32) {
        match self {
            PageFormat::A4 => (595.28, 841.89),
            PageFormat::Letter => (612.0, 792.0),
            PageFormat::A3 => (841.89, 1190.55),
        }
    }

    /// Parse a page format name (e.g., "A4", "letter")
    pub fn parse(s: &str) -> Result<Self, String> {
        match s.trim().to_lowercase().as_str() {
            "a4" => Ok(PageFormat::A4),
            "letter" => Ok(PageFormat::Letter),
            "a3" => Ok(PageFormat::A3),
            _ => Err(format!("Unknown page format: {}", s)),
        }
    }
}

impl fmt::Display for PageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageFormat::A4 => f.write_str("A4"),
            PageFormat::Letter => f.write_str("Letter"),
            PageFormat::A3 => f.write_str("A3"),
        }
    }
}

impl Serialize for PageFormat {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PageFormat {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(de::Error::custom)
    }
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
pub struct Margins {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Hash for Margins {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.top.to_bits().hash(state);
        self.right.to_bits().hash(state);
        self.bottom.to_bits().hash(state);
        self.left.to_bits().hash(state);
    }
}

impl Eq for Margins {}

impl Default for Margins {
    /// 20mm on every side.
    fn default() -> Self {
        Self::all(20.0 * PT_PER_MM)
    }
}

impl Margins {
    pub fn all(value: f32) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }

    pub fn horizontal(&self) -> f32 {
        self.left + self.right
    }

    pub fn vertical(&self) -> f32 {
        self.top + self.bottom
    }

    /// Parse a length value with optional unit (e.g., "10pt", "5mm", "12")
    fn parse_length(input: &str) -> Result<f32, String> {
        let input = input.trim();
        let (number, factor) = if let Some(val) = input.strip_suffix("pt") {
            (val, 1.0)
        } else if let Some(val) = input.strip_suffix("mm") {
            (val, PT_PER_MM)
        } else if let Some(val) = input.strip_suffix("cm") {
            (val, PT_PER_MM * 10.0)
        } else if let Some(val) = input.strip_suffix("in") {
            (val, 72.0)
        } else {
            (input, 1.0)
        };
        number
            .trim()
            .parse::<f32>()
            .map(|v| v * factor)
            .map_err(|e| format!("Invalid number: {}", e))
    }

    /// Parse CSS-style margin shorthand (1, 2, or 4 values)
    pub fn parse_shorthand(input: &str) -> Result<Self, String> {
        let values = input
            .split_whitespace()
            .map(Self::parse_length)
            .collect::<Result<Vec<_>, _>>()?;

        match values.as_slice() {
            [all] => Ok(Margins::all(*all)),
            [y, x] => Ok(Margins {
                top: *y,
                right: *x,
                bottom: *y,
                left: *x,
            }),
            [top, right, bottom, left] => Ok(Margins {
                top: *top,
                right: *right,
                bottom: *bottom,
                left: *left,
            }),
            _ => Err(format!(
                "Invalid margin shorthand: expected 1, 2, or 4 values, got {}",
                values.len()
            )),
        }
    }
}

impl<'de> Deserialize<'de> for Margins {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct MarginsVisitor;
        impl<'de> de::Visitor<'de> for MarginsVisitor {
            type Value = Margins;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a number, a string like '10mm 20mm', or a map")
            }

            fn visit_str<E>(self, value: &str) -> Result<Margins, E>
            where
                E: de::Error,
            {
                Margins::parse_shorthand(value).map_err(E::custom)
            }

            fn visit_f64<E>(self, value: f64) -> Result<Margins, E>
            where
                E: de::Error,
            {
                Ok(Margins::all(value as f32))
            }

            fn visit_u64<E>(self, value: u64) -> Result<Margins, E>
            where
                E: de::Error,
            {
                Ok(Margins::all(value as f32))
            }

            fn visit_i64<E>(self, value: i64) -> Result<Margins, E>
            where
                E: de::Error,
            {
                Ok(Margins::all(value as f32))
            }

            fn visit_map<A>(self, mut map: A) -> Result<Margins, A::Error>
            where
                A: de::MapAccess<'de>,
            {
                let mut margins = Margins::default();
                while let Some(key) = map.next_key::<String>()? {
                    match key.as_str() {
                        "top" => margins.top = map.next_value()?,
                        "right" => margins.right = map.next_value()?,
                        "bottom" => margins.bottom = map.next_value()?,
                        "left" => margins.left = map.next_value()?,
                        _ => {
                            map.next_value::<de::IgnoredAny>()?;
                        }
                    }
                }
                Ok(margins)
            }
        }

        deserializer.deserialize_any(MarginsVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_formats_parse_case_insensitively() {
        assert_eq!(PageFormat::parse("a3").unwrap(), PageFormat::A3);
        assert_eq!(PageFormat::parse("LETTER").unwrap(), PageFormat::Letter);
        assert!(PageFormat::parse("tabloid").is_err());
        let f: PageFormat = serde_json::from_str("\"A4\"").unwrap();
        assert_eq!(f, PageFormat::A4);
    }

    #[test]
    fn margins_accept_shorthand_numbers_and_maps() {
        let m: Margins = serde_json::from_str("\"10pt 20pt\"").unwrap();
        assert_eq!(m.top, 10.0);
        assert_eq!(m.left, 20.0);

        let m: Margins = serde_json::from_str("36").unwrap();
        assert_eq!(m, Margins::all(36.0));

        let m: Margins = serde_json::from_str(r#"{"top": 10, "left": 5}"#).unwrap();
        assert_eq!(m.top, 10.0);
        assert_eq!(m.left, 5.0);
        assert_eq!(m.right, Margins::default().right);
    }

    #[test]
    fn default_margins_are_twenty_millimetres() {
        let m = Margins::default();
        assert!((m.top - 56.69).abs() < 0.01);
    }
}
