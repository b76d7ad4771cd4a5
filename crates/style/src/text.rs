use serde::{Deserialize, Serialize};

/// Line decorations drawn over a run. Both may be set at once.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "camelCase")]
pub struct TextDecoration {
    pub underline: bool,
    pub line_through: bool,
}

impl TextDecoration {
    pub const NONE: TextDecoration = TextDecoration {
        underline: false,
        line_through: false,
    };

    pub fn is_none(&self) -> bool {
        *self == Self::NONE
    }
}
