#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutConfig {
    /// Narrowest column a nested block may be squeezed into, in points.
    ///
    /// Deeply nested lists stop indenting once their column would become
    /// narrower than this. Defaults to `144.0`.
    pub min_column_width: f32,
    /// Gap between a page template's text and its separator rule.
    pub template_rule_gap: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            min_column_width: 144.0,
            template_rule_gap: 6.0,
        }
    }
}
