use super::Slice;
use crate::elements::{LayoutElement, LineElement, PositionedElement, Stroke};
use crate::flow::RuleSpec;

pub fn layout(spec: &RuleSpec, width: f32) -> Vec<Slice> {
    let line = PositionedElement::new(
        0.0,
        spec.thickness / 2.0,
        width,
        0.0,
        LayoutElement::Line(LineElement {
            stroke: Stroke {
                color: spec.color,
                width: spec.thickness,
            },
        }),
    );
    vec![Slice::new(spec.thickness, vec![line])]
}
