use crate::algorithms::pagination::Paginator;
use crate::config::LayoutConfig;
use crate::elements::{LayoutElement, LineElement, PositionedElement, Stroke, TextElement};
use crate::flow::{FlowDocument, PageSetup, PageTemplate, Span};
use crate::fonts::StandardFont;
use crate::nodes::{layout_content, Slice};
use crate::output::LaidOutDocument;
use crate::text::truncate_to_width;
use crate::LayoutError;
use log::{debug, warn};
use quire_types::Rect;

const RULE_WIDTH: f32 = 0.5;

#[derive(Debug, Clone, Copy)]
enum Edge {
    Top,
    Bottom,
}

/// Paginates a [`FlowDocument`]. Stateless apart from its configuration and
/// safe to share between threads.
#[derive(Debug, Clone, Default)]
pub struct LayoutEngine {
    config: LayoutConfig,
}

impl LayoutEngine {
    pub fn new(config: LayoutConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn layout(&self, document: &FlowDocument) -> Result<LaidOutDocument, LayoutError> {
        let page = document.page;
        let content_width = page.content_width();
        let content_height = page.content_height();
        if !(content_width > 0.0 && content_height > 0.0) {
            return Err(LayoutError::InvalidGeometry {
                width: content_width,
                height: content_height,
            });
        }

        let bounds = Rect::new(page.margins.left, page.margins.top, content_width, content_height);
        let max_indent = (content_width - self.config.min_column_width).max(0.0);

        let prepared: Vec<(f32, Vec<Slice>)> = document
            .blocks
            .iter()
            .map(|block| {
                let indent = block.indent.clamp(0.0, max_indent);
                (indent, layout_content(&block.content, content_width - indent))
            })
            .collect();

        let mut pager = Paginator::new(bounds);
        for (i, (block, (indent, slices))) in document.blocks.iter().zip(prepared.iter()).enumerate() {
            if slices.is_empty() {
                continue;
            }
            pager.advance(block.space_before);

            if block.keep_with_next
                && let Some((next, (_, next_slices))) =
                    document.blocks.get(i + 1).zip(prepared.get(i + 1))
                && let Some(next_first) = next_slices.first()
            {
                let own: f32 = slices.iter().map(|s| s.height).sum();
                let needed = own + block.space_after + next.space_before + next_first.height;
                if needed <= content_height && !pager.at_page_top() && !pager.fits(needed) {
                    debug!("Moving block {i} to the next page to keep it with its successor.");
                    pager.new_page();
                }
            }

            for slice in slices {
                let height = slice.height;
                if !pager.place(slice.clone(), *indent) {
                    warn!(
                        "Block {i} has a part {height:.1}pt tall which exceeds the page content height of {content_height:.1}pt; it will overflow."
                    );
                }
            }
            pager.advance(block.space_after);
        }

        let mut pages = pager.finish();
        let total = pages.len();
        for (index, elements) in pages.iter_mut().enumerate() {
            if let Some(template) = &document.header {
                elements.extend(self.paint_template(template, &page, Edge::Top, index + 1, total));
            }
            if let Some(template) = &document.footer {
                elements.extend(self.paint_template(template, &page, Edge::Bottom, index + 1, total));
            }
        }
        debug!("Laid out {} blocks on {} pages.", document.blocks.len(), total);

        Ok(LaidOutDocument {
            page_width: page.width,
            page_height: page.height,
            pages,
        })
    }

    /// Draws a header or footer into the page margin. Skipped when the margin
    /// is too small to hold it.
    fn paint_template(
        &self,
        template: &PageTemplate,
        page: &PageSetup,
        edge: Edge,
        number: usize,
        total: usize,
    ) -> Vec<PositionedElement> {
        let margin = match edge {
            Edge::Top => page.margins.top,
            Edge::Bottom => page.margins.bottom,
        };
        let gap = self.config.template_rule_gap;
        if margin < template.size * 2.0 + gap {
            debug!("Margin of {margin:.1}pt is too small for a page template.");
            return Vec::new();
        }

        // Text sits centered in the margin; the rule sits between it and the body.
        let band_top = match edge {
            Edge::Top => 0.0,
            Edge::Bottom => page.height - margin,
        };
        let text_y = band_top + (margin - template.size) / 2.0;
        let rule_y = match edge {
            Edge::Top => text_y + template.size + gap,
            Edge::Bottom => text_y - gap,
        };

        let left = page.margins.left;
        let width = page.content_width();
        let texts = [
            PageTemplate::render(&template.left, number, total),
            PageTemplate::render(&template.center, number, total),
            PageTemplate::render(&template.right, number, total),
        ];
        let filled = texts.iter().filter(|t| !t.is_empty()).count().max(1);
        let slot = width / filled as f32 - gap;

        let mut elements = Vec::new();
        for (position, text) in texts.into_iter().enumerate() {
            if text.is_empty() {
                continue;
            }
            let span = Span::new(text, StandardFont::Helvetica, template.size, template.color);
            let content = truncate_to_width(&span.text, &span, slot);
            let w = span.font.measure(&content, span.size);
            let x = match position {
                0 => left,
                1 => left + (width - w) / 2.0,
                _ => left + width - w,
            };
            elements.push(PositionedElement::new(
                x,
                text_y,
                w,
                template.size,
                LayoutElement::Text(TextElement {
                    content,
                    font: span.font,
                    size: span.size,
                    color: span.color,
                    word_spacing: 0.0,
                    href: None,
                }),
            ));
        }

        if let Some(color) = template.rule {
            elements.push(PositionedElement::new(
                left,
                rule_y,
                width,
                0.0,
                LayoutElement::Line(LineElement {
                    stroke: Stroke {
                        color,
                        width: RULE_WIDTH,
                    },
                }),
            ));
        }
        elements
    }
}
