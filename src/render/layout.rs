use std::collections::HashMap;

use crate::dom::{ElementId, NodeType, Page};

/// Bounding box for a laid-out node, in document coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LayoutBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl LayoutBox {
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }
}

/// Per-node geometry computed by [`compute_layout`].
#[derive(Debug, Clone, Default)]
pub struct Layout {
    boxes: HashMap<ElementId, LayoutBox>,
    font_sizes: HashMap<ElementId, f32>,
    pub document_height: f32,
}

impl Layout {
    pub fn bounds(&self, id: ElementId) -> Option<LayoutBox> {
        self.boxes.get(&id).copied()
    }

    /// Document-relative top edge, like `offsetTop`.
    pub fn offset_top(&self, id: ElementId) -> Option<f32> {
        self.bounds(id).map(|b| b.y)
    }

    /// Border-box height, like `offsetHeight`.
    pub fn offset_height(&self, id: ElementId) -> Option<f32> {
        self.bounds(id).map(|b| b.height)
    }

    pub fn font_size(&self, id: ElementId) -> f32 {
        self.font_sizes.get(&id).copied().unwrap_or(16.0)
    }

    /// Deepest laid-out node under `(x, y)` in document coordinates.
    pub fn hit_test(&self, page: &Page, x: f32, y: f32) -> Option<ElementId> {
        let mut best: Option<(usize, ElementId)> = None;
        for id in page.descendants(page.body()) {
            let Some(b) = self.bounds(id) else { continue };
            if b.height <= 0.0 || x < b.x || x > b.x + b.width || y < b.y || y > b.bottom() {
                continue;
            }
            let depth = page.ancestors(id).len();
            if best.map_or(true, |(d, _)| depth >= d) {
                best = Some((depth, id));
            }
        }
        best.map(|(_, id)| id)
    }
}

const BLOCK_TAGS: &[&str] = &[
    "html",
    "body",
    "div",
    "p",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "ul",
    "ol",
    "li",
    "form",
    "section",
    "article",
    "aside",
    "main",
    "header",
    "footer",
    "nav",
    "blockquote",
    "pre",
    "figure",
    "figcaption",
    "input",
    "textarea",
    "button",
    "img",
];

/// Tags that never take part in flow.
const HIDDEN_TAGS: &[&str] = &["head", "script", "style", "noscript", "template", "canvas"];

/// Per-tag vertical margins (top, bottom) in pixels.
fn tag_margins(tag: &str) -> (f32, f32) {
    match tag {
        "h1" => (24.0, 16.0),
        "h2" => (20.0, 12.0),
        "h3" | "h4" => (16.0, 10.0),
        "h5" | "h6" => (12.0, 8.0),
        "p" => (4.0, 10.0),
        "ul" | "ol" => (8.0, 8.0),
        "li" => (2.0, 2.0),
        "section" | "article" | "main" => (16.0, 16.0),
        "nav" | "header" | "footer" => (12.0, 12.0),
        "input" | "textarea" | "button" => (4.0, 8.0),
        _ => (0.0, 0.0),
    }
}

/// Per-tag padding in pixels.
fn tag_padding(tag: &str, is_block: bool) -> f32 {
    match tag {
        "section" | "article" | "main" | "aside" => 16.0,
        "nav" | "header" | "footer" => 12.0,
        "blockquote" => 20.0,
        _ if is_block => 4.0,
        _ => 0.0,
    }
}

/// Minimum content height: an inline `min-height`/`height` in px, else the
/// size of replaced and form elements.
fn intrinsic_height(page: &Page, id: ElementId, tag: &str) -> f32 {
    let inline = page
        .style(id, "min-height")
        .or_else(|| page.style(id, "height"))
        .and_then(|h| h.trim().strip_suffix("px"))
        .and_then(|h| h.trim().parse::<f32>().ok());
    if let Some(h) = inline {
        return h;
    }
    match tag {
        "img" => page
            .attr(id, "height")
            .and_then(|h| h.trim_end_matches("px").parse().ok())
            .unwrap_or(180.0),
        "input" | "button" => 28.0,
        "textarea" => 96.0,
        _ if page.has_class(id, "skill-progress") => 8.0,
        _ => 0.0,
    }
}

/// Compute layout for a page (simple top-to-bottom block model).
pub fn compute_layout(page: &Page, viewport_width: f32) -> Layout {
    let mut layout = Layout::default();
    let mut cursor_y = 0.0;
    layout_node(page, page.root(), 0.0, &mut cursor_y, viewport_width, 16.0, &mut layout);
    layout.document_height = cursor_y;
    layout
}

fn layout_node(
    page: &Page,
    id: ElementId,
    x: f32,
    cursor_y: &mut f32,
    available_width: f32,
    parent_font_size: f32,
    out: &mut Layout,
) {
    let Some(node) = page.get(id) else { return };

    // Fixed overlays and hidden tags sit outside the flow.
    let out_of_flow = HIDDEN_TAGS.contains(&node.tag.as_str())
        || node.style.get("position") == Some("fixed")
        || node.style.get("display") == Some("none");
    if out_of_flow {
        out.boxes.insert(
            id,
            LayoutBox { x, y: *cursor_y, width: 0.0, height: 0.0 },
        );
        out.font_sizes.insert(id, parent_font_size);
        return;
    }

    let is_block = node.node_type != NodeType::Text && BLOCK_TAGS.contains(&node.tag.as_str());

    let font_size = match node.tag.as_str() {
        "h1" => 32.0,
        "h2" => 24.0,
        "h3" => 20.0,
        "h4" => 18.0,
        "h5" | "h6" => 16.0,
        "small" => 12.0,
        _ => parent_font_size,
    };

    let (margin_top, margin_bottom) = tag_margins(&node.tag);
    let padding = tag_padding(&node.tag, is_block);

    if is_block {
        *cursor_y += margin_top;
    }

    let start_y = *cursor_y;

    if padding > 0.0 {
        *cursor_y += padding;
    }

    let child_x = x + padding;
    let child_width = (available_width - padding * 2.0).max(0.0);

    for &child in &node.children {
        layout_node(page, child, child_x, cursor_y, child_width, font_size, out);
    }

    // Text content contributes to height
    if node.node_type == NodeType::Text && !node.text.trim().is_empty() {
        let line_height = font_size * 1.4;
        let chars_per_line = (available_width / (font_size * 0.6)).max(1.0) as usize;
        let lines = (node.text.chars().count() as f32 / chars_per_line as f32)
            .ceil()
            .max(1.0);
        *cursor_y += lines * line_height;
    }

    let intrinsic = intrinsic_height(page, id, &node.tag);
    if *cursor_y - start_y < intrinsic {
        *cursor_y = start_y + intrinsic;
    }

    if padding > 0.0 {
        *cursor_y += padding;
    }

    let height = *cursor_y - start_y;

    if is_block {
        *cursor_y += margin_bottom;
    }

    out.boxes.insert(
        id,
        LayoutBox {
            x,
            y: start_y,
            width: available_width,
            height,
        },
    );
    out.font_sizes.insert(id, font_size);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::parser::parse_html;

    const PAGE: &str = r#"<html><body>
        <section id="home"><h1>Hi</h1><p>Intro text</p></section>
        <section id="about"><h2>About</h2><p>Lots of words about things.</p></section>
        <section id="contact"><p>Mail me</p></section>
        <div class="lightbox-overlay" style="position: fixed"><img src="a.png"></div>
    </body></html>"#;

    #[test]
    fn sections_stack_monotonically() {
        let page = parse_html(PAGE, "file:///index.html");
        let layout = compute_layout(&page, 800.0);
        let tops: Vec<f32> = ["home", "about", "contact"]
            .iter()
            .map(|id| layout.offset_top(page.get_element_by_id(id).unwrap()).unwrap())
            .collect();
        assert!(tops[0] < tops[1] && tops[1] < tops[2]);
        for id in ["home", "about", "contact"] {
            let el = page.get_element_by_id(id).unwrap();
            assert!(layout.offset_height(el).unwrap() > 0.0);
        }
        assert!(layout.document_height >= tops[2]);
    }

    #[test]
    fn fixed_overlay_is_out_of_flow() {
        let page = parse_html(PAGE, "file:///index.html");
        let layout = compute_layout(&page, 800.0);
        let overlay = page.query_selector(".lightbox-overlay").unwrap();
        assert_eq!(layout.offset_height(overlay), Some(0.0));
    }

    #[test]
    fn inline_pixel_height_is_a_minimum() {
        let page = parse_html(
            r#"<body><section id="hero" style="min-height: 900px"><p>x</p></section></body>"#,
            "file:///index.html",
        );
        let layout = compute_layout(&page, 800.0);
        let hero = page.get_element_by_id("hero").unwrap();
        assert!(layout.offset_height(hero).unwrap() >= 900.0);
    }

    #[test]
    fn hit_test_finds_deepest() {
        let page = parse_html(PAGE, "file:///index.html");
        let layout = compute_layout(&page, 800.0);
        let about = page.get_element_by_id("about").unwrap();
        let b = layout.bounds(about).unwrap();
        let hit = layout.hit_test(&page, b.x + 20.0, b.y + 20.0).unwrap();
        assert!(page.ancestors(hit).contains(&about));
    }
}
