//! Content-area rendering for `PortfolioApp`.
//!
//! Each frame advances the runtime clock to wall time, paints the glyph
//! canvas, paints the page from its layout boxes inside a scroll area, then
//! draws the fixed overlays (lightbox, loader) on top. Pointer, key, scroll
//! and resize input is forwarded to the runtime as events.

use std::collections::HashMap;
use std::time::Duration;

use eframe::egui;
use url::Url;

use cyber_portfolio::dom::css::{parse_css_color, parse_hue_rotate, parse_percent};
use cyber_portfolio::dom::{ElementId, NodeType, Page};
use cyber_portfolio::engine::events::Event;
use cyber_portfolio::render::layout::Layout;

use crate::ui::{dom_code, dom_key, hue_rotate, to_color32, CYAN, DIM_GREEN, GREEN, PANEL, TEXT};
use super::PortfolioApp;

/// Classes drawn as bordered terminal panels.
const FRAMED: &[&str] = &[
    "terminal-window",
    "project-card",
    "gallery-item",
    "skill-category",
    "terminal-message",
];

/// Canvas glyphs sit behind the page, so they are dimmed.
const CANVAS_DIM: f32 = 0.35;

type Textures = HashMap<String, (egui::TextureId, egui::Vec2)>;

/// One thing to draw, in document coordinates.
enum PaintItem {
    Frame { rect: egui::Rect },
    Text { pos: egui::Pos2, text: String, size: f32, color: egui::Color32, wrap: f32 },
    Bar { rect: egui::Rect, fill: f32 },
    Image { rect: egui::Rect, src: String, alt: String },
    Button { rect: egui::Rect, label: String },
    Field { id: ElementId, rect: egui::Rect, multiline: bool, value: String },
}

/// Whether any reveal target above `id` is still waiting for its animation.
fn revealed(page: &Page, id: ElementId) -> bool {
    page.ancestors(id)
        .into_iter()
        .all(|a| !page.has_class(a, "fade-in") || page.has_class(a, "animate"))
}

fn text_color(page: &Page, id: ElementId) -> egui::Color32 {
    for a in page.ancestors(id) {
        if let Some([r, g, b, alpha]) = page.style(a, "color").and_then(parse_css_color) {
            let c = |v: f32| (v * 255.0).round() as u8;
            return egui::Color32::from_rgba_unmultiplied(c(r), c(g), c(b), c(alpha));
        }
        if page.has_class(a, "nav-link") {
            return if page.has_class(a, "active") { CYAN } else { GREEN };
        }
        if page.has_class(a, "terminal-message") {
            return GREEN;
        }
        match page.get(a).map(|e| e.tag.as_str()) {
            Some("a") => return CYAN,
            Some("h1" | "h2" | "h3") => return GREEN,
            _ => {}
        }
    }
    TEXT
}

fn build_paint_list(page: &Page, layout: &Layout) -> Vec<PaintItem> {
    let mut items = Vec::new();
    for id in page.descendants(page.root()) {
        let (Some(el), Some(b)) = (page.get(id), layout.bounds(id)) else {
            continue;
        };
        if b.height <= 0.0 || !revealed(page, id) {
            continue;
        }
        let rect = egui::Rect::from_min_size(egui::pos2(b.x, b.y), egui::vec2(b.width, b.height));

        match el.node_type {
            NodeType::Text => {
                let parent_tag = el.parent.and_then(|p| page.get(p)).map(|p| p.tag.as_str());
                if matches!(parent_tag, Some("button" | "textarea" | "option")) {
                    continue;
                }
                let text = el.text.trim();
                if text.is_empty() {
                    continue;
                }
                items.push(PaintItem::Text {
                    pos: rect.min,
                    text: text.to_string(),
                    size: layout.font_size(id),
                    color: text_color(page, id),
                    wrap: b.width.max(1.0),
                });
            }
            NodeType::Element => match el.tag.as_str() {
                "input" | "textarea" => items.push(PaintItem::Field {
                    id,
                    rect,
                    multiline: el.tag == "textarea",
                    value: el.value.clone(),
                }),
                "button" => items.push(PaintItem::Button {
                    rect,
                    label: page.text_content(id).trim().to_string(),
                }),
                "img" => items.push(PaintItem::Image {
                    rect,
                    src: el.attr("src").unwrap_or_default().to_string(),
                    alt: el.attr("alt").unwrap_or_default().to_string(),
                }),
                _ if el.has_class("skill-progress") => items.push(PaintItem::Bar {
                    rect,
                    fill: el.style.get("width").and_then(parse_percent).unwrap_or(0.0),
                }),
                _ if FRAMED.iter().any(|c| el.has_class(c)) => items.push(PaintItem::Frame { rect }),
                _ => {}
            },
            NodeType::Document => {}
        }
    }
    items
}

fn paint_item(
    ui: &mut egui::Ui,
    painter: &egui::Painter,
    item: &PaintItem,
    origin: egui::Vec2,
    degrees: f32,
    textures: &Textures,
    edits: &mut Vec<(ElementId, String)>,
) {
    let tint = |c: egui::Color32| hue_rotate(c, degrees);
    match item {
        PaintItem::Frame { rect } => {
            painter.rect(
                rect.translate(origin),
                4.0,
                tint(PANEL),
                egui::Stroke::new(1.0, tint(DIM_GREEN)),
            );
        }
        PaintItem::Text { pos, text, size, color, wrap } => {
            let galley = painter.layout(text.clone(), egui::FontId::monospace(*size), tint(*color), *wrap);
            painter.galley(*pos + origin, galley, tint(*color));
        }
        PaintItem::Bar { rect, fill } => {
            let r = rect.translate(origin);
            painter.rect_filled(r, 2.0, tint(DIM_GREEN).gamma_multiply(0.4));
            let mut filled = r;
            filled.set_width(r.width() * fill.clamp(0.0, 1.0));
            painter.rect_filled(filled, 2.0, tint(GREEN));
        }
        PaintItem::Image { rect, src, alt } => {
            let r = rect.translate(origin);
            if let Some((tex, _)) = textures.get(src) {
                let uv = egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
                painter.image(*tex, r, uv, egui::Color32::WHITE);
            } else {
                painter.rect_stroke(r, 2.0, egui::Stroke::new(1.0, tint(DIM_GREEN)));
                painter.text(
                    r.center(),
                    egui::Align2::CENTER_CENTER,
                    format!("[{}]", alt),
                    egui::FontId::monospace(12.0),
                    tint(DIM_GREEN),
                );
            }
        }
        PaintItem::Button { rect, label } => {
            let r = rect.translate(origin);
            painter.rect_stroke(r, 3.0, egui::Stroke::new(1.0, tint(GREEN)));
            painter.text(
                r.center(),
                egui::Align2::CENTER_CENTER,
                label,
                egui::FontId::monospace(14.0),
                tint(GREEN),
            );
        }
        PaintItem::Field { id, rect, multiline, value } => {
            let mut buf = value.clone();
            let edit = if *multiline {
                egui::TextEdit::multiline(&mut buf)
            } else {
                egui::TextEdit::singleline(&mut buf)
            };
            let response = ui.put(
                rect.translate(origin),
                edit.font(egui::TextStyle::Monospace).text_color(tint(GREEN)),
            );
            if response.changed() {
                edits.push((*id, buf));
            }
        }
    }
}

impl PortfolioApp {
    pub fn draw_content(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        if self.runtime.is_none() {
            ui.centered_and_justified(|ui| {
                if self.loading {
                    ui.spinner();
                } else if let Some(err) = &self.error {
                    ui.colored_label(egui::Color32::from_rgb(255, 80, 80), format!("> ERROR: {}", err));
                } else {
                    ui.colored_label(GREEN, "> no page loaded");
                }
            });
            return;
        }

        let area = ui.available_rect_before_wrap();
        self.sync_viewport(area.size());
        self.forward_keys(ctx);
        let now = self.loaded_at.elapsed().as_millis() as u64;
        if let Some(rt) = self.runtime.as_mut() {
            rt.advance_to(now.max(rt.now()));
        }

        let degrees = self.filter_degrees();
        self.paint_canvas(ui, area, degrees);
        self.draw_page(ui, ctx, area, degrees);
        self.draw_overlays(ui, ctx, area, degrees);
        self.schedule_repaint(ctx);
    }

    fn filter_degrees(&self) -> f32 {
        let Some(rt) = &self.runtime else {
            return 0.0;
        };
        let page = rt.page();
        page.style(page.body(), "filter")
            .and_then(parse_hue_rotate)
            .unwrap_or(0.0)
    }

    fn sync_viewport(&mut self, size: egui::Vec2) {
        let Some(rt) = self.runtime.as_mut() else {
            return;
        };
        let (w, h) = (rt.viewport().width, rt.viewport().height);
        if (w - size.x).abs() > 0.5 || (h - size.y).abs() > 0.5 {
            rt.dispatch(Event::Resize {
                width: size.x,
                height: size.y,
            });
        }
    }

    fn forward_keys(&mut self, ctx: &egui::Context) {
        let codes: Vec<String> = ctx.input(|i| {
            i.events
                .iter()
                .filter_map(|e| match e {
                    egui::Event::Key { key, pressed: true, repeat: false, .. } => dom_code(*key),
                    _ => None,
                })
                .collect()
        });
        let Some(rt) = self.runtime.as_mut() else {
            return;
        };
        for code in codes {
            let key = dom_key(&code);
            rt.dispatch(Event::KeyDown { code, key });
        }
    }

    fn paint_canvas(&self, ui: &egui::Ui, area: egui::Rect, degrees: f32) {
        let Some(canvas) = self.runtime.as_ref().and_then(|rt| rt.canvas()) else {
            return;
        };
        let painter = ui.painter_at(area);
        let cell = canvas.cell_size();
        let font = egui::FontId::monospace(cell);
        for (col, row, c) in canvas.lit_cells() {
            let pos = area.min + egui::vec2(col as f32 * cell, row as f32 * cell);
            let color = hue_rotate(to_color32(c.color), degrees).gamma_multiply(CANVAS_DIM);
            painter.text(pos, egui::Align2::LEFT_TOP, c.glyph, font.clone(), color);
        }
    }

    /// Texture for an image `src`, starting its load if needed.
    fn texture_for(&mut self, ctx: &egui::Context, base: &str, src: &str) -> Option<(egui::TextureId, egui::Vec2)> {
        let key = self.image_loader.request(base, src)?;
        if let Some(tex) = self.image_textures.get(&key) {
            return Some((tex.id(), tex.size_vec2()));
        }
        let data = self.image_loader.get(&key)?;
        let image = egui::ColorImage::from_rgba_unmultiplied(
            [data.width as usize, data.height as usize],
            &data.rgba,
        );
        let tex = ctx.load_texture(key.clone(), image, egui::TextureOptions::LINEAR);
        let out = (tex.id(), tex.size_vec2());
        self.image_textures.insert(key, tex);
        Some(out)
    }

    fn draw_page(&mut self, ui: &mut egui::Ui, ctx: &egui::Context, area: egui::Rect, degrees: f32) {
        let Some(rt) = self.runtime.as_ref() else {
            return;
        };
        let base = rt.page().url.clone();
        let items = build_paint_list(rt.page(), rt.layout());
        let doc_height = rt.layout().document_height.max(area.height());
        let target_scroll = rt.viewport().scroll_y();
        let forced = (target_scroll - self.last_scroll).abs() > 0.5;

        let mut textures = Textures::new();
        for item in &items {
            if let PaintItem::Image { src, .. } = item {
                if let Some(t) = self.texture_for(ctx, &base, src) {
                    textures.insert(src.clone(), t);
                }
            }
        }

        let mut scroll = egui::ScrollArea::vertical()
            .id_salt("page")
            .auto_shrink([false, false]);
        if forced {
            scroll = scroll.vertical_scroll_offset(target_scroll);
        }

        let mut clicked: Option<egui::Pos2> = None;
        let mut edits: Vec<(ElementId, String)> = Vec::new();
        let output = scroll.show(ui, |ui| {
            let (rect, response) =
                ui.allocate_exact_size(egui::vec2(area.width(), doc_height), egui::Sense::click());
            let painter = ui.painter_at(rect);
            let origin = rect.min.to_vec2();
            let visible = ui.clip_rect();
            for item in &items {
                let bounds = match item {
                    PaintItem::Frame { rect }
                    | PaintItem::Bar { rect, .. }
                    | PaintItem::Image { rect, .. }
                    | PaintItem::Button { rect, .. }
                    | PaintItem::Field { rect, .. } => *rect,
                    PaintItem::Text { pos, wrap, size, .. } => {
                        egui::Rect::from_min_size(*pos, egui::vec2(*wrap, size * 4.0))
                    }
                };
                if visible.intersects(bounds.translate(origin)) {
                    paint_item(ui, &painter, item, origin, degrees, &textures, &mut edits);
                }
            }
            if response.clicked() {
                if let Some(p) = response.interact_pointer_pos() {
                    clicked = Some((p - rect.min).to_pos2());
                }
            }
        });
        let offset = output.state.offset.y;

        let Some(rt) = self.runtime.as_mut() else {
            return;
        };
        for (id, value) in edits {
            rt.page_mut().set_value(id, &value);
        }
        if !forced && (offset - rt.viewport().scroll_y()).abs() > 0.5 {
            rt.dispatch(Event::Scroll { y: offset });
        }
        self.last_scroll = rt.viewport().scroll_y();

        let Some(p) = clicked else {
            return;
        };
        let Some(target) = rt.layout().hit_test(rt.page(), p.x, p.y) else {
            return;
        };
        if rt.dispatch(Event::Click { target }) {
            return;
        }
        // Unhandled link: leave the page for the browser.
        let page = rt.page();
        let href = page
            .closest(target, "a")
            .and_then(|a| page.attr(a, "href"))
            .filter(|h| !h.starts_with('#'));
        if let Some(href) = href {
            match Url::parse(&page.url).and_then(|b| b.join(href)) {
                Ok(url) => ctx.open_url(egui::OpenUrl::new_tab(url)),
                Err(e) => log::warn!("bad link {}: {}", href, e),
            }
        }
    }

    fn draw_overlays(&mut self, ui: &mut egui::Ui, ctx: &egui::Context, area: egui::Rect, degrees: f32) {
        let Some(rt) = self.runtime.as_ref() else {
            return;
        };
        let page = rt.page();
        let base = page.url.clone();
        let lightbox = rt.lightbox().overlays().last().copied().map(|overlay| {
            let img = page.query_within(overlay, "img").into_iter().next();
            let src = img.and_then(|i| page.attr(i, "src")).unwrap_or_default().to_string();
            let alt = img.and_then(|i| page.attr(i, "alt")).unwrap_or_default().to_string();
            (overlay, src, alt)
        });
        let loader = rt.loader().map(|l| {
            let opacity = page
                .style(l, "opacity")
                .and_then(|o| o.trim().parse::<f32>().ok())
                .unwrap_or(1.0);
            (opacity.clamp(0.0, 1.0), page.text_content(l))
        });

        let painter = ctx.layer_painter(egui::LayerId::new(
            egui::Order::Foreground,
            egui::Id::new("page-overlays"),
        ));

        if let Some((overlay, src, alt)) = lightbox {
            painter.rect_filled(area, 0.0, egui::Color32::from_black_alpha(230));
            match self.texture_for(ctx, &base, &src) {
                Some((tex, size)) => {
                    let scale = (area.width() * 0.9 / size.x)
                        .min(area.height() * 0.9 / size.y)
                        .min(1.0);
                    let rect = egui::Rect::from_center_size(area.center(), size * scale);
                    let uv = egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
                    painter.image(tex, rect, uv, egui::Color32::WHITE);
                }
                None => {
                    painter.text(
                        area.center(),
                        egui::Align2::CENTER_CENTER,
                        format!("> loading {}", alt),
                        egui::FontId::monospace(16.0),
                        hue_rotate(GREEN, degrees),
                    );
                }
            }
            let response = ui.interact(area, egui::Id::new("lightbox-overlay"), egui::Sense::click());
            if response.clicked() {
                if let Some(rt) = self.runtime.as_mut() {
                    rt.dispatch(Event::Click { target: overlay });
                }
            }
        }

        if let Some((opacity, text)) = loader {
            if opacity > 0.0 {
                painter.rect_filled(area, 0.0, egui::Color32::from_black_alpha((opacity * 255.0) as u8));
                painter.text(
                    area.center(),
                    egui::Align2::CENTER_CENTER,
                    text,
                    egui::FontId::monospace(20.0),
                    hue_rotate(GREEN, degrees).gamma_multiply(opacity),
                );
                // The loader swallows clicks while it is up.
                ui.interact(area, egui::Id::new("cyber-loader"), egui::Sense::click());
            }
        }
    }

    fn schedule_repaint(&self, ctx: &egui::Context) {
        let Some(rt) = &self.runtime else {
            return;
        };
        if rt.is_scrolling() || self.image_loader.pending_count() > 0 {
            ctx.request_repaint();
            return;
        }
        if let Some(due) = rt.next_timer_due() {
            let wait = due.saturating_sub(rt.now()).max(1);
            ctx.request_repaint_after(Duration::from_millis(wait));
        }
    }
}
