//! Toolbar for `PortfolioApp`: page source field, reload and a status line.

use eframe::egui;

use crate::ui::{truncate_str, GREEN};
use super::PortfolioApp;

impl PortfolioApp {
    pub fn draw_toolbar(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        ui.horizontal(|ui| {
            ui.add_space(4.0);
            ui.colored_label(GREEN, ">");

            let response = ui.add_sized(
                [ui.available_width() - 260.0, 24.0],
                egui::TextEdit::singleline(&mut self.source_input)
                    .hint_text("index.html or https://...")
                    .font(egui::TextStyle::Monospace),
            );
            if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                self.load(ctx);
            }
            if ui.button("Load").clicked() {
                self.load(ctx);
            }

            if self.loading {
                ui.spinner();
            } else if let Some(rt) = &self.runtime {
                let title = if rt.page().title.is_empty() {
                    rt.page().url.as_str()
                } else {
                    rt.page().title.as_str()
                };
                ui.label(
                    egui::RichText::new(truncate_str(title, 28))
                        .monospace()
                        .color(GREEN),
                );
                ui.label(egui::RichText::new(format!("t={}ms", rt.now())).monospace().small());
            }
        });
    }
}
