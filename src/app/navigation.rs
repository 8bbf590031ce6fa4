//! Page loading for `PortfolioApp`.
//!
//! Loading runs the whole pipeline on a background thread and hands the
//! ready runtime back through a channel polled every frame.

use std::sync::mpsc;
use std::time::Instant;

use eframe::egui;

use cyber_portfolio::engine::pipeline::PortfolioEngine;

use super::PortfolioApp;

impl PortfolioApp {
    /// Start loading `source_input` in the background.
    pub fn load(&mut self, ctx: &egui::Context) {
        if self.loading {
            return;
        }
        self.loading = true;
        self.error = None;
        self.image_textures.clear();

        let (tx, rx) = mpsc::channel();
        self.load_rx = Some(rx);

        let source = self.source_input.trim().to_string();
        let size = self
            .runtime
            .as_ref()
            .map(|rt| egui::vec2(rt.viewport().width, rt.viewport().height))
            .unwrap_or(self.initial_size);
        let config = self.config.clone();
        let seed = self.seed;
        let ctx = ctx.clone();

        std::thread::spawn(move || {
            let engine = PortfolioEngine::new(size.x, size.y)
                .with_config(config)
                .with_seed(seed);
            let result = engine.load_page(&source);
            let _ = tx.send(result);
            ctx.request_repaint();
        });
    }

    /// Poll the load channel and swap in the new runtime when it arrives.
    pub fn check_load(&mut self) {
        let Some(rx) = &self.load_rx else {
            return;
        };
        let Ok(result) = rx.try_recv() else {
            return;
        };
        match result {
            Ok(runtime) => {
                log::info!("page ready: {}", runtime.page().url);
                self.runtime = Some(runtime);
                self.loaded_at = Instant::now();
                self.last_scroll = 0.0;
                self.error = None;
            }
            Err(e) => {
                log::error!("[{}] {}", e.phase(), e);
                self.error = Some(format!("[{}] {}", e.phase(), e));
                self.runtime = None;
            }
        }
        self.loading = false;
        self.load_rx = None;
    }
}
