use thiserror::Error;

use crate::config::EffectConfig;
use crate::dom::parser::parse_html;
use crate::engine::runtime::Runtime;
use crate::net::fetch::{fetch_page, FetchError};

/// Error during page loading
#[derive(Debug, Error)]
pub enum PageError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("{url} is {content_type}, not HTML")]
    NotHtml { url: String, content_type: String },
}

impl PageError {
    /// Pipeline phase that failed.
    pub fn phase(&self) -> &'static str {
        match self {
            PageError::Fetch(_) => "fetch",
            PageError::NotHtml { .. } => "parse",
        }
    }
}

/// The page pipeline: Fetch → Parse → Bind effects
pub struct PortfolioEngine {
    config: EffectConfig,
    viewport_width: f32,
    viewport_height: f32,
}

impl PortfolioEngine {
    pub fn new(viewport_width: f32, viewport_height: f32) -> Self {
        Self {
            config: EffectConfig::default(),
            viewport_width,
            viewport_height,
        }
    }

    pub fn with_config(mut self, config: EffectConfig) -> Self {
        self.config = config;
        self
    }

    /// Fix the random seed for reproducible rain.
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.config.seed = seed;
        self
    }

    /// Load a page source (path, `file://` or `http(s)` URL) through the
    /// full pipeline.
    pub fn load_page(&self, source: &str) -> Result<Runtime, PageError> {
        let fetched = fetch_page(source)?;
        let mime = fetched.content_type.to_ascii_lowercase();
        if !(mime.contains("html") || mime.contains("xml")) {
            return Err(PageError::NotHtml {
                url: fetched.url,
                content_type: fetched.content_type,
            });
        }
        log::info!("loaded {} (HTTP {})", fetched.url, fetched.status);
        Ok(self.process_html(&fetched.html, &fetched.url))
    }

    /// Process raw HTML (no network).
    pub fn process_html(&self, html: &str, url: &str) -> Runtime {
        let page = parse_html(html, url);
        Runtime::new(
            page,
            self.config.clone(),
            self.viewport_width,
            self.viewport_height,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn process_html_binds_effects() {
        let engine = PortfolioEngine::new(800.0, 600.0).with_seed(Some(5));
        let rt = engine.process_html(
            r#"<html><head><title>Me</title></head><body>
                <canvas id="matrix-canvas"></canvas>
                <h1><span id="typed-text"></span></h1>
            </body></html>"#,
            "file:///index.html",
        );
        assert_eq!(rt.page().title, "Me");
        assert!(rt.matrix().is_some());
        let typed = rt.page().get_element_by_id("typed-text").unwrap();
        assert_eq!(rt.page().text_content(typed), "F");
    }

    #[test]
    fn missing_page_reports_fetch_phase() {
        let engine = PortfolioEngine::new(800.0, 600.0);
        let err = engine.load_page("no/such/portfolio.html").err().unwrap();
        assert_eq!(err.phase(), "fetch");
        assert!(matches!(err, PageError::Fetch(FetchError::Io { .. })));
    }
}
