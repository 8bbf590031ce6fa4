//! Transient terminal-style messages and the boot loader overlay.
//!
//! Both create elements that must go away on their own, so each creation
//! schedules its removal right away.

use crate::config::{FormConfig, LoaderConfig};
use crate::dom::{ElementId, Page};
use crate::engine::runtime::Task;
use crate::engine::timers::TimerQueue;

pub const LOADER_ID: &str = "cyber-loader";

/// Append a `.terminal-message` to the message host and schedule its
/// removal. Skipped silently when the page has no host element.
pub fn show_terminal_message(
    page: &mut Page,
    timers: &mut TimerQueue<Task>,
    config: &FormConfig,
    message: &str,
) -> Option<ElementId> {
    let host = page.query_selector(&config.message_host_selector)?;
    let el = page.create_element("div");
    page.add_class(el, "terminal-message");
    page.set_text_content(el, message);
    page.append_child(host, el);
    timers.set_timeout(config.message_lifetime_ms, Task::RemoveElement(el));
    log::info!("{}", message);
    Some(el)
}

/// Mount the full-screen loader and schedule its fade-out.
pub fn mount_loader(page: &mut Page, timers: &mut TimerQueue<Task>, config: &LoaderConfig) -> ElementId {
    let loader = page.create_element("div");
    page.set_attr(loader, "id", LOADER_ID);
    for (prop, value) in [
        ("position", "fixed"),
        ("width", "100%"),
        ("height", "100%"),
        ("z-index", "9999"),
        ("opacity", "1"),
    ] {
        page.set_style(loader, prop, value);
    }
    let text = page.create_element("div");
    page.set_text_content(text, &config.text);
    page.append_child(loader, text);
    let body = page.body();
    page.append_child(body, loader);

    timers.set_timeout(config.visible_ms, Task::LoaderFade(loader));
    loader
}

/// Start the fade; removal follows once the fade has played.
pub fn fade_loader(page: &mut Page, timers: &mut TimerQueue<Task>, loader: ElementId, config: &LoaderConfig) {
    if page.get(loader).is_none() {
        return;
    }
    page.set_style(loader, "opacity", "0");
    timers.set_timeout(config.fade_ms, Task::RemoveElement(loader));
}
