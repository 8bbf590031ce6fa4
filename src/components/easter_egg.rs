//! Key-sequence easter egg ("matrix mode").

use std::collections::VecDeque;

use crate::components::status::show_terminal_message;
use crate::config::{EasterEggConfig, FormConfig};
use crate::dom::Page;
use crate::engine::events::{EventKind, Handler, Listeners, Target};
use crate::engine::runtime::Task;
use crate::engine::timers::TimerQueue;

/// Rolling buffer of the most recent key codes.
#[derive(Debug, Clone)]
pub struct KeySequence {
    expected: Vec<String>,
    buffer: VecDeque<String>,
}

impl KeySequence {
    pub fn new(expected: Vec<String>) -> Self {
        Self {
            buffer: VecDeque::with_capacity(expected.len() + 1),
            expected,
        }
    }

    pub fn buffer(&self) -> Vec<&str> {
        self.buffer.iter().map(|s| s.as_str()).collect()
    }

    /// Record a key. Returns true (and clears the buffer) when the buffer
    /// now equals the expected sequence.
    pub fn push(&mut self, code: &str) -> bool {
        if self.expected.is_empty() {
            return false;
        }
        self.buffer.push_back(code.to_string());
        while self.buffer.len() > self.expected.len() {
            self.buffer.pop_front();
        }
        let matched = self.buffer.len() == self.expected.len()
            && self.buffer.iter().zip(&self.expected).all(|(a, b)| a == b);
        if matched {
            self.buffer.clear();
        }
        matched
    }
}

#[derive(Debug, Clone)]
pub struct EasterEgg {
    keys: KeySequence,
    activations: usize,
}

impl EasterEgg {
    pub fn setup(listeners: &mut Listeners, config: &EasterEggConfig) -> Self {
        listeners.add(Target::Document, EventKind::KeyDown, Handler::EasterEgg);
        Self {
            keys: KeySequence::new(config.sequence.clone()),
            activations: 0,
        }
    }

    pub fn keys(&self) -> &KeySequence {
        &self.keys
    }

    pub fn activations(&self) -> usize {
        self.activations
    }

    pub fn on_key(
        &mut self,
        page: &mut Page,
        timers: &mut TimerQueue<Task>,
        config: &EasterEggConfig,
        form: &FormConfig,
        code: &str,
    ) -> bool {
        if !self.keys.push(code) {
            return false;
        }
        self.activations += 1;
        let body = page.body();
        page.set_style(body, "filter", &config.filter);
        show_terminal_message(page, timers, form, &config.message);
        timers.set_timeout(config.duration_ms, Task::ClearFilter(body));
        true
    }
}
