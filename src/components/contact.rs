//! Contact form submission simulator.
//!
//! The form is never sent anywhere. A submit shows a "sending" line, waits,
//! shows a "sent" line and resets the fields.

use crate::components::status::show_terminal_message;
use crate::config::FormConfig;
use crate::dom::{ElementId, Page};
use crate::engine::events::{EventKind, Handler, Listeners, Target};
use crate::engine::runtime::Task;
use crate::engine::timers::TimerQueue;

/// Field values read at submit time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactSubmission {
    pub name: String,
    pub email: String,
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct ContactForm {
    form: ElementId,
    last: Option<ContactSubmission>,
    submissions: usize,
}

impl ContactForm {
    pub fn setup(page: &Page, listeners: &mut Listeners, config: &FormConfig) -> Option<Self> {
        let form = page.get_element_by_id(&config.form_id)?;
        listeners.add(Target::Element(form), EventKind::Submit, Handler::ContactSubmit);
        Some(Self {
            form,
            last: None,
            submissions: 0,
        })
    }

    pub fn form(&self) -> ElementId {
        self.form
    }

    pub fn last_submission(&self) -> Option<&ContactSubmission> {
        self.last.as_ref()
    }

    pub fn submissions(&self) -> usize {
        self.submissions
    }

    pub fn submit(&mut self, page: &mut Page, timers: &mut TimerQueue<Task>, config: &FormConfig) {
        let field = |name: &str| page.form_field(self.form, name).unwrap_or_default();
        let data = ContactSubmission {
            name: field("name"),
            email: field("email"),
            message: field("message"),
        };
        log::debug!("contact form submitted by {:?} <{}>", data.name, data.email);
        self.last = Some(data);
        self.submissions += 1;

        show_terminal_message(page, timers, config, &config.sending_message);
        timers.set_timeout(config.send_delay_ms, Task::ContactSent { form: self.form });
    }

    pub fn complete(&self, page: &mut Page, timers: &mut TimerQueue<Task>, config: &FormConfig) {
        show_terminal_message(page, timers, config, &config.sent_message);
        page.reset_form(self.form);
    }
}
