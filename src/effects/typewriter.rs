//! Typewriter phrase cycler.
//!
//! ```text
//! Typing --(phrase complete, hold)--> Pausing --(one skipped step)--> Deleting
//!    ^                                                                   |
//!    +-------------------(empty, next phrase)----------------------------+
//! ```
//!
//! Each [`Typewriter::step`] returns the delay before the next one, so the
//! driver simply re-arms a one-shot timer with it.

use crate::config::TypewriterConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Typing,
    Pausing,
    Deleting,
}

/// Result of one step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    /// New display text, `None` when the step does not touch it.
    pub text: Option<String>,
    pub next_delay_ms: u64,
}

#[derive(Debug, Clone)]
pub struct Typewriter {
    phrases: Vec<Vec<char>>,
    phrase: usize,
    chars: usize,
    phase: Phase,
    typing_ms: u64,
    deleting_ms: u64,
    hold_ms: u64,
    pause_ms: u64,
}

impl Typewriter {
    /// `None` when there is nothing to type.
    pub fn new(config: &TypewriterConfig) -> Option<Self> {
        let phrases: Vec<Vec<char>> = config
            .phrases
            .iter()
            .map(|p| p.chars().collect::<Vec<char>>())
            .filter(|p| !p.is_empty())
            .collect();
        if phrases.is_empty() {
            return None;
        }
        Some(Self {
            phrases,
            phrase: 0,
            chars: 0,
            phase: Phase::Typing,
            typing_ms: config.typing_ms,
            deleting_ms: config.deleting_ms,
            hold_ms: config.hold_ms,
            pause_ms: config.pause_ms,
        })
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn phrase_index(&self) -> usize {
        self.phrase
    }

    /// Text currently on display.
    pub fn display(&self) -> String {
        self.phrases[self.phrase][..self.chars].iter().collect()
    }

    pub fn step(&mut self) -> Step {
        match self.phase {
            Phase::Pausing => {
                self.phase = Phase::Deleting;
                Step {
                    text: None,
                    next_delay_ms: self.pause_ms,
                }
            }
            Phase::Typing => {
                let len = self.phrases[self.phrase].len();
                self.chars = (self.chars + 1).min(len);
                let text = Some(self.display());
                if self.chars == len {
                    self.phase = Phase::Pausing;
                    Step {
                        text,
                        next_delay_ms: self.hold_ms,
                    }
                } else {
                    Step {
                        text,
                        next_delay_ms: self.typing_ms,
                    }
                }
            }
            Phase::Deleting => {
                self.chars = self.chars.saturating_sub(1);
                let text = Some(self.display());
                if self.chars == 0 {
                    self.phrase = (self.phrase + 1) % self.phrases.len();
                    self.phase = Phase::Typing;
                }
                Step {
                    text,
                    next_delay_ms: self.deleting_ms,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn writer(phrases: &[&str]) -> Typewriter {
        let config = TypewriterConfig {
            phrases: phrases.iter().map(|s| s.to_string()).collect(),
            ..TypewriterConfig::default()
        };
        Typewriter::new(&config).unwrap()
    }

    #[test]
    fn types_then_pauses_then_deletes() {
        let mut tw = writer(&["Photographer", "Builder"]);
        let len = "Photographer".len();

        let mut last = None;
        for _ in 0..len {
            last = Some(tw.step());
        }
        let last = last.unwrap();
        assert_eq!(last.text.as_deref(), Some("Photographer"));
        assert_eq!(last.next_delay_ms, 2000);
        assert_eq!(tw.phase(), Phase::Pausing);

        let pause = tw.step();
        assert_eq!(pause.text, None);
        assert_eq!(pause.next_delay_ms, 1000);
        assert_eq!(tw.phase(), Phase::Deleting);

        let mut last = None;
        for _ in 0..len {
            last = Some(tw.step());
        }
        let last = last.unwrap();
        assert_eq!(last.text.as_deref(), Some(""));
        assert_eq!(last.next_delay_ms, 50);
        assert_eq!(tw.phrase_index(), 1);
        assert_eq!(tw.phase(), Phase::Typing);
    }

    #[test]
    fn typing_speed_is_per_phase() {
        let mut tw = writer(&["abc"]);
        assert_eq!(tw.step().next_delay_ms, 100);
        assert_eq!(tw.step().next_delay_ms, 100);
        assert_eq!(tw.step().next_delay_ms, 2000);
        assert_eq!(tw.step().next_delay_ms, 1000);
        assert_eq!(tw.step(), Step { text: Some("ab".into()), next_delay_ms: 50 });
    }

    #[test]
    fn index_wraps_around() {
        let mut tw = writer(&["a", "b"]);
        // type, pause, delete for each phrase = 3 steps
        for _ in 0..6 {
            tw.step();
        }
        assert_eq!(tw.phrase_index(), 0);
        assert_eq!(tw.step().text.as_deref(), Some("a"));
    }

    #[test]
    fn counts_unicode_scalars() {
        let mut tw = writer(&["héé"]);
        tw.step();
        assert_eq!(tw.display(), "h");
        tw.step();
        assert_eq!(tw.display(), "hé");
    }

    #[test]
    fn empty_phrase_list_never_starts() {
        let config = TypewriterConfig {
            phrases: vec![String::new()],
            ..TypewriterConfig::default()
        };
        assert!(Typewriter::new(&config).is_none());
    }
}
