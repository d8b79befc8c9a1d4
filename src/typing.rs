use std::cell::{Cell, RefCell};
use std::rc::Rc;

use log::debug;

use crate::scheduler::Scheduler;

pub const TYPE_INTERVAL_MS: u32 = 150;
pub const DELETE_INTERVAL_MS: u32 = 100;
/// Pause with the whole phrase on screen.
pub const FULL_PHRASE_PAUSE_MS: u32 = 2000;
/// Pause on the empty line before the next phrase starts.
pub const NEXT_PHRASE_PAUSE_MS: u32 = 500;

/// Anything that can display a line of text.
pub trait TextSink {
    fn render(&self, text: &str);
}

impl TextSink for web_sys::Element {
    fn render(&self, text: &str) {
        self.set_text_content(Some(text));
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Typing,
    Deleting,
}

/// Output of one tick: what to show and when the next tick is due.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub text: String,
    pub next_delay_ms: u32,
}

/// Typewriter state machine over a fixed, non-empty list of phrases.
///
/// Positions count chars, so multi-byte scripts are cut on character
/// boundaries.
#[derive(Debug, Clone)]
pub struct TypingEffect {
    phrases: Vec<Vec<char>>,
    phrase_index: usize,
    char_index: usize,
    direction: Direction,
}

impl TypingEffect {
    pub fn new<I, S>(phrases: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let phrases: Vec<Vec<char>> = phrases
            .into_iter()
            .map(|p| p.as_ref().chars().collect())
            .collect();
        if phrases.is_empty() {
            return None;
        }
        Some(Self {
            phrases,
            phrase_index: 0,
            char_index: 0,
            direction: Direction::Typing,
        })
    }

    #[cfg(test)]
    pub fn phrase_index(&self) -> usize {
        self.phrase_index
    }

    #[cfg(test)]
    pub fn char_index(&self) -> usize {
        self.char_index
    }

    #[cfg(test)]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn tick(&mut self) -> Frame {
        let phrase_len = self.phrases[self.phrase_index].len();
        let mut next_delay_ms = match self.direction {
            Direction::Typing => {
                self.char_index = (self.char_index + 1).min(phrase_len);
                TYPE_INTERVAL_MS
            }
            Direction::Deleting => {
                self.char_index = self.char_index.saturating_sub(1);
                DELETE_INTERVAL_MS
            }
        };
        let text: String = self.phrases[self.phrase_index][..self.char_index]
            .iter()
            .collect();

        match self.direction {
            Direction::Typing if self.char_index == phrase_len => {
                self.direction = Direction::Deleting;
                next_delay_ms = FULL_PHRASE_PAUSE_MS;
            }
            Direction::Deleting if self.char_index == 0 => {
                self.direction = Direction::Typing;
                self.phrase_index = (self.phrase_index + 1) % self.phrases.len();
                next_delay_ms = NEXT_PHRASE_PAUSE_MS;
            }
            _ => {}
        }

        Frame { text, next_delay_ms }
    }
}

/// Stops a running typing effect. Dropping the handle does not stop it.
#[derive(Clone)]
pub struct TypingHandle {
    stopped: Rc<Cell<bool>>,
}

impl TypingHandle {
    pub fn stop(&self) {
        self.stopped.set(true);
    }

    #[cfg(test)]
    pub fn is_stopped(&self) -> bool {
        self.stopped.get()
    }
}

/// Starts cycling `phrases` into `sink`. The first frame renders immediately.
/// Returns `None` and does nothing when there are no phrases.
pub fn start<I, S>(
    phrases: I,
    sink: Rc<dyn TextSink>,
    scheduler: Rc<dyn Scheduler>,
) -> Option<TypingHandle>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let Some(effect) = TypingEffect::new(phrases) else {
        debug!("typing effect has no phrases, skipping");
        return None;
    };
    let stopped = Rc::new(Cell::new(false));
    run(
        Rc::new(RefCell::new(effect)),
        sink,
        scheduler,
        stopped.clone(),
    );
    Some(TypingHandle { stopped })
}

fn run(
    effect: Rc<RefCell<TypingEffect>>,
    sink: Rc<dyn TextSink>,
    scheduler: Rc<dyn Scheduler>,
    stopped: Rc<Cell<bool>>,
) {
    if stopped.get() {
        return;
    }
    let frame = effect.borrow_mut().tick();
    sink.render(&frame.text);
    let next = scheduler.clone();
    scheduler.schedule(
        frame.next_delay_ms,
        Box::new(move || run(effect, sink, next, stopped)),
    );
}

#[cfg(test)]
pub(crate) mod testing {
    use super::TextSink;
    use std::cell::RefCell;

    #[derive(Default)]
    pub struct RecordingSink {
        pub frames: RefCell<Vec<String>>,
    }

    impl RecordingSink {
        pub fn last(&self) -> Option<String> {
            self.frames.borrow().last().cloned()
        }
    }

    impl TextSink for RecordingSink {
        fn render(&self, text: &str) {
            self.frames.borrow_mut().push(text.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::RecordingSink;
    use super::*;
    use crate::scheduler::ManualClock;

    fn frames(effect: &mut TypingEffect, n: usize) -> Vec<(String, u32)> {
        (0..n)
            .map(|_| {
                let f = effect.tick();
                (f.text, f.next_delay_ms)
            })
            .collect()
    }

    #[test]
    fn empty_phrase_list_is_a_noop() {
        let clock = Rc::new(ManualClock::new());
        let sink = Rc::new(RecordingSink::default());
        let handle = start(Vec::<String>::new(), sink.clone(), clock.clone());
        assert!(handle.is_none());
        assert!(sink.frames.borrow().is_empty());
        assert_eq!(clock.pending(), 0);
    }

    #[test]
    fn two_phrases_over_two_cycles() {
        let mut effect = TypingEffect::new(["ab", "c"]).unwrap();
        let one_cycle = vec![
            ("a".to_string(), TYPE_INTERVAL_MS),
            ("ab".to_string(), FULL_PHRASE_PAUSE_MS),
            ("a".to_string(), DELETE_INTERVAL_MS),
            ("".to_string(), NEXT_PHRASE_PAUSE_MS),
            ("c".to_string(), FULL_PHRASE_PAUSE_MS),
            ("".to_string(), NEXT_PHRASE_PAUSE_MS),
        ];
        let expected: Vec<_> = one_cycle.iter().chain(one_cycle.iter()).cloned().collect();
        assert_eq!(frames(&mut effect, 12), expected);
        assert_eq!(effect.phrase_index(), 0);
        assert_eq!(effect.direction(), Direction::Typing);
    }

    #[test]
    fn timed_run_matches_schedule() {
        let clock = Rc::new(ManualClock::new());
        let sink = Rc::new(RecordingSink::default());
        start(["ab", "c"], sink.clone(), clock.clone()).unwrap();
        assert_eq!(sink.last().as_deref(), Some("a"));

        clock.advance(150);
        assert_eq!(sink.last().as_deref(), Some("ab"));
        clock.advance(1999);
        assert_eq!(sink.last().as_deref(), Some("ab"));
        clock.advance(1);
        assert_eq!(sink.last().as_deref(), Some("a"));
        clock.advance(100);
        assert_eq!(sink.last().as_deref(), Some(""));
        clock.advance(500);
        assert_eq!(sink.last().as_deref(), Some("c"));
        clock.advance(2000);
        assert_eq!(sink.last().as_deref(), Some(""));
        clock.advance(500);
        assert_eq!(sink.last().as_deref(), Some("a"));

        // One full cycle: 4 + 2 char ticks plus pauses.
        assert_eq!(clock.now(), 150 + 2000 + 100 + 500 + 2000 + 500);
        assert_eq!(sink.frames.borrow().len(), 7);
    }

    #[test]
    fn stop_prevents_further_ticks() {
        let clock = Rc::new(ManualClock::new());
        let sink = Rc::new(RecordingSink::default());
        let handle = start(["hello"], sink.clone(), clock.clone()).unwrap();
        clock.advance(300);
        let shown = sink.frames.borrow().len();
        handle.stop();
        clock.advance(60_000);
        assert_eq!(sink.frames.borrow().len(), shown);
        assert!(handle.is_stopped());
        assert_eq!(clock.pending(), 0);
    }

    #[test]
    fn multibyte_phrases_split_on_chars() {
        let mut effect = TypingEffect::new(["خطوة"]).unwrap();
        let shown: Vec<_> = frames(&mut effect, 4).into_iter().map(|(t, _)| t).collect();
        assert_eq!(shown, vec!["خ", "خط", "خطو", "خطوة"]);
    }

    #[test]
    fn char_index_stays_within_phrase() {
        let mut effect = TypingEffect::new(["xyz", "", "q"]).unwrap();
        for _ in 0..50 {
            effect.tick();
            let len = [3, 0, 1][effect.phrase_index()];
            assert!(effect.char_index() <= len);
        }
    }

    #[test]
    fn empty_phrase_in_list_pauses_through() {
        let mut effect = TypingEffect::new(["", "b"]).unwrap();
        let got = frames(&mut effect, 3);
        assert_eq!(
            got,
            vec![
                ("".to_string(), FULL_PHRASE_PAUSE_MS),
                ("".to_string(), NEXT_PHRASE_PAUSE_MS),
                ("b".to_string(), FULL_PHRASE_PAUSE_MS),
            ]
        );
    }
}
