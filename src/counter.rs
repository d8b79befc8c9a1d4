use std::cell::RefCell;
use std::rc::Rc;

use crate::scheduler::Scheduler;
use crate::typing::TextSink;

pub const DURATION_MS: u32 = 2000;
/// One animation frame at roughly 60 fps.
pub const FRAME_MS: u32 = 16;

/// Counts a number up from zero to its target.
#[derive(Debug, Clone)]
pub struct CounterAnimation {
    target: f64,
    increment: f64,
    current: f64,
    done: bool,
}

impl CounterAnimation {
    pub fn new(target: f64) -> Self {
        Self {
            target,
            increment: target / f64::from(DURATION_MS / FRAME_MS),
            current: 0.0,
            done: false,
        }
    }

    /// Parses a `data-target` attribute. `None` for anything non-finite.
    pub fn from_attr(raw: &str) -> Option<Self> {
        raw.trim()
            .parse::<f64>()
            .ok()
            .filter(|t| t.is_finite())
            .map(Self::new)
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Advances one frame and returns the text to display.
    pub fn step(&mut self) -> String {
        self.current += self.increment;
        if self.current < self.target {
            format_value(self.current, self.is_whole())
        } else {
            self.done = true;
            format_value(self.target, self.is_whole())
        }
    }

    fn is_whole(&self) -> bool {
        self.target.fract() == 0.0
    }
}

fn format_value(value: f64, whole: bool) -> String {
    if whole {
        format!("{}", value.floor() as i64)
    } else {
        format!("{:.1}", value)
    }
}

/// Runs the animation into `sink`, one frame every `FRAME_MS`.
pub fn animate(animation: CounterAnimation, sink: Rc<dyn TextSink>, scheduler: Rc<dyn Scheduler>) {
    run(Rc::new(RefCell::new(animation)), sink, scheduler);
}

fn run(animation: Rc<RefCell<CounterAnimation>>, sink: Rc<dyn TextSink>, scheduler: Rc<dyn Scheduler>) {
    let (text, done) = {
        let mut animation = animation.borrow_mut();
        let text = animation.step();
        (text, animation.is_done())
    };
    sink.render(&text);
    if !done {
        let next = scheduler.clone();
        scheduler.schedule(FRAME_MS, Box::new(move || run(animation, sink, next)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::ManualClock;
    use crate::typing::testing::RecordingSink;

    fn run_to_end(target: f64) -> (Vec<String>, Rc<ManualClock>) {
        let clock = Rc::new(ManualClock::new());
        let sink = Rc::new(RecordingSink::default());
        animate(CounterAnimation::new(target), sink.clone(), clock.clone());
        clock.advance(5000);
        let frames = sink.frames.borrow().clone();
        (frames, clock)
    }

    #[test]
    fn whole_target_renders_integers_only() {
        let (frames, _) = run_to_end(42.0);
        assert_eq!(frames.last().map(String::as_str), Some("42"));
        assert!(frames.iter().all(|f| f.parse::<i64>().is_ok()));
        let values: Vec<i64> = frames.iter().map(|f| f.parse().unwrap()).collect();
        assert!(values.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn fractional_target_renders_one_decimal() {
        let (frames, _) = run_to_end(3.5);
        assert_eq!(frames.last().map(String::as_str), Some("3.5"));
        assert!(frames.iter().all(|f| {
            let (_, decimals) = f.split_once('.').unwrap_or(("", ""));
            decimals.len() == 1
        }));
    }

    #[test]
    fn duration_does_not_depend_on_magnitude() {
        for target in [5.0, 42.0, 10_000.0] {
            let clock = Rc::new(ManualClock::new());
            let sink = Rc::new(RecordingSink::default());
            animate(CounterAnimation::new(target), sink.clone(), clock.clone());

            clock.advance(1900);
            assert_eq!(clock.pending(), 1, "target {} finished early", target);
            clock.advance(200);
            assert_eq!(clock.pending(), 0, "target {} still running", target);
            assert_eq!(sink.last(), Some(format!("{}", target as i64)));
        }
    }

    #[test]
    fn zero_target_finishes_immediately() {
        let (frames, clock) = run_to_end(0.0);
        assert_eq!(frames, vec!["0".to_string()]);
        assert_eq!(clock.pending(), 0);
    }

    #[test]
    fn attribute_parsing() {
        assert!(CounterAnimation::from_attr(" 12 ").is_some());
        assert!(CounterAnimation::from_attr("4.5").is_some());
        assert!(CounterAnimation::from_attr("").is_none());
        assert!(CounterAnimation::from_attr("many").is_none());
        assert!(CounterAnimation::from_attr("NaN").is_none());
    }
}
