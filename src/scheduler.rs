use gloo_timers::callback::Timeout;

/// Runs a task once after a delay. Every timer chain in the site goes
/// through this so the state machines can be driven by a fake clock.
pub trait Scheduler {
    fn schedule(&self, delay_ms: u32, task: Box<dyn FnOnce()>);
}

/// Browser timers backed by `setTimeout`.
#[derive(Default, Clone, Copy)]
pub struct BrowserScheduler;

impl Scheduler for BrowserScheduler {
    fn schedule(&self, delay_ms: u32, task: Box<dyn FnOnce()>) {
        // The chain owns itself; nothing ever needs to clear a pending timeout.
        Timeout::new(delay_ms, task).forget();
    }
}

#[cfg(test)]
pub use manual::ManualClock;
