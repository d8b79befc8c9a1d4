/// What to do with an event offered to a [`Throttle`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gate {
    /// Handle it now.
    Run,
    /// Schedule one trailing call after this many milliseconds.
    Trail(u32),
    /// A trailing call is already pending.
    Skip,
}

/// Leading-edge throttle with a single trailing call, so the last event in a
/// burst is never lost.
#[derive(Debug, Clone)]
pub struct Throttle {
    limit_ms: f64,
    last_run: Option<f64>,
    trailing: bool,
}

impl Throttle {
    pub fn new(limit_ms: u32) -> Self {
        Self {
            limit_ms: f64::from(limit_ms),
            last_run: None,
            trailing: false,
        }
    }

    pub fn offer(&mut self, now_ms: f64) -> Gate {
        match self.last_run {
            Some(last) if now_ms - last < self.limit_ms => {
                if self.trailing {
                    Gate::Skip
                } else {
                    self.trailing = true;
                    Gate::Trail((self.limit_ms - (now_ms - last)).ceil() as u32)
                }
            }
            _ => {
                self.last_run = Some(now_ms);
                Gate::Run
            }
        }
    }

    /// Marks the pending trailing call as done.
    pub fn flush(&mut self, now_ms: f64) {
        self.trailing = false;
        self.last_run = Some(now_ms);
    }
}
