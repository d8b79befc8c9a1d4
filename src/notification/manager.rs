use std::cell::RefCell;
use std::rc::{Rc, Weak};

use log::debug;

use super::severity::Severity;
use crate::scheduler::Scheduler;

/// Delay before a freshly mounted toast slides in.
pub const ENTER_DELAY_MS: u32 = 100;
/// How long a toast stays on screen, counted from insertion.
pub const DISPLAY_MS: u32 = 5000;
/// Length of the slide-out transition.
pub const LEAVE_TRANSITION_MS: u32 = 300;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ToastId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Mounted off-screen, waiting to slide in.
    Entering,
    Visible,
    /// Sliding out, removal pending.
    Leaving,
}

impl Phase {
    pub fn is_on_screen(&self) -> bool {
        matches!(self, Phase::Visible)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub id: ToastId,
    pub message: String,
    pub severity: Severity,
}

/// Where toasts get drawn.
pub trait ToastSurface {
    /// Called before mounting until it first reports success.
    fn ensure_container(&self) -> bool;
    /// Appends the toast below the ones already shown, in the entering phase.
    fn mount(&self, toast: &Toast);
    fn set_phase(&self, id: ToastId, phase: Phase);
    fn unmount(&self, id: ToastId);
}

#[derive(Default)]
struct Registry {
    next_id: u64,
    container_ready: bool,
    live: Vec<(ToastId, Phase)>,
}

struct Inner {
    scheduler: Rc<dyn Scheduler>,
    surface: Rc<dyn ToastSurface>,
    registry: RefCell<Registry>,
}

/// Fire-and-forget toast notifications.
///
/// Each toast runs its own timer chain: slide in after 100 ms, slide out at
/// 5000 ms, removal 300 ms later. Dismissing a toast early turns the rest of
/// its chain into no-ops.
#[derive(Clone)]
pub struct Notifier {
    inner: Rc<Inner>,
}

impl Notifier {
    pub fn new(scheduler: Rc<dyn Scheduler>, surface: Rc<dyn ToastSurface>) -> Self {
        Self {
            inner: Rc::new(Inner {
                scheduler,
                surface,
                registry: RefCell::new(Registry::default()),
            }),
        }
    }

    pub fn notify(&self, message: impl Into<String>, severity: Severity) -> ToastId {
        let message = message.into();
        let (id, container_ready) = {
            let mut registry = self.inner.registry.borrow_mut();
            let id = ToastId(registry.next_id);
            registry.next_id += 1;
            registry.live.push((id, Phase::Entering));
            (id, registry.container_ready)
        };

        if !container_ready && self.inner.surface.ensure_container() {
            self.inner.registry.borrow_mut().container_ready = true;
        }
        debug!("notification {:?} ({:?}): {}", id, severity, message);
        self.inner.surface.mount(&Toast { id, message, severity });

        let weak = Rc::downgrade(&self.inner);
        self.inner.scheduler.schedule(
            ENTER_DELAY_MS,
            Box::new(move || Self::enter(weak, id)),
        );
        id
    }

    /// Removes a toast right away. Returns false when it was already gone.
    pub fn dismiss(&self, id: ToastId) -> bool {
        let removed = {
            let mut registry = self.inner.registry.borrow_mut();
            let before = registry.live.len();
            registry.live.retain(|(live_id, _)| *live_id != id);
            registry.live.len() != before
        };
        if removed {
            debug!("notification {:?} dismissed", id);
            self.inner.surface.unmount(id);
        }
        removed
    }

    /// Live toasts in stacking order.
    #[cfg(test)]
    pub fn live(&self) -> Vec<(ToastId, Phase)> {
        self.inner.registry.borrow().live.clone()
    }

    pub fn downgrade(&self) -> WeakNotifier {
        WeakNotifier(Rc::downgrade(&self.inner))
    }

    #[cfg(test)]
    pub fn phase(&self, id: ToastId) -> Option<Phase> {
        self.inner
            .registry
            .borrow()
            .live
            .iter()
            .find(|(live_id, _)| *live_id == id)
            .map(|(_, phase)| *phase)
    }

    fn enter(weak: Weak<Inner>, id: ToastId) {
        let Some(inner) = weak.upgrade() else { return };
        if !Self::advance(&inner, id, Phase::Visible) {
            return;
        }
        inner.scheduler.schedule(
            DISPLAY_MS - ENTER_DELAY_MS,
            Box::new(move || Self::leave(weak, id)),
        );
    }

    fn leave(weak: Weak<Inner>, id: ToastId) {
        let Some(inner) = weak.upgrade() else { return };
        if !Self::advance(&inner, id, Phase::Leaving) {
            return;
        }
        inner.scheduler.schedule(
            LEAVE_TRANSITION_MS,
            Box::new(move || {
                if let Some(notifier) = WeakNotifier(weak).upgrade() {
                    notifier.dismiss(id);
                }
            }),
        );
    }

    /// Moves a live toast to `phase`. False means it was dismissed meanwhile.
    fn advance(inner: &Inner, id: ToastId, phase: Phase) -> bool {
        let found = {
            let mut registry = inner.registry.borrow_mut();
            match registry.live.iter_mut().find(|(live_id, _)| *live_id == id) {
                Some(entry) => {
                    entry.1 = phase;
                    true
                }
                None => false,
            }
        };
        if found {
            inner.surface.set_phase(id, phase);
        }
        found
    }
}

/// Handle that does not keep the notifier alive.
#[derive(Clone)]
pub struct WeakNotifier(Weak<Inner>);

impl WeakNotifier {
    pub fn upgrade(&self) -> Option<Notifier> {
        self.0.upgrade().map(|inner| Notifier { inner })
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    pub enum SurfaceEvent {
        Container,
        Mount(ToastId, String, Severity),
        Phase(ToastId, Phase),
        Unmount(ToastId),
    }

    /// Surface that records every call it receives.
    #[derive(Default)]
    pub struct RecordingSurface {
        pub events: RefCell<Vec<SurfaceEvent>>,
        /// Number of upcoming container requests that fail.
        pub container_failures: std::cell::Cell<u32>,
    }

    impl RecordingSurface {
        pub fn messages(&self) -> Vec<(String, Severity)> {
            self.events
                .borrow()
                .iter()
                .filter_map(|e| match e {
                    SurfaceEvent::Mount(_, msg, sev) => Some((msg.clone(), *sev)),
                    _ => None,
                })
                .collect()
        }

        pub fn unmounts(&self, id: ToastId) -> usize {
            self.events
                .borrow()
                .iter()
                .filter(|e| **e == SurfaceEvent::Unmount(id))
                .count()
        }
    }

    impl ToastSurface for RecordingSurface {
        fn ensure_container(&self) -> bool {
            self.events.borrow_mut().push(SurfaceEvent::Container);
            let failures = self.container_failures.get();
            if failures > 0 {
                self.container_failures.set(failures - 1);
                return false;
            }
            true
        }

        fn mount(&self, toast: &Toast) {
            self.events.borrow_mut().push(SurfaceEvent::Mount(
                toast.id,
                toast.message.clone(),
                toast.severity,
            ));
        }

        fn set_phase(&self, id: ToastId, phase: Phase) {
            self.events.borrow_mut().push(SurfaceEvent::Phase(id, phase));
        }

        fn unmount(&self, id: ToastId) {
            self.events.borrow_mut().push(SurfaceEvent::Unmount(id));
        }
    }
}
