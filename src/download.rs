use std::rc::Rc;

use crate::notification::manager::Notifier;
use crate::notification::severity::Severity;
use crate::scheduler::Scheduler;

pub const REDIRECT_DELAY_MS: u32 = 1500;

pub fn starting_message(platform: &str) -> String {
    format!("جاري تحميل التطبيق الذكي لـ {}...", platform)
}

pub fn redirect_message(store: &str) -> String {
    format!("سيتم توجيهك إلى متجر {} لتحميل خُطوة الذكية", store)
}

/// Download buttons only announce the store redirect; nothing navigates yet.
pub fn download_app(
    platform: &str,
    store: &str,
    notifier: &Notifier,
    scheduler: &Rc<dyn Scheduler>,
) {
    notifier.notify(starting_message(platform), Severity::Info);
    let weak = notifier.downgrade();
    let redirect = redirect_message(store);
    scheduler.schedule(
        REDIRECT_DELAY_MS,
        Box::new(move || {
            if let Some(notifier) = weak.upgrade() {
                notifier.notify(redirect, Severity::Success);
            }
        }),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notification::manager::testing::RecordingSurface;
    use crate::scheduler::ManualClock;

    #[test]
    fn info_then_success_after_delay() {
        let clock = Rc::new(ManualClock::new());
        let surface = Rc::new(RecordingSurface::default());
        let notifier = Notifier::new(clock.clone(), surface.clone());
        let scheduler: Rc<dyn Scheduler> = clock.clone();

        download_app("Android", "Google Play", &notifier, &scheduler);
        assert_eq!(
            surface.messages(),
            vec![(starting_message("Android"), Severity::Info)]
        );

        clock.advance(1499);
        assert_eq!(surface.messages().len(), 1);
        clock.advance(1);
        assert_eq!(
            surface.messages()[1],
            (redirect_message("Google Play"), Severity::Success)
        );
    }
}
