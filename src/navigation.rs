/// Past this offset the navbar switches to its compact "scrolled" look.
pub const SCROLLED_THRESHOLD: f64 = 100.0;
/// Scrolling down past this offset hides the navbar.
pub const HIDE_THRESHOLD: f64 = 200.0;
/// Past this offset the scroll-to-top button shows up.
pub const SCROLL_TOP_THRESHOLD: f64 = 300.0;
/// Height of the fixed navbar, kept clear when jumping to an anchor.
pub const ANCHOR_OFFSET: f64 = 80.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NavState {
    pub scrolled: bool,
    pub hidden: bool,
}

/// Tracks the last scroll offset to tell scroll direction.
#[derive(Debug, Clone, Default)]
pub struct StickyNav {
    last_scroll_top: f64,
}

impl StickyNav {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_scroll(&mut self, scroll_top: f64) -> NavState {
        let state = NavState {
            scrolled: scroll_top > SCROLLED_THRESHOLD,
            hidden: scroll_top > self.last_scroll_top && scroll_top > HIDE_THRESHOLD,
        };
        self.last_scroll_top = scroll_top;
        state
    }
}

pub fn scroll_top_visible(scroll_top: f64) -> bool {
    scroll_top > SCROLL_TOP_THRESHOLD
}

pub fn anchor_scroll_target(offset_top: f64) -> f64 {
    offset_top - ANCHOR_OFFSET
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scrolled_state_past_100px() {
        let mut nav = StickyNav::new();
        assert!(!nav.on_scroll(50.0).scrolled);
        assert!(nav.on_scroll(150.0).scrolled);
        assert!(!nav.on_scroll(100.0).scrolled);
    }

    #[test]
    fn hides_only_when_scrolling_down_past_200px() {
        let mut nav = StickyNav::new();
        assert!(!nav.on_scroll(180.0).hidden);
        assert!(nav.on_scroll(260.0).hidden);
        assert!(!nav.on_scroll(250.0).hidden);
        assert!(!nav.on_scroll(240.0).hidden);
        assert!(nav.on_scroll(241.0).hidden);
    }

    #[test]
    fn same_offset_counts_as_not_down() {
        let mut nav = StickyNav::new();
        nav.on_scroll(500.0);
        assert_eq!(
            nav.on_scroll(500.0),
            NavState {
                scrolled: true,
                hidden: false
            }
        );
    }

    #[test]
    fn scroll_top_button_and_anchor_offset() {
        assert!(!scroll_top_visible(300.0));
        assert!(scroll_top_visible(301.0));
        assert_eq!(anchor_scroll_target(1000.0), 920.0);
    }
}
