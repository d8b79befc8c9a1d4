/// Elements that animate in when they scroll into view.
pub const REVEAL_SELECTOR: &str = ".scroll-animate, .scroll-animate-left, .scroll-animate-right, \
                                   .scroll-animate-scale, .scroll-animate-rotate";
pub const REVEAL_THRESHOLD: f64 = 0.1;
pub const REVEAL_ROOT_MARGIN: &str = "0px 0px -50px 0px";
pub const REVEALED_CLASS: &str = "animate";
/// Containers whose list items get revealed one after another.
pub const STAGGERED_LIST_CLASS: &str = "feature-list";
pub const STAGGER_STEP_MS: u32 = 100;

pub const COUNTER_THRESHOLD: f64 = 0.5;

pub const DEFAULT_PARALLAX_SPEED: f64 = 0.5;

pub fn stagger_delay(index: usize) -> u32 {
    u32::try_from(index)
        .unwrap_or(u32::MAX / STAGGER_STEP_MS)
        .saturating_mul(STAGGER_STEP_MS)
}

/// Vertical translation for a `.parallax` element. `speed` is the raw
/// `data-speed` attribute; missing or unparsable values use the default.
pub fn parallax_offset(scrolled: f64, speed: Option<&str>) -> f64 {
    let speed = speed
        .and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|s| s.is_finite())
        .unwrap_or(DEFAULT_PARALLAX_SPEED);
    -(scrolled * speed)
}
