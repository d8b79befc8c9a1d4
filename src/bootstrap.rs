use std::cell::RefCell;
use std::rc::Rc;

use log::{debug, error, info, warn};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::js_sys::{Array, Reflect};
use web_sys::{
    Element, Event, EventTarget, HtmlElement, HtmlFormElement, HtmlInputElement,
    HtmlSelectElement, HtmlTextAreaElement, IntersectionObserver, IntersectionObserverEntry,
    IntersectionObserverInit, ScrollBehavior, ScrollToOptions,
};

use crate::config::SiteConfig;
use crate::contact::{self, ContactForm};
use crate::counter::{self, CounterAnimation};
use crate::dom::{self, DomError};
use crate::download;
use crate::navigation::{self, NavState, StickyNav};
use crate::notification::manager::Notifier;
use crate::notification::severity::Severity;
use crate::notification::toast_stack::DomToastSurface;
use crate::reveal::{self, REVEAL_SELECTOR};
use crate::scheduler::{BrowserScheduler, Scheduler};
use crate::throttle::{Gate, Throttle};
use crate::typing::{self, TypingHandle};

/// Scroll handlers run at most once per frame.
const SCROLL_THROTTLE_MS: u32 = 16;
const LOADED_DELAY_MS: u32 = 500;

const INJECTED_CSS: &str = r#"
    .navbar-scrolled {
        background: rgba(25, 118, 210, 0.95) !important;
        backdrop-filter: blur(10px);
    }

    .scroll-to-top:hover {
        background: var(--doctor-color) !important;
        transform: scale(1.1);
    }
"#;

const SCROLL_TOP_STYLE: &str = "position: fixed; bottom: 20px; left: 20px; width: 50px; \
    height: 50px; border-radius: 50%; background: var(--primary-color); color: white; \
    border: none; cursor: pointer; opacity: 0; visibility: hidden; transition: all 0.3s ease; \
    z-index: 1000; box-shadow: 0 4px 12px rgba(0,0,0,0.15);";

/// Names inline handlers in the page markup call, e.g.
/// `onclick="downloadApp('Android')"`.
pub const SHOW_NOTIFICATION_GLOBAL: &str = "showNotification";
pub const DOWNLOAD_APP_GLOBAL: &str = "downloadApp";
pub const STOP_TYPING_GLOBAL: &str = "stopTypingEffect";

/// Everything the page entry points need after bootstrap.
struct Site {
    config: SiteConfig,
    scheduler: Rc<dyn Scheduler>,
    notifier: Notifier,
    typing: Option<TypingHandle>,
}

thread_local! {
    static SITE: RefCell<Option<Site>> = RefCell::new(None);
}

/// Wires every behavior onto the page. Each one is optional: a failure or a
/// missing section is logged and the rest carry on.
pub fn start() {
    let config = SiteConfig::load();
    let scheduler: Rc<dyn Scheduler> = Rc::new(BrowserScheduler);
    let surface = Rc::new(DomToastSurface::new());
    let notifier = Notifier::new(scheduler.clone(), surface.clone());
    surface.bind(notifier.downgrade());

    report("injected styles", inject_styles());
    report("loading state", init_loading_state(&scheduler));
    report("scroll reveal", init_scroll_reveal(&scheduler));
    report("parallax", init_parallax(&scheduler));
    report("smooth scrolling", init_smooth_scrolling());
    report("contact form", init_contact_form(&notifier, &scheduler));
    report("counters", init_counters(&scheduler));
    report("sticky navigation", init_sticky_navigation(&scheduler));
    report("mobile menu", init_mobile_menu());
    report("scroll to top", init_scroll_to_top(&scheduler));
    let typing = match init_typing(&config, &scheduler) {
        Ok(handle) => handle,
        Err(err) => {
            error!("typing effect failed: {}", err);
            None
        }
    };

    SITE.with(|site| {
        *site.borrow_mut() = Some(Site {
            config,
            scheduler,
            notifier,
            typing,
        });
    });
    report("page globals", expose_globals());
    info!("Khotwa site loaded");
}

fn report(name: &str, result: Result<(), DomError>) {
    match result {
        Ok(()) => debug!("{} ready", name),
        Err(err) => error!("{} failed: {}", name, err),
    }
}

fn with_site(action: impl FnOnce(&Site)) {
    SITE.with(|site| match site.borrow().as_ref() {
        Some(site) => action(site),
        None => warn!("site not started yet"),
    });
}

/// Severity for the optional `type` argument of `showNotification`.
fn requested_severity(kind: Option<&str>) -> Severity {
    kind.map(Severity::from_name).unwrap_or_default()
}

#[wasm_bindgen(js_name = showNotification)]
pub fn show_notification(message: &str, kind: Option<String>) {
    let severity = requested_severity(kind.as_deref());
    with_site(|site| {
        site.notifier.notify(message, severity);
    });
}

#[wasm_bindgen(js_name = downloadApp)]
pub fn download_app(platform: &str) {
    with_site(|site| {
        download::download_app(
            platform,
            &site.config.download_store,
            &site.notifier,
            &site.scheduler,
        );
    });
}

#[wasm_bindgen(js_name = stopTypingEffect)]
pub fn stop_typing_effect() {
    with_site(|site| {
        if let Some(handle) = &site.typing {
            handle.stop();
        }
    });
}

fn set_global(window: &web_sys::Window, name: &str, function: &JsValue) -> Result<(), DomError> {
    Reflect::set(window, &JsValue::from_str(name), function)?;
    Ok(())
}

/// Puts the entry points on `window` so inline handlers in the markup can
/// reach them; module exports alone are not globals.
fn expose_globals() -> Result<(), DomError> {
    let window = dom::window()?;

    let show = Closure::wrap(Box::new(|message: String, kind: Option<String>| {
        show_notification(&message, kind)
    }) as Box<dyn Fn(String, Option<String>)>);
    set_global(&window, SHOW_NOTIFICATION_GLOBAL, show.as_ref())?;
    show.forget();

    let download = Closure::wrap(
        Box::new(|platform: String| download_app(&platform)) as Box<dyn Fn(String)>
    );
    set_global(&window, DOWNLOAD_APP_GLOBAL, download.as_ref())?;
    download.forget();

    let stop = Closure::wrap(Box::new(stop_typing_effect) as Box<dyn Fn()>);
    set_global(&window, STOP_TYPING_GLOBAL, stop.as_ref())?;
    stop.forget();
    Ok(())
}

fn listen<F>(target: &EventTarget, event: &str, handler: F) -> Result<(), DomError>
where
    F: FnMut(Event) + 'static,
{
    let callback = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
    target.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())?;
    // Listeners live as long as the page.
    callback.forget();
    Ok(())
}

/// Calls `handler` with the scroll offset, throttled, always delivering the
/// final offset of a burst.
fn on_scroll<F>(scheduler: &Rc<dyn Scheduler>, handler: F) -> Result<(), DomError>
where
    F: Fn(f64) + 'static,
{
    let handler: Rc<dyn Fn(f64)> = Rc::new(handler);
    let throttle = Rc::new(RefCell::new(Throttle::new(SCROLL_THROTTLE_MS)));
    let scheduler = scheduler.clone();
    let window = dom::window()?;
    listen(&window, "scroll", move |_| {
        let gate = throttle.borrow_mut().offer(dom::now_ms());
        match gate {
            Gate::Run => handler(dom::scroll_y()),
            Gate::Trail(delay) => {
                let handler = handler.clone();
                let throttle = throttle.clone();
                scheduler.schedule(
                    delay,
                    Box::new(move || {
                        throttle.borrow_mut().flush(dom::now_ms());
                        handler(dom::scroll_y());
                    }),
                );
            }
            Gate::Skip => {}
        }
    })
}

/// Observer that calls `on_visible` for each element entering the viewport.
fn intersection_observer<F>(
    threshold: f64,
    root_margin: Option<&str>,
    mut on_visible: F,
) -> Result<IntersectionObserver, DomError>
where
    F: FnMut(Element, &IntersectionObserver) + 'static,
{
    let callback = Closure::wrap(Box::new(move |entries: Array, observer: IntersectionObserver| {
        for entry in entries.iter() {
            let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                continue;
            };
            if entry.is_intersecting() {
                on_visible(entry.target(), &observer);
            }
        }
    }) as Box<dyn FnMut(Array, IntersectionObserver)>);

    let options = IntersectionObserverInit::new();
    options.set_threshold(&JsValue::from_f64(threshold));
    if let Some(margin) = root_margin {
        options.set_root_margin(margin);
    }
    let observer =
        IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &options)?;
    callback.forget();
    Ok(observer)
}

fn scroll_smoothly_to(top: f64) {
    if let Ok(window) = dom::window() {
        let options = ScrollToOptions::new();
        options.set_top(top);
        options.set_behavior(ScrollBehavior::Smooth);
        window.scroll_to_with_scroll_to_options(&options);
    }
}

fn inject_styles() -> Result<(), DomError> {
    let document = dom::document()?;
    let Some(head) = document.head() else {
        return Ok(());
    };
    let style = document.create_element("style")?;
    style.set_text_content(Some(INJECTED_CSS));
    head.append_child(&style)?;
    Ok(())
}

fn init_loading_state(scheduler: &Rc<dyn Scheduler>) -> Result<(), DomError> {
    let body = dom::body()?;
    body.class_list().add_1("loading")?;

    let scheduler = scheduler.clone();
    let finish = move || {
        let body = body.clone();
        scheduler.schedule(
            LOADED_DELAY_MS,
            Box::new(move || {
                let classes = body.class_list();
                let _ = classes.remove_1("loading");
                let _ = classes.add_1("loaded");
            }),
        );
    };

    // The wasm module can finish loading after the window load event.
    if dom::document()?.ready_state() == "complete" {
        finish();
        return Ok(());
    }
    let mut finish = Some(finish);
    let window = dom::window()?;
    listen(&window, "load", move |_| {
        if let Some(finish) = finish.take() {
            finish();
        }
    })
}

fn init_scroll_reveal(scheduler: &Rc<dyn Scheduler>) -> Result<(), DomError> {
    let targets = dom::query_all(REVEAL_SELECTOR)?;
    if targets.is_empty() {
        debug!("no scroll reveal targets");
        return Ok(());
    }

    let scheduler = scheduler.clone();
    let observer = intersection_observer(
        reveal::REVEAL_THRESHOLD,
        Some(reveal::REVEAL_ROOT_MARGIN),
        move |target, observer| {
            observer.unobserve(&target);
            let classes = target.class_list();
            let _ = classes.add_1(reveal::REVEALED_CLASS);
            if !classes.contains(reveal::STAGGERED_LIST_CLASS) {
                return;
            }
            let Ok(items) = target.query_selector_all("li") else {
                return;
            };
            for (index, item) in dom::elements(items).into_iter().enumerate() {
                scheduler.schedule(
                    reveal::stagger_delay(index),
                    Box::new(move || {
                        dom::set_style(&item, "opacity", "1");
                        dom::set_style(&item, "transform", "translateX(0)");
                    }),
                );
            }
        },
    )?;
    for target in &targets {
        observer.observe(target);
    }
    debug!("observing {} scroll reveal targets", targets.len());
    Ok(())
}

fn init_parallax(scheduler: &Rc<dyn Scheduler>) -> Result<(), DomError> {
    let elements = dom::query_all(".parallax")?;
    if elements.is_empty() {
        return Ok(());
    }
    on_scroll(scheduler, move |scrolled| {
        for element in &elements {
            let offset =
                reveal::parallax_offset(scrolled, element.get_attribute("data-speed").as_deref());
            dom::set_style(element, "transform", &format!("translateY({}px)", offset));
        }
    })
}

fn init_smooth_scrolling() -> Result<(), DomError> {
    for link in dom::query_all(r##"a[href^="#"]"##)? {
        let href = link.get_attribute("href").unwrap_or_default();
        listen(&link, "click", move |event| {
            event.prevent_default();
            // A bare "#" is not a valid selector and simply finds nothing.
            let target = dom::query(&href)
                .ok()
                .flatten()
                .and_then(|el| el.dyn_into::<HtmlElement>().ok());
            if let Some(target) = target {
                scroll_smoothly_to(navigation::anchor_scroll_target(f64::from(
                    target.offset_top(),
                )));
            }
        })?;
    }
    Ok(())
}

fn field_value(form: &HtmlFormElement, selector: &str) -> String {
    let Some(element) = form.query_selector(selector).ok().flatten() else {
        return String::new();
    };
    if let Some(input) = element.dyn_ref::<HtmlInputElement>() {
        input.value()
    } else if let Some(area) = element.dyn_ref::<HtmlTextAreaElement>() {
        area.value()
    } else if let Some(select) = element.dyn_ref::<HtmlSelectElement>() {
        select.value()
    } else {
        String::new()
    }
}

fn init_contact_form(notifier: &Notifier, scheduler: &Rc<dyn Scheduler>) -> Result<(), DomError> {
    let Some(form) = dom::query("#contactForm")? else {
        debug!("no contact form on this page");
        return Ok(());
    };
    let Ok(form) = form.dyn_into::<HtmlFormElement>() else {
        warn!("#contactForm is not a form element");
        return Ok(());
    };

    let notifier = notifier.clone();
    let scheduler = scheduler.clone();
    let target = form.clone();
    listen(&target, "submit", move |event| {
        event.prevent_default();
        let fields = ContactForm {
            name: field_value(&form, "#name"),
            email: field_value(&form, "#email"),
            message: field_value(&form, "#message"),
            user_type: field_value(&form, "#userType"),
        };
        let sent_form = form.clone();
        // Rejections are already shown to the visitor.
        let _ = contact::submit(
            &fields,
            &notifier,
            &scheduler,
            Box::new(move || sent_form.reset()),
        );
    })
}

fn init_counters(scheduler: &Rc<dyn Scheduler>) -> Result<(), DomError> {
    let counters = dom::query_all(".counter")?;
    if counters.is_empty() {
        return Ok(());
    }

    let scheduler = scheduler.clone();
    let observer = intersection_observer(reveal::COUNTER_THRESHOLD, None, move |target, observer| {
        observer.unobserve(&target);
        let raw = target.get_attribute("data-target").unwrap_or_default();
        match CounterAnimation::from_attr(&raw) {
            Some(animation) => counter::animate(animation, Rc::new(target), scheduler.clone()),
            None => debug!("counter has no numeric data-target: {:?}", raw),
        }
    })?;
    for counter in &counters {
        observer.observe(counter);
    }
    Ok(())
}

fn apply_nav_state(navbar: &Element, state: NavState) {
    let _ = navbar
        .class_list()
        .toggle_with_force("navbar-scrolled", state.scrolled);
    let transform = if state.hidden {
        "translateY(-100%)"
    } else {
        "translateY(0)"
    };
    dom::set_style(navbar, "transform", transform);
}

fn init_sticky_navigation(scheduler: &Rc<dyn Scheduler>) -> Result<(), DomError> {
    let Some(navbar) = dom::query(".navbar")? else {
        debug!("no navbar on this page");
        return Ok(());
    };
    let nav = RefCell::new(StickyNav::new());
    on_scroll(scheduler, move |scroll_top| {
        let state = nav.borrow_mut().on_scroll(scroll_top);
        apply_nav_state(&navbar, state);
    })
}

fn init_mobile_menu() -> Result<(), DomError> {
    let (Some(toggler), Some(collapse)) =
        (dom::query(".navbar-toggler")?, dom::query(".navbar-collapse")?)
    else {
        return Ok(());
    };

    {
        let collapse = collapse.clone();
        listen(&toggler, "click", move |_| {
            let _ = collapse.class_list().toggle("show");
        })?;
    }
    for link in dom::query_all(".navbar-nav .nav-link")? {
        let collapse = collapse.clone();
        listen(&link, "click", move |_| {
            let _ = collapse.class_list().remove_1("show");
        })?;
    }
    Ok(())
}

fn init_scroll_to_top(scheduler: &Rc<dyn Scheduler>) -> Result<(), DomError> {
    let button = dom::document()?.create_element("button")?;
    button.set_inner_html(r#"<i class="fas fa-arrow-up"></i>"#);
    button.set_class_name("scroll-to-top");
    button.set_attribute("style", SCROLL_TOP_STYLE)?;
    dom::body()?.append_child(&button)?;

    listen(&button, "click", |_| scroll_smoothly_to(0.0))?;
    on_scroll(scheduler, move |scroll_top| {
        let (opacity, visibility) = if navigation::scroll_top_visible(scroll_top) {
            ("1", "visible")
        } else {
            ("0", "hidden")
        };
        dom::set_style(&button, "opacity", opacity);
        dom::set_style(&button, "visibility", visibility);
    })
}

fn init_typing(
    config: &SiteConfig,
    scheduler: &Rc<dyn Scheduler>,
) -> Result<Option<TypingHandle>, DomError> {
    let Some(element) = dom::query(".typing-effect")? else {
        return Ok(None);
    };
    Ok(typing::start(
        &config.typing_phrases,
        Rc::new(element),
        scheduler.clone(),
    ))
}
