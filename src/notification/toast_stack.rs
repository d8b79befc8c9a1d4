use std::cell::RefCell;
use std::rc::Rc;

use log::warn;
use web_sys::MouseEvent;
use yew::prelude::*;

use super::manager::{Phase, Toast, ToastId, ToastSurface, WeakNotifier};
use crate::dom;

const CONTAINER_CLASS: &str = "notification-container";
const CONTAINER_STYLE: &str =
    "position: fixed; top: 20px; right: 20px; z-index: 1000; max-width: 400px;";

#[derive(Clone, PartialEq)]
struct ToastView {
    toast: Toast,
    phase: Phase,
}

/// Toasts currently drawn, shared between the surface and the component.
#[derive(Default)]
pub struct ToastStore {
    toasts: RefCell<Vec<ToastView>>,
    redraw: RefCell<Option<Callback<()>>>,
}

impl ToastStore {
    fn changed(&self) {
        let redraw = self.redraw.borrow().clone();
        if let Some(redraw) = redraw {
            redraw.emit(());
        }
    }
}

#[derive(Default, PartialEq)]
struct Revision(u64);

impl Reducible for Revision {
    type Action = ();

    fn reduce(self: Rc<Self>, _: ()) -> Rc<Self> {
        Rc::new(Revision(self.0.wrapping_add(1)))
    }
}

#[derive(Properties)]
pub struct ToastStackProps {
    pub store: Rc<ToastStore>,
    pub on_dismiss: Callback<ToastId>,
}

impl PartialEq for ToastStackProps {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.store, &other.store) && self.on_dismiss == other.on_dismiss
    }
}

#[function_component(ToastStack)]
pub fn toast_stack(props: &ToastStackProps) -> Html {
    let revision = use_reducer(Revision::default);

    {
        let store = props.store.clone();
        let dispatcher = revision.dispatcher();
        use_effect_with_deps(
            move |_| {
                *store.redraw.borrow_mut() = Some(Callback::from(move |_| dispatcher.dispatch(())));
                // Catch toasts mounted between the first render and now.
                store.changed();
                move || {
                    store.redraw.borrow_mut().take();
                }
            },
            (),
        );
    }

    let toasts = props.store.toasts.borrow().clone();

    html! {
        <>
            { for toasts.into_iter().map(|view| {
                let id = view.toast.id;
                let on_close = {
                    let on_dismiss = props.on_dismiss.clone();
                    Callback::from(move |e: MouseEvent| {
                        e.prevent_default();
                        on_dismiss.emit(id);
                    })
                };
                let transform = if view.phase.is_on_screen() {
                    "translateX(0)"
                } else {
                    "translateX(100%)"
                };
                let style = format!(
                    "background: {}; color: white; padding: 1rem; border-radius: 10px; \
                     margin-bottom: 10px; box-shadow: 0 4px 12px rgba(0,0,0,0.15); \
                     transform: {}; transition: transform 0.3s ease; display: flex; \
                     align-items: center; gap: 0.5rem;",
                    view.toast.severity.color(),
                    transform,
                );
                html! {
                    <div key={id.0} class="notification" style={style}>
                        <i class={view.toast.severity.icon_class()}></i>
                        <span>{ view.toast.message.clone() }</span>
                        <button class="notification-close" onclick={on_close}>{"×"}</button>
                    </div>
                }
            }) }
        </>
    }
}

/// Renders toasts with the `ToastStack` component inside a fixed container
/// in the top-right corner of the page.
#[derive(Default)]
pub struct DomToastSurface {
    store: Rc<ToastStore>,
    notifier: RefCell<Option<WeakNotifier>>,
}

impl DomToastSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Routes close-button clicks back to the notifier that owns the toasts.
    pub fn bind(&self, notifier: WeakNotifier) {
        *self.notifier.borrow_mut() = Some(notifier);
    }

    fn on_dismiss(&self) -> Callback<ToastId> {
        let notifier = self.notifier.borrow().clone();
        Callback::from(move |id| {
            if let Some(notifier) = notifier.as_ref().and_then(WeakNotifier::upgrade) {
                notifier.dismiss(id);
            }
        })
    }

    fn create_container(&self) -> Result<(), dom::DomError> {
        let root = match dom::query(&format!(".{}", CONTAINER_CLASS))? {
            Some(existing) => existing,
            None => {
                let container = dom::document()?.create_element("div")?;
                container.set_class_name(CONTAINER_CLASS);
                container.set_attribute("style", CONTAINER_STYLE)?;
                dom::body()?.append_child(&container)?;
                container
            }
        };
        let props = ToastStackProps {
            store: self.store.clone(),
            on_dismiss: self.on_dismiss(),
        };
        // The app lives as long as the page.
        let _app = yew::Renderer::<ToastStack>::with_root_and_props(root, props).render();
        Ok(())
    }
}

impl ToastSurface for DomToastSurface {
    fn ensure_container(&self) -> bool {
        match self.create_container() {
            Ok(()) => true,
            Err(err) => {
                warn!("notification container unavailable, retrying on next toast: {}", err);
                false
            }
        }
    }

    fn mount(&self, toast: &Toast) {
        self.store.toasts.borrow_mut().push(ToastView {
            toast: toast.clone(),
            phase: Phase::Entering,
        });
        self.store.changed();
    }

    fn set_phase(&self, id: ToastId, phase: Phase) {
        let updated = {
            let mut toasts = self.store.toasts.borrow_mut();
            match toasts.iter_mut().find(|view| view.toast.id == id) {
                Some(view) => {
                    view.phase = phase;
                    true
                }
                None => false,
            }
        };
        if updated {
            self.store.changed();
        }
    }

    fn unmount(&self, id: ToastId) {
        self.store.toasts.borrow_mut().retain(|view| view.toast.id != id);
        self.store.changed();
    }
}
