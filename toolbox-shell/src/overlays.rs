use std::cell::RefCell;
use std::rc::Rc;

use gloo_timers::callback::Timeout;
use gloo_timers::future::TimeoutFuture;
use toolbox_core::{dismisses_on_click, OverlaySlot, Timings, ToggleIntent};
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Event, HtmlElement};

use crate::dom::{self, Listener};

/// An overlay currently attached to the page.
pub(crate) struct LiveOverlay {
    root: HtmlElement,
    _listeners: Vec<Listener>,
    outside: Option<Listener>,
    arming: Option<Timeout>,
}

/// A dropdown or modal that at most one instance of exists at a time.
///
/// Hiding is two-phase: the reverse animation starts immediately and the
/// element is removed `overlay_dismiss_ms` later. While closing, toggles are
/// ignored so a fast double click cannot stack a second copy.
pub(crate) struct TransientOverlay {
    kind: &'static str,
    slot: RefCell<OverlaySlot<LiveOverlay>>,
    timings: Timings,
}

impl TransientOverlay {
    pub(crate) fn new(kind: &'static str, timings: Timings) -> Rc<Self> {
        Rc::new(Self {
            kind,
            slot: RefCell::new(OverlaySlot::new()),
            timings,
        })
    }

    /// Open with `build` when closed, hide when open.
    pub(crate) fn toggle<F>(self: &Rc<Self>, anchor: &HtmlElement, build: F)
    where
        F: FnOnce(&Rc<Self>) -> Result<(HtmlElement, Vec<Listener>), JsValue>,
    {
        let intent = self.slot.borrow().toggle_intent();
        match intent {
            ToggleIntent::Close => self.hide(),
            ToggleIntent::Ignore => {}
            ToggleIntent::Open => {
                let shown = build(self).and_then(|(root, listeners)| self.show(anchor, root, listeners));
                if let Err(err) = shown {
                    tracing::warn!(overlay = self.kind, error = %dom::describe(&err), "overlay failed to open");
                }
            }
        }
    }

    fn show(self: &Rc<Self>, anchor: &HtmlElement, root: HtmlElement, listeners: Vec<Listener>) -> Result<(), JsValue> {
        let doc = dom::document()?;
        dom::append_to_body(&doc, &root)?;
        let live = LiveOverlay {
            root,
            _listeners: listeners,
            outside: None,
            arming: None,
        };
        if let Err(rejected) = self.slot.borrow_mut().show(live) {
            dom::detach(&rejected.root);
            return Ok(());
        }

        // The click that opened us is still bubbling; arm dismissal a little later.
        let weak = Rc::downgrade(self);
        let anchor = anchor.clone();
        let arming = Timeout::new(self.timings.outside_click_arm_ms, move || {
            if let Some(this) = weak.upgrade() {
                this.arm_outside_click(anchor);
            }
        });
        if let Some(live) = self.slot.borrow_mut().get_mut() {
            live.arming = Some(arming);
        }
        tracing::debug!(overlay = self.kind, "overlay shown");
        Ok(())
    }

    fn arm_outside_click(self: &Rc<Self>, anchor: HtmlElement) {
        let doc = match dom::document() {
            Ok(doc) => doc,
            Err(_) => return,
        };
        let weak = Rc::downgrade(self);
        let listener = Listener::new(&doc, "click", move |event: Event| {
            let Some(this) = weak.upgrade() else { return };
            let target = dom::event_node(&event);
            let inside = this
                .slot
                .borrow()
                .get()
                .map(|live| live.root.contains(target.as_ref()))
                .unwrap_or(false);
            if dismisses_on_click(inside, anchor.contains(target.as_ref())) {
                this.hide();
            }
        });
        match listener {
            Ok(listener) => {
                if let Some(live) = self.slot.borrow_mut().get_mut() {
                    live.outside = Some(listener);
                }
            }
            Err(err) => {
                tracing::warn!(overlay = self.kind, error = %dom::describe(&err), "outside-click listener not installed")
            }
        }
    }

    pub(crate) fn hide(self: &Rc<Self>) {
        let mut slot = self.slot.borrow_mut();
        let Some(live) = slot.begin_hide() else { return };
        live.outside = None;
        live.arming = None;
        let reverse = format!("toolboxMorphIn {}ms ease reverse forwards", self.timings.overlay_dismiss_ms);
        let _ = live.root.style().set_property("animation", &reverse);
        drop(slot);

        let weak = Rc::downgrade(self);
        let dismiss_ms = self.timings.overlay_dismiss_ms;
        spawn_local(async move {
            TimeoutFuture::new(dismiss_ms).await;
            let Some(this) = weak.upgrade() else { return };
            let finished = this.slot.borrow_mut().finish_hide();
            if let Some(live) = finished {
                dom::detach(&live.root);
                tracing::debug!(overlay = this.kind, "overlay removed");
            }
        });
    }
}
