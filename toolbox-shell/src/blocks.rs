use std::cell::RefCell;
use std::rc::{Rc, Weak};

use toolbox_core::panel::HIGHLIGHT_BUTTON_ID;
use toolbox_core::{blocks_label, unique_targets, BlockHighlighter, BlockTarget, Rollback, BLOCK_TARGETS};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement};

use crate::dom::{self, Listener};

/// Fixed "Close All" control shown while highlights are up.
pub(crate) struct CloseAll {
    element: HtmlElement,
    _listener: Listener,
}

pub(crate) struct Blocks {
    /// Matches inside the toolbox popup are never outlined.
    popup_id: String,
    state: RefCell<BlockHighlighter<CloseAll, HtmlElement>>,
}

impl Blocks {
    pub(crate) fn new(popup_id: &str) -> Rc<Self> {
        Rc::new(Self {
            popup_id: popup_id.to_string(),
            state: RefCell::new(BlockHighlighter::new()),
        })
    }

    pub(crate) fn is_shown(&self) -> bool {
        self.state.borrow().is_shown()
    }

    pub(crate) fn toggle(self: &Rc<Self>) {
        if self.is_shown() {
            self.hide();
        } else {
            self.show();
        }
    }

    pub(crate) fn show(self: &Rc<Self>) {
        let weak = Rc::downgrade(self);
        let shown = self.state.borrow_mut().show_with(|| build_highlights(weak, &self.popup_id));
        match shown {
            Ok(true) => {
                tracing::debug!(count = self.state.borrow().overlay_count(), "blocks highlighted");
                sync_label(true);
            }
            Ok(false) => {}
            Err(err) => tracing::warn!(error = %dom::describe(&err), "could not highlight blocks"),
        }
    }

    pub(crate) fn hide(&self) {
        let removed = self.state.borrow_mut().hide();
        let Some((close_all, overlays)) = removed else { return };
        for overlay in &overlays {
            dom::detach(overlay);
        }
        dom::detach(&close_all.element);
        sync_label(false);
    }
}

fn build_highlights(blocks: Weak<Blocks>, popup_id: &str) -> Result<(CloseAll, Vec<HtmlElement>), JsValue> {
    let doc = dom::document()?;
    let popup = doc.get_element_by_id(popup_id);
    let found = unique_targets(discover(&doc, popup.as_ref()), |a: &Element, b: &Element| {
        a.is_same_node(Some(b.as_ref()))
    });

    let mut overlays = Rollback::new(|overlay: &HtmlElement| dom::detach(overlay));
    for (host, label) in found {
        let Ok(host) = host.dyn_into::<HtmlElement>() else { continue };
        if host.style().get_property_value("position")?.is_empty() {
            host.style().set_property("position", "relative")?;
        }
        let overlay = dom::create(&doc, "div")?;
        overlay.set_class_name("toolbox-block-highlight");
        let tag = dom::create_text(&doc, "span", &label)?;
        tag.set_class_name("toolbox-block-label");
        overlay.append_child(&tag)?;
        host.append_child(&overlay)?;
        overlays.push(overlay);
    }

    let close_all = close_all(&doc, blocks)?;
    Ok((close_all, overlays.commit()))
}

fn close_all(doc: &Document, blocks: Weak<Blocks>) -> Result<CloseAll, JsValue> {
    let element = dom::create_text(doc, "div", "✕ Close All")?;
    element.set_class_name("toolbox-close-all");
    let listener = Listener::new(&element, "click", move |event| {
        event.stop_propagation();
        if let Some(blocks) = blocks.upgrade() {
            blocks.hide();
        }
    })?;
    dom::append_to_body(doc, &element)?;
    Ok(CloseAll {
        element,
        _listener: listener,
    })
}

/// Every element the catalog matches outside `popup`, with its label. A
/// selector that fails to parse or matches nothing contributes nothing.
fn discover(doc: &Document, popup: Option<&Element>) -> Vec<(Element, String)> {
    let outside = |el: &Element| popup.map_or(true, |popup| !popup.contains(Some(el.as_ref())));
    let mut found = Vec::new();
    for target in BLOCK_TARGETS.iter() {
        match target {
            BlockTarget::Pattern { selector, .. } => {
                let Ok(list) = doc.query_selector_all(selector) else { continue };
                for i in 0..list.length() {
                    if let Some(el) = list.item(i).and_then(|n| n.dyn_into::<Element>().ok()).filter(|el| outside(el)) {
                        let label = target.label_for(&el.id(), &el.class_name());
                        found.push((el, label));
                    }
                }
            }
            BlockTarget::Region { selector, .. } => {
                if let Some(el) = doc.query_selector(selector).ok().flatten().filter(|el| outside(el)) {
                    let label = target.label_for(&el.id(), &el.class_name());
                    found.push((el, label));
                }
            }
        }
    }
    found
}

fn sync_label(shown: bool) {
    if let Some(button) = dom::document().ok().and_then(|doc| doc.get_element_by_id(HIGHLIGHT_BUTTON_ID)) {
        button.set_text_content(Some(blocks_label(shown)));
    }
}
