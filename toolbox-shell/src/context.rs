use toolbox_core::{canonical_page_url, DealerContext, ToolboxConfig};
use web_sys::{Document, Window};

use crate::dom;

/// Dealer identity from the page's tagging payload element.
pub(crate) fn read_dealer(doc: &Document, config: &ToolboxConfig) -> Option<DealerContext> {
    let text = match doc.query_selector(&config.payload_selector) {
        Ok(found) => found.and_then(|el| el.text_content()),
        Err(err) => {
            tracing::warn!(selector = %config.payload_selector, error = %dom::describe(&err), "bad payload selector");
            None
        }
    };
    DealerContext::read(text)
}

/// The page's canonical URL, falling back to the address bar.
pub(crate) fn canonical_url(doc: &Document, window: &Window, config: &ToolboxConfig) -> String {
    let href = window.location().href().unwrap_or_default();
    let meta = doc
        .query_selector(&config.canonical_meta_selector)
        .ok()
        .flatten()
        .and_then(|meta| meta.get_attribute("content"));
    canonical_page_url(meta.as_deref(), &href)
}
