use toolbox_core::{Location, ToolboxError};

use crate::dom::describe;

/// `window.location`; assigning `href` starts a full page load.
pub(crate) struct BrowserLocation {
    inner: web_sys::Location,
}

impl BrowserLocation {
    pub(crate) fn new(inner: web_sys::Location) -> Self {
        Self { inner }
    }
}

impl Location for BrowserLocation {
    fn href(&self) -> String {
        self.inner.href().unwrap_or_default()
    }

    fn assign(&self, href: &str) -> Result<(), ToolboxError> {
        self.inner
            .set_href(href)
            .map_err(|err| ToolboxError::Navigation(describe(&err)))
    }
}
