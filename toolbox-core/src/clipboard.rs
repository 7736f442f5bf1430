//! How a copy reaches the system clipboard.

/// `navigator.clipboard` is hidden on plain-http dealer pages, which still
/// need Copy and the style swatches to work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyRoute {
    /// `navigator.clipboard.writeText`, settled asynchronously.
    AsyncApi,
    /// Hidden textarea, `select()`, then `execCommand("copy")`.
    Selection,
}

impl CopyRoute {
    pub fn choose(has_clipboard: bool, has_write_text: bool) -> Self {
        if has_clipboard && has_write_text {
            CopyRoute::AsyncApi
        } else {
            CopyRoute::Selection
        }
    }
}

/// Inline styles for the throwaway textarea. Pinned to the viewport corner
/// so focusing it never scrolls the page.
pub const SELECTION_AREA_STYLES: [(&str, &str); 4] = [
    ("position", "fixed"),
    ("top", "0"),
    ("left", "0"),
    ("opacity", "0"),
];
