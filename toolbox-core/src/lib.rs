//! Platform-independent pieces of the dealer site toolbox.
//!
//! Everything here compiles and tests natively; the browser shell in
//! `toolbox-shell` owns the DOM and feeds events into these types.

use thiserror::Error;

pub mod catalog;
pub mod clipboard;
pub mod config;
pub mod dealer;
pub mod overlay;
pub mod overrides;
pub mod panel;
pub mod popup;
pub mod preview;

pub use catalog::{
    find_override, BlockTarget, DevicePreset, FeatureOverride, StyleSwatch, SwatchGroup,
    BLOCK_TARGETS, DEVICE_PRESETS, FEATURE_OVERRIDES, STYLE_SWATCHES,
};
pub use clipboard::CopyRoute;
pub use config::{Layout, Timings, ToolboxConfig};
pub use dealer::{canonical_page_url, DealerContext, DealerLinks};
pub use overlay::{
    dismisses_on_click, place_below, unique_targets, AnchorRect, BlockHighlighter, OverlaySlot,
    Placement, Rollback, ToggleIntent,
};
pub use overrides::{Location, OverrideStore};
pub use panel::{
    blocks_label, render_rows, rows_are_stale, PanelEffect, PanelState, PanelTimer, PointerEvent, ToolAction,
    ToolButton, ToolboxPanel,
};
pub use popup::{InjectDecision, PopupShell};

#[derive(Error, Debug)]
pub enum ToolboxError {
    #[error("dealer payload element not found")]
    MissingPayload,
    #[error("malformed dealer payload: {0}")]
    MalformedPayload(#[source] serde_json::Error),
    #[error("dealer payload has no dealerId")]
    MissingDealerId,
    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("invalid toolbox config: {0}")]
    Config(#[source] serde_json::Error),
    #[error("unknown override parameter: {0}")]
    UnknownOverride(String),
    #[error("navigation failed: {0}")]
    Navigation(String),
}

pub type Result<T> = std::result::Result<T, ToolboxError>;
