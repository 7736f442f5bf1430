//! Device preview: a resized popup window pointed at the current page.

use crate::catalog::DevicePreset;

/// Window name shared by all previews, so a new pick reuses the open window.
pub const PREVIEW_WINDOW_NAME: &str = "mobileView";

pub const VIEWPORT_DIRECTIVE: &str =
    "width=device-width, initial-scale=1.0, maximum-scale=1.0, user-scalable=no";

/// `window.open` feature string; height is padded by `chrome_px` for browser UI.
pub fn window_features(preset: &DevicePreset, chrome_px: u32) -> String {
    format!(
        "width={},height={},resizable=yes,scrollbars=yes,status=yes",
        preset.width,
        preset.height + chrome_px
    )
}

/// Style rule pinning the previewed body to the device width.
pub fn width_rule(preset: &DevicePreset) -> String {
    format!(
        "body {{ width: {}px !important; overflow-x: hidden; }}",
        preset.width
    )
}

/// Text of the corner label injected into the preview.
pub fn indicator_label(preset: &DevicePreset) -> String {
    format!("{} {}", preset.name, preset.dimensions())
}
