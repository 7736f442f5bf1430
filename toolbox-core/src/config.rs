use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::level_filters::LevelFilter;

use crate::{Result, ToolboxError};

/// Tunables for the toolbox. Defaults match the production overlay; hosts can
/// pass a partial JSON object to override individual fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToolboxConfig {
    /// Base of the CMS single-page apps (`/cms/#/...`, `/page/#/...`).
    pub cms_base_url: String,
    pub staff_base_url: String,
    /// Element whose text content is the dealer tagging JSON.
    pub payload_selector: String,
    pub canonical_meta_selector: String,
    /// Canonical URLs containing this switch the CMS link to the staff directory.
    pub staff_marker: String,
    /// Id of the injected popup; doubles as the injection guard.
    pub popup_id: String,
    pub timings: Timings,
    pub layout: Layout,
    pub log_level: String,
}

impl Default for ToolboxConfig {
    fn default() -> Self {
        Self {
            cms_base_url: "https://cms.dealeron.com/dash/dist".to_string(),
            staff_base_url: "https://staff.dealeron.com".to_string(),
            payload_selector: "#dealeron_tagging_data".to_string(),
            canonical_meta_selector: "meta[property=\"og:url\"]".to_string(),
            staff_marker: "staff".to_string(),
            popup_id: "dealerPopup".to_string(),
            timings: Timings::default(),
            layout: Layout::default(),
            log_level: "info".to_string(),
        }
    }
}

impl ToolboxConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(ToolboxError::Config)
    }

    /// Unparseable levels fall back to `INFO`.
    pub fn log_level_filter(&self) -> LevelFilter {
        LevelFilter::from_str(self.log_level.trim()).unwrap_or(LevelFilter::INFO)
    }
}

/// Delays in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Timings {
    /// Pointer must rest on the CMS control this long to reveal the custom set.
    pub hover_intent_ms: u32,
    /// Pointer must stay outside the toolbox this long to restore the original set.
    pub collapse_ms: u32,
    pub swap_fade_ms: u32,
    pub fade_in_delay_ms: u32,
    /// Reverse animation length before a transient overlay is detached.
    pub overlay_dismiss_ms: u32,
    /// Delay before the outside-click listener of a fresh dropdown is armed.
    pub outside_click_arm_ms: u32,
    pub copy_feedback_ms: u32,
    pub popup_close_ms: u32,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            hover_intent_ms: 30,
            collapse_ms: 80,
            swap_fade_ms: 150,
            fade_in_delay_ms: 10,
            overlay_dismiss_ms: 200,
            outside_click_arm_ms: 100,
            copy_feedback_ms: 1500,
            popup_close_ms: 300,
        }
    }
}

/// Sizes in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Layout {
    pub dropdown_margin_px: f64,
    pub dropdown_gap_px: f64,
    pub device_dropdown_width_px: f64,
    pub overrides_dropdown_width_px: f64,
    /// Extra window height for browser chrome around a device preview.
    pub preview_chrome_px: u32,
    pub popup_collapse_offset_px: f64,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            dropdown_margin_px: 10.0,
            dropdown_gap_px: 8.0,
            device_dropdown_width_px: 200.0,
            overrides_dropdown_width_px: 280.0,
            preview_chrome_px: 80,
            popup_collapse_offset_px: 270.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg = ToolboxConfig::from_json(r#"{"timings":{"collapse_ms":120},"log_level":"debug"}"#)
            .unwrap();
        assert_eq!(cfg.timings.collapse_ms, 120);
        assert_eq!(cfg.timings.hover_intent_ms, 30);
        assert_eq!(cfg.popup_id, "dealerPopup");
        assert_eq!(cfg.log_level_filter(), LevelFilter::DEBUG);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = ToolboxConfig::from_json(r#"{"hover_ms":10}"#).unwrap_err();
        assert!(matches!(err, ToolboxError::Config(_)));
    }

    #[test]
    fn bad_level_falls_back_to_info() {
        let cfg = ToolboxConfig {
            log_level: "chatty".into(),
            ..ToolboxConfig::default()
        };
        assert_eq!(cfg.log_level_filter(), LevelFilter::INFO);
    }
}
