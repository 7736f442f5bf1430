use serde::Serialize;

/// A site feature that can be switched off with `?{url_param}=off`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FeatureOverride {
    pub name: &'static str,
    pub url_param: &'static str,
    /// Operator-facing effect of turning the override on.
    pub description: &'static str,
}

/// Viewport size offered by the device preview launcher, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DevicePreset {
    pub name: &'static str,
    pub width: u32,
    pub height: u32,
}

impl DevicePreset {
    /// "375×667"
    pub fn dimensions(&self) -> String {
        format!("{}×{}", self.width, self.height)
    }
}

pub static FEATURE_OVERRIDES: [FeatureOverride; 10] = [
    FeatureOverride {
        name: "BTS",
        url_param: "do_bts",
        description: "BTS will be turned off",
    },
    FeatureOverride {
        name: "Call Tracking",
        url_param: "do_ct",
        description: "Call Tracking will be turned off",
    },
    FeatureOverride {
        name: "Chat Code",
        url_param: "do_chat",
        description: "Chat Provider Code will be turned off",
    },
    FeatureOverride {
        name: "Custom Code",
        url_param: "do_cc",
        description: "All Custom Code will be turned off",
    },
    FeatureOverride {
        name: "Google Maps",
        url_param: "do_gmaps",
        description: "Google Maps will be turned off",
    },
    FeatureOverride {
        name: "GTM",
        url_param: "do_gtm",
        description: "All GTMs will be turned off",
    },
    FeatureOverride {
        name: "Mobile Lead Driver",
        url_param: "do_mld",
        description: "Mobile Lead Driver will be turned off",
    },
    FeatureOverride {
        name: "OEM Settings",
        url_param: "do_oem",
        description: "OEM Settings will be turned off",
    },
    FeatureOverride {
        name: "Page Block Content",
        url_param: "do_pbc",
        description: "Page Block Content will be turned off",
    },
    FeatureOverride {
        name: "TPI",
        url_param: "do_tpi",
        description: "All TPIs will be turned off",
    },
];

pub static DEVICE_PRESETS: [DevicePreset; 9] = [
    DevicePreset { name: "iPhone SE", width: 375, height: 667 },
    DevicePreset { name: "iPhone 12/13/14", width: 390, height: 844 },
    DevicePreset { name: "iPhone 12/13/14 Pro Max", width: 428, height: 926 },
    DevicePreset { name: "iPad", width: 768, height: 1024 },
    DevicePreset { name: "iPad Pro 11\"", width: 834, height: 1194 },
    DevicePreset { name: "iPad Pro 12.9\"", width: 1024, height: 1366 },
    DevicePreset { name: "Pixel 7", width: 412, height: 915 },
    DevicePreset { name: "Samsung Galaxy S22", width: 360, height: 780 },
    DevicePreset { name: "Samsung Galaxy Tab S8", width: 800, height: 1280 },
];

pub fn find_override(param: &str) -> Option<&'static FeatureOverride> {
    FEATURE_OVERRIDES.iter().find(|f| f.url_param == param)
}

/// Page regions the block highlighter outlines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockTarget {
    /// Every element whose id or class attribute starts with a prefix,
    /// labelled with the element's id (class name when it has none).
    Pattern {
        selector: &'static str,
        id_prefix: &'static str,
        class_prefix: &'static str,
    },
    /// First match only, under a fixed label.
    Region {
        selector: &'static str,
        label: &'static str,
    },
}

pub static BLOCK_TARGETS: [BlockTarget; 6] = [
    BlockTarget::Pattern {
        selector: "[id^='block'], [class^='contentSection']",
        id_prefix: "block",
        class_prefix: "contentSection",
    },
    BlockTarget::Region { selector: "#cBlock1", label: "Block 1" },
    BlockTarget::Region { selector: "#cBlock-2", label: "Block 2" },
    BlockTarget::Region {
        selector: "#vehicle-details > section > div.vehicle-details__title-pricing.vehicle-details__card.vehicle-details__card-- > div.vehicle-details__pricing.vehicle-details__pricing-- > div > div:nth-child(3)",
        label: "Block 3",
    },
    BlockTarget::Region { selector: "#cBlock-4", label: "Block 4" },
    BlockTarget::Region { selector: "#cBlock5", label: "Block 5" },
];

impl BlockTarget {
    pub fn selector(&self) -> &'static str {
        match *self {
            BlockTarget::Pattern { selector, .. } => selector,
            BlockTarget::Region { selector, .. } => selector,
        }
    }

    /// Whether an element with this id and class attribute falls under a
    /// pattern target. Regions match by selector only and always say no.
    pub fn claims(&self, id: &str, class_attr: &str) -> bool {
        match *self {
            BlockTarget::Pattern { id_prefix, class_prefix, .. } => {
                id.starts_with(id_prefix) || class_attr.starts_with(class_prefix)
            }
            BlockTarget::Region { .. } => false,
        }
    }

    /// Label for a matched element given its id and class attribute.
    pub fn label_for(&self, id: &str, class_name: &str) -> String {
        match *self {
            BlockTarget::Pattern { .. } if !id.is_empty() => id.to_string(),
            BlockTarget::Pattern { .. } => class_name.to_string(),
            BlockTarget::Region { label, .. } => label.to_string(),
        }
    }
}

/// Sections of the style palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SwatchGroup {
    DealerButtons,
    BootstrapButtons,
    TextColors,
    Backgrounds,
}

impl SwatchGroup {
    pub const ALL: [SwatchGroup; 4] = [
        SwatchGroup::DealerButtons,
        SwatchGroup::BootstrapButtons,
        SwatchGroup::TextColors,
        SwatchGroup::Backgrounds,
    ];

    pub fn heading(&self) -> &'static str {
        match self {
            SwatchGroup::DealerButtons => "DealerOn Buttons",
            SwatchGroup::BootstrapButtons => "Bootstrap 3 Buttons",
            SwatchGroup::TextColors => "DealerOn Text Colors",
            SwatchGroup::Backgrounds => "Backgrounds",
        }
    }
}

/// One host-site utility class shown in the style palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StyleSwatch {
    pub class: &'static str,
    pub group: SwatchGroup,
}

impl StyleSwatch {
    const fn new(class: &'static str, group: SwatchGroup) -> Self {
        Self { class, group }
    }

    /// Classes applied to the preview button so the host stylesheet renders it.
    pub fn button_classes(&self) -> String {
        match self.group {
            SwatchGroup::TextColors => format!("btn btn-link {}", self.class),
            _ => format!("btn {}", self.class),
        }
    }

    /// Backgrounds also tint the row holding the button.
    pub fn row_class(&self) -> Option<&'static str> {
        match self.group {
            SwatchGroup::Backgrounds => Some(self.class),
            _ => None,
        }
    }
}

pub static STYLE_SWATCHES: [StyleSwatch; 22] = [
    StyleSwatch::new("btn-cta", SwatchGroup::DealerButtons),
    StyleSwatch::new("btn-main", SwatchGroup::DealerButtons),
    StyleSwatch::new("btn-alt1", SwatchGroup::DealerButtons),
    StyleSwatch::new("btn-alt2", SwatchGroup::DealerButtons),
    StyleSwatch::new("btn-alt3", SwatchGroup::DealerButtons),
    StyleSwatch::new("btn-pricing", SwatchGroup::DealerButtons),
    StyleSwatch::new("btn-secondary", SwatchGroup::DealerButtons),
    StyleSwatch::new("btn-default", SwatchGroup::BootstrapButtons),
    StyleSwatch::new("btn-primary", SwatchGroup::BootstrapButtons),
    StyleSwatch::new("btn-success", SwatchGroup::BootstrapButtons),
    StyleSwatch::new("btn-info", SwatchGroup::BootstrapButtons),
    StyleSwatch::new("btn-warning", SwatchGroup::BootstrapButtons),
    StyleSwatch::new("btn-danger", SwatchGroup::BootstrapButtons),
    StyleSwatch::new("btn-link", SwatchGroup::BootstrapButtons),
    StyleSwatch::new("text-cta", SwatchGroup::TextColors),
    StyleSwatch::new("text-main", SwatchGroup::TextColors),
    StyleSwatch::new("text-default", SwatchGroup::TextColors),
    StyleSwatch::new("text-muted", SwatchGroup::TextColors),
    StyleSwatch::new("bg-cta", SwatchGroup::Backgrounds),
    StyleSwatch::new("bg-main", SwatchGroup::Backgrounds),
    StyleSwatch::new("bg-alt1", SwatchGroup::Backgrounds),
    StyleSwatch::new("bg-alt2", SwatchGroup::Backgrounds),
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn override_params_are_unique() {
        let params: HashSet<_> = FEATURE_OVERRIDES.iter().map(|f| f.url_param).collect();
        assert_eq!(params.len(), FEATURE_OVERRIDES.len());
        assert!(params.iter().all(|p| p.starts_with("do_")));
    }

    #[test]
    fn presets_have_positive_sizes() {
        for preset in DEVICE_PRESETS {
            assert!(preset.width > 0 && preset.height > 0, "{}", preset.name);
        }
        assert_eq!(DEVICE_PRESETS[0].dimensions(), "375×667");
    }

    #[test]
    fn find_override_by_param() {
        assert_eq!(find_override("do_gtm").map(|f| f.name), Some("GTM"));
        assert!(find_override("do_nothing").is_none());
    }

    #[test]
    fn pattern_labels_fall_back_to_class() {
        let pattern = BLOCK_TARGETS[0];
        assert_eq!(pattern.label_for("block12", "contentSection"), "block12");
        assert_eq!(pattern.label_for("", "contentSection wide"), "contentSection wide");
        assert_eq!(BLOCK_TARGETS[1].label_for("cBlock1", ""), "Block 1");
    }

    #[test]
    fn pattern_prefixes_agree_with_selector() {
        let pattern = BLOCK_TARGETS[0];
        assert_eq!(pattern.selector(), "[id^='block'], [class^='contentSection']");
        assert!(pattern.claims("block7", ""));
        assert!(pattern.claims("", "contentSection hero"));
        assert!(!pattern.claims("cBlock1", "section contentSection"));
        assert!(!BLOCK_TARGETS[1].claims("cBlock1", ""));
    }

    #[test]
    fn swatch_classes_follow_group() {
        let text = STYLE_SWATCHES.iter().find(|s| s.class == "text-muted").unwrap();
        assert_eq!(text.button_classes(), "btn btn-link text-muted");
        let bg = STYLE_SWATCHES.iter().find(|s| s.class == "bg-alt2").unwrap();
        assert_eq!(bg.row_class(), Some("bg-alt2"));
        assert_eq!(bg.button_classes(), "btn bg-alt2");
    }
}
